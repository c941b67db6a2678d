//! # Read-Only Database Model
//!
//! The immutable tree a [`DatabaseMgr`](crate::DatabaseMgr) hands out handles
//! into. Built once by the packed loader, the unpacked loader or a creator
//! conversion; after that only [`swap_values`](Database::swap_values) touches it.

use std::collections::HashMap;

use crate::error::{DatabaseError, DatabaseResult};
use crate::types::{AttributeType, AttributeUsage, AttributeValues};

/// One typed, fixed-cardinality field of a record.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    pub(crate) name: String,
    pub(crate) usage: AttributeUsage,
    pub(crate) values: AttributeValues,
}

impl Attribute {
    /// Creates an attribute.
    #[must_use]
    pub fn new(name: impl Into<String>, usage: AttributeUsage, values: AttributeValues) -> Self {
        Self {
            name: name.into(),
            usage,
            values,
        }
    }

    /// Attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tool hint.
    #[must_use]
    pub const fn usage(&self) -> AttributeUsage {
        self.usage
    }

    /// Stored type.
    #[must_use]
    pub const fn attribute_type(&self) -> AttributeType {
        self.values.attribute_type()
    }

    /// Stored values.
    #[must_use]
    pub const fn values(&self) -> &AttributeValues {
        &self.values
    }
}

/// Generates an ordered, name-indexed child collection.
macro_rules! named_children {
    ($owner:ident, $child:ident, $field:ident, $index:ident, $find:ident, $get:ident, $count:ident, $push:ident, $iter:ident) => {
        impl $owner {
            /// Number of children.
            #[must_use]
            pub fn $count(&self) -> usize {
                self.$field.len()
            }

            /// Child at `index`.
            #[must_use]
            pub fn $get(&self, index: usize) -> Option<&$child> {
                self.$field.get(index)
            }

            /// Index of the child named `name`.
            #[must_use]
            pub fn $find(&self, name: &str) -> Option<usize> {
                self.$index.get(name).copied()
            }

            /// Children in order.
            pub fn $iter(&self) -> std::slice::Iter<'_, $child> {
                self.$field.iter()
            }

            /// Appends a child, rejecting a duplicate name.
            pub fn $push(&mut self, child: $child) -> DatabaseResult<usize> {
                if self.$index.contains_key(child.name()) {
                    return Err(DatabaseError::DuplicateName(child.name().to_string()));
                }
                let index = self.$field.len();
                self.$index.insert(child.name().to_string(), index);
                self.$field.push(child);
                Ok(index)
            }
        }
    };
}

/// A named row of attributes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    name: String,
    attributes: Vec<Attribute>,
    attribute_index: HashMap<String, usize>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Record name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn attribute_mut(&mut self, index: usize) -> Option<&mut Attribute> {
        self.attributes.get_mut(index)
    }
}

named_children!(
    Record,
    Attribute,
    attributes,
    attribute_index,
    find_attribute,
    attribute,
    num_attributes,
    push_attribute,
    attributes
);

/// A named table of records.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Category {
    name: String,
    records: Vec<Record>,
    record_index: HashMap<String, usize>,
}

impl Category {
    /// Creates an empty category.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Category name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn record_mut(&mut self, index: usize) -> Option<&mut Record> {
        self.records.get_mut(index)
    }
}

named_children!(Category, Record, records, record_index, find_record, record, num_records, push_record, records);

/// A whole database: categories, records and attribute values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Database {
    name: String,
    categories: Vec<Category>,
    category_index: HashMap<String, usize>,
}

impl Database {
    /// Creates an empty database.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Database name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Finds an attribute by its category, record and attribute names.
    #[must_use]
    pub fn find_path(&self, category: &str, record: &str, attribute: &str) -> Option<(usize, usize, usize)> {
        let c = self.find_category(category)?;
        let r = self.categories[c].find_record(record)?;
        let a = self.categories[c].records[r].find_attribute(attribute)?;
        Some((c, r, a))
    }

    /// Attribute at a resolved index path.
    #[must_use]
    pub fn attribute_at(&self, (c, r, a): (usize, usize, usize)) -> Option<&Attribute> {
        self.categories.get(c)?.record(r)?.attribute(a)
    }

    fn attribute_at_mut(&mut self, (c, r, a): (usize, usize, usize)) -> Option<&mut Attribute> {
        self.categories.get_mut(c)?.record_mut(r)?.attribute_mut(a)
    }

    /// Total attributes across all records.
    #[must_use]
    pub fn total_attributes(&self) -> usize {
        self.categories
            .iter()
            .flat_map(Category::records)
            .map(Record::num_attributes)
            .sum()
    }

    /// Exchanges attribute values with `other`.
    ///
    /// Every attribute of `self` must exist at the same category/record/
    /// attribute path in `other` with the same type. If any does not, nothing
    /// changes and the offending path is returned in the error. Structure is
    /// never touched, so calling this twice restores both databases.
    pub fn swap_values(&mut self, other: &mut Self) -> DatabaseResult<usize> {
        let mut pairs = Vec::with_capacity(self.total_attributes());
        for (c, category) in self.categories.iter().enumerate() {
            for (r, record) in category.records.iter().enumerate() {
                for (a, attribute) in record.attributes.iter().enumerate() {
                    let path = format!("{}/{}/{}", category.name, record.name, attribute.name);
                    let theirs = other
                        .find_path(&category.name, &record.name, &attribute.name)
                        .ok_or_else(|| DatabaseError::NotFound(path.clone()))?;
                    let stored = other
                        .attribute_at(theirs)
                        .map(Attribute::attribute_type)
                        .ok_or(DatabaseError::NotFound(path))?;
                    if stored != attribute.attribute_type() {
                        return Err(DatabaseError::TypeMismatch {
                            requested: attribute.attribute_type(),
                            stored,
                        });
                    }
                    pairs.push(((c, r, a), theirs));
                }
            }
        }

        for &(mine, theirs) in &pairs {
            if let (Some(a), Some(b)) = (self.attribute_at_mut(mine), other.attribute_at_mut(theirs)) {
                std::mem::swap(&mut a.values, &mut b.values);
            }
        }
        Ok(pairs.len())
    }
}

named_children!(
    Database,
    Category,
    categories,
    category_index,
    find_category,
    category,
    num_categories,
    push_category,
    categories
);

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str, damage: f32, extra: bool) -> Database {
        let mut db = Database::new(name);
        let mut record = Record::new("Pistol");
        record
            .push_attribute(Attribute::new("Damage", AttributeUsage::Default, AttributeValues::Float(vec![damage])))
            .unwrap();
        if extra {
            record
                .push_attribute(Attribute::new("Sound", AttributeUsage::Filename, AttributeValues::String(vec!["bang.wav".into()])))
                .unwrap();
        }
        let mut category = Category::new("Weapons");
        category.push_record(record).unwrap();
        db.push_category(category).unwrap();
        db
    }

    #[test]
    fn test_lookup_by_name_and_index() {
        let db = sample("Game", 2.5, true);
        let (c, r, a) = db.find_path("Weapons", "Pistol", "Sound").unwrap();
        assert_eq!((c, r, a), (0, 0, 1));
        let attribute = db.attribute_at((c, r, a)).unwrap();
        assert_eq!(attribute.usage(), AttributeUsage::Filename);
        assert_eq!(db.total_attributes(), 2);
        assert!(db.find_path("Weapons", "Rifle", "Damage").is_none());
    }

    #[test]
    fn test_duplicate_child_rejected() {
        let mut category = Category::new("Weapons");
        category.push_record(Record::new("Pistol")).unwrap();
        assert!(matches!(category.push_record(Record::new("Pistol")), Err(DatabaseError::DuplicateName(_))));
        assert_eq!(category.num_records(), 1);
    }

    #[test]
    fn test_swap_values_requires_subset() {
        let mut small = sample("A", 1.0, false);
        let mut large = sample("B", 2.0, true);

        assert_eq!(small.swap_values(&mut large).unwrap(), 1);
        assert!(large.swap_values(&mut small).is_err());

        let damage = |db: &Database| db.attribute_at((0, 0, 0)).unwrap().values().float_at(0).unwrap();
        assert_eq!(damage(&small), 2.0);
        assert_eq!(damage(&large), 1.0);
    }
}
