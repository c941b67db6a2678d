//! # Creator Graph
//!
//! Mutable authoring side of a database. Tools build a [`CreatorDatabase`]
//! with explicit create/set calls, then either save it to the packed format or
//! hand it to [`DatabaseMgr::convert_database`](crate::DatabaseMgr::convert_database).
//! The creator graph never becomes the read-only tree; conversion copies it.
//!
//! Creation calls return `None` on a duplicate name or bad parent. Setters
//! return `false` on a type mismatch or an index past the end; index
//! `num_values` appends.

use ltsdk_math::{Vector2, Vector3, Vector4};

use crate::database::{Attribute, Category, Database, Record};
use crate::types::{struct_member_name, AttributeType, AttributeUsage, AttributeValues, RecordLink};

/// Category in a [`CreatorDatabase`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CreatorCategory(usize);

/// Record in a [`CreatorDatabase`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CreatorRecord {
    category: usize,
    record: usize,
}

/// Attribute in a [`CreatorDatabase`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CreatorAttribute {
    category: usize,
    record: usize,
    attribute: usize,
}

#[derive(Clone, Debug)]
struct CreatorAttributeNode {
    name: String,
    usage: AttributeUsage,
    values: AttributeValues,
}

#[derive(Clone, Debug)]
struct CreatorRecordNode {
    name: String,
    attributes: Vec<CreatorAttributeNode>,
}

#[derive(Clone, Debug)]
struct CreatorCategoryNode {
    name: String,
    records: Vec<CreatorRecordNode>,
}

/// A database under construction.
#[derive(Clone, Debug, Default)]
pub struct CreatorDatabase {
    categories: Vec<CreatorCategoryNode>,
}

impl CreatorDatabase {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a category.
    pub fn create_category(&mut self, name: &str) -> Option<CreatorCategory> {
        if self.get_category(name).is_some() {
            tracing::debug!("creator: duplicate category {}", name);
            return None;
        }
        self.categories.push(CreatorCategoryNode {
            name: name.to_string(),
            records: Vec::new(),
        });
        Some(CreatorCategory(self.categories.len() - 1))
    }

    /// Adds a record to `category`.
    pub fn create_record(&mut self, category: CreatorCategory, name: &str) -> Option<CreatorRecord> {
        if self.get_record(category, name).is_some() {
            tracing::debug!("creator: duplicate record {}", name);
            return None;
        }
        let node = self.categories.get_mut(category.0)?;
        node.records.push(CreatorRecordNode {
            name: name.to_string(),
            attributes: Vec::new(),
        });
        Some(CreatorRecord {
            category: category.0,
            record: node.records.len() - 1,
        })
    }

    /// Adds an attribute holding `count` zeroed values of `ty`. For structs,
    /// `count` is the number of instances.
    pub fn create_attribute(
        &mut self,
        record: CreatorRecord,
        name: &str,
        ty: AttributeType,
        usage: AttributeUsage,
        count: usize,
    ) -> Option<CreatorAttribute> {
        if count == 0 || self.get_attribute(record, name).is_some() {
            return None;
        }
        let node = self.record_node_mut(record)?;
        node.attributes.push(CreatorAttributeNode {
            name: name.to_string(),
            usage,
            values: AttributeValues::with_defaults(ty, count),
        });
        Some(CreatorAttribute {
            category: record.category,
            record: record.record,
            attribute: node.attributes.len() - 1,
        })
    }

    /// Adds member `member` of instance `index` of struct attribute `parent`.
    pub fn create_struct_member(
        &mut self,
        parent: CreatorAttribute,
        index: usize,
        member: &str,
        ty: AttributeType,
        usage: AttributeUsage,
        count: usize,
    ) -> Option<CreatorAttribute> {
        let node = self.attribute_node(parent)?;
        let AttributeValues::Struct(instances) = node.values else {
            return None;
        };
        if index >= instances as usize {
            return None;
        }
        let name = struct_member_name(&node.name, index, member);
        let record = CreatorRecord {
            category: parent.category,
            record: parent.record,
        };
        self.create_attribute(record, &name, ty, usage, count)
    }

    /// Number of categories.
    #[must_use]
    pub fn num_categories(&self) -> usize {
        self.categories.len()
    }

    /// Finds a category by name.
    #[must_use]
    pub fn get_category(&self, name: &str) -> Option<CreatorCategory> {
        self.categories.iter().position(|c| c.name == name).map(CreatorCategory)
    }

    /// Finds a record by name.
    #[must_use]
    pub fn get_record(&self, category: CreatorCategory, name: &str) -> Option<CreatorRecord> {
        let record = self.categories.get(category.0)?.records.iter().position(|r| r.name == name)?;
        Some(CreatorRecord {
            category: category.0,
            record,
        })
    }

    /// Finds an attribute by name.
    #[must_use]
    pub fn get_attribute(&self, record: CreatorRecord, name: &str) -> Option<CreatorAttribute> {
        let attribute = self.record_node(record)?.attributes.iter().position(|a| a.name == name)?;
        Some(CreatorAttribute {
            category: record.category,
            record: record.record,
            attribute,
        })
    }

    /// Values held, or struct instances.
    #[must_use]
    pub fn get_num_values(&self, attribute: CreatorAttribute) -> usize {
        self.attribute_node(attribute).map_or(0, |a| a.values.len())
    }

    /// Declared type.
    #[must_use]
    pub fn get_attribute_type(&self, attribute: CreatorAttribute) -> Option<AttributeType> {
        self.attribute_node(attribute).map(|a| a.values.attribute_type())
    }

    /// Changes the tool hint.
    pub fn set_usage(&mut self, attribute: CreatorAttribute, usage: AttributeUsage) -> bool {
        let Some(node) = self.attribute_node_mut(attribute) else {
            return false;
        };
        node.usage = usage;
        true
    }

    fn record_node(&self, record: CreatorRecord) -> Option<&CreatorRecordNode> {
        self.categories.get(record.category)?.records.get(record.record)
    }

    fn record_node_mut(&mut self, record: CreatorRecord) -> Option<&mut CreatorRecordNode> {
        self.categories.get_mut(record.category)?.records.get_mut(record.record)
    }

    fn attribute_node(&self, attribute: CreatorAttribute) -> Option<&CreatorAttributeNode> {
        self.categories
            .get(attribute.category)?
            .records
            .get(attribute.record)?
            .attributes
            .get(attribute.attribute)
    }

    fn attribute_node_mut(&mut self, attribute: CreatorAttribute) -> Option<&mut CreatorAttributeNode> {
        self.categories
            .get_mut(attribute.category)?
            .records
            .get_mut(attribute.record)?
            .attributes
            .get_mut(attribute.attribute)
    }

    /// Copies the graph into a read-only [`Database`] named `name`.
    #[must_use]
    pub fn to_database(&self, name: &str) -> Database {
        let mut db = Database::new(name);
        for category in &self.categories {
            let mut out_category = Category::new(category.name.as_str());
            for record in &category.records {
                let mut out_record = Record::new(record.name.as_str());
                for attribute in &record.attributes {
                    // Names were checked on creation
                    let _ = out_record.push_attribute(Attribute::new(
                        attribute.name.as_str(),
                        attribute.usage,
                        attribute.values.clone(),
                    ));
                }
                let _ = out_category.push_record(out_record);
            }
            let _ = db.push_category(out_category);
        }
        db
    }
}

macro_rules! creator_setter {
    ($(#[$doc:meta] $name:ident => $store:ident($ty:ty)),* $(,)?) => {
        impl CreatorDatabase {
            $(
                #[$doc]
                pub fn $name(&mut self, attribute: CreatorAttribute, index: usize, value: $ty) -> bool {
                    self.attribute_node_mut(attribute)
                        .is_some_and(|node| node.values.$store(index, value).is_ok())
                }
            )*
        }
    };
}

creator_setter! {
    /// Stores a bool.
    set_bool => set_bool(bool),
    /// Stores a float.
    set_float => set_float(f32),
    /// Stores an int32.
    set_int32 => set_int32(i32),
    /// Stores a Vector2.
    set_vector2 => set_vector2(Vector2),
    /// Stores a Vector3.
    set_vector3 => set_vector3(Vector3),
    /// Stores a Vector4.
    set_vector4 => set_vector4(Vector4),
    /// Stores a record link.
    set_record_link => set_record_link(RecordLink),
}

impl CreatorDatabase {
    /// Stores a narrow string.
    pub fn set_string(&mut self, attribute: CreatorAttribute, index: usize, value: &str) -> bool {
        self.attribute_node_mut(attribute)
            .is_some_and(|node| node.values.set_string(index, value.to_string()).is_ok())
    }

    /// Stores a wide string.
    pub fn set_wstring(&mut self, attribute: CreatorAttribute, index: usize, value: &str) -> bool {
        self.attribute_node_mut(attribute)
            .is_some_and(|node| node.values.set_wstring(index, value.to_string()).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_and_convert() {
        let mut creator = CreatorDatabase::new();
        let weapons = creator.create_category("Weapons").unwrap();
        let pistol = creator.create_record(weapons, "Pistol").unwrap();
        let damage = creator
            .create_attribute(pistol, "Damage", AttributeType::Float, AttributeUsage::Default, 1)
            .unwrap();
        assert!(creator.set_float(damage, 0, 2.5));
        assert!(creator.set_float(damage, 1, 3.5));
        assert_eq!(creator.get_num_values(damage), 2);

        let db = creator.to_database("Game");
        assert_eq!(db.name(), "Game");
        let path = db.find_path("Weapons", "Pistol", "Damage").unwrap();
        assert_eq!(db.attribute_at(path).unwrap().values(), &AttributeValues::Float(vec![2.5, 3.5]));
    }

    #[test]
    fn test_setters_reject_mismatch_and_gap() {
        let mut creator = CreatorDatabase::new();
        let cat = creator.create_category("C").unwrap();
        let rec = creator.create_record(cat, "R").unwrap();
        let attr = creator
            .create_attribute(rec, "Count", AttributeType::Int32, AttributeUsage::Default, 2)
            .unwrap();

        assert!(!creator.set_float(attr, 0, 1.0));
        assert!(!creator.set_string(attr, 0, "x"));
        assert!(!creator.set_int32(attr, 3, 1));
        assert!(creator.set_int32(attr, 1, 5));
    }

    #[test]
    fn test_duplicates_return_none() {
        let mut creator = CreatorDatabase::new();
        let cat = creator.create_category("C").unwrap();
        assert!(creator.create_category("C").is_none());
        let rec = creator.create_record(cat, "R").unwrap();
        assert!(creator.create_record(cat, "R").is_none());
        assert!(creator.create_attribute(rec, "A", AttributeType::Bool, AttributeUsage::Default, 1).is_some());
        assert!(creator.create_attribute(rec, "A", AttributeType::Bool, AttributeUsage::Default, 1).is_none());
        assert!(creator.create_attribute(rec, "B", AttributeType::Bool, AttributeUsage::Default, 0).is_none());
    }

    #[test]
    fn test_struct_members() {
        let mut creator = CreatorDatabase::new();
        let cat = creator.create_category("Characters").unwrap();
        let rec = creator.create_record(cat, "Hero").unwrap();
        let gear = creator
            .create_attribute(rec, "Gear", AttributeType::Struct, AttributeUsage::Default, 2)
            .unwrap();

        let slot = creator
            .create_struct_member(gear, 1, "Slot", AttributeType::String, AttributeUsage::Default, 1)
            .unwrap();
        assert!(creator.set_string(slot, 0, "head"));
        assert_eq!(creator.get_attribute(rec, "Gear.1.Slot"), Some(slot));
        assert!(creator
            .create_struct_member(gear, 2, "Slot", AttributeType::String, AttributeUsage::Default, 1)
            .is_none());
    }
}
