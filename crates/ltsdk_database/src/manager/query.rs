//! Navigation: names, counts and lookups by name or index.
//!
//! Every function accepts `Option`-wrapped handles so lookups chain without
//! unwrapping; a `None` anywhere in the chain just yields `None` or zero.

use super::{AttributeHandle, CategoryHandle, DatabaseHandle, DatabaseMgr, RecordHandle};
use crate::database::{Attribute, Category, Record};
use crate::error::{DatabaseError, DatabaseResult};
use crate::types::{struct_member_name, AttributeType, AttributeUsage, AttributeValues};

impl DatabaseMgr {
    pub(crate) fn resolve_category(&self, handle: Option<CategoryHandle>) -> DatabaseResult<&Category> {
        let handle = handle.ok_or(DatabaseError::InvalidHandle)?;
        self.resolve_db(Some(handle.db))?
            .category(handle.category as usize)
            .ok_or(DatabaseError::InvalidHandle)
    }

    pub(crate) fn resolve_record(&self, handle: Option<RecordHandle>) -> DatabaseResult<&Record> {
        let handle = handle.ok_or(DatabaseError::InvalidHandle)?;
        self.resolve_category(Some(handle.category()))?
            .record(handle.record as usize)
            .ok_or(DatabaseError::InvalidHandle)
    }

    pub(crate) fn resolve_attribute(&self, handle: Option<AttributeHandle>) -> DatabaseResult<&Attribute> {
        let handle = handle.ok_or(DatabaseError::InvalidHandle)?;
        self.resolve_record(Some(handle.record()))?
            .attribute(handle.attribute as usize)
            .ok_or(DatabaseError::InvalidHandle)
    }

    /// Name the database was opened or converted under.
    #[must_use]
    pub fn get_database_name(&self, db: impl Into<Option<DatabaseHandle>>) -> Option<&str> {
        self.resolve_db(db.into()).ok().map(|db| db.name())
    }

    /// Number of categories.
    #[must_use]
    pub fn get_num_categories(&self, db: impl Into<Option<DatabaseHandle>>) -> usize {
        self.resolve_db(db.into()).map_or(0, |db| db.num_categories())
    }

    /// Category at `index`.
    #[must_use]
    pub fn get_category_by_index(&self, db: impl Into<Option<DatabaseHandle>>, index: usize) -> Option<CategoryHandle> {
        let db = db.into()?;
        (index < self.get_num_categories(db)).then(|| CategoryHandle {
            db,
            category: index as u32,
        })
    }

    /// Category called `name`.
    #[must_use]
    pub fn get_category(&self, db: impl Into<Option<DatabaseHandle>>, name: &str) -> Option<CategoryHandle> {
        let db = db.into()?;
        let category = self.resolve_db(Some(db)).ok()?.find_category(name)?;
        Some(CategoryHandle {
            db,
            category: category as u32,
        })
    }

    /// Category name.
    #[must_use]
    pub fn get_category_name(&self, category: impl Into<Option<CategoryHandle>>) -> Option<&str> {
        self.resolve_category(category.into()).ok().map(Category::name)
    }

    /// Database holding the category.
    #[must_use]
    pub fn get_category_parent(&self, category: impl Into<Option<CategoryHandle>>) -> Option<DatabaseHandle> {
        let category = category.into()?;
        self.resolve_category(Some(category)).ok().map(|_| category.db)
    }

    /// Number of records in the category.
    #[must_use]
    pub fn get_num_records(&self, category: impl Into<Option<CategoryHandle>>) -> usize {
        self.resolve_category(category.into()).map_or(0, Category::num_records)
    }

    /// Record at `index`.
    #[must_use]
    pub fn get_record_by_index(&self, category: impl Into<Option<CategoryHandle>>, index: usize) -> Option<RecordHandle> {
        let category = category.into()?;
        (index < self.get_num_records(category)).then(|| RecordHandle {
            db: category.db,
            category: category.category,
            record: index as u32,
        })
    }

    /// Record called `name`.
    #[must_use]
    pub fn get_record(&self, category: impl Into<Option<CategoryHandle>>, name: &str) -> Option<RecordHandle> {
        let category = category.into()?;
        let record = self.resolve_category(Some(category)).ok()?.find_record(name)?;
        Some(RecordHandle {
            db: category.db,
            category: category.category,
            record: record as u32,
        })
    }

    /// Record `record` of category `category`.
    #[must_use]
    pub fn get_record_in_database(
        &self,
        db: impl Into<Option<DatabaseHandle>>,
        category: &str,
        record: &str,
    ) -> Option<RecordHandle> {
        self.get_record(self.get_category(db, category), record)
    }

    /// Record name.
    #[must_use]
    pub fn get_record_name(&self, record: impl Into<Option<RecordHandle>>) -> Option<&str> {
        self.resolve_record(record.into()).ok().map(Record::name)
    }

    /// Category holding the record.
    #[must_use]
    pub fn get_record_parent(&self, record: impl Into<Option<RecordHandle>>) -> Option<CategoryHandle> {
        let record = record.into()?;
        self.resolve_record(Some(record)).ok().map(|_| record.category())
    }

    /// Number of attributes on the record.
    #[must_use]
    pub fn get_num_attributes(&self, record: impl Into<Option<RecordHandle>>) -> usize {
        self.resolve_record(record.into()).map_or(0, Record::num_attributes)
    }

    /// Attribute at `index`.
    #[must_use]
    pub fn get_attribute_by_index(&self, record: impl Into<Option<RecordHandle>>, index: usize) -> Option<AttributeHandle> {
        let record = record.into()?;
        (index < self.get_num_attributes(record)).then(|| AttributeHandle {
            db: record.db,
            category: record.category,
            record: record.record,
            attribute: index as u32,
        })
    }

    /// Attribute called `name`.
    #[must_use]
    pub fn get_attribute(&self, record: impl Into<Option<RecordHandle>>, name: &str) -> Option<AttributeHandle> {
        let record = record.into()?;
        let attribute = self.resolve_record(Some(record)).ok()?.find_attribute(name)?;
        Some(AttributeHandle {
            db: record.db,
            category: record.category,
            record: record.record,
            attribute: attribute as u32,
        })
    }

    /// Attribute by its full category/record/attribute path.
    #[must_use]
    pub fn get_attribute_path(
        &self,
        db: impl Into<Option<DatabaseHandle>>,
        category: &str,
        record: &str,
        attribute: &str,
    ) -> Option<AttributeHandle> {
        self.get_attribute(self.get_record_in_database(db, category, record), attribute)
    }

    /// Attribute name.
    #[must_use]
    pub fn get_attribute_name(&self, attribute: impl Into<Option<AttributeHandle>>) -> Option<&str> {
        self.resolve_attribute(attribute.into()).ok().map(Attribute::name)
    }

    /// Stored type.
    #[must_use]
    pub fn get_attribute_type(&self, attribute: impl Into<Option<AttributeHandle>>) -> Option<AttributeType> {
        self.resolve_attribute(attribute.into()).ok().map(Attribute::attribute_type)
    }

    /// Tool hint.
    #[must_use]
    pub fn get_attribute_usage(&self, attribute: impl Into<Option<AttributeHandle>>) -> Option<AttributeUsage> {
        self.resolve_attribute(attribute.into()).ok().map(Attribute::usage)
    }

    /// Values stored, or struct instances. Zero for a bad handle.
    #[must_use]
    pub fn get_num_values(&self, attribute: impl Into<Option<AttributeHandle>>) -> usize {
        self.resolve_attribute(attribute.into()).map_or(0, |a| a.values().len())
    }

    /// Record holding the attribute.
    #[must_use]
    pub fn get_attribute_parent(&self, attribute: impl Into<Option<AttributeHandle>>) -> Option<RecordHandle> {
        let attribute = attribute.into()?;
        self.resolve_attribute(Some(attribute)).ok().map(|_| attribute.record())
    }

    /// Member `member` of instance `index` of a struct attribute.
    #[must_use]
    pub fn get_struct_attribute(
        &self,
        attribute: impl Into<Option<AttributeHandle>>,
        index: usize,
        member: &str,
    ) -> Option<AttributeHandle> {
        let attribute = attribute.into()?;
        let resolved = self.resolve_attribute(Some(attribute)).ok()?;
        let AttributeValues::Struct(instances) = resolved.values() else {
            return None;
        };
        if index >= *instances as usize {
            return None;
        }
        self.get_attribute(attribute.record(), &struct_member_name(resolved.name(), index, member))
    }
}
