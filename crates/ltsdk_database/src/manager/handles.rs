//! Handles into databases owned by a [`DatabaseMgr`](crate::DatabaseMgr).
//!
//! All handles are plain `Copy` values. They borrow from the manager rather
//! than own anything: once the database is released, every handle into it
//! fails the generation check and reads fall back to their defaults.

/// An open database.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DatabaseHandle {
    pub(crate) slot: u32,
    pub(crate) generation: u32,
}

/// A category of an open database.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CategoryHandle {
    pub(crate) db: DatabaseHandle,
    pub(crate) category: u32,
}

/// A record of an open database.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RecordHandle {
    pub(crate) db: DatabaseHandle,
    pub(crate) category: u32,
    pub(crate) record: u32,
}

/// An attribute of an open database.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AttributeHandle {
    pub(crate) db: DatabaseHandle,
    pub(crate) category: u32,
    pub(crate) record: u32,
    pub(crate) attribute: u32,
}

impl CategoryHandle {
    /// Owning database.
    #[must_use]
    pub const fn database(self) -> DatabaseHandle {
        self.db
    }

    /// Position within the database.
    #[must_use]
    pub const fn index(self) -> usize {
        self.category as usize
    }
}

impl RecordHandle {
    /// Owning database.
    #[must_use]
    pub const fn database(self) -> DatabaseHandle {
        self.db
    }

    /// Owning category.
    #[must_use]
    pub const fn category(self) -> CategoryHandle {
        CategoryHandle {
            db: self.db,
            category: self.category,
        }
    }

    /// Position within the category.
    #[must_use]
    pub const fn index(self) -> usize {
        self.record as usize
    }
}

impl AttributeHandle {
    /// Owning database.
    #[must_use]
    pub const fn database(self) -> DatabaseHandle {
        self.db
    }

    /// Owning record.
    #[must_use]
    pub const fn record(self) -> RecordHandle {
        RecordHandle {
            db: self.db,
            category: self.category,
            record: self.record,
        }
    }

    /// Position within the record.
    #[must_use]
    pub const fn index(self) -> usize {
        self.attribute as usize
    }

    pub(crate) const fn path(self) -> (usize, usize, usize) {
        (self.category as usize, self.record as usize, self.attribute as usize)
    }
}
