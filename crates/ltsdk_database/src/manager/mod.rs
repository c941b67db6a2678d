//! # Database Manager
//!
//! Owns every loaded database and hands out handles into them.
//!
//! ## Lifetimes
//!
//! - Packed and converted databases are shared by name: opening a name that
//!   is already loaded returns the same handle and bumps its reference count.
//! - Unpacked databases are never shared. Each open makes a new instance.
//! - [`DatabaseMgr::release_database`] drops one reference; the database is
//!   destroyed at zero and all handles into it go stale.
//!
//! The manager is single-threaded. Guard it with a
//! `ltsdk_platform::CriticalSection` to share it across threads.

mod handles;
mod query;
mod values;

use std::collections::HashMap;

use ltsdk_platform::{InStream, OutStream};

use crate::config::{DatabaseMgrConfig, Endian};
use crate::converter::{ByteOrder, NullConverter, OutConverter, SwapConverter};
use crate::creator::CreatorDatabase;
use crate::database::Database;
use crate::error::{DatabaseError, DatabaseResult};
use crate::packed::{load_packed, save_packed};
use crate::unpacked::load_unpacked;

pub use handles::{AttributeHandle, CategoryHandle, DatabaseHandle, RecordHandle};

#[derive(Debug)]
struct LoadedDatabase {
    db: Database,
    ref_count: u32,
    /// Registered by name and shared between opens.
    shared: bool,
}

#[derive(Debug, Default)]
struct DatabaseSlot {
    generation: u32,
    entry: Option<LoadedDatabase>,
}

/// Loads, shares and queries databases.
///
/// # Example
///
/// ```rust
/// use ltsdk_database::{AttributeType, AttributeUsage, CreatorDatabase, DatabaseMgr, DatabaseMgrConfig};
///
/// let mut creator = CreatorDatabase::new();
/// let weapons = creator.create_category("Weapons").unwrap();
/// let pistol = creator.create_record(weapons, "Pistol").unwrap();
/// let damage = creator
///     .create_attribute(pistol, "Damage", AttributeType::Float, AttributeUsage::Default, 1)
///     .unwrap();
/// creator.set_float(damage, 0, 2.5);
///
/// let mut mgr = DatabaseMgr::with_config(DatabaseMgrConfig::lenient());
/// let db = mgr.convert_database(&creator, "Game");
/// let attr = mgr.get_attribute_path(db, "Weapons", "Pistol", "Damage");
/// assert_eq!(mgr.get_float(attr, 0, 0.0), 2.5);
/// assert_eq!(mgr.get_int32(attr, 0, 7), 7);
/// ```
#[derive(Debug, Default)]
pub struct DatabaseMgr {
    config: DatabaseMgrConfig,
    slots: Vec<DatabaseSlot>,
    free_slots: Vec<u32>,
    by_name: HashMap<String, u32>,
}

impl DatabaseMgr {
    /// Creates a manager with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a manager with `config`.
    #[must_use]
    pub fn with_config(config: DatabaseMgrConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Active settings.
    #[must_use]
    pub const fn config(&self) -> &DatabaseMgrConfig {
        &self.config
    }

    /// Number of databases currently loaded.
    #[must_use]
    pub fn num_open_databases(&self) -> usize {
        self.slots.iter().filter(|s| s.entry.is_some()).count()
    }

    fn insert(&mut self, db: Database, shared: bool) -> DatabaseHandle {
        let entry = LoadedDatabase {
            db,
            ref_count: 1,
            shared,
        };
        let slot = if let Some(slot) = self.free_slots.pop() {
            self.slots[slot as usize].entry = Some(entry);
            slot
        } else {
            self.slots.push(DatabaseSlot {
                generation: 0,
                entry: Some(entry),
            });
            (self.slots.len() - 1) as u32
        };
        DatabaseHandle {
            slot,
            generation: self.slots[slot as usize].generation,
        }
    }

    fn entry(&self, handle: DatabaseHandle) -> Option<&LoadedDatabase> {
        let slot = self.slots.get(handle.slot as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.entry.as_ref()
    }

    fn entry_mut(&mut self, handle: DatabaseHandle) -> Option<&mut LoadedDatabase> {
        let slot = self.slots.get_mut(handle.slot as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.entry.as_mut()
    }

    fn shared_handle(&self, name: &str) -> Option<DatabaseHandle> {
        let slot = *self.by_name.get(name)?;
        Some(DatabaseHandle {
            slot,
            generation: self.slots.get(slot as usize)?.generation,
        })
    }

    /// Read-only view of an open database.
    #[must_use]
    pub fn database(&self, handle: DatabaseHandle) -> Option<&Database> {
        self.entry(handle).map(|e| &e.db)
    }

    /// True if `handle` refers to an open database.
    #[must_use]
    pub fn is_valid(&self, handle: DatabaseHandle) -> bool {
        self.entry(handle).is_some()
    }

    /// Outstanding references, zero for a stale handle.
    #[must_use]
    pub fn reference_count(&self, handle: DatabaseHandle) -> u32 {
        self.entry(handle).map_or(0, |e| e.ref_count)
    }

    /// Returns a new reference to the shared database called `name`.
    ///
    /// Never loads anything; unknown names return `None`.
    pub fn open_existing_database(&mut self, name: &str) -> Option<DatabaseHandle> {
        let handle = self.shared_handle(name)?;
        let entry = self.entry_mut(handle)?;
        entry.ref_count += 1;
        tracing::debug!("opened existing database {} (refs {})", name, entry.ref_count);
        Some(handle)
    }

    /// Loads a packed database from `stream` and registers it as `name`.
    ///
    /// If `name` is already loaded the stream is not touched and the existing
    /// database gains a reference.
    pub fn open_new_database(&mut self, name: &str, stream: &mut dyn InStream) -> DatabaseResult<DatabaseHandle> {
        if let Some(handle) = self.open_existing_database(name) {
            return Ok(handle);
        }
        let db = load_packed(name, stream).map_err(|err| {
            tracing::warn!("failed to load database {}: {}", name, err);
            err
        })?;
        tracing::info!(
            "loaded database {} ({} categories, {} attributes)",
            name,
            db.num_categories(),
            db.total_attributes()
        );
        let handle = self.insert(db, true);
        self.by_name.insert(name.to_string(), handle.slot);
        Ok(handle)
    }

    /// Loads an unpacked database from its data and constraints documents.
    ///
    /// Every call makes an independent instance, even for identical input.
    /// Unpacked databases are not registered by name.
    pub fn open_unpacked_database(
        &mut self,
        data: &mut dyn InStream,
        constraints: &mut dyn InStream,
    ) -> DatabaseResult<DatabaseHandle> {
        let db = load_unpacked(data, constraints).map_err(|err| {
            tracing::warn!("failed to load unpacked database: {}", err);
            err
        })?;
        tracing::info!("loaded unpacked database {}", db.name());
        Ok(self.insert(db, false))
    }

    /// Drops one reference. Returns false for a stale handle.
    pub fn release_database(&mut self, handle: DatabaseHandle) -> bool {
        debug_assert!(self.is_valid(handle), "release of a database handle that is not open");
        let Some(entry) = self.entry_mut(handle) else {
            return false;
        };
        entry.ref_count -= 1;
        if entry.ref_count > 0 {
            return true;
        }

        let slot = &mut self.slots[handle.slot as usize];
        if let Some(entry) = slot.entry.take() {
            if entry.shared {
                self.by_name.remove(entry.db.name());
            }
            tracing::info!("released database {}", entry.db.name());
        }
        slot.generation = slot.generation.wrapping_add(1);
        self.free_slots.push(handle.slot);
        true
    }

    /// Starts a new creator graph.
    #[must_use]
    pub fn create_new_database(&self) -> CreatorDatabase {
        CreatorDatabase::new()
    }

    /// Converts `creator` into a shared read-only database called `name`.
    ///
    /// If `name` is already loaded, that instance gains a reference instead.
    pub fn convert_database(&mut self, creator: &CreatorDatabase, name: &str) -> DatabaseHandle {
        if let Some(handle) = self.open_existing_database(name) {
            return handle;
        }
        let db = creator.to_database(name);
        tracing::info!("converted creator graph into database {}", name);
        let handle = self.insert(db, true);
        self.by_name.insert(name.to_string(), handle.slot);
        handle
    }

    /// Writes `creator` in packed form through `converter`.
    pub fn save_database<C: ByteOrder>(
        &self,
        creator: &CreatorDatabase,
        converter: &mut OutConverter<'_, C>,
    ) -> DatabaseResult<()> {
        let db = creator.to_database("");
        save_packed(&db, converter)?;
        tracing::info!(
            "saved database ({} categories, {:?} byte order)",
            db.num_categories(),
            converter.endian()
        );
        Ok(())
    }

    /// Writes `creator` to `stream` in the configured byte order.
    pub fn save_database_to(&self, creator: &CreatorDatabase, stream: &mut dyn OutStream) -> DatabaseResult<()> {
        match self.config.save_endian {
            Endian::Native => self.save_database(creator, &mut OutConverter::<NullConverter>::new(stream)),
            Endian::Swapped => self.save_database(creator, &mut OutConverter::<SwapConverter>::new(stream)),
        }
    }

    /// Exchanges attribute values between two open databases.
    ///
    /// Every attribute path of `a` must exist in `b` with the same type,
    /// otherwise nothing changes and this returns false. Swapping the same
    /// pair twice restores both.
    pub fn swap_database_values(&mut self, a: DatabaseHandle, b: DatabaseHandle) -> bool {
        if a == b {
            return self.is_valid(a);
        }
        if !self.is_valid(a) || !self.is_valid(b) {
            return false;
        }

        let (low, high) = (a.slot.min(b.slot) as usize, a.slot.max(b.slot) as usize);
        let (head, tail) = self.slots.split_at_mut(high);
        let (low_entry, high_entry) = (head[low].entry.as_mut(), tail[0].entry.as_mut());
        let (Some(low_entry), Some(high_entry)) = (low_entry, high_entry) else {
            return false;
        };
        let (first, second) = if a.slot < b.slot {
            (low_entry, high_entry)
        } else {
            (high_entry, low_entry)
        };

        match first.db.swap_values(&mut second.db) {
            Ok(count) => {
                tracing::debug!("swapped {} attribute values between {} and {}", count, first.db.name(), second.db.name());
                true
            }
            Err(err) => {
                tracing::warn!("cannot swap {} with {}: {}", first.db.name(), second.db.name(), err);
                false
            }
        }
    }

    fn resolve_db(&self, handle: Option<DatabaseHandle>) -> DatabaseResult<&Database> {
        handle.and_then(|h| self.database(h)).ok_or(DatabaseError::InvalidHandle)
    }
}
