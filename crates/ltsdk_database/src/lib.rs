//! # LTSDK Database
//!
//! Attributed game data: databases of categories, categories of records,
//! records of typed attributes. Each attribute holds one or more values of a
//! single [`AttributeType`].
//!
//! ## Reading
//!
//! Game code opens databases through a [`DatabaseMgr`] and navigates with
//! copyable handles. Value getters take a default and return it on any miss
//! (null handle, wrong type, index out of range), so a broken data file
//! never takes down a running game. The `try_` variants report why.
//!
//! Building with the `strict` feature turns those misses into panics for
//! test and CI runs. A config that sets `strict` explicitly overrides the
//! feature either way.
//!
//! ```rust
//! use ltsdk_database::{AttributeType, AttributeUsage, CreatorDatabase, DatabaseMgr, DatabaseMgrConfig};
//! use ltsdk_platform::MemoryOutStream;
//!
//! let mut creator = CreatorDatabase::new();
//! let weapons = creator.create_category("Weapons").unwrap();
//! let rifle = creator.create_record(weapons, "Rifle").unwrap();
//! let damage = creator
//!     .create_attribute(rifle, "Damage", AttributeType::Int32, AttributeUsage::Default, 1)
//!     .unwrap();
//! creator.set_int32(damage, 0, 40);
//!
//! let mut mgr = DatabaseMgr::with_config(DatabaseMgrConfig::lenient());
//! let mut out = MemoryOutStream::new();
//! mgr.save_database_to(&creator, &mut out).unwrap();
//!
//! let db = mgr.open_new_database("weapons", &mut out.into_in_stream()).unwrap();
//! let attr = mgr.get_attribute_path(db, "Weapons", "Rifle", "Damage");
//! assert_eq!(mgr.get_int32(attr, 0, 0), 40);
//! assert_eq!(mgr.get_float(attr, 0, -1.0), -1.0);
//! ```
//!
//! ## Writing
//!
//! Tools author data with a [`CreatorDatabase`] and save it in the packed
//! binary format, in native or swapped byte order. Loading detects the
//! order from the header. Designers can also hand-edit the unpacked TOML
//! form, validated against a constraints document.
//!
//! ## Strings
//!
//! [`StringKeeper`] holds localized text and voice-over paths by numeric id.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod converter;
pub mod creator;
pub mod database;
pub mod error;
pub mod manager;
pub mod packed;
pub mod string_keeper;
pub mod types;
pub mod unpacked;

pub use config::{DatabaseMgrConfig, Endian};
pub use converter::{
    ByteOrder, Convert, InConverter, NullConverter, OutConverter, Primitive, PrimitiveSink, PrimitiveSource,
    SwapConverter,
};
pub use creator::{CreatorAttribute, CreatorCategory, CreatorDatabase, CreatorRecord};
pub use database::{Attribute, Category, Database, Record};
pub use error::{DatabaseError, DatabaseResult};
pub use manager::{AttributeHandle, CategoryHandle, DatabaseHandle, DatabaseMgr, RecordHandle};
pub use string_keeper::{StringKeeper, StringKeeperWriter};
pub use types::{struct_member_name, AttributeType, AttributeUsage, AttributeValues, RecordLink};
