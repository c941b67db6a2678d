//! # Database Error Types
//!
//! Everything that can go wrong loading, saving or querying a database.
//! Read accessors swallow these and return the caller's default; the `try_`
//! accessors and the load/save paths surface them.

use ltsdk_platform::StreamError;
use thiserror::Error;

use crate::types::AttributeType;

/// Errors raised by the database subsystem.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Handle is null, stale or belongs to a released database.
    #[error("invalid or released handle")]
    InvalidHandle,

    /// Value index past the end of the attribute's values.
    #[error("value index {index} out of range ({count} values)")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Values stored.
        count: usize,
    },

    /// Stored type differs from the requested type.
    #[error("type mismatch: requested {requested}, stored {stored}")]
    TypeMismatch {
        /// Type the caller asked for.
        requested: AttributeType,
        /// Type the attribute holds.
        stored: AttributeType,
    },

    /// Named category, record, attribute or database does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Two siblings share a name.
    #[error("duplicate name: {0}")]
    DuplicateName(String),

    /// Stream does not start with the expected magic.
    #[error("invalid magic {0:?}")]
    InvalidMagic([u8; 4]),

    /// File version not understood in either byte order.
    #[error("unsupported version {0:#010x}")]
    UnsupportedVersion(u32),

    /// Structurally invalid file contents.
    #[error("corrupt data: {0}")]
    Corrupt(String),

    /// Underlying stream failure.
    #[error("stream error: {0}")]
    Stream(#[from] StreamError),

    /// Unpacked document is not valid TOML.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Unpacked data does not match its constraints document.
    #[error("schema violation: {0}")]
    Schema(String),
}

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
