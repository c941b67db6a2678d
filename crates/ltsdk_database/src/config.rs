//! # Database Manager Configuration
//!
//! ```toml
//! strict = true
//! save_endian = "swapped"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::DatabaseResult;

/// Byte order used when saving packed databases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endian {
    /// Host byte order, written through the passthrough converter.
    #[default]
    Native,
    /// Opposite of host byte order, written through the swapping converter.
    Swapped,
}

/// Settings for a [`DatabaseMgr`](crate::DatabaseMgr).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseMgrConfig {
    /// Panic instead of returning the default on a failed read.
    ///
    /// Unset follows the `strict` cargo feature; an explicit value wins.
    pub strict: Option<bool>,
    /// Byte order for [`DatabaseMgr::save_database_to`](crate::DatabaseMgr::save_database_to).
    pub save_endian: Endian,
}

impl DatabaseMgrConfig {
    /// Parses a config from TOML. Missing keys take their defaults.
    pub fn from_toml(text: &str) -> DatabaseResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Default-on-miss reads even in builds with the `strict` feature.
    #[must_use]
    pub const fn lenient() -> Self {
        Self {
            strict: Some(false),
            save_endian: Endian::Native,
        }
    }

    /// Sets the miss policy explicitly.
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }

    /// True if misses panic. An explicit setting wins over the `strict`
    /// feature.
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        match self.strict {
            Some(strict) => strict,
            None => cfg!(feature = "strict"),
        }
    }
}
