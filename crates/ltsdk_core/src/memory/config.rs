//! Bank configuration.

use serde::{Deserialize, Serialize};

/// Slots per page when no size is given.
pub const DEFAULT_CACHE_SIZE: usize = 32;

/// Page sizing for [`ObjectBank`](super::ObjectBank) and
/// [`StructBank`](super::StructBank).
///
/// ```toml
/// cache_size = 64
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankConfig {
    /// Slots added each time the free list runs dry.
    pub cache_size: usize,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            cache_size: DEFAULT_CACHE_SIZE,
        }
    }
}

impl BankConfig {
    /// Creates a config with the given page size. Zero is raised to one.
    #[must_use]
    pub const fn new(cache_size: usize) -> Self {
        Self {
            cache_size: if cache_size == 0 { 1 } else { cache_size },
        }
    }

    /// Parses a config from TOML. Missing keys take their defaults.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        let config: Self = toml::from_str(text)?;
        Ok(Self::new(config.cache_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml() {
        assert_eq!(BankConfig::from_toml("cache_size = 8").unwrap().cache_size, 8);
        assert_eq!(BankConfig::from_toml("").unwrap(), BankConfig::default());
        assert_eq!(BankConfig::from_toml("cache_size = 0").unwrap().cache_size, 1);
        assert!(BankConfig::from_toml("cache_size = \"big\"").is_err());
    }
}
