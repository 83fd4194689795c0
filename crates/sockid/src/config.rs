//! Cache configuration.

use std::ffi::OsString;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sockid_prefix::DEFAULT_PREFIX_FILE;

/// Environment variable overriding the prefix file location.
pub const PREFIX_FILE_ENV: &str = "UUID_PREFIX_FILE";

/// Where an [`IdentityCache`](crate::IdentityCache) reads its prefix from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Path of the prefix file written by the bootstrap step.
    #[serde(default = "default_source_location")]
    pub source_location: PathBuf,
}

fn default_source_location() -> PathBuf {
    PathBuf::from(DEFAULT_PREFIX_FILE)
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            source_location: default_source_location(),
        }
    }
}

impl CacheConfig {
    pub fn new(source_location: impl Into<PathBuf>) -> Self {
        Self {
            source_location: source_location.into(),
        }
    }

    /// Reads `UUID_PREFIX_FILE`, falling back to the default location when
    /// unset or empty.
    pub fn from_env() -> Self {
        Self::from_override(std::env::var_os(PREFIX_FILE_ENV))
    }

    fn from_override(value: Option<OsString>) -> Self {
        match value {
            Some(path) if !path.is_empty() => Self::new(path),
            _ => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_location() {
        let config = CacheConfig::default();
        assert_eq!(config.source_location, PathBuf::from("/var/local/uuid/prefix"));
    }

    #[test]
    fn override_location() {
        let config = CacheConfig::from_override(Some("/tmp/prefix".into()));
        assert_eq!(config.source_location, PathBuf::from("/tmp/prefix"));
    }

    #[test]
    fn empty_override_uses_default() {
        assert_eq!(
            CacheConfig::from_override(Some(OsString::new())),
            CacheConfig::default()
        );
        assert_eq!(CacheConfig::from_override(None), CacheConfig::default());
    }

    #[test]
    fn deserialize_missing_field_uses_default() {
        let config: CacheConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CacheConfig::default());
    }

    #[test]
    fn deserialize_source_location() {
        let config: CacheConfig =
            serde_json::from_str(r#"{"source_location":"/run/uuid/prefix"}"#).unwrap();
        assert_eq!(config.source_location, PathBuf::from("/run/uuid/prefix"));
    }
}
