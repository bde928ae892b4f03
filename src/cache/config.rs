//! Cache configuration.

use std::time::Duration;

use serde::Deserialize;

const DEFAULT_LIST_TTL_SECS: u64 = 60;

/// Response cache configuration from `folio.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable the list response cache. When disabled, reads go straight to
    /// the producer and invalidation is a no-op.
    pub enabled: bool,
    /// Time-to-live for cached list pages, in seconds. Zero disables expiry
    /// so entries live until invalidated.
    pub list_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            list_ttl_secs: DEFAULT_LIST_TTL_SECS,
        }
    }
}

impl CacheConfig {
    /// TTL applied to list entries; `None` means entries never expire.
    pub fn list_ttl(&self) -> Option<Duration> {
        if self.list_ttl_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.list_ttl_secs))
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            list_ttl_secs: settings.list_ttl_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = CacheConfig::default();
        assert!(config.enabled);
        assert_eq!(config.list_ttl_secs, 60);
        assert_eq!(config.list_ttl(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn zero_ttl_means_no_expiry() {
        let config = CacheConfig {
            list_ttl_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.list_ttl(), None);
    }
}
