//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::error::{CacheError, Result};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Nominal cache capacity; the byte budget defaults to half of it
    pub capacity: usize,
    /// Total payload bytes the cache may hold, None = capacity / 2
    pub max_payload_bytes: Option<u64>,
    /// Default sliding TTL in seconds, 0 = no expiry
    pub default_ttl: u64,
    /// Directory files are served from
    pub file_root: PathBuf,
    /// HTTP server port
    pub server_port: u16,
    /// Background expiry sweep interval in seconds, 0 = disabled
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Nominal cache capacity (default: 1000)
    /// - `CACHE_MAX_PAYLOAD_BYTES` - Byte budget (default: capacity / 2)
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: 0, no expiry)
    /// - `FILE_ROOT` - Directory to serve files from (default: ".")
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 1)
    ///
    /// Unparsable values fall back to the default; negative numbers are
    /// rejected.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            capacity: non_negative("CACHE_CAPACITY")?
                .map(|v| v as usize)
                .unwrap_or(defaults.capacity),
            max_payload_bytes: non_negative("CACHE_MAX_PAYLOAD_BYTES")?,
            default_ttl: non_negative("CACHE_DEFAULT_TTL")?.unwrap_or(defaults.default_ttl),
            file_root: env::var("FILE_ROOT")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.file_root),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            cleanup_interval: non_negative("CLEANUP_INTERVAL")?
                .unwrap_or(defaults.cleanup_interval),
        })
    }

    /// Cache construction parameters derived from this configuration.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            capacity: self.capacity,
            max_payload_bytes: self.max_payload_bytes,
            default_ttl: Duration::from_secs(self.default_ttl),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1000,
            max_payload_bytes: None,
            default_ttl: 0,
            file_root: PathBuf::from("."),
            server_port: 3000,
            cleanup_interval: 1,
        }
    }
}

/// Reads a numeric variable, rejecting negatives and ignoring garbage.
fn non_negative(name: &str) -> Result<Option<u64>> {
    let Some(raw) = env::var(name).ok() else {
        return Ok(None);
    };
    match raw.trim().parse::<i64>() {
        Ok(v) if v < 0 => Err(CacheError::InvalidArgument(format!(
            "{} must not be negative, got {}",
            name, v
        ))),
        Ok(v) => Ok(Some(v as u64)),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.capacity, 1000);
        assert_eq!(config.max_payload_bytes, None);
        assert_eq!(config.default_ttl, 0);
        assert_eq!(config.file_root, PathBuf::from("."));
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 1);
    }

    #[test]
    fn test_cache_config_derives_budget() {
        let config = Config::default();
        let cache_config = config.cache_config();
        assert_eq!(cache_config.max_payload_bytes(), 500);
        assert_eq!(cache_config.default_ttl, Duration::ZERO);

        let config = Config {
            max_payload_bytes: Some(64),
            default_ttl: 30,
            ..Config::default()
        };
        let cache_config = config.cache_config();
        assert_eq!(cache_config.max_payload_bytes(), 64);
        assert_eq!(cache_config.default_ttl, Duration::from_secs(30));
    }

    // Env-mutating checks live in one test so they never race each other
    #[test]
    fn test_config_from_env() {
        env::remove_var("CACHE_CAPACITY");
        env::remove_var("CACHE_MAX_PAYLOAD_BYTES");
        env::remove_var("CACHE_DEFAULT_TTL");
        env::remove_var("FILE_ROOT");
        env::remove_var("SERVER_PORT");
        env::remove_var("CLEANUP_INTERVAL");

        let config = Config::from_env().unwrap();
        assert_eq!(config.capacity, 1000);
        assert_eq!(config.max_payload_bytes, None);
        assert_eq!(config.server_port, 3000);

        env::set_var("CACHE_CAPACITY", "not-a-number");
        env::set_var("CACHE_MAX_PAYLOAD_BYTES", "2048");
        let config = Config::from_env().unwrap();
        assert_eq!(config.capacity, 1000);
        assert_eq!(config.max_payload_bytes, Some(2048));

        env::set_var("CACHE_CAPACITY", "-5");
        assert!(matches!(
            Config::from_env(),
            Err(CacheError::InvalidArgument(_))
        ));

        env::remove_var("CACHE_CAPACITY");
        env::remove_var("CACHE_MAX_PAYLOAD_BYTES");
    }
}
