//! Response DTOs for the file cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for evicting one file (DELETE /files/*path)
#[derive(Debug, Clone, Serialize)]
pub struct EvictResponse {
    /// The requested path
    pub path: String,
    /// Whether a cached copy existed
    pub removed: bool,
    /// Payload bytes released by the eviction
    pub bytes_released: u64,
}

impl EvictResponse {
    pub fn new(path: impl Into<String>, bytes_released: Option<u64>) -> Self {
        Self {
            path: path.into(),
            removed: bytes_released.is_some(),
            bytes_released: bytes_released.unwrap_or(0),
        }
    }
}

/// Response body for clearing the cache (DELETE /cache)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
    /// Number of entries dropped
    pub dropped: usize,
}

impl ClearResponse {
    pub fn new(dropped: usize) -> Self {
        Self {
            message: format!("Cache cleared, {} entries dropped", dropped),
            dropped,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of LFU evictions
    pub evictions: u64,
    /// Number of entries dropped by TTL expiry
    pub expirations: u64,
    /// Current number of cached files
    pub total_entries: usize,
    /// Payload bytes currently held
    pub used_bytes: u64,
    /// Byte budget of the cache
    pub max_payload_bytes: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(stats: &CacheStats, max_payload_bytes: u64) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            used_bytes: stats.used_bytes,
            max_payload_bytes,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evict_response_serialize() {
        let resp = EvictResponse::new("docs/a.txt", Some(12));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["path"], "docs/a.txt");
        assert_eq!(json["removed"], true);
        assert_eq!(json["bytes_released"], 12);

        let resp = EvictResponse::new("absent", None);
        assert!(!resp.removed);
        assert_eq!(resp.bytes_released, 0);
    }

    #[test]
    fn test_clear_response_serialize() {
        let resp = ClearResponse::new(3);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"dropped\":3"));
        assert!(json.contains("cleared"));
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            evictions: 5,
            expirations: 1,
            total_entries: 10,
            used_bytes: 400,
        };
        let resp = StatsResponse::new(&stats, 500);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.max_payload_bytes, 500);
        assert_eq!(resp.used_bytes, 400);
    }

    #[test]
    fn test_stats_response_zero_requests() {
        let resp = StatsResponse::new(&CacheStats::default(), 0);
        assert_eq!(resp.hit_rate, 0.0);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
