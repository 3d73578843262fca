//! Wire types for the agent HTTP API and the client that speaks it.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QueryRequest {
    pub query: String,
    pub use_cache: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct QueryResponse {
    pub query: String,
    pub response: String,
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchQueryRequest {
    pub queries: Vec<String>,
    pub use_cache: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchQueryResponse {
    pub results: Vec<QueryResponse>,
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// Counters reported by the backend-owned response cache.
///
/// Older backends only report `size` plus a description of the storage, so
/// every counter defaults to zero.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct CacheStats {
    #[serde(default)]
    pub hits: u64,
    #[serde(default)]
    pub misses: u64,
    #[serde(default)]
    pub size: u64,
    #[serde(default, rename = "type")]
    pub backend: Option<String>,
    #[serde(default)]
    pub max_size: Option<u64>,
    #[serde(default)]
    pub size_limit_mb: Option<u64>,
}

impl CacheStats {
    /// Hit rate as a percentage; 0 when nothing has been looked up yet.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 * 100.0 / lookups as f64
        }
    }

    /// One line per counter, as shown in the sidebar and by `tubechat stats`.
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("Hits: {}", self.hits),
            format!("Misses: {}", self.misses),
            format!("Size: {}", self.size),
            format!("Hit rate: {:.1}%", self.hit_rate()),
        ]
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CacheClearResponse {
    pub message: String,
}
