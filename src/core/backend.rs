use async_trait::async_trait;

use crate::api::{ApiClient, ApiError, CacheClearResponse, CacheStats, HealthResponse};

/// The operations the interactive client needs from the agent server.
///
/// [`ApiClient`] is the real implementation; tests plug in scripted ones.
#[async_trait]
pub trait AgentBackend: Send + Sync {
    /// Runs a query and returns the agent's reply text.
    async fn query(&self, query: &str, use_cache: bool) -> Result<String, ApiError>;

    async fn health_check(&self) -> Result<HealthResponse, ApiError>;

    async fn cache_stats(&self) -> Result<CacheStats, ApiError>;

    async fn clear_cache(&self) -> Result<CacheClearResponse, ApiError>;
}

#[async_trait]
impl AgentBackend for ApiClient {
    async fn query(&self, query: &str, use_cache: bool) -> Result<String, ApiError> {
        ApiClient::query(self, query, use_cache)
            .await
            .map(|response| response.response)
    }

    async fn health_check(&self) -> Result<HealthResponse, ApiError> {
        ApiClient::health_check(self).await
    }

    async fn cache_stats(&self) -> Result<CacheStats, ApiError> {
        ApiClient::cache_stats(self).await
    }

    async fn clear_cache(&self) -> Result<CacheClearResponse, ApiError> {
        ApiClient::clear_cache(self).await
    }
}
