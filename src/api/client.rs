//! HTTP client for the agent API.
//!
//! Every call goes through [`ApiClient::execute`], which classifies the
//! response by content type first and status second so that an HTML error
//! page from a proxy is reported differently from a backend failure.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{
    ApiError, BatchQueryRequest, BatchQueryResponse, CacheClearResponse, CacheStats,
    HealthResponse, QueryRequest, QueryResponse,
};
use crate::core::constants::{QUERY_TIMEOUT, REQUEST_TIMEOUT};
use crate::utils::url::{construct_api_url, normalize_base_url};

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    query_timeout: Duration,
    request_timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            client: Client::new(),
            base_url: normalize_base_url(base_url.as_ref()),
            query_timeout: QUERY_TIMEOUT,
            request_timeout: REQUEST_TIMEOUT,
        }
    }

    /// Overrides the deadlines for `/query` and for every other endpoint.
    pub fn with_timeouts(mut self, query_timeout: Duration, request_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self.request_timeout = request_timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, endpoint: &str) -> RequestBuilder {
        self.client
            .get(construct_api_url(&self.base_url, endpoint))
            .header(CONTENT_TYPE, "application/json")
    }

    fn post(&self, endpoint: &str) -> RequestBuilder {
        self.client
            .post(construct_api_url(&self.base_url, endpoint))
            .header(CONTENT_TYPE, "application/json")
    }

    pub async fn query(&self, query: &str, use_cache: bool) -> Result<QueryResponse, ApiError> {
        let request = QueryRequest {
            query: query.to_string(),
            use_cache,
        };
        let builder = self
            .post("query")
            .timeout(self.query_timeout)
            .json(&request);
        self.execute(builder, "query").await
    }

    pub async fn batch(
        &self,
        queries: Vec<String>,
        use_cache: bool,
    ) -> Result<BatchQueryResponse, ApiError> {
        let request = BatchQueryRequest { queries, use_cache };
        // A batch runs every query back to back, so it gets the long deadline too.
        let builder = self
            .post("batch")
            .timeout(self.query_timeout)
            .json(&request);
        self.execute(builder, "batch").await
    }

    pub async fn health_check(&self) -> Result<HealthResponse, ApiError> {
        let builder = self
            .get("health")
            .timeout(self.request_timeout);
        self.execute(builder, "health").await
    }

    pub async fn cache_stats(&self) -> Result<CacheStats, ApiError> {
        let builder = self
            .get("cache/stats")
            .timeout(self.request_timeout);
        self.execute(builder, "cache/stats").await
    }

    pub async fn clear_cache(&self) -> Result<CacheClearResponse, ApiError> {
        let builder = self
            .post("cache/clear")
            .timeout(self.request_timeout);
        self.execute(builder, "cache/clear").await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        endpoint: &str,
    ) -> Result<T, ApiError> {
        debug!(endpoint, base_url = %self.base_url, "sending request");
        let response = builder
            .send()
            .await
            .map_err(|err| {
                let err = ApiError::from_transport(err);
                debug!(endpoint, kind = err.kind_label(), "request failed");
                err
            })?;
        let result = decode_response(response).await;
        if let Err(err) = &result {
            debug!(endpoint, kind = err.kind_label(), "backend reported failure");
        }
        result
    }
}

fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let is_json = content_type.as_deref().is_some_and(is_json_content_type);

    if !is_json {
        if status.as_u16() == 429 {
            return Err(ApiError::from_status_body(429, &serde_json::Value::Null));
        }
        return Err(ApiError::ProtocolMismatch {
            status: status.as_u16(),
            content_type: content_type.unwrap_or_else(|| "a response without a content type".into()),
        });
    }

    let bytes = response.bytes().await.map_err(ApiError::from_transport)?;

    if !status.is_success() {
        let body = serde_json::from_slice::<serde_json::Value>(&bytes)
            .unwrap_or(serde_json::Value::Null);
        return Err(ApiError::from_status_body(status.as_u16(), &body));
    }

    serde_json::from_slice::<T>(&bytes).map_err(|err| ApiError::Decode {
        reason: err.to_string(),
    })
}
