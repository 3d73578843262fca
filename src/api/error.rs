use serde_json::Value;

/// Failures surfaced by [`ApiClient`](super::ApiClient).
///
/// Transport problems, unexpected payloads and backend-reported errors are
/// normalized here so callers can pick remediation text per kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request deadline elapsed before a response arrived.
    #[error("Request timeout - the server took too long to respond")]
    Timeout,

    /// The backend could not be reached at all (refused, DNS, TLS).
    #[error(
        "Cannot connect to backend API ({reason}). Please check your connection and ensure the server is running."
    )]
    Unreachable { reason: String },

    /// The response was not JSON, which usually means the base URL points at
    /// a web page or a misrouted proxy instead of the agent API.
    #[error(
        "Backend returned {content_type} instead of JSON (HTTP {status}). The API URL likely points at a web server or proxy rather than the agent API."
    )]
    ProtocolMismatch { status: u16, content_type: String },

    /// HTTP 429 from the backend, usually the LLM provider's quota.
    #[error("Rate Limit Exceeded: {message}{}", paragraph(.suggestion))]
    RateLimited {
        message: String,
        suggestion: Option<String>,
    },

    /// Any other non-success status.
    #[error("{message}")]
    BackendError {
        status: u16,
        message: String,
        hints: Vec<String>,
    },

    /// A JSON success body that did not match the expected shape.
    #[error("Unexpected response from backend: {reason}")]
    Decode { reason: String },
}

fn paragraph(text: &Option<String>) -> String {
    match text {
        Some(text) if !text.trim().is_empty() => format!("\n\n{text}"),
        _ => String::new(),
    }
}

impl ApiError {
    /// Short label for banners and logs.
    pub fn kind_label(&self) -> &'static str {
        match self {
            ApiError::Timeout => "timeout",
            ApiError::Unreachable { .. } => "unreachable",
            ApiError::ProtocolMismatch { .. } => "protocol mismatch",
            ApiError::RateLimited { .. } => "rate limited",
            ApiError::BackendError { .. } => "backend error",
            ApiError::Decode { .. } => "decode error",
        }
    }

    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ApiError::Timeout;
        }
        if err.is_decode() {
            return ApiError::Decode {
                reason: err.to_string(),
            };
        }
        let reason = if err.is_connect() {
            "connection failed".to_string()
        } else {
            err.without_url().to_string()
        };
        ApiError::Unreachable { reason }
    }

    /// Builds the error for a non-success status whose body was JSON.
    ///
    /// The backend wraps errors in FastAPI's `{"detail": ...}` envelope where
    /// `detail` is either a plain string or an object carrying `message`,
    /// `suggestion` and `suggestions`.
    pub(crate) fn from_status_body(status: u16, body: &Value) -> Self {
        let detail = body.get("detail");
        let message = detail
            .and_then(|detail| match detail {
                Value::String(text) => Some(text.clone()),
                Value::Object(map) => map
                    .get("message")
                    .or_else(|| map.get("error"))
                    .and_then(Value::as_str)
                    .map(str::to_owned),
                _ => None,
            })
            .or_else(|| {
                body.get("message")
                    .and_then(Value::as_str)
                    .map(str::to_owned)
            })
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        if status == 429 {
            let suggestion = body
                .get("suggestion")
                .or_else(|| detail.and_then(|detail| detail.get("suggestion")))
                .and_then(Value::as_str)
                .map(str::to_owned);
            return ApiError::RateLimited {
                message: message.unwrap_or_else(|| "Rate limit exceeded".to_string()),
                suggestion,
            };
        }

        let hints = detail
            .and_then(|detail| detail.get("suggestions"))
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        ApiError::BackendError {
            status,
            message: message.unwrap_or_else(|| format!("HTTP {status}")),
            hints,
        }
    }
}
