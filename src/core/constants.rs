//! Shared constants used across the application

use std::time::Duration;

/// Hard deadline for a single `/query` request.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(120);

/// The session returns to idle after this long even if the request is still
/// outstanding. Matches [`QUERY_TIMEOUT`] but runs on its own timer.
pub const SAFETY_TIMEOUT: Duration = Duration::from_secs(120);

/// Default deadline for health, cache stats and cache clear calls.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How often the connection monitor polls `/health`.
pub const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Characters revealed per typing tick for assistant messages.
pub const DEFAULT_TYPING_SPEED: usize = 4;

/// Base URL used when neither the CLI, the environment nor the config file
/// names one. Release builds go through the `/api` proxy prefix.
pub const DEFAULT_API_URL: &str = if cfg!(debug_assertions) {
    "http://localhost:8000"
} else {
    "http://localhost:8000/api"
};

/// Environment variable that overrides the configured base URL.
pub const API_URL_ENV: &str = "TUBECHAT_API_URL";

/// Environment variable holding a `tracing` filter for `--debug-log`.
pub const LOG_FILTER_ENV: &str = "TUBECHAT_LOG";

/// Starter prompts offered while the transcript is empty.
pub const EXAMPLE_QUERIES: [&str; 4] = [
    "Summarize this video: https://www.youtube.com/watch?v=T-D1OfcDW1M",
    "Search for Python tutorials",
    "Find popular AI videos",
    "Get metadata for https://www.youtube.com/watch?v=dQw4w9WgXcQ",
];
