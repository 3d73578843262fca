use std::fmt;
use std::time::Duration;

use crate::core::config::data::Config;
use crate::core::constants::{
    API_URL_ENV, DEFAULT_API_URL, DEFAULT_TYPING_SPEED, HEALTH_POLL_INTERVAL, REQUEST_TIMEOUT,
};
use crate::utils::url::{has_http_scheme, normalize_base_url};

/// Values given on the command line. They win over everything else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingOverrides {
    pub api_url: Option<String>,
    pub no_cache: bool,
    pub no_typing: bool,
}

/// Where the effective base URL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiUrlSource {
    CommandLine,
    Environment,
    ConfigFile,
    BuildDefault,
}

impl fmt::Display for ApiUrlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ApiUrlSource::CommandLine => "--api-url",
            ApiUrlSource::Environment => API_URL_ENV,
            ApiUrlSource::ConfigFile => "config file",
            ApiUrlSource::BuildDefault => "built-in default",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidApiUrl {
    pub url: String,
    pub source: ApiUrlSource,
}

impl fmt::Display for InvalidApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API URL {:?} (from {}) must start with http:// or https://",
            self.url, self.source
        )
    }
}

impl std::error::Error for InvalidApiUrl {}

/// Effective settings after applying overrides, environment, config and
/// defaults, in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub api_url: String,
    pub api_url_source: ApiUrlSource,
    pub use_cache: bool,
    pub typing: bool,
    pub typing_speed: usize,
    pub health_interval: Duration,
    pub request_timeout: Duration,
}

impl ResolvedSettings {
    pub fn resolve(config: &Config, overrides: &SettingOverrides) -> Result<Self, InvalidApiUrl> {
        let env_url = std::env::var(API_URL_ENV).ok();
        Self::resolve_with_env(config, overrides, env_url)
    }

    pub fn resolve_with_env(
        config: &Config,
        overrides: &SettingOverrides,
        env_url: Option<String>,
    ) -> Result<Self, InvalidApiUrl> {
        let non_empty = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string)
        };

        let (raw_url, api_url_source) = if let Some(url) = non_empty(&overrides.api_url) {
            (url, ApiUrlSource::CommandLine)
        } else if let Some(url) = non_empty(&env_url) {
            (url, ApiUrlSource::Environment)
        } else if let Some(url) = non_empty(&config.api_url) {
            (url, ApiUrlSource::ConfigFile)
        } else {
            (DEFAULT_API_URL.to_string(), ApiUrlSource::BuildDefault)
        };

        if !has_http_scheme(&raw_url) {
            return Err(InvalidApiUrl {
                url: raw_url,
                source: api_url_source,
            });
        }

        Ok(Self {
            api_url: normalize_base_url(&raw_url),
            api_url_source,
            use_cache: !overrides.no_cache && config.use_cache.unwrap_or(true),
            typing: !overrides.no_typing && config.typing.unwrap_or(true),
            typing_speed: config
                .typing_speed
                .unwrap_or(DEFAULT_TYPING_SPEED)
                .max(1),
            health_interval: config
                .health_interval_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(HEALTH_POLL_INTERVAL),
            request_timeout: config
                .request_timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(REQUEST_TIMEOUT),
        })
    }
}
