use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Settings persisted in `config.toml`. Every field is optional so a partial
/// file keeps working; defaults are applied in [`super::resolve`].
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the agent API (e.g. "http://localhost:8000")
    pub api_url: Option<String>,
    /// Ask the backend to serve and store cached answers
    pub use_cache: Option<bool>,
    /// Animate assistant replies as if they were being typed
    pub typing: Option<bool>,
    /// Characters revealed per typing tick
    pub typing_speed: Option<usize>,
    /// Seconds between background health checks
    pub health_interval_secs: Option<u64>,
    /// Deadline in seconds for health and cache requests
    pub request_timeout_secs: Option<u64>,
}

/// Keys accepted by `tubechat set` and `tubechat unset`.
pub const SETTING_KEYS: [&str; 6] = [
    "api-url",
    "use-cache",
    "typing",
    "typing-speed",
    "health-interval",
    "request-timeout",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingError {
    UnknownKey(String),
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::UnknownKey(key) => write!(
                f,
                "Unknown config key: {key} (expected one of: {})",
                SETTING_KEYS.join(", ")
            ),
            SettingError::InvalidValue {
                key,
                value,
                expected,
            } => write!(f, "Invalid value for {key}: {value:?} (expected {expected})"),
        }
    }
}

impl std::error::Error for SettingError {}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, SettingError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(SettingError::InvalidValue {
            key,
            value: value.to_string(),
            expected: "on or off",
        }),
    }
}

fn parse_positive<T>(key: &'static str, value: &str) -> Result<T, SettingError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match value.trim().parse::<T>() {
        Ok(parsed) if parsed > T::default() => Ok(parsed),
        _ => Err(SettingError::InvalidValue {
            key,
            value: value.to_string(),
            expected: "a positive whole number",
        }),
    }
}

impl Config {
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), SettingError> {
        match key {
            "api-url" => {
                let url = value.trim();
                if !crate::utils::url::has_http_scheme(url) {
                    return Err(SettingError::InvalidValue {
                        key: "api-url",
                        value: value.to_string(),
                        expected: "an http:// or https:// URL",
                    });
                }
                self.api_url = Some(crate::utils::url::normalize_base_url(url));
            }
            "use-cache" => self.use_cache = Some(parse_bool("use-cache", value)?),
            "typing" => self.typing = Some(parse_bool("typing", value)?),
            "typing-speed" => self.typing_speed = Some(parse_positive("typing-speed", value)?),
            "health-interval" => {
                self.health_interval_secs = Some(parse_positive("health-interval", value)?)
            }
            "request-timeout" => {
                self.request_timeout_secs = Some(parse_positive("request-timeout", value)?)
            }
            other => return Err(SettingError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    pub fn unset_value(&mut self, key: &str) -> Result<(), SettingError> {
        match key {
            "api-url" => self.api_url = None,
            "use-cache" => self.use_cache = None,
            "typing" => self.typing = None,
            "typing-speed" => self.typing_speed = None,
            "health-interval" => self.health_interval_secs = None,
            "request-timeout" => self.request_timeout_secs = None,
            other => return Err(SettingError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
