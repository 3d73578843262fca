pub mod data;
pub mod io;
pub mod printing;
pub mod resolve;

pub use data::{path_display, Config, SettingError, SETTING_KEYS};
pub use io::ConfigError;
pub use resolve::{ApiUrlSource, InvalidApiUrl, ResolvedSettings, SettingOverrides};
