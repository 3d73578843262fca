use crate::core::config::data::{path_display, Config};
use crate::core::config::resolve::ResolvedSettings;

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn or_unset<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "(unset)".to_string())
}

impl Config {
    pub fn print_all(&self) {
        match Config::get_config_path() {
            Ok(path) => println!("Config file: {}", path_display(path)),
            Err(err) => println!("Config file: ({err})"),
        }
        println!("Stored values:");
        println!("  api-url: {}", or_unset(self.api_url.as_deref()));
        println!("  use-cache: {}", or_unset(self.use_cache.map(on_off)));
        println!("  typing: {}", or_unset(self.typing.map(on_off)));
        println!("  typing-speed: {}", or_unset(self.typing_speed));
        println!("  health-interval: {}", or_unset(self.health_interval_secs));
        println!("  request-timeout: {}", or_unset(self.request_timeout_secs));
    }
}

impl ResolvedSettings {
    pub fn print_all(&self) {
        println!("Effective settings:");
        println!("  api-url: {} (from {})", self.api_url, self.api_url_source);
        println!("  use-cache: {}", on_off(self.use_cache));
        println!("  typing: {}", on_off(self.typing));
        println!("  typing-speed: {}", self.typing_speed);
        println!("  health-interval: {}s", self.health_interval.as_secs());
        println!("  request-timeout: {}s", self.request_timeout.as_secs());
    }
}
