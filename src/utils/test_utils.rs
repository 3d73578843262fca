use crate::core::app::{App, AppInit};

pub const TEST_API_URL: &str = "http://localhost:8000";

pub fn test_init() -> AppInit {
    AppInit {
        api_url: TEST_API_URL.to_string(),
        use_cache: true,
        typing_enabled: true,
        typing_speed: 4,
        log_file: None,
    }
}

pub fn create_test_app() -> App {
    App::new(test_init()).expect("test app")
}
