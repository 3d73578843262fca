//! URL utilities for consistent endpoint construction
//!
//! The backend may be reached directly (`http://localhost:8000`) or through a
//! proxy prefix (`http://host/api`), and users tend to paste either with a
//! trailing slash. These helpers keep the joined URLs free of double slashes.

/// Normalize a base URL by removing trailing slashes
///
/// # Examples
///
/// ```
/// use tubechat::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:8000"), "http://localhost:8000");
/// assert_eq!(normalize_base_url("http://localhost:8000/api/"), "http://localhost:8000/api");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Construct a complete API endpoint URL from a base URL and endpoint path
///
/// # Examples
///
/// ```
/// use tubechat::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:8000/", "/cache/stats"),
///     "http://localhost:8000/cache/stats"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

/// Returns true when the base URL carries an explicit scheme.
///
/// A bare proxy path such as `/api` only makes sense inside a browser, so the
/// config layer rejects it with a hint instead of letting reqwest fail later.
pub fn has_http_scheme(base_url: &str) -> bool {
    let lowered = base_url.trim().to_ascii_lowercase();
    lowered.starts_with("http://") || lowered.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_trailing_slashes() {
        assert_eq!(
            normalize_base_url("http://localhost:8000"),
            "http://localhost:8000"
        );
        assert_eq!(
            normalize_base_url("http://localhost:8000/api///"),
            "http://localhost:8000/api"
        );
        assert_eq!(normalize_base_url("  http://agent.test/  "), "http://agent.test");
        assert_eq!(normalize_base_url("///"), "");
    }

    #[test]
    fn construct_joins_without_double_slashes() {
        assert_eq!(
            construct_api_url("http://localhost:8000", "query"),
            "http://localhost:8000/query"
        );
        assert_eq!(
            construct_api_url("http://localhost:8000/", "/health"),
            "http://localhost:8000/health"
        );
        assert_eq!(
            construct_api_url("http://proxy.test/api/", "///cache/clear"),
            "http://proxy.test/api/cache/clear"
        );
    }

    #[test]
    fn scheme_detection() {
        assert!(has_http_scheme("http://localhost:8000"));
        assert!(has_http_scheme("HTTPS://agent.example.com"));
        assert!(!has_http_scheme("/api"));
        assert!(!has_http_scheme("localhost:8000"));
    }
}
