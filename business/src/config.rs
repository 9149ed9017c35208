use std::env;

/// Where the token service lives.
///
/// All endpoints hang off `{base_url}/auth/api/v1`; `api_url()` applies the
/// prefix so call sites only append their route.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
}

const API_PREFIX: &str = "/auth/api/v1";

impl AppConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Reads `TOKENVIEW_BASE_URL`, falling back to the default.
    pub fn from_env() -> Self {
        match env::var("TOKENVIEW_BASE_URL") {
            Ok(base_url) if !base_url.is_empty() => Self::new(base_url),
            _ => Self::default(),
        }
    }

    pub fn api_url(&self) -> String {
        format!("{}{API_PREFIX}", self.base_url.trim_end_matches('/'))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
