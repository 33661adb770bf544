//! API base URL configuration.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_BASE_URL: &str = "https://natalia3-backend.vercel.app/api";
pub const API_URL_ENV: &str = "LEARNHUB_API_URL";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL without a trailing slash, e.g. `https://host/api`.
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_API_BASE_URL.to_owned() }
    }
}

impl ApiConfig {
    /// Build from an optional override; blank values fall back to the default.
    #[must_use]
    pub fn from_override(raw: Option<&str>) -> Self {
        let base_url = raw
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
            .to_owned();
        Self { base_url }
    }

    /// Read `LEARNHUB_API_URL` from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_override(std::env::var(API_URL_ENV).ok().as_deref())
    }

    /// Use the value of `LEARNHUB_API_URL` captured at compile time.
    ///
    /// Browser builds have no process environment, so the URL is baked in.
    #[must_use]
    pub fn compiled() -> Self {
        Self::from_override(option_env!("LEARNHUB_API_URL"))
    }

    /// Join an endpoint path (starting with `/`) onto the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}
