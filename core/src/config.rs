//! Client configuration read from the environment.

pub const API_URL_ENV: &str = "TODO_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Reads `TODO_API_URL`; unset or blank falls back to the default.
    pub fn from_env() -> Self {
        Self::from_value(std::env::var(API_URL_ENV).ok())
    }

    fn from_value(value: Option<String>) -> Self {
        match value.map(|v| v.trim().to_string()) {
            Some(url) if !url.is_empty() => Self { api_url: url },
            _ => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_localhost() {
        assert_eq!(ClientConfig::from_value(None).api_url, "http://localhost:8080");
        assert_eq!(ClientConfig::from_value(Some("  ".into())).api_url, DEFAULT_API_URL);
    }

    #[test]
    fn uses_configured_url() {
        let config = ClientConfig::from_value(Some(" http://api.test:9000 ".into()));
        assert_eq!(config.api_url, "http://api.test:9000");
    }
}
