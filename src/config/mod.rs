use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_LOG_FILE: &str = "project_desk.log";
pub const DEFAULT_LOG_FILTER: &str = "project_desk=info";

/// Configuration for the application
///
/// Read from `PROJECT_DESK_*` environment variables, e.g. `PROJECT_DESK_API_URL`.
#[derive(Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Base URL of the Project API
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Bearer token to start the session with, skipping the login screen
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_log_file")]
    pub log_file: String,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_log_file() -> String {
    DEFAULT_LOG_FILE.to_string()
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize prefixed environment variables into Config struct
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::prefixed("PROJECT_DESK_").from_env::<Config>()?;

        Ok(config)
    }

    /// Apply command line overrides on top of the environment
    pub fn with_overrides(
        mut self,
        api_url: Option<String>,
        api_token: Option<String>,
        log_file: Option<String>,
    ) -> Self {
        if let Some(api_url) = api_url {
            self.api_url = api_url;
        }
        if api_token.is_some() {
            self.api_token = api_token;
        }
        if let Some(log_file) = log_file {
            self.log_file = log_file;
        }
        self
    }

    pub fn api_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    /// The configured token, ignoring blank values
    pub fn api_token(&self) -> Option<&str> {
        self.api_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    dotenv().ok();

    let config = Config::load()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // same keys as the environment
    fn from_pairs(pairs: Vec<(String, String)>) -> Result<Config> {
        Ok(envy::prefixed("PROJECT_DESK_").from_iter::<_, Config>(pairs)?)
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = from_pairs(Vec::new()).unwrap();

        assert_eq!(config.api_url(), DEFAULT_API_URL);
        assert_eq!(config.api_token(), None);
        assert_eq!(config.log_file, DEFAULT_LOG_FILE);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn prefixed_values_are_read() {
        let config = from_pairs(pairs(&[
            ("PROJECT_DESK_API_URL", "https://projects.example.com/"),
            ("PROJECT_DESK_API_TOKEN", "abc"),
            ("UNRELATED", "ignored"),
        ]))
        .unwrap();

        assert_eq!(config.api_url(), "https://projects.example.com");
        assert_eq!(config.api_token(), Some("abc"));
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let config = from_pairs(pairs(&[("PROJECT_DESK_API_TOKEN", "   ")])).unwrap();

        assert_eq!(config.api_token(), None);
    }

    #[test]
    fn overrides_replace_only_given_values() {
        let config = from_pairs(pairs(&[("PROJECT_DESK_API_TOKEN", "env")]))
            .unwrap()
            .with_overrides(Some("http://api:8080".to_string()), None, None);

        assert_eq!(config.api_url(), "http://api:8080");
        assert_eq!(config.api_token(), Some("env"));
        assert_eq!(config.log_file, DEFAULT_LOG_FILE);
    }
}
