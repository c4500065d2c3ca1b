use std::time::Duration;

pub const API_ROOT_VAR: &str = "FLOODNAV_API_ROOT";
pub const API_TOKEN_VAR: &str = "FLOODNAV_API_TOKEN";
pub const TIMEOUT_VAR: &str = "FLOODNAV_TIMEOUT_SECS";

const DEFAULT_API_ROOT: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{TIMEOUT_VAR} must be a positive number of seconds, got {0:?}")]
    InvalidTimeout(String),
    #[error("API root must not be empty")]
    EmptyApiRoot,
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Connection settings for the backend adapters. Passed in explicitly; the
/// adapters never read the environment themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_root: String,
    pub auth_token: Option<String>,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_root: DEFAULT_API_ROOT.to_string(),
            auth_token: None,
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` uses the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(root) = lookup(API_ROOT_VAR) {
            config = config.with_api_root(root)?;
        }
        config.auth_token = lookup(API_TOKEN_VAR)
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout(raw.clone()))?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_api_root(mut self, root: impl Into<String>) -> Result<Self, ConfigError> {
        let root = root.into();
        let root = root.trim().trim_end_matches('/');
        if root.is_empty() {
            return Err(ConfigError::EmptyApiRoot);
        }
        self.api_root = root.to_string();
        Ok(self)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.endpoint("/flood/risk"), "http://localhost:8000/flood/risk");
    }

    #[test]
    fn reads_all_variables() {
        let config = ClientConfig::from_lookup(lookup(&[
            (API_ROOT_VAR, "https://api.example.org/v1/"),
            (API_TOKEN_VAR, " secret "),
            (TIMEOUT_VAR, "3"),
        ]))
        .unwrap();
        assert_eq!(config.api_root, "https://api.example.org/v1");
        assert_eq!(config.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(
            config.endpoint("navigation/route"),
            "https://api.example.org/v1/navigation/route"
        );
    }

    #[test]
    fn blank_token_is_ignored() {
        let config = ClientConfig::from_lookup(lookup(&[(API_TOKEN_VAR, "  ")])).unwrap();
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn rejects_bad_timeout() {
        let err = ClientConfig::from_lookup(lookup(&[(TIMEOUT_VAR, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout(_)));
        let err = ClientConfig::from_lookup(lookup(&[(TIMEOUT_VAR, "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout(_)));
    }

    #[test]
    fn rejects_empty_root() {
        let err = ClientConfig::default().with_api_root(" / ").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyApiRoot));
    }
}
