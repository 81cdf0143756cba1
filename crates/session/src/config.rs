//! Console configuration.

use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use dian_client::{ClientConfig, DEFAULT_BASE_URL, StorageKeys};

pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_HOME_PATH: &str = "/profile";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub api_base_url: String,
    /// Applied to every HTTP request; `0` disables the timeout.
    pub request_timeout_secs: u64,
    pub login_path: String,
    /// Where forbidden users are sent and where "go to my profile" points.
    pub home_path: String,
    pub token_key: String,
    pub user_key: String,
    /// Whether login also caches the identity blob next to the token.
    pub cache_user: bool,
    pub log_filter: String,
    pub log_json: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        let keys = StorageKeys::default();
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 30,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            home_path: DEFAULT_HOME_PATH.to_string(),
            token_key: keys.token,
            user_key: keys.user,
            cache_user: true,
            log_filter: "info".to_string(),
            log_json: false,
        }
    }
}

impl ConsoleConfig {
    /// Defaults overridden by `DIAN_API_URL`, `DIAN_REQUEST_TIMEOUT_SECS`,
    /// `DIAN_LOG` and `DIAN_LOG_JSON`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("DIAN_API_URL") {
            config.api_base_url = url;
        }
        if let Some(raw) = lookup("DIAN_REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = raw
                .trim()
                .parse()
                .with_context(|| format!("DIAN_REQUEST_TIMEOUT_SECS must be a number, got {raw:?}"))?;
        }
        if let Some(filter) = lookup("DIAN_LOG") {
            config.log_filter = filter;
        }
        if let Some(raw) = lookup("DIAN_LOG_JSON") {
            config.log_json = parse_bool(&raw)
                .with_context(|| format!("DIAN_LOG_JSON must be a boolean, got {raw:?}"))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(raw).context("invalid console configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"),
            "api_base_url must be an http(s) URL, got {:?}",
            self.api_base_url
        );
        anyhow::ensure!(self.login_path.starts_with('/'), "login_path must be absolute");
        anyhow::ensure!(self.home_path.starts_with('/'), "home_path must be absolute");
        anyhow::ensure!(
            !self.token_key.is_empty() && self.token_key != self.user_key,
            "token_key must be non-empty and distinct from user_key"
        );
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api_base_url.clone()).with_timeout(self.request_timeout())
    }

    pub fn storage_keys(&self) -> StorageKeys {
        StorageKeys {
            token: self.token_key.clone(),
            user: self.user_key.clone(),
        }
    }
}

fn parse_bool(raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("unrecognized boolean {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = ConsoleConfig::default();
        config.validate().unwrap();
        assert_eq!(config.login_path, "/login");
        assert_eq!(config.home_path, "/profile");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn env_overrides() {
        let config = ConsoleConfig::from_lookup(lookup(&[
            ("DIAN_API_URL", "https://api.example.co/api"),
            ("DIAN_REQUEST_TIMEOUT_SECS", "0"),
            ("DIAN_LOG_JSON", "true"),
        ]))
        .unwrap();

        assert_eq!(config.api_base_url, "https://api.example.co/api");
        assert_eq!(config.request_timeout(), None);
        assert!(config.log_json);
        assert_eq!(config.client_config().timeout, None);
    }

    #[test]
    fn bad_timeout_is_reported() {
        let err = ConsoleConfig::from_lookup(lookup(&[("DIAN_REQUEST_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("DIAN_REQUEST_TIMEOUT_SECS"));
    }

    #[test]
    fn json_keeps_defaults_for_missing_fields() {
        let config = ConsoleConfig::from_json(r#"{ "home_path": "/companies" }"#).unwrap();
        assert_eq!(config.home_path, "/companies");
        assert_eq!(config.login_path, "/login");
        assert_eq!(config.storage_keys(), StorageKeys::default());
    }

    #[test]
    fn colliding_keys_are_rejected() {
        let config = ConsoleConfig {
            user_key: "auth_token".to_string(),
            ..ConsoleConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
