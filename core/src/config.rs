//! Client configuration.
//!
//! `ClientConfig` deserializes with serde (missing fields take defaults) and
//! can also be read from `SITEADMIN_*` environment variables.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub const ENV_API_ROOT: &str = "SITEADMIN_API_ROOT";
pub const ENV_NAMESPACE: &str = "SITEADMIN_NAMESPACE";
pub const ENV_CACHE_BUSTING: &str = "SITEADMIN_CACHE_BUSTING";

const DEFAULT_API_ROOT: &str = "http://localhost/wp-json/";
const DEFAULT_NAMESPACE: &str = "jetpack";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid API root {value:?}: {source}")]
    InvalidApiRoot {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("API namespace must not be empty")]
    EmptyNamespace,

    #[error("invalid value {value:?} for {name}, expected true or false")]
    InvalidFlag { name: &'static str, value: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Where the admin API lives and how requests are shaped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root of the REST API, e.g. `https://example.com/wp-json/`.
    pub api_root: String,
    /// Namespace below the root, without the version segment.
    pub namespace: String,
    /// Append a `_cacheBuster` timestamp to GET requests.
    pub cache_busting: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_root: DEFAULT_API_ROOT.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            cache_busting: true,
        }
    }
}

impl ClientConfig {
    pub fn new(api_root: impl Into<String>) -> Self {
        Self {
            api_root: api_root.into(),
            ..Self::default()
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_cache_busting(mut self, enabled: bool) -> Self {
        self.cache_busting = enabled;
        self
    }

    /// Read the configuration from the environment, falling back to defaults
    /// for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(api_root) = lookup(ENV_API_ROOT) {
            config.api_root = api_root;
        }
        if let Some(namespace) = lookup(ENV_NAMESPACE) {
            config.namespace = namespace;
        }
        if let Some(value) = lookup(ENV_CACHE_BUSTING) {
            config.cache_busting = parse_flag(ENV_CACHE_BUSTING, &value)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.api_root).map_err(|source| ConfigError::InvalidApiRoot {
            value: self.api_root.clone(),
            source,
        })?;
        if self.namespace.trim_matches('/').is_empty() {
            return Err(ConfigError::EmptyNamespace);
        }
        Ok(())
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.namespace, "jetpack");
        assert!(config.cache_busting);
    }

    #[test]
    fn deserializes_with_missing_fields() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"api_root":"https://example.com/wp-json/"}"#).unwrap();
        assert_eq!(config.api_root, "https://example.com/wp-json/");
        assert_eq!(config.namespace, "jetpack");
        assert!(config.cache_busting);
    }

    #[test]
    fn reads_environment() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_API_ROOT, "https://site.test/wp-json"),
            (ENV_NAMESPACE, "custom"),
            (ENV_CACHE_BUSTING, "off"),
        ]))
        .unwrap();
        assert_eq!(config.api_root, "https://site.test/wp-json");
        assert_eq!(config.namespace, "custom");
        assert!(!config.cache_busting);
    }

    #[test]
    fn rejects_bad_flag() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_CACHE_BUSTING, "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFlag { .. }));
    }

    #[test]
    fn rejects_relative_api_root() {
        let err = ClientConfig::new("/wp-json/").validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidApiRoot { .. }));
    }

    #[test]
    fn rejects_empty_namespace() {
        let err = ClientConfig::default().with_namespace("/").validate().unwrap_err();
        assert!(matches!(err, ConfigError::EmptyNamespace));
    }
}
