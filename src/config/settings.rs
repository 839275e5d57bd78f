//! Settings structures for the Hypermindz tools

use super::env::{ConfigOverrides, EndpointMode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading a settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Main settings structure, loaded from settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub search: SearchSettings,
    pub outgoing: OutgoingSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, SettingsError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Merge with environment variables (HYPERMINDZ_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("HYPERMINDZ_TIMEOUT") {
            if let Ok(timeout) = val.parse::<f64>() {
                if timeout > 0.0 {
                    self.search.timeout = timeout;
                }
            }
        }
        if let Ok(val) = std::env::var("HYPERMINDZ_VERIFY_SSL") {
            if let Ok(verify) = val.parse() {
                self.outgoing.verify_ssl = verify;
            }
        }
    }

    /// Endpoint values from the file, to be layered under explicit ones
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            mode: self.search.mode,
            api_url: self.search.api_url.clone(),
            base_url: self.search.base_url.clone(),
            api_key: self.search.api_key.clone(),
            dataset_id: self.search.dataset_id.clone(),
        }
    }
}

/// Search endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Endpoint mode; detected from the available values when unset
    pub mode: Option<EndpointMode>,
    /// Full search URL (direct mode)
    pub api_url: Option<String>,
    /// Service base URL (dataset mode)
    pub base_url: Option<String>,
    /// Bearer token
    pub api_key: Option<String>,
    /// Dataset to search (dataset mode)
    pub dataset_id: Option<String>,
    /// Request timeout in seconds
    pub timeout: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            mode: None,
            api_url: None,
            base_url: None,
            api_key: None,
            dataset_id: None,
            timeout: crate::DEFAULT_TIMEOUT as f64,
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Pool max size
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Appended to the default user agent
    pub useragent_suffix: Option<String>,
    /// Proxy settings
    pub proxies: ProxySettings,
    /// Extra headers to send
    pub extra_headers: HashMap<String, String>,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            pool_maxsize: 10,
            verify_ssl: true,
            useragent_suffix: None,
            proxies: ProxySettings::default(),
            extra_headers: HashMap::new(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}
