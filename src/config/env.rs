//! Resolution of search configuration from explicit values and the environment

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Full search endpoint URL (direct mode)
pub const RAG_URL_VAR: &str = "HYPERMINDZ_RAG_URL";
/// Base URL of the search service (dataset mode)
pub const BASE_URL_VAR: &str = "HYPERMINDZ_BASE_URL";
/// Bearer token sent with every request
pub const API_KEY_VAR: &str = "HYPERMINDZ_RAG_API_KEY";
/// Dataset identifier (dataset mode)
pub const DATASET_ID_VAR: &str = "HYPERMINDZ_DATASET_ID";

/// Path appended to the base URL in dataset mode
pub const SEARCH_PATH: &str = "search";

/// Source of environment variables
pub trait EnvReader {
    /// Look up a variable, returning `None` when it is unset
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvReader for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvReader for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// How the request URL is formed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointMode {
    /// The endpoint URL is requested as-is with `query`
    #[default]
    Direct,
    /// `<base>/search` is requested with `query` and `id`
    Dataset,
}

/// Missing or unusable configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Error: {variable} not provided or environment variable not set")]
    Missing { variable: &'static str },
}

impl ConfigError {
    /// Environment variable that would have supplied the missing value
    pub fn variable(&self) -> &'static str {
        match self {
            ConfigError::Missing { variable } => *variable,
        }
    }
}

/// Explicitly supplied values; anything left unset falls back to the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub mode: Option<EndpointMode>,
    pub api_url: Option<String>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub dataset_id: Option<String>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: EndpointMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn dataset_id(mut self, id: impl Into<String>) -> Self {
        self.dataset_id = Some(id.into());
        self
    }

    /// Fill unset fields from `other`
    pub fn or(self, other: ConfigOverrides) -> Self {
        Self {
            mode: self.mode.or(other.mode),
            api_url: self.api_url.or(other.api_url),
            base_url: self.base_url.or(other.base_url),
            api_key: self.api_key.or(other.api_key),
            dataset_id: self.dataset_id.or(other.dataset_id),
        }
    }
}

/// Resolved configuration for a search client
#[derive(Clone, PartialEq, Eq)]
pub struct SearchConfiguration {
    pub mode: EndpointMode,
    /// Full URL in direct mode, base URL in dataset mode
    pub endpoint_url: Option<String>,
    pub api_key: Option<String>,
    pub dataset_id: Option<String>,
}

impl SearchConfiguration {
    /// Check required fields in order, reporting the first missing one
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url_var = match self.mode {
            EndpointMode::Direct => RAG_URL_VAR,
            EndpointMode::Dataset => BASE_URL_VAR,
        };
        if self.endpoint_url.is_none() {
            return Err(ConfigError::Missing { variable: url_var });
        }
        if self.api_key.is_none() {
            return Err(ConfigError::Missing {
                variable: API_KEY_VAR,
            });
        }
        if self.mode == EndpointMode::Dataset && self.dataset_id.is_none() {
            return Err(ConfigError::Missing {
                variable: DATASET_ID_VAR,
            });
        }
        Ok(())
    }

    /// URL the GET request is sent to
    pub fn request_url(&self) -> Result<String, ConfigError> {
        self.validate()?;
        let endpoint = self.endpoint_url.as_deref().unwrap_or_default();
        Ok(match self.mode {
            EndpointMode::Direct => endpoint.to_string(),
            EndpointMode::Dataset => {
                format!("{}/{}", endpoint.trim_end_matches('/'), SEARCH_PATH)
            }
        })
    }
}

impl fmt::Debug for SearchConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfiguration")
            .field("mode", &self.mode)
            .field("endpoint_url", &self.endpoint_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("dataset_id", &self.dataset_id)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn resolve(explicit: Option<String>, env: &impl EnvReader, key: &str) -> Option<String> {
    non_empty(explicit).or_else(|| non_empty(env.var(key)))
}

/// Build a configuration from explicit overrides, falling back to `env`
///
/// Without a pinned mode, an explicit URL decides the mode before anything
/// read from the environment does; dataset mode needs a base URL.
pub fn load_configuration(overrides: ConfigOverrides, env: &impl EnvReader) -> SearchConfiguration {
    let explicit_api_url = non_empty(overrides.api_url);
    let explicit_base_url = non_empty(overrides.base_url);

    let mode = overrides.mode.unwrap_or_else(|| {
        if explicit_base_url.is_some() {
            EndpointMode::Dataset
        } else if explicit_api_url.is_some() {
            EndpointMode::Direct
        } else if non_empty(env.var(BASE_URL_VAR)).is_some() {
            EndpointMode::Dataset
        } else {
            EndpointMode::Direct
        }
    });

    let api_key = resolve(overrides.api_key, env, API_KEY_VAR);

    match mode {
        EndpointMode::Direct => SearchConfiguration {
            mode,
            endpoint_url: resolve(explicit_api_url, env, RAG_URL_VAR),
            api_key,
            dataset_id: None,
        },
        EndpointMode::Dataset => SearchConfiguration {
            mode,
            endpoint_url: resolve(explicit_base_url, env, BASE_URL_VAR),
            api_key,
            dataset_id: resolve(overrides.dataset_id, env, DATASET_ID_VAR),
        },
    }
}
