//! HTTP client for making requests to the search service

use super::transport::{ApiRequest, ApiResponse, Transport, TransportError};
use crate::config::OutgoingSettings;
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// HTTP client wrapper used as the default transport
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
    extra_headers: HashMap<String, String>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder()
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            user_agent: user_agent(settings.useragent_suffix.as_deref()),
            extra_headers: settings.extra_headers.clone(),
        })
    }

    /// Get current user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Parse response into ApiResponse
    async fn parse_response(
        response: Response,
        timeout: Duration,
    ) -> Result<ApiResponse, TransportError> {
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let text = response
            .text()
            .await
            .map_err(|e| map_error(e, timeout))?;

        Ok(ApiResponse { status, text, url })
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let timeout = request.timeout;
        let mut req_builder = self
            .client
            .get(&request.url)
            .timeout(timeout)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json");

        for (key, value) in &self.extra_headers {
            req_builder = req_builder.header(key, value);
        }
        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }
        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        debug!("GET {} with timeout {:?}", request.url, timeout);

        let response = req_builder
            .send()
            .await
            .map_err(|e| map_error(e, timeout))?;

        Self::parse_response(response, timeout).await
    }
}

/// Default user agent, optionally with a suffix
fn user_agent(suffix: Option<&str>) -> String {
    let base = format!("hypermindz-tools/{}", crate::VERSION);
    match suffix {
        Some(s) if !s.is_empty() => format!("{} {}", base, s),
        _ => base,
    }
}

fn map_error(error: reqwest::Error, timeout: Duration) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout(timeout)
    } else if error.is_decode() {
        TransportError::Other(error.to_string())
    } else {
        TransportError::Network(error.to_string())
    }
}
