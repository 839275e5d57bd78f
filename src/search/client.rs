//! Client for the Hypermindz RAG search service

use super::outcome::{extract_results, render_results, SearchOutcome};
use crate::config::{
    load_configuration, ConfigOverrides, EndpointMode, ProcessEnv, SearchConfiguration,
};
use crate::network::{ApiRequest, HttpClient, Transport, UnavailableTransport};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Performs semantic similarity searches against a remote dataset collection
#[derive(Clone)]
pub struct SearchClient {
    config: SearchConfiguration,
    transport: Arc<dyn Transport>,
    default_timeout: Duration,
}

impl SearchClient {
    /// Direct mode client; unset values are read from `HYPERMINDZ_RAG_URL`
    /// and `HYPERMINDZ_RAG_API_KEY`
    pub fn new(api_url: Option<String>, api_key: Option<String>) -> Self {
        Self::from_overrides(ConfigOverrides {
            mode: Some(EndpointMode::Direct),
            api_url,
            api_key,
            ..Default::default()
        })
    }

    /// Dataset mode client; unset values are read from `HYPERMINDZ_BASE_URL`,
    /// `HYPERMINDZ_RAG_API_KEY` and `HYPERMINDZ_DATASET_ID`
    pub fn with_dataset(
        base_url: Option<String>,
        api_key: Option<String>,
        dataset_id: Option<String>,
    ) -> Self {
        Self::from_overrides(ConfigOverrides {
            mode: Some(EndpointMode::Dataset),
            base_url,
            api_key,
            dataset_id,
            ..Default::default()
        })
    }

    /// Client configured entirely from the environment
    pub fn from_env() -> Self {
        Self::from_overrides(ConfigOverrides::default())
    }

    /// Client from explicit overrides, falling back to the process environment
    pub fn from_overrides(overrides: ConfigOverrides) -> Self {
        Self::from_config(load_configuration(overrides, &ProcessEnv))
    }

    /// Client from an already resolved configuration
    pub fn from_config(config: SearchConfiguration) -> Self {
        Self {
            config,
            transport: default_transport(),
            default_timeout: Duration::from_secs(crate::DEFAULT_TIMEOUT),
        }
    }

    /// Use a different transport
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Set the timeout used by [`SearchClient::search`]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn config(&self) -> &SearchConfiguration {
        &self.config
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Returns `(true, "")` when the configuration is complete, otherwise
    /// `false` and a message naming the missing environment variable
    pub fn validate_configuration(&self) -> (bool, String) {
        match self.config.validate() {
            Ok(()) => (true, String::new()),
            Err(e) => (false, e.to_string()),
        }
    }

    /// Search with the default timeout, always returning text
    pub async fn search(&self, query_text: &str) -> String {
        self.search_with_timeout(query_text, self.default_timeout)
            .await
    }

    /// Search with an explicit timeout, always returning text
    pub async fn search_with_timeout(&self, query_text: &str, timeout: Duration) -> String {
        self.execute(query_text, timeout).await.into()
    }

    /// Run one search and classify what happened
    #[instrument(skip(self), fields(mode = ?self.config.mode))]
    pub async fn execute(&self, query_text: &str, timeout: Duration) -> SearchOutcome {
        let request = match self.build_request(query_text, timeout) {
            Ok(request) => request,
            Err(message) => {
                warn!("Search configuration invalid: {}", message);
                return SearchOutcome::ConfigError(message);
            }
        };

        debug!("Sending search request to {}", request.url);

        let response = match self
            .transport
            .execute(request)
            .await
            .and_then(|r| r.error_for_status())
        {
            Ok(response) => response,
            Err(e) if !e.is_network() => {
                warn!("Search failed: {}", e);
                return SearchOutcome::UnexpectedError(e.to_string());
            }
            Err(e) => {
                warn!("Search request failed: {}", e);
                return SearchOutcome::TransportError(e.to_string());
            }
        };

        match extract_results(&response.text) {
            Ok(results) if results.is_empty() => {
                info!("Search returned no results");
                SearchOutcome::EmptyResult
            }
            Ok(results) => {
                info!("Search returned {} results", results.len());
                SearchOutcome::Success(render_results(&results))
            }
            Err(message) => {
                warn!("Failed to parse search response: {}", message);
                SearchOutcome::UnexpectedError(message)
            }
        }
    }

    fn build_request(&self, query_text: &str, timeout: Duration) -> Result<ApiRequest, String> {
        let url = self.config.request_url().map_err(|e| e.to_string())?;
        let api_key = self.config.api_key.as_deref().unwrap_or_default();

        let mut request = ApiRequest::get(url)
            .param("query", query_text)
            .bearer_auth(api_key)
            .timeout(timeout);

        if self.config.mode == EndpointMode::Dataset {
            if let Some(ref id) = self.config.dataset_id {
                request = request.param("id", id.as_str());
            }
        }

        Ok(request)
    }
}

fn default_transport() -> Arc<dyn Transport> {
    match HttpClient::new() {
        Ok(client) => Arc::new(client),
        Err(e) => {
            warn!("Failed to create HTTP client: {}", e);
            Arc::new(UnavailableTransport::new(e.to_string()))
        }
    }
}

impl std::fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchClient")
            .field("config", &self.config)
            .field("default_timeout", &self.default_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{API_KEY_VAR, BASE_URL_VAR, DATASET_ID_VAR, RAG_URL_VAR};
    use crate::network::{MockTransport, TransportError};
    use serde_json::json;
    use std::collections::HashMap;

    fn direct(url: Option<&str>, key: Option<&str>) -> SearchClient {
        SearchClient::from_config(load_configuration(
            ConfigOverrides {
                mode: Some(EndpointMode::Direct),
                api_url: url.map(String::from),
                api_key: key.map(String::from),
                ..Default::default()
            },
            &HashMap::<String, String>::new(),
        ))
    }

    fn dataset(url: Option<&str>, key: Option<&str>, id: Option<&str>) -> SearchClient {
        SearchClient::from_config(load_configuration(
            ConfigOverrides {
                mode: Some(EndpointMode::Dataset),
                base_url: url.map(String::from),
                api_key: key.map(String::from),
                dataset_id: id.map(String::from),
                ..Default::default()
            },
            &HashMap::<String, String>::new(),
        ))
    }

    fn with_mock(client: SearchClient, mock: &Arc<MockTransport>) -> SearchClient {
        client.with_transport(mock.clone())
    }

    #[test]
    fn test_init_with_parameters() {
        let client = SearchClient::new(Some("https://test.com".into()), Some("test-key".into()));
        assert_eq!(client.config().endpoint_url.as_deref(), Some("https://test.com"));
        assert_eq!(client.config().api_key.as_deref(), Some("test-key"));
        assert_eq!(client.default_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_validate_missing_url() {
        let (valid, message) = direct(None, Some("test-key")).validate_configuration();
        assert!(!valid);
        assert!(message.contains(RAG_URL_VAR));
    }

    #[test]
    fn test_validate_missing_key() {
        let (valid, message) = direct(Some("https://test.com"), None).validate_configuration();
        assert!(!valid);
        assert!(message.contains(API_KEY_VAR));
    }

    #[test]
    fn test_validate_success() {
        let (valid, message) =
            direct(Some("https://test.com"), Some("test-key")).validate_configuration();
        assert!(valid);
        assert_eq!(message, "");
    }

    #[test]
    fn test_validate_dataset_mode() {
        let (valid, message) = dataset(None, Some("k"), Some("d")).validate_configuration();
        assert!(!valid);
        assert!(message.contains(BASE_URL_VAR));

        let (valid, message) = dataset(Some("https://b"), Some("k"), None).validate_configuration();
        assert!(!valid);
        assert!(message.contains(DATASET_ID_VAR));

        let (valid, message) =
            dataset(Some("https://b"), Some("k"), Some("d")).validate_configuration();
        assert!(valid);
        assert!(message.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_config_skips_network() {
        let mock = Arc::new(MockTransport::json(200, json!({"results": ["a"]})));
        let client = with_mock(direct(None, Some("test-key")), &mock);

        let result = client.search("test query").await;

        assert_eq!(
            result,
            "Error: HYPERMINDZ_RAG_URL not provided or environment variable not set"
        );
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_search_success() {
        let mock = Arc::new(MockTransport::json(
            200,
            json!({"results": ["result1", "result2", "result3"]}),
        ));
        let client = with_mock(direct(Some("https://test.com"), Some("test-key")), &mock);

        let result = client.search("test query").await;

        assert!(result.contains("result1"));
        assert!(result.contains("result2"));
        assert!(result.contains("result3"));

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        let expected = ApiRequest {
            url: "https://test.com".to_string(),
            headers: HashMap::from([(
                "Authorization".to_string(),
                "Bearer test-key".to_string(),
            )]),
            params: vec![("query".to_string(), "test query".to_string())],
            timeout: Duration::from_secs(30),
        };
        assert_eq!(calls[0], expected);
    }

    #[tokio::test]
    async fn test_dataset_search_request() {
        let mock = Arc::new(MockTransport::json(200, json!({"results": ["a", "b", "c"]})));
        let client = with_mock(
            dataset(Some("https://api.test.com/"), Some("test-key"), Some("json_test")),
            &mock,
        );

        let result = client.search("q").await;
        for entry in ["a", "b", "c"] {
            assert!(result.contains(entry));
        }

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].url, "https://api.test.com/search");
        assert_eq!(
            calls[0].params,
            vec![
                ("query".to_string(), "q".to_string()),
                ("id".to_string(), "json_test".to_string()),
            ]
        );
        assert_eq!(
            calls[0].headers.get("Authorization").map(String::as_str),
            Some("Bearer test-key")
        );
        assert_eq!(calls[0].timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_search_no_results() {
        let mock = Arc::new(MockTransport::json(200, json!({"results": []})));
        let client = with_mock(direct(Some("https://test.com"), Some("test-key")), &mock);

        assert_eq!(client.search("test query").await, "No relevant datasets found.");
    }

    #[tokio::test]
    async fn test_search_missing_results_field() {
        let mock = Arc::new(MockTransport::json(200, json!({"total": 0})));
        let client = with_mock(direct(Some("https://test.com"), Some("test-key")), &mock);

        assert_eq!(
            client.execute("q", Duration::from_secs(1)).await,
            SearchOutcome::EmptyResult
        );
    }

    #[tokio::test]
    async fn test_search_request_exception() {
        let mock = Arc::new(MockTransport::replying(Err(TransportError::Network(
            "Connection error".to_string(),
        ))));
        let client = with_mock(direct(Some("https://test.com"), Some("test-key")), &mock);

        let result = client.search("test query").await;

        assert!(result.contains("API request error"));
        assert!(result.contains("Connection error"));
    }

    #[tokio::test]
    async fn test_search_timeout() {
        let mock = Arc::new(MockTransport::replying(Err(TransportError::Timeout(
            Duration::from_secs(5),
        ))));
        let client = with_mock(direct(Some("https://test.com"), Some("test-key")), &mock);

        let result = client
            .search_with_timeout("q", Duration::from_secs(5))
            .await;

        assert!(result.starts_with("API request error: "));
        assert!(result.contains("timed out"));
        assert_eq!(mock.calls()[0].timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_search_http_status_error() {
        let mock = Arc::new(MockTransport::json(500, json!({"results": ["a"]})));
        let client = with_mock(direct(Some("https://test.com"), Some("test-key")), &mock);

        let outcome = client.execute("q", Duration::from_secs(30)).await;

        assert!(matches!(outcome, SearchOutcome::TransportError(_)));
        assert!(outcome.to_string().starts_with("API request error: "));
        assert!(outcome.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_search_general_exception() {
        let mock = Arc::new(MockTransport::replying(Err(TransportError::Other(
            "Unexpected error".to_string(),
        ))));
        let client = with_mock(direct(Some("https://test.com"), Some("test-key")), &mock);

        let result = client.search("test query").await;

        assert!(result.contains("Unexpected error"));
        assert!(!result.contains("API request error"));
    }

    #[tokio::test]
    async fn test_search_malformed_json() {
        let mock = Arc::new(MockTransport::body("<html>oops</html>"));
        let client = with_mock(direct(Some("https://test.com"), Some("test-key")), &mock);

        let outcome = client.execute("q", Duration::from_secs(30)).await;

        assert!(matches!(outcome, SearchOutcome::UnexpectedError(_)));
        assert!(outcome.to_string().starts_with("Unexpected error: "));
    }

    #[tokio::test]
    async fn test_with_timeout() {
        let mock = Arc::new(MockTransport::json(200, json!({"results": ["a"]})));
        let client = with_mock(direct(Some("https://test.com"), Some("k")), &mock)
            .with_timeout(Duration::from_secs(3));

        client.search("q").await;
        assert_eq!(mock.calls()[0].timeout, Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_unavailable_transport_is_described() {
        let client = direct(Some("https://test.com"), Some("k"))
            .with_transport(Arc::new(UnavailableTransport::new("TLS backend failed")));

        let result = client.search("q").await;

        assert!(result.starts_with("Unexpected error: "));
        assert!(result.contains("TLS backend failed"));
    }

    #[test]
    fn test_debug_hides_key() {
        let client = direct(Some("https://test.com"), Some("super-secret"));
        assert!(!format!("{:?}", client).contains("super-secret"));
    }
}
