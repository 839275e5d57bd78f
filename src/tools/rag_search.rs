//! Hypermindz RAG search tool

use super::traits::{Tool, ToolInfo};
use crate::search::SearchClient;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub const TOOL_ID: &str = "hypermindz_rag_search";
pub const TOOL_NAME: &str = "Hypermindz RAG Search Tool";

const DESCRIPTION: &str = "\
Performs a semantic similarity search over a vectorized dataset collection to retrieve the most \
contextually relevant entries based on the user's input query.

Designed for Retrieval-Augmented Generation (RAG) workflows. The query is sent to an API that \
performs vector similarity matching within a predefined dataset collection, so results depend \
heavily on well-structured, natural language queries. Use full-sentence queries that capture \
specific intent, e.g. \"List of climate-related policy documents published in 2023\".

Returns a formatted list of the most relevant datasets found, or a message indicating that no \
matches were found.";

type ClientFactory = dyn Fn() -> SearchClient + Send + Sync;

/// Agent tool that runs one search per call
#[derive(Clone)]
pub struct RagSearchTool {
    factory: Arc<ClientFactory>,
}

impl RagSearchTool {
    /// Tool whose clients read their configuration from the environment
    pub fn new() -> Self {
        Self::with_factory(SearchClient::from_env)
    }

    /// Tool building its client with `factory` on every call
    pub fn with_factory<F>(factory: F) -> Self
    where
        F: Fn() -> SearchClient + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
        }
    }
}

impl Default for RagSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for RagSearchTool {
    fn info(&self) -> ToolInfo {
        ToolInfo {
            id: TOOL_ID.to_string(),
            name: TOOL_NAME.to_string(),
            description: DESCRIPTION.to_string(),
        }
    }

    async fn call(&self, input: &str) -> String {
        debug!("{} invoked", TOOL_ID);
        let client = (self.factory)();
        client.search(input).await
    }
}

/// Search the configured dataset collection, reading configuration from the environment
pub async fn hypermindz_rag_search(query_text: &str) -> String {
    RagSearchTool::new().call(query_text).await
}
