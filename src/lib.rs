//! Hypermindz tools: semantic RAG search for agent frameworks
//!
//! Sends a natural-language query to a Hypermindz search endpoint and returns
//! the result set as text. Failures are described in the returned text rather
//! than raised, so an autonomous agent always gets something it can act on.

pub mod config;
pub mod network;
pub mod search;
pub mod tools;

pub use config::{load_configuration, ConfigOverrides, EndpointMode, SearchConfiguration, Settings};
pub use network::{HttpClient, Transport};
pub use search::{SearchClient, SearchOutcome};
pub use tools::{hypermindz_rag_search, RagSearchTool, Tool};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default timeout for search requests in seconds
pub const DEFAULT_TIMEOUT: u64 = 30;
