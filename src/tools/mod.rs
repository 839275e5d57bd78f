//! Agent tool module
//!
//! Exposes the search client as a named, documented callable that an agent
//! framework can select and invoke.

mod rag_search;
mod traits;

pub use rag_search::{hypermindz_rag_search, RagSearchTool, TOOL_ID, TOOL_NAME};
pub use traits::{Tool, ToolInfo};
