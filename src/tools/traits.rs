//! Tool traits and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Tool information for agent frameworks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool ID, usable as a function name
    pub id: String,
    /// Display name
    pub name: String,
    /// Usage documentation shown to the agent
    pub description: String,
}

/// A callable exposed to an agent: one string in, one string out
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get tool info
    fn info(&self) -> ToolInfo;

    /// JSON schema of the single string argument
    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query_text": {
                    "type": "string",
                    "description": "A clear and descriptive query expressed in natural language."
                }
            },
            "required": ["query_text"]
        })
    }

    /// Function-calling definition combining info and parameters
    fn definition(&self) -> Value {
        let info = self.info();
        json!({
            "name": info.id,
            "title": info.name,
            "description": info.description,
            "parameters": self.parameters(),
        })
    }

    /// Run the tool; failures are described in the returned text
    async fn call(&self, input: &str) -> String;
}
