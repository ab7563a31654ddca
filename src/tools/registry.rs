use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::bridge::normalize::{guarded, normalize};
use crate::bridge::readiness::{Capabilities, Capability};
use crate::bridge::serializer::OperationSerializer;
use crate::device::Outcome;
use crate::error::{BridgeError, Result};

/// Tool definition as listed by `tools/list`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value, // JSON Schema
}

/// One entry of a tool result's `content` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentItem {
    Text {
        text: String,
    },
    Image {
        /// base64-encoded image bytes
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
}

/// Result from tool execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ContentItem>,
    #[serde(rename = "structuredContent", skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::Text { text: text.into() }],
            structured_content: None,
        }
    }

    /// JSON payload carried as a text item and mirrored as structured content.
    pub fn json(payload: &impl Serialize) -> Result<Self> {
        let value = serde_json::to_value(payload)
            .map_err(|e| BridgeError::Internal(format!("Failed to serialize result: {}", e)))?;
        Ok(Self {
            content: vec![ContentItem::Text {
                text: value.to_string(),
            }],
            structured_content: Some(value),
        })
    }

    pub fn image(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::Image {
                data: base64::engine::general_purpose::STANDARD.encode(bytes),
                mime_type: mime_type.into(),
            }],
            structured_content: None,
        }
    }
}

/// Context passed to tools during execution
pub struct ToolContext {
    tool: String,
    mutating: bool,
    capabilities: Capabilities,
    serializer: Arc<OperationSerializer>,
}

impl ToolContext {
    pub fn new(
        tool: impl Into<String>,
        mutating: bool,
        capabilities: Capabilities,
        serializer: Arc<OperationSerializer>,
    ) -> Self {
        Self {
            tool: tool.into(),
            mutating,
            capabilities,
            serializer,
        }
    }

    /// Run one provider operation and normalize its outcome.
    ///
    /// Mutating tools go through the serializer; everything else runs
    /// directly on the blocking pool.
    pub async fn invoke<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Capabilities) -> anyhow::Result<Outcome<T>> + Send + 'static,
        T: Send + 'static,
    {
        let capabilities = self.capabilities.clone();
        let work = move || guarded(|| f(&capabilities));

        let result = if self.mutating {
            self.serializer
                .with_exclusive_access(&self.tool, work)
                .await?
        } else {
            tokio::task::spawn_blocking(work).await.map_err(|e| {
                tracing::error!(tool = %self.tool, error = %e, "Operation task failed");
                BridgeError::Internal(format!("{} did not complete", self.tool))
            })?
        };
        normalize(&self.tool, result)
    }
}

/// Trait for implementing tools
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool definition for `tools/list`
    fn definition(&self) -> ToolDefinition;

    /// Capability checked by the readiness gate before `execute`
    fn capability(&self) -> Capability;

    /// Whether the tool changes shared input state
    fn is_mutating(&self) -> bool {
        false
    }

    /// Validate `params` and run the operation through `ctx`
    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<ToolResult>;
}

/// Registry of all available tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let def = tool.definition();
        self.tools.insert(def.name.clone(), tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// All tool definitions, sorted by name
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<_> = self.tools.values().map(|t| t.definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
