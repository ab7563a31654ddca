//! Read-only tools over the tree capability: accessibility tree, foreground
//! app, windows and screen metrics.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::registry::{Tool, ToolContext, ToolDefinition, ToolResult};
use crate::bridge::readiness::Capability;
use crate::error::Result;

fn no_arguments() -> Value {
    json!({
        "type": "object",
        "properties": {},
        "required": []
    })
}

/// Parse the active window's accessibility tree
pub struct GetAccessibilityTreeTool;

#[async_trait]
impl Tool for GetAccessibilityTreeTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_accessibility_tree".to_string(),
            description: "Get the accessibility tree of the active window. \
                          Each node has an id, class name, text, bounds and interaction flags."
                .to_string(),
            input_schema: no_arguments(),
        }
    }

    fn capability(&self) -> Capability {
        Capability::Tree
    }

    async fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<ToolResult> {
        let tree = ctx
            .invoke(|caps| {
                Ok(caps
                    .tree
                    .root_node()?
                    .map(|root| caps.parser.parse_tree(root.as_ref())))
            })
            .await?;
        tracing::debug!(node_count = tree.node_count, "Parsed accessibility tree");
        ToolResult::json(&tree)
    }
}

/// Identify the foreground app
pub struct GetCurrentAppTool;

#[async_trait]
impl Tool for GetCurrentAppTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_current_app".to_string(),
            description: "Get the package and activity name of the app in the foreground."
                .to_string(),
            input_schema: no_arguments(),
        }
    }

    fn capability(&self) -> Capability {
        Capability::Tree
    }

    async fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<ToolResult> {
        let app = ctx.invoke(|caps| caps.tree.foreground_app()).await?;
        ToolResult::json(&app)
    }
}

pub struct ListWindowsTool;

#[async_trait]
impl Tool for ListWindowsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "list_windows".to_string(),
            description: "List the windows currently on screen with their bounds, layer and focus state."
                .to_string(),
            input_schema: no_arguments(),
        }
    }

    fn capability(&self) -> Capability {
        Capability::Tree
    }

    async fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<ToolResult> {
        let windows = ctx.invoke(|caps| caps.tree.windows()).await?;
        ToolResult::json(&json!({
            "windows": windows,
            "count": windows.len(),
        }))
    }
}

pub struct GetScreenInfoTool;

#[async_trait]
impl Tool for GetScreenInfoTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_screen_info".to_string(),
            description: "Get the screen size in pixels and its density.".to_string(),
            input_schema: no_arguments(),
        }
    }

    fn capability(&self) -> Capability {
        Capability::Tree
    }

    async fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<ToolResult> {
        let metrics = ctx.invoke(|caps| caps.tree.screen_metrics()).await?;
        ToolResult::json(&metrics)
    }
}
