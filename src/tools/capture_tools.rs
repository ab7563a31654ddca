use async_trait::async_trait;
use serde_json::{json, Value};

use super::registry::{Tool, ToolContext, ToolDefinition, ToolResult};
use crate::bridge::readiness::Capability;
use crate::error::Result;

pub const SCREENSHOT_MIME_TYPE: &str = "image/jpeg";

/// Capture the current screen as a JPEG image
pub struct CaptureScreenshotTool;

#[async_trait]
impl Tool for CaptureScreenshotTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "capture_screenshot".to_string(),
            description: "Capture the current screen. Returns one base64 JPEG image. \
                          Requires an active screen-capture session."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        }
    }

    fn capability(&self) -> Capability {
        Capability::Capture
    }

    async fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<ToolResult> {
        let frame = ctx.invoke(|caps| caps.capture.capture()).await?;
        tracing::debug!(
            width = frame.width,
            height = frame.height,
            bytes = frame.data.len(),
            "Screenshot captured"
        );
        Ok(ToolResult::image(&frame.data, SCREENSHOT_MIME_TYPE))
    }
}
