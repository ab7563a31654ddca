// Tools module - tool registry and the device tool implementations

pub mod args;
pub mod capture_tools;
pub mod input_tools;
pub mod registry;
pub mod tree_tools;

use std::sync::Arc;

pub use registry::*;

/// Register every device tool
pub fn register_all_tools(registry: &mut ToolRegistry) {
    // Tree
    registry.register(Arc::new(tree_tools::GetAccessibilityTreeTool));
    registry.register(Arc::new(tree_tools::GetCurrentAppTool));
    registry.register(Arc::new(tree_tools::ListWindowsTool));
    registry.register(Arc::new(tree_tools::GetScreenInfoTool));

    // Capture
    registry.register(Arc::new(capture_tools::CaptureScreenshotTool));

    // Input
    registry.register(Arc::new(input_tools::CommitTextTool));
    registry.register(Arc::new(input_tools::SetSelectionTool));
    registry.register(Arc::new(input_tools::SendKeyEventTool));
    registry.register(Arc::new(input_tools::DeleteSurroundingTextTool));
    registry.register(Arc::new(input_tools::PerformContextMenuActionTool));
    registry.register(Arc::new(input_tools::GetSurroundingTextTool));
}
