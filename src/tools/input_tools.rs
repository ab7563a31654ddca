//! Input tools: text commit, selection, key events and editing actions on
//! the focused field.
//!
//! Every tool here except `get_surrounding_text` is mutating and runs through
//! the operation serializer.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::args::{optional_i32, optional_str, optional_u32, required_str, required_u32};
use super::registry::{Tool, ToolContext, ToolDefinition, ToolResult};
use crate::bridge::readiness::Capability;
use crate::device::keys::KeyCode;
use crate::device::{ContextMenuAction, KeyAction, KeyEvent};
use crate::error::{BridgeError, Result};

/// Upper bound on `beforeLength`/`afterLength`. Some backends replay each
/// character as a key press while holding the serializer.
pub const MAX_EDIT_LENGTH: u32 = 10_000;

fn edit_length(params: &Value, name: &str) -> Result<Option<u32>> {
    match optional_u32(params, name)? {
        Some(n) if n > MAX_EDIT_LENGTH => Err(BridgeError::InvalidArgument(format!(
            "{} must be at most {}, got {}",
            name, MAX_EDIT_LENGTH, n
        ))),
        length => Ok(length),
    }
}

fn required_edit_length(params: &Value, name: &str) -> Result<u32> {
    edit_length(params, name)?
        .ok_or_else(|| BridgeError::InvalidArgument(format!("{} is required", name)))
}

// ============================================================================
// Text
// ============================================================================

/// Commit text into the focused field
pub struct CommitTextTool;

#[async_trait]
impl Tool for CommitTextTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "commit_text".to_string(),
            description: "Commit text into the focused input field, replacing any composing text."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "text": {
                        "type": "string",
                        "description": "Text to commit"
                    },
                    "newCursorPosition": {
                        "type": "integer",
                        "description": "Cursor position relative to the committed text (default: 1, after it)",
                        "default": 1
                    }
                },
                "required": ["text"]
            }),
        }
    }

    fn capability(&self) -> Capability {
        Capability::Input
    }

    fn is_mutating(&self) -> bool {
        true
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<ToolResult> {
        let text = required_str(&params, "text")?.to_string();
        let new_cursor_position = optional_i32(&params, "newCursorPosition", 1)?;
        let committed = text.chars().count();

        ctx.invoke(move |caps| caps.input.commit_text(&text, new_cursor_position))
            .await?;
        ToolResult::json(&json!({ "success": true, "committed": committed }))
    }
}

pub struct SetSelectionTool;

#[async_trait]
impl Tool for SetSelectionTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "set_selection".to_string(),
            description: "Set the selection of the focused input field. \
                          Equal start and end place the cursor."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "start": { "type": "integer", "minimum": 0 },
                    "end": { "type": "integer", "minimum": 0 }
                },
                "required": ["start", "end"]
            }),
        }
    }

    fn capability(&self) -> Capability {
        Capability::Input
    }

    fn is_mutating(&self) -> bool {
        true
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<ToolResult> {
        let start = required_u32(&params, "start")?;
        let end = required_u32(&params, "end")?;

        ctx.invoke(move |caps| caps.input.set_selection(start, end))
            .await?;
        ToolResult::json(&json!({ "success": true, "start": start, "end": end }))
    }
}

pub struct DeleteSurroundingTextTool;

#[async_trait]
impl Tool for DeleteSurroundingTextTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "delete_surrounding_text".to_string(),
            description: "Delete characters before and/or after the cursor in the focused input field."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "beforeLength": {
                        "type": "integer",
                        "minimum": 0,
                        "maximum": MAX_EDIT_LENGTH,
                        "default": 0
                    },
                    "afterLength": {
                        "type": "integer",
                        "minimum": 0,
                        "maximum": MAX_EDIT_LENGTH,
                        "default": 0
                    }
                },
                "required": []
            }),
        }
    }

    fn capability(&self) -> Capability {
        Capability::Input
    }

    fn is_mutating(&self) -> bool {
        true
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<ToolResult> {
        let before = edit_length(&params, "beforeLength")?.unwrap_or(0);
        let after = edit_length(&params, "afterLength")?.unwrap_or(0);

        ctx.invoke(move |caps| caps.input.delete_surrounding_text(before, after))
            .await?;
        ToolResult::json(&json!({
            "success": true,
            "beforeLength": before,
            "afterLength": after
        }))
    }
}

/// Read text around the cursor. Not mutating.
pub struct GetSurroundingTextTool;

#[async_trait]
impl Tool for GetSurroundingTextTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_surrounding_text".to_string(),
            description: "Get the text around the cursor of the focused input field, \
                          with the selection range."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "beforeLength": {
                        "type": "integer",
                        "minimum": 0,
                        "maximum": MAX_EDIT_LENGTH,
                        "description": "Characters to read before the cursor"
                    },
                    "afterLength": {
                        "type": "integer",
                        "minimum": 0,
                        "maximum": MAX_EDIT_LENGTH,
                        "description": "Characters to read after the cursor"
                    }
                },
                "required": ["beforeLength", "afterLength"]
            }),
        }
    }

    fn capability(&self) -> Capability {
        Capability::Input
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<ToolResult> {
        let before = required_edit_length(&params, "beforeLength")?;
        let after = required_edit_length(&params, "afterLength")?;

        let surrounding = ctx
            .invoke(move |caps| caps.input.surrounding_text(before, after))
            .await?;
        ToolResult::json(&surrounding)
    }
}

// ============================================================================
// Keys and editing actions
// ============================================================================

fn parse_key_action(value: Option<&str>) -> Result<KeyAction> {
    match value.map(|s| s.trim().to_lowercase()).as_deref() {
        None | Some("press") => Ok(KeyAction::Press),
        Some("down") => Ok(KeyAction::Down),
        Some("up") => Ok(KeyAction::Up),
        Some(other) => Err(BridgeError::InvalidArgument(format!(
            "action must be one of down, up, press; got {}",
            other
        ))),
    }
}

fn parse_key_event(params: &Value) -> Result<KeyEvent> {
    let key_code = match optional_u32(params, "keyCode")? {
        Some(code) => code,
        None => {
            let Some(name) = optional_str(params, "key")? else {
                return Err(BridgeError::InvalidArgument(
                    "either keyCode or key is required".to_string(),
                ));
            };
            KeyCode::from_name(name)
                .ok_or_else(|| BridgeError::InvalidArgument(format!("Unknown key: {}", name)))?
                .code()
        }
    };

    Ok(KeyEvent {
        action: parse_key_action(optional_str(params, "action")?)?,
        key_code,
        meta_state: optional_u32(params, "metaState")?.unwrap_or(0),
    })
}

pub struct SendKeyEventTool;

#[async_trait]
impl Tool for SendKeyEventTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "send_key_event".to_string(),
            description: "Send a key event to the focused window. \
                          Give either a numeric keyCode or a key name such as 'enter', 'tab', 'a', 'f5'."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "keyCode": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "Device key code (e.g. 66 for Enter)"
                    },
                    "key": {
                        "type": "string",
                        "description": "Key name, used when keyCode is absent"
                    },
                    "action": {
                        "type": "string",
                        "enum": ["down", "up", "press"],
                        "default": "press"
                    },
                    "metaState": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "Modifier bit mask (shift 0x1, alt 0x2, ctrl 0x1000, meta 0x10000)",
                        "default": 0
                    }
                },
                "required": []
            }),
        }
    }

    fn capability(&self) -> Capability {
        Capability::Input
    }

    fn is_mutating(&self) -> bool {
        true
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<ToolResult> {
        let event = parse_key_event(&params)?;

        ctx.invoke(move |caps| caps.input.send_key_event(&event))
            .await?;
        ToolResult::json(&json!({ "success": true, "event": event }))
    }
}

pub struct PerformContextMenuActionTool;

#[async_trait]
impl Tool for PerformContextMenuActionTool {
    fn definition(&self) -> ToolDefinition {
        let actions: Vec<&str> = ContextMenuAction::ALL.iter().map(|a| a.as_str()).collect();
        ToolDefinition {
            name: "perform_context_menu_action".to_string(),
            description: "Perform a text context-menu action (select all, cut, copy, paste, ...) \
                          on the focused input field."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "action": {
                        "type": "string",
                        "enum": actions
                    }
                },
                "required": ["action"]
            }),
        }
    }

    fn capability(&self) -> Capability {
        Capability::Input
    }

    fn is_mutating(&self) -> bool {
        true
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<ToolResult> {
        let name = required_str(&params, "action")?;
        let action = ContextMenuAction::parse(name).ok_or_else(|| {
            BridgeError::InvalidArgument(format!("Unknown context menu action: {}", name))
        })?;

        ctx.invoke(move |caps| caps.input.perform_context_menu_action(action))
            .await?;
        ToolResult::json(&json!({ "success": true, "action": action }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_event_from_name_and_defaults() {
        let event = parse_key_event(&json!({"key": "Enter"})).unwrap();
        assert_eq!(event, KeyEvent::press(66));

        let event = parse_key_event(&json!({"keyCode": 29, "action": "down", "metaState": 4096}))
            .unwrap();
        assert_eq!(event.action, KeyAction::Down);
        assert_eq!(event.meta_state, 0x1000);
    }

    #[test]
    fn test_key_event_rejects_bad_input() {
        for params in [
            json!({}),
            json!({"key": "hyper"}),
            json!({"keyCode": -3}),
            json!({"keyCode": 66, "action": "hold"}),
            json!({"keyCode": 66, "metaState": -1}),
        ] {
            assert!(matches!(
                parse_key_event(&params),
                Err(BridgeError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_edit_length_is_bounded() {
        let params = json!({"beforeLength": MAX_EDIT_LENGTH, "afterLength": 4294967295u64});
        assert_eq!(
            required_edit_length(&params, "beforeLength").unwrap(),
            MAX_EDIT_LENGTH
        );
        assert!(matches!(
            edit_length(&params, "afterLength"),
            Err(BridgeError::InvalidArgument(_))
        ));
        assert_eq!(edit_length(&params, "missing").unwrap(), None);
        assert!(required_edit_length(&params, "missing").is_err());
    }
}
