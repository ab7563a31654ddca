use serde::{Deserialize, Serialize};

/// Bounding rectangle in screen pixels.
///
/// Coordinates are never negative and `right >= left`, `bottom >= top`, so
/// width and height are always `>= 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeBounds {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl NodeBounds {
    /// Build bounds from raw platform coordinates, clamping off-screen values.
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        let left = left.max(0) as u32;
        let top = top.max(0) as u32;
        let right = (right.max(0) as u32).max(left);
        let bottom = (bottom.max(0) as u32).max(top);
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// One node of the parsed accessibility tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenNode {
    pub id: String,
    /// Widget class or role, e.g. `android.widget.Button`
    pub class_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    pub bounds: NodeBounds,
    pub visible: bool,
    #[serde(default)]
    pub clickable: bool,
    #[serde(default)]
    pub focusable: bool,
    #[serde(default)]
    pub editable: bool,
    #[serde(default)]
    pub scrollable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ScreenNode>,
}

impl ScreenNode {
    pub fn new(id: impl Into<String>, class_name: impl Into<String>, bounds: NodeBounds) -> Self {
        Self {
            id: id.into(),
            class_name: class_name.into(),
            text: None,
            content_description: None,
            resource_id: None,
            bounds,
            visible: true,
            clickable: false,
            focusable: false,
            editable: false,
            scrollable: false,
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including self.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(ScreenNode::subtree_len).sum::<usize>()
    }
}

/// Result of running a tree parser over the active window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTree {
    pub nodes: Vec<ScreenNode>,
    pub node_count: usize,
}

impl ParsedTree {
    pub fn from_roots(nodes: Vec<ScreenNode>) -> Self {
        let node_count = nodes.iter().map(ScreenNode::subtree_len).sum();
        Self { nodes, node_count }
    }
}

/// An on-screen window as reported by the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowInfo {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
    pub bounds: NodeBounds,
    pub layer: i32,
    pub is_focused: bool,
    pub is_active: bool,
}

/// Identity of the app currently in the foreground.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForegroundApp {
    pub package_name: String,
    pub activity_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenMetrics {
    pub width: u32,
    pub height: u32,
    pub density_dpi: u32,
}

/// Encoded screenshot. `data` is opaque to the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureResult {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Text around the cursor of the focused input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurroundingText {
    pub text: String,
    pub selection_start: u32,
    pub selection_end: u32,
    /// Offset of `text` within the full field content
    pub offset: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyAction {
    Down,
    Up,
    /// Down followed by up
    #[default]
    Press,
}

/// A key event in device key-code numbering (Android `KeyEvent` codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEvent {
    pub action: KeyAction,
    pub key_code: u32,
    pub meta_state: u32,
}

impl KeyEvent {
    pub fn press(key_code: u32) -> Self {
        Self {
            action: KeyAction::Press,
            key_code,
            meta_state: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContextMenuAction {
    SelectAll,
    Cut,
    Copy,
    Paste,
    PasteAsPlainText,
    Undo,
    Redo,
}

impl ContextMenuAction {
    pub const ALL: [ContextMenuAction; 7] = [
        ContextMenuAction::SelectAll,
        ContextMenuAction::Cut,
        ContextMenuAction::Copy,
        ContextMenuAction::Paste,
        ContextMenuAction::PasteAsPlainText,
        ContextMenuAction::Undo,
        ContextMenuAction::Redo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContextMenuAction::SelectAll => "selectAll",
            ContextMenuAction::Cut => "cut",
            ContextMenuAction::Copy => "copy",
            ContextMenuAction::Paste => "paste",
            ContextMenuAction::PasteAsPlainText => "pasteAsPlainText",
            ContextMenuAction::Undo => "undo",
            ContextMenuAction::Redo => "redo",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str().eq_ignore_ascii_case(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_clamp_negative_coordinates() {
        let bounds = NodeBounds::new(-20, -5, 100, 40);
        assert_eq!(bounds.left, 0);
        assert_eq!(bounds.top, 0);
        assert_eq!(bounds.width(), 100);
        assert_eq!(bounds.height(), 40);
    }

    #[test]
    fn test_bounds_never_inverted() {
        let bounds = NodeBounds::new(300, 300, 100, 100);
        assert_eq!(bounds.width(), 0);
        assert_eq!(bounds.height(), 0);
    }

    #[test]
    fn test_screen_node_subtree_len() {
        let mut root = ScreenNode::new("node_root", "FrameLayout", NodeBounds::new(0, 0, 1080, 2400));
        root.children
            .push(ScreenNode::new("node_1", "Button", NodeBounds::new(10, 10, 200, 80)));

        assert_eq!(root.subtree_len(), 2);
        assert_eq!(root.children[0].subtree_len(), 1);
    }

    #[test]
    fn test_context_menu_action_parse() {
        assert_eq!(ContextMenuAction::parse("selectAll"), Some(ContextMenuAction::SelectAll));
        assert_eq!(ContextMenuAction::parse("PASTE"), Some(ContextMenuAction::Paste));
        assert_eq!(ContextMenuAction::parse("share"), None);
    }
}
