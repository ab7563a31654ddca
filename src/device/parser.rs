//! Accessibility tree parsing.
//!
//! The bridge only hands the raw root node to a [`TreeParser`] and forwards
//! whatever it returns. [`DefaultTreeParser`] is the parser the binary ships
//! with.

use super::session::AccessibleNode;
use super::types::{NodeBounds, ParsedTree, ScreenNode};

pub const ROOT_NODE_ID: &str = "node_root";

pub trait TreeParser: Send + Sync {
    fn parse_tree(&self, root: &dyn AccessibleNode) -> ParsedTree;
}

/// Depth-first parser assigning `node_root` to the root and `node_<n>` to
/// descendants in pre-order.
#[derive(Debug, Clone)]
pub struct DefaultTreeParser {
    pub max_depth: usize,
    /// Keep subtrees that are not visible to the user
    pub include_invisible: bool,
}

impl DefaultTreeParser {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            include_invisible: false,
        }
    }

    fn convert(&self, node: &dyn AccessibleNode, id: String, depth: usize, next_id: &mut usize) -> ScreenNode {
        let (left, top, right, bottom) = node.bounds_in_screen();
        let mut out = ScreenNode::new(id, node.class_name(), NodeBounds::new(left, top, right, bottom));
        out.text = node.text().filter(|t| !t.is_empty());
        out.content_description = node.content_description().filter(|t| !t.is_empty());
        out.resource_id = node.resource_id().filter(|t| !t.is_empty());
        out.visible = node.is_visible_to_user();
        out.clickable = node.is_clickable();
        out.focusable = node.is_focusable();
        out.editable = node.is_editable();
        out.scrollable = node.is_scrollable();

        if depth + 1 >= self.max_depth {
            return out;
        }

        for index in 0..node.child_count() {
            // Children can disappear while we walk; skip them
            let Some(child) = node.child(index) else {
                continue;
            };
            if !self.include_invisible && !child.is_visible_to_user() {
                continue;
            }
            *next_id += 1;
            let child_id = format!("node_{}", *next_id);
            out.children
                .push(self.convert(child.as_ref(), child_id, depth + 1, next_id));
        }
        out
    }
}

impl Default for DefaultTreeParser {
    fn default() -> Self {
        Self::new(64)
    }
}

impl TreeParser for DefaultTreeParser {
    fn parse_tree(&self, root: &dyn AccessibleNode) -> ParsedTree {
        let mut next_id = 0;
        let root = self.convert(root, ROOT_NODE_ID.to_string(), 0, &mut next_id);
        ParsedTree::from_roots(vec![root])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Node {
        class: &'static str,
        text: Option<&'static str>,
        bounds: (i32, i32, i32, i32),
        visible: bool,
        children: Vec<Node>,
    }

    impl Node {
        fn leaf(class: &'static str, visible: bool) -> Self {
            Self {
                class,
                text: None,
                bounds: (0, 0, 10, 10),
                visible,
                children: Vec::new(),
            }
        }
    }

    impl AccessibleNode for Node {
        fn class_name(&self) -> String {
            self.class.to_string()
        }
        fn text(&self) -> Option<String> {
            self.text.map(str::to_string)
        }
        fn content_description(&self) -> Option<String> {
            None
        }
        fn resource_id(&self) -> Option<String> {
            None
        }
        fn bounds_in_screen(&self) -> (i32, i32, i32, i32) {
            self.bounds
        }
        fn is_visible_to_user(&self) -> bool {
            self.visible
        }
        fn child_count(&self) -> usize {
            self.children.len()
        }
        fn child(&self, index: usize) -> Option<Box<dyn AccessibleNode>> {
            self.children
                .get(index)
                .cloned()
                .map(|c| Box::new(c) as Box<dyn AccessibleNode>)
        }
    }

    fn sample() -> Node {
        let mut list = Node::leaf("ListView", true);
        list.children = vec![Node::leaf("TextView", true), Node::leaf("TextView", false)];
        Node {
            class: "FrameLayout",
            text: Some(""),
            bounds: (-4, 0, 1080, 2400),
            visible: true,
            children: vec![Node::leaf("Button", true), list],
        }
    }

    #[test]
    fn test_ids_and_visibility_filter() {
        let tree = DefaultTreeParser::default().parse_tree(&sample());

        assert_eq!(tree.nodes.len(), 1);
        let root = &tree.nodes[0];
        assert_eq!(root.id, ROOT_NODE_ID);
        assert_eq!(root.bounds, NodeBounds::new(0, 0, 1080, 2400));
        assert_eq!(root.text, None);
        assert_eq!(root.children[0].id, "node_1");
        assert_eq!(root.children[1].id, "node_2");
        assert_eq!(root.children[1].children.len(), 1);
        assert_eq!(tree.node_count, 4);
    }

    #[test]
    fn test_depth_limit() {
        let parser = DefaultTreeParser::new(2);
        let tree = parser.parse_tree(&sample());
        let list = &tree.nodes[0].children[1];
        assert!(list.children.is_empty());
    }

    #[test]
    fn test_include_invisible() {
        let parser = DefaultTreeParser {
            max_depth: 64,
            include_invisible: true,
        };
        let tree = parser.parse_tree(&sample());
        assert_eq!(tree.node_count, 5);
    }
}
