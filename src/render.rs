//! Markup rendering for node descriptions and live subtrees
//!
//! Used for logging and debugging: patch `Display` output, assertion
//! messages, and dumping the live tree while tracing an update.

use crate::attr::Attrs;
use crate::id::NodeId;
use crate::node::{Element, Node};
use crate::tree::{LiveNode, LiveTree};

// =============================================================================
// RenderConfig
// =============================================================================

/// Default attribute name for live node handles.
pub const DEFAULT_ID_ATTR: &str = "data-node-id";

/// Configuration for markup rendering.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Whether to emit node handles as attributes (live subtrees only).
    pub emit_ids: bool,
    /// Whether to emit identity keys as a `key` attribute.
    pub emit_keys: bool,
    /// Attribute name for node handles (default: "data-node-id").
    pub id_attr_name: String,
}

impl RenderConfig {
    /// Debug config (handles and keys).
    pub const DEBUG: Self = Self {
        emit_ids: true,
        emit_keys: true,
        id_attr_name: String::new(), // Will use DEFAULT_ID_ATTR
    };

    /// Plain markup (no handles, no keys).
    pub const PLAIN: Self = Self {
        emit_ids: false,
        emit_keys: false,
        id_attr_name: String::new(),
    };

    /// Create a new config.
    pub fn new(emit_ids: bool, emit_keys: bool) -> Self {
        Self {
            emit_ids,
            emit_keys,
            id_attr_name: DEFAULT_ID_ATTR.to_string(),
        }
    }

    /// Set custom attribute name for node handles.
    pub fn with_id_attr(mut self, attr_name: impl Into<String>) -> Self {
        self.id_attr_name = attr_name.into();
        self
    }

    /// Get the attribute name for node handles.
    pub fn id_attr(&self) -> &str {
        if self.id_attr_name.is_empty() {
            DEFAULT_ID_ATTR
        } else {
            &self.id_attr_name
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new(false, true)
    }
}

// =============================================================================
// Node rendering
// =============================================================================

/// Render a node description with the default config (keys, no handles).
pub fn render_node(node: &Node) -> String {
    render_node_with(node, &RenderConfig::default())
}

/// Render a node description.
pub fn render_node_with(node: &Node, config: &RenderConfig) -> String {
    let mut output = String::new();
    write_node(node, config, &mut output);
    output
}

fn write_node(node: &Node, config: &RenderConfig, output: &mut String) {
    match node {
        Node::Element(elem) => write_element(elem, config, output),
        Node::Text(text) => escape_html_into(&text.content, output),
    }
}

fn write_element(elem: &Element, config: &RenderConfig, output: &mut String) {
    open_tag(&elem.tag, elem.key.as_deref(), &elem.attrs, None, config, output);
    if elem.children.is_empty() {
        output.push_str(" />");
        return;
    }
    output.push('>');
    for child in &elem.children {
        write_node(child, config, output);
    }
    close_tag(&elem.tag, output);
}

// =============================================================================
// Live rendering
// =============================================================================

/// Render a live subtree. Returns `None` for a stale handle.
pub fn render_live(tree: &LiveTree, id: NodeId, config: &RenderConfig) -> Option<String> {
    tree.node(id)?;
    let mut output = String::new();
    write_live(tree, id, config, &mut output);
    Some(output)
}

fn write_live(tree: &LiveTree, id: NodeId, config: &RenderConfig, output: &mut String) {
    match tree.node(id) {
        Some(LiveNode::Element(elem)) => {
            let handle = config.emit_ids.then_some(id);
            open_tag(elem.tag(), elem.key(), elem.attrs(), handle, config, output);
            if elem.children().is_empty() {
                output.push_str(" />");
                return;
            }
            output.push('>');
            for &child in elem.children() {
                write_live(tree, child, config, output);
            }
            close_tag(elem.tag(), output);
        }
        Some(LiveNode::Text(text)) => escape_html_into(text.content(), output),
        None => {}
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn open_tag(
    tag: &str,
    key: Option<&str>,
    attrs: &Attrs,
    handle: Option<NodeId>,
    config: &RenderConfig,
    output: &mut String,
) {
    output.push('<');
    output.push_str(tag);
    if let Some(key) = key.filter(|_| config.emit_keys) {
        push_attr("key", key, output);
    }
    if let Some(id) = handle {
        push_attr(config.id_attr(), &id.to_string(), output);
    }
    for (name, value) in attrs.iter() {
        push_attr(name, value, output);
    }
}

fn close_tag(tag: &str, output: &mut String) {
    output.push_str("</");
    output.push_str(tag);
    output.push('>');
}

fn push_attr(name: &str, value: &str, output: &mut String) {
    output.push(' ');
    output.push_str(name);
    output.push_str("=\"");
    escape_attr_into(value, output);
    output.push('"');
}

/// Escape HTML special characters.
fn escape_html_into(s: &str, output: &mut String) {
    for c in s.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
}

/// Escape attribute value special characters.
fn escape_attr_into(s: &str, output: &mut String) {
    for c in s.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> Node {
        Element::new("ul")
            .attr("class", "items")
            .child(Element::new("li").with_key("1").text("A & B"))
            .child(Element::new("br"))
            .into()
    }

    #[test]
    fn test_render_node() {
        assert_eq!(
            render_node(&list()),
            "<ul class=\"items\"><li key=\"1\">A &amp; B</li><br /></ul>"
        );
    }

    #[test]
    fn test_render_plain_drops_keys() {
        let html = render_node_with(&list(), &RenderConfig::PLAIN);
        assert!(!html.contains("key="));
    }

    #[test]
    fn test_render_live_matches_description() {
        let mut tree = LiveTree::new();
        let root = tree.mount(&list());
        assert_eq!(render_live(&tree, root, &RenderConfig::default()), Some(render_node(&list())));
    }

    #[test]
    fn test_render_live_with_handles() {
        let mut tree = LiveTree::new();
        let root = tree.mount(&Element::new("div").into());
        let html = render_live(&tree, root, &RenderConfig::DEBUG).unwrap_or_default();
        assert_eq!(html, format!("<div data-node-id=\"{root}\" />"));

        let custom = RenderConfig::new(true, false).with_id_attr("data-h");
        let html = render_live(&tree, root, &custom).unwrap_or_default();
        assert!(html.contains("data-h="));
    }

    #[test]
    fn test_escape_attr() {
        let node: Node = Element::new("a").attr("title", "say \"hi\"").into();
        assert_eq!(render_node(&node), "<a title=\"say &quot;hi&quot;\" />");
    }
}
