//! Element type - tagged nodes with attributes and children

use crate::attr::{AttrKey, AttrValue, Attrs, AttrsExt, Key, Tag, TextContent};

use super::{Children, Node, Text};

// =============================================================================
// Element
// =============================================================================

/// Element with tag, optional identity key, attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag identifier
    pub tag: Tag,
    /// Identity key for stable matching among siblings
    pub key: Option<Key>,
    /// Element attributes, in insertion order
    pub attrs: Attrs,
    /// Child nodes
    pub children: Children,
}

impl Element {
    /// Create an element without key, attributes or children
    pub fn new(tag: impl Into<Tag>) -> Self {
        Self {
            tag: tag.into(),
            key: None,
            attrs: Attrs::new(),
            children: Children::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder API
    // ─────────────────────────────────────────────────────────────────────────

    /// Set the identity key (builder pattern)
    pub fn with_key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Add an attribute (builder pattern)
    pub fn attr(mut self, name: impl Into<AttrKey>, value: impl Into<AttrValue>) -> Self {
        self.attrs.set_attr(name, value);
        self
    }

    /// Add a child element or node (builder pattern)
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Add several children (builder pattern)
    pub fn children<I>(mut self, nodes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Add a text child (builder pattern)
    pub fn text(mut self, content: impl Into<TextContent>) -> Self {
        self.children.push(Node::Text(Text::new(content)));
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Attribute access
    // ─────────────────────────────────────────────────────────────────────────

    /// Get attribute value by name
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get_attr(name)
    }

    /// Set attribute value (update if exists, add if not)
    pub fn set_attr(&mut self, name: impl Into<AttrKey>, value: impl Into<AttrValue>) {
        self.attrs.set_attr(name, value);
    }

    /// Remove attribute by name, returning the old value if it existed
    pub fn remove_attr(&mut self, name: &str) -> Option<AttrValue> {
        self.attrs.remove_attr(name)
    }

    /// Check if attribute exists
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.has_attr(name)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Other helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Check if element has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of direct children (all node types)
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Whether any direct child carries a key
    pub fn has_keyed_children(&self) -> bool {
        self.children.iter().any(|c| c.key().is_some())
    }

    /// Get text content of this element (concatenated from all text nodes)
    pub fn text_content(&self) -> String {
        let mut result = String::new();
        self.collect_text(&mut result);
        result
    }

    fn collect_text(&self, buf: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => buf.push_str(&t.content),
                Node::Element(e) => e.collect_text(buf),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_builder() {
        let elem = Element::new("ul")
            .attr("class", "list")
            .child(Element::new("li").with_key("1").text("A"))
            .child(Element::new("li").with_key("2").text("B"));

        assert_eq!(elem.tag, "ul");
        assert_eq!(elem.key, None);
        assert_eq!(elem.get_attr("class"), Some("list"));
        assert_eq!(elem.child_count(), 2);
        assert!(elem.has_keyed_children());
        assert_eq!(elem.text_content(), "AB");
    }

    #[test]
    fn test_element_attrs() {
        let mut elem = Element::new("div");
        elem.set_attr("id", "main");
        assert!(elem.has_attr("id"));
        assert_eq!(elem.remove_attr("id").as_deref(), Some("main"));
        assert!(!elem.has_attr("id"));
        assert!(elem.is_empty());
    }

    #[test]
    fn test_children_from_iter() {
        let elem = Element::new("ol").children(["a", "b", "c"].map(|k| Element::new("li").with_key(k)));
        assert_eq!(elem.child_count(), 3);
        assert_eq!(elem.children[2].key(), Some("c"));
    }
}
