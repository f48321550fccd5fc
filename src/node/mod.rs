//! Node descriptions: the "new" side of a diff.
//!
//! A `Node` tree is what the caller builds for every update cycle. It is
//! plain owned data: the diff engine borrows it, clones the pieces that must
//! outlive the call (inserted and replacement subtrees), and the caller drops
//! it afterwards.

mod element;
mod text;

pub use element::Element;
pub use text::Text;

use smallvec::SmallVec;

use crate::algo::hash;
use crate::attr::TextContent;

/// Node in a tree description - either Element or Text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Box<Element>),
    Text(Text),
}

/// Type alias for children collection.
pub type Children = SmallVec<[Node; 8]>;

impl Node {
    /// Create a text node.
    #[inline]
    pub fn text(content: impl Into<TextContent>) -> Self {
        Node::Text(Text::new(content))
    }

    /// Check if this is an element node.
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    /// Check if this is a text node.
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    /// Get as element reference.
    #[inline]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get as mutable element reference.
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get as text reference.
    #[inline]
    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Node::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Identity key (elements only).
    #[inline]
    pub fn key(&self) -> Option<&str> {
        match self {
            Node::Element(e) => e.key.as_deref(),
            Node::Text(_) => None,
        }
    }

    /// Child nodes; empty for text.
    #[inline]
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(e) => &e.children,
            Node::Text(_) => &[],
        }
    }

    /// Number of nodes in this subtree, including self.
    pub fn subtree_len(&self) -> usize {
        1 + self.children().iter().map(Node::subtree_len).sum::<usize>()
    }

    /// Deterministic structural hash of this subtree.
    ///
    /// Equal trees hash equal across processes, and a live subtree with the
    /// same shape produces the same value (see `LiveTree::fingerprint`).
    pub fn fingerprint(&self) -> u64 {
        match self {
            Node::Text(t) => hash::text_fingerprint(&t.content),
            Node::Element(e) => hash::element_fingerprint(
                &e.tag,
                e.key.as_deref(),
                &e.attrs,
                e.children.iter().map(Node::fingerprint),
            ),
        }
    }
}

impl From<Element> for Node {
    fn from(elem: Element) -> Self {
        Node::Element(Box::new(elem))
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_accessors() {
        let node: Node = Element::new("li").with_key("1").text("A").into();
        assert!(node.is_element());
        assert_eq!(node.key(), Some("1"));
        assert_eq!(node.children().len(), 1);
        assert_eq!(node.subtree_len(), 2);

        let text = Node::text("hi");
        assert!(text.is_text());
        assert_eq!(text.key(), None);
        assert!(text.children().is_empty());
        assert_eq!(text.as_text().map(|t| t.content.as_str()), Some("hi"));
    }

    #[test]
    fn test_fingerprint_tracks_structure() {
        let a: Node = Element::new("p").attr("class", "x").text("hello").into();
        let b: Node = Element::new("p").attr("class", "x").text("hello").into();
        let c: Node = Element::new("p").attr("class", "y").text("hello").into();
        let d: Node = Element::new("p").attr("class", "x").with_key("k").text("hello").into();

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_ne!(a.fingerprint(), d.fingerprint());
        assert_ne!(Node::text("ab").fingerprint(), Node::text("a").fingerprint());
    }
}
