//! Node payloads stored in the arena

use smallvec::SmallVec;

use crate::attr::{AttrKey, AttrValue, Attrs, AttrsExt, Key, Tag, TextContent};
use crate::id::NodeId;

/// Child handle list of a live element
pub type ChildIds = SmallVec<[NodeId; 8]>;

/// Live node payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveNode {
    Element(LiveElement),
    Text(LiveText),
}

impl LiveNode {
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self, LiveNode::Element(_))
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, LiveNode::Text(_))
    }

    #[inline]
    pub fn as_element(&self) -> Option<&LiveElement> {
        match self {
            LiveNode::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&LiveText> {
        match self {
            LiveNode::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Identity key (elements only)
    #[inline]
    pub fn key(&self) -> Option<&str> {
        self.as_element().and_then(LiveElement::key)
    }
}

/// Live element: children are handles into the same arena
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveElement {
    pub(crate) tag: Tag,
    pub(crate) key: Option<Key>,
    pub(crate) attrs: Attrs,
    pub(crate) children: ChildIds,
}

impl LiveElement {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get_attr(name)
    }

    pub(crate) fn set_attr(&mut self, name: &str, value: &str) {
        self.attrs.set_attr(AttrKey::from(name), AttrValue::from(value));
    }

    pub(crate) fn remove_attr(&mut self, name: &str) -> Option<AttrValue> {
        self.attrs.remove_attr(name)
    }
}

/// Live text node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveText {
    pub(crate) content: TextContent,
}

impl LiveText {
    pub fn content(&self) -> &str {
        &self.content
    }
}
