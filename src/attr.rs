//! Attribute system for tree nodes
//!
//! - Tags, keys, attribute names and values are `CompactString` (inline up to 24 bytes)
//! - Attributes are an ordered `SmallVec` of pairs; insertion order is preserved

use compact_str::CompactString;
use smallvec::SmallVec;

/// Element tag identifier (`div`, `li`, `Button`, ...)
pub type Tag = CompactString;

/// Sibling identity key supplied by the application
pub type Key = CompactString;

/// Attribute name
pub type AttrKey = CompactString;

/// Attribute value
pub type AttrValue = CompactString;

/// Text node content
pub type TextContent = CompactString;

/// Ordered attribute list
///
/// Most elements carry a handful of attributes, so four pairs are kept inline.
pub type Attrs = SmallVec<[(AttrKey, AttrValue); 4]>;

/// Extension trait for attribute operations on Attrs
pub trait AttrsExt {
    /// Get an attribute value by name
    fn get_attr(&self, name: &str) -> Option<&str>;

    /// Check if an attribute exists
    fn has_attr(&self, name: &str) -> bool;

    /// Set an attribute value (update in place if present, append otherwise)
    fn set_attr(&mut self, name: impl Into<AttrKey>, value: impl Into<AttrValue>);

    /// Remove an attribute by name, returning the old value if present
    fn remove_attr(&mut self, name: &str) -> Option<AttrValue>;
}

impl AttrsExt for Attrs {
    fn get_attr(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn has_attr(&self, name: &str) -> bool {
        self.iter().any(|(k, _)| k == name)
    }

    fn set_attr(&mut self, name: impl Into<AttrKey>, value: impl Into<AttrValue>) {
        let name = name.into();
        let value = value.into();
        if let Some(attr) = self.iter_mut().find(|(k, _)| *k == name) {
            attr.1 = value;
        } else {
            self.push((name, value));
        }
    }

    fn remove_attr(&mut self, name: &str) -> Option<AttrValue> {
        self.iter()
            .position(|(k, _)| k == name)
            .map(|pos| self.remove(pos).1)
    }
}

// =============================================================================
// Tests
// =============================================================================
