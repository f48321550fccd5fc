//! Deterministic hashing utilities for subtree fingerprints
//!
//! Provides cross-process deterministic hashing using blake3.

use crate::attr::{AttrKey, AttrValue};

// =============================================================================
// StableHasher - Builder Pattern
// =============================================================================

/// A deterministic hasher using blake3
///
/// Unlike `std::hash::Hasher`, this produces the same output across
/// process restarts for the same input.
pub struct StableHasher {
    inner: blake3::Hasher,
}

impl StableHasher {
    /// Create a new StableHasher
    #[inline]
    pub fn new() -> Self {
        Self {
            inner: blake3::Hasher::new(),
        }
    }

    /// Update with raw bytes
    #[inline]
    pub fn update(mut self, data: &[u8]) -> Self {
        self.inner.update(data);
        self
    }

    /// Update with a length-prefixed string
    #[inline]
    pub fn update_str(self, s: &str) -> Self {
        self.update_usize(s.len()).update(s.as_bytes())
    }

    /// Update with a u64 value (little-endian)
    #[inline]
    pub fn update_u64(self, v: u64) -> Self {
        self.update(&v.to_le_bytes())
    }

    /// Update with a usize value (little-endian, widened to u64)
    #[inline]
    pub fn update_usize(self, v: usize) -> Self {
        self.update_u64(v as u64)
    }

    /// Finish and return the hash as u64
    ///
    /// Takes the first 8 bytes of blake3 output as little-endian u64.
    #[inline]
    pub fn finish(self) -> u64 {
        let hash = self.inner.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(bytes)
    }
}

impl Default for StableHasher {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Structural fingerprints
// =============================================================================
//
// Shared by `Node::fingerprint` and `LiveTree::fingerprint` so a description
// and a live subtree of the same shape hash identically.

pub(crate) fn text_fingerprint(content: &str) -> u64 {
    StableHasher::new().update(b"T").update_str(content).finish()
}

pub(crate) fn element_fingerprint<I>(
    tag: &str,
    key: Option<&str>,
    attrs: &[(AttrKey, AttrValue)],
    children: I,
) -> u64
where
    I: Iterator<Item = u64>,
{
    let mut hasher = StableHasher::new().update(b"E").update_str(tag);
    hasher = match key {
        Some(key) => hasher.update(b"K").update_str(key),
        None => hasher.update(b"-"),
    };
    hasher = hasher.update_usize(attrs.len());
    for (name, value) in attrs {
        hasher = hasher.update_str(name).update_str(value);
    }
    let mut count = 0usize;
    for child in children {
        hasher = hasher.update_u64(child);
        count += 1;
    }
    hasher.update_usize(count).finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let a = StableHasher::new().update_str("hello").update_u64(7).finish();
        let b = StableHasher::new().update_str("hello").update_u64(7).finish();
        assert_eq!(a, b);
    }

    #[test]
    fn test_length_prefix_separates_fields() {
        let a = StableHasher::new().update_str("ab").update_str("c").finish();
        let b = StableHasher::new().update_str("a").update_str("bc").finish();
        assert_ne!(a, b);
    }

    #[test]
    fn test_text_and_element_never_collide_trivially() {
        assert_ne!(
            text_fingerprint("div"),
            element_fingerprint("div", None, &[], std::iter::empty())
        );
    }
}
