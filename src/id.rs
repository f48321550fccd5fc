//! Handles into the live tree arena
//!
//! A `NodeId` is a slot index plus the generation the slot had when the node
//! was allocated. Freeing a node bumps its slot's generation, so a handle held
//! by a stale patch can never resolve to whatever node reuses the slot later.
//!
//! # Memory Layout
//!
//! - 8 bytes (two u32)
//! - Copy, no heap allocation

use std::fmt;

/// Generational handle to a node in a [`LiveTree`](crate::tree::LiveTree)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[must_use]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    #[inline]
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Rebuild a handle from its packed representation.
    ///
    /// Intended for decoding serialized patches; see [`NodeId::as_raw`].
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self {
            index: raw as u32,
            generation: (raw >> 32) as u32,
        }
    }

    /// Packed representation: generation in the high half, index in the low half.
    #[inline]
    pub const fn as_raw(&self) -> u64 {
        ((self.generation as u64) << 32) | self.index as u64
    }

    /// Slot index in the arena
    #[inline]
    pub const fn index(&self) -> usize {
        self.index as usize
    }

    /// Generation of the slot at allocation time
    #[inline]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generation == 0 {
            write!(f, "#{}", self.index)
        } else {
            write!(f, "#{}v{}", self.index, self.generation)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_roundtrip() {
        let id = NodeId::new(7, 3);
        assert_eq!(NodeId::from_raw(id.as_raw()), id);
        assert_eq!(id.index(), 7);
        assert_eq!(id.generation(), 3);
    }

    #[test]
    fn test_generation_distinguishes_handles() {
        assert_ne!(NodeId::new(1, 0), NodeId::new(1, 1));
    }

    #[test]
    fn test_display() {
        assert_eq!(NodeId::new(4, 0).to_string(), "#4");
        assert_eq!(NodeId::new(4, 2).to_string(), "#4v2");
        assert_eq!(format!("{:?}", NodeId::new(4, 2)), "NodeId(4v2)");
    }

    static_assertions::assert_eq_size!(NodeId, u64);
}
