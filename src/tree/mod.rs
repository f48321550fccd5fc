//! Live tree arena
//!
//! The host-owned "old" side of a diff. Nodes live in a slot vector and are
//! addressed by generational [`NodeId`] handles; patches carry handles, never
//! references, so applying one patch can never leave another dangling.
//!
//! # Layout
//!
//! ```text
//! slots: [ Slot{gen, Some(entry)} | Slot{gen+1, None} | ... ]
//!                                      ^ freed, index on free list
//! entry: { parent: Option<NodeId>, node: LiveNode }
//! ```
//!
//! Detached nodes stay allocated until discarded, so a `Move` can detach a
//! node and re-insert it with the same handle.

mod host;
mod node;

pub use node::{ChildIds, LiveElement, LiveNode, LiveText};

use smallvec::SmallVec;

use crate::algo::hash;
use crate::error::TreeError;
use crate::id::NodeId;
use crate::node::{Element, Node, Text};

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

#[derive(Debug, Clone)]
struct Entry {
    parent: Option<NodeId>,
    node: LiveNode,
}

// =============================================================================
// LiveTree
// =============================================================================

/// Arena-backed mutable tree
#[derive(Debug, Clone, Default)]
pub struct LiveTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl LiveTree {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of allocated nodes (attached or detached)
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the arena holds no nodes
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `id` resolves to an allocated node
    pub fn contains(&self, id: NodeId) -> bool {
        self.entry(id).is_some()
    }

    /// Resolve a handle
    pub fn node(&self, id: NodeId) -> Option<&LiveNode> {
        self.entry(id).map(|e| &e.node)
    }

    /// Parent of `id`, `None` for roots, detached and stale handles
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entry(id).and_then(|e| e.parent)
    }

    /// Child handles of `id`; empty for text nodes and stale handles
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.node(id) {
            Some(LiveNode::Element(e)) => &e.children,
            _ => &[],
        }
    }

    /// Identity key of `id`
    pub fn key(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(LiveNode::key)
    }

    /// Position of `id` in its parent's child list
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Whether `ancestor` is `node` or one of its ancestors
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mount / snapshot
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a detached live subtree from a description and return its root
    pub fn mount(&mut self, node: &Node) -> NodeId {
        self.mount_under(node, None)
    }

    pub(crate) fn mount_under(&mut self, node: &Node, parent: Option<NodeId>) -> NodeId {
        match node {
            Node::Text(text) => self.alloc(
                parent,
                LiveNode::Text(LiveText {
                    content: text.content.clone(),
                }),
            ),
            Node::Element(elem) => {
                let id = self.alloc(
                    parent,
                    LiveNode::Element(LiveElement {
                        tag: elem.tag.clone(),
                        key: elem.key.clone(),
                        attrs: elem.attrs.clone(),
                        children: SmallVec::new(),
                    }),
                );
                let children: ChildIds = elem
                    .children
                    .iter()
                    .map(|child| self.mount_under(child, Some(id)))
                    .collect();
                if let Some(LiveNode::Element(live)) = self.node_mut(id) {
                    live.children = children;
                }
                id
            }
        }
    }

    /// Copy a live subtree back into an owned description
    pub fn snapshot(&self, id: NodeId) -> Option<Node> {
        Some(match self.node(id)? {
            LiveNode::Text(text) => Node::Text(Text::new(text.content.clone())),
            LiveNode::Element(elem) => Node::Element(Box::new(Element {
                tag: elem.tag.clone(),
                key: elem.key.clone(),
                attrs: elem.attrs.clone(),
                children: elem
                    .children
                    .iter()
                    .filter_map(|&child| self.snapshot(child))
                    .collect(),
            })),
        })
    }

    /// Structural equality between a live subtree and a description
    ///
    /// Compares tags, keys, attributes (in order), text and child order.
    pub fn subtree_eq(&self, id: NodeId, node: &Node) -> bool {
        match (self.node(id), node) {
            (Some(LiveNode::Text(live)), Node::Text(text)) => live.content == text.content,
            (Some(LiveNode::Element(live)), Node::Element(elem)) => {
                live.tag == elem.tag
                    && live.key == elem.key
                    && live.attrs == elem.attrs
                    && live.children.len() == elem.children.len()
                    && live
                        .children
                        .iter()
                        .zip(elem.children.iter())
                        .all(|(&child, desc)| self.subtree_eq(child, desc))
            }
            _ => false,
        }
    }

    /// Deterministic structural hash, equal to `Node::fingerprint` of the
    /// same shape
    pub fn fingerprint(&self, id: NodeId) -> Option<u64> {
        Some(match self.node(id)? {
            LiveNode::Text(text) => hash::text_fingerprint(&text.content),
            LiveNode::Element(elem) => hash::element_fingerprint(
                &elem.tag,
                elem.key.as_deref(),
                &elem.attrs,
                elem.children.iter().filter_map(|&child| self.fingerprint(child)),
            ),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Slot management
    // ─────────────────────────────────────────────────────────────────────────

    fn entry(&self, id: NodeId) -> Option<&Entry> {
        let slot = self.slots.get(id.index())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.entry.as_ref()
    }

    fn entry_mut(&mut self, id: NodeId) -> Option<&mut Entry> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.entry.as_mut()
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut LiveNode> {
        self.entry_mut(id).map(|e| &mut e.node)
    }

    fn element(&self, id: NodeId) -> Result<&LiveElement, TreeError> {
        match self.node(id) {
            Some(LiveNode::Element(elem)) => Ok(elem),
            Some(LiveNode::Text(_)) => Err(TreeError::NotAnElement(id)),
            None => Err(TreeError::UnknownNode(id)),
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut LiveElement, TreeError> {
        match self.node_mut(id) {
            Some(LiveNode::Element(elem)) => Ok(elem),
            Some(LiveNode::Text(_)) => Err(TreeError::NotAnElement(id)),
            None => Err(TreeError::UnknownNode(id)),
        }
    }

    fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<(), TreeError> {
        let entry = self.entry_mut(id).ok_or(TreeError::UnknownNode(id))?;
        entry.parent = parent;
        Ok(())
    }

    fn alloc(&mut self, parent: Option<NodeId>, node: LiveNode) -> NodeId {
        self.len += 1;
        let entry = Some(Entry { parent, node });
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.entry = entry;
                NodeId::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    entry,
                });
                NodeId::new(index, 0)
            }
        }
    }

    /// Free `root` and all its descendants, bumping slot generations.
    ///
    /// Does not touch the parent's child list; callers unlink first.
    fn release_subtree(&mut self, root: NodeId) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(slot) = self.slots.get_mut(id.index()) else {
                continue;
            };
            if slot.generation != id.generation() {
                continue;
            }
            if let Some(entry) = slot.entry.take() {
                if let LiveNode::Element(elem) = entry.node {
                    stack.extend(elem.children);
                }
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index() as u32);
                self.len -= 1;
            }
        }
    }

    /// Position of `child` under `parent`, checking the parent link
    fn position(&self, parent: NodeId, child: NodeId) -> Result<usize, TreeError> {
        let entry = self.entry(child).ok_or(TreeError::UnknownNode(child))?;
        if entry.parent != Some(parent) {
            return Err(TreeError::NotAChild { parent, child });
        }
        self.element(parent)?
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(TreeError::NotAChild { parent, child })
    }
}
