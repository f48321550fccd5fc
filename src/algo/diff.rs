//! Tree diff
//!
//! Compares a subtree of the live tree against a freshly built description
//! and emits the patches that turn one into the other.
//!
//! ```text
//! diff(&tree, Some(root), Some(&new)) -> DiffResult { patches, stats }
//!       |
//!       v
//! order(patches) -> apply(patches, host)
//! ```
//!
//! The live side is read through [`LiveTree`] handles; patches carry those
//! handles plus owned clones of new subtrees, so the description can be
//! dropped as soon as the diff returns.
//!
//! # Node matching
//!
//! - Text vs text: `Text` patch if the content differs.
//! - Element vs element with the same tag and key: attribute diff, then
//!   child diff.
//! - Anything else: `Replace`. A changed key at the same position counts as
//!   a changed identity.
//!
//! # Child diff
//!
//! Cheapest case first:
//!
//! 1. Both sides are a single text node: compare content directly.
//! 2. Old side is empty and new side is a single text node: `Text` on the
//!    parent.
//! 3. Any child on either side carries a key: keyed reconciliation
//!    (see `keyed.rs`).
//! 4. Otherwise walk both lists by index.

use crate::id::NodeId;
use crate::node::{Element, Node};
use crate::patch::Patch;
use crate::tree::{LiveElement, LiveNode, LiveTree};

/// Default maximum depth for recursive diffing before falling back to
/// replacing differing subtrees wholesale.
const DEFAULT_MAX_DIFF_DEPTH: usize = 500;

// =============================================================================
// Public Types
// =============================================================================

/// Configuration for diff limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffConfig {
    /// Element nesting past which a differing subtree is replaced instead of
    /// diffed. Default: 500
    pub max_depth: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DIFF_DEPTH,
        }
    }
}

impl DiffConfig {
    /// Create config with a custom depth limit.
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Config for very deep trees.
    pub fn deep() -> Self {
        Self { max_depth: 2000 }
    }

    /// Config for shallow trees (earlier fallback).
    pub fn shallow() -> Self {
        Self { max_depth: 64 }
    }
}

/// Statistics from a diff run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct DiffStats {
    /// Number of elements compared
    pub elements_compared: usize,
    /// Number of text nodes compared
    pub text_nodes_compared: usize,
    /// Number of nodes matched and kept in place or moved
    pub nodes_kept: usize,
    /// Number of nodes moved
    pub nodes_moved: usize,
    /// Number of subtrees inserted
    pub nodes_added: usize,
    /// Number of subtrees removed
    pub nodes_removed: usize,
    /// Number of nodes replaced
    pub nodes_replaced: usize,
    /// Number of text updates
    pub text_updates: usize,
    /// Number of attribute updates
    pub attr_updates: usize,
}

impl DiffStats {
    /// Fold another run into this one
    pub fn merge(&mut self, other: DiffStats) {
        self.elements_compared += other.elements_compared;
        self.text_nodes_compared += other.text_nodes_compared;
        self.nodes_kept += other.nodes_kept;
        self.nodes_moved += other.nodes_moved;
        self.nodes_added += other.nodes_added;
        self.nodes_removed += other.nodes_removed;
        self.nodes_replaced += other.nodes_replaced;
        self.text_updates += other.text_updates;
        self.attr_updates += other.attr_updates;
    }
}

/// Result of a diff
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct DiffResult {
    /// Generated patches, in emission order (not yet ordered for apply)
    pub patches: Vec<Patch>,
    /// Statistics about the diff
    pub stats: DiffStats,
}

impl DiffResult {
    /// Check if any changes were detected
    pub fn has_changes(&self) -> bool {
        !self.patches.is_empty()
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Diff the live subtree at `old` against `new`.
///
/// - `old` absent: nothing to diff, mounting a root is the caller's job.
/// - `new` absent: the old subtree is removed.
/// - `old` stale: nothing to diff.
pub fn diff(tree: &LiveTree, old: Option<NodeId>, new: Option<&Node>) -> DiffResult {
    diff_with_config(tree, old, new, DiffConfig::default())
}

/// Diff with custom limits.
pub fn diff_with_config(
    tree: &LiveTree,
    old: Option<NodeId>,
    new: Option<&Node>,
    config: DiffConfig,
) -> DiffResult {
    let Some(old) = old else {
        return DiffResult::default();
    };
    if !tree.contains(old) {
        log::debug!(target: "tola_reconcile::diff", "old root {old} is stale, nothing to diff");
        return DiffResult::default();
    }

    let mut ctx = DiffContext::new(tree, config);
    match new {
        Some(new) => ctx.diff_node(old, new),
        None => ctx.remove(old),
    }
    ctx.into_result()
}

/// Diff several independent subtree pairs of the same tree.
///
/// With the `parallel` feature the pairs are diffed on the rayon pool.
/// Results are in input order.
pub fn diff_many(tree: &LiveTree, pairs: &[(NodeId, &Node)]) -> Vec<DiffResult> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        pairs
            .par_iter()
            .map(|&(old, new)| diff(tree, Some(old), Some(new)))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        pairs
            .iter()
            .map(|&(old, new)| diff(tree, Some(old), Some(new)))
            .collect()
    }
}

// =============================================================================
// Internal Context
// =============================================================================

pub(super) struct DiffContext<'a> {
    pub(super) tree: &'a LiveTree,
    patches: Vec<Patch>,
    pub(super) stats: DiffStats,
    depth: usize,
    config: DiffConfig,
}

impl<'a> DiffContext<'a> {
    fn new(tree: &'a LiveTree, config: DiffConfig) -> Self {
        Self {
            tree,
            patches: Vec::new(),
            stats: DiffStats::default(),
            depth: 0,
            config,
        }
    }

    fn into_result(self) -> DiffResult {
        DiffResult {
            patches: self.patches,
            stats: self.stats,
        }
    }

    pub(super) fn push(&mut self, patch: Patch) {
        self.patches.push(patch);
    }

    /// Diff two nodes at the same logical position
    pub(super) fn diff_node(&mut self, old: NodeId, new: &Node) {
        let tree = self.tree;
        let Some(live) = tree.node(old) else {
            return;
        };

        if self.depth > self.config.max_depth {
            self.diff_opaque(old, new);
            return;
        }

        match (live, new) {
            (LiveNode::Text(old_text), Node::Text(new_text)) => {
                self.stats.text_nodes_compared += 1;
                if old_text.content != new_text.content {
                    self.set_text(old, new_text.content.as_str());
                }
                self.stats.nodes_kept += 1;
            }
            (LiveNode::Element(old_elem), Node::Element(new_elem))
                if old_elem.tag == new_elem.tag && old_elem.key == new_elem.key =>
            {
                self.diff_element(old, old_elem, new_elem);
            }
            _ => self.replace(old, new),
        }
    }

    /// Past the depth limit: replace unless structurally equal
    fn diff_opaque(&mut self, old: NodeId, new: &Node) {
        if self.tree.subtree_eq(old, new) {
            self.stats.nodes_kept += 1;
        } else {
            log::debug!(
                target: "tola_reconcile::diff",
                "depth limit {} reached at {old}, replacing subtree",
                self.config.max_depth
            );
            self.replace(old, new);
        }
    }

    fn diff_element(&mut self, id: NodeId, old: &'a LiveElement, new: &Element) {
        self.stats.elements_compared += 1;
        self.diff_attrs(id, old, new);

        self.depth += 1;
        self.diff_children(id, old.children(), &new.children);
        self.depth -= 1;

        self.stats.nodes_kept += 1;
    }

    /// Sets and overwrites in new's order, then removals in old's order
    fn diff_attrs(&mut self, id: NodeId, old: &LiveElement, new: &Element) {
        for (name, value) in &new.attrs {
            if old.get_attr(name) != Some(value.as_str()) {
                self.push(Patch::Attribute {
                    target: id,
                    name: name.clone(),
                    value: value.clone(),
                });
                self.stats.attr_updates += 1;
            }
        }

        for (name, _) in old.attrs() {
            if !new.has_attr(name) {
                self.push(Patch::RemoveAttribute {
                    target: id,
                    name: name.clone(),
                });
                self.stats.attr_updates += 1;
            }
        }
    }

    fn diff_children(&mut self, parent: NodeId, old: &[NodeId], new: &[Node]) {
        if old.is_empty() && new.is_empty() {
            return;
        }

        match (self.single_live_text(old), single_text(new)) {
            (Some((text_id, old_text)), Some(new_text)) => {
                self.stats.text_nodes_compared += 1;
                if old_text != new_text {
                    self.set_text(text_id, new_text);
                }
                self.stats.nodes_kept += 1;
                return;
            }
            (None, Some(new_text)) if old.is_empty() => {
                self.set_text(parent, new_text);
                return;
            }
            _ => {}
        }

        let tree = self.tree;
        let keyed = old.iter().any(|&child| tree.key(child).is_some())
            || new.iter().any(|child| child.key().is_some());
        if keyed {
            self.diff_keyed(parent, old, new);
        } else {
            self.diff_unkeyed(parent, old, new);
        }
    }

    /// Positional walk over unkeyed siblings
    fn diff_unkeyed(&mut self, parent: NodeId, old: &[NodeId], new: &[Node]) {
        let common = old.len().min(new.len());

        for (&old_child, new_child) in old.iter().zip(new) {
            self.diff_node(old_child, new_child);
        }
        for &extra in &old[common..] {
            self.remove(extra);
        }
        for (index, node) in new.iter().enumerate().skip(common) {
            self.add(parent, node, index);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Emit helpers
    // ─────────────────────────────────────────────────────────────────────────

    pub(super) fn remove(&mut self, target: NodeId) {
        self.push(Patch::Remove { target });
        self.stats.nodes_removed += 1;
    }

    pub(super) fn add(&mut self, parent: NodeId, node: &Node, index: usize) {
        self.push(Patch::Add {
            parent,
            node: node.clone(),
            index,
        });
        self.stats.nodes_added += 1;
    }

    fn replace(&mut self, target: NodeId, node: &Node) {
        self.push(Patch::Replace {
            target,
            node: node.clone(),
        });
        self.stats.nodes_replaced += 1;
    }

    fn set_text(&mut self, target: NodeId, content: &str) {
        self.push(Patch::Text {
            target,
            content: content.into(),
        });
        self.stats.text_updates += 1;
    }

    fn single_live_text(&self, children: &[NodeId]) -> Option<(NodeId, &'a str)> {
        let tree = self.tree;
        match children {
            [only] => tree
                .node(*only)
                .and_then(LiveNode::as_text)
                .map(|text| (*only, text.content())),
            _ => None,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn single_text(children: &[Node]) -> Option<&str> {
    match children {
        [Node::Text(text)] => Some(&text.content),
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================
