//! Patch application through host-supplied mutation primitives
//!
//! Every patch maps onto exactly one primitive, except `Move`, which is a
//! detach followed by an insert of the same node. The applier owns no tree;
//! whatever surface the host drives (the in-memory [`LiveTree`], a widget
//! toolkit, a terminal buffer) sits behind [`HostOps`].
//!
//! # Stale targets
//!
//! A structural patch whose target has no parent at apply time was detached
//! by an earlier patch in the same batch. It is skipped, not reported:
//! conservative diffing may legitimately produce such redundant patches.
//! Leaf patches (`Text`, `Attribute`, `RemoveAttribute`) and `Add` only need
//! their node to still be live, since a root has no parent either.

use crate::algo::diff;
use crate::batch::order;
use crate::error::TreeError;
use crate::id::NodeId;
use crate::node::Node;
use crate::patch::{Patch, PatchKind};
use crate::tree::LiveTree;

// =============================================================================
// Host interface
// =============================================================================

/// Child handed to [`HostOps::insert_child`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// A detached node that already exists on the host (moves)
    Existing(NodeId),
    /// A subtree the host must build (adds)
    Fresh(Node),
}

/// Mutation primitives of a host surface.
///
/// Errors are host-defined and propagate out of [`apply`] unmodified.
pub trait HostOps {
    type Error;

    /// Current parent of `node`, `None` for roots and detached nodes
    fn parent_of(&self, node: NodeId) -> Option<NodeId>;

    /// Whether `node` still exists on the host
    fn is_live(&self, node: NodeId) -> bool;

    fn insert_child(
        &mut self,
        parent: NodeId,
        child: Insertion,
        index: usize,
    ) -> Result<(), Self::Error>;

    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), Self::Error>;

    fn replace_child(&mut self, parent: NodeId, old: NodeId, new: Node) -> Result<(), Self::Error>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), Self::Error>;

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<(), Self::Error>;

    fn set_text(&mut self, node: NodeId, content: &str) -> Result<(), Self::Error>;

    /// Release a node removed by a `Remove` patch. Hosts that free detached
    /// nodes on their own can keep the default no-op.
    fn discard(&mut self, _node: NodeId) -> Result<(), Self::Error> {
        Ok(())
    }
}

// =============================================================================
// Apply
// =============================================================================

/// Counters from one apply run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct ApplyStats {
    /// Patches dispatched to the host
    pub applied: usize,
    /// Patches skipped because their target was stale
    pub skipped: usize,
}

impl ApplyStats {
    /// Fold another run into this one
    pub fn merge(&mut self, other: ApplyStats) {
        self.applied += other.applied;
        self.skipped += other.skipped;
    }
}

/// Apply patches in the given order.
///
/// Callers normally pass the output of [`order`]. An empty list is a no-op.
pub fn apply<H, I>(patches: I, host: &mut H) -> Result<ApplyStats, H::Error>
where
    H: HostOps + ?Sized,
    I: IntoIterator<Item = Patch>,
{
    let mut stats = ApplyStats::default();
    for patch in patches {
        if apply_patch(patch, host)? {
            stats.applied += 1;
        } else {
            stats.skipped += 1;
        }
    }
    Ok(stats)
}

/// Returns `false` when the patch was skipped as stale.
fn apply_patch<H>(patch: Patch, host: &mut H) -> Result<bool, H::Error>
where
    H: HostOps + ?Sized,
{
    log::trace!(target: "tola_reconcile::apply", "{patch}");
    let kind = patch.kind();

    match patch {
        Patch::Remove { target } => {
            let Some(parent) = host.parent_of(target) else {
                return Ok(stale(kind, target));
            };
            host.remove_child(parent, target)?;
            host.discard(target)?;
        }
        Patch::Move {
            target,
            parent,
            index,
        } => {
            let Some(from) = host.parent_of(target) else {
                return Ok(stale(kind, target));
            };
            if !host.is_live(parent) {
                return Ok(stale(kind, parent));
            }
            host.remove_child(from, target)?;
            host.insert_child(parent, Insertion::Existing(target), index)?;
        }
        Patch::Add {
            parent,
            node,
            index,
        } => {
            if !host.is_live(parent) {
                return Ok(stale(kind, parent));
            }
            host.insert_child(parent, Insertion::Fresh(node), index)?;
        }
        Patch::Replace { target, node } => {
            let Some(parent) = host.parent_of(target) else {
                return Ok(stale(kind, target));
            };
            host.replace_child(parent, target, node)?;
        }
        Patch::Attribute {
            target,
            name,
            value,
        } => {
            if !host.is_live(target) {
                return Ok(stale(kind, target));
            }
            host.set_attribute(target, &name, &value)?;
        }
        Patch::RemoveAttribute { target, name } => {
            if !host.is_live(target) {
                return Ok(stale(kind, target));
            }
            host.remove_attribute(target, &name)?;
        }
        Patch::Text { target, content } => {
            if !host.is_live(target) {
                return Ok(stale(kind, target));
            }
            host.set_text(target, &content)?;
        }
    }
    Ok(true)
}

fn stale(kind: PatchKind, target: NodeId) -> bool {
    log::debug!(
        target: "tola_reconcile::apply",
        "skipping {} patch: {target} is detached",
        kind.name()
    );
    false
}

// =============================================================================
// One-shot reconcile
// =============================================================================

/// Diff `root` against `new`, order the patches and apply them synchronously.
///
/// `root` keeps its handle unless its tag or key changed, in which case the
/// `Replace` needs a parent: a root without one is left untouched.
pub fn reconcile(tree: &mut LiveTree, root: NodeId, new: &Node) -> Result<ApplyStats, TreeError> {
    let result = diff(tree, Some(root), Some(new));
    apply(order(result.patches), tree)
}
