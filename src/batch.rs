//! Patch ordering and batch scheduling
//!
//! [`order`] puts a patch list into application order. [`Batcher`] decides
//! per batch whether to apply now or hand the batch to a caller-supplied
//! [`Scheduler`]; nothing here owns a timer or a thread.
//!
//! ```text
//! diff -> Batcher::submit(patches, host, scheduler)
//!           |-- len <= threshold, nothing queued --> apply now
//!           `-- otherwise ---------------------------> scheduler.defer(batch)
//!                                                        ... next tick ...
//!                                                        batch.apply(host)
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::apply::{apply, ApplyStats, HostOps};
use crate::patch::Patch;

/// Batches longer than this are deferred by default.
pub const DEFAULT_DEFER_THRESHOLD: usize = 50;

/// Stable sort into application order:
/// `Remove < Move < Add < Replace < Attribute/RemoveAttribute < Text`.
///
/// Patches of the same class keep their emission order, which the keyed
/// reconciler relies on for move and insert positions.
pub fn order(mut patches: Vec<Patch>) -> Vec<Patch> {
    patches.sort_by_key(Patch::kind);
    patches
}

// =============================================================================
// Configuration
// =============================================================================

/// Batching policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    /// Batches with more patches than this are deferred. Default: 50
    pub defer_threshold: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            defer_threshold: DEFAULT_DEFER_THRESHOLD,
        }
    }
}

impl BatchConfig {
    pub fn new(defer_threshold: usize) -> Self {
        Self { defer_threshold }
    }

    /// Never defer.
    pub fn immediate() -> Self {
        Self {
            defer_threshold: usize::MAX,
        }
    }

    /// Builder-style threshold override.
    pub fn with_defer_threshold(mut self, defer_threshold: usize) -> Self {
        self.defer_threshold = defer_threshold;
        self
    }

    /// Whether a batch of `len` patches goes to the scheduler
    #[inline]
    pub fn should_defer(&self, len: usize) -> bool {
        len > self.defer_threshold
    }
}

// =============================================================================
// PatchBatch
// =============================================================================

/// An ordered patch list, ready to apply
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct PatchBatch {
    patches: Vec<Patch>,
}

impl PatchBatch {
    /// Order `patches` into a batch.
    pub fn new(patches: Vec<Patch>) -> Self {
        Self {
            patches: order(patches),
        }
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    pub fn into_patches(self) -> Vec<Patch> {
        self.patches
    }

    /// Apply the whole batch to `host`.
    pub fn apply<H: HostOps + ?Sized>(self, host: &mut H) -> Result<ApplyStats, H::Error> {
        apply(self.patches, host)
    }
}

// =============================================================================
// Scheduler
// =============================================================================

/// Host-side deferral primitive ("next tick", "before next paint", ...).
///
/// Any `FnMut(PatchBatch)` is a scheduler.
pub trait Scheduler {
    /// Take ownership of a batch to apply later.
    fn defer(&mut self, batch: PatchBatch);

    /// Whether earlier batches are still waiting. While they are, new
    /// batches are deferred too so updates stay in submission order.
    fn has_pending(&self) -> bool {
        false
    }
}

impl<F: FnMut(PatchBatch)> Scheduler for F {
    fn defer(&mut self, batch: PatchBatch) {
        self(batch)
    }
}

/// Outcome of [`Batcher::submit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Applied synchronously
    Applied(ApplyStats),
    /// Handed to the scheduler
    Deferred { patches: usize },
}

/// Applies small batches immediately and defers large ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct Batcher {
    config: BatchConfig,
}

impl Batcher {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> BatchConfig {
        self.config
    }

    /// Order `patches` and either apply them to `host` now or defer them.
    pub fn submit<H, S>(
        &self,
        patches: Vec<Patch>,
        host: &mut H,
        scheduler: &mut S,
    ) -> Result<Submission, H::Error>
    where
        H: HostOps + ?Sized,
        S: Scheduler + ?Sized,
    {
        let batch = PatchBatch::new(patches);
        let len = batch.len();

        if self.config.should_defer(len) || scheduler.has_pending() {
            log::trace!(target: "tola_reconcile::batch", "deferring batch of {len} patches");
            scheduler.defer(batch);
            return Ok(Submission::Deferred { patches: len });
        }

        log::trace!(target: "tola_reconcile::batch", "applying batch of {len} patches");
        batch.apply(host).map(Submission::Applied)
    }
}

// =============================================================================
// TickQueue
// =============================================================================

/// Shared FIFO of deferred batches.
///
/// Clones share the queue: hand one clone to the [`Batcher`] and drain
/// another from the host's tick callback.
#[derive(Debug, Clone, Default)]
pub struct TickQueue {
    inner: Arc<Mutex<VecDeque<PatchBatch>>>,
}

impl TickQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a batch.
    pub fn push(&self, batch: PatchBatch) {
        self.inner.lock().push_back(batch);
    }

    /// Number of queued batches.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply queued batches in submission order.
    ///
    /// The lock is released while each batch is applied. On error, the
    /// failing batch is dropped and the rest stay queued.
    pub fn drain_into<H: HostOps + ?Sized>(&self, host: &mut H) -> Result<ApplyStats, H::Error> {
        let mut stats = ApplyStats::default();
        loop {
            let next = self.inner.lock().pop_front();
            let Some(batch) = next else {
                break;
            };
            stats.merge(batch.apply(host)?);
        }
        Ok(stats)
    }
}

impl Scheduler for TickQueue {
    fn defer(&mut self, batch: PatchBatch) {
        self.push(batch);
    }

    fn has_pending(&self) -> bool {
        !self.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::diff;
    use crate::id::NodeId;
    use crate::node::{Element, Node};
    use crate::patch::PatchKind;
    use crate::tree::LiveTree;

    fn list(keys: &[&str]) -> Node {
        Element::new("ul")
            .children(keys.iter().map(|k| Element::new("li").with_key(*k).text(*k)))
            .into()
    }

    fn id(index: u32) -> NodeId {
        NodeId::new(index, 0)
    }

    #[test]
    fn test_order_by_kind() {
        let patches = vec![
            Patch::Text {
                target: id(1),
                content: "t".into(),
            },
            Patch::Attribute {
                target: id(1),
                name: "a".into(),
                value: "b".into(),
            },
            Patch::Add {
                parent: id(0),
                node: Node::text("x"),
                index: 0,
            },
            Patch::Replace {
                target: id(2),
                node: Node::text("y"),
            },
            Patch::RemoveAttribute {
                target: id(1),
                name: "c".into(),
            },
            Patch::Move {
                target: id(3),
                parent: id(0),
                index: 0,
            },
            Patch::Remove { target: id(4) },
        ];
        let kinds: Vec<PatchKind> = order(patches).iter().map(Patch::kind).collect();
        assert_eq!(
            kinds,
            [
                PatchKind::Remove,
                PatchKind::Move,
                PatchKind::Add,
                PatchKind::Replace,
                PatchKind::Attribute,
                PatchKind::Attribute,
                PatchKind::Text,
            ]
        );
    }

    #[test]
    fn test_order_is_stable_within_kind() {
        let adds: Vec<Patch> = (0..5)
            .map(|i| Patch::Add {
                parent: id(0),
                node: Node::text("x"),
                index: i,
            })
            .collect();
        assert_eq!(order(adds.clone()), adds);
    }

    #[test]
    fn test_config() {
        let config = BatchConfig::default();
        assert_eq!(config.defer_threshold, 50);
        assert!(!config.should_defer(50));
        assert!(config.should_defer(51));
        assert!(!BatchConfig::immediate().should_defer(10_000));
        assert_eq!(BatchConfig::new(3).with_defer_threshold(7).defer_threshold, 7);
    }

    #[test]
    fn test_small_batch_applies_now() {
        let mut tree = LiveTree::new();
        let root = tree.mount(&list(&["a"]));
        let patches = diff(&tree, Some(root), Some(&list(&["a", "b"]))).patches;

        let mut deferred = Vec::new();
        let outcome = Batcher::default()
            .submit(patches, &mut tree, &mut |batch: PatchBatch| deferred.push(batch))
            .unwrap();

        assert!(matches!(outcome, Submission::Applied(stats) if stats.applied == 1));
        assert!(deferred.is_empty());
        assert_eq!(tree.snapshot(root), Some(list(&["a", "b"])));
    }

    #[test]
    fn test_large_batch_is_deferred() {
        let mut tree = LiveTree::new();
        let root = tree.mount(&list(&[]));
        let keys: Vec<String> = (0..60).map(|i| i.to_string()).collect();
        let new = list(&keys.iter().map(String::as_str).collect::<Vec<_>>());
        let patches = diff(&tree, Some(root), Some(&new)).patches;

        let mut queue = TickQueue::new();
        let outcome = Batcher::default().submit(patches, &mut tree, &mut queue).unwrap();

        assert_eq!(outcome, Submission::Deferred { patches: 60 });
        assert_eq!(queue.len(), 1);
        // Nothing touched the tree yet
        assert_eq!(tree.children(root).len(), 0);

        let stats = queue.drain_into(&mut tree).unwrap();
        assert_eq!(stats.applied, 60);
        assert!(queue.is_empty());
        assert_eq!(tree.snapshot(root), Some(new));
    }

    #[test]
    fn test_pending_batches_keep_fifo_order() {
        let mut tree = LiveTree::new();
        let root = tree.mount(&list(&["a"]));
        let mut queue = TickQueue::new();
        let batcher = Batcher::new(BatchConfig::new(1));

        // Two patches: over the threshold, deferred
        let first = diff(&tree, Some(root), Some(&list(&["a", "b", "c"]))).patches;
        let outcome = batcher.submit(first, &mut tree, &mut queue).unwrap();
        assert!(matches!(outcome, Submission::Deferred { .. }));

        // Small, but must wait behind the first batch
        let second = vec![Patch::Attribute {
            target: root,
            name: "class".into(),
            value: "done".into(),
        }];
        let outcome = batcher.submit(second, &mut tree, &mut queue).unwrap();
        assert_eq!(outcome, Submission::Deferred { patches: 1 });
        assert_eq!(queue.len(), 2);

        let stats = queue.drain_into(&mut tree).unwrap();
        assert_eq!(stats.applied, 3);
        let expected: Node = Element::new("ul")
            .attr("class", "done")
            .children(["a", "b", "c"].map(|k| Element::new("li").with_key(k).text(k)))
            .into();
        assert_eq!(tree.snapshot(root), Some(expected));
    }

    #[test]
    fn test_tick_queue_clones_share_state() {
        let queue = TickQueue::new();
        let handle = queue.clone();
        handle.push(PatchBatch::new(Vec::new()));
        assert_eq!(queue.len(), 1);

        static_assertions::assert_impl_all!(TickQueue: Send, Sync);
    }

    #[test]
    fn test_batch_orders_on_construction() {
        let batch = PatchBatch::new(vec![
            Patch::Text {
                target: id(1),
                content: "t".into(),
            },
            Patch::Remove { target: id(2) },
        ]);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.patches()[0].kind(), PatchKind::Remove);
        assert_eq!(batch.into_patches()[1].kind(), PatchKind::Text);
    }
}
