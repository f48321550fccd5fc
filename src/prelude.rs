//! Prelude module for common imports.
//!
//! ```
//! use tola_reconcile::prelude::*;
//! ```

// Node types
pub use crate::node::{Children, Element, Node, Text};

// Attributes
pub use crate::attr::{AttrKey, AttrValue, Attrs, AttrsExt, Key, Tag, TextContent};

// Identity
pub use crate::id::NodeId;

// Live tree
pub use crate::tree::{LiveNode, LiveTree};

// Patches
pub use crate::patch::{Patch, PatchKind};

// Algorithms
pub use crate::algo::{diff, diff_many, diff_with_config, DiffConfig, DiffResult, DiffStats};

// Batching
pub use crate::batch::{order, BatchConfig, Batcher, PatchBatch, Scheduler, Submission, TickQueue};

// Apply
pub use crate::apply::{apply, reconcile, ApplyStats, HostOps, Insertion};

// Render
pub use crate::render::{render_live, render_node, RenderConfig};

// Error
pub use crate::error::{ReconcileError, ReconcileResult, TreeError};

// Serialization
#[cfg(feature = "serialize")]
pub use crate::serialize::{from_bytes, to_bytes, SCHEMA_VERSION};
