//! Algorithm implementations for reconciliation.
//!
//! - `diff`: tree diff producing patches
//! - `keyed`: keyed child reconciliation on top of `lcs`
//! - `lcs`: longest common subsequence over sibling identities
//! - `hash`: stable hashing for subtree fingerprints

mod diff;
pub(crate) mod hash;
mod keyed;
mod lcs;

pub use diff::{diff, diff_many, diff_with_config, DiffConfig, DiffResult, DiffStats};
pub use hash::StableHasher;
pub use lcs::lcs_pairs;
