//! Binary encoding of patch lists.
//!
//! Lets a patch list computed in one process (or thread) be shipped to the
//! host that owns the live tree. Node handles are plain integers, so they
//! stay meaningful as long as the receiving tree is the one that was diffed.
//!
//! Uses a flat format to avoid recursive types in rkyv: every subtree
//! carried by `Add`/`Replace` is flattened in pre-order into one node table
//! and referenced by index.

use crate::attr::{AttrKey, AttrValue, Attrs};
use crate::error::{ReconcileError, ReconcileResult};
use crate::id::NodeId;
use crate::node::{Children, Element, Node, Text};
use crate::patch::Patch;

/// Current schema version.
/// Increment this when making breaking changes to `SerPatchList`.
pub const SCHEMA_VERSION: u32 = 1;

/// Magic bytes for encoded patch lists.
const MAGIC: [u8; 4] = *b"TRPL";

mod concrete {
    //! Concrete serialization types using a flat structure.

    use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};

    /// Serializable patch list with flat node storage.
    #[derive(Archive, RkyvSerialize, RkyvDeserialize, Debug)]
    pub struct SerPatchList {
        /// Magic bytes for validation
        pub magic: [u8; 4],
        /// Schema version for compatibility checking
        pub schema_version: u32,
        pub patches: Vec<SerPatch>,
        /// Every carried subtree, flattened in pre-order
        pub nodes: Vec<SerNode>,
    }

    /// Patch with handles as raw `u64` and subtrees as node table indices.
    #[derive(Archive, RkyvSerialize, RkyvDeserialize, Debug)]
    pub enum SerPatch {
        Text { target: u64, content: String },
        Attribute { target: u64, name: String, value: String },
        RemoveAttribute { target: u64, name: String },
        Replace { target: u64, node: u32 },
        Add { parent: u64, node: u32, index: u64 },
        Remove { target: u64 },
        Move { target: u64, parent: u64, index: u64 },
    }

    /// Serializable node. `tag: None` marks a text node.
    #[derive(Archive, RkyvSerialize, RkyvDeserialize, Debug)]
    pub struct SerNode {
        pub tag: Option<String>,
        pub key: Option<String>,
        pub attrs: Vec<(String, String)>,
        pub text: String,
        pub children: Vec<u32>,
    }
}

pub use concrete::{SerNode, SerPatch, SerPatchList};

use rkyv::rancor::Error as RkyvError;

/// Serialize a patch list to bytes.
pub fn to_bytes(patches: &[Patch]) -> ReconcileResult<Vec<u8>> {
    let list = to_serializable(patches);
    let bytes = rkyv::to_bytes::<RkyvError>(&list)?;
    Ok(bytes.to_vec())
}

/// Deserialize a patch list.
///
/// # Errors
///
/// Returns an error if:
/// - Magic bytes don't match (not an encoded patch list)
/// - Schema version is incompatible
/// - Archive data is corrupted
pub fn from_bytes(bytes: &[u8]) -> ReconcileResult<Vec<Patch>> {
    // Archived data must be aligned; callers hand us arbitrary slices
    let mut aligned = rkyv::util::AlignedVec::<16>::with_capacity(bytes.len());
    aligned.extend_from_slice(bytes);

    let list = rkyv::from_bytes::<SerPatchList, RkyvError>(&aligned)?;

    if list.magic != MAGIC {
        return Err(ReconcileError::InvalidMagic {
            expected: MAGIC,
            found: list.magic,
        });
    }
    if list.schema_version != SCHEMA_VERSION {
        return Err(ReconcileError::VersionMismatch {
            expected: SCHEMA_VERSION,
            found: list.schema_version,
        });
    }

    from_serializable(list)
}

// =============================================================================
// Conversion functions
// =============================================================================

fn to_serializable(patches: &[Patch]) -> SerPatchList {
    let mut nodes = Vec::new();
    let patches = patches
        .iter()
        .map(|patch| match patch {
            Patch::Text { target, content } => SerPatch::Text {
                target: target.as_raw(),
                content: content.to_string(),
            },
            Patch::Attribute {
                target,
                name,
                value,
            } => SerPatch::Attribute {
                target: target.as_raw(),
                name: name.to_string(),
                value: value.to_string(),
            },
            Patch::RemoveAttribute { target, name } => SerPatch::RemoveAttribute {
                target: target.as_raw(),
                name: name.to_string(),
            },
            Patch::Replace { target, node } => SerPatch::Replace {
                target: target.as_raw(),
                node: flatten_node(node, &mut nodes),
            },
            Patch::Add {
                parent,
                node,
                index,
            } => SerPatch::Add {
                parent: parent.as_raw(),
                node: flatten_node(node, &mut nodes),
                index: *index as u64,
            },
            Patch::Remove { target } => SerPatch::Remove {
                target: target.as_raw(),
            },
            Patch::Move {
                target,
                parent,
                index,
            } => SerPatch::Move {
                target: target.as_raw(),
                parent: parent.as_raw(),
                index: *index as u64,
            },
        })
        .collect();

    SerPatchList {
        magic: MAGIC,
        schema_version: SCHEMA_VERSION,
        patches,
        nodes,
    }
}

fn flatten_node(node: &Node, nodes: &mut Vec<SerNode>) -> u32 {
    // Reserve our index
    let idx = nodes.len() as u32;

    match node {
        Node::Text(text) => {
            nodes.push(SerNode {
                tag: None,
                key: None,
                attrs: Vec::new(),
                text: text.content.to_string(),
                children: Vec::new(),
            });
        }
        Node::Element(elem) => {
            // Placeholder, children filled in below
            nodes.push(SerNode {
                tag: Some(elem.tag.to_string()),
                key: elem.key.as_ref().map(ToString::to_string),
                attrs: elem
                    .attrs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                text: String::new(),
                children: Vec::new(),
            });
            let children = elem
                .children
                .iter()
                .map(|child| flatten_node(child, nodes))
                .collect();
            nodes[idx as usize].children = children;
        }
    }
    idx
}

fn from_serializable(list: SerPatchList) -> ReconcileResult<Vec<Patch>> {
    let nodes = &list.nodes;
    let mut used = vec![false; nodes.len()];
    list.patches
        .iter()
        .map(|patch| {
            Ok(match patch {
                SerPatch::Text { target, content } => Patch::Text {
                    target: NodeId::from_raw(*target),
                    content: content.as_str().into(),
                },
                SerPatch::Attribute {
                    target,
                    name,
                    value,
                } => Patch::Attribute {
                    target: NodeId::from_raw(*target),
                    name: AttrKey::from(name.as_str()),
                    value: AttrValue::from(value.as_str()),
                },
                SerPatch::RemoveAttribute { target, name } => Patch::RemoveAttribute {
                    target: NodeId::from_raw(*target),
                    name: AttrKey::from(name.as_str()),
                },
                SerPatch::Replace { target, node } => Patch::Replace {
                    target: NodeId::from_raw(*target),
                    node: rebuild_node(nodes, *node, None, &mut used)?,
                },
                SerPatch::Add {
                    parent,
                    node,
                    index,
                } => Patch::Add {
                    parent: NodeId::from_raw(*parent),
                    node: rebuild_node(nodes, *node, None, &mut used)?,
                    index: to_index(*index)?,
                },
                SerPatch::Remove { target } => Patch::Remove {
                    target: NodeId::from_raw(*target),
                },
                SerPatch::Move {
                    target,
                    parent,
                    index,
                } => Patch::Move {
                    target: NodeId::from_raw(*target),
                    parent: NodeId::from_raw(*parent),
                    index: to_index(*index)?,
                },
            })
        })
        .collect()
}

/// Rebuild the subtree at `idx`. Children must come after their parent in
/// the table and every entry may be referenced once, which rules out cycles
/// and shared subtrees.
fn rebuild_node(
    nodes: &[SerNode],
    idx: u32,
    parent: Option<u32>,
    used: &mut [bool],
) -> ReconcileResult<Node> {
    if let Some(parent) = parent.filter(|&parent| idx <= parent) {
        return Err(ReconcileError::corrupted(format!(
            "node {idx} listed as a child of node {parent}"
        )));
    }
    let ser = nodes
        .get(idx as usize)
        .ok_or_else(|| ReconcileError::corrupted(format!("node index {idx} out of range")))?;
    let seen = &mut used[idx as usize];
    if *seen {
        return Err(ReconcileError::corrupted(format!("node {idx} referenced twice")));
    }
    *seen = true;

    let Some(tag) = &ser.tag else {
        return Ok(Node::Text(Text::new(ser.text.as_str())));
    };

    let attrs: Attrs = ser
        .attrs
        .iter()
        .map(|(k, v)| (AttrKey::from(k.as_str()), AttrValue::from(v.as_str())))
        .collect();
    let children = ser
        .children
        .iter()
        .map(|&child| rebuild_node(nodes, child, Some(idx), used))
        .collect::<ReconcileResult<Children>>()?;

    Ok(Node::Element(Box::new(Element {
        tag: tag.as_str().into(),
        key: ser.key.as_deref().map(Into::into),
        attrs,
        children,
    })))
}

fn to_index(raw: u64) -> ReconcileResult<usize> {
    usize::try_from(raw).map_err(|_| ReconcileError::corrupted(format!("index {raw} out of range")))
}

// =============================================================================
// Tests
// =============================================================================
