//! `LiveTree` as a host: the reference implementation of the mutation
//! primitives, used directly by in-memory hosts and by tests.

use crate::apply::{HostOps, Insertion};
use crate::error::TreeError;
use crate::id::NodeId;
use crate::node::Node;

use super::{LiveNode, LiveText, LiveTree};

impl HostOps for LiveTree {
    type Error = TreeError;

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node)
    }

    fn is_live(&self, node: NodeId) -> bool {
        self.contains(node)
    }

    fn insert_child(
        &mut self,
        parent: NodeId,
        child: Insertion,
        index: usize,
    ) -> Result<(), TreeError> {
        let len = self.element(parent)?.children.len();
        if index > len {
            return Err(TreeError::IndexOutOfBounds { parent, index, len });
        }

        let child = match child {
            Insertion::Fresh(node) => self.mount_under(&node, Some(parent)),
            Insertion::Existing(id) => {
                match self.entry(id) {
                    None => return Err(TreeError::UnknownNode(id)),
                    Some(entry) if entry.parent.is_some() => {
                        return Err(TreeError::AlreadyAttached(id));
                    }
                    Some(_) => {}
                }
                if self.is_ancestor_or_self(id, parent) {
                    return Err(TreeError::Cycle { parent, child: id });
                }
                self.set_parent(id, Some(parent))?;
                id
            }
        };

        self.element_mut(parent)?.children.insert(index, child);
        Ok(())
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let pos = self.position(parent, child)?;
        let _removed = self.element_mut(parent)?.children.remove(pos);
        self.set_parent(child, None)
    }

    fn replace_child(&mut self, parent: NodeId, old: NodeId, new: Node) -> Result<(), TreeError> {
        let pos = self.position(parent, old)?;
        let id = self.mount_under(&new, Some(parent));
        self.element_mut(parent)?.children[pos] = id;
        self.release_subtree(old);
        Ok(())
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), TreeError> {
        self.element_mut(node)?.set_attr(name, value);
        Ok(())
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<(), TreeError> {
        self.element_mut(node)?.remove_attr(name);
        Ok(())
    }

    /// Text nodes get new content; elements get their children replaced by
    /// a single text node.
    fn set_text(&mut self, node: NodeId, content: &str) -> Result<(), TreeError> {
        match self.node_mut(node) {
            None => return Err(TreeError::UnknownNode(node)),
            Some(LiveNode::Text(text)) => {
                text.content = content.into();
                return Ok(());
            }
            Some(LiveNode::Element(_)) => {}
        }

        let old = std::mem::take(&mut self.element_mut(node)?.children);
        for child in old {
            self.release_subtree(child);
        }
        let text = self.alloc(
            Some(node),
            LiveNode::Text(LiveText {
                content: content.into(),
            }),
        );
        self.element_mut(node)?.children.push(text);
        Ok(())
    }

    /// Frees a detached subtree. Already-freed handles are a no-op.
    fn discard(&mut self, node: NodeId) -> Result<(), TreeError> {
        match self.entry(node) {
            None => Ok(()),
            Some(entry) if entry.parent.is_some() => Err(TreeError::AlreadyAttached(node)),
            Some(_) => {
                self.release_subtree(node);
                Ok(())
            }
        }
    }
}
