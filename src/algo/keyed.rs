//! Keyed child reconciliation
//!
//! Used when any sibling on either side carries a key. Every child gets an
//! identity: its key on first occurrence, otherwise a positional slot among
//! the unkeyed children (text nodes, unkeyed elements, repeated keys). The
//! LCS over those identities marks the children that keep their relative
//! order; everything else is moved, added or removed.
//!
//! # Move positions
//!
//! Patches are applied as removes, then moves in emission order, then adds
//! by ascending index. Each move therefore lands right after the previous
//! retained sibling in new order, at its index in the list as it stands at
//! that point. Once the moves are done the retained children are in new
//! order and the adds fill in the gaps at their final indices.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::id::NodeId;
use crate::node::Node;
use crate::patch::Patch;

use super::diff::DiffContext;
use super::lcs::lcs_pairs;

/// Sibling identity used for matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Ident<'k> {
    Key(&'k str),
    /// n-th unkeyed sibling
    Slot(usize),
}

fn identities<'k>(keys: impl Iterator<Item = Option<&'k str>>) -> Vec<Ident<'k>> {
    let mut seen = FxHashSet::default();
    let mut slots = 0;
    let mut next_slot = || {
        slots += 1;
        Ident::Slot(slots - 1)
    };

    keys.map(|key| match key {
        Some(key) if seen.insert(key) => Ident::Key(key),
        Some(key) => {
            log::warn!(
                target: "tola_reconcile::keyed",
                "duplicate sibling key {key:?}, only the first occurrence is matched by key"
            );
            next_slot()
        }
        None => next_slot(),
    })
    .collect()
}

impl DiffContext<'_> {
    pub(super) fn diff_keyed(&mut self, parent: NodeId, old: &[NodeId], new: &[Node]) {
        let tree = self.tree;
        let old_ids = identities(old.iter().map(|&child| tree.key(child)));
        let new_ids = identities(new.iter().map(Node::key));
        let stable = lcs_pairs(&old_ids, &new_ids);

        let old_pos: FxHashMap<Ident<'_>, usize> =
            old_ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        let in_new: FxHashSet<Ident<'_>> = new_ids.iter().copied().collect();
        let mut is_stable = vec![false; new.len()];
        for &(_, j) in &stable {
            is_stable[j] = true;
        }

        // 1. Removals
        for (&child, id) in old.iter().zip(&old_ids) {
            if !in_new.contains(id) {
                self.remove(child);
            }
        }

        // 2. Stable pairs
        for &(i, j) in &stable {
            self.diff_node(old[i], &new[j]);
        }

        // 3. Moves and adds, tracking the child list as it will look at
        //    apply time (old indices of retained children)
        let mut live: Vec<usize> = (0..old.len())
            .filter(|&i| in_new.contains(&old_ids[i]))
            .collect();
        let mut prev: Option<usize> = None;

        for (j, (id, node)) in new_ids.iter().zip(new).enumerate() {
            let Some(&i) = old_pos.get(id) else {
                self.add(parent, node, j);
                continue;
            };

            if !is_stable[j] {
                if let Some(from) = live.iter().position(|&x| x == i) {
                    live.remove(from);
                }
                let to = prev
                    .and_then(|p| live.iter().position(|&x| x == p))
                    .map_or(0, |pos| pos + 1);
                live.insert(to, i);

                self.push(Patch::Move {
                    target: old[i],
                    parent,
                    index: to,
                });
                self.stats.nodes_moved += 1;
                self.diff_node(old[i], node);
            }
            prev = Some(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::algo::diff;
    use crate::apply::apply;
    use crate::batch::order;
    use crate::node::{Element, Node};
    use crate::patch::{Patch, PatchKind};
    use crate::tree::LiveTree;

    fn li(key: &str, text: &str) -> Element {
        Element::new("li").with_key(key).text(text)
    }

    fn list(keys: &[&str]) -> Node {
        Element::new("ul").children(keys.iter().map(|k| li(k, k))).into()
    }

    fn count(patches: &[Patch], kind: PatchKind) -> usize {
        patches.iter().filter(|p| p.kind() == kind).count()
    }

    fn assert_round_trip(old: &Node, new: &Node) -> Vec<Patch> {
        let mut tree = LiveTree::new();
        let root = tree.mount(old);
        let result = diff(&tree, Some(root), Some(new));
        let patches = result.patches.clone();

        let stats = apply(order(result.patches), &mut tree).unwrap();
        assert_eq!(stats.skipped, 0, "patches: {patches:?}");
        assert_eq!(tree.snapshot(root).as_ref(), Some(new), "patches: {patches:?}");
        patches
    }

    #[test]
    fn test_append_scenario() {
        let old: Node = Element::new("ul").child(li("1", "A")).child(li("2", "B")).into();
        let new: Node = Element::new("ul")
            .child(li("1", "A"))
            .child(li("2", "B"))
            .child(li("3", "C"))
            .into();
        let mut tree = LiveTree::new();
        let ul = tree.mount(&old);

        let result = diff(&tree, Some(ul), Some(&new));
        assert_eq!(
            result.patches,
            vec![Patch::Add {
                parent: ul,
                node: li("3", "C").into(),
                index: 2,
            }]
        );
        assert_round_trip(&old, &new);
    }

    #[test]
    fn test_reorder_only_moves() {
        let mut tree = LiveTree::new();
        let ul = tree.mount(&list(&["A", "B", "C"]));
        let c = tree.children(ul)[2];

        let result = diff(&tree, Some(ul), Some(&list(&["C", "A", "B"])));
        assert_eq!(
            result.patches,
            vec![Patch::Move {
                target: c,
                parent: ul,
                index: 0,
            }]
        );
        assert_eq!(result.stats.nodes_moved, 1);
        assert_round_trip(&list(&["A", "B", "C"]), &list(&["C", "A", "B"]));
    }

    #[test]
    fn test_lcs_members_stay_put() {
        let mut tree = LiveTree::new();
        let ul = tree.mount(&list(&["A", "B", "C", "D", "E"]));
        let kids = tree.children(ul).to_vec();

        let result = diff(&tree, Some(ul), Some(&list(&["B", "D", "E", "F"])));
        assert_eq!(
            result.patches,
            vec![
                Patch::Remove { target: kids[0] },
                Patch::Remove { target: kids[2] },
                Patch::Add {
                    parent: ul,
                    node: li("F", "F").into(),
                    index: 3,
                },
            ]
        );
        assert_round_trip(&list(&["A", "B", "C", "D", "E"]), &list(&["B", "D", "E", "F"]));
    }

    #[test]
    fn test_move_behind_new_siblings() {
        let patches = assert_round_trip(&list(&["A", "B", "C"]), &list(&["X", "Y", "C", "A", "B"]));
        assert_eq!(count(&patches, PatchKind::Move), 1);
        assert_eq!(count(&patches, PatchKind::Add), 2);
        assert_eq!(count(&patches, PatchKind::Remove), 0);
    }

    #[test]
    fn test_reverse_and_shuffle() {
        assert_round_trip(&list(&["1", "2", "3", "4", "5"]), &list(&["5", "4", "3", "2", "1"]));
        assert_round_trip(&list(&["a", "b", "c", "d"]), &list(&["d", "x", "b", "a", "y"]));
        assert_round_trip(&list(&["a", "b"]), &list(&[]));
        assert_round_trip(&list(&[]), &list(&["a", "b"]));
    }

    #[test]
    fn test_moved_node_content_is_diffed() {
        let old: Node = Element::new("ul").child(li("a", "one")).child(li("b", "two")).into();
        let new: Node = Element::new("ul").child(li("b", "TWO")).child(li("a", "one")).into();
        let patches = assert_round_trip(&old, &new);

        assert_eq!(count(&patches, PatchKind::Move), 1);
        assert_eq!(count(&patches, PatchKind::Text), 1);
        assert_eq!(count(&patches, PatchKind::Add), 0);
    }

    #[test]
    fn test_duplicate_keys_match_first_only() {
        let old: Node = Element::new("ul").child(li("a", "x")).child(li("a", "y")).into();
        let new: Node = Element::new("ul").child(li("b", "z")).child(li("a", "x")).into();
        let patches = assert_round_trip(&old, &new);

        assert_eq!(count(&patches, PatchKind::Remove), 1);
        assert_eq!(count(&patches, PatchKind::Add), 1);
        assert_eq!(count(&patches, PatchKind::Move), 0);
    }

    #[test]
    fn test_mixed_keyed_and_unkeyed_siblings() {
        let old: Node = Element::new("div")
            .child(Node::text("head"))
            .child(li("1", "one"))
            .child(Element::new("p").text("para"))
            .child(li("2", "two"))
            .into();
        let new: Node = Element::new("div")
            .child(li("2", "two"))
            .child(Node::text("head!"))
            .child(Element::new("hr"))
            .child(li("3", "three"))
            .child(li("1", "one"))
            .into();
        assert_round_trip(&old, &new);
        assert_round_trip(&new, &old);
    }

    #[test]
    fn test_nested_keyed_lists() {
        let old: Node = Element::new("div")
            .child(Element::new("ul").with_key("x").children(["a", "b"].map(|k| li(k, k))))
            .child(Element::new("ul").with_key("y").children(["c", "d"].map(|k| li(k, k))))
            .into();
        let new: Node = Element::new("div")
            .child(Element::new("ul").with_key("y").children(["d", "c", "e"].map(|k| li(k, k))))
            .child(Element::new("ul").with_key("x").children(["b"].map(|k| li(k, k))))
            .into();
        assert_round_trip(&old, &new);
    }
}
