//! Property tests: applying an ordered diff to a live copy of the old tree
//! must reproduce the new tree, and diffing a tree against itself must be a
//! no-op.

use proptest::prelude::*;

use tola_reconcile::{apply, diff, order, Element, LiveTree, Node};

fn tag() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["div", "p", "span"])
}

/// Small pool so siblings often share keys (including duplicates)
fn key() -> impl Strategy<Value = Option<&'static str>> {
    prop::option::of(prop::sample::select(vec!["k1", "k2", "k3", "k4"]))
}

fn attrs() -> impl Strategy<Value = Vec<(&'static str, String)>> {
    prop::collection::vec(
        (prop::sample::select(vec!["class", "id", "title"]), "[xy]{0,2}"),
        0..3,
    )
}

fn build(tag: &str, key: Option<&str>, attrs: Vec<(&str, String)>, children: Vec<Node>) -> Node {
    let mut elem = Element::new(tag);
    if let Some(key) = key {
        elem = elem.with_key(key);
    }
    for (name, value) in attrs {
        elem = elem.attr(name, value);
    }
    elem.children(children).into()
}

fn node() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        "[a-c]{0,3}".prop_map(|text: String| Node::text(text)),
        (tag(), key(), attrs()).prop_map(|(tag, key, attrs)| build(tag, key, attrs, Vec::new())),
    ];
    leaf.prop_recursive(4, 48, 5, |inner| {
        (tag(), key(), attrs(), prop::collection::vec(inner, 0..5))
            .prop_map(|(tag, key, attrs, children)| build(tag, key, attrs, children))
    })
}

/// Roots keep tag and key fixed: a root has no parent to be replaced in.
fn root() -> impl Strategy<Value = Node> {
    (attrs(), prop::collection::vec(node(), 0..6))
        .prop_map(|(attrs, children)| build("div", None, attrs, children))
}

/// Attributes are a mapping: compare them independent of order.
fn normalized(node: &Node) -> Node {
    match node {
        Node::Text(_) => node.clone(),
        Node::Element(elem) => {
            let mut elem = (**elem).clone();
            elem.attrs.sort();
            elem.children = elem.children.iter().map(normalized).collect();
            Node::Element(Box::new(elem))
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn ordered_diff_reproduces_new_tree(old in root(), new in root()) {
        let mut tree = LiveTree::new();
        let id = tree.mount(&old);

        let result = diff(&tree, Some(id), Some(&new));
        let stats = apply(order(result.patches), &mut tree).unwrap();
        prop_assert_eq!(stats.skipped, 0);

        let snapshot = tree.snapshot(id).unwrap();
        prop_assert_eq!(normalized(&snapshot), normalized(&new));

        // Applying once reaches a fixed point
        let again = diff(&tree, Some(id), Some(&new));
        prop_assert!(!again.has_changes(), "leftover patches: {:?}", again.patches);
    }

    #[test]
    fn diff_against_self_is_empty(doc in root()) {
        let mut tree = LiveTree::new();
        let id = tree.mount(&doc);

        let result = diff(&tree, Some(id), Some(&doc));
        prop_assert!(result.patches.is_empty(), "unexpected patches: {:?}", result.patches);
    }

    #[test]
    fn fingerprints_agree_after_mount(doc in root()) {
        let mut tree = LiveTree::new();
        let id = tree.mount(&doc);
        prop_assert_eq!(tree.fingerprint(id), Some(doc.fingerprint()));
    }
}
