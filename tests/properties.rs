//! Property tests for forest structure invariants.

use std::collections::BTreeSet;

use birch::{CaseInsensitiveForest, Forest};
use pretty_assertions::assert_eq;
use proptest::{prelude::*, sample::Index};

/// Builds a single tree with ids `1..=parents.len() + 1`, where node `n + 1` is attached under a
/// randomly chosen node created before it. Returns the forest and the keys, indexed by id - 1.
fn random_tree(parents: &[Index]) -> (Forest<u32, u32>, Vec<usize>) {
    let mut forest = Forest::new();
    let mut keys = Vec::with_capacity(parents.len() + 1);
    keys.push(forest.create(1, 0).expect("valid id"));
    for (i, parent) in parents.iter().enumerate() {
        let id = i as u32 + 2;
        let key = forest.create(id, id * 100).expect("valid id");
        let parent = keys[parent.index(keys.len())];
        forest
            .node_mut(parent)
            .expect("node exists")
            .add_child(key)
            .expect("fresh ids are always accepted");
        keys.push(key);
    }
    (forest, keys)
}

fn parents_strategy() -> impl Strategy<Value = Vec<Index>> {
    proptest::collection::vec(any::<Index>(), 0..40)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: only the default id is rejected, and new nodes are detached leaves.
    #[test]
    fn property_only_default_ids_are_invalid(id in any::<u32>()) {
        let mut forest = Forest::<u32>::new();
        match forest.create_default(id) {
            Ok(key) => {
                prop_assert_ne!(id, 0);
                let node = forest.node(key).expect("node exists");
                prop_assert!(node.is_root());
                prop_assert!(node.is_leaf());
            }
            Err(error) => {
                prop_assert_eq!(id, 0);
                prop_assert_eq!(error.id, 0);
            }
        }
    }

    /// PROPERTY: attaching a fresh node and removing it again restores the child set, but not the
    /// child's parent link.
    #[test]
    fn property_attach_detach_round_trip(parents in parents_strategy(), at in any::<Index>()) {
        let (mut forest, keys) = random_tree(&parents);
        let parent = keys[at.index(keys.len())];
        let children_before: Vec<u32> = forest
            .node(parent)
            .expect("node exists")
            .children()
            .map(|x| *x.id())
            .collect();

        let fresh = forest.create(10_000, 0).expect("valid id");
        prop_assert!(forest.node_mut(parent).expect("node exists").add_child(fresh).is_some());
        prop_assert!(forest.node_mut(parent).expect("node exists").remove_child(&10_000));

        let children_after: Vec<u32> = forest
            .node(parent)
            .expect("node exists")
            .children()
            .map(|x| *x.id())
            .collect();
        assert_eq!(children_before, children_after);
        let stale = forest.node(fresh).expect("node exists").parent().map(|x| x.into_raw_key());
        prop_assert_eq!(stale, Some(parent));
    }

    /// PROPERTY: attaching fresh nodes with arbitrary, possibly repeating ids never yields a tree
    /// in which two nodes share an id.
    #[test]
    fn property_no_duplicate_ids(
        ids in proptest::collection::vec(1_u32..16, 2..24),
        ops in proptest::collection::vec((any::<Index>(), any::<Index>()), 0..64),
    ) {
        let mut forest = Forest::<u32>::new();
        let keys: Vec<usize> = ids
            .iter()
            .map(|&id| forest.create_default(id).expect("valid id"))
            .collect();
        let mut attached = BTreeSet::new();
        for (parent, child) in ops {
            let (parent, child) = (keys[parent.index(keys.len())], keys[child.index(keys.len())]);
            // Only single detached nodes are attached; whole subtrees are not checked for collisions
            if attached.contains(&child) || !forest.node(child).expect("node exists").is_leaf() {
                continue;
            }
            if forest.node_mut(parent).expect("node exists").add_child(child).is_some() {
                attached.insert(child);
            }
        }
        for &key in &keys {
            let all: Vec<u32> = forest.node(key).expect("node exists").all().map(|x| *x.id()).collect();
            let unique: BTreeSet<u32> = all.iter().copied().collect();
            prop_assert_eq!(all.len(), unique.len(), "duplicate ids in {:?}", all);
        }
    }

    /// PROPERTY: `find` gives the same answer no matter which node of the tree it is called on.
    #[test]
    fn property_find_from_anywhere(parents in parents_strategy(), id in 0_u32..50) {
        let (forest, keys) = random_tree(&parents);
        let expected = forest
            .node(keys[0])
            .expect("node exists")
            .find(&id)
            .map(|x| x.into_raw_key());
        prop_assert_eq!(expected.is_some(), id >= 1 && id as usize <= keys.len());
        for &key in &keys {
            let found = forest.node(key).expect("node exists").find(&id).map(|x| x.into_raw_key());
            prop_assert_eq!(found, expected);
        }
    }

    /// PROPERTY: a node's descendants are the node itself plus the descendants of each child,
    /// without repetitions.
    #[test]
    fn property_descendants_complete(parents in parents_strategy()) {
        let (forest, keys) = random_tree(&parents);
        for &key in &keys {
            let node = forest.node(key).expect("node exists");
            let descendants: Vec<usize> = node.descendants().map(|x| x.into_raw_key()).collect();
            prop_assert_eq!(descendants.first().copied(), Some(key));
            let from_children: usize = node.children().map(|x| x.descendants().count()).sum();
            prop_assert_eq!(descendants.len(), 1 + from_children);
            let unique: BTreeSet<usize> = descendants.iter().copied().collect();
            prop_assert_eq!(unique.len(), descendants.len());
        }
        prop_assert_eq!(forest.node(keys[0]).expect("node exists").all().count(), keys.len());
    }

    /// PROPERTY: removing a subtree frees exactly its nodes, leaves the rest of the tree intact and
    /// lets new nodes reuse the freed slots.
    #[test]
    fn property_remove_tree_frees_the_subtree(parents in parents_strategy(), at in any::<Index>()) {
        let (mut forest, keys) = random_tree(&parents);
        let victim = keys[at.index(keys.len())];
        let subtree: BTreeSet<usize> = forest
            .node(victim)
            .expect("node exists")
            .descendants()
            .map(|x| x.into_raw_key())
            .collect();
        prop_assert_eq!(forest.remove_tree(victim), subtree.len());

        let survivors: BTreeSet<usize> = keys.iter().copied().filter(|x| !subtree.contains(x)).collect();
        if !survivors.is_empty() {
            let reachable: BTreeSet<usize> = forest
                .node(keys[0])
                .expect("node exists")
                .all()
                .map(|x| x.into_raw_key())
                .collect();
            prop_assert_eq!(reachable, survivors);
        }
        let fresh = forest.create(10_000, 0).expect("valid id");
        prop_assert!(subtree.contains(&fresh));
    }

    /// PROPERTY: transforming with an injective id mapping keeps the node count and mirrors every
    /// parent-child edge.
    #[test]
    fn property_transform_is_isomorphic(parents in parents_strategy(), from in any::<Index>()) {
        let (forest, keys) = random_tree(&parents);
        let (target, root): (Forest<u64, u32>, _) = forest
            .node(keys[from.index(keys.len())])
            .expect("node exists")
            .transform(|node| (u64::from(*node.id()) * 3, *node.value()))
            .expect("ids stay valid");
        let root = target.node(root).expect("node exists");
        prop_assert_eq!(root.all().count(), keys.len());

        let source_root = forest.node(keys[0]).expect("node exists");
        for source in source_root.descendants() {
            let converted = root.find(&(u64::from(*source.id()) * 3)).expect("node was converted");
            prop_assert_eq!(converted.value(), source.value());
            prop_assert_eq!(
                converted.parent().map(|x| *x.id()),
                source.parent().map(|x| u64::from(*x.id()) * 3)
            );
            prop_assert_eq!(converted.num_children(), source.num_children());
        }
    }

    /// PROPERTY: case-insensitive forests find nodes by any casing of their id, while direct
    /// child lookup only accepts the exact id.
    #[test]
    fn property_case_insensitive_find(name in "[A-Za-z]{1,12}") {
        let mut forest = CaseInsensitiveForest::<()>::new();
        let root = forest.create_default("0".to_string()).expect("valid id");
        let child = forest.create_default(name.clone()).expect("valid id");
        prop_assert!(forest.node_mut(root).expect("node exists").add_child(child).is_some());

        let root = forest.node(root).expect("node exists");
        for variant in &[name.to_lowercase(), name.to_uppercase(), name.clone()] {
            prop_assert_eq!(root.find(variant).map(|x| x.into_raw_key()), Some(child));
            prop_assert_eq!(
                root.get_child(variant).map(|x| x.into_raw_key()),
                if *variant == name { Some(child) } else { None }
            );
        }
    }
}

#[test]
fn scenario_from_overview() {
    let mut forest = Forest::<&str>::new();
    let r = forest.create_default("a").expect("valid id");
    let x = forest.create_default("b").expect("valid id");
    let y = forest.create_default("c").expect("valid id");
    let z = forest.create_default("b").expect("valid id");

    let mut root = forest.node_mut(r).expect("node exists");
    assert!(root.add_child(x).is_some());
    assert!(root.add_child(y).is_some());
    assert!(forest.node_mut(x).expect("node exists").add_child(z).is_none());

    assert!(forest.node(x).expect("node exists").is_leaf());
    let root = forest.node(r).expect("node exists");
    assert_eq!(root.find(&"c").map(|n| n.into_raw_key()), Some(y));
    assert_eq!(root.all().count(), 3);
}
