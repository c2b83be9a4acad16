//! Rebuilding a tree with a different id and payload type while keeping its shape.

use core::fmt::Debug;
use alloc::vec::Vec;
use granite::Storage;
use log::debug;
use crate::{key_match::KeyMatch, InvalidKey};
use super::{Forest, Node, NodeRef};

impl<'a, I, V, M, K, S> NodeRef<'a, I, V, M, K, S>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
    I: Ord,
{
    /// Rebuilds the entire tree the node belongs to in a new forest, converting every node's id and payload with `convert`. Returns the new forest together with the raw key of the new root.
    ///
    /// The conversion always starts at the root, regardless of which node it is called on. See [`transform_into`] for the details.
    ///
    /// # Errors
    /// Fails with [`InvalidKey`] as soon as `convert` produces the default value of `I2` as an id.
    ///
    /// # Example
    /// ```rust
    /// use birch::{Forest, CaseInsensitiveForest};
    ///
    /// let mut numbers = Forest::<u32, &str>::new();
    /// let one = numbers.create(1, "one").unwrap();
    /// let two = numbers.create(2, "two").unwrap();
    /// let three = numbers.create(3, "three").unwrap();
    /// numbers.node_mut(one).unwrap().add_child(two).unwrap().add_child(three).unwrap();
    ///
    /// let (names, root): (CaseInsensitiveForest<u32>, _) = numbers
    ///     .node(three)
    ///     .unwrap()
    ///     .transform(|node| (node.value().to_uppercase(), *node.id()))
    ///     .unwrap();
    ///
    /// let root = names.node(root).unwrap();
    /// assert_eq!(root.id(), "ONE");
    /// let three = root.find(&"three".to_string()).unwrap();
    /// assert_eq!(three.value(), &3);
    /// assert_eq!(three.parent().unwrap().id(), "TWO");
    /// ```
    ///
    /// [`transform_into`]: #method.transform_into " "
    /// [`InvalidKey`]: ../struct.InvalidKey.html " "
    pub fn transform<I2, V2, M2, K2, S2, F>(
        &self,
        convert: F,
    ) -> Result<(Forest<I2, V2, M2, K2, S2>, K2), InvalidKey<I2>>
    where
        S2: Storage<Element = Node<I2, V2, K2>, Key = K2>,
        K2: Clone + Debug + Eq,
        I2: Ord + Clone + Default,
        M2: KeyMatch<I2>,
        F: FnMut(NodeRef<'a, I, V, M, K, S>) -> (I2, V2),
    {
        let mut target = Forest::new();
        let root = self.transform_into(&mut target, convert)?;
        Ok((target, root))
    }
    /// Rebuilds the entire tree the node belongs to inside an existing forest, converting every node's id and payload with `convert`. Returns the raw key of the new root, which is created detached.
    ///
    /// Nodes are converted in pre-order starting from the root, the same order in which [`all`] yields them. Every converted node which receives an id already present in the new tree, according to the key matching policy of the *target* forest, is dropped together with its entire subtree: the node is not created in `target`, and `convert` is not invoked on its descendants. The first node to receive an id keeps it, even if the later one would land in the same child slot, so siblings which end up with the same id never replace each other.
    ///
    /// # Errors
    /// Fails with [`InvalidKey`] as soon as `convert` produces the default value of `I2` as an id. Nodes converted before the failure stay in `target`.
    ///
    /// [`all`]: #method.all " "
    /// [`InvalidKey`]: ../struct.InvalidKey.html " "
    pub fn transform_into<I2, V2, M2, K2, S2, F>(
        &self,
        target: &mut Forest<I2, V2, M2, K2, S2>,
        mut convert: F,
    ) -> Result<K2, InvalidKey<I2>>
    where
        S2: Storage<Element = Node<I2, V2, K2>, Key = K2>,
        K2: Clone + Debug + Eq,
        I2: Ord + Clone + Default,
        M2: KeyMatch<I2>,
        F: FnMut(NodeRef<'a, I, V, M, K, S>) -> (I2, V2),
    {
        let root = self.root();
        let (id, value) = convert(root.clone());
        let new_root = target.create(id, value)?;

        // Pairs of a source node and the already converted parent it has to be attached to
        let mut stack = Vec::new();
        stack.extend(root.children().rev().map(|x| (x, new_root.clone())));
        while let Some((source, new_parent)) = stack.pop() {
            let (id, value) = convert(source.clone());
            if id == I2::default() {
                return Err(InvalidKey { id });
            }
            if target.tree_contains(&new_parent, &id) {
                debug!(
                    "dropping node {:?} and its subtree: its converted id collides within the new tree",
                    source.raw_key()
                );
                continue;
            }
            let new_child = target.create(id, value)?;
            target.link(&new_parent, &new_child);
            stack.extend(source.children().rev().map(|x| (x, new_child.clone())));
        }
        Ok(new_root)
    }
}
