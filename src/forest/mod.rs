//! Forests of key-indexed trees, where every node is addressed by a caller-chosen id and owns a map of its children.
//!
//! A [`Forest`] is the arena which owns the nodes. Nodes are created detached, with nothing but their id and payload, and are then linked into trees with [`NodeRefMut::add_child`]. The forest does not restrict how many trees it holds: every node without a parent is the root of its own tree.
//!
//! Ids must be unique among siblings, which is guaranteed by the child map, and are expected to be unique within the whole tree, which is enforced by `add_child` refusing to attach a node whose id can already be found somewhere in the tree. Which ids "can be found" is decided by the [`KeyMatch`] policy of the forest.
//!
//! # Example
//! ```rust
//! use birch::forest::{Forest, NodeRef};
//!
//! // Create the forest. The turbofish there is needed to state that we are using the default
//! // payload, policy and storage instead of asking the compiler to infer them.
//! let mut forest = Forest::<&str>::new();
//!
//! // Nodes are created on their own and linked afterwards.
//! let menu = forest.create_default("menu").unwrap();
//! let file = forest.create_default("file").unwrap();
//! let open = forest.create_default("open").unwrap();
//! let edit = forest.create_default("edit").unwrap();
//!
//! // Attaching returns the attached child, so calls can be chained:
//! forest
//!     .node_mut(menu)
//!     .unwrap()
//!     .add_child(file)
//!     .unwrap()
//!     .add_child(open)
//!     .unwrap();
//! forest.node_mut(menu).unwrap().add_child(edit).unwrap();
//!
//! // An id which already exists anywhere in the tree cannot be attached again:
//! let another_open = forest.create_default("open").unwrap();
//! assert!(forest.node_mut(edit).unwrap().add_child(another_open).is_none());
//!
//! // Any node can find any other node of the same tree.
//! let edit_ref: NodeRef<'_, _> = forest.node(edit).unwrap();
//! let open_ref = edit_ref.find(&"open").unwrap();
//! assert_eq!(open_ref.parent().map(|x| *x.id()), Some("file"));
//! assert_eq!(open_ref.root().id(), &"menu");
//!
//! // Enumeration is pre-order, with siblings in id order.
//! let ids: Vec<_> = edit_ref.all().map(|x| *x.id()).collect();
//! assert_eq!(ids, ["menu", "edit", "file", "open"]);
//! ```
//!
//! [`Forest`]: struct.Forest.html " "
//! [`NodeRefMut::add_child`]: struct.NodeRefMut.html#method.add_child " "
//! [`KeyMatch`]: ../key_match/trait.KeyMatch.html " "

use core::{
    fmt::Debug,
    marker::PhantomData,
};
use alloc::{collections::BTreeSet, string::String, vec::Vec};
use granite::{Storage, DefaultStorage};
use crate::{
    key_match::{KeyMatch, ExactMatch, CaseInsensitive},
    InvalidKey,
};

mod node;
mod node_ref;
mod node_ref_mut;
mod transform;

pub use node::Node;
pub use node_ref::{NodeRef, NodeChildrenIter, NodeAncestorsIter, NodeDescendantsIter};
pub use node_ref_mut::NodeRefMut;

/// An arena holding the nodes of any number of key-indexed trees.
///
/// - `I` is the type of node ids. The default value of `I` is reserved and cannot be used as an id.
/// - `V` is the payload stored in every node.
/// - `M` is the [`KeyMatch`] policy used by whole-tree searches.
/// - `K` and `S` are the storage key and the storage type, defaulting to a sparse `Vec` indexed by `usize`.
///
/// See the [module-level documentation] for more.
///
/// [`KeyMatch`]: ../key_match/trait.KeyMatch.html " "
/// [module-level documentation]: index.html " "
#[derive(Debug)]
pub struct Forest<I, V = (), M = ExactMatch, K = usize, S = DefaultStorage<Node<I, V, K>>>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    storage: S,
    policy: PhantomData<fn() -> M>,
}
impl<I, V, M, K, S> Forest<I, V, M, K, S>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    /// Creates an empty forest.
    ///
    /// # Example
    /// ```rust
    /// # use birch::Forest;
    /// let forest = Forest::<u32>::new();
    /// assert!(forest.is_empty());
    /// ```
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            storage: S::new(),
            policy: PhantomData,
        }
    }
    /// Creates an empty forest with the specified capacity for the storage.
    ///
    /// # Panics
    /// The storage may panic if it has fixed capacity and the specified value does not match it.
    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: S::with_capacity(capacity),
            policy: PhantomData,
        }
    }
    /// Returns the number of nodes in the forest, including detached ones.
    ///
    /// Sparse storages, such as the default one, keep counting the slots vacated by [`remove_tree`] until new nodes are created in them.
    ///
    /// [`remove_tree`]: #method.remove_tree " "
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.storage.len()
    }
    /// Returns `true` if no nodes were created in the forest, `false` otherwise.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
    /// Returns `true` if the specified raw key refers to a node of this forest.
    ///
    /// Keys of nodes freed by [`remove_tree`] are not reliably reported as absent, since sparse storages keep their slots around for reuse.
    ///
    /// [`remove_tree`]: #method.remove_tree " "
    #[inline(always)]
    pub fn contains(&self, key: &K) -> bool {
        self.storage.contains_key(key)
    }
    /// Drops all nodes of all trees in the forest. All previously returned keys become invalid.
    #[inline]
    pub fn clear(&mut self) {
        self.storage = S::new();
    }

    /// Returns a reference to the node with the specified raw key, or `None` if it does not exist.
    #[inline(always)]
    pub fn node(&self, key: K) -> Option<NodeRef<'_, I, V, M, K, S>> {
        NodeRef::new_raw(self, key)
    }
    /// Returns a *mutable* reference to the node with the specified raw key, or `None` if it does not exist.
    #[inline(always)]
    pub fn node_mut(&mut self, key: K) -> Option<NodeRefMut<'_, I, V, M, K, S>> {
        NodeRefMut::new_raw(self, key)
    }

    #[track_caller]
    pub(crate) fn get(&self, key: &K) -> &Node<I, V, K> {
        self.storage
            .get(key)
            .unwrap_or_else(|| panic!("key {:?} does not point to a node of the forest", key))
    }
    #[track_caller]
    pub(crate) fn get_mut(&mut self, key: &K) -> &mut Node<I, V, K> {
        self.storage
            .get_mut(key)
            .unwrap_or_else(|| panic!("key {:?} does not point to a node of the forest", key))
    }
    /// Follows parent links up to the root of the tree containing `key`.
    pub(crate) fn root_key(&self, key: K) -> K {
        let mut current = key;
        while let Some(parent) = &self.get(&current).parent {
            current = parent.clone();
        }
        current
    }
    /// Forgets one stale link from `referrer` to `at`.
    fn unmirror(&mut self, at: &K, referrer: &K) {
        let stale = &mut self.get_mut(at).stale;
        if let Some(position) = stale.iter().position(|x| x == referrer) {
            stale.swap_remove(position);
        }
    }
    /// Returns `true` if `candidate` is `key` itself or one of its ancestors.
    pub(crate) fn is_self_or_ancestor(&self, candidate: &K, key: &K) -> bool {
        let mut current = key;
        loop {
            if current == candidate {
                return true;
            }
            current = match &self.get(current).parent {
                Some(parent) => parent,
                None => return false,
            };
        }
    }
}
impl<I, V, M, K, S> Forest<I, V, M, K, S>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
    I: Ord + Clone + Default,
{
    /// Creates a detached node with the specified id and payload, returning its raw key.
    ///
    /// # Errors
    /// Fails with [`InvalidKey`] if `id` is the default value of its type, such as `0` or an empty string.
    ///
    /// # Example
    /// ```rust
    /// # use birch::Forest;
    /// let mut forest = Forest::<u32, &str>::new();
    /// let node = forest.create(7, "seven").unwrap();
    /// let node = forest.node(node).unwrap();
    /// assert!(node.is_root());
    /// assert!(node.is_leaf());
    /// assert_eq!(node.value(), &"seven");
    ///
    /// // Zero is the default value of u32 and thus not a valid id:
    /// let error = forest.create(0, "zero").unwrap_err();
    /// assert_eq!(error.id, 0);
    /// ```
    ///
    /// [`InvalidKey`]: ../struct.InvalidKey.html " "
    pub fn create(&mut self, id: I, value: V) -> Result<K, InvalidKey<I>> {
        if id == I::default() {
            return Err(InvalidKey { id });
        }
        Ok(self.storage.add(Node::detached(id, value)))
    }
    /// Creates a detached node with the specified id and the default payload, returning its raw key.
    ///
    /// # Errors
    /// Same as [`create`].
    ///
    /// [`create`]: #method.create " "
    #[inline]
    pub fn create_default(&mut self, id: I) -> Result<K, InvalidKey<I>>
    where
        V: Default,
    {
        self.create(id, V::default())
    }
}
impl<I, V, M, K, S> Forest<I, V, M, K, S>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
    I: Ord + Clone,
    M: KeyMatch<I>,
{
    /// Decides whether `child` may become a child of `parent`.
    pub(crate) fn accepts_child(&self, parent: &K, child: &K) -> bool {
        if self.is_self_or_ancestor(child, parent) {
            return false;
        }
        let id = &self.get(child).id;
        if self.get(parent).children.contains_key(id) {
            // Replacing the current occupant of the slot never introduces a new id
            return true;
        }
        !self.tree_contains(parent, id)
    }
    /// Returns `true` if the tree containing `member` has a node matching `id`.
    pub(crate) fn tree_contains(&self, member: &K, id: &I) -> bool {
        NodeRef::new_raw(self, self.root_key(member.clone()))
            .and_then(|root| root.search_down(id))
            .is_some()
    }
}
impl<I, V, M, K, S> Forest<I, V, M, K, S>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
    I: Ord,
{
    /// Removes the child map entry for `id` from `parent`, returning the key it pointed to.
    pub(crate) fn unlink(&mut self, parent: &K, id: &I) -> Option<K> {
        let child = self.get_mut(parent).children.remove(id)?;
        if self.get(&child).parent.as_ref() == Some(parent) {
            // The child keeps its parent link
            self.get_mut(parent).stale.push(child.clone());
        } else {
            self.unmirror(&child, parent);
        }
        Some(child)
    }
}
impl<I, V, M, K, S> Forest<I, V, M, K, S>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
    I: Ord + Clone,
{
    /// Links `child` under `parent` unconditionally, replacing whatever occupied the same slot.
    ///
    /// Edges the child leaves behind and the edge of a replaced occupant turn stale on one end. Every stale link is recorded on the node it points to.
    pub(crate) fn link(&mut self, parent: &K, child: &K) {
        let id = self.get(child).id.clone();
        let occupant = self.get(parent).children.get(&id).cloned();
        let old_parent = self.get(child).parent.clone();
        if occupant.as_ref() == Some(child) && old_parent.as_ref() == Some(parent) {
            return;
        }
        if let Some(old_parent) = &old_parent {
            if self.get(old_parent).children.get(&id) == Some(child) {
                // The old parent keeps its map entry
                self.get_mut(child).stale.push(old_parent.clone());
            } else {
                self.unmirror(old_parent, child);
            }
        }
        match occupant {
            Some(occupant) if occupant == *child => self.unmirror(child, parent),
            Some(occupant) => {
                if self.get(&occupant).parent.as_ref() == Some(parent) {
                    // The occupant keeps its parent link
                    self.get_mut(parent).stale.push(occupant);
                } else {
                    self.unmirror(&occupant, parent);
                }
            }
            None => {}
        }
        self.get_mut(child).parent = Some(parent.clone());
        self.get_mut(parent).children.insert(id, child.clone());
    }
    /// Removes a node together with all of its descendants from the forest, returning how many nodes were removed, or zero if `key` does not point to a node of this forest.
    ///
    /// The node is detached from its parent first, if it is still attached. Every stale link elsewhere in the forest which points into the removed subtree is cleared: nodes which were detached from a removed node become roots, and child map entries left behind by re-parenting are dropped. The keys of the removed nodes become invalid; with storages which shift their elements, such as `Vec`, the keys of other nodes may change as well.
    ///
    /// # Example
    /// ```rust
    /// # use birch::Forest;
    /// let mut forest = Forest::<u32>::new();
    /// let [root, child, grandchild] = [1, 2, 3].map(|id| forest.create_default(id).unwrap());
    /// forest.node_mut(root).unwrap().add_child(child).unwrap().add_child(grandchild).unwrap();
    ///
    /// assert!(forest.node_mut(root).unwrap().remove_child(&2));
    /// assert_eq!(forest.remove_tree(child), 2);
    /// assert!(forest.node(root).unwrap().is_leaf());
    ///
    /// // The freed slots are reused by new nodes:
    /// let reused = forest.create_default(4).unwrap();
    /// assert!(reused == child || reused == grandchild);
    /// ```
    pub fn remove_tree(&mut self, key: K) -> usize
    where
        K: Ord,
    {
        let doomed: BTreeSet<K> = match self.node(key) {
            Some(node) => node.descendants().map(NodeRef::into_raw_key).collect(),
            None => return 0,
        };
        for key in &doomed {
            let node = self.get(key);
            let id = node.id.clone();
            let parent = node.parent.clone().filter(|x| !doomed.contains(x));
            let children: Vec<K> = node
                .children
                .values()
                .filter(|x| !doomed.contains(*x))
                .cloned()
                .collect();
            let referrers: Vec<K> = node
                .stale
                .iter()
                .filter(|x| !doomed.contains(*x))
                .cloned()
                .collect();

            if let Some(parent) = parent {
                if self.get(&parent).children.get(&id) == Some(key) {
                    self.get_mut(&parent).children.remove(&id);
                } else {
                    self.unmirror(&parent, key);
                }
            }
            // Consistent children are all doomed, so whatever is left are stale map entries
            for child in &children {
                self.unmirror(child, key);
            }
            for referrer in &referrers {
                let referrer = self.get_mut(referrer);
                if referrer.parent.as_ref() == Some(key) {
                    referrer.parent = None;
                }
                referrer.children.retain(|_, x| *x != *key);
            }
        }
        let removed = doomed.len();
        // Back to front, so that shifting storages do not move the nodes which are yet to be removed
        for key in doomed.into_iter().rev() {
            self.storage.remove(&key);
        }
        removed
    }
}
impl<I, V, M, K, S> Default for Forest<I, V, M, K, S>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}
impl<I, V, M, K, S> Clone for Forest<I, V, M, K, S>
where
    S: Storage<Element = Node<I, V, K>, Key = K> + Clone,
    K: Clone + Debug + Eq,
{
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            policy: PhantomData,
        }
    }
}

/// A forest of string-keyed trees in which searches ignore letter case.
///
/// Direct child lookup with [`get_child`] still compares ids exactly, since it indexes the child map.
///
/// # Example
/// ```rust
/// use birch::CaseInsensitiveForest;
///
/// let mut forest = CaseInsensitiveForest::<()>::new();
/// let root = forest.create_default("Root".to_string()).unwrap();
/// let foo = forest.create_default("Foo".to_string()).unwrap();
/// forest.node_mut(root).unwrap().add_child(foo).unwrap();
///
/// let root = forest.node(root).unwrap();
/// assert_eq!(root.find(&"foo".to_string()).map(|x| x.into_raw_key()), Some(foo));
/// assert!(root.get_child(&"foo".to_string()).is_none());
/// ```
///
/// [`get_child`]: struct.NodeRef.html#method.get_child " "
pub type CaseInsensitiveForest<V = ()> = Forest<String, V, CaseInsensitive>;

/// A forest which uses a *sparse* `Vec` as backing storage.
///
/// The default `Forest` type already uses this, so this is only provided for explicitness and consistency.
pub type SparseVecForest<I, V = (), M = ExactMatch> =
    Forest<I, V, M, usize, granite::SparseVec<Node<I, V, usize>>>;
/// A forest which uses a `Vec` as backing storage.
///
/// Creating nodes is as fast as with the default sparse storage, but [`Forest::remove_tree`] shifts the nodes stored after the removed ones, which changes their keys and requires rewriting links throughout the forest. Suitable for forests which are built once and never pruned.
///
/// [`Forest::remove_tree`]: struct.Forest.html#method.remove_tree " "
pub type VecForest<I, V = (), M = ExactMatch> =
    Forest<I, V, M, usize, Vec<Node<I, V, usize>>>;
