use core::fmt::Debug;
use granite::{Storage, DefaultStorage};
use log::trace;
use crate::key_match::{KeyMatch, ExactMatch};
use super::{Forest, Node, NodeRef};

/// A *mutable* reference to a node in a forest.
///
/// Since this type does not point to the node directly, but rather the forest the node is in and the key of the node in the storage, it can be used to traverse the tree and modify it as a whole.
#[derive(Debug)]
pub struct NodeRefMut<'a, I, V = (), M = ExactMatch, K = usize, S = DefaultStorage<Node<I, V, K>>>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    forest: &'a mut Forest<I, V, M, K, S>,
    key: K,
}
impl<'a, I, V, M, K, S> NodeRefMut<'a, I, V, M, K, S>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    /// Creates a new `NodeRefMut` pointing to the specified key in the storage, or `None` if it does not exist.
    pub fn new_raw(forest: &'a mut Forest<I, V, M, K, S>, key: K) -> Option<Self> {
        if forest.storage.contains_key(&key) {
            Some(Self { forest, key })
        } else {
            None
        }
    }
    /// Returns a reference to the raw storage key for the node.
    pub fn raw_key(&self) -> &K {
        &self.key
    }
    /// Consumes the reference and returns the underlying raw storage key for the node.
    pub fn into_raw_key(self) -> K {
        self.key
    }
    /// Returns an immutable reference to the same node, giving access to the read-only part of the API.
    pub fn as_node_ref(&self) -> NodeRef<'_, I, V, M, K, S> {
        NodeRef {
            forest: &*self.forest,
            key: self.key.clone(),
        }
    }
    /// Returns the id of the node.
    pub fn id(&self) -> &I {
        &self.node().id
    }
    /// Returns a reference to the payload stored in the node.
    pub fn value(&self) -> &V {
        &self.node().value
    }
    /// Returns a *mutable* reference to the payload stored in the node.
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.forest.get_mut(&self.key).value
    }
    /// Returns a reference to the parent node of the pointee, or `None` if it's a root node.
    pub fn parent(&self) -> Option<NodeRef<'_, I, V, M, K, S>> {
        self.as_node_ref().parent()
    }
    /// Returns a *mutable* reference to the parent node of the pointee, or `None` if it's a root node.
    pub fn parent_mut(&mut self) -> Option<NodeRefMut<'_, I, V, M, K, S>> {
        let key = self.node().parent.clone();
        key.map(move |x| NodeRefMut {
            forest: &mut *self.forest,
            key: x,
        })
    }
    /// Returns `true` if the node does not have a parent, `false` otherwise.
    pub fn is_root(&self) -> bool {
        self.node().parent.is_none()
    }
    /// Returns a *mutable* reference to the root of the tree the node belongs to.
    pub fn root_mut(&mut self) -> NodeRefMut<'_, I, V, M, K, S> {
        let key = self.forest.root_key(self.key.clone());
        NodeRefMut {
            forest: &mut *self.forest,
            key,
        }
    }

    pub(super) fn into_parts(self) -> (&'a mut Forest<I, V, M, K, S>, K) {
        (self.forest, self.key)
    }
    fn node(&self) -> &Node<I, V, K> {
        self.forest.get(&self.key)
    }
}
impl<'a, I, V, M, K, S> NodeRefMut<'a, I, V, M, K, S>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
    I: Ord,
{
    /// Returns the direct child stored under the specified id, or `None` if there is none. The lookup is always exact.
    pub fn get_child(&self, id: &I) -> Option<NodeRef<'_, I, V, M, K, S>> {
        self.node().children.get(id).map(|x| NodeRef {
            forest: &*self.forest,
            key: x.clone(),
        })
    }
    /// Returns a *mutable* reference to the direct child stored under the specified id, or `None` if there is none.
    pub fn get_child_mut(&mut self, id: &I) -> Option<NodeRefMut<'_, I, V, M, K, S>> {
        let key = self.node().children.get(id).cloned();
        key.map(move |x| NodeRefMut {
            forest: &mut *self.forest,
            key: x,
        })
    }
    /// Detaches the direct child with the specified id, returning `true` if there was one.
    ///
    /// Only the child map of this node is modified: the detached child and its descendants stay in the forest, and the child still reports this node as its parent until it is attached elsewhere. Use [`Forest::remove_tree`] on the detached child to free it.
    ///
    /// [`Forest::remove_tree`]: struct.Forest.html#method.remove_tree " "
    pub fn remove_child(&mut self, id: &I) -> bool {
        self.forest.unlink(&self.key, id).is_some()
    }
}
impl<'a, I, V, M, K, S> NodeRefMut<'a, I, V, M, K, S>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
    I: Ord + Clone,
    M: KeyMatch<I>,
{
    /// Searches the entire tree the node belongs to for a node whose id matches `id` according to the key matching policy. See [`NodeRef::find`].
    ///
    /// [`NodeRef::find`]: struct.NodeRef.html#method.find " "
    pub fn find(&self, id: &I) -> Option<NodeRef<'_, I, V, M, K, S>> {
        let key = self.as_node_ref().find(id).map(NodeRef::into_raw_key);
        key.map(|x| NodeRef {
            forest: &*self.forest,
            key: x,
        })
    }
    /// Same as [`find`], but returns a *mutable* reference.
    ///
    /// [`find`]: #method.find " "
    pub fn find_mut(&mut self, id: &I) -> Option<NodeRefMut<'_, I, V, M, K, S>> {
        let key = self.as_node_ref().find(id).map(NodeRef::into_raw_key);
        key.map(move |x| NodeRefMut {
            forest: &mut *self.forest,
            key: x,
        })
    }

    /// Attaches the node with the specified raw key as a child of this node, returning a reference to the attached child, or `None` if nothing was attached.
    ///
    /// The child is stored under its id, replacing any child which previously had the same id, and its parent link is set to this node. If the child was attached to a different parent before, it is *not* removed from that parent's child map; use [`remove_child`] on the old parent for that.
    ///
    /// The attachment is silently refused, returning `None`, if:
    /// - `child` does not point to a node of this forest;
    /// - the child is this node or one of its ancestors;
    /// - this node has no child with the same id, but a node whose id matches the child's id according to the key matching policy already exists somewhere in the tree.
    ///
    /// # Example
    /// ```rust
    /// # use birch::Forest;
    /// let mut forest = Forest::<char>::new();
    /// let [r, x, y, z] = ['a', 'b', 'c', 'b'].map(|id| forest.create_default(id).unwrap());
    ///
    /// let mut root = forest.node_mut(r).unwrap();
    /// root.add_child(x).unwrap();
    /// root.add_child(y).unwrap();
    /// // The id 'b' is already taken by x, so z cannot be attached anywhere in this tree:
    /// assert!(forest.node_mut(x).unwrap().add_child(z).is_none());
    /// assert!(forest.node(x).unwrap().is_leaf());
    /// // ...except in x's slot, which replaces x:
    /// assert!(forest.node_mut(r).unwrap().add_child(z).is_some());
    /// assert_eq!(forest.node(r).unwrap().get_child(&'b').unwrap().into_raw_key(), z);
    /// ```
    ///
    /// [`remove_child`]: #method.remove_child " "
    pub fn add_child(&mut self, child: K) -> Option<NodeRefMut<'_, I, V, M, K, S>> {
        if !self.forest.contains(&child) {
            trace!("refusing to attach nonexistent node {:?} to {:?}", child, self.key);
            return None;
        }
        if !self.forest.accepts_child(&self.key, &child) {
            trace!(
                "refusing to attach node {:?} to {:?}: would create a duplicate id or a cycle",
                child,
                self.key
            );
            return None;
        }
        self.forest.link(&self.key, &child);
        Some(NodeRefMut {
            forest: &mut *self.forest,
            key: child,
        })
    }
}
