use core::{fmt::Debug, iter::FusedIterator};
use alloc::{collections::btree_map, vec::Vec};
use granite::{Storage, DefaultStorage};
use crate::key_match::{KeyMatch, ExactMatch};
use super::{Forest, Node, NodeRefMut};

/// A reference to a node in a forest.
///
/// Since this type does not point to the node directly, but rather the forest the node is in and the key of the node in the storage, it can be used to traverse the tree the node belongs to.
#[derive(Debug)]
pub struct NodeRef<'a, I, V = (), M = ExactMatch, K = usize, S = DefaultStorage<Node<I, V, K>>>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    pub(super) forest: &'a Forest<I, V, M, K, S>,
    pub(super) key: K,
}
impl<'a, I, V, M, K, S> NodeRef<'a, I, V, M, K, S>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    /// Creates a new `NodeRef` pointing to the specified key in the storage, or `None` if it does not exist.
    pub fn new_raw(forest: &'a Forest<I, V, M, K, S>, key: K) -> Option<Self> {
        if forest.storage.contains_key(&key) {
            Some(Self { forest, key })
        } else {
            None
        }
    }
    /// Returns a reference the raw storage key for the node.
    pub fn raw_key(&self) -> &K {
        &self.key
    }
    /// Consumes the reference and returns the underlying raw storage key for the node.
    pub fn into_raw_key(self) -> K {
        self.key
    }
    /// Returns the id of the node.
    pub fn id(&self) -> &'a I {
        &self.node().id
    }
    /// Returns a reference to the payload stored in the node.
    pub fn value(&self) -> &'a V {
        &self.node().value
    }
    /// Returns a reference to the parent node of the pointee, or `None` if it's a root node.
    ///
    /// A node detached with [`remove_child`] still reports the node it was detached from as its parent until it gets attached somewhere else.
    ///
    /// [`remove_child`]: struct.NodeRefMut.html#method.remove_child " "
    pub fn parent(&self) -> Option<Self> {
        self.node().parent.as_ref().map(|x| Self {
            forest: self.forest,
            key: x.clone(),
        })
    }
    /// Returns `true` if the node does not have a parent, `false` otherwise.
    pub fn is_root(&self) -> bool {
        self.node().parent.is_none()
    }
    /// Returns the root of the tree the node belongs to, found by following parent links. Returns `self` for a root node.
    pub fn root(&self) -> Self {
        Self {
            forest: self.forest,
            key: self.forest.root_key(self.key.clone()),
        }
    }
    /// Returns an iterator over the ancestors of the node, starting with its parent and ending with the root. Does not include `self`.
    pub fn ancestors(&self) -> NodeAncestorsIter<'a, I, V, M, K, S> {
        NodeAncestorsIter {
            forest: self.forest,
            key: self.node().parent.clone(),
        }
    }
    /// Returns the number of ancestors of the node, i.e. `0` for a root node.
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    pub(super) fn node(&self) -> &'a Node<I, V, K> {
        self.forest.get(&self.key)
    }
}
impl<'a, I, V, M, K, S> NodeRef<'a, I, V, M, K, S>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
    I: Ord,
{
    /// Returns the direct child stored under the specified id, or `None` if there is none.
    ///
    /// This is a lookup in the child map and is therefore always exact, regardless of the key matching policy of the forest. It does not search grandchildren.
    pub fn get_child(&self, id: &I) -> Option<Self> {
        self.node().children.get(id).map(|x| Self {
            forest: self.forest,
            key: x.clone(),
        })
    }
    /// Returns an iterator over references to the children of the node, in the order of their ids.
    pub fn children(&self) -> NodeChildrenIter<'a, I, V, M, K, S> {
        NodeChildrenIter {
            forest: self.forest,
            parent: self.key.clone(),
            inner: self.node().children.values(),
        }
    }
    /// Returns the number of children of the node.
    pub fn num_children(&self) -> usize {
        self.children().count()
    }
    /// Returns `true` if the node does not have children, `false` otherwise.
    pub fn is_leaf(&self) -> bool {
        self.children().next().is_none()
    }
    /// Returns a pre-order iterator over the node and everything below it. The first element yielded is always `self`, children are visited in the order of their ids.
    ///
    /// # Example
    /// ```rust
    /// # use birch::Forest;
    /// let mut forest = Forest::<u32>::new();
    /// let [a, b, c, d] = [1, 2, 3, 4].map(|id| forest.create_default(id).unwrap());
    /// forest.node_mut(a).unwrap().add_child(c).unwrap().add_child(d).unwrap();
    /// forest.node_mut(a).unwrap().add_child(b).unwrap();
    ///
    /// let order: Vec<u32> = forest.node(a).unwrap().descendants().map(|x| *x.id()).collect();
    /// assert_eq!(order, [1, 2, 3, 4]);
    /// let order: Vec<u32> = forest.node(c).unwrap().descendants().map(|x| *x.id()).collect();
    /// assert_eq!(order, [3, 4]);
    /// ```
    pub fn descendants(&self) -> NodeDescendantsIter<'a, I, V, M, K, S> {
        let mut stack = Vec::new();
        stack.push(self.key.clone());
        NodeDescendantsIter {
            forest: self.forest,
            stack,
        }
    }
    /// Returns a pre-order iterator over every node of the tree the node belongs to. Same as `self.root().descendants()`.
    pub fn all(&self) -> NodeDescendantsIter<'a, I, V, M, K, S> {
        self.root().descendants()
    }
}
impl<'a, I, V, M, K, S> NodeRef<'a, I, V, M, K, S>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
    I: Ord,
    M: KeyMatch<I>,
{
    /// Searches the node and everything below it for a node whose id matches `id` according to the key matching policy. The search is depth-first, visiting the node before its children and children in the order of their ids; the first match is returned.
    pub fn search_down(&self, id: &I) -> Option<Self> {
        self.descendants()
            .find(|x| M::keys_match(&x.node().id, id))
    }
    /// Searches the entire tree the node belongs to, starting from the root. Same as `self.root().search_down(id)`.
    ///
    /// Since the search covers the entire tree, calling this on any two nodes of the same tree gives the same result.
    pub fn find(&self, id: &I) -> Option<Self> {
        self.root().search_down(id)
    }
}
impl<I, V, M, K, S> Copy for NodeRef<'_, I, V, M, K, S>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Copy + Debug + Eq,
{
}
impl<I, V, M, K, S> Clone for NodeRef<'_, I, V, M, K, S>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    fn clone(&self) -> Self {
        Self {
            forest: self.forest,
            key: self.key.clone(),
        }
    }
}
impl<I, V, M, K, S> PartialEq for NodeRef<'_, I, V, M, K, S>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    /// Two references are equal if they point to the same node of the same forest.
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.forest, other.forest) && self.key == other.key
    }
}
impl<I, V, M, K, S> Eq for NodeRef<'_, I, V, M, K, S>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
{
}
impl<'a, I, V, M, K, S> From<NodeRefMut<'a, I, V, M, K, S>> for NodeRef<'a, I, V, M, K, S>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    fn from(op: NodeRefMut<'a, I, V, M, K, S>) -> Self {
        let (forest, key) = op.into_parts();
        Self { forest, key }
    }
}

/// An iterator over references to the children of a forest node.
///
/// A node which was attached somewhere else without being removed from its previous parent keeps an entry in that parent's child map; such entries are skipped, so that every node is visited under its actual parent only.
#[derive(Debug)]
pub struct NodeChildrenIter<'a, I, V = (), M = ExactMatch, K = usize, S = DefaultStorage<Node<I, V, K>>>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    forest: &'a Forest<I, V, M, K, S>,
    parent: K,
    inner: btree_map::Values<'a, I, K>,
}
impl<'a, I, V, M, K, S> Iterator for NodeChildrenIter<'a, I, V, M, K, S>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    type Item = NodeRef<'a, I, V, M, K, S>;
    fn next(&mut self) -> Option<Self::Item> {
        let (forest, parent) = (self.forest, &self.parent);
        self.inner
            .find(|&child| forest.get(child).parent.as_ref() == Some(parent))
            .map(|child| NodeRef {
                forest,
                key: child.clone(),
            })
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}
impl<I, V, M, K, S> DoubleEndedIterator for NodeChildrenIter<'_, I, V, M, K, S>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        let (forest, parent) = (self.forest, &self.parent);
        self.inner
            .rfind(|&child| forest.get(child).parent.as_ref() == Some(parent))
            .map(|child| NodeRef {
                forest,
                key: child.clone(),
            })
    }
}
impl<I, V, M, K, S> FusedIterator for NodeChildrenIter<'_, I, V, M, K, S>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
{
}

/// A pre-order iterator over a forest node and all nodes below it.
#[derive(Debug)]
pub struct NodeDescendantsIter<'a, I, V = (), M = ExactMatch, K = usize, S = DefaultStorage<Node<I, V, K>>>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    forest: &'a Forest<I, V, M, K, S>,
    stack: Vec<K>,
}
impl<'a, I, V, M, K, S> Iterator for NodeDescendantsIter<'a, I, V, M, K, S>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
    I: Ord,
{
    type Item = NodeRef<'a, I, V, M, K, S>;
    fn next(&mut self) -> Option<Self::Item> {
        let key = self.stack.pop()?;
        let node = NodeRef {
            forest: self.forest,
            key,
        };
        // Reversed so that the smallest id ends up on top of the stack
        self.stack
            .extend(node.children().rev().map(NodeRef::into_raw_key));
        Some(node)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.stack.len(), None)
    }
}
impl<I, V, M, K, S> FusedIterator for NodeDescendantsIter<'_, I, V, M, K, S>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
    I: Ord,
{
}

/// An iterator over the ancestors of a forest node, from its parent up to the root.
#[derive(Debug)]
pub struct NodeAncestorsIter<'a, I, V = (), M = ExactMatch, K = usize, S = DefaultStorage<Node<I, V, K>>>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    forest: &'a Forest<I, V, M, K, S>,
    key: Option<K>,
}
impl<'a, I, V, M, K, S> Iterator for NodeAncestorsIter<'a, I, V, M, K, S>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
{
    type Item = NodeRef<'a, I, V, M, K, S>;
    fn next(&mut self) -> Option<Self::Item> {
        let key = self.key.take()?;
        self.key = self.forest.get(&key).parent.clone();
        Some(NodeRef {
            forest: self.forest,
            key,
        })
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.key.is_some() {
            (1, None)
        } else {
            (0, Some(0))
        }
    }
}
impl<I, V, M, K, S> FusedIterator for NodeAncestorsIter<'_, I, V, M, K, S>
where
    S: Storage<Element = Node<I, V, K>, Key = K>,
    K: Clone + Debug + Eq,
{
}
