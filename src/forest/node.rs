use core::{num::NonZeroIsize, fmt::Debug};
use alloc::{collections::BTreeMap, vec::Vec};
use granite::{ListStorage, MoveFix};

/// A node of a forest.
///
/// Created by the forest internally and only publicly exposed so that forest storages' generic arguments could be specified.
#[derive(Clone, Debug)]
pub struct Node<I, V, K>
where
    K: Clone + Debug + Eq,
{
    pub(super) id: I,
    pub(super) value: V,
    pub(super) parent: Option<K>,
    pub(super) children: BTreeMap<I, K>,
    /// Nodes holding a stale link to this one: either a parent link this node's child map does not confirm, or a child map entry this node's parent link does not confirm. One entry per link.
    pub(super) stale: Vec<K>,
}
impl<I, V, K> Node<I, V, K>
where
    K: Clone + Debug + Eq,
{
    /// Creates a node without a parent and without children. Id validity is checked by the caller.
    #[inline(always)]
    pub(super) fn detached(id: I, value: V) -> Self {
        Self {
            id,
            value,
            parent: None,
            children: BTreeMap::new(),
            stale: Vec::new(),
        }
    }
    /// Returns every node this one links to. Since links are mirrored, these are also exactly the nodes linking to this one.
    pub(super) fn neighbors(&self) -> impl Iterator<Item = &K> {
        self.parent
            .iter()
            .chain(self.children.values())
            .chain(self.stale.iter())
    }
}
impl<I, V> Node<I, V, usize> {
    /// Rewrites every link held by the node.
    fn remap_links(&mut self, mut f: impl FnMut(usize) -> usize) {
        if let Some(parent) = &mut self.parent {
            *parent = f(*parent);
        }
        for child in self.children.values_mut() {
            *child = f(*child);
        }
        for referrer in &mut self.stale {
            *referrer = f(*referrer);
        }
    }
}
impl<I, V> MoveFix for Node<I, V, usize> {
    #[inline]
    unsafe fn fix_shift<S>(storage: &mut S, shifted_from: usize, shifted_by: NonZeroIsize)
    where
        S: ListStorage<Element = Self>,
    {
        let shift = shifted_by.get();
        let len = ListStorage::len(storage);
        // Only dense storages shift elements, so every index holds a node. Every node may link
        // into the shifted range, not just the shifted nodes themselves.
        for i in 0..len {
            if shift > 0 && i >= shifted_from && i < shifted_from + shift as usize {
                // The freshly inserted elements already hold final indices
                continue;
            }
            let node = /*unsafe*/ {
                // SAFETY: i < len in a storage without holes
                ListStorage::get_unchecked_mut(storage, i)
            };
            node.remap_links(|link| {
                if shift > 0 {
                    if link >= shifted_from {
                        link + shift as usize
                    } else {
                        link
                    }
                } else {
                    let removed = shift.unsigned_abs();
                    if link >= shifted_from + removed {
                        link - removed
                    } else {
                        link
                    }
                }
            });
        }
    }

    #[inline]
    unsafe fn fix_move<S>(storage: &mut S, previous_index: usize, current_index: usize)
    where
        S: ListStorage<Element = Self>,
    {
        let neighbors: Vec<usize> = /*unsafe*/ {
            // SAFETY: the caller guarantees that the node is now at current_index
            ListStorage::get_unchecked(storage, current_index)
        }
        .neighbors()
        .copied()
        .collect();
        for neighbor in neighbors {
            let node = /*unsafe*/ {
                // SAFETY: links always point at live nodes
                ListStorage::get_unchecked_mut(storage, neighbor)
            };
            node.remap_links(|link| {
                if link == previous_index {
                    current_index
                } else {
                    link
                }
            });
        }
    }
}
