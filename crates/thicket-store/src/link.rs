//! Tree linkage: threading appended nodes into trees.
//!
//! Children are kept in insertion order. The first child added to a node is
//! stored in its `child` field; every later child is appended to the tail
//! of that first child's sibling chain, and its `parent` field names the
//! sibling it was appended after (see [`thicket_core::node`]).

use std::iter::FusedIterator;

use thicket_core::{Address, StoreError};

use crate::registry::Registry;
use crate::store::Store;

impl<R: Registry> Store<R> {
    /// Add `child` as the last child of `parent`.
    ///
    /// If `parent` has no children, `child` becomes its first child.
    /// Otherwise `child` is appended after the current last child, and the
    /// parent's `child` field is left pointing at the first one.
    ///
    /// `child` must be detached (no predecessor) and must not be an
    /// ancestor of `parent`. Nothing is modified when an error is returned.
    ///
    /// Linking a lone node is O(siblings of `parent`). Linking a node that
    /// already heads a subtree also climbs `parent`'s predecessor chain to
    /// rule out a cycle.
    pub fn add_child(&mut self, parent: Address, child: Address) -> Result<(), StoreError> {
        self.check_attachable(parent, child)?;
        match self.links(parent)?.child {
            None => {
                self.set_child(parent, Some(child))?;
                self.set_parent(child, Some(parent))?;
                tracing::trace!(%parent, %child, "linked first child");
                Ok(())
            }
            Some(first) => self.append_to_chain(first, child),
        }
    }

    /// Append `sibling` to the end of the sibling chain containing `older`.
    ///
    /// Walks from `older` to the last node of its chain; that node's
    /// `sibling` field is set to `sibling`, and `sibling.parent` to that
    /// node. Same preconditions as [`Store::add_child`].
    pub fn add_sibling(&mut self, older: Address, sibling: Address) -> Result<(), StoreError> {
        self.check_attachable(older, sibling)?;
        self.append_to_chain(older, sibling)
    }

    /// Iterate over the direct children of `parent`, first to last.
    pub fn children(&self, parent: Address) -> Result<Children<'_, R>, StoreError> {
        let next = self.links(parent)?.child;
        Ok(Children {
            store: self,
            next,
            remaining: self.node_count(),
        })
    }

    fn append_to_chain(&mut self, head: Address, node: Address) -> Result<(), StoreError> {
        let tail = self.chain_tail(head)?;
        self.set_sibling(tail, Some(node))?;
        self.set_parent(node, Some(tail))?;
        tracing::trace!(%tail, %node, "linked sibling");
        Ok(())
    }

    /// Last node of the sibling chain starting at `head`.
    fn chain_tail(&self, head: Address) -> Result<Address, StoreError> {
        let mut tail = head;
        for _ in 0..self.node_count() {
            match self.links(tail)?.sibling {
                Some(next) => tail = next,
                None => return Ok(tail),
            }
        }
        Err(StoreError::BrokenLink {
            address: head,
            detail: "sibling chain does not terminate",
        })
    }

    /// Validate that `node` may be linked below or after `anchor`.
    fn check_attachable(&self, anchor: Address, node: Address) -> Result<(), StoreError> {
        self.validate(anchor)?;
        let links = self.links(node)?;
        if links.parent.is_some() {
            return Err(StoreError::AlreadyLinked { address: node });
        }
        // A lone node reaches nothing, so it can only close a cycle with itself.
        if links.child.is_none() && links.sibling.is_none() {
            return if anchor == node {
                Err(StoreError::CycleDetected {
                    parent: anchor,
                    child: node,
                })
            } else {
                Ok(())
            };
        }
        // `node` is detached, so it is the topmost node of its own tree. The
        // link closes a cycle exactly when climbing from `anchor` reaches it.
        let mut cursor = Some(anchor);
        let mut budget = self.node_count();
        while let Some(current) = cursor {
            if current == node {
                return Err(StoreError::CycleDetected {
                    parent: anchor,
                    child: node,
                });
            }
            if budget == 0 {
                return Err(StoreError::BrokenLink {
                    address: anchor,
                    detail: "parent chain does not terminate",
                });
            }
            budget -= 1;
            cursor = self.links(current)?.parent;
        }
        Ok(())
    }
}

/// Iterator over the direct children of a node. See [`Store::children`].
pub struct Children<'a, R: Registry> {
    store: &'a Store<R>,
    next: Option<Address>,
    remaining: usize,
}

impl<R: Registry> Iterator for Children<'_, R> {
    type Item = Address;

    fn next(&mut self) -> Option<Address> {
        let current = self.next?;
        if self.remaining == 0 {
            self.next = None;
            return None;
        }
        self.remaining -= 1;
        self.next = self.store.links(current).ok().and_then(|l| l.sibling);
        Some(current)
    }
}

impl<R: Registry> FusedIterator for Children<'_, R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{self, Num, Tag};
    use thicket_core::Links;

    #[test]
    fn first_child_sets_both_fields() {
        let mut store = testkit::store();
        let [root, a] = testkit::nums(&mut store, 2)[..] else {
            unreachable!()
        };
        store.add_child(root, a).unwrap();
        assert_eq!(store.links(root).unwrap().child, Some(a));
        assert_eq!(store.links(a).unwrap().parent, Some(root));
    }

    #[test]
    fn later_children_append_to_tail() {
        let mut store = testkit::store();
        let [root, a, b, c] = testkit::nums(&mut store, 4)[..] else {
            unreachable!()
        };
        store.add_child(root, a).unwrap();
        store.add_child(root, b).unwrap();
        store.add_child(root, c).unwrap();

        assert_eq!(store.links(root).unwrap().child, Some(a));
        assert_eq!(
            store.links(a).unwrap(),
            Links {
                child: None,
                sibling: Some(b),
                parent: Some(root),
            }
        );
        // Later children point back at the preceding sibling.
        assert_eq!(store.links(b).unwrap().parent, Some(a));
        assert_eq!(store.links(c).unwrap().parent, Some(b));
        assert_eq!(store.children(root).unwrap().collect::<Vec<_>>(), vec![a, b, c]);
    }

    #[test]
    fn add_sibling_walks_to_chain_tail() {
        let mut store = testkit::store();
        let [a, b, c] = testkit::nums(&mut store, 3)[..] else {
            unreachable!()
        };
        store.add_sibling(a, b).unwrap();
        store.add_sibling(a, c).unwrap();
        assert_eq!(store.links(b).unwrap().sibling, Some(c));
        assert_eq!(store.links(c).unwrap().parent, Some(b));
    }

    #[test]
    fn links_across_kinds() {
        let mut store = testkit::store();
        let root = store.append(Tag::new("root")).unwrap();
        let leaf = store.append(Num::new(1)).unwrap();
        store.add_child(root, leaf).unwrap();
        assert_eq!(store.links(leaf).unwrap().parent, Some(root));
    }

    #[test]
    fn linked_node_is_rejected() {
        let mut store = testkit::store();
        let [p, q, x] = testkit::nums(&mut store, 3)[..] else {
            unreachable!()
        };
        store.add_child(p, x).unwrap();
        assert_eq!(
            store.add_child(q, x).unwrap_err(),
            StoreError::AlreadyLinked { address: x }
        );
        assert_eq!(store.links(q).unwrap(), Links::DETACHED);
    }

    #[test]
    fn self_link_is_a_cycle() {
        let mut store = testkit::store();
        let a = store.append(Num::new(0)).unwrap();
        assert_eq!(
            store.add_child(a, a).unwrap_err(),
            StoreError::CycleDetected {
                parent: a,
                child: a,
            }
        );
        assert!(store.add_sibling(a, a).is_err());
    }

    #[test]
    fn linking_root_under_descendant_is_a_cycle() {
        let mut store = testkit::store();
        let [root, mid, leaf] = testkit::nums(&mut store, 3)[..] else {
            unreachable!()
        };
        store.add_child(root, mid).unwrap();
        store.add_child(mid, leaf).unwrap();
        assert!(matches!(
            store.add_child(leaf, root),
            Err(StoreError::CycleDetected { .. })
        ));
        assert_eq!(store.links(leaf).unwrap().child, None);
    }

    #[test]
    fn lone_node_skips_ancestor_climb() {
        let mut store = testkit::store();
        let [a, b, fresh, x, y] = testkit::nums(&mut store, 5)[..] else {
            unreachable!()
        };
        store.add_child(a, b).unwrap();
        // Corrupt `b`'s predecessor chain into a loop; only a climb notices.
        store.set_parent(b, Some(x)).unwrap();
        store.set_parent(x, Some(y)).unwrap();
        store.set_parent(y, Some(x)).unwrap();
        store.add_child(b, fresh).unwrap();
        assert_eq!(store.links(fresh).unwrap().parent, Some(b));

        // A subtree head still pays for the climb and trips on the loop.
        let [head, leaf] = testkit::nums(&mut store, 2)[..] else {
            unreachable!()
        };
        store.add_child(head, leaf).unwrap();
        assert!(matches!(
            store.add_child(b, head),
            Err(StoreError::BrokenLink {
                detail: "parent chain does not terminate",
                ..
            })
        ));
    }

    #[test]
    fn invalid_addresses_are_rejected_before_mutation() {
        let mut store = testkit::store();
        let a = store.append(Num::new(0)).unwrap();
        let ghost = Address::new(a.kind, 10);
        assert!(store.add_child(a, ghost).is_err());
        assert!(store.add_child(ghost, a).is_err());
        assert_eq!(store.links(a).unwrap(), Links::DETACHED);
    }

    #[test]
    fn children_of_leaf_is_empty() {
        let mut store = testkit::store();
        let a = store.append(Num::new(0)).unwrap();
        assert_eq!(store.children(a).unwrap().count(), 0);
    }
}
