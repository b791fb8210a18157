//! Subtree removal by swap-remove, with reference repair.
//!
//! Removing a node from its arena moves the arena's last node into the
//! vacated slot, which changes that node's address. Every field that
//! referenced the old address is rewritten:
//!
//! - the predecessor's `child` or `sibling` field (whichever pointed at it),
//! - the `parent` field of its first child and of its next sibling,
//! - any root-table entry naming it.
//!
//! The moved node's own fields reference other nodes and stay valid as-is.

use thicket_core::{Address, StoreError};

use crate::registry::Registry;
use crate::store::Store;

/// A node moved by swap-remove: it used to live at `from`, now at `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Relocation {
    from: Address,
    to: Address,
}

/// Work done by one subtree removal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Removal {
    /// Nodes removed.
    removed: usize,
    /// Child links followed while looking for leaves.
    descended: usize,
}

impl<R: Registry> Store<R> {
    /// Remove `target` and every node below it, returning how many nodes
    /// were removed.
    ///
    /// Descendants are removed first (post-order along `child` links, each
    /// child's whole sibling chain included). `target` is then spliced out
    /// of whatever chain held it, so its own later siblings stay in the
    /// tree, re-linked to its predecessor. Root-table entries naming a
    /// removed node are dropped.
    ///
    /// Addresses of removed nodes are dead afterwards, and one address per
    /// removal may have been relocated: callers must not keep addresses of
    /// nodes in the affected arenas across this call.
    pub fn swap_remove(&mut self, target: Address) -> Result<usize, StoreError> {
        let removal = self.remove_subtree(target)?;
        tracing::debug!(
            removed = removal.removed,
            descended = removal.descended,
            "subtree removed"
        );
        Ok(removal.removed)
    }

    /// Post-order removal below and including `target`.
    ///
    /// The descent resumes from each removed leaf's predecessor, so every
    /// node is stepped into once and the work is linear in subtree size.
    fn remove_subtree(&mut self, target: Address) -> Result<Removal, StoreError> {
        self.validate(target)?;
        let total = self.node_count();
        let mut target = target;
        let mut cursor = target;
        let mut removal = Removal::default();
        loop {
            // Deepest node on the first-child path; it has no children.
            while let Some(child) = self.links(cursor)?.child {
                cursor = child;
                removal.descended += 1;
            }
            let leaf = cursor;
            let pred = self.links(leaf)?.parent;
            let relocation = self.remove_leaf(leaf)?;
            removal.removed += 1;
            if leaf == target {
                return Ok(removal);
            }
            // `leaf` was reached through a child link, so it has a predecessor.
            let Some(mut pred) = pred else {
                return Err(StoreError::BrokenLink {
                    address: leaf,
                    detail: "descendant has no predecessor",
                });
            };
            if let Some(moved) = relocation {
                if moved.from == target {
                    target = moved.to;
                }
                if moved.from == pred {
                    pred = moved.to;
                }
            }
            if removal.removed > total {
                return Err(StoreError::BrokenLink {
                    address: target,
                    detail: "subtree removal did not terminate",
                });
            }
            cursor = pred;
        }
    }

    /// Unlink and free a node without children.
    fn remove_leaf(&mut self, leaf: Address) -> Result<Option<Relocation>, StoreError> {
        let links = self.links(leaf)?;
        debug_assert!(links.child.is_none());

        if let Some(pred) = links.parent {
            let pred_links = self.links(pred)?;
            if pred_links.child == Some(leaf) {
                self.set_child(pred, links.sibling)?;
            } else if pred_links.sibling == Some(leaf) {
                self.set_sibling(pred, links.sibling)?;
            } else {
                return Err(StoreError::BrokenLink {
                    address: leaf,
                    detail: "predecessor does not reference node",
                });
            }
        }
        if let Some(next) = links.sibling {
            self.set_parent(next, links.parent)?;
        }
        self.roots.forget(leaf);

        let moved_from = self.arena_mut(leaf.kind)?.swap_remove(leaf.index)?;
        let Some(from_index) = moved_from else {
            return Ok(None);
        };
        let relocation = Relocation {
            from: Address::new(leaf.kind, from_index),
            to: leaf,
        };
        self.repair(relocation)?;
        Ok(Some(relocation))
    }

    /// Point every reference to `relocation.from` at `relocation.to`.
    fn repair(&mut self, relocation: Relocation) -> Result<(), StoreError> {
        let Relocation { from, to } = relocation;
        let links = self.links(to)?;

        if let Some(pred) = links.parent {
            let pred_links = self.links(pred)?;
            if pred_links.child == Some(from) {
                self.set_child(pred, Some(to))?;
            } else if pred_links.sibling == Some(from) {
                self.set_sibling(pred, Some(to))?;
            } else {
                return Err(StoreError::BrokenLink {
                    address: to,
                    detail: "predecessor of moved node does not reference it",
                });
            }
        }
        if let Some(child) = links.child {
            self.set_parent(child, Some(to))?;
        }
        if let Some(next) = links.sibling {
            self.set_parent(next, Some(to))?;
        }
        self.roots.relocate(from, to);
        tracing::trace!(%from, %to, "relocated node");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{self, Num, Tag};
    use thicket_core::{KindId, Links, Symbol};

    #[test]
    fn removing_last_index_moves_nothing() {
        let mut store = testkit::store();
        let [root, a] = testkit::nums(&mut store, 2)[..] else {
            unreachable!()
        };
        store.add_child(root, a).unwrap();
        assert_eq!(store.swap_remove(a).unwrap(), 1);
        assert_eq!(store.len(KindId(0)), 1);
        assert_eq!(store.links(root).unwrap(), Links::DETACHED);
    }

    #[test]
    fn removing_first_child_promotes_its_sibling() {
        let mut store = testkit::store();
        let [root, a, b, c] = testkit::nums(&mut store, 4)[..] else {
            unreachable!()
        };
        store.add_child(root, a).unwrap();
        store.add_child(root, b).unwrap();
        store.add_child(root, c).unwrap();

        store.swap_remove(a).unwrap();
        // c (index 3) moved into a's slot (index 1).
        let c = Address::new(KindId(0), 1);
        assert_eq!(testkit::value(&store, c), 3);
        assert_eq!(store.links(root).unwrap().child, Some(b));
        assert_eq!(store.links(b).unwrap().parent, Some(root));
        assert_eq!(store.links(b).unwrap().sibling, Some(c));
        assert_eq!(store.links(c).unwrap().parent, Some(b));
        store.check_invariants().unwrap();
    }

    #[test]
    fn removing_middle_sibling_splices_chain() {
        let mut store = testkit::store();
        let [root, a, b, c] = testkit::nums(&mut store, 4)[..] else {
            unreachable!()
        };
        store.add_child(root, a).unwrap();
        store.add_child(root, b).unwrap();
        store.add_child(root, c).unwrap();

        store.swap_remove(b).unwrap();
        let c = Address::new(KindId(0), 2);
        assert_eq!(store.links(a).unwrap().sibling, Some(c));
        assert_eq!(store.links(c).unwrap().parent, Some(a));
        let values: Vec<u32> = store
            .children(root)
            .unwrap()
            .map(|addr| testkit::value(&store, addr))
            .collect();
        assert_eq!(values, vec![1, 3]);
        store.check_invariants().unwrap();
    }

    #[test]
    fn removal_cascades_through_subtree() {
        let mut store = testkit::store();
        let [root, a, a1, a2, a1x, b] = testkit::nums(&mut store, 6)[..] else {
            unreachable!()
        };
        store.add_child(root, a).unwrap();
        store.add_child(root, b).unwrap();
        store.add_child(a, a1).unwrap();
        store.add_child(a, a2).unwrap();
        store.add_child(a1, a1x).unwrap();

        assert_eq!(store.swap_remove(a).unwrap(), 4);
        assert_eq!(store.len(KindId(0)), 2);
        let children: Vec<u32> = store
            .children(Address::new(KindId(0), 0))
            .unwrap()
            .map(|addr| testkit::value(&store, addr))
            .collect();
        assert_eq!(children, vec![5]);
        store.check_invariants().unwrap();
    }

    #[test]
    fn moved_node_keeps_its_children_attached() {
        let mut store = testkit::store();
        // Index 3 ends up as the moved node and owns a child in another arena.
        let [root, a, b, last] = testkit::nums(&mut store, 4)[..] else {
            unreachable!()
        };
        let tag = store.append(Tag::new("under-last")).unwrap();
        store.add_child(root, a).unwrap();
        store.add_child(root, last).unwrap();
        store.add_child(root, b).unwrap();
        store.add_child(last, tag).unwrap();

        store.swap_remove(a).unwrap();
        let last = Address::new(KindId(0), 1);
        assert_eq!(testkit::value(&store, last), 3);
        assert_eq!(store.links(root).unwrap().child, Some(last));
        assert_eq!(store.links(tag).unwrap().parent, Some(last));
        assert_eq!(store.links(last).unwrap().child, Some(tag));
        assert_eq!(store.links(b).unwrap().parent, Some(last));
        store.check_invariants().unwrap();
    }

    #[test]
    fn removing_root_removes_whole_tree_and_its_entry() {
        let mut store = testkit::store();
        let [other, root, a, b] = testkit::nums(&mut store, 4)[..] else {
            unreachable!()
        };
        store.add_child(root, a).unwrap();
        store.add_child(a, b).unwrap();
        store.add_root(Symbol(0), root).unwrap();
        store.add_root(Symbol(1), other).unwrap();

        assert_eq!(store.swap_remove(root).unwrap(), 3);
        assert_eq!(store.root(Symbol(0)), None);
        assert_eq!(store.root(Symbol(1)), Some(other));
        assert_eq!(store.len(KindId(0)), 1);
        store.check_invariants().unwrap();
    }

    #[test]
    fn relocated_root_entry_follows_node() {
        let mut store = testkit::store();
        let [doomed, keep] = testkit::nums(&mut store, 2)[..] else {
            unreachable!()
        };
        store.add_root(Symbol(7), keep).unwrap();
        store.swap_remove(doomed).unwrap();
        assert_eq!(store.root(Symbol(7)), Some(Address::new(KindId(0), 0)));
        assert_eq!(testkit::value(&store, Address::new(KindId(0), 0)), 1);
    }

    #[test]
    fn removing_target_relocated_mid_cascade() {
        let mut store = testkit::store();
        // Target sits at the last index, so removing its child (index 0)
        // relocates the target itself.
        let child = store.append(Num::new(10)).unwrap();
        let target = store.append(Num::new(11)).unwrap();
        store.add_child(target, child).unwrap();
        assert_eq!(store.swap_remove(target).unwrap(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn invalid_target_is_reported_and_changes_nothing() {
        let mut store = testkit::store();
        testkit::nums(&mut store, 2);
        let err = store.swap_remove(Address::new(KindId(0), 2)).unwrap_err();
        assert_eq!(err, StoreError::out_of_bounds(Address::new(KindId(0), 2), 2));
        assert_eq!(store.len(KindId(0)), 2);
    }

    #[test]
    fn deep_chain_descends_each_node_once() {
        let mut store = testkit::store();
        let nodes = testkit::nums(&mut store, 300);
        for pair in nodes.windows(2) {
            store.add_child(pair[0], pair[1]).unwrap();
        }
        let removal = store.remove_subtree(nodes[0]).unwrap();
        assert_eq!(
            removal,
            Removal {
                removed: 300,
                descended: 299,
            }
        );
        assert!(store.is_empty());
    }

    #[test]
    fn bushy_subtree_descends_each_node_once() {
        let mut store = testkit::store();
        // Shuffled parents so relocations hit the resume point too.
        let nodes = testkit::nums(&mut store, 12);
        for (i, parent) in [0, 0, 1, 1, 3, 2, 0, 6, 4, 4, 9].into_iter().enumerate() {
            store.add_child(nodes[parent], nodes[i + 1]).unwrap();
        }
        let keep = store.append(Tag::new("other tree")).unwrap();
        let removal = store.remove_subtree(nodes[1]).unwrap();
        // Node 1 owns 3, 4, 5, 9, 10, 11 (plus itself).
        assert_eq!(removal.removed, 7);
        assert_eq!(removal.descended, removal.removed - 1);
        assert_eq!(store.len(KindId(0)), 5);
        assert_eq!(store.get::<Tag>(keep).unwrap().label, "other tree");
        store.check_invariants().unwrap();
    }

    #[test]
    fn later_siblings_of_target_survive() {
        let mut store = testkit::store();
        let [a, b, c] = testkit::nums(&mut store, 3)[..] else {
            unreachable!()
        };
        store.add_sibling(a, b).unwrap();
        store.add_sibling(a, c).unwrap();
        // `a` heads a chain with no parent: removing it detaches `b`.
        assert_eq!(store.swap_remove(a).unwrap(), 1);
        let b = Address::new(KindId(0), 1);
        let c = Address::new(KindId(0), 0);
        assert_eq!(store.links(b).unwrap().parent, None);
        assert_eq!(store.links(b).unwrap().sibling, Some(c));
        assert_eq!(store.links(c).unwrap().parent, Some(b));
        store.check_invariants().unwrap();
    }
}
