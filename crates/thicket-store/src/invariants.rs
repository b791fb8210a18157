//! Whole-store consistency checking.
//!
//! [`Store::check_invariants`] walks every live node and verifies the
//! linkage the store's own operations maintain. It is O(nodes × depth) and
//! meant for tests and debugging, not hot paths.

use thicket_core::{Address, KindId, StoreError};

use crate::registry::Registry;
use crate::store::Store;

impl<R: Registry> Store<R> {
    /// Verify linkage consistency across the whole store.
    ///
    /// Checks that:
    ///
    /// - every `child`, `sibling` and `parent` field, and every root-table
    ///   entry, names a live node;
    /// - every `child` and `sibling` target names its source as `parent`;
    /// - every `parent` names a node whose `child` or `sibling` (exactly
    ///   one) points back;
    /// - every parent chain terminates.
    ///
    /// Returns the first violation found as [`StoreError::BrokenLink`], or
    /// the address error for a dangling reference.
    pub fn check_invariants(&self) -> Result<(), StoreError> {
        for (name, root) in self.roots.iter() {
            self.validate(root).map_err(|err| {
                tracing::debug!(%name, %root, %err, "dangling root entry");
                err
            })?;
        }
        for (k, arena) in self.arenas.iter().enumerate() {
            let kind = KindId(k as u16);
            for index in 0..arena.len() {
                self.check_node(Address::new(kind, index))?;
            }
        }
        Ok(())
    }

    fn check_node(&self, node: Address) -> Result<(), StoreError> {
        let links = self.links(node)?;
        let broken = |detail| StoreError::BrokenLink {
            address: node,
            detail,
        };

        for target in [links.child, links.sibling].into_iter().flatten() {
            if self.links(target)?.parent != Some(node) {
                return Err(broken("link target does not name node as parent"));
            }
        }
        if links.child.is_some() && links.child == links.sibling {
            return Err(broken("child and sibling are the same node"));
        }
        if let Some(pred) = links.parent {
            let pred_links = self.links(pred)?;
            let via_child = pred_links.child == Some(node);
            let via_sibling = pred_links.sibling == Some(node);
            if via_child == via_sibling {
                return Err(broken("predecessor does not reference node exactly once"));
            }
        }

        let mut cursor = links.parent;
        for _ in 0..self.node_count() {
            match cursor {
                None => return Ok(()),
                Some(current) if current == node => break,
                Some(current) => cursor = self.links(current)?.parent,
            }
        }
        Err(broken("parent chain does not terminate"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{self, Tag};
    use thicket_core::{AddressFault, Links, Symbol};

    #[test]
    fn well_formed_store_passes() {
        let mut store = testkit::store();
        let [r, a, b] = testkit::nums(&mut store, 3)[..] else {
            unreachable!()
        };
        let t = store.append(Tag::new("t")).unwrap();
        store.add_child(r, a).unwrap();
        store.add_child(r, b).unwrap();
        store.add_child(a, t).unwrap();
        store.add_root(Symbol(0), r).unwrap();
        store.check_invariants().unwrap();
    }

    #[test]
    fn one_sided_link_is_reported() {
        let mut store = testkit::store();
        let [a, b] = testkit::nums(&mut store, 2)[..] else {
            unreachable!()
        };
        store.set_child(a, Some(b)).unwrap();
        assert_eq!(
            store.check_invariants().unwrap_err(),
            StoreError::BrokenLink {
                address: a,
                detail: "link target does not name node as parent",
            }
        );
    }

    #[test]
    fn dangling_link_is_reported() {
        let mut store = testkit::store();
        let a = testkit::nums(&mut store, 1)[0];
        store
            .write_links(
                a,
                Links {
                    sibling: Some(Address::new(KindId(1), 4)),
                    ..Links::DETACHED
                },
            )
            .unwrap();
        assert!(matches!(
            store.check_invariants(),
            Err(StoreError::InvalidAddress {
                reason: AddressFault::OutOfBounds { len: 0 },
                ..
            })
        ));
    }

    #[test]
    fn parent_cycle_is_reported() {
        let mut store = testkit::store();
        let [a, b] = testkit::nums(&mut store, 2)[..] else {
            unreachable!()
        };
        store
            .write_links(
                a,
                Links {
                    child: Some(b),
                    sibling: None,
                    parent: Some(b),
                },
            )
            .unwrap();
        store
            .write_links(
                b,
                Links {
                    child: Some(a),
                    sibling: None,
                    parent: Some(a),
                },
            )
            .unwrap();
        assert!(matches!(
            store.check_invariants(),
            Err(StoreError::BrokenLink {
                detail: "parent chain does not terminate",
                ..
            })
        ));
    }

    #[test]
    fn dangling_root_is_reported() {
        let mut store = testkit::store();
        let a = testkit::nums(&mut store, 1)[0];
        store.add_root(Symbol(1), a).unwrap();
        store.roots.insert(Symbol(2), Address::new(KindId(0), 3));
        assert!(store.check_invariants().is_err());
    }
}
