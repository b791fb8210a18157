//! Depth-first traversal in constant auxiliary space.
//!
//! A [`Walk`] carries only the start address, the next address and a step
//! budget. Ascent uses `parent` links, which name the logical parent for a
//! first child and the previous sibling otherwise; each upward step checks
//! which field of the predecessor points back to tell the two apart.
//!
//! The subtree walked is `start` plus everything reachable through its
//! `child` link. The start node's own later siblings are not visited.

use std::fmt;
use std::iter::FusedIterator;

use thicket_core::{Address, StoreError};

use crate::registry::Registry;
use crate::store::Store;

/// Which link a walk follows first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Order {
    /// Pre-order: a node's children before its later siblings.
    #[default]
    ChildFirst,
    /// A node's later siblings before its children.
    SiblingFirst,
}

/// One node yielded by a [`Walk`].
pub struct Visit<'a, R: Registry> {
    /// Where the node lives.
    pub address: Address,
    /// Borrowed view of the node.
    pub node: R::Ref<'a>,
}

impl<R: Registry> Clone for Visit<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Registry> Copy for Visit<'_, R> {}

impl<R: Registry> fmt::Debug for Visit<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Visit")
            .field("address", &self.address)
            .field("node", &self.node)
            .finish()
    }
}

/// Depth-first iterator over a subtree. See [`Store::walk`].
pub struct Walk<'a, R: Registry> {
    store: &'a Store<R>,
    start: Address,
    next: Option<Address>,
    order: Order,
    remaining: usize,
}

impl<R: Registry> Store<R> {
    /// Walk the subtree rooted at `start` in child-first pre-order.
    pub fn walk(&self, start: Address) -> Result<Walk<'_, R>, StoreError> {
        self.walk_with(start, Order::ChildFirst)
    }

    /// Walk the subtree rooted at `start` in the given order.
    ///
    /// `start` is checked up-front. A broken link met mid-walk ends the
    /// walk early and is logged at `warn`.
    pub fn walk_with(&self, start: Address, order: Order) -> Result<Walk<'_, R>, StoreError> {
        self.validate(start)?;
        Ok(Walk {
            store: self,
            start,
            next: Some(start),
            order,
            remaining: self.node_count(),
        })
    }
}

impl<R: Registry> Walk<'_, R> {
    /// The order this walk follows.
    pub fn order(&self) -> Order {
        self.order
    }

    /// Address following `current`, or `None` when the subtree is done.
    fn successor(&self, current: Address) -> Result<Option<Address>, StoreError> {
        let links = self.store.links(current)?;
        let sibling = links.sibling.filter(|_| current != self.start);
        let (first, second) = match self.order {
            Order::ChildFirst => (links.child, sibling),
            Order::SiblingFirst => (sibling, links.child),
        };
        match first.or(second) {
            Some(next) => Ok(Some(next)),
            None => self.ascend(current),
        }
    }

    /// Climb from a finished node to the next unvisited branch.
    fn ascend(&self, mut from: Address) -> Result<Option<Address>, StoreError> {
        for _ in 0..=self.store.node_count() {
            if from == self.start {
                return Ok(None);
            }
            let Some(pred) = self.store.links(from)?.parent else {
                return Ok(None);
            };
            let pred_links = self.store.links(pred)?;
            let via_child = pred_links.child == Some(from);
            let via_sibling = pred_links.sibling == Some(from);
            match (self.order, via_child, via_sibling) {
                // Finished `pred`'s children; its later siblings come next.
                (Order::ChildFirst, true, _) => {
                    if pred == self.start {
                        return Ok(None);
                    }
                    if let Some(next) = pred_links.sibling {
                        return Ok(Some(next));
                    }
                }
                // Finished `pred`'s later siblings; its children come next.
                (Order::SiblingFirst, _, true) => {
                    if let Some(next) = pred_links.child {
                        return Ok(Some(next));
                    }
                }
                (_, true, _) | (_, _, true) => {}
                (_, false, false) => {
                    return Err(StoreError::BrokenLink {
                        address: from,
                        detail: "predecessor does not reference node",
                    });
                }
            }
            from = pred;
        }
        Err(StoreError::BrokenLink {
            address: from,
            detail: "parent chain does not terminate",
        })
    }
}

impl<'a, R: Registry> Iterator for Walk<'a, R> {
    type Item = Visit<'a, R>;

    fn next(&mut self) -> Option<Visit<'a, R>> {
        let current = self.next.take()?;
        if self.remaining == 0 {
            tracing::warn!(start = %self.start, "walk exceeded node count; stopping");
            return None;
        }
        self.remaining -= 1;
        let node = match self.store.view(current) {
            Ok(node) => node,
            Err(err) => {
                tracing::warn!(start = %self.start, %current, %err, "walk stopped");
                return None;
            }
        };
        match self.successor(current) {
            Ok(next) => self.next = next,
            Err(err) => tracing::warn!(start = %self.start, %current, %err, "walk stopped"),
        }
        Some(Visit {
            address: current,
            node,
        })
    }
}

impl<R: Registry> FusedIterator for Walk<'_, R> {}

impl<R: Registry> fmt::Debug for Walk<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Walk")
            .field("start", &self.start)
            .field("next", &self.next)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}
