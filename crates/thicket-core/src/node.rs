//! The intrusive link contract shared by every node kind.
//!
//! Trees are encoded left-child/right-sibling: each node records its first
//! child, its next sibling, and its predecessor. The predecessor is stored
//! in a field named `parent`, but it is only the logical parent for a
//! first child. For every later child it is the immediately preceding
//! sibling, because that is the node whose `sibling` field points here.
//! Code that climbs the `parent` chain must not assume it names the
//! logical parent.

use std::fmt;

use crate::id::Address;

/// Snapshot of a node's three link fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Links {
    /// First child.
    pub child: Option<Address>,
    /// Next sibling.
    pub sibling: Option<Address>,
    /// Predecessor: logical parent for a first child, previous sibling
    /// otherwise.
    pub parent: Option<Address>,
}

impl Links {
    /// Links of a node that is not part of any tree.
    pub const DETACHED: Self = Self {
        child: None,
        sibling: None,
        parent: None,
    };
}

/// A value that can live in a Thicket arena and be linked into a tree.
///
/// Node values are moved around as raw bytes (on arena growth and on
/// swap-remove), hence the `Copy` bound: a node type must not own heap
/// data or have drop glue.
///
/// Implement it with [`impl_node!`](crate::impl_node), which reads and
/// writes the `child`, `sibling` and `parent` fields directly. A type
/// without those fields, or with fields of the wrong type, fails to
/// compile.
pub trait Node: Copy + fmt::Debug + 'static {
    /// Current link fields.
    fn links(&self) -> Links;

    /// Overwrite all three link fields.
    fn set_links(&mut self, links: Links);
}

/// Implement [`Node`] for structs carrying `child`, `sibling` and `parent`
/// fields of type `Option<Address>`.
///
/// ```
/// use thicket_core::{impl_node, Address, Links, Node};
///
/// #[derive(Clone, Copy, Debug)]
/// struct Label {
///     width: u16,
///     child: Option<Address>,
///     sibling: Option<Address>,
///     parent: Option<Address>,
/// }
///
/// impl_node!(Label);
///
/// let label = Label { width: 4, child: None, sibling: None, parent: None };
/// assert_eq!(label.links(), Links::DETACHED);
/// ```
#[macro_export]
macro_rules! impl_node {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Node for $ty {
                #[inline]
                fn links(&self) -> $crate::Links {
                    $crate::Links {
                        child: self.child,
                        sibling: self.sibling,
                        parent: self.parent,
                    }
                }

                #[inline]
                fn set_links(&mut self, links: $crate::Links) {
                    let $crate::Links { child, sibling, parent } = links;
                    self.child = child;
                    self.sibling = sibling;
                    self.parent = parent;
                }
            }
        )+
    };
}
