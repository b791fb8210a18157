//! Heterogeneous intrusive tree store.
//!
//! Nodes of different types live in per-kind arenas and link to each other
//! through three intrusive `Option<Address>` fields (`child`, `sibling`,
//! `parent`). A [`Store`] is parameterized by a closed [`Registry`] of node
//! kinds declared with [`node_kinds!`].
//!
//! # Architecture
//!
//! ```text
//! Store<R>
//! ├── KindList        (registry descriptors: layout + link accessors)
//! ├── RawArena × N    (one dense arena per kind)
//! └── RootTable       (Symbol → root Address)
//! ```
//!
//! Operations are split by concern: linkage in `link`, subtree removal with
//! reference repair in `remove`, named roots in `roots`, depth-first walks
//! in `traverse`, and whole-store consistency checks in `invariants`.
//!
//! # Example
//!
//! ```
//! use thicket_store::{impl_node, node_kinds, Address, Store, StoreConfig};
//!
//! #[derive(Clone, Copy, Debug)]
//! struct Item {
//!     id: u32,
//!     child: Option<Address>,
//!     sibling: Option<Address>,
//!     parent: Option<Address>,
//! }
//!
//! impl Item {
//!     fn new(id: u32) -> Self {
//!         Self { id, child: None, sibling: None, parent: None }
//!     }
//! }
//!
//! impl_node!(Item);
//!
//! node_kinds! {
//!     struct Items;
//!     enum ItemRef { Item(Item) }
//! }
//!
//! let mut store = Store::<Items>::new(StoreConfig::default()).unwrap();
//! let root = store.append(Item::new(0)).unwrap();
//! for id in 1..=3 {
//!     let child = store.append(Item::new(id)).unwrap();
//!     store.add_child(root, child).unwrap();
//! }
//! let ids: Vec<u32> = store
//!     .walk(root)
//!     .unwrap()
//!     .map(|visit| match visit.node {
//!         ItemRef::Item(item) => item.id,
//!     })
//!     .collect();
//! assert_eq!(ids, [0, 1, 2, 3]);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod intern;
pub mod registry;
pub mod roots;
pub mod store;
pub mod traverse;

mod invariants;
mod link;
mod remove;

#[cfg(test)]
mod testkit;

pub use config::StoreConfig;
pub use intern::StringPool;
pub use link::Children;
pub use registry::{KindDescriptor, KindList, Member, Registry};
pub use roots::RootTable;
pub use store::Store;
pub use traverse::{Order, Visit, Walk};

pub use thicket_arena::{ArenaError, KindLayout, RawArena};
pub use thicket_core::{
    impl_node, Address, AddressFault, Interner, KindId, Links, Node, StoreError, Symbol,
};
