//! Thicket: a heterogeneous, intrusive tree store over per-kind arenas.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Thicket sub-crates. For most users, adding `thicket` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use thicket::prelude::*;
//!
//! #[derive(Clone, Copy, Debug)]
//! struct Dir {
//!     name: &'static str,
//!     child: Option<Address>,
//!     sibling: Option<Address>,
//!     parent: Option<Address>,
//! }
//!
//! #[derive(Clone, Copy, Debug)]
//! struct File {
//!     bytes: u64,
//!     child: Option<Address>,
//!     sibling: Option<Address>,
//!     parent: Option<Address>,
//! }
//!
//! impl_node!(Dir, File);
//!
//! node_kinds! {
//!     struct Fs;
//!     enum FsRef {
//!         Dir(Dir),
//!         File(File),
//!     }
//! }
//!
//! let mut store = Store::<Fs>::new(StoreConfig::default()).unwrap();
//! let mut names = StringPool::new();
//!
//! let root = store
//!     .append(Dir { name: "/", child: None, sibling: None, parent: None })
//!     .unwrap();
//! let file = store
//!     .append(File { bytes: 512, child: None, sibling: None, parent: None })
//!     .unwrap();
//! store.add_child(root, file).unwrap();
//! store.add_named_root(&mut names, "fs", root).unwrap();
//!
//! let top = store.named_root(&names, "fs").unwrap();
//! let total: u64 = store
//!     .walk(top)
//!     .unwrap()
//!     .map(|visit| match visit.node {
//!         FsRef::File(f) => f.bytes,
//!         FsRef::Dir(_) => 0,
//!     })
//!     .sum();
//! assert_eq!(total, 512);
//!
//! // Removing the root removes its whole subtree and its root entry.
//! assert_eq!(store.swap_remove(top).unwrap(), 2);
//! assert!(store.is_empty());
//! assert_eq!(store.named_root(&names, "fs"), None);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `thicket-core` | Ids, addresses, link contract, errors, interning trait |
//! | [`arena`] | `thicket-arena` | Type-erased per-kind arenas |
//! | [`store`] | `thicket-store` | Registry, store, linkage, removal, roots, traversal |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and ids (`thicket-core`).
///
/// Contains [`types::Address`], the [`types::Node`] link contract and the
/// [`types::StoreError`] enum.
pub use thicket_core as types;

/// Type-erased per-kind arenas (`thicket-arena`).
///
/// Most users never touch [`arena::RawArena`] directly; the store owns one
/// per kind.
pub use thicket_arena as arena;

/// The tree store (`thicket-store`).
///
/// [`store::Store`] plus the [`store::node_kinds!`] registry macro.
pub use thicket_store as store;

pub use thicket_core::impl_node;
pub use thicket_store::node_kinds;

/// Common imports for typical Thicket usage.
///
/// ```rust
/// use thicket::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use thicket_core::{Address, Interner, KindId, Links, Node, Symbol};

    // Errors
    pub use thicket_core::{AddressFault, StoreError};

    // Macros
    pub use thicket_core::impl_node;
    pub use thicket_store::node_kinds;

    // Store
    pub use thicket_store::{
        Member, Order, Registry, RootTable, Store, StoreConfig, StringPool, Visit, Walk,
    };
}
