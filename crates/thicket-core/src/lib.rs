//! Core types and traits for the Thicket tree store.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Thicket workspace:
//! kind and address identifiers, the intrusive link contract every node
//! type must satisfy, error types, and the interning trait used to name
//! tree roots.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod node;
pub mod traits;

pub use error::{AddressFault, StoreError};
pub use id::{Address, KindId, Symbol};
pub use node::{Links, Node};
pub use traits::Interner;
