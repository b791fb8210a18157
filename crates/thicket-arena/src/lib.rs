//! Type-erased per-kind arenas for Thicket trees.
//!
//! Every node kind gets one [`RawArena`]: a single contiguous, growable
//! allocation of fixed-size elements, laid out with the kind's own size
//! and alignment. Arenas are dense. Removal swaps the last element into the
//! vacated slot and reports which index moved, so the caller can repair
//! addresses that named it.
//!
//! # Architecture
//!
//! ```text
//! RawArena (policy: growth, ceiling, kind-tagged errors)
//! └── RawBuffer (raw.rs: allocation, typed slot access, byte moves)
//!     └── KindLayout (name, size, align, TypeId)
//! ```
//!
//! # Safety
//!
//! This is the only Thicket crate that contains `unsafe` code, and all of
//! it lives in `raw.rs`. Element types are restricted to `Copy + 'static`,
//! so moving elements as raw bytes never skips a destructor, and every
//! typed access is checked against the stored `TypeId`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod arena;
pub mod error;
pub mod layout;
mod raw;

pub use arena::RawArena;
pub use error::ArenaError;
pub use layout::KindLayout;
