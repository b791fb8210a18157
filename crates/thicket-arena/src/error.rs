//! Arena-specific error types.

use std::error::Error;
use std::fmt;

use thicket_core::{Address, KindId, StoreError};

/// Errors that can occur during arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The arena could not grow: the allocator refused, the byte size
    /// overflowed, or the configured element ceiling was reached.
    OutOfMemory {
        /// The arena that failed to grow.
        kind: KindId,
        /// Number of bytes requested.
        requested_bytes: usize,
    },
    /// An index at or past the arena's length.
    IndexOutOfBounds {
        /// The arena that was accessed.
        kind: KindId,
        /// The requested index.
        index: u32,
        /// The arena's length at the time.
        len: u32,
    },
    /// Typed access with a type other than the arena's element type.
    TypeMismatch {
        /// The arena that was accessed.
        kind: KindId,
        /// Type the caller asked for.
        requested: &'static str,
        /// Type the arena stores.
        stored: &'static str,
    },
    /// Element types must occupy memory.
    ZeroSized {
        /// Declared kind name.
        name: &'static str,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory {
                kind,
                requested_bytes,
            } => {
                write!(
                    f,
                    "arena {kind} out of memory: requested {requested_bytes} bytes"
                )
            }
            Self::IndexOutOfBounds { kind, index, len } => {
                write!(f, "arena {kind}: index {index} out of bounds (len {len})")
            }
            Self::TypeMismatch {
                kind,
                requested,
                stored,
            } => write!(f, "arena {kind} stores {stored}, not {requested}"),
            Self::ZeroSized { name } => write!(f, "kind '{name}' is zero-sized"),
        }
    }
}

impl Error for ArenaError {}

impl From<ArenaError> for StoreError {
    fn from(err: ArenaError) -> Self {
        match err {
            ArenaError::OutOfMemory {
                kind,
                requested_bytes,
            } => StoreError::OutOfMemory {
                kind,
                requested_bytes,
            },
            ArenaError::IndexOutOfBounds { kind, index, len } => {
                StoreError::out_of_bounds(Address::new(kind, index), len)
            }
            ArenaError::TypeMismatch { stored, requested, .. } => StoreError::MalformedKind {
                name: stored,
                reason: format!("accessed as {requested}"),
            },
            ArenaError::ZeroSized { name } => StoreError::MalformedKind {
                name,
                reason: "node type is zero-sized".to_string(),
            },
        }
    }
}
