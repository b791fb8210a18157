//! Error types for the Thicket tree store.
//!
//! A single [`StoreError`] covers registry construction, addressing,
//! allocation and linkage. Lookup misses (an unknown root name) are not
//! errors and surface as `None`.

use std::error::Error;
use std::fmt;

use crate::id::{Address, KindId};

/// Why an address failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressFault {
    /// The reserved high bits of an encoded address were not zero.
    HighBitsSet,
    /// The kind is not part of the store's registry.
    UnknownKind {
        /// Number of kinds the registry declares.
        kind_count: usize,
    },
    /// The index is past the end of the kind's arena.
    OutOfBounds {
        /// Current length of the arena.
        len: u32,
    },
}

impl fmt::Display for AddressFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HighBitsSet => write!(f, "reserved bits are set"),
            Self::UnknownKind { kind_count } => {
                write!(f, "kind is not registered ({kind_count} kinds)")
            }
            Self::OutOfBounds { len } => write!(f, "index out of bounds (len {len})"),
        }
    }
}

/// Errors returned by store operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// An arena could not grow to hold another node.
    ///
    /// The arena is left exactly as it was before the failed operation.
    OutOfMemory {
        /// The arena that failed to grow.
        kind: KindId,
        /// Size of the allocation that was attempted, in bytes.
        requested_bytes: usize,
    },
    /// An address does not name a live node in this store.
    InvalidAddress {
        /// The address, in its packed form.
        raw: u64,
        /// What was wrong with it.
        reason: AddressFault,
    },
    /// Typed access through an address of a different kind.
    KindMismatch {
        /// The address that was dereferenced.
        address: Address,
        /// The kind the caller asked for.
        expected: KindId,
    },
    /// A registry declares a kind the store cannot hold.
    ///
    /// Only produced while constructing a store.
    MalformedKind {
        /// Declared name of the offending kind.
        name: &'static str,
        /// Description of the problem.
        reason: String,
    },
    /// Store configuration failed validation.
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },
    /// The node to be linked already has a predecessor.
    AlreadyLinked {
        /// The node that was already linked.
        address: Address,
    },
    /// Linking would make a node its own ancestor.
    CycleDetected {
        /// The node that would have received the link.
        parent: Address,
        /// The node that would have been linked.
        child: Address,
    },
    /// Two nodes disagree about a link between them.
    ///
    /// Only reachable if node link fields were corrupted from outside the
    /// store's own operations.
    BrokenLink {
        /// The node at which the inconsistency was found.
        address: Address,
        /// Which relationship is inconsistent.
        detail: &'static str,
    },
}

impl StoreError {
    /// Shorthand for an out-of-bounds [`StoreError::InvalidAddress`].
    pub fn out_of_bounds(address: Address, len: u32) -> Self {
        Self::InvalidAddress {
            raw: address.to_u64(),
            reason: AddressFault::OutOfBounds { len },
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory {
                kind,
                requested_bytes,
            } => {
                write!(
                    f,
                    "out of memory growing arena for kind {kind}: requested {requested_bytes} bytes"
                )
            }
            Self::InvalidAddress { raw, reason } => {
                write!(f, "invalid address {raw:#x}: {reason}")
            }
            Self::KindMismatch { address, expected } => {
                write!(f, "address {address} is not of kind {expected}")
            }
            Self::MalformedKind { name, reason } => {
                write!(f, "malformed node kind '{name}': {reason}")
            }
            Self::InvalidConfig { reason } => write!(f, "invalid store config: {reason}"),
            Self::AlreadyLinked { address } => {
                write!(f, "node {address} is already linked into a tree")
            }
            Self::CycleDetected { parent, child } => {
                write!(f, "linking {child} under {parent} would create a cycle")
            }
            Self::BrokenLink { address, detail } => {
                write!(f, "broken link at {address}: {detail}")
            }
        }
    }
}

impl Error for StoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_address_display_includes_reason() {
        let err = StoreError::out_of_bounds(Address::new(KindId(1), 9), 4);
        assert_eq!(
            err.to_string(),
            "invalid address 0x100000009: index out of bounds (len 4)"
        );
    }

    #[test]
    fn out_of_memory_display() {
        let err = StoreError::OutOfMemory {
            kind: KindId(2),
            requested_bytes: 4096,
        };
        assert_eq!(
            err.to_string(),
            "out of memory growing arena for kind 2: requested 4096 bytes"
        );
    }
}
