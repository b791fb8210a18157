//! Strongly-typed identifiers and the [`Address`] encoding.

use std::fmt;

use crate::error::{AddressFault, StoreError};

/// Identifies one node kind within a registry.
///
/// Kinds are declared once, in order, when a registry is defined.
/// `KindId(n)` corresponds to the n-th declared node type and doubles
/// as the index of that kind's arena inside a store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KindId(pub u16);

impl fmt::Display for KindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for KindId {
    fn from(v: u16) -> Self {
        Self(v)
    }
}

/// Handle for an interned string.
///
/// Produced by an [`Interner`](crate::Interner). Equal strings interned in
/// the same pool always yield the same symbol; the handle is only
/// meaningful for the pool that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(pub u32);

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for Symbol {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Pointer-free reference to a node: which arena, and where in it.
///
/// Addresses are plain values. They stay valid across arena growth (only
/// raw memory moves, indices do not) but become stale once the node they
/// name is removed, or once a removal relocates it.
///
/// # Encoding
///
/// An address packs into a single `u64`:
///
/// ```text
///  63        48 47        32 31                        0
/// +------------+------------+---------------------------+
/// |  reserved  |    kind    |           index           |
/// +------------+------------+---------------------------+
/// ```
///
/// The reserved bits must be zero; [`Address::from_u64`] rejects anything
/// else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    /// The arena this node lives in.
    pub kind: KindId,
    /// Position within that arena.
    pub index: u32,
}

impl Address {
    const KIND_SHIFT: u32 = 32;
    const RESERVED_MASK: u64 = !((1u64 << 48) - 1);

    /// Create an address from its parts.
    pub const fn new(kind: KindId, index: u32) -> Self {
        Self { kind, index }
    }

    /// Pack this address into a `u64`.
    pub const fn to_u64(self) -> u64 {
        ((self.kind.0 as u64) << Self::KIND_SHIFT) | self.index as u64
    }

    /// Unpack an address from a `u64`.
    ///
    /// Only checks the encoding. Whether the kind and index exist in a
    /// particular store is checked by the store itself.
    pub fn from_u64(raw: u64) -> Result<Self, StoreError> {
        if raw & Self::RESERVED_MASK != 0 {
            return Err(StoreError::InvalidAddress {
                raw,
                reason: AddressFault::HighBitsSet,
            });
        }
        Ok(Self {
            kind: KindId((raw >> Self::KIND_SHIFT) as u16),
            index: raw as u32,
        })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.index)
    }
}

impl From<Address> for u64 {
    fn from(addr: Address) -> Self {
        addr.to_u64()
    }
}

impl TryFrom<u64> for Address {
    type Error = StoreError;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        Self::from_u64(raw)
    }
}
