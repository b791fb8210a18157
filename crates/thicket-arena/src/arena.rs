//! Growable, dense, type-erased arena for one node kind.
//!
//! A [`RawArena`] holds every live value of one kind in a single contiguous
//! allocation. Values are addressed by index; indices never change on
//! growth, only on [`RawArena::swap_remove`], which reports the one index
//! that moved.

use std::fmt;

use thicket_core::KindId;

use crate::error::ArenaError;
use crate::layout::KindLayout;
use crate::raw::{AllocFailure, RawBuffer};

/// Dense arena of fixed-size elements of one kind.
///
/// Growth doubles the capacity (starting at 1), or jumps straight to the
/// requested size when that is larger, never exceeding `max_len`.
pub struct RawArena {
    kind: KindId,
    buf: RawBuffer,
    max_len: u32,
}

impl RawArena {
    /// Create an arena for `layout`, reserving `initial_capacity` slots.
    ///
    /// `max_len` caps the number of elements the arena will ever hold;
    /// attempts to grow past it fail with [`ArenaError::OutOfMemory`].
    pub fn with_capacity(
        kind: KindId,
        layout: KindLayout,
        initial_capacity: u32,
        max_len: u32,
    ) -> Result<Self, ArenaError> {
        if layout.is_zero_sized() {
            return Err(ArenaError::ZeroSized { name: layout.name });
        }
        let mut arena = Self {
            kind,
            buf: RawBuffer::new(layout),
            max_len,
        };
        if initial_capacity > 0 {
            arena.grow_exact(initial_capacity.min(max_len))?;
        }
        Ok(arena)
    }

    /// Create an empty, unallocated arena with no element ceiling beyond
    /// the `u32` index range.
    pub fn new(kind: KindId, layout: KindLayout) -> Result<Self, ArenaError> {
        Self::with_capacity(kind, layout, 0, u32::MAX)
    }

    /// The kind this arena stores.
    pub fn kind(&self) -> KindId {
        self.kind
    }

    /// Element layout.
    pub fn layout(&self) -> &KindLayout {
        self.buf.layout()
    }

    /// Number of live elements.
    pub fn len(&self) -> u32 {
        self.buf.len()
    }

    /// Whether the arena holds no elements.
    pub fn is_empty(&self) -> bool {
        self.buf.len() == 0
    }

    /// Number of elements that fit without reallocating.
    pub fn capacity(&self) -> u32 {
        self.buf.capacity()
    }

    /// Maximum number of elements this arena may hold.
    pub fn max_len(&self) -> u32 {
        self.max_len
    }

    /// Bytes currently allocated.
    pub fn memory_bytes(&self) -> usize {
        self.buf.capacity() as usize * self.buf.layout().size
    }

    /// Append `value`, returning its index.
    ///
    /// Grows the allocation first if the arena is full. On failure the
    /// arena is unchanged.
    pub fn push<T: Copy + 'static>(&mut self, value: T) -> Result<u32, ArenaError> {
        self.check_type::<T>()?;
        if self.buf.len() == self.buf.capacity() {
            let needed = self.buf.len().checked_add(1).ok_or(self.overflow(1))?;
            self.grow_for(needed)?;
        }
        let index = self.buf.len();
        let pushed = self.buf.push(value);
        debug_assert!(pushed, "push after successful growth and type check");
        Ok(index)
    }

    /// Shared access to the element at `index`.
    pub fn get<T: Copy + 'static>(&self, index: u32) -> Result<&T, ArenaError> {
        self.check_type::<T>()?;
        let len = self.buf.len();
        self.buf.get(index).ok_or(ArenaError::IndexOutOfBounds {
            kind: self.kind,
            index,
            len,
        })
    }

    /// Exclusive access to the element at `index` for in-place mutation.
    pub fn get_mut<T: Copy + 'static>(&mut self, index: u32) -> Result<&mut T, ArenaError> {
        self.check_type::<T>()?;
        let (kind, len) = (self.kind, self.buf.len());
        self.buf
            .get_mut(index)
            .ok_or(ArenaError::IndexOutOfBounds { kind, index, len })
    }

    /// Remove the element at `index` by moving the last element into it.
    ///
    /// Returns `Some(old_index)` naming where the moved element used to
    /// live, or `None` if `index` was already the last element and nothing
    /// moved.
    pub fn swap_remove(&mut self, index: u32) -> Result<Option<u32>, ArenaError> {
        let len = self.buf.len();
        self.buf
            .swap_remove(index)
            .map_err(|()| ArenaError::IndexOutOfBounds {
                kind: self.kind,
                index,
                len,
            })
    }

    /// Ensure room for at least `additional` more elements.
    pub fn reserve(&mut self, additional: u32) -> Result<(), ArenaError> {
        let needed = self
            .buf
            .len()
            .checked_add(additional)
            .ok_or(self.overflow(additional))?;
        if needed > self.buf.capacity() {
            self.grow_for(needed)?;
        }
        Ok(())
    }

    /// Remove every element, keeping the allocation.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    fn check_type<T: 'static>(&self) -> Result<(), ArenaError> {
        let layout = self.buf.layout();
        if layout.is::<T>() {
            Ok(())
        } else {
            Err(ArenaError::TypeMismatch {
                kind: self.kind,
                requested: std::any::type_name::<T>(),
                stored: layout.type_name,
            })
        }
    }

    /// Grow by the doubling policy so that at least `needed` elements fit.
    fn grow_for(&mut self, needed: u32) -> Result<(), ArenaError> {
        if needed > self.max_len {
            return Err(self.overflow(needed - self.buf.len()));
        }
        let doubled = self.buf.capacity().saturating_mul(2).max(1);
        self.grow_exact(doubled.max(needed).min(self.max_len))
    }

    fn grow_exact(&mut self, capacity: u32) -> Result<(), ArenaError> {
        let from = self.buf.capacity();
        self.buf
            .grow_to(capacity)
            .map_err(|AllocFailure(requested_bytes)| ArenaError::OutOfMemory {
                kind: self.kind,
                requested_bytes,
            })?;
        tracing::trace!(kind = %self.kind, from, to = capacity, "arena grown");
        Ok(())
    }

    fn overflow(&self, additional: u32) -> ArenaError {
        let size = self.buf.layout().size;
        ArenaError::OutOfMemory {
            kind: self.kind,
            requested_bytes: (self.buf.len() as usize + additional as usize).saturating_mul(size),
        }
    }
}

impl fmt::Debug for RawArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawArena")
            .field("kind", &self.kind)
            .field("layout", self.buf.layout())
            .field("len", &self.buf.len())
            .field("capacity", &self.buf.capacity())
            .finish()
    }
}
