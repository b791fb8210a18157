//! Low-level buffer primitives for type-erased arenas.
//!
//! [`RawBuffer`] owns one allocation sized for `capacity` elements of a
//! [`KindLayout`] and tracks how many leading slots are initialized. Every
//! method checks its own preconditions (slot bounds and element type), so
//! the public surface is safe to call with any arguments. Each `unsafe`
//! block carries a `// SAFETY:` comment.
//!
//! Invariants:
//! - `ptr` is `None` iff `capacity == 0`; otherwise it points to an
//!   allocation made with `layout.array(capacity)`.
//! - `len <= capacity`, and slots `[0, len)` hold initialized values of the
//!   type identified by `layout.type_id`.
//! - `layout.size > 0`.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::ptr::{self, NonNull};

use crate::layout::KindLayout;

/// Failed allocation: the number of bytes that was requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct AllocFailure(pub(crate) usize);

pub(crate) struct RawBuffer {
    ptr: Option<NonNull<u8>>,
    layout: KindLayout,
    len: u32,
    capacity: u32,
}

impl RawBuffer {
    /// Create an empty buffer. Does not allocate.
    ///
    /// # Panics
    ///
    /// Panics if `layout` is zero-sized.
    pub(crate) fn new(layout: KindLayout) -> Self {
        assert!(!layout.is_zero_sized(), "zero-sized element layout");
        Self {
            ptr: None,
            layout,
            len: 0,
            capacity: 0,
        }
    }

    pub(crate) fn layout(&self) -> &KindLayout {
        &self.layout
    }

    pub(crate) fn len(&self) -> u32 {
        self.len
    }

    pub(crate) fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Grow the allocation to exactly `new_capacity` elements.
    ///
    /// A no-op if `new_capacity <= capacity`. On failure the existing
    /// allocation and its contents are untouched.
    pub(crate) fn grow_to(&mut self, new_capacity: u32) -> Result<(), AllocFailure> {
        if new_capacity <= self.capacity {
            return Ok(());
        }
        let new_layout = self
            .layout
            .array(new_capacity as usize)
            .ok_or(AllocFailure(usize::MAX))?;
        let new_ptr = match self.ptr {
            None => {
                // SAFETY: `new_layout` has non-zero size because
                // `layout.size > 0` and `new_capacity > 0`.
                unsafe { alloc::alloc(new_layout) }
            }
            Some(old) => {
                let old_layout = self.current_layout();
                // SAFETY: `old` was allocated with `old_layout` (buffer
                // invariant), the alignment is unchanged, and the new size
                // is non-zero and was validated by `Layout::from_size_align`.
                unsafe { alloc::realloc(old.as_ptr(), old_layout, new_layout.size()) }
            }
        };
        // On null, `realloc` leaves the old block allocated and intact.
        let new_ptr = NonNull::new(new_ptr).ok_or(AllocFailure(new_layout.size()))?;
        self.ptr = Some(new_ptr);
        self.capacity = new_capacity;
        Ok(())
    }

    /// Append `value`. Returns `false` (and writes nothing) if the buffer
    /// is full or `T` is not the element type.
    pub(crate) fn push<T: Copy + 'static>(&mut self, value: T) -> bool {
        if !self.layout.is::<T>() || self.len == self.capacity {
            return false;
        }
        let slot = self.slot_ptr(self.len).cast::<T>();
        // SAFETY: `slot` is within the allocation (len < capacity), aligned
        // for `T` (the allocation is aligned to `align_of::<T>()` and every
        // slot offset is a multiple of `size_of::<T>()`), and the slot is
        // uninitialized, so there is nothing to drop.
        unsafe { slot.write(value) };
        self.len += 1;
        true
    }

    pub(crate) fn get<T: Copy + 'static>(&self, index: u32) -> Option<&T> {
        if !self.layout.is::<T>() || index >= self.len {
            return None;
        }
        let slot = self.slot_ptr(index).cast::<T>();
        // SAFETY: `index < len`, so the slot holds an initialized `T`
        // (type checked above), aligned as argued in `push`. The borrow is
        // tied to `&self`, so the buffer cannot be mutated or freed while
        // the reference is alive.
        Some(unsafe { &*slot })
    }

    pub(crate) fn get_mut<T: Copy + 'static>(&mut self, index: u32) -> Option<&mut T> {
        if !self.layout.is::<T>() || index >= self.len {
            return None;
        }
        let slot = self.slot_ptr(index).cast::<T>();
        // SAFETY: as in `get`, with exclusivity guaranteed by `&mut self`.
        Some(unsafe { &mut *slot })
    }

    /// Move the last element into `index` and shrink by one.
    ///
    /// Returns the index the moved element came from, or `None` if `index`
    /// was the last slot (nothing moved). Returns `Err(())` if `index` is
    /// out of bounds.
    pub(crate) fn swap_remove(&mut self, index: u32) -> Result<Option<u32>, ()> {
        if index >= self.len {
            return Err(());
        }
        let last = self.len - 1;
        let moved = if index == last {
            None
        } else {
            let src = self.slot_ptr(last);
            let dst = self.slot_ptr(index);
            // SAFETY: both slots are initialized and in bounds, they are
            // distinct (index != last) so the ranges do not overlap, and the
            // element type is `Copy`, so a bytewise copy is a valid move
            // that leaves no destructor to run for the overwritten value.
            unsafe { ptr::copy_nonoverlapping(src, dst, self.layout.size) };
            Some(last)
        };
        self.len = last;
        Ok(moved)
    }

    /// Forget all elements, keeping the allocation.
    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    fn current_layout(&self) -> Layout {
        // The same computation succeeded when the block was allocated.
        self.layout
            .array(self.capacity as usize)
            .unwrap_or_else(|| unreachable!("layout of live allocation overflowed"))
    }

    /// Pointer to slot `index`. Callers guarantee `index < capacity`.
    fn slot_ptr(&self, index: u32) -> *mut u8 {
        debug_assert!(index < self.capacity);
        let base = match self.ptr {
            Some(ptr) => ptr.as_ptr(),
            None => unreachable!("slot access on an unallocated buffer"),
        };
        // SAFETY: `index < capacity`, so the offset stays inside the
        // allocation, whose total size fits in `isize`.
        unsafe { base.add(index as usize * self.layout.size) }
    }
}

impl Drop for RawBuffer {
    fn drop(&mut self) {
        if let Some(ptr) = self.ptr {
            let layout = self.current_layout();
            // SAFETY: `ptr` was allocated with exactly this layout, and
            // elements are `Copy`, so nothing needs dropping first.
            unsafe { alloc::dealloc(ptr.as_ptr(), layout) };
        }
    }
}
