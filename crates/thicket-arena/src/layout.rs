//! Element layout descriptors.

use std::alloc::Layout;
use std::any::{type_name, TypeId};
use std::fmt;

/// Size, alignment and identity of the values stored in one arena.
///
/// Computed once per kind from the concrete Rust type. The `TypeId` is
/// what lets a type-erased arena refuse typed access with the wrong type.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KindLayout {
    /// Declared kind name (for diagnostics).
    pub name: &'static str,
    /// Element size in bytes. Always a multiple of `align`.
    pub size: usize,
    /// Element alignment in bytes.
    pub align: usize,
    /// Identity of the element type.
    pub type_id: TypeId,
    /// Rust type name of the element type (for diagnostics).
    pub type_name: &'static str,
}

impl KindLayout {
    /// Describe the layout of `T` under the given kind name.
    pub fn of<T: Copy + 'static>(name: &'static str) -> Self {
        Self {
            name,
            size: std::mem::size_of::<T>(),
            align: std::mem::align_of::<T>(),
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    /// Whether this layout describes `T`.
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Whether elements of this layout occupy no memory.
    pub fn is_zero_sized(&self) -> bool {
        self.size == 0
    }

    /// Allocation layout for `count` contiguous elements.
    ///
    /// Returns `None` on arithmetic overflow or if the total exceeds
    /// `isize::MAX`.
    pub fn array(&self, count: usize) -> Option<Layout> {
        let bytes = self.size.checked_mul(count)?;
        Layout::from_size_align(bytes, self.align).ok()
    }
}

impl fmt::Debug for KindLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindLayout")
            .field("name", &self.name)
            .field("type", &self.type_name)
            .field("size", &self.size)
            .field("align", &self.align)
            .finish()
    }
}
