//! Store configuration parameters.

use thicket_core::StoreError;

/// Configuration for a [`Store`](crate::Store).
///
/// Applies uniformly to every kind's arena. Validated at construction;
/// immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Slots reserved in every arena when the store is created.
    ///
    /// Default: 0, so an arena allocates on its first append. Raise it when
    /// the catalog size is known up front to avoid the doubling steps.
    pub initial_capacity: u32,

    /// Maximum number of live nodes any single arena may hold.
    ///
    /// Default: `u32::MAX`, the full index range of an [`Address`]. Appends
    /// past the ceiling fail with [`StoreError::OutOfMemory`].
    ///
    /// [`Address`]: thicket_core::Address
    pub max_nodes_per_kind: u32,
}

impl StoreConfig {
    /// Default number of slots reserved per arena.
    pub const DEFAULT_INITIAL_CAPACITY: u32 = 0;

    /// Default per-arena node ceiling.
    pub const DEFAULT_MAX_NODES_PER_KIND: u32 = u32::MAX;

    /// Create a config reserving `initial_capacity` slots per arena.
    pub fn with_initial_capacity(initial_capacity: u32) -> Self {
        Self {
            initial_capacity,
            ..Self::default()
        }
    }

    /// Check the parameters for consistency.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.max_nodes_per_kind == 0 {
            return Err(StoreError::InvalidConfig {
                reason: "max_nodes_per_kind must be at least 1".to_string(),
            });
        }
        if self.initial_capacity > self.max_nodes_per_kind {
            return Err(StoreError::InvalidConfig {
                reason: format!(
                    "initial_capacity ({}) exceeds max_nodes_per_kind ({})",
                    self.initial_capacity, self.max_nodes_per_kind
                ),
            });
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_capacity: Self::DEFAULT_INITIAL_CAPACITY,
            max_nodes_per_kind: Self::DEFAULT_MAX_NODES_PER_KIND,
        }
    }
}
