//! The [`Store`]: per-kind arenas, node access, and link-field plumbing.
//!
//! Linkage, removal, roots, traversal and invariant checking live in
//! sibling modules as further `impl Store` blocks.

use std::fmt;
use std::marker::PhantomData;

use smallvec::SmallVec;
use thicket_arena::RawArena;
use thicket_core::{Address, AddressFault, KindId, Links, Node, StoreError};

use crate::config::StoreConfig;
use crate::registry::{validate_kinds, KindDescriptor, KindList, Member, Registry};
use crate::roots::RootTable;

/// In-memory store of intrusively linked trees over the kinds of `R`.
///
/// Nodes are appended into the arena of their kind and referred to only by
/// [`Address`]. The store owns all node memory and the root table; it is
/// single-threaded and mutation requires `&mut self`.
pub struct Store<R: Registry> {
    pub(crate) kinds: KindList,
    pub(crate) arenas: SmallVec<[RawArena; 8]>,
    pub(crate) roots: RootTable,
    config: StoreConfig,
    _registry: PhantomData<fn() -> R>,
}

impl<R: Registry> Store<R> {
    /// Create an empty store.
    ///
    /// Fails with [`StoreError::InvalidConfig`] if `config` is inconsistent,
    /// [`StoreError::MalformedKind`] if the registry cannot be stored, or
    /// [`StoreError::OutOfMemory`] if the initial reservation fails.
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;
        let kinds = R::kinds();
        validate_kinds::<R>(&kinds)?;

        let mut arenas = SmallVec::with_capacity(kinds.len());
        for (i, desc) in kinds.iter().enumerate() {
            arenas.push(RawArena::with_capacity(
                KindId(i as u16),
                desc.layout,
                config.initial_capacity,
                config.max_nodes_per_kind,
            )?);
        }

        tracing::debug!(
            registry = std::any::type_name::<R>(),
            kinds = kinds.len(),
            initial_capacity = config.initial_capacity,
            "store created"
        );

        Ok(Self {
            kinds,
            arenas,
            roots: RootTable::new(),
            config,
            _registry: PhantomData,
        })
    }

    /// The configuration this store was created with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The kind `T` is stored under.
    pub fn kind_of<T: Member<R>>() -> KindId {
        T::KIND
    }

    /// Number of kinds in the registry.
    pub fn kind_count(&self) -> usize {
        self.kinds.len()
    }

    /// Declared name of `kind`.
    pub fn kind_name(&self, kind: KindId) -> Option<&'static str> {
        self.kinds.get(usize::from(kind.0)).map(KindDescriptor::name)
    }

    /// Read-only access to one kind's arena.
    pub fn arena(&self, kind: KindId) -> Option<&RawArena> {
        self.arenas.get(usize::from(kind.0))
    }

    /// Number of live nodes of `kind` (0 for kinds outside the registry).
    pub fn len(&self, kind: KindId) -> u32 {
        self.arena(kind).map_or(0, RawArena::len)
    }

    /// Total live nodes across all kinds.
    pub fn node_count(&self) -> usize {
        self.arenas.iter().map(|a| a.len() as usize).sum()
    }

    /// Whether the store holds no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.arenas.iter().all(RawArena::is_empty)
    }

    /// Bytes allocated across all arenas.
    pub fn memory_bytes(&self) -> usize {
        self.arenas.iter().map(RawArena::memory_bytes).sum()
    }

    /// Check that `addr` names a live node.
    pub fn validate(&self, addr: Address) -> Result<(), StoreError> {
        let len = self.arena_for(addr)?.len();
        if addr.index < len {
            Ok(())
        } else {
            Err(StoreError::out_of_bounds(addr, len))
        }
    }

    /// Whether `addr` names a live node.
    pub fn contains(&self, addr: Address) -> bool {
        self.validate(addr).is_ok()
    }

    /// Decode an externally supplied `u64` and check it names a live node.
    pub fn resolve(&self, raw: u64) -> Result<Address, StoreError> {
        let addr = Address::from_u64(raw)?;
        self.validate(addr)?;
        Ok(addr)
    }

    /// Append a node, returning its address.
    ///
    /// The node starts detached: whatever its link fields held is
    /// discarded. Link it with [`Store::add_child`] or
    /// [`Store::add_sibling`].
    pub fn append<T: Member<R>>(&mut self, mut value: T) -> Result<Address, StoreError> {
        value.set_links(Links::DETACHED);
        let kind = T::KIND;
        let index = self.arena_mut(kind)?.push(value)?;
        tracing::trace!(kind = %kind, index, "node appended");
        Ok(Address::new(kind, index))
    }

    /// Reserve room for `additional` more nodes of type `T`.
    pub fn reserve<T: Member<R>>(&mut self, additional: u32) -> Result<(), StoreError> {
        self.arena_mut(T::KIND)?.reserve(additional)?;
        Ok(())
    }

    /// Typed shared access to the node at `addr`.
    pub fn get<T: Member<R>>(&self, addr: Address) -> Result<&T, StoreError> {
        self.expect_kind::<T>(addr)?;
        Ok(self.arena_for(addr)?.get::<T>(addr.index)?)
    }

    /// Mutate the payload of the node at `addr` in place.
    ///
    /// The closure sees the whole node, but link fields are restored
    /// afterwards, even if the closure panics: links change only through
    /// the store's linkage operations.
    pub fn update<T, F, O>(&mut self, addr: Address, f: F) -> Result<O, StoreError>
    where
        T: Member<R>,
        F: FnOnce(&mut T) -> O,
    {
        self.expect_kind::<T>(addr)?;
        let node = self.arena_mut(addr.kind)?.get_mut::<T>(addr.index)?;
        let mut guard = RestoreLinks {
            links: node.links(),
            node,
        };
        Ok(f(&mut *guard.node))
    }

    /// View the node at `addr`, whichever kind it is.
    pub fn view(&self, addr: Address) -> Result<R::Ref<'_>, StoreError> {
        R::view(self.arena_for(addr)?, addr.index)
    }

    /// Link fields of the node at `addr`.
    pub fn links(&self, addr: Address) -> Result<Links, StoreError> {
        let desc = self.descriptor(addr.kind)?;
        Ok(desc.read_links(self.arena_for(addr)?, addr.index)?)
    }

    /// Remove every node and root, keeping arena allocations.
    pub fn clear(&mut self) {
        for arena in &mut self.arenas {
            arena.clear();
        }
        self.roots.clear();
    }

    pub(crate) fn write_links(&mut self, addr: Address, links: Links) -> Result<(), StoreError> {
        let desc = *self.descriptor(addr.kind)?;
        desc.write_links(self.arena_mut(addr.kind)?, addr.index, links)?;
        Ok(())
    }

    pub(crate) fn set_child(
        &mut self,
        addr: Address,
        child: Option<Address>,
    ) -> Result<(), StoreError> {
        let links = self.links(addr)?;
        self.write_links(addr, Links { child, ..links })
    }

    pub(crate) fn set_sibling(
        &mut self,
        addr: Address,
        sibling: Option<Address>,
    ) -> Result<(), StoreError> {
        let links = self.links(addr)?;
        self.write_links(addr, Links { sibling, ..links })
    }

    pub(crate) fn set_parent(
        &mut self,
        addr: Address,
        parent: Option<Address>,
    ) -> Result<(), StoreError> {
        let links = self.links(addr)?;
        self.write_links(addr, Links { parent, ..links })
    }

    fn expect_kind<T: Member<R>>(&self, addr: Address) -> Result<(), StoreError> {
        if addr.kind == T::KIND {
            Ok(())
        } else {
            Err(StoreError::KindMismatch {
                address: addr,
                expected: T::KIND,
            })
        }
    }

    fn descriptor(&self, kind: KindId) -> Result<&KindDescriptor, StoreError> {
        self.kinds
            .get(usize::from(kind.0))
            .ok_or_else(|| self.unknown_kind(Address::new(kind, 0)))
    }

    fn arena_for(&self, addr: Address) -> Result<&RawArena, StoreError> {
        self.arenas
            .get(usize::from(addr.kind.0))
            .ok_or_else(|| self.unknown_kind(addr))
    }

    pub(crate) fn arena_mut(&mut self, kind: KindId) -> Result<&mut RawArena, StoreError> {
        let kind_count = self.kinds.len();
        self.arenas
            .get_mut(usize::from(kind.0))
            .ok_or(StoreError::InvalidAddress {
                raw: Address::new(kind, 0).to_u64(),
                reason: AddressFault::UnknownKind { kind_count },
            })
    }

    fn unknown_kind(&self, addr: Address) -> StoreError {
        StoreError::InvalidAddress {
            raw: addr.to_u64(),
            reason: AddressFault::UnknownKind {
                kind_count: self.kinds.len(),
            },
        }
    }
}

/// Writes saved link fields back into a node when dropped.
struct RestoreLinks<'n, T: Node> {
    node: &'n mut T,
    links: Links,
}

impl<T: Node> Drop for RestoreLinks<'_, T> {
    fn drop(&mut self) {
        self.node.set_links(self.links);
    }
}

impl<R: Registry> fmt::Debug for Store<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("registry", &std::any::type_name::<R>())
            .field("arenas", &self.arenas)
            .field("roots", &self.roots.len())
            .finish()
    }
}
