//! Named tree roots.
//!
//! The [`RootTable`] maps interned names ([`Symbol`]s) to the address of a
//! tree's root. It uses `IndexMap` (not `HashMap`) so iteration follows
//! registration order, which keeps catalog listings deterministic.

use indexmap::IndexMap;
use thicket_core::{Address, Interner, StoreError, Symbol};

use crate::registry::Registry;
use crate::store::Store;

/// Name → root address index.
///
/// One name maps to exactly one root; registering a name again replaces
/// the previous root.
#[derive(Clone, Debug, Default)]
pub struct RootTable {
    entries: IndexMap<Symbol, Address>,
}

impl RootTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `name` to `root`, returning the root it replaced.
    pub fn insert(&mut self, name: Symbol, root: Address) -> Option<Address> {
        self.entries.insert(name, root)
    }

    /// Root registered under `name`.
    pub fn get(&self, name: Symbol) -> Option<Address> {
        self.entries.get(&name).copied()
    }

    /// Unregister `name`, returning its root.
    pub fn remove(&mut self, name: Symbol) -> Option<Address> {
        self.entries.shift_remove(&name)
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no names are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, root)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, Address)> + '_ {
        self.entries.iter().map(|(&name, &root)| (name, root))
    }

    /// Drop every entry naming `addr`.
    pub(crate) fn forget(&mut self, addr: Address) {
        self.entries.retain(|_, root| *root != addr);
    }

    /// Rewrite entries naming `from` to name `to`.
    pub(crate) fn relocate(&mut self, from: Address, to: Address) {
        for root in self.entries.values_mut() {
            if *root == from {
                *root = to;
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<R: Registry> Store<R> {
    /// Register `root` under `name`, returning the root it replaced.
    ///
    /// `root` must name a live node. Any node may be registered, though
    /// typically it is the top of a tree.
    pub fn add_root(
        &mut self,
        name: Symbol,
        root: Address,
    ) -> Result<Option<Address>, StoreError> {
        self.validate(root)?;
        Ok(self.roots.insert(name, root))
    }

    /// Root registered under `name`.
    pub fn root(&self, name: Symbol) -> Option<Address> {
        self.roots.get(name)
    }

    /// Unregister `name`. The tree itself is left in place.
    pub fn remove_root(&mut self, name: Symbol) -> Option<Address> {
        self.roots.remove(name)
    }

    /// The root table.
    pub fn roots(&self) -> &RootTable {
        &self.roots
    }

    /// Register `root` under a string name, interning it in `pool`.
    pub fn add_named_root<I: Interner>(
        &mut self,
        pool: &mut I,
        name: &str,
        root: Address,
    ) -> Result<Option<Address>, StoreError> {
        self.validate(root)?;
        let symbol = pool.intern(name);
        Ok(self.roots.insert(symbol, root))
    }

    /// Root registered under a string name.
    ///
    /// Never interns: a name the pool has not seen has no root.
    pub fn named_root<I: Interner>(&self, pool: &I, name: &str) -> Option<Address> {
        self.roots.get(pool.get(name)?)
    }
}
