//! A minimal string interner for root names.

use indexmap::IndexSet;
use thicket_core::{Interner, Symbol};

/// Insertion-ordered string pool.
///
/// Symbols are dense indices in interning order; a pool never forgets a
/// string.
#[derive(Clone, Debug, Default)]
pub struct StringPool {
    strings: IndexSet<Box<str>>,
}

impl StringPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct strings interned.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether nothing has been interned.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Interner for StringPool {
    /// # Panics
    ///
    /// Panics if a new string would need a symbol beyond `u32::MAX`.
    fn intern(&mut self, s: &str) -> Symbol {
        if let Some(index) = self.strings.get_index_of(s) {
            return Symbol(index as u32);
        }
        let symbol = next_symbol(self.strings.len()).expect("string pool exceeds u32 symbols");
        self.strings.insert(s.into());
        symbol
    }

    fn get(&self, s: &str) -> Option<Symbol> {
        self.strings.get_index_of(s).map(|index| Symbol(index as u32))
    }

    fn lookup(&self, symbol: Symbol) -> Option<&str> {
        self.strings.get_index(symbol.0 as usize).map(|s| &**s)
    }
}

/// Symbol for the string interned after `len` others, if it fits.
fn next_symbol(len: usize) -> Option<Symbol> {
    u32::try_from(len).ok().map(Symbol)
}
