//! Collaborator traits.

use crate::id::Symbol;

/// A string-interning pool.
///
/// The store never inspects name bytes: root names are resolved to
/// [`Symbol`]s through an interner supplied by the caller, and only the
/// symbols are stored.
pub trait Interner {
    /// Intern `name`, returning its symbol.
    ///
    /// Idempotent: the same bytes always yield the same symbol for the
    /// lifetime of the pool.
    fn intern(&mut self, name: &str) -> Symbol;

    /// Look up the symbol for `name` without interning it.
    fn get(&self, name: &str) -> Option<Symbol>;

    /// Resolve a symbol back to its string.
    ///
    /// Returns `None` for symbols this pool did not produce.
    fn lookup(&self, symbol: Symbol) -> Option<&str>;
}
