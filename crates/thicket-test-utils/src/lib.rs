//! Fixture node kinds and registries for Thicket development.
//!
//! Provides three small node types ([`IntNode`], [`FloatNode`],
//! [`StrNode`]), the [`Fixture`] registry over them, and tree-building
//! helpers in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use thicket_core::{impl_node, Address};
use thicket_store::{node_kinds, Store, StoreConfig};

/// Node carrying an integer payload.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntNode {
    pub value: i64,
    pub child: Option<Address>,
    pub sibling: Option<Address>,
    pub parent: Option<Address>,
}

impl IntNode {
    pub fn new(value: i64) -> Self {
        Self {
            value,
            child: None,
            sibling: None,
            parent: None,
        }
    }
}

/// Node carrying a float payload.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatNode {
    pub value: f64,
    pub child: Option<Address>,
    pub sibling: Option<Address>,
    pub parent: Option<Address>,
}

impl FloatNode {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            child: None,
            sibling: None,
            parent: None,
        }
    }
}

/// Node carrying a static string payload.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrNode {
    pub value: &'static str,
    pub child: Option<Address>,
    pub sibling: Option<Address>,
    pub parent: Option<Address>,
}

impl StrNode {
    pub fn new(value: &'static str) -> Self {
        Self {
            value,
            child: None,
            sibling: None,
            parent: None,
        }
    }
}

impl_node!(IntNode, FloatNode, StrNode);

node_kinds! {
    /// Registry over the three fixture kinds.
    pub struct Fixture;
    /// Borrowed view of any fixture node.
    pub enum FixtureRef {
        Int(IntNode),
        Float(FloatNode),
        Str(StrNode),
    }
}

/// Payload of a fixture node rendered as a string, for order assertions.
pub fn describe(node: FixtureRef<'_>) -> String {
    match node {
        FixtureRef::Int(n) => n.value.to_string(),
        FixtureRef::Float(n) => n.value.to_string(),
        FixtureRef::Str(n) => n.value.to_string(),
    }
}

/// An empty store over [`Fixture`] with default configuration.
pub fn fixture_store() -> Store<Fixture> {
    Store::new(StoreConfig::default()).expect("default config is valid")
}
