//! Minimal two-kind registry shared by this crate's unit tests.

use thicket_core::Address;

use crate::{Store, StoreConfig};

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Num {
    pub(crate) value: u32,
    child: Option<Address>,
    sibling: Option<Address>,
    parent: Option<Address>,
}

impl Num {
    pub(crate) fn new(value: u32) -> Self {
        Self {
            value,
            child: None,
            sibling: None,
            parent: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Tag {
    pub(crate) label: &'static str,
    child: Option<Address>,
    sibling: Option<Address>,
    parent: Option<Address>,
}

impl Tag {
    pub(crate) fn new(label: &'static str) -> Self {
        Self {
            label,
            child: None,
            sibling: None,
            parent: None,
        }
    }
}

crate::impl_node!(Num, Tag);

crate::node_kinds! {
    pub(crate) struct Kit;
    pub(crate) enum KitRef {
        Num(Num),
        Tag(Tag),
    }
}

pub(crate) fn store() -> Store<Kit> {
    Store::new(StoreConfig::default()).unwrap()
}

/// Append `Num` nodes `0..n`, returning their addresses.
pub(crate) fn nums(store: &mut Store<Kit>, n: u32) -> Vec<Address> {
    (0..n).map(|v| store.append(Num::new(v)).unwrap()).collect()
}

/// Payload of a `Num` node.
pub(crate) fn value(store: &Store<Kit>, addr: Address) -> u32 {
    store.get::<Num>(addr).unwrap().value
}
