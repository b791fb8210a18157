//! Tree-building helpers.
//!
//! - [`chain`]: a root with a single line of descendants.
//! - [`fan`]: a root with `n` direct children.
//! - [`grow`]: a tree shaped by a list of parent picks, for property tests.

use thicket_core::Address;
use thicket_store::Store;

use crate::{Fixture, IntNode};

/// Append `depth + 1` int nodes, each the only child of the previous one.
/// Returns the addresses from root to deepest.
pub fn chain(store: &mut Store<Fixture>, depth: usize) -> Vec<Address> {
    let mut nodes = vec![append_int(store, 0)];
    for i in 1..=depth {
        let node = append_int(store, i as i64);
        link(store, nodes[i - 1], node);
        nodes.push(node);
    }
    nodes
}

/// Append a root int node (value 0) with children valued `1..=n`.
/// Returns the root followed by the children in order.
pub fn fan(store: &mut Store<Fixture>, n: usize) -> Vec<Address> {
    let root = append_int(store, 0);
    let mut nodes = vec![root];
    for i in 1..=n {
        let child = append_int(store, i as i64);
        link(store, root, child);
        nodes.push(child);
    }
    nodes
}

/// Grow a tree of int nodes: node `i + 1` becomes a child of
/// `nodes[picks[i] % (i + 1)]`. Node values equal their position in the
/// returned list; the root is first.
pub fn grow(store: &mut Store<Fixture>, picks: &[usize]) -> Vec<Address> {
    let mut nodes = vec![append_int(store, 0)];
    for (i, pick) in picks.iter().enumerate() {
        let node = append_int(store, i as i64 + 1);
        link(store, nodes[pick % nodes.len()], node);
        nodes.push(node);
    }
    nodes
}

fn append_int(store: &mut Store<Fixture>, value: i64) -> Address {
    store.append(IntNode::new(value)).expect("fixture append failed")
}

fn link(store: &mut Store<Fixture>, parent: Address, child: Address) {
    store.add_child(parent, child).expect("fixture link failed");
}
