//! Integration test: swap-remove keeps every surviving reference valid.
//!
//! Removal moves an arena's last node into the vacated slot. These tests
//! check the moved node's payload, its new address, and every field and
//! root entry that referenced it.

use thicket_store::{Address, KindId, Store, Symbol};
use thicket_test_utils::fixtures::{chain, fan};
use thicket_test_utils::{describe, fixture_store, Fixture, IntNode, StrNode};

fn int_value(store: &Store<Fixture>, addr: Address) -> i64 {
    store.get::<IntNode>(addr).unwrap().value
}

#[test]
fn moved_node_lands_in_vacated_slot() {
    let mut store = fixture_store();
    // Root 0 with children 1..=4, all ints.
    let nodes = fan(&mut store, 4);
    let kind = nodes[0].kind;

    assert_eq!(store.swap_remove(nodes[2]).unwrap(), 1);
    assert_eq!(store.len(kind), 4);

    // Former last node (value 4) now sits at index 2.
    let moved = Address::new(kind, 2);
    assert_eq!(int_value(&store, moved), 4);
    // Its predecessor (value 3, index 3) now references the new index.
    assert_eq!(store.links(nodes[3]).unwrap().sibling, Some(moved));
    assert_eq!(store.links(moved).unwrap().parent, Some(nodes[3]));

    let order: Vec<String> = store
        .walk(nodes[0])
        .unwrap()
        .map(|visit| describe(visit.node))
        .collect();
    assert_eq!(order, ["0", "1", "3", "4"]);
    store.check_invariants().unwrap();
}

#[test]
fn removing_subtree_shrinks_arena_by_subtree_size() {
    let mut store = fixture_store();
    let keep = store.append(IntNode::new(100)).unwrap();
    let line = chain(&mut store, 5);
    let before = store.len(KindId(0));

    // Remove from the second node down: five nodes go.
    assert_eq!(store.swap_remove(line[1]).unwrap(), 5);
    assert_eq!(store.len(KindId(0)), before - 5);
    assert_eq!(store.links(line[0]).unwrap().child, None);
    assert_eq!(int_value(&store, keep), 100);
    store.check_invariants().unwrap();
}

#[test]
fn root_entries_follow_moves_and_drop_with_removal() {
    let mut store = fixture_store();
    let doomed = store.append(StrNode::new("doomed")).unwrap();
    let middle = store.append(StrNode::new("middle")).unwrap();
    let last = store.append(StrNode::new("last")).unwrap();
    store.add_child(middle, last).unwrap();
    store.add_root(Symbol(0), doomed).unwrap();
    store.add_root(Symbol(1), middle).unwrap();

    store.swap_remove(doomed).unwrap();
    assert_eq!(store.root(Symbol(0)), None);

    // `last` moved into slot 0; its parent still reaches it.
    let last = Address::new(doomed.kind, 0);
    assert_eq!(store.get::<StrNode>(last).unwrap().value, "last");
    assert_eq!(store.links(middle).unwrap().child, Some(last));
    assert_eq!(store.root(Symbol(1)), Some(middle));
    store.check_invariants().unwrap();
}

#[test]
fn cross_kind_links_survive_moves() {
    let mut store = fixture_store();
    let root = store.append(StrNode::new("root")).unwrap();
    let first = store.append(IntNode::new(1)).unwrap();
    let second = store.append(IntNode::new(2)).unwrap();
    let under_second = store.append(StrNode::new("under")).unwrap();
    store.add_child(root, first).unwrap();
    store.add_child(root, second).unwrap();
    store.add_child(second, under_second).unwrap();

    // Removing `first` moves `second` from int index 1 to 0.
    store.swap_remove(first).unwrap();
    let second = Address::new(first.kind, 0);
    assert_eq!(int_value(&store, second), 2);
    assert_eq!(store.links(root).unwrap().child, Some(second));
    assert_eq!(store.links(under_second).unwrap().parent, Some(second));

    let order: Vec<String> = store
        .walk(root)
        .unwrap()
        .map(|visit| describe(visit.node))
        .collect();
    assert_eq!(order, ["root", "2", "under"]);
    store.check_invariants().unwrap();
}

#[test]
fn deep_chain_builds_and_removes_in_one_pass() {
    let mut store = fixture_store();
    let line = chain(&mut store, 20_000);
    assert_eq!(store.walk(line[0]).unwrap().count(), 20_001);
    assert_eq!(store.swap_remove(line[0]).unwrap(), 20_001);
    assert!(store.is_empty());
}
