//! Unit tests for PersistentAvlTree.
//!
//! Example-based checks of lookups, bounds, iteration order, balancing and
//! persistence through the public API.

use persistent_avl::persistent::{Node, PersistentAvlTree};
use rstest::rstest;
use std::ops::Bound;

fn make_tree(items: &[i32]) -> PersistentAvlTree<i32, String> {
    items
        .iter()
        .fold(PersistentAvlTree::new(), |tree, item| {
            tree.insert(*item, item.to_string())
        })
}

fn dump_tree(tree: &PersistentAvlTree<i32, String>) -> String {
    tree.iter()
        .map(|(key, value)| format!("{key}:{value}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn unique_count(items: &[i32]) -> usize {
    let mut unique = items.to_vec();
    unique.sort_unstable();
    unique.dedup();
    unique.len()
}

// =============================================================================
// Basic Construction Tests
// =============================================================================

#[rstest]
fn test_new_creates_empty_tree() {
    let tree: PersistentAvlTree<i32, String> = PersistentAvlTree::new();
    assert!(tree.is_empty());
    assert_eq!(tree.len(), 0);
    assert!(tree.find(&4).is_none());
}

#[rstest]
fn test_default_creates_empty_tree() {
    let tree: PersistentAvlTree<String, i32> = PersistentAvlTree::default();
    assert!(tree.is_empty());
    assert!(tree.find("findme").is_none());
}

#[rstest]
fn test_singleton_find() {
    let tree = PersistentAvlTree::singleton(10, "10".to_string());

    assert!(tree.find(&4).is_none());
    let node = tree.find(&10).unwrap();
    assert_eq!(node.key(), &10);
    assert_eq!(node.value(), "10");
}

#[rstest]
fn test_singleton_shape() {
    let tree = PersistentAvlTree::singleton(10, "10".to_string());
    assert!(!tree.is_empty());
    assert_eq!(tree.height(), 1);
    assert!(tree.root().unwrap().left().is_none());
    assert!(tree.root().unwrap().right().is_none());
    assert_eq!(dump_tree(&tree), "10:10");
}

// =============================================================================
// Size and Iteration Tables
// =============================================================================

#[rstest]
#[case(&[], 0)]
#[case(&[1], 1)]
#[case(&[1, 2], 2)]
#[case(&[1, 3, 1, 3, 2], 3)]
fn test_size_and_height(#[case] items: &[i32], #[case] expected_size: usize) {
    let tree = make_tree(items);
    assert_eq!(tree.len(), expected_size);

    let unique = unique_count(items);
    let expected_height = if unique == 0 { 0 } else { 1 + unique.ilog2() as usize };
    assert_eq!(tree.height(), expected_height);
}

#[rstest]
#[case(&[], "")]
#[case(&[1], "1:1")]
#[case(&[1, 2], "1:1 2:2")]
#[case(&[2, 1], "1:1 2:2")]
#[case(&[2, 1, 3], "1:1 2:2 3:3")]
#[case(&[2, 3, 1], "1:1 2:2 3:3")]
#[case(&[1, 3, 1, 3, 2], "1:1 2:2 3:3")]
fn test_iteration_order(#[case] items: &[i32], #[case] expected: &str) {
    assert_eq!(dump_tree(&make_tree(items)), expected);
}

#[rstest]
#[case(&[1, 2, 3])]
#[case(&[1, 3, 2])]
#[case(&[2, 1, 3])]
#[case(&[2, 3, 1])]
#[case(&[3, 1, 2])]
#[case(&[3, 2, 1])]
fn test_every_insertion_order_of_three_keys(#[case] items: &[i32]) {
    let tree = make_tree(items);
    assert_eq!(dump_tree(&tree), "1:1 2:2 3:3");
    assert_eq!(tree.height(), 2);
    assert_eq!(tree.root().map(Node::key), Some(&2));
    assert_eq!(tree.validate(), Ok(()));
}

// =============================================================================
// Insert and Get Tests
// =============================================================================

#[rstest]
fn test_insert_replaces_existing_value() {
    let tree = make_tree(&[1, 2, 3]).insert(2, "two".to_string());
    assert_eq!(tree.len(), 3);
    assert_eq!(tree.get(&2), Some(&"two".to_string()));
}

#[rstest]
#[case(&[], 7)]
#[case(&[1, 2, 3], 2)]
#[case(&[1, 2, 3], 9)]
fn test_get_after_insert_returns_inserted_value(#[case] items: &[i32], #[case] key: i32) {
    let tree = make_tree(items);
    let inserted = tree.insert(key, format!("new{key}"));
    assert_eq!(inserted.get(&key), Some(&format!("new{key}")));
}

#[rstest]
fn test_get_with_borrowed_key() {
    let tree = PersistentAvlTree::new()
        .insert("apple".to_string(), 1)
        .insert("banana".to_string(), 2);
    assert_eq!(tree.get("banana"), Some(&2));
    assert!(tree.contains_key("apple"));
    assert!(!tree.contains_key("cherry"));
}

#[rstest]
fn test_ascending_run_stays_balanced() {
    let mut tree = PersistentAvlTree::new();
    for key in 1..=7 {
        tree = tree.insert(key, key.to_string());
        assert!(tree.height() <= 3);
        assert_eq!(tree.validate(), Ok(()));
    }
    assert_eq!(tree.height(), 3);
    assert_eq!(tree.root().map(Node::key), Some(&4));
}

#[rstest]
fn test_descending_run_stays_balanced() {
    let tree = make_tree(&(1..=1000).rev().collect::<Vec<_>>());
    assert_eq!(tree.len(), 1000);
    assert!(tree.height() <= 15);
    assert_eq!(tree.validate(), Ok(()));
}

// =============================================================================
// Ceiling / Floor Tests
// =============================================================================

#[rstest]
#[case(0, Some(1))]
#[case(5, Some(5))]
#[case(6, Some(9))]
#[case(9, Some(9))]
#[case(10, None)]
fn test_least_upper_bound(#[case] key: i32, #[case] expected: Option<i32>) {
    let tree = make_tree(&[1, 5, 9]);
    assert_eq!(tree.least_upper_bound(&key).map(|node| *node.key()), expected);
}

#[rstest]
#[case(0, None)]
#[case(1, Some(1))]
#[case(4, Some(1))]
#[case(6, Some(5))]
#[case(10, Some(9))]
fn test_greatest_lower_bound(#[case] key: i32, #[case] expected: Option<i32>) {
    let tree = make_tree(&[1, 5, 9]);
    assert_eq!(
        tree.greatest_lower_bound(&key).map(|node| *node.key()),
        expected
    );
}

#[rstest]
fn test_least_and_most() {
    let tree = make_tree(&[5, 3, 8, 1, 4]);
    assert_eq!(tree.least().map(|node| *node.key()), Some(1));
    assert_eq!(tree.most().map(|node| *node.key()), Some(8));
    assert_eq!(tree.first(), Some((&1, &"1".to_string())));
    assert_eq!(tree.last(), Some((&8, &"8".to_string())));
}

// =============================================================================
// Remove Tests
// =============================================================================

#[rstest]
fn test_remove_leaf() {
    let tree = make_tree(&[2, 1, 3]).remove(&3);
    assert_eq!(dump_tree(&tree), "1:1 2:2");
    assert_eq!(tree.validate(), Ok(()));
}

#[rstest]
fn test_remove_two_child_node_promotes_predecessor() {
    let tree = make_tree(&[4, 2, 6, 1, 3, 5, 7]);
    let removed = tree.remove(&4);

    assert_eq!(removed.root().map(Node::key), Some(&3));
    assert_eq!(dump_tree(&removed), "1:1 2:2 3:3 5:5 6:6 7:7");
    assert_eq!(removed.validate(), Ok(()));
}

#[rstest]
fn test_remove_absent_key_is_noop() {
    let tree = make_tree(&[1, 2, 3]);
    let removed = tree.remove(&10);
    assert_eq!(removed, tree);
    assert_eq!(removed.len(), 3);
}

#[rstest]
fn test_remove_everything() {
    let keys: Vec<i32> = (0..64).collect();
    let tree = make_tree(&keys);
    let emptied = keys.iter().fold(tree, |tree, key| {
        let next = tree.remove(key);
        assert_eq!(next.validate(), Ok(()));
        next
    });
    assert!(emptied.is_empty());
    assert_eq!(emptied.height(), 0);
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[rstest]
fn test_insert_leaves_original_unchanged() {
    let original = make_tree(&[1, 2, 3]);
    let _updated = original.insert(4, "4".to_string()).insert(2, "two".to_string());

    assert_eq!(dump_tree(&original), "1:1 2:2 3:3");
    assert_eq!(original.get(&2), Some(&"2".to_string()));
}

#[rstest]
fn test_remove_leaves_original_unchanged() {
    let original = make_tree(&[4, 2, 6, 1, 3, 5, 7]);
    let _removed = original.remove(&4).remove(&1);

    assert_eq!(original.len(), 7);
    assert_eq!(original.root().map(Node::key), Some(&4));
    assert_eq!(dump_tree(&original), "1:1 2:2 3:3 4:4 5:5 6:6 7:7");
}

// =============================================================================
// Iterator and Cursor Tests
// =============================================================================

#[rstest]
fn test_iter_from_and_cursor_from_agree() {
    let tree = make_tree(&[10, 20, 30, 40, 50]);
    let from_iter: Vec<i32> = tree.iter_from(&25).map(|(key, _)| *key).collect();

    let mut cursor = tree.cursor_from(&25);
    let mut from_cursor = Vec::new();
    while cursor.move_next() {
        from_cursor.extend(cursor.key().copied());
    }

    assert_eq!(from_iter, vec![30, 40, 50]);
    assert_eq!(from_cursor, from_iter);
}

#[rstest]
fn test_cursor_survives_tree_drop() {
    let tree = make_tree(&[1, 2, 3]);
    let mut cursor = tree.cursor();
    drop(tree);

    assert!(cursor.move_next());
    assert_eq!(cursor.value(), Some(&"1".to_string()));
}

#[rstest]
fn test_keys_and_values() {
    let tree = make_tree(&[3, 1, 2]);
    assert_eq!(tree.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(
        tree.values().cloned().collect::<Vec<_>>(),
        vec!["1".to_string(), "2".to_string(), "3".to_string()]
    );
}

#[rstest]
fn test_for_loop_over_reference() {
    let tree = make_tree(&[2, 1]);
    let mut keys = Vec::new();
    for (key, _) in &tree {
        keys.push(*key);
    }
    assert_eq!(keys, vec![1, 2]);
}

// =============================================================================
// Range Tests
// =============================================================================

#[rstest]
fn test_range_inclusive() {
    let tree = make_tree(&(1..=10).collect::<Vec<_>>());
    let keys: Vec<i32> = tree.range(3..=6).map(|(key, _)| *key).collect();
    assert_eq!(keys, vec![3, 4, 5, 6]);
}

#[rstest]
fn test_range_between_keys() {
    let tree = make_tree(&[10, 20, 30, 40]);
    let iterator = tree.range(15..35);
    assert_eq!(iterator.len(), 2);
    assert_eq!(
        iterator.map(|(key, _)| *key).collect::<Vec<_>>(),
        vec![20, 30]
    );
}

#[rstest]
fn test_range_excluded_bounds() {
    let tree = make_tree(&[1, 2, 3, 4, 5]);
    let range = (Bound::Excluded(1), Bound::Excluded(5));
    let keys: Vec<i32> = tree.range(range).map(|(key, _)| *key).collect();
    assert_eq!(keys, vec![2, 3, 4]);
}

#[rstest]
fn test_range_on_empty_tree() {
    let tree: PersistentAvlTree<i32, String> = PersistentAvlTree::new();
    assert_eq!(tree.range(..).count(), 0);
}

// =============================================================================
// Trait Tests
// =============================================================================

#[rstest]
fn test_display() {
    let tree = make_tree(&[2, 1]);
    assert_eq!(tree.to_string(), "{1: 1, 2: 2}");
}

#[rstest]
fn test_equal_trees_hash_equally() {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let hash = |tree: &PersistentAvlTree<i32, String>| {
        let mut hasher = DefaultHasher::new();
        tree.hash(&mut hasher);
        hasher.finish()
    };

    let ascending = make_tree(&[1, 2, 3, 4, 5]);
    let shuffled = make_tree(&[4, 1, 5, 3, 2]);
    assert_eq!(ascending, shuffled);
    assert_eq!(hash(&ascending), hash(&shuffled));
}
