//! Property-based tests for PersistentAvlSet.
//!
//! This module verifies the set algebra laws against
//! `std::collections::BTreeSet`.

use persistent_avl::persistent::PersistentAvlSet;
use proptest::prelude::*;
use std::collections::BTreeSet;

// =============================================================================
// Strategy for generating test data
// =============================================================================

fn arbitrary_element() -> impl Strategy<Value = u16> {
    0..200u16
}

fn arbitrary_elements() -> impl Strategy<Value = Vec<u16>> {
    prop::collection::vec(arbitrary_element(), 0..100)
}

fn model(elements: &[u16]) -> BTreeSet<u16> {
    elements.iter().copied().collect()
}

fn set(elements: &[u16]) -> PersistentAvlSet<u16> {
    elements.iter().copied().collect()
}

// =============================================================================
// Membership Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_add_then_contains(
        elements in arbitrary_elements(),
        element in arbitrary_element()
    ) {
        let added = set(&elements).insert(element);
        prop_assert!(added.contains(&element));
        let before = model(&elements);
        let expected_len = before.len() + usize::from(!before.contains(&element));
        prop_assert_eq!(added.len(), expected_len);
    }

    #[test]
    fn prop_remove_then_not_contains(
        elements in arbitrary_elements(),
        element in arbitrary_element()
    ) {
        let removed = set(&elements).remove(&element);
        prop_assert!(!removed.contains(&element));
        prop_assert_eq!(removed.validate(), Ok(()));
    }

    #[test]
    fn prop_sorted_export_matches_model(elements in arbitrary_elements()) {
        let expected: Vec<u16> = model(&elements).into_iter().collect();
        prop_assert_eq!(set(&elements).to_sorted_vec(), expected);
    }
}

// =============================================================================
// Algebra Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_union_matches_model(
        left in arbitrary_elements(),
        right in arbitrary_elements()
    ) {
        let expected: Vec<u16> = model(&left).union(&model(&right)).copied().collect();
        let union = set(&left).union(&set(&right));
        prop_assert_eq!(union.to_sorted_vec(), expected);
        prop_assert_eq!(union.validate(), Ok(()));
    }

    #[test]
    fn prop_intersection_matches_model(
        left in arbitrary_elements(),
        right in arbitrary_elements()
    ) {
        let expected: Vec<u16> = model(&left).intersection(&model(&right)).copied().collect();
        let intersection = set(&left).intersection(&set(&right));
        prop_assert_eq!(intersection.to_sorted_vec(), expected);
    }

    #[test]
    fn prop_difference_matches_model(
        left in arbitrary_elements(),
        right in arbitrary_elements()
    ) {
        let expected: Vec<u16> = model(&left).difference(&model(&right)).copied().collect();
        let difference = set(&left).difference(&set(&right));
        prop_assert_eq!(difference.to_sorted_vec(), expected);
        prop_assert_eq!(difference.validate(), Ok(()));
    }

    #[test]
    fn prop_symmetric_difference_matches_model(
        left in arbitrary_elements(),
        right in arbitrary_elements()
    ) {
        let expected: Vec<u16> = model(&left)
            .symmetric_difference(&model(&right))
            .copied()
            .collect();
        let symmetric = set(&left).symmetric_difference(&set(&right));
        prop_assert_eq!(symmetric.to_sorted_vec(), expected);
    }

    #[test]
    fn prop_predicates_match_model(
        left in arbitrary_elements(),
        right in arbitrary_elements()
    ) {
        let (left_model, right_model) = (model(&left), model(&right));
        let (left_set, right_set) = (set(&left), set(&right));
        prop_assert_eq!(left_set.is_subset(&right_set), left_model.is_subset(&right_model));
        prop_assert_eq!(left_set.is_superset(&right_set), left_model.is_superset(&right_model));
        prop_assert_eq!(left_set.is_disjoint(&right_set), left_model.is_disjoint(&right_model));
    }

    #[test]
    fn prop_union_with_self_is_identity(elements in arbitrary_elements()) {
        let original = set(&elements);
        prop_assert_eq!(original.union(&original), original);
    }
}
