//! Persistent (immutable) ordered set.
//!
//! This module provides [`PersistentAvlSet`], an immutable ordered set
//! that uses [`PersistentAvlTree`] internally.
//!
//! # Overview
//!
//! `PersistentAvlSet` is a wrapper around `PersistentAvlTree<T, ()>`. Key
//! presence is the only thing it records. It adds set algebra and an ordered
//! export on top of the tree's lookups and bounds.
//!
//! - O(log N) contains, insert, remove
//! - O(log N) ceiling and floor
//! - O(1) len and `is_empty`
//!
//! # Examples
//!
//! ```rust
//! use persistent_avl::persistent::PersistentAvlSet;
//!
//! let set = PersistentAvlSet::new()
//!     .insert(9)
//!     .insert(1)
//!     .insert(5);
//!
//! assert!(set.contains(&5));
//! assert_eq!(set.ceiling(&6), Some(&9));
//! assert_eq!(set.floor(&4), Some(&1));
//! assert_eq!(set.to_sorted_vec(), vec![1, 5, 9]);
//!
//! // Structural sharing: the original set is preserved
//! let smaller = set.remove(&5);
//! assert_eq!(set.len(), 3);
//! assert_eq!(smaller.len(), 2);
//! ```
//!
//! # Set Operations
//!
//! ```rust
//! use persistent_avl::persistent::PersistentAvlSet;
//!
//! let set_a: PersistentAvlSet<i32> = [1, 2, 3].into_iter().collect();
//! let set_b: PersistentAvlSet<i32> = [2, 3, 4].into_iter().collect();
//!
//! assert_eq!(set_a.union(&set_b).to_sorted_vec(), vec![1, 2, 3, 4]);
//! assert_eq!(set_a.intersection(&set_b).to_sorted_vec(), vec![2, 3]);
//! assert_eq!(set_a.difference(&set_b).to_sorted_vec(), vec![1]);
//! assert_eq!(set_a.symmetric_difference(&set_b).to_sorted_vec(), vec![1, 4]);
//! ```

use super::cursor::{PersistentAvlTreeIntoIterator, PersistentAvlTreeIterator};
use super::error::InvariantViolation;
use super::node::Node;
use super::tree::PersistentAvlTree;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::{FromIterator, FusedIterator};

// =============================================================================
// PersistentAvlSet Definition
// =============================================================================

/// A persistent (immutable) ordered set based on [`PersistentAvlTree`].
///
/// # Time Complexity
///
/// | Operation              | Complexity             |
/// |------------------------|------------------------|
/// | `new`                  | O(1)                   |
/// | `contains`             | O(log N)               |
/// | `insert`               | O(log N)               |
/// | `remove`               | O(log N)               |
/// | `ceiling` / `floor`    | O(log N)               |
/// | `len`                  | O(1)                   |
/// | `union`                | O(min(n,m) · log(n+m)) |
/// | `intersection`         | O(min(n,m) · log(n+m)) |
/// | `difference`           | O(min(n,m) · log(n+m)) |
/// | `symmetric_difference` | O((n+m) · log(n+m))    |
///
/// # Examples
///
/// ```rust
/// use persistent_avl::persistent::PersistentAvlSet;
///
/// let set = PersistentAvlSet::singleton(42);
/// assert!(set.contains(&42));
/// assert!(!set.contains(&0));
/// ```
pub struct PersistentAvlSet<T> {
    tree: PersistentAvlTree<T, ()>,
}

impl<T> PersistentAvlSet<T> {
    /// Creates a new empty set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlSet;
    ///
    /// let set: PersistentAvlSet<i32> = PersistentAvlSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tree: PersistentAvlTree::new(),
        }
    }

    /// Returns the number of elements in the set.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the least element.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.tree.first().map(|(element, ())| element)
    }

    /// Returns the greatest element.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.tree.last().map(|(element, ())| element)
    }

    /// Returns an iterator over the elements in ascending order.
    #[must_use]
    pub fn iter(&self) -> PersistentAvlSetIterator<'_, T> {
        PersistentAvlSetIterator {
            inner: self.tree.iter(),
        }
    }
}

impl<T: Ord> PersistentAvlSet<T> {
    /// Returns `true` if the set contains the element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlSet;
    ///
    /// let set = PersistentAvlSet::new().insert("apple".to_string());
    ///
    /// // Can use &str to look up String elements
    /// assert!(set.contains("apple"));
    /// assert!(!set.contains("banana"));
    /// ```
    #[must_use]
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.contains_key(element)
    }

    /// Returns the set rooted at the subtree of the least element greater
    /// than or equal to `element`.
    ///
    /// The result shares its nodes with `self` and is empty when no such
    /// element exists. Use [`ceiling`](Self::ceiling) for the element itself.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlSet;
    ///
    /// let set: PersistentAvlSet<i32> = (1..=7).collect();
    ///
    /// let subset = set.least_upper_bound(&2);
    /// assert_eq!(subset.to_sorted_vec(), vec![1, 2, 3]);
    /// assert!(set.least_upper_bound(&8).is_empty());
    /// ```
    #[must_use]
    pub fn least_upper_bound<Q>(&self, element: &Q) -> Self
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Self {
            tree: self.tree.least_upper_bound_tree(element),
        }
    }

    /// Returns the least element greater than or equal to `element`.
    #[must_use]
    pub fn ceiling<Q>(&self, element: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.least_upper_bound(element).map(Node::key)
    }

    /// Returns the greatest element less than or equal to `element`.
    #[must_use]
    pub fn floor<Q>(&self, element: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.greatest_lower_bound(element).map(Node::key)
    }

    /// Returns an iterator over the elements greater than or equal to
    /// `lower_bound`, in ascending order.
    #[must_use]
    pub fn iter_from<Q>(&self, lower_bound: &Q) -> PersistentAvlSetIterator<'_, T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        PersistentAvlSetIterator {
            inner: self.tree.iter_from(lower_bound),
        }
    }

    /// Returns `true` if every element of `self` is also in `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlSet;
    ///
    /// let subset: PersistentAvlSet<i32> = [1, 2].into_iter().collect();
    /// let superset: PersistentAvlSet<i32> = [1, 2, 3].into_iter().collect();
    ///
    /// assert!(subset.is_subset(&superset));
    /// assert!(!superset.is_subset(&subset));
    /// ```
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        if self.len() > other.len() {
            return false;
        }

        // Ordered merge walk: every element of self must appear in other.
        let mut others = other.iter().peekable();
        for element in self {
            loop {
                match others.peek().map(|candidate| (*candidate).cmp(element)) {
                    Some(Ordering::Less) => {
                        others.next();
                    }
                    Some(Ordering::Equal) => {
                        others.next();
                        break;
                    }
                    Some(Ordering::Greater) | None => return false,
                }
            }
        }
        true
    }

    /// Returns `true` if every element of `other` is also in `self`.
    #[must_use]
    pub fn is_superset(&self, other: &Self) -> bool {
        other.is_subset(self)
    }

    /// Returns `true` if `self` and `other` have no element in common.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlSet;
    ///
    /// let odd: PersistentAvlSet<i32> = [1, 3, 5].into_iter().collect();
    /// let even: PersistentAvlSet<i32> = [2, 4, 6].into_iter().collect();
    ///
    /// assert!(odd.is_disjoint(&even));
    /// assert!(!odd.is_disjoint(&odd));
    /// ```
    #[must_use]
    pub fn is_disjoint(&self, other: &Self) -> bool {
        let (smaller, larger) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        !smaller.iter().any(|element| larger.contains(element))
    }

    /// Checks the invariants of the underlying tree.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        self.tree.validate()
    }
}

impl<T: Clone + Ord> PersistentAvlSet<T> {
    /// Creates a set containing a single element.
    #[inline]
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self::new().insert(element)
    }

    /// Adds an element to the set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlSet;
    ///
    /// let set1 = PersistentAvlSet::new().insert(1);
    /// let set2 = set1.insert(2);
    ///
    /// assert_eq!(set1.len(), 1); // Original unchanged
    /// assert_eq!(set2.len(), 2); // New version
    /// ```
    #[must_use]
    pub fn insert(&self, element: T) -> Self {
        Self {
            tree: self.tree.insert(element, ()),
        }
    }

    /// Removes an element from the set.
    ///
    /// Removing an absent element returns a set sharing the root of `self`.
    #[must_use]
    pub fn remove<Q>(&self, element: &Q) -> Self
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Self {
            tree: self.tree.remove(element),
        }
    }

    /// Returns the elements in ascending order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlSet;
    ///
    /// let set: PersistentAvlSet<i32> = [3, 1, 2, 3].into_iter().collect();
    /// assert_eq!(set.to_sorted_vec(), vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn to_sorted_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Returns the union of two sets.
    ///
    /// The elements of the smaller set are inserted into the larger one, so
    /// the result shares most of its nodes with the larger input.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let (smaller, larger) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        smaller
            .iter()
            .fold(larger.clone(), |set, element| set.insert(element.clone()))
    }

    /// Returns the elements present in both sets.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let (smaller, larger) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        smaller
            .iter()
            .filter(|element| larger.contains(*element))
            .cloned()
            .collect()
    }

    /// Returns the elements of `self` that are not in `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlSet;
    ///
    /// let set_a: PersistentAvlSet<i32> = (1..=100).collect();
    /// let set_b: PersistentAvlSet<i32> = [10, 20, 200].into_iter().collect();
    ///
    /// let difference = set_a.difference(&set_b);
    /// assert_eq!(difference.len(), 98);
    /// assert!(!difference.contains(&10));
    /// ```
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        if other.len() < self.len() {
            other
                .iter()
                .fold(self.clone(), |set, element| set.remove(element))
        } else {
            self.iter()
                .filter(|element| !other.contains(*element))
                .cloned()
                .collect()
        }
    }

    /// Returns the elements present in exactly one of the two sets.
    #[must_use]
    pub fn symmetric_difference(&self, other: &Self) -> Self {
        self.difference(other).union(&other.difference(self))
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over the elements of a [`PersistentAvlSet`] in ascending order.
pub struct PersistentAvlSetIterator<'a, T> {
    inner: PersistentAvlTreeIterator<'a, T, ()>,
}

impl<'a, T> Iterator for PersistentAvlSetIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(element, ())| element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for PersistentAvlSetIterator<'_, T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for PersistentAvlSetIterator<'_, T> {}

impl<T> Clone for PersistentAvlSetIterator<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// An owning iterator over the elements of a [`PersistentAvlSet`] in
/// ascending order.
pub struct PersistentAvlSetIntoIterator<T> {
    inner: PersistentAvlTreeIntoIterator<T, ()>,
}

impl<T: Clone> Iterator for PersistentAvlSetIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(element, ())| element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T: Clone> ExactSizeIterator for PersistentAvlSetIntoIterator<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T: Clone> FusedIterator for PersistentAvlSetIntoIterator<T> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Clone for PersistentAvlSet<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<T> Default for PersistentAvlSet<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Ord> FromIterator<T> for PersistentAvlSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |set, element| set.insert(element))
    }
}

impl<T: Clone> IntoIterator for PersistentAvlSet<T> {
    type Item = T;
    type IntoIter = PersistentAvlSetIntoIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        PersistentAvlSetIntoIterator {
            inner: self.tree.into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a PersistentAvlSet<T> {
    type Item = &'a T;
    type IntoIter = PersistentAvlSetIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: PartialEq> PartialEq for PersistentAvlSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<T: Eq> Eq for PersistentAvlSet<T> {}

impl<T: Hash> Hash for PersistentAvlSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistentAvlSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for PersistentAvlSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "}}")
    }
}

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(PersistentAvlSet<i32>: Send, Sync);

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentAvlSet<String>: Send, Sync);

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for PersistentAvlSet<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentAvlSetVisitor<T> {
    marker: std::marker::PhantomData<T>,
}

#[cfg(feature = "serde")]
impl<T> PersistentAvlSetVisitor<T> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::de::Visitor<'de> for PersistentAvlSetVisitor<T>
where
    T: serde::Deserialize<'de> + Clone + Ord,
{
    type Value = PersistentAvlSet<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut set = PersistentAvlSet::new();
        while let Some(element) = seq.next_element()? {
            set = set.insert(element);
        }
        Ok(set)
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for PersistentAvlSet<T>
where
    T: serde::Deserialize<'de> + Clone + Ord,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(PersistentAvlSetVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================


// =============================================================================
// Serde Tests (serde feature only)
// =============================================================================
