//! Persistent (immutable) ordered map based on an AVL tree.
//!
//! This module provides [`PersistentAvlTree`], an immutable ordered map
//! that uses structural sharing for efficient operations.
//!
//! # Overview
//!
//! - O(log N) get, insert, remove
//! - O(log N) ceiling (`least_upper_bound`) and floor (`greatest_lower_bound`)
//! - O(log N) min/max
//! - O(log N + k) range queries where k is the number of results
//! - O(1) len, height and `is_empty`
//!
//! All operations return new maps without modifying the original.
//! Insertion and removal rebuild only the nodes on the search path (plus at
//! most three per rotation) and share every other subtree.
//!
//! # Examples
//!
//! ```rust
//! use persistent_avl::persistent::PersistentAvlTree;
//!
//! let tree = PersistentAvlTree::new()
//!     .insert(9, "nine")
//!     .insert(1, "one")
//!     .insert(5, "five");
//!
//! // Entries are always in sorted order
//! let keys: Vec<&i32> = tree.keys().collect();
//! assert_eq!(keys, vec![&1, &5, &9]);
//!
//! // Ceiling and floor queries
//! assert_eq!(tree.least_upper_bound(&6).map(|node| *node.key()), Some(9));
//! assert_eq!(tree.greatest_lower_bound(&6).map(|node| *node.key()), Some(5));
//! assert!(tree.least_upper_bound(&10).is_none());
//! ```
//!
//! # Internal Structure
//!
//! Every node satisfies:
//! 1. All keys in the left subtree are smaller and all keys in the right
//!    subtree are greater than the node's key
//! 2. The heights of the two subtrees differ by at most one
//! 3. The cached size is `size(left) + size(right) + 1`
//! 4. The cached height is `1 + max(height(left), height(right))`
//!
//! These invariants bound the height by about 1.44 · log2(N + 2).

use super::ReferenceCounter;
use super::cursor::{
    PersistentAvlTreeCursor, PersistentAvlTreeIntoIterator, PersistentAvlTreeIterator,
};
use super::error::InvariantViolation;
use super::node::{self, Link, Node};
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;
use std::ops::{Bound, RangeBounds};

// =============================================================================
// PersistentAvlTree Definition
// =============================================================================

/// A persistent (immutable) ordered map based on an AVL tree.
///
/// Keys must implement `Ord`. Cloning a tree is O(1): the clone shares the
/// root with the original.
///
/// # Time Complexity
///
/// | Operation              | Complexity   |
/// |------------------------|--------------|
/// | `new`                  | O(1)         |
/// | `get` / `find`         | O(log N)     |
/// | `insert`               | O(log N)     |
/// | `remove`               | O(log N)     |
/// | `least_upper_bound`    | O(log N)     |
/// | `greatest_lower_bound` | O(log N)     |
/// | `least` / `most`       | O(log N)     |
/// | `iter_from`            | O(log N)     |
/// | `range`                | O(log N + k) |
/// | `len` / `height`       | O(1)         |
///
/// # Examples
///
/// ```rust
/// use persistent_avl::persistent::PersistentAvlTree;
///
/// let tree = PersistentAvlTree::singleton(42, "answer");
/// assert_eq!(tree.get(&42), Some(&"answer"));
///
/// let updated = tree.insert(7, "seven");
/// assert_eq!(tree.len(), 1);    // Original unchanged
/// assert_eq!(updated.len(), 2); // New version
/// ```
pub struct PersistentAvlTree<K, V> {
    /// Root node of the tree; `None` for the empty tree
    pub(crate) root: Link<K, V>,
}

impl<K, V> PersistentAvlTree<K, V> {
    /// Creates a new empty tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlTree;
    ///
    /// let tree: PersistentAvlTree<i32, String> = PersistentAvlTree::new();
    /// assert!(tree.is_empty());
    /// assert_eq!(tree.height(), 0);
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { root: None }
    }

    /// Returns the number of entries in the tree.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        node::size(self.root.as_ref())
    }

    /// Returns `true` if the tree contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the height of the tree; 0 for the empty tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlTree;
    ///
    /// let tree: PersistentAvlTree<i32, ()> = (1..=7).map(|key| (key, ())).collect();
    /// assert_eq!(tree.height(), 3);
    /// ```
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        node::height(self.root.as_ref())
    }

    /// Returns the root node, or `None` for the empty tree.
    #[inline]
    #[must_use]
    pub fn root(&self) -> Option<&Node<K, V>> {
        self.root.as_deref()
    }

    /// Returns the node with the least key.
    #[must_use]
    pub fn least(&self) -> Option<&Node<K, V>> {
        node::least(self.root.as_ref()).map(|node| &**node)
    }

    /// Returns the node with the greatest key.
    #[must_use]
    pub fn most(&self) -> Option<&Node<K, V>> {
        node::most(self.root.as_ref()).map(|node| &**node)
    }

    /// Returns the entry with the least key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlTree;
    ///
    /// let tree = PersistentAvlTree::new()
    ///     .insert(3, "three")
    ///     .insert(1, "one");
    ///
    /// assert_eq!(tree.first(), Some((&1, &"one")));
    /// assert_eq!(tree.last(), Some((&3, &"three")));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<(&K, &V)> {
        self.least().map(|node| (&node.key, &node.value))
    }

    /// Returns the entry with the greatest key.
    #[must_use]
    pub fn last(&self) -> Option<(&K, &V)> {
        self.most().map(|node| (&node.key, &node.value))
    }

    /// Returns an iterator over entries in ascending key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlTree;
    ///
    /// let tree = PersistentAvlTree::new()
    ///     .insert(2, "two")
    ///     .insert(1, "one");
    ///
    /// let entries: Vec<(&i32, &&str)> = tree.iter().collect();
    /// assert_eq!(entries, vec![(&1, &"one"), (&2, &"two")]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> PersistentAvlTreeIterator<'_, K, V> {
        PersistentAvlTreeIterator::new(self.root.as_ref())
    }

    /// Returns an iterator over keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over values in ascending key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlTree;
    ///
    /// let tree = PersistentAvlTree::new()
    ///     .insert(1, 10)
    ///     .insert(2, 20)
    ///     .insert(3, 30);
    ///
    /// let sum: i32 = tree.values().sum();
    /// assert_eq!(sum, 60);
    /// ```
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Returns an owning cursor positioned before the least key.
    ///
    /// Unlike [`iter`](Self::iter), the cursor does not borrow the tree.
    #[must_use]
    pub fn cursor(&self) -> PersistentAvlTreeCursor<K, V> {
        PersistentAvlTreeCursor::new(self.root.as_ref())
    }
}

impl<K: Ord, V> PersistentAvlTree<K, V> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the tree's key type, but the
    /// ordering on the borrowed form must match the ordering on the key type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlTree;
    ///
    /// let tree = PersistentAvlTree::new().insert("hello".to_string(), 42);
    ///
    /// // Can use &str to look up String keys
    /// assert_eq!(tree.get("hello"), Some(&42));
    /// assert_eq!(tree.get("world"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(Node::value)
    }

    /// Returns the node holding the key.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn find<Q>(&self, key: &Q) -> Option<&Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        node::find(self.root.as_ref(), key).map(|node| &**node)
    }

    /// Returns `true` if the tree contains the key.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Returns the node with the least key greater than or equal to `key`
    /// (the ceiling of `key`).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlTree;
    ///
    /// let tree: PersistentAvlTree<i32, ()> = [1, 5, 9].into_iter().map(|key| (key, ())).collect();
    ///
    /// assert_eq!(tree.least_upper_bound(&5).map(|node| *node.key()), Some(5));
    /// assert_eq!(tree.least_upper_bound(&6).map(|node| *node.key()), Some(9));
    /// assert!(tree.least_upper_bound(&10).is_none());
    /// ```
    #[must_use]
    pub fn least_upper_bound<Q>(&self, key: &Q) -> Option<&Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        node::least_upper_bound(self.root.as_ref(), key).map(|node| &**node)
    }

    /// Returns the node with the greatest key less than or equal to `key`
    /// (the floor of `key`).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlTree;
    ///
    /// let tree: PersistentAvlTree<i32, ()> = [1, 5, 9].into_iter().map(|key| (key, ())).collect();
    ///
    /// assert_eq!(tree.greatest_lower_bound(&4).map(|node| *node.key()), Some(1));
    /// assert!(tree.greatest_lower_bound(&0).is_none());
    /// ```
    #[must_use]
    pub fn greatest_lower_bound<Q>(&self, key: &Q) -> Option<&Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        node::greatest_lower_bound(self.root.as_ref(), key).map(|node| &**node)
    }

    /// Returns the subtree rooted at the ceiling of `key` as a tree of its own.
    ///
    /// The result shares its nodes with `self`. It contains the ceiling
    /// entry and everything below that node, which is not necessarily every
    /// entry greater than `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlTree;
    ///
    /// let tree: PersistentAvlTree<i32, ()> = (1..=7).map(|key| (key, ())).collect();
    ///
    /// let subtree = tree.least_upper_bound_tree(&6);
    /// assert_eq!(subtree.root().map(|node| *node.key()), Some(6));
    /// assert_eq!(subtree.len(), 3); // 5, 6, 7
    /// ```
    #[must_use]
    pub fn least_upper_bound_tree<Q>(&self, key: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Self {
            root: node::least_upper_bound(self.root.as_ref(), key).cloned(),
        }
    }

    /// Returns an iterator over entries with keys greater than or equal to
    /// `lower_bound`, in ascending order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlTree;
    ///
    /// let tree: PersistentAvlTree<i32, ()> = [1, 5, 9].into_iter().map(|key| (key, ())).collect();
    ///
    /// let keys: Vec<&i32> = tree.iter_from(&2).map(|(key, _)| key).collect();
    /// assert_eq!(keys, vec![&5, &9]);
    /// ```
    #[must_use]
    pub fn iter_from<Q>(&self, lower_bound: &Q) -> PersistentAvlTreeIterator<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        PersistentAvlTreeIterator::seek(self.root.as_ref(), lower_bound, true)
    }

    /// Returns an owning cursor positioned before the least key greater than
    /// or equal to `lower_bound`.
    #[must_use]
    pub fn cursor_from<Q>(&self, lower_bound: &Q) -> PersistentAvlTreeCursor<K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        PersistentAvlTreeCursor::seek(self.root.as_ref(), lower_bound)
    }

    /// Returns an iterator over entries within the specified range.
    ///
    /// The start of the range is located with a single descent and the
    /// number of entries in range is computed from subtree sizes, so only
    /// the entries actually yielded are visited.
    ///
    /// # Complexity
    ///
    /// O(log N + k) where k is the number of entries in the range
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlTree;
    ///
    /// let tree: PersistentAvlTree<i32, &str> = [(1, "a"), (2, "b"), (3, "c"), (4, "d"), (5, "e")]
    ///     .into_iter()
    ///     .collect();
    ///
    /// let range: Vec<&i32> = tree.range(2..=4).map(|(key, _)| key).collect();
    /// assert_eq!(range, vec![&2, &3, &4]);
    ///
    /// let range: Vec<&i32> = tree.range(..3).map(|(key, _)| key).collect();
    /// assert_eq!(range, vec![&1, &2]);
    /// ```
    pub fn range<R, Q>(&self, range: R) -> PersistentAvlTreeIterator<'_, K, V>
    where
        R: RangeBounds<Q>,
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let root = self.root.as_ref();

        let (iterator, skipped) = match range.start_bound() {
            Bound::Included(start) => (
                PersistentAvlTreeIterator::seek(root, start, true),
                node::rank(root, start, false),
            ),
            Bound::Excluded(start) => (
                PersistentAvlTreeIterator::seek(root, start, false),
                node::rank(root, start, true),
            ),
            Bound::Unbounded => (PersistentAvlTreeIterator::new(root), 0),
        };

        let end = match range.end_bound() {
            Bound::Included(end) => node::rank(root, end, true),
            Bound::Excluded(end) => node::rank(root, end, false),
            Bound::Unbounded => self.len(),
        };

        iterator.take_at_most(end.saturating_sub(skipped))
    }

    /// Checks every node against the search-tree order, balance, size and
    /// height invariants.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found. Trees built through
    /// the public API always pass.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlTree;
    ///
    /// let tree: PersistentAvlTree<i32, i32> = (0..100).map(|key| (key, key)).collect();
    /// assert!(tree.remove(&50).validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        Self::audit(self.root.as_ref(), None, None, 0).map(|_| ())
    }

    /// Recursive helper for validate.
    /// Returns the audited (size, height) of the subtree.
    fn audit<'a>(
        link: Option<&'a ReferenceCounter<Node<K, V>>>,
        lower: Option<&'a K>,
        upper: Option<&'a K>,
        offset: usize,
    ) -> Result<(usize, usize), InvariantViolation> {
        let Some(node) = link else {
            return Ok((0, 0));
        };

        let (left_size, left_height) =
            Self::audit(node.left.as_ref(), lower, Some(&node.key), offset)?;
        let position = offset + left_size;

        let above_lower = lower.is_none_or(|lower| node.key > *lower);
        let below_upper = upper.is_none_or(|upper| node.key < *upper);
        if !(above_lower && below_upper) {
            return Err(InvariantViolation::OrderViolation { position });
        }

        let (right_size, right_height) =
            Self::audit(node.right.as_ref(), Some(&node.key), upper, position + 1)?;

        let size = left_size + right_size + 1;
        if node.size != size {
            return Err(InvariantViolation::SizeMismatch {
                position,
                recorded: node.size,
                actual: size,
            });
        }

        let height = left_height.max(right_height) + 1;
        if node.height != height {
            return Err(InvariantViolation::HeightMismatch {
                position,
                recorded: node.height,
                actual: height,
            });
        }

        let balance_factor = right_height.cast_signed() - left_height.cast_signed();
        if balance_factor.abs() > 1 {
            return Err(InvariantViolation::BalanceViolation {
                position,
                balance_factor,
            });
        }

        Ok((size, height))
    }
}

impl<K: Clone + Ord, V: Clone> PersistentAvlTree<K, V> {
    /// Creates a tree containing a single entry.
    #[inline]
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self {
        Self::new().insert(key, value)
    }

    /// Inserts a key-value pair into the tree.
    ///
    /// If the tree already contains the key, its value is replaced. Every
    /// ancestor of the entry is rebuilt and rebalanced; all other subtrees
    /// are shared with `self`.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlTree;
    ///
    /// let tree1 = PersistentAvlTree::new().insert(1, "one");
    /// let tree2 = tree1.insert(1, "ONE");
    ///
    /// assert_eq!(tree1.get(&1), Some(&"one")); // Original unchanged
    /// assert_eq!(tree2.get(&1), Some(&"ONE")); // New version
    /// ```
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        Self {
            root: Some(node::insert(self.root.as_ref(), key, value)),
        }
    }

    /// Removes a key from the tree.
    ///
    /// A node with two children is replaced by its predecessor, the greatest
    /// key smaller than it. If the key does not exist, the result shares the
    /// root of `self` and nothing is rebuilt.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlTree;
    ///
    /// let tree = PersistentAvlTree::new()
    ///     .insert(1, "one")
    ///     .insert(2, "two");
    /// let removed = tree.remove(&1);
    ///
    /// assert_eq!(tree.len(), 2);    // Original unchanged
    /// assert_eq!(removed.len(), 1); // New version
    /// assert_eq!(removed.get(&1), None);
    /// ```
    #[must_use]
    pub fn remove<Q>(&self, key: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.root
            .as_ref()
            .and_then(|root| node::remove(root, key))
            .map_or_else(|| self.clone(), |root| Self { root })
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Clone for PersistentAvlTree<K, V> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
        }
    }
}

impl<K, V> Default for PersistentAvlTree<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Ord, V: Clone> FromIterator<(K, V)> for PersistentAvlTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |tree, (key, value)| tree.insert(key, value))
    }
}

impl<K: Clone, V: Clone> IntoIterator for PersistentAvlTree<K, V> {
    type Item = (K, V);
    type IntoIter = PersistentAvlTreeIntoIterator<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        PersistentAvlTreeIntoIterator::new(self.cursor(), self.len())
    }
}

impl<'a, K, V> IntoIterator for &'a PersistentAvlTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = PersistentAvlTreeIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for PersistentAvlTree<K, V> {
    fn eq(&self, other: &Self) -> bool {
        // Equal entries in ascending order, regardless of tree shape.
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for PersistentAvlTree<K, V> {}

/// Computes a hash value for this tree.
///
/// The length is hashed first, then each (key, value) pair in key order, so
/// trees holding the same entries hash equally regardless of their shape.
impl<K: Hash, V: Hash> Hash for PersistentAvlTree<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (key, value) in self {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for PersistentAvlTree<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for PersistentAvlTree<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(PersistentAvlTree<i32, i32>: Send, Sync);

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentAvlTree<i32, String>: Send, Sync);

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V> serde::Serialize for PersistentAvlTree<K, V>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentAvlTreeVisitor<K, V> {
    key_marker: std::marker::PhantomData<K>,
    value_marker: std::marker::PhantomData<V>,
}

#[cfg(feature = "serde")]
impl<K, V> PersistentAvlTreeVisitor<K, V> {
    const fn new() -> Self {
        Self {
            key_marker: std::marker::PhantomData,
            value_marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for PersistentAvlTreeVisitor<K, V>
where
    K: serde::Deserialize<'de> + Clone + Ord,
    V: serde::Deserialize<'de> + Clone,
{
    type Value = PersistentAvlTree<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        // Later duplicates overwrite earlier ones.
        let mut tree = PersistentAvlTree::new();
        while let Some((key, value)) = access.next_entry()? {
            tree = tree.insert(key, value);
        }
        Ok(tree)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for PersistentAvlTree<K, V>
where
    K: serde::Deserialize<'de> + Clone + Ord,
    V: serde::Deserialize<'de> + Clone,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(PersistentAvlTreeVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================


// =============================================================================
// Send + Sync Tests (arc feature only)
// =============================================================================


// =============================================================================
// Multithread Tests (arc feature only)
// =============================================================================

#[cfg(all(test, feature = "arc"))]
mod multithread_tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Arc;
    use std::thread;

    #[rstest]
    fn test_tree_shared_across_threads() {
        let tree: Arc<PersistentAvlTree<i32, i32>> =
            Arc::new((0..100).map(|key| (key, key * 2)).collect());

        let handles: Vec<_> = (0..4)
            .map(|index| {
                let tree_clone = Arc::clone(&tree);
                thread::spawn(move || {
                    let updated = tree_clone.insert(1000 + index, index);
                    assert_eq!(updated.len(), 101);
                    assert_eq!(tree_clone.len(), 100);
                    tree_clone.get(&(index * 10)).copied()
                })
            })
            .collect();

        for (index, handle) in handles.into_iter().enumerate() {
            let expected = i32::try_from(index).map(|index| index * 20).ok();
            assert_eq!(handle.join().expect("Thread panicked"), expected);
        }
    }

    #[rstest]
    fn test_cursor_moved_to_another_thread() {
        let tree: PersistentAvlTree<i32, i32> = (0..10).map(|key| (key, key)).collect();
        let mut cursor = tree.cursor_from(&5);
        drop(tree);

        let keys = thread::spawn(move || {
            let mut keys = Vec::new();
            while cursor.move_next() {
                keys.extend(cursor.key().copied());
            }
            keys
        })
        .join()
        .expect("Thread panicked");

        assert_eq!(keys, vec![5, 6, 7, 8, 9]);
    }
}

// =============================================================================
// Serde Tests (serde feature only)
// =============================================================================
