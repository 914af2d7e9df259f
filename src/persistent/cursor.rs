//! In-order traversal over a fixed tree root.
//!
//! Both traversals keep an explicit stack of the ancestors still to be
//! visited instead of recursing:
//!
//! - [`PersistentAvlTreeIterator`] borrows the tree and yields `(&K, &V)`.
//! - [`PersistentAvlTreeCursor`] owns reference-counted handles to the nodes
//!   it still has to visit, so it stays valid after the tree it was created
//!   from has been dropped or replaced by a newer version.
//! - [`PersistentAvlTreeIntoIterator`] wraps a cursor and yields cloned
//!   `(K, V)` pairs.
//!
//! Either can start at the first entry or seek the least key greater than or
//! equal to a lower bound in O(log N).

use super::ReferenceCounter;
use super::node::{Node, size};
use smallvec::SmallVec;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::iter::FusedIterator;

/// Inline capacity of the traversal stack. An AVL tree of this height holds
/// more entries than fit in memory, so the stack never spills to the heap.
const STACK_CAPACITY: usize = 48;

// =============================================================================
// Borrowing Iterator
// =============================================================================

/// An iterator over the entries of a [`PersistentAvlTree`](super::PersistentAvlTree)
/// in ascending key order.
///
/// The top of the stack is always the next entry to yield. The number of
/// remaining entries is tracked from subtree sizes, so the iterator is exact
/// even when it starts from a lower bound or stops at an upper bound.
pub struct PersistentAvlTreeIterator<'a, K, V> {
    stack: SmallVec<[&'a Node<K, V>; STACK_CAPACITY]>,
    remaining: usize,
}

impl<'a, K, V> PersistentAvlTreeIterator<'a, K, V> {
    /// Starts at the least key.
    pub(crate) fn new(root: Option<&'a ReferenceCounter<Node<K, V>>>) -> Self {
        let mut iterator = Self {
            stack: SmallVec::new(),
            remaining: size(root),
        };
        iterator.push_left_spine(root.map(|node| &**node));
        iterator
    }

    /// Starts at the least key `>= bound`, or `> bound` when `inclusive` is false.
    pub(crate) fn seek<Q>(
        root: Option<&'a ReferenceCounter<Node<K, V>>>,
        bound: &Q,
        inclusive: bool,
    ) -> Self
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut stack = SmallVec::new();
        let mut remaining = 0;
        let mut current = root.map(|node| &**node);

        while let Some(node) = current {
            match node.key.borrow().cmp(bound) {
                Ordering::Equal if inclusive => {
                    stack.push(node);
                    remaining += size(node.right.as_ref()) + 1;
                    current = None;
                }
                Ordering::Less | Ordering::Equal => current = node.right(),
                Ordering::Greater => {
                    stack.push(node);
                    remaining += size(node.right.as_ref()) + 1;
                    current = node.left();
                }
            }
        }

        Self { stack, remaining }
    }

    /// Stops the iteration after at most `limit` more entries.
    pub(crate) fn take_at_most(mut self, limit: usize) -> Self {
        self.remaining = self.remaining.min(limit);
        self
    }

    fn push_left_spine(&mut self, mut current: Option<&'a Node<K, V>>) {
        while let Some(node) = current {
            self.stack.push(node);
            current = node.left();
        }
    }
}

impl<'a, K, V> Iterator for PersistentAvlTreeIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.stack.pop()?;
        self.push_left_spine(node.right());
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for PersistentAvlTreeIterator<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for PersistentAvlTreeIterator<'_, K, V> {}

impl<K, V> Clone for PersistentAvlTreeIterator<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

// =============================================================================
// Owning Cursor
// =============================================================================

/// A forward-only cursor over the nodes of a [`PersistentAvlTree`](super::PersistentAvlTree).
///
/// A freshly created cursor is positioned *before* its first node; call
/// [`move_next`](Self::move_next) to advance. The cursor holds shared
/// references to every node it has yet to visit, so the sequence it produces
/// is fixed at construction and unaffected by later insertions or removals on
/// any version of the tree.
///
/// # Examples
///
/// ```rust
/// use persistent_avl::persistent::PersistentAvlTree;
///
/// let tree: PersistentAvlTree<i32, char> = [(1, 'a'), (5, 'e'), (9, 'i')]
///     .into_iter()
///     .collect();
///
/// let mut cursor = tree.cursor_from(&4);
/// drop(tree);
///
/// assert!(cursor.move_next());
/// assert_eq!(cursor.key(), Some(&5));
/// assert!(cursor.move_next());
/// assert_eq!(cursor.value(), Some(&'i'));
/// assert!(!cursor.move_next());
/// assert!(cursor.current().is_none());
/// ```
pub struct PersistentAvlTreeCursor<K, V> {
    stack: SmallVec<[ReferenceCounter<Node<K, V>>; STACK_CAPACITY]>,
    current: Option<ReferenceCounter<Node<K, V>>>,
}

impl<K, V> PersistentAvlTreeCursor<K, V> {
    pub(crate) fn new(root: Option<&ReferenceCounter<Node<K, V>>>) -> Self {
        let mut cursor = Self {
            stack: SmallVec::new(),
            current: None,
        };
        cursor.push_left_spine(root);
        cursor
    }

    pub(crate) fn seek<Q>(root: Option<&ReferenceCounter<Node<K, V>>>, bound: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut stack = SmallVec::new();
        let mut current = root;

        while let Some(node) = current {
            match node.key.borrow().cmp(bound) {
                Ordering::Equal => {
                    stack.push(ReferenceCounter::clone(node));
                    current = None;
                }
                Ordering::Less => current = node.right.as_ref(),
                Ordering::Greater => {
                    stack.push(ReferenceCounter::clone(node));
                    current = node.left.as_ref();
                }
            }
        }

        Self {
            stack,
            current: None,
        }
    }

    fn push_left_spine(&mut self, mut current: Option<&ReferenceCounter<Node<K, V>>>) {
        while let Some(node) = current {
            self.stack.push(ReferenceCounter::clone(node));
            current = node.left.as_ref();
        }
    }

    /// Advances to the next node in ascending key order.
    ///
    /// Returns `true` if the cursor now points at a node and `false` once the
    /// sequence is exhausted.
    pub fn move_next(&mut self) -> bool {
        if let Some(current) = self.current.take() {
            self.push_left_spine(current.right.as_ref());
        }
        self.current = self.stack.pop();
        self.current.is_some()
    }

    /// Returns the node the cursor points at.
    #[must_use]
    pub fn current(&self) -> Option<&Node<K, V>> {
        self.current.as_deref()
    }

    /// Returns the key of the current node.
    #[must_use]
    pub fn key(&self) -> Option<&K> {
        self.current().map(Node::key)
    }

    /// Returns the value of the current node.
    #[must_use]
    pub fn value(&self) -> Option<&V> {
        self.current().map(Node::value)
    }

    /// Returns `true` if no node is left to visit after the current one.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.stack.is_empty() && self.current.as_ref().is_none_or(|node| node.right.is_none())
    }
}

impl<K, V> Clone for PersistentAvlTreeCursor<K, V> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            current: self.current.clone(),
        }
    }
}

// =============================================================================
// Owning Iterator
// =============================================================================

/// An owning iterator over the entries of a [`PersistentAvlTree`](super::PersistentAvlTree)
/// in ascending key order.
///
/// Nodes may be shared with other versions of the tree, so entries are
/// cloned out of them.
pub struct PersistentAvlTreeIntoIterator<K, V> {
    cursor: PersistentAvlTreeCursor<K, V>,
    remaining: usize,
}

impl<K, V> PersistentAvlTreeIntoIterator<K, V> {
    pub(crate) const fn new(cursor: PersistentAvlTreeCursor<K, V>, remaining: usize) -> Self {
        Self { cursor, remaining }
    }
}

impl<K: Clone, V: Clone> Iterator for PersistentAvlTreeIntoIterator<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.cursor.move_next() {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        self.cursor
            .current()
            .map(|node| (node.key.clone(), node.value.clone()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Clone, V: Clone> ExactSizeIterator for PersistentAvlTreeIntoIterator<K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K: Clone, V: Clone> FusedIterator for PersistentAvlTreeIntoIterator<K, V> {}

// =============================================================================
// Tests
// =============================================================================
