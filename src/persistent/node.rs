//! AVL tree nodes and the path-copying algorithms that operate on them.
//!
//! Nodes are immutable once built. Insertion and removal rebuild the nodes on
//! the path from the root to the affected key and share every other subtree
//! with the previous version of the tree.

use super::ReferenceCounter;
use std::borrow::Borrow;
use std::cmp::Ordering;

/// Optional shared reference to a subtree. `None` is the empty tree.
pub(crate) type Link<K, V> = Option<ReferenceCounter<Node<K, V>>>;

// =============================================================================
// Node Definition
// =============================================================================

/// A node of a [`PersistentAvlTree`](super::PersistentAvlTree).
///
/// A node is also the root of the subtree below it, so it exposes the size
/// and height of that subtree in addition to its own entry.
///
/// # Examples
///
/// ```rust
/// use persistent_avl::persistent::PersistentAvlTree;
///
/// let tree: PersistentAvlTree<i32, &str> = [(1, "one"), (2, "two"), (3, "three")]
///     .into_iter()
///     .collect();
///
/// let root = tree.root().unwrap();
/// assert_eq!(root.key(), &2);
/// assert_eq!(root.len(), 3);
/// assert_eq!(root.height(), 2);
/// assert_eq!(root.left().map(|node| *node.key()), Some(1));
/// ```
#[derive(Clone)]
pub struct Node<K, V> {
    pub(super) key: K,
    pub(super) value: V,
    pub(super) left: Link<K, V>,
    pub(super) right: Link<K, V>,
    pub(super) size: usize,
    pub(super) height: usize,
}

impl<K, V> Node<K, V> {
    /// Creates a node over the given children, deriving size and height.
    pub(crate) fn new(key: K, value: V, left: Link<K, V>, right: Link<K, V>) -> Self {
        Self {
            size: size(left.as_ref()) + size(right.as_ref()) + 1,
            height: height(left.as_ref()).max(height(right.as_ref())) + 1,
            key,
            value,
            left,
            right,
        }
    }

    /// Creates a node with no children.
    pub(crate) const fn leaf(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            size: 1,
            height: 1,
        }
    }

    /// Returns the key stored in this node.
    #[inline]
    #[must_use]
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Returns the value stored in this node.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// Returns the left child, whose keys are all smaller than this node's key.
    #[inline]
    #[must_use]
    pub fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    /// Returns the right child, whose keys are all greater than this node's key.
    #[inline]
    #[must_use]
    pub fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }

    /// Returns the number of nodes in the subtree rooted here, including this one.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Always `false`: a node holds at least its own entry.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns the height of the subtree rooted here. A leaf has height 1.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns `height(right) - height(left)`.
    ///
    /// Every node reachable from a tree root has a balance factor in `-1..=1`.
    #[must_use]
    pub fn balance_factor(&self) -> isize {
        let left = height(self.left.as_ref());
        let right = height(self.right.as_ref());
        if right >= left {
            (right - left).cast_signed()
        } else {
            -(left - right).cast_signed()
        }
    }
}

/// Height of an optional subtree; the empty tree has height 0.
#[inline]
pub(crate) fn height<K, V>(link: Option<&ReferenceCounter<Node<K, V>>>) -> usize {
    link.map_or(0, |node| node.height)
}

/// Number of nodes in an optional subtree.
#[inline]
pub(crate) fn size<K, V>(link: Option<&ReferenceCounter<Node<K, V>>>) -> usize {
    link.map_or(0, |node| node.size)
}

// =============================================================================
// Lookup
// =============================================================================

/// Finds the node holding `key`.
pub(crate) fn find<'a, K, V, Q>(
    link: Option<&'a ReferenceCounter<Node<K, V>>>,
    key: &Q,
) -> Option<&'a ReferenceCounter<Node<K, V>>>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    link.and_then(|node| match key.cmp(node.key.borrow()) {
        Ordering::Less => find(node.left.as_ref(), key),
        Ordering::Greater => find(node.right.as_ref(), key),
        Ordering::Equal => Some(node),
    })
}

/// Finds the node with the least key greater than or equal to `key`.
pub(crate) fn least_upper_bound<'a, K, V, Q>(
    link: Option<&'a ReferenceCounter<Node<K, V>>>,
    key: &Q,
) -> Option<&'a ReferenceCounter<Node<K, V>>>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut current = link;
    let mut bound = None;
    while let Some(node) = current {
        match node.key.borrow().cmp(key) {
            Ordering::Less => current = node.right.as_ref(),
            Ordering::Greater => {
                bound = Some(node);
                current = node.left.as_ref();
            }
            Ordering::Equal => return Some(node),
        }
    }
    bound
}

/// Finds the node with the greatest key less than or equal to `key`.
pub(crate) fn greatest_lower_bound<'a, K, V, Q>(
    link: Option<&'a ReferenceCounter<Node<K, V>>>,
    key: &Q,
) -> Option<&'a ReferenceCounter<Node<K, V>>>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut current = link;
    let mut bound = None;
    while let Some(node) = current {
        match node.key.borrow().cmp(key) {
            Ordering::Less => {
                bound = Some(node);
                current = node.right.as_ref();
            }
            Ordering::Greater => current = node.left.as_ref(),
            Ordering::Equal => return Some(node),
        }
    }
    bound
}

/// Leftmost node of a subtree.
pub(crate) fn least<K, V>(
    link: Option<&ReferenceCounter<Node<K, V>>>,
) -> Option<&ReferenceCounter<Node<K, V>>> {
    let mut current = link?;
    while let Some(left) = current.left.as_ref() {
        current = left;
    }
    Some(current)
}

/// Rightmost node of a subtree.
pub(crate) fn most<K, V>(
    link: Option<&ReferenceCounter<Node<K, V>>>,
) -> Option<&ReferenceCounter<Node<K, V>>> {
    let mut current = link?;
    while let Some(right) = current.right.as_ref() {
        current = right;
    }
    Some(current)
}

/// Counts the keys that sort before `key` (or at it, when `inclusive`).
pub(crate) fn rank<K, V, Q>(
    link: Option<&ReferenceCounter<Node<K, V>>>,
    key: &Q,
    inclusive: bool,
) -> usize
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut current = link;
    let mut count = 0;
    while let Some(node) = current {
        let before = match node.key.borrow().cmp(key) {
            Ordering::Less => true,
            Ordering::Equal => inclusive,
            Ordering::Greater => false,
        };
        if before {
            count += size(node.left.as_ref()) + 1;
            current = node.right.as_ref();
        } else {
            current = node.left.as_ref();
        }
    }
    count
}

// =============================================================================
// Insertion
// =============================================================================

/// Inserts or replaces `key`, returning the new subtree root.
pub(crate) fn insert<K, V>(
    link: Option<&ReferenceCounter<Node<K, V>>>,
    key: K,
    value: V,
) -> ReferenceCounter<Node<K, V>>
where
    K: Clone + Ord,
    V: Clone,
{
    let Some(node) = link else {
        return ReferenceCounter::new(Node::leaf(key, value));
    };

    match key.cmp(&node.key) {
        Ordering::Less => {
            let left = insert(node.left.as_ref(), key, value);
            rebuild(
                node.key.clone(),
                node.value.clone(),
                Some(left),
                node.right.clone(),
            )
        }
        Ordering::Greater => {
            let right = insert(node.right.as_ref(), key, value);
            rebuild(
                node.key.clone(),
                node.value.clone(),
                node.left.clone(),
                Some(right),
            )
        }
        Ordering::Equal => {
            // Same children, so no rebalancing is needed.
            ReferenceCounter::new(Node::new(
                key,
                value,
                node.left.clone(),
                node.right.clone(),
            ))
        }
    }
}

// =============================================================================
// Removal
// =============================================================================

/// Removes `key` from the subtree.
///
/// Returns `None` when the key is absent, so the caller can keep sharing the
/// original root instead of rebuilding the search path.
pub(crate) fn remove<K, V, Q>(node: &ReferenceCounter<Node<K, V>>, key: &Q) -> Option<Link<K, V>>
where
    K: Borrow<Q> + Clone,
    V: Clone,
    Q: Ord + ?Sized,
{
    match key.cmp(node.key.borrow()) {
        Ordering::Less => {
            let left = remove(node.left.as_ref()?, key)?;
            Some(Some(rebuild(
                node.key.clone(),
                node.value.clone(),
                left,
                node.right.clone(),
            )))
        }
        Ordering::Greater => {
            let right = remove(node.right.as_ref()?, key)?;
            Some(Some(rebuild(
                node.key.clone(),
                node.value.clone(),
                node.left.clone(),
                right,
            )))
        }
        Ordering::Equal => Some(remove_root(node)),
    }
}

/// Removes the root of a subtree.
///
/// A root with two children is replaced by its predecessor, the rightmost
/// node of the left subtree, which is then removed from that subtree.
fn remove_root<K, V>(node: &ReferenceCounter<Node<K, V>>) -> Link<K, V>
where
    K: Clone,
    V: Clone,
{
    match (&node.left, &node.right) {
        (None, only) | (only, None) => only.clone(),
        (Some(left), Some(right)) => {
            let (predecessor, remaining) = remove_most(left);
            Some(rebuild(
                predecessor.key.clone(),
                predecessor.value.clone(),
                remaining,
                Some(right.clone()),
            ))
        }
    }
}

/// Detaches the rightmost node of a subtree, returning it together with the
/// rebalanced remainder.
fn remove_most<K, V>(
    node: &ReferenceCounter<Node<K, V>>,
) -> (&ReferenceCounter<Node<K, V>>, Link<K, V>)
where
    K: Clone,
    V: Clone,
{
    match &node.right {
        None => (node, node.left.clone()),
        Some(right) => {
            let (most, remaining) = remove_most(right);
            let rebuilt = rebuild(
                node.key.clone(),
                node.value.clone(),
                node.left.clone(),
                remaining,
            );
            (most, Some(rebuilt))
        }
    }
}

// =============================================================================
// Rebalancing
// =============================================================================

/// Builds a node over the given children and restores the AVL balance.
fn rebuild<K, V>(
    key: K,
    value: V,
    left: Link<K, V>,
    right: Link<K, V>,
) -> ReferenceCounter<Node<K, V>>
where
    K: Clone,
    V: Clone,
{
    ReferenceCounter::new(rebalance(Node::new(key, value, left, right)))
}

/// Restores `|balance_factor| <= 1` for a node whose children are balanced
/// and differ in height by at most 2.
pub(crate) fn rebalance<K, V>(node: Node<K, V>) -> Node<K, V>
where
    K: Clone,
    V: Clone,
{
    let balance = node.balance_factor();
    if balance > 1 {
        let right_balance = node.right().map_or(0, Node::balance_factor);
        if right_balance >= 0 {
            rotate_left(node)
        } else {
            rotate_right_left(node)
        }
    } else if balance < -1 {
        let left_balance = node.left().map_or(0, Node::balance_factor);
        if left_balance <= 0 {
            rotate_right(node)
        } else {
            rotate_left_right(node)
        }
    } else {
        node
    }
}

/// Lifts the right child above `node`.
fn rotate_left<K, V>(node: Node<K, V>) -> Node<K, V>
where
    K: Clone,
    V: Clone,
{
    let Node {
        key,
        value,
        left,
        right,
        ..
    } = node;

    match right {
        Some(pivot) => {
            let lowered = Node::new(key, value, left, pivot.left.clone());
            Node::new(
                pivot.key.clone(),
                pivot.value.clone(),
                Some(ReferenceCounter::new(lowered)),
                pivot.right.clone(),
            )
        }
        None => Node::new(key, value, left, None),
    }
}

/// Lifts the left child above `node`.
fn rotate_right<K, V>(node: Node<K, V>) -> Node<K, V>
where
    K: Clone,
    V: Clone,
{
    let Node {
        key,
        value,
        left,
        right,
        ..
    } = node;

    match left {
        Some(pivot) => {
            let lowered = Node::new(key, value, pivot.right.clone(), right);
            Node::new(
                pivot.key.clone(),
                pivot.value.clone(),
                pivot.left.clone(),
                Some(ReferenceCounter::new(lowered)),
            )
        }
        None => Node::new(key, value, None, right),
    }
}

/// Lifts the left child of the right child above `node`.
///
/// Equivalent to a right rotation of the right child followed by a left
/// rotation of `node`, building only the three nodes on the rotation axis.
fn rotate_right_left<K, V>(node: Node<K, V>) -> Node<K, V>
where
    K: Clone,
    V: Clone,
{
    let Some(right) = node.right.clone() else {
        return node;
    };
    let Some(pivot) = right.left.clone() else {
        return rotate_left(node);
    };

    let lowered_left = Node::new(node.key, node.value, node.left, pivot.left.clone());
    let lowered_right = Node::new(
        right.key.clone(),
        right.value.clone(),
        pivot.right.clone(),
        right.right.clone(),
    );
    Node::new(
        pivot.key.clone(),
        pivot.value.clone(),
        Some(ReferenceCounter::new(lowered_left)),
        Some(ReferenceCounter::new(lowered_right)),
    )
}

/// Lifts the right child of the left child above `node`.
///
/// Mirror image of [`rotate_right_left`].
fn rotate_left_right<K, V>(node: Node<K, V>) -> Node<K, V>
where
    K: Clone,
    V: Clone,
{
    let Some(left) = node.left.clone() else {
        return node;
    };
    let Some(pivot) = left.right.clone() else {
        return rotate_right(node);
    };

    let lowered_left = Node::new(
        left.key.clone(),
        left.value.clone(),
        left.left.clone(),
        pivot.left.clone(),
    );
    let lowered_right = Node::new(node.key, node.value, pivot.right.clone(), node.right);
    Node::new(
        pivot.key.clone(),
        pivot.value.clone(),
        Some(ReferenceCounter::new(lowered_left)),
        Some(ReferenceCounter::new(lowered_right)),
    )
}

// =============================================================================
// Tests
// =============================================================================
