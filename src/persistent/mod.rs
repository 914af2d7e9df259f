//! Persistent (immutable) ordered collections.
//!
//! This module provides an AVL tree with path copying and an ordered set
//! built on it:
//!
//! - [`PersistentAvlTree`]: ordered key/value map
//! - [`PersistentAvlSet`]: ordered set of keys
//! - [`PersistentAvlTreeCursor`]: owning forward cursor that outlives its tree
//!
//! # Structural Sharing
//!
//! Every update returns a new version and leaves the previous one intact.
//! Nodes are never modified after construction, so versions share every
//! subtree the update did not touch.
//!
//! # Examples
//!
//! ## `PersistentAvlTree`
//!
//! ```rust
//! use persistent_avl::persistent::PersistentAvlTree;
//!
//! let tree = PersistentAvlTree::new()
//!     .insert("one".to_string(), 1)
//!     .insert("two".to_string(), 2);
//! assert_eq!(tree.get("one"), Some(&1));
//!
//! // Structural sharing: the original tree is preserved
//! let updated = tree.insert("one".to_string(), 100);
//! assert_eq!(tree.get("one"), Some(&1));       // Original unchanged
//! assert_eq!(updated.get("one"), Some(&100)); // New version
//! ```
//!
//! ## `PersistentAvlSet`
//!
//! ```rust
//! use persistent_avl::persistent::PersistentAvlSet;
//!
//! let set: PersistentAvlSet<i32> = [5, 1, 9].into_iter().collect();
//! assert_eq!(set.ceiling(&2), Some(&5));
//!
//! let updated = set.insert(2);
//! assert_eq!(set.len(), 3);      // Original unchanged
//! assert_eq!(updated.len(), 4);  // New version
//! ```
//!
//! # Thread Safety
//!
//! With the `arc` feature, nodes are shared through `Arc` and every type in
//! this module is `Send + Sync` for `Send + Sync` keys and values. The
//! default build uses `Rc`.

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod cursor;
mod error;
mod node;
mod set;
mod tree;

pub use cursor::PersistentAvlTreeCursor;
pub use cursor::PersistentAvlTreeIntoIterator;
pub use cursor::PersistentAvlTreeIterator;
pub use error::InvariantViolation;
pub use node::Node;
pub use set::PersistentAvlSet;
pub use set::PersistentAvlSetIntoIterator;
pub use set::PersistentAvlSetIterator;
pub use tree::PersistentAvlTree;

// =============================================================================
// Tests
// =============================================================================
