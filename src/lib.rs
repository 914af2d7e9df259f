//! # persistent-avl
//!
//! Persistent (immutable) ordered collections backed by an AVL tree.
//!
//! ## Overview
//!
//! Every mutation returns a new version of the collection and leaves all
//! previously held versions valid and unchanged. Only the nodes on the path
//! from the root to the modified key are rebuilt; every other subtree is
//! shared between versions.
//!
//! - [`PersistentAvlTree`](persistent::PersistentAvlTree): ordered key/value map
//! - [`PersistentAvlSet`](persistent::PersistentAvlSet): ordered set built on the map
//! - Ceiling/floor queries, ordered iteration and lower-bound seeking cursors
//!
//! ## Feature Flags
//!
//! - `arc`: share nodes through `Arc` instead of `Rc`, making the collections
//!   `Send + Sync`
//! - `serde`: `Serialize`/`Deserialize` support
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use persistent_avl::prelude::*;
//!
//! let tree = PersistentAvlTree::new()
//!     .insert(5, "five")
//!     .insert(1, "one")
//!     .insert(9, "nine");
//!
//! let ceiling = tree.least_upper_bound(&6).map(|node| *node.key());
//! assert_eq!(ceiling, Some(9));
//!
//! let smaller = tree.remove(&5);
//! assert_eq!(tree.len(), 3);
//! assert_eq!(smaller.len(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use persistent_avl::prelude::*;
/// ```
pub mod prelude {
    pub use crate::persistent::*;
}

pub mod persistent;
