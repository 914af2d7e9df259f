//! Errors reported by the structural audit of an AVL tree.
//!
//! None of the map or set operations fail. The only fallible API is
//! [`PersistentAvlTree::validate`](super::PersistentAvlTree::validate), which
//! walks every node and reports the first broken invariant it finds.

use std::fmt;

/// A node that breaks one of the AVL tree invariants.
///
/// `position` is the in-order index of the offending node, i.e. the number of
/// nodes visited before it in ascending traversal.
///
/// # Examples
///
/// ```rust
/// use persistent_avl::persistent::InvariantViolation;
///
/// let error = InvariantViolation::BalanceViolation {
///     position: 3,
///     balance_factor: 2,
/// };
/// assert_eq!(
///     format!("{error}"),
///     "node at position 3 has balance factor 2, expected -1..=1"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A key is not strictly between the keys of its ancestors.
    OrderViolation {
        /// In-order position of the node.
        position: usize,
    },
    /// `height(right) - height(left)` is outside `-1..=1`.
    BalanceViolation {
        /// In-order position of the node.
        position: usize,
        /// The observed balance factor.
        balance_factor: isize,
    },
    /// The cached subtree size does not match the children.
    SizeMismatch {
        /// In-order position of the node.
        position: usize,
        /// Size stored in the node.
        recorded: usize,
        /// `size(left) + size(right) + 1`.
        actual: usize,
    },
    /// The cached height does not match the children.
    HeightMismatch {
        /// In-order position of the node.
        position: usize,
        /// Height stored in the node.
        recorded: usize,
        /// `1 + max(height(left), height(right))`.
        actual: usize,
    },
}

impl InvariantViolation {
    /// Returns the in-order position of the offending node.
    #[must_use]
    pub const fn position(&self) -> usize {
        match self {
            Self::OrderViolation { position }
            | Self::BalanceViolation { position, .. }
            | Self::SizeMismatch { position, .. }
            | Self::HeightMismatch { position, .. } => *position,
        }
    }
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrderViolation { position } => write!(
                formatter,
                "node at position {position} is out of search-tree order"
            ),
            Self::BalanceViolation {
                position,
                balance_factor,
            } => write!(
                formatter,
                "node at position {position} has balance factor {balance_factor}, expected -1..=1"
            ),
            Self::SizeMismatch {
                position,
                recorded,
                actual,
            } => write!(
                formatter,
                "node at position {position} records size {recorded}, children give {actual}"
            ),
            Self::HeightMismatch {
                position,
                recorded,
                actual,
            } => write!(
                formatter,
                "node at position {position} records height {recorded}, children give {actual}"
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(
        InvariantViolation::OrderViolation { position: 0 },
        "node at position 0 is out of search-tree order"
    )]
    #[case(
        InvariantViolation::SizeMismatch { position: 2, recorded: 5, actual: 3 },
        "node at position 2 records size 5, children give 3"
    )]
    #[case(
        InvariantViolation::HeightMismatch { position: 1, recorded: 1, actual: 2 },
        "node at position 1 records height 1, children give 2"
    )]
    fn test_display(#[case] error: InvariantViolation, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    fn test_position() {
        let error = InvariantViolation::BalanceViolation {
            position: 7,
            balance_factor: -2,
        };
        assert_eq!(error.position(), 7);
    }

    #[rstest]
    fn test_is_std_error() {
        let error: Box<dyn std::error::Error> =
            Box::new(InvariantViolation::OrderViolation { position: 4 });
        assert!(error.source().is_none());
    }
}
