//! Error types for reachplot-core.

use thiserror::Error;

/// Errors that can occur while building a cluster order or extracting
/// clusters from one.
///
/// These cover recoverable configuration problems only. Precondition
/// violations inside an already-validated run (such as appending the same
/// id to a [`ClusterOrder`](crate::order::ClusterOrder) twice) are caller
/// bugs and abort via `assert!` instead of surfacing here.
#[derive(Debug, Error)]
pub enum OpticsError {
    /// Invalid parameter provided.
    #[error("Invalid parameter: {message}")]
    InvalidParameter {
        /// Description of what's wrong with the parameter
        message: String,
    },

    /// The dataset handed to a clusterer contains no ids.
    #[error("Empty dataset: at least one object id is required")]
    EmptyDataset,

    /// Point dimension doesn't match the rest of the dataset.
    #[error("Dimension mismatch: expected {expected}, actual {actual}")]
    DimensionMismatch {
        /// Dimension established by the first point
        expected: usize,
        /// Dimension of the offending point
        actual: usize,
    },
}

impl OpticsError {
    /// Create an InvalidParameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }
}

/// Result type alias for reachplot-core operations.
pub type OpticsResult<T> = Result<T, OpticsError>;
