//! Error types reported by the catalog service.

use thiserror::Error;
use vcat_types::{CommitHash, ContentKey};

/// Errors a [`CatalogApi`](crate::CatalogApi) implementation can report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No reference with this name exists.
    #[error("reference not found: {name}")]
    ReferenceNotFound { name: String },

    /// A reference with this name already exists.
    #[error("reference already exists: {name}")]
    ReferenceAlreadyExists { name: String },

    /// The hash is unknown, or not reachable from the named reference.
    #[error("commit {hash} is not reachable from reference '{name}'")]
    HashNotFound { name: String, hash: CommitHash },

    /// The branch head is not the hash the caller expected.
    #[error("reference '{name}' has moved: expected {expected}, head is {actual}")]
    Conflict {
        name: String,
        expected: CommitHash,
        actual: CommitHash,
    },

    /// A delete operation named a key with no content.
    #[error("no content at key '{key}'")]
    ContentNotFound { key: ContentKey },

    /// The reference name does not follow naming rules.
    #[error("invalid reference name: {name}: {reason}")]
    InvalidReferenceName { name: String, reason: String },

    /// The default branch cannot be deleted.
    #[error("cannot delete the default branch: {name}")]
    CannotDeleteDefaultBranch { name: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns `true` if the service reported the reference itself missing.
    pub fn is_reference_not_found(&self) -> bool {
        matches!(self, ApiError::ReferenceNotFound { .. })
    }
}

/// Convenience type alias for catalog service operations.
pub type Result<T> = std::result::Result<T, ApiError>;
