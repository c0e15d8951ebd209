//! The [`CatalogApi`] trait defining the catalog service interface.
//!
//! A remote transport (HTTP or otherwise) implements this trait to expose a
//! versioned catalog to the client. [`InMemoryCatalog`](crate::InMemoryCatalog)
//! implements it in-process.

use std::collections::BTreeMap;

use vcat_types::{CommitHash, Content, ContentKey, Namespace, Operation, Reference};

use crate::error::Result;

/// Request/response surface of a branch/commit-versioned catalog.
///
/// Implementations must be thread-safe (`Send + Sync`). Every call is a
/// synchronous exchange; timeouts and retries belong to the transport.
///
/// Reads take a [`Reference`]: a reference without a hash reads at the
/// current tip of the named branch, a reference with a hash reads at that
/// commit, which must be reachable from the branch. Either way the service
/// reports [`ApiError::ReferenceNotFound`](crate::ApiError::ReferenceNotFound)
/// when the branch name does not exist.
pub trait CatalogApi: Send + Sync {
    /// Read a branch and its current head hash.
    fn get_reference(&self, name: &str) -> Result<Reference>;

    /// List every branch with its current head hash, sorted by name.
    fn list_references(&self) -> Result<Vec<Reference>>;

    /// Create a branch.
    ///
    /// With `source` the branch starts at the source's hash (or its tip when
    /// the hash is absent); without, it starts at the empty root commit.
    fn create_branch(&self, name: &str, source: Option<&Reference>) -> Result<Reference>;

    /// Delete a branch whose head is still `expected`.
    fn delete_branch(&self, name: &str, expected: &CommitHash) -> Result<()>;

    /// List entries visible at `reference`.
    ///
    /// With `prefix`, only keys whose elements start with the prefix's
    /// elements are returned (the namespace key itself included). Results
    /// are sorted by key.
    fn list_entries(
        &self,
        reference: &Reference,
        prefix: Option<&Namespace>,
    ) -> Result<Vec<(ContentKey, Content)>>;

    /// Apply `operations` atomically as one commit on top of `expected`.
    ///
    /// Returns the branch at its new head.
    fn commit(
        &self,
        branch: &str,
        expected: &CommitHash,
        message: &str,
        operations: &[Operation],
    ) -> Result<Reference>;

    /// Fetch content for specific keys. Missing keys are absent from the map.
    fn get_content(
        &self,
        reference: &Reference,
        keys: &[ContentKey],
    ) -> Result<BTreeMap<ContentKey, Content>> {
        let entries = self.list_entries(reference, None)?;
        Ok(entries
            .into_iter()
            .filter(|(key, _)| keys.contains(key))
            .collect())
    }

    /// Namespaces explicitly stored at `reference` under `prefix`.
    fn list_namespaces(
        &self,
        reference: &Reference,
        prefix: Option<&Namespace>,
    ) -> Result<Vec<Namespace>> {
        let entries = self.list_entries(reference, prefix)?;
        Ok(entries
            .into_iter()
            .filter(|(_, content)| content.is_namespace())
            .map(|(key, _)| key.as_namespace())
            .collect())
    }
}
