//! Implied namespace resolution.
//!
//! Writing `a.b.c.Table` requires `a`, `a.b` and `a.b.c` to exist. A
//! namespace exists when it was created explicitly, or when some deeper
//! namespace below it was: creating `x.y.z` alone makes `x` and `x.y` exist
//! too. Only the remaining ancestors are implied and need creating.

use tracing::debug;
use vcat_types::{ContentKey, Namespace};

use crate::client::CatalogClient;
use crate::error::Result;

/// Ancestors of `namespace`, shortest first, not covered by `existing`.
///
/// An ancestor is covered when it is a segment-wise prefix of any existing
/// namespace, itself included.
pub fn missing_ancestors(namespace: &Namespace, existing: &[Namespace]) -> Vec<Namespace> {
    namespace
        .ancestors()
        .into_iter()
        .filter(|ancestor| !existing.iter().any(|e| ancestor.is_prefix_of(e)))
        .collect()
}

impl CatalogClient {
    /// Namespaces that must be created before `key` can be written.
    ///
    /// Returns an empty list without contacting the service when implied
    /// namespaces are disabled or when `key` is top-level. Existence is
    /// queried fresh on every call.
    ///
    /// Fails with [`ClientError::StaleReference`](crate::ClientError::StaleReference)
    /// when the pinned branch has disappeared since it was resolved, and with
    /// [`ClientError::ReferenceNotFound`](crate::ClientError::ReferenceNotFound)
    /// when it never existed.
    pub fn find_implied_namespaces(&self, key: &ContentKey) -> Result<Vec<Namespace>> {
        if !self.config.create_implied_namespaces {
            return Ok(Vec::new());
        }

        let namespace = key.namespace();
        let Some(top) = namespace.top_level() else {
            return Ok(Vec::new());
        };

        let pin = self.reference()?;
        let existing = self
            .api
            .list_namespaces(&pin.to_reference(), Some(&top))
            .map_err(|e| self.reference_error(pin, key, e))?;

        let implied = missing_ancestors(&namespace, &existing);
        debug!(
            %key,
            reference = %pin,
            existing = existing.len(),
            implied = implied.len(),
            "computed implied namespaces"
        );
        Ok(implied)
    }
}
