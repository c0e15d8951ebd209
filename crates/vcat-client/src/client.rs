//! The reference-tracking client.
//!
//! A [`CatalogClient`] is pinned to one branch at one commit hash. It never
//! moves: re-pinning with [`CatalogClient::with_reference`] or
//! [`CatalogClient::refresh`] hands back either the same `Arc` or a brand-new
//! client, and any clone of the old `Arc` keeps its snapshot.
//!
//! Clients compare by identity. Two clients pinned to the same branch and
//! hash are still different clients unless they are the same allocation.

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::debug;
use vcat_api::{ApiError, CatalogApi};
use vcat_types::{CommitHash, Reference, DEFAULT_BRANCH};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// How the hash of a [`ResolvedReference`] came to be known.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provenance {
    /// The service confirmed the branch exists. The hash is its head at that
    /// time unless one was requested explicitly.
    Validated,
    /// The caller supplied the hash and it has not been checked.
    Trusted,
}

/// A branch name and commit hash the client is pinned to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedReference {
    name: String,
    hash: CommitHash,
    provenance: Provenance,
}

impl ResolvedReference {
    pub fn new(name: impl Into<String>, hash: CommitHash, provenance: Provenance) -> Self {
        Self {
            name: name.into(),
            hash,
            provenance,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hash(&self) -> &CommitHash {
        &self.hash
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// The pin as a service read reference.
    pub fn to_reference(&self) -> Reference {
        Reference::new(self.name.clone(), Some(self.hash))
    }
}

impl fmt::Display for ResolvedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.hash.short_hex())
    }
}

/// Client pinned to a reference of a versioned catalog.
///
/// Construction with [`CatalogClient::new`] does not contact the service: the
/// pin is resolved on first use and frozen from then on. Use
/// [`CatalogClient::connect`] to resolve eagerly.
pub struct CatalogClient {
    pub(crate) api: Arc<dyn CatalogApi>,
    name: String,
    pin: OnceLock<ResolvedReference>,
    pub(crate) config: Arc<ClientConfig>,
}

impl CatalogClient {
    /// Create a client for `name` (default `main`) at `hash`.
    ///
    /// A supplied hash is trusted as-is. Without one, the current head of the
    /// branch is fetched the first time the client needs it.
    pub fn new(
        api: Arc<dyn CatalogApi>,
        name: Option<&str>,
        hash: Option<CommitHash>,
        config: ClientConfig,
    ) -> Arc<Self> {
        let name = name.unwrap_or(DEFAULT_BRANCH).to_string();
        let pin = OnceLock::new();
        if let Some(hash) = hash {
            let _ = pin.set(ResolvedReference::new(name.clone(), hash, Provenance::Trusted));
        }
        Arc::new(Self {
            api,
            name,
            pin,
            config: Arc::new(config),
        })
    }

    /// Create a client and resolve its reference immediately.
    ///
    /// Fails with [`ClientError::ReferenceNotFound`] if the branch does not
    /// exist.
    pub fn connect(
        api: Arc<dyn CatalogApi>,
        name: Option<&str>,
        hash: Option<CommitHash>,
        config: ClientConfig,
    ) -> Result<Arc<Self>> {
        let name = name.unwrap_or(DEFAULT_BRANCH);
        let resolved = resolve(api.as_ref(), name, hash)?;
        Ok(Self::pinned(api, resolved, Arc::new(config)))
    }

    pub(crate) fn pinned(
        api: Arc<dyn CatalogApi>,
        resolved: ResolvedReference,
        config: Arc<ClientConfig>,
    ) -> Arc<Self> {
        let pin = OnceLock::new();
        let name = resolved.name.clone();
        let _ = pin.set(resolved);
        Arc::new(Self {
            api,
            name,
            pin,
            config,
        })
    }

    /// Name of the branch this client is pinned to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The pinned reference, resolving it on first use.
    pub fn reference(&self) -> Result<&ResolvedReference> {
        if let Some(pin) = self.pin.get() {
            return Ok(pin);
        }
        let resolved = resolve(self.api.as_ref(), &self.name, None)?;
        // Concurrent first uses may both resolve; the first one stored wins.
        Ok(self.pin.get_or_init(|| resolved))
    }

    /// The catalog service this client talks to.
    pub fn api(&self) -> &Arc<dyn CatalogApi> {
        &self.api
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Re-pin to another reference.
    ///
    /// - With neither `name` nor `hash`, returns this same client.
    /// - With a `hash` equal to the pinned hash of the same branch (`name`
    ///   absent or equal to the current name), returns this same client.
    /// - Otherwise resolves against the service and returns a new client,
    ///   even when the result matches the current pin. With a hash, the
    ///   branch is confirmed to exist and the hash is pinned as given.
    ///
    /// Fails with [`ClientError::ReferenceNotFound`] if the branch does not
    /// exist.
    pub fn with_reference(
        self: &Arc<Self>,
        name: Option<&str>,
        hash: Option<CommitHash>,
    ) -> Result<Arc<Self>> {
        if name.is_none() && hash.is_none() {
            return Ok(Arc::clone(self));
        }

        let target = name.unwrap_or(self.name.as_str());
        if let Some(requested) = hash.as_ref() {
            if target == self.name && self.reference()?.hash() == requested {
                return Ok(Arc::clone(self));
            }
        }

        // Validated means the branch was confirmed; a supplied hash is not checked.
        let resolved = resolve(self.api.as_ref(), target, hash)?;
        debug!(reference = %resolved, "re-pinned client");
        Ok(Self::pinned(
            Arc::clone(&self.api),
            resolved,
            Arc::clone(&self.config),
        ))
    }

    /// Re-resolve the current branch. Always returns a new client.
    pub fn refresh(self: &Arc<Self>) -> Result<Arc<Self>> {
        self.with_reference(Some(self.name()), None)
    }

    /// Map a service failure to the caller-facing error for `subject`.
    ///
    /// A vanished branch is stale when the pin had been confirmed by the
    /// service, and not-found when it never was.
    pub(crate) fn reference_error(
        &self,
        pin: &ResolvedReference,
        subject: &dyn fmt::Display,
        err: ApiError,
    ) -> ClientError {
        if !err.is_reference_not_found() {
            return ClientError::Api(err);
        }
        match pin.provenance {
            Provenance::Validated => ClientError::StaleReference {
                key: subject.to_string(),
                reference: pin.name.clone(),
            },
            Provenance::Trusted => ClientError::ReferenceNotFound {
                reference: pin.name.clone(),
            },
        }
    }
}

impl PartialEq for CatalogClient {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for CatalogClient {}

impl fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogClient")
            .field("name", &self.name)
            .field("pin", &self.pin.get())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Look up `name` on the service and pin it at `hash` or at its head.
fn resolve(
    api: &dyn CatalogApi,
    name: &str,
    hash: Option<CommitHash>,
) -> Result<ResolvedReference> {
    let current = api.get_reference(name).map_err(|e| {
        if e.is_reference_not_found() {
            ClientError::ReferenceNotFound {
                reference: name.to_string(),
            }
        } else {
            ClientError::Api(e)
        }
    })?;

    let hash = match hash {
        Some(h) => h,
        None => *current.hash().ok_or_else(|| {
            ApiError::Internal(format!("service returned reference '{name}' without a hash"))
        })?,
    };
    debug!(reference = name, hash = %hash.short_hex(), "resolved reference");
    Ok(ResolvedReference::new(name, hash, Provenance::Validated))
}
