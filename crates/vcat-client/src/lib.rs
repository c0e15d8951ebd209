//! Reference-tracking client for a branch/commit-versioned catalog.
//!
//! A [`CatalogClient`] pins a branch at a commit hash and re-pins only by
//! producing new clients, so any client can be shared across threads as a
//! stable snapshot. On top of the pin it computes implied namespaces (the
//! ancestors of a key that neither exist nor are implied by a deeper
//! namespace) and offers namespace and table operations that create those
//! ancestors on write.
//!
//! # Modules
//!
//! - [`client`] — [`CatalogClient`] and the pinned [`ResolvedReference`]
//! - [`implied`] — Implied namespace resolution
//! - [`catalog`] — Namespace and table operations
//! - [`config`] — [`ClientConfig`] parsed from string options
//! - [`registry`] — [`ClientRegistry`] and [`ClientBuilder`]
//! - [`error`] — [`ClientError`]

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod implied;
pub mod registry;

#[cfg(test)]
mod testing;

pub use client::{CatalogClient, Provenance, ResolvedReference};
pub use config::{ClientConfig, CREATE_IMPLIED_NAMESPACES};
pub use error::{ClientError, Result};
pub use implied::missing_ancestors;
pub use registry::{ClientBuilder, ClientRegistry, RegistryBuilder};

// Re-export key types
pub use vcat_api::{ApiError, CatalogApi, InMemoryCatalog};
pub use vcat_types::{CommitHash, Content, ContentKey, Namespace, Reference};
