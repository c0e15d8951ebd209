//! Catalog service boundary for vcat.
//!
//! The client layer talks to a branch/commit-versioned catalog exclusively
//! through the [`CatalogApi`] trait. A network transport implements it for a
//! remote service; [`InMemoryCatalog`] implements it in-process for tests and
//! embedding.
//!
//! # Modules
//!
//! - [`error`] — [`ApiError`] reported by catalog services
//! - [`traits`] — The [`CatalogApi`] trait
//! - [`names`] — Reference name validation
//! - [`memory`] — In-memory [`InMemoryCatalog`]

pub mod error;
pub mod memory;
pub mod names;
pub mod traits;

pub use error::{ApiError, Result};
pub use memory::InMemoryCatalog;
pub use names::validate_reference_name;
pub use traits::CatalogApi;
