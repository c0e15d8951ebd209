//! Foundation types for vcat, a reference-tracking client for a
//! branch/commit-versioned catalog.
//!
//! # Key Types
//!
//! - [`CommitHash`] — Opaque commit identifier (BLAKE3, hex rendered)
//! - [`Namespace`] — Ordered namespace path (`a.b.c`)
//! - [`ContentKey`] — Namespace plus leaf name (`a.b.c.Table`)
//! - [`Reference`] — Named branch, optionally pinned at a hash
//! - [`Content`] / [`Operation`] — What keys hold and how commits change them

pub mod content;
pub mod error;
pub mod hash;
pub mod key;
pub mod reference;

pub use content::{Content, Operation};
pub use error::TypeError;
pub use hash::CommitHash;
pub use key::{ContentKey, Namespace};
pub use reference::{Reference, DEFAULT_BRANCH};
