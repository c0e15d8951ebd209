//! Named references into the commit log.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hash::CommitHash;

/// Name of the branch a catalog starts with and clients default to.
pub const DEFAULT_BRANCH: &str = "main";

/// A branch: a named, mutable pointer to a commit.
///
/// A `Reference` returned by the service always carries the hash the branch
/// pointed at when it was read. Requests built by callers may leave the hash
/// out to mean "the current tip".
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    name: String,
    hash: Option<CommitHash>,
}

impl Reference {
    pub fn new(name: impl Into<String>, hash: Option<CommitHash>) -> Self {
        Self {
            name: name.into(),
            hash,
        }
    }

    /// A reference to the tip of `name`, whatever it is.
    pub fn at_tip(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hash(&self) -> Option<&CommitHash> {
        self.hash.as_ref()
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.hash {
            Some(h) => write!(f, "{}@{}", self.name, h.short_hex()),
            None => write!(f, "{}", self.name),
        }
    }
}
