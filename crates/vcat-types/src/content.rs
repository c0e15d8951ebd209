//! Content stored under keys and the operations that change it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::key::ContentKey;

/// A value stored under a [`ContentKey`] in a commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Content {
    /// An explicitly created namespace and its properties.
    Namespace { properties: BTreeMap<String, String> },
    /// A table, tracked by the location of its current metadata file.
    Table { metadata_location: String },
}

impl Content {
    /// A namespace with no properties.
    pub fn namespace() -> Self {
        Content::Namespace {
            properties: BTreeMap::new(),
        }
    }

    pub fn is_namespace(&self) -> bool {
        matches!(self, Content::Namespace { .. })
    }

    pub fn is_table(&self) -> bool {
        matches!(self, Content::Table { .. })
    }
}

/// A single change applied by a commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Create or replace the content at `key`.
    Put { key: ContentKey, content: Content },
    /// Remove the content at `key`.
    Delete { key: ContentKey },
}

impl Operation {
    pub fn key(&self) -> &ContentKey {
        match self {
            Operation::Put { key, .. } => key,
            Operation::Delete { key } => key,
        }
    }
}
