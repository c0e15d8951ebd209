//! Namespace paths and content keys.
//!
//! A [`Namespace`] is an ordered list of name segments (`a.b.c`). A
//! [`ContentKey`] is a namespace plus a final leaf name (`a.b.c.Table`). All
//! prefix comparisons are segment-wise: `a.b` is a prefix of `a.b.c` but not
//! of `a.bc`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

fn check_elements(elements: &[String]) -> Result<(), TypeError> {
    for (index, el) in elements.iter().enumerate() {
        if el.is_empty() {
            return Err(TypeError::EmptyElement {
                path: elements.join("."),
                index,
            });
        }
    }
    Ok(())
}

/// An ordered sequence of name segments identifying a namespace.
///
/// The empty namespace denotes the catalog root. It is never stored as
/// content, but it is the namespace part of a top-level key and the parent
/// used to list top-level namespaces.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Namespace {
    elements: Vec<String>,
}

impl Namespace {
    /// Build a namespace from its segments.
    pub fn of<I, S>(elements: I) -> Result<Self, TypeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let elements: Vec<String> = elements.into_iter().map(Into::into).collect();
        check_elements(&elements)?;
        Ok(Self { elements })
    }

    /// Parse a dot-separated namespace path. The empty string is the root.
    pub fn parse(path: &str) -> Result<Self, TypeError> {
        if path.is_empty() {
            return Ok(Self::empty());
        }
        Self::of(path.split('.'))
    }

    /// The root namespace.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.elements.len()
    }

    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    /// The enclosing namespace, or `None` for the root.
    pub fn parent(&self) -> Option<Namespace> {
        if self.elements.is_empty() {
            return None;
        }
        Some(Self {
            elements: self.elements[..self.elements.len() - 1].to_vec(),
        })
    }

    /// Returns `true` if `self` is a segment-wise prefix of `other`.
    ///
    /// Every namespace is a prefix of itself, and the root is a prefix of
    /// every namespace.
    pub fn is_prefix_of(&self, other: &Namespace) -> bool {
        other.elements.starts_with(&self.elements)
    }

    /// Every non-empty prefix of this namespace, shortest first, ending with
    /// the namespace itself. The root has no ancestors.
    pub fn ancestors(&self) -> Vec<Namespace> {
        (1..=self.elements.len())
            .map(|len| Self {
                elements: self.elements[..len].to_vec(),
            })
            .collect()
    }

    /// The namespace consisting of only the first segment.
    pub fn top_level(&self) -> Option<Namespace> {
        self.elements.first().map(|first| Self {
            elements: vec![first.clone()],
        })
    }

    /// The content key under which this namespace itself is stored.
    pub fn to_key(&self) -> Option<ContentKey> {
        if self.elements.is_empty() {
            return None;
        }
        Some(ContentKey {
            elements: self.elements.clone(),
        })
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.elements.join("."))
    }
}

/// A fully qualified key: a (possibly empty) namespace plus a leaf name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentKey {
    elements: Vec<String>,
}

impl ContentKey {
    /// Build a key from its elements; the last element is the leaf name.
    pub fn of<I, S>(elements: I) -> Result<Self, TypeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let elements: Vec<String> = elements.into_iter().map(Into::into).collect();
        if elements.is_empty() {
            return Err(TypeError::EmptyKey);
        }
        check_elements(&elements)?;
        Ok(Self { elements })
    }

    /// Parse a dot-separated key such as `a.b.Table`.
    pub fn parse(path: &str) -> Result<Self, TypeError> {
        if path.is_empty() {
            return Err(TypeError::EmptyKey);
        }
        Self::of(path.split('.'))
    }

    /// Build a key inside `namespace` with the given leaf name.
    pub fn in_namespace(namespace: &Namespace, name: impl Into<String>) -> Result<Self, TypeError> {
        let mut elements = namespace.elements().to_vec();
        elements.push(name.into());
        Self::of(elements)
    }

    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    /// The leaf name.
    pub fn name(&self) -> &str {
        // `of` guarantees at least one element.
        &self.elements[self.elements.len() - 1]
    }

    /// The namespace part of the key; empty for top-level keys.
    pub fn namespace(&self) -> Namespace {
        Namespace {
            elements: self.elements[..self.elements.len() - 1].to_vec(),
        }
    }

    /// Interpret the whole key as a namespace path.
    pub fn as_namespace(&self) -> Namespace {
        Namespace {
            elements: self.elements.clone(),
        }
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.elements.join("."))
    }
}
