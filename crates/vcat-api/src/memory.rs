//! In-memory catalog service for testing and embedding.
//!
//! [`InMemoryCatalog`] keeps branches, the commit graph, and a full content
//! snapshot per commit behind a `RwLock`. It implements the full
//! [`CatalogApi`] trait and is suitable for unit tests and short-lived
//! processes.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};
use vcat_types::{CommitHash, Content, ContentKey, Namespace, Operation, Reference, DEFAULT_BRANCH};

use crate::error::{ApiError, Result};
use crate::names::validate_reference_name;
use crate::traits::CatalogApi;

type Snapshot = Arc<BTreeMap<ContentKey, Content>>;

#[derive(Debug)]
struct CommitRecord {
    parent: Option<CommitHash>,
    entries: Snapshot,
}

#[derive(Debug)]
struct CatalogState {
    branches: BTreeMap<String, CommitHash>,
    commits: HashMap<CommitHash, CommitRecord>,
}

impl CatalogState {
    fn head(&self, name: &str) -> Result<CommitHash> {
        self.branches
            .get(name)
            .copied()
            .ok_or_else(|| ApiError::ReferenceNotFound {
                name: name.to_string(),
            })
    }

    /// Resolve a read reference to the snapshot it denotes.
    fn snapshot(&self, reference: &Reference) -> Result<Snapshot> {
        let head = self.head(reference.name())?;
        let target = match reference.hash() {
            None => head,
            Some(hash) => {
                if !self.is_reachable(&head, hash) {
                    return Err(ApiError::HashNotFound {
                        name: reference.name().to_string(),
                        hash: *hash,
                    });
                }
                *hash
            }
        };
        self.record(&target).map(|r| Arc::clone(&r.entries))
    }

    fn record(&self, hash: &CommitHash) -> Result<&CommitRecord> {
        self.commits
            .get(hash)
            .ok_or_else(|| ApiError::Internal(format!("dangling commit {hash}")))
    }

    /// Walk first parents from `from` looking for `target`.
    fn is_reachable(&self, from: &CommitHash, target: &CommitHash) -> bool {
        let mut cursor = Some(*from);
        while let Some(hash) = cursor {
            if &hash == target {
                return true;
            }
            cursor = self.commits.get(&hash).and_then(|r| r.parent);
        }
        false
    }
}

/// An in-memory implementation of [`CatalogApi`].
///
/// A fresh catalog has one branch, the default branch, pointing at the empty
/// root commit. Data is lost when the catalog is dropped.
#[derive(Debug)]
pub struct InMemoryCatalog {
    default_branch: String,
    state: RwLock<CatalogState>,
}

impl InMemoryCatalog {
    /// Create a catalog whose default branch is `main`.
    pub fn new() -> Self {
        Self::with_default_branch(DEFAULT_BRANCH)
    }

    /// Create a catalog with a custom default branch name.
    pub fn with_default_branch(name: impl Into<String>) -> Self {
        let default_branch = name.into();
        let root = CommitHash::no_ancestor();
        let mut commits = HashMap::new();
        commits.insert(
            root,
            CommitRecord {
                parent: None,
                entries: Arc::new(BTreeMap::new()),
            },
        );
        let mut branches = BTreeMap::new();
        branches.insert(default_branch.clone(), root);
        Self {
            default_branch,
            state: RwLock::new(CatalogState { branches, commits }),
        }
    }

    /// The branch that cannot be deleted.
    pub fn default_branch(&self) -> &str {
        &self.default_branch
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, CatalogState>> {
        self.state
            .read()
            .map_err(|e| ApiError::Internal(format!("lock poisoned: {e}")))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, CatalogState>> {
        self.state
            .write()
            .map_err(|e| ApiError::Internal(format!("lock poisoned: {e}")))
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogApi for InMemoryCatalog {
    fn get_reference(&self, name: &str) -> Result<Reference> {
        let state = self.read_state()?;
        let head = state.head(name)?;
        Ok(Reference::new(name, Some(head)))
    }

    fn list_references(&self) -> Result<Vec<Reference>> {
        let state = self.read_state()?;
        Ok(state
            .branches
            .iter()
            .map(|(name, hash)| Reference::new(name.clone(), Some(*hash)))
            .collect())
    }

    fn create_branch(&self, name: &str, source: Option<&Reference>) -> Result<Reference> {
        validate_reference_name(name)?;

        let mut state = self.write_state()?;
        if state.branches.contains_key(name) {
            return Err(ApiError::ReferenceAlreadyExists {
                name: name.to_string(),
            });
        }

        let start = match source {
            None => CommitHash::no_ancestor(),
            Some(src) => {
                let head = state.head(src.name())?;
                match src.hash() {
                    None => head,
                    Some(hash) if state.is_reachable(&head, hash) => *hash,
                    Some(hash) => {
                        return Err(ApiError::HashNotFound {
                            name: src.name().to_string(),
                            hash: *hash,
                        })
                    }
                }
            }
        };

        state.branches.insert(name.to_string(), start);
        info!(branch = name, hash = %start.short_hex(), "branch created");
        Ok(Reference::new(name, Some(start)))
    }

    fn delete_branch(&self, name: &str, expected: &CommitHash) -> Result<()> {
        if name == self.default_branch {
            return Err(ApiError::CannotDeleteDefaultBranch {
                name: name.to_string(),
            });
        }

        let mut state = self.write_state()?;
        let head = state.head(name)?;
        if &head != expected {
            return Err(ApiError::Conflict {
                name: name.to_string(),
                expected: *expected,
                actual: head,
            });
        }
        state.branches.remove(name);
        info!(branch = name, "branch deleted");
        Ok(())
    }

    fn list_entries(
        &self,
        reference: &Reference,
        prefix: Option<&Namespace>,
    ) -> Result<Vec<(ContentKey, Content)>> {
        let state = self.read_state()?;
        let snapshot = state.snapshot(reference)?;
        Ok(snapshot
            .iter()
            .filter(|(key, _)| match prefix {
                Some(p) => key.elements().starts_with(p.elements()),
                None => true,
            })
            .map(|(key, content)| (key.clone(), content.clone()))
            .collect())
    }

    fn get_content(
        &self,
        reference: &Reference,
        keys: &[ContentKey],
    ) -> Result<BTreeMap<ContentKey, Content>> {
        let state = self.read_state()?;
        let snapshot = state.snapshot(reference)?;
        Ok(keys
            .iter()
            .filter_map(|key| snapshot.get(key).map(|c| (key.clone(), c.clone())))
            .collect())
    }

    fn commit(
        &self,
        branch: &str,
        expected: &CommitHash,
        message: &str,
        operations: &[Operation],
    ) -> Result<Reference> {
        let mut state = self.write_state()?;
        let head = state.head(branch)?;
        if &head != expected {
            return Err(ApiError::Conflict {
                name: branch.to_string(),
                expected: *expected,
                actual: head,
            });
        }

        let mut entries = (*state.record(&head)?.entries).clone();
        for op in operations {
            match op {
                Operation::Put { key, content } => {
                    entries.insert(key.clone(), content.clone());
                }
                Operation::Delete { key } => {
                    if entries.remove(key).is_none() {
                        return Err(ApiError::ContentNotFound { key: key.clone() });
                    }
                }
            }
        }

        let payload = serde_json::to_vec(&(message, operations))
            .map_err(|e| ApiError::Internal(format!("commit encoding failed: {e}")))?;
        let hash = CommitHash::derive(Some(&head), &payload);

        state.commits.entry(hash).or_insert_with(|| CommitRecord {
            parent: Some(head),
            entries: Arc::new(entries),
        });
        state.branches.insert(branch.to_string(), hash);
        debug!(
            branch,
            parent = %head.short_hex(),
            hash = %hash.short_hex(),
            operations = operations.len(),
            "commit applied"
        );
        Ok(Reference::new(branch, Some(hash)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(path: &str) -> ContentKey {
        ContentKey::parse(path).unwrap()
    }

    fn put_namespace(path: &str) -> Operation {
        Operation::Put {
            key: key(path),
            content: Content::namespace(),
        }
    }

    fn head(catalog: &InMemoryCatalog, name: &str) -> CommitHash {
        *catalog.get_reference(name).unwrap().hash().unwrap()
    }

    #[test]
    fn fresh_catalog_has_default_branch() {
        let catalog = InMemoryCatalog::new();
        assert_eq!(catalog.default_branch(), "main");
        let main = catalog.get_reference("main").unwrap();
        assert_eq!(main.hash(), Some(&CommitHash::no_ancestor()));
        assert_eq!(catalog.list_references().unwrap().len(), 1);
    }

    #[test]
    fn missing_reference_is_not_found() {
        let catalog = InMemoryCatalog::new();
        let err = catalog.get_reference("nope").unwrap_err();
        assert!(err.is_reference_not_found());
        let err = catalog
            .list_entries(&Reference::at_tip("nope"), None)
            .unwrap_err();
        assert!(err.is_reference_not_found());
    }

    #[test]
    fn commit_advances_branch() {
        let catalog = InMemoryCatalog::new();
        let before = head(&catalog, "main");
        let after = catalog
            .commit("main", &before, "create a", &[put_namespace("a")])
            .unwrap();
        assert_ne!(after.hash(), Some(&before));
        assert_eq!(catalog.get_reference("main").unwrap(), after);

        let entries = catalog.list_entries(&Reference::at_tip("main"), None).unwrap();
        assert_eq!(entries, vec![(key("a"), Content::namespace())]);
    }

    #[test]
    fn commit_on_stale_head_conflicts() {
        let catalog = InMemoryCatalog::new();
        let root = head(&catalog, "main");
        catalog
            .commit("main", &root, "first", &[put_namespace("a")])
            .unwrap();
        let err = catalog
            .commit("main", &root, "second", &[put_namespace("b")])
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict { .. }), "got: {err}");
    }

    #[test]
    fn reads_at_older_hash_see_older_state() {
        let catalog = InMemoryCatalog::new();
        let root = head(&catalog, "main");
        catalog
            .commit("main", &root, "create a", &[put_namespace("a")])
            .unwrap();

        let old = Reference::new("main", Some(root));
        assert!(catalog.list_entries(&old, None).unwrap().is_empty());
        assert_eq!(
            catalog.list_entries(&Reference::at_tip("main"), None).unwrap().len(),
            1
        );
    }

    #[test]
    fn unreachable_hash_is_rejected() {
        let catalog = InMemoryCatalog::new();
        catalog.create_branch("dev", None).unwrap();
        let root = head(&catalog, "dev");
        let dev_tip = catalog
            .commit("dev", &root, "dev only", &[put_namespace("d")])
            .unwrap();

        let foreign = Reference::new("main", dev_tip.hash().copied());
        let err = catalog.list_entries(&foreign, None).unwrap_err();
        assert!(matches!(err, ApiError::HashNotFound { .. }), "got: {err}");
    }

    #[test]
    fn prefix_filter_is_segment_wise() {
        let catalog = InMemoryCatalog::new();
        let root = head(&catalog, "main");
        catalog
            .commit(
                "main",
                &root,
                "setup",
                &[put_namespace("a"), put_namespace("a.b"), put_namespace("ab")],
            )
            .unwrap();
        let prefix = Namespace::parse("a").unwrap();
        let namespaces = catalog
            .list_namespaces(&Reference::at_tip("main"), Some(&prefix))
            .unwrap();
        assert_eq!(
            namespaces,
            vec![Namespace::parse("a").unwrap(), Namespace::parse("a.b").unwrap()]
        );
    }

    #[test]
    fn get_content_returns_only_present_keys() {
        let catalog = InMemoryCatalog::new();
        let root = head(&catalog, "main");
        catalog
            .commit("main", &root, "setup", &[put_namespace("a")])
            .unwrap();
        let found = catalog
            .get_content(&Reference::at_tip("main"), &[key("a"), key("b")])
            .unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[&key("a")].is_namespace());
    }

    #[test]
    fn delete_missing_key_fails_without_committing() {
        let catalog = InMemoryCatalog::new();
        let root = head(&catalog, "main");
        let err = catalog
            .commit("main", &root, "drop", &[Operation::Delete { key: key("x") }])
            .unwrap_err();
        assert!(matches!(err, ApiError::ContentNotFound { .. }));
        assert_eq!(head(&catalog, "main"), root);
    }

    #[test]
    fn create_branch_from_source() {
        let catalog = InMemoryCatalog::new();
        let root = head(&catalog, "main");
        let tip = catalog
            .commit("main", &root, "a", &[put_namespace("a")])
            .unwrap();

        let from_tip = catalog
            .create_branch("from-tip", Some(&Reference::at_tip("main")))
            .unwrap();
        assert_eq!(from_tip.hash(), tip.hash());

        let from_root = catalog
            .create_branch("from-root", Some(&Reference::new("main", Some(root))))
            .unwrap();
        assert_eq!(from_root.hash(), Some(&root));
    }

    #[test]
    fn create_duplicate_or_invalid_branch_fails() {
        let catalog = InMemoryCatalog::new();
        let err = catalog.create_branch("main", None).unwrap_err();
        assert!(matches!(err, ApiError::ReferenceAlreadyExists { .. }));
        let err = catalog.create_branch("bad..name", None).unwrap_err();
        assert!(matches!(err, ApiError::InvalidReferenceName { .. }));
    }

    #[test]
    fn delete_branch_checks_head_and_default() {
        let catalog = InMemoryCatalog::new();
        let dev = catalog.create_branch("dev", None).unwrap();
        let dev_head = *dev.hash().unwrap();
        catalog
            .commit("dev", &dev_head, "move", &[put_namespace("x")])
            .unwrap();

        let err = catalog.delete_branch("dev", &dev_head).unwrap_err();
        assert!(matches!(err, ApiError::Conflict { .. }));

        catalog.delete_branch("dev", &head(&catalog, "dev")).unwrap();
        assert!(catalog.get_reference("dev").unwrap_err().is_reference_not_found());

        let err = catalog.delete_branch("main", &head(&catalog, "main")).unwrap_err();
        assert!(matches!(err, ApiError::CannotDeleteDefaultBranch { .. }));
    }

    #[test]
    fn recreated_branch_starts_over() {
        let catalog = InMemoryCatalog::new();
        let dev = catalog.create_branch("dev", None).unwrap();
        let moved = catalog
            .commit("dev", dev.hash().unwrap(), "a", &[put_namespace("a")])
            .unwrap();
        catalog.delete_branch("dev", moved.hash().unwrap()).unwrap();
        let again = catalog.create_branch("dev", None).unwrap();
        assert_ne!(again.hash(), moved.hash());
        assert!(catalog
            .list_entries(&Reference::at_tip("dev"), None)
            .unwrap()
            .is_empty());
    }
}
