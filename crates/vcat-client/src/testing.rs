//! Test helpers shared by the client's unit tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use vcat_api::{CatalogApi, InMemoryCatalog, Result};
use vcat_types::{CommitHash, Content, ContentKey, Namespace, Operation, Reference};

/// An [`InMemoryCatalog`] that counts every call made through [`CatalogApi`].
#[derive(Debug, Default)]
pub(crate) struct CountingCatalog {
    inner: InMemoryCatalog,
    calls: AtomicUsize,
}

impl CountingCatalog {
    pub(crate) fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    /// Commit namespaces straight to the head of `branch`.
    pub(crate) fn create_namespaces(&self, branch: &str, paths: &[&str]) {
        let head = *self.inner.get_reference(branch).unwrap().hash().unwrap();
        let operations: Vec<Operation> = paths
            .iter()
            .map(|p| Operation::Put {
                key: ContentKey::parse(p).unwrap(),
                content: Content::namespace(),
            })
            .collect();
        self.inner
            .commit(branch, &head, "create namespaces", &operations)
            .unwrap();
    }
}

impl CatalogApi for CountingCatalog {
    fn get_reference(&self, name: &str) -> Result<Reference> {
        self.tick();
        self.inner.get_reference(name)
    }

    fn list_references(&self) -> Result<Vec<Reference>> {
        self.tick();
        self.inner.list_references()
    }

    fn create_branch(&self, name: &str, source: Option<&Reference>) -> Result<Reference> {
        self.tick();
        self.inner.create_branch(name, source)
    }

    fn delete_branch(&self, name: &str, expected: &CommitHash) -> Result<()> {
        self.tick();
        self.inner.delete_branch(name, expected)
    }

    fn list_entries(
        &self,
        reference: &Reference,
        prefix: Option<&Namespace>,
    ) -> Result<Vec<(ContentKey, Content)>> {
        self.tick();
        self.inner.list_entries(reference, prefix)
    }

    fn commit(
        &self,
        branch: &str,
        expected: &CommitHash,
        message: &str,
        operations: &[Operation],
    ) -> Result<Reference> {
        self.tick();
        self.inner.commit(branch, expected, message, operations)
    }

    fn get_content(
        &self,
        reference: &Reference,
        keys: &[ContentKey],
    ) -> Result<BTreeMap<ContentKey, Content>> {
        self.tick();
        self.inner.get_content(reference, keys)
    }
}

/// A counting catalog with `name` branched off the empty root.
pub(crate) fn catalog_with_branch(name: &str) -> Arc<CountingCatalog> {
    let api = CountingCatalog::shared();
    api.inner.create_branch(name, None).unwrap();
    api
}

pub(crate) fn ns(path: &str) -> Namespace {
    Namespace::parse(path).unwrap()
}

pub(crate) fn key(path: &str) -> ContentKey {
    ContentKey::parse(path).unwrap()
}
