//! Namespace and table operations on a pinned client.
//!
//! Reads see the catalog at the pinned hash. Writes commit on top of the
//! pinned hash and return a new client pinned at the resulting commit; the
//! service rejects the commit if the branch has moved in the meantime.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};
use vcat_api::ApiError;
use vcat_types::{Content, ContentKey, Namespace, Operation};

use crate::client::{CatalogClient, Provenance, ResolvedReference};
use crate::error::{ClientError, Result};

impl CatalogClient {
    /// Create `namespace` with `properties`.
    pub fn create_namespace(
        &self,
        namespace: &Namespace,
        properties: BTreeMap<String, String>,
    ) -> Result<Arc<Self>> {
        let key = namespace.to_key().ok_or(ClientError::RootNamespace)?;
        let pin = self.reference()?;

        if let Some(content) = self.content(pin, &key)? {
            return Err(if content.is_namespace() {
                ClientError::NamespaceAlreadyExists {
                    namespace: namespace.to_string(),
                }
            } else {
                ClientError::ContentTypeMismatch {
                    key: key.to_string(),
                    expected: "namespace",
                }
            });
        }

        let op = Operation::Put {
            key,
            content: Content::Namespace { properties },
        };
        let client = self.commit(pin, namespace, &format!("create namespace {namespace}"), &[op])?;
        info!(%namespace, reference = %pin.name(), "namespace created");
        Ok(client)
    }

    /// Properties of an explicitly created namespace.
    pub fn load_namespace_metadata(&self, namespace: &Namespace) -> Result<BTreeMap<String, String>> {
        let key = namespace.to_key().ok_or(ClientError::RootNamespace)?;
        let pin = self.reference()?;
        match self.content(pin, &key)? {
            Some(Content::Namespace { properties }) => Ok(properties),
            Some(_) => Err(ClientError::ContentTypeMismatch {
                key: key.to_string(),
                expected: "namespace",
            }),
            None => Err(ClientError::NoSuchNamespace {
                namespace: namespace.to_string(),
            }),
        }
    }

    /// Explicitly created namespaces directly below `parent`, sorted.
    ///
    /// Pass [`Namespace::empty()`] to list top-level namespaces.
    pub fn list_namespaces(&self, parent: &Namespace) -> Result<Vec<Namespace>> {
        let pin = self.reference()?;
        let prefix = (!parent.is_empty()).then_some(parent);
        let mut namespaces: Vec<Namespace> = self
            .api
            .list_namespaces(&pin.to_reference(), prefix)
            .map_err(|e| self.reference_error(pin, parent, e))?
            .into_iter()
            .filter(|n| n.depth() == parent.depth() + 1 && parent.is_prefix_of(n))
            .collect();
        namespaces.sort();
        Ok(namespaces)
    }

    /// Returns `true` if `namespace` exists explicitly or through a
    /// descendant.
    pub fn namespace_exists(&self, namespace: &Namespace) -> Result<bool> {
        if namespace.is_empty() {
            return Ok(true);
        }
        let pin = self.reference()?;
        let found = self
            .api
            .list_namespaces(&pin.to_reference(), Some(namespace))
            .map_err(|e| self.reference_error(pin, namespace, e))?;
        Ok(!found.is_empty())
    }

    /// Drop an explicitly created, empty namespace.
    pub fn drop_namespace(&self, namespace: &Namespace) -> Result<Arc<Self>> {
        let key = namespace.to_key().ok_or(ClientError::RootNamespace)?;
        let pin = self.reference()?;

        match self.content(pin, &key)? {
            Some(content) if content.is_namespace() => {}
            Some(_) => {
                return Err(ClientError::ContentTypeMismatch {
                    key: key.to_string(),
                    expected: "namespace",
                })
            }
            None => {
                return Err(ClientError::NoSuchNamespace {
                    namespace: namespace.to_string(),
                })
            }
        }

        let entries = self
            .api
            .list_entries(&pin.to_reference(), Some(namespace))
            .map_err(|e| self.reference_error(pin, namespace, e))?;
        if entries.iter().any(|(k, _)| k != &key) {
            return Err(ClientError::NamespaceNotEmpty {
                namespace: namespace.to_string(),
            });
        }

        let client = self.commit(
            pin,
            namespace,
            &format!("drop namespace {namespace}"),
            &[Operation::Delete { key }],
        )?;
        info!(%namespace, reference = %pin.name(), "namespace dropped");
        Ok(client)
    }

    /// Create or update the table at `key`.
    ///
    /// Implied namespaces are created in the same commit. When implied
    /// namespaces are disabled, the table's namespace must already exist.
    pub fn commit_table(&self, key: &ContentKey, metadata_location: &str) -> Result<Arc<Self>> {
        let pin = self.reference()?;

        if let Some(content) = self.content(pin, key)? {
            if !content.is_table() {
                return Err(ClientError::ContentTypeMismatch {
                    key: key.to_string(),
                    expected: "table",
                });
            }
        }

        let implied = self.find_implied_namespaces(key)?;
        if !self.config.create_implied_namespaces && !self.namespace_exists(&key.namespace())? {
            return Err(ClientError::NoSuchNamespace {
                namespace: key.namespace().to_string(),
            });
        }

        let mut operations: Vec<Operation> = implied
            .iter()
            .filter_map(Namespace::to_key)
            .map(|k| Operation::Put {
                key: k,
                content: Content::namespace(),
            })
            .collect();
        operations.push(Operation::Put {
            key: key.clone(),
            content: Content::Table {
                metadata_location: metadata_location.to_string(),
            },
        });

        let client = self.commit(pin, key, &format!("update table {key}"), &operations)?;
        debug!(%key, implied = implied.len(), metadata_location, "table committed");
        Ok(client)
    }

    /// Tables directly inside `namespace`, sorted.
    pub fn list_tables(&self, namespace: &Namespace) -> Result<Vec<ContentKey>> {
        let pin = self.reference()?;
        let prefix = (!namespace.is_empty()).then_some(namespace);
        let entries = self
            .api
            .list_entries(&pin.to_reference(), prefix)
            .map_err(|e| self.reference_error(pin, namespace, e))?;
        Ok(entries
            .into_iter()
            .filter(|(k, c)| c.is_table() && &k.namespace() == namespace)
            .map(|(k, _)| k)
            .collect())
    }

    fn content(&self, pin: &ResolvedReference, key: &ContentKey) -> Result<Option<Content>> {
        let mut found = self
            .api
            .get_content(&pin.to_reference(), std::slice::from_ref(key))
            .map_err(|e| self.reference_error(pin, key, e))?;
        Ok(found.remove(key))
    }

    fn commit(
        &self,
        pin: &ResolvedReference,
        subject: &dyn std::fmt::Display,
        message: &str,
        operations: &[Operation],
    ) -> Result<Arc<Self>> {
        let committed = self
            .api
            .commit(pin.name(), pin.hash(), message, operations)
            .map_err(|e| self.reference_error(pin, subject, e))?;
        let hash = *committed.hash().ok_or_else(|| {
            ApiError::Internal(format!(
                "service returned reference '{}' without a hash",
                pin.name()
            ))
        })?;
        Ok(Self::pinned(
            Arc::clone(&self.api),
            ResolvedReference::new(pin.name(), hash, Provenance::Validated),
            Arc::clone(&self.config),
        ))
    }
}
