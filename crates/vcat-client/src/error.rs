use thiserror::Error;
use vcat_api::ApiError;

/// Errors surfaced by [`CatalogClient`](crate::CatalogClient) and its
/// supporting types.
///
/// `ReferenceNotFound` and `StaleReference` signal a programming or
/// environment error on the caller's side; the client never retries them.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The reference has never been seen to exist.
    #[error("ref '{reference}' does not exist")]
    ReferenceNotFound { reference: String },

    /// The reference resolved earlier but the service no longer knows it.
    #[error("cannot load namespaces for '{key}': ref '{reference}' is no longer valid")]
    StaleReference { key: String, reference: String },

    #[error("namespace already exists: {namespace}")]
    NamespaceAlreadyExists { namespace: String },

    #[error("namespace does not exist: {namespace}")]
    NoSuchNamespace { namespace: String },

    #[error("namespace '{namespace}' is not empty")]
    NamespaceNotEmpty { namespace: String },

    /// The key holds content of a different kind than the operation needs.
    #[error("'{key}' is not a {expected}")]
    ContentTypeMismatch { key: String, expected: &'static str },

    /// The root namespace cannot be created, loaded, or dropped.
    #[error("the root namespace cannot be used here")]
    RootNamespace,

    /// No catalog service is registered under the requested key.
    #[error("no client registered under key '{key}'")]
    UnknownClient { key: String },

    #[error("invalid value for option '{option}': {value}")]
    InvalidConfig { option: String, value: String },

    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// Any other service or transport failure, propagated unchanged.
    #[error("catalog service error: {0}")]
    Api(#[from] ApiError),
}

/// Convenience type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
