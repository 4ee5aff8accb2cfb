//! Remote content source seam.

use serde_json::Value;

use crate::SiteMetadata;

/// Error from the remote content source.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The request could not be completed (network error, timeout, bad body).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The remote answered with an error status.
    #[error("remote returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response arrived but did not have the expected shape.
    #[error("unexpected response shape: {0}")]
    Shape(String),
}

/// The collaborator that fetches content from the remote document source.
///
/// Implementations are expected to be blocking; callers run them from worker
/// threads. The page tree is an opaque blob to the build pipeline.
pub trait RemoteSource: Send + Sync {
    /// Fetch site metadata for a collection identifier.
    fn collection(&self, url: &str) -> Result<SiteMetadata, RemoteError>;

    /// Fetch one page's content tree by its identifier.
    fn page_tree(&self, id: &str) -> Result<Value, RemoteError>;
}
