//! Cache URI parsing and path resolution.

use std::path::{Path, PathBuf};

/// A recognized cache namespace.
///
/// Each namespace maps to one subdirectory of the cache root and corresponds
/// to one content source. The URI scheme admits more protocols; only Notion
/// is defined today.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Namespace {
    /// Pages fetched from the Notion API.
    Notion,
}

impl Namespace {
    /// Directory name of this namespace under the cache root.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Notion => "notion",
        }
    }

    fn from_protocol(protocol: &str) -> Option<Self> {
        match protocol {
            "notion" => Some(Self::Notion),
            _ => None,
        }
    }
}

/// Error from parsing a cache URI.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UriError {
    /// The URI is not of the form `<protocol>://<key>` with both segments
    /// non-empty.
    #[error("malformed cache uri {0:?}")]
    Malformed(String),

    /// The protocol segment does not name a known namespace.
    #[error("unknown cache protocol {0:?}")]
    UnknownProtocol(String),
}

/// A parsed cache URI of the form `<protocol>://<key>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheUri {
    pub namespace: Namespace,
    pub key: String,
}

impl CacheUri {
    /// Parse a cache URI, rejecting empty segments and unknown protocols.
    pub fn parse(uri: &str) -> Result<Self, UriError> {
        let Some((protocol, key)) = uri.split_once("://") else {
            return Err(UriError::Malformed(uri.to_owned()));
        };
        if protocol.is_empty() || key.is_empty() {
            return Err(UriError::Malformed(uri.to_owned()));
        }
        let namespace = Namespace::from_protocol(protocol)
            .ok_or_else(|| UriError::UnknownProtocol(protocol.to_owned()))?;
        Ok(Self {
            namespace,
            key: key.to_owned(),
        })
    }

    /// Filename component for this URI: the key with every path separator
    /// removed.
    ///
    /// This is deliberate sanitization, not hashing; keys that differ only
    /// by separator characters collide.
    #[must_use]
    pub fn filename(&self) -> String {
        self.key.chars().filter(|c| !matches!(c, '/' | '\\')).collect()
    }
}

/// Resolve a cache URI to its on-disk path under `root`.
///
/// Pure function of its arguments: `<root>/<namespace>/<sanitized key>`.
pub fn resolve_path(root: &Path, uri: &str) -> Result<PathBuf, UriError> {
    let parsed = CacheUri::parse(uri)?;
    Ok(root.join(parsed.namespace.as_str()).join(parsed.filename()))
}
