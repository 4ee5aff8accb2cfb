//! URI-addressed content cache for Nota.
//!
//! Content blobs are keyed by URIs of the form `<protocol>://<key>`, where
//! the protocol names a [`Namespace`] (a partition of the store, one per
//! content source). The core API is the [`CacheStore`] trait:
//!
//! - [`CacheStore::get`]: read a blob, with a categorized [`ReadMiss`] on
//!   every failure path so callers can tell "absent" from "corrupt" from
//!   "unreadable"
//! - [`CacheStore::set`]: write a blob; failures are reported, never raised
//! - [`CacheStore::fresher_than`]: staleness query against the entry's
//!   stored-at time
//!
//! # Implementations
//!
//! - [`FileStore`]: one JSON file per entry under `<root>/<namespace>/`
//! - [`NullStore`]: no-op implementation (always misses), for disabled caching
//!
//! # Example
//!
//! ```
//! use nota_cache::{CacheStore, NullStore, ReadMiss};
//!
//! let store = NullStore;
//! store.set("notion://page-1", &serde_json::json!({"a": 1})).unwrap();
//! assert!(matches!(store.get("notion://page-1"), Err(ReadMiss::Absent)));
//! ```

mod file;
mod uri;

pub use file::FileStore;
pub use uri::{CacheUri, Namespace, UriError, resolve_path};

use serde_json::Value;

/// Why a cache read produced no value.
///
/// Every variant is a miss from the caller's perspective; the distinction
/// exists so diagnostics and tests can assert on the specific cause.
#[derive(Debug, thiserror::Error)]
pub enum ReadMiss {
    /// The URI did not resolve to a cache path.
    #[error("{0}")]
    Unresolved(#[from] UriError),

    /// No entry exists for this URI.
    #[error("no cache entry")]
    Absent,

    /// An entry exists but could not be read.
    #[error("failed to read cache entry: {0}")]
    Io(#[source] std::io::Error),

    /// An entry exists but its content is not valid JSON.
    #[error("cache entry is not valid JSON: {0}")]
    Corrupt(#[source] serde_json::Error),
}

/// Why a cache write did not happen.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// The URI did not resolve to a cache path.
    #[error("{0}")]
    Unresolved(#[from] UriError),

    /// The blob could not be serialized.
    #[error("failed to serialize cache entry: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The entry could not be written to disk.
    #[error("failed to write cache entry: {0}")]
    Io(#[source] std::io::Error),
}

/// A persistent store for opaque JSON content blobs, keyed by cache URI.
///
/// The cache is an optimization, not a correctness requirement: callers are
/// expected to log write failures and carry on, and to treat any [`ReadMiss`]
/// as "content must be (re)fetched".
pub trait CacheStore: Send + Sync {
    /// Read the blob stored at `uri`.
    ///
    /// Never panics; unresolvable URIs, absent entries, unreadable files and
    /// unparseable content all surface as a categorized [`ReadMiss`].
    fn get(&self, uri: &str) -> Result<Value, ReadMiss>;

    /// Write `blob` at `uri`, creating the namespace directory on first use.
    ///
    /// Overwrites any existing entry. No per-key locking is performed; two
    /// concurrent writers to the same URI race with the last one winning.
    fn set(&self, uri: &str, blob: &Value) -> Result<(), WriteError>;

    /// True iff an entry exists at `uri` and its stored-at time is strictly
    /// greater than `unix_ms` (milliseconds since the epoch).
    ///
    /// Fail-closed: any doubt (absent entry, unresolvable URI, stat failure)
    /// answers `false`, forcing the caller down the refetch path.
    fn fresher_than(&self, uri: &str, unix_ms: i64) -> bool;
}

/// No-op [`CacheStore`] that never stores or retrieves data.
///
/// Every `get` misses, every `set` is discarded, and nothing is ever fresh.
pub struct NullStore;

impl CacheStore for NullStore {
    fn get(&self, _uri: &str) -> Result<Value, ReadMiss> {
        Err(ReadMiss::Absent)
    }

    fn set(&self, _uri: &str, _blob: &Value) -> Result<(), WriteError> {
        Ok(())
    }

    fn fresher_than(&self, _uri: &str, _unix_ms: i64) -> bool {
        false
    }
}
