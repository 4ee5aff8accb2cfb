//! Site and page metadata.
//!
//! Built once per build run from the remote collection and shared read-only
//! by every render task; discarded at process exit. Cache entries are the
//! only state that persists between runs.

use serde::{Deserialize, Serialize};

/// Metadata for the whole site, shared read-only by all tasks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiteMetadata {
    /// Remote collection identifier the site was built from.
    pub url: String,
    /// Site title, from the collection name.
    #[serde(default)]
    pub title: String,
    /// Site description, from the collection description.
    #[serde(default)]
    pub description: String,
    /// Pages in collection order.
    pub pages: Vec<PageMetadata>,
}

/// Metadata for one content item, immutable within a build.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageMetadata {
    /// Remote page identifier.
    pub id: String,
    /// Page title.
    pub title: String,
    /// Tags assigned to the page.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether the page should produce output.
    pub publish: bool,
    /// Remote last-modified time, millis since the epoch.
    pub last_edited_ms: i64,
    /// Output file path relative to the output root.
    pub output_path: String,
    /// Template name, resolved by the template provider.
    pub template: String,
}

impl PageMetadata {
    /// Deterministic cache location for this page; the same page maps to the
    /// same entry across runs.
    #[must_use]
    pub fn cache_uri(&self) -> String {
        format!("notion://{}", self.id)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_uri_is_deterministic() {
        let page = test_support::page("83d2fa25-1234", true, 1000);
        assert_eq!(page.cache_uri(), "notion://83d2fa25-1234");
        assert_eq!(page.cache_uri(), page.cache_uri());
    }
}
