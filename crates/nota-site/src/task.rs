//! Task planning and the staleness decision.

use std::sync::Arc;

use nota_cache::CacheStore;

use crate::{PageMetadata, SiteMetadata};

/// Work planned for one content item.
///
/// Constructed once before scheduling and never mutated after; the render
/// step only reads it. In particular [`fetch`](Self::fetch) is decided here,
/// exactly once — the renderer never re-evaluates staleness.
#[derive(Clone, Debug)]
pub struct RenderTask {
    /// Shared site metadata, read-only.
    pub site: Arc<SiteMetadata>,
    /// The page this task renders.
    pub page: PageMetadata,
    /// Cache location for the page's content blob.
    pub cache_uri: String,
    /// Fetch from the remote (true) or reuse the cache entry (false).
    pub fetch: bool,
    /// Whether plugin hooks run for this task.
    pub run_hooks: bool,
}

/// Counters aggregated during planning, for the build summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: usize,
    /// Items whose cache entry is stale or absent (will be fetched).
    pub updated: usize,
    /// Items marked publishable.
    pub published: usize,
}

/// Decide fetch-vs-reuse for one page.
///
/// The cache entry is valid only if it was written strictly after the page's
/// last remote edit; equal timestamps are treated as stale, and an absent
/// entry is indistinguishable from a stale one. Prefer a redundant fetch over
/// stale content.
#[must_use]
pub fn needs_fetch(page: &PageMetadata, store: &dyn CacheStore) -> bool {
    !store.fresher_than(&page.cache_uri(), page.last_edited_ms)
}

/// Build one [`RenderTask`] per page and aggregate the summary counters.
///
/// No side effects beyond the staleness queries against `store`; performs no
/// other I/O.
pub fn plan(
    site: &Arc<SiteMetadata>,
    store: &dyn CacheStore,
    run_hooks: bool,
) -> (Vec<RenderTask>, TaskCounts) {
    let mut counts = TaskCounts {
        total: site.pages.len(),
        ..TaskCounts::default()
    };

    let tasks = site
        .pages
        .iter()
        .map(|page| {
            let fetch = needs_fetch(page, store);
            if fetch {
                counts.updated += 1;
            }
            if page.publish {
                counts.published += 1;
            }
            RenderTask {
                site: Arc::clone(site),
                cache_uri: page.cache_uri(),
                page: page.clone(),
                fetch,
                run_hooks,
            }
        })
        .collect();

    (tasks, counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::test_support;
    use nota_cache::{FileStore, NullStore};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn absent_entry_forces_fetch() {
        let page = test_support::page("p1", true, 1000);
        assert!(needs_fetch(&page, &NullStore));
    }

    #[test]
    fn fresh_entry_skips_fetch_and_stale_entry_does_not() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().to_path_buf());

        let mut page = test_support::page("p1", true, 0);
        store.set(&page.cache_uri(), &json!("tree")).unwrap();

        // Entry written now, page edited at epoch: cache wins
        assert!(!needs_fetch(&page, &store));

        // Remote edit moves past any plausible mtime: refetch
        page.last_edited_ms = i64::MAX - 1;
        assert!(needs_fetch(&page, &store));
    }

    #[test]
    fn plan_builds_one_task_per_page_with_counts() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().to_path_buf());

        let cached = test_support::page("cached", true, 0);
        store.set(&cached.cache_uri(), &json!("tree")).unwrap();
        let stale = test_support::page("stale", true, i64::MAX - 1);
        let draft = test_support::page("draft", false, i64::MAX - 1);

        let site = test_support::site(vec![cached, stale, draft]);
        let (tasks, counts) = plan(&site, &store, false);

        assert_eq!(counts, TaskCounts {
            total: 3,
            updated: 2,
            published: 2,
        });

        assert_eq!(tasks.len(), 3);
        assert!(!tasks[0].fetch);
        assert!(tasks[1].fetch);
        assert!(tasks[2].fetch);
        assert_eq!(tasks[1].cache_uri, "notion://stale");
        assert!(tasks.iter().all(|t| !t.run_hooks));
    }
}
