//! Build orchestration.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use nota_cache::CacheStore;
use nota_config::Dirs;
use tracing::{debug, error, info};

use crate::assets::copy_dir_all;
use crate::hooks::HookRegistry;
use crate::index::render_index;
use crate::pool::run_bounded;
use crate::post::{RenderContext, render_post};
use crate::remote::{RemoteError, RemoteSource};
use crate::task::plan;
use crate::template::TemplateProvider;

/// Build parameters beyond the directory layout.
#[derive(Clone, Debug)]
pub struct BuildOptions {
    /// Remote collection identifier.
    pub url: String,
    /// Theme name (for error reporting; paths come from [`Dirs`]).
    pub theme: String,
    /// Concurrency ceiling for the post batch.
    pub parallelism: usize,
}

/// What one build run did.
#[derive(Debug)]
pub struct BuildSummary {
    pub total: usize,
    /// Posts that were fetched because their cache entry was stale or absent.
    pub updated: usize,
    pub published: usize,
    /// Per-post failures, `(page id, error)`. Non-fatal by design.
    pub failures: Vec<(String, String)>,
    pub elapsed: Duration,
}

/// Fatal build failure. Per-post errors never appear here; they are collected
/// in [`BuildSummary::failures`].
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("cannot find theme {theme:?} in themes/ ({})", path.display())]
    ThemeNotFound { theme: String, path: PathBuf },

    #[error("failed to prepare site directories: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to fetch site metadata: {0}")]
    Remote(#[from] RemoteError),

    #[error("failed to render index: {0}")]
    Index(#[source] crate::post::RenderError),
}

/// Run one full build: prepare directories, copy theme assets, fetch site
/// metadata, render the index, then fetch-and-render the post batch under the
/// configured concurrency ceiling.
pub fn build(
    dirs: &Dirs,
    opts: &BuildOptions,
    remote: &dyn RemoteSource,
    store: &dyn CacheStore,
    hooks: &HookRegistry,
) -> Result<BuildSummary, BuildError> {
    let started = Instant::now();

    if !dirs.theme_dir.is_dir() {
        return Err(BuildError::ThemeNotFound {
            theme: opts.theme.clone(),
            path: dirs.theme_dir.clone(),
        });
    }
    for dir in [&dirs.cache_dir, &dirs.out_dir, &dirs.tag_dir] {
        fs::create_dir_all(dir)?;
    }

    info!("copy theme assets");
    let copied = copy_dir_all(&dirs.assets_dir, &dirs.out_dir)?;
    debug!("copied {copied} asset files");

    if !hooks.is_empty() {
        info!("{} hooks registered", hooks.len());
    }

    info!("fetch site metadata");
    let site = Arc::new(remote.collection(&opts.url)?);

    let templates = TemplateProvider::new(dirs.layout_dir.clone());

    info!("render index");
    render_index(&site, &templates, hooks, true, &dirs.out_dir).map_err(BuildError::Index)?;

    let (tasks, counts) = plan(&site, store, false);
    info!("{} of {} posts have been updated", counts.updated, counts.total);
    info!(
        "{} of {} posts are published",
        counts.published, counts.total
    );

    info!("fetch and render posts");
    let ctx = RenderContext {
        remote,
        store,
        templates: &templates,
        hooks,
        out_dir: &dirs.out_dir,
    };
    let outcomes = run_bounded(tasks, opts.parallelism, |task| {
        let outcome = render_post(&ctx, &task);
        (task.page.id.clone(), outcome)
    });

    let failures = outcomes
        .into_iter()
        .filter_map(|(id, outcome)| match outcome {
            Ok(()) => None,
            Err(e) => {
                error!("failed to render {id}: {e}");
                Some((id, e.to_string()))
            }
        })
        .collect();

    Ok(BuildSummary {
        total: counts.total,
        updated: counts.updated,
        published: counts.published,
        failures,
        elapsed: started.elapsed(),
    })
}
