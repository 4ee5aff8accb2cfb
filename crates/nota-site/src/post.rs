//! Per-post rendering.
//!
//! One [`render_post`] call takes a planned task through its states:
//! acquire (fetch or cache read) → hooks → render + write for published
//! pages, or skip for drafts. The outcome carries nothing but
//! success/failure back to the pool.

use std::fs;
use std::path::Path;

use nota_cache::CacheStore;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::content::tree_to_html;
use crate::hooks::{HookContext, HookRegistry};
use crate::remote::{RemoteError, RemoteSource};
use crate::task::RenderTask;
use crate::template::{TemplateError, TemplateProvider, render_template};

/// Shared collaborators for the post batch.
///
/// Everything here is read-mostly and shared across worker threads; no task
/// mutates any of it.
pub struct RenderContext<'a> {
    pub remote: &'a dyn RemoteSource,
    pub store: &'a dyn CacheStore,
    pub templates: &'a TemplateProvider,
    pub hooks: &'a HookRegistry,
    pub out_dir: &'a Path,
}

/// Error rendering one post. Isolated to the failing task; never aborts the
/// batch.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] RemoteError),

    #[error("{0}")]
    Template(#[from] TemplateError),

    #[error("template render failed: {0}")]
    Render(#[from] minijinja::Error),

    #[error("failed to write output: {0}")]
    Write(#[source] std::io::Error),
}

/// Render one post end to end.
pub fn render_post(ctx: &RenderContext<'_>, task: &RenderTask) -> Result<(), RenderError> {
    let page = &task.page;

    // Acquire: the fetch-vs-reuse decision was made at planning time.
    let tree = if task.fetch {
        fetch_and_cache(ctx, task)?
    } else {
        match ctx.store.get(&task.cache_uri) {
            Ok(tree) => {
                debug!("read page cache {}", page.id);
                tree
            }
            Err(miss) => {
                // The planner saw a fresh entry but it is gone or unreadable
                // now. Fall back to fetching instead of rendering nothing.
                warn!("cache miss for {} ({miss}), refetching", page.id);
                fetch_and_cache(ctx, task)?
            }
        }
    };

    if task.run_hooks {
        info!("run hooks on {}", page.id);
        ctx.hooks.run(&HookContext::Post {
            site: &task.site,
            post: page,
        });
    }

    if !page.publish {
        info!("skip rendering of unpublished page {}", page.id);
        return Ok(());
    }

    info!("render page {}", page.id);
    let content_html = tree_to_html(&tree);
    let template = ctx.templates.get(&page.template)?;
    let html = render_template(
        &template,
        json!({
            "site": &*task.site,
            "post": page,
            "content_html": content_html,
        }),
    )?;

    fs::write(ctx.out_dir.join(&page.output_path), html).map_err(RenderError::Write)
}

fn fetch_and_cache(ctx: &RenderContext<'_>, task: &RenderTask) -> Result<Value, RenderError> {
    info!("fetch page {}", task.page.id);
    let tree = ctx.remote.page_tree(&task.page.id)?;

    // Cache write failure must not fail the task; output still renders from
    // the freshly fetched tree.
    if let Err(e) = ctx.store.set(&task.cache_uri, &tree) {
        warn!("failed to cache {}: {e}", task.cache_uri);
    }

    Ok(tree)
}
