//! Incremental build pipeline for Nota.
//!
//! Turns a remote Notion collection into a static site, refetching only the
//! pages whose remote edit time has moved past the cached copy:
//!
//! 1. fetch [`SiteMetadata`] from the remote collection
//! 2. render the site index (required artifact, fatal on failure)
//! 3. [`plan`] one immutable [`RenderTask`] per page, deciding fetch-vs-reuse
//!    against the cache store exactly once
//! 4. run the batch on a bounded worker pool; per-task failures are isolated
//!    and collected into the [`BuildSummary`]
//!
//! The page content blob stays opaque to this crate: fetching is behind the
//! [`RemoteSource`] seam, persistence behind [`nota_cache::CacheStore`], and
//! template syntax behind the [`TemplateProvider`] plus minijinja.

mod assets;
mod build;
mod content;
mod hooks;
mod index;
mod metadata;
mod pool;
mod post;
mod remote;
mod task;
mod template;

pub use assets::copy_dir_all;
pub use build::{BuildError, BuildOptions, BuildSummary, build};
pub use content::tree_to_html;
pub use hooks::{Hook, HookContext, HookRegistry};
pub use index::render_index;
pub use metadata::{PageMetadata, SiteMetadata};
pub use pool::run_bounded;
pub use post::{RenderContext, RenderError, render_post};
pub use remote::{RemoteError, RemoteSource};
pub use task::{RenderTask, TaskCounts, needs_fetch, plan};
pub use template::{Template, TemplateError, TemplateProvider, render_template};
