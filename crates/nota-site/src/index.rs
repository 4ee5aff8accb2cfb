//! Site index rendering.

use std::fs;
use std::path::Path;

use serde_json::json;
use tracing::info;

use crate::hooks::{HookContext, HookRegistry};
use crate::metadata::SiteMetadata;
use crate::post::RenderError;
use crate::template::{TemplateProvider, render_template};

/// Render the site index to `<out_dir>/index.html`.
///
/// Single-shot and synchronous, independent of the per-post pipeline; runs
/// before the post batch is scheduled. The index is a required artifact, so
/// callers treat any error here as fatal to the whole build.
pub fn render_index(
    site: &SiteMetadata,
    templates: &TemplateProvider,
    hooks: &HookRegistry,
    run_hooks: bool,
    out_dir: &Path,
) -> Result<(), RenderError> {
    if run_hooks {
        info!("run hooks on index");
        hooks.run(&HookContext::Index { site });
    }

    let template = templates.get("index")?;
    let html = render_template(&template, json!({ "site": site }))?;

    fs::write(out_dir.join("index.html"), html).map_err(RenderError::Write)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::test_support;
    use serde_json::Value;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    fn fixture(index_source: &str) -> (TempDir, TemplateProvider, std::path::PathBuf) {
        let tmp = TempDir::new().unwrap();
        let layout = tmp.path().join("layout");
        fs::create_dir_all(&layout).unwrap();
        fs::write(layout.join("index.html"), index_source).unwrap();
        let out_dir = tmp.path().join("public");
        fs::create_dir_all(&out_dir).unwrap();
        (tmp, TemplateProvider::new(layout), out_dir)
    }

    #[test]
    fn writes_index_html_from_site_metadata() {
        let (_tmp, templates, out_dir) = fixture(
            "<h1>{{ site.title }}</h1>{% for post in site.pages %}<a>{{ post.title }}</a>{% endfor %}",
        );
        let site = test_support::site(vec![test_support::page("p1", true, 0)]);

        render_index(&site, &templates, &HookRegistry::new(), true, &out_dir).unwrap();

        let html = fs::read_to_string(out_dir.join("index.html")).unwrap();
        assert!(html.contains("<h1>Test Site</h1>"));
        assert!(html.contains("Page p1"));
    }

    #[test]
    fn missing_index_template_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let templates = TemplateProvider::new(tmp.path().join("layout"));
        let site = test_support::site(vec![]);

        let result = render_index(&site, &templates, &HookRegistry::new(), true, tmp.path());
        assert!(matches!(result, Err(RenderError::Template(_))));
    }

    #[test]
    fn runs_index_hooks_only_when_enabled() {
        struct Counter(Arc<Mutex<u32>>);
        impl crate::Hook for Counter {
            fn name(&self) -> &str {
                "counter"
            }
            fn invoke(&self, ctx: &HookContext<'_>, _options: &Value) {
                assert_eq!(ctx.page_type(), "index");
                *self.0.lock().unwrap() += 1;
            }
        }

        let (_tmp, templates, out_dir) = fixture("static");
        let count = Arc::new(Mutex::new(0));
        let mut hooks = HookRegistry::new();
        hooks.register(Box::new(Counter(Arc::clone(&count))), Value::Null);
        let site = test_support::site(vec![]);

        render_index(&site, &templates, &hooks, false, &out_dir).unwrap();
        assert_eq!(*count.lock().unwrap(), 0);

        render_index(&site, &templates, &hooks, true, &out_dir).unwrap();
        assert_eq!(*count.lock().unwrap(), 1);
    }
}
