//! Template lookup and rendering.
//!
//! [`TemplateProvider`] resolves a template name to its source text under the
//! theme's `layout/` directory, with a read-through cache so each template
//! file is read once per build. Template syntax belongs to minijinja; this
//! crate only hands source text to [`render_template`].

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use serde::Serialize;

/// A named template's source text and origin.
#[derive(Debug)]
pub struct Template {
    pub name: String,
    pub source: String,
    /// Source file the template was read from.
    pub path: PathBuf,
}

/// Error resolving a template name.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("template {name:?} not found at {}", path.display())]
    NotFound { name: String, path: PathBuf },

    #[error("failed to read template {name:?}: {source}")]
    Read {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Resolves template names to source text under a theme's layout directory.
///
/// Shared read-mostly across render tasks; the internal cache is behind an
/// `RwLock` so concurrent lookups don't re-read files.
pub struct TemplateProvider {
    layout_dir: PathBuf,
    cache: RwLock<HashMap<String, Arc<Template>>>,
}

impl TemplateProvider {
    #[must_use]
    pub fn new(layout_dir: PathBuf) -> Self {
        Self {
            layout_dir,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve `name` to `layout/<name>.html`, reading it on first use.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn get(&self, name: &str) -> Result<Arc<Template>, TemplateError> {
        if let Some(template) = self.cache.read().unwrap().get(name) {
            return Ok(Arc::clone(template));
        }

        let path = self.layout_dir.join(format!("{name}.html"));
        let source = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                TemplateError::NotFound {
                    name: name.to_owned(),
                    path: path.clone(),
                }
            } else {
                TemplateError::Read {
                    name: name.to_owned(),
                    source,
                }
            }
        })?;

        let template = Arc::new(Template {
            name: name.to_owned(),
            source,
            path,
        });
        self.cache
            .write()
            .unwrap()
            .insert(name.to_owned(), Arc::clone(&template));
        Ok(template)
    }
}

/// Render a template's source with the given context.
///
/// Templates are registered under their bare name (no `.html` suffix), so
/// minijinja's suffix-based auto-escaping stays off and themes control their
/// own escaping, HTML content included.
pub fn render_template<S: Serialize>(
    template: &Template,
    ctx: S,
) -> Result<String, minijinja::Error> {
    let env = minijinja::Environment::new();
    env.render_named_str(&template.name, &template.source, ctx)
}
