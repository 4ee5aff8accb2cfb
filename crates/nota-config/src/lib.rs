//! Configuration management for Nota.
//!
//! Parses `nota.toml` from the site root with serde and resolves the fixed
//! site directory layout into a [`Dirs`] value:
//!
//! ```text
//! {root}/
//! +-- nota.toml          # configuration
//! +-- themes/{theme}/    # template and asset source
//! |   +-- layout/
//! |   +-- assets/
//! +-- source/            # cache store root
//! +-- public/            # rendered output root
//!     +-- tag/           # reserved output subdirectory
//! ```
//!
//! [`Dirs`] is constructed once per build and threaded as a parameter into
//! every component; nothing reads the working directory on its own.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename expected at the site root.
pub const CONFIG_FILENAME: &str = "nota.toml";

/// Default number of concurrently rendered posts.
const DEFAULT_PARALLELISM: usize = 3;

/// Site configuration loaded from `nota.toml`.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub build: BuildConfig,
}

/// `[site]` section: what to build.
#[derive(Debug, Deserialize)]
pub struct SiteConfig {
    /// Remote collection identifier (Notion table URL).
    pub url: String,
    /// Theme name, resolved against `themes/`.
    pub theme: String,
}

/// `[build]` section: how to build it.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Concurrency ceiling for the post-rendering batch.
    pub parallelism: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            parallelism: DEFAULT_PARALLELISM,
        }
    }
}

/// Error loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Config {
    /// Load `nota.toml` from the site root.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILENAME);
        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse { path, source })
    }
}

/// Resolved site directory layout.
///
/// All paths are derived from the site root and theme name at load time.
#[derive(Clone, Debug)]
pub struct Dirs {
    /// `themes/<theme>/` — theme source.
    pub theme_dir: PathBuf,
    /// `themes/<theme>/layout/` — template source files.
    pub layout_dir: PathBuf,
    /// `themes/<theme>/assets/` — static assets copied into the output.
    pub assets_dir: PathBuf,
    /// `source/` — cache store root.
    pub cache_dir: PathBuf,
    /// `public/` — rendered output root.
    pub out_dir: PathBuf,
    /// `public/tag/` — reserved output subdirectory.
    pub tag_dir: PathBuf,
}

impl Dirs {
    /// Resolve the fixed layout against a site root and theme name.
    #[must_use]
    pub fn resolve(root: &Path, theme: &str) -> Self {
        let theme_dir = root.join("themes").join(theme);
        Self {
            layout_dir: theme_dir.join("layout"),
            assets_dir: theme_dir.join("assets"),
            theme_dir,
            cache_dir: root.join("source"),
            out_dir: root.join("public"),
            tag_dir: root.join("public").join("tag"),
        }
    }
}
