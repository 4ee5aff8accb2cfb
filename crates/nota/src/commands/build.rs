//! `nota build` command implementation.

use std::path::PathBuf;

use clap::Args;

use nota_cache::FileStore;
use nota_config::{Config, Dirs};
use nota_notion::NotionClient;
use nota_site::{BuildOptions, HookRegistry, build};

use crate::error::CliError;
use crate::report::Reporter;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Site root directory (contains nota.toml).
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let report = Reporter::new();

        let config = Config::load(&self.root)?;
        let dirs = Dirs::resolve(&self.root, &config.site.theme);

        report.preamble(&self.root, &config.site.theme);

        let store = FileStore::new(dirs.cache_dir.clone());
        let remote = NotionClient::new();
        let hooks = HookRegistry::new();
        let opts = BuildOptions {
            url: config.site.url.clone(),
            theme: config.site.theme.clone(),
            parallelism: config.build.parallelism,
        };

        let summary = build(&dirs, &opts, &remote, &store, &hooks)?;

        // Per-post failures are reported but never change the exit code
        report.summary(&summary);

        Ok(())
    }
}
