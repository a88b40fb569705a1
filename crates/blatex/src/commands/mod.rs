//! CLI command implementations.

pub(crate) mod render;
pub(crate) mod scan;

use std::path::PathBuf;

use blatex_config::{CliSettings, Config};
use clap::Args;

use crate::error::CliError;
use crate::output::Output;

pub(crate) use render::RenderArgs;
pub(crate) use scan::ScanArgs;

/// Arguments shared by all commands.
#[derive(Args)]
pub(crate) struct InputArgs {
    /// Markup file to process.
    pub file: PathBuf,

    /// Path to configuration file (default: auto-discover blatex.toml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directive prefix (overrides config).
    #[arg(long, env = "BLATEX_PREFIX")]
    pub prefix: Option<String>,

    /// Match the directive prefix ignoring ASCII case.
    #[arg(long)]
    pub ignore_case: bool,

    /// Enable verbose output (debug logging).
    #[arg(short, long)]
    pub verbose: bool,
}

impl InputArgs {
    /// Load the configuration and read the markup file.
    pub(crate) fn load(&self, output: &Output) -> Result<(Config, String), CliError> {
        let cli_settings = CliSettings {
            prefix: self.prefix.clone(),
            case_insensitive_prefix: self.ignore_case.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        if let Some(path) = &config.config_path {
            output.info(&format!("Using config: {}", path.display()));
        }

        let markup = std::fs::read_to_string(&self.file)?;
        tracing::debug!(path = %self.file.display(), bytes = markup.len(), "Read markup");

        Ok((config, markup))
    }
}
