//! `blatex render` command implementation.

use std::path::PathBuf;

use blatex_config::Config;
use blatex_markup::{MarkupError, MarkupService};
use clap::Args;
use console::Term;

use super::InputArgs;
use crate::error::CliError;
use crate::output::Output;
use crate::templates;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Write the rendered markup to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Substitute every directive in `markup` using the configured templates.
pub(crate) fn render_markup(config: &Config, markup: &str) -> Result<String, MarkupError> {
    let syntax = config.syntax();
    let registry = templates::registry(&config.fragments, &syntax);
    MarkupService::new(syntax, registry).render_to_string(markup)
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, a file cannot be read or
    /// written, or a directive is malformed or has no template.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let (config, markup) = self.input.load(&output)?;

        if config.fragments.is_empty() {
            output.warning("No [fragments] configured: any directive will be unhandled");
        }

        let rendered = render_markup(&config, &markup)
            .map_err(|e| CliError::markup(&self.input.file, &markup, e))?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, &rendered)?;
                output.success(&format!("Rendered {}", path.display()));
            }
            None => Term::stdout().write_str(&rendered)?,
        }

        Ok(())
    }
}
