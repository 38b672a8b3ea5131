//! Engines command.
//!
//! Lists the conversion targets: the built-in engines plus any definitions
//! found in the configured engines directory.

use clap::Args;
use colored::Colorize;
use tracing::instrument;

use crate::{commands::ConfigArgs, errors::Error, session::PreviewSession};

#[cfg(test)]
#[path = "engines_cmd_tests.rs"]
mod tests;

/// Arguments for `email-preview engines`.
#[derive(Args, Debug, Clone, Default)]
pub struct EnginesArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Formats `(extension, name)` pairs as an aligned listing.
pub fn format_engines(engines: &[(String, String)]) -> String {
    if engines.is_empty() {
        return "No template engines available\n".to_string();
    }

    let width = engines.iter().map(|(ext, _)| ext.len()).max().unwrap_or(0);
    let mut output = format!("{}\n", "Available template engines:".bold());
    for (extension, name) in engines {
        output.push_str(&format!(
            "  {:<width$}  {}\n",
            extension.bright_cyan(),
            name,
            width = width
        ));
    }
    output
}

#[instrument(skip_all)]
pub async fn execute(args: &EnginesArgs) -> Result<(), Error> {
    let session = PreviewSession::load(&args.config, &[])?;
    let engines = session.engines().available();
    print!("{}", format_engines(&engines));
    Ok(())
}
