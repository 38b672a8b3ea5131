//! Variables command.
//!
//! Lists every sample-data variable a template can reference and whether it
//! comes from the built-in defaults or from the `[data]` table.

use clap::Args;
use colored::Colorize;
use email_template_engine::{VariableResolver, VariableSource};
use tracing::instrument;

use crate::{commands::ConfigArgs, errors::Error, session::PreviewSession};

#[cfg(test)]
#[path = "variables_cmd_tests.rs"]
mod tests;

/// Arguments for `email-preview variables`.
#[derive(Args, Debug, Clone, Default)]
pub struct VariablesArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Only list variables defined in the configuration file.
    #[arg(long)]
    pub custom_only: bool,
}

/// Formats the variables known to `variables`, one per line.
pub fn format_variables(variables: &VariableResolver, custom_only: bool) -> String {
    let mut output = String::new();
    let mut count = 0;

    for key in variables.keys() {
        let source = match variables.source_of(&key) {
            Some(VariableSource::Custom) => "custom".green(),
            Some(VariableSource::Default) if !custom_only => "default".dimmed(),
            _ => continue,
        };
        output.push_str(&format!("  {} ({})\n", key, source));
        count += 1;
    }

    format!(
        "{} {}\n{}",
        "Recognized template variables:".bold(),
        count,
        output
    )
}

#[instrument(skip_all)]
pub async fn execute(args: &VariablesArgs) -> Result<(), Error> {
    let session = PreviewSession::load(&args.config, &[])?;
    print!("{}", format_variables(session.variables(), args.custom_only));
    Ok(())
}
