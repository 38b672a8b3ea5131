//! Command modules for the email-preview CLI.
//!
//! - `render_cmd`: render a template to previewable HTML
//! - `validate_cmd`: report template problems
//! - `convert_cmd`: rewrite a template for another template engine
//! - `engines_cmd`: list available conversion engines
//! - `variables_cmd`: list known sample-data variables

use clap::Args;

pub mod convert_cmd;
pub mod engines_cmd;
pub mod render_cmd;
pub mod validate_cmd;
pub mod variables_cmd;

/// Arguments shared by every command that reads the configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to the configuration file (defaults to ./email-preview.toml).
    #[arg(long)]
    pub config: Option<String>,
}

/// Parses a `KEY=VALUE` command-line pair.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{}`", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
