//! Validate command.
//!
//! Checks a template against the configured sample data and components and
//! prints the findings.
//!
//! ```bash
//! email-preview validate emails/welcome.html
//! email-preview validate emails/welcome.html --format json
//! ```

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use email_template_engine::{Severity, ValidationResult, ValidationStatus};
use tracing::{debug, instrument};

use crate::{
    commands::ConfigArgs,
    errors::Error,
    session::{read_template, PreviewSession},
};

#[cfg(test)]
#[path = "validate_cmd_tests.rs"]
mod tests;

/// Arguments for `email-preview validate`.
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Template file to validate.
    pub template: PathBuf,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output format ("pretty" or "json").
    #[arg(long, default_value = "pretty")]
    pub format: String,
}

/// Format a ValidationResult for display.
pub fn format_validation_result(
    result: &ValidationResult,
    template_name: &str,
    format: &str,
) -> Result<String, Error> {
    match format {
        "json" => serde_json::to_string_pretty(result)
            .map_err(|e| Error::Serialize(format!("Failed to serialize to JSON: {}", e))),
        "pretty" => Ok(format_validation_result_pretty(result, template_name)),
        _ => Err(Error::InvalidArguments(format!(
            "Invalid format: '{}'. Use 'json' or 'pretty'.",
            format
        ))),
    }
}

/// Format a ValidationResult in pretty/human-readable format.
fn format_validation_result_pretty(result: &ValidationResult, template_name: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "\n{} {}\n\n",
        "Validating template:".bold(),
        template_name.bright_cyan()
    ));

    match result.status {
        ValidationStatus::Success => {
            output.push_str(&format!("{}\n", "✓ Template is VALID".green().bold()));
            return output;
        }
        ValidationStatus::Warning => output.push_str(&format!(
            "{}\n\n",
            "⚠ Template is valid with warnings".yellow().bold()
        )),
        ValidationStatus::Error => output.push_str(&format!(
            "{}\n\n",
            "✗ Template validation FAILED".red().bold()
        )),
    }

    for issue in &result.issues {
        let marker = match issue.severity {
            Severity::Error => "✗".red(),
            Severity::Warning => "⚠".yellow(),
        };
        let location = format!("{}:{}", issue.line, issue.column);
        output.push_str(&format!(
            "  {} {}: {}\n",
            marker,
            location.dimmed(),
            issue.message
        ));
        if !issue.code.is_empty() {
            output.push_str(&format!("      {}\n", issue.code.dimmed()));
        }
    }

    let errors = result.errors().count();
    let warnings = result.warnings().count();
    output.push_str(&format!(
        "\n{} error(s), {} warning(s)\n",
        errors.to_string().red().bold(),
        warnings.to_string().yellow().bold()
    ));

    output
}

/// Validates a template, prints the report and returns the result.
#[instrument(skip_all, fields(template = ?args.template))]
pub async fn execute(args: &ValidateArgs) -> Result<ValidationResult, Error> {
    let session = PreviewSession::load(&args.config, &[])?;
    let template = read_template(&session.template_path(&args.template))?;

    let result = session.validator().validate(&template);
    debug!("Validation status: {:?}", result.status);

    let template_name = args.template.to_string_lossy();
    let output = format_validation_result(&result, &template_name, &args.format)?;
    println!("{}", output);

    Ok(result)
}
