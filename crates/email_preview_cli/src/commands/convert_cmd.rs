//! Convert command.
//!
//! Expands layouts, components and loops, then rewrites the remaining
//! `{{key, value}}` directives into a target engine's placeholder syntax.
//!
//! ```bash
//! email-preview convert emails/welcome.html --engine liquid --output dist/welcome.liquid
//! ```

use std::path::PathBuf;

use clap::Args;
use tracing::{info, instrument};

use crate::{
    commands::ConfigArgs,
    errors::Error,
    session::{read_template, write_output, PreviewSession},
};

#[cfg(test)]
#[path = "convert_cmd_tests.rs"]
mod tests;

/// Arguments for `email-preview convert`.
#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Template file to convert.
    pub template: PathBuf,

    /// Extension of the target engine (see `email-preview engines`).
    #[arg(long)]
    pub engine: String,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Write the result here instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Prepares `template` and converts it with the engine for `extension`.
///
/// The engine is looked up before any component is loaded, so an unknown
/// extension fails fast.
pub async fn convert_template(
    session: &PreviewSession,
    template: &str,
    extension: &str,
) -> Result<String, Error> {
    let engines = session.engines();
    if engines.get(extension).is_none() {
        return Err(email_template_engine::Error::EngineNotFound {
            extension: extension.to_string(),
        }
        .into());
    }

    let prepared = session.pipeline().prepare_for_conversion(template).await;
    Ok(engines.convert(&prepared, extension)?)
}

#[instrument(skip_all, fields(template = ?args.template, engine = %args.engine))]
pub async fn execute(args: &ConvertArgs) -> Result<(), Error> {
    let session = PreviewSession::load(&args.config, &[])?;
    let template = read_template(&session.template_path(&args.template))?;

    let converted = convert_template(&session, &template, &args.engine).await?;
    write_output(args.output.as_deref(), &converted)?;

    info!("Converted {:?} for engine '{}'", args.template, args.engine);
    Ok(())
}
