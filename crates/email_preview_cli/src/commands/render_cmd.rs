//! Render command.
//!
//! Runs a template through the full pipeline and writes previewable HTML to
//! stdout or to a file.
//!
//! ```bash
//! email-preview render emails/welcome.html --data first_name=Ana --output out/welcome.html
//! ```

use std::path::PathBuf;

use clap::Args;
use tracing::{info, instrument};

use crate::{
    commands::{parse_key_val, ConfigArgs},
    errors::Error,
    session::{read_template, write_output, PreviewSession},
};

#[cfg(test)]
#[path = "render_cmd_tests.rs"]
mod tests;

/// Arguments for `email-preview render`.
#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Template file to render.
    pub template: PathBuf,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Sample data overriding the configuration, as KEY=VALUE.
    #[arg(long = "data", value_parser = parse_key_val)]
    pub data: Vec<(String, String)>,

    /// Write the HTML here instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Renders a template with the session's components and data.
pub async fn render_template(session: &PreviewSession, template: &str) -> String {
    session.pipeline().render(template).await
}

#[instrument(skip_all, fields(template = ?args.template))]
pub async fn execute(args: &RenderArgs) -> Result<(), Error> {
    let session = PreviewSession::load(&args.config, &args.data)?;
    let template = read_template(&session.template_path(&args.template))?;

    let html = render_template(&session, &template).await;
    write_output(args.output.as_deref(), &html)?;

    info!("Rendered {:?}", args.template);
    Ok(())
}
