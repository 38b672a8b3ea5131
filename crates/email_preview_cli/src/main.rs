use clap::{Parser, Subcommand};
use email_preview_cli::{
    commands::{
        convert_cmd::{self, ConvertArgs},
        engines_cmd::{self, EnginesArgs},
        render_cmd::{self, RenderArgs},
        validate_cmd::{self, ValidateArgs},
        variables_cmd::{self, VariablesArgs},
    },
    errors::Error,
};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// email-preview: render, validate and convert HTML email templates
#[derive(Parser)]
#[command(name = "email-preview")]
#[command(about = "Render, validate and convert HTML email templates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a template with sample data
    Render(RenderArgs),

    /// Check a template for problems
    Validate(ValidateArgs),

    /// Convert a template to another engine's syntax
    Convert(ConvertArgs),

    /// List available conversion engines
    Engines(EnginesArgs),

    /// List recognized template variables
    Variables(VariablesArgs),

    /// Show the CLI version
    Version,
}

fn exit_on_error(e: Error) -> ! {
    error!("Error: {e}");
    eprintln!("Error: {e}");
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so rendered output can be piped.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("EMAIL_PREVIEW_LOG"))
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Render(args) => {
            if let Err(e) = render_cmd::execute(args).await {
                exit_on_error(e);
            }
        }
        Commands::Validate(args) => match validate_cmd::execute(args).await {
            Ok(result) if result.has_errors() => std::process::exit(1),
            Ok(_) => {}
            Err(e) => exit_on_error(e),
        },
        Commands::Convert(args) => {
            if let Err(e) = convert_cmd::execute(args).await {
                exit_on_error(e);
            }
        }
        Commands::Engines(args) => {
            if let Err(e) = engines_cmd::execute(args).await {
                exit_on_error(e);
            }
        }
        Commands::Variables(args) => {
            if let Err(e) = variables_cmd::execute(args).await {
                exit_on_error(e);
            }
        }
        Commands::Version => {
            println!("email-preview version {}", env!("CARGO_PKG_VERSION"));
        }
    }
}
