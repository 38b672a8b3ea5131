use std::io;

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the email-preview CLI application.
///
/// Validation findings are not errors: they are reported through the
/// `validate` command's output and exit code.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error occurred while loading or parsing configuration.
    ///
    /// This error is returned when the configuration file is missing, cannot
    /// be parsed, or lacks required settings such as the components path.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid command-line arguments were provided.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Failed to read a template or write an output file.
    #[error("Failed to load file: {0}")]
    LoadFile(io::Error),

    /// The template engine reported an error, such as an unknown engine
    /// extension.
    #[error(transparent)]
    Engine(#[from] email_template_engine::Error),

    /// Failed to serialize command output.
    #[error("Failed to serialize output: {0}")]
    Serialize(String),
}

impl Error {
    /// Process exit code for this error.
    ///
    /// Argument and configuration problems exit with `2`, everything else
    /// with `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) | Error::InvalidArguments(_) => 2,
            Error::LoadFile(_) | Error::Engine(_) | Error::Serialize(_) => 1,
        }
    }
}
