use std::path::PathBuf;

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Error types that can occur while processing email templates.
///
/// Rendering is fail-open and only surfaces [`Error::Generation`] internally,
/// where it is turned into a logged fallback. The converter and the engine
/// registry are fail-loud and return these errors to the caller.
///
/// # Examples
///
/// ```rust,ignore
/// use email_template_engine::{EngineRegistry, Error};
///
/// let registry = EngineRegistry::with_builtin();
/// match registry.convert("{{name, first_name}}", "unknown") {
///     Ok(converted) => println!("{converted}"),
///     Err(Error::EngineNotFound { extension }) => {
///         eprintln!("No engine registered for .{extension}");
///     }
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed while reading templates, components or engine definitions.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A custom data generator failed to produce a value.
    ///
    /// The print resolver catches this error, logs it and leaves the
    /// directive text in the output.
    #[error("Generator for '{key}' failed: {message}")]
    Generation {
        /// The data key whose generator failed
        key: String,
        /// Message returned by the generator
        message: String,
    },

    /// No engine descriptor is registered for the requested extension.
    #[error("Engine not found: {extension}")]
    EngineNotFound {
        /// The file extension that was requested
        extension: String,
    },

    /// An engine definition file could not be parsed.
    #[error("Invalid engine definition in {path:?}: {reason}")]
    EngineDefinition {
        /// Path of the definition file
        path: PathBuf,
        /// Why the definition was rejected
        reason: String,
    },

    /// The components directory could not be scanned.
    #[error("Cannot scan components directory {path:?}: {reason}")]
    ComponentsDirectory {
        /// The directory that was scanned
        path: PathBuf,
        /// Description of the failure
        reason: String,
    },
}
