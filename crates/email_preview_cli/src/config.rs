//! Configuration management for the email-preview CLI.
//!
//! The configuration is stored in TOML format and can be loaded from a
//! specified file path or from the default location in the current directory.
//! Relative paths inside the file are resolved against the directory that
//! holds the file.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use email_template_engine::{CustomData, DataValue, PipelineConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::Error;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "email-preview.toml";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Main configuration structure for the email-preview CLI application.
///
/// # Example TOML Configuration
///
/// ```toml
/// [paths]
/// components = "components"
/// engines = "engines"
/// emails = "emails"
///
/// [data]
/// company = "Acme"
/// greeting = ["Hi", "Hello"]
///
/// [limits]
/// max_include_depth = 32
/// max_loop_iterations = 1000
/// max_expansions = 10000
///
/// [css]
/// inline = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where components, engine definitions and emails live.
    pub paths: PathsConfig,

    /// Custom sample data layered over the built-in defaults.
    #[serde(default)]
    pub data: BTreeMap<String, DataEntry>,

    /// Pipeline resource limits.
    #[serde(default)]
    pub limits: PipelineConfig,

    /// CSS inlining settings.
    #[serde(default)]
    pub css: CssConfig,

    /// Directory relative paths are resolved against.
    #[serde(skip)]
    base_dir: PathBuf,
}

/// Filesystem locations used by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory of components and layouts. Required.
    pub components: String,

    /// Directory of engine definition files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engines: Option<String>,

    /// Directory of email templates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emails: Option<String>,
}

/// A `[data]` entry: a fixed value or a list to pick from at random.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataEntry {
    Text(String),
    Choices(Vec<String>),
}

impl From<DataEntry> for DataValue {
    fn from(entry: DataEntry) -> Self {
        match entry {
            DataEntry::Text(value) => DataValue::from(value),
            DataEntry::Choices(values) => DataValue::from(values),
        }
    }
}

/// CSS settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CssConfig {
    /// Hoist `<style>` rules into inline styles after rendering.
    ///
    /// **Default**: true
    pub inline: bool,
}

impl Default for CssConfig {
    fn default() -> Self {
        Self { inline: true }
    }
}

impl AppConfig {
    /// Creates a configuration with only a components directory.
    pub fn new(components: impl Into<String>) -> Self {
        Self {
            paths: PathsConfig {
                components: components.into(),
                engines: None,
                emails: None,
            },
            data: BTreeMap::new(),
            limits: PipelineConfig::default(),
            css: CssConfig::default(),
            base_dir: PathBuf::new(),
        }
    }

    /// Loads configuration from a TOML file at the specified path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if:
    /// - The specified file does not exist
    /// - The file cannot be read
    /// - The file contains invalid TOML or does not match the expected schema
    /// - `paths.components` is empty
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use std::path::Path;
    /// use email_preview_cli::config::AppConfig;
    ///
    /// let config_path = Path::new("./email-preview.toml");
    /// match AppConfig::load(config_path) {
    ///     Ok(config) => println!("Components in {:?}", config.components_dir()),
    ///     Err(e) => eprintln!("Failed to load config: {}", e),
    /// }
    /// ```
    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!("Loading configuration from {:?}", path);

        if !path.exists() {
            return Err(Error::Config(format!(
                "Configuration file not found: {:?}",
                path
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read configuration file: {}", e)))?;

        let mut config: AppConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse configuration file: {}", e)))?;

        if config.paths.components.trim().is_empty() {
            return Err(Error::Config(
                "paths.components must name the components directory".to_string(),
            ));
        }

        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(config)
    }

    pub fn components_dir(&self) -> PathBuf {
        self.resolve(&self.paths.components)
    }

    pub fn engines_dir(&self) -> Option<PathBuf> {
        self.paths.engines.as_deref().map(|p| self.resolve(p))
    }

    /// Directory bare template names are looked up in.
    pub fn emails_dir(&self) -> Option<PathBuf> {
        self.paths.emails.as_deref().map(|p| self.resolve(p))
    }

    /// The `[data]` table as engine custom data.
    pub fn custom_data(&self) -> CustomData {
        self.data
            .iter()
            .map(|(key, entry)| (key.clone(), DataValue::from(entry.clone())))
            .collect()
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

/// Resolves the path to the configuration file.
///
/// - If `config_path` is `Some(path)`, returns that path as a `PathBuf`
/// - If `config_path` is `None`, returns `./email-preview.toml` in the current directory
pub fn get_config_path(config_path: Option<&str>) -> PathBuf {
    if let Some(path) = config_path {
        PathBuf::from(path)
    } else {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        current_dir.join(DEFAULT_CONFIG_FILENAME)
    }
}
