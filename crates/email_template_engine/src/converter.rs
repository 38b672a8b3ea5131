//! Conversion of print directives into third-party engine syntax.
//!
//! Only `{{key, value}}` directives are rewritten. The value is discarded and
//! the key is handed to an [`EngineDescriptor`], which produces the target
//! engine's placeholder. Everything else, including other directives, is left
//! as written. Conversion is purely syntactic: no data is resolved.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::PipelineConfig;
use crate::errors::Error;
use crate::loops::{find_loop_ranges, range_for_line};

#[cfg(test)]
#[path = "converter_tests.rs"]
mod tests;

/// File extension of engine definition files.
pub const ENGINE_DEFINITION_EXTENSION: &str = "toml";

/// Describes how a target template engine spells a variable.
pub trait EngineDescriptor: Send + Sync {
    /// Human readable engine name.
    fn name(&self) -> &str;

    /// Extension that selects this engine, without the leading dot.
    fn extension(&self) -> &str;

    /// Returns the engine placeholder for `key`.
    ///
    /// `index` is the 1-based iteration number when the directive sat inside a
    /// loop.
    fn convert_variable(&self, key: &str, index: Option<usize>) -> String;
}

/// An engine described by placeholder patterns.
///
/// `{key}` in a pattern is replaced with the variable name and `{index}` with
/// the iteration number. Without an `indexed_variable` pattern, indexed
/// variables use `variable` with the key `<key>_<index>`.
///
/// Definitions are usually loaded from TOML:
///
/// ```toml
/// name = "Mailchimp"
/// extension = "mc"
/// variable = "*|{key}|*"
/// indexed_variable = "*|{key}_{index}|*"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternEngine {
    pub name: String,
    pub extension: String,
    pub variable: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed_variable: Option<String>,
}

impl PatternEngine {
    pub fn new(
        name: impl Into<String>,
        extension: impl Into<String>,
        variable: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            extension: extension.into(),
            variable: variable.into(),
            indexed_variable: None,
        }
    }

    pub fn with_indexed_variable(mut self, pattern: impl Into<String>) -> Self {
        self.indexed_variable = Some(pattern.into());
        self
    }

    /// Reads and checks an engine definition file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read and
    /// [`Error::EngineDefinition`] when it is not a valid definition.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)?;
        let engine: Self = toml::from_str(&content).map_err(|e| Error::EngineDefinition {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        engine.check().map_err(|reason| Error::EngineDefinition {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(engine)
    }

    fn check(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        if self.extension.trim().is_empty() {
            return Err("extension must not be empty".to_string());
        }
        if !self.variable.contains("{key}") {
            return Err("variable pattern must contain {key}".to_string());
        }
        if let Some(indexed) = &self.indexed_variable {
            if !indexed.contains("{key}") {
                return Err("indexed_variable pattern must contain {key}".to_string());
            }
        }
        Ok(())
    }
}

impl EngineDescriptor for PatternEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn extension(&self) -> &str {
        &self.extension
    }

    fn convert_variable(&self, key: &str, index: Option<usize>) -> String {
        match (index, &self.indexed_variable) {
            (None, _) => self.variable.replace("{key}", key),
            (Some(index), Some(pattern)) => pattern
                .replace("{index}", &index.to_string())
                .replace("{key}", key),
            (Some(index), None) => self.variable.replace("{key}", &format!("{key}_{index}")),
        }
    }
}

/// Engines available for conversion, keyed by extension.
#[derive(Clone)]
pub struct EngineRegistry {
    engines: BTreeMap<String, Arc<dyn EngineDescriptor>>,
    max_loop_iterations: usize,
}

impl fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineRegistry")
            .field("engines", &self.engines.keys().collect::<Vec<_>>())
            .field("max_loop_iterations", &self.max_loop_iterations)
            .finish()
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            engines: BTreeMap::new(),
            max_loop_iterations: PipelineConfig::default().max_loop_iterations,
        }
    }

    /// Creates a registry holding the Liquid (`liquid`) and Handlebars
    /// (`hbs`) engines.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(
            PatternEngine::new("Liquid", "liquid", "{{ {key} }}")
                .with_indexed_variable("{{ {key}_{index} }}"),
        ));
        registry.register(Arc::new(
            PatternEngine::new("Handlebars", "hbs", "{{{key}}}")
                .with_indexed_variable("{{{key}_{index}}}"),
        ));
        registry
    }

    /// Caps how many indexed placeholders a single loop directive expands to.
    pub fn with_max_loop_iterations(mut self, max_loop_iterations: usize) -> Self {
        self.max_loop_iterations = max_loop_iterations;
        self
    }

    /// Adds an engine, replacing any engine with the same extension.
    pub fn register(&mut self, engine: Arc<dyn EngineDescriptor>) {
        if self.engines.contains_key(engine.extension()) {
            debug!("Replacing engine for extension '{}'", engine.extension());
        }
        self.engines.insert(engine.extension().to_string(), engine);
    }

    /// Loads every engine definition file in `dir`.
    ///
    /// Files that cannot be parsed are skipped with a warning, as is a
    /// directory that cannot be read. Returns the number of engines loaded.
    pub fn load_dir(&mut self, dir: &Path) -> usize {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Could not load template engines from {:?}: {}", dir, e);
                return 0;
            }
        };

        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| {
                path.is_file()
                    && path.extension().and_then(|ext| ext.to_str())
                        == Some(ENGINE_DEFINITION_EXTENSION)
            })
            .collect();
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            match PatternEngine::load(&path) {
                Ok(engine) => {
                    info!("Loaded template engine: {} (.{})", engine.name, engine.extension);
                    self.register(Arc::new(engine));
                    loaded += 1;
                }
                Err(e) => warn!("Failed to load engine {:?}: {}", path, e),
            }
        }
        loaded
    }

    pub fn get(&self, extension: &str) -> Option<&dyn EngineDescriptor> {
        self.engines.get(extension).map(|engine| engine.as_ref())
    }

    /// `(extension, name)` pairs sorted by extension.
    pub fn available(&self) -> Vec<(String, String)> {
        self.engines
            .iter()
            .map(|(extension, engine)| (extension.clone(), engine.name().to_string()))
            .collect()
    }

    /// Converts `content` with the engine registered for `extension`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EngineNotFound`] for an unknown extension.
    #[instrument(skip(self, content), fields(len = content.len()))]
    pub fn convert(&self, content: &str, extension: &str) -> Result<String, Error> {
        let engine = self.get(extension).ok_or_else(|| Error::EngineNotFound {
            extension: extension.to_string(),
        })?;
        Ok(convert_content(content, engine, self.max_loop_iterations))
    }
}

fn keyed_directive_regex() -> &'static Regex {
    static KEYED_DIRECTIVE: OnceLock<Regex> = OnceLock::new();
    KEYED_DIRECTIVE.get_or_init(|| {
        Regex::new(r"\{\{([^,}]+),\s*[^}]*\}\}").expect("keyed directive pattern is valid")
    })
}

/// Rewrites every `{{key, value}}` directive in `content` using `engine`.
///
/// A directive on a line inside a `{{loop N}}` block becomes `N` indexed
/// placeholders, one per line, each indented to the directive's column. At
/// most `max_loop_iterations` placeholders are produced per directive.
pub fn convert_content(
    content: &str,
    engine: &dyn EngineDescriptor,
    max_loop_iterations: usize,
) -> String {
    let loop_ranges = find_loop_ranges(content);

    content
        .split('\n')
        .enumerate()
        .map(|(index, line)| {
            let enclosing = range_for_line(&loop_ranges, index + 1);
            keyed_directive_regex()
                .replace_all(line, |captures: &Captures<'_>| {
                    let key = captures[1].trim();
                    match enclosing {
                        Some(range) => {
                            let column = captures
                                .get(0)
                                .map(|m| line[..m.start()].chars().count())
                                .unwrap_or_default();
                            let separator = format!("\n{}", " ".repeat(column));
                            (1..=range.iteration_count.min(max_loop_iterations))
                                .map(|i| engine.convert_variable(key, Some(i)))
                                .collect::<Vec<_>>()
                                .join(&separator)
                        }
                        None => engine.convert_variable(key, None),
                    }
                })
                .into_owned()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
