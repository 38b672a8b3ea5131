//! Custom data tables and variable resolution.
//!
//! Templates print sample data through directives such as `{{first_name}}` or
//! `{{greeting, salutation}}`. The values come from two layers: the built-in
//! defaults (see [`crate::defaults`]) and caller-supplied overrides. Each value
//! is a [`DataValue`]: a literal, a list to pick from at random, or a
//! generator closure.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use rand::seq::SliceRandom;

use crate::errors::Error;

#[cfg(test)]
#[path = "variables_tests.rs"]
mod tests;

/// A zero-argument value generator.
///
/// Returning `Err` signals that no value could be produced; the message is
/// logged by the print resolver.
pub type Generator = Arc<dyn Fn() -> Result<String, String> + Send + Sync>;

/// A single entry of a custom data table.
#[derive(Clone)]
pub enum DataValue {
    /// Returned as-is.
    Literal(String),

    /// One element is chosen uniformly at random on every resolution.
    OneOf(Vec<String>),

    /// Invoked on every resolution.
    Generated(Generator),
}

impl DataValue {
    /// Wraps a closure as a [`DataValue::Generated`] value.
    pub fn generated<F>(generator: F) -> Self
    where
        F: Fn() -> Result<String, String> + Send + Sync + 'static,
    {
        DataValue::Generated(Arc::new(generator))
    }

    /// Produces a concrete value.
    fn produce(&self, key: &str) -> Result<String, Error> {
        match self {
            DataValue::Literal(value) => Ok(value.clone()),
            DataValue::OneOf(choices) => Ok(choices
                .choose(&mut rand::thread_rng())
                .cloned()
                .unwrap_or_default()),
            DataValue::Generated(generator) => generator().map_err(|message| Error::Generation {
                key: key.to_string(),
                message,
            }),
        }
    }
}

impl fmt::Debug for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            DataValue::OneOf(choices) => f.debug_tuple("OneOf").field(choices).finish(),
            DataValue::Generated(_) => f.write_str("Generated(..)"),
        }
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::Literal(value.to_string())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::Literal(value)
    }
}

impl From<Vec<String>> for DataValue {
    fn from(choices: Vec<String>) -> Self {
        DataValue::OneOf(choices)
    }
}

/// A mapping from variable name to [`DataValue`].
#[derive(Debug, Clone, Default)]
pub struct CustomData {
    entries: HashMap<String, DataValue>,
}

impl CustomData {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<DataValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Adds a literal value.
    pub fn with_literal(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, DataValue::Literal(value.into()));
        self
    }

    /// Adds a list of candidates, one of which is picked per resolution.
    pub fn with_choices<I, S>(mut self, key: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let choices = choices.into_iter().map(Into::into).collect();
        self.insert(key, DataValue::OneOf(choices));
        self
    }

    /// Adds a generator closure.
    pub fn with_generator<F>(mut self, key: impl Into<String>, generator: F) -> Self
    where
        F: Fn() -> Result<String, String> + Send + Sync + 'static,
    {
        self.insert(key, DataValue::generated(generator));
        self
    }

    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for CustomData
where
    K: Into<String>,
    V: Into<DataValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut data = CustomData::new();
        for (key, value) in iter {
            data.insert(key, value);
        }
        data
    }
}

/// Where a known variable comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableSource {
    /// Only the built-in defaults define it.
    Default,
    /// Caller-supplied data defines it, possibly shadowing a default.
    Custom,
}

/// Resolves variable names against defaults layered under caller overrides.
///
/// Resolution is intentionally **not deterministic**: list values pick a
/// random element and generators are invoked on every call, so the same key
/// can produce different sample values across (or within) renders. A key that
/// neither layer defines resolves to the key itself, which keeps the
/// placeholder visible in the preview instead of failing the render.
#[derive(Debug, Clone)]
pub struct VariableResolver {
    defaults: Arc<CustomData>,
    overrides: CustomData,
}

impl VariableResolver {
    /// Creates a resolver over the given defaults and overrides.
    pub fn new(defaults: Arc<CustomData>, overrides: CustomData) -> Self {
        Self {
            defaults,
            overrides,
        }
    }

    /// Creates a resolver over the built-in defaults.
    pub fn with_builtin_defaults(overrides: CustomData) -> Self {
        Self::new(crate::defaults::builtin(), overrides)
    }

    /// Resolves `key` to a concrete value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Generation`] only when a generator fails. Unknown keys
    /// are not an error: they resolve to `key` itself.
    pub fn resolve(&self, key: &str) -> Result<String, Error> {
        match self.lookup(key) {
            Some(value) => value.produce(key),
            None => Ok(key.to_string()),
        }
    }

    /// Whether either layer defines `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.overrides.contains_key(key) || self.defaults.contains_key(key)
    }

    /// Sorted names of every known variable.
    pub fn keys(&self) -> Vec<String> {
        self.defaults
            .keys()
            .chain(self.overrides.keys())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Reports which layer `key` resolves from, if any.
    pub fn source_of(&self, key: &str) -> Option<VariableSource> {
        if self.overrides.contains_key(key) {
            Some(VariableSource::Custom)
        } else if self.defaults.contains_key(key) {
            Some(VariableSource::Default)
        } else {
            None
        }
    }

    fn lookup(&self, key: &str) -> Option<&DataValue> {
        self.overrides.get(key).or_else(|| self.defaults.get(key))
    }
}
