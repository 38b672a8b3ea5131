//! Component and layout loading.
//!
//! Include, component and layout directives name a piece of markup that lives
//! outside the template. The pipeline asks a [`ComponentLoader`] for it; a
//! missing or unreadable component is simply "not found" and the directive is
//! left in place.

use std::collections::{BTreeSet, HashMap};
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::errors::Error;

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;

/// File extension shared by components and layouts.
pub const COMPONENT_EXTENSION: &str = "html";

/// Trait for fetching named components and layouts.
#[async_trait]
pub trait ComponentLoader: Send + Sync {
    /// Returns the markup for `name`, or `None` when it cannot be found.
    async fn load(&self, name: &str) -> Option<String>;
}

/// Loads components from `<root>/<name>.html`.
#[derive(Debug, Clone)]
pub struct FileSystemComponentLoader {
    root: PathBuf,
}

impl FileSystemComponentLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a component name to its file, rejecting names that would escape
    /// the components directory.
    fn component_path(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() || name.contains('\0') {
            return None;
        }

        let relative = Path::new(name);
        if relative.is_absolute() {
            return None;
        }

        let only_normal = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if !only_normal {
            return None;
        }

        Some(self.root.join(format!("{name}.{COMPONENT_EXTENSION}")))
    }
}

#[async_trait]
impl ComponentLoader for FileSystemComponentLoader {
    async fn load(&self, name: &str) -> Option<String> {
        let Some(path) = self.component_path(name) else {
            warn!("Rejected unsafe component name '{}'", name);
            return None;
        };

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                debug!("Loaded component '{}' from {:?}", name, path);
                Some(content)
            }
            Err(e) => {
                warn!("Error reading component '{}' from {:?}: {}", name, path, e);
                None
            }
        }
    }
}

/// Serves components from memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryComponentLoader {
    components: HashMap<String, String>,
}

impl InMemoryComponentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a component and returns the loader.
    pub fn with_component(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.components.insert(name.into(), content.into());
        self
    }

    /// Names of every registered component.
    pub fn names(&self) -> BTreeSet<String> {
        self.components.keys().cloned().collect()
    }
}

#[async_trait]
impl ComponentLoader for InMemoryComponentLoader {
    async fn load(&self, name: &str) -> Option<String> {
        self.components.get(name).cloned()
    }
}

/// Lists every component under `root`.
///
/// Names are paths relative to `root`, `/`-separated and without the
/// `.html` extension, so `root/buttons/primary.html` becomes
/// `buttons/primary`.
///
/// # Errors
///
/// Returns [`Error::ComponentsDirectory`] when `root` is not a readable
/// directory.
pub fn scan_component_names(root: &Path) -> Result<BTreeSet<String>, Error> {
    if !root.is_dir() {
        return Err(Error::ComponentsDirectory {
            path: root.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    let mut names = BTreeSet::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|e| Error::ComponentsDirectory {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?;

        let path = entry.path();
        let is_component = entry.file_type().is_file()
            && path.extension().and_then(|ext| ext.to_str()) == Some(COMPONENT_EXTENSION);
        if !is_component {
            continue;
        }

        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        let name = relative
            .with_extension("")
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");

        if !name.is_empty() {
            names.insert(name);
        }
    }

    debug!("Found {} component(s) in {:?}", names.len(), root);
    Ok(names)
}
