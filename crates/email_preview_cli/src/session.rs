//! Wiring between the CLI configuration and the template engine.
//!
//! A [`PreviewSession`] owns the loaded configuration and the variable
//! resolver built from it, and hands out the engine objects each command
//! needs.

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use email_template_engine::{
    scan_component_names, CssInliner, EngineRegistry, FileSystemComponentLoader, IdentityInliner,
    StyleHoistingInliner, TemplatePipeline, TemplateValidator, VariableResolver,
};
use tracing::{debug, warn};

use crate::{
    commands::ConfigArgs,
    config::{get_config_path, AppConfig},
    errors::Error,
};

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;

/// Configuration plus sample data for one CLI invocation.
#[derive(Debug, Clone)]
pub struct PreviewSession {
    config: AppConfig,
    variables: VariableResolver,
}

impl PreviewSession {
    /// Builds a session, layering `overrides` over the `[data]` table.
    pub fn new(config: AppConfig, overrides: &[(String, String)]) -> Self {
        let mut data = config.custom_data();
        for (key, value) in overrides {
            data.insert(key.clone(), value.clone());
        }

        let variables = VariableResolver::with_builtin_defaults(data);
        Self { config, variables }
    }

    /// Loads the configuration named by `args` and builds a session.
    pub fn load(args: &ConfigArgs, overrides: &[(String, String)]) -> Result<Self, Error> {
        let path = get_config_path(args.config.as_deref());
        let config = AppConfig::load(&path)?;
        Ok(Self::new(config, overrides))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn variables(&self) -> &VariableResolver {
        &self.variables
    }

    /// A pipeline reading components from the configured directory.
    pub fn pipeline(&self) -> TemplatePipeline {
        let loader = FileSystemComponentLoader::new(self.config.components_dir());
        let inliner: Arc<dyn CssInliner> = if self.config.css.inline {
            Arc::new(StyleHoistingInliner)
        } else {
            Arc::new(IdentityInliner)
        };

        TemplatePipeline::new(Arc::new(loader), self.variables.clone())
            .with_config(self.config.limits.clone())
            .with_inliner(inliner)
    }

    /// A validator knowing every variable and every component on disk.
    ///
    /// An unreadable components directory is reported as a warning and
    /// leaves the component catalog empty.
    pub fn validator(&self) -> TemplateValidator {
        let components_dir = self.config.components_dir();
        let components = scan_component_names(&components_dir).unwrap_or_else(|e| {
            warn!("Could not scan components directory: {}", e);
            BTreeSet::new()
        });
        debug!("Validating against {} component(s)", components.len());

        TemplateValidator::from_resolver(&self.variables, components)
    }

    /// Built-in engines plus any defined in the configured engines directory.
    pub fn engines(&self) -> EngineRegistry {
        let mut registry = EngineRegistry::with_builtin()
            .with_max_loop_iterations(self.config.limits.max_loop_iterations);
        if let Some(dir) = self.config.engines_dir() {
            registry.load_dir(&dir);
        }
        registry
    }

    /// Locates a template given on the command line.
    ///
    /// A path that exists as given is used unchanged. Otherwise the path is
    /// looked up inside the configured emails directory, so
    /// `email-preview render welcome.html` finds `emails/welcome.html`.
    pub fn template_path(&self, template: &Path) -> PathBuf {
        if template.is_absolute() || template.exists() {
            return template.to_path_buf();
        }

        match self.config.emails_dir() {
            Some(dir) if dir.join(template).is_file() => {
                let candidate = dir.join(template);
                debug!("Resolved template {:?} to {:?}", template, candidate);
                candidate
            }
            _ => template.to_path_buf(),
        }
    }
}

/// Reads a template file.
pub fn read_template(path: &Path) -> Result<String, Error> {
    debug!("Reading template {:?}", path);
    fs::read_to_string(path).map_err(Error::LoadFile)
}

/// Writes `content` to `output`, or to stdout when no path is given.
pub fn write_output(output: Option<&Path>, content: &str) -> Result<(), Error> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(Error::LoadFile)?;
            }
            fs::write(path, content).map_err(Error::LoadFile)?;
            debug!("Wrote {} byte(s) to {:?}", content.len(), path);
        }
        None => println!("{}", content),
    }
    Ok(())
}
