//! The template processing pipeline.
//!
//! Each invocation runs the same fixed sequence of passes over its text:
//!
//! 1. layouts: `{{layout 'name'}}…{{/layout}}` is replaced by the named layout
//!    with its `{{content}}` markers filled in;
//! 2. includes: `{{include 'name'}}` and `{{component "name"}}` are replaced by
//!    the named component;
//! 3. loops: `{{loop N}}…{{/loop}}` is unrolled;
//! 4. print directives (render mode only).
//!
//! Layouts and components are themselves run through the pipeline before they
//! are spliced in, so nesting works to any depth up to
//! [`PipelineConfig::max_include_depth`]. A component that appears again on
//! its own include chain is not expanded, and a single run expands at most
//! [`PipelineConfig::max_expansions`] components and layouts in total. CSS
//! inlining runs once on the top-level result.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::config::PipelineConfig;
use crate::css::{CssInliner, IdentityInliner};
use crate::loader::ComponentLoader;
use crate::print::PrintResolver;
use crate::structure::{
    depth_limit_marker, expand_loops, expansion_budget_marker, find_includes, find_layouts,
    include_cycle_marker, substitute_content,
};
use crate::variables::VariableResolver;

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;

type ProcessFuture<'a> = Pin<Box<dyn Future<Output = String> + Send + 'a>>;

/// Which passes a pipeline run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingMode {
    /// Every pass, producing previewable HTML.
    Render,
    /// Structural passes only. Print directives are kept so an
    /// [`EngineDescriptor`](crate::EngineDescriptor) can rewrite them.
    Conversion,
}

/// Turns a template into finished HTML or into input for engine conversion.
///
/// The pipeline holds no mutable state and can serve concurrent renders.
///
/// ## Examples
///
/// ```rust
/// use std::sync::Arc;
/// use email_template_engine::{
///     CustomData, InMemoryComponentLoader, TemplatePipeline, VariableResolver,
/// };
///
/// let loader = InMemoryComponentLoader::new().with_component("footer", "<p>Bye {{name}}</p>");
/// let variables = VariableResolver::with_builtin_defaults(
///     CustomData::new().with_literal("name", "Ana"),
/// );
/// let pipeline = TemplatePipeline::new(Arc::new(loader), variables);
///
/// let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// let html = runtime.block_on(pipeline.render("{{include 'footer'}}"));
/// assert_eq!(html, "<p>Bye Ana</p>");
/// ```
pub struct TemplatePipeline {
    loader: Arc<dyn ComponentLoader>,
    variables: VariableResolver,
    inliner: Arc<dyn CssInliner>,
    config: PipelineConfig,
}

impl fmt::Debug for TemplatePipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplatePipeline")
            .field("variables", &self.variables)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TemplatePipeline {
    /// Creates a pipeline with default limits and no CSS inlining.
    pub fn new(loader: Arc<dyn ComponentLoader>, variables: VariableResolver) -> Self {
        Self {
            loader,
            variables,
            inliner: Arc::new(IdentityInliner),
            config: PipelineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_inliner(mut self, inliner: Arc<dyn CssInliner>) -> Self {
        self.inliner = inliner;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn variables(&self) -> &VariableResolver {
        &self.variables
    }

    /// Produces previewable HTML.
    ///
    /// Output is not deterministic when the data contains choice lists or
    /// generators.
    #[instrument(skip_all, fields(len = template.len()))]
    pub async fn render(&self, template: &str) -> String {
        self.process(template, ProcessingMode::Render).await
    }

    /// Expands layouts, components and loops but keeps print directives.
    #[instrument(skip_all, fields(len = template.len()))]
    pub async fn prepare_for_conversion(&self, template: &str) -> String {
        self.process(template, ProcessingMode::Conversion).await
    }

    /// Runs the pipeline in `mode` and inlines CSS on the result.
    pub async fn process(&self, template: &str, mode: ProcessingMode) -> String {
        let expansions = AtomicUsize::new(0);
        let processed = self.process_nested(template, mode, &[], &expansions).await;
        self.inliner.inline(&processed)
    }

    /// Processes `text` reached through the components named in `chain`.
    fn process_nested<'a>(
        &'a self,
        text: &'a str,
        mode: ProcessingMode,
        chain: &'a [String],
        expansions: &'a AtomicUsize,
    ) -> ProcessFuture<'a> {
        Box::pin(async move {
            debug!(
                "Processing {} byte(s) at depth {} in {:?} mode",
                text.len(),
                chain.len(),
                mode
            );

            let text = self.expand_layouts(text, mode, chain, expansions).await;
            let text = self.expand_includes(&text, mode, chain, expansions).await;
            let text = expand_loops(&text, self.config.max_loop_iterations);

            match mode {
                ProcessingMode::Render => PrintResolver::new(&self.variables).resolve(&text),
                ProcessingMode::Conversion => text,
            }
        })
    }

    /// Returns the marker to emit instead of expanding `name`, if expanding it
    /// would repeat a component on the chain or exceed a limit.
    fn refuse_expansion(
        &self,
        name: &str,
        chain: &[String],
        expansions: &AtomicUsize,
    ) -> Option<String> {
        if chain.iter().any(|entry| entry == name) {
            warn!(
                "Include cycle detected at '{}' (chain: {} -> {})",
                name,
                chain.join(" -> "),
                name
            );
            return Some(include_cycle_marker(name));
        }

        if chain.len() >= self.config.max_include_depth {
            warn!(
                "Include depth limit ({}) exceeded at '{}'",
                self.config.max_include_depth, name
            );
            return Some(depth_limit_marker(self.config.max_include_depth, name));
        }

        if expansions.fetch_add(1, Ordering::Relaxed) >= self.config.max_expansions {
            warn!(
                "Include expansion budget ({}) exhausted at '{}'",
                self.config.max_expansions, name
            );
            return Some(expansion_budget_marker(self.config.max_expansions, name));
        }

        None
    }

    async fn expand_layouts(
        &self,
        text: &str,
        mode: ProcessingMode,
        chain: &[String],
        expansions: &AtomicUsize,
    ) -> String {
        let layouts = find_layouts(text);
        if layouts.is_empty() {
            return text.to_string();
        }

        let mut output = String::with_capacity(text.len());
        let mut cursor = 0;
        for layout in layouts {
            output.push_str(&text[cursor..layout.span.start]);
            cursor = layout.span.end;

            let Some(markup) = self.loader.load(&layout.name).await else {
                warn!("Layout '{}' not found, leaving directive unchanged", layout.name);
                output.push_str(&text[layout.span.clone()]);
                continue;
            };

            if let Some(marker) = self.refuse_expansion(&layout.name, chain, expansions) {
                output.push_str(&marker);
                continue;
            }

            let filled = substitute_content(&markup, &text[layout.body.clone()]);
            let nested = extend_chain(chain, &layout.name);
            output.push_str(&self.process_nested(&filled, mode, &nested, expansions).await);
        }
        output.push_str(&text[cursor..]);
        output
    }

    async fn expand_includes(
        &self,
        text: &str,
        mode: ProcessingMode,
        chain: &[String],
        expansions: &AtomicUsize,
    ) -> String {
        let includes = find_includes(text);
        if includes.is_empty() {
            return text.to_string();
        }

        let mut output = String::with_capacity(text.len());
        let mut cursor = 0;
        for include in includes {
            output.push_str(&text[cursor..include.span.start]);
            cursor = include.span.end;

            let Some(markup) = self.loader.load(&include.name).await else {
                warn!("Component '{}' not found, leaving directive unchanged", include.name);
                output.push_str(&text[include.span.clone()]);
                continue;
            };

            if let Some(marker) = self.refuse_expansion(&include.name, chain, expansions) {
                output.push_str(&marker);
                continue;
            }

            let nested = extend_chain(chain, &include.name);
            output.push_str(&self.process_nested(&markup, mode, &nested, expansions).await);
        }
        output.push_str(&text[cursor..]);
        output
    }
}

fn extend_chain(chain: &[String], name: &str) -> Vec<String> {
    let mut nested = Vec::with_capacity(chain.len() + 1);
    nested.extend_from_slice(chain);
    nested.push(name.to_string());
    nested
}
