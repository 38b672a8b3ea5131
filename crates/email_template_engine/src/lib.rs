//! Email template engine
//!
//! This crate turns email templates written in a small directive language into
//! previewable HTML, checks them for mistakes, and rewrites them into the
//! placeholder syntax of other template engines.
//!
//! ## Directive language
//!
//! | Directive | Meaning |
//! |---|---|
//! | `{{key}}` | print a variable |
//! | `{{key, 'text'}}` / `{{key, other_key}}` | print a literal or another variable |
//! | `{{key\|method}}` | deprecated; prints `key`, `method` is ignored |
//! | `{{loop N}}…{{/loop}}` | repeat the body `N` times |
//! | `{{_index}}` / `{{_index1}}` | 0-based / 1-based loop iteration |
//! | `{{key+, value}}` | inside a loop, becomes `{{key_<i>, value}}` |
//! | `{{include 'name'}}` / `{{component "name"}}` | splice in a component |
//! | `{{layout 'name'}}…{{/layout}}` | wrap the body in a layout at `{{content}}` |
//!
//! ## Main types
//!
//! - [`TemplatePipeline`] renders templates ([`TemplatePipeline::render`]) or
//!   prepares them for conversion ([`TemplatePipeline::prepare_for_conversion`]).
//! - [`VariableResolver`] supplies values, layering caller data over
//!   randomized built-in sample data.
//! - [`TemplateValidator`] reports problems without rendering.
//! - [`EngineRegistry`] converts prepared templates into another engine's
//!   syntax.
//! - [`ComponentLoader`] and [`CssInliner`] are the seams for component
//!   storage and CSS handling.
//!
//! Rendering is fail-open: unknown variables print their own name, missing
//! components stay visible as directive text and failing generators leave the
//! directive in place. Validation and conversion report problems explicitly.

mod config;
mod converter;
mod css;
mod defaults;
mod errors;
mod loader;
mod loops;
mod pipeline;
mod print;
pub mod scanner;
mod structure;
mod validator;
mod variables;

pub use config::PipelineConfig;
pub use converter::{
    convert_content, EngineDescriptor, EngineRegistry, PatternEngine,
    ENGINE_DEFINITION_EXTENSION,
};
pub use css::{CssInliner, IdentityInliner, StyleHoistingInliner};
pub use defaults::builtin as builtin_defaults;
pub use errors::Error;
pub use loader::{
    scan_component_names, ComponentLoader, FileSystemComponentLoader, InMemoryComponentLoader,
    COMPONENT_EXTENSION,
};
pub use loops::{find_loop_ranges, range_for_line, LoopRange};
pub use pipeline::{ProcessingMode, TemplatePipeline};
pub use print::PrintResolver;
pub use validator::{
    Severity, TemplateValidator, ValidationIssue, ValidationResult, ValidationStatus,
};
pub use variables::{CustomData, DataValue, Generator, VariableResolver, VariableSource};
