use serde::{Deserialize, Serialize};

/// Resource limits for template processing.
///
/// Include, component and layout expansion recurse back into the pipeline,
/// and loops multiply their bodies. These limits bound both.
///
/// ## Examples
///
/// ```rust
/// use email_template_engine::PipelineConfig;
///
/// let config = PipelineConfig {
///     max_include_depth: 8,
///     ..Default::default()
/// };
/// assert_eq!(config.max_loop_iterations, 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum nesting of include/component/layout expansion.
    ///
    /// Past this depth the directive is replaced with an HTML comment
    /// explaining that the limit was hit.
    ///
    /// **Default**: 32
    pub max_include_depth: usize,

    /// Largest accepted `{{loop N}}` count.
    ///
    /// Loops asking for more iterations are left unexpanded.
    ///
    /// **Default**: 1000
    pub max_loop_iterations: usize,

    /// Total number of include, component and layout expansions a single
    /// render or conversion may perform.
    ///
    /// Bounds templates that fan out through many distinct components. Once
    /// spent, further directives are replaced with an HTML comment.
    ///
    /// **Default**: 10000
    pub max_expansions: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_include_depth: 32,
            max_loop_iterations: 1000,
            max_expansions: 10_000,
        }
    }
}
