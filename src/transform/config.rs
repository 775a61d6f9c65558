//! Pipeline configuration.

/// Iteration limits and feature switches for a [`TransformPipeline`](crate::transform::TransformPipeline).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum number of full passes over the transform list.
    ///
    /// The standard suite converges in a handful of passes; the cap only exists to cut
    /// off transform pairs that keep undoing each other's changes.
    pub max_iterations: usize,
    /// Whether the standard suite includes type inference.
    pub enable_type_inference: bool,
    /// Whether the standard suite includes variable inlining.
    pub enable_variable_inlining: bool,
    /// Whether the standard suite includes dead variable elimination.
    pub enable_dead_variable_elimination: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            enable_type_inference: true,
            enable_variable_inlining: true,
            enable_dead_variable_elimination: true,
        }
    }
}

impl PipelineConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of full passes.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Enables or disables type inference in the standard suite.
    #[must_use]
    pub fn with_type_inference(mut self, enable: bool) -> Self {
        self.enable_type_inference = enable;
        self
    }

    /// Enables or disables variable inlining in the standard suite.
    #[must_use]
    pub fn with_variable_inlining(mut self, enable: bool) -> Self {
        self.enable_variable_inlining = enable;
        self
    }

    /// Enables or disables dead variable elimination in the standard suite.
    #[must_use]
    pub fn with_dead_variable_elimination(mut self, enable: bool) -> Self {
        self.enable_dead_variable_elimination = enable;
        self
    }
}
