//! The fixpoint pipeline driver.
//!
//! Runs an ordered list of transforms over one compilation unit, repeating the full
//! pass while any transform reports a change, up to a configured iteration cap. Hitting
//! the cap is not an error: the driver reports it as a distinct status so the caller
//! can decide between accepting the best-effort result and failing the unit.

use crate::{
    ast::cil::CilUnit,
    transform::{
        passes::{DeadVariableTransform, TypeInferenceTransform, VariableInliningTransform},
        PipelineConfig, RecompilerContext, Transform,
    },
    Error, Result,
};

/// Outcome of a pipeline run that did not error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStatus {
    /// A full pass reported no change.
    Converged {
        /// Number of full passes executed, including the final quiet one.
        iterations: usize,
    },
    /// The iteration cap was hit while transforms were still reporting changes.
    IterationLimit {
        /// Number of full passes executed.
        iterations: usize,
    },
}

impl PipelineStatus {
    /// Whether the pipeline reached a fixpoint.
    #[must_use]
    pub fn converged(&self) -> bool {
        matches!(self, PipelineStatus::Converged { .. })
    }

    /// Number of full passes executed.
    #[must_use]
    pub fn iterations(&self) -> usize {
        match *self {
            PipelineStatus::Converged { iterations } | PipelineStatus::IterationLimit { iterations } => {
                iterations
            }
        }
    }
}

/// Ordered transform list plus iteration policy.
pub struct TransformPipeline {
    transforms: Vec<Box<dyn Transform>>,
    max_iterations: usize,
}

impl TransformPipeline {
    /// Creates an empty pipeline with the given configuration.
    #[must_use]
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            transforms: Vec::new(),
            max_iterations: config.max_iterations,
        }
    }

    /// Creates the standard suite in its canonical order: type inference, variable
    /// inlining, dead variable elimination, honoring the configuration's switches.
    #[must_use]
    pub fn standard(config: &PipelineConfig) -> Self {
        let mut pipeline = Self::new(config);
        if config.enable_type_inference {
            pipeline.add(Box::new(TypeInferenceTransform::new()));
        }
        if config.enable_variable_inlining {
            pipeline.add(Box::new(VariableInliningTransform::new()));
        }
        if config.enable_dead_variable_elimination {
            pipeline.add(Box::new(DeadVariableTransform::new()));
        }
        pipeline
    }

    /// Appends a transform to the list.
    pub fn add(&mut self, transform: Box<dyn Transform>) {
        self.transforms.push(transform);
    }

    /// Names of the transforms in list order.
    #[must_use]
    pub fn transform_names(&self) -> Vec<&'static str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }

    /// Runs the pipeline over a unit until fixpoint or the iteration cap.
    ///
    /// # Errors
    ///
    /// The first transform error aborts the run, wrapped with the failing transform's
    /// name. No partial-result recovery is attempted.
    pub fn run(
        &mut self,
        ctx: &RecompilerContext<'_>,
        unit: &mut CilUnit,
    ) -> Result<PipelineStatus> {
        for iteration in 0..self.max_iterations {
            let mut pass_changed = false;
            for transform in &mut self.transforms {
                let name = transform.name();
                let changed = transform.apply(ctx, unit).map_err(|source| Error::Transform {
                    transform: name,
                    source: Box::new(source),
                })?;
                pass_changed |= changed;
            }
            if !pass_changed {
                return Ok(PipelineStatus::Converged {
                    iterations: iteration + 1,
                });
            }
        }
        Ok(PipelineStatus::IterationLimit {
            iterations: self.max_iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeRegistry;

    /// Transform that reports a change for a fixed number of invocations.
    struct CountedTransform {
        name: &'static str,
        remaining: usize,
    }

    impl Transform for CountedTransform {
        fn name(&self) -> &'static str {
            self.name
        }

        fn apply(&mut self, _ctx: &RecompilerContext<'_>, _unit: &mut CilUnit) -> Result<bool> {
            if self.remaining > 0 {
                self.remaining -= 1;
                Ok(true)
            } else {
                Ok(false)
            }
        }
    }

    /// Transform that always reports a change, simulating one half of an
    /// oscillating pair.
    struct OscillatingTransform;

    impl Transform for OscillatingTransform {
        fn name(&self) -> &'static str {
            "oscillating"
        }

        fn apply(&mut self, _ctx: &RecompilerContext<'_>, _unit: &mut CilUnit) -> Result<bool> {
            Ok(true)
        }
    }

    struct FailingTransform;

    impl Transform for FailingTransform {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn apply(&mut self, _ctx: &RecompilerContext<'_>, _unit: &mut CilUnit) -> Result<bool> {
            Err(Error::TypeNotFound("Missing.Type".to_string()))
        }
    }

    #[test]
    fn converges_when_changes_stop() {
        let registry = TypeRegistry::with_core_types();
        let ctx = RecompilerContext::new(&registry).unwrap();
        let mut unit = CilUnit::new();

        let config = PipelineConfig::new().with_max_iterations(10);
        let mut pipeline = TransformPipeline::new(&config);
        pipeline.add(Box::new(CountedTransform {
            name: "counted",
            remaining: 2,
        }));

        let status = pipeline.run(&ctx, &mut unit).unwrap();
        // two changing passes plus the final quiet one
        assert_eq!(status, PipelineStatus::Converged { iterations: 3 });
        assert!(status.converged());
    }

    #[test]
    fn oscillating_transforms_hit_iteration_cap() {
        let registry = TypeRegistry::with_core_types();
        let ctx = RecompilerContext::new(&registry).unwrap();
        let mut unit = CilUnit::new();

        let config = PipelineConfig::new().with_max_iterations(5);
        let mut pipeline = TransformPipeline::new(&config);
        pipeline.add(Box::new(OscillatingTransform));
        pipeline.add(Box::new(OscillatingTransform));

        let status = pipeline.run(&ctx, &mut unit).unwrap();
        assert_eq!(status, PipelineStatus::IterationLimit { iterations: 5 });
        assert!(!status.converged());
    }

    #[test]
    fn transform_error_aborts_run_with_attribution() {
        let registry = TypeRegistry::with_core_types();
        let ctx = RecompilerContext::new(&registry).unwrap();
        let mut unit = CilUnit::new();

        let config = PipelineConfig::default();
        let mut pipeline = TransformPipeline::new(&config);
        pipeline.add(Box::new(FailingTransform));

        let result = pipeline.run(&ctx, &mut unit);
        match result {
            Err(Error::Transform { transform, source }) => {
                assert_eq!(transform, "failing");
                assert!(matches!(*source, Error::TypeNotFound(_)));
            }
            other => panic!("expected transform error, got {other:?}"),
        }
    }

    #[test]
    fn standard_suite_order() {
        let config = PipelineConfig::default();
        let pipeline = TransformPipeline::standard(&config);
        assert_eq!(
            pipeline.transform_names(),
            ["type inference", "variable inlining", "dead variable elimination"]
        );
    }

    #[test]
    fn empty_pipeline_converges_immediately() {
        let registry = TypeRegistry::with_core_types();
        let ctx = RecompilerContext::new(&registry).unwrap();
        let mut unit = CilUnit::new();

        let config = PipelineConfig::default();
        let mut pipeline = TransformPipeline::new(&config);
        let status = pipeline.run(&ctx, &mut unit).unwrap();
        assert_eq!(status, PipelineStatus::Converged { iterations: 1 });
    }
}
