//! Batch recompilation driver.
//!
//! Compilation units share no mutable IR state, so the natural parallelism boundary is
//! one unit per worker. The driver builds a fresh context and pipeline per unit and
//! reports a per-unit outcome; a method body whose pipeline errors is reported as
//! failed, distinct from one that merely stopped at the iteration cap (which is a
//! warning-level condition, not a failure).

use rayon::prelude::*;

use crate::{
    ast::cil::CilUnit,
    transform::{EventLog, PipelineConfig, PipelineStatus, RecompilerContext, TransformPipeline},
    types::TypeResolver,
    Error,
};

/// Result of recompiling one unit.
pub enum UnitOutcome {
    /// The pipeline ran to completion; the status says whether it converged.
    Recompiled {
        /// Convergence status of the run.
        status: PipelineStatus,
        /// Changes recorded during the run.
        events: EventLog,
    },
    /// A transform aborted the unit.
    Failed {
        /// The error that aborted processing.
        error: Error,
    },
}

impl UnitOutcome {
    /// Whether the unit was aborted by an error.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, UnitOutcome::Failed { .. })
    }

    /// Whether the unit ran to a fixpoint.
    #[must_use]
    pub fn converged(&self) -> bool {
        matches!(
            self,
            UnitOutcome::Recompiled { status, .. } if status.converged()
        )
    }
}

/// Runs the standard pipeline over batches of units, one unit per worker.
pub struct Recompiler<'a> {
    resolver: &'a dyn TypeResolver,
    config: PipelineConfig,
}

impl<'a> Recompiler<'a> {
    /// Creates a driver over the given type system.
    #[must_use]
    pub fn new(resolver: &'a dyn TypeResolver, config: PipelineConfig) -> Self {
        Self { resolver, config }
    }

    /// Recompiles every unit in parallel, returning one outcome per unit in order.
    #[must_use]
    pub fn run(&self, units: &mut [CilUnit]) -> Vec<UnitOutcome> {
        units
            .par_iter_mut()
            .map(|unit| self.process_unit(unit))
            .collect()
    }

    /// Recompiles a single unit.
    #[must_use]
    pub fn process_unit(&self, unit: &mut CilUnit) -> UnitOutcome {
        let ctx = match RecompilerContext::new(self.resolver) {
            Ok(ctx) => ctx,
            Err(error) => return UnitOutcome::Failed { error },
        };
        let mut pipeline = TransformPipeline::standard(&self.config);
        match pipeline.run(&ctx, unit) {
            Ok(status) => UnitOutcome::Recompiled {
                status,
                events: ctx.events,
            },
            Err(error) => UnitOutcome::Failed { error },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{cil::CilOp, CfgNodeId},
        types::{TypeRef, TypeRegistry},
    };

    fn simple_unit(registry_type: &TypeRef) -> CilUnit {
        let mut unit = CilUnit::new();
        let variable = unit.new_variable("loc_0", TypeRef::named("System", "Object"));
        let value = unit
            .instruction(CilOp::Ldnull, None, vec![], Some(registry_type.clone()))
            .unwrap();
        let assignment = unit.assignment(variable, value).unwrap();
        let read = unit.variable_expression(variable).unwrap();
        let stmt = unit.expression_statement(read).unwrap();
        unit.new_block(CfgNodeId::new(0), vec![assignment, stmt])
            .unwrap();
        unit
    }

    #[test]
    fn processes_units_independently() {
        let registry = TypeRegistry::with_core_types();
        let string = TypeRef::named("System", "String");
        let mut units = vec![simple_unit(&string), simple_unit(&string)];

        let recompiler = Recompiler::new(&registry, PipelineConfig::default());
        let outcomes = recompiler.run(&mut units);

        assert_eq!(outcomes.len(), 2);
        for outcome in &outcomes {
            assert!(outcome.converged());
            assert!(!outcome.is_failed());
        }
        for unit in &units {
            let variable = crate::ast::cil::VariableId::new(0);
            assert_eq!(unit.variable(variable).declared_type(), &string);
        }
    }

    #[test]
    fn failed_unit_is_reported_not_dropped() {
        let registry = TypeRegistry::with_core_types();
        // the assigned value's type is unknown to the registry, so type
        // inference errors while resolving its hierarchy
        let missing = TypeRef::named("Missing", "Type");
        let mut units = vec![simple_unit(&missing)];

        let recompiler = Recompiler::new(&registry, PipelineConfig::default());
        let outcomes = recompiler.run(&mut units);

        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].is_failed());
        match &outcomes[0] {
            UnitOutcome::Failed { error } => {
                assert!(matches!(error, Error::Transform { .. }));
            }
            UnitOutcome::Recompiled { .. } => panic!("expected failure"),
        }
    }
}
