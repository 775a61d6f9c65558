//! Variable type inference.
//!
//! The recompiler initially declares every variable with a placeholder type wide enough
//! for anything the virtual machine's stack slots could hold. This transform narrows
//! each variable to the most specific type common to all values ever assigned to it,
//! and propagates the narrowed type to every read site.
//!
//! # Algorithm
//!
//! For each variable with at least one assignment:
//!
//! 1. Collect the static expression type of every assigning value.
//! 2. Expand each type into its root-first ancestor chain
//!    ([`TypeHierarchy::ancestor_chain`](crate::types::TypeHierarchy::ancestor_chain)).
//! 3. The deepest position where all chains agree names the common base type.
//! 4. If that differs from the declared type (by qualified name), import the common
//!    base into the target image, retype the variable and overwrite the expression
//!    type of every read.
//!
//! Variables with no assignments are left untouched; one sample means no inference
//! basis. Assignments of unrelated types meet at the hierarchy root, which is reported
//! as-is rather than guessing a subtype. Running the transform twice in a row changes
//! nothing on the second run: the narrowed type is its own common base.

use crate::{
    ast::{
        cil::{CilNode, CilUnit, VariableId},
        NodeId,
    },
    transform::{EventKind, RecompilerContext, Transform},
    types::TypeRef,
    Result,
};

/// Narrows variable declarations to the common base type of their assigned values.
#[derive(Default)]
pub struct TypeInferenceTransform;

impl TypeInferenceTransform {
    /// Creates the transform.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// The static type of the value written by an assignment statement, `None` when
    /// the value is absent or untyped.
    fn assigned_value_type(unit: &CilUnit, assignment: NodeId) -> Option<TypeRef> {
        match unit.node(assignment) {
            CilNode::Assignment(node) => node
                .value
                .and_then(|value| unit.node(value).expression_type().cloned()),
            _ => None,
        }
    }
}

impl Transform for TypeInferenceTransform {
    fn name(&self) -> &'static str {
        "type inference"
    }

    fn apply(&mut self, ctx: &RecompilerContext<'_>, unit: &mut CilUnit) -> Result<bool> {
        let mut changed = false;

        for index in 0..unit.variable_count() {
            let variable = VariableId::new(index);
            let assignments: Vec<NodeId> =
                unit.variable(variable).assigned_by().iter().copied().collect();
            if assignments.is_empty() {
                continue;
            }

            let value_types: Vec<Option<TypeRef>> = assignments
                .iter()
                .map(|&assignment| Self::assigned_value_type(unit, assignment))
                .collect();

            let Some(common) = ctx.hierarchy.common_base_type(&value_types)? else {
                continue;
            };
            if unit.variable(variable).declared_type().full_name() == common.full_name() {
                continue;
            }

            let new_type = ctx.resolver.import(&common)?;
            unit.retype_variable(variable, new_type.clone());
            ctx.events.record(
                EventKind::VariableRetyped,
                self.name(),
                format!("{}: {}", unit.variable(variable).name(), new_type),
            );
            changed = true;
        }

        Ok(changed)
    }
}
