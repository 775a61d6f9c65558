//! Dead variable elimination.
//!
//! Devirtualized bodies assign plenty of values nothing ever reads again (flag
//! register updates, dead stack slots, temporaries emptied by inlining). This
//! transform drops assignments to variables with no remaining uses, as long as the
//! assigned value has no side effects; an effectful value keeps its statement even
//! when the stored result is dead.
//!
//! Removing an assignment unregisters the uses inside its value expression, which can
//! make further variables dead; the pipeline's fixpoint loop picks those up on the
//! next pass.

use crate::{
    ast::{
        cil::{CilNode, CilUnit, VariableId},
        NodeId,
    },
    transform::{EventKind, RecompilerContext, Transform},
    Result,
};

/// Removes side-effect-free assignments to unused variables.
#[derive(Default)]
pub struct DeadVariableTransform;

impl DeadVariableTransform {
    /// Creates the transform.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Whether the subtree is free of side effects and safe to delete.
    fn is_pure(unit: &CilUnit, root: NodeId) -> bool {
        unit.arena()
            .descendants(root)
            .iter()
            .all(|&id| match unit.node(id) {
                CilNode::Instruction(instr) => !instr.op.has_side_effects(),
                CilNode::VariableExpression(_) => true,
                _ => false,
            })
    }
}

impl Transform for DeadVariableTransform {
    fn name(&self) -> &'static str {
        "dead variable elimination"
    }

    fn apply(&mut self, ctx: &RecompilerContext<'_>, unit: &mut CilUnit) -> Result<bool> {
        let mut changed = false;

        for index in 0..unit.variable_count() {
            let variable = VariableId::new(index);
            if !unit.variable(variable).used_by().is_empty() {
                continue;
            }

            let assignments: Vec<NodeId> =
                unit.variable(variable).assigned_by().iter().copied().collect();
            for assignment in assignments {
                let value = match unit.node(assignment) {
                    CilNode::Assignment(node) => node.value,
                    _ => continue,
                };
                if let Some(value) = value {
                    if !Self::is_pure(unit, value) {
                        continue;
                    }
                }
                // only drop statements that actually sit in a tree
                if unit.arena().parent(assignment).is_none() {
                    continue;
                }

                unit.discard(assignment)?;
                ctx.events.record(
                    EventKind::DeadAssignmentRemoved,
                    self.name(),
                    unit.variable(variable).name().to_string(),
                );
                changed = true;
            }
        }

        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{
            cil::{CilOp, CilOperand, MemberRef},
            CfgNodeId,
        },
        types::{TypeRef, TypeRegistry},
    };

    fn int32() -> TypeRef {
        TypeRef::named("System", "Int32")
    }

    #[test]
    fn removes_pure_dead_assignment() {
        let registry = TypeRegistry::with_core_types();
        let ctx = RecompilerContext::new(&registry).unwrap();
        let mut unit = CilUnit::new();
        let dead = unit.new_variable("loc_0", int32());

        let seven = unit
            .instruction(CilOp::Ldc, Some(CilOperand::Int(7)), vec![], Some(int32()))
            .unwrap();
        let assignment = unit.assignment(dead, seven).unwrap();
        let block = unit.new_block(CfgNodeId::new(0), vec![assignment]).unwrap();

        let mut transform = DeadVariableTransform::new();
        assert!(transform.apply(&ctx, &mut unit).unwrap());
        assert!(unit.arena().children(block).is_empty());
        assert!(unit.variable(dead).assigned_by().is_empty());
    }

    #[test]
    fn keeps_effectful_dead_assignment() {
        let registry = TypeRegistry::with_core_types();
        let ctx = RecompilerContext::new(&registry).unwrap();
        let mut unit = CilUnit::new();
        let dead = unit.new_variable("loc_0", int32());

        let call = unit
            .instruction(
                CilOp::Call,
                Some(CilOperand::Member(MemberRef::new(
                    TypeRef::named("System", "Console"),
                    "Read",
                ))),
                vec![],
                Some(int32()),
            )
            .unwrap();
        let assignment = unit.assignment(dead, call).unwrap();
        let block = unit.new_block(CfgNodeId::new(0), vec![assignment]).unwrap();

        let mut transform = DeadVariableTransform::new();
        assert!(!transform.apply(&ctx, &mut unit).unwrap());
        assert_eq!(unit.arena().children(block), vec![assignment]);
    }

    #[test]
    fn keeps_assignments_to_used_variables() {
        let registry = TypeRegistry::with_core_types();
        let ctx = RecompilerContext::new(&registry).unwrap();
        let mut unit = CilUnit::new();
        let live = unit.new_variable("loc_0", int32());

        let seven = unit
            .instruction(CilOp::Ldc, Some(CilOperand::Int(7)), vec![], Some(int32()))
            .unwrap();
        let assignment = unit.assignment(live, seven).unwrap();
        let read = unit.variable_expression(live).unwrap();
        let stmt = unit.expression_statement(read).unwrap();
        let _block = unit
            .new_block(CfgNodeId::new(0), vec![assignment, stmt])
            .unwrap();

        let mut transform = DeadVariableTransform::new();
        assert!(!transform.apply(&ctx, &mut unit).unwrap());
    }

    #[test]
    fn cascading_deadness_resolves_over_two_passes() {
        let registry = TypeRegistry::with_core_types();
        let ctx = RecompilerContext::new(&registry).unwrap();
        let mut unit = CilUnit::new();
        let first = unit.new_variable("loc_0", int32());
        let second = unit.new_variable("loc_1", int32());

        // loc_0 = ldc 7; loc_1 = loc_0; nothing reads loc_1
        let seven = unit
            .instruction(CilOp::Ldc, Some(CilOperand::Int(7)), vec![], Some(int32()))
            .unwrap();
        let assign_first = unit.assignment(first, seven).unwrap();
        let read_first = unit.variable_expression(first).unwrap();
        let assign_second = unit.assignment(second, read_first).unwrap();
        let block = unit
            .new_block(CfgNodeId::new(0), vec![assign_first, assign_second])
            .unwrap();

        let mut transform = DeadVariableTransform::new();
        assert!(transform.apply(&ctx, &mut unit).unwrap());
        assert!(transform.apply(&ctx, &mut unit).unwrap());
        assert!(!transform.apply(&ctx, &mut unit).unwrap());
        assert!(unit.arena().children(block).is_empty());
    }
}
