//! Variable inlining.
//!
//! The recompiler materializes every virtual stack slot as a variable, which leaves
//! the host IR littered with single-use temporaries:
//!
//! ```text
//! loc_3 = ldc 7
//! call System.Console::WriteLine(loc_3)
//! ```
//!
//! This transform folds the value expression of such a temporary into its single use
//! site, producing `call System.Console::WriteLine(ldc 7)`. Inlining is restricted to
//! the safe shape: one assignment, one read, the read sitting in the statement
//! immediately after the assignment in the same block, and a value expression whose
//! evaluation cannot observe or produce effects (no calls, no field/element access), so
//! moving it across the statement boundary cannot change behavior.

use crate::{
    ast::{
        cil::{CilNode, CilOp, CilUnit, VariableId},
        NodeId,
    },
    transform::{EventKind, RecompilerContext, Transform},
    Result,
};

/// Inlines single-definition single-use variables into their use site.
#[derive(Default)]
pub struct VariableInliningTransform;

impl VariableInliningTransform {
    /// Creates the transform.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Whether the expression subtree can be moved across a statement boundary:
    /// no side effects and no reads of mutable program state.
    fn is_movable(unit: &CilUnit, root: NodeId) -> bool {
        unit.arena().descendants(root).iter().all(|&id| match unit.node(id) {
            CilNode::Instruction(instr) => {
                !instr.op.has_side_effects()
                    && !matches!(instr.op, CilOp::Ldfld | CilOp::Ldsfld | CilOp::Ldelem)
            }
            CilNode::VariableExpression(_) => true,
            _ => false,
        })
    }

    /// The statement containing `node` directly under `block`, if any.
    fn containing_statement(unit: &CilUnit, node: NodeId, block: NodeId) -> Option<NodeId> {
        let mut current = node;
        loop {
            let parent = unit.arena().parent(current)?;
            if parent == block {
                return Some(current);
            }
            current = parent;
        }
    }

    /// Attempts to inline one variable; returns `true` on success.
    fn try_inline(unit: &mut CilUnit, variable: VariableId) -> Result<bool> {
        let data = unit.variable(variable);
        if data.assigned_by().len() != 1 || data.used_by().len() != 1 {
            return Ok(false);
        }
        let (Some(&assignment), Some(&use_site)) =
            (data.assigned_by().iter().next(), data.used_by().iter().next())
        else {
            return Ok(false);
        };

        // the assignment must be a direct statement of a block
        let Some(block) = unit.arena().parent(assignment) else {
            return Ok(false);
        };
        if !matches!(unit.node(block), CilNode::Block(_)) {
            return Ok(false);
        }

        // the read must live in the statement immediately after the assignment
        let Some(use_statement) = Self::containing_statement(unit, use_site, block) else {
            return Ok(false);
        };
        let statements = unit.arena().children(block);
        let assignment_index = statements.iter().position(|&s| s == assignment);
        let use_index = statements.iter().position(|&s| s == use_statement);
        match (assignment_index, use_index) {
            (Some(a), Some(u)) if u == a + 1 => {}
            _ => return Ok(false),
        }

        let Some(value) = (match unit.node(assignment) {
            CilNode::Assignment(node) => node.value,
            _ => None,
        }) else {
            return Ok(false);
        };
        if !Self::is_movable(unit, value) {
            return Ok(false);
        }

        let value = unit.detach(value)?;
        unit.replace(use_site, value)?;
        unit.discard(assignment)?;
        Ok(true)
    }
}

impl Transform for VariableInliningTransform {
    fn name(&self) -> &'static str {
        "variable inlining"
    }

    fn apply(&mut self, ctx: &RecompilerContext<'_>, unit: &mut CilUnit) -> Result<bool> {
        let mut changed = false;
        for index in 0..unit.variable_count() {
            let variable = VariableId::new(index);
            if Self::try_inline(unit, variable)? {
                ctx.events.record(
                    EventKind::ExpressionInlined,
                    self.name(),
                    unit.variable(variable).name().to_string(),
                );
                changed = true;
            }
        }
        Ok(changed)
    }
}
