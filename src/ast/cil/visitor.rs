//! Visitor dispatch for the host-level dialect.
//!
//! Consumers implement one handler per concrete node kind; there is no default or
//! fallback handler, so adding a node kind is a compile-time exhaustiveness exercise
//! for every consumer. The void-effect form is the `Output = ()` instantiation.

use crate::ast::{
    cil::{
        CilAssignment, CilBlock, CilExpressionStatement, CilInstruction, CilNode, CilUnit,
        CilVariableExpression,
    },
    NodeId,
};

/// One handler per host-level node kind.
pub trait CilAstVisitor {
    /// Result produced per visited node.
    type Output;

    /// Visits a block.
    fn visit_block(&mut self, unit: &CilUnit, id: NodeId, block: &CilBlock) -> Self::Output;

    /// Visits an assignment statement.
    fn visit_assignment(
        &mut self,
        unit: &CilUnit,
        id: NodeId,
        assignment: &CilAssignment,
    ) -> Self::Output;

    /// Visits an expression statement.
    fn visit_expression_statement(
        &mut self,
        unit: &CilUnit,
        id: NodeId,
        statement: &CilExpressionStatement,
    ) -> Self::Output;

    /// Visits an instruction expression.
    fn visit_instruction(
        &mut self,
        unit: &CilUnit,
        id: NodeId,
        instruction: &CilInstruction,
    ) -> Self::Output;

    /// Visits a variable read expression.
    fn visit_variable_expression(
        &mut self,
        unit: &CilUnit,
        id: NodeId,
        expression: &CilVariableExpression,
    ) -> Self::Output;
}

/// Dispatches `id` to the visitor handler matching its concrete kind.
pub fn accept<V: CilAstVisitor>(unit: &CilUnit, id: NodeId, visitor: &mut V) -> V::Output {
    match unit.node(id) {
        CilNode::Block(block) => visitor.visit_block(unit, id, block),
        CilNode::Assignment(assignment) => visitor.visit_assignment(unit, id, assignment),
        CilNode::ExpressionStatement(statement) => {
            visitor.visit_expression_statement(unit, id, statement)
        }
        CilNode::Instruction(instruction) => visitor.visit_instruction(unit, id, instruction),
        CilNode::VariableExpression(expression) => {
            visitor.visit_variable_expression(unit, id, expression)
        }
    }
}
