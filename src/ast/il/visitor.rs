//! Visitor dispatch for the virtual-machine-level dialect.
//!
//! Same shape as the host-level visitor: one handler per concrete node kind, no
//! fallback, with the void-effect form being the `Output = ()` instantiation.

use crate::ast::{
    arena::AstArena,
    il::{
        IlAssignment, IlBlock, IlExpressionStatement, IlInstruction, IlNode, IlPhi,
        IlVariableExpression,
    },
    NodeId,
};

/// One handler per virtual-machine-level node kind.
pub trait IlAstVisitor {
    /// Result produced per visited node.
    type Output;

    /// Visits a block.
    fn visit_block(&mut self, arena: &AstArena<IlNode>, id: NodeId, block: &IlBlock)
        -> Self::Output;

    /// Visits a slot assignment statement.
    fn visit_assignment(
        &mut self,
        arena: &AstArena<IlNode>,
        id: NodeId,
        assignment: &IlAssignment,
    ) -> Self::Output;

    /// Visits an expression statement.
    fn visit_expression_statement(
        &mut self,
        arena: &AstArena<IlNode>,
        id: NodeId,
        statement: &IlExpressionStatement,
    ) -> Self::Output;

    /// Visits an instruction expression.
    fn visit_instruction(
        &mut self,
        arena: &AstArena<IlNode>,
        id: NodeId,
        instruction: &IlInstruction,
    ) -> Self::Output;

    /// Visits a slot read expression.
    fn visit_variable_expression(
        &mut self,
        arena: &AstArena<IlNode>,
        id: NodeId,
        expression: &IlVariableExpression,
    ) -> Self::Output;

    /// Visits a join-point merge expression.
    fn visit_phi(&mut self, arena: &AstArena<IlNode>, id: NodeId, phi: &IlPhi) -> Self::Output;
}

/// Dispatches `id` to the visitor handler matching its concrete kind.
pub fn accept<V: IlAstVisitor>(arena: &AstArena<IlNode>, id: NodeId, visitor: &mut V) -> V::Output {
    match arena.payload(id) {
        IlNode::Block(block) => visitor.visit_block(arena, id, block),
        IlNode::Assignment(assignment) => visitor.visit_assignment(arena, id, assignment),
        IlNode::ExpressionStatement(statement) => {
            visitor.visit_expression_statement(arena, id, statement)
        }
        IlNode::Instruction(instruction) => visitor.visit_instruction(arena, id, instruction),
        IlNode::VariableExpression(expression) => {
            visitor.visit_variable_expression(arena, id, expression)
        }
        IlNode::Phi(phi) => visitor.visit_phi(arena, id, phi),
    }
}
