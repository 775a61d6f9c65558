//! Plain-text rendering of virtual-machine-level IR trees.

use crate::ast::{
    arena::AstArena,
    il::{
        accept, IlAssignment, IlAstVisitor, IlBlock, IlExpressionStatement, IlInstruction, IlNode,
        IlPhi, IlVariableExpression,
    },
    NodeId,
};

/// Renders nodes in the disassembler's listing style.
#[derive(Default)]
pub struct IlAstFormatter;

impl IlAstFormatter {
    /// Creates a formatter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Formats one node.
    #[must_use]
    pub fn format(&mut self, arena: &AstArena<IlNode>, id: NodeId) -> String {
        accept(arena, id, self)
    }
}

impl IlAstVisitor for IlAstFormatter {
    type Output = String;

    fn visit_block(&mut self, arena: &AstArena<IlNode>, _id: NodeId, block: &IlBlock) -> String {
        let lines: Vec<String> = block
            .statements
            .iter()
            .map(|&statement| accept(arena, statement, self))
            .collect();
        lines.join("\n")
    }

    fn visit_assignment(
        &mut self,
        arena: &AstArena<IlNode>,
        _id: NodeId,
        assignment: &IlAssignment,
    ) -> String {
        let value = match assignment.value {
            Some(value) => accept(arena, value, self),
            None => "?".to_string(),
        };
        format!("{} = {}", assignment.variable, value)
    }

    fn visit_expression_statement(
        &mut self,
        arena: &AstArena<IlNode>,
        _id: NodeId,
        statement: &IlExpressionStatement,
    ) -> String {
        match statement.expression {
            Some(expression) => accept(arena, expression, self),
            None => "?".to_string(),
        }
    }

    fn visit_instruction(
        &mut self,
        arena: &AstArena<IlNode>,
        _id: NodeId,
        instruction: &IlInstruction,
    ) -> String {
        let mut text = instruction.opcode.to_string();
        if let Some(operand) = &instruction.operand {
            text.push(' ');
            text.push_str(&operand.to_string());
        }
        if !instruction.arguments.is_empty() {
            let arguments: Vec<String> = instruction
                .arguments
                .iter()
                .map(|&argument| accept(arena, argument, self))
                .collect();
            text.push('(');
            text.push_str(&arguments.join(", "));
            text.push(')');
        }
        text
    }

    fn visit_variable_expression(
        &mut self,
        _arena: &AstArena<IlNode>,
        _id: NodeId,
        expression: &IlVariableExpression,
    ) -> String {
        expression.variable.clone()
    }

    fn visit_phi(&mut self, arena: &AstArena<IlNode>, _id: NodeId, phi: &IlPhi) -> String {
        let sources: Vec<String> = phi
            .sources
            .iter()
            .map(|&source| accept(arena, source, self))
            .collect();
        format!("phi({})", sources.join(", "))
    }
}
