//! Plain-text rendering of host-level IR trees.

use crate::ast::{
    cil::{
        accept, CilAssignment, CilAstVisitor, CilBlock, CilExpressionStatement, CilInstruction,
        CilUnit, CilVariableExpression,
    },
    NodeId,
};

/// Renders nodes as single-line pseudo assembly, one statement per line inside blocks.
///
/// Used by diagnostics and the DOT exporter; the output is for humans, not for
/// re-parsing.
#[derive(Default)]
pub struct CilAstFormatter;

impl CilAstFormatter {
    /// Creates a formatter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Formats one node (statements recursively include their expressions).
    #[must_use]
    pub fn format(&mut self, unit: &CilUnit, id: NodeId) -> String {
        accept(unit, id, self)
    }
}

impl CilAstVisitor for CilAstFormatter {
    type Output = String;

    fn visit_block(&mut self, unit: &CilUnit, _id: NodeId, block: &CilBlock) -> String {
        let lines: Vec<String> = block
            .statements
            .iter()
            .map(|&statement| accept(unit, statement, self))
            .collect();
        lines.join("\n")
    }

    fn visit_assignment(
        &mut self,
        unit: &CilUnit,
        _id: NodeId,
        assignment: &CilAssignment,
    ) -> String {
        let value = match assignment.value {
            Some(value) => accept(unit, value, self),
            None => "?".to_string(),
        };
        format!("{} = {}", unit.variable(assignment.variable).name(), value)
    }

    fn visit_expression_statement(
        &mut self,
        unit: &CilUnit,
        _id: NodeId,
        statement: &CilExpressionStatement,
    ) -> String {
        match statement.expression {
            Some(expression) => accept(unit, expression, self),
            None => "?".to_string(),
        }
    }

    fn visit_instruction(
        &mut self,
        unit: &CilUnit,
        _id: NodeId,
        instruction: &CilInstruction,
    ) -> String {
        let mut text = instruction.op.to_string();
        if let Some(operand) = &instruction.operand {
            text.push(' ');
            text.push_str(&operand.to_string());
        }
        if !instruction.arguments.is_empty() {
            let arguments: Vec<String> = instruction
                .arguments
                .iter()
                .map(|&argument| accept(unit, argument, self))
                .collect();
            text.push('(');
            text.push_str(&arguments.join(", "));
            text.push(')');
        }
        text
    }

    fn visit_variable_expression(
        &mut self,
        unit: &CilUnit,
        _id: NodeId,
        expression: &CilVariableExpression,
    ) -> String {
        unit.variable(expression.variable).name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::cil::{CilOp, CilOperand, MemberRef},
        ast::CfgNodeId,
        types::TypeRef,
    };

    #[test]
    fn formats_statements_recursively() {
        let mut unit = CilUnit::new();
        let int32 = TypeRef::named("System", "Int32");
        let var = unit.new_variable("loc_0", int32.clone());

        let seven = unit
            .instruction(CilOp::Ldc, Some(CilOperand::Int(7)), vec![], Some(int32.clone()))
            .unwrap();
        let assign = unit.assignment(var, seven).unwrap();

        let read = unit.variable_expression(var).unwrap();
        let call = unit
            .instruction(
                CilOp::Call,
                Some(CilOperand::Member(MemberRef::new(
                    TypeRef::named("System", "Console"),
                    "WriteLine",
                ))),
                vec![read],
                None,
            )
            .unwrap();
        let stmt = unit.expression_statement(call).unwrap();
        let block = unit.new_block(CfgNodeId::new(0), vec![assign, stmt]).unwrap();

        let mut formatter = CilAstFormatter::new();
        let text = formatter.format(&unit, block);
        assert_eq!(
            text,
            "loc_0 = ldc 7\ncall System.Console::WriteLine(loc_0)"
        );
    }
}
