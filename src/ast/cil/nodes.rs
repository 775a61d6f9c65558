//! Node payloads of the host-level IR dialect.
//!
//! The recompiler renders the virtual-machine IR into these nodes, and the transform
//! pipeline refines them until they are ready for instruction encoding. The payload enum
//! is closed; consumers dispatch over it with
//! [`CilAstVisitor`](crate::ast::cil::CilAstVisitor).

use std::fmt;

use crate::{
    ast::{arena::AstPayload, cil::VariableId, CfgNodeId, NodeId},
    types::TypeRef,
};

/// Host instruction operations modeled by [`CilInstruction`] expressions.
///
/// This is the slice of the host instruction set the recompiler emits; operands and
/// argument expressions carry the rest of the encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[allow(missing_docs)]
pub enum CilOp {
    #[strum(serialize = "nop")]
    Nop,
    #[strum(serialize = "ldc")]
    Ldc,
    #[strum(serialize = "ldstr")]
    Ldstr,
    #[strum(serialize = "ldnull")]
    Ldnull,
    #[strum(serialize = "dup")]
    Dup,
    #[strum(serialize = "pop")]
    Pop,
    #[strum(serialize = "add")]
    Add,
    #[strum(serialize = "sub")]
    Sub,
    #[strum(serialize = "mul")]
    Mul,
    #[strum(serialize = "div")]
    Div,
    #[strum(serialize = "rem")]
    Rem,
    #[strum(serialize = "and")]
    And,
    #[strum(serialize = "or")]
    Or,
    #[strum(serialize = "xor")]
    Xor,
    #[strum(serialize = "not")]
    Not,
    #[strum(serialize = "neg")]
    Neg,
    #[strum(serialize = "shl")]
    Shl,
    #[strum(serialize = "shr")]
    Shr,
    #[strum(serialize = "ceq")]
    Ceq,
    #[strum(serialize = "cgt")]
    Cgt,
    #[strum(serialize = "clt")]
    Clt,
    #[strum(serialize = "conv")]
    Conv,
    #[strum(serialize = "box")]
    Box,
    #[strum(serialize = "unbox")]
    Unbox,
    #[strum(serialize = "newobj")]
    Newobj,
    #[strum(serialize = "newarr")]
    Newarr,
    #[strum(serialize = "ldlen")]
    Ldlen,
    #[strum(serialize = "ldelem")]
    Ldelem,
    #[strum(serialize = "stelem")]
    Stelem,
    #[strum(serialize = "ldfld")]
    Ldfld,
    #[strum(serialize = "stfld")]
    Stfld,
    #[strum(serialize = "ldsfld")]
    Ldsfld,
    #[strum(serialize = "stsfld")]
    Stsfld,
    #[strum(serialize = "call")]
    Call,
    #[strum(serialize = "callvirt")]
    Callvirt,
    #[strum(serialize = "ret")]
    Ret,
    #[strum(serialize = "br")]
    Br,
    #[strum(serialize = "brtrue")]
    Brtrue,
    #[strum(serialize = "brfalse")]
    Brfalse,
}

impl CilOp {
    /// Whether evaluating this operation has effects beyond producing a value.
    ///
    /// Calls, constructor invocations, stores through fields or elements, and control
    /// transfers must never be dropped by cleanup transforms.
    #[must_use]
    pub fn has_side_effects(self) -> bool {
        matches!(
            self,
            CilOp::Call
                | CilOp::Callvirt
                | CilOp::Newobj
                | CilOp::Stfld
                | CilOp::Stsfld
                | CilOp::Stelem
                | CilOp::Ret
                | CilOp::Br
                | CilOp::Brtrue
                | CilOp::Brfalse
        )
    }
}

/// Reference to a host member (method or field) used as an instruction operand.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberRef {
    /// Type declaring the member.
    pub declaring_type: TypeRef,
    /// Member name.
    pub name: String,
}

impl MemberRef {
    /// Creates a member reference.
    pub fn new(declaring_type: TypeRef, name: impl Into<String>) -> Self {
        Self {
            declaring_type,
            name: name.into(),
        }
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.declaring_type, self.name)
    }
}

/// Inline operand of a host instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum CilOperand {
    /// Integer constant.
    Int(i64),
    /// Floating point constant.
    Float(f64),
    /// String literal.
    String(String),
    /// Type reference (e.g. for `newarr`, `box`).
    Type(TypeRef),
    /// Member reference (e.g. for `call`, `ldfld`).
    Member(MemberRef),
    /// Branch target, named by its control flow node.
    Target(CfgNodeId),
}

impl fmt::Display for CilOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CilOperand::Int(value) => write!(f, "{value}"),
            CilOperand::Float(value) => write!(f, "{value}"),
            CilOperand::String(value) => write!(f, "\"{value}\""),
            CilOperand::Type(ty) => write!(f, "{ty}"),
            CilOperand::Member(member) => write!(f, "{member}"),
            CilOperand::Target(target) => write!(f, "{target}"),
        }
    }
}

/// Ordered sequence of statements; the outermost block of a tree corresponds 1:1 to a
/// control flow node.
#[derive(Debug)]
pub struct CilBlock {
    /// Statement ids in execution order.
    pub statements: Vec<NodeId>,
    /// Associated control flow node for root blocks.
    pub cfg_node: Option<CfgNodeId>,
}

/// Statement writing the value of an expression into a variable.
#[derive(Debug)]
pub struct CilAssignment {
    /// Target variable.
    pub variable: VariableId,
    /// Value expression; cleared when the child is detached.
    pub value: Option<NodeId>,
}

/// Statement evaluating an expression for its effects.
#[derive(Debug)]
pub struct CilExpressionStatement {
    /// The evaluated expression; cleared when the child is detached.
    pub expression: Option<NodeId>,
}

/// Expression applying a host instruction to argument expressions.
#[derive(Debug)]
pub struct CilInstruction {
    /// The operation.
    pub op: CilOp,
    /// Inline operand, if the operation takes one.
    pub operand: Option<CilOperand>,
    /// Argument expression ids in evaluation order.
    pub arguments: Vec<NodeId>,
    /// Static type of the produced value, `None` for void.
    pub expression_type: Option<TypeRef>,
}

/// Expression reading a variable.
#[derive(Debug)]
pub struct CilVariableExpression {
    /// The variable being read.
    pub variable: VariableId,
    /// Static type of the read value.
    pub expression_type: Option<TypeRef>,
}

/// Concrete node kinds of the host-level dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CilNodeKind {
    /// [`CilBlock`]
    Block,
    /// [`CilAssignment`]
    Assignment,
    /// [`CilExpressionStatement`]
    ExpressionStatement,
    /// [`CilInstruction`]
    Instruction,
    /// [`CilVariableExpression`]
    VariableExpression,
}

/// Tagged payload of a host-level IR node.
#[derive(Debug)]
pub enum CilNode {
    /// Statement container.
    Block(CilBlock),
    /// Variable assignment statement.
    Assignment(CilAssignment),
    /// Expression statement.
    ExpressionStatement(CilExpressionStatement),
    /// Instruction expression.
    Instruction(CilInstruction),
    /// Variable read expression.
    VariableExpression(CilVariableExpression),
}

impl CilNode {
    /// The concrete kind of this node.
    #[must_use]
    pub fn kind(&self) -> CilNodeKind {
        match self {
            CilNode::Block(_) => CilNodeKind::Block,
            CilNode::Assignment(_) => CilNodeKind::Assignment,
            CilNode::ExpressionStatement(_) => CilNodeKind::ExpressionStatement,
            CilNode::Instruction(_) => CilNodeKind::Instruction,
            CilNode::VariableExpression(_) => CilNodeKind::VariableExpression,
        }
    }

    /// The static type of the value this node produces, for expression nodes.
    #[must_use]
    pub fn expression_type(&self) -> Option<&TypeRef> {
        match self {
            CilNode::Instruction(instr) => instr.expression_type.as_ref(),
            CilNode::VariableExpression(var) => var.expression_type.as_ref(),
            _ => None,
        }
    }
}

impl AstPayload for CilNode {
    fn children(&self) -> Vec<NodeId> {
        match self {
            CilNode::Block(block) => block.statements.clone(),
            CilNode::Assignment(assignment) => assignment.value.into_iter().collect(),
            CilNode::ExpressionStatement(statement) => statement.expression.into_iter().collect(),
            CilNode::Instruction(instr) => instr.arguments.clone(),
            CilNode::VariableExpression(_) => Vec::new(),
        }
    }

    fn replace_child(&mut self, old: NodeId, new: Option<NodeId>) -> bool {
        fn in_sequence(items: &mut Vec<NodeId>, old: NodeId, new: Option<NodeId>) -> bool {
            let Some(position) = items.iter().position(|&id| id == old) else {
                return false;
            };
            match new {
                Some(new) => items[position] = new,
                None => {
                    items.remove(position);
                }
            }
            true
        }

        fn in_slot(slot: &mut Option<NodeId>, old: NodeId, new: Option<NodeId>) -> bool {
            if *slot != Some(old) {
                return false;
            }
            *slot = new;
            true
        }

        match self {
            CilNode::Block(block) => in_sequence(&mut block.statements, old, new),
            CilNode::Assignment(assignment) => in_slot(&mut assignment.value, old, new),
            CilNode::ExpressionStatement(statement) => {
                in_slot(&mut statement.expression, old, new)
            }
            CilNode::Instruction(instr) => in_sequence(&mut instr.arguments, old, new),
            CilNode::VariableExpression(_) => false,
        }
    }

    fn cfg_node(&self) -> Option<CfgNodeId> {
        match self {
            CilNode::Block(block) => block.cfg_node,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_display_uses_mnemonics() {
        assert_eq!(CilOp::Ldc.to_string(), "ldc");
        assert_eq!(CilOp::Callvirt.to_string(), "callvirt");
    }

    #[test]
    fn side_effect_classification() {
        assert!(CilOp::Call.has_side_effects());
        assert!(CilOp::Stfld.has_side_effects());
        assert!(!CilOp::Add.has_side_effects());
        assert!(!CilOp::Newarr.has_side_effects());
    }

    #[test]
    fn operand_display() {
        let member = CilOperand::Member(MemberRef::new(
            crate::types::TypeRef::named("System", "Console"),
            "WriteLine",
        ));
        assert_eq!(member.to_string(), "System.Console::WriteLine");
        assert_eq!(CilOperand::String("hi".into()).to_string(), "\"hi\"");
    }
}
