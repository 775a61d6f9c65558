//! Node payloads of the virtual-machine-level IR dialect.
//!
//! The external disassembler lifts decoded virtual-machine instructions into these
//! nodes, one tree per control flow node. Expressions at this level operate on the
//! machine's registers and stack slots; host types do not exist yet.

use std::fmt;

use bitflags::bitflags;

use crate::ast::{arena::AstPayload, CfgNodeId, NodeId};

/// Virtual machine opcodes modeled by instruction expressions.
///
/// A representative slice of the interpreter's handler set; the disassembler maps raw
/// handler codes onto these before lifting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[allow(missing_docs)]
pub enum VmCode {
    #[strum(serialize = "NOP")]
    Nop,
    #[strum(serialize = "PUSHR_DWORD")]
    PushrDword,
    #[strum(serialize = "PUSHR_QWORD")]
    PushrQword,
    #[strum(serialize = "PUSHR_OBJECT")]
    PushrObject,
    #[strum(serialize = "PUSHI_DWORD")]
    PushiDword,
    #[strum(serialize = "PUSHI_QWORD")]
    PushiQword,
    #[strum(serialize = "POP")]
    Pop,
    #[strum(serialize = "ADD_DWORD")]
    AddDword,
    #[strum(serialize = "ADD_QWORD")]
    AddQword,
    #[strum(serialize = "SUB_DWORD")]
    SubDword,
    #[strum(serialize = "MUL_DWORD")]
    MulDword,
    #[strum(serialize = "DIV_DWORD")]
    DivDword,
    #[strum(serialize = "AND_DWORD")]
    AndDword,
    #[strum(serialize = "OR_DWORD")]
    OrDword,
    #[strum(serialize = "XOR_DWORD")]
    XorDword,
    #[strum(serialize = "NOR_DWORD")]
    NorDword,
    #[strum(serialize = "CMP_DWORD")]
    CmpDword,
    #[strum(serialize = "JZ")]
    Jz,
    #[strum(serialize = "JNZ")]
    Jnz,
    #[strum(serialize = "JMP")]
    Jmp,
    #[strum(serialize = "CALL")]
    Call,
    #[strum(serialize = "VCALL")]
    Vcall,
    #[strum(serialize = "LIND_DWORD")]
    LindDword,
    #[strum(serialize = "SIND_DWORD")]
    SindDword,
    #[strum(serialize = "RET")]
    Ret,
}

/// Registers of the virtual machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[allow(missing_docs)]
pub enum VmRegister {
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    /// Flags register.
    FL,
    /// Instruction pointer.
    IP,
    /// Stack pointer.
    SP,
    /// Base pointer.
    BP,
}

bitflags! {
    /// Bits of the virtual machine's flags register.
    ///
    /// Arithmetic handlers update a subset of these; the `BEHAV` bits select
    /// per-build handler behavior variants.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct VmFlags: u8 {
        /// Overflow flag.
        const OVERFLOW = 0x01;
        /// Carry flag.
        const CARRY = 0x02;
        /// Zero flag.
        const ZERO = 0x04;
        /// Sign flag.
        const SIGN = 0x08;
        /// Unsigned comparison flag.
        const UNSIGNED = 0x10;
        /// Behavior selector 1.
        const BEHAV1 = 0x20;
        /// Behavior selector 2.
        const BEHAV2 = 0x40;
        /// Behavior selector 3.
        const BEHAV3 = 0x80;
    }
}

/// Inline operand of a virtual machine instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmOperand {
    /// Immediate value.
    Immediate(u64),
    /// Register operand.
    Register(VmRegister),
}

impl fmt::Display for VmOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VmOperand::Immediate(value) => write!(f, "{value}"),
            VmOperand::Register(register) => write!(f, "{register}"),
        }
    }
}

/// Statement container; the outermost block of a tree corresponds 1:1 to a control
/// flow node.
#[derive(Debug)]
pub struct IlBlock {
    /// Statement ids in execution order.
    pub statements: Vec<NodeId>,
    /// Associated control flow node for root blocks.
    pub cfg_node: Option<CfgNodeId>,
}

/// Statement writing an expression result into a virtual register or frame slot.
#[derive(Debug)]
pub struct IlAssignment {
    /// Name of the written slot (register or frame variable).
    pub variable: String,
    /// Value expression; cleared when the child is detached.
    pub value: Option<NodeId>,
}

/// Statement evaluating an expression for its stack and flag effects.
#[derive(Debug)]
pub struct IlExpressionStatement {
    /// The evaluated expression; cleared when the child is detached.
    pub expression: Option<NodeId>,
}

/// Expression applying a virtual machine instruction to argument expressions.
#[derive(Debug)]
pub struct IlInstruction {
    /// The opcode.
    pub opcode: VmCode,
    /// Inline operand, if the handler takes one.
    pub operand: Option<VmOperand>,
    /// Argument expression ids in evaluation order.
    pub arguments: Vec<NodeId>,
    /// Flags register bits this instruction updates.
    pub affected_flags: VmFlags,
}

/// Expression reading a virtual register or frame slot.
#[derive(Debug)]
pub struct IlVariableExpression {
    /// Name of the read slot.
    pub variable: String,
}

/// Merge of the values a slot may hold at a control flow join.
#[derive(Debug)]
pub struct IlPhi {
    /// Variable expression ids, one per incoming path.
    pub sources: Vec<NodeId>,
}

/// Concrete node kinds of the virtual-machine-level dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IlNodeKind {
    /// [`IlBlock`]
    Block,
    /// [`IlAssignment`]
    Assignment,
    /// [`IlExpressionStatement`]
    ExpressionStatement,
    /// [`IlInstruction`]
    Instruction,
    /// [`IlVariableExpression`]
    VariableExpression,
    /// [`IlPhi`]
    Phi,
}

/// Tagged payload of a virtual-machine-level IR node.
#[derive(Debug)]
pub enum IlNode {
    /// Statement container.
    Block(IlBlock),
    /// Slot assignment statement.
    Assignment(IlAssignment),
    /// Expression statement.
    ExpressionStatement(IlExpressionStatement),
    /// Instruction expression.
    Instruction(IlInstruction),
    /// Slot read expression.
    VariableExpression(IlVariableExpression),
    /// Join-point merge expression.
    Phi(IlPhi),
}

impl IlNode {
    /// The concrete kind of this node.
    #[must_use]
    pub fn kind(&self) -> IlNodeKind {
        match self {
            IlNode::Block(_) => IlNodeKind::Block,
            IlNode::Assignment(_) => IlNodeKind::Assignment,
            IlNode::ExpressionStatement(_) => IlNodeKind::ExpressionStatement,
            IlNode::Instruction(_) => IlNodeKind::Instruction,
            IlNode::VariableExpression(_) => IlNodeKind::VariableExpression,
            IlNode::Phi(_) => IlNodeKind::Phi,
        }
    }
}

impl AstPayload for IlNode {
    fn children(&self) -> Vec<NodeId> {
        match self {
            IlNode::Block(block) => block.statements.clone(),
            IlNode::Assignment(assignment) => assignment.value.into_iter().collect(),
            IlNode::ExpressionStatement(statement) => statement.expression.into_iter().collect(),
            IlNode::Instruction(instr) => instr.arguments.clone(),
            IlNode::VariableExpression(_) => Vec::new(),
            IlNode::Phi(phi) => phi.sources.clone(),
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
            IlNode::Block(block) => in_sequence(&mut block.statements, old, new),
            IlNode::Assignment(assignment) => in_slot(&mut assignment.value, old, new),
            IlNode::ExpressionStatement(statement) => in_slot(&mut statement.expression, old, new),
            IlNode::Instruction(instr) => in_sequence(&mut instr.arguments, old, new),
            IlNode::VariableExpression(_) => false,
            IlNode::Phi(phi) => in_sequence(&mut phi.sources, old, new),
        }
    }

    fn cfg_node(&self) -> Option<CfgNodeId> {
        match self {
            IlNode::Block(block) => block.cfg_node,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_display_uses_handler_names() {
        assert_eq!(VmCode::PushrDword.to_string(), "PUSHR_DWORD");
        assert_eq!(VmCode::Vcall.to_string(), "VCALL");
    }

    #[test]
    fn flags_compose() {
        let updated = VmFlags::ZERO | VmFlags::SIGN;
        assert!(updated.contains(VmFlags::ZERO));
        assert!(!updated.contains(VmFlags::CARRY));
    }
}
