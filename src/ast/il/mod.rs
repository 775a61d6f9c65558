//! Virtual-machine-level IR dialect.
//!
//! The first tree form a recovered method body takes: decoded interpreter handlers
//! lifted into expressions over the machine's registers and stack slots. The external
//! disassembler produces these trees; the recompilation stage lowers them into
//! [`crate::ast::cil`].

mod formatter;
mod nodes;
mod visitor;

pub use formatter::IlAstFormatter;
pub use nodes::{
    IlAssignment, IlBlock, IlExpressionStatement, IlInstruction, IlNode, IlNodeKind, IlPhi,
    IlVariableExpression, VmCode, VmFlags, VmOperand, VmRegister,
};
pub use visitor::{accept, IlAstVisitor};
