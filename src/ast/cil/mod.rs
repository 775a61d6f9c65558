//! Host-level IR dialect.
//!
//! The recompiler renders the virtual-machine IR into this dialect, and the transform
//! pipeline refines it until it can be encoded as host instructions. The dialect adds
//! what the virtual-machine level does not have: a variable table with tracked
//! definition/use edges, and host type annotations on every expression.
//!
//! # Structure
//!
//! - [`CilUnit`] - arena, per-control-flow-node root blocks, variable table
//! - [`CilNode`] - tagged node payload (blocks, statements, expressions)
//! - [`CilVariable`] / [`VariableId`] - storage locations and their def/use edges
//! - [`CilAstVisitor`] / [`accept`] - exhaustive per-kind dispatch
//! - [`CilAstFormatter`] - plain-text rendering

mod formatter;
mod nodes;
mod unit;
mod variable;
mod visitor;

pub use formatter::CilAstFormatter;
pub use nodes::{
    CilAssignment, CilBlock, CilExpressionStatement, CilInstruction, CilNode, CilNodeKind, CilOp,
    CilOperand, CilVariableExpression, MemberRef,
};
pub use unit::CilUnit;
pub use variable::{CilVariable, VariableId};
pub use visitor::{accept, CilAstVisitor};
