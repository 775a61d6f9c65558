//! Tree-structured intermediate representations.
//!
//! Both IR dialects share one node framework: an arena of nodes with parent
//! back-references, a structural mutation protocol that keeps trees well-formed under
//! rewriting, and exhaustive visitor dispatch per dialect.
//!
//! - [`arena`] - node storage, ids, mutation protocol, ancestor queries
//! - [`il`] - virtual-machine-level dialect (registers, stack slots, VM opcodes)
//! - [`cil`] - host-level dialect (typed expressions, tracked variables)

pub mod arena;
pub mod cil;
pub mod il;

pub use arena::{Ancestors, AstArena, AstPayload, CfgNodeId, NodeId};
