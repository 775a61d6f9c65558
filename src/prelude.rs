//! # unvirt Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and
//! traits from the unvirt library. Import this module to get quick access to the
//! essentials for building and transforming devirtualized IR.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all unvirt operations
pub use crate::Error;

/// The result type used throughout unvirt
pub use crate::Result;

// ================================================================================================
// AST Framework
// ================================================================================================

/// Node storage and the structural mutation protocol
pub use crate::ast::{AstArena, AstPayload, CfgNodeId, NodeId};

// ================================================================================================
// Host-Level Dialect
// ================================================================================================

/// Compilation unit, node payloads and variables of the host-level IR
pub use crate::ast::cil::{
    CilAstFormatter, CilAstVisitor, CilNode, CilNodeKind, CilOp, CilOperand, CilUnit, CilVariable,
    MemberRef, VariableId,
};

// ================================================================================================
// Virtual-Machine-Level Dialect
// ================================================================================================

/// Node payloads and machine model of the virtual-machine-level IR
pub use crate::ast::il::{
    IlAstFormatter, IlAstVisitor, IlNode, IlNodeKind, VmCode, VmFlags, VmOperand, VmRegister,
};

// ================================================================================================
// Type System
// ================================================================================================

/// Type references, resolution and hierarchy analysis
pub use crate::types::{
    TypeDef, TypeHierarchy, TypeName, TypeRef, TypeRegistry, TypeResolver, WellKnownType,
};

// ================================================================================================
// Transform Pipeline
// ================================================================================================

/// The pipeline driver, its configuration and outcomes
pub use crate::transform::{
    EventKind, EventLog, PipelineConfig, PipelineStatus, Recompiler, RecompilerContext, Transform,
    TransformPipeline, UnitOutcome,
};

/// The built-in transform suite
pub use crate::transform::passes::{
    DeadVariableTransform, TypeInferenceTransform, VariableInliningTransform,
};

// ================================================================================================
// Export
// ================================================================================================

/// DOT rendering of units
pub use crate::export::{export_unit, DotGraph};
