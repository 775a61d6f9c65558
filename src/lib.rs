// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # unvirt
//!
//! An intermediate-representation framework for recovering method bodies from
//! stack-machine code virtualizers. `unvirt` provides the tree IR shared by the
//! disassembly and recompilation stages of a devirtualizer, the mutation protocol that
//! keeps those trees well-formed under rewriting, and the iterative transform pipeline
//! that refines the recompiled output until no further simplification is possible.
//!
//! ## Features
//!
//! - **🌳 Arena-backed ASTs** - Stable node ids, parent links, O(1) structural mutation
//!   with enforced single-ownership and parent-consistency invariants
//! - **🔁 Two IR dialects** - A virtual-machine-level tree over registers and stack
//!   slots, and a host-level tree with typed expressions and tracked variables
//! - **🧮 Type inference** - Narrows every variable to the common base type of its
//!   assigned values, with array and generic-instantiation hierarchy handling
//! - **🔧 Fixpoint pipeline** - Change-aware transforms repeated to convergence under
//!   an iteration cap, with per-unit outcome reporting
//! - **⚡ Parallel batches** - One compilation unit per worker, no shared mutable state
//! - **📊 DOT export** - Wrapped, escaped block labels for Graphviz inspection
//!
//! ## Quick Start
//!
//! ```rust
//! use unvirt::prelude::*;
//!
//! // The host type system the recompiled output targets
//! let registry = TypeRegistry::with_core_types();
//!
//! // One recovered method body: loc_0 = ldc 7; call WriteLine(loc_0)
//! let mut unit = CilUnit::new();
//! let var = unit.new_variable("loc_0", TypeRef::named("System", "Object"));
//! let value = unit.instruction(
//!     CilOp::Ldc,
//!     Some(CilOperand::Int(7)),
//!     vec![],
//!     Some(TypeRef::named("System", "Int32")),
//! )?;
//! let assign = unit.assignment(var, value)?;
//! let read = unit.variable_expression(var)?;
//! let call = unit.instruction(
//!     CilOp::Call,
//!     Some(CilOperand::Member(MemberRef::new(
//!         TypeRef::named("System", "Console"),
//!         "WriteLine",
//!     ))),
//!     vec![read],
//!     None,
//! )?;
//! let stmt = unit.expression_statement(call)?;
//! unit.new_block(CfgNodeId::new(0), vec![assign, stmt])?;
//!
//! // Refine it until fixpoint
//! let recompiler = Recompiler::new(&registry, PipelineConfig::default());
//! let outcome = recompiler.process_unit(&mut unit);
//! assert!(outcome.converged());
//! # Ok::<(), unvirt::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `unvirt` is organized into several key modules:
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`ast`] - The node framework and both IR dialects
//! - [`types`] - Type references, the host type system interface, hierarchy analysis
//! - [`transform`] - The transform trait, pipeline driver and built-in suite
//! - [`export`] - DOT rendering of IR trees
//! - [`Error`] and [`Result`] - Comprehensive error handling
//!
//! ### Processing Model
//!
//! An external disassembler lifts virtualized bytecode into [`ast::il`] trees, one per
//! control flow node of an externally owned graph. A recompilation stage lowers those
//! into [`ast::cil`] units, which is where this crate's pipeline takes over:
//! [`transform::Recompiler`] runs the transform suite over each unit until fixpoint,
//! querying the host type system through [`types::TypeResolver`] and recording every
//! change in the unit's event log. Units are independent; batches are processed one
//! unit per worker with no extra synchronization.
//!
//! ### Error Model
//!
//! Structural-invariant violations (mutating a node through the wrong parent, attaching
//! an already-attached node) are contract bugs and fail immediately. Transform errors
//! abort the unit's run and surface as a failed unit. Non-convergence is not an error;
//! it is reported as a distinct [`transform::PipelineStatus`] so callers can decide
//! between best-effort output and rejection.

pub mod ast;
pub mod export;
pub mod transform;
pub mod types;

mod error;

pub use error::Error;

/// Convenience alias for operations that can fail with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude;
