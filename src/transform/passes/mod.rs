//! The built-in transform suite.
//!
//! Type inference is the load-bearing transform; inlining and dead variable
//! elimination are cleanups of the same change-aware shape that keep the recompiled
//! output readable.

mod dead_vars;
mod inlining;
mod type_inference;

pub use dead_vars::DeadVariableTransform;
pub use inlining::VariableInliningTransform;
pub use type_inference::TypeInferenceTransform;
