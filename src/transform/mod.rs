//! The transform pipeline.
//!
//! After the recompilation stage renders a method body into host-level IR, an ordered
//! list of change-aware transforms refines it: each reports whether it modified the
//! unit, and the pipeline repeats the full pass until a quiet pass (fixpoint) or a
//! configured iteration cap. The cap guards against transform pairs that keep undoing
//! each other; hitting it is surfaced as a status, never an error.
//!
//! # Architecture
//!
//! ```text
//! Recompiler                 one unit per worker
//!   └─ per unit:
//!      RecompilerContext     resolver + hierarchy view + event log
//!      TransformPipeline     full passes until fixpoint or cap
//!        ├─ type inference           narrow variable types
//!        ├─ variable inlining        fold single-use temporaries
//!        └─ dead variable elim       drop unread pure assignments
//! ```

mod config;
mod context;
mod events;
mod pass;
mod pipeline;
pub mod passes;
mod recompiler;

pub use config::PipelineConfig;
pub use context::RecompilerContext;
pub use events::{Event, EventKind, EventLog};
pub use pass::Transform;
pub use pipeline::{PipelineStatus, TransformPipeline};
pub use recompiler::{Recompiler, UnitOutcome};
