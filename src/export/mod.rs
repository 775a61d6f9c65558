//! Presentation layers over the IR.
//!
//! Nothing here affects IR semantics; the exporters read trees through the visitor
//! interface and render them for humans.

mod dot;

pub use dot::{escape_dot, export_unit, wrap_label, DotGraph, LABEL_WRAP_COLUMN};
