//! The transform interface.

use crate::{ast::cil::CilUnit, transform::RecompilerContext, Result};

/// One rewriting step over a compilation unit.
///
/// Transforms are change-aware: `apply` reports whether it modified the unit, and the
/// pipeline keeps re-running its list until a full pass reports no change. A transform
/// that errors aborts the whole run for the unit; the pipeline never continues past a
/// half-applied transform.
///
/// Transforms may keep per-run scratch state in `self`; a fresh instance is used per
/// unit, so nothing leaks across units.
pub trait Transform {
    /// Unique name for diagnostics and event attribution.
    fn name(&self) -> &'static str;

    /// Runs the transform over the unit.
    ///
    /// Returns `true` if the unit was modified.
    ///
    /// # Errors
    ///
    /// Any error aborts pipeline processing of this unit.
    fn apply(&mut self, ctx: &RecompilerContext<'_>, unit: &mut CilUnit) -> Result<bool>;
}
