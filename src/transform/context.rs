//! Shared state a pipeline run threads through its transforms.

use crate::{
    transform::EventLog,
    types::{TypeHierarchy, TypeResolver},
    Result,
};

/// Per-unit context handed to every transform invocation.
///
/// Constructed once per compilation-unit run and passed explicitly; nothing here is
/// process-wide, so units on different workers never share mutable transform state.
/// Holds the host type system handle, the hierarchy view built over it (with its
/// well-known lookups done once at setup), and the unit's change log.
pub struct RecompilerContext<'a> {
    /// Host type system: resolution and reference import.
    pub resolver: &'a dyn TypeResolver,
    /// Hierarchy queries over the host type system.
    pub hierarchy: TypeHierarchy<'a>,
    /// Change log for this unit's run.
    pub events: EventLog,
}

impl<'a> RecompilerContext<'a> {
    /// Creates a context, performing the well-known type lookups.
    ///
    /// # Errors
    ///
    /// Fails when the target image lacks the array base type.
    pub fn new(resolver: &'a dyn TypeResolver) -> Result<Self> {
        Ok(Self {
            resolver,
            hierarchy: TypeHierarchy::new(resolver)?,
            events: EventLog::new(),
        })
    }
}
