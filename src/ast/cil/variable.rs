//! Variables of the recompiled output and their definition/use edges.

use std::collections::BTreeSet;
use std::fmt;

use crate::{ast::NodeId, types::TypeRef};

/// Identifier of a variable in a unit's variable table.
///
/// A plain index, unique within one [`CilUnit`](crate::ast::cil::CilUnit).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(usize);

impl VariableId {
    /// Creates a variable id from a raw index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the underlying index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A storage location in the recompiled output.
///
/// Tracks the declared type together with the expression nodes that write
/// (`assigned_by`) and read (`used_by`) the variable. The unit keeps those sets in sync
/// as nodes are constructed, discarded and replaced; transforms read them to reason
/// about data flow without re-walking the trees.
#[derive(Debug)]
pub struct CilVariable {
    name: String,
    declared_type: TypeRef,
    pub(crate) assigned_by: BTreeSet<NodeId>,
    pub(crate) used_by: BTreeSet<NodeId>,
}

impl CilVariable {
    pub(crate) fn new(name: String, declared_type: TypeRef) -> Self {
        Self {
            name,
            declared_type,
            assigned_by: BTreeSet::new(),
            used_by: BTreeSet::new(),
        }
    }

    /// Name of the variable in rendered output.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type. Transforms narrow this through
    /// [`CilUnit::retype_variable`](crate::ast::cil::CilUnit::retype_variable).
    #[must_use]
    pub fn declared_type(&self) -> &TypeRef {
        &self.declared_type
    }

    pub(crate) fn set_declared_type(&mut self, declared_type: TypeRef) {
        self.declared_type = declared_type;
    }

    /// Assignment statement nodes writing this variable.
    #[must_use]
    pub fn assigned_by(&self) -> &BTreeSet<NodeId> {
        &self.assigned_by
    }

    /// Variable expression nodes reading this variable.
    #[must_use]
    pub fn used_by(&self) -> &BTreeSet<NodeId> {
        &self.used_by
    }
}
