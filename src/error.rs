use thiserror::Error;

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers all possible error conditions that can occur while mutating IR trees,
/// resolving type hierarchies, and running recompilation transforms. Each variant provides
/// specific context about the failure mode to enable appropriate error handling.
///
/// # Error Categories
///
/// ## Structural-Invariant Violations
/// - [`Error::NotAMember`] - A node was mutated through a parent it does not belong to
/// - [`Error::AlreadyAttached`] - A node with a parent was attached a second time
/// - [`Error::NotAttached`] - A root query ran on a node outside any control flow graph
///
/// These indicate a bug in the caller (a transform or the recompiler), not malformed
/// input. They are never retried.
///
/// ## Type System Errors
/// - [`Error::TypeNotFound`] - Requested type is unknown to the resolver
/// - [`Error::TypeError`] - General type resolution or import failure
/// - [`Error::RecursionLimit`] - Inheritance chain walk exceeded the depth cap
///
/// ## Transform Errors
/// - [`Error::Transform`] - A transform failed while inspecting or mutating a unit
#[derive(Error, Debug)]
pub enum Error {
    /// The node is not a member of the parent it was mutated through.
    ///
    /// Raised by structural replace and remove operations when the claimed
    /// parent/child relationship does not hold, including a second `remove`
    /// of an already detached node.
    #[error("Node is not a member of this node")]
    NotAMember,

    /// The node is already a member of another node.
    ///
    /// Attaching a node that still has a parent would silently alias the
    /// subtree into two places. The caller must detach it first.
    #[error("Node is already a member of another node")]
    AlreadyAttached,

    /// The node is not attached to a control flow graph.
    ///
    /// Root-container queries require the tree root to be a block associated
    /// with an external control flow node. Callers doing speculative traversal
    /// during construction can match on this variant to tell "not yet attached"
    /// apart from genuine failures.
    #[error("Node is not attached to a control flow graph")]
    NotAttached,

    /// Failed to find a type definition for the given qualified name.
    #[error("Failed to find type - {0}")]
    TypeNotFound(String),

    /// General error during type resolution or reference import.
    #[error("{0}")]
    TypeError(String),

    /// Recursion limit reached.
    ///
    /// Inheritance chains and nesting chains are walked with a depth cap to
    /// guard against cyclic metadata. The associated value is the cap that
    /// was hit.
    #[error("Reached the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// A transform failed while processing a compilation unit.
    ///
    /// The pipeline aborts the unit on the first transform error; a
    /// half-applied transform could leave the tree inconsistent with
    /// assumptions made by later transforms.
    #[error("Transform '{transform}' failed: {source}")]
    Transform {
        /// Name of the transform that raised the error
        transform: &'static str,
        /// The underlying failure
        source: Box<Error>,
    },

    /// Generic error for miscellaneous failures.
    #[error("{0}")]
    Error(String),
}
