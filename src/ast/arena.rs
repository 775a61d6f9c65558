//! Arena-backed AST node storage and the structural mutation protocol.
//!
//! Both IR dialects ([`crate::ast::il`] and [`crate::ast::cil`]) store their nodes in an
//! [`AstArena`], addressed by stable [`NodeId`] indices. A node records its parent id (or
//! none for a root); container payloads record the ordered ids of their children. Parent
//! links are structural back-references, never ownership edges, so the tree shape carries
//! no cyclic ownership and structural mutation is plain index bookkeeping.
//!
//! # Invariants
//!
//! The arena enforces two invariants on every mutation:
//!
//! - **Parent consistency**: a node listed as a child of `P` has its parent link set to
//!   `P`, and only `P`.
//! - **No aliasing**: a node is a child of at most one parent at any time. Attaching a
//!   node that still has a parent fails with [`Error::AlreadyAttached`]; mutating a node
//!   through a parent it does not belong to fails with [`Error::NotAMember`].
//!
//! Violations of these invariants are contract bugs in the caller, not recoverable input
//! conditions. A detached node (no parent) is a valid standalone root, either freshly
//! constructed or removed from a tree and awaiting reattachment.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut arena: AstArena<MyNode> = AstArena::new();
//! let leaf = arena.alloc(MyNode::leaf(42))?;
//! let root = arena.alloc(MyNode::list(vec![leaf]))?;
//!
//! assert_eq!(arena.parent(leaf), Some(root));
//! let detached = arena.remove(leaf)?;
//! assert_eq!(arena.parent(detached), None);
//! ```

use std::collections::HashSet;
use std::fmt;

use crate::{Error, Result};

/// Stable index of a node inside an [`AstArena`].
///
/// Ids are only meaningful for the arena that produced them. They stay valid for the
/// lifetime of the arena; detaching a node does not invalidate its id.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Creates a node id from a raw index.
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

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Identity of a node in the externally owned control flow graph.
///
/// The outermost block of an IR tree corresponds 1:1 to one control flow node. This id is
/// the only coupling point between the IR and the graph; the arena never constructs or
/// mutates the graph itself.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CfgNodeId(usize);

impl CfgNodeId {
    /// Creates a control flow node id from a raw index.
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

impl fmt::Debug for CfgNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cfg{}", self.0)
    }
}

impl fmt::Display for CfgNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cfg{}", self.0)
    }
}

/// Interface a dialect's node payload exposes to the arena.
///
/// Implementations are tagged enums with one variant per concrete node kind; the methods
/// here are exhaustive matches over those variants. The arena owns all parent links, so
/// `replace_child` only rewires the payload's own child structure and must not touch
/// parent state.
pub trait AstPayload {
    /// Child node ids in evaluation order.
    fn children(&self) -> Vec<NodeId>;

    /// Substitutes `old` with `new` in this payload's child structure.
    ///
    /// `None` removes the child: sequence containers drop the position, fixed slots are
    /// cleared. Returns `false` when `old` is not referenced by this payload.
    fn replace_child(&mut self, old: NodeId, new: Option<NodeId>) -> bool;

    /// The control flow node this payload is associated with, for root-capable blocks.
    fn cfg_node(&self) -> Option<CfgNodeId> {
        None
    }
}

struct Slot<P> {
    payload: P,
    parent: Option<NodeId>,
}

/// Arena of AST nodes for one IR tree (or forest).
///
/// Nodes are allocated once and addressed by [`NodeId`]. The arena never frees slots;
/// detached subtrees simply become standalone roots. At method-body scale (hundreds to
/// low thousands of nodes) this keeps every mutation O(children) with no lifetime
/// juggling.
///
/// # Thread Safety
///
/// The arena is `Send` but intentionally provides no internal locking: a compilation
/// unit is processed by one thread at a time, and structural mutation must never run
/// concurrently with a traversal of the same tree.
pub struct AstArena<P: AstPayload> {
    nodes: Vec<Slot<P>>,
}

impl<P: AstPayload> Default for AstArena<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: AstPayload> AstArena<P> {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Number of nodes ever allocated, attached or detached.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no node has been allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocates a node and claims the payload's children.
    ///
    /// Every child listed by the payload is attached to the new node. This is the only
    /// way a node acquires its initial children; composite nodes are built bottom-up.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyAttached`] if any listed child already has a parent (including the
    /// same child listed twice).
    pub fn alloc(&mut self, payload: P) -> Result<NodeId> {
        let id = NodeId::new(self.nodes.len());
        let children = payload.children();

        let mut seen = HashSet::with_capacity(children.len());
        for &child in &children {
            if self.nodes[child.index()].parent.is_some() || !seen.insert(child) {
                return Err(Error::AlreadyAttached);
            }
        }

        self.nodes.push(Slot {
            payload,
            parent: None,
        });
        for child in children {
            self.nodes[child.index()].parent = Some(id);
        }
        Ok(id)
    }

    /// Borrows a node's payload.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this arena.
    #[must_use]
    pub fn payload(&self, id: NodeId) -> &P {
        &self.nodes[id.index()].payload
    }

    /// Mutably borrows a node's payload.
    ///
    /// Callers may edit node attributes freely but must not rewire child ids directly;
    /// structural changes go through [`replace_child`](Self::replace_child),
    /// [`remove`](Self::remove), [`replace`](Self::replace) and
    /// [`attach_with`](Self::attach_with) so parent links stay consistent.
    pub fn payload_mut(&mut self, id: NodeId) -> &mut P {
        &mut self.nodes[id.index()].payload
    }

    /// The parent of `id`, or `None` for a root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    /// The children of `id` in evaluation order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes[id.index()].payload.children()
    }

    /// Substitutes `old` with `new` among the children of `parent`.
    ///
    /// With `new == None` the child is removed. On success `old` is a standalone root
    /// and `new` (if any) has its parent set to `parent`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotAMember`] if `old` is not currently a child of `parent`
    /// - [`Error::AlreadyAttached`] if `new` already has a parent
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        old: NodeId,
        new: Option<NodeId>,
    ) -> Result<()> {
        if self.nodes[old.index()].parent != Some(parent) {
            return Err(Error::NotAMember);
        }
        if let Some(new) = new {
            if self.nodes[new.index()].parent.is_some() {
                return Err(Error::AlreadyAttached);
            }
        }

        if !self.nodes[parent.index()].payload.replace_child(old, new) {
            return Err(Error::NotAMember);
        }

        self.nodes[old.index()].parent = None;
        if let Some(new) = new {
            self.nodes[new.index()].parent = Some(parent);
        }
        Ok(())
    }

    /// Detaches `node` from its parent and returns it for reattachment elsewhere.
    ///
    /// # Errors
    ///
    /// [`Error::NotAMember`] if the node has no parent.
    pub fn remove(&mut self, node: NodeId) -> Result<NodeId> {
        let parent = self.nodes[node.index()].parent.ok_or(Error::NotAMember)?;
        self.replace_child(parent, node, None)?;
        Ok(node)
    }

    /// Substitutes `new` in `node`'s position under its parent.
    ///
    /// # Errors
    ///
    /// [`Error::NotAMember`] if `node` has no parent, [`Error::AlreadyAttached`] if
    /// `new` still has one.
    pub fn replace(&mut self, node: NodeId, new: NodeId) -> Result<()> {
        let parent = self.nodes[node.index()].parent.ok_or(Error::NotAMember)?;
        self.replace_child(parent, node, Some(new))
    }

    /// Attaches `child` under `parent`, letting `edit` wire the id into the parent
    /// payload's child structure (e.g. push onto a statement list).
    ///
    /// The closure runs after the attachment checks pass; it must insert `child` into
    /// the payload exactly once.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyAttached`] if `child` already has a parent.
    pub fn attach_with(
        &mut self,
        parent: NodeId,
        child: NodeId,
        edit: impl FnOnce(&mut P),
    ) -> Result<()> {
        if self.nodes[child.index()].parent.is_some() {
            return Err(Error::AlreadyAttached);
        }
        edit(&mut self.nodes[parent.index()].payload);
        self.nodes[child.index()].parent = Some(parent);
        Ok(())
    }

    /// Lazy iterator over the proper ancestors of `id`, nearest first.
    ///
    /// Each call starts a fresh traversal from the immediate parent up to the root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_, P> {
        Ancestors {
            arena: self,
            current: self.parent(id),
        }
    }

    /// Nearest node present in both `a`'s and `b`'s proper ancestor chains.
    ///
    /// `a`'s chain is materialized as a set and `b`'s chain is scanned outward, so the
    /// result is the hit nearest to `b`. Returns `None` when the nodes are in disjoint
    /// trees. The set materialization is O(depth) space, which is fine for
    /// method-body-sized trees.
    #[must_use]
    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let ancestors: HashSet<NodeId> = self.ancestors(a).collect();
        self.ancestors(b).find(|id| ancestors.contains(id))
    }

    /// The root of the tree containing `id` (the node itself when detached).
    #[must_use]
    pub fn root(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// The control flow node associated with the root of `id`'s tree.
    ///
    /// # Errors
    ///
    /// [`Error::NotAttached`] when the root carries no control flow association. This is
    /// a precondition check; callers must attach the tree before asking.
    pub fn root_container(&self, id: NodeId) -> Result<CfgNodeId> {
        self.payload(self.root(id))
            .cfg_node()
            .ok_or(Error::NotAttached)
    }

    /// Preorder traversal of the subtree rooted at `id`, including `id` itself.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            result.push(node);
            let mut children = self.children(node);
            children.reverse();
            stack.extend(children);
        }
        result
    }
}

/// Iterator over proper ancestors, from immediate parent to root. See
/// [`AstArena::ancestors`].
pub struct Ancestors<'a, P: AstPayload> {
    arena: &'a AstArena<P>,
    current: Option<NodeId>,
}

impl<P: AstPayload> Iterator for Ancestors<'_, P> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.current?;
        self.current = self.arena.parent(current);
        Some(current)
    }
}
