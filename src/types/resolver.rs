//! The host type system collaborator interface.
//!
//! The IR core never parses metadata itself; everything it needs from the host type
//! system goes through [`TypeResolver`]: resolving a reference to its definition,
//! importing a reference into the target output image, and looking up well-known types.
//! Production callers back this with real assembly metadata;
//! [`TypeRegistry`](crate::types::TypeRegistry) provides an in-memory implementation.

use crate::{
    types::{TypeName, TypeRef},
    Result,
};

/// Visibility of a resolved type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeAccessibility {
    /// Top-level type, not visible outside its assembly.
    #[default]
    NotPublic,
    /// Top-level public type.
    Public,
    /// Nested type, visible everywhere its enclosing type is.
    NestedPublic,
    /// Nested type, visible only inside the enclosing type.
    NestedPrivate,
    /// Nested type, visible to the enclosing type and its subclasses.
    NestedFamily,
    /// Nested type, visible inside the defining assembly.
    NestedAssembly,
    /// Nested type, visible to subclasses inside the defining assembly.
    NestedFamilyAndAssembly,
    /// Nested type, visible to subclasses or inside the defining assembly.
    NestedFamilyOrAssembly,
}

impl TypeAccessibility {
    /// Whether code outside the declaring assembly needs special access (e.g. member
    /// reference redirection) to touch a type with this visibility.
    #[must_use]
    pub fn is_restricted_nested(self) -> bool {
        matches!(
            self,
            TypeAccessibility::NestedPrivate
                | TypeAccessibility::NestedFamily
                | TypeAccessibility::NestedFamilyAndAssembly
                | TypeAccessibility::NestedFamilyOrAssembly
        )
    }
}

/// A resolved type definition.
///
/// Carries the links the hierarchy utility walks: the base type (inheritance) and the
/// declaring type (nesting).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    /// Qualified name of the definition.
    pub name: TypeName,
    /// Base type reference, `None` for the hierarchy root.
    pub base_type: Option<TypeRef>,
    /// Enclosing type for nested definitions.
    pub declaring_type: Option<TypeRef>,
    /// Visibility of the definition.
    pub accessibility: TypeAccessibility,
}

impl TypeDef {
    /// Creates a top-level definition with the given base type.
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        base_type: Option<TypeRef>,
    ) -> Self {
        Self {
            name: TypeName::new(namespace, name),
            base_type,
            declaring_type: None,
            accessibility: TypeAccessibility::Public,
        }
    }

    /// Sets the declaring type, making this a nested definition.
    #[must_use]
    pub fn with_declaring_type(mut self, declaring: TypeRef) -> Self {
        self.declaring_type = Some(declaring);
        self
    }

    /// Sets the visibility of the definition.
    #[must_use]
    pub fn with_accessibility(mut self, accessibility: TypeAccessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    /// The canonical reference to this definition.
    #[must_use]
    pub fn type_ref(&self) -> TypeRef {
        TypeRef::Named(self.name.clone())
    }
}

/// Types the resolver must be able to produce by role rather than by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnownType {
    /// `System.Object`, the inheritance root.
    Object,
    /// `System.Array`, the base of every array type.
    Array,
    /// `System.String`.
    String,
}

/// Resolution and import services of the host type system.
///
/// Implementations must be usable behind a shared reference; distinct compilation units
/// may query the same resolver from different workers concurrently.
pub trait TypeResolver: Sync {
    /// Resolves a reference to its definition.
    ///
    /// Array references resolve to the array base type's definition and specifications
    /// resolve to their underlying signature's definition, mirroring host metadata
    /// semantics. Callers that need a hierarchy ending in the array or specification
    /// itself use [`ancestor_chain`](crate::types::ancestor_chain), which special-cases
    /// those shapes before resolving.
    ///
    /// # Errors
    ///
    /// [`Error::TypeNotFound`](crate::Error::TypeNotFound) when the reference has no
    /// definition known to this resolver.
    fn resolve(&self, ty: &TypeRef) -> Result<TypeDef>;

    /// Imports a reference, producing the canonical equivalent valid in the target
    /// output image.
    ///
    /// # Errors
    ///
    /// [`Error::TypeNotFound`](crate::Error::TypeNotFound) when a component of the
    /// reference cannot be mapped into the target image.
    fn import(&self, ty: &TypeRef) -> Result<TypeRef>;

    /// Looks up a well-known type by role.
    ///
    /// # Errors
    ///
    /// [`Error::TypeNotFound`](crate::Error::TypeNotFound) when the target image lacks
    /// the requested core type.
    fn well_known(&self, which: WellKnownType) -> Result<TypeRef>;
}

/// Depth cap for nesting chain walks.
const MAX_NESTING_DEPTH: usize = 64;

/// Whether referencing `ty` from outside its assembly requires special access.
///
/// Walks the declaring-type chain of the resolved definition; a type nested (at any
/// level) inside a private or family-visible container cannot be referenced directly
/// by recompiled code.
///
/// # Errors
///
/// Propagates resolution failures; [`Error::RecursionLimit`](crate::Error::RecursionLimit)
/// on a nesting chain deeper than the cap (cyclic metadata).
pub fn requires_special_access(resolver: &dyn TypeResolver, ty: &TypeRef) -> Result<bool> {
    let mut current = resolver.resolve(ty)?;
    for _ in 0..MAX_NESTING_DEPTH {
        if current.accessibility.is_restricted_nested() {
            return Ok(true);
        }
        let next = match &current.declaring_type {
            Some(declaring) => resolver.resolve(declaring)?,
            None => return Ok(false),
        };
        current = next;
    }
    Err(crate::Error::RecursionLimit(MAX_NESTING_DEPTH))
}
