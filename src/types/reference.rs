//! Type references exchanged between the IR and the host type system.
//!
//! A [`TypeRef`] is an opaque descriptor of a host type: a named class or struct, an
//! array of some element type, or a type specification (a generic instantiation wrapping
//! an underlying reference). References are compared by their full qualified name, never
//! by object identity; two independently built references to `System.String` are equal.

use std::fmt;

/// Namespace-qualified type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeName {
    /// Namespace, empty for the global namespace.
    pub namespace: String,
    /// Simple name, including any generic arity suffix (e.g. `List`1`).
    pub name: String,
}

impl TypeName {
    /// Creates a qualified name.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// The full qualified name, `Namespace.Name` (or just `Name` for the global
    /// namespace).
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}

/// Reference to a host type.
///
/// Equality is structural, which coincides with full-qualified-name equality since the
/// rendering in [`full_name`](Self::full_name) is injective over the three shapes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A named class, struct or interface.
    Named(TypeName),
    /// An array of some element type.
    Array {
        /// Element type of the array.
        element: Box<TypeRef>,
        /// Number of dimensions; 1 for a vector.
        rank: u32,
    },
    /// A type specification: a generic instantiation (or other derived signature)
    /// wrapping an underlying reference.
    Specification {
        /// The generic definition (or other underlying signature) being instantiated.
        underlying: Box<TypeRef>,
        /// Generic arguments, in declaration order.
        arguments: Vec<TypeRef>,
    },
}

impl TypeRef {
    /// Creates a reference to a named type.
    pub fn named(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        TypeRef::Named(TypeName::new(namespace, name))
    }

    /// Creates a single-dimensional array reference.
    #[must_use]
    pub fn array(element: TypeRef) -> Self {
        TypeRef::Array {
            element: Box::new(element),
            rank: 1,
        }
    }

    /// Creates a generic instantiation of `underlying` with the given arguments.
    #[must_use]
    pub fn generic(underlying: TypeRef, arguments: Vec<TypeRef>) -> Self {
        TypeRef::Specification {
            underlying: Box::new(underlying),
            arguments,
        }
    }

    /// The full qualified name used for identity comparison.
    ///
    /// Arrays render as `Element[]` (commas for higher ranks), specifications as
    /// `Underlying<Arg, ...>`.
    #[must_use]
    pub fn full_name(&self) -> String {
        match self {
            TypeRef::Named(name) => name.full_name(),
            TypeRef::Array { element, rank } => {
                format!("{}[{}]", element.full_name(), ",".repeat((*rank - 1) as usize))
            }
            TypeRef::Specification {
                underlying,
                arguments,
            } => {
                let args: Vec<String> = arguments.iter().map(TypeRef::full_name).collect();
                format!("{}<{}>", underlying.full_name(), args.join(", "))
            }
        }
    }

    /// The simple name of the reference (element name for arrays, definition name for
    /// specifications).
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            TypeRef::Named(name) => &name.name,
            TypeRef::Array { element, .. } => element.name(),
            TypeRef::Specification { underlying, .. } => underlying.name(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_full_name() {
        assert_eq!(TypeRef::named("System", "String").full_name(), "System.String");
        assert_eq!(TypeRef::named("", "Global").full_name(), "Global");
    }

    #[test]
    fn array_full_name() {
        let vector = TypeRef::array(TypeRef::named("System", "Int32"));
        assert_eq!(vector.full_name(), "System.Int32[]");

        let matrix = TypeRef::Array {
            element: Box::new(TypeRef::named("System", "Int32")),
            rank: 2,
        };
        assert_eq!(matrix.full_name(), "System.Int32[,]");
    }

    #[test]
    fn specification_full_name() {
        let list = TypeRef::generic(
            TypeRef::named("System.Collections.Generic", "List`1"),
            vec![TypeRef::named("System", "String")],
        );
        assert_eq!(
            list.full_name(),
            "System.Collections.Generic.List`1<System.String>"
        );
    }

    #[test]
    fn equality_follows_qualified_name() {
        let a = TypeRef::named("System", "Object");
        let b = TypeRef::named("System", "Object");
        assert_eq!(a, b);
        assert_ne!(a, TypeRef::named("System", "String"));
    }
}
