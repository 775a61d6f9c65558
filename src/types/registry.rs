//! In-memory type registry implementing [`TypeResolver`].
//!
//! Backs the resolver interface with a concurrent map of definitions keyed by full
//! qualified name. Production deployments resolve against real assembly metadata; the
//! registry covers standalone use and tests, and doubles as the target image for
//! reference import.
//!
//! # Thread Safety
//!
//! The registry is safe to share across workers: registration and lookup go through a
//! concurrent map, and the resolver methods take `&self`.

use dashmap::DashMap;

use crate::{
    types::{TypeDef, TypeRef, TypeResolver, WellKnownType},
    Error, Result,
};

/// Concurrent registry of type definitions keyed by full qualified name.
pub struct TypeRegistry {
    types: DashMap<String, TypeDef>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::with_core_types()
    }
}

impl TypeRegistry {
    /// Creates an empty registry with no definitions at all.
    ///
    /// Most callers want [`with_core_types`](Self::with_core_types); without the core
    /// set, well-known lookups and array resolution fail.
    #[must_use]
    pub fn new() -> Self {
        Self {
            types: DashMap::new(),
        }
    }

    /// Creates a registry seeded with the core hierarchy roots: `System.Object`,
    /// `System.ValueType`, `System.Array`, `System.String` and the common primitives.
    #[must_use]
    pub fn with_core_types() -> Self {
        let registry = Self::new();
        let object = TypeRef::named("System", "Object");
        let value_type = TypeRef::named("System", "ValueType");

        let core = [
            TypeDef::new("System", "Object", None),
            TypeDef::new("System", "ValueType", Some(object.clone())),
            TypeDef::new("System", "Array", Some(object.clone())),
            TypeDef::new("System", "String", Some(object.clone())),
            TypeDef::new("System", "Boolean", Some(value_type.clone())),
            TypeDef::new("System", "Int32", Some(value_type.clone())),
            TypeDef::new("System", "Int64", Some(value_type.clone())),
            TypeDef::new("System", "Double", Some(value_type)),
        ];
        for def in core {
            // a fresh registry cannot already contain these
            let _ = registry.register(def);
        }
        registry
    }

    /// Registers a definition under its full qualified name.
    ///
    /// # Errors
    ///
    /// [`Error::TypeError`] when a definition with the same qualified name is already
    /// registered.
    pub fn register(&self, def: TypeDef) -> Result<()> {
        let key = def.name.full_name();
        if self.types.contains_key(&key) {
            return Err(Error::TypeError(format!(
                "type '{key}' is already registered"
            )));
        }
        self.types.insert(key, def);
        Ok(())
    }

    /// Number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn lookup(&self, full_name: &str) -> Result<TypeDef> {
        self.types
            .get(full_name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::TypeNotFound(full_name.to_string()))
    }
}

impl TypeResolver for TypeRegistry {
    fn resolve(&self, ty: &TypeRef) -> Result<TypeDef> {
        match ty {
            TypeRef::Named(name) => self.lookup(&name.full_name()),
            // resolving an array lands on the array base type's definition
            TypeRef::Array { .. } => {
                let base = self.well_known(WellKnownType::Array)?;
                self.resolve(&base)
            }
            // resolving a specification lands on the underlying signature's definition
            TypeRef::Specification { underlying, .. } => self.resolve(underlying),
        }
    }

    fn import(&self, ty: &TypeRef) -> Result<TypeRef> {
        match ty {
            TypeRef::Named(name) => {
                // canonicalize onto the registered definition's spelling
                let def = self.lookup(&name.full_name())?;
                Ok(def.type_ref())
            }
            TypeRef::Array { element, rank } => Ok(TypeRef::Array {
                element: Box::new(self.import(element)?),
                rank: *rank,
            }),
            TypeRef::Specification {
                underlying,
                arguments,
            } => {
                let arguments = arguments
                    .iter()
                    .map(|arg| self.import(arg))
                    .collect::<Result<Vec<_>>>()?;
                Ok(TypeRef::Specification {
                    underlying: Box::new(self.import(underlying)?),
                    arguments,
                })
            }
        }
    }

    fn well_known(&self, which: WellKnownType) -> Result<TypeRef> {
        let full_name = match which {
            WellKnownType::Object => "System.Object",
            WellKnownType::Array => "System.Array",
            WellKnownType::String => "System.String",
        };
        Ok(self.lookup(full_name)?.type_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_types_resolve() {
        let registry = TypeRegistry::with_core_types();
        let def = registry
            .resolve(&TypeRef::named("System", "String"))
            .unwrap();
        assert_eq!(def.name.full_name(), "System.String");
        assert_eq!(def.base_type, Some(TypeRef::named("System", "Object")));
    }

    #[test]
    fn duplicate_registration_fails() {
        let registry = TypeRegistry::with_core_types();
        let result = registry.register(TypeDef::new("System", "Object", None));
        assert!(matches!(result, Err(Error::TypeError(_))));
    }

    #[test]
    fn unknown_type_is_reported() {
        let registry = TypeRegistry::with_core_types();
        let result = registry.resolve(&TypeRef::named("Missing", "Type"));
        assert!(matches!(result, Err(Error::TypeNotFound(name)) if name == "Missing.Type"));
    }

    #[test]
    fn array_resolves_to_array_base() {
        let registry = TypeRegistry::with_core_types();
        let arr = TypeRef::array(TypeRef::named("System", "Int32"));
        let def = registry.resolve(&arr).unwrap();
        assert_eq!(def.name.full_name(), "System.Array");
    }

    #[test]
    fn specification_resolves_underlying() {
        let registry = TypeRegistry::with_core_types();
        registry
            .register(TypeDef::new(
                "System.Collections.Generic",
                "List`1",
                Some(TypeRef::named("System", "Object")),
            ))
            .unwrap();

        let list_of_string = TypeRef::generic(
            TypeRef::named("System.Collections.Generic", "List`1"),
            vec![TypeRef::named("System", "String")],
        );
        let def = registry.resolve(&list_of_string).unwrap();
        assert_eq!(def.name.name, "List`1");
    }

    #[test]
    fn import_canonicalizes_components() {
        let registry = TypeRegistry::with_core_types();
        let arr = TypeRef::array(TypeRef::named("System", "String"));
        assert_eq!(registry.import(&arr).unwrap(), arr);

        let unknown = TypeRef::array(TypeRef::named("Missing", "Type"));
        assert!(registry.import(&unknown).is_err());
    }
}
