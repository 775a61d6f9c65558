//! Ancestor chains and common base type computation.
//!
//! The type inference transform reduces "what may this variable hold" to a walk over
//! inheritance chains: every assigned type is expanded into its root-first ancestor
//! chain, and the deepest position where all chains still agree names the narrowest
//! common base type.
//!
//! Array and specification references need special handling. Resolving them lands on
//! the array base type or the underlying signature's definition, so a naive walk would
//! produce a hierarchy that does not end in the array or specification itself. Their
//! chains are therefore built from the resolved shape's chain with the original
//! reference appended.

use crate::{
    types::{TypeRef, TypeResolver, WellKnownType},
    Error, Result,
};

/// Depth cap for base-type walks, guarding against cyclic inheritance metadata.
const MAX_INHERITANCE_DEPTH: usize = 256;

/// Hierarchy queries over one host type system.
///
/// Construction performs the well-known lookups once; per-query work is pure chain
/// walking against the resolver.
pub struct TypeHierarchy<'a> {
    resolver: &'a dyn TypeResolver,
    array_base: TypeRef,
}

impl<'a> TypeHierarchy<'a> {
    /// Creates a hierarchy view over `resolver`.
    ///
    /// # Errors
    ///
    /// Fails when the target image lacks the array base type.
    pub fn new(resolver: &'a dyn TypeResolver) -> Result<Self> {
        let array_base = resolver.well_known(WellKnownType::Array)?;
        Ok(Self {
            resolver,
            array_base,
        })
    }

    /// The array base type of the target image.
    #[must_use]
    pub fn array_base(&self) -> &TypeRef {
        &self.array_base
    }

    /// Computes the root-first ancestor chain of a type reference.
    ///
    /// The chain starts at the hierarchy root (the type with no base) and ends in the
    /// type itself:
    ///
    /// - a named type yields the resolved definitions from root to itself;
    /// - an array yields the array base type's chain with the array reference appended;
    /// - a specification yields its underlying reference's chain with the specification
    ///   appended;
    /// - `None` yields an empty chain, so callers can batch unknown types without
    ///   special-casing them.
    ///
    /// # Errors
    ///
    /// Propagates resolution failures; [`Error::RecursionLimit`] when a base-type walk
    /// exceeds the depth cap.
    pub fn ancestor_chain(&self, ty: Option<&TypeRef>) -> Result<Vec<TypeRef>> {
        let Some(ty) = ty else {
            return Ok(Vec::new());
        };

        match ty {
            TypeRef::Array { .. } => {
                let base = self.array_base.clone();
                let mut chain = self.ancestor_chain(Some(&base))?;
                chain.push(ty.clone());
                Ok(chain)
            }
            TypeRef::Specification { underlying, .. } => {
                let mut chain = self.ancestor_chain(Some(underlying))?;
                chain.push(ty.clone());
                Ok(chain)
            }
            TypeRef::Named(_) => {
                let mut chain = Vec::new();
                let mut current = ty.clone();
                loop {
                    if chain.len() >= MAX_INHERITANCE_DEPTH {
                        return Err(Error::RecursionLimit(MAX_INHERITANCE_DEPTH));
                    }
                    let def = self.resolver.resolve(&current)?;
                    chain.push(def.type_ref());
                    match def.base_type {
                        Some(base) => current = base,
                        None => break,
                    }
                }
                chain.reverse();
                Ok(chain)
            }
        }
    }

    /// Computes the narrowest type that is an ancestor (reflexive) of every input type.
    ///
    /// Expands each input into its ancestor chain and walks the chains position by
    /// position while they all agree; the type at the last agreeing position is the
    /// common base. Returns `None` when the chains disagree even at the root, or when
    /// any input contributes an empty chain (an unknown type). With a single input the
    /// result is that type itself.
    ///
    /// The result is deliberately conservative: two unrelated siblings meet at the
    /// hierarchy root, and that root is reported rather than some unsound subtype.
    ///
    /// # Errors
    ///
    /// Propagates resolution failures from chain construction.
    pub fn common_base_type(&self, types: &[Option<TypeRef>]) -> Result<Option<TypeRef>> {
        let chains = types
            .iter()
            .map(|ty| self.ancestor_chain(ty.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let Some(shortest) = chains.iter().map(Vec::len).min() else {
            return Ok(None);
        };

        for position in 0..shortest {
            let candidate = &chains[0][position];
            if chains
                .iter()
                .any(|chain| chain[position].full_name() != candidate.full_name())
            {
                return Ok(if position == 0 {
                    None
                } else {
                    Some(chains[0][position - 1].clone())
                });
            }
        }

        // all chains agree up to the shortest one; its last entry is the common base
        Ok(if shortest > 0 {
            Some(chains[0][shortest - 1].clone())
        } else {
            None
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TypeDef, TypeRegistry};

    fn registry_with_collections() -> TypeRegistry {
        let registry = TypeRegistry::with_core_types();
        let object = TypeRef::named("System", "Object");
        registry
            .register(TypeDef::new(
                "System.Collections.Generic",
                "Collection`1",
                Some(object.clone()),
            ))
            .unwrap();
        registry
            .register(TypeDef::new(
                "System.Collections.Generic",
                "List`1",
                Some(TypeRef::named("System.Collections.Generic", "Collection`1")),
            ))
            .unwrap();
        registry
            .register(TypeDef::new("Pets", "Animal", Some(object.clone())))
            .unwrap();
        registry
            .register(TypeDef::new(
                "Pets",
                "Cat",
                Some(TypeRef::named("Pets", "Animal")),
            ))
            .unwrap();
        registry
            .register(TypeDef::new(
                "Pets",
                "Dog",
                Some(TypeRef::named("Pets", "Animal")),
            ))
            .unwrap();
        registry
    }

    #[test]
    fn named_chain_is_root_first() {
        let registry = registry_with_collections();
        let hierarchy = TypeHierarchy::new(&registry).unwrap();
        let chain = hierarchy
            .ancestor_chain(Some(&TypeRef::named("Pets", "Cat")))
            .unwrap();
        let names: Vec<String> = chain.iter().map(TypeRef::full_name).collect();
        assert_eq!(names, ["System.Object", "Pets.Animal", "Pets.Cat"]);
    }

    #[test]
    fn array_chain_ends_in_array_type() {
        let registry = registry_with_collections();
        let hierarchy = TypeHierarchy::new(&registry).unwrap();
        let arr = TypeRef::array(TypeRef::named("Pets", "Cat"));
        let chain = hierarchy.ancestor_chain(Some(&arr)).unwrap();
        let names: Vec<String> = chain.iter().map(TypeRef::full_name).collect();
        assert_eq!(names, ["System.Object", "System.Array", "Pets.Cat[]"]);
    }

    #[test]
    fn specification_chain_ends_in_specification() {
        let registry = registry_with_collections();
        let hierarchy = TypeHierarchy::new(&registry).unwrap();
        let list = TypeRef::generic(
            TypeRef::named("System.Collections.Generic", "List`1"),
            vec![TypeRef::named("Pets", "Cat")],
        );
        let chain = hierarchy.ancestor_chain(Some(&list)).unwrap();
        let names: Vec<String> = chain.iter().map(TypeRef::full_name).collect();
        assert_eq!(
            names,
            [
                "System.Object",
                "System.Collections.Generic.Collection`1",
                "System.Collections.Generic.List`1",
                "System.Collections.Generic.List`1<Pets.Cat>",
            ]
        );
    }

    #[test]
    fn absent_type_yields_empty_chain() {
        let registry = registry_with_collections();
        let hierarchy = TypeHierarchy::new(&registry).unwrap();
        assert!(hierarchy.ancestor_chain(None).unwrap().is_empty());
    }

    #[test]
    fn cyclic_inheritance_hits_recursion_limit() {
        let registry = TypeRegistry::with_core_types();
        registry
            .register(TypeDef::new("Bad", "A", Some(TypeRef::named("Bad", "B"))))
            .unwrap();
        registry
            .register(TypeDef::new("Bad", "B", Some(TypeRef::named("Bad", "A"))))
            .unwrap();

        let hierarchy = TypeHierarchy::new(&registry).unwrap();
        let result = hierarchy.ancestor_chain(Some(&TypeRef::named("Bad", "A")));
        assert!(matches!(result, Err(Error::RecursionLimit(_))));
    }

    #[test]
    fn single_type_is_its_own_common_base() {
        let registry = registry_with_collections();
        let hierarchy = TypeHierarchy::new(&registry).unwrap();
        let cat = TypeRef::named("Pets", "Cat");
        let result = hierarchy.common_base_type(&[Some(cat.clone())]).unwrap();
        assert_eq!(result, Some(cat));
    }

    #[test]
    fn siblings_meet_at_shared_base() {
        let registry = registry_with_collections();
        let hierarchy = TypeHierarchy::new(&registry).unwrap();
        let result = hierarchy
            .common_base_type(&[
                Some(TypeRef::named("Pets", "Cat")),
                Some(TypeRef::named("Pets", "Dog")),
            ])
            .unwrap();
        assert_eq!(result, Some(TypeRef::named("Pets", "Animal")));
    }

    #[test]
    fn unrelated_types_meet_at_root() {
        let registry = registry_with_collections();
        let hierarchy = TypeHierarchy::new(&registry).unwrap();
        let list = TypeRef::generic(
            TypeRef::named("System.Collections.Generic", "List`1"),
            vec![TypeRef::named("Pets", "Cat")],
        );
        let arr = TypeRef::array(TypeRef::named("Pets", "Cat"));
        let result = hierarchy.common_base_type(&[Some(list), Some(arr)]).unwrap();
        assert_eq!(result, Some(TypeRef::named("System", "Object")));
    }

    #[test]
    fn subtype_and_supertype_meet_at_supertype() {
        let registry = registry_with_collections();
        let hierarchy = TypeHierarchy::new(&registry).unwrap();
        let result = hierarchy
            .common_base_type(&[
                Some(TypeRef::named("Pets", "Cat")),
                Some(TypeRef::named("Pets", "Animal")),
            ])
            .unwrap();
        assert_eq!(result, Some(TypeRef::named("Pets", "Animal")));
    }

    #[test]
    fn unknown_type_in_batch_yields_none() {
        let registry = registry_with_collections();
        let hierarchy = TypeHierarchy::new(&registry).unwrap();
        let result = hierarchy
            .common_base_type(&[Some(TypeRef::named("Pets", "Cat")), None])
            .unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn empty_batch_yields_none() {
        let registry = registry_with_collections();
        let hierarchy = TypeHierarchy::new(&registry).unwrap();
        assert_eq!(hierarchy.common_base_type(&[]).unwrap(), None);
    }
}
