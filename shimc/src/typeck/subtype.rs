//! Subtyping and type equality over the symbol graph.
//!
//! Implements nominal subtyping with variance:
//! - Class types: `A <: B` if `B`'s class is among `A`'s transitive
//!   supertypes with equal (invariant) type arguments
//! - Arrays: covariant for reference elements, invariant for primitives
//! - Function types: contravariant in parameters, covariant in return
//! - Intersections: `A & B <: C` if either part is, `T <: A & B` if both are
//! - Type parameters: `T <: B` if one of `T`'s bounds is

use crate::hir::{SymbolGraph, Type, TypeKind};

/// Type checker over an immutable symbol graph.
#[derive(Debug, Clone, Copy)]
pub struct TypeChecker<'g> {
    graph: &'g SymbolGraph,
}

impl<'g> TypeChecker<'g> {
    pub fn new(graph: &'g SymbolGraph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &'g SymbolGraph {
        self.graph
    }

    /// Check if type `a` is a subtype of type `b`.
    pub fn is_subtype(&self, a: &Type, b: &Type) -> bool {
        // Any type is a subtype of itself
        if self.equal_types(a, b) {
            return true;
        }

        match (a.kind.as_ref(), b.kind.as_ref()) {
            (_, TypeKind::Intersection(parts)) => parts.iter().all(|p| self.is_subtype(a, p)),
            (TypeKind::Intersection(parts), _) => parts.iter().any(|p| self.is_subtype(p, b)),

            // A type parameter is only known through its bounds
            (TypeKind::Param(id), _) => self
                .graph
                .type_param(*id)
                .is_some_and(|param| param.bounds.iter().any(|bound| self.is_subtype(bound, b))),

            (TypeKind::Class { .. }, TypeKind::Class { def_id: target, args: target_args }) => self
                .graph
                .all_supertypes(a)
                .iter()
                .any(|sup| match sup.kind.as_ref() {
                    TypeKind::Class { def_id, args } => {
                        def_id == target
                            && args.len() == target_args.len()
                            && args
                                .iter()
                                .zip(target_args)
                                .all(|(x, y)| self.equal_types(x, y))
                    }
                    _ => false,
                }),

            // Reference arrays are covariant, primitive arrays are not
            (TypeKind::Array { element: a_elem }, TypeKind::Array { element: b_elem }) => {
                if a_elem.as_primitive().is_some() || b_elem.as_primitive().is_some() {
                    self.equal_types(a_elem, b_elem)
                } else {
                    self.is_subtype(a_elem, b_elem)
                }
            }

            // Function types: contravariant in params, covariant in return
            (
                TypeKind::Fn { params: a_params, ret: a_ret },
                TypeKind::Fn { params: b_params, ret: b_ret },
            ) => {
                a_params.len() == b_params.len()
                    && a_params
                        .iter()
                        .zip(b_params)
                        .all(|(a, b)| self.is_subtype(b, a))
                    && self.is_subtype(a_ret, b_ret)
            }

            _ => false,
        }
    }

    /// Check if two types are structurally equal.
    pub fn equal_types(&self, a: &Type, b: &Type) -> bool {
        match (a.kind.as_ref(), b.kind.as_ref()) {
            (TypeKind::Primitive(pa), TypeKind::Primitive(pb)) => pa == pb,
            (
                TypeKind::Class { def_id: a_def, args: a_args },
                TypeKind::Class { def_id: b_def, args: b_args },
            ) => {
                a_def == b_def
                    && a_args.len() == b_args.len()
                    && a_args.iter().zip(b_args).all(|(a, b)| self.equal_types(a, b))
            }
            (TypeKind::Array { element: a_elem }, TypeKind::Array { element: b_elem }) => {
                self.equal_types(a_elem, b_elem)
            }
            (
                TypeKind::Fn { params: a_params, ret: a_ret },
                TypeKind::Fn { params: b_params, ret: b_ret },
            ) => {
                a_params.len() == b_params.len()
                    && a_params
                        .iter()
                        .zip(b_params)
                        .all(|(a, b)| self.equal_types(a, b))
                    && self.equal_types(a_ret, b_ret)
            }
            (TypeKind::Param(a_var), TypeKind::Param(b_var)) => a_var == b_var,
            // Intersection equality is order independent
            (TypeKind::Intersection(a_parts), TypeKind::Intersection(b_parts)) => {
                a_parts.len() == b_parts.len()
                    && a_parts
                        .iter()
                        .all(|a| b_parts.iter().any(|b| self.equal_types(a, b)))
            }
            (TypeKind::Unit, TypeKind::Unit) => true,
            (TypeKind::Error, TypeKind::Error) => true,
            _ => false,
        }
    }

    /// Check if a value of type `value` can be passed where `target` is
    /// expected, allowing boxing and unboxing conversions.
    pub fn is_assignable(&self, value: &Type, target: &Type) -> bool {
        self.is_subtype(value, target) || self.boxing_compatible(value, target)
    }

    fn boxing_compatible(&self, value: &Type, target: &Type) -> bool {
        match (value.kind.as_ref(), target.kind.as_ref()) {
            (TypeKind::Primitive(prim), TypeKind::Class { .. }) => self
                .graph
                .boxed_class(*prim)
                .is_some_and(|boxed| self.is_subtype(&Type::class(boxed.def_id), target)),
            (TypeKind::Class { def_id, .. }, TypeKind::Primitive(prim)) => {
                self.graph.unboxed_primitive(*def_id) == Some(*prim)
            }
            _ => false,
        }
    }
}
