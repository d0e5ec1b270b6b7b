//! Semantic types.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::def::DefId;

/// A type parameter identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TyVarId {
    pub index: u32,
}

impl TyVarId {
    pub const fn new(index: u32) -> Self {
        Self { index }
    }
}

/// JVM primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTy {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveTy {
    pub const ALL: [PrimitiveTy; 8] = [
        PrimitiveTy::Boolean,
        PrimitiveTy::Byte,
        PrimitiveTy::Short,
        PrimitiveTy::Char,
        PrimitiveTy::Int,
        PrimitiveTy::Long,
        PrimitiveTy::Float,
        PrimitiveTy::Double,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveTy::Boolean => "Boolean",
            PrimitiveTy::Byte => "Byte",
            PrimitiveTy::Short => "Short",
            PrimitiveTy::Char => "Char",
            PrimitiveTy::Int => "Int",
            PrimitiveTy::Long => "Long",
            PrimitiveTy::Float => "Float",
            PrimitiveTy::Double => "Double",
        }
    }

    /// Fully qualified name of the wrapper class used when boxing.
    pub fn boxed_class_name(self) -> &'static str {
        match self {
            PrimitiveTy::Boolean => "java.lang.Boolean",
            PrimitiveTy::Byte => "java.lang.Byte",
            PrimitiveTy::Short => "java.lang.Short",
            PrimitiveTy::Char => "java.lang.Character",
            PrimitiveTy::Int => "java.lang.Integer",
            PrimitiveTy::Long => "java.lang.Long",
            PrimitiveTy::Float => "java.lang.Float",
            PrimitiveTy::Double => "java.lang.Double",
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, PrimitiveTy::Boolean | PrimitiveTy::Char)
    }
}

/// A semantic type. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Type {
    pub kind: Arc<TypeKind>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive(PrimitiveTy),
    /// A class or interface type, possibly applied to type arguments.
    Class { def_id: DefId, args: Vec<Type> },
    Array { element: Type },
    Fn { params: Vec<Type>, ret: Type },
    Param(TyVarId),
    Intersection(Vec<Type>),
    Unit,
    Error,
}

impl Type {
    pub fn new(kind: TypeKind) -> Self {
        Self { kind: Arc::new(kind) }
    }

    pub fn primitive(prim: PrimitiveTy) -> Self {
        Self::new(TypeKind::Primitive(prim))
    }

    pub fn boolean() -> Self {
        Self::primitive(PrimitiveTy::Boolean)
    }

    pub fn int() -> Self {
        Self::primitive(PrimitiveTy::Int)
    }

    pub fn long() -> Self {
        Self::primitive(PrimitiveTy::Long)
    }

    pub fn double() -> Self {
        Self::primitive(PrimitiveTy::Double)
    }

    pub fn unit() -> Self {
        Self::new(TypeKind::Unit)
    }

    pub fn error() -> Self {
        Self::new(TypeKind::Error)
    }

    pub fn class(def_id: DefId) -> Self {
        Self::new(TypeKind::Class { def_id, args: Vec::new() })
    }

    pub fn class_with_args(def_id: DefId, args: Vec<Type>) -> Self {
        Self::new(TypeKind::Class { def_id, args })
    }

    pub fn array(element: Type) -> Self {
        Self::new(TypeKind::Array { element })
    }

    pub fn function(params: Vec<Type>, ret: Type) -> Self {
        Self::new(TypeKind::Fn { params, ret })
    }

    pub fn param(id: TyVarId) -> Self {
        Self::new(TypeKind::Param(id))
    }

    pub fn intersection(parts: Vec<Type>) -> Self {
        Self::new(TypeKind::Intersection(parts))
    }

    /// The class or interface this type is declared by, if any.
    /// Type parameters and intersections have no class declaration.
    pub fn class_def(&self) -> Option<DefId> {
        match self.kind.as_ref() {
            TypeKind::Class { def_id, .. } => Some(*def_id),
            _ => None,
        }
    }

    pub fn as_primitive(&self) -> Option<PrimitiveTy> {
        match self.kind.as_ref() {
            TypeKind::Primitive(prim) => Some(*prim),
            _ => None,
        }
    }

    pub fn is_unit(&self) -> bool {
        matches!(self.kind.as_ref(), TypeKind::Unit)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind.as_ref(), TypeKind::Error)
    }

    /// Replace type parameters according to `subst`.
    pub fn substitute(&self, subst: &FxHashMap<TyVarId, Type>) -> Type {
        if subst.is_empty() {
            return self.clone();
        }
        match self.kind.as_ref() {
            TypeKind::Param(id) => subst.get(id).cloned().unwrap_or_else(|| self.clone()),
            TypeKind::Class { def_id, args } => Type::class_with_args(
                *def_id,
                args.iter().map(|a| a.substitute(subst)).collect(),
            ),
            TypeKind::Array { element } => Type::array(element.substitute(subst)),
            TypeKind::Fn { params, ret } => Type::function(
                params.iter().map(|p| p.substitute(subst)).collect(),
                ret.substitute(subst),
            ),
            TypeKind::Intersection(parts) => {
                Type::intersection(parts.iter().map(|p| p.substitute(subst)).collect())
            }
            TypeKind::Primitive(_) | TypeKind::Unit | TypeKind::Error => self.clone(),
        }
    }
}
