//! Declarations of the symbol graph.

use rustc_hash::FxHashMap;

use super::annotation::Annotation;
use super::name::{FqName, Name};
use super::ty::{TyVarId, Type};
use crate::span::Span;

/// A unique identifier for a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefId {
    pub index: u32,
}

impl DefId {
    pub const fn new(index: u32) -> Self {
        Self { index }
    }

    pub fn index(self) -> u32 {
        self.index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Protected,
    Internal,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modality {
    Final,
    Open,
    Abstract,
    Sealed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Object,
    Annotation,
}

/// A declared type parameter with its upper bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParamDef {
    pub id: TyVarId,
    pub name: Name,
    pub bounds: Vec<Type>,
}

/// A class, interface or object declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    pub def_id: DefId,
    pub name: Name,
    pub package: FqName,
    pub kind: ClassKind,
    pub type_params: Vec<TyVarId>,
    /// Direct supertypes in declaration order.
    pub supertypes: Vec<Type>,
    pub annotations: Vec<Annotation>,
    /// Instance member functions in declaration order.
    pub members: Vec<DefId>,
    /// Functions of the static scope in declaration order.
    pub statics: Vec<DefId>,
    pub span: Span,
}

impl ClassDef {
    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    /// The type of `this` inside the class: the class applied to its own
    /// type parameters.
    pub fn this_type(&self) -> Type {
        Type::class_with_args(
            self.def_id,
            self.type_params.iter().map(|id| Type::param(*id)).collect(),
        )
    }

    pub fn annotation(&self, fq_name: &FqName) -> Option<&Annotation> {
        self.annotations.iter().find(|a| &a.fq_name == fq_name)
    }
}

/// A value parameter of a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueParam {
    pub name: Name,
    /// Zero-based position in the owning function's parameter list.
    pub index: u32,
    /// The declared type. For a vararg this is the array type.
    pub ty: Type,
    pub has_default: bool,
    pub vararg_element: Option<Type>,
    pub annotations: Vec<Annotation>,
}

impl ValueParam {
    pub fn is_vararg(&self) -> bool {
        self.vararg_element.is_some()
    }
}

/// A function declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FnDef {
    pub def_id: DefId,
    pub name: Name,
    /// The class this function is declared in.
    pub owner: DefId,
    pub is_static: bool,
    pub type_params: Vec<TyVarId>,
    pub params: Vec<ValueParam>,
    /// `None` when no return type is recorded; emitted as `void`.
    pub return_type: Option<Type>,
    pub visibility: Visibility,
    pub modality: Modality,
    pub annotations: Vec<Annotation>,
    pub span: Span,
}

impl FnDef {
    pub fn param_types(&self) -> impl Iterator<Item = &Type> {
        self.params.iter().map(|p| &p.ty)
    }

    pub fn has_defaults(&self) -> bool {
        self.params.iter().any(|p| p.has_default)
    }

    /// This function as seen through a parameterized owner type. The
    /// declaration identity is kept.
    pub fn substitute(&self, subst: &FxHashMap<TyVarId, Type>) -> FnDef {
        let params = self
            .params
            .iter()
            .map(|param| ValueParam {
                ty: param.ty.substitute(subst),
                vararg_element: param.vararg_element.as_ref().map(|e| e.substitute(subst)),
                ..param.clone()
            })
            .collect();
        FnDef {
            params,
            return_type: self.return_type.as_ref().map(|ty| ty.substitute(subst)),
            ..self.clone()
        }
    }
}

/// A type alias. Resolving a provider name to an alias is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAliasDef {
    pub def_id: DefId,
    pub name: Name,
    pub package: FqName,
    pub target: Type,
    pub span: Span,
}
