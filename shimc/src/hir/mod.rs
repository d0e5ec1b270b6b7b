//! The declaration and type model consumed by the compat machinery.
//!
//! This is the already-built symbol graph of a compilation: classes,
//! functions, parameters, annotations and types. Nothing in this crate
//! mutates it after [`SymbolGraphBuilder::build`].

pub mod annotation;
pub mod def;
pub mod expr;
pub mod graph;
pub mod name;
pub mod ty;

pub use annotation::{Annotation, ConstValue};
pub use def::{
    ClassDef, ClassKind, DefId, FnDef, Modality, TypeAliasDef, TypeParamDef, ValueParam,
    Visibility,
};
pub use expr::{Expr, ExprKind, Literal};
pub use graph::{Classifier, FunctionBuilder, SymbolGraph, SymbolGraphBuilder};
pub use name::{FqName, Name};
pub use ty::{PrimitiveTy, TyVarId, Type, TypeKind};
