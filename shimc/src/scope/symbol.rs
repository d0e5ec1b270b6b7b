//! Function symbols as seen by member lookup and call resolution.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::compat::SyntheticFunction;
use crate::hir::{DefId, FnDef, Name, TyVarId, Type, ValueParam, Visibility};
use crate::span::Span;
use crate::typeck::SamAdapter;

/// A function contributed by a member scope.
#[derive(Debug, Clone)]
pub enum FunctionSymbol {
    /// A function declared in the symbol graph.
    Declared(Arc<FnDef>),
    /// A member synthesized from a compat provider.
    Synthetic(Arc<SyntheticFunction>),
    /// A function whose SAM-interface parameters accept function values.
    SamAdapted(Arc<SamAdapter>),
}

impl FunctionSymbol {
    pub fn name(&self) -> Name {
        match self {
            FunctionSymbol::Declared(f) => f.name,
            FunctionSymbol::Synthetic(f) => f.name,
            FunctionSymbol::SamAdapted(adapter) => adapter.base().name(),
        }
    }

    /// The class the function is a member of.
    pub fn owner(&self) -> DefId {
        match self {
            FunctionSymbol::Declared(f) => f.owner,
            FunctionSymbol::Synthetic(f) => f.owner,
            FunctionSymbol::SamAdapted(adapter) => adapter.base().owner(),
        }
    }

    pub fn params(&self) -> &[ValueParam] {
        match self {
            FunctionSymbol::Declared(f) => &f.params,
            FunctionSymbol::Synthetic(f) => &f.params,
            FunctionSymbol::SamAdapted(adapter) => adapter.params(),
        }
    }

    pub fn return_type(&self) -> Option<&Type> {
        match self {
            FunctionSymbol::Declared(f) => f.return_type.as_ref(),
            FunctionSymbol::Synthetic(f) => f.return_type.as_ref(),
            FunctionSymbol::SamAdapted(adapter) => adapter.base().return_type(),
        }
    }

    pub fn type_params(&self) -> &[TyVarId] {
        match self {
            FunctionSymbol::Declared(f) => &f.type_params,
            FunctionSymbol::Synthetic(f) => &f.type_params,
            FunctionSymbol::SamAdapted(adapter) => adapter.base().type_params(),
        }
    }

    pub fn visibility(&self) -> Visibility {
        match self {
            FunctionSymbol::Declared(f) => f.visibility,
            FunctionSymbol::Synthetic(f) => f.visibility,
            FunctionSymbol::SamAdapted(adapter) => adapter.base().visibility(),
        }
    }

    /// Synthesized members are called like instance members.
    pub fn is_static(&self) -> bool {
        match self {
            FunctionSymbol::Declared(f) => f.is_static,
            FunctionSymbol::Synthetic(_) => false,
            FunctionSymbol::SamAdapted(adapter) => adapter.base().is_static(),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            FunctionSymbol::Declared(f) => f.span,
            FunctionSymbol::Synthetic(f) => f.span,
            FunctionSymbol::SamAdapted(adapter) => adapter.base().span(),
        }
    }

    pub fn as_declared(&self) -> Option<&Arc<FnDef>> {
        match self {
            FunctionSymbol::Declared(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_synthetic(&self) -> Option<&Arc<SyntheticFunction>> {
        match self {
            FunctionSymbol::Synthetic(f) => Some(f),
            _ => None,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, FunctionSymbol::Synthetic(_))
    }

    /// Remove one SAM adapter layer, if any.
    pub fn unwrap_sam_adapter(&self) -> &FunctionSymbol {
        match self {
            FunctionSymbol::SamAdapted(adapter) => adapter.base(),
            other => other,
        }
    }
}

impl PartialEq for FunctionSymbol {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FunctionSymbol::Declared(a), FunctionSymbol::Declared(b)) => a.def_id == b.def_id,
            (FunctionSymbol::Synthetic(a), FunctionSymbol::Synthetic(b)) => a == b,
            (FunctionSymbol::SamAdapted(a), FunctionSymbol::SamAdapted(b)) => a.base() == b.base(),
            _ => false,
        }
    }
}

impl Eq for FunctionSymbol {}

impl Hash for FunctionSymbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            FunctionSymbol::Declared(f) => f.def_id.hash(state),
            FunctionSymbol::Synthetic(f) => f.hash(state),
            FunctionSymbol::SamAdapted(adapter) => adapter.base().hash(state),
        }
    }
}
