//! SAM adapters.
//!
//! A parameter whose type is a single-abstract-method interface also
//! accepts a function value of the matching shape. The resolver tries a
//! [`SamAdapter`] when the plain function does not accept a lambda argument;
//! the adapter has the same parameters as the function it wraps, except
//! that SAM interface types are replaced by function types.

use rustc_hash::FxHashMap;

use crate::hir::{SymbolGraph, TyVarId, Type, TypeKind, ValueParam};
use crate::scope::FunctionSymbol;

/// A function seen through SAM conversion of its parameters.
#[derive(Debug, Clone)]
pub struct SamAdapter {
    base: FunctionSymbol,
    params: Vec<ValueParam>,
}

impl SamAdapter {
    /// Adapt `function`, or return `None` if none of its parameters has a
    /// SAM interface type. Adapters are never nested.
    pub fn adapt(graph: &SymbolGraph, function: &FunctionSymbol) -> Option<SamAdapter> {
        if matches!(function, FunctionSymbol::SamAdapted(_)) {
            return None;
        }

        let mut converted = false;
        let params: Vec<ValueParam> = function
            .params()
            .iter()
            .map(|param| match sam_function_type(graph, &param.ty) {
                Some(fn_ty) => {
                    converted = true;
                    ValueParam {
                        ty: fn_ty,
                        ..param.clone()
                    }
                }
                None => param.clone(),
            })
            .collect();

        converted.then(|| SamAdapter {
            base: function.clone(),
            params,
        })
    }

    /// The function this adapter wraps.
    pub fn base(&self) -> &FunctionSymbol {
        &self.base
    }

    pub fn params(&self) -> &[ValueParam] {
        &self.params
    }
}

/// The function type a SAM interface type converts from.
pub fn sam_function_type(graph: &SymbolGraph, ty: &Type) -> Option<Type> {
    let TypeKind::Class { def_id, args } = ty.kind.as_ref() else {
        return None;
    };
    let method = graph.sam_method(*def_id)?;
    let interface = graph.class(*def_id)?;
    let subst: FxHashMap<TyVarId, Type> = interface
        .type_params
        .iter()
        .copied()
        .zip(args.iter().cloned())
        .collect();

    let params = method.param_types().map(|p| p.substitute(&subst)).collect();
    let ret = method
        .return_type
        .as_ref()
        .map_or_else(Type::unit, |r| r.substitute(&subst));
    Some(Type::function(params, ret))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::ViewFixture;
    use crate::hir::{Modality, SymbolGraphBuilder};
    use std::sync::Arc;

    #[test]
    fn test_sam_function_type() {
        let fx = ViewFixture::new();
        assert_eq!(
            sam_function_type(&fx.graph, &Type::class(fx.runnable)),
            Some(Type::function(vec![], Type::unit()))
        );
        assert_eq!(sam_function_type(&fx.graph, &Type::class(fx.view)), None);
        assert_eq!(sam_function_type(&fx.graph, &Type::int()), None);
    }

    #[test]
    fn test_generic_sam_is_substituted() {
        let mut b = SymbolGraphBuilder::new();
        let t = b.type_param("T", vec![]);
        let consumer = b.interface("Consumer");
        b.add_class_type_param(consumer, t);
        b.function(consumer, "accept")
            .param("value", Type::param(t))
            .modality(Modality::Abstract)
            .finish();
        let graph = b.build();

        let ty = Type::class_with_args(consumer, vec![Type::long()]);
        assert_eq!(
            sam_function_type(&graph, &ty),
            Some(Type::function(vec![Type::long()], Type::unit()))
        );
    }

    #[test]
    fn test_adapt_replaces_only_sam_parameters() {
        let fx = ViewFixture::new();
        let compat = fx.graph.class(fx.view_compat).unwrap();
        let name = fx.graph.name("samAdapter").unwrap();
        let f = fx.graph.functions_named(&compat.statics, name).next().unwrap();
        let symbol = FunctionSymbol::Declared(f.clone());

        let adapter = SamAdapter::adapt(&fx.graph, &symbol).unwrap();
        assert_eq!(adapter.params()[0].ty, Type::class(fx.view));
        assert_eq!(adapter.params()[1].ty, Type::function(vec![], Type::unit()));
        assert_eq!(adapter.base(), &symbol);

        let wrapped = FunctionSymbol::SamAdapted(Arc::new(adapter));
        assert!(SamAdapter::adapt(&fx.graph, &wrapped).is_none());
        assert_eq!(wrapped.unwrap_sam_adapter(), &symbol);
    }

    #[test]
    fn test_adapt_without_sam_parameters() {
        let fx = ViewFixture::new();
        let compat = fx.graph.class(fx.view_compat).unwrap();
        let name = fx.graph.name("noArgs").unwrap();
        let f = fx.graph.functions_named(&compat.statics, name).next().unwrap();

        assert!(SamAdapter::adapt(&fx.graph, &FunctionSymbol::Declared(f.clone())).is_none());
    }
}
