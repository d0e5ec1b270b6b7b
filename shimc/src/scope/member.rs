//! Member scopes.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::compat::CompatError;
use crate::hir::{DefId, FnDef, Name, SymbolGraph, TyVarId, Type};
use crate::typeck::TypeChecker;

use super::compat::CompatMemberScope;
use super::symbol::FunctionSymbol;

/// The functions visible by name on a type.
pub trait MemberScope: Send + Sync + fmt::Debug {
    /// Functions named `name`, in contribution order.
    fn contributed_functions(&self, name: Name) -> Vec<FunctionSymbol>;
}

/// Which functions of a class a [`ClassMemberScope`] contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    /// Instance members, including inherited ones that are not overridden.
    Instance,
    /// The class's static scope.
    Static,
}

/// The declared members of a class type.
#[derive(Debug)]
pub struct ClassMemberScope {
    graph: Arc<SymbolGraph>,
    ty: Type,
    kind: ScopeKind,
}

impl ClassMemberScope {
    /// Instance members of `ty`. A type without a class declaration has no
    /// members.
    pub fn instance(graph: Arc<SymbolGraph>, ty: Type) -> Self {
        Self {
            graph,
            ty,
            kind: ScopeKind::Instance,
        }
    }

    /// Static functions declared in `class`.
    pub fn statics(graph: Arc<SymbolGraph>, class: DefId) -> Self {
        Self {
            graph,
            ty: Type::class(class),
            kind: ScopeKind::Static,
        }
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    fn overrides(&self, existing: &FnDef, inherited: &FnDef) -> bool {
        let checker = TypeChecker::new(&self.graph);
        existing.params.len() == inherited.params.len()
            && existing
                .param_types()
                .zip(inherited.param_types())
                .all(|(a, b)| checker.equal_types(a, b))
    }
}

impl MemberScope for ClassMemberScope {
    /// Member signatures are seen through `ty`: type parameters of the
    /// declaring class are replaced by the arguments `ty` supplies for it.
    fn contributed_functions(&self, name: Name) -> Vec<FunctionSymbol> {
        let Some(class) = self.ty.class_def().and_then(|id| self.graph.class(id)) else {
            return Vec::new();
        };

        if self.kind == ScopeKind::Static {
            return self
                .graph
                .functions_named(&class.statics, name)
                .map(|f| FunctionSymbol::Declared(f.clone()))
                .collect();
        }

        let subst = self.graph.type_substitution(&self.ty);
        let mut functions: Vec<Arc<FnDef>> = self
            .graph
            .functions_named(&class.members, name)
            .map(|f| substituted(f, &subst))
            .collect();
        for supertype in self.graph.all_supertypes(&self.ty) {
            let Some(super_class) = supertype.class_def().and_then(|id| self.graph.class(id)) else {
                continue;
            };
            let subst = self.graph.type_substitution(&supertype);
            for inherited in self.graph.functions_named(&super_class.members, name) {
                let inherited = substituted(inherited, &subst);
                if !functions.iter().any(|f| self.overrides(f, &inherited)) {
                    functions.push(inherited);
                }
            }
        }

        functions.into_iter().map(FunctionSymbol::Declared).collect()
    }
}

fn substituted(function: &Arc<FnDef>, subst: &FxHashMap<TyVarId, Type>) -> Arc<FnDef> {
    if subst.is_empty() {
        function.clone()
    } else {
        Arc::new(function.substitute(subst))
    }
}

/// A member scope as seen by call resolution: either an ordinary scope or
/// one decorated with compat members.
#[derive(Debug, Clone)]
pub enum ResolutionScope {
    Base(Arc<dyn MemberScope>),
    Compat(Arc<CompatMemberScope>),
}

impl ResolutionScope {
    pub fn base(scope: impl MemberScope + 'static) -> Self {
        ResolutionScope::Base(Arc::new(scope))
    }

    /// Functions named `name`.
    ///
    /// Decorated scopes list synthesized members first, followed by the
    /// originals they do not shadow.
    pub fn contributed_functions(&self, name: Name) -> Result<Arc<[FunctionSymbol]>, CompatError> {
        match self {
            ResolutionScope::Base(scope) => Ok(scope.contributed_functions(name).into()),
            ResolutionScope::Compat(scope) => scope.contributed_functions(name),
        }
    }

    pub fn is_compat(&self) -> bool {
        matches!(self, ResolutionScope::Compat(_))
    }

    /// Identity of the underlying scope object, used as a cache key.
    pub fn identity(&self) -> usize {
        match self {
            ResolutionScope::Base(scope) => Arc::as_ptr(scope) as *const () as usize,
            ResolutionScope::Compat(scope) => Arc::as_ptr(scope) as *const () as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::ViewFixture;
    use crate::hir::SymbolGraphBuilder;

    #[test]
    fn test_instance_scope_includes_inherited_members() {
        let fx = ViewFixture::new();
        let scope = ClassMemberScope::instance(fx.graph.clone(), Type::class(fx.sub_view));
        let name = fx.graph.name("differentParamType").unwrap();

        let functions = scope.contributed_functions(name);
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].owner(), fx.view);
    }

    #[test]
    fn test_static_functions_are_not_members() {
        let fx = ViewFixture::new();
        let name = fx.graph.name("noArgs").unwrap();

        let members = ClassMemberScope::instance(fx.graph.clone(), Type::class(fx.view_compat));
        assert!(members.contributed_functions(name).is_empty());

        let statics = ClassMemberScope::statics(fx.graph.clone(), fx.view_compat);
        assert_eq!(statics.contributed_functions(name).len(), 1);
    }

    #[test]
    fn test_override_hides_inherited_member() {
        let mut b = SymbolGraphBuilder::new();
        let base = b.class("Base");
        b.function(base, "draw").param("x", Type::int()).finish();
        b.function(base, "draw").param("x", Type::long()).finish();
        let derived = b.class("Derived");
        b.add_supertype(derived, Type::class(base));
        let own = b.function(derived, "draw").param("x", Type::int()).finish();
        let graph = Arc::new(b.build());
        let name = graph.name("draw").unwrap();

        let functions = ClassMemberScope::instance(graph, Type::class(derived)).contributed_functions(name);
        assert_eq!(functions.len(), 2);
        assert_eq!(functions[0].as_declared().map(|f| f.def_id), Some(own));
        assert_eq!(functions[1].params()[0].ty, Type::long());
    }

    #[test]
    fn test_members_are_seen_through_type_arguments() {
        let mut b = SymbolGraphBuilder::new();
        let string = b.class("String");
        let base = b.class("Base");
        let t = b.type_param("T", vec![]);
        b.add_class_type_param(base, t);
        let put = b.function(base, "put").param("x", Type::param(t)).finish();
        b.function(base, "put").param("x", Type::array(Type::param(t))).finish();
        let derived = b.class("Derived");
        b.add_supertype(derived, Type::class_with_args(base, vec![Type::class(string)]));
        b.function(derived, "put").param("x", Type::class(string)).finish();
        let graph = Arc::new(b.build());
        let name = graph.name("put").unwrap();

        let base_of_string = Type::class_with_args(base, vec![Type::class(string)]);
        let functions =
            ClassMemberScope::instance(graph.clone(), base_of_string).contributed_functions(name);
        assert_eq!(functions.len(), 2);
        assert_eq!(functions[0].as_declared().map(|f| f.def_id), Some(put));
        assert_eq!(functions[0].params()[0].ty, Type::class(string));
        assert_eq!(functions[1].params()[0].ty, Type::array(Type::class(string)));

        // `Derived.put(String)` overrides the substituted `Base<String>.put(T)`
        let functions =
            ClassMemberScope::instance(graph.clone(), Type::class(derived)).contributed_functions(name);
        assert_eq!(functions.len(), 2);
        assert_eq!(functions[0].owner(), derived);
        assert_eq!(functions[1].params()[0].ty, Type::array(Type::class(string)));

        // Raw uses keep the declared types
        let raw = ClassMemberScope::instance(graph, Type::class(base)).contributed_functions(name);
        assert_eq!(raw[0].params()[0].ty, Type::param(t));
    }

    #[test]
    fn test_non_class_type_has_no_members() {
        let fx = ViewFixture::new();
        let name = fx.graph.name("noArgs").unwrap();
        let scope = ClassMemberScope::instance(fx.graph.clone(), Type::int());
        assert!(scope.contributed_functions(name).is_empty());
    }

    #[test]
    fn test_resolution_scope_identity() {
        let fx = ViewFixture::new();
        let scope = ResolutionScope::base(ClassMemberScope::instance(
            fx.graph.clone(),
            Type::class(fx.view),
        ));
        let same = scope.clone();
        let other = ResolutionScope::base(ClassMemberScope::instance(
            fx.graph.clone(),
            Type::class(fx.view),
        ));

        assert_eq!(scope.identity(), same.identity());
        assert_ne!(scope.identity(), other.identity());
        assert!(!scope.is_compat());
    }
}
