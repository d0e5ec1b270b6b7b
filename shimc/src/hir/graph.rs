//! The symbol graph.
//!
//! The graph is built once by the frontend through [`SymbolGraphBuilder`]
//! and is immutable afterwards, which is what lets every compat cache be a
//! plain memoized function with no invalidation.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use string_interner::DefaultStringInterner;

use super::annotation::Annotation;
use super::def::{
    ClassDef, ClassKind, DefId, FnDef, Modality, TypeAliasDef, TypeParamDef, ValueParam,
    Visibility,
};
use super::name::{FqName, Name};
use super::ty::{PrimitiveTy, TyVarId, Type, TypeKind};
use crate::span::Span;

/// What a qualified name resolves to in a package.
#[derive(Debug, Clone)]
pub enum Classifier {
    Class(Arc<ClassDef>),
    TypeAlias(Arc<TypeAliasDef>),
}

/// The immutable, already-resolved declarations of a compilation.
pub struct SymbolGraph {
    interner: DefaultStringInterner,
    classes: IndexMap<DefId, Arc<ClassDef>>,
    functions: FxHashMap<DefId, Arc<FnDef>>,
    aliases: FxHashMap<DefId, Arc<TypeAliasDef>>,
    type_params: FxHashMap<TyVarId, TypeParamDef>,
    /// Package name -> simple name -> classifier.
    packages: FxHashMap<FqName, IndexMap<Name, DefId>>,
}

impl SymbolGraph {
    /// Look up an already interned name.
    pub fn name(&self, text: &str) -> Option<Name> {
        self.interner.get(text).map(Name::from_symbol)
    }

    pub fn name_str(&self, name: Name) -> &str {
        self.interner.resolve(name.symbol()).unwrap_or("<unknown>")
    }

    pub fn class(&self, def_id: DefId) -> Option<&Arc<ClassDef>> {
        self.classes.get(&def_id)
    }

    /// All classes in declaration order.
    pub fn classes(&self) -> impl Iterator<Item = &Arc<ClassDef>> {
        self.classes.values()
    }

    pub fn function(&self, def_id: DefId) -> Option<&Arc<FnDef>> {
        self.functions.get(&def_id)
    }

    pub fn type_param(&self, id: TyVarId) -> Option<&TypeParamDef> {
        self.type_params.get(&id)
    }

    /// Resolve `simple_name` inside `package`.
    pub fn classifier(&self, package: &FqName, simple_name: &str) -> Option<Classifier> {
        let name = self.name(simple_name)?;
        let def_id = *self.packages.get(package)?.get(&name)?;
        if let Some(class) = self.classes.get(&def_id) {
            return Some(Classifier::Class(class.clone()));
        }
        self.aliases
            .get(&def_id)
            .map(|alias| Classifier::TypeAlias(alias.clone()))
    }

    pub fn class_by_fq_name(&self, fq_name: &str) -> Option<Arc<ClassDef>> {
        let fq_name = FqName::new(fq_name);
        let (package, short_name) = fq_name.split_last();
        match self.classifier(&package, short_name)? {
            Classifier::Class(class) => Some(class),
            Classifier::TypeAlias(_) => None,
        }
    }

    pub fn fq_name(&self, class: &ClassDef) -> FqName {
        class.package.child(self.name_str(class.name))
    }

    /// The JVM internal name of a class (`android/view/View`).
    pub fn internal_name(&self, class: &ClassDef) -> String {
        self.fq_name(class).to_internal_name()
    }

    /// Functions with the given name among `ids`, in the order of `ids`.
    pub fn functions_named<'g>(
        &'g self,
        ids: &'g [DefId],
        name: Name,
    ) -> impl Iterator<Item = &'g Arc<FnDef>> + 'g {
        ids.iter()
            .filter_map(|id| self.functions.get(id))
            .filter(move |f| f.name == name)
    }

    /// The mapping from a class type's type parameters to its arguments.
    /// Empty for non-class types and raw uses of generic classes.
    pub fn type_substitution(&self, ty: &Type) -> FxHashMap<TyVarId, Type> {
        let TypeKind::Class { def_id, args } = ty.kind.as_ref() else {
            return FxHashMap::default();
        };
        let Some(class) = self.classes.get(def_id) else {
            return FxHashMap::default();
        };
        class
            .type_params
            .iter()
            .copied()
            .zip(args.iter().cloned())
            .collect()
    }

    /// Direct supertypes of a class type with the class's type parameters
    /// replaced by the type's arguments.
    pub fn direct_supertypes(&self, ty: &Type) -> Vec<Type> {
        let Some(class) = ty.class_def().and_then(|id| self.classes.get(&id)) else {
            return Vec::new();
        };
        let subst = self.type_substitution(ty);
        class.supertypes.iter().map(|s| s.substitute(&subst)).collect()
    }

    /// All transitive supertypes of `ty`, nearest first, each listed once.
    /// `ty` itself is not included.
    pub fn all_supertypes(&self, ty: &Type) -> Vec<Type> {
        let mut seen: FxHashSet<Type> = FxHashSet::default();
        seen.insert(ty.clone());

        let mut queue: VecDeque<Type> = self.direct_supertypes(ty).into();
        let mut result = Vec::new();
        while let Some(next) = queue.pop_front() {
            if !seen.insert(next.clone()) {
                continue;
            }
            queue.extend(self.direct_supertypes(&next));
            result.push(next);
        }
        result
    }

    /// The single abstract method of a SAM interface.
    pub fn sam_method(&self, def_id: DefId) -> Option<Arc<FnDef>> {
        let class = self.classes.get(&def_id)?;
        if !class.is_interface() {
            return None;
        }
        let mut abstract_members = class
            .members
            .iter()
            .filter_map(|id| self.functions.get(id))
            .filter(|f| f.modality == Modality::Abstract);
        let method = abstract_members.next()?;
        if abstract_members.next().is_some() {
            return None;
        }
        Some(method.clone())
    }

    /// The wrapper class for a primitive, if the graph declares it.
    pub fn boxed_class(&self, prim: PrimitiveTy) -> Option<Arc<ClassDef>> {
        self.class_by_fq_name(prim.boxed_class_name())
    }

    /// The primitive wrapped by a wrapper class.
    pub fn unboxed_primitive(&self, def_id: DefId) -> Option<PrimitiveTy> {
        let class = self.classes.get(&def_id)?;
        let fq_name = self.fq_name(class);
        PrimitiveTy::ALL
            .into_iter()
            .find(|prim| prim.boxed_class_name() == fq_name.as_str())
    }

    /// Render a type for diagnostics and logs.
    pub fn display_type(&self, ty: &Type) -> String {
        match ty.kind.as_ref() {
            TypeKind::Primitive(prim) => prim.name().to_string(),
            TypeKind::Class { def_id, args } => {
                let name = self
                    .classes
                    .get(def_id)
                    .map(|c| self.name_str(c.name).to_string())
                    .unwrap_or_else(|| format!("<class {}>", def_id.index));
                if args.is_empty() {
                    name
                } else {
                    format!("{}<{}>", name, self.display_list(args))
                }
            }
            TypeKind::Array { element } => format!("Array<{}>", self.display_type(element)),
            TypeKind::Fn { params, ret } => {
                format!("({}) -> {}", self.display_list(params), self.display_type(ret))
            }
            TypeKind::Param(id) => self
                .type_params
                .get(id)
                .map(|p| self.name_str(p.name).to_string())
                .unwrap_or_else(|| format!("T{}", id.index)),
            TypeKind::Intersection(parts) => parts
                .iter()
                .map(|p| self.display_type(p))
                .collect::<Vec<_>>()
                .join(" & "),
            TypeKind::Unit => "Unit".to_string(),
            TypeKind::Error => "{error}".to_string(),
        }
    }

    fn display_list(&self, types: &[Type]) -> String {
        types
            .iter()
            .map(|t| self.display_type(t))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Debug for SymbolGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolGraph")
            .field("classes", &self.classes.len())
            .field("functions", &self.functions.len())
            .field("aliases", &self.aliases.len())
            .field("packages", &self.packages.len())
            .finish()
    }
}

/// Incrementally declares classes and functions, then freezes them into a
/// [`SymbolGraph`].
pub struct SymbolGraphBuilder {
    interner: DefaultStringInterner,
    classes: IndexMap<DefId, ClassDef>,
    functions: FxHashMap<DefId, FnDef>,
    aliases: FxHashMap<DefId, TypeAliasDef>,
    type_params: FxHashMap<TyVarId, TypeParamDef>,
    packages: FxHashMap<FqName, IndexMap<Name, DefId>>,
    next_def_id: u32,
    next_ty_var: u32,
}

impl SymbolGraphBuilder {
    pub fn new() -> Self {
        Self {
            interner: DefaultStringInterner::new(),
            classes: IndexMap::new(),
            functions: FxHashMap::default(),
            aliases: FxHashMap::default(),
            type_params: FxHashMap::default(),
            packages: FxHashMap::default(),
            next_def_id: 0,
            next_ty_var: 0,
        }
    }

    pub fn intern(&mut self, text: &str) -> Name {
        Name::from_symbol(self.interner.get_or_intern(text))
    }

    fn next_def(&mut self) -> DefId {
        let id = DefId::new(self.next_def_id);
        self.next_def_id += 1;
        id
    }

    fn register_classifier(&mut self, fq_name: &str) -> (DefId, Name, FqName) {
        let fq_name = FqName::new(fq_name);
        let (package, short_name) = fq_name.split_last();
        let name = self.intern(short_name);
        let def_id = self.next_def();
        self.packages
            .entry(package.clone())
            .or_default()
            .insert(name, def_id);
        (def_id, name, package)
    }

    /// Declare a class-like type under its fully qualified name.
    pub fn declare_class(&mut self, fq_name: &str, kind: ClassKind, span: Span) -> DefId {
        let (def_id, name, package) = self.register_classifier(fq_name);
        self.classes.insert(
            def_id,
            ClassDef {
                def_id,
                name,
                package,
                kind,
                type_params: Vec::new(),
                supertypes: Vec::new(),
                annotations: Vec::new(),
                members: Vec::new(),
                statics: Vec::new(),
                span,
            },
        );
        def_id
    }

    pub fn class(&mut self, fq_name: &str) -> DefId {
        self.declare_class(fq_name, ClassKind::Class, Span::dummy())
    }

    pub fn interface(&mut self, fq_name: &str) -> DefId {
        self.declare_class(fq_name, ClassKind::Interface, Span::dummy())
    }

    pub fn type_alias(&mut self, fq_name: &str, target: Type) -> DefId {
        let (def_id, name, package) = self.register_classifier(fq_name);
        self.aliases.insert(
            def_id,
            TypeAliasDef {
                def_id,
                name,
                package,
                target,
                span: Span::dummy(),
            },
        );
        def_id
    }

    pub fn type_param(&mut self, name: &str, bounds: Vec<Type>) -> TyVarId {
        let id = TyVarId::new(self.next_ty_var);
        self.next_ty_var += 1;
        let name = self.intern(name);
        self.type_params.insert(id, TypeParamDef { id, name, bounds });
        id
    }

    pub fn add_class_type_param(&mut self, class: DefId, id: TyVarId) {
        debug_assert!(self.classes.contains_key(&class), "unknown class {:?}", class);
        if let Some(class) = self.classes.get_mut(&class) {
            class.type_params.push(id);
        }
    }

    pub fn add_supertype(&mut self, class: DefId, supertype: Type) {
        debug_assert!(self.classes.contains_key(&class), "unknown class {:?}", class);
        if let Some(class) = self.classes.get_mut(&class) {
            class.supertypes.push(supertype);
        }
    }

    pub fn annotate(&mut self, class: DefId, annotation: Annotation) {
        debug_assert!(self.classes.contains_key(&class), "unknown class {:?}", class);
        if let Some(class) = self.classes.get_mut(&class) {
            class.annotations.push(annotation);
        }
    }

    /// Start declaring a function in `owner`.
    pub fn function(&mut self, owner: DefId, name: &str) -> FunctionBuilder<'_> {
        let name = self.intern(name);
        let def_id = self.next_def();
        FunctionBuilder {
            builder: self,
            def: FnDef {
                def_id,
                name,
                owner,
                is_static: false,
                type_params: Vec::new(),
                params: Vec::new(),
                return_type: Some(Type::unit()),
                visibility: Visibility::Public,
                modality: Modality::Final,
                annotations: Vec::new(),
                span: Span::dummy(),
            },
        }
    }

    pub fn build(self) -> SymbolGraph {
        SymbolGraph {
            interner: self.interner,
            classes: self
                .classes
                .into_iter()
                .map(|(id, class)| (id, Arc::new(class)))
                .collect(),
            functions: self
                .functions
                .into_iter()
                .map(|(id, function)| (id, Arc::new(function)))
                .collect(),
            aliases: self
                .aliases
                .into_iter()
                .map(|(id, alias)| (id, Arc::new(alias)))
                .collect(),
            type_params: self.type_params,
            packages: self.packages,
        }
    }
}

impl Default for SymbolGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Declares one function; see [`SymbolGraphBuilder::function`].
pub struct FunctionBuilder<'b> {
    builder: &'b mut SymbolGraphBuilder,
    def: FnDef,
}

impl FunctionBuilder<'_> {
    fn push_param(mut self, name: &str, ty: Type, has_default: bool, vararg_element: Option<Type>) -> Self {
        let name = self.builder.intern(name);
        let index = self.def.params.len() as u32;
        self.def.params.push(ValueParam {
            name,
            index,
            ty,
            has_default,
            vararg_element,
            annotations: Vec::new(),
        });
        self
    }

    pub fn param(self, name: &str, ty: Type) -> Self {
        self.push_param(name, ty, false, None)
    }

    pub fn param_with_default(self, name: &str, ty: Type) -> Self {
        self.push_param(name, ty, true, None)
    }

    /// A vararg parameter; its declared type is an array of `element`.
    pub fn vararg(self, name: &str, element: Type) -> Self {
        self.push_param(name, Type::array(element.clone()), false, Some(element))
    }

    /// Annotate the most recently added parameter.
    pub fn annotate_param(mut self, annotation: Annotation) -> Self {
        if let Some(param) = self.def.params.last_mut() {
            param.annotations.push(annotation);
        }
        self
    }

    pub fn returns(mut self, ty: Type) -> Self {
        self.def.return_type = Some(ty);
        self
    }

    pub fn no_return_type(mut self) -> Self {
        self.def.return_type = None;
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.def.visibility = visibility;
        self
    }

    pub fn modality(mut self, modality: Modality) -> Self {
        self.def.modality = modality;
        self
    }

    /// Place the function in the owner's static scope.
    pub fn in_static_scope(mut self) -> Self {
        self.def.is_static = true;
        self
    }

    pub fn type_param(mut self, id: TyVarId) -> Self {
        self.def.type_params.push(id);
        self
    }

    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.def.annotations.push(annotation);
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.def.span = span;
        self
    }

    pub fn finish(self) -> DefId {
        let FunctionBuilder { builder, def } = self;
        let def_id = def.def_id;
        debug_assert!(builder.classes.contains_key(&def.owner), "unknown owner {:?}", def.owner);
        if let Some(owner) = builder.classes.get_mut(&def.owner) {
            if def.is_static {
                owner.statics.push(def_id);
            } else {
                owner.members.push(def_id);
            }
        }
        builder.functions.insert(def_id, def);
        def_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_graph_is_shareable() {
        assert_send_sync::<SymbolGraph>();
    }

    #[test]
    fn test_classifier_lookup() {
        let mut b = SymbolGraphBuilder::new();
        let view = b.class("android.view.View");
        let alias = b.type_alias("android.view.ViewAlias", Type::class(view));
        let graph = b.build();

        let package = FqName::new("android.view");
        assert!(matches!(
            graph.classifier(&package, "View"),
            Some(Classifier::Class(c)) if c.def_id == view
        ));
        assert!(matches!(
            graph.classifier(&package, "ViewAlias"),
            Some(Classifier::TypeAlias(a)) if a.def_id == alias
        ));
        assert!(graph.classifier(&FqName::root(), "View").is_none());
        assert!(graph.classifier(&package, "Nothing").is_none());
        assert_eq!(
            graph.class(view).map(|c| graph.internal_name(c)),
            Some("android/view/View".to_string())
        );
    }

    #[test]
    fn test_function_placement() {
        let mut b = SymbolGraphBuilder::new();
        let view = b.class("View");
        let member = b.function(view, "draw").finish();
        let stat = b.function(view, "create").in_static_scope().finish();
        let graph = b.build();

        let class = graph.class(view).unwrap();
        assert_eq!(class.members, vec![member]);
        assert_eq!(class.statics, vec![stat]);
        assert_eq!(graph.function(member).unwrap().owner, view);
    }

    #[test]
    fn test_supertypes_substitute_arguments() {
        let mut b = SymbolGraphBuilder::new();
        let t = b.type_param("T", vec![]);
        let base = b.class("Base");
        b.add_class_type_param(base, t);
        let u = b.type_param("U", vec![]);
        let derived = b.class("Derived");
        b.add_class_type_param(derived, u);
        b.add_supertype(derived, Type::class_with_args(base, vec![Type::param(u)]));
        let graph = b.build();

        let ty = Type::class_with_args(derived, vec![Type::int()]);
        assert_eq!(
            graph.direct_supertypes(&ty),
            vec![Type::class_with_args(base, vec![Type::int()])]
        );
    }

    #[test]
    fn test_all_supertypes_breadth_first_and_deduplicated() {
        let mut b = SymbolGraphBuilder::new();
        let root = b.class("Root");
        let left = b.interface("Left");
        let right = b.class("Right");
        let leaf = b.class("Leaf");
        b.add_supertype(left, Type::class(root));
        b.add_supertype(right, Type::class(root));
        b.add_supertype(leaf, Type::class(right));
        b.add_supertype(leaf, Type::class(left));
        let graph = b.build();

        assert_eq!(
            graph.all_supertypes(&Type::class(leaf)),
            vec![Type::class(right), Type::class(left), Type::class(root)]
        );
    }

    #[test]
    fn test_supertype_cycle_terminates() {
        let mut b = SymbolGraphBuilder::new();
        let a = b.class("A");
        let c = b.class("C");
        b.add_supertype(a, Type::class(c));
        b.add_supertype(c, Type::class(a));
        let graph = b.build();

        assert_eq!(graph.all_supertypes(&Type::class(a)), vec![Type::class(c)]);
    }

    #[test]
    fn test_sam_method() {
        let mut b = SymbolGraphBuilder::new();
        let runnable = b.interface("java.lang.Runnable");
        let run = b.function(runnable, "run").modality(Modality::Abstract).finish();
        let two = b.interface("Two");
        b.function(two, "a").modality(Modality::Abstract).finish();
        b.function(two, "b").modality(Modality::Abstract).finish();
        let graph = b.build();

        assert_eq!(graph.sam_method(runnable).map(|f| f.def_id), Some(run));
        assert!(graph.sam_method(two).is_none());
    }

    #[test]
    fn test_boxing_lookup() {
        let mut b = SymbolGraphBuilder::new();
        let integer = b.class("java.lang.Integer");
        let graph = b.build();

        assert_eq!(graph.boxed_class(PrimitiveTy::Int).map(|c| c.def_id), Some(integer));
        assert_eq!(graph.unboxed_primitive(integer), Some(PrimitiveTy::Int));
        assert!(graph.boxed_class(PrimitiveTy::Long).is_none());
    }

    #[test]
    fn test_display_type() {
        let mut b = SymbolGraphBuilder::new();
        let list = b.class("java.util.List");
        let graph = b.build();

        let ty = Type::function(
            vec![Type::class_with_args(list, vec![Type::int()])],
            Type::unit(),
        );
        assert_eq!(graph.display_type(&ty), "(List<Int>) -> Unit");
    }
}
