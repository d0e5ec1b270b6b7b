//! Shared symbol graphs for the unit and integration tests.

use std::sync::Arc;

use crate::config::DEFAULT_MARKER_ANNOTATION;
use crate::hir::{
    Annotation, ClassKind, ConstValue, DefId, Modality, SymbolGraph, SymbolGraphBuilder, Type,
    Visibility,
};
use crate::span::Span;

/// `View` names `ViewCompat` as its provider; `SubView` extends `View`;
/// `Widget` has no provider.
pub struct ViewFixture {
    pub graph: Arc<SymbolGraph>,
    pub object: DefId,
    pub integer: DefId,
    pub boolean: DefId,
    pub string: DefId,
    pub runnable: DefId,
    pub drawable: DefId,
    pub view: DefId,
    pub view_compat: DefId,
    pub sub_view: DefId,
    pub widget: DefId,
}

pub fn compat_annotation(provider: &str) -> Annotation {
    Annotation::new(DEFAULT_MARKER_ANNOTATION).with_argument("value", ConstValue::string(provider))
}

/// Declare the `java.lang` classes the fixtures rely on.
pub fn declare_java_lang(b: &mut SymbolGraphBuilder) -> (DefId, DefId, DefId, DefId, DefId) {
    let object = b.class("java.lang.Object");
    let number = b.class("java.lang.Number");
    b.add_supertype(number, Type::class(object));
    let integer = b.class("java.lang.Integer");
    b.add_supertype(integer, Type::class(number));
    let long = b.class("java.lang.Long");
    b.add_supertype(long, Type::class(number));
    let boolean = b.class("java.lang.Boolean");
    b.add_supertype(boolean, Type::class(object));
    let string = b.class("java.lang.String");
    b.add_supertype(string, Type::class(object));
    let runnable = b.interface("java.lang.Runnable");
    b.function(runnable, "run").modality(Modality::Abstract).finish();
    (object, integer, boolean, string, runnable)
}

fn qualified(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", package, name)
    }
}

impl ViewFixture {
    /// All fixture classes in the root package.
    pub fn new() -> Self {
        Self::in_packages("", "", "")
    }

    /// The Android layout: `android.view.View`,
    /// `android.support.v4.view.ViewCompat` and `android.widget.*`.
    pub fn android() -> Self {
        Self::in_packages("android.view", "android.support.v4.view", "android.widget")
    }

    pub fn in_packages(view_package: &str, compat_package: &str, widget_package: &str) -> Self {
        let mut b = SymbolGraphBuilder::new();
        let (object, integer, boolean, string, runnable) = declare_java_lang(&mut b);
        b.declare_class(DEFAULT_MARKER_ANNOTATION, ClassKind::Annotation, Span::dummy());

        // Interfaces never contribute providers, even broken ones.
        let drawable = b.interface("Drawable");
        b.annotate(drawable, compat_annotation("MissingCompat"));

        let view = b.declare_class(
            &qualified(view_package, "View"),
            ClassKind::Class,
            Span::new(0, 40),
        );
        b.add_supertype(view, Type::class(object));
        b.add_supertype(view, Type::class(drawable));
        b.annotate(
            view,
            compat_annotation(&qualified(compat_package, "ViewCompat")).with_span(Span::new(0, 12)),
        );
        b.function(view, "differentParamType").param("i", Type::int()).finish();
        b.function(view, "differentReturnType").returns(Type::int()).finish();
        b.function(view, "boxingResult").returns(Type::boolean()).finish();
        b.function(view, "shadowed")
            .param("text", Type::class(string))
            .returns(Type::int())
            .finish();

        let view_ty = Type::class(view);
        let view_compat = b.class(&qualified(compat_package, "ViewCompat"));
        b.add_supertype(view_compat, Type::class(object));
        b.function(view_compat, "noArgs")
            .param("view", view_ty.clone())
            .in_static_scope()
            .finish();
        b.function(view_compat, "multipleArgs")
            .param("view", view_ty.clone())
            .param("first", Type::int())
            .param("second", Type::long())
            .in_static_scope()
            .finish();
        b.function(view_compat, "samAdapter")
            .param("view", view_ty.clone())
            .param("r", Type::class(runnable))
            .in_static_scope()
            .finish();
        b.function(view_compat, "boxing")
            .param("i", Type::class(integer))
            .in_static_scope()
            .finish();
        b.function(view_compat, "boxing")
            .param("view", view_ty.clone())
            .param("i", Type::class(integer))
            .in_static_scope()
            .finish();
        b.function(view_compat, "boxingResult")
            .param("view", view_ty.clone())
            .returns(Type::class(boolean))
            .in_static_scope()
            .finish();
        b.function(view_compat, "differentParamType")
            .param("view", view_ty.clone())
            .param("i", Type::long())
            .in_static_scope()
            .finish();
        b.function(view_compat, "differentReturnType")
            .param("view", view_ty.clone())
            .returns(Type::long())
            .in_static_scope()
            .finish();
        b.function(view_compat, "vararg")
            .param("view", view_ty.clone())
            .vararg("i", Type::int())
            .in_static_scope()
            .finish();
        b.function(view_compat, "withDefaults")
            .param("view", view_ty.clone())
            .param_with_default("count", Type::int())
            .param_with_default("label", Type::class(string))
            .returns(Type::class(string))
            .in_static_scope()
            .finish();
        b.function(view_compat, "shadowed")
            .param("view", view_ty.clone())
            .param("text", Type::class(string))
            .returns(Type::int())
            .in_static_scope()
            .finish();
        b.function(view_compat, "hidden")
            .param("view", view_ty)
            .visibility(Visibility::Private)
            .in_static_scope()
            .finish();

        let sub_view = b.class(&qualified(widget_package, "SubView"));
        b.add_supertype(sub_view, Type::class(view));

        let widget = b.class(&qualified(widget_package, "Widget"));
        b.add_supertype(widget, Type::class(object));
        b.function(widget, "noArgs").finish();

        Self {
            graph: Arc::new(b.build()),
            object,
            integer,
            boolean,
            string,
            runnable,
            drawable,
            view,
            view_compat,
            sub_view,
            widget,
        }
    }
}

impl Default for ViewFixture {
    fn default() -> Self {
        Self::new()
    }
}
