//! Identifiers and qualified names.

use std::fmt;

use string_interner::{DefaultSymbol, Symbol as _};

/// An interned simple identifier (`noArgs`, `View`, `value`).
///
/// Names are only meaningful together with the [`SymbolGraph`] that interned
/// them; use [`SymbolGraph::name`] to look one up by text.
///
/// [`SymbolGraph`]: super::SymbolGraph
/// [`SymbolGraph::name`]: super::SymbolGraph::name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(DefaultSymbol);

impl Name {
    pub(crate) fn from_symbol(symbol: DefaultSymbol) -> Self {
        Self(symbol)
    }

    pub(crate) fn symbol(self) -> DefaultSymbol {
        self.0
    }

    pub fn index(self) -> usize {
        self.0.to_usize()
    }
}

/// A dot-separated fully qualified name (`kotlin.annotations.jvm.internal.Compat`).
///
/// The root package is the empty name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FqName(String);

impl FqName {
    pub fn new(text: &str) -> Self {
        Self(text.trim().to_string())
    }

    pub fn root() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn child(&self, segment: &str) -> FqName {
        if self.is_root() {
            FqName(segment.to_string())
        } else {
            FqName(format!("{}.{}", self.0, segment))
        }
    }

    /// Split on the last `.` into the enclosing package and the short name.
    /// A name without a dot lives in the root package.
    pub fn split_last(&self) -> (FqName, &str) {
        match self.0.rfind('.') {
            Some(dot) => (FqName(self.0[..dot].to_string()), &self.0[dot + 1..]),
            None => (FqName::root(), &self.0),
        }
    }

    pub fn parent(&self) -> FqName {
        self.split_last().0
    }

    pub fn short_name(&self) -> &str {
        self.split_last().1
    }

    /// The JVM internal form (`a/b/C`).
    pub fn to_internal_name(&self) -> String {
        self.0.replace('.', "/")
    }
}

impl fmt::Display for FqName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl From<&str> for FqName {
    fn from(text: &str) -> Self {
        FqName::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_last() {
        let name = FqName::new("android.support.v4.view.ViewCompat");
        let (package, short) = name.split_last();
        assert_eq!(package.as_str(), "android.support.v4.view");
        assert_eq!(short, "ViewCompat");
    }

    #[test]
    fn test_split_without_package() {
        let name = FqName::new("ViewCompat");
        let (package, short) = name.split_last();
        assert!(package.is_root());
        assert_eq!(short, "ViewCompat");
    }

    #[test]
    fn test_child_and_internal_name() {
        let name = FqName::root().child("java").child("lang").child("Integer");
        assert_eq!(name.as_str(), "java.lang.Integer");
        assert_eq!(name.to_internal_name(), "java/lang/Integer");
    }
}
