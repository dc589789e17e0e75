//! Grammar definitions and the suppliers that produce them

use std::fmt;
use std::future::Future;
use std::path::PathBuf;

use futures::future::{BoxFuture, FutureExt};

use crate::error::Result;

/// Where a grammar's Tree-sitter language comes from
#[derive(Clone)]
pub enum GrammarSource {
    /// A language linked into the binary (e.g. `tree_sitter_rust::LANGUAGE`)
    Static(tree_sitter::Language),
    /// A compiled grammar library and the constructor it exports
    Library { path: PathBuf, symbol: String },
}

impl fmt::Debug for GrammarSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarSource::Static(_) => f.write_str("Static"),
            GrammarSource::Library { path, symbol } => f
                .debug_struct("Library")
                .field("path", path)
                .field("symbol", symbol)
                .finish(),
        }
    }
}

/// A single grammar, optionally carrying its own declared name
#[derive(Debug, Clone)]
pub struct GrammarDefinition {
    name: Option<String>,
    source: GrammarSource,
}

impl GrammarDefinition {
    pub fn new(name: impl Into<String>, source: GrammarSource) -> Self {
        Self {
            name: Some(name.into()),
            source,
        }
    }

    /// A grammar that does not declare a name of its own
    pub fn unnamed(source: GrammarSource) -> Self {
        Self { name: None, source }
    }

    /// Wrap a statically linked Tree-sitter language
    pub fn from_language(name: impl Into<String>, language: impl Into<tree_sitter::Language>) -> Self {
        Self::new(name, GrammarSource::Static(language.into()))
    }

    /// Point at a compiled grammar library exporting `tree_sitter_<name>`
    pub fn from_library(name: &str, path: impl Into<PathBuf>) -> Self {
        Self::new(
            name,
            GrammarSource::Library {
                path: path.into(),
                symbol: format!("tree_sitter_{}", name),
            },
        )
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn source(&self) -> &GrammarSource {
        &self.source
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// What a grammar supplier yields: one grammar, or dependencies followed by the primary
#[derive(Debug, Clone)]
pub enum GrammarBundle {
    Single(GrammarDefinition),
    Sequence(Vec<GrammarDefinition>),
}

impl GrammarBundle {
    /// Ordered list; the last entry is the primary grammar
    pub fn into_vec(self) -> Vec<GrammarDefinition> {
        match self {
            GrammarBundle::Single(grammar) => vec![grammar],
            GrammarBundle::Sequence(grammars) => grammars,
        }
    }
}

impl From<GrammarDefinition> for GrammarBundle {
    fn from(grammar: GrammarDefinition) -> Self {
        GrammarBundle::Single(grammar)
    }
}

impl From<Vec<GrammarDefinition>> for GrammarBundle {
    fn from(grammars: Vec<GrammarDefinition>) -> Self {
        GrammarBundle::Sequence(grammars)
    }
}

/// Lazily produces the grammar(s) for a language. May be slow or fail.
pub trait GrammarSupplier: Send + Sync {
    fn fetch(&self) -> BoxFuture<'_, Result<GrammarBundle>>;
}

/// Supplier backed by an async closure
pub struct FnSupplier<F>(F);

/// Build a supplier from a closure returning a future
pub fn supplier_fn<F, Fut>(f: F) -> FnSupplier<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<GrammarBundle>> + Send + 'static,
{
    FnSupplier(f)
}

impl<F, Fut> GrammarSupplier for FnSupplier<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<GrammarBundle>> + Send + 'static,
{
    fn fetch(&self) -> BoxFuture<'_, Result<GrammarBundle>> {
        (self.0)().boxed()
    }
}
