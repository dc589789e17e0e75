//! Render source code as syntax highlighted, line-annotated HTML.
//!
//! A [`HighlightedCode`] view holds the code, language, highlighted lines
//! and theme, and republishes markup whenever one of them changes. Grammars
//! are resolved from a [`LanguageDescriptor`] and loaded into the
//! [`HighlightEngine`] on first use.

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod render;
pub mod syntax;
pub mod theme;

pub use engine::{HighlightEngine, HtmlOptions, LineNode, TreeSitterEngine};
pub use error::{HighlightError, Result};
pub use render::{
    HighlightedCode, HighlightedLines, RenderOutcome, RenderRequest, RenderResult, Renderer,
};
pub use syntax::{GrammarDefinition, LanguageCatalog, LanguageDescriptor};
