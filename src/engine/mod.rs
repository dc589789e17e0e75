//! Highlighting engine capability
//!
//! The renderer only talks to [`HighlightEngine`]. [`TreeSitterEngine`] is the
//! bundled implementation; tests and embedders can supply their own.

mod highlight;
mod html;
mod tree_sitter_engine;

use std::collections::{BTreeMap, HashSet};

use futures::future::BoxFuture;

use crate::error::Result;
use crate::syntax::GrammarDefinition;

pub use highlight::{Highlight, HighlightKind, HighlightedLine, collect_highlights};
pub use html::escape_html;
pub use tree_sitter_engine::TreeSitterEngine;

/// A rendered line as seen by the line transform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineNode {
    line: usize,
    properties: BTreeMap<String, String>,
    classes: Vec<String>,
}

impl LineNode {
    /// A line with the engine's own `line` class
    pub fn new(line: usize) -> Self {
        Self {
            line,
            properties: BTreeMap::new(),
            classes: vec!["line".to_string()],
        }
    }

    /// 1-based line number
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: impl ToString) {
        self.properties.insert(name.into(), value.to_string());
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Per-line annotation hook, called once for every rendered line
pub type LineTransform<'a> = &'a dyn Fn(&mut LineNode);

/// Options for [`HighlightEngine::code_to_html`]
pub struct HtmlOptions<'a> {
    /// Name of a loaded grammar
    pub lang: &'a str,
    /// Theme identifier
    pub theme: &'a str,
    pub line_transform: Option<LineTransform<'a>>,
}

/// A syntax highlighting engine with a process-wide set of loaded grammars
pub trait HighlightEngine: Send + Sync {
    /// Names of every grammar available for rendering
    fn loaded_languages(&self) -> HashSet<String>;

    fn is_loaded(&self, name: &str) -> bool {
        self.loaded_languages().contains(name)
    }

    /// Load an ordered grammar list as one unit. Already loaded names are skipped.
    fn load_language<'a>(&'a self, grammars: &'a [GrammarDefinition]) -> BoxFuture<'a, Result<()>>;

    /// Convert code to themed markup, annotating each line through the transform
    fn code_to_html(&self, code: &str, options: &HtmlOptions<'_>) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_node_classes_are_unique() {
        let mut node = LineNode::new(3);
        node.add_class("highlighted-line");
        node.add_class("highlighted-line");
        assert_eq!(node.classes(), ["line", "highlighted-line"]);
        assert_eq!(node.line(), 3);
    }

    #[test]
    fn line_node_properties() {
        let mut node = LineNode::new(1);
        node.set_property("data-line", 1);
        assert_eq!(node.property("data-line"), Some("1"));
        assert_eq!(node.property("data-missing"), None);
    }
}
