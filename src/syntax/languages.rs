//! Language descriptors and the catalog of selectable languages
//!
//! Built-in languages load their grammars from shared libraries in the
//! grammars directory, installing them on first use when allowed.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use super::grammar::{GrammarBundle, GrammarDefinition, GrammarSupplier};
use super::installer::GrammarInstaller;
use crate::error::{HighlightError, Result};

/// Key of the "no highlighting" sentinel language
pub const PLAINTEXT: &str = "plaintext";

/// A selectable language: key, display name and a lazily invoked grammar supplier
#[derive(Clone)]
pub struct LanguageDescriptor {
    key: Arc<str>,
    name: Arc<str>,
    supplier: Option<Arc<dyn GrammarSupplier>>,
}

impl LanguageDescriptor {
    pub fn new(
        key: impl Into<Arc<str>>,
        name: impl Into<Arc<str>>,
        supplier: impl GrammarSupplier + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            supplier: Some(Arc::new(supplier)),
        }
    }

    /// The sentinel that disables highlighting
    pub fn plaintext() -> Self {
        Self {
            key: Arc::from(PLAINTEXT),
            name: Arc::from("Plain Text"),
            supplier: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_plaintext(&self) -> bool {
        &*self.key == PLAINTEXT
    }

    pub fn supplier(&self) -> Option<&dyn GrammarSupplier> {
        self.supplier.as_deref()
    }
}

impl PartialEq for LanguageDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for LanguageDescriptor {}

impl fmt::Debug for LanguageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageDescriptor")
            .field("key", &self.key)
            .field("name", &self.name)
            .finish()
    }
}

/// Languages with published Tree-sitter grammars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinLanguage {
    Rust,
    Python,
    JavaScript,
    TypeScript,
    Tsx,
    Go,
    C,
    Cpp,
    Json,
    Toml,
    Markdown,
    Bash,
    Lua,
    Ruby,
    Html,
    Css,
    Yaml,
}

impl BuiltinLanguage {
    pub const ALL: [BuiltinLanguage; 17] = [
        BuiltinLanguage::Rust,
        BuiltinLanguage::Python,
        BuiltinLanguage::JavaScript,
        BuiltinLanguage::TypeScript,
        BuiltinLanguage::Tsx,
        BuiltinLanguage::Go,
        BuiltinLanguage::C,
        BuiltinLanguage::Cpp,
        BuiltinLanguage::Json,
        BuiltinLanguage::Toml,
        BuiltinLanguage::Markdown,
        BuiltinLanguage::Bash,
        BuiltinLanguage::Lua,
        BuiltinLanguage::Ruby,
        BuiltinLanguage::Html,
        BuiltinLanguage::Css,
        BuiltinLanguage::Yaml,
    ];

    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        let lang = match ext.to_lowercase().as_str() {
            "rs" => BuiltinLanguage::Rust,
            "py" | "pyw" | "pyi" => BuiltinLanguage::Python,
            "js" | "mjs" | "cjs" | "jsx" => BuiltinLanguage::JavaScript,
            "ts" | "mts" | "cts" => BuiltinLanguage::TypeScript,
            "tsx" => BuiltinLanguage::Tsx,
            "go" => BuiltinLanguage::Go,
            "c" | "h" => BuiltinLanguage::C,
            "cpp" | "cc" | "cxx" | "hpp" | "hxx" | "hh" => BuiltinLanguage::Cpp,
            "json" => BuiltinLanguage::Json,
            "toml" => BuiltinLanguage::Toml,
            "md" | "markdown" => BuiltinLanguage::Markdown,
            "sh" | "bash" | "zsh" => BuiltinLanguage::Bash,
            "lua" => BuiltinLanguage::Lua,
            "rb" => BuiltinLanguage::Ruby,
            "html" | "htm" => BuiltinLanguage::Html,
            "css" | "scss" | "sass" => BuiltinLanguage::Css,
            "yaml" | "yml" => BuiltinLanguage::Yaml,
            _ => return None,
        };
        Some(lang)
    }

    /// Detect language from file path
    pub fn from_path(path: &Path) -> Option<Self> {
        // Check special filenames first
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            match name {
                "Cargo.lock" => return Some(BuiltinLanguage::Toml),
                ".bashrc" | ".bash_profile" | ".zshrc" => return Some(BuiltinLanguage::Bash),
                "Makefile" | "makefile" | "GNUmakefile" => return None,
                _ => {}
            }
        }

        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Get the display name for this language
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinLanguage::Rust => "Rust",
            BuiltinLanguage::Python => "Python",
            BuiltinLanguage::JavaScript => "JavaScript",
            BuiltinLanguage::TypeScript => "TypeScript",
            BuiltinLanguage::Tsx => "TSX",
            BuiltinLanguage::Go => "Go",
            BuiltinLanguage::C => "C",
            BuiltinLanguage::Cpp => "C++",
            BuiltinLanguage::Json => "JSON",
            BuiltinLanguage::Toml => "TOML",
            BuiltinLanguage::Markdown => "Markdown",
            BuiltinLanguage::Bash => "Bash",
            BuiltinLanguage::Lua => "Lua",
            BuiltinLanguage::Ruby => "Ruby",
            BuiltinLanguage::Html => "HTML",
            BuiltinLanguage::Css => "CSS",
            BuiltinLanguage::Yaml => "YAML",
        }
    }

    /// Grammar name: catalog key, library name and engine grammar name
    pub fn grammar_name(&self) -> &'static str {
        match self {
            BuiltinLanguage::Rust => "rust",
            BuiltinLanguage::Python => "python",
            BuiltinLanguage::JavaScript => "javascript",
            BuiltinLanguage::TypeScript => "typescript",
            BuiltinLanguage::Tsx => "tsx",
            BuiltinLanguage::Go => "go",
            BuiltinLanguage::C => "c",
            BuiltinLanguage::Cpp => "cpp",
            BuiltinLanguage::Json => "json",
            BuiltinLanguage::Toml => "toml",
            BuiltinLanguage::Markdown => "markdown",
            BuiltinLanguage::Bash => "bash",
            BuiltinLanguage::Lua => "lua",
            BuiltinLanguage::Ruby => "ruby",
            BuiltinLanguage::Html => "html",
            BuiltinLanguage::Css => "css",
            BuiltinLanguage::Yaml => "yaml",
        }
    }

    /// Get the GitHub repository for this grammar
    pub fn grammar_repo(&self) -> &'static str {
        match self {
            BuiltinLanguage::Rust => "tree-sitter/tree-sitter-rust",
            BuiltinLanguage::Python => "tree-sitter/tree-sitter-python",
            BuiltinLanguage::JavaScript => "tree-sitter/tree-sitter-javascript",
            BuiltinLanguage::TypeScript | BuiltinLanguage::Tsx => {
                "tree-sitter/tree-sitter-typescript"
            }
            BuiltinLanguage::Go => "tree-sitter/tree-sitter-go",
            BuiltinLanguage::C => "tree-sitter/tree-sitter-c",
            BuiltinLanguage::Cpp => "tree-sitter/tree-sitter-cpp",
            BuiltinLanguage::Json => "tree-sitter/tree-sitter-json",
            BuiltinLanguage::Toml => "tree-sitter-grammars/tree-sitter-toml",
            BuiltinLanguage::Markdown => "tree-sitter-grammars/tree-sitter-markdown",
            BuiltinLanguage::Bash => "tree-sitter/tree-sitter-bash",
            BuiltinLanguage::Lua => "tree-sitter-grammars/tree-sitter-lua",
            BuiltinLanguage::Ruby => "tree-sitter/tree-sitter-ruby",
            BuiltinLanguage::Html => "tree-sitter/tree-sitter-html",
            BuiltinLanguage::Css => "tree-sitter/tree-sitter-css",
            BuiltinLanguage::Yaml => "tree-sitter-grammars/tree-sitter-yaml",
        }
    }

    /// Directory inside the repository holding the grammar, for multi-grammar repos
    pub fn grammar_subdir(&self) -> Option<&'static str> {
        match self {
            BuiltinLanguage::TypeScript => Some("typescript"),
            BuiltinLanguage::Tsx => Some("tsx"),
            BuiltinLanguage::Markdown => Some("tree-sitter-markdown"),
            _ => None,
        }
    }

    /// Grammars to load, dependencies first, this language's own grammar last.
    ///
    /// TypeScript pulls in TSX so that rendering TypeScript as TSX always
    /// finds the variant loaded.
    pub fn grammar_chain(&self) -> Vec<BuiltinLanguage> {
        match self {
            BuiltinLanguage::TypeScript => vec![BuiltinLanguage::Tsx, BuiltinLanguage::TypeScript],
            other => vec![*other],
        }
    }
}

/// Supplies a built-in language's grammars from the installed libraries
struct InstalledGrammar {
    lang: BuiltinLanguage,
    installer: Arc<GrammarInstaller>,
    auto_install: bool,
}

impl InstalledGrammar {
    async fn locate(&self, lang: BuiltinLanguage) -> Result<GrammarDefinition> {
        let name = lang.grammar_name();

        if !self.installer.is_installed(lang) || self.installer.needs_reinstall(lang) {
            if !self.auto_install {
                return Err(HighlightError::fetch(
                    self.lang.name(),
                    format!("grammar {} is not installed", name),
                ));
            }

            let installer = Arc::clone(&self.installer);
            let result = tokio::task::spawn_blocking(move || installer.ensure_installed(lang))
                .await
                .map_err(|e| HighlightError::fetch(self.lang.name(), e))?;
            let outcome = result.map_err(|e| HighlightError::fetch(self.lang.name(), e))?;
            tracing::debug!("Grammar {} ready: {:?}", name, outcome);
        }

        Ok(GrammarDefinition::from_library(
            name,
            self.installer.library_path(name),
        ))
    }
}

impl GrammarSupplier for InstalledGrammar {
    fn fetch(&self) -> BoxFuture<'_, Result<GrammarBundle>> {
        async move {
            let chain = self.lang.grammar_chain();
            if chain.len() == 1 {
                return Ok(GrammarBundle::Single(self.locate(self.lang).await?));
            }

            let mut grammars = Vec::with_capacity(chain.len());
            for lang in chain {
                grammars.push(self.locate(lang).await?);
            }
            Ok(GrammarBundle::Sequence(grammars))
        }
        .boxed()
    }
}

/// Catalog of selectable languages, keyed by language key
#[derive(Clone)]
pub struct LanguageCatalog {
    languages: BTreeMap<String, LanguageDescriptor>,
}

impl LanguageCatalog {
    /// A catalog containing only the plaintext sentinel
    pub fn new() -> Self {
        let mut languages = BTreeMap::new();
        languages.insert(PLAINTEXT.to_string(), LanguageDescriptor::plaintext());
        Self { languages }
    }

    /// Catalog of all built-in languages backed by `installer`
    pub fn builtin(installer: Arc<GrammarInstaller>, auto_install: bool) -> Self {
        let mut catalog = Self::new();
        for lang in BuiltinLanguage::ALL {
            catalog.register(LanguageDescriptor::new(
                lang.grammar_name(),
                lang.name(),
                InstalledGrammar {
                    lang,
                    installer: Arc::clone(&installer),
                    auto_install,
                },
            ));
        }
        catalog
    }

    /// Add or replace a language
    pub fn register(&mut self, language: LanguageDescriptor) {
        self.languages.insert(language.key().to_string(), language);
    }

    pub fn get(&self, key: &str) -> Option<&LanguageDescriptor> {
        self.languages.get(key)
    }

    /// Detect a language from a file path, falling back to plaintext
    pub fn detect(&self, path: &Path) -> LanguageDescriptor {
        BuiltinLanguage::from_path(path)
            .and_then(|lang| self.get(lang.grammar_name()))
            .cloned()
            .unwrap_or_else(LanguageDescriptor::plaintext)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LanguageDescriptor> {
        self.languages.values()
    }
}

impl Default for LanguageCatalog {
    fn default() -> Self {
        Self::new()
    }
}
