//! Highlighting engine backed by Tree-sitter grammars

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use futures::future::{BoxFuture, FutureExt};
use libloading::{Library, Symbol};
use tree_sitter::Parser;

use super::highlight::collect_highlights;
use super::html::render_block;
use super::{HighlightEngine, HtmlOptions};
use crate::error::{HighlightError, Result};
use crate::syntax::{GrammarDefinition, GrammarSource};
use crate::theme::{Theme, get_builtin_theme};

/// A grammar ready for parsing
struct LoadedGrammar {
    // Dropped before the library that owns its tables
    language: tree_sitter::Language,
    _library: Option<Library>,
}

/// Tree-sitter engine with a shared, append-only table of loaded grammars
pub struct TreeSitterEngine {
    grammars: RwLock<HashMap<String, Arc<LoadedGrammar>>>,
    themes: HashMap<String, Theme>,
}

impl TreeSitterEngine {
    /// An engine with no grammars loaded and the built-in themes
    pub fn new() -> Self {
        let themes = crate::theme::list_builtin_themes()
            .into_iter()
            .filter_map(get_builtin_theme)
            .map(|theme| (theme.name.clone(), theme))
            .collect();

        Self {
            grammars: RwLock::new(HashMap::new()),
            themes,
        }
    }

    /// Register an additional theme, replacing a built-in one of the same name
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.themes.insert(theme.name.clone(), theme);
        self
    }

    fn grammar(&self, name: &str) -> Option<Arc<LoadedGrammar>> {
        self.grammars
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    async fn prepare(&self, grammar: &GrammarDefinition, name: &str) -> Result<LoadedGrammar> {
        let loaded = match grammar.source() {
            GrammarSource::Static(language) => LoadedGrammar {
                language: language.clone(),
                _library: None,
            },
            GrammarSource::Library { path, symbol } => {
                let path = path.clone();
                let symbol = symbol.clone();
                tokio::task::spawn_blocking(move || open_library(&path, &symbol))
                    .await
                    .map_err(|e| HighlightError::load(name, e))?
                    .map_err(|e| HighlightError::load(name, e))?
            }
        };

        check_abi(&loaded.language).map_err(|e| HighlightError::load(name, e))?;
        Ok(loaded)
    }
}

impl Default for TreeSitterEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HighlightEngine for TreeSitterEngine {
    fn loaded_languages(&self) -> HashSet<String> {
        self.grammars
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    fn is_loaded(&self, name: &str) -> bool {
        self.grammars
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    fn load_language<'a>(&'a self, grammars: &'a [GrammarDefinition]) -> BoxFuture<'a, Result<()>> {
        async move {
            // Stage everything first so a failure part way leaves nothing visible
            let mut staged = Vec::with_capacity(grammars.len());
            for grammar in grammars {
                let name = grammar
                    .name()
                    .ok_or_else(|| HighlightError::load("<unnamed>", "grammar declares no name"))?;
                if self.is_loaded(name) {
                    continue;
                }
                staged.push((name.to_string(), self.prepare(grammar, name).await?));
            }

            let mut table = self.grammars.write().unwrap_or_else(PoisonError::into_inner);
            for (name, loaded) in staged {
                tracing::debug!("Loaded grammar {}", name);
                table.entry(name).or_insert_with(|| Arc::new(loaded));
            }
            Ok(())
        }
        .boxed()
    }

    fn code_to_html(&self, code: &str, options: &HtmlOptions<'_>) -> Result<String> {
        let grammar = self
            .grammar(options.lang)
            .ok_or_else(|| HighlightError::UnknownGrammar(options.lang.to_string()))?;
        let theme = self
            .themes
            .get(options.theme)
            .ok_or_else(|| HighlightError::UnknownTheme(options.theme.to_string()))?;

        let mut parser = Parser::new();
        parser
            .set_language(&grammar.language)
            .map_err(|e| HighlightError::Parse(e.to_string()))?;
        let tree = parser
            .parse(code, None)
            .ok_or_else(|| HighlightError::Parse(format!("no tree produced for {}", options.lang)))?;

        let lines = collect_highlights(&tree, code);
        Ok(render_block(code, &lines, theme, options.line_transform))
    }
}

/// Open a compiled grammar library and call its language constructor
fn open_library(path: &Path, symbol: &str) -> std::result::Result<LoadedGrammar, String> {
    if !path.exists() {
        return Err(format!("{} does not exist", path.display()));
    }

    let library = unsafe { Library::new(path) }
        .map_err(|e| format!("failed to open {}: {}", path.display(), e))?;

    let language = unsafe {
        let func: Symbol<unsafe extern "C" fn() -> tree_sitter::Language> = library
            .get(symbol.as_bytes())
            .map_err(|e| format!("missing symbol {}: {}", symbol, e))?;
        func()
    };

    Ok(LoadedGrammar {
        language,
        _library: Some(library),
    })
}

fn check_abi(language: &tree_sitter::Language) -> std::result::Result<(), String> {
    let version = language.version();
    if (tree_sitter::MIN_COMPATIBLE_LANGUAGE_VERSION..=tree_sitter::LANGUAGE_VERSION)
        .contains(&version)
    {
        Ok(())
    } else {
        Err(format!(
            "incompatible ABI version {} (supported {}..={})",
            version,
            tree_sitter::MIN_COMPATIBLE_LANGUAGE_VERSION,
            tree_sitter::LANGUAGE_VERSION
        ))
    }
}
