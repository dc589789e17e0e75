//! Error types for lark-highlight

use thiserror::Error;

/// Result type alias for highlighting operations
pub type Result<T> = std::result::Result<T, HighlightError>;

/// Highlighting error types
#[derive(Error, Debug)]
pub enum HighlightError {
    #[error("Failed to fetch grammar for {language}: {message}")]
    GrammarFetch { language: String, message: String },

    #[error("Failed to load grammar {grammar}: {message}")]
    GrammarLoad { grammar: String, message: String },

    #[error("No input file given")]
    MissingInput,

    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Language {0} has no grammar supplier")]
    NoGrammarSupplier(String),

    #[error("Grammar not loaded: {0}")]
    UnknownGrammar(String),

    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    #[error("Parse failed: {0}")]
    Parse(String),

    #[error("Failed to install grammar {grammar}: {message}")]
    Install { grammar: String, message: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid line list: {0}")]
    InvalidLineSpec(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HighlightError {
    pub fn fetch(language: impl Into<String>, message: impl ToString) -> Self {
        HighlightError::GrammarFetch {
            language: language.into(),
            message: message.to_string(),
        }
    }

    pub fn load(grammar: impl Into<String>, message: impl ToString) -> Self {
        HighlightError::GrammarLoad {
            grammar: grammar.into(),
            message: message.to_string(),
        }
    }

    pub fn install(grammar: impl Into<String>, message: impl ToString) -> Self {
        HighlightError::Install {
            grammar: grammar.into(),
            message: message.to_string(),
        }
    }
}
