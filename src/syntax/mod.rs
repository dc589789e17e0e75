//! Languages, grammars and grammar resolution
//!
//! A language descriptor lazily supplies one grammar or a dependency chain.
//! Built-in grammars are installed on demand to `~/.config/lark/grammars/`.

mod grammar;
mod installer;
mod languages;
mod metadata;
mod resolver;

pub use grammar::{
    FnSupplier, GrammarBundle, GrammarDefinition, GrammarSource, GrammarSupplier, supplier_fn,
};
pub use installer::{GrammarInstaller, InstallResult};
pub use languages::{BuiltinLanguage, LanguageCatalog, LanguageDescriptor, PLAINTEXT};
pub use metadata::{GrammarMetadata, TREE_SITTER_ABI_VERSION};
pub use resolver::{ResolvedGrammars, resolve};
