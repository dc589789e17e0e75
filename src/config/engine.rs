//! The Rhai engine that evaluates highlight config scripts
//!
//! Settings functions live under the `highlight` namespace, e.g.
//! `highlight::set_theme("nord")`.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use rhai::{Engine, Scope};

use super::{Settings, api};
use crate::error::{HighlightError, Result};

pub struct ConfigEngine {
    engine: Engine,
    settings: Arc<RwLock<Settings>>,
}

impl ConfigEngine {
    /// Create a new config engine with default settings
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Create a config engine whose scripts start from `settings`
    pub fn with_settings(settings: Settings) -> Self {
        let settings = Arc::new(RwLock::new(settings));
        let engine = Self::create_engine(Arc::clone(&settings));

        Self {
            engine,
            settings,
        }
    }

    fn create_engine(settings: Arc<RwLock<Settings>>) -> Engine {
        let mut engine = Engine::new();

        // Safety limits
        engine.set_max_expr_depths(64, 64);
        engine.set_max_operations(100_000);

        engine.register_static_module("highlight", api::create_module(settings).into());

        engine.on_print(|msg| tracing::info!("[rhai] {}", msg));

        engine
    }

    /// Load and execute a config file
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HighlightError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        self.eval(&content)
    }

    /// Evaluate a Rhai script string
    pub fn eval(&mut self, script: &str) -> Result<()> {
        let ast = self
            .engine
            .compile(script)
            .map_err(|e| HighlightError::Config(format!("Parse error: {}", e)))?;

        let mut scope = Scope::new();
        self.engine
            .run_ast_with_scope(&mut scope, &ast)
            .map_err(|e| HighlightError::Config(e.to_string()))?;

        Ok(())
    }

    /// Get the current settings (cloned)
    pub fn settings(&self) -> Settings {
        self.settings.read().map(|s| s.clone()).unwrap_or_default()
    }

    /// Uses ~/.config/lark/ on all platforms, like the editor
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("lark"))
    }

    pub fn config_file() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("highlight.rhai"))
    }

    /// Load the default config file if it exists
    pub fn load_default(&mut self) -> Result<()> {
        if let Some(config_file) = Self::config_file() {
            if config_file.exists() {
                tracing::debug!("Loading config from {}", config_file.display());
                return self.load_file(&config_file);
            }
        }
        Ok(()) // No config file is fine
    }
}

impl Default for ConfigEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_theme() {
        let mut engine = ConfigEngine::new();
        engine.eval(r#"highlight::set_theme("nord");"#).unwrap();
        assert_eq!(engine.settings().theme, "nord");
    }

    #[test]
    fn test_get_theme_sees_default() {
        let mut engine = ConfigEngine::new();
        engine
            .eval(
                r#"
                if highlight::get_theme() != "tailwind" {
                    throw "unexpected default theme";
                }
            "#,
            )
            .unwrap();
    }

    #[test]
    fn test_multiple_settings() {
        let mut engine = ConfigEngine::new();
        engine
            .eval(
                r#"
                highlight::set_theme("gruvbox");
                highlight::set_dark_mode(!highlight::get_dark_mode());
                highlight::set_auto_install(false);
                highlight::set_grammars_dir("/tmp/grammars");
                highlight::set_highlighted_lines("2,4-5");
            "#,
            )
            .unwrap();

        let settings = engine.settings();
        assert_eq!(settings.theme, "gruvbox");
        assert!(settings.dark_mode);
        assert!(!settings.auto_install);
        assert_eq!(settings.grammars_dir, PathBuf::from("/tmp/grammars"));
        assert_eq!(settings.highlighted_lines.iter().collect::<Vec<_>>(), vec![2, 4, 5]);
        assert_eq!(settings.resolved_theme(), "gruvbox-dark");
    }

    #[test]
    fn test_list_themes() {
        let mut engine = ConfigEngine::new();
        engine
            .eval(
                r#"
                let found = false;
                for theme in highlight::list_themes() {
                    if theme == "css-variables" {
                        found = true;
                    }
                }
                if !found {
                    throw "css-variables missing";
                }
            "#,
            )
            .unwrap();
    }

    #[test]
    fn test_script_errors() {
        let mut engine = ConfigEngine::new();
        assert!(matches!(
            engine.eval("highlight::set_tab_width(2);"),
            Err(HighlightError::Config(_))
        ));
        assert!(engine.eval(r#"highlight::set_highlighted_lines("0");"#).is_err());
        assert!(engine.eval("highlight::set_theme(").is_err());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highlight.rhai");
        std::fs::write(&path, "highlight::set_dark_mode(true);").unwrap();

        let mut engine = ConfigEngine::new();
        engine.load_file(&path).unwrap();
        assert!(engine.settings().dark_mode);

        assert!(engine.load_file(&dir.path().join("missing.rhai")).is_err());
    }
}
