//! highlight:: - theme, dark mode and grammar settings
//!
//! Usage in Rhai:
//! ```rhai
//! highlight::set_theme("gruvbox");
//! highlight::set_dark_mode(true);
//! highlight::set_auto_install(false);
//! ```

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use rhai::{Array, Dynamic, EvalAltResult, Module};

use super::Settings;
use crate::render::HighlightedLines;

/// Create the `highlight` module with access to settings
pub fn create_module(settings: Arc<RwLock<Settings>>) -> Module {
    let mut module = Module::new();

    // set_theme(name: &str)
    {
        let s = Arc::clone(&settings);
        module.set_native_fn("set_theme", move |name: &str| {
            if let Ok(mut settings) = s.write() {
                settings.theme = name.to_string();
            }
            Ok(())
        });
    }

    // get_theme() -> String
    {
        let s = Arc::clone(&settings);
        module.set_native_fn(
            "get_theme",
            move || -> Result<String, Box<EvalAltResult>> {
                Ok(s.read().map(|s| s.theme.clone()).unwrap_or_default())
            },
        );
    }

    // set_dark_mode(enabled: bool)
    {
        let s = Arc::clone(&settings);
        module.set_native_fn("set_dark_mode", move |enabled: bool| {
            if let Ok(mut settings) = s.write() {
                settings.dark_mode = enabled;
            }
            Ok(())
        });
    }

    // get_dark_mode() -> bool
    {
        let s = Arc::clone(&settings);
        module.set_native_fn(
            "get_dark_mode",
            move || -> Result<bool, Box<EvalAltResult>> {
                Ok(s.read().map(|s| s.dark_mode).unwrap_or(false))
            },
        );
    }

    // set_grammars_dir(path: &str)
    {
        let s = Arc::clone(&settings);
        module.set_native_fn("set_grammars_dir", move |path: &str| {
            if let Ok(mut settings) = s.write() {
                settings.grammars_dir = PathBuf::from(path);
            }
            Ok(())
        });
    }

    // set_auto_install(enabled: bool)
    {
        let s = Arc::clone(&settings);
        module.set_native_fn("set_auto_install", move |enabled: bool| {
            if let Ok(mut settings) = s.write() {
                settings.auto_install = enabled;
            }
            Ok(())
        });
    }

    // set_highlighted_lines(lines: &str), e.g. "2,4-6"
    {
        let s = Arc::clone(&settings);
        module.set_native_fn(
            "set_highlighted_lines",
            move |lines: &str| -> Result<(), Box<EvalAltResult>> {
                let lines = lines.parse::<HighlightedLines>().map_err(|e| e.to_string())?;
                if let Ok(mut settings) = s.write() {
                    settings.highlighted_lines = lines;
                }
                Ok(())
            },
        );
    }

    // list_themes() -> Array
    module.set_native_fn("list_themes", || -> Result<Array, Box<EvalAltResult>> {
        let themes = crate::theme::list_builtin_themes();
        Ok(themes
            .into_iter()
            .map(|s| Dynamic::from(s.to_string()))
            .collect())
    });

    module
}
