use std::path::PathBuf;

use crate::render::HighlightedLines;
use crate::syntax::GrammarInstaller;
use crate::theme::resolve_theme_name;

/// Rendering settings that can be customized via Rhai config
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    // Theme
    pub theme: String, // Family ("tailwind") or palette ("nord")
    pub dark_mode: bool,

    // Grammars
    pub grammars_dir: PathBuf,
    pub auto_install: bool,

    // Lines marked when none are given on the command line
    pub highlighted_lines: HighlightedLines,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "tailwind".to_string(),
            dark_mode: false,

            grammars_dir: GrammarInstaller::default_grammars_dir(),
            auto_install: true,

            highlighted_lines: HighlightedLines::default(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Theme identifier the engine renders with
    pub fn resolved_theme(&self) -> String {
        resolve_theme_name(&self.theme, self.dark_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_theme_follows_dark_mode() {
        let mut settings = Settings::new();
        assert_eq!(settings.resolved_theme(), "tailwind-light");

        settings.dark_mode = true;
        assert_eq!(settings.resolved_theme(), "tailwind-dark");

        settings.theme = "unknown".to_string();
        assert_eq!(settings.resolved_theme(), "css-variables");
    }
}
