//! Command-line argument parsing

use std::path::PathBuf;

use clap::Parser;
use lark_highlight::HighlightedLines;
use lark_highlight::config::Settings;

/// Render source code as highlighted HTML
#[derive(Parser, Debug)]
#[command(name = "lark-highlight", version, about = "Render source code as highlighted HTML")]
pub struct CliArgs {
    /// File to render
    #[arg(value_name = "FILE", required_unless_present = "list_languages")]
    pub file: Option<PathBuf>,

    /// Language key; detected from the file name when omitted
    #[arg(short, long, value_name = "KEY")]
    pub language: Option<String>,

    /// Lines to mark as highlighted, e.g. "2,4-6"
    #[arg(long, value_name = "LINES")]
    pub highlight: Option<HighlightedLines>,

    /// Theme family or palette
    #[arg(short, long, value_name = "ID")]
    pub theme: Option<String>,

    /// Use the dark variant of the theme family
    #[arg(long)]
    pub dark: bool,

    /// Config script (default: ~/.config/lark/highlight.rhai)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Never install missing grammars
    #[arg(long)]
    pub no_install: bool,

    /// Print the known language keys and exit
    #[arg(long)]
    pub list_languages: bool,
}

impl CliArgs {
    /// Flags given on the command line win over the config script
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(theme) = &self.theme {
            settings.theme = theme.clone();
        }
        if self.dark {
            settings.dark_mode = true;
        }
        if self.no_install {
            settings.auto_install = false;
        }
        if let Some(lines) = &self.highlight {
            settings.highlighted_lines = lines.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_settings() {
        let args = CliArgs::try_parse_from([
            "lark-highlight",
            "main.rs",
            "--highlight",
            "2,4-6",
            "--theme",
            "gruvbox",
            "--dark",
            "--no-install",
        ])
        .unwrap();

        let mut settings = Settings::default();
        args.apply(&mut settings);

        assert_eq!(args.file, Some(PathBuf::from("main.rs")));
        assert_eq!(settings.resolved_theme(), "gruvbox-dark");
        assert!(!settings.auto_install);
        assert_eq!(settings.highlighted_lines.iter().collect::<Vec<_>>(), vec![2, 4, 5, 6]);
    }

    #[test]
    fn test_defaults_leave_settings_alone() {
        let args = CliArgs::try_parse_from(["lark-highlight", "main.rs"]).unwrap();
        let mut settings = Settings::default();
        args.apply(&mut settings);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_file_required_unless_listing() {
        assert!(CliArgs::try_parse_from(["lark-highlight"]).is_err());
        assert!(CliArgs::try_parse_from(["lark-highlight", "--list-languages"]).is_ok());
        assert!(CliArgs::try_parse_from(["lark-highlight", "a.rs", "--highlight", "0"]).is_err());
    }
}
