//! Theme registry for rendered code blocks
//!
//! A theme selector is a plain identifier consumed by the engine. The
//! surrounding application picks a theme family and a dark-mode flag;
//! [`resolve_theme_name`] turns those into the identifier.

mod colors;
mod theme;

pub use colors::{Color, Paint};
pub use theme::{Style, Theme};

/// Theme used when the selected family has no built-in palette
pub const CSS_VARIABLES: &str = "css-variables";

/// Families that ship separate light and dark palettes
const THEME_FAMILIES: &[&str] = &["tailwind", "gruvbox"];

pub fn list_builtin_themes() -> Vec<&'static str> {
    vec![
        "tailwind-dark",
        "tailwind-light",
        "gruvbox-dark",
        "gruvbox-light",
        "nord",
        "dracula",
        "solarized-dark",
        CSS_VARIABLES,
    ]
}

pub fn get_builtin_theme(name: &str) -> Option<Theme> {
    match name {
        "tailwind-dark" => Some(Theme::tailwind_dark()),
        "tailwind-light" => Some(Theme::tailwind_light()),
        "gruvbox-dark" => Some(Theme::gruvbox_dark()),
        "gruvbox-light" => Some(Theme::gruvbox_light()),
        "nord" => Some(Theme::nord()),
        "dracula" => Some(Theme::dracula()),
        "solarized-dark" => Some(Theme::solarized_dark()),
        CSS_VARIABLES => Some(Theme::css_variables()),
        _ => None,
    }
}

/// Resolve a theme family plus dark mode into the identifier the engine renders with
pub fn resolve_theme_name(theme_id: &str, dark_mode: bool) -> String {
    if THEME_FAMILIES.contains(&theme_id) {
        let variant = if dark_mode { "dark" } else { "light" };
        return format!("{}-{}", theme_id, variant);
    }

    if get_builtin_theme(theme_id).is_some() {
        return theme_id.to_string();
    }

    CSS_VARIABLES.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn families_follow_dark_mode() {
        assert_eq!(resolve_theme_name("tailwind", true), "tailwind-dark");
        assert_eq!(resolve_theme_name("tailwind", false), "tailwind-light");
        assert_eq!(resolve_theme_name("gruvbox", true), "gruvbox-dark");
    }

    #[test]
    fn direct_palettes_ignore_dark_mode() {
        assert_eq!(resolve_theme_name("nord", false), "nord");
        assert_eq!(resolve_theme_name("dracula", true), "dracula");
    }

    #[test]
    fn unknown_ids_use_css_variables() {
        assert_eq!(resolve_theme_name("my-brand", true), CSS_VARIABLES);
        assert_eq!(resolve_theme_name("", false), CSS_VARIABLES);
    }

    #[test]
    fn every_listed_theme_exists() {
        for name in list_builtin_themes() {
            let theme = get_builtin_theme(name).unwrap();
            assert_eq!(theme.name, name);
        }
    }
}
