use super::Paint;
use crate::engine::HighlightKind;

/// Style for a token (paint + optional attributes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub fg: Paint,
    pub bold: bool,
    pub italic: bool,
}

impl Style {
    pub const fn new(fg: Paint) -> Self {
        Self {
            fg,
            bold: false,
            italic: false,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Inline CSS declarations, e.g. `color:#ff79c6;font-weight:bold`
    pub fn to_css(&self) -> String {
        let mut css = format!("color:{}", self.fg.to_css());
        if self.bold {
            css.push_str(";font-weight:bold");
        }
        if self.italic {
            css.push_str(";font-style:italic");
        }
        css
    }
}

impl From<Paint> for Style {
    fn from(paint: Paint) -> Self {
        Style::new(paint)
    }
}

/// Complete theme definition for rendered code blocks
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    pub background: Paint,
    pub foreground: Paint,

    pub syntax_keyword: Style,
    pub syntax_string: Style,
    pub syntax_number: Style,
    pub syntax_comment: Style,
    pub syntax_function: Style,
    pub syntax_type: Style,
    pub syntax_variable: Style,
    pub syntax_operator: Style,
    pub syntax_punctuation: Style,
}

impl Theme {
    /// Style for a highlight kind; `None` means "inherit the foreground"
    pub fn style_for(&self, kind: HighlightKind) -> Option<Style> {
        match kind {
            HighlightKind::Keyword => Some(self.syntax_keyword),
            HighlightKind::String => Some(self.syntax_string),
            HighlightKind::Number | HighlightKind::Constant => Some(self.syntax_number),
            HighlightKind::Comment => Some(self.syntax_comment),
            HighlightKind::Function | HighlightKind::Label => Some(self.syntax_function),
            HighlightKind::Type | HighlightKind::Namespace => Some(self.syntax_type),
            HighlightKind::Variable | HighlightKind::Property | HighlightKind::Parameter => {
                Some(self.syntax_variable)
            }
            HighlightKind::Operator => Some(self.syntax_operator),
            HighlightKind::Punctuation => Some(self.syntax_punctuation),
            HighlightKind::Default => None,
        }
    }

    /// Tailwind Dark - slate background with pastel accents
    pub fn tailwind_dark() -> Self {
        Self {
            name: "tailwind-dark".to_string(),
            background: Paint::hex(0x0f172a),
            foreground: Paint::hex(0xe2e8f0),

            syntax_keyword: Style::new(Paint::hex(0xf472b6)),
            syntax_string: Style::new(Paint::hex(0x6ee7b7)),
            syntax_number: Style::new(Paint::hex(0xfcd34d)),
            syntax_comment: Style::new(Paint::hex(0x64748b)).italic(),
            syntax_function: Style::new(Paint::hex(0x7dd3fc)),
            syntax_type: Style::new(Paint::hex(0xc4b5fd)),
            syntax_variable: Paint::hex(0xe2e8f0).into(),
            syntax_operator: Paint::hex(0x94a3b8).into(),
            syntax_punctuation: Paint::hex(0x94a3b8).into(),
        }
    }

    /// Tailwind Light
    pub fn tailwind_light() -> Self {
        Self {
            name: "tailwind-light".to_string(),
            background: Paint::hex(0xffffff),
            foreground: Paint::hex(0x1e293b),

            syntax_keyword: Style::new(Paint::hex(0xdb2777)),
            syntax_string: Style::new(Paint::hex(0x047857)),
            syntax_number: Style::new(Paint::hex(0xb45309)),
            syntax_comment: Style::new(Paint::hex(0x94a3b8)).italic(),
            syntax_function: Style::new(Paint::hex(0x0369a1)),
            syntax_type: Style::new(Paint::hex(0x6d28d9)),
            syntax_variable: Paint::hex(0x1e293b).into(),
            syntax_operator: Paint::hex(0x64748b).into(),
            syntax_punctuation: Paint::hex(0x64748b).into(),
        }
    }

    /// Colors come from CSS custom properties defined by the embedding page
    pub fn css_variables() -> Self {
        Self {
            name: "css-variables".to_string(),
            background: Paint::Var("--lark-color-background"),
            foreground: Paint::Var("--lark-color-text"),

            syntax_keyword: Paint::Var("--lark-token-keyword").into(),
            syntax_string: Paint::Var("--lark-token-string").into(),
            syntax_number: Paint::Var("--lark-token-constant").into(),
            syntax_comment: Paint::Var("--lark-token-comment").into(),
            syntax_function: Paint::Var("--lark-token-function").into(),
            syntax_type: Paint::Var("--lark-token-type").into(),
            syntax_variable: Paint::Var("--lark-token-parameter").into(),
            syntax_operator: Paint::Var("--lark-token-punctuation").into(),
            syntax_punctuation: Paint::Var("--lark-token-punctuation").into(),
        }
    }

    /// Gruvbox Dark - warm retro theme
    pub fn gruvbox_dark() -> Self {
        Self {
            name: "gruvbox-dark".to_string(),
            background: Paint::hex(0x282828),
            foreground: Paint::hex(0xebdbb2),

            syntax_keyword: Style::new(Paint::hex(0xfb4934)).bold(),
            syntax_string: Style::new(Paint::hex(0xb8bb26)),
            syntax_number: Style::new(Paint::hex(0xd3869b)),
            syntax_comment: Style::new(Paint::hex(0x928374)).italic(),
            syntax_function: Style::new(Paint::hex(0xfabd2f)),
            syntax_type: Style::new(Paint::hex(0x83a598)),
            syntax_variable: Paint::hex(0xebdbb2).into(),
            syntax_operator: Paint::hex(0xfe8019).into(),
            syntax_punctuation: Paint::hex(0xebdbb2).into(),
        }
    }

    /// Gruvbox Light
    pub fn gruvbox_light() -> Self {
        Self {
            name: "gruvbox-light".to_string(),
            background: Paint::hex(0xfbf1c7),
            foreground: Paint::hex(0x3c3836),

            syntax_keyword: Style::new(Paint::hex(0x9d0006)).bold(),
            syntax_string: Style::new(Paint::hex(0x79740e)),
            syntax_number: Style::new(Paint::hex(0x8f3f71)),
            syntax_comment: Style::new(Paint::hex(0x928374)).italic(),
            syntax_function: Style::new(Paint::hex(0xb57614)),
            syntax_type: Style::new(Paint::hex(0x076678)),
            syntax_variable: Paint::hex(0x3c3836).into(),
            syntax_operator: Paint::hex(0xd65d0e).into(),
            syntax_punctuation: Paint::hex(0x3c3836).into(),
        }
    }

    /// Nord - arctic, north-bluish color palette
    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            background: Paint::hex(0x2e3440),
            foreground: Paint::hex(0xd8dee9),

            syntax_keyword: Style::new(Paint::hex(0x81a1c1)).bold(),
            syntax_string: Style::new(Paint::hex(0xa3be8c)),
            syntax_number: Style::new(Paint::hex(0xb48ead)),
            syntax_comment: Style::new(Paint::hex(0x616e88)).italic(),
            syntax_function: Style::new(Paint::hex(0x88c0d0)),
            syntax_type: Style::new(Paint::hex(0x8fbcbb)),
            syntax_variable: Paint::hex(0xd8dee9).into(),
            syntax_operator: Paint::hex(0x81a1c1).into(),
            syntax_punctuation: Paint::hex(0xeceff4).into(),
        }
    }

    /// Dracula - dark theme with vibrant colors
    pub fn dracula() -> Self {
        Self {
            name: "dracula".to_string(),
            background: Paint::hex(0x282a36),
            foreground: Paint::hex(0xf8f8f2),

            syntax_keyword: Style::new(Paint::hex(0xff79c6)).bold(),
            syntax_string: Style::new(Paint::hex(0xf1fa8c)),
            syntax_number: Style::new(Paint::hex(0xbd93f9)),
            syntax_comment: Style::new(Paint::hex(0x6272a4)).italic(),
            syntax_function: Style::new(Paint::hex(0x50fa7b)),
            syntax_type: Style::new(Paint::hex(0x8be9fd)).italic(),
            syntax_variable: Paint::hex(0xf8f8f2).into(),
            syntax_operator: Paint::hex(0xff79c6).into(),
            syntax_punctuation: Paint::hex(0xf8f8f2).into(),
        }
    }

    /// Solarized Dark
    pub fn solarized_dark() -> Self {
        Self {
            name: "solarized-dark".to_string(),
            background: Paint::hex(0x002b36),
            foreground: Paint::hex(0x839496),

            syntax_keyword: Style::new(Paint::hex(0x859900)).bold(),
            syntax_string: Style::new(Paint::hex(0x2aa198)),
            syntax_number: Style::new(Paint::hex(0xd33682)),
            syntax_comment: Style::new(Paint::hex(0x586e75)).italic(),
            syntax_function: Style::new(Paint::hex(0x268bd2)),
            syntax_type: Style::new(Paint::hex(0xb58900)),
            syntax_variable: Paint::hex(0x839496).into(),
            syntax_operator: Paint::hex(0x859900).into(),
            syntax_punctuation: Paint::hex(0x839496).into(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::css_variables()
    }
}
