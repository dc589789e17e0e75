//! HTML emission for highlighted lines

use std::fmt::Write;

use super::highlight::{HighlightKind, HighlightedLine, line_starts};
use super::{LineNode, LineTransform};
use crate::theme::Theme;

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render a whole code block: `<pre><code>` wrapping one span per line
pub(crate) fn render_block(
    source: &str,
    lines: &[HighlightedLine],
    theme: &Theme,
    line_transform: Option<LineTransform<'_>>,
) -> String {
    let mut html = format!(
        r#"<pre class="lark {}" style="background-color:{};color:{}" tabindex="0"><code>"#,
        escape_html(&theme.name),
        theme.background.to_css(),
        theme.foreground.to_css(),
    );

    let starts = line_starts(source);
    for (index, &start) in starts.iter().enumerate() {
        let end = starts.get(index + 1).map_or(source.len(), |next| next - 1);
        let text = source[start..end].strip_suffix('\r').unwrap_or(&source[start..end]);

        if index > 0 {
            html.push('\n');
        }

        let mut node = LineNode::new(index + 1);
        if let Some(transform) = line_transform {
            transform(&mut node);
        }

        let empty = HighlightedLine::default();
        let highlights = lines.get(index).unwrap_or(&empty);
        render_line(&mut html, &node, text, highlights, theme);
    }

    html.push_str("</code></pre>");
    html
}

fn render_line(
    html: &mut String,
    node: &LineNode,
    text: &str,
    highlights: &HighlightedLine,
    theme: &Theme,
) {
    let _ = write!(html, r#"<span class="{}""#, escape_html(&node.classes().join(" ")));
    for (name, value) in node.properties() {
        let _ = write!(html, r#" {}="{}""#, name, escape_html(value));
    }
    html.push('>');

    // Group consecutive chars of the same kind into one token
    let mut run_start = 0;
    let mut run_kind = None;
    for (offset, _) in text.char_indices() {
        let kind = highlights.kind_at(offset);
        match run_kind {
            Some(current) if current == kind => {}
            Some(current) => {
                push_token(html, &text[run_start..offset], current, theme);
                run_start = offset;
                run_kind = Some(kind);
            }
            None => run_kind = Some(kind),
        }
    }
    if let Some(kind) = run_kind {
        push_token(html, &text[run_start..], kind, theme);
    }

    html.push_str("</span>");
}

fn push_token(html: &mut String, text: &str, kind: HighlightKind, theme: &Theme) {
    match theme.style_for(kind) {
        Some(style) => {
            let _ = write!(
                html,
                r#"<span style="{}">{}</span>"#,
                style.to_css(),
                escape_html(text)
            );
        }
        None => html.push_str(&escape_html(text)),
    }
}
