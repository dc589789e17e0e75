//! Per-line highlight spans extracted from a Tree-sitter parse tree

use tree_sitter::{Node, Tree, TreeCursor};

/// A highlight span within a line
#[derive(Debug, Clone)]
pub struct Highlight {
    pub start: usize, // Column start (byte offset within line)
    pub end: usize,   // Column end (byte offset within line)
    pub kind: HighlightKind,
}

/// Types of syntax elements for highlighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightKind {
    Keyword,
    String,
    Number,
    Comment,
    Function,
    Type,
    Variable,
    Operator,
    Punctuation,
    Property,
    Constant,
    Namespace,
    Parameter,
    Label,
    Default,
}

impl HighlightKind {
    /// Classify a node. Works across grammars: named nodes by common node
    /// type names, anonymous nodes (keywords and symbols) by their text.
    pub fn from_node(node: &Node) -> Self {
        if !node.is_named() {
            return Self::from_anonymous(node.kind());
        }

        let kind = Self::from_node_type(node.kind());
        if kind == HighlightKind::Variable && is_callee(node) {
            return HighlightKind::Function;
        }
        kind
    }

    /// Map a named Tree-sitter node type to a highlight kind
    pub fn from_node_type(node_type: &str) -> Self {
        match node_type {
            "comment" | "line_comment" | "block_comment" | "doc_comment" => HighlightKind::Comment,

            "string"
            | "string_literal"
            | "raw_string"
            | "raw_string_literal"
            | "char_literal"
            | "string_content"
            | "escape_sequence"
            | "interpreted_string_literal"
            | "template_string" => HighlightKind::String,

            "number" | "integer" | "float" | "integer_literal" | "float_literal"
            | "number_literal" => HighlightKind::Number,

            "keyword" | "storage_class" | "visibility_modifier" | "mutable_specifier" => {
                HighlightKind::Keyword
            }

            "type" | "type_identifier" | "primitive_type" | "predefined_type" => HighlightKind::Type,

            "identifier" | "variable" | "shorthand_field_identifier" => HighlightKind::Variable,

            "property" | "property_identifier" | "field_identifier" => HighlightKind::Property,

            "true" | "false" | "null" | "none" | "nil" | "boolean" | "constant" => {
                HighlightKind::Constant
            }

            "namespace" | "module" => HighlightKind::Namespace,

            "parameter" | "formal_parameter" => HighlightKind::Parameter,

            "label" | "loop_label" | "lifetime" | "attribute_item" | "inner_attribute_item"
            | "decorator" => HighlightKind::Label,

            _ => HighlightKind::Default,
        }
    }

    fn from_anonymous(text: &str) -> Self {
        match text {
            "true" | "false" | "null" | "nil" | "None" | "True" | "False" => {
                HighlightKind::Constant
            }
            "(" | ")" | "[" | "]" | "{" | "}" | ";" | "," | "." | ":" | "::" => {
                HighlightKind::Punctuation
            }
            "\"" | "`" => HighlightKind::String,
            _ if !text.is_empty()
                && text.chars().all(|c| c.is_ascii_alphabetic() || c == '_') =>
            {
                HighlightKind::Keyword
            }
            _ if text.chars().all(|c| c.is_ascii_punctuation()) => HighlightKind::Operator,
            _ => HighlightKind::Default,
        }
    }
}

/// An identifier naming the function being defined or called
fn is_callee(node: &Node) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };

    let callee = match parent.kind() {
        "function_item" | "function_definition" | "function_declaration"
        | "method_definition" => parent.child_by_field_name("name"),
        "call_expression" => parent.child_by_field_name("function"),
        "macro_invocation" => parent.child_by_field_name("macro"),
        _ => None,
    };
    callee.is_some_and(|n| n.id() == node.id())
}

/// A line with its syntax highlights
#[derive(Debug, Clone, Default)]
pub struct HighlightedLine {
    pub highlights: Vec<Highlight>,
}

impl HighlightedLine {
    /// Get the highlight kind at a given column; the outermost span wins
    pub fn kind_at(&self, col: usize) -> HighlightKind {
        for h in &self.highlights {
            if col >= h.start && col < h.end {
                return h.kind;
            }
        }
        HighlightKind::Default
    }
}

/// Byte offset of the start of every line (split on `\n`)
pub(crate) fn line_starts(source: &str) -> Vec<usize> {
    let mut starts = vec![0];
    starts.extend(
        source
            .char_indices()
            .filter(|&(_, c)| c == '\n')
            .map(|(i, _)| i + 1),
    );
    starts
}

/// Build per-line highlights from a parse tree
pub fn collect_highlights(tree: &Tree, source: &str) -> Vec<HighlightedLine> {
    let starts = line_starts(source);
    let mut collector = Collector {
        source_len: source.len(),
        line_starts: &starts,
        lines: vec![HighlightedLine::default(); starts.len()],
    };

    let mut cursor = tree.walk();
    collector.walk(&mut cursor);
    collector.lines
}

struct Collector<'a> {
    source_len: usize,
    line_starts: &'a [usize],
    lines: Vec<HighlightedLine>,
}

impl Collector<'_> {
    fn walk(&mut self, cursor: &mut TreeCursor) {
        loop {
            let node = cursor.node();
            let kind = HighlightKind::from_node(&node);

            // Only add highlights for leaf nodes or whole strings/comments
            if kind != HighlightKind::Default
                && (node.child_count() == 0 || is_highlightable_parent(node.kind()))
            {
                self.add(&node, kind);
            }

            if cursor.goto_first_child() {
                self.walk(cursor);
                cursor.goto_parent();
            }

            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }

    /// Add a highlight to each line the node spans
    fn add(&mut self, node: &Node, kind: HighlightKind) {
        let start_byte = node.start_byte();
        let end_byte = node.end_byte();
        let start_line = node.start_position().row;
        let end_line = node.end_position().row;

        for line in start_line..=end_line {
            if line >= self.lines.len() {
                break;
            }

            let line_start = self.line_starts[line];
            let line_end = self
                .line_starts
                .get(line + 1)
                .copied()
                .unwrap_or(self.source_len);

            let start = if line == start_line {
                start_byte.saturating_sub(line_start)
            } else {
                0
            };
            let end = if line == end_line {
                end_byte.saturating_sub(line_start)
            } else {
                line_end.saturating_sub(line_start)
            };

            if start < end {
                self.lines[line].highlights.push(Highlight { start, end, kind });
            }
        }
    }
}

/// Check if a parent node type should be highlighted as a whole
fn is_highlightable_parent(node_type: &str) -> bool {
    matches!(
        node_type,
        "string"
            | "string_literal"
            | "raw_string"
            | "raw_string_literal"
            | "template_string"
            | "comment"
            | "line_comment"
            | "block_comment"
    )
}
