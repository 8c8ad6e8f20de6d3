use serde::Deserialize;

use crate::syntax::{CommentKind, NodeId, PrimitiveValue, SyntaxTree};

/// Number of spaces written per indentation level.
pub const INDENT_WIDTH: usize = 4;

/// Per-render layout state: indentation depth, line-start flag and the output buffer
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub depth: usize,
    pub needs_indent: bool,
    pub output: String,
}

impl RenderContext {
    pub fn new() -> Self {
        Self {
            depth: 0,
            needs_indent: true,
            output: String::new(),
        }
    }

    pub fn indent(&self) -> String {
        " ".repeat(self.depth * INDENT_WIDTH)
    }

    /// Write the pending indentation if we are at the start of a line.
    pub fn write_indent(&mut self) {
        if !self.needs_indent {
            return;
        }
        self.needs_indent = false;
        let indent = self.indent();
        self.output.push_str(&indent);
    }

    pub fn new_line(&mut self) {
        self.output.push('\n');
        self.needs_indent = true;
    }

    pub fn increase_depth(&mut self) {
        self.depth += 1;
    }

    pub fn decrease_depth(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Where an opening brace goes relative to the construct it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BraceStyle {
    EndOfLine,
    NextLine,
}

/// Layout policy for the output visitor
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormattingOptions {
    pub type_brace_style: BraceStyle,
    pub method_brace_style: BraceStyle,
    pub property_brace_style: BraceStyle,
    pub accessor_brace_style: BraceStyle,
    pub statement_brace_style: BraceStyle,
    pub space_before_method_call_parentheses: bool,
    pub space_before_method_declaration_parentheses: bool,
    pub space_before_constructor_declaration_parentheses: bool,
    pub space_before_if_parentheses: bool,
    pub space_after_comma: bool,
    pub space_around_operators: bool,
    pub blank_lines_between_members: usize,
    /// Write `{ get; set; }` on the declaration line when no accessor has a body.
    pub simple_accessors_on_one_line: bool,
}

impl FormattingOptions {
    /// Mono layout with no space before declaration and call parentheses.
    pub fn mono() -> Self {
        Self {
            type_brace_style: BraceStyle::NextLine,
            method_brace_style: BraceStyle::NextLine,
            property_brace_style: BraceStyle::EndOfLine,
            accessor_brace_style: BraceStyle::EndOfLine,
            statement_brace_style: BraceStyle::EndOfLine,
            space_before_method_call_parentheses: false,
            space_before_method_declaration_parentheses: false,
            space_before_constructor_declaration_parentheses: false,
            space_before_if_parentheses: true,
            space_after_comma: true,
            space_around_operators: true,
            blank_lines_between_members: 1,
            simple_accessors_on_one_line: true,
        }
    }
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self::mono()
    }
}

/// Sink for the token stream produced while walking a syntax tree.
///
/// Events arrive in traversal order. Comments and preprocessor directives
/// are reported without surrounding line breaks; a writer that renders them
/// is responsible for terminating single-line comments.
pub trait TokenWriter {
    fn start_node(&mut self, tree: &SyntaxTree, node: NodeId);
    fn end_node(&mut self, tree: &SyntaxTree, node: NodeId);
    fn indent(&mut self);
    fn unindent(&mut self);
    fn space(&mut self);
    fn new_line(&mut self);
    fn write_comment(&mut self, kind: CommentKind, content: &str);
    fn write_preprocessor_directive(&mut self, directive: &str, argument: Option<&str>);
    fn write_keyword(&mut self, keyword: &str);
    fn write_identifier(&mut self, tree: &SyntaxTree, identifier: NodeId);
    fn write_primitive_type(&mut self, keyword: &str);
    fn write_primitive_value(&mut self, value: &PrimitiveValue);
    fn write_token(&mut self, token: &str);
}
