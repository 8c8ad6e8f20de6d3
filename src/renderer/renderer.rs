use tracing::warn;

use crate::links::TypeUrlResolver;
use crate::renderer::components::*;
use crate::renderer::renders::OutputVisitor;
use crate::renderer::traits::*;
use crate::syntax::*;

/// CSS class of the element that wraps every rendered code block.
pub const CODE_CONTAINER_CLASS: &str = "code";

/// `TokenWriter` that produces classified, cross-linked HTML.
pub struct HtmlWriter<'a> {
    context: RenderContext,
    classifier: SemanticClassifier<'a>,
}

impl<'a> HtmlWriter<'a> {
    pub fn new(links: &'a dyn TypeUrlResolver) -> Self {
        Self {
            context: RenderContext::new(),
            classifier: SemanticClassifier::new(links),
        }
    }

    /// Current indentation depth.
    pub fn depth(&self) -> usize {
        self.context.depth
    }

    /// Append raw markup that is not part of the token stream.
    pub fn write_raw(&mut self, markup: &str) {
        self.context.output.push_str(markup);
    }

    pub fn into_html(self) -> String {
        self.context.output
    }

    fn write_span(&mut self, class: SemanticClass, text: &str) {
        self.context.write_indent();
        let out = &mut self.context.output;
        out.push_str("<span class=\"");
        out.push_str(class.css_class());
        out.push_str("\">");
        out.push_str(&encode_html(text));
        out.push_str("</span>");
    }

    fn write_anchor(&mut self, class: SemanticClass, href: &str, text: &str) {
        self.context.write_indent();
        let out = &mut self.context.output;
        out.push_str("<a class=\"");
        out.push_str(class.css_class());
        out.push_str("\" href=\"");
        out.push_str(&encode_attribute(href));
        out.push_str("\">");
        out.push_str(&encode_html(text));
        out.push_str("</a>");
    }
}

impl TokenWriter for HtmlWriter<'_> {
    fn start_node(&mut self, _tree: &SyntaxTree, _node: NodeId) {}

    fn end_node(&mut self, _tree: &SyntaxTree, _node: NodeId) {}

    fn indent(&mut self) {
        self.context.increase_depth();
    }

    fn unindent(&mut self) {
        self.context.decrease_depth();
    }

    fn space(&mut self) {
        self.context.write_indent();
        self.context.output.push(' ');
    }

    fn new_line(&mut self) {
        self.context.new_line();
    }

    // Comments are never rendered
    fn write_comment(&mut self, _kind: CommentKind, _content: &str) {}

    fn write_preprocessor_directive(&mut self, _directive: &str, _argument: Option<&str>) {}

    fn write_keyword(&mut self, keyword: &str) {
        self.write_span(SemanticClass::Keyword, keyword);
    }

    fn write_identifier(&mut self, tree: &SyntaxTree, identifier: NodeId) {
        let name = tree.identifier_name(identifier).unwrap_or_default();
        let (class, link) = self.classifier.classify(tree, Some(identifier));
        match link {
            Some(href) => self.write_anchor(class, &href, name),
            None => self.write_span(class, name),
        }
    }

    fn write_primitive_type(&mut self, keyword: &str) {
        self.write_span(SemanticClass::TypeReference, keyword);
    }

    fn write_primitive_value(&mut self, value: &PrimitiveValue) {
        let (class, text) = LiteralRenderer.render_value(value);
        self.write_span(class, &text);
    }

    fn write_token(&mut self, token: &str) {
        self.context.write_indent();
        self.context.output.push_str(&encode_html(token));
    }
}

/// Renders whole syntax trees into a code container
pub struct HtmlRenderer<'a> {
    links: &'a dyn TypeUrlResolver,
    format: &'a FormattingOptions,
}

impl<'a> HtmlRenderer<'a> {
    pub fn new(links: &'a dyn TypeUrlResolver, format: &'a FormattingOptions) -> Self {
        Self { links, format }
    }

    pub fn render(&self, tree: &SyntaxTree) -> String {
        let mut writer = HtmlWriter::new(self.links);
        writer.write_raw(&format!("<div class=\"{}\">", CODE_CONTAINER_CLASS));
        OutputVisitor::new(tree, &mut writer, self.format).write_tree();
        if writer.depth() != 0 {
            warn!(depth = writer.depth(), "indentation not balanced after render");
        }
        writer.write_raw("</div>");
        writer.into_html()
    }
}
