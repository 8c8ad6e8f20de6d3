#[cfg(test)]
mod formatting_tests {
    use serde_json::{json, Value};

    use crate::links::{MockTypeUrlResolver, NoLinks};
    use crate::renderer::*;
    use crate::syntax::*;

    fn ident(name: &str) -> Value {
        json!({ "kind": "identifier", "role": "name", "name": name })
    }

    fn member_annotation(symbol_kind: &str, full_name: &str) -> Value {
        json!({ "member": { "symbol_kind": symbol_kind, "full_name": full_name } })
    }

    fn type_annotation(full_name: &str) -> Value {
        json!({ "type": { "full_name": full_name } })
    }

    fn render(document: Value) -> String {
        let tree = parse_tree_value(document).unwrap();
        let options = FormattingOptions::default();
        HtmlRenderer::new(&NoLinks, &options).render(&tree)
    }

    fn assert_html(expected: &str, actual: &str) {
        if expected != actual {
            let diff = similar::TextDiff::from_lines(expected, actual);
            println!("{}", diff.unified_diff().header("expected", "actual"));
            panic!("Rendered HTML does not match. See diff above.");
        }
    }

    /// Records indentation events to check that every render rebalances.
    #[derive(Default)]
    struct CountingWriter {
        depth: i64,
        min_depth: i64,
        comments: usize,
        tokens: Vec<String>,
    }

    impl TokenWriter for CountingWriter {
        fn start_node(&mut self, _tree: &SyntaxTree, _node: NodeId) {}
        fn end_node(&mut self, _tree: &SyntaxTree, _node: NodeId) {}
        fn indent(&mut self) {
            self.depth += 1;
        }
        fn unindent(&mut self) {
            self.depth -= 1;
            self.min_depth = self.min_depth.min(self.depth);
        }
        fn space(&mut self) {}
        fn new_line(&mut self) {}
        fn write_comment(&mut self, _kind: CommentKind, _content: &str) {
            self.comments += 1;
        }
        fn write_preprocessor_directive(&mut self, _directive: &str, _argument: Option<&str>) {}
        fn write_keyword(&mut self, keyword: &str) {
            self.tokens.push(keyword.to_string());
        }
        fn write_identifier(&mut self, tree: &SyntaxTree, identifier: NodeId) {
            self.tokens
                .push(tree.identifier_name(identifier).unwrap_or_default().to_string());
        }
        fn write_primitive_type(&mut self, keyword: &str) {
            self.tokens.push(keyword.to_string());
        }
        fn write_primitive_value(&mut self, value: &PrimitiveValue) {
            self.tokens.push(format!("{:?}", value));
        }
        fn write_token(&mut self, token: &str) {
            self.tokens.push(token.to_string());
        }
    }

    fn is_positive_method() -> Value {
        json!({
            "kind": "method_declaration",
            "modifiers": ["public"],
            "annotations": [member_annotation("method", "Widgets.Gadget.IsPositive")],
            "children": [
                { "kind": "primitive_type", "role": "type", "keyword": "bool" },
                ident("IsPositive"),
                {
                    "kind": "block_statement", "role": "body",
                    "children": [{
                        "kind": "if_else_statement", "role": "statement",
                        "children": [
                            {
                                "kind": "binary_operator_expression", "role": "condition", "operator": ">",
                                "children": [
                                    {
                                        "kind": "identifier_expression", "role": "left",
                                        "annotations": [{ "variable": { "name": "x", "kind": "parameter" } }],
                                        "children": [ident("x")]
                                    },
                                    { "kind": "primitive_expression", "role": "right", "value": { "int": 0 } }
                                ]
                            },
                            {
                                "kind": "block_statement", "role": "true_statement",
                                "children": [{
                                    "kind": "return_statement", "role": "statement",
                                    "children": [{ "kind": "primitive_expression", "role": "expression", "value": { "bool": true } }]
                                }]
                            },
                            {
                                "kind": "return_statement", "role": "false_statement",
                                "children": [{ "kind": "primitive_expression", "role": "expression", "value": { "bool": false } }]
                            }
                        ]
                    }]
                }
            ]
        })
    }

    #[test]
    fn test_field_declaration_layout() {
        let html = render(json!({
            "kind": "type_declaration",
            "modifiers": ["public"],
            "annotations": [type_annotation("Widgets.Gadget")],
            "children": [
                ident("Gadget"),
                {
                    "kind": "field_declaration",
                    "modifiers": ["public"],
                    "annotations": [member_annotation("field", "Widgets.Gadget.Size")],
                    "children": [
                        { "kind": "primitive_type", "role": "type", "keyword": "int" },
                        { "kind": "variable_initializer", "role": "variable", "children": [ident("Size")] }
                    ]
                }
            ]
        }));

        assert_html(
            "<div class=\"code\"><span class=\"c-kw\">public</span> <span class=\"c-kw\">class</span> <span class=\"c-td\">Gadget</span>\n\
             {\n    \
             <span class=\"c-kw\">public</span> <span class=\"c-tr\">int</span> <span class=\"c-fd\">Size</span>;\n\
             }\n\
             </div>",
            &html,
        );
    }

    #[test]
    fn test_if_else_layout() {
        let html = render(is_positive_method());

        assert_html(
            concat!(
                "<div class=\"code\"><span class=\"c-kw\">public</span> <span class=\"c-tr\">bool</span> <span class=\"c-md\">IsPositive</span>()\n",
                "{\n",
                "    <span class=\"c-kw\">if</span> (<span class=\"c-ar\">x</span> &gt; <span class=\"c-nu\">0</span>) {\n",
                "        <span class=\"c-kw\">return</span> <span class=\"c-nl\">true</span>;\n",
                "    } <span class=\"c-kw\">else</span>\n",
                "        <span class=\"c-kw\">return</span> <span class=\"c-nl\">false</span>;\n",
                "}\n",
                "</div>"
            ),
            &html,
        );
    }

    #[test]
    fn test_namespace_nesting_indents_four_spaces() {
        let html = render(json!({
            "kind": "syntax_tree",
            "children": [
                {
                    "kind": "using_declaration",
                    "annotations": [{ "using_scope": { "namespace": "System" } }],
                    "children": [ident("System")]
                },
                {
                    "kind": "namespace_declaration",
                    "annotations": [{ "using_scope": { "namespace": "Widgets" } }],
                    "children": [
                        ident("Widgets"),
                        {
                            "kind": "type_declaration",
                            "modifiers": ["public"],
                            "annotations": [type_annotation("Widgets.Gadget")],
                            "children": [ident("Gadget")]
                        }
                    ]
                }
            ]
        }));

        assert_html(
            concat!(
                "<div class=\"code\"><span class=\"c-kw\">using</span> <span class=\"c-nr\">System</span>;\n",
                "\n",
                "<span class=\"c-kw\">namespace</span> <span class=\"c-nr\">Widgets</span>\n",
                "{\n",
                "    <span class=\"c-kw\">public</span> <span class=\"c-kw\">class</span> <span class=\"c-td\">Gadget</span>\n",
                "    {\n",
                "    }\n",
                "}\n",
                "</div>"
            ),
            &html,
        );
    }

    #[test]
    fn test_auto_property_on_one_line() {
        let html = render(json!({
            "kind": "property_declaration",
            "modifiers": ["public"],
            "annotations": [member_annotation("property", "Widgets.Gadget.Count")],
            "children": [
                { "kind": "primitive_type", "role": "type", "keyword": "int" },
                ident("Count"),
                { "kind": "accessor", "role": "getter", "accessor_kind": "get" },
                { "kind": "accessor", "role": "setter", "accessor_kind": "set", "modifiers": ["private"] }
            ]
        }));

        assert!(html.contains(
            "<span class=\"c-pd\">Count</span> { <span class=\"c-kw\">get</span>; \
             <span class=\"c-kw\">private</span> <span class=\"c-kw\">set</span>; }\n"
        ));
    }

    #[test]
    fn test_invocation_with_literals() {
        let html = render(json!({
            "kind": "expression_statement",
            "children": [{
                "kind": "invocation_expression", "role": "expression",
                "children": [
                    {
                        "kind": "identifier_expression", "role": "target",
                        "annotations": [member_annotation("method", "Widgets.Gadget.Log")],
                        "children": [ident("Log")]
                    },
                    { "kind": "primitive_expression", "role": "argument", "value": { "string": "a<b & \"c\"" } },
                    { "kind": "primitive_expression", "role": "argument", "value": "null" },
                    { "kind": "primitive_expression", "role": "argument", "value": { "float": 1.5 } }
                ]
            }]
        }));

        assert_html(
            concat!(
                "<div class=\"code\"><span class=\"c-mr\">Log</span>(",
                "<span class=\"c-st\">\"a&lt;b &amp; \\\"c\\\"\"</span>, ",
                "<span class=\"c-nl\">null</span>, ",
                "<span class=\"c-nu\">1.5</span>);\n",
                "</div>"
            ),
            &html,
        );
    }

    #[test]
    fn test_unlinked_type_reference_is_span() {
        let html = render(json!({
            "kind": "field_declaration",
            "modifiers": ["public"],
            "children": [
                {
                    "kind": "simple_type", "role": "type",
                    "annotations": [type_annotation("Elsewhere.Thing")],
                    "children": [ident("Thing")]
                },
                { "kind": "variable_initializer", "role": "variable", "children": [ident("thing")] }
            ]
        }));

        assert!(html.contains("<span class=\"c-tr\">Thing</span>"));
        assert!(!html.contains("<a "));
        // No annotation anywhere above the variable name
        assert!(html.contains("<span class=\"c-uk\">thing</span>"));
    }

    #[test]
    fn test_linked_type_reference_escapes_href() {
        let tree = parse_tree_value(json!({
            "kind": "simple_type",
            "annotations": [type_annotation("Widgets.Box`1")],
            "children": [
                ident("Box"),
                { "kind": "primitive_type", "role": "type_argument", "keyword": "int" }
            ]
        }))
        .unwrap();

        let mut links = MockTypeUrlResolver::new();
        links
            .expect_find_type_url()
            .times(1)
            .returning(|name| match name {
                "Widgets.Box`1" => Some("/types?name=Box&arity=1".to_string()),
                _ => None,
            });
        let options = FormattingOptions::default();
        let html = HtmlRenderer::new(&links, &options).render(&tree);

        assert_eq!(
            html,
            "<div class=\"code\"><a class=\"c-tr\" href=\"/types?name=Box&amp;arity=1\">Box</a>&lt;<span class=\"c-tr\">int</span>&gt;</div>"
        );
    }

    #[test]
    fn test_identifier_text_is_escaped() {
        let html = render(json!({
            "kind": "type_declaration",
            "modifiers": ["internal"],
            "annotations": [type_annotation("<Module>")],
            "children": [ident("<Module>")]
        }));

        assert!(html.contains("<span class=\"c-td\">&lt;Module&gt;</span>"));
        assert!(!html.contains("<Module>"));
    }

    #[test]
    fn test_comments_are_not_rendered() {
        let html = render(json!({
            "kind": "type_declaration",
            "modifiers": ["public"],
            "children": [
                ident("Gadget"),
                { "kind": "comment", "role": "comment", "comment_kind": "documentation", "content": "secret notes" },
                { "kind": "pre_processor_directive", "role": "comment", "directive": "region", "argument": "Hidden" }
            ]
        }));

        assert!(!html.contains("secret notes"));
        assert!(!html.contains("region"));
    }

    #[test]
    fn test_custom_brace_style() {
        let tree = parse_tree_value(is_positive_method()).unwrap();
        let options = FormattingOptions {
            method_brace_style: BraceStyle::EndOfLine,
            space_before_if_parentheses: false,
            ..FormattingOptions::default()
        };
        let html = HtmlRenderer::new(&NoLinks, &options).render(&tree);

        assert!(html.contains("<span class=\"c-md\">IsPositive</span>() {\n"));
        assert!(html.contains("<span class=\"c-kw\">if</span>(<span class=\"c-ar\">x</span>"));
    }

    #[test]
    fn test_enum_members_comma_separated() {
        let html = render(json!({
            "kind": "type_declaration",
            "class_kind": "enum",
            "modifiers": ["public"],
            "children": [
                ident("Shade"),
                { "kind": "enum_member_declaration", "children": [ident("Light")] },
                {
                    "kind": "enum_member_declaration",
                    "children": [
                        ident("Dark"),
                        { "kind": "primitive_expression", "role": "initializer", "value": { "int": 2 } }
                    ]
                }
            ]
        }));

        assert!(html.contains("    <span class=\"c-uk\">Light</span>,\n"));
        assert!(html.contains("    <span class=\"c-uk\">Dark</span> = <span class=\"c-nu\">2</span>\n"));
    }

    #[test]
    fn test_indentation_is_balanced() {
        let tree = parse_tree_value(json!({
            "kind": "syntax_tree",
            "children": [{
                "kind": "namespace_declaration",
                "children": [
                    ident("Widgets"),
                    {
                        "kind": "type_declaration",
                        "modifiers": ["public"],
                        "children": [
                            ident("Gadget"),
                            { "kind": "comment", "role": "comment", "content": "note" },
                            is_positive_method(),
                            {
                                "kind": "property_declaration",
                                "modifiers": ["public"],
                                "children": [
                                    { "kind": "primitive_type", "role": "type", "keyword": "int" },
                                    ident("Count"),
                                    {
                                        "kind": "accessor", "role": "getter", "accessor_kind": "get",
                                        "children": [{ "kind": "block_statement", "role": "body" }]
                                    }
                                ]
                            }
                        ]
                    }
                ]
            }]
        }))
        .unwrap();

        let mut writer = CountingWriter::default();
        let options = FormattingOptions::default();
        OutputVisitor::new(&tree, &mut writer, &options).write_tree();

        assert_eq!(writer.depth, 0);
        assert!(writer.min_depth >= 0);
        assert_eq!(writer.comments, 1);
        assert!(writer.tokens.iter().any(|t| t == "IsPositive"));
    }

    #[test]
    fn test_render_context_indents_once_per_line() {
        let mut context = RenderContext::new();
        context.increase_depth();
        context.increase_depth();
        context.write_indent();
        context.output.push('a');
        context.write_indent();
        context.output.push('b');
        context.new_line();
        context.decrease_depth();
        context.write_indent();
        context.output.push('c');

        assert_eq!(context.output, "        ab\n    c");
    }
}
