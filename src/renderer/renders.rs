use crate::renderer::traits::*;
use crate::syntax::*;

/// Walks a syntax tree in source order and reports every token to a `TokenWriter`.
pub struct OutputVisitor<'a, W: TokenWriter> {
    tree: &'a SyntaxTree,
    writer: &'a mut W,
    options: &'a FormattingOptions,
}

impl<'a, W: TokenWriter> OutputVisitor<'a, W> {
    pub fn new(tree: &'a SyntaxTree, writer: &'a mut W, options: &'a FormattingOptions) -> Self {
        Self {
            tree,
            writer,
            options,
        }
    }

    pub fn write_tree(&mut self) {
        let root = self.tree.root();
        self.visit(root);
    }

    pub fn visit(&mut self, node: NodeId) {
        let tree = self.tree;
        self.writer.start_node(tree, node);

        match tree.kind(node) {
            NodeKind::SyntaxTree => self.write_root_members(node),
            NodeKind::UsingDeclaration => {
                self.writer.write_keyword("using");
                self.writer.space();
                self.write_dotted_name(node);
                self.writer.write_token(";");
                self.writer.new_line();
            }
            NodeKind::NamespaceDeclaration => {
                self.writer.write_keyword("namespace");
                self.writer.space();
                self.write_dotted_name(node);
                self.open_brace(Some(self.options.type_brace_style));
                self.write_members(node);
                self.close_brace();
                self.writer.new_line();
            }
            NodeKind::TypeDeclaration {
                class_kind,
                modifiers,
            } => {
                self.write_attributes(node);
                self.write_modifiers(*modifiers);
                self.writer.write_keyword(class_kind.keyword());
                self.writer.space();
                self.write_name(node);
                self.write_type_parameters(node);

                let base_types: Vec<NodeId> = tree.children_with_role(node, Role::BaseType).collect();
                if !base_types.is_empty() {
                    self.writer.space();
                    self.writer.write_token(":");
                    self.writer.space();
                    self.write_comma_separated(&base_types);
                }

                self.open_brace(Some(self.options.type_brace_style));
                if *class_kind == ClassKind::Enum {
                    self.write_enum_members(node);
                } else {
                    self.write_members(node);
                }
                self.close_brace();
                self.writer.new_line();
            }
            NodeKind::EnumMemberDeclaration => {
                self.write_attributes(node);
                self.write_name(node);
                self.write_initializer(node);
            }
            NodeKind::MethodDeclaration { modifiers } => {
                self.write_attributes(node);
                self.write_modifiers(*modifiers);
                self.write_child(node, Role::Type);
                self.writer.space();
                self.write_private_implementation_type(node);
                self.write_name(node);
                self.write_type_parameters(node);
                if self.options.space_before_method_declaration_parentheses {
                    self.writer.space();
                }
                self.write_parameters(node);
                self.write_body(node, self.options.method_brace_style);
                self.writer.new_line();
            }
            NodeKind::ConstructorDeclaration { modifiers } => {
                self.write_attributes(node);
                self.write_modifiers(*modifiers);
                self.write_name(node);
                if self.options.space_before_constructor_declaration_parentheses {
                    self.writer.space();
                }
                self.write_parameters(node);
                self.write_body(node, self.options.method_brace_style);
                self.writer.new_line();
            }
            NodeKind::FieldDeclaration { modifiers } => {
                self.write_attributes(node);
                self.write_modifiers(*modifiers);
                self.write_child(node, Role::Type);
                self.writer.space();
                self.write_variables(node);
                self.writer.write_token(";");
                self.writer.new_line();
            }
            NodeKind::PropertyDeclaration { modifiers } => {
                self.write_attributes(node);
                self.write_modifiers(*modifiers);
                self.write_child(node, Role::Type);
                self.writer.space();
                self.write_private_implementation_type(node);
                self.write_name(node);
                self.write_accessors(node);
                self.writer.new_line();
            }
            NodeKind::Accessor {
                accessor_kind,
                modifiers,
            } => {
                self.write_attributes(node);
                self.write_modifiers(*modifiers);
                self.writer.write_keyword(accessor_kind.keyword());
                self.write_body(node, self.options.accessor_brace_style);
            }
            NodeKind::EventDeclaration { modifiers } => {
                self.write_attributes(node);
                self.write_modifiers(*modifiers);
                self.writer.write_keyword("event");
                self.writer.space();
                self.write_child(node, Role::Type);
                self.writer.space();
                self.write_variables(node);
                self.writer.write_token(";");
                self.writer.new_line();
            }
            NodeKind::CustomEventDeclaration { modifiers } => {
                self.write_attributes(node);
                self.write_modifiers(*modifiers);
                self.writer.write_keyword("event");
                self.writer.space();
                self.write_child(node, Role::Type);
                self.writer.space();
                self.write_name(node);
                self.open_brace(Some(self.options.property_brace_style));
                for role in [Role::AddAccessor, Role::RemoveAccessor] {
                    if let Some(accessor) = tree.child_with_role(node, role) {
                        self.visit(accessor);
                        self.writer.new_line();
                    }
                }
                self.close_brace();
                self.writer.new_line();
            }
            NodeKind::AttributeSection { target } => {
                self.writer.write_token("[");
                if let Some(target) = target {
                    self.writer.write_keyword(target);
                    self.writer.write_token(":");
                    self.writer.space();
                }
                let attributes: Vec<NodeId> = tree.children_with_role(node, Role::Attribute).collect();
                self.write_comma_separated(&attributes);
                self.writer.write_token("]");
            }
            NodeKind::Attribute => {
                self.write_child(node, Role::Type);
                let arguments: Vec<NodeId> = tree.children_with_role(node, Role::Argument).collect();
                if !arguments.is_empty() {
                    self.writer.write_token("(");
                    self.write_comma_separated(&arguments);
                    self.writer.write_token(")");
                }
            }
            NodeKind::ParameterDeclaration { modifier } => {
                for section in tree.children_with_role(node, Role::Attribute) {
                    self.visit(section);
                    self.writer.space();
                }
                if let Some(modifier) = modifier {
                    self.writer.write_keyword(modifier.keyword());
                    self.writer.space();
                }
                self.write_child(node, Role::Type);
                self.writer.space();
                self.write_name(node);
                self.write_initializer(node);
            }
            NodeKind::TypeParameterDeclaration => self.write_name(node),
            NodeKind::VariableInitializer => {
                self.write_name(node);
                self.write_initializer(node);
            }
            NodeKind::SimpleType => {
                self.write_name(node);
                self.write_type_arguments(node);
            }
            NodeKind::MemberType => {
                self.write_child(node, Role::Target);
                self.writer.write_token(".");
                self.write_name(node);
                self.write_type_arguments(node);
            }
            NodeKind::PrimitiveType { keyword } => self.writer.write_primitive_type(keyword),
            NodeKind::ComposedType {
                nullable,
                array_rank,
            } => {
                self.write_child(node, Role::Type);
                if *nullable {
                    self.writer.write_token("?");
                }
                for _ in 0..*array_rank {
                    self.writer.write_token("[");
                    self.writer.write_token("]");
                }
            }
            NodeKind::BlockStatement => {
                self.write_block_content(node, None);
                self.writer.new_line();
            }
            NodeKind::ExpressionStatement => {
                self.write_child(node, Role::Expression);
                self.writer.write_token(";");
                self.writer.new_line();
            }
            NodeKind::ReturnStatement => {
                self.writer.write_keyword("return");
                if let Some(expression) = tree.child_with_role(node, Role::Expression) {
                    self.writer.space();
                    self.visit(expression);
                }
                self.writer.write_token(";");
                self.writer.new_line();
            }
            NodeKind::ThrowStatement => {
                self.writer.write_keyword("throw");
                if let Some(expression) = tree.child_with_role(node, Role::Expression) {
                    self.writer.space();
                    self.visit(expression);
                }
                self.writer.write_token(";");
                self.writer.new_line();
            }
            NodeKind::VariableDeclarationStatement => {
                self.write_child(node, Role::Type);
                self.writer.space();
                self.write_variables(node);
                self.writer.write_token(";");
                self.writer.new_line();
            }
            NodeKind::IfElseStatement => self.write_if_else(node),
            NodeKind::IdentifierExpression => {
                self.write_name(node);
                self.write_type_arguments(node);
            }
            NodeKind::MemberReferenceExpression => {
                self.write_child(node, Role::Target);
                self.writer.write_token(".");
                self.write_name(node);
                self.write_type_arguments(node);
            }
            NodeKind::InvocationExpression => {
                self.write_child(node, Role::Target);
                if self.options.space_before_method_call_parentheses {
                    self.writer.space();
                }
                self.write_arguments(node);
            }
            NodeKind::ObjectCreateExpression => {
                self.writer.write_keyword("new");
                self.writer.space();
                self.write_child(node, Role::Type);
                self.write_arguments(node);
            }
            NodeKind::AssignmentExpression { operator }
            | NodeKind::BinaryOperatorExpression { operator } => {
                self.write_child(node, Role::Left);
                self.write_operator(operator);
                self.write_child(node, Role::Right);
            }
            NodeKind::UnaryOperatorExpression { operator, postfix } => {
                if *postfix {
                    self.write_child(node, Role::Expression);
                    self.writer.write_token(operator);
                } else {
                    self.writer.write_token(operator);
                    self.write_child(node, Role::Expression);
                }
            }
            NodeKind::PrimitiveExpression { value } => self.writer.write_primitive_value(value),
            NodeKind::ThisReferenceExpression => self.writer.write_keyword("this"),
            NodeKind::BaseReferenceExpression => self.writer.write_keyword("base"),
            NodeKind::TypeReferenceExpression => self.write_child(node, Role::Type),
            NodeKind::ParenthesizedExpression => {
                self.writer.write_token("(");
                self.write_child(node, Role::Expression);
                self.writer.write_token(")");
            }
            NodeKind::CastExpression => {
                self.writer.write_token("(");
                self.write_child(node, Role::Type);
                self.writer.write_token(")");
                self.write_child(node, Role::Expression);
            }
            NodeKind::TypeOfExpression => {
                self.writer.write_keyword("typeof");
                self.writer.write_token("(");
                self.write_child(node, Role::Type);
                self.writer.write_token(")");
            }
            NodeKind::Identifier { .. } => self.writer.write_identifier(tree, node),
            NodeKind::Comment {
                comment_kind,
                content,
            } => self.writer.write_comment(*comment_kind, content),
            NodeKind::PreProcessorDirective {
                directive,
                argument,
            } => self
                .writer
                .write_preprocessor_directive(directive, argument.as_deref()),
        }

        self.writer.end_node(tree, node);
    }

    fn write_root_members(&mut self, node: NodeId) {
        let tree = self.tree;
        let mut previous: Option<NodeId> = None;
        for &child in tree.children(node) {
            if let Some(previous) = previous {
                // Usings are grouped; everything else is separated by a blank line
                let both_usings = matches!(tree.kind(previous), NodeKind::UsingDeclaration)
                    && matches!(tree.kind(child), NodeKind::UsingDeclaration);
                if !both_usings && !self.is_trivia(child) {
                    self.writer.new_line();
                }
            }
            self.visit(child);
            if !self.is_trivia(child) {
                previous = Some(child);
            }
        }
    }

    fn write_members(&mut self, node: NodeId) {
        let tree = self.tree;
        let mut first = true;
        for &child in tree.children(node) {
            match tree.role(child) {
                Role::Comment => self.visit(child),
                Role::Member => {
                    if !first {
                        for _ in 0..self.options.blank_lines_between_members {
                            self.writer.new_line();
                        }
                    }
                    first = false;
                    self.visit(child);
                }
                _ => {}
            }
        }
    }

    fn write_enum_members(&mut self, node: NodeId) {
        let members: Vec<NodeId> = self.tree.children_with_role(node, Role::Member).collect();
        for (i, member) in members.iter().enumerate() {
            self.visit(*member);
            if i + 1 < members.len() {
                self.writer.write_token(",");
            }
            self.writer.new_line();
        }
    }

    fn is_trivia(&self, node: NodeId) -> bool {
        matches!(
            self.tree.kind(node),
            NodeKind::Comment { .. } | NodeKind::PreProcessorDirective { .. }
        )
    }

    fn write_child(&mut self, node: NodeId, role: Role) {
        if let Some(child) = self.tree.child_with_role(node, role) {
            self.visit(child);
        }
    }

    fn write_name(&mut self, node: NodeId) {
        self.write_child(node, Role::Name);
    }

    fn write_dotted_name(&mut self, node: NodeId) {
        let segments: Vec<NodeId> = self.tree.children_with_role(node, Role::Name).collect();
        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                self.writer.write_token(".");
            }
            self.visit(*segment);
        }
    }

    fn write_modifiers(&mut self, modifiers: Modifiers) {
        for keyword in modifiers.keywords() {
            self.writer.write_keyword(keyword);
            self.writer.space();
        }
    }

    fn write_attributes(&mut self, node: NodeId) {
        let sections: Vec<NodeId> = self.tree.children_with_role(node, Role::Attribute).collect();
        for section in sections {
            self.visit(section);
            self.writer.new_line();
        }
    }

    fn write_comma_separated(&mut self, nodes: &[NodeId]) {
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                self.writer.write_token(",");
                if self.options.space_after_comma {
                    self.writer.space();
                }
            }
            self.visit(*node);
        }
    }

    fn write_type_parameters(&mut self, node: NodeId) {
        let parameters: Vec<NodeId> = self.tree.children_with_role(node, Role::TypeParameter).collect();
        if parameters.is_empty() {
            return;
        }
        self.writer.write_token("<");
        self.write_comma_separated(&parameters);
        self.writer.write_token(">");
    }

    fn write_type_arguments(&mut self, node: NodeId) {
        let arguments: Vec<NodeId> = self.tree.children_with_role(node, Role::TypeArgument).collect();
        if arguments.is_empty() {
            return;
        }
        self.writer.write_token("<");
        self.write_comma_separated(&arguments);
        self.writer.write_token(">");
    }

    fn write_parameters(&mut self, node: NodeId) {
        let parameters: Vec<NodeId> = self.tree.children_with_role(node, Role::Parameter).collect();
        self.writer.write_token("(");
        self.write_comma_separated(&parameters);
        self.writer.write_token(")");
    }

    fn write_arguments(&mut self, node: NodeId) {
        let arguments: Vec<NodeId> = self.tree.children_with_role(node, Role::Argument).collect();
        self.writer.write_token("(");
        self.write_comma_separated(&arguments);
        self.writer.write_token(")");
    }

    fn write_variables(&mut self, node: NodeId) {
        let variables: Vec<NodeId> = self.tree.children_with_role(node, Role::Variable).collect();
        self.write_comma_separated(&variables);
    }

    fn write_initializer(&mut self, node: NodeId) {
        if let Some(initializer) = self.tree.child_with_role(node, Role::Initializer) {
            self.write_operator("=");
            self.visit(initializer);
        }
    }

    fn write_operator(&mut self, operator: &str) {
        if self.options.space_around_operators {
            self.writer.space();
        }
        self.writer.write_token(operator);
        if self.options.space_around_operators {
            self.writer.space();
        }
    }

    fn write_private_implementation_type(&mut self, node: NodeId) {
        if let Some(interface) = self.tree.child_with_role(node, Role::PrivateImplementationType) {
            self.visit(interface);
            self.writer.write_token(".");
        }
    }

    /// Writes the body block of a member, or `;` when it has none.
    fn write_body(&mut self, node: NodeId, style: BraceStyle) {
        match self.tree.child_with_role(node, Role::Body) {
            Some(body) => self.write_block(body, Some(style)),
            None => self.writer.write_token(";"),
        }
    }

    fn write_accessors(&mut self, node: NodeId) {
        let tree = self.tree;
        let accessors: Vec<NodeId> = tree
            .children(node)
            .iter()
            .copied()
            .filter(|child| matches!(tree.role(*child), Role::Getter | Role::Setter))
            .collect();

        let one_line = self.options.simple_accessors_on_one_line
            && accessors.iter().all(|accessor| {
                tree.child_with_role(*accessor, Role::Body).is_none()
                    && tree.child_with_role(*accessor, Role::Attribute).is_none()
            });

        if one_line {
            self.writer.space();
            self.writer.write_token("{");
            for accessor in accessors {
                self.writer.space();
                self.visit(accessor);
            }
            self.writer.space();
            self.writer.write_token("}");
        } else {
            self.open_brace(Some(self.options.property_brace_style));
            for accessor in accessors {
                self.visit(accessor);
                self.writer.new_line();
            }
            self.close_brace();
        }
    }

    /// Visits a block node with an explicit brace placement.
    fn write_block(&mut self, block: NodeId, style: Option<BraceStyle>) {
        let tree = self.tree;
        self.writer.start_node(tree, block);
        self.write_block_content(block, style);
        self.writer.end_node(tree, block);
    }

    fn write_block_content(&mut self, block: NodeId, style: Option<BraceStyle>) {
        self.open_brace(style);
        let tree = self.tree;
        for &child in tree.children(block) {
            if matches!(tree.role(child), Role::Statement | Role::Comment) {
                self.visit(child);
            }
        }
        self.close_brace();
    }

    fn open_brace(&mut self, style: Option<BraceStyle>) {
        match style {
            Some(BraceStyle::EndOfLine) => self.writer.space(),
            Some(BraceStyle::NextLine) => self.writer.new_line(),
            None => {}
        }
        self.writer.write_token("{");
        self.writer.indent();
        self.writer.new_line();
    }

    fn close_brace(&mut self) {
        self.writer.unindent();
        self.writer.write_token("}");
    }

    fn write_if_else(&mut self, node: NodeId) {
        let tree = self.tree;
        self.writer.write_keyword("if");
        if self.options.space_before_if_parentheses {
            self.writer.space();
        }
        self.writer.write_token("(");
        self.write_child(node, Role::Condition);
        self.writer.write_token(")");

        let true_is_block = match tree.child_with_role(node, Role::TrueStatement) {
            Some(statement) => self.write_embedded_statement(statement),
            None => {
                self.writer.write_token(";");
                self.writer.new_line();
                false
            }
        };

        let Some(false_statement) = tree.child_with_role(node, Role::FalseStatement) else {
            if true_is_block {
                self.writer.new_line();
            }
            return;
        };

        if true_is_block {
            self.writer.space();
        }
        self.writer.write_keyword("else");
        if matches!(tree.kind(false_statement), NodeKind::IfElseStatement) {
            self.writer.space();
            self.visit(false_statement);
        } else if self.write_embedded_statement(false_statement) {
            self.writer.new_line();
        }
    }

    /// Writes the branch of an `if`/`else`. Returns whether it was a block,
    /// in which case the caller owns the line break after the closing brace.
    fn write_embedded_statement(&mut self, statement: NodeId) -> bool {
        if matches!(self.tree.kind(statement), NodeKind::BlockStatement) {
            self.write_block(statement, Some(self.options.statement_brace_style));
            true
        } else {
            self.writer.new_line();
            self.writer.indent();
            self.visit(statement);
            self.writer.unindent();
            false
        }
    }
}
