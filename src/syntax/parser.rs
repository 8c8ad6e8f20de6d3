use serde::Deserialize;
use thiserror::Error;

use crate::syntax::tree::{NodeId, SyntaxTree};
use crate::syntax::types::*;

/// Errors raised while turning a node document into a `SyntaxTree`.
#[derive(Debug, Error)]
pub enum TreeParseError {
    #[error("invalid node document")]
    Json(#[from] serde_json::Error),
    #[error("`syntax_tree` node found below the root")]
    NestedRoot,
}

/// Serialized form of one syntax node as written by the decompiler dump.
#[derive(Debug, Deserialize)]
pub struct NodeDocument {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub children: Vec<NodeDocument>,
}

// Builder for converting node documents into an arena tree
pub struct TreeParser {
    tree: SyntaxTree,
}

impl TreeParser {
    pub fn new() -> Self {
        Self {
            tree: SyntaxTree::new(),
        }
    }

    /// Consume the document and produce the tree. A document whose top node
    /// is not `syntax_tree` is placed as the single member of a fresh root.
    pub fn parse_document(mut self, document: NodeDocument) -> Result<SyntaxTree, TreeParseError> {
        let root = self.tree.root();
        if document.kind == NodeKind::SyntaxTree {
            for annotation in document.annotations {
                self.tree.annotate(root, annotation);
            }
            for child in document.children {
                self.add_node(root, child)?;
            }
        } else {
            self.add_node(root, document)?;
        }
        Ok(self.tree)
    }

    fn add_node(&mut self, parent: NodeId, document: NodeDocument) -> Result<(), TreeParseError> {
        if document.kind == NodeKind::SyntaxTree {
            return Err(TreeParseError::NestedRoot);
        }

        let id = self.tree.append(parent, document.role, document.kind);
        for annotation in document.annotations {
            self.tree.annotate(id, annotation);
        }
        for child in document.children {
            self.add_node(id, child)?;
        }
        Ok(())
    }
}

impl Default for TreeParser {
    fn default() -> Self {
        Self::new()
    }
}

pub fn parse_tree_str(json: &str) -> Result<SyntaxTree, TreeParseError> {
    let document: NodeDocument = serde_json::from_str(json)?;
    TreeParser::new().parse_document(document)
}

pub fn parse_tree_reader<R: std::io::Read>(reader: R) -> Result<SyntaxTree, TreeParseError> {
    let document: NodeDocument = serde_json::from_reader(reader)?;
    TreeParser::new().parse_document(document)
}

pub fn parse_tree_value(value: serde_json::Value) -> Result<SyntaxTree, TreeParseError> {
    let document: NodeDocument = serde_json::from_value(value)?;
    TreeParser::new().parse_document(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_nested_declarations() {
        let tree = parse_tree_value(json!({
            "kind": "syntax_tree",
            "children": [{
                "kind": "type_declaration",
                "modifiers": ["public", "sealed"],
                "annotations": [{ "type": { "full_name": "Foo.Bar" } }],
                "children": [
                    { "kind": "identifier", "role": "name", "name": "Bar" },
                    {
                        "kind": "field_declaration",
                        "modifiers": ["private"],
                        "children": [
                            { "kind": "primitive_type", "role": "type", "keyword": "int" },
                            {
                                "kind": "variable_initializer",
                                "role": "variable",
                                "children": [
                                    { "kind": "identifier", "role": "name", "name": "count" },
                                    {
                                        "kind": "primitive_expression",
                                        "role": "initializer",
                                        "value": { "int": 3 }
                                    }
                                ]
                            }
                        ]
                    }
                ]
            }]
        }))
        .unwrap();

        let root = tree.root();
        let ty = tree.children(root)[0];
        assert_eq!(
            tree.kind(ty),
            &NodeKind::TypeDeclaration {
                class_kind: ClassKind::Class,
                modifiers: Modifiers::PUBLIC | Modifiers::SEALED,
            }
        );
        assert_eq!(
            tree.annotations(ty),
            &[Annotation::Type {
                full_name: "Foo.Bar".to_string()
            }]
        );
        assert_eq!(tree.name_of(ty), Some("Bar"));

        let field = tree.child_with_role(ty, Role::Member).unwrap();
        let variable = tree.child_with_role(field, Role::Variable).unwrap();
        let init = tree.child_with_role(variable, Role::Initializer).unwrap();
        assert_eq!(
            tree.kind(init),
            &NodeKind::PrimitiveExpression {
                value: PrimitiveValue::Int(3)
            }
        );
    }

    #[test]
    fn test_parse_wraps_bare_declaration_in_root() {
        let tree = parse_tree_str(
            r#"{ "kind": "type_declaration", "class_kind": "struct", "children": [
                { "kind": "identifier", "role": "name", "name": "Point" }
            ] }"#,
        )
        .unwrap();

        let ty = tree.children(tree.root())[0];
        assert_eq!(tree.role(ty), Role::Member);
        assert_eq!(tree.name_of(ty), Some("Point"));
    }

    #[test]
    fn test_parse_rejects_nested_root() {
        let err = parse_tree_value(json!({
            "kind": "syntax_tree",
            "children": [{ "kind": "syntax_tree" }]
        }))
        .unwrap_err();
        assert!(matches!(err, TreeParseError::NestedRoot));
    }

    #[test]
    fn test_parse_rejects_unknown_modifier() {
        let err = parse_tree_value(json!({
            "kind": "method_declaration",
            "modifiers": ["friend"]
        }))
        .unwrap_err();
        assert!(matches!(err, TreeParseError::Json(_)));
    }
}
