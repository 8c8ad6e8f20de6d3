use crate::links::TypeUrlResolver;
use crate::syntax::*;

/// Escape the characters that would otherwise be read as markup.
pub fn encode_html(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => encoded.push_str("&amp;"),
            '<' => encoded.push_str("&lt;"),
            '>' => encoded.push_str("&gt;"),
            _ => encoded.push(c),
        }
    }
    encoded
}

/// `encode_html` for double-quoted attribute values.
pub fn encode_attribute(value: &str) -> String {
    encode_html(value).replace('"', "&quot;")
}

/// Semantic category of a rendered token, mapped one-to-one onto a CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticClass {
    Unknown,
    TypeDeclaration,
    TypeReference,
    NamespaceReference,
    MethodDeclaration,
    MethodReference,
    FieldDeclaration,
    FieldReference,
    ConstructorDeclaration,
    ConstructorReference,
    PropertyDeclaration,
    PropertyReference,
    ArgumentReference,
    Keyword,
    NullLiteral,
    StringLiteral,
    NumberLiteral,
}

impl SemanticClass {
    pub fn css_class(&self) -> &'static str {
        match self {
            SemanticClass::Unknown => "c-uk",
            SemanticClass::TypeDeclaration => "c-td",
            SemanticClass::TypeReference => "c-tr",
            SemanticClass::NamespaceReference => "c-nr",
            SemanticClass::MethodDeclaration => "c-md",
            SemanticClass::MethodReference => "c-mr",
            SemanticClass::FieldDeclaration => "c-fd",
            SemanticClass::FieldReference => "c-fr",
            SemanticClass::ConstructorDeclaration => "c-cd",
            SemanticClass::ConstructorReference => "c-cr",
            SemanticClass::PropertyDeclaration => "c-pd",
            SemanticClass::PropertyReference => "c-pr",
            SemanticClass::ArgumentReference => "c-ar",
            SemanticClass::Keyword => "c-kw",
            SemanticClass::NullLiteral => "c-nl",
            SemanticClass::StringLiteral => "c-st",
            SemanticClass::NumberLiteral => "c-nu",
        }
    }
}

/// Helper for turning literal values into display text
pub struct LiteralRenderer;

impl LiteralRenderer {
    /// Class and unescaped display text of a primitive value.
    pub fn render_value(&self, value: &PrimitiveValue) -> (SemanticClass, String) {
        match value {
            PrimitiveValue::Null => (SemanticClass::NullLiteral, "null".to_string()),
            PrimitiveValue::Bool(b) => (SemanticClass::NullLiteral, b.to_string()),
            PrimitiveValue::String(s) => (
                SemanticClass::StringLiteral,
                format!("\"{}\"", self.escape_string(s)),
            ),
            PrimitiveValue::Char(c) => (SemanticClass::NumberLiteral, c.to_string()),
            PrimitiveValue::Int(i) => (SemanticClass::NumberLiteral, i.to_string()),
            PrimitiveValue::Uint(u) => (SemanticClass::NumberLiteral, u.to_string()),
            PrimitiveValue::Float(f) => (SemanticClass::NumberLiteral, self.format_float(*f)),
        }
    }

    /// Shortest round-trip digits. Magnitudes outside `1E-05..1E+15` use
    /// exponent form with a signed, two-digit minimum exponent.
    pub fn format_float(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
        }
        if value == 0.0 {
            return value.to_string();
        }

        let scientific = format!("{:e}", value);
        let Some((mantissa, exponent)) = scientific.split_once('e') else {
            return value.to_string();
        };
        match exponent.parse::<i32>() {
            Ok(exponent) if !(-4..15).contains(&exponent) => {
                let sign = if exponent < 0 { '-' } else { '+' };
                format!("{}E{}{:02}", mantissa, sign, exponent.abs())
            }
            _ => value.to_string(),
        }
    }

    /// Backslash-escape a string literal body.
    pub fn escape_string(&self, s: &str) -> String {
        let mut escaped = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '\\' => escaped.push_str("\\\\"),
                '"' => escaped.push_str("\\\""),
                '\t' => escaped.push_str("\\t"),
                '\r' => escaped.push_str("\\r"),
                '\n' => escaped.push_str("\\n"),
                _ => escaped.push(c),
            }
        }
        escaped
    }
}

/// Recovers the semantic class (and link target) of identifiers from the
/// annotations the decompiler left on the tree.
pub struct SemanticClassifier<'a> {
    links: &'a dyn TypeUrlResolver,
}

impl<'a> SemanticClassifier<'a> {
    pub fn new(links: &'a dyn TypeUrlResolver) -> Self {
        Self { links }
    }

    pub fn classify(&self, tree: &SyntaxTree, node: Option<NodeId>) -> (SemanticClass, Option<String>) {
        let Some(node) = node else {
            return (SemanticClass::Unknown, None);
        };
        let Some(annotated) = tree.nearest_annotated_ancestor(node) else {
            return (SemanticClass::Unknown, None);
        };

        let annotations = tree.annotations(annotated);
        let kind = tree.kind(annotated);

        // Annotation kinds are checked in priority order, not in attachment order
        if let Some(full_name) = annotations.iter().find_map(|a| match a {
            Annotation::Type { full_name } => Some(full_name),
            _ => None,
        }) {
            if kind.is_type_declaration() {
                return (SemanticClass::TypeDeclaration, None);
            }
            return (SemanticClass::TypeReference, self.links.find_type_url(full_name));
        }

        if annotations
            .iter()
            .any(|a| matches!(a, Annotation::UsingScope { .. }))
        {
            return (SemanticClass::NamespaceReference, None);
        }

        if let Some(symbol_kind) = annotations.iter().find_map(|a| match a {
            Annotation::Member { symbol_kind, .. } => Some(*symbol_kind),
            _ => None,
        }) {
            let class = match symbol_kind {
                SymbolKind::Method if kind.is_method_declaration() => SemanticClass::MethodDeclaration,
                SymbolKind::Method => SemanticClass::MethodReference,
                SymbolKind::Field if kind.is_field_declaration() => SemanticClass::FieldDeclaration,
                SymbolKind::Field => SemanticClass::FieldReference,
                SymbolKind::Constructor if kind.is_constructor_declaration() => {
                    SemanticClass::ConstructorDeclaration
                }
                SymbolKind::Constructor => SemanticClass::ConstructorReference,
                // Properties and events share the property styling
                SymbolKind::Property | SymbolKind::Event if kind.is_property_declaration() => {
                    SemanticClass::PropertyDeclaration
                }
                SymbolKind::Property | SymbolKind::Event => SemanticClass::PropertyReference,
            };
            return (class, None);
        }

        if annotations
            .iter()
            .any(|a| matches!(a, Annotation::MethodGroup { .. }))
        {
            return (SemanticClass::MethodReference, None);
        }

        if let Some(variable_kind) = annotations.iter().find_map(|a| match a {
            Annotation::Variable { kind, .. } => Some(*kind),
            _ => None,
        }) {
            if variable_kind == VariableKind::Parameter {
                return (SemanticClass::ArgumentReference, None);
            }
            return (SemanticClass::Unknown, None);
        }

        if annotations
            .iter()
            .any(|a| matches!(a, Annotation::Constant { .. }))
        {
            return (SemanticClass::FieldReference, None);
        }

        (SemanticClass::Unknown, None)
    }
}
