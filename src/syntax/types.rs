use bitflags::bitflags;
use serde::de::{self, Deserializer};
use serde::Deserialize;

bitflags! {
    /// Declaration modifiers as written by the decompiler.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u32 {
        const NEW = 1 << 0;
        const PUBLIC = 1 << 1;
        const PROTECTED = 1 << 2;
        const PRIVATE = 1 << 3;
        const INTERNAL = 1 << 4;
        const ABSTRACT = 1 << 5;
        const VIRTUAL = 1 << 6;
        const SEALED = 1 << 7;
        const STATIC = 1 << 8;
        const OVERRIDE = 1 << 9;
        const READONLY = 1 << 10;
        const VOLATILE = 1 << 11;
        const EXTERN = 1 << 12;
        const PARTIAL = 1 << 13;
        const CONST = 1 << 14;
        const ASYNC = 1 << 15;
        const UNSAFE = 1 << 16;
    }
}

/// Output order of modifier keywords.
const MODIFIER_KEYWORDS: [(Modifiers, &str); 17] = [
    (Modifiers::NEW, "new"),
    (Modifiers::PUBLIC, "public"),
    (Modifiers::PROTECTED, "protected"),
    (Modifiers::PRIVATE, "private"),
    (Modifiers::INTERNAL, "internal"),
    (Modifiers::ABSTRACT, "abstract"),
    (Modifiers::VIRTUAL, "virtual"),
    (Modifiers::SEALED, "sealed"),
    (Modifiers::STATIC, "static"),
    (Modifiers::OVERRIDE, "override"),
    (Modifiers::READONLY, "readonly"),
    (Modifiers::VOLATILE, "volatile"),
    (Modifiers::EXTERN, "extern"),
    (Modifiers::PARTIAL, "partial"),
    (Modifiers::CONST, "const"),
    (Modifiers::ASYNC, "async"),
    (Modifiers::UNSAFE, "unsafe"),
];

impl Modifiers {
    pub fn from_keyword(keyword: &str) -> Option<Modifiers> {
        MODIFIER_KEYWORDS
            .iter()
            .find(|(_, kw)| *kw == keyword)
            .map(|(flag, _)| *flag)
    }

    /// Keywords for the set flags, in declaration order.
    pub fn keywords(&self) -> impl Iterator<Item = &'static str> + '_ {
        MODIFIER_KEYWORDS
            .iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, kw)| *kw)
    }
}

impl<'de> Deserialize<'de> for Modifiers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let keywords = Vec::<String>::deserialize(deserializer)?;
        let mut modifiers = Modifiers::empty();
        for keyword in &keywords {
            let flag = Modifiers::from_keyword(keyword)
                .ok_or_else(|| de::Error::custom(format!("unknown modifier `{}`", keyword)))?;
            modifiers |= flag;
        }
        Ok(modifiers)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    #[default]
    Class,
    Struct,
    Interface,
    Enum,
}

impl ClassKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Struct => "struct",
            ClassKind::Interface => "interface",
            ClassKind::Enum => "enum",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessorKind {
    Get,
    Set,
    Add,
    Remove,
}

impl AccessorKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            AccessorKind::Get => "get",
            AccessorKind::Set => "set",
            AccessorKind::Add => "add",
            AccessorKind::Remove => "remove",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterModifier {
    Ref,
    Out,
    In,
    Params,
    This,
}

impl ParameterModifier {
    pub fn keyword(&self) -> &'static str {
        match self {
            ParameterModifier::Ref => "ref",
            ParameterModifier::Out => "out",
            ParameterModifier::In => "in",
            ParameterModifier::Params => "params",
            ParameterModifier::This => "this",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentKind {
    #[default]
    SingleLine,
    MultiLine,
    Documentation,
}

/// Position of a child inside its parent node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Root,
    #[default]
    Member,
    Attribute,
    Type,
    Name,
    TypeParameter,
    TypeArgument,
    BaseType,
    PrivateImplementationType,
    Parameter,
    Body,
    Getter,
    Setter,
    AddAccessor,
    RemoveAccessor,
    Variable,
    Initializer,
    Statement,
    Expression,
    Target,
    Argument,
    Left,
    Right,
    Condition,
    TrueStatement,
    FalseStatement,
    Comment,
}

/// A literal value carried by a primitive expression or a constant annotation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveValue {
    Null,
    Bool(bool),
    String(String),
    Char(char),
    Int(i64),
    Uint(u64),
    Float(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Method,
    Field,
    Constructor,
    Property,
    Event,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    Local,
    Parameter,
    ExceptionLocal,
    ForeachLocal,
    UsingLocal,
}

/// Semantic information the decompiler attached to a node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Annotation {
    /// The node resolves to a type.
    Type { full_name: String },
    /// The node names a namespace (using directive or namespace declaration).
    UsingScope { namespace: String },
    /// The node resolves to a single member.
    Member {
        symbol_kind: SymbolKind,
        full_name: String,
    },
    /// The node names an overload set that is not bound to one signature yet.
    MethodGroup { name: String },
    /// The node refers to a local variable or parameter.
    Variable { name: String, kind: VariableKind },
    /// The node was folded to a constant.
    Constant { value: PrimitiveValue },
}

/// The kind of a syntax node together with the data that is not expressed
/// through child nodes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    SyntaxTree,
    UsingDeclaration,
    NamespaceDeclaration,
    TypeDeclaration {
        #[serde(default)]
        class_kind: ClassKind,
        #[serde(default)]
        modifiers: Modifiers,
    },
    EnumMemberDeclaration,
    MethodDeclaration {
        #[serde(default)]
        modifiers: Modifiers,
    },
    ConstructorDeclaration {
        #[serde(default)]
        modifiers: Modifiers,
    },
    FieldDeclaration {
        #[serde(default)]
        modifiers: Modifiers,
    },
    PropertyDeclaration {
        #[serde(default)]
        modifiers: Modifiers,
    },
    Accessor {
        accessor_kind: AccessorKind,
        #[serde(default)]
        modifiers: Modifiers,
    },
    EventDeclaration {
        #[serde(default)]
        modifiers: Modifiers,
    },
    CustomEventDeclaration {
        #[serde(default)]
        modifiers: Modifiers,
    },
    AttributeSection {
        #[serde(default)]
        target: Option<String>,
    },
    Attribute,
    ParameterDeclaration {
        #[serde(default)]
        modifier: Option<ParameterModifier>,
    },
    TypeParameterDeclaration,
    VariableInitializer,
    SimpleType,
    MemberType,
    PrimitiveType {
        keyword: String,
    },
    ComposedType {
        #[serde(default)]
        nullable: bool,
        #[serde(default)]
        array_rank: u32,
    },
    BlockStatement,
    ExpressionStatement,
    ReturnStatement,
    VariableDeclarationStatement,
    IfElseStatement,
    ThrowStatement,
    IdentifierExpression,
    MemberReferenceExpression,
    InvocationExpression,
    ObjectCreateExpression,
    AssignmentExpression {
        operator: String,
    },
    BinaryOperatorExpression {
        operator: String,
    },
    UnaryOperatorExpression {
        operator: String,
        #[serde(default)]
        postfix: bool,
    },
    PrimitiveExpression {
        value: PrimitiveValue,
    },
    ThisReferenceExpression,
    BaseReferenceExpression,
    TypeReferenceExpression,
    ParenthesizedExpression,
    CastExpression,
    TypeOfExpression,
    Identifier {
        name: String,
    },
    Comment {
        #[serde(default)]
        comment_kind: CommentKind,
        content: String,
    },
    PreProcessorDirective {
        directive: String,
        #[serde(default)]
        argument: Option<String>,
    },
}

impl NodeKind {
    /// Modifiers of a declaration, `None` for nodes that cannot carry any.
    pub fn modifiers(&self) -> Option<Modifiers> {
        match self {
            NodeKind::TypeDeclaration { modifiers, .. }
            | NodeKind::MethodDeclaration { modifiers }
            | NodeKind::ConstructorDeclaration { modifiers }
            | NodeKind::FieldDeclaration { modifiers }
            | NodeKind::PropertyDeclaration { modifiers }
            | NodeKind::Accessor { modifiers, .. }
            | NodeKind::EventDeclaration { modifiers }
            | NodeKind::CustomEventDeclaration { modifiers } => Some(*modifiers),
            _ => None,
        }
    }

    pub fn is_type_declaration(&self) -> bool {
        matches!(self, NodeKind::TypeDeclaration { .. })
    }

    pub fn is_method_declaration(&self) -> bool {
        matches!(self, NodeKind::MethodDeclaration { .. })
    }

    pub fn is_field_declaration(&self) -> bool {
        matches!(self, NodeKind::FieldDeclaration { .. })
    }

    pub fn is_constructor_declaration(&self) -> bool {
        matches!(self, NodeKind::ConstructorDeclaration { .. })
    }

    pub fn is_property_declaration(&self) -> bool {
        matches!(self, NodeKind::PropertyDeclaration { .. })
    }
}
