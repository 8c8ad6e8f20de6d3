use std::collections::HashSet;

use crate::syntax::{Modifiers, NodeKind};

/// Attributes that describe tooling metadata rather than the public contract.
pub const DEFAULT_NOISE_ATTRIBUTES: [&str; 4] = [
    "CLSCompliant",
    "CompilerGenerated",
    "EditorBrowsable",
    "DebuggerDisplay",
];

/// When a declaration of one kind is dropped from the interface view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovalRule {
    /// Any of these modifiers removes the declaration.
    pub removing_modifiers: Modifiers,
    /// An explicit interface implementation removes the declaration.
    pub removes_explicit_implementation: bool,
    /// A declaration named like the interface-view target is always kept.
    pub exempts_target_name: bool,
}

impl RemovalRule {
    const fn modifiers(removing_modifiers: Modifiers) -> Self {
        Self {
            removing_modifiers,
            removes_explicit_implementation: false,
            exempts_target_name: false,
        }
    }

    const fn or_explicit_implementation(mut self) -> Self {
        self.removes_explicit_implementation = true;
        self
    }

    const fn unless_target(mut self) -> Self {
        self.exempts_target_name = true;
        self
    }

    pub fn removes(&self, modifiers: Modifiers, explicit_implementation: bool, is_target: bool) -> bool {
        if self.exempts_target_name && is_target {
            return false;
        }
        modifiers.intersects(self.removing_modifiers)
            || (self.removes_explicit_implementation && explicit_implementation)
    }
}

const HIDDEN: Modifiers = Modifiers::PRIVATE.union(Modifiers::INTERNAL);

/// Property accessors are filtered by their property, never on their own.
pub const ACCESSOR_RULE: RemovalRule = RemovalRule::modifiers(HIDDEN);

/// The removal table. Kinds without an entry are never removed themselves,
/// only searched for nested declarations.
pub fn removal_rule(kind: &NodeKind) -> Option<RemovalRule> {
    let rule = match kind {
        NodeKind::MethodDeclaration { .. } => {
            RemovalRule::modifiers(HIDDEN.union(Modifiers::OVERRIDE)).or_explicit_implementation()
        }
        NodeKind::ConstructorDeclaration { .. } => RemovalRule::modifiers(HIDDEN.union(Modifiers::STATIC)),
        NodeKind::FieldDeclaration { .. } => RemovalRule::modifiers(HIDDEN),
        NodeKind::PropertyDeclaration { .. } => RemovalRule::modifiers(HIDDEN).or_explicit_implementation(),
        NodeKind::EventDeclaration { .. } | NodeKind::CustomEventDeclaration { .. } => {
            RemovalRule::modifiers(HIDDEN)
        }
        NodeKind::TypeDeclaration { .. } => RemovalRule::modifiers(Modifiers::PRIVATE).unless_target(),
        _ => return None,
    };
    Some(rule)
}

/// Fixed configuration of one interface-view transform
#[derive(Debug, Clone)]
pub struct PrunePolicy {
    /// Simple name of the type being rendered.
    pub target_name: String,
    pub noise_attributes: HashSet<String>,
}

impl PrunePolicy {
    pub fn new(target_name: &str) -> Self {
        Self {
            target_name: target_name.to_string(),
            noise_attributes: DEFAULT_NOISE_ATTRIBUTES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_noise_attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.noise_attributes = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_noise(&self, attribute_name: &str) -> bool {
        self.noise_attributes.contains(attribute_name)
    }
}
