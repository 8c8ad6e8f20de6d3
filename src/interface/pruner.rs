use tracing::debug;

use crate::interface::rules::*;
use crate::syntax::*;

/// What one interface-view pass removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneSummary {
    pub declarations: usize,
    pub accessors: usize,
    pub attributes: usize,
    pub attribute_sections: usize,
    pub bodies: usize,
}

impl PruneSummary {
    pub fn is_empty(&self) -> bool {
        *self == PruneSummary::default()
    }
}

/// Reduces a full syntax tree to the declarations visible from outside the type.
pub struct InterfacePruner<'a> {
    policy: &'a PrunePolicy,
}

impl<'a> InterfacePruner<'a> {
    pub fn new(policy: &'a PrunePolicy) -> Self {
        Self { policy }
    }

    /// Prune `tree` in place.
    pub fn prune(&self, tree: &mut SyntaxTree) -> PruneSummary {
        let mut summary = PruneSummary::default();
        let root = tree.root();
        self.visit(tree, root, &mut summary);
        debug!(
            target_name = %self.policy.target_name,
            declarations = summary.declarations,
            accessors = summary.accessors,
            attributes = summary.attributes,
            bodies = summary.bodies,
            "pruned to interface view"
        );
        summary
    }

    // Pre-order: a removed node's children are never visited
    fn visit(&self, tree: &mut SyntaxTree, node: NodeId, summary: &mut PruneSummary) {
        if let Some(rule) = removal_rule(tree.kind(node)) {
            let modifiers = tree.kind(node).modifiers().unwrap_or_default();
            let explicit_implementation = tree
                .child_with_role(node, Role::PrivateImplementationType)
                .is_some();
            let is_target = tree.name_of(node) == Some(self.policy.target_name.as_str());

            if rule.removes(modifiers, explicit_implementation, is_target) {
                tree.detach(node);
                summary.declarations += 1;
                return;
            }

            self.filter_attributes(tree, node, summary);
            match tree.kind(node) {
                NodeKind::PropertyDeclaration { .. } => self.filter_accessors(tree, node, summary),
                NodeKind::CustomEventDeclaration { .. } => {
                    for role in [Role::AddAccessor, Role::RemoveAccessor] {
                        if let Some(accessor) = tree.child_with_role(node, role) {
                            self.filter_attributes(tree, accessor, summary);
                        }
                    }
                }
                _ => {}
            }
        }

        if has_body(tree.kind(node)) {
            if let Some(body) = tree.child_with_role(node, Role::Body) {
                tree.detach(body);
                summary.bodies += 1;
            }
        }

        let children = tree.children(node).to_vec();
        for child in children {
            self.visit(tree, child, summary);
        }
    }

    fn filter_accessors(&self, tree: &mut SyntaxTree, property: NodeId, summary: &mut PruneSummary) {
        for role in [Role::Getter, Role::Setter] {
            let Some(accessor) = tree.child_with_role(property, role) else {
                continue;
            };
            let modifiers = tree.kind(accessor).modifiers().unwrap_or_default();
            if ACCESSOR_RULE.removes(modifiers, false, false) {
                tree.detach(accessor);
                summary.accessors += 1;
            } else {
                self.filter_attributes(tree, accessor, summary);
            }
        }
    }

    /// Drop noise attributes, then any section left without attributes.
    fn filter_attributes(&self, tree: &mut SyntaxTree, node: NodeId, summary: &mut PruneSummary) {
        let sections: Vec<NodeId> = tree.children_with_role(node, Role::Attribute).collect();
        for section in sections {
            let attributes: Vec<NodeId> = tree.children_with_role(section, Role::Attribute).collect();
            for attribute in attributes {
                let is_noise = attribute_name(tree, attribute)
                    .map(|name| self.policy.is_noise(name))
                    .unwrap_or(false);
                if is_noise {
                    tree.detach(attribute);
                    summary.attributes += 1;
                }
            }

            if tree.children_with_role(section, Role::Attribute).next().is_none() {
                tree.detach(section);
                summary.attribute_sections += 1;
            }
        }
    }
}

/// Members whose body is replaced by `;` in the interface view.
fn has_body(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::MethodDeclaration { .. } | NodeKind::ConstructorDeclaration { .. } | NodeKind::Accessor { .. }
    )
}

/// Simple type name of an attribute application: the identifier of a simple
/// type, or the last segment of a qualified one.
fn attribute_name(tree: &SyntaxTree, attribute: NodeId) -> Option<&str> {
    let ty = tree.child_with_role(attribute, Role::Type)?;
    match tree.kind(ty) {
        NodeKind::SimpleType | NodeKind::MemberType => tree.name_of(ty),
        _ => None,
    }
}
