use crate::syntax::types::*;

/// Index of a node inside its `SyntaxTree` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    role: Role,
    annotations: Vec<Annotation>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed syntax tree of one decompiled type.
///
/// Nodes are never freed: detaching a node unlinks it (and with it the
/// whole subtree) from its parent, leaving the arena slot orphaned.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<NodeData>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::SyntaxTree,
                role: Role::Root,
                annotations: Vec::new(),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn role(&self, id: NodeId) -> Role {
        self.nodes[id.0].role
    }

    pub fn annotations(&self, id: NodeId) -> &[Annotation] {
        &self.nodes[id.0].annotations
    }

    pub fn annotate(&mut self, id: NodeId, annotation: Annotation) {
        self.nodes[id.0].annotations.push(annotation);
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn children_with_role(&self, id: NodeId, role: Role) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |child| self.role(*child) == role)
    }

    pub fn child_with_role(&self, id: NodeId, role: Role) -> Option<NodeId> {
        self.children_with_role(id, role).next()
    }

    /// Append a new node as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, role: Role, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            role,
            annotations: Vec::new(),
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Append an `Identifier` leaf.
    pub fn append_identifier(&mut self, parent: NodeId, role: Role, name: &str) -> NodeId {
        self.append(
            parent,
            role,
            NodeKind::Identifier {
                name: name.to_string(),
            },
        )
    }

    /// Detach `id` and its subtree from the parent. Detaching the root or an
    /// already detached node does nothing.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes[id.0].parent.take() else {
            return;
        };
        self.nodes[parent.0].children.retain(|child| *child != id);
    }

    /// Whether `id` is still reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root() {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// The first node, starting at `id` itself and walking towards the root,
    /// that carries at least one annotation.
    pub fn nearest_annotated_ancestor(&self, id: NodeId) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            if !self.annotations(node).is_empty() {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// Text of an `Identifier` node.
    pub fn identifier_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Identifier { name } => Some(name),
            _ => None,
        }
    }

    /// Name of a declaration or simple type, read from its `Name` identifier.
    pub fn name_of(&self, id: NodeId) -> Option<&str> {
        self.child_with_role(id, Role::Name)
            .and_then(|name| self.identifier_name(name))
    }

    /// Attached nodes below (and including) `id` in pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            result.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        result
    }
}

impl Default for SyntaxTree {
    fn default() -> Self {
        Self::new()
    }
}
