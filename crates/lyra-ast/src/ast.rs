use slotmap::SlotMap;
use smol_str::SmolStr;

use crate::node::{Node, NodeId, NodeKind};
use crate::source::Range;
use crate::types::Type;

/// Arena of AST nodes for one Lyra program.
///
/// Nodes are created through the builder methods and never removed, so a
/// `NodeId` stays valid (and identifies the same node) for the lifetime of
/// the `Ast`.
#[derive(Debug, Default)]
pub struct Ast {
    nodes: SlotMap<NodeId, Node>,
    roots: Vec<NodeId>,
}

impl Ast {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
        }
    }

    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter()
    }

    /// Marks a node as a top-level item; they are processed in insertion order
    pub fn add_root(&mut self, node_id: NodeId) {
        self.roots.push(node_id);
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Attaches a source range to a node
    pub fn set_range(&mut self, node_id: NodeId, range: Range) {
        if let Some(node) = self.nodes.get_mut(node_id) {
            node.range = Some(range);
        }
    }

    /// Sets a node's type slot: declared types before inference, inferred
    /// types when a solution is projected back
    pub fn set_type(&mut self, node_id: NodeId, ty: Type) {
        if let Some(node) = self.nodes.get_mut(node_id) {
            node.ty = Some(ty);
        }
    }

    fn add_node(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.insert(Node::new(kind))
    }

    pub fn integer_literal(&mut self, value: i64) -> NodeId {
        self.add_node(NodeKind::IntegerLiteral(value))
    }

    pub fn string_literal(&mut self, value: impl Into<SmolStr>) -> NodeId {
        self.add_node(NodeKind::StringLiteral(value.into()))
    }

    pub fn decl_ref(&mut self, name: impl Into<SmolStr>, target: Option<NodeId>) -> NodeId {
        self.add_node(NodeKind::DeclRef {
            name: name.into(),
            target,
        })
    }

    pub fn call(&mut self, callee: NodeId, argument: NodeId) -> NodeId {
        self.add_node(NodeKind::Call { callee, argument })
    }

    pub fn closure(&mut self, parameter: NodeId, body: NodeId) -> NodeId {
        self.add_node(NodeKind::Closure { parameter, body })
    }

    pub fn variable_decl(&mut self, name: impl Into<SmolStr>, initializer: Option<NodeId>) -> NodeId {
        self.add_node(NodeKind::VariableDecl {
            name: name.into(),
            initializer,
        })
    }

    /// Adds a function declaration; `interface_type` is its full signature
    pub fn function_decl(&mut self, name: impl Into<SmolStr>, interface_type: Type) -> NodeId {
        let node_id = self.add_node(NodeKind::FunctionDecl { name: name.into() });
        self.set_type(node_id, interface_type);
        node_id
    }
}
