use std::fmt;

use smol_str::SmolStr;

use crate::source::Range;
use crate::types::Type;

slotmap::new_key_type! {
    /// Stable identity of an AST node, usable as a map key
    pub struct NodeId;
}

/// An AST node: its kind, an optional source range, and its type slot.
///
/// For expression nodes `ty` starts out as the declared type (usually
/// `None`) and receives the inferred type when a solution is projected back
/// onto the AST. For declaration nodes `ty` is the declared interface type.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub range: Option<Range>,
    pub ty: Option<Type>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Integer literal expression, e.g. `42`
    IntegerLiteral(i64),
    /// String literal expression, e.g. `"hello"`
    StringLiteral(SmolStr),
    /// Reference to a declaration. Name resolution happens outside this
    /// workspace, so the resolved target arrives pre-filled (or stays empty
    /// for an unresolved reference).
    DeclRef {
        name: SmolStr,
        target: Option<NodeId>,
    },
    /// Single-argument function application, e.g. `f(x)`
    Call { callee: NodeId, argument: NodeId },
    /// Single-parameter closure, e.g. `{ x in body }`
    Closure { parameter: NodeId, body: NodeId },
    /// Variable declaration with an optional initializer
    VariableDecl {
        name: SmolStr,
        initializer: Option<NodeId>,
    },
    /// Function declaration; its signature is the node's interface type
    FunctionDecl { name: SmolStr },
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            range: None,
            ty: None,
        }
    }

    pub fn is_expression(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::IntegerLiteral(_)
                | NodeKind::StringLiteral(_)
                | NodeKind::DeclRef { .. }
                | NodeKind::Call { .. }
                | NodeKind::Closure { .. }
        )
    }

    pub fn is_declaration(&self) -> bool {
        matches!(self.kind, NodeKind::VariableDecl { .. } | NodeKind::FunctionDecl { .. })
    }

    /// The declared (or inferred) type of an expression node
    pub fn expression_type(&self) -> Option<&Type> {
        if self.is_expression() { self.ty.as_ref() } else { None }
    }

    /// The interface type of a declaration node
    pub fn interface_type(&self) -> Option<&Type> {
        if self.is_declaration() { self.ty.as_ref() } else { None }
    }

    /// The declared name, for nodes that carry one
    pub fn name(&self) -> Option<&SmolStr> {
        match &self.kind {
            NodeKind::DeclRef { name, .. }
            | NodeKind::VariableDecl { name, .. }
            | NodeKind::FunctionDecl { name } => Some(name),
            _ => None,
        }
    }

    /// Child nodes in source order
    pub fn children(&self) -> Vec<NodeId> {
        match &self.kind {
            NodeKind::Call { callee, argument } => vec![*callee, *argument],
            NodeKind::Closure { parameter, body } => vec![*parameter, *body],
            NodeKind::VariableDecl {
                initializer: Some(initializer),
                ..
            } => vec![*initializer],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::IntegerLiteral(value) => write!(f, "{}", value),
            NodeKind::StringLiteral(value) => write!(f, "{:?}", value.as_str()),
            NodeKind::DeclRef { name, .. } => write!(f, "{}", name),
            NodeKind::Call { .. } => write!(f, "<call>"),
            NodeKind::Closure { .. } => write!(f, "<closure>"),
            NodeKind::VariableDecl { name, .. } => write!(f, "let {}", name),
            NodeKind::FunctionDecl { name } => write!(f, "func {}", name),
        }
    }
}
