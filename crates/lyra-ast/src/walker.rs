//! Depth-first traversal over AST subtrees.

use crate::ast::Ast;
use crate::node::NodeId;

/// Walks the subtree rooted at `root`, calling `pre` on the way down and
/// `post` on the way up. Children are visited in source order.
pub fn walk<Pre, Post>(ast: &Ast, root: NodeId, pre: &mut Pre, post: &mut Post)
where
    Pre: FnMut(NodeId),
    Post: FnMut(NodeId),
{
    pre(root);
    if let Some(node) = ast.node(root) {
        for child in node.children() {
            walk(ast, child, pre, post);
        }
    }
    post(root);
}

/// Visits every node of the subtree before its parent.
pub fn walk_post_order<F: FnMut(NodeId)>(ast: &Ast, root: NodeId, f: &mut F) {
    walk(ast, root, &mut |_| {}, f);
}

/// Visits every node of the subtree before its children.
pub fn walk_pre_order<F: FnMut(NodeId)>(ast: &Ast, root: NodeId, f: &mut F) {
    walk(ast, root, f, &mut |_| {});
}
