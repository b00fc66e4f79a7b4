//! AST and type model for the Lyra expression language.
//!
//! Lyra is a small, Swift-like expression language. This crate provides the
//! pieces the type-inference engine consumes but does not own: the node
//! arena with stable identities, the type constructors, and a pre/post
//! walker. Parsing and name resolution happen upstream; nodes arrive here
//! already shaped, with declaration references pre-resolved.
//!
//! ## Example
//!
//! ```rust
//! use lyra_ast::{Ast, Type, walk_post_order};
//!
//! let mut ast = Ast::new();
//! let double = ast.function_decl(
//!     "double",
//!     Type::function(Type::primitive("Int"), Type::primitive("Int")),
//! );
//! let callee = ast.decl_ref("double", Some(double));
//! let argument = ast.integer_literal(21);
//! let call = ast.call(callee, argument);
//! ast.add_root(call);
//!
//! let mut visited = Vec::new();
//! walk_post_order(&ast, call, &mut |id| visited.push(id));
//! assert_eq!(visited, vec![callee, argument, call]);
//! ```

mod ast;
mod node;
mod source;
mod types;
mod walker;

pub use ast::Ast;
pub use node::Node;
pub use node::NodeId;
pub use node::NodeKind;
pub use source::Range;
pub use types::Type;
pub use types::TypeVar;
pub use walker::walk;
pub use walker::walk_post_order;
pub use walker::walk_pre_order;
