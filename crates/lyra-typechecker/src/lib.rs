//! Type inference engine for the Lyra expression language.
//!
//! This crate implements a constraint solver over the `lyra-ast` node arena.
//! Expressions receive type variables, shape constraints are submitted as
//! they are discovered, and each submission is solved eagerly: variables are
//! merged into equivalence classes (the first-allocated variable represents
//! its class) or fixed to concrete types, with an occurs-check guarding
//! against infinite types. After solving, the AST-type map is normalized and
//! projected back onto the AST so every expression carries its inferred type.
//!
//! ## Example
//!
//! ```rust
//! use lyra_ast::{Ast, Type};
//! use lyra_typechecker::TypeChecker;
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
//! let mut checker = TypeChecker::new();
//! let errors = checker.check(&mut ast);
//! assert!(errors.is_empty());
//! assert_eq!(checker.type_of(call), Some(Type::primitive("Int")));
//! ```

pub mod bindings;
pub mod constraint;
pub mod generate;
pub mod solution;
pub mod system;
pub mod unify;

use lyra_ast::{Ast, NodeId, Type};
use miette::Diagnostic;
use thiserror::Error;

use solution::Solution;
use system::ConstraintSystem;

/// Result type for type checking operations
pub type Result<T> = std::result::Result<T, TypeError>;

/// Type checking errors
#[derive(Debug, Error, Diagnostic)]
pub enum TypeError {
    #[error("Type mismatch: expected {expected}, found {found}")]
    #[diagnostic(code(typechecker::type_mismatch))]
    Mismatch {
        expected: String,
        found: String,
        #[label("type mismatch here")]
        span: Option<miette::SourceSpan>,
    },

    #[error("Occurs check failed: type variable {var} occurs in {ty}")]
    #[diagnostic(code(typechecker::occurs_check))]
    OccursCheck {
        var: String,
        ty: String,
        #[label("infinite type")]
        span: Option<miette::SourceSpan>,
    },
}

/// Type checker for Lyra programs
///
/// Drives the constraint system over a whole AST and keeps the resulting
/// solution for later queries.
#[derive(Default)]
pub struct TypeChecker {
    solution: Option<Solution>,
}

impl TypeChecker {
    /// Creates a new type checker
    pub fn new() -> Self {
        Self { solution: None }
    }

    /// Runs type inference over the AST.
    ///
    /// Constraints are generated and solved eagerly, the solved types are
    /// written back onto the AST nodes, and a solution snapshot is kept for
    /// [`Self::type_of`] queries. Returns a list of type errors found; an
    /// empty list means success.
    pub fn check(&mut self, ast: &mut Ast) -> Vec<TypeError> {
        let mut system = ConstraintSystem::new();

        let errors = generate::generate_constraints(ast, &mut system);

        system.normalize();

        // Project the solution back onto the AST.
        for (node, ty) in system.ast_types() {
            ast.set_type(node, ty.clone());
        }

        self.solution = Some(system.current_solution());
        errors
    }

    /// The fully concrete inferred type of a node, if the last check fixed one
    pub fn type_of(&self, node: NodeId) -> Option<Type> {
        self.solution.as_ref()?.fixed_type(node)
    }

    /// The solution snapshot of the last check
    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }
}
