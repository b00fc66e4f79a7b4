//! Constraint generation from the AST.
//!
//! Declarations are registered first so references resolve regardless of
//! their position, then expressions are visited operands-before-consumers
//! and their shape constraints submitted eagerly.

use lyra_ast::{Ast, NodeId, NodeKind, Range, Type, TypeVar, walk_post_order};
use miette::SourceSpan;

use crate::TypeError;
use crate::constraint::Constraint;
use crate::system::ConstraintSystem;
use crate::unify::SolveResult;

fn int_type() -> Type {
    Type::primitive("Int")
}

fn string_type() -> Type {
    Type::primitive("String")
}

/// Converts a byte range to a `miette::SourceSpan`.
pub(crate) fn range_to_span(range: &Range) -> SourceSpan {
    SourceSpan::new((range.start as usize).into(), range.len().max(1) as usize)
}

/// Generates and eagerly solves constraints for the whole program.
///
/// Returns every failure as a diagnostic; the system additionally records
/// the first failed entry for introspection.
pub fn generate_constraints(ast: &Ast, system: &mut ConstraintSystem) -> Vec<TypeError> {
    let mut errors = Vec::new();

    // Pass 1: register every declaration so references resolve even when the
    // declaration appears after its use site.
    for (node_id, node) in ast.nodes() {
        if !node.is_declaration() {
            continue;
        }
        if let Some(interface_type) = node.interface_type() {
            system.set_ast_type(node_id, interface_type.clone());
        } else {
            system.create_type_variable_for_node(node_id);
        }
    }

    // Pass 2: expressions and initializers, operands before consumers.
    for root in ast.roots() {
        walk_post_order(ast, *root, &mut |node_id| {
            generate_node_constraints(ast, node_id, system, &mut errors);
        });
    }

    errors
}

fn generate_node_constraints(
    ast: &Ast,
    node_id: NodeId,
    system: &mut ConstraintSystem,
    errors: &mut Vec<TypeError>,
) {
    let Some(node) = ast.node(node_id) else {
        return;
    };
    match &node.kind {
        NodeKind::IntegerLiteral(_) => {
            if !system.has_ast_type(node_id) {
                system.set_ast_type(node_id, int_type());
            }
        }
        NodeKind::StringLiteral(_) => {
            if !system.has_ast_type(node_id) {
                system.set_ast_type(node_id, string_type());
            }
        }
        NodeKind::DeclRef { target, .. } => {
            if system.has_ast_type(node_id) {
                return;
            }
            let var = system.create_type_variable_for_node(node_id);
            // An unresolved reference keeps its free variable; resolution is
            // upstream's responsibility.
            if let Some(target_ty) = target.and_then(|target| system.ast_type(ast, target)) {
                submit(ast, system, errors, node_id, Constraint::bind(Type::Variable(var), target_ty));
            }
        }
        NodeKind::Call { callee, argument } => {
            if system.has_ast_type(node_id) {
                return;
            }
            let callee_ty = node_type(ast, system, *callee);
            let argument_ty = node_type(ast, system, *argument);
            let result_ty = Type::Variable(system.create_type_variable_for_node(node_id));
            submit(
                ast,
                system,
                errors,
                node_id,
                Constraint::bind(callee_ty, Type::function(argument_ty, result_ty)),
            );
        }
        NodeKind::Closure { parameter, body } => {
            if system.has_ast_type(node_id) {
                return;
            }
            let parameter_ty = node_type(ast, system, *parameter);
            let body_ty = node_type(ast, system, *body);
            system.set_ast_type(node_id, Type::function(parameter_ty, body_ty));
        }
        NodeKind::VariableDecl { initializer, .. } => {
            if let Some(initializer) = initializer {
                let decl_ty = node_type(ast, system, node_id);
                let initializer_ty = node_type(ast, system, *initializer);
                submit(ast, system, errors, node_id, Constraint::bind(decl_ty, initializer_ty));
            }
        }
        NodeKind::FunctionDecl { .. } => {}
    }
}

/// The type already associated with a node, or a fresh variable when
/// generation has not reached it.
fn node_type(ast: &Ast, system: &mut ConstraintSystem, node_id: NodeId) -> Type {
    match system.ast_type(ast, node_id) {
        Some(ty) => ty,
        None => Type::Variable(system.create_type_variable_for_node(node_id)),
    }
}

fn submit(
    ast: &Ast,
    system: &mut ConstraintSystem,
    errors: &mut Vec<TypeError>,
    node_id: NodeId,
    constraint: Constraint,
) {
    let range = ast.node(node_id).and_then(|node| node.range);
    let submitted = constraint.clone();
    if system.add_constraint_at(constraint, range) == SolveResult::Failure {
        errors.push(diagnose_failure(system, &submitted, range));
    }
}

/// Rebuilds a failed constraint into a diagnostic by re-examining its
/// simplified sides: a variable occurring in the opposite side of any
/// sub-match is an infinite type, anything else is a plain mismatch.
fn diagnose_failure(
    system: &ConstraintSystem,
    constraint: &Constraint,
    range: Option<Range>,
) -> TypeError {
    let (left, right) = constraint.parts();
    let left = system.simplify(left);
    let right = system.simplify(right);
    let span = range.as_ref().map(range_to_span);

    if let Some((var, ty)) = find_occurs_violation(&left, &right) {
        return TypeError::OccursCheck {
            var: var.to_string(),
            ty: ty.to_string(),
            span,
        };
    }
    TypeError::Mismatch {
        expected: left.to_string(),
        found: right.to_string(),
        span,
    }
}

/// Searches a pair of simplified sides for the variable whose assignment
/// failed the occurs-check, descending into function parameters and results
/// the way the matcher's own sub-matching does.
fn find_occurs_violation(left: &Type, right: &Type) -> Option<(TypeVar, Type)> {
    if let Some(var) = left.as_variable()
        && !right.is_variable()
        && right.contains_variable(var)
    {
        return Some((var, right.clone()));
    }
    if let Some(var) = right.as_variable()
        && !left.is_variable()
        && left.contains_variable(var)
    {
        return Some((var, left.clone()));
    }
    if let (Type::Function(parameter1, result1), Type::Function(parameter2, result2)) = (left, right)
    {
        return find_occurs_violation(parameter1, parameter2)
            .or_else(|| find_occurs_violation(result1, result2));
    }
    None
}
