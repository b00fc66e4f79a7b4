//! The constraint system façade: variable allocation, the AST-type map,
//! eager constraint submission, and solution snapshots.

use lyra_ast::{Ast, NodeId, Range, Type, TypeVar};
use rustc_hash::FxHashMap;

use crate::bindings::BindingStore;
use crate::constraint::{Constraint, ConstraintEntry, ConstraintKind};
use crate::solution::Solution;
use crate::unify::{self, MatchOptions, SolveResult};

/// Owns the solver state for one program: the binding store, the map from
/// AST nodes to their current types, and the live (deferred) constraints.
///
/// Constraints are solved eagerly on submission; merges and assignments are
/// never undone. Node identities must stay stable for the system's lifetime.
#[derive(Debug, Default)]
pub struct ConstraintSystem {
    bindings: BindingStore,
    ast_types: FxHashMap<NodeId, Type>,
    /// Deferred entries, parked without solving
    constraints: Vec<ConstraintEntry>,
    /// Identity source for submitted entries
    next_index: usize,
    /// The first failed entry; later failures are reported but not recorded
    failed_constraint: Option<ConstraintEntry>,
}

impl ConstraintSystem {
    pub fn new() -> Self {
        Self {
            bindings: BindingStore::new(),
            ast_types: FxHashMap::default(),
            constraints: Vec::new(),
            next_index: 0,
            failed_constraint: None,
        }
    }

    /// Allocates a fresh type variable
    pub fn create_type_variable(&mut self) -> TypeVar {
        self.bindings.fresh()
    }

    /// Allocates a fresh type variable and registers it as `node`'s AST type
    pub fn create_type_variable_for_node(&mut self, node: NodeId) -> TypeVar {
        let var = self.bindings.fresh();
        self.ast_types.insert(node, Type::Variable(var));
        var
    }

    /// The type currently associated with `node`: the AST-type map entry,
    /// falling back to the node's own declared or interface type
    pub fn ast_type(&self, ast: &Ast, node: NodeId) -> Option<Type> {
        self.ast_types.get(&node).cloned().or_else(|| {
            let node = ast.node(node)?;
            node.expression_type().or_else(|| node.interface_type()).cloned()
        })
    }

    /// Whether `node` has an entry in the AST-type map (the intrinsic
    /// fallback of [`Self::ast_type`] does not count)
    pub fn has_ast_type(&self, node: NodeId) -> bool {
        self.ast_types.contains_key(&node)
    }

    pub fn set_ast_type(&mut self, node: NodeId, ty: Type) {
        self.ast_types.insert(node, ty);
    }

    /// The AST-type map entries (unsimplified until [`Self::normalize`])
    pub fn ast_types(&self) -> impl Iterator<Item = (NodeId, &Type)> {
        self.ast_types.iter().map(|(node, ty)| (*node, ty))
    }

    /// Submits a constraint and solves it eagerly where possible.
    ///
    /// `Bind` constraints are matched immediately; `ApplicableFunction`
    /// constraints are recognised but only parked on the deferred queue.
    /// The first failure is recorded in [`Self::failed_constraint`]; a
    /// top-level `Ambiguous` outcome is a programmer error.
    pub fn add_constraint(&mut self, constraint: Constraint) -> SolveResult {
        self.add_constraint_at(constraint, None)
    }

    /// Like [`Self::add_constraint`], with a source range for failure reports
    pub fn add_constraint_at(
        &mut self,
        constraint: Constraint,
        range: Option<Range>,
    ) -> SolveResult {
        let entry = ConstraintEntry {
            constraint,
            index: self.next_entry_index(),
            range,
        };
        tracing::debug!(entry = %entry, "submitting constraint");

        let options = MatchOptions {
            generate_constraints_when_ambiguous: true,
        };
        let result = match &entry.constraint {
            Constraint::Bind { left, right } => {
                unify::match_types(&mut self.bindings, left, right, ConstraintKind::Bind, &options)
            }
            Constraint::ApplicableFunction { .. } => {
                tracing::debug!(entry = %entry, "deferring applicable-function constraint");
                self.constraints.push(entry);
                return SolveResult::Solved;
            }
        };

        match result {
            SolveResult::Failure => {
                if self.failed_constraint.is_none() {
                    self.failed_constraint = Some(entry);
                }
            }
            SolveResult::Ambiguous => {
                panic!("constraint resolved ambiguous at top level: {entry}")
            }
            SolveResult::Solved => {}
        }
        result
    }

    /// Low-level hook for deferring matchers: parks an entry on the live
    /// queue without attempting to solve it
    pub fn add_ambiguous_constraint(&mut self, constraint: Constraint) {
        let entry = ConstraintEntry {
            constraint,
            index: self.next_entry_index(),
            range: None,
        };
        self.constraints.push(entry);
    }

    fn next_entry_index(&mut self) -> usize {
        let index = self.next_index;
        self.next_index += 1;
        index
    }

    /// Entries parked without a solution
    pub fn pending_constraints(&self) -> &[ConstraintEntry] {
        &self.constraints
    }

    /// The first constraint whose submission failed, if any
    pub fn failed_constraint(&self) -> Option<&ConstraintEntry> {
        self.failed_constraint.as_ref()
    }

    /// Simplifies a type through the current bindings
    pub fn simplify(&self, ty: &Type) -> Type {
        self.bindings.simplify(ty)
    }

    /// Rewrites every AST-type entry to its simplified form
    pub fn normalize(&mut self) {
        for ty in self.ast_types.values_mut() {
            *ty = self.bindings.simplify(ty);
        }
        tracing::debug!(entries = self.ast_types.len(), "normalized ast types");
    }

    /// Whether every allocated variable resolves to a fixed type
    pub fn all_type_variables_fixed(&self) -> bool {
        self.bindings
            .variables()
            .all(|var| self.bindings.fixed_type(var).is_some())
    }

    /// Snapshots the bindings and the AST-type map by value; the live system
    /// can keep mutating without affecting the snapshot
    pub fn current_solution(&self) -> Solution {
        Solution::new(self.bindings.clone(), self.ast_types.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int() -> Type {
        Type::primitive("Int")
    }

    #[test]
    fn test_create_type_variable_ids_start_at_one() {
        let mut system = ConstraintSystem::new();
        assert_eq!(system.create_type_variable().id(), 1);
        assert_eq!(system.create_type_variable().id(), 2);
    }

    #[test]
    fn test_create_type_variable_for_node_registers_ast_type() {
        let mut ast = Ast::new();
        let literal = ast.integer_literal(1);

        let mut system = ConstraintSystem::new();
        let var = system.create_type_variable_for_node(literal);
        assert_eq!(system.ast_type(&ast, literal), Some(Type::Variable(var)));
        assert!(system.has_ast_type(literal));
    }

    #[test]
    fn test_ast_type_falls_back_to_intrinsic_types() {
        let mut ast = Ast::new();
        let signature = Type::function(int(), int());
        let decl = ast.function_decl("f", signature.clone());
        let literal = ast.integer_literal(1);
        ast.set_type(literal, int());
        let bare = ast.integer_literal(2);

        let system = ConstraintSystem::new();
        assert_eq!(system.ast_type(&ast, decl), Some(signature));
        assert_eq!(system.ast_type(&ast, literal), Some(int()));
        assert_eq!(system.ast_type(&ast, bare), None);
        assert!(!system.has_ast_type(decl));
    }

    #[test]
    fn test_add_constraint_solves_eagerly() {
        let mut system = ConstraintSystem::new();
        let v1 = system.create_type_variable();

        let result = system.add_constraint(Constraint::bind(Type::Variable(v1), int()));
        assert_eq!(result, SolveResult::Solved);
        assert_eq!(system.simplify(&Type::Variable(v1)), int());
        assert!(system.failed_constraint().is_none());
        assert!(system.all_type_variables_fixed());
    }

    #[test]
    fn test_first_failure_is_recorded_and_kept() {
        let mut system = ConstraintSystem::new();

        let first = Constraint::bind(int(), Type::primitive("String"));
        assert_eq!(system.add_constraint(first.clone()), SolveResult::Failure);

        let second = Constraint::bind(int(), Type::primitive("Bool"));
        assert_eq!(system.add_constraint(second), SolveResult::Failure);

        let failed = system.failed_constraint().unwrap();
        assert_eq!(failed.constraint, first);
        assert_eq!(failed.index, 0);
    }

    #[test]
    fn test_occurs_failure_is_recorded() {
        let mut system = ConstraintSystem::new();
        let v1 = system.create_type_variable();

        let recursive = Type::function(Type::Variable(v1), int());
        let result = system.add_constraint(Constraint::bind(Type::Variable(v1), recursive));
        assert_eq!(result, SolveResult::Failure);
        assert!(system.failed_constraint().is_some());
        assert!(!system.all_type_variables_fixed());
    }

    #[test]
    fn test_applicable_function_is_parked_not_solved() {
        let mut system = ConstraintSystem::new();
        let v1 = system.create_type_variable();
        let v2 = system.create_type_variable();

        let constraint = Constraint::applicable_function(
            Type::function(Type::Variable(v1), Type::Variable(v2)),
            Type::Variable(v1),
        );
        assert_eq!(system.add_constraint(constraint.clone()), SolveResult::Solved);

        let pending = system.pending_constraints();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].constraint, constraint);
        // Parking must not touch the store.
        assert_eq!(system.simplify(&Type::Variable(v2)), Type::Variable(v2));
    }

    #[test]
    fn test_add_ambiguous_constraint_parks_without_solving() {
        let mut system = ConstraintSystem::new();
        let constraint = Constraint::bind(int(), Type::primitive("String"));
        system.add_ambiguous_constraint(constraint);

        assert_eq!(system.pending_constraints().len(), 1);
        assert!(system.failed_constraint().is_none());
    }

    #[test]
    fn test_entry_indices_follow_submission_order() {
        let mut system = ConstraintSystem::new();
        let _ = system.add_constraint(Constraint::bind(int(), int()));
        system.add_ambiguous_constraint(Constraint::bind(int(), int()));
        let _ = system.add_constraint(Constraint::bind(int(), Type::primitive("String")));

        assert_eq!(system.pending_constraints()[0].index, 1);
        assert_eq!(system.failed_constraint().unwrap().index, 2);
    }

    #[test]
    fn test_normalize_rewrites_ast_types() {
        let mut ast = Ast::new();
        let literal = ast.integer_literal(1);

        let mut system = ConstraintSystem::new();
        let var = system.create_type_variable_for_node(literal);
        let _ = system.add_constraint(Constraint::bind(Type::Variable(var), int()));

        assert_eq!(system.ast_type(&ast, literal), Some(Type::Variable(var)));
        system.normalize();
        assert_eq!(system.ast_type(&ast, literal), Some(int()));
    }

    #[test]
    fn test_current_solution_is_independent_of_later_mutation() {
        let mut ast = Ast::new();
        let literal = ast.integer_literal(1);

        let mut system = ConstraintSystem::new();
        let var = system.create_type_variable_for_node(literal);

        let before = system.current_solution();
        let _ = system.add_constraint(Constraint::bind(Type::Variable(var), int()));
        let after = system.current_solution();

        assert_eq!(before.fixed_type(literal), None);
        assert_eq!(after.fixed_type(literal), Some(int()));
    }
}
