//! The matcher: structural unification over simplified types.

use std::mem;

use lyra_ast::{Type, TypeVar};

use crate::bindings::BindingStore;
use crate::constraint::ConstraintKind;

/// Outcome of matching two types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveResult {
    /// The obligation is discharged
    Solved,
    /// The types cannot be made equal
    Failure,
    /// Not yet resolvable, but not known to fail
    Ambiguous,
}

impl SolveResult {
    /// Accumulates two sub-match outcomes: failure dominates, then ambiguity.
    pub fn combine(self, other: SolveResult) -> SolveResult {
        match (self, other) {
            (SolveResult::Failure, _) | (_, SolveResult::Failure) => SolveResult::Failure,
            (SolveResult::Ambiguous, _) | (_, SolveResult::Ambiguous) => SolveResult::Ambiguous,
            _ => SolveResult::Solved,
        }
    }
}

/// Matcher configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchOptions {
    /// When set, a matcher may park unresolved sub-problems as deferred
    /// constraint entries instead of propagating `Ambiguous`. Threaded
    /// through every match but not consulted by the matchers in this crate.
    pub generate_constraints_when_ambiguous: bool,
}

/// Matches two types under `kind`, eagerly updating the binding store.
///
/// Both sides are simplified through the store first, so every type variable
/// seen below is a representative.
pub fn match_types(
    store: &mut BindingStore,
    left: &Type,
    right: &Type,
    kind: ConstraintKind,
    options: &MatchOptions,
) -> SolveResult {
    let left = store.simplify(left);
    let right = store.simplify(right);

    match (left.as_variable(), right.as_variable()) {
        (Some(a), Some(b)) => match_type_variables(store, a, b, kind),
        (Some(var), None) => match_type_variable_and_fixed(store, var, &right, kind),
        (None, Some(var)) => match_type_variable_and_fixed(store, var, &left, kind),
        (None, None) => match_fixed_types(store, &left, &right, kind, options),
    }
}

fn match_type_variables(
    store: &mut BindingStore,
    a: TypeVar,
    b: TypeVar,
    kind: ConstraintKind,
) -> SolveResult {
    if a == b {
        return SolveResult::Solved;
    }
    match kind {
        ConstraintKind::Bind => {
            store.merge(a, b);
            SolveResult::Solved
        }
        ConstraintKind::ApplicableFunction => {
            panic!("applicable-function constraints cannot relate two type variables")
        }
    }
}

fn match_type_variable_and_fixed(
    store: &mut BindingStore,
    var: TypeVar,
    fixed: &Type,
    kind: ConstraintKind,
) -> SolveResult {
    match kind {
        ConstraintKind::Bind => {
            // Occurs check on the simplified fixed side: assigning would
            // create an infinite type.
            if fixed.contains_variable(var) {
                return SolveResult::Failure;
            }
            store.assign(var, fixed.clone());
            SolveResult::Solved
        }
        ConstraintKind::ApplicableFunction => {
            panic!("applicable-function constraints cannot fix a type variable")
        }
    }
}

fn match_fixed_types(
    store: &mut BindingStore,
    left: &Type,
    right: &Type,
    kind: ConstraintKind,
    options: &MatchOptions,
) -> SolveResult {
    match (left, right) {
        (Type::Primitive(a), Type::Primitive(b)) => {
            if a == b {
                SolveResult::Solved
            } else {
                SolveResult::Failure
            }
        }
        (Type::Function(p1, r1), Type::Function(p2, r2)) => {
            match_function_types(store, p1, r1, p2, r2, kind, options)
        }
        _ if mem::discriminant(left) != mem::discriminant(right) => SolveResult::Failure,
        _ => unimplemented!("no structural matching rule for {left} and {right}"),
    }
}

/// Matches parameters, then results. A failing sub-match short-circuits;
/// ambiguity accumulates across the remaining sub-matches.
fn match_function_types(
    store: &mut BindingStore,
    parameter1: &Type,
    result1: &Type,
    parameter2: &Type,
    result2: &Type,
    kind: ConstraintKind,
    options: &MatchOptions,
) -> SolveResult {
    let parameters = match_types(store, parameter1, parameter2, kind, options);
    if parameters == SolveResult::Failure {
        return SolveResult::Failure;
    }
    let results = match_types(store, result1, result2, kind, options);
    if results == SolveResult::Failure {
        return SolveResult::Failure;
    }
    parameters.combine(results)
}
