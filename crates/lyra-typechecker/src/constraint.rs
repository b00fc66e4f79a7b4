//! Constraint representation for the solver.

use std::fmt;

use lyra_ast::{Range, Type};

/// A requirement relating two types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// The two types must be equal
    Bind { left: Type, right: Type },
    /// The left (function-shaped) type must be applicable to the right type.
    /// Recognised and queued by this solver, but not yet simplified.
    ApplicableFunction { left: Type, right: Type },
}

/// Discriminant of a [`Constraint`], used for matcher dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Bind,
    ApplicableFunction,
}

impl Constraint {
    pub fn bind(left: Type, right: Type) -> Self {
        Constraint::Bind { left, right }
    }

    pub fn applicable_function(left: Type, right: Type) -> Self {
        Constraint::ApplicableFunction { left, right }
    }

    pub fn kind(&self) -> ConstraintKind {
        match self {
            Constraint::Bind { .. } => ConstraintKind::Bind,
            Constraint::ApplicableFunction { .. } => ConstraintKind::ApplicableFunction,
        }
    }

    /// The two related types, left then right
    pub fn parts(&self) -> (&Type, &Type) {
        match self {
            Constraint::Bind { left, right } | Constraint::ApplicableFunction { left, right } => {
                (left, right)
            }
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Bind { left, right } => write!(f, "{} ~ {}", left, right),
            Constraint::ApplicableFunction { left, right } => {
                write!(f, "{} applicable fn {}", left, right)
            }
        }
    }
}

/// A live constraint: the constraint itself plus its submission index (its
/// identity in failure reports) and an optional source range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintEntry {
    pub constraint: Constraint,
    pub index: usize,
    pub range: Option<Range>,
}

impl fmt::Display for ConstraintEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}: {}", self.index, self.constraint)
    }
}
