//! Type representations for the Lyra type system.

use itertools::Itertools;
use smol_str::SmolStr;
use std::fmt;

/// A type variable, identified by a positive integer id.
///
/// Ids are allocated by the constraint system in order, starting at 1, and
/// are totally ordered so that the first-allocated variable of an equivalence
/// class can deterministically represent it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeVar(u32);

impl TypeVar {
    /// Creates a type variable from its id. Ids start at 1.
    pub fn new(id: u32) -> Self {
        assert!(id >= 1, "type variable ids start at 1");
        Self(id)
    }

    /// The numeric id of this variable.
    pub fn id(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TypeVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$T{}", self.0)
    }
}

/// Represents a type in the Lyra type system
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Type variable for inference
    Variable(TypeVar),
    /// Named primitive type, e.g. `Int` or `String`
    Primitive(SmolStr),
    /// Function type: parameter -> result
    Function(Box<Type>, Box<Type>),
    /// Tuple type with element types
    Tuple(Vec<Type>),
}

impl Type {
    /// Creates a new primitive type
    pub fn primitive(name: impl Into<SmolStr>) -> Self {
        Type::Primitive(name.into())
    }

    /// Creates a new function type
    pub fn function(parameter: Type, result: Type) -> Self {
        Type::Function(Box::new(parameter), Box::new(result))
    }

    /// Creates a new tuple type
    pub fn tuple(elements: Vec<Type>) -> Self {
        Type::Tuple(elements)
    }

    /// Checks if this is a type variable
    pub fn is_variable(&self) -> bool {
        matches!(self, Type::Variable(_))
    }

    /// Gets the type variable if this is one
    pub fn as_variable(&self) -> Option<TypeVar> {
        match self {
            Type::Variable(var) => Some(*var),
            _ => None,
        }
    }

    /// Checks whether `var` occurs anywhere in this type as a sub-term.
    pub fn contains_variable(&self, var: TypeVar) -> bool {
        match self {
            Type::Variable(v) => *v == var,
            Type::Primitive(_) => false,
            Type::Function(parameter, result) => {
                parameter.contains_variable(var) || result.contains_variable(var)
            }
            Type::Tuple(elements) => elements.iter().any(|e| e.contains_variable(var)),
        }
    }

    /// Checks whether any type variable occurs in this type.
    pub fn has_variables(&self) -> bool {
        match self {
            Type::Variable(_) => true,
            Type::Primitive(_) => false,
            Type::Function(parameter, result) => parameter.has_variables() || result.has_variables(),
            Type::Tuple(elements) => elements.iter().any(Type::has_variables),
        }
    }

    /// Structural rewrite: applies `f` to every sub-term, outermost first.
    ///
    /// When `f` returns `Some`, the replacement is taken as-is and its
    /// children are not visited; when it returns `None`, the sub-term is
    /// rebuilt from its transformed children.
    pub fn transform<F>(&self, f: &mut F) -> Type
    where
        F: FnMut(&Type) -> Option<Type>,
    {
        if let Some(replaced) = f(self) {
            return replaced;
        }
        match self {
            Type::Variable(_) | Type::Primitive(_) => self.clone(),
            Type::Function(parameter, result) => {
                Type::Function(Box::new(parameter.transform(f)), Box::new(result.transform(f)))
            }
            Type::Tuple(elements) => {
                let mut transformed = Vec::with_capacity(elements.len());
                for element in elements {
                    transformed.push(element.transform(f));
                }
                Type::Tuple(transformed)
            }
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Variable(var) => write!(f, "{}", var),
            Type::Primitive(name) => write!(f, "{}", name),
            Type::Function(parameter, result) => write!(f, "({}) -> {}", parameter, result),
            Type::Tuple(elements) => {
                write!(f, "({})", elements.iter().map(|e| e.to_string()).join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_type_display() {
        assert_eq!(Type::primitive("Int").to_string(), "Int");
        assert_eq!(Type::Variable(TypeVar::new(3)).to_string(), "$T3");
        assert_eq!(
            Type::function(Type::primitive("Int"), Type::primitive("Bool")).to_string(),
            "(Int) -> Bool"
        );
        assert_eq!(
            Type::function(
                Type::function(Type::primitive("Int"), Type::primitive("Int")),
                Type::primitive("Int"),
            )
            .to_string(),
            "((Int) -> Int) -> Int"
        );
        assert_eq!(
            Type::tuple(vec![Type::primitive("Int"), Type::primitive("String")]).to_string(),
            "(Int, String)"
        );
    }

    #[test]
    #[should_panic(expected = "type variable ids start at 1")]
    fn test_type_var_zero_id() {
        TypeVar::new(0);
    }

    #[rstest]
    #[case(Type::Variable(TypeVar::new(1)), true)]
    #[case(Type::primitive("Int"), false)]
    #[case(Type::function(Type::Variable(TypeVar::new(1)), Type::primitive("Int")), true)]
    #[case(Type::function(Type::primitive("Int"), Type::primitive("Int")), false)]
    #[case(Type::tuple(vec![Type::primitive("Int"), Type::Variable(TypeVar::new(1))]), true)]
    fn test_contains_variable(#[case] ty: Type, #[case] expected: bool) {
        assert_eq!(ty.contains_variable(TypeVar::new(1)), expected);
        assert_eq!(ty.has_variables(), expected);
    }

    #[test]
    fn test_contains_variable_is_by_id() {
        let ty = Type::Variable(TypeVar::new(2));
        assert!(!ty.contains_variable(TypeVar::new(1)));
        assert!(ty.has_variables());
    }

    #[test]
    fn test_transform_substitutes_variables() {
        let var = TypeVar::new(1);
        let ty = Type::function(Type::Variable(var), Type::primitive("Int"));
        let substituted = ty.transform(&mut |t| match t {
            Type::Variable(v) if *v == var => Some(Type::primitive("String")),
            _ => None,
        });
        assert_eq!(
            substituted,
            Type::function(Type::primitive("String"), Type::primitive("Int"))
        );
    }

    #[test]
    fn test_transform_replacement_is_not_revisited() {
        let var = TypeVar::new(1);
        let ty = Type::Variable(var);
        // The replacement contains the variable itself; transform must not loop.
        let substituted = ty.transform(&mut |t| match t {
            Type::Variable(v) if *v == var => {
                Some(Type::function(Type::Variable(*v), Type::primitive("Int")))
            }
            _ => None,
        });
        assert_eq!(
            substituted,
            Type::function(Type::Variable(var), Type::primitive("Int"))
        );
    }
}
