//! The binding store: union-find plus assignment over type variables.

use lyra_ast::{Type, TypeVar};

/// What the store currently knows about one type variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Nothing yet; the variable represents its own class
    Free,
    /// A concrete (non-variable) type; only representatives carry one
    Fixed(Type),
    /// Forwarded to another variable that carries the class's state
    Transfer(TypeVar),
}

/// Dense table of bindings, indexed by variable id.
///
/// Variables are allocated in order starting at id 1, so the table needs no
/// hashing and snapshots are plain clones. Invariants:
///
/// - a variable is a representative iff its binding is `Free` or `Fixed`;
///   transfer chains are acyclic and end at a representative
/// - merging is id-directed: the larger id transfers to the smaller, and
///   every variable transferring to the larger is rewritten to the smaller,
///   so a class's representative is its minimum-id member and chains stay
///   one hop long
/// - only a `Free` representative may be assigned a `Fixed` type
#[derive(Debug, Clone, Default)]
pub struct BindingStore {
    bindings: Vec<Binding>,
}

impl BindingStore {
    pub fn new() -> Self {
        Self { bindings: Vec::new() }
    }

    /// Allocates the next type variable, bound `Free`
    pub fn fresh(&mut self) -> TypeVar {
        let var = TypeVar::new(self.bindings.len() as u32 + 1);
        self.bindings.push(Binding::Free);
        var
    }

    /// Number of allocated variables
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// All allocated variables, in id order
    pub fn variables(&self) -> impl Iterator<Item = TypeVar> + '_ {
        (1..=self.bindings.len() as u32).map(TypeVar::new)
    }

    pub fn binding(&self, var: TypeVar) -> &Binding {
        &self.bindings[Self::index(var)]
    }

    fn index(var: TypeVar) -> usize {
        (var.id() - 1) as usize
    }

    /// The terminal variable of `var`'s transfer chain, regardless of whether
    /// it is fixed
    pub fn representative(&self, var: TypeVar) -> TypeVar {
        let mut current = var;
        loop {
            match self.binding(current) {
                Binding::Transfer(next) => current = *next,
                Binding::Free | Binding::Fixed(_) => return current,
            }
        }
    }

    pub fn is_representative(&self, var: TypeVar) -> bool {
        self.representative(var) == var
    }

    /// The fixed type of `var`'s class, resolved through the transfer chain
    pub fn fixed_type(&self, var: TypeVar) -> Option<Type> {
        match self.binding(self.representative(var)) {
            Binding::Fixed(ty) => Some(ty.clone()),
            _ => None,
        }
    }

    /// The class's fixed type if it has one, else the class's representative
    pub fn fixed_or_representative(&self, var: TypeVar) -> Type {
        let representative = self.representative(var);
        match self.binding(representative) {
            Binding::Fixed(ty) => ty.clone(),
            _ => Type::Variable(representative),
        }
    }

    /// Unites the classes of two free representatives. The larger id becomes
    /// a transfer to the smaller, and every variable transferring to the
    /// larger is rewritten to the smaller.
    pub fn merge(&mut self, a: TypeVar, b: TypeVar) {
        if a == b {
            return;
        }
        assert!(
            matches!(self.binding(a), Binding::Free) && matches!(self.binding(b), Binding::Free),
            "merge requires free representative variables"
        );
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        self.bindings[Self::index(hi)] = Binding::Transfer(lo);
        for binding in &mut self.bindings {
            if matches!(binding, Binding::Transfer(target) if *target == hi) {
                *binding = Binding::Transfer(lo);
            }
        }
        tracing::debug!(%hi, %lo, "merged type variable classes");
    }

    /// Fixes a free representative to a concrete type. The occurs-check is
    /// the caller's responsibility.
    pub fn assign(&mut self, var: TypeVar, ty: Type) {
        assert!(!ty.is_variable(), "fixed types must not be type variables");
        assert!(
            matches!(self.binding(var), Binding::Free),
            "assign requires a free representative variable"
        );
        tracing::debug!(%var, %ty, "assigned fixed type");
        self.bindings[Self::index(var)] = Binding::Fixed(ty);
    }

    /// Substitutes every variable in `ty` by its class's fixed type or
    /// representative, to fixpoint. The result contains no transfer node and
    /// no representative that already carries a fixed type.
    pub fn simplify(&self, ty: &Type) -> Type {
        ty.transform(&mut |t| match t {
            Type::Variable(var) => {
                let resolved = self.fixed_or_representative(*var);
                if resolved.is_variable() {
                    Some(resolved)
                } else {
                    Some(self.simplify(&resolved))
                }
            }
            _ => None,
        })
    }
}
