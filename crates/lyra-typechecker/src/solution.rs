//! By-value snapshots of a solved (or partially solved) constraint system.

use lyra_ast::{NodeId, Type};
use rustc_hash::FxHashMap;

use crate::bindings::BindingStore;

/// A snapshot of the binding store and AST-type map, detached from the live
/// system: later mutation of the system leaves the snapshot untouched.
#[derive(Debug, Clone)]
pub struct Solution {
    bindings: BindingStore,
    ast_types: FxHashMap<NodeId, Type>,
}

impl Solution {
    pub(crate) fn new(bindings: BindingStore, ast_types: FxHashMap<NodeId, Type>) -> Self {
        Self { bindings, ast_types }
    }

    /// The fully concrete type of `node`, resolved through the snapshot's
    /// bindings. `None` when the node is unknown or its type still contains
    /// free type variables.
    pub fn fixed_type(&self, node: NodeId) -> Option<Type> {
        let ty = self.ast_types.get(&node)?;
        let simplified = self.bindings.simplify(ty);
        if simplified.has_variables() {
            None
        } else {
            Some(simplified)
        }
    }

    /// Every node the snapshot has a type entry for, with the entry resolved
    /// through the snapshot's bindings (possibly still containing variables)
    pub fn simplified_types(&self) -> impl Iterator<Item = (NodeId, Type)> + '_ {
        self.ast_types
            .iter()
            .map(|(node, ty)| (*node, self.bindings.simplify(ty)))
    }
}
