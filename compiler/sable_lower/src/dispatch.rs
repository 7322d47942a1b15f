//! Structural dispatch.
//!
//! Records never declare the interfaces they satisfy. A capability is
//! discovered instead: every function whose first parameter is a record
//! implements the capability named after the function, for that record.
//! `talk(self: Dog)` and `talk(self: Cat)` together make `talk` a capability
//! with two implementations.
//!
//! Resolution is a table lookup keyed by `(capability, receiver record)`,
//! built once per unit.

use rustc_hash::{FxHashMap, FxHashSet};

use sable_ir::{DeclId, Name};

use crate::coerce::Inferred;
use crate::symbols::{Candidates, Lookup, SymbolTable};

#[derive(Clone, Debug, Default)]
pub struct CapabilityIndex {
    implementations: FxHashMap<(Name, DeclId), Candidates>,
    capabilities: FxHashSet<Name>,
}

impl CapabilityIndex {
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn build(symbols: &SymbolTable) -> Self {
        let mut index = CapabilityIndex::default();
        for (id, decl) in symbols.iter() {
            let Some(receiver) = decl
                .params()
                .and_then(|params| params.first())
                .and_then(|param| param.ty.as_record())
            else {
                continue;
            };
            index
                .implementations
                .entry((decl.name, receiver))
                .or_default()
                .push(id);
            index.capabilities.insert(decl.name);
        }
        tracing::debug!(
            capabilities = index.capabilities.len(),
            implementations = index.implementations.len(),
            "capability index built"
        );
        index
    }

    /// Whether some function taking a record first is named `name`.
    pub fn is_capability(&self, name: Name) -> bool {
        self.capabilities.contains(&name)
    }

    /// Implementations of `capability` for `receiver`, in definition order.
    pub fn implementations(&self, capability: Name, receiver: DeclId) -> &[DeclId] {
        self.implementations
            .get(&(capability, receiver))
            .map_or(&[], |ids| ids.as_slice())
    }

    /// Pick the implementation a capability call dispatches to.
    ///
    /// `rest` are the shapes of the arguments after the receiver; they only
    /// matter when the receiver type has more than one implementation.
    pub fn resolve(
        &self,
        symbols: &SymbolTable,
        capability: Name,
        receiver: DeclId,
        rest: &[Inferred],
    ) -> Lookup {
        match self.implementations(capability, receiver) {
            [] => Lookup::NotFound,
            [only] => Lookup::Found(*only),
            candidates => {
                let matching: Candidates = candidates
                    .iter()
                    .copied()
                    .filter(|&id| accepts_rest(symbols, id, rest))
                    .collect();
                match matching.as_slice() {
                    [only] => Lookup::Found(*only),
                    _ => Lookup::Ambiguous {
                        candidates: candidates.len(),
                    },
                }
            }
        }
    }
}

/// Whether the parameters after the receiver accept `rest`.
fn accepts_rest(symbols: &SymbolTable, id: DeclId, rest: &[Inferred]) -> bool {
    symbols.decl(id).params().is_some_and(|params| {
        params.len() == rest.len() + 1
            && params[1..]
                .iter()
                .zip(rest)
                .all(|(param, arg)| arg.fits(param.ty))
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
