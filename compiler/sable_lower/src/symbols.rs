//! Symbol table.
//!
//! Registry of every declaration in a unit, keyed by base name. Same-named
//! declarations coexist under distinct [`DeclId`]s; telling them apart at a
//! use site is [`SymbolTable::resolve`]'s job, telling them apart in the
//! output is the renamer's.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use sable_ir::{DeclId, DeclKind, Declaration, Name, StringInterner, Type};

use crate::coerce::Inferred;
use crate::{LowerError, LowerErrorKind};

/// Declarations sharing a base name, in definition order.
pub type Candidates = SmallVec<[DeclId; 2]>;

/// Result of looking a name up at a use site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    Found(DeclId),
    /// Nothing of the right kind has this name.
    NotFound,
    /// Candidates exist but none accepts the use.
    NoMatch { candidates: usize },
    /// More than one candidate accepts the use.
    Ambiguous { candidates: usize },
}

#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    decls: Vec<Declaration>,
    by_name: FxHashMap<Name, Candidates>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declaration. IDs are handed out in definition order, so
    /// defining a unit's declarations in sequence reproduces its IDs.
    pub fn define(&mut self, decl: Declaration, interner: &StringInterner) -> Result<DeclId, LowerError> {
        let id = DeclId::from_index(self.decls.len());

        if let DeclKind::Record { fields } = &decl.kind {
            let mut seen = FxHashSet::default();
            for field in fields {
                if !seen.insert(field.name) {
                    return Err(LowerError::new(
                        LowerErrorKind::DuplicateFieldName {
                            record: interner.lookup(decl.name).to_string(),
                            field: interner.lookup(field.name).to_string(),
                        },
                        decl.span,
                    )
                    .in_decl(id));
                }
            }
        }

        self.by_name.entry(decl.name).or_default().push(id);
        self.decls.push(decl);
        Ok(id)
    }

    #[inline]
    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.decls[id.index()]
    }

    pub fn decl_mut(&mut self, id: DeclId) -> &mut Declaration {
        &mut self.decls[id.index()]
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &Declaration)> {
        self.decls
            .iter()
            .enumerate()
            .map(|(i, decl)| (DeclId::from_index(i), decl))
    }

    pub fn into_decls(self) -> Vec<Declaration> {
        self.decls
    }

    /// Every declaration with this base name.
    pub fn named(&self, name: Name) -> &[DeclId] {
        self.by_name.get(&name).map_or(&[], |ids| ids.as_slice())
    }

    /// Functions and externs with this base name.
    pub fn callables(&self, name: Name) -> Candidates {
        self.named(name)
            .iter()
            .copied()
            .filter(|&id| self.decl(id).is_callable())
            .collect()
    }

    /// Constants with this base name.
    pub fn constants(&self, name: Name) -> Candidates {
        self.named(name)
            .iter()
            .copied()
            .filter(|&id| self.decl(id).is_constant())
            .collect()
    }

    /// The record with this base name, if exactly one exists.
    pub fn record(&self, name: Name) -> Option<DeclId> {
        let mut records = self
            .named(name)
            .iter()
            .copied()
            .filter(|&id| matches!(self.decl(id).kind, DeclKind::Record { .. }));
        let first = records.next()?;
        records.next().is_none().then_some(first)
    }

    /// Pick the function or extern `name(args..)` refers to.
    ///
    /// A name with a single callable resolves to it unconditionally; the
    /// caller checks arity and coerces the arguments. Overloads are filtered
    /// by arity and argument compatibility.
    pub fn resolve(&self, name: Name, args: &[Inferred]) -> Lookup {
        let candidates = self.callables(name);
        match candidates.as_slice() {
            [] => Lookup::NotFound,
            [only] => Lookup::Found(*only),
            _ => {
                let matching: Candidates = candidates
                    .iter()
                    .copied()
                    .filter(|&id| self.accepts(id, args))
                    .collect();
                match matching.as_slice() {
                    [only] => Lookup::Found(*only),
                    [] => Lookup::NoMatch {
                        candidates: candidates.len(),
                    },
                    _ => Lookup::Ambiguous {
                        candidates: matching.len(),
                    },
                }
            }
        }
    }

    /// Pick the constant a reference to `name` refers to.
    ///
    /// Same-named constants are told apart by `wanted`, the type the
    /// reference site requires. `type_of` yields each candidate's type.
    pub fn resolve_constant(
        &self,
        name: Name,
        wanted: Option<Type>,
        mut type_of: impl FnMut(DeclId) -> Result<Type, LowerError>,
    ) -> Result<Lookup, LowerError> {
        let candidates = self.constants(name);
        match candidates.as_slice() {
            [] => Ok(Lookup::NotFound),
            [only] => Ok(Lookup::Found(*only)),
            _ => {
                let Some(wanted) = wanted else {
                    return Ok(Lookup::Ambiguous {
                        candidates: candidates.len(),
                    });
                };
                let mut matching = Candidates::new();
                for &id in &candidates {
                    if type_of(id)? == wanted {
                        matching.push(id);
                    }
                }
                Ok(match matching.as_slice() {
                    [only] => Lookup::Found(*only),
                    _ => Lookup::Ambiguous {
                        candidates: candidates.len(),
                    },
                })
            }
        }
    }

    /// Whether `id`'s parameters accept arguments shaped like `args`.
    pub fn accepts(&self, id: DeclId, args: &[Inferred]) -> bool {
        self.decl(id).params().is_some_and(|params| {
            params.len() == args.len() && params.iter().zip(args).all(|(param, arg)| arg.fits(param.ty))
        })
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
