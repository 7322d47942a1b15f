//! Renaming and disambiguation.
//!
//! The target has one flat namespace and no overloading, so every
//! declaration needs its own emitted name. Rules, applied per base name in
//! first-occurrence order:
//! - a base name used once keeps it, unless the target reserves it; then
//!   `_` is appended until the name is free (`print` becomes `print_`)
//! - a base name used N >= 2 times becomes `base_0 .. base_{N-1}` in
//!   declaration order; if any of those is taken the prefix grows another
//!   `_` (`base__0 ..`)
//!
//! Externs are provided by the target under their own names: they are never
//! renamed, and their names count as reserved.
//!
//! Output names are unique and unreserved, and every one of them is its own
//! lone non-reserved base name, so renaming already renamed output changes
//! nothing.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use sable_ir::{DeclId, Declaration, Name, StringInterner};

use crate::{LowerConfig, LowerError, LowerErrorKind};

/// How far a name may grow underscores before renaming gives up.
const MAX_UNDERSCORES: usize = 64;

/// Final name of one declaration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Binding {
    pub decl: DeclId,
    /// Name as written in the source.
    pub base: Name,
    /// Name in the lowered program.
    pub emitted: Name,
}

struct Renamer<'a> {
    interner: &'a StringInterner,
    /// Names nothing may be renamed to.
    reserved: FxHashSet<Name>,
    /// Reserved names plus every name handed out so far.
    claimed: FxHashSet<Name>,
}

impl Renamer<'_> {
    fn is_claimed(&self, candidate: &str) -> bool {
        self.interner
            .get(candidate)
            .is_some_and(|name| self.claimed.contains(&name))
    }

    fn claim(&mut self, candidate: &str) -> Name {
        let name = self.interner.intern(candidate);
        self.claimed.insert(name);
        name
    }

    /// `base` followed by as few `_` as keep it unclaimed.
    fn free_singleton(&mut self, base: &str) -> Option<Name> {
        let mut candidate = base.to_string();
        for _ in 0..MAX_UNDERSCORES {
            candidate.push('_');
            if !self.is_claimed(&candidate) {
                return Some(self.claim(&candidate));
            }
        }
        None
    }

    /// `prefix0 .. prefix{count-1}` for the shortest `base_+` prefix whose
    /// names are all unclaimed.
    fn free_group(&mut self, base: &str, count: usize) -> Option<Vec<Name>> {
        let mut prefix = base.to_string();
        for _ in 0..MAX_UNDERSCORES {
            prefix.push('_');
            let candidates: Vec<String> = (0..count).map(|i| format!("{prefix}{i}")).collect();
            if candidates.iter().all(|c| !self.is_claimed(c)) {
                return Some(candidates.iter().map(|c| self.claim(c)).collect());
            }
        }
        None
    }
}

/// Assign every declaration its emitted name.
///
/// Returns one binding per declaration, in declaration order.
#[tracing::instrument(level = "debug", skip_all, fields(decls = decls.len()))]
pub fn rename(
    decls: &[Declaration],
    config: &LowerConfig,
    interner: &StringInterner,
) -> Result<Vec<Binding>, LowerError> {
    let mut reserved: FxHashSet<Name> = config
        .reserved_names
        .iter()
        .map(|name| interner.intern(name))
        .collect();
    reserved.extend(decls.iter().filter(|d| d.is_extern()).map(|d| d.name));

    // Group by base name in first-occurrence order. Externs stay out.
    let mut order: Vec<Name> = Vec::new();
    let mut groups: FxHashMap<Name, SmallVec<[DeclId; 2]>> = FxHashMap::default();
    for (index, decl) in decls.iter().enumerate() {
        if decl.is_extern() {
            continue;
        }
        let id = DeclId::from_index(index);
        groups
            .entry(decl.name)
            .or_insert_with(|| {
                order.push(decl.name);
                SmallVec::new()
            })
            .push(id);
    }

    let mut renamer = Renamer {
        interner,
        claimed: reserved.clone(),
        reserved,
    };
    let mut emitted: Vec<Name> = decls.iter().map(|d| d.name).collect();

    // Lone unreserved names are kept, so claim them before anything is
    // suffixed.
    for base in &order {
        if groups[base].len() == 1 && !renamer.reserved.contains(base) {
            renamer.claimed.insert(*base);
        }
    }

    for base in &order {
        let ids = &groups[base];
        let text = interner.lookup(*base);
        match ids.as_slice() {
            [id] if !renamer.reserved.contains(base) => emitted[id.index()] = *base,
            [id] => {
                let name = renamer
                    .free_singleton(text)
                    .ok_or_else(|| cycle(decls, *id, interner))?;
                tracing::debug!(base = text, emitted = interner.lookup(name), "renamed reserved name");
                emitted[id.index()] = name;
            }
            _ => {
                let names = renamer
                    .free_group(text, ids.len())
                    .ok_or_else(|| cycle(decls, ids[0], interner))?;
                tracing::debug!(base = text, count = ids.len(), "renamed group");
                for (id, name) in ids.iter().zip(names) {
                    emitted[id.index()] = name;
                }
            }
        }
    }

    verify(decls, &emitted, &renamer.reserved, interner)?;

    Ok(decls
        .iter()
        .zip(emitted)
        .enumerate()
        .map(|(index, (decl, emitted))| Binding {
            decl: DeclId::from_index(index),
            base: decl.name,
            emitted,
        })
        .collect())
}

/// Every non-extern name is unique and unreserved.
fn verify(
    decls: &[Declaration],
    emitted: &[Name],
    reserved: &FxHashSet<Name>,
    interner: &StringInterner,
) -> Result<(), LowerError> {
    let mut seen = FxHashSet::default();
    for (index, (decl, &name)) in decls.iter().zip(emitted).enumerate() {
        if decl.is_extern() {
            continue;
        }
        if reserved.contains(&name) || !seen.insert(name) {
            let id = DeclId::from_index(index);
            return Err(cycle(decls, id, interner));
        }
    }
    Ok(())
}

fn cycle(decls: &[Declaration], id: DeclId, interner: &StringInterner) -> LowerError {
    let decl = &decls[id.index()];
    LowerError::new(
        LowerErrorKind::RenamerCycle {
            name: interner.lookup(decl.name).to_string(),
        },
        decl.span,
    )
    .in_decl(id)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
