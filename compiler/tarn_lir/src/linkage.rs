//! Linkage lattice and resolvers.
//!
//! Where a symbol may be referenced from, and which definition is
//! canonical. [`Linkage`] is a four-point lattice ordered from most to
//! least restrictive; the structural resolvers fold [`Linkage::merge`]
//! over every part of a declaration chain, type term, or generic
//! clause, so one private component makes the whole private.

use tarn_ast::{DeclArena, DeclContext, DeclId};
use tarn_types::{Conformance, GenericParam, TyData, TyId, TyPool};

/// Externally observable linkage of a symbol.
///
/// The derived order runs most restrictive first, which makes
/// [`merge`](Self::merge) a plain `min`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Linkage {
    /// Visible only inside its defining translation unit.
    Private,
    /// Visible everywhere, but any number of units may hold an
    /// equivalent definition; none is canonical.
    PublicNonUnique,
    /// Visible everywhere, with one canonical defining unit.
    PublicUnique,
    /// Merge identity: no component has constrained the answer yet.
    Top,
}

impl Linkage {
    /// Lattice merge: the more restrictive side wins.
    #[inline]
    pub fn merge(self, other: Self) -> Self {
        self.min(other)
    }
}

/// Linkage of a declaration, read off its enclosing-context chain.
///
/// Anything nested in a function or closure body is `Private`. A chain
/// ending in a native module is `PublicUnique`; one ending in a foreign
/// module is `PublicNonUnique`, since any importing unit may hold an
/// equivalent copy of a host-interface declaration.
pub fn decl_linkage(decls: &DeclArena, decl: DeclId) -> Linkage {
    let mut ctx = decls.decl(decl).context;
    loop {
        match ctx {
            DeclContext::Module(module) => {
                return if decls.module(module).is_foreign() {
                    Linkage::PublicNonUnique
                } else {
                    Linkage::PublicUnique
                };
            }
            DeclContext::Function(_) | DeclContext::Closure(_) => return Linkage::Private,
            DeclContext::Nominal(parent) => ctx = decls.decl(parent).context,
        }
    }
}

/// Merged linkage of every nominal type and generic clause occurring
/// structurally in `ty`.
///
/// A term with no nominal parts (builtins, tuples of builtins) answers
/// `Top`: nothing in it constrains where it may be named.
pub fn type_linkage(decls: &DeclArena, types: &TyPool, ty: TyId) -> Linkage {
    let mut linkage = Linkage::Top;
    types.walk(ty, |id| match types.data(id) {
        TyData::Nominal { decl, .. } => {
            linkage = linkage.merge(decl_linkage(decls, *decl));
        }
        // Requirement clauses are not structure; the walk skips them, so
        // fold them in here.
        TyData::PolyFunction { generics, .. } => {
            linkage = linkage.merge(generic_clause_linkage(decls, types, generics));
        }
        _ => {}
    });
    linkage
}

/// Merged linkage of a generic clause: every constraint protocol and
/// superclass bound of every parameter.
fn generic_clause_linkage(
    decls: &DeclArena,
    types: &TyPool,
    generics: &[GenericParam],
) -> Linkage {
    let mut linkage = Linkage::Top;
    for param in generics {
        for &constraint in param.constraints.iter() {
            linkage = linkage.merge(type_linkage(decls, types, constraint));
        }
        if let Some(superclass) = param.superclass {
            linkage = linkage.merge(type_linkage(decls, types, superclass));
        }
    }
    linkage
}

/// Linkage of a conformance record.
///
/// Conformance tables are emitted once per conforming module, so every
/// record reports the canonical public answer for now, regardless of
/// the conforming type's own visibility. Tightening this needs a policy
/// for locally declared conformances first.
pub fn conformance_linkage(_conformance: Conformance) -> Linkage {
    Linkage::PublicUnique
}

#[cfg(test)]
mod tests;
