//! Structural type data.
//!
//! `TyData` is the payload behind a [`TyId`]: what the type *is*, with
//! children referenced by id. Values are interned by the pool, so the
//! derive set mirrors an interner key (Eq + Hash, no interior
//! mutability).

use crate::idx::TyId;
use tarn_ast::{DeclId, Name};

/// Builtin machine-level types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum BuiltinTy {
    Int64,
    Float64,
    Word,
    RawPointer,
}

/// A generic parameter in a polymorphic function signature.
///
/// `constraints` are protocol types the parameter must conform to;
/// `superclass` is a class bound. Both are *requirements*, not
/// structural components: the pool's [`walk`](crate::TyPool::walk) does
/// not descend into them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct GenericParam {
    pub name: Name,
    pub constraints: Box<[TyId]>,
    pub superclass: Option<TyId>,
}

/// Structural data for a single canonical type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum TyData {
    Builtin(BuiltinTy),
    /// Reference to a nominal type declaration (struct, class, enum, or
    /// protocol), with generic arguments when bound.
    Nominal { decl: DeclId, args: Box<[TyId]> },
    Tuple(Box<[TyId]>),
    Function {
        params: Box<[TyId]>,
        result: TyId,
    },
    /// Generic function type. The generic clause rides alongside the
    /// monomorphic shape rather than inside it.
    PolyFunction {
        params: Box<[TyId]>,
        result: TyId,
        generics: Box<[GenericParam]>,
    },
    /// Address-of-T, the lowered IR's storage view of T.
    Address(TyId),
}

/// Record that a type conforms to a protocol.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Conformance {
    pub ty: TyId,
    pub protocol: DeclId,
}
