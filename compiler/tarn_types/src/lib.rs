//! Tarn type system - canonical type pool
//!
//! Canonical, hash-consed type storage for the Tarn compiler:
//! - [`TyId`] — 32-bit canonical type handle, O(1) equality
//! - [`TyData`] — structural payload (builtin, nominal, tuple, function,
//!   polymorphic function, address)
//! - [`TyPool`] — intern + lookup + structural traversal, plus the
//!   declared-interface-type side table
//! - [`Conformance`] — type-conforms-to-protocol records
//!
//! Aliases never reach this crate: earlier phases resolve them, so every
//! id here names canonical structure and traversals cannot see the same
//! spelling twice.

mod data;
mod idx;
mod pool;

pub use data::{BuiltinTy, Conformance, GenericParam, TyData};
pub use idx::TyId;
pub use pool::TyPool;
