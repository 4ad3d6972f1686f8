//! Lowered-IR identity and structural analysis for the Tarn compiler.
//!
//! This crate sits between declaration checking ([`tarn_ast`]) and code
//! generation. It answers the questions every backend stage asks about a
//! lowered entity:
//!
//! - **Which entity?** [`EntityRef`] names one concrete lowered variant of
//!   a declaration or closure (allocating vs. initializing constructor,
//!   getter vs. setter, curried partial application, foreign thunk).
//! - **What is it called?** [`encode_symbol_name`] turns an [`EntityRef`]
//!   into its linker symbol, delegating to [`tarn_mangle`].
//! - **Who can see it?** [`Linkage`] and its resolvers place declarations,
//!   types, and conformances on the visibility lattice.
//! - **How was it derived?** [`find_address_projection_path`] recovers the
//!   chain of structural address steps between two values of a
//!   [`ValueGraph`].
//!
//! [`LirModule`] ties the pieces together and owns per-module uniquing
//! state such as the undef placeholder table.

pub mod entity;
pub mod graph;
pub mod linkage;
pub mod module;
pub mod projection;
pub mod symbol;

#[cfg(test)]
mod test_helpers;

pub use entity::{EntityKind, EntityOrigin, EntityRef};
pub use graph::{InstData, InstId, InstKind, ValueData, ValueGraph, ValueId};
pub use linkage::{conformance_linkage, decl_linkage, type_linkage, Linkage};
pub use module::LirModule;
pub use projection::{find_address_projection_path, Projection};
pub use symbol::{encode_symbol_name, symbol_name, RAW_SYMBOL_MARKER};

// Callers of `encode_symbol_name` need the expansion mode by name.
pub use tarn_mangle::ResilienceMode;
