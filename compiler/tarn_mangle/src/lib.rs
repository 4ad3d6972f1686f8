//! Tarn symbol mangling - entity name encoders
//!
//! Turns declarations, closures, and derived entities (accessors,
//! constructors, destructors, ivar helpers, addressors, default-argument
//! generators) into deterministic object-file names. The lowered-IR
//! layer picks *which* encoder to call and *which* prefix to attach;
//! this crate owns the byte-exact encodings.
//!
//! Encodings are append-only writes into a caller-owned `String`, so a
//! symbol with a prefix is built by pushing the prefix and then running
//! an encoder on the same buffer.
//!
//! Every encoding is left-to-right self-delimiting (length-prefixed
//! identifiers, fixed kind letters, terminated lists), which is what
//! makes distinct entities mangle to distinct strings. See
//! [`mangler`](Mangler) for the grammar.

mod entity;
mod mangler;

pub use mangler::Mangler;

/// How much layout knowledge a reference site is allowed to assume.
///
/// Threaded through the symbol layer into the encoders for signature
/// parity; no current encoding varies by it, so the same entity gets the
/// same name at every expansion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ResilienceMode {
    /// Conservative view: only resilient knowledge of other modules.
    Minimal,
    /// Full knowledge of fragile layouts in the current build graph.
    Maximal,
}
