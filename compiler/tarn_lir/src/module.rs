//! Module-level container for lowered state.
//!
//! [`LirModule`] owns one value graph plus the uniquing tables whose
//! lifetime is the module, not any single body. Today that is the undef
//! table: one placeholder value per type, minted lazily, shared by every
//! use site in the module.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tarn_ast::Name;
use tarn_types::TyId;

use crate::graph::{ValueGraph, ValueId};

/// Uniquing table for per-type undef placeholders.
struct UndefTable {
    by_ty: FxHashMap<TyId, ValueId>,
    /// Reverse lookup, indexed by the id's undef index.
    types: Vec<TyId>,
}

/// One lowered module.
///
/// The undef table sits behind an `RwLock` so analyses holding `&self`
/// can mint placeholders concurrently; see [`undef`](Self::undef).
pub struct LirModule {
    pub name: Name,
    pub graph: ValueGraph,
    undefs: RwLock<UndefTable>,
}

impl LirModule {
    pub fn new(name: Name) -> Self {
        LirModule {
            name,
            graph: ValueGraph::new(),
            undefs: RwLock::new(UndefTable {
                by_ty: FxHashMap::default(),
                types: Vec::new(),
            }),
        }
    }

    /// The module's undef placeholder of type `ty`.
    ///
    /// Created on first request and never evicted: every call with the
    /// same type returns the same id, so undefs compare equal exactly
    /// when their types do. Callable through a shared reference.
    pub fn undef(&self, ty: TyId) -> ValueId {
        // Fast path: already minted.
        {
            let table = self.undefs.read();
            if let Some(&id) = table.by_ty.get(&ty) {
                return id;
            }
        }

        let mut table = self.undefs.write();
        // Re-check: another writer may have won the race.
        if let Some(&id) = table.by_ty.get(&ty) {
            return id;
        }
        let index = u32::try_from(table.types.len())
            .unwrap_or_else(|_| panic!("undef table exceeded u32 capacity"));
        let id = ValueId::from_undef_index(index);
        table.types.push(ty);
        table.by_ty.insert(ty, id);
        tracing::debug!(ty = ty.raw(), index, "minted undef placeholder");
        id
    }

    /// The type of an undef placeholder minted by this module.
    ///
    /// # Panics
    /// Panics if `value` is graph-resident rather than an undef id.
    pub fn undef_ty(&self, value: ValueId) -> TyId {
        self.undefs.read().types[value.undef_index()]
    }

    /// Number of distinct undef placeholders minted so far.
    pub fn num_undefs(&self) -> usize {
        self.undefs.read().types.len()
    }

    /// Type of any value in this module, graph-resident or undef.
    pub fn value_ty(&self, value: ValueId) -> TyId {
        if value.is_undef() {
            self.undef_ty(value)
        } else {
            self.graph.value_ty(value)
        }
    }
}
