//! Hash-consed type pool.
//!
//! Owns every canonical type in a compilation and deduplicates on
//! intern, so structural equality collapses to `TyId` equality. Also
//! holds the declared-interface-type side table (`DeclId -> TyId`)
//! consulted by the symbol mangler.
//!
//! Building is `&mut` (single-threaded construction phase); all queries
//! take `&self` and may run concurrently once building is done.

use crate::data::TyData;
use crate::idx::TyId;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tarn_ast::DeclId;

use crate::data::{BuiltinTy, GenericParam};

/// Hash-consed storage for canonical types.
pub struct TyPool {
    /// Type data, indexed by `TyId`.
    types: Vec<TyData>,
    /// Map from type data to index for deduplication.
    map: FxHashMap<TyData, u32>,
    /// Declared interface types, keyed by declaration.
    decl_tys: FxHashMap<DeclId, TyId>,
}

impl TyPool {
    /// Create a new pool with builtins pre-interned at their fixed
    /// [`TyId`] constants.
    pub fn new() -> Self {
        let mut pool = TyPool {
            types: Vec::with_capacity(64),
            map: FxHashMap::default(),
            decl_tys: FxHashMap::default(),
        };

        let builtins = [
            TyData::Builtin(BuiltinTy::Int64),      // 0 = TyId::INT64
            TyData::Builtin(BuiltinTy::Float64),    // 1 = TyId::FLOAT64
            TyData::Builtin(BuiltinTy::Word),       // 2 = TyId::WORD
            TyData::Builtin(BuiltinTy::RawPointer), // 3 = TyId::RAW_POINTER
        ];
        for (idx, data) in builtins.into_iter().enumerate() {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "builtin count is fixed and small"
            )]
            let idx_u32 = idx as u32;
            pool.map.insert(data.clone(), idx_u32);
            pool.types.push(data);
        }
        debug_assert_eq!(pool.types.len(), TyId::FIRST_DYNAMIC as usize);

        pool
    }

    /// Intern type data, returning the canonical id.
    ///
    /// Equal structure always returns the same id.
    ///
    /// # Panics
    /// Panics if the pool exceeds u32 capacity.
    pub fn intern(&mut self, data: TyData) -> TyId {
        if let Some(&idx) = self.map.get(&data) {
            return TyId::from_raw(idx);
        }
        let idx = u32::try_from(self.types.len())
            .unwrap_or_else(|_| panic!("type pool exceeded u32 capacity"));
        self.map.insert(data.clone(), idx);
        self.types.push(data);
        TyId::from_raw(idx)
    }

    /// Look up the structural data for an id.
    #[inline]
    pub fn data(&self, id: TyId) -> &TyData {
        &self.types[id.index()]
    }

    // ── Convenience constructors ────────────────────────────────

    /// Non-generic nominal type.
    pub fn nominal(&mut self, decl: DeclId) -> TyId {
        self.intern(TyData::Nominal {
            decl,
            args: Box::from([]),
        })
    }

    /// Bound-generic nominal type.
    pub fn bound_nominal(&mut self, decl: DeclId, args: &[TyId]) -> TyId {
        self.intern(TyData::Nominal {
            decl,
            args: args.into(),
        })
    }

    pub fn tuple(&mut self, elems: &[TyId]) -> TyId {
        self.intern(TyData::Tuple(elems.into()))
    }

    pub fn function(&mut self, params: &[TyId], result: TyId) -> TyId {
        self.intern(TyData::Function {
            params: params.into(),
            result,
        })
    }

    pub fn poly_function(
        &mut self,
        params: &[TyId],
        result: TyId,
        generics: &[GenericParam],
    ) -> TyId {
        self.intern(TyData::PolyFunction {
            params: params.into(),
            result,
            generics: generics.into(),
        })
    }

    pub fn address(&mut self, pointee: TyId) -> TyId {
        self.intern(TyData::Address(pointee))
    }

    // ── Declared interface types ────────────────────────────────

    /// Record a declaration's resolved interface type.
    pub fn set_decl_ty(&mut self, decl: DeclId, ty: TyId) {
        self.decl_tys.insert(decl, ty);
    }

    /// A declaration's resolved interface type, when one was recorded.
    #[inline]
    pub fn decl_ty(&self, decl: DeclId) -> Option<TyId> {
        self.decl_tys.get(&decl).copied()
    }

    // ── Traversal ───────────────────────────────────────────────

    /// Visit `root` and every structural subterm, once per occurrence.
    ///
    /// Structural subterms are nominal generic arguments, tuple
    /// elements, function parameters and results, and address pointees.
    /// Generic-parameter constraint lists are requirement clauses, not
    /// structure, and are **not** visited; callers that care about them
    /// handle `PolyFunction` nodes explicitly.
    ///
    /// Visit order is unspecified.
    pub fn walk<F: FnMut(TyId)>(&self, root: TyId, mut visit: F) {
        let mut stack: SmallVec<[TyId; 16]> = SmallVec::new();
        stack.push(root);
        while let Some(id) = stack.pop() {
            visit(id);
            match self.data(id) {
                TyData::Builtin(_) => {}
                TyData::Nominal { args, .. } => stack.extend(args.iter().copied()),
                TyData::Tuple(elems) => stack.extend(elems.iter().copied()),
                TyData::Function { params, result }
                | TyData::PolyFunction { params, result, .. } => {
                    stack.extend(params.iter().copied());
                    stack.push(*result);
                }
                TyData::Address(pointee) => stack.push(*pointee),
            }
        }
    }
}

impl Default for TyPool {
    fn default() -> Self {
        Self::new()
    }
}
