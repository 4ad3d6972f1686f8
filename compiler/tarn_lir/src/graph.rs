//! Def-use value graph.
//!
//! The structural core of a lowered module: values and the instructions
//! that define them, flattened into id-indexed arenas. Every instruction
//! yields exactly one value, so def-use edges are plain [`ValueId`]s in
//! operand slots and the graph needs no separate edge storage.
//!
//! Two id spaces share [`ValueId`]: graph-resident values (arguments and
//! instruction results) occupy the low range, and module-owned undef
//! placeholders are tagged in the high bit so they can flow through
//! operand slots without an entry in any graph. See
//! [`LirModule::undef`](crate::LirModule::undef).

use smallvec::SmallVec;
use std::fmt;
use tarn_types::TyId;

// ── ID newtypes ─────────────────────────────────────────────────────

/// Value ID within a [`ValueGraph`], or a tagged undef placeholder.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct ValueId(u32);

impl ValueId {
    const UNDEF_BIT: u32 = 1 << 31;

    /// Create a graph-resident value ID from a raw index.
    ///
    /// # Panics
    /// Panics if `raw` collides with the undef tag bit.
    #[inline]
    pub fn new(raw: u32) -> Self {
        assert!(raw < Self::UNDEF_BIT, "value index overflows into undef tag");
        Self(raw)
    }

    /// Get the raw `u32` value, tag bit included.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Get the graph index as `usize` (for indexing into `Vec`s).
    #[inline]
    pub fn index(self) -> usize {
        debug_assert!(!self.is_undef(), "undef placeholder has no graph index");
        self.0 as usize
    }

    /// Whether this id names a module-owned undef placeholder.
    #[inline]
    pub fn is_undef(self) -> bool {
        self.0 & Self::UNDEF_BIT != 0
    }

    /// Tag an undef-table index as a value id.
    #[inline]
    pub(crate) fn from_undef_index(index: u32) -> Self {
        assert!(index < Self::UNDEF_BIT, "undef index overflows tag space");
        Self(index | Self::UNDEF_BIT)
    }

    /// The undef-table index behind a tagged id.
    ///
    /// # Panics
    /// Panics if this id is graph-resident.
    #[inline]
    pub fn undef_index(self) -> usize {
        assert!(self.is_undef(), "graph-resident value has no undef index");
        (self.0 & !Self::UNDEF_BIT) as usize
    }
}

impl fmt::Debug for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_undef() {
            write!(f, "ValueId::undef({})", self.undef_index())
        } else {
            write!(f, "ValueId({})", self.0)
        }
    }
}

/// Instruction ID within a [`ValueGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct InstId(u32);

impl InstId {
    /// Create a new instruction ID from a raw index.
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw `u32` value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Get the index as `usize` (for indexing into `Vec`s).
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// ── Graph data ──────────────────────────────────────────────────────

/// What defines a graph-resident value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueData {
    /// Entry argument, typed at creation.
    Argument { ty: TyId },
    /// The single result of an instruction.
    Result { inst: InstId },
}

/// Instruction payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstKind {
    /// Reserve a stack slot; the result is the slot's address.
    AllocStack,
    /// Read the value stored at the address in operand 0.
    Load,
    /// Call operand 0 with the remaining operands.
    Apply,
    /// Aggregate a struct value from its field operands.
    Struct,
    /// Aggregate a tuple value from its element operands.
    Tuple,
    /// Address of one field of a struct, from the struct's address.
    StructFieldAddr { field: u32 },
    /// Address of one element of a tuple, from the tuple's address.
    TupleElementAddr { index: u32 },
    /// Address of one stored property, from a class instance reference.
    ClassPropertyAddr { property: u32 },
}

impl InstKind {
    /// Whether this instruction derives the address of a sub-element of
    /// its sole operand.
    #[inline]
    pub fn is_address_projection(self) -> bool {
        matches!(
            self,
            InstKind::StructFieldAddr { .. }
                | InstKind::TupleElementAddr { .. }
                | InstKind::ClassPropertyAddr { .. }
        )
    }
}

/// One instruction: payload, operand values, and its result type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstData {
    pub kind: InstKind,
    pub operands: SmallVec<[ValueId; 2]>,
    pub result_ty: TyId,
}

// ── Graph ───────────────────────────────────────────────────────────

/// Value and instruction arenas of one lowered body.
///
/// Build with [`add_argument`](Self::add_argument) and
/// [`add_inst`](Self::add_inst); operands must already exist when an
/// instruction is added, so def-use edges always point backwards and
/// projection chains cannot cycle.
pub struct ValueGraph {
    values: Vec<ValueData>,
    insts: Vec<InstData>,
    /// Result value of each instruction, indexed by [`InstId`].
    results: Vec<ValueId>,
}

fn next_raw(len: usize, what: &str) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("{what} arena exceeded u32 capacity"))
}

impl ValueGraph {
    pub fn new() -> Self {
        ValueGraph {
            values: Vec::new(),
            insts: Vec::new(),
            results: Vec::new(),
        }
    }

    // ── Builders ────────────────────────────────────────────────

    fn push_value(&mut self, data: ValueData) -> ValueId {
        let id = ValueId::new(next_raw(self.values.len(), "value"));
        self.values.push(data);
        id
    }

    /// Add an entry argument of type `ty`.
    pub fn add_argument(&mut self, ty: TyId) -> ValueId {
        self.push_value(ValueData::Argument { ty })
    }

    /// Add an instruction and return its result value.
    ///
    /// # Panics
    /// Panics if an operand is neither an undef placeholder nor an
    /// existing graph value, or if an address projection is given
    /// anything but exactly one operand.
    pub fn add_inst(&mut self, kind: InstKind, operands: &[ValueId], result_ty: TyId) -> ValueId {
        for &op in operands {
            assert!(
                op.is_undef() || op.index() < self.values.len(),
                "operand {op:?} is not defined in this graph"
            );
        }
        if kind.is_address_projection() {
            assert!(
                operands.len() == 1,
                "address projection takes exactly one operand"
            );
        }
        let inst = InstId::new(next_raw(self.insts.len(), "instruction"));
        self.insts.push(InstData {
            kind,
            operands: SmallVec::from_slice(operands),
            result_ty,
        });
        let result = self.push_value(ValueData::Result { inst });
        self.results.push(result);
        result
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Defining data of a graph-resident value.
    ///
    /// # Panics
    /// Panics if `value` is an undef placeholder; those live in the
    /// owning module, not in any graph.
    #[inline]
    pub fn value(&self, value: ValueId) -> &ValueData {
        assert!(!value.is_undef(), "undef placeholders are module-owned");
        &self.values[value.index()]
    }

    #[inline]
    pub fn inst(&self, inst: InstId) -> &InstData {
        &self.insts[inst.index()]
    }

    /// The instruction defining `value`. `None` for arguments and undef
    /// placeholders.
    pub fn defining_inst(&self, value: ValueId) -> Option<InstId> {
        if value.is_undef() {
            return None;
        }
        match *self.value(value) {
            ValueData::Argument { .. } => None,
            ValueData::Result { inst } => Some(inst),
        }
    }

    /// The result value of an instruction.
    #[inline]
    pub fn inst_result(&self, inst: InstId) -> ValueId {
        self.results[inst.index()]
    }

    /// Operand `n` of an instruction.
    #[inline]
    pub fn operand(&self, inst: InstId, n: usize) -> ValueId {
        self.insts[inst.index()].operands[n]
    }

    /// Type of a graph-resident value.
    ///
    /// # Panics
    /// Panics if `value` is an undef placeholder; ask the owning module
    /// via [`LirModule::value_ty`](crate::LirModule::value_ty) instead.
    pub fn value_ty(&self, value: ValueId) -> TyId {
        match *self.value(value) {
            ValueData::Argument { ty } => ty,
            ValueData::Result { inst } => self.inst(inst).result_ty,
        }
    }

    /// Whether `value` is the result of an address projection.
    pub fn is_address_projection(&self, value: ValueId) -> bool {
        self.defining_inst(value)
            .is_some_and(|inst| self.inst(inst).kind.is_address_projection())
    }

    pub fn num_values(&self) -> usize {
        self.values.len()
    }

    pub fn num_insts(&self) -> usize {
        self.insts.len()
    }

    /// All instruction ids, in definition order.
    pub fn inst_ids(&self) -> impl Iterator<Item = InstId> + '_ {
        (0..next_raw(self.insts.len(), "instruction")).map(InstId::new)
    }

    // ── Mutation ────────────────────────────────────────────────

    /// Rewrite every operand slot reading `old` to read `new`, and
    /// return how many slots changed.
    ///
    /// Definitions are untouched; `old` keeps its defining instruction
    /// or argument entry and simply loses its uses. Either id may be an
    /// undef placeholder, which is how dead values are detached before
    /// their definitions are dropped.
    ///
    /// # Panics
    /// Panics if `old` and `new` are the same value.
    pub fn replace_all_uses(&mut self, old: ValueId, new: ValueId) -> usize {
        assert!(old != new, "replacing a value with itself");
        let mut rewritten = 0usize;
        for inst in &mut self.insts {
            for slot in &mut inst.operands {
                if *slot == old {
                    *slot = new;
                    rewritten += 1;
                }
            }
        }
        tracing::debug!(
            old = old.raw(),
            new = new.raw(),
            rewritten,
            "replaced value uses"
        );
        rewritten
    }

    // ── Validation ──────────────────────────────────────────────

    /// Check structural invariants in debug builds.
    ///
    /// Cheap enough to call after any batch of graph surgery: verifies
    /// operand ids resolve, projection arity holds, and the value and
    /// instruction arenas agree on result links.
    pub fn debug_validate(&self) {
        debug_assert_eq!(
            self.results.len(),
            self.insts.len(),
            "one result value per instruction"
        );
        for inst in self.inst_ids() {
            let data = self.inst(inst);
            for &op in &data.operands {
                debug_assert!(
                    op.is_undef() || op.index() < self.values.len(),
                    "operand {op:?} is not defined in this graph"
                );
            }
            if data.kind.is_address_projection() {
                debug_assert_eq!(
                    data.operands.len(),
                    1,
                    "address projection takes exactly one operand"
                );
            }
            let result = self.inst_result(inst);
            debug_assert_eq!(
                *self.value(result),
                ValueData::Result { inst },
                "result link out of sync for {inst:?}"
            );
        }
    }
}

impl Default for ValueGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
