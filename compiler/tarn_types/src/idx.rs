//! Canonical type index handle.
//!
//! `TyId` is THE canonical type representation. All types live in a
//! unified pool and are referenced by their 32-bit index.
//!
//! - 32-bit indices allow 4+ billion unique types
//! - Builtin types have fixed indices for O(1) lookup
//! - Type equality is O(1) index comparison
//! - Aliases are resolved away before interning, so every `TyId` names
//!   a canonical structure

use std::fmt;

/// A 32-bit index into the type pool.
///
/// Types are compared by index equality (O(1)), not structural
/// comparison; the pool hash-conses on intern so equal structure means
/// equal index.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct TyId(u32);

impl TyId {
    // === Builtin types (indices 0-3) ===
    // Pre-interned at pool creation for O(1) access.

    /// The `Builtin.Int64` type (64-bit signed integer).
    pub const INT64: Self = Self(0);
    /// The `Builtin.Float64` type (64-bit floating point).
    pub const FLOAT64: Self = Self(1);
    /// The `Builtin.Word` type (pointer-sized unsigned integer).
    pub const WORD: Self = Self(2);
    /// The `Builtin.RawPointer` type (untyped pointer).
    pub const RAW_POINTER: Self = Self(3);

    /// Number of pre-interned builtin types.
    pub const BUILTIN_COUNT: u32 = 4;

    /// First index for dynamically allocated types.
    pub const FIRST_DYNAMIC: u32 = Self::BUILTIN_COUNT;

    /// Create an index from a raw u32 value.
    ///
    /// The caller must ensure the index is valid in the pool.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Get the index as `usize` (for indexing into pool storage).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is a builtin type (pre-interned).
    #[inline]
    pub const fn is_builtin(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }
}

impl fmt::Debug for TyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::INT64 => write!(f, "TyId::INT64"),
            Self::FLOAT64 => write!(f, "TyId::FLOAT64"),
            Self::WORD => write!(f, "TyId::WORD"),
            Self::RAW_POINTER => write!(f, "TyId::RAW_POINTER"),
            _ => write!(f, "TyId({})", self.0),
        }
    }
}

impl fmt::Display for TyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::INT64 => write!(f, "Builtin.Int64"),
            Self::FLOAT64 => write!(f, "Builtin.Float64"),
            Self::WORD => write!(f, "Builtin.Word"),
            Self::RAW_POINTER => write!(f, "Builtin.RawPointer"),
            _ => write!(f, "type#{}", self.0),
        }
    }
}

// Compile-time size assertion: TyId must be exactly 4 bytes
const _: () = assert!(std::mem::size_of::<TyId>() == 4);
