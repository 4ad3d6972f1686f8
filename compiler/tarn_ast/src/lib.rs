//! Tarn AST - Declaration Facts
//!
//! This crate contains the declaration-side data the lowered-IR layer
//! consumes:
//! - Names for interned identifiers
//! - Declarations, closures, and module units in a flat arena
//! - Enclosing-context chains (module / nominal / function / closure)
//! - Attribute facts (transparency, storage, captures, interop, symbol
//!   overrides)
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: Strings → Name(u32)
//! - **Flatten Everything**: No `Box<Decl>`, use `DeclId(u32)` indices
//! - **Facts, not syntax**: downstream layers ask questions (`is this
//!   context local?`, `which module does this chain end in?`) and never
//!   see source structure

mod decl;
mod interner;
mod name;

pub use decl::{
    AccessorInfo, AccessorRole, Closure, ClosureId, Decl, DeclArena, DeclContext, DeclFlags,
    DeclId, DeclKind, ForeignInfo, FuncDecl, ModuleId, ModuleKind, ModuleUnit,
};
pub use interner::{InternError, NameInterner};
pub use name::Name;
