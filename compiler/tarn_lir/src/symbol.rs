//! Symbol names for entity references.
//!
//! The linker-visible spelling of an [`EntityRef`]. Almost every symbol
//! is an introducer plus a mangled entity:
//!
//! ```text
//! symbol ::= '_T' entity       native entry point
//! symbol ::= '_TTo' entity     host-callable interop thunk
//! symbol ::= '_TTO' entity     native thunk over a host-defined body
//! ```
//!
//! Exactly one introducer applies to any reference: the interop thunk
//! wins when the reference is foreign, and a reference is only ever a
//! foreign-body thunk when it is *not* foreign.
//!
//! Two escapes bypass mangling for uncurried, non-thunk references: a
//! pinned symbol override is emitted verbatim, and a host-defined body
//! keeps its host-side name, fronted by [`RAW_SYMBOL_MARKER`] when the
//! host interface pins an asm label.

use tarn_ast::{DeclArena, DeclId};
use tarn_mangle::{Mangler, ResilienceMode};
use tarn_types::TyPool;

use crate::entity::{EntityKind, EntityOrigin, EntityRef};

/// Marker byte telling the assembler the label that follows is verbatim
/// and must reach the object file untouched.
pub const RAW_SYMBOL_MARKER: char = '\x01';

const NATIVE: &str = "_T";
const INTEROP_THUNK: &str = "_TTo";
const FOREIGN_BODY_THUNK: &str = "_TTO";

/// Append the symbol name of `entity` to `buffer`.
///
/// Deterministic: the same reference always encodes to the same bytes,
/// and distinct references encode to distinct symbols.
///
/// # Panics
/// Panics if `buffer` is not empty, or if `entity` violates a kind
/// contract (for example a closure-anchored destructor reference).
pub fn encode_symbol_name(
    entity: EntityRef,
    decls: &DeclArena,
    types: &TyPool,
    expansion: ResilienceMode,
    buffer: &mut String,
) {
    assert!(buffer.is_empty(), "symbol buffer must start empty");

    let introducer = if entity.is_foreign() {
        INTEROP_THUNK
    } else if entity.is_foreign_thunk(decls) {
        FOREIGN_BODY_THUNK
    } else {
        NATIVE
    };

    match entity.kind() {
        EntityKind::Func => match entity.origin() {
            EntityOrigin::Closure(closure) => {
                buffer.push_str(introducer);
                Mangler::new(buffer, decls, types, expansion)
                    .mangle_closure_entity(closure, entity.curry_level());
            }
            EntityOrigin::Decl(decl) => {
                let d = decls.decl(decl);
                // Pinned names serve the original entry point only, and
                // are absolute: no introducer.
                if let Some(symbol) = d.symbol_override {
                    if !entity.is_foreign_thunk(decls) && !entity.is_curried() {
                        buffer.push_str(decls.str(symbol));
                        return;
                    }
                }
                if let Some(info) = d.accessor() {
                    buffer.push_str(introducer);
                    Mangler::new(buffer, decls, types, expansion)
                        .mangle_accessor_entity(info.role, info.storage);
                    return;
                }
                encode_function_like(entity, decl, introducer, decls, types, expansion, buffer);
            }
        },
        EntityKind::EnumCase => {
            let decl = require_decl(entity);
            encode_function_like(entity, decl, introducer, decls, types, expansion, buffer);
        }
        EntityKind::Allocator | EntityKind::Initializer => {
            let decl = require_decl(entity);
            buffer.push_str(introducer);
            Mangler::new(buffer, decls, types, expansion).mangle_constructor_entity(
                decl,
                entity.kind() == EntityKind::Allocator,
                entity.curry_level(),
            );
        }
        EntityKind::Destroyer | EntityKind::Deallocator => {
            let decl = require_decl(entity);
            buffer.push_str(introducer);
            Mangler::new(buffer, decls, types, expansion)
                .mangle_destructor_entity(decl, entity.kind() == EntityKind::Deallocator);
        }
        EntityKind::IVarInitializer | EntityKind::IVarDestroyer => {
            let decl = require_decl(entity);
            buffer.push_str(introducer);
            Mangler::new(buffer, decls, types, expansion)
                .mangle_ivar_init_destroy_entity(decl, entity.kind() == EntityKind::IVarDestroyer);
        }
        EntityKind::GlobalAccessor => {
            let decl = require_decl(entity);
            buffer.push_str(introducer);
            Mangler::new(buffer, decls, types, expansion).mangle_addressor_entity(decl);
        }
        EntityKind::DefaultArgGenerator => {
            let decl = require_decl(entity);
            buffer.push_str(introducer);
            Mangler::new(buffer, decls, types, expansion)
                .mangle_default_argument_entity(decl, entity.default_arg_index());
        }
    }
}

/// One-shot convenience over [`encode_symbol_name`].
pub fn symbol_name(
    entity: EntityRef,
    decls: &DeclArena,
    types: &TyPool,
    expansion: ResilienceMode,
) -> String {
    let mut buffer = String::new();
    encode_symbol_name(entity, decls, types, expansion, &mut buffer);
    buffer
}

/// Plain function and enum case references share the general entity
/// encoding, including the host-interop bypass.
fn encode_function_like(
    entity: EntityRef,
    decl: DeclId,
    introducer: &str,
    decls: &DeclArena,
    types: &TyPool,
    expansion: ResilienceMode,
    buffer: &mut String,
) {
    // A host-defined body keeps its host-side name. Thunks and curried
    // partial applications are native bodies and still mangle.
    if let Some(info) = decls.decl(decl).foreign {
        if !entity.is_foreign_thunk(decls) && !entity.is_curried() {
            match info.asm_label {
                Some(label) => {
                    buffer.push(RAW_SYMBOL_MARKER);
                    buffer.push_str(decls.str(label));
                }
                None => buffer.push_str(decls.str(info.name)),
            }
            return;
        }
    }
    buffer.push_str(introducer);
    Mangler::new(buffer, decls, types, expansion).mangle_entity(decl, entity.curry_level());
}

fn require_decl(entity: EntityRef) -> DeclId {
    let Some(decl) = entity.decl() else {
        unreachable!("{:?} entity requires a declaration origin", entity.kind())
    };
    decl
}
