//! Entity references.
//!
//! One declaration fans out into several lowered entities: a constructor
//! has an allocating and an initializing entry point, a var has accessors
//! and maybe an addressor, a multi-clause function has one body per
//! partial application. [`EntityRef`] names exactly one of those
//! variants, and is the identity the rest of the backend keys on:
//! lowering maps, symbol names, and vtable slots all hang off it.
//!
//! Identity is structural. Two references built independently from the
//! same facts compare equal and hash equal, so they collapse in maps.

use tarn_ast::{ClosureId, DeclArena, DeclId, DeclKind};

/// The lowered entity variant a reference names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityKind {
    /// Plain function or closure body.
    Func,
    /// Allocating constructor entry point.
    Allocator,
    /// Initializing constructor entry point.
    Initializer,
    /// Enum case injector.
    EnumCase,
    /// Destroying destructor entry point.
    Destroyer,
    /// Deallocating destructor entry point.
    Deallocator,
    /// Helper initializing a class instance's stored properties.
    IVarInitializer,
    /// Helper destroying a class instance's stored properties.
    IVarDestroyer,
    /// Addressor of a module-scope stored var.
    GlobalAccessor,
    /// Generator computing one parameter's default value.
    DefaultArgGenerator,
}

/// What a reference is anchored to: a named declaration or an anonymous
/// closure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityOrigin {
    Decl(DeclId),
    Closure(ClosureId),
}

/// Reference to one lowered entity.
///
/// Construct through [`EntityRef::with_kind`] when the variant is known,
/// [`EntityRef::from_origin`] to get the base variant of a declaration or
/// closure, or [`EntityRef::default_arg_generator`] for default-argument
/// generators. All three enforce the curry-level contract: a reference
/// never sits above its entity's natural level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityRef {
    origin: EntityOrigin,
    kind: EntityKind,
    curry_level: u32,
    is_curried: bool,
    is_foreign: bool,
    default_arg_index: u32,
}

/// Natural curry level of a function-like body: one level per parameter
/// clause beyond the first, plus one for the capture context.
fn func_natural_level(param_clauses: u32, captures_locals: bool) -> u32 {
    assert!(param_clauses >= 1, "function with no parameter clauses");
    param_clauses - 1 + u32::from(captures_locals)
}

impl EntityRef {
    /// Shared constructor tail: resolve the requested level against the
    /// natural one and derive the curried flag.
    fn at_level(
        origin: EntityOrigin,
        kind: EntityKind,
        natural: u32,
        at_level: Option<u32>,
        is_foreign: bool,
    ) -> Self {
        let curry_level = match at_level {
            None => natural,
            Some(requested) => {
                assert!(
                    requested <= natural,
                    "requested curry level {requested} above natural level {natural}"
                );
                requested
            }
        };
        EntityRef {
            origin,
            kind,
            curry_level,
            is_curried: curry_level != natural,
            is_foreign,
            default_arg_index: 0,
        }
    }

    /// Reference a declaration as a specific entity kind.
    ///
    /// `at_level` of `None` means the entity's natural curry level.
    ///
    /// # Panics
    /// Panics if `kind` is not a variant the declaration lowers to, if
    /// `at_level` exceeds the natural level, or if a [`GlobalAccessor`]
    /// is requested for a var that is local or computed.
    ///
    /// [`GlobalAccessor`]: EntityKind::GlobalAccessor
    pub fn with_kind(
        decls: &DeclArena,
        decl: DeclId,
        kind: EntityKind,
        at_level: Option<u32>,
        is_foreign: bool,
    ) -> Self {
        let d = decls.decl(decl);
        let natural = match d.kind {
            DeclKind::Func(func) => {
                assert!(
                    kind == EntityKind::Func,
                    "a function declaration lowers only to a Func entity"
                );
                func_natural_level(func.param_clauses, d.captures_locals())
            }
            DeclKind::Constructor => {
                assert!(
                    matches!(kind, EntityKind::Allocator | EntityKind::Initializer),
                    "a constructor lowers to Allocator or Initializer entities"
                );
                1
            }
            DeclKind::Destructor => {
                assert!(
                    matches!(kind, EntityKind::Destroyer | EntityKind::Deallocator),
                    "a destructor lowers to Destroyer or Deallocator entities"
                );
                0
            }
            DeclKind::EnumCase { has_payload } => {
                assert!(
                    kind == EntityKind::EnumCase,
                    "an enum case lowers only to an EnumCase entity"
                );
                u32::from(has_payload)
            }
            DeclKind::Class => {
                assert!(
                    matches!(kind, EntityKind::IVarInitializer | EntityKind::IVarDestroyer),
                    "a class declaration anchors only ivar init/destroy entities"
                );
                1
            }
            DeclKind::Var => {
                assert!(
                    kind == EntityKind::GlobalAccessor,
                    "a var declaration anchors only a GlobalAccessor entity"
                );
                assert!(
                    !decls.is_in_local_context(decl),
                    "global accessor for a local var"
                );
                assert!(d.has_storage(), "global accessor for a computed var");
                0
            }
            DeclKind::Struct | DeclKind::Enum | DeclKind::Protocol => {
                unreachable!("no lowered entity for a bare nominal declaration")
            }
        };
        Self::at_level(EntityOrigin::Decl(decl), kind, natural, at_level, is_foreign)
    }

    /// Reference the base entity of a declaration or closure.
    ///
    /// Each origin has one base variant: functions and closures are
    /// `Func`, constructors are `Allocator` (with the foreign flag
    /// forced off; the allocating entry point is never itself foreign),
    /// enum cases are `EnumCase`, destructors are `Deallocator`. Vars
    /// have no base variant and must go through
    /// [`EntityRef::with_kind`].
    ///
    /// # Panics
    /// Panics if the origin is a var or bare nominal declaration, or if
    /// `at_level` exceeds the natural level.
    pub fn from_origin(
        decls: &DeclArena,
        origin: EntityOrigin,
        at_level: Option<u32>,
        is_foreign: bool,
    ) -> Self {
        match origin {
            EntityOrigin::Decl(decl) => {
                let d = decls.decl(decl);
                let (kind, natural, is_foreign) = match d.kind {
                    DeclKind::Func(func) => (
                        EntityKind::Func,
                        func_natural_level(func.param_clauses, d.captures_locals()),
                        is_foreign,
                    ),
                    DeclKind::Constructor => (EntityKind::Allocator, 1, false),
                    DeclKind::Destructor => (EntityKind::Deallocator, 0, is_foreign),
                    DeclKind::EnumCase { has_payload } => {
                        (EntityKind::EnumCase, u32::from(has_payload), is_foreign)
                    }
                    DeclKind::Var => {
                        unreachable!("a var base needs an explicit GlobalAccessor kind")
                    }
                    DeclKind::Struct | DeclKind::Class | DeclKind::Enum | DeclKind::Protocol => {
                        unreachable!("no lowered entity for a bare nominal declaration")
                    }
                };
                Self::at_level(origin, kind, natural, at_level, is_foreign)
            }
            EntityOrigin::Closure(closure) => {
                let c = decls.closure(closure);
                let natural = func_natural_level(c.param_clauses, c.captures_locals);
                Self::at_level(origin, EntityKind::Func, natural, at_level, is_foreign)
            }
        }
    }

    /// Reference the generator for one parameter's default value.
    ///
    /// Generators take no arguments and are never curried or foreign.
    pub fn default_arg_generator(origin: EntityOrigin, index: u32) -> Self {
        EntityRef {
            origin,
            kind: EntityKind::DefaultArgGenerator,
            curry_level: 0,
            is_curried: false,
            is_foreign: false,
            default_arg_index: index,
        }
    }

    // ── Queries ─────────────────────────────────────────────────

    #[inline]
    pub fn kind(self) -> EntityKind {
        self.kind
    }

    #[inline]
    pub fn origin(self) -> EntityOrigin {
        self.origin
    }

    /// Number of argument clauses this reference has already bound.
    #[inline]
    pub fn curry_level(self) -> u32 {
        self.curry_level
    }

    /// Whether this reference sits below its entity's natural level.
    #[inline]
    pub fn is_curried(self) -> bool {
        self.is_curried
    }

    /// Whether this names the host-callable interop thunk variant.
    #[inline]
    pub fn is_foreign(self) -> bool {
        self.is_foreign
    }

    #[inline]
    pub fn has_decl(self) -> bool {
        matches!(self.origin, EntityOrigin::Decl(_))
    }

    /// The anchoring declaration, when the origin is one.
    #[inline]
    pub fn decl(self) -> Option<DeclId> {
        match self.origin {
            EntityOrigin::Decl(decl) => Some(decl),
            EntityOrigin::Closure(_) => None,
        }
    }

    /// The anchoring closure, when the origin is one.
    #[inline]
    pub fn closure(self) -> Option<ClosureId> {
        match self.origin {
            EntityOrigin::Decl(_) => None,
            EntityOrigin::Closure(closure) => Some(closure),
        }
    }

    /// Whether calls to this entity inline its body at every expansion.
    ///
    /// Enum case injectors are unconditionally transparent. Closures
    /// never are; declarations answer from their attribute bit.
    pub fn is_transparent(self, decls: &DeclArena) -> bool {
        if self.kind == EntityKind::EnumCase {
            return true;
        }
        match self.origin {
            EntityOrigin::Decl(decl) => decls.decl(decl).is_transparent(),
            EntityOrigin::Closure(_) => false,
        }
    }

    /// Whether this reference is the native thunk in front of a body the
    /// host language defines.
    ///
    /// True only for a non-foreign reference to a plain function backed
    /// by host interop facts. The foreign reference to the same
    /// declaration is the host entry point itself, not a thunk.
    pub fn is_foreign_thunk(self, decls: &DeclArena) -> bool {
        let Some(decl) = self.decl() else {
            return false;
        };
        let d = decls.decl(decl);
        matches!(d.kind, DeclKind::Func(_)) && d.foreign.is_some() && !self.is_foreign
    }

    /// Which parameter's default value this generator computes.
    ///
    /// # Panics
    /// Panics if this reference is not a default-argument generator.
    pub fn default_arg_index(self) -> u32 {
        assert!(
            self.kind == EntityKind::DefaultArgGenerator,
            "default-argument index of a non-generator reference"
        );
        self.default_arg_index
    }
}

#[cfg(test)]
mod tests;
