//! Declaration facts consumed by the lowered-IR layer.
//!
//! The lowered IR never sees syntax. It consumes a narrow set of facts
//! about declarations: what kind of declaration, where it lives (the
//! enclosing-context chain), how many parameter clauses, and which
//! attributes apply. This module is the arena that owns those facts.
//!
//! # Architecture
//!
//! - **[`DeclArena`]** — flat storage for [`Decl`], [`Closure`], and
//!   [`ModuleUnit`], plus the name interner
//! - **[`DeclContext`]** — parent link; every chain ends at a module unit
//! - **[`DeclId`] / [`ClosureId`] / [`ModuleId`]** — sequential u32 handles
//!
//! Declarations are produced by earlier phases (and by tests) through the
//! `add_*` builders; this layer only reads them back.

use crate::name::Name;
use crate::NameInterner;
use bitflags::bitflags;

// ── ID newtypes ─────────────────────────────────────────────────────

/// Declaration ID within a [`DeclArena`].
///
/// IDs are allocated sequentially starting from 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct DeclId(u32);

impl DeclId {
    /// Create a new declaration ID from a raw index.
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

/// Closure ID within a [`DeclArena`].
///
/// Closures are anonymous, so the raw index doubles as the closure's
/// discriminator in mangled symbol names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct ClosureId(u32);

impl ClosureId {
    /// Create a new closure ID from a raw index.
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

/// Module unit ID within a [`DeclArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct ModuleId(u32);

impl ModuleId {
    /// Create a new module ID from a raw index.
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

// ── Module units ────────────────────────────────────────────────────

/// How a module unit entered the build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ModuleKind {
    /// Compiled from Tarn source in this build graph.
    Native,
    /// Imported from a host-language interface; bodies live elsewhere and
    /// may be instantiated by any client, so nothing in it is unique.
    Foreign,
}

/// A single module unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ModuleUnit {
    pub name: Name,
    pub kind: ModuleKind,
}

impl ModuleUnit {
    /// Whether this unit was imported from a host-language interface.
    #[inline]
    pub fn is_foreign(&self) -> bool {
        self.kind == ModuleKind::Foreign
    }
}

// ── Contexts ────────────────────────────────────────────────────────

/// The context a declaration is nested in.
///
/// Chains are walked outward via [`DeclArena::parent_context`]; every
/// well-formed chain terminates at `Module`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum DeclContext {
    /// Module scope.
    Module(ModuleId),
    /// Inside a nominal type body (struct, class, enum, protocol).
    Nominal(DeclId),
    /// Inside a function body.
    Function(DeclId),
    /// Inside a closure body.
    Closure(ClosureId),
}

impl DeclContext {
    /// Whether this context is local (a function or closure body).
    #[inline]
    pub fn is_local(self) -> bool {
        matches!(self, DeclContext::Function(_) | DeclContext::Closure(_))
    }

    /// Whether this context is module scope.
    #[inline]
    pub fn is_module_scope(self) -> bool {
        matches!(self, DeclContext::Module(_))
    }
}

// ── Accessors ───────────────────────────────────────────────────────

/// Which accessor of a storage declaration a function implements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum AccessorRole {
    Getter,
    Setter,
    /// Observer running before a stored value is replaced.
    WillSet,
    /// Observer running after a stored value is replaced.
    DidSet,
}

/// Accessor facts attached to a function declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct AccessorInfo {
    pub role: AccessorRole,
    /// The var declaration this accessor belongs to. Symbols are minted
    /// from the storage, not from the accessor function itself.
    pub storage: DeclId,
}

// ── Declarations ────────────────────────────────────────────────────

/// Function-specific declaration facts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct FuncDecl {
    /// Number of parameter clauses, including the `self` clause for
    /// methods. Always at least 1.
    pub param_clauses: u32,
    /// Present when this function is an accessor of a var declaration.
    pub accessor: Option<AccessorInfo>,
}

/// The kind of a declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum DeclKind {
    Func(FuncDecl),
    /// Type constructor, declared inside a nominal type.
    Constructor,
    /// Class destructor.
    Destructor,
    EnumCase {
        /// Whether the case carries a payload. Payload cases behave like
        /// single-clause functions from the injector's point of view.
        has_payload: bool,
    },
    Var,
    Struct,
    Class,
    Enum,
    Protocol,
}

impl DeclKind {
    /// Whether this declaration introduces a nominal type.
    #[inline]
    pub fn is_nominal(self) -> bool {
        matches!(
            self,
            DeclKind::Struct | DeclKind::Class | DeclKind::Enum | DeclKind::Protocol
        )
    }
}

bitflags! {
    /// Attribute bits consulted by the lowered-IR layer.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct DeclFlags: u8 {
        /// Body is exposed to clients and inlined at every expansion.
        const TRANSPARENT = 1 << 0;
        /// Var declaration owns physical storage (not computed).
        const HAS_STORAGE = 1 << 1;
        /// Function captures state from an enclosing local scope.
        const CAPTURES_LOCALS = 1 << 2;
    }
}

/// Interop facts for a declaration whose body is defined by the host
/// language rather than by Tarn source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ForeignInfo {
    /// The declaration's name in the host interface.
    pub name: Name,
    /// Host-side assembly label, when the interface pins one. Labels
    /// bypass all mangling and must reach the object file untouched.
    pub asm_label: Option<Name>,
}

/// A single declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Decl {
    pub name: Name,
    pub context: DeclContext,
    pub kind: DeclKind,
    pub flags: DeclFlags,
    /// Verbatim symbol name pinned by an attribute. Overrides mangling
    /// entirely for uncurried, non-thunk references.
    pub symbol_override: Option<Name>,
    /// Present when the body is defined by the host language.
    pub foreign: Option<ForeignInfo>,
}

impl Decl {
    /// Whether the body is inlined into clients at every expansion.
    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.flags.contains(DeclFlags::TRANSPARENT)
    }

    /// Whether a var declaration owns physical storage.
    #[inline]
    pub fn has_storage(&self) -> bool {
        self.flags.contains(DeclFlags::HAS_STORAGE)
    }

    /// Whether a function captures state from an enclosing local scope.
    #[inline]
    pub fn captures_locals(&self) -> bool {
        self.flags.contains(DeclFlags::CAPTURES_LOCALS)
    }

    /// Function facts, when this is a function declaration.
    #[inline]
    pub fn func(&self) -> Option<&FuncDecl> {
        match &self.kind {
            DeclKind::Func(func) => Some(func),
            _ => None,
        }
    }

    /// Accessor facts, when this is an accessor function.
    #[inline]
    pub fn accessor(&self) -> Option<&AccessorInfo> {
        self.func().and_then(|f| f.accessor.as_ref())
    }
}

/// An anonymous closure expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Closure {
    pub context: DeclContext,
    /// Number of parameter clauses. Always at least 1.
    pub param_clauses: u32,
    /// Whether the closure captures state from an enclosing local scope.
    pub captures_locals: bool,
}

// ── Arena ───────────────────────────────────────────────────────────

/// Flat storage for declarations, closures, and module units.
///
/// Owns the [`NameInterner`]; builders intern their `&str` arguments so
/// callers never juggle `Name`s by hand.
pub struct DeclArena {
    names: NameInterner,
    modules: Vec<ModuleUnit>,
    decls: Vec<Decl>,
    closures: Vec<Closure>,
}

fn next_raw(len: usize, what: &str) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("{what} arena exceeded u32 capacity"))
}

impl DeclArena {
    pub fn new() -> Self {
        DeclArena {
            names: NameInterner::new(),
            modules: Vec::new(),
            decls: Vec::new(),
            closures: Vec::new(),
        }
    }

    // ── Names ───────────────────────────────────────────────────

    /// Intern a string.
    #[inline]
    pub fn name(&self, s: &str) -> Name {
        self.names.intern(s)
    }

    /// Resolve an interned name.
    #[inline]
    pub fn str(&self, name: Name) -> &'static str {
        self.names.lookup_static(name)
    }

    // ── Builders ────────────────────────────────────────────────

    pub fn add_module(&mut self, name: &str, kind: ModuleKind) -> ModuleId {
        let name = self.names.intern(name);
        let id = ModuleId::new(next_raw(self.modules.len(), "module"));
        self.modules.push(ModuleUnit { name, kind });
        id
    }

    fn push_decl(&mut self, decl: Decl) -> DeclId {
        let id = DeclId::new(next_raw(self.decls.len(), "declaration"));
        self.decls.push(decl);
        id
    }

    fn add_nominal(&mut self, name: &str, context: DeclContext, kind: DeclKind) -> DeclId {
        self.push_decl(Decl {
            name: self.names.intern(name),
            context,
            kind,
            flags: DeclFlags::empty(),
            symbol_override: None,
            foreign: None,
        })
    }

    pub fn add_struct(&mut self, name: &str, context: DeclContext) -> DeclId {
        self.add_nominal(name, context, DeclKind::Struct)
    }

    pub fn add_class(&mut self, name: &str, context: DeclContext) -> DeclId {
        self.add_nominal(name, context, DeclKind::Class)
    }

    pub fn add_enum(&mut self, name: &str, context: DeclContext) -> DeclId {
        self.add_nominal(name, context, DeclKind::Enum)
    }

    pub fn add_protocol(&mut self, name: &str, context: DeclContext) -> DeclId {
        self.add_nominal(name, context, DeclKind::Protocol)
    }

    /// Add a function declaration.
    ///
    /// # Panics
    /// Panics if `param_clauses` is 0; every function has at least one
    /// parameter clause.
    pub fn add_func(
        &mut self,
        name: &str,
        context: DeclContext,
        param_clauses: u32,
        flags: DeclFlags,
    ) -> DeclId {
        assert!(
            param_clauses >= 1,
            "function must have at least one parameter clause"
        );
        self.push_decl(Decl {
            name: self.names.intern(name),
            context,
            kind: DeclKind::Func(FuncDecl {
                param_clauses,
                accessor: None,
            }),
            flags,
            symbol_override: None,
            foreign: None,
        })
    }

    /// Add an accessor function for a var declaration.
    ///
    /// # Panics
    /// Panics if `storage` is not a var declaration.
    pub fn add_accessor(
        &mut self,
        name: &str,
        context: DeclContext,
        role: AccessorRole,
        storage: DeclId,
    ) -> DeclId {
        assert!(
            matches!(self.decl(storage).kind, DeclKind::Var),
            "accessor storage must be a var declaration"
        );
        self.push_decl(Decl {
            name: self.names.intern(name),
            context,
            kind: DeclKind::Func(FuncDecl {
                param_clauses: 1,
                accessor: Some(AccessorInfo { role, storage }),
            }),
            flags: DeclFlags::empty(),
            symbol_override: None,
            foreign: None,
        })
    }

    /// Add a constructor to a nominal type.
    ///
    /// # Panics
    /// Panics if `nominal` is not a nominal type declaration.
    pub fn add_constructor(&mut self, nominal: DeclId) -> DeclId {
        assert!(
            self.decl(nominal).kind.is_nominal(),
            "constructor parent must be a nominal type"
        );
        self.push_decl(Decl {
            name: self.names.intern("init"),
            context: DeclContext::Nominal(nominal),
            kind: DeclKind::Constructor,
            flags: DeclFlags::empty(),
            symbol_override: None,
            foreign: None,
        })
    }

    /// Add a destructor to a class.
    ///
    /// # Panics
    /// Panics if `class` is not a class declaration.
    pub fn add_destructor(&mut self, class: DeclId) -> DeclId {
        assert!(
            matches!(self.decl(class).kind, DeclKind::Class),
            "destructor parent must be a class"
        );
        self.push_decl(Decl {
            name: self.names.intern("deinit"),
            context: DeclContext::Nominal(class),
            kind: DeclKind::Destructor,
            flags: DeclFlags::empty(),
            symbol_override: None,
            foreign: None,
        })
    }

    /// Add a case to an enum.
    ///
    /// # Panics
    /// Panics if `parent` is not an enum declaration.
    pub fn add_enum_case(&mut self, name: &str, parent: DeclId, has_payload: bool) -> DeclId {
        assert!(
            matches!(self.decl(parent).kind, DeclKind::Enum),
            "enum case parent must be an enum"
        );
        self.push_decl(Decl {
            name: self.names.intern(name),
            context: DeclContext::Nominal(parent),
            kind: DeclKind::EnumCase { has_payload },
            flags: DeclFlags::empty(),
            symbol_override: None,
            foreign: None,
        })
    }

    pub fn add_var(&mut self, name: &str, context: DeclContext, flags: DeclFlags) -> DeclId {
        self.push_decl(Decl {
            name: self.names.intern(name),
            context,
            kind: DeclKind::Var,
            flags,
            symbol_override: None,
            foreign: None,
        })
    }

    /// Add an anonymous closure.
    ///
    /// # Panics
    /// Panics if `param_clauses` is 0.
    pub fn add_closure(
        &mut self,
        context: DeclContext,
        param_clauses: u32,
        captures_locals: bool,
    ) -> ClosureId {
        assert!(
            param_clauses >= 1,
            "closure must have at least one parameter clause"
        );
        let id = ClosureId::new(next_raw(self.closures.len(), "closure"));
        self.closures.push(Closure {
            context,
            param_clauses,
            captures_locals,
        });
        id
    }

    // ── Attribute setters ───────────────────────────────────────

    /// Pin a verbatim symbol name on a declaration.
    pub fn set_symbol_override(&mut self, decl: DeclId, symbol: &str) {
        let symbol = self.names.intern(symbol);
        self.decls[decl.index()].symbol_override = Some(symbol);
    }

    /// Mark a declaration's body as defined by the host language.
    pub fn set_foreign(&mut self, decl: DeclId, name: &str, asm_label: Option<&str>) {
        let info = ForeignInfo {
            name: self.names.intern(name),
            asm_label: asm_label.map(|l| self.names.intern(l)),
        };
        self.decls[decl.index()].foreign = Some(info);
    }

    // ── Queries ─────────────────────────────────────────────────

    #[inline]
    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id.index()]
    }

    #[inline]
    pub fn closure(&self, id: ClosureId) -> &Closure {
        &self.closures[id.index()]
    }

    #[inline]
    pub fn module(&self, id: ModuleId) -> &ModuleUnit {
        &self.modules[id.index()]
    }

    /// Step one level outward in the context chain. `None` at module scope.
    pub fn parent_context(&self, context: DeclContext) -> Option<DeclContext> {
        match context {
            DeclContext::Module(_) => None,
            DeclContext::Nominal(d) | DeclContext::Function(d) => Some(self.decl(d).context),
            DeclContext::Closure(c) => Some(self.closure(c).context),
        }
    }

    /// The module unit a context chain terminates in.
    pub fn module_of(&self, context: DeclContext) -> ModuleId {
        let mut ctx = context;
        loop {
            match ctx {
                DeclContext::Module(m) => return m,
                DeclContext::Nominal(d) | DeclContext::Function(d) => ctx = self.decl(d).context,
                DeclContext::Closure(c) => ctx = self.closure(c).context,
            }
        }
    }

    /// Whether any enclosing context of `decl` is local (a function or
    /// closure body), walking outward until module scope.
    pub fn is_in_local_context(&self, decl: DeclId) -> bool {
        let mut ctx = self.decl(decl).context;
        loop {
            match ctx {
                DeclContext::Module(_) => return false,
                DeclContext::Function(_) | DeclContext::Closure(_) => return true,
                DeclContext::Nominal(d) => ctx = self.decl(d).context,
            }
        }
    }
}

impl Default for DeclArena {
    fn default() -> Self {
        Self::new()
    }
}
