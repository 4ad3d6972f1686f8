//! Mangler buffer and encoding primitives.
//!
//! # Grammar
//!
//! All encodings compose from three primitives:
//!
//! ```text
//! identifier ::= <decimal length> <text>      text never starts with a digit
//! context    ::= 'M' identifier nesting*      outermost-first
//! nesting    ::= 'N' identifier               enclosing nominal body
//!              | 'F' identifier               enclosing function body
//!              | 'L' <index> '_'              enclosing closure body
//! type       ::= 'Bi' | 'Bf' | 'Bw' | 'Bp'    Int64 / Float64 / Word / RawPointer
//!              | 'V' context identifier ('G' type* '_')?    nominal
//!              | 'T' type* '_'                              tuple
//!              | 'F' type* '_' type                         function
//!              | 'U' generic* 'F' type* '_' type            poly function
//!              | 'A' type                                   address
//! generic    ::= 'G' identifier type* ('S' type)? '_'       constraints, superclass
//! decl-ref   ::= context identifier type?     type when an interface type is recorded
//! ```
//!
//! Entity encodings are built on these in [`entity`](crate::Mangler);
//! each is a pure function of the arena contents and its arguments.

use smallvec::SmallVec;
use tarn_ast::{DeclArena, DeclContext, DeclId, Name};
use tarn_types::{TyData, TyId, TyPool};

use crate::ResilienceMode;

/// Append-only symbol encoder over a caller-owned buffer.
///
/// One `Mangler` encodes one symbol; the caller decides what (if
/// anything) to push before and after.
pub struct Mangler<'a> {
    buffer: &'a mut String,
    decls: &'a DeclArena,
    types: &'a TyPool,
    /// Carried for signature parity with the symbol layer; no current
    /// encoding varies by expansion.
    pub expansion: ResilienceMode,
}

impl<'a> Mangler<'a> {
    pub fn new(
        buffer: &'a mut String,
        decls: &'a DeclArena,
        types: &'a TyPool,
        expansion: ResilienceMode,
    ) -> Self {
        Mangler {
            buffer,
            decls,
            types,
            expansion,
        }
    }

    #[inline]
    pub(crate) fn decls(&self) -> &'a DeclArena {
        self.decls
    }

    #[inline]
    pub(crate) fn types(&self) -> &'a TyPool {
        self.types
    }

    #[inline]
    pub(crate) fn push(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    #[inline]
    pub(crate) fn push_uint(&mut self, value: u32) {
        use std::fmt::Write;
        let _ = write!(self.buffer, "{value}");
    }

    /// Length-prefixed identifier.
    ///
    /// # Panics
    /// Panics if the identifier is empty. Identifiers never start with a
    /// digit, which keeps the length prefix unambiguous.
    pub fn mangle_identifier(&mut self, name: Name) {
        let text = self.decls.str(name);
        assert!(!text.is_empty(), "mangled identifier must be non-empty");
        debug_assert!(
            !text.starts_with(|c: char| c.is_ascii_digit()),
            "identifier must not start with a digit"
        );
        use std::fmt::Write;
        let _ = write!(self.buffer, "{}{}", text.len(), text);
    }

    /// Context chain, outermost module unit first.
    pub fn mangle_context(&mut self, context: DeclContext) {
        let mut chain: SmallVec<[DeclContext; 8]> = SmallVec::new();
        let mut ctx = Some(context);
        while let Some(c) = ctx {
            chain.push(c);
            ctx = self.decls.parent_context(c);
        }

        for c in chain.iter().rev() {
            match *c {
                DeclContext::Module(m) => {
                    self.push("M");
                    self.mangle_identifier(self.decls.module(m).name);
                }
                DeclContext::Nominal(d) => {
                    self.push("N");
                    self.mangle_identifier(self.decls.decl(d).name);
                }
                DeclContext::Function(d) => {
                    self.push("F");
                    self.mangle_identifier(self.decls.decl(d).name);
                }
                DeclContext::Closure(cl) => {
                    self.push("L");
                    self.push_uint(cl.raw());
                    self.push("_");
                }
            }
        }
    }

    /// Canonical type encoding.
    pub fn mangle_type(&mut self, ty: TyId) {
        match ty {
            TyId::INT64 => self.push("Bi"),
            TyId::FLOAT64 => self.push("Bf"),
            TyId::WORD => self.push("Bw"),
            TyId::RAW_POINTER => self.push("Bp"),
            _ => self.mangle_structured_type(ty),
        }
    }

    fn mangle_structured_type(&mut self, ty: TyId) {
        let types = self.types;
        match types.data(ty) {
            TyData::Builtin(_) => {
                // Builtins are pre-interned at fixed ids and dispatched
                // in `mangle_type`.
                unreachable!("builtin type data behind a dynamic id")
            }
            TyData::Nominal { decl, args } => {
                self.push("V");
                let d = self.decls.decl(*decl);
                self.mangle_context(d.context);
                self.mangle_identifier(d.name);
                if !args.is_empty() {
                    self.push("G");
                    for arg in args.iter() {
                        self.mangle_type(*arg);
                    }
                    self.push("_");
                }
            }
            TyData::Tuple(elems) => {
                self.push("T");
                for elem in elems.iter() {
                    self.mangle_type(*elem);
                }
                self.push("_");
            }
            TyData::Function { params, result } => {
                self.mangle_function_type(params, *result);
            }
            TyData::PolyFunction {
                params,
                result,
                generics,
            } => {
                self.push("U");
                for generic in generics.iter() {
                    self.push("G");
                    self.mangle_identifier(generic.name);
                    for constraint in generic.constraints.iter() {
                        self.mangle_type(*constraint);
                    }
                    if let Some(superclass) = generic.superclass {
                        self.push("S");
                        self.mangle_type(superclass);
                    }
                    self.push("_");
                }
                self.mangle_function_type(params, *result);
            }
            TyData::Address(pointee) => {
                self.push("A");
                self.mangle_type(*pointee);
            }
        }
    }

    fn mangle_function_type(&mut self, params: &[TyId], result: TyId) {
        self.push("F");
        for param in params {
            self.mangle_type(*param);
        }
        self.push("_");
        self.mangle_type(result);
    }

    /// Context + name + recorded interface type, the shared spine of
    /// most entity encodings.
    pub(crate) fn mangle_decl_ref(&mut self, decl: DeclId) {
        let d = self.decls.decl(decl);
        self.mangle_context(d.context);
        self.mangle_identifier(d.name);
        if let Some(ty) = self.types.decl_ty(decl) {
            self.mangle_type(ty);
        }
    }

    /// Trailing curry marker; level 0 (the fully-uncurried form) is
    /// unmarked.
    pub(crate) fn mangle_curry_suffix(&mut self, level: u32) {
        if level > 0 {
            self.push("_");
            self.push_uint(level);
        }
    }
}
