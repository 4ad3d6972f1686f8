//! Entity encoders.
//!
//! One method per entity family, layered on the primitives in
//! [`mangler`](crate::Mangler):
//!
//! ```text
//! entity ::= 'F' decl-ref curry            function
//!          | 'O' decl-ref curry            enum case injector
//!          | context 'L' <index> '_' curry  closure body
//!          | decl-ref accessor-letter       accessor (g s w W)
//!          | context 'C' type? curry        allocating constructor
//!          | context 'c' type? curry        initializing constructor
//!          | context 'D'                    deallocating destructor
//!          | context 'd'                    destroying destructor
//!          | decl-ref 'e'                   ivar initializer
//!          | decl-ref 'E'                   ivar destroyer
//!          | decl-ref 'a'                   global addressor
//!          | decl-ref 'e' <index>           default-argument generator
//! curry  ::= '' | '_' <level>              level 0 is unmarked
//! ```
//!
//! Callers pick the encoder; each encoder asserts the declaration shape
//! it requires. Prefix bytes (if any) belong to the caller.

use tarn_ast::{AccessorRole, ClosureId, DeclId, DeclKind};

use crate::Mangler;

impl Mangler<'_> {
    /// General declaration entity: functions and enum case injectors.
    ///
    /// # Panics
    /// Panics if `decl` is not a function or enum case.
    pub fn mangle_entity(&mut self, decl: DeclId, curry_level: u32) {
        match self.decls().decl(decl).kind {
            DeclKind::Func(_) => self.push("F"),
            DeclKind::EnumCase { .. } => self.push("O"),
            _ => unreachable!("general entity requires a function or enum case"),
        }
        self.mangle_decl_ref(decl);
        self.mangle_curry_suffix(curry_level);
    }

    /// Closure body entity, discriminated by closure index.
    pub fn mangle_closure_entity(&mut self, closure: ClosureId, curry_level: u32) {
        let context = self.decls().closure(closure).context;
        self.mangle_context(context);
        self.push("L");
        self.push_uint(closure.raw());
        self.push("_");
        self.mangle_curry_suffix(curry_level);
    }

    /// Accessor entity, named after the storage declaration it reads or
    /// writes, not after the accessor function.
    ///
    /// # Panics
    /// Panics if `storage` is not a var declaration.
    pub fn mangle_accessor_entity(&mut self, role: AccessorRole, storage: DeclId) {
        assert!(
            matches!(self.decls().decl(storage).kind, DeclKind::Var),
            "accessor entity requires var storage"
        );
        self.mangle_decl_ref(storage);
        self.push(match role {
            AccessorRole::Getter => "g",
            AccessorRole::Setter => "s",
            AccessorRole::WillSet => "w",
            AccessorRole::DidSet => "W",
        });
    }

    /// Constructor entity: allocating (`C`) or initializing (`c`) shell.
    ///
    /// # Panics
    /// Panics if `ctor` is not a constructor declaration.
    pub fn mangle_constructor_entity(&mut self, ctor: DeclId, allocating: bool, curry_level: u32) {
        let d = self.decls().decl(ctor);
        assert!(
            matches!(d.kind, DeclKind::Constructor),
            "constructor entity requires a constructor declaration"
        );
        self.mangle_context(d.context);
        self.push(if allocating { "C" } else { "c" });
        if let Some(ty) = self.types().decl_ty(ctor) {
            self.mangle_type(ty);
        }
        self.mangle_curry_suffix(curry_level);
    }

    /// Destructor entity: deallocating (`D`) or destroying (`d`) shell.
    ///
    /// # Panics
    /// Panics if `dtor` is not a destructor declaration.
    pub fn mangle_destructor_entity(&mut self, dtor: DeclId, deallocating: bool) {
        let d = self.decls().decl(dtor);
        assert!(
            matches!(d.kind, DeclKind::Destructor),
            "destructor entity requires a destructor declaration"
        );
        self.mangle_context(d.context);
        self.push(if deallocating { "D" } else { "d" });
    }

    /// Stored-property initializer (`e`) or destroyer (`E`) of a class.
    ///
    /// # Panics
    /// Panics if `class` is not a class declaration.
    pub fn mangle_ivar_init_destroy_entity(&mut self, class: DeclId, is_destroyer: bool) {
        assert!(
            matches!(self.decls().decl(class).kind, DeclKind::Class),
            "ivar init/destroy entity requires a class declaration"
        );
        self.mangle_decl_ref(class);
        self.push(if is_destroyer { "E" } else { "e" });
    }

    /// Addressor of a stored global variable.
    ///
    /// # Panics
    /// Panics if `var` is not a var declaration.
    pub fn mangle_addressor_entity(&mut self, var: DeclId) {
        assert!(
            matches!(self.decls().decl(var).kind, DeclKind::Var),
            "addressor entity requires a var declaration"
        );
        self.mangle_decl_ref(var);
        self.push("a");
    }

    /// Generator for the default value of one parameter of a function.
    ///
    /// # Panics
    /// Panics if `func` is not a function declaration.
    pub fn mangle_default_argument_entity(&mut self, func: DeclId, index: u32) {
        assert!(
            matches!(self.decls().decl(func).kind, DeclKind::Func(_)),
            "default-argument entity requires a function declaration"
        );
        self.mangle_decl_ref(func);
        self.push("e");
        self.push_uint(index);
    }
}
