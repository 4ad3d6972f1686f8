//! Tests for entity references and curry levels.

use pretty_assertions::assert_eq;
use rustc_hash::FxHashMap;
use tarn_ast::{DeclContext, DeclFlags};

use super::*;
use crate::test_helpers::{native_context, plain_func, stored_var};

#[test]
fn natural_level_counts_clauses_beyond_first() {
    let (mut arena, scope) = native_context();
    let f = plain_func(&mut arena, scope, "f", 3);

    let entity = EntityRef::from_origin(&arena, EntityOrigin::Decl(f), None, false);
    assert_eq!(entity.kind(), EntityKind::Func);
    assert_eq!(entity.curry_level(), 2);
    assert!(!entity.is_curried());
}

#[test]
fn capture_context_adds_one_level() {
    let (mut arena, scope) = native_context();
    let outer = plain_func(&mut arena, scope, "outer", 1);
    let inner = arena.add_func(
        "inner",
        DeclContext::Function(outer),
        2,
        DeclFlags::CAPTURES_LOCALS,
    );

    let entity = EntityRef::from_origin(&arena, EntityOrigin::Decl(inner), None, false);
    assert_eq!(entity.curry_level(), 2);
    assert!(!entity.is_curried());
}

#[test]
fn explicit_level_below_natural_is_curried() {
    let (mut arena, scope) = native_context();
    let f = plain_func(&mut arena, scope, "f", 3);

    let partial = EntityRef::with_kind(&arena, f, EntityKind::Func, Some(1), false);
    assert_eq!(partial.curry_level(), 1);
    assert!(partial.is_curried());

    let full = EntityRef::with_kind(&arena, f, EntityKind::Func, Some(2), false);
    assert!(!full.is_curried());
}

#[test]
#[should_panic(expected = "above natural level")]
fn level_above_natural_panics() {
    let (mut arena, scope) = native_context();
    let f = plain_func(&mut arena, scope, "f", 1);
    let _ = EntityRef::with_kind(&arena, f, EntityKind::Func, Some(1), false);
}

#[test]
fn closure_levels_mirror_functions() {
    let (mut arena, scope) = native_context();
    let host = plain_func(&mut arena, scope, "host", 1);
    let closure = arena.add_closure(DeclContext::Function(host), 1, true);

    let entity = EntityRef::from_origin(&arena, EntityOrigin::Closure(closure), None, false);
    assert_eq!(entity.kind(), EntityKind::Func);
    assert_eq!(entity.curry_level(), 1);
    assert_eq!(entity.closure(), Some(closure));
    assert_eq!(entity.decl(), None);
    assert!(!entity.has_decl());
}

#[test]
fn constructor_base_is_allocator_and_never_foreign() {
    let (mut arena, scope) = native_context();
    let point = arena.add_struct("Point", scope);
    let ctor = arena.add_constructor(point);

    let entity = EntityRef::from_origin(&arena, EntityOrigin::Decl(ctor), None, true);
    assert_eq!(entity.kind(), EntityKind::Allocator);
    assert_eq!(entity.curry_level(), 1);
    assert!(!entity.is_foreign());

    let init = EntityRef::with_kind(&arena, ctor, EntityKind::Initializer, None, false);
    assert_eq!(init.curry_level(), 1);
}

#[test]
fn destructor_base_is_deallocator() {
    let (mut arena, scope) = native_context();
    let class = arena.add_class("Box", scope);
    let dtor = arena.add_destructor(class);

    let entity = EntityRef::from_origin(&arena, EntityOrigin::Decl(dtor), None, false);
    assert_eq!(entity.kind(), EntityKind::Deallocator);
    assert_eq!(entity.curry_level(), 0);

    let destroyer = EntityRef::with_kind(&arena, dtor, EntityKind::Destroyer, None, false);
    assert_eq!(destroyer.curry_level(), 0);
}

#[test]
fn enum_case_level_follows_payload() {
    let (mut arena, scope) = native_context();
    let shape = arena.add_enum("Shape", scope);
    let circle = arena.add_enum_case("circle", shape, true);
    let empty = arena.add_enum_case("empty", shape, false);

    let with_payload = EntityRef::from_origin(&arena, EntityOrigin::Decl(circle), None, false);
    assert_eq!(with_payload.kind(), EntityKind::EnumCase);
    assert_eq!(with_payload.curry_level(), 1);

    let bare = EntityRef::from_origin(&arena, EntityOrigin::Decl(empty), None, false);
    assert_eq!(bare.curry_level(), 0);
}

#[test]
fn ivar_helpers_anchor_on_the_class() {
    let (mut arena, scope) = native_context();
    let class = arena.add_class("Box", scope);

    let init = EntityRef::with_kind(&arena, class, EntityKind::IVarInitializer, None, false);
    assert_eq!(init.curry_level(), 1);
    let destroy = EntityRef::with_kind(&arena, class, EntityKind::IVarDestroyer, None, false);
    assert_eq!(destroy.curry_level(), 1);
}

#[test]
fn global_accessor_for_stored_module_var() {
    let (mut arena, scope) = native_context();
    let var = stored_var(&mut arena, scope, "counter");

    let entity = EntityRef::with_kind(&arena, var, EntityKind::GlobalAccessor, None, false);
    assert_eq!(entity.kind(), EntityKind::GlobalAccessor);
    assert_eq!(entity.curry_level(), 0);
    assert_eq!(entity.decl(), Some(var));
}

#[test]
#[should_panic(expected = "local var")]
fn global_accessor_rejects_local_var() {
    let (mut arena, scope) = native_context();
    let f = plain_func(&mut arena, scope, "f", 1);
    let var = stored_var(&mut arena, DeclContext::Function(f), "slot");
    let _ = EntityRef::with_kind(&arena, var, EntityKind::GlobalAccessor, None, false);
}

#[test]
#[should_panic(expected = "computed var")]
fn global_accessor_rejects_computed_var() {
    let (mut arena, scope) = native_context();
    let var = arena.add_var("lazy", scope, DeclFlags::empty());
    let _ = EntityRef::with_kind(&arena, var, EntityKind::GlobalAccessor, None, false);
}

#[test]
#[should_panic(expected = "lowers only to a Func entity")]
fn mismatched_kind_panics() {
    let (mut arena, scope) = native_context();
    let f = plain_func(&mut arena, scope, "f", 1);
    let _ = EntityRef::with_kind(&arena, f, EntityKind::Allocator, None, false);
}

#[test]
#[should_panic(expected = "explicit GlobalAccessor")]
fn var_base_needs_explicit_kind() {
    let (mut arena, scope) = native_context();
    let var = stored_var(&mut arena, scope, "counter");
    let _ = EntityRef::from_origin(&arena, EntityOrigin::Decl(var), None, false);
}

#[test]
#[should_panic(expected = "bare nominal")]
fn nominal_base_panics() {
    let (mut arena, scope) = native_context();
    let point = arena.add_struct("Point", scope);
    let _ = EntityRef::from_origin(&arena, EntityOrigin::Decl(point), None, false);
}

#[test]
fn enum_cases_are_always_transparent() {
    let (mut arena, scope) = native_context();
    let shape = arena.add_enum("Shape", scope);
    let circle = arena.add_enum_case("circle", shape, true);

    let entity = EntityRef::from_origin(&arena, EntityOrigin::Decl(circle), None, false);
    assert!(entity.is_transparent(&arena));
}

#[test]
fn transparency_reads_the_attribute_bit() {
    let (mut arena, scope) = native_context();
    let marked = arena.add_func("fast", scope, 1, DeclFlags::TRANSPARENT);
    let plain = plain_func(&mut arena, scope, "slow", 1);
    let closure = arena.add_closure(DeclContext::Function(plain), 1, false);

    let marked_ref = EntityRef::from_origin(&arena, EntityOrigin::Decl(marked), None, false);
    assert!(marked_ref.is_transparent(&arena));

    let plain_ref = EntityRef::from_origin(&arena, EntityOrigin::Decl(plain), None, false);
    assert!(!plain_ref.is_transparent(&arena));

    let closure_ref = EntityRef::from_origin(&arena, EntityOrigin::Closure(closure), None, false);
    assert!(!closure_ref.is_transparent(&arena));
}

#[test]
fn foreign_thunk_requires_interop_function() {
    let (mut arena, scope) = native_context();
    let bridged = plain_func(&mut arena, scope, "bridged", 1);
    arena.set_foreign(bridged, "host_bridged", None);
    let plain = plain_func(&mut arena, scope, "plain", 1);

    let native = EntityRef::from_origin(&arena, EntityOrigin::Decl(bridged), None, false);
    assert!(native.is_foreign_thunk(&arena));

    let foreign = EntityRef::from_origin(&arena, EntityOrigin::Decl(bridged), None, true);
    assert!(!foreign.is_foreign_thunk(&arena));
    assert!(foreign.is_foreign());

    let unbridged = EntityRef::from_origin(&arena, EntityOrigin::Decl(plain), None, false);
    assert!(!unbridged.is_foreign_thunk(&arena));
}

#[test]
fn default_arg_generator_carries_its_index() {
    let (mut arena, scope) = native_context();
    let f = plain_func(&mut arena, scope, "f", 1);

    let generator = EntityRef::default_arg_generator(EntityOrigin::Decl(f), 2);
    assert_eq!(generator.kind(), EntityKind::DefaultArgGenerator);
    assert_eq!(generator.default_arg_index(), 2);
    assert_eq!(generator.curry_level(), 0);
    assert!(!generator.is_curried());
    assert!(!generator.is_foreign());
}

#[test]
#[should_panic(expected = "non-generator")]
fn default_arg_index_guards_its_kind() {
    let (mut arena, scope) = native_context();
    let f = plain_func(&mut arena, scope, "f", 1);
    let entity = EntityRef::from_origin(&arena, EntityOrigin::Decl(f), None, false);
    let _ = entity.default_arg_index();
}

#[test]
fn references_collapse_in_maps() {
    let (mut arena, scope) = native_context();
    let point = arena.add_struct("Point", scope);
    let ctor = arena.add_constructor(point);

    let a = EntityRef::with_kind(&arena, ctor, EntityKind::Allocator, None, false);
    let b = EntityRef::from_origin(&arena, EntityOrigin::Decl(ctor), None, false);
    let init = EntityRef::with_kind(&arena, ctor, EntityKind::Initializer, None, false);

    let mut lowered: FxHashMap<EntityRef, u32> = FxHashMap::default();
    lowered.insert(a, 1);
    lowered.insert(b, 2);
    lowered.insert(init, 3);

    assert_eq!(lowered.len(), 2);
    assert_eq!(lowered.get(&a), Some(&2));
}
