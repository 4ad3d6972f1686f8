//! Tests for the linkage lattice and resolvers.

use pretty_assertions::assert_eq;
use tarn_ast::{DeclContext, ModuleKind};
use tarn_types::TyPool;

use super::*;
use crate::test_helpers::{foreign_context, native_context, plain_func};

const ALL: [Linkage; 4] = [
    Linkage::Private,
    Linkage::PublicNonUnique,
    Linkage::PublicUnique,
    Linkage::Top,
];

#[test]
fn merge_picks_the_more_restrictive_side() {
    assert_eq!(
        Linkage::Private.merge(Linkage::PublicUnique),
        Linkage::Private
    );
    assert_eq!(
        Linkage::PublicNonUnique.merge(Linkage::PublicUnique),
        Linkage::PublicNonUnique
    );
}

#[test]
fn top_is_the_merge_identity() {
    for linkage in ALL {
        assert_eq!(Linkage::Top.merge(linkage), linkage);
        assert_eq!(linkage.merge(Linkage::Top), linkage);
    }
}

#[test]
fn private_absorbs_everything() {
    for linkage in ALL {
        assert_eq!(Linkage::Private.merge(linkage), Linkage::Private);
        assert_eq!(linkage.merge(Linkage::Private), Linkage::Private);
    }
}

#[test]
fn merge_is_commutative_and_idempotent() {
    for a in ALL {
        assert_eq!(a.merge(a), a);
        for b in ALL {
            assert_eq!(a.merge(b), b.merge(a));
        }
    }
}

#[test]
fn module_scope_declarations_are_public_unique() {
    let (mut arena, scope) = native_context();
    let point = arena.add_struct("Point", scope);
    let method = plain_func(&mut arena, DeclContext::Nominal(point), "scale", 2);

    assert_eq!(decl_linkage(&arena, point), Linkage::PublicUnique);
    assert_eq!(decl_linkage(&arena, method), Linkage::PublicUnique);
}

#[test]
fn foreign_module_declarations_are_public_non_unique() {
    let (mut arena, scope) = foreign_context();
    let interface = plain_func(&mut arena, scope, "fetch", 1);

    assert_eq!(decl_linkage(&arena, interface), Linkage::PublicNonUnique);
}

#[test]
fn anything_in_a_local_context_is_private() {
    let (mut arena, scope) = native_context();
    let f = plain_func(&mut arena, scope, "f", 1);
    let helper = arena.add_struct("Helper", DeclContext::Function(f));
    let member = plain_func(&mut arena, DeclContext::Nominal(helper), "go", 2);

    assert_eq!(decl_linkage(&arena, helper), Linkage::Private);
    // The chain walks through the nominal to the enclosing function.
    assert_eq!(decl_linkage(&arena, member), Linkage::Private);
}

#[test]
fn type_linkage_merges_every_nominal_occurrence() {
    let (mut arena, scope) = native_context();
    let mut types = TyPool::new();
    let public = arena.add_struct("Point", scope);
    let f = plain_func(&mut arena, scope, "f", 1);
    let secret = arena.add_struct("Secret", DeclContext::Function(f));

    let public_ty = types.nominal(public);
    let secret_ty = types.nominal(secret);

    let pair = types.tuple(&[public_ty, secret_ty]);
    assert_eq!(type_linkage(&arena, &types, pair), Linkage::Private);

    // Order of occurrence does not change the fold.
    let swapped = types.tuple(&[secret_ty, public_ty]);
    assert_eq!(
        type_linkage(&arena, &types, pair),
        type_linkage(&arena, &types, swapped)
    );

    let fn_ty = types.function(&[public_ty], TyId::INT64);
    assert_eq!(type_linkage(&arena, &types, fn_ty), Linkage::PublicUnique);
}

#[test]
fn terms_without_nominals_answer_top() {
    let (arena, _scope) = native_context();
    let mut types = TyPool::new();

    assert_eq!(type_linkage(&arena, &types, TyId::INT64), Linkage::Top);

    let tuple = types.tuple(&[TyId::INT64, TyId::FLOAT64]);
    assert_eq!(type_linkage(&arena, &types, tuple), Linkage::Top);

    let addr = types.address(TyId::WORD);
    assert_eq!(type_linkage(&arena, &types, addr), Linkage::Top);
}

#[test]
fn generic_requirements_constrain_the_signature() {
    let (mut arena, scope) = native_context();
    let mut types = TyPool::new();
    let f = plain_func(&mut arena, scope, "f", 1);
    let local_proto = arena.add_protocol("Secretive", DeclContext::Function(f));
    let constraint = types.nominal(local_proto);

    // The monomorphic shape is all builtins; only the requirement
    // clause mentions the local protocol.
    let generics = [GenericParam {
        name: arena.name("T"),
        constraints: Box::from([constraint]),
        superclass: None,
    }];
    let poly = types.poly_function(&[TyId::INT64], TyId::INT64, &generics);
    assert_eq!(type_linkage(&arena, &types, poly), Linkage::Private);

    let unconstrained = [GenericParam {
        name: arena.name("U"),
        constraints: Box::default(),
        superclass: None,
    }];
    let free = types.poly_function(&[TyId::INT64], TyId::INT64, &unconstrained);
    assert_eq!(type_linkage(&arena, &types, free), Linkage::Top);
}

#[test]
fn superclass_bounds_participate_in_the_fold() {
    let (mut arena, _) = native_context();
    let host = arena.add_module("host", ModuleKind::Foreign);
    let base = arena.add_class("Widget", DeclContext::Module(host));
    let mut types = TyPool::new();
    let base_ty = types.nominal(base);

    let generics = [GenericParam {
        name: arena.name("T"),
        constraints: Box::default(),
        superclass: Some(base_ty),
    }];
    let poly = types.poly_function(&[TyId::INT64], TyId::INT64, &generics);
    assert_eq!(type_linkage(&arena, &types, poly), Linkage::PublicNonUnique);
}

#[test]
fn conformances_are_public_unique() {
    let (mut arena, scope) = native_context();
    let mut types = TyPool::new();
    let point = arena.add_struct("Point", scope);
    let proto = arena.add_protocol("Drawable", scope);
    let conformance = Conformance {
        ty: types.nominal(point),
        protocol: proto,
    };

    assert_eq!(conformance_linkage(conformance), Linkage::PublicUnique);
}
