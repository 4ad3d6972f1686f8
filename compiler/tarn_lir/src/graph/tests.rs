//! Tests for the def-use value graph.

use pretty_assertions::assert_eq;
use tarn_types::TyId;

use super::*;

#[test]
fn id_niches_stay_small() {
    assert_eq!(std::mem::size_of::<ValueId>(), 4);
    assert_eq!(std::mem::size_of::<InstId>(), 4);
}

#[test]
fn undef_tagging_round_trips() {
    let undef = ValueId::from_undef_index(3);
    assert!(undef.is_undef());
    assert_eq!(undef.undef_index(), 3);

    let resident = ValueId::new(3);
    assert!(!resident.is_undef());
    assert_eq!(resident.index(), 3);
    assert!(resident != undef);
}

#[test]
#[should_panic(expected = "undef tag")]
fn resident_ids_cannot_reach_the_tag_bit() {
    let _ = ValueId::new(1 << 31);
}

#[test]
fn arguments_and_results_are_distinct_defs() {
    let mut graph = ValueGraph::new();
    let argument = graph.add_argument(TyId::INT64);
    let slot = graph.add_inst(InstKind::AllocStack, &[], TyId::RAW_POINTER);

    assert_eq!(*graph.value(argument), ValueData::Argument { ty: TyId::INT64 });
    assert_eq!(graph.defining_inst(argument), None);

    let inst = match graph.defining_inst(slot) {
        Some(inst) => inst,
        None => panic!("instruction result must have a defining instruction"),
    };
    assert_eq!(graph.inst_result(inst), slot);
    assert_eq!(graph.inst(inst).kind, InstKind::AllocStack);
    assert_eq!(graph.num_values(), 2);
    assert_eq!(graph.num_insts(), 1);
}

#[test]
fn value_types_come_from_their_defs() {
    let mut graph = ValueGraph::new();
    let argument = graph.add_argument(TyId::FLOAT64);
    let slot = graph.add_inst(InstKind::AllocStack, &[], TyId::RAW_POINTER);
    let loaded = graph.add_inst(InstKind::Load, &[slot], TyId::FLOAT64);

    assert_eq!(graph.value_ty(argument), TyId::FLOAT64);
    assert_eq!(graph.value_ty(slot), TyId::RAW_POINTER);
    assert_eq!(graph.value_ty(loaded), TyId::FLOAT64);
}

#[test]
fn operands_read_back_in_order() {
    let mut graph = ValueGraph::new();
    let callee = graph.add_argument(TyId::RAW_POINTER);
    let x = graph.add_argument(TyId::INT64);
    let y = graph.add_argument(TyId::INT64);
    let call = graph.add_inst(InstKind::Apply, &[callee, x, y], TyId::INT64);

    let inst = match graph.defining_inst(call) {
        Some(inst) => inst,
        None => panic!("apply result must have a defining instruction"),
    };
    assert_eq!(graph.operand(inst, 0), callee);
    assert_eq!(graph.operand(inst, 1), x);
    assert_eq!(graph.operand(inst, 2), y);
}

#[test]
fn address_projections_are_recognized() {
    let mut graph = ValueGraph::new();
    let base = graph.add_argument(TyId::RAW_POINTER);
    let field = graph.add_inst(
        InstKind::StructFieldAddr { field: 1 },
        &[base],
        TyId::RAW_POINTER,
    );
    let elem = graph.add_inst(
        InstKind::TupleElementAddr { index: 0 },
        &[field],
        TyId::RAW_POINTER,
    );
    let prop = graph.add_inst(
        InstKind::ClassPropertyAddr { property: 2 },
        &[elem],
        TyId::RAW_POINTER,
    );
    let loaded = graph.add_inst(InstKind::Load, &[prop], TyId::INT64);

    assert!(graph.is_address_projection(field));
    assert!(graph.is_address_projection(elem));
    assert!(graph.is_address_projection(prop));
    assert!(!graph.is_address_projection(base));
    assert!(!graph.is_address_projection(loaded));
    assert!(!graph.is_address_projection(ValueId::from_undef_index(0)));
}

#[test]
#[should_panic(expected = "exactly one operand")]
fn projections_take_one_operand() {
    let mut graph = ValueGraph::new();
    let a = graph.add_argument(TyId::RAW_POINTER);
    let b = graph.add_argument(TyId::RAW_POINTER);
    let _ = graph.add_inst(
        InstKind::StructFieldAddr { field: 0 },
        &[a, b],
        TyId::RAW_POINTER,
    );
}

#[test]
#[should_panic(expected = "not defined in this graph")]
fn operands_must_exist() {
    let mut graph = ValueGraph::new();
    let _ = graph.add_inst(InstKind::Load, &[ValueId::new(9)], TyId::INT64);
}

#[test]
fn undef_operands_are_welcome() {
    let mut graph = ValueGraph::new();
    let undef = ValueId::from_undef_index(0);
    let loaded = graph.add_inst(InstKind::Load, &[undef], TyId::INT64);

    let inst = match graph.defining_inst(loaded) {
        Some(inst) => inst,
        None => panic!("load result must have a defining instruction"),
    };
    assert_eq!(graph.operand(inst, 0), undef);
    graph.debug_validate();
}

#[test]
fn replace_all_uses_rewrites_every_slot() {
    let mut graph = ValueGraph::new();
    let old = graph.add_argument(TyId::INT64);
    let keep = graph.add_argument(TyId::INT64);
    let pair = graph.add_inst(InstKind::Tuple, &[old, keep, old], TyId::INT64);
    let wrapped = graph.add_inst(InstKind::Struct, &[old], TyId::INT64);
    let fresh = graph.add_argument(TyId::INT64);

    let rewritten = graph.replace_all_uses(old, fresh);
    assert_eq!(rewritten, 3);

    let pair_inst = match graph.defining_inst(pair) {
        Some(inst) => inst,
        None => panic!("tuple result must have a defining instruction"),
    };
    assert_eq!(graph.operand(pair_inst, 0), fresh);
    assert_eq!(graph.operand(pair_inst, 1), keep);
    assert_eq!(graph.operand(pair_inst, 2), fresh);

    let wrapped_inst = match graph.defining_inst(wrapped) {
        Some(inst) => inst,
        None => panic!("struct result must have a defining instruction"),
    };
    assert_eq!(graph.operand(wrapped_inst, 0), fresh);

    // The definition of `old` is untouched; only its uses moved.
    assert_eq!(*graph.value(old), ValueData::Argument { ty: TyId::INT64 });
    assert_eq!(graph.replace_all_uses(fresh, old), 3);
    graph.debug_validate();
}

#[test]
#[should_panic(expected = "replacing a value with itself")]
fn replace_all_uses_rejects_identity() {
    let mut graph = ValueGraph::new();
    let value = graph.add_argument(TyId::INT64);
    let _ = graph.replace_all_uses(value, value);
}

#[test]
fn replace_all_uses_counts_zero_without_uses() {
    let mut graph = ValueGraph::new();
    let unused = graph.add_argument(TyId::INT64);
    let fresh = graph.add_argument(TyId::INT64);

    assert_eq!(graph.replace_all_uses(unused, fresh), 0);
}

#[test]
fn inst_ids_iterate_in_definition_order() {
    let mut graph = ValueGraph::new();
    let slot = graph.add_inst(InstKind::AllocStack, &[], TyId::RAW_POINTER);
    let _ = graph.add_inst(InstKind::Load, &[slot], TyId::INT64);

    let kinds: Vec<InstKind> = graph.inst_ids().map(|inst| graph.inst(inst).kind).collect();
    assert_eq!(kinds, vec![InstKind::AllocStack, InstKind::Load]);
    graph.debug_validate();
}
