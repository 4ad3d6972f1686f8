//! Shared fixtures for the identity-layer tests.

use tarn_ast::{DeclArena, DeclContext, DeclFlags, DeclId, ModuleKind};
use tarn_types::TyId;

use crate::graph::{InstKind, ValueGraph, ValueId};
use crate::projection::Projection;

/// Arena holding one native module named `main`; returns its scope.
pub(crate) fn native_context() -> (DeclArena, DeclContext) {
    let mut arena = DeclArena::new();
    let module = arena.add_module("main", ModuleKind::Native);
    (arena, DeclContext::Module(module))
}

/// Arena holding one foreign module named `host`; returns its scope.
pub(crate) fn foreign_context() -> (DeclArena, DeclContext) {
    let mut arena = DeclArena::new();
    let module = arena.add_module("host", ModuleKind::Foreign);
    (arena, DeclContext::Module(module))
}

/// Function with the given clause count and no flags.
pub(crate) fn plain_func(
    arena: &mut DeclArena,
    context: DeclContext,
    name: &str,
    param_clauses: u32,
) -> DeclId {
    arena.add_func(name, context, param_clauses, DeclFlags::empty())
}

/// Stored (non-computed) var.
pub(crate) fn stored_var(arena: &mut DeclArena, context: DeclContext, name: &str) -> DeclId {
    arena.add_var(name, context, DeclFlags::HAS_STORAGE)
}

/// The instruction kind performing `step`.
pub(crate) fn projection_inst(step: Projection) -> InstKind {
    match step {
        Projection::StructField { field } => InstKind::StructFieldAddr { field },
        Projection::TupleElement { index } => InstKind::TupleElementAddr { index },
        Projection::ClassProperty { property } => InstKind::ClassPropertyAddr { property },
    }
}

/// Chain each step onto `base`, returning the minted values in order.
/// The last entry is the fully projected value.
pub(crate) fn projection_chain(
    graph: &mut ValueGraph,
    base: ValueId,
    steps: &[Projection],
) -> Vec<ValueId> {
    let mut values = Vec::with_capacity(steps.len());
    let mut cursor = base;
    for &step in steps {
        cursor = graph.add_inst(projection_inst(step), &[cursor], TyId::RAW_POINTER);
        values.push(cursor);
    }
    values
}

/// The value projecting `step` out of `base`, if the graph has one.
pub(crate) fn apply_projection(
    graph: &ValueGraph,
    base: ValueId,
    step: Projection,
) -> Option<ValueId> {
    graph.inst_ids().find_map(|inst| {
        let found = Projection::of(graph, inst)? == step && graph.operand(inst, 0) == base;
        found.then_some(graph.inst_result(inst))
    })
}
