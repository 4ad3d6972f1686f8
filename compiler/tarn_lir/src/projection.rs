//! Address-projection paths.
//!
//! An address projection derives the address of one sub-element from
//! the address of an aggregate (or from a class instance reference).
//! Chains of such steps are how lowered code reaches into nested
//! storage, and alias analysis wants them back: given two values, which
//! sequence of structural steps, if any, derives one from the other?

use crate::graph::{InstId, InstKind, ValueGraph, ValueId};

/// One structural address step, abstracted away from the instruction
/// that performed it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Projection {
    /// Field of a struct, by field position.
    StructField { field: u32 },
    /// Element of a tuple, by element position.
    TupleElement { index: u32 },
    /// Stored property of a class instance, by property position.
    ClassProperty { property: u32 },
}

impl Projection {
    /// The step an instruction performs, for the three address
    /// projection kinds. `None` for every other instruction.
    pub fn of(graph: &ValueGraph, inst: InstId) -> Option<Projection> {
        match graph.inst(inst).kind {
            InstKind::StructFieldAddr { field } => Some(Projection::StructField { field }),
            InstKind::TupleElementAddr { index } => Some(Projection::TupleElement { index }),
            InstKind::ClassPropertyAddr { property } => {
                Some(Projection::ClassProperty { property })
            }
            _ => None,
        }
    }
}

/// Find the chain of address projections deriving `v2` from `v1`.
///
/// Walks backward from `v2` through projection definitions until it
/// reaches `v1` or anything that is not a projection. The returned
/// steps are in walk order: `path[0]` is the step nearest `v2` and the
/// last entry applies directly to `v1`, so applying the path reversed
/// onto `v1` rebuilds `v2`.
///
/// `Some(vec![])` when the two values are identical. `None` when no
/// pure projection chain connects them; an unrelated pair is an
/// ordinary answer here, not an error.
pub fn find_address_projection_path(
    graph: &ValueGraph,
    v1: ValueId,
    v2: ValueId,
) -> Option<Vec<Projection>> {
    // Same value: trivially related by the empty path.
    if v1 == v2 {
        return Some(Vec::new());
    }

    let mut path = Vec::new();
    let mut cursor = v2;
    while cursor != v1 {
        let Some(inst) = graph.defining_inst(cursor) else {
            break;
        };
        let Some(step) = Projection::of(graph, inst) else {
            break;
        };
        path.push(step);
        cursor = graph.operand(inst, 0);
    }

    // Success means the walk consumed at least one projection and
    // landed exactly on v1.
    if !path.is_empty() && cursor == v1 {
        tracing::trace!(steps = path.len(), "found address projection path");
        Some(path)
    } else {
        None
    }
}
