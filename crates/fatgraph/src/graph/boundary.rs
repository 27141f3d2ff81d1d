//! Boundary cycles as orbits of the half-edge successor map.

use super::{Boundary, HalfEdge, RibbonGraph};
use crate::cyclic::CyclicSequence;

/// One boundary component: the half-edges it leaves through, in traversal
/// order, and the edge labels it runs along.
#[derive(Clone, Debug)]
pub struct BoundaryCycle {
    pub half_edges: Vec<HalfEdge>,
    pub edges: CyclicSequence,
}

impl BoundaryCycle {
    #[inline]
    pub fn len(&self) -> usize {
        self.half_edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.half_edges.is_empty()
    }
}

/// Decompose the successor permutation into cycles, starting each cycle at the
/// first unvisited half-edge in (vertex, position) order. O(E).
pub(super) fn trace(graph: &RibbonGraph) -> Boundary {
    let mut owner: Vec<Vec<usize>> = graph
        .vertices()
        .iter()
        .map(|v| vec![usize::MAX; v.len()])
        .collect();
    let mut cycles = Vec::new();
    for vi in 0..graph.num_vertices() {
        for p in 0..graph.valence(vi) {
            if owner[vi][p] != usize::MAX {
                continue;
            }
            let index = cycles.len();
            let mut half_edges = Vec::new();
            let mut h = HalfEdge::new(vi, p);
            while owner[h.vertex][h.position] == usize::MAX {
                owner[h.vertex][h.position] = index;
                half_edges.push(h);
                h = graph.successor(h);
            }
            let edges = CyclicSequence::new(half_edges.iter().map(|&h| graph.label(h)).collect());
            cycles.push(BoundaryCycle { half_edges, edges });
        }
    }
    Boundary { cycles, owner }
}
