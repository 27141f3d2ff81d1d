//! Isomorphisms and automorphisms of ribbon graphs.
//!
//! Purpose
//! - Enumerate every structure-preserving bijection between two ribbon graphs:
//!   a vertex map, a rotation per vertex and the induced edge map, carrying
//!   the boundary numbering along when the graphs are numbered.
//! - Decide graph equality, automorphism groups and orientability.
//!
//! Why this design
//! - A connected graph is rigid once one vertex and its rotation are fixed:
//!   every edge then determines the image and rotation of its other endpoint.
//!   The search therefore seeds one vertex from the smallest valence bucket and
//!   propagates; each seed candidate yields at most one isomorphism.
//! - Disconnected (and empty) graphs use the plain bucket-permutation search
//!   with per-vertex rotation candidates from the repetition patterns.
//! - Both searches are lazy iterators with explicit state, so callers can stop
//!   at the first hit (`is_isomorphic`) or drain them (`automorphisms`).
//!
//! Orientation
//! - The orientation sign of an isomorphism is the sign of its edge
//!   permutation; a graph is oriented iff all its automorphisms are even.
//!   `vertex_rotation_sign` gives the vertex-permutation × rotation product for
//!   diagnostics; it does not agree with the edge sign in general.
//!
//! References
//! - Code cross-refs: `CyclicSequence::shifts_for_equality`, `RibbonGraph::partner`.

mod perm;
mod search;

pub use perm::{next_permutation, permutation_sign, BucketPermutations};
pub use search::Isomorphisms;

use std::hash::{Hash, Hasher};

use crate::graph::{HalfEdge, RibbonGraph};

/// Search configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IsoCfg {
    /// Restrict rotations to those allowed by the repetition patterns; when
    /// off, every rotation of a candidate vertex is tried.
    pub use_pattern_prune: bool,
}

impl Default for IsoCfg {
    fn default() -> Self {
        Self {
            use_pattern_prune: true,
        }
    }
}

/// Structure-preserving bijection from a source to a target graph.
///
/// Source half-edge `(v, p)` maps to `(vertices[v], p - rotations[v])`, and edge
/// label `e` maps to `edges[e]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Isomorphism {
    pub vertices: Vec<usize>,
    pub rotations: Vec<usize>,
    pub edges: Vec<usize>,
}

impl Isomorphism {
    pub fn map_half_edge(&self, source: &RibbonGraph, h: HalfEdge) -> HalfEdge {
        let len = source.valence(h.vertex);
        HalfEdge::new(
            self.vertices[h.vertex],
            (h.position + len - self.rotations[h.vertex]) % len,
        )
    }

    /// Sign of the induced edge permutation.
    pub fn orientation_sign(&self) -> i32 {
        permutation_sign(&self.edges)
    }

    /// Sign of the vertex permutation times, per vertex of valence `l` rotated
    /// by `r`, `-1` when `(l - 1) * r` is odd.
    pub fn vertex_rotation_sign(&self, source: &RibbonGraph) -> i32 {
        let mut sign = permutation_sign(&self.vertices);
        for (v, &r) in self.rotations.iter().enumerate() {
            if (source.valence(v) - 1) * r % 2 == 1 {
                sign = -sign;
            }
        }
        sign
    }

    pub fn is_identity(&self) -> bool {
        self.vertices.iter().enumerate().all(|(i, &v)| i == v)
            && self.rotations.iter().all(|&r| r == 0)
    }
}

impl RibbonGraph {
    pub fn isomorphisms_to<'a>(&'a self, other: &'a RibbonGraph) -> Isomorphisms<'a> {
        Isomorphisms::new(self, other, IsoCfg::default())
    }

    pub fn isomorphisms_to_with<'a>(
        &'a self,
        other: &'a RibbonGraph,
        cfg: IsoCfg,
    ) -> Isomorphisms<'a> {
        Isomorphisms::new(self, other, cfg)
    }

    pub fn automorphisms(&self) -> Isomorphisms<'_> {
        self.isomorphisms_to(self)
    }

    pub fn is_isomorphic(&self, other: &RibbonGraph) -> bool {
        self.isomorphisms_to(other).next().is_some()
    }

    /// True iff no automorphism reverses orientation (cached).
    pub fn is_oriented(&self) -> bool {
        *self
            .oriented_cache()
            .get_or_init(|| self.automorphisms().all(|a| a.orientation_sign() == 1))
    }
}

impl PartialEq for RibbonGraph {
    fn eq(&self, other: &Self) -> bool {
        self.is_isomorphic(other)
    }
}

impl Eq for RibbonGraph {}

impl Hash for RibbonGraph {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.invariant().hash(state);
    }
}

#[cfg(test)]
mod tests;
