//! Edge contraction with numbering transfer.
//!
//! Contracting edge `e` between vertices `a < b`: rotate `a` so `e` is last and
//! `b` so `e` is first, splice `b`'s remaining labels after `a`'s, drop `b`,
//! and shift labels above `e` down by one. Every half-edge other than the two
//! occurrences of `e` survives, so the boundary cycles of the result are the
//! source cycles with those two half-edges removed. Cycles and numbering are
//! carried over through the half-edge map instead of being traced again.

use std::sync::Arc;

use super::{
    Boundary, BoundaryCycle, GraphError, HalfEdge, PlainVertices, RibbonGraph, VertexFactory,
};
use crate::cyclic::CyclicSequence;

impl RibbonGraph {
    /// Contract a non-loop edge; the result is memoized per edge.
    pub fn contract(&self, edge: usize) -> Result<Arc<RibbonGraph>, GraphError> {
        self.contract_with(edge, &PlainVertices)
    }

    /// Like `contract`, building new vertices through `factory`.
    pub fn contract_with(
        &self,
        edge: usize,
        factory: &dyn VertexFactory,
    ) -> Result<Arc<RibbonGraph>, GraphError> {
        let slot = self.contractions.get(edge).ok_or(GraphError::NoSuchEdge {
            edge,
            edges: self.num_edges(),
        })?;
        if let Some(done) = slot.get() {
            return Ok(Arc::clone(done));
        }
        let fresh = Arc::new(self.contract_uncached(edge, factory)?);
        Ok(Arc::clone(slot.get_or_init(|| fresh)))
    }

    fn contract_uncached(
        &self,
        edge: usize,
        factory: &dyn VertexFactory,
    ) -> Result<RibbonGraph, GraphError> {
        let [ha, hb] = self.half_edges(edge);
        if ha.vertex == hb.vertex {
            return Err(GraphError::LoopContraction { edge });
        }
        let (ha, hb) = if ha.vertex < hb.vertex { (ha, hb) } else { (hb, ha) };
        let (a, b) = (ha.vertex, hb.vertex);
        let (la, lb) = (self.valence(a), self.valence(b));
        if la == 1 && lb == 1 {
            return Err(GraphError::malformed(format!(
                "contracting edge {edge} would leave an empty vertex"
            )));
        }
        let relabel = |x: usize| if x > edge { x - 1 } else { x };

        let va = self.vertex(a);
        let vb = self.vertex(b);
        let merged: Vec<usize> = (0..la - 1)
            .map(|i| va[ha.position + 1 + i])
            .chain((1..lb).map(|i| vb[hb.position + i]))
            .map(relabel)
            .collect();

        let mut vertices = Vec::with_capacity(self.num_vertices() - 1);
        for (i, v) in self.vertices().iter().enumerate() {
            if i == a {
                vertices.push(factory.make(&merged));
            } else if i == b {
                continue;
            } else if v.iter().any(|x| x > edge) {
                let labels: Vec<usize> = v.iter().map(relabel).collect();
                vertices.push(factory.make(&labels));
            } else {
                vertices.push(Arc::clone(v));
            }
        }

        let mut result = RibbonGraph::assemble(vertices, None);
        let start_a = (ha.position + 1) % la;
        let map = |h: HalfEdge| -> Option<HalfEdge> {
            if h.vertex == a {
                let q = (h.position + la - start_a) % la;
                (q != la - 1).then(|| HalfEdge::new(a, q))
            } else if h.vertex == b {
                let q = (h.position + lb - hb.position) % lb;
                (q != 0).then(|| HalfEdge::new(a, la - 2 + q))
            } else {
                let v = if h.vertex > b { h.vertex - 1 } else { h.vertex };
                Some(HalfEdge::new(v, h.position))
            }
        };

        // Each cycle loses the occurrences of `edge` and keeps its order.
        let mut carried: Vec<(Vec<HalfEdge>, Option<usize>)> =
            Vec::with_capacity(self.num_boundary_cycles());
        let labels = self.numbering();
        for (i, cycle) in self.boundary_cycles().iter().enumerate() {
            let mut half_edges: Vec<HalfEdge> =
                cycle.half_edges.iter().filter_map(|&h| map(h)).collect();
            let first = half_edges
                .iter()
                .enumerate()
                .min_by_key(|&(_, h)| *h)
                .map(|(k, _)| k);
            let Some(first) = first else {
                return Err(GraphError::malformed(format!(
                    "contracting edge {edge} would remove a boundary cycle"
                )));
            };
            half_edges.rotate_left(first);
            carried.push((half_edges, labels.map(|l| l[i])));
        }
        carried.sort_unstable_by_key(|(half_edges, _)| half_edges[0]);

        let mut owner: Vec<Vec<usize>> = result
            .vertices()
            .iter()
            .map(|v| vec![usize::MAX; v.len()])
            .collect();
        let mut cycles = Vec::with_capacity(carried.len());
        let mut numbering = Vec::with_capacity(carried.len());
        for (index, (half_edges, label)) in carried.into_iter().enumerate() {
            for h in &half_edges {
                owner[h.vertex][h.position] = index;
            }
            let edges =
                CyclicSequence::new(half_edges.iter().map(|&h| result.label(h)).collect());
            cycles.push(BoundaryCycle { half_edges, edges });
            numbering.extend(label);
        }
        if owner.iter().flatten().any(|&c| c == usize::MAX) {
            return Err(GraphError::malformed(format!(
                "boundary cycles not preserved when contracting edge {edge}"
            )));
        }
        if labels.is_some() {
            result.numbering = Some(numbering);
        }
        let _ = result.boundary.set(Boundary { cycles, owner });
        Ok(result)
    }
}
