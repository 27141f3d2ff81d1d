//! Ribbon graphs (fatgraphs).
//!
//! Purpose
//! - Store a ribbon graph as an ordered list of vertices, each a cyclic
//!   sequence of edge labels in `0..E` where every label occurs exactly twice.
//! - Derive the ribbon data lazily and memoize it on the graph: endpoint table,
//!   boundary cycles, valence spectrum, connectivity, orientability and the
//!   contraction of each edge.
//!
//! Why this design
//! - Adjacency lives in integer-indexed tables (`HalfEdge` = vertex + position),
//!   so graphs never hold references to each other. Contraction builds a new
//!   graph and the source keeps it behind an `Arc` in a per-edge cache.
//! - Vertices are shared through `Arc` so a `VertexFactory` can hash-cons them.
//!
//! References
//! - Code cross-refs: `CyclicSequence` (vertex representation),
//!   `iso::Isomorphisms` (equality), `enumerate::GraphSet` (deduplication).

mod boundary;
mod contract;
mod factory;

pub use boundary::BoundaryCycle;
pub use factory::{InternedVertices, PlainVertices, VertexFactory};

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::cyclic::CyclicSequence;

/// A vertex is the cyclic order of edge labels around it.
pub type Vertex = CyclicSequence;

/// Position `position` in the cyclic order of vertex `vertex`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HalfEdge {
    pub vertex: usize,
    pub position: usize,
}

impl HalfEdge {
    #[inline]
    pub fn new(vertex: usize, position: usize) -> Self {
        Self { vertex, position }
    }
}

/// Construction violations and domain misuse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphError {
    Malformed { reason: String },
    LoopContraction { edge: usize },
    NoSuchEdge { edge: usize, edges: usize },
    InvalidNumbering { reason: String },
}

impl GraphError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }

    pub(crate) fn numbering(reason: impl Into<String>) -> Self {
        Self::InvalidNumbering {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { reason } => write!(f, "malformed ribbon graph: {reason}"),
            Self::LoopContraction { edge } => write!(f, "edge {edge} is a loop and cannot be contracted"),
            Self::NoSuchEdge { edge, edges } => {
                write!(f, "edge {edge} out of range (graph has {edges} edges)")
            }
            Self::InvalidNumbering { reason } => write!(f, "invalid boundary numbering: {reason}"),
        }
    }
}

impl std::error::Error for GraphError {}

/// Isomorphism-invariant key: equal graphs have equal keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphInvariant {
    pub edges: usize,
    pub vertices: usize,
    /// Sorted valences.
    pub valences: Vec<usize>,
    /// Boundary-cycle lengths: sorted, or indexed by label when numbered.
    pub boundary_lengths: Vec<usize>,
    pub numbered: bool,
}

#[derive(Debug, Default)]
struct Boundary {
    cycles: Vec<BoundaryCycle>,
    /// `owner[v][p]`: boundary cycle leaving through half-edge (v, p).
    owner: Vec<Vec<usize>>,
}

/// Ribbon graph with optional boundary-cycle numbering.
///
/// Invariants:
/// - Every label in `0..num_edges()` occurs exactly twice; vertices are non-empty.
/// - `numbering`, when present, is a permutation of `0..num_boundary_cycles()`
///   listing the label of each boundary cycle in trace order.
/// - Cached attributes depend only on the vertices and numbering, which never
///   change after construction.
#[derive(Debug)]
pub struct RibbonGraph {
    vertices: Vec<Arc<Vertex>>,
    endpoints: Vec<[HalfEdge; 2]>,
    numbering: Option<Vec<usize>>,
    boundary: OnceLock<Boundary>,
    spectrum: OnceLock<BTreeMap<usize, Vec<usize>>>,
    connected: OnceLock<bool>,
    oriented: OnceLock<bool>,
    contractions: Vec<OnceLock<Arc<RibbonGraph>>>,
}

impl RibbonGraph {
    /// Build from explicit vertex label lists.
    pub fn new(vertices: Vec<Vec<usize>>) -> Result<Self, GraphError> {
        Self::from_vertices(vertices.into_iter().map(|v| Arc::new(Vertex::new(v))).collect())
    }

    /// Build from a valence profile and a flat edge-label sequence, cutting the
    /// sequence into consecutive windows of the given lengths.
    pub fn from_profile(
        profile: &[usize],
        labels: &[usize],
        factory: &dyn VertexFactory,
    ) -> Result<Self, GraphError> {
        let total: usize = profile.iter().sum();
        if total != labels.len() {
            return Err(GraphError::malformed(format!(
                "valence profile sums to {total} but {} labels were given",
                labels.len()
            )));
        }
        let mut start = 0;
        let mut vertices = Vec::with_capacity(profile.len());
        for &valence in profile {
            vertices.push(factory.make(&labels[start..start + valence]));
            start += valence;
        }
        Self::from_vertices(vertices)
    }

    /// Build from shared vertices, checking the occurrence invariant.
    pub fn from_vertices(vertices: Vec<Arc<Vertex>>) -> Result<Self, GraphError> {
        let total: usize = vertices.iter().map(|v| v.len()).sum();
        if total % 2 != 0 {
            return Err(GraphError::malformed(format!("odd valence sum {total}")));
        }
        if let Some(i) = vertices.iter().position(|v| v.is_empty()) {
            return Err(GraphError::malformed(format!("vertex {i} is empty")));
        }
        let edges = total / 2;
        let mut counts = vec![0usize; edges];
        for label in vertices.iter().flat_map(|v| v.iter()) {
            match counts.get_mut(label) {
                Some(c) => *c += 1,
                None => {
                    return Err(GraphError::malformed(format!(
                        "label {label} out of range for {edges} edges"
                    )))
                }
            }
        }
        if let Some(label) = counts.iter().position(|&c| c != 2) {
            return Err(GraphError::malformed(format!(
                "label {label} occurs {} times",
                counts[label]
            )));
        }
        Ok(Self::assemble(vertices, None))
    }

    /// Build without validation; callers guarantee the invariants.
    pub(crate) fn assemble(vertices: Vec<Arc<Vertex>>, numbering: Option<Vec<usize>>) -> Self {
        let edges = vertices.iter().map(|v| v.len()).sum::<usize>() / 2;
        let mut ends: Vec<Vec<HalfEdge>> = vec![Vec::with_capacity(2); edges];
        for (vi, v) in vertices.iter().enumerate() {
            for (p, label) in v.iter().enumerate() {
                ends[label].push(HalfEdge::new(vi, p));
            }
        }
        let endpoints = ends.into_iter().map(|h| [h[0], h[1]]).collect();
        Self {
            vertices,
            endpoints,
            numbering,
            boundary: OnceLock::new(),
            spectrum: OnceLock::new(),
            connected: OnceLock::new(),
            oriented: OnceLock::new(),
            contractions: (0..edges).map(|_| OnceLock::new()).collect(),
        }
    }

    /// Copy carrying the given boundary numbering (label per cycle, in trace order).
    pub fn with_numbering(&self, labels: Vec<usize>) -> Result<Self, GraphError> {
        let n = self.num_boundary_cycles();
        if labels.len() != n {
            return Err(GraphError::numbering(format!(
                "{} labels for {n} boundary cycles",
                labels.len()
            )));
        }
        let mut seen = vec![false; n];
        for &l in &labels {
            if l >= n || seen[l] {
                return Err(GraphError::numbering(format!("{labels:?} is not a permutation")));
            }
            seen[l] = true;
        }
        Ok(Self::assemble(self.vertices.clone(), Some(labels)))
    }

    /// Copy without numbering.
    pub fn unnumbered(&self) -> Self {
        Self::assemble(self.vertices.clone(), None)
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.endpoints.len()
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertices(&self) -> &[Arc<Vertex>] {
        &self.vertices
    }

    #[inline]
    pub fn vertex(&self, i: usize) -> &Vertex {
        &self.vertices[i]
    }

    #[inline]
    pub fn valence(&self, i: usize) -> usize {
        self.vertices[i].len()
    }

    /// Edge label at a half-edge.
    #[inline]
    pub fn label(&self, h: HalfEdge) -> usize {
        self.vertices[h.vertex][h.position]
    }

    /// Both occurrences of `edge`, in (vertex, position) order.
    #[inline]
    pub fn half_edges(&self, edge: usize) -> [HalfEdge; 2] {
        self.endpoints[edge]
    }

    /// Endpoint vertices of `edge` (equal for a loop).
    pub fn endpoints(&self, edge: usize) -> (usize, usize) {
        let [a, b] = self.endpoints[edge];
        (a.vertex, b.vertex)
    }

    #[inline]
    pub fn is_loop(&self, edge: usize) -> bool {
        let (a, b) = self.endpoints(edge);
        a == b
    }

    /// The other occurrence of the same edge label.
    pub fn partner(&self, h: HalfEdge) -> HalfEdge {
        let [a, b] = self.endpoints[self.label(h)];
        if a == h {
            b
        } else {
            a
        }
    }

    /// Next half-edge along the boundary: the position after the partner.
    pub fn successor(&self, h: HalfEdge) -> HalfEdge {
        let p = self.partner(h);
        HalfEdge::new(p.vertex, (p.position + 1) % self.valence(p.vertex))
    }

    fn boundary(&self) -> &Boundary {
        self.boundary.get_or_init(|| boundary::trace(self))
    }

    pub fn boundary_cycles(&self) -> &[BoundaryCycle] {
        &self.boundary().cycles
    }

    pub fn num_boundary_cycles(&self) -> usize {
        self.boundary().cycles.len()
    }

    /// Index of the boundary cycle leaving through `h`.
    pub fn boundary_cycle_of(&self, h: HalfEdge) -> usize {
        self.boundary().owner[h.vertex][h.position]
    }

    /// Label of each boundary cycle in trace order, if numbered.
    pub fn numbering(&self) -> Option<&[usize]> {
        self.numbering.as_deref()
    }

    pub fn is_numbered(&self) -> bool {
        self.numbering.is_some()
    }

    /// Genus from Euler's formula, `(E - V - n + 2) / 2`. Meaningful for connected graphs.
    pub fn genus(&self) -> usize {
        (self.num_edges() + 2).saturating_sub(self.num_vertices() + self.num_boundary_cycles()) / 2
    }

    /// `(genus, boundary count)`.
    pub fn classify(&self) -> (usize, usize) {
        (self.genus(), self.num_boundary_cycles())
    }

    /// Valence → vertex indices (ascending).
    pub fn valence_spectrum(&self) -> &BTreeMap<usize, Vec<usize>> {
        self.spectrum.get_or_init(|| {
            let mut spectrum: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
            for (i, v) in self.vertices.iter().enumerate() {
                spectrum.entry(v.len()).or_default().push(i);
            }
            spectrum
        })
    }

    pub fn sorted_valences(&self) -> Vec<usize> {
        self.valence_spectrum()
            .iter()
            .flat_map(|(&val, vs)| std::iter::repeat(val).take(vs.len()))
            .collect()
    }

    /// Breadth-first search over the vertex adjacency.
    pub fn is_connected(&self) -> bool {
        *self.connected.get_or_init(|| {
            let nv = self.num_vertices();
            if nv == 0 {
                return true;
            }
            let mut adj = vec![Vec::new(); nv];
            for &[a, b] in &self.endpoints {
                adj[a.vertex].push(b.vertex);
                adj[b.vertex].push(a.vertex);
            }
            let mut seen = vec![false; nv];
            let mut queue = std::collections::VecDeque::from([0usize]);
            seen[0] = true;
            let mut reached = 1;
            while let Some(u) = queue.pop_front() {
                for &w in &adj[u] {
                    if !seen[w] {
                        seen[w] = true;
                        reached += 1;
                        queue.push_back(w);
                    }
                }
            }
            reached == nv
        })
    }

    /// Every vertex in maximal rotation, vertices ordered by (valence, content).
    pub fn is_canonical(&self) -> bool {
        self.vertices.iter().all(|v| v.is_maximal_rotation())
            && self.vertices.windows(2).all(|w| {
                (w[0].len(), w[0].as_slice()) <= (w[1].len(), w[1].as_slice())
            })
    }

    pub(crate) fn oriented_cache(&self) -> &OnceLock<bool> {
        &self.oriented
    }

    pub fn invariant(&self) -> GraphInvariant {
        let cycles = self.boundary_cycles();
        let boundary_lengths = match &self.numbering {
            Some(labels) => {
                let mut lens = vec![0; cycles.len()];
                for (c, &l) in cycles.iter().zip(labels) {
                    lens[l] = c.len();
                }
                lens
            }
            None => {
                let mut lens: Vec<usize> = cycles.iter().map(|c| c.len()).collect();
                lens.sort_unstable();
                lens
            }
        };
        GraphInvariant {
            edges: self.num_edges(),
            vertices: self.num_vertices(),
            valences: self.sorted_valences(),
            boundary_lengths,
            numbered: self.is_numbered(),
        }
    }
}

impl Clone for RibbonGraph {
    fn clone(&self) -> Self {
        Self::assemble(self.vertices.clone(), self.numbering.clone())
    }
}

impl fmt::Display for RibbonGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.vertices.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "]")?;
        if let Some(labels) = &self.numbering {
            write!(f, " numbering {labels:?}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
