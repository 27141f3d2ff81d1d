//! Graph enumeration.
//!
//! Purpose
//! - List one representative per isomorphism class of connected ribbon graphs
//!   with a given vertex-valence profile (`enumerate_by_valence`).
//! - Build every graph of a fixed topological type (genus g, n boundary
//!   cycles) by grafting binary trees onto one-vertex roses and contracting
//!   edges down to a single vertex (`enumerate_moduli_space`).
//! - Expand graphs into their inequivalent boundary numberings
//!   (`make_numbered_variants`).
//!
//! Why this design
//! - Deduplication goes through `GraphSet`, which buckets graphs by an
//!   isomorphism invariant and runs the isomorphism search only inside a bucket.
//! - All switches (vertex interning, invariant bucketing, isomorphism pruning)
//!   live in `EnumCfg`, threaded explicitly through every entry point.
//!
//! References
//! - Knuth, TAOCP Vol. 4A, §7.2.1.6, Algorithm B (binary trees in preorder).
//! - Code cross-refs: `RibbonGraph::contract_with`, `RibbonGraph::isomorphisms_to_with`.

mod moduli;
mod trees;

pub use moduli::{enumerate_moduli_space, graft, make_numbered_variants, MgnGraphs};
pub use trees::{BinaryTree, BinaryTrees};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::graph::{
    GraphError, GraphInvariant, InternedVertices, PlainVertices, RibbonGraph, VertexFactory,
};
use crate::iso::{next_permutation, IsoCfg, Isomorphism};

/// Enumeration configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnumCfg {
    /// Hash-cons vertices through `InternedVertices`.
    pub intern_vertices: bool,
    /// Compare only graphs with equal `GraphInvariant` during deduplication.
    pub bucket_by_invariant: bool,
    pub iso: IsoCfg,
}

impl Default for EnumCfg {
    fn default() -> Self {
        Self {
            intern_vertices: true,
            bucket_by_invariant: true,
            iso: IsoCfg::default(),
        }
    }
}

impl EnumCfg {
    pub fn vertex_factory(&self) -> Box<dyn VertexFactory> {
        if self.intern_vertices {
            Box::new(InternedVertices::new())
        } else {
            Box::new(PlainVertices)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnumError {
    Unstable { genus: usize, boundary: usize },
    Graph(GraphError),
}

impl fmt::Display for EnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unstable { genus, boundary } => write!(
                f,
                "no ribbon graphs of genus {genus} with {boundary} boundary cycles (need 2g + n >= 3, n >= 1)"
            ),
            Self::Graph(e) => write!(f, "graph construction failed: {e}"),
        }
    }
}

impl std::error::Error for EnumError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Graph(e) => Some(e),
            Self::Unstable { .. } => None,
        }
    }
}

impl From<GraphError> for EnumError {
    fn from(e: GraphError) -> Self {
        Self::Graph(e)
    }
}

/// Isomorphism classes of graphs, one representative each, in insertion order.
#[derive(Clone, Debug)]
pub struct GraphSet {
    cfg: EnumCfg,
    graphs: Vec<Arc<RibbonGraph>>,
    buckets: HashMap<Option<GraphInvariant>, Vec<usize>>,
}

impl GraphSet {
    pub fn new(cfg: EnumCfg) -> Self {
        Self {
            cfg,
            graphs: Vec::new(),
            buckets: HashMap::new(),
        }
    }

    fn key(&self, g: &RibbonGraph) -> Option<GraphInvariant> {
        self.cfg.bucket_by_invariant.then(|| g.invariant())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    pub fn graphs(&self) -> &[Arc<RibbonGraph>] {
        &self.graphs
    }

    pub fn get(&self, i: usize) -> Option<&Arc<RibbonGraph>> {
        self.graphs.get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<RibbonGraph>> {
        self.graphs.iter()
    }

    /// Index of the stored representative isomorphic to `g`, with an
    /// isomorphism from `g` onto it.
    pub fn find(&self, g: &RibbonGraph) -> Option<(usize, Isomorphism)> {
        self.buckets.get(&self.key(g))?.iter().find_map(|&i| {
            g.isomorphisms_to_with(&self.graphs[i], self.cfg.iso)
                .next()
                .map(|iso| (i, iso))
        })
    }

    pub fn contains(&self, g: &RibbonGraph) -> bool {
        self.find(g).is_some()
    }

    /// Add `g` unless an isomorphic graph is present; true when added.
    pub fn insert(&mut self, g: Arc<RibbonGraph>) -> bool {
        if self.contains(&g) {
            return false;
        }
        self.push_distinct(g);
        true
    }

    /// Add a graph known to be distinct from every stored one.
    pub(crate) fn push_distinct(&mut self, g: Arc<RibbonGraph>) {
        let key = self.key(&g);
        self.buckets.entry(key).or_default().push(self.graphs.len());
        self.graphs.push(g);
    }
}

impl<'a> IntoIterator for &'a GraphSet {
    type Item = &'a Arc<RibbonGraph>;
    type IntoIter = std::slice::Iter<'a, Arc<RibbonGraph>>;

    fn into_iter(self) -> Self::IntoIter {
        self.graphs.iter()
    }
}

fn partitions(
    total: usize,
    parts: usize,
    min: usize,
    prefix: &mut Vec<usize>,
    out: &mut Vec<Vec<usize>>,
) {
    if parts == 0 {
        if total == 0 {
            out.push(prefix.clone());
        }
        return;
    }
    let mut part = min;
    while part * parts <= total {
        prefix.push(part);
        partitions(total - part, parts - 1, part, prefix, out);
        prefix.pop();
        part += 1;
    }
}

/// Valence profiles of (g, n) graphs with all valences at least 3, by vertex
/// count: partitions of `2L` into `K` parts, `L = 2g + n + K - 2` edges.
pub fn valence_profiles(genus: usize, boundary: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if boundary == 0 || 2 * genus + boundary < 3 {
        return out;
    }
    for vertices in 1.. {
        let edges = 2 * genus + boundary + vertices - 2;
        let mut found = Vec::new();
        partitions(2 * edges, vertices, 3, &mut Vec::new(), &mut found);
        if found.is_empty() {
            break;
        }
        out.extend(found);
    }
    out
}

/// One representative per isomorphism class of connected graphs with the
/// given valences, in order of first canonical labeling found.
pub fn enumerate_by_valence(profile: &[usize], cfg: &EnumCfg) -> Result<GraphSet, EnumError> {
    let total: usize = profile.iter().sum();
    if total % 2 != 0 || profile.contains(&0) {
        return Err(GraphError::malformed(format!("invalid valence profile {profile:?}")).into());
    }
    let factory = cfg.vertex_factory();
    let mut labels: Vec<usize> = (0..total / 2).flat_map(|e| [e, e]).collect();
    let mut set = GraphSet::new(*cfg);
    let mut candidates = 0usize;
    loop {
        let g = RibbonGraph::from_profile(profile, &labels, factory.as_ref())?;
        if g.is_canonical() && g.is_connected() {
            candidates += 1;
            set.insert(Arc::new(g));
        }
        if !next_permutation(&mut labels) {
            break;
        }
    }
    debug!(?profile, candidates, classes = set.len(), "enumerated valence profile");
    Ok(set)
}
