//! Ribbon graphs of a fixed topological type (genus g, n boundary cycles).
//!
//! Trivalent graphs come from roses: a rose with `k = 2g + n - 1` loops has
//! `2k` half-edges at one vertex; replacing that vertex by a trivalent tree with
//! `2k - 1` leaves keeps the surface and yields every trivalent graph of the
//! type. Graphs with fewer edges are contractions of trivalent ones.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};

use super::{enumerate_by_valence, BinaryTree, BinaryTrees, EnumCfg, EnumError, GraphSet};
use crate::graph::{GraphError, RibbonGraph, VertexFactory};
use crate::iso::next_permutation;

/// All un-numbered graphs of one (g, n) type, grouped by edge count.
#[derive(Clone, Debug)]
pub struct MgnGraphs {
    pub genus: usize,
    pub boundary: usize,
    levels: BTreeMap<usize, GraphSet>,
}

impl MgnGraphs {
    /// Total number of isomorphism classes over all edge counts.
    pub fn len(&self) -> usize {
        self.levels.values().map(GraphSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(edge count, graphs)`, fewest edges first.
    pub fn levels(&self) -> impl Iterator<Item = (usize, &GraphSet)> + '_ {
        self.levels.iter().map(|(&e, set)| (e, set))
    }

    pub fn graphs_with_edges(&self, edges: usize) -> Option<&GraphSet> {
        self.levels.get(&edges)
    }

    /// Edge count of the trivalent graphs, `6g + 3n - 6`.
    pub fn top_edges(&self) -> usize {
        6 * self.genus + 3 * self.boundary - 6
    }
}

/// Replace the vertex with cyclic order `legs` by the trivalent tree `tree`.
///
/// Tree nodes become vertices `[parent, left, right]` in preorder. The root's
/// parent edge is `legs[0]`, leaves take `legs[1..]` left to right, and the
/// edge above internal node `c > 0` is labelled `first_new + c - 1`.
pub fn graft(
    legs: &[usize],
    tree: &BinaryTree,
    first_new: usize,
    factory: &dyn VertexFactory,
) -> Result<RibbonGraph, GraphError> {
    if legs.len() != tree.leaves() + 1 || tree.is_empty() {
        return Err(GraphError::malformed(format!(
            "cannot graft a tree with {} leaves onto a vertex of valence {}",
            tree.leaves(),
            legs.len()
        )));
    }
    let mut vertices: Vec<Vec<usize>> = vec![Vec::new(); tree.len()];
    let mut leaves = legs[1..].iter().copied();
    attach(0, legs[0], tree, first_new, &mut leaves, &mut vertices)?;
    RibbonGraph::from_vertices(vertices.iter().map(|v| factory.make(v)).collect())
}

/// Fill in `node` and its subtree, consuming leaf labels left to right.
fn attach(
    node: usize,
    parent: usize,
    tree: &BinaryTree,
    first_new: usize,
    leaves: &mut dyn Iterator<Item = usize>,
    vertices: &mut [Vec<usize>],
) -> Result<(), GraphError> {
    let mut labels = Vec::with_capacity(3);
    labels.push(parent);
    for child in [tree.left(node), tree.right(node)] {
        let label = match child {
            Some(c) => {
                let label = first_new + c - 1;
                attach(c, label, tree, first_new, leaves, vertices)?;
                label
            }
            None => leaves
                .next()
                .ok_or_else(|| GraphError::malformed("tree has more leaves than legs"))?,
        };
        labels.push(label);
    }
    vertices[node] = labels;
    Ok(())
}

/// Every (g, n) ribbon graph with all valences at least 3, one per
/// isomorphism class, built top-down from the trivalent ones.
pub fn enumerate_moduli_space(
    genus: usize,
    boundary: usize,
    cfg: &EnumCfg,
) -> Result<MgnGraphs, EnumError> {
    if boundary == 0 || 2 * genus + boundary < 3 {
        return Err(EnumError::Unstable { genus, boundary });
    }
    let k = 2 * genus + boundary - 1;
    let factory = cfg.vertex_factory();

    let roses = enumerate_by_valence(&[2 * k], cfg)?;
    let mut trivalent = GraphSet::new(*cfg);
    for rose in roses.iter().filter(|r| r.num_boundary_cycles() == boundary) {
        for shift in 0..2 * k {
            let legs = rose.vertex(0).rotated(shift);
            for tree in BinaryTrees::new(2 * k - 2) {
                let g = graft(legs.as_slice(), &tree, k, factory.as_ref())?;
                trivalent.insert(Arc::new(g));
            }
        }
    }
    info!(
        genus,
        boundary,
        roses = roses.len(),
        trivalent = trivalent.len(),
        "grafted trivalent graphs"
    );

    let mut levels = BTreeMap::new();
    let mut edges = 6 * genus + 3 * boundary - 6;
    let mut current = trivalent;
    loop {
        let done = current.iter().all(|g| g.num_vertices() <= 1);
        let mut next = GraphSet::new(*cfg);
        if !done {
            for g in &current {
                for e in (0..g.num_edges()).filter(|&e| !g.is_loop(e)) {
                    next.insert(g.contract_with(e, factory.as_ref())?);
                }
            }
        }
        levels.insert(edges, current);
        if done || next.is_empty() {
            break;
        }
        edges -= 1;
        info!(genus, boundary, edges, graphs = next.len(), "contracted level");
        current = next;
    }
    Ok(MgnGraphs {
        genus,
        boundary,
        levels,
    })
}

/// All inequivalent boundary numberings of `g`, one numbered graph per class.
pub fn make_numbered_variants(
    g: &RibbonGraph,
    cfg: &EnumCfg,
) -> Result<Vec<Arc<RibbonGraph>>, EnumError> {
    let mut labels: Vec<usize> = (0..g.num_boundary_cycles()).collect();
    let mut set = GraphSet::new(*cfg);
    loop {
        set.insert(Arc::new(g.with_numbering(labels.clone())?));
        if !next_permutation(&mut labels) {
            break;
        }
    }
    debug!(graph = %g, variants = set.len(), "numbered variants");
    Ok(set.graphs().to_vec())
}
