//! The ribbon-graph complex of M_{g,n}.

use num_rational::Rational64;
use num_traits::CheckedAdd;
use tracing::{info, warn};

use super::complex::alternating_sum;
use super::{
    moduli_label, orbifold_euler_characteristic, ChainComplex, CheckpointStore, HomologyError,
    NoCheckpoints, RankOracle, SparseElimination, SparseMatrix,
};
use crate::enumerate::{
    enumerate_moduli_space, make_numbered_variants, EnumCfg, EnumError, GraphSet, MgnGraphs,
};

/// Homology configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HomologyCfg {
    pub enumerate: EnumCfg,
    /// Verify `D[i-1] ∘ D[i] = 0` before computing ranks.
    pub check_differentials: bool,
}

impl Default for HomologyCfg {
    fn default() -> Self {
        Self {
            enumerate: EnumCfg::default(),
            check_differentials: true,
        }
    }
}

/// An expected Euler characteristic next to the one computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EulerCheck {
    pub name: &'static str,
    pub expected: Rational64,
    pub computed: Rational64,
}

impl EulerCheck {
    pub fn matches(&self) -> bool {
        self.expected == self.computed
    }
}

/// Oriented numbered (g, n) graphs graded by edge count, with the
/// edge-contraction differential.
///
/// `basis(i)` spans `C[i]`, the graphs with `i + 1` edges. Graphs carrying an
/// orientation-reversing automorphism vanish in the complex and are left out.
#[derive(Debug)]
pub struct FatgraphComplex {
    pub genus: usize,
    pub boundary: usize,
    cfg: HomologyCfg,
    basis: Vec<GraphSet>,
    complex: ChainComplex,
    orbifold_euler: Rational64,
    expected_orbifold_euler: Rational64,
    numbered: usize,
}

impl FatgraphComplex {
    /// Enumerate M_{g,n} and assemble its complex.
    pub fn build(genus: usize, boundary: usize, cfg: &HomologyCfg) -> Result<Self, HomologyError> {
        let graphs = enumerate_moduli_space(genus, boundary, &cfg.enumerate)?;
        Self::from_graphs(&graphs, cfg)
    }

    /// Assemble the complex from an existing enumeration.
    pub fn from_graphs(graphs: &MgnGraphs, cfg: &HomologyCfg) -> Result<Self, HomologyError> {
        let (genus, boundary) = (graphs.genus, graphs.boundary);
        if boundary == 0 || 2 * genus + boundary < 3 {
            return Err(EnumError::Unstable { genus, boundary }.into());
        }
        let expected_orbifold_euler =
            orbifold_euler_characteristic(genus, boundary).ok_or(HomologyError::Overflow)?;
        let top = graphs.top_edges();

        let mut basis: Vec<GraphSet> = (0..top).map(|_| GraphSet::new(cfg.enumerate)).collect();
        let mut orbifold_euler = Rational64::from_integer(0);
        let mut numbered = 0usize;
        for (edges, level) in graphs.levels() {
            let sign = if (top - edges) % 2 == 0 { 1 } else { -1 };
            for g in level {
                for variant in make_numbered_variants(g, &cfg.enumerate)? {
                    numbered += 1;
                    let automorphisms = variant.automorphisms().count() as i64;
                    orbifold_euler = orbifold_euler
                        .checked_add(&Rational64::new(sign, automorphisms))
                        .ok_or(HomologyError::Overflow)?;
                    if variant.is_oriented() {
                        // numbered variants of distinct classes are never isomorphic
                        basis[edges - 1].push_distinct(variant);
                    }
                }
            }
        }

        let dims: Vec<usize> = basis.iter().map(GraphSet::len).collect();
        let mut complex = ChainComplex::new(dims).with_label(moduli_label(genus, boundary));
        let factory = cfg.enumerate.vertex_factory();
        for degree in 1..top {
            let (below, above) = (&basis[degree - 1], &basis[degree]);
            let mut m = SparseMatrix::zeros(below.len(), above.len());
            for (col, g) in above.iter().enumerate() {
                for edge in (0..g.num_edges()).filter(|&e| !g.is_loop(e)) {
                    let contracted = g.contract_with(edge, factory.as_ref())?;
                    if let Some((row, iso)) = below.find(&contracted) {
                        let sign = if edge % 2 == 0 { 1 } else { -1 };
                        m.add_to_entry(row, col, sign * i64::from(iso.orientation_sign()));
                    }
                }
            }
            info!(
                genus,
                boundary,
                degree,
                rows = m.rows(),
                cols = m.cols(),
                nnz = m.nnz(),
                "assembled boundary matrix"
            );
            complex.set_differential(degree, m)?;
        }

        Ok(Self {
            genus,
            boundary,
            cfg: *cfg,
            basis,
            complex,
            orbifold_euler,
            expected_orbifold_euler,
            numbered,
        })
    }

    /// Basis of `C[degree]`: graphs with `degree + 1` edges.
    pub fn basis(&self, degree: usize) -> &GraphSet {
        &self.basis[degree]
    }

    pub fn complex(&self) -> &ChainComplex {
        &self.complex
    }

    /// Edge count of the trivalent graphs; also the length of the complex.
    pub fn top_edges(&self) -> usize {
        self.basis.len()
    }

    /// Σ (-1)^{L - E(G)} / |Aut G| over all numbered graphs.
    pub fn orbifold_euler_characteristic(&self) -> Rational64 {
        self.orbifold_euler
    }

    /// Number of numbered graphs, oriented or not.
    pub fn numbered_graphs(&self) -> usize {
        self.numbered
    }

    /// Coefficients `(row, coefficient)` of `D(basis(degree)[col])` in `basis(degree - 1)`.
    pub fn boundary_of(&self, degree: usize, col: usize) -> Vec<(usize, i64)> {
        if degree == 0 {
            return Vec::new();
        }
        self.complex
            .differential(degree)
            .column(col)
            .iter()
            .map(|(&row, &x)| (row, x))
            .collect()
    }

    /// Euler checks for the per-`C[i]` ranks `ranks`.
    pub fn euler_checks(&self, ranks: &[usize]) -> [EulerCheck; 2] {
        [
            EulerCheck {
                name: "chain",
                expected: Rational64::from_integer(self.complex.euler_characteristic()),
                computed: Rational64::from_integer(alternating_sum(ranks)),
            },
            EulerCheck {
                name: "orbifold",
                expected: self.expected_orbifold_euler,
                computed: self.orbifold_euler,
            },
        ]
    }

    /// Homology ranks, degree 0 (trivalent graphs) first.
    pub fn homology(
        &self,
        oracle: &dyn RankOracle,
        checkpoints: &mut dyn CheckpointStore,
    ) -> Result<Vec<usize>, HomologyError> {
        if self.cfg.check_differentials {
            self.complex.check_differentials()?;
        }
        let mut ranks = self.complex.compute_homology_ranks(oracle, checkpoints)?;
        for check in self.euler_checks(&ranks) {
            if !check.matches() {
                warn!(
                    genus = self.genus,
                    boundary = self.boundary,
                    check = check.name,
                    expected = %check.expected,
                    computed = %check.computed,
                    "Euler characteristic mismatch"
                );
            }
        }
        ranks.reverse();
        Ok(ranks)
    }
}

/// Homology ranks of M_{g,n}, degree 0 first, without checkpoints.
pub fn compute_homology(
    genus: usize,
    boundary: usize,
    cfg: &HomologyCfg,
) -> Result<Vec<usize>, HomologyError> {
    FatgraphComplex::build(genus, boundary, cfg)?.homology(&SparseElimination, &mut NoCheckpoints)
}
