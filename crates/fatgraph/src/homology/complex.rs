//! Finite chain complexes of free modules over the integers.

use tracing::info;

use super::{checkpoint_key, CheckpointStore, HomologyError, RankOracle, SparseMatrix};

/// Modules `C[0..len]` given by their dimensions, and boundary maps
/// `D[i]: C[i] → C[i-1]` as `dim C[i-1] × dim C[i]` matrices.
///
/// `D[0]` is the null map to the zero module. A labelled complex checkpoints
/// its boundary ranks under `checkpoint_key(label, i)`.
#[derive(Clone, Debug)]
pub struct ChainComplex {
    label: Option<String>,
    dims: Vec<usize>,
    differentials: Vec<SparseMatrix>,
}

impl ChainComplex {
    /// Complex with the given dimensions and all boundary maps zero.
    pub fn new(dims: Vec<usize>) -> Self {
        let differentials = (0..dims.len())
            .map(|i| {
                let below = if i == 0 { 0 } else { dims[i - 1] };
                SparseMatrix::zeros(below, dims[i])
            })
            .collect();
        Self {
            label: None,
            dims,
            differentials,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Number of degrees.
    pub fn len(&self) -> usize {
        self.dims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dims.is_empty()
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn differential(&self, degree: usize) -> &SparseMatrix {
        &self.differentials[degree]
    }

    pub fn set_differential(&mut self, degree: usize, m: SparseMatrix) -> Result<(), HomologyError> {
        if degree == 0 || degree >= self.len() {
            return Err(HomologyError::shape(format!(
                "no boundary map D[{degree}] in a complex of length {}",
                self.len()
            )));
        }
        let expected = (self.dims[degree - 1], self.dims[degree]);
        if m.shape() != expected {
            return Err(HomologyError::shape(format!(
                "D[{degree}] is {:?}, expected {expected:?}",
                m.shape()
            )));
        }
        self.differentials[degree] = m;
        Ok(())
    }

    /// `Σ (-1)^i dim C[i]`.
    pub fn euler_characteristic(&self) -> i64 {
        alternating_sum(&self.dims)
    }

    /// Verify `D[i-1] ∘ D[i] = 0` for every `i`.
    pub fn check_differentials(&self) -> Result<(), HomologyError> {
        for degree in 2..self.len() {
            let composed = self.differentials[degree - 1].matmul(&self.differentials[degree])?;
            if !composed.is_zero() {
                return Err(HomologyError::DifferentialNotNull { degree });
            }
        }
        Ok(())
    }

    /// `rank D[i]` for `i = 0..=len`, with `D[0]` and `D[len]` null.
    pub fn boundary_ranks(
        &self,
        oracle: &dyn RankOracle,
        checkpoints: &mut dyn CheckpointStore,
    ) -> Result<Vec<usize>, HomologyError> {
        let mut ranks = vec![0; self.len() + 1];
        for degree in 1..self.len() {
            let m = &self.differentials[degree];
            if m.is_degenerate() {
                continue;
            }
            let key = self.label.as_deref().map(|l| checkpoint_key(l, degree));
            if let Some(key) = &key {
                if let Some(rank) = checkpoints.load(key)? {
                    info!(%key, rank, "rank restored from checkpoint");
                    ranks[degree] = rank;
                    continue;
                }
            }
            let rank = oracle.rank(m)?;
            info!(
                degree,
                rows = m.rows(),
                cols = m.cols(),
                nnz = m.nnz(),
                rank,
                oracle = oracle.name(),
                "computed boundary rank"
            );
            if let Some(key) = &key {
                checkpoints.save(key, rank)?;
            }
            ranks[degree] = rank;
        }
        Ok(ranks)
    }

    /// `h[i] = dim C[i] - rank D[i] - rank D[i+1]`.
    pub fn compute_homology_ranks(
        &self,
        oracle: &dyn RankOracle,
        checkpoints: &mut dyn CheckpointStore,
    ) -> Result<Vec<usize>, HomologyError> {
        let ranks = self.boundary_ranks(oracle, checkpoints)?;
        self.dims
            .iter()
            .enumerate()
            .map(|(i, &dim)| {
                dim.checked_sub(ranks[i] + ranks[i + 1])
                    .ok_or(HomologyError::RankNullity { degree: i })
            })
            .collect()
    }
}

pub(crate) fn alternating_sum(values: &[usize]) -> i64 {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| if i % 2 == 0 { v as i64 } else { -(v as i64) })
        .sum()
}
