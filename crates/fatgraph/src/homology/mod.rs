//! Chain complexes, exact ranks and the ribbon-graph complex of M_{g,n}.
//!
//! Purpose
//! - `ChainComplex`: graded dimensions plus sparse integer boundary matrices,
//!   with rank–nullity turning boundary ranks into homology ranks.
//! - `FatgraphComplex`: the complex spanned by oriented numbered ribbon graphs
//!   of type (g, n), graded by edge count, with the edge-contraction
//!   differential.
//! - Exact rank computation behind the `RankOracle` trait, and resumable
//!   computations through the `CheckpointStore` trait.
//!
//! Why this design
//! - All arithmetic is over the integers: sparse fraction-free elimination by
//!   default, dense Bareiss elimination (`nalgebra`) as a cross-check. Overflow
//!   is reported, never wrapped.
//! - A rank is the only long-running step, so it is the unit of checkpointing
//!   (key `M{g},{n}-D{i}.rank`).
//!
//! References
//! - Harer–Zagier, "The Euler characteristic of the moduli space of curves"
//!   (orbifold Euler characteristic used as a consistency check).
//! - Kontsevich, "Formal (non)commutative symplectic geometry" (graph complex).

mod checkpoint;
mod complex;
mod euler;
mod graph_complex;
mod matrix;
mod rank;

pub use checkpoint::{checkpoint_key, moduli_label, CheckpointStore, MemoryCheckpoints, NoCheckpoints};
pub use complex::ChainComplex;
pub use euler::{bernoulli, orbifold_euler_characteristic};
pub use graph_complex::{compute_homology, EulerCheck, FatgraphComplex, HomologyCfg};
pub use matrix::SparseMatrix;
pub use rank::{DenseBareiss, RankOracle, SparseElimination};

use std::fmt;

use crate::enumerate::EnumError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HomologyError {
    Enumeration(EnumError),
    Shape { reason: String },
    DifferentialNotNull { degree: usize },
    RankNullity { degree: usize },
    Overflow,
    Checkpoint { key: String, reason: String },
}

impl HomologyError {
    pub(crate) fn shape(reason: impl Into<String>) -> Self {
        Self::Shape {
            reason: reason.into(),
        }
    }

    pub fn checkpoint(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Checkpoint {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for HomologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enumeration(e) => write!(f, "enumeration failed: {e}"),
            Self::Shape { reason } => write!(f, "matrix shape mismatch: {reason}"),
            Self::DifferentialNotNull { degree } => {
                write!(f, "D[{}] ∘ D[{degree}] is not zero", degree - 1)
            }
            Self::RankNullity { degree } => {
                write!(f, "boundary ranks exceed the dimension of degree {degree}")
            }
            Self::Overflow => write!(f, "integer overflow during exact elimination"),
            Self::Checkpoint { key, reason } => write!(f, "checkpoint {key}: {reason}"),
        }
    }
}

impl std::error::Error for HomologyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Enumeration(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EnumError> for HomologyError {
    fn from(e: EnumError) -> Self {
        Self::Enumeration(e)
    }
}

impl From<crate::graph::GraphError> for HomologyError {
    fn from(e: crate::graph::GraphError) -> Self {
        Self::Enumeration(EnumError::Graph(e))
    }
}
