//! Ribbon graphs (fatgraphs) and the graph-complex homology of M_{g,n}.
//!
//! Layers, bottom-up:
//! - `cyclic`: sequences compared up to rotation, with repetition patterns.
//! - `graph`: ribbon graphs, boundary cycles, numberings and edge contraction.
//! - `iso`: isomorphism search and orientation signs.
//! - `enumerate`: graphs by valence profile and by topological type (g, n).
//! - `homology`: exact ranks and the ribbon-graph complex of M_{g,n}.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API.
//! - Configuration is passed explicitly (`IsoCfg`, `EnumCfg`, `HomologyCfg`);
//!   there is no process-wide state.

pub mod cyclic;
pub mod enumerate;
pub mod graph;
pub mod homology;
pub mod iso;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cyclic::CyclicSequence;
pub use graph::{GraphError, RibbonGraph};
pub use homology::{compute_homology, HomologyCfg, HomologyError};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cyclic::{CyclicSequence, RepetitionPattern};
    pub use crate::enumerate::{
        enumerate_by_valence, enumerate_moduli_space, make_numbered_variants, valence_profiles,
        EnumCfg, EnumError, GraphSet, MgnGraphs,
    };
    pub use crate::graph::{GraphError, HalfEdge, RibbonGraph, Vertex};
    pub use crate::homology::{
        compute_homology, ChainComplex, CheckpointStore, FatgraphComplex, HomologyCfg,
        HomologyError, RankOracle, SparseElimination,
    };
    pub use crate::iso::{IsoCfg, Isomorphism};
}
