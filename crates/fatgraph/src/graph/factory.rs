//! Vertex construction strategies.
//!
//! Enumeration and contraction build the same vertices over and over; the
//! interning factory hands out one shared `Arc` per distinct label window so
//! equal vertices share their cached repetition pattern.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::Vertex;

/// Construct (or retrieve) a vertex from an edge-label window.
pub trait VertexFactory: Send + Sync {
    fn make(&self, labels: &[usize]) -> Arc<Vertex>;
}

/// Fresh allocation per call.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainVertices;

impl VertexFactory for PlainVertices {
    fn make(&self, labels: &[usize]) -> Arc<Vertex> {
        Arc::new(Vertex::new(labels.to_vec()))
    }
}

/// Hash-consing factory keyed by the exact label window.
///
/// The key is the linear content, not the rotation class: the alignment of a
/// vertex is part of a graph's labeling and must be returned as given.
#[derive(Debug, Default)]
pub struct InternedVertices {
    pool: Mutex<HashMap<Vec<usize>, Arc<Vertex>>>,
}

impl InternedVertices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct vertices handed out so far.
    pub fn len(&self) -> usize {
        self.pool.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl VertexFactory for InternedVertices {
    fn make(&self, labels: &[usize]) -> Arc<Vertex> {
        let mut pool = self.pool.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(v) = pool.get(labels) {
            return Arc::clone(v);
        }
        let v = Arc::new(Vertex::new(labels.to_vec()));
        pool.insert(labels.to_vec(), Arc::clone(&v));
        v
    }
}
