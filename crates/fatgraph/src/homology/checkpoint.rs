//! Checkpoint store interface for rank results.

use std::collections::HashMap;

use super::HomologyError;

/// Durable `key → rank` store. A missing key is `Ok(None)`, not an error.
pub trait CheckpointStore {
    fn load(&self, key: &str) -> Result<Option<usize>, HomologyError>;

    fn save(&mut self, key: &str, value: usize) -> Result<(), HomologyError>;
}

/// Never stores anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCheckpoints;

impl CheckpointStore for NoCheckpoints {
    fn load(&self, _key: &str) -> Result<Option<usize>, HomologyError> {
        Ok(None)
    }

    fn save(&mut self, _key: &str, _value: usize) -> Result<(), HomologyError> {
        Ok(())
    }
}

/// In-process store, mostly for tests and repeated runs inside one process.
#[derive(Clone, Debug, Default)]
pub struct MemoryCheckpoints {
    entries: HashMap<String, usize>,
}

impl MemoryCheckpoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.entries.get(key).copied()
    }
}

impl CheckpointStore for MemoryCheckpoints {
    fn load(&self, key: &str) -> Result<Option<usize>, HomologyError> {
        Ok(self.get(key))
    }

    fn save(&mut self, key: &str, value: usize) -> Result<(), HomologyError> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Label of the (g, n) graph complex, e.g. `M1,2`.
pub fn moduli_label(genus: usize, boundary: usize) -> String {
    format!("M{genus},{boundary}")
}

/// Key of the rank of `D[degree]`, e.g. `M1,2-D3.rank`.
pub fn checkpoint_key(label: &str, degree: usize) -> String {
    format!("{label}-D{degree}.rank")
}
