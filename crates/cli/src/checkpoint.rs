//! Directory-backed rank checkpoints: one JSON file per key.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fatgraph::homology::{CheckpointStore, HomologyError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct Entry {
    key: String,
    rank: usize,
}

pub struct DirCheckpoints {
    dir: PathBuf,
}

impl DirCheckpoints {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating checkpoint dir {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CheckpointStore for DirCheckpoints {
    fn load(&self, key: &str) -> Result<Option<usize>, HomologyError> {
        let bytes = match fs::read(self.path(key)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(HomologyError::checkpoint(key, e.to_string())),
        };
        let entry: Entry = serde_json::from_slice(&bytes)
            .map_err(|e| HomologyError::checkpoint(key, e.to_string()))?;
        if entry.key != key {
            return Err(HomologyError::checkpoint(
                key,
                format!("file holds key {}", entry.key),
            ));
        }
        Ok(Some(entry.rank))
    }

    fn save(&mut self, key: &str, value: usize) -> Result<(), HomologyError> {
        let entry = Entry {
            key: key.to_owned(),
            rank: value,
        };
        let bytes = serde_json::to_vec_pretty(&entry)
            .map_err(|e| HomologyError::checkpoint(key, e.to_string()))?;
        let path = self.path(key);
        let partial = path.with_extension("json.partial");
        fs::write(&partial, bytes)
            .and_then(|()| fs::rename(&partial, &path))
            .map_err(|e| HomologyError::checkpoint(key, e.to_string()))
    }
}
