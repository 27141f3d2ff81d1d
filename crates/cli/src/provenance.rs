//! Provenance sidecars for results written with `--out`.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Action and parameters that produced a result.
pub struct Payload {
    pub action: &'static str,
    pub params: Value,
}

impl Payload {
    pub fn new(action: &'static str, params: Value) -> Self {
        Self { action, params }
    }
}

#[derive(Serialize)]
struct Callsite<'a> {
    file: &'a str,
    line: u32,
}

#[derive(Serialize)]
struct Sidecar<'a> {
    code_rev: String,
    fatgraph_version: &'static str,
    callsite: Callsite<'a>,
    action: &'static str,
    params: &'a Value,
    outputs: Vec<String>,
}

/// Write `<stem>.provenance.json` next to `artifact`; returns its path.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let location = Location::caller();
    let sidecar = Sidecar {
        code_rev: code_rev(),
        fatgraph_version: fatgraph::VERSION,
        callsite: Callsite {
            file: location.file(),
            line: location.line(),
        },
        action: payload.action,
        params: &payload.params,
        outputs: vec![artifact.display().to_string()],
    };
    let path = sidecar_path(artifact);
    std::fs::write(&path, serde_json::to_vec_pretty(&sidecar)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    artifact.with_extension("provenance.json")
}

/// `GIT_COMMIT` (build time, then run time), else `git rev-parse HEAD`, else `unknown`.
fn code_rev() -> String {
    let from_env = option_env!("GIT_COMMIT")
        .map(str::to_owned)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|rev| !rev.is_empty());
    from_env
        .or_else(|| {
            let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
            out.status
                .success()
                .then(|| String::from_utf8_lossy(&out.stdout).trim().to_owned())
        })
        .unwrap_or_else(|| "unknown".to_owned())
}
