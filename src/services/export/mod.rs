//! JSON snapshot export/import for interval collections.
//!
//! A snapshot is a flat ordered list of interval records tagged with a format
//! version. Imports get basic shape checks only.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeError;

use crate::models::interval::Interval;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub intervals: Vec<Interval>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            intervals: Vec::new(),
        }
    }
}

impl Snapshot {
    pub fn new(intervals: Vec<Interval>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            intervals,
        }
    }

    /// Version supported, every record valid, ids unique.
    pub fn validate(&self) -> Result<()> {
        if self.version == 0 || self.version > SNAPSHOT_VERSION {
            bail!("unsupported snapshot version {}", self.version);
        }

        let mut seen = HashSet::new();
        for (index, interval) in self.intervals.iter().enumerate() {
            interval
                .validate()
                .map_err(|e| anyhow!("interval #{} ({}): {}", index, interval.id, e))?;
            if !seen.insert(interval.id) {
                bail!("duplicate interval id {}", interval.id);
            }
        }

        Ok(())
    }
}

pub fn to_json(snapshot: &Snapshot) -> Result<String> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

pub fn from_json(data: &str) -> Result<Snapshot> {
    let snapshot: Snapshot =
        serde_json::from_str(data).context("failed to parse interval snapshot")?;
    snapshot.validate()?;
    Ok(snapshot)
}

pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    if !path.exists() {
        return Ok(Snapshot::default());
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read intervals from {}", path.display()))?;
    let snapshot: Snapshot =
        serde_json::from_str(&data).map_err(|err| map_deser_error(err, path))?;
    snapshot
        .validate()
        .with_context(|| format!("invalid interval snapshot {}", path.display()))?;
    Ok(snapshot)
}

pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create dir {}", parent.display()))?;
        }
    }

    let data = to_json(snapshot)?;
    fs::write(path, data)
        .with_context(|| format!("failed to write intervals to {}", path.display()))?;
    Ok(())
}

fn map_deser_error(err: SerdeError, path: &Path) -> anyhow::Error {
    anyhow::Error::new(err).context(format!(
        "failed to deserialize intervals from {}",
        path.display()
    ))
}
