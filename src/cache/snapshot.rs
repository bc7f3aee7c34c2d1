//! Cache snapshot persistence.
//!
//! The snapshot is a JSON file mapping fingerprint keys to entries. It is a
//! best-effort copy: losing or corrupting it only costs recomputation.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cache::{current_timestamp_ms, CacheEntry};
use crate::error::{RecommendError, Result};

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    version: u32,
    saved_at: u64,
    entries: HashMap<String, CacheEntry>,
}

/// Writes entries to `path` through a temporary file and a rename.
pub fn save(path: &Path, entries: HashMap<String, CacheEntry>) -> Result<()> {
    let file = SnapshotFile {
        version: SNAPSHOT_VERSION,
        saved_at: current_timestamp_ms(),
        entries,
    };
    let data = serde_json::to_vec(&file)
        .map_err(|err| RecommendError::Internal(format!("Cannot encode snapshot: {}", err)))?;
    write_atomic(path, &data).map_err(|err| {
        RecommendError::Internal(format!("Cannot write {}: {}", path.display(), err))
    })
}

// == Load ==
/// Reads a snapshot. A missing file is an empty cache; an unreadable or
/// undecodable one is `CacheCorrupt`.
pub fn load(path: &Path) -> Result<HashMap<String, CacheEntry>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let raw = fs::read(path).map_err(|err| {
        RecommendError::CacheCorrupt(format!("Cannot read {}: {}", path.display(), err))
    })?;
    let file: SnapshotFile = serde_json::from_slice(&raw).map_err(|err| {
        RecommendError::CacheCorrupt(format!("{}: {}", path.display(), err))
    })?;
    if file.version != SNAPSHOT_VERSION {
        return Err(RecommendError::CacheCorrupt(format!(
            "{}: unsupported snapshot version {}",
            path.display(),
            file.version
        )));
    }
    Ok(file.entries)
}

fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&tmp)?;
    file.write_all(data)?;
    file.sync_all()?;
    fs::rename(tmp, path)
}
