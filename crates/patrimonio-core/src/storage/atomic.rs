//! Atomic JSON file operations.
//!
//! Writes go to a temp file in the same directory, are flushed and synced,
//! then renamed over the target. Readers therefore never observe a
//! half-written document, and a crash mid-write leaves the previous
//! contents intact.

use crate::{PatrimonioError, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;
use std::process;
use tracing::debug;

/// Read and parse a JSON file.
///
/// Returns `None` if the file doesn't exist, or an error if reading or
/// parsing fails.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let mut file =
        File::open(path).map_err(|e| PatrimonioError::storage_with_path(e, path))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| PatrimonioError::storage_with_path(e, path))?;

    let data: T = serde_json::from_str(&contents).map_err(|e| PatrimonioError::Json {
        message: format!("Failed to parse {}: {}", path.display(), e),
        source: Some(e),
    })?;

    Ok(Some(data))
}

/// Write data to a JSON file atomically.
///
/// Creates missing parent directories, serializes to a temp file suffixed
/// with the process id, syncs it to disk, then renames it over `path`.
pub fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)
                .map_err(|e| PatrimonioError::storage_with_path(e, parent))?;
        }
    }

    let temp_path = path.with_extension(format!("json.{}.tmp", process::id()));

    let serialized = serde_json::to_string_pretty(data).map_err(|e| PatrimonioError::Json {
        message: format!("Failed to serialize data: {}", e),
        source: Some(e),
    })?;

    {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| PatrimonioError::storage_with_path(e, &temp_path))?;

        file.write_all(serialized.as_bytes())
            .map_err(|e| PatrimonioError::storage_with_path(e, &temp_path))?;
        file.flush()
            .map_err(|e| PatrimonioError::storage_with_path(e, &temp_path))?;
        // Data must reach disk before the rename publishes it.
        file.sync_all()
            .map_err(|e| PatrimonioError::storage_with_path(e, &temp_path))?;
    }

    fs::rename(&temp_path, path).map_err(|e| PatrimonioError::Storage {
        message: format!(
            "Failed to rename {} to {}",
            temp_path.display(),
            path.display()
        ),
        path: Some(path.to_path_buf()),
        source: Some(e),
    })?;

    debug!("Atomically wrote {}", path.display());
    Ok(())
}
