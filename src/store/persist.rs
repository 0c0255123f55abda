//! JSON file persistence shared by the settings store and the subscription log.
//!
//! ERROR HANDLING
//! ==============
//! Reads never fail: a missing file is an empty document and a corrupt file
//! is logged and replaced by the default on the next write. Writes return a
//! `PersistError` so callers can log it and keep their in-memory state.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("io error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Load a JSON document, falling back to `T::default()` when the file is
/// missing or unreadable.
pub fn load_json<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return T::default(),
        Err(e) => {
            warn!(error = %e, path = %path.display(), "failed to read persisted document; starting empty");
            return T::default();
        }
    };

    if raw.trim().is_empty() {
        return T::default();
    }

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(error = %e, path = %path.display(), "corrupt persisted document; starting empty");
        T::default()
    })
}

/// Serialize `value` and replace the file at `path`.
///
/// Writes go to a sibling temp file first, then rename over the target so a
/// crash mid-write never leaves a truncated document behind.
pub fn write_json<T>(path: &Path, value: &T) -> Result<(), PersistError>
where
    T: Serialize + ?Sized,
{
    let body = serde_json::to_vec_pretty(value)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| PersistError::Io { path: parent.to_path_buf(), source })?;
    }

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body).map_err(|source| PersistError::Io { path: tmp.clone(), source })?;
    fs::rename(&tmp, path).map_err(|source| PersistError::Io { path: path.to_path_buf(), source })?;
    Ok(())
}

#[cfg(test)]
#[path = "persist_test.rs"]
mod tests;
