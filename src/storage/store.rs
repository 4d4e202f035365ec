//! Durable record store for batch jobs.
//!
//! The store is a single human-readable JSON document holding an array of
//! [`BatchRecord`]s, rewritten in full on every mutation. Insertion order is
//! preserved (newest last) and is itself the creation-time ordering. All
//! components that change a record read the full store, mutate the record,
//! and write the full store back.
//!
//! Corruption of the durability layer degrades to "no history": `load()` on
//! a missing or unparsable file returns an empty collection, never an error.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::batch::BatchRecord;
use crate::error::Result;
use crate::storage::paths::AppPaths;

/// Whole-file record store.
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Create a store at the default application data path.
    #[must_use]
    pub fn new() -> Self {
        Self {
            path: AppPaths::new().requests_file(),
        }
    }

    /// Create a store backed by a specific file (useful for tests).
    #[must_use]
    pub const fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// The backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all records, in insertion order.
    ///
    /// A missing file yields an empty collection; an unparsable file is
    /// logged and also yields an empty collection.
    #[must_use]
    pub fn load(&self) -> Vec<BatchRecord> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return Vec::new(),
        };

        match serde_json::from_str(&content) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "record store is not valid JSON, starting empty: {e}"
                );
                Vec::new()
            }
        }
    }

    /// Replace the entire persisted collection.
    ///
    /// The write is atomic from a reader's point of view (temp file + rename
    /// in the same directory) with best-effort restrictive permissions.
    pub fn save(&self, records: &[BatchRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(records)?;
        write_atomic(&self.path, content.as_bytes())?;
        restrict_permissions(&self.path);
        Ok(())
    }

    /// Append one record and persist.
    pub fn append(&self, record: BatchRecord) -> Result<Vec<BatchRecord>> {
        let mut records = self.load();
        records.push(record);
        self.save(&records)?;
        Ok(records)
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Write bytes atomically using temp file + rename.
/// This prevents a reader from observing a partially written collection.
fn write_atomic(path: &Path, content: &[u8]) -> std::io::Result<()> {
    // Temp file must live in the same directory for the rename to be atomic
    let parent = path.parent().unwrap_or(Path::new("."));
    let temp_path = parent.join(format!(
        ".{}.tmp.{}",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("store"),
        std::process::id()
    ));

    {
        let mut file = std::fs::File::create(&temp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
    }

    std::fs::rename(&temp_path, path)?;
    Ok(())
}

/// Best-effort owner-only permissions on the store file.
fn restrict_permissions(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600));
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
}
