//! The bounded code-translation history store.
//!
//! `CodeHistory` keeps entries most-recent-first behind a `Mutex` and never
//! holds more than `CodeHistory::CAPACITY` of them. When opened on a file it
//! rewrites the whole file after every mutation.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info, warn};

use vaidya_contracts::error::{VaidyaError, VaidyaResult};

use crate::entry::{CodeHistoryEntry, HistoryStatus};

pub struct CodeHistory {
    path: Option<PathBuf>,
    entries: Mutex<Vec<CodeHistoryEntry>>,
}

impl CodeHistory {
    /// Maximum number of retained entries.
    pub const CAPACITY: usize = 100;

    /// A history that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Open a history backed by the JSON file at `path`.
    ///
    /// A missing file starts an empty history. An unreadable or corrupt file
    /// is logged and also treated as empty; it is overwritten on the next
    /// mutation.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut entries = load(&path);
        entries.truncate(Self::CAPACITY);
        debug!(path = %path.display(), count = entries.len(), "history opened");
        Self {
            path: Some(path),
            entries: Mutex::new(entries),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Insert `entry` at the front, dropping the oldest entries beyond capacity.
    pub fn record(&self, entry: CodeHistoryEntry) -> VaidyaResult<()> {
        let mut entries = self.lock()?;
        let id = entry.id.clone();
        let mut staged = Vec::with_capacity(Self::CAPACITY);
        staged.push(entry);
        staged.extend(entries.iter().take(Self::CAPACITY - 1).cloned());

        self.persist(&staged)?;
        *entries = staged;
        info!(id = %id, "history entry recorded");
        Ok(())
    }

    /// Snapshot of every entry, most recent first.
    pub fn entries(&self) -> VaidyaResult<Vec<CodeHistoryEntry>> {
        Ok(self.lock()?.clone())
    }

    /// Entries whose diagnosis, TM2 code or ICD-11 code contains `term`,
    /// ignoring case. Order is preserved.
    pub fn search(&self, term: &str) -> VaidyaResult<Vec<CodeHistoryEntry>> {
        Ok(self
            .lock()?
            .iter()
            .filter(|e| e.matches(term))
            .cloned()
            .collect())
    }

    /// Mark the entry with `id` as archived. Returns false if no such entry.
    pub fn archive(&self, id: &str) -> VaidyaResult<bool> {
        let mut entries = self.lock()?;
        let Some(index) = entries.iter().position(|e| e.id == id) else {
            return Ok(false);
        };
        let mut staged = entries.clone();
        staged[index].status = HistoryStatus::Archived;

        self.persist(&staged)?;
        *entries = staged;
        info!(id = %id, "history entry archived");
        Ok(true)
    }

    pub fn len(&self) -> VaidyaResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> VaidyaResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> VaidyaResult<MutexGuard<'_, Vec<CodeHistoryEntry>>> {
        self.entries.lock().map_err(|_| VaidyaError::HistoryError {
            reason: "history lock poisoned".to_string(),
        })
    }

    fn persist(&self, entries: &[CodeHistoryEntry]) -> VaidyaResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(entries).map_err(|e| VaidyaError::HistoryError {
            reason: format!("failed to serialize history: {e}"),
        })?;
        std::fs::write(path, json).map_err(|e| VaidyaError::HistoryError {
            reason: format!("failed to write history file '{}': {e}", path.display()),
        })
    }
}

fn load(path: &Path) -> Vec<CodeHistoryEntry> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "history file unreadable, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str(&contents) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "history file corrupt, starting empty");
            Vec::new()
        }
    }
}
