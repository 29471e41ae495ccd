//! Version history — bounded list of generated code snapshots.
//!
//! Each generate or modify result is recorded as a `Version`. The list is
//! capped; the oldest entry is evicted first. Optionally mirrored to a JSON
//! file after every change. Saving is best-effort: failures are logged and
//! the in-memory history stays authoritative.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, warn};

/// Default history file, relative to the working directory.
pub const DEFAULT_PATH: &str = ".ui-builder/versions.json";

/// Default number of versions kept.
pub const DEFAULT_CAPACITY: usize = 20;

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("history serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One recorded result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Version {
    /// Strictly increasing across the life of a history.
    pub id: u64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub code: String,
    pub plan: Value,
    pub prompt: String,
}

/// On-disk layout.
#[derive(Debug, Default, Serialize, Deserialize)]
struct HistoryFile {
    #[serde(default)]
    current: Option<u64>,
    versions: Vec<Version>,
}

/// Bounded, ordered version list with a "current" pointer.
#[derive(Debug)]
pub struct VersionHistory {
    versions: Vec<Version>,
    current: Option<u64>,
    capacity: usize,
    last_id: u64,
    path: Option<PathBuf>,
}

impl VersionHistory {
    /// History that lives only in memory.
    pub fn in_memory(capacity: usize) -> Self {
        Self {
            versions: Vec::new(),
            current: None,
            capacity: capacity.max(1),
            last_id: 0,
            path: None,
        }
    }

    /// Load history from `path`, or start empty if the file is missing or
    /// unreadable. Later changes are saved back to the same file.
    pub fn open(path: &Path, capacity: usize) -> Self {
        let mut history = Self::in_memory(capacity);
        history.path = Some(path.to_path_buf());

        match load(path) {
            Ok(HistoryFile { current, mut versions }) => {
                let capacity = history.capacity;
                if versions.len() > capacity {
                    versions.drain(..versions.len() - capacity);
                }
                history.last_id = versions.iter().map(|v| v.id).max().unwrap_or(0);
                history.current = current
                    .filter(|id| versions.iter().any(|v| v.id == *id))
                    .or_else(|| versions.last().map(|v| v.id));
                history.versions = versions;
                debug!(path = %path.display(), count = history.versions.len(), "loaded version history");
            }
            Err(HistoryError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "ignoring unreadable version history"),
        }

        history
    }

    /// Record a new version and make it current. Evicts the oldest entries
    /// beyond capacity.
    pub fn add_version(&mut self, code: &str, plan: &Value, prompt: &str) -> Version {
        let timestamp = now_millis();
        let id = timestamp.max(self.last_id + 1);
        self.last_id = id;

        let version = Version {
            id,
            timestamp,
            code: code.to_string(),
            plan: plan.clone(),
            prompt: prompt.to_string(),
        };
        self.versions.push(version.clone());
        if self.versions.len() > self.capacity {
            let excess = self.versions.len() - self.capacity;
            self.versions.drain(..excess);
        }
        self.current = Some(id);

        self.persist();
        version
    }

    /// Make `id` current. `None` if no such version exists.
    pub fn rollback_to(&mut self, id: u64) -> Option<&Version> {
        let index = self.versions.iter().position(|v| v.id == id)?;
        self.current = Some(id);
        self.persist();
        self.versions.get(index)
    }

    pub fn current(&self) -> Option<&Version> {
        let id = self.current?;
        self.get(id)
    }

    pub fn current_id(&self) -> Option<u64> {
        self.current
    }

    pub fn get(&self, id: u64) -> Option<&Version> {
        self.versions.iter().find(|v| v.id == id)
    }

    /// Remove a version. If it was current, the newest remaining version
    /// becomes current. Returns false if `id` was unknown.
    pub fn delete_version(&mut self, id: u64) -> bool {
        let before = self.versions.len();
        self.versions.retain(|v| v.id != id);
        if self.versions.len() == before {
            return false;
        }
        if self.current == Some(id) {
            self.current = self.versions.last().map(|v| v.id);
        }
        self.persist();
        true
    }

    /// Drop every version and remove the backing file.
    pub fn clear(&mut self) {
        self.versions.clear();
        self.current = None;
        if let Some(ref path) = self.path {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => error!(path = %path.display(), error = %e, "failed to remove version history"),
            }
        }
    }

    /// Oldest first.
    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Write the history to its file, if it has one.
    pub fn save(&self) -> Result<(), HistoryError> {
        let Some(ref path) = self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = HistoryFile {
            current: self.current,
            versions: self.versions.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            error!(error = %e, "failed to save version history");
        }
    }
}

fn load(path: &Path) -> Result<HistoryFile, HistoryError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
