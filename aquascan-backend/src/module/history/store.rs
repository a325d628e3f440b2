use aquascan_common::HistoryEntry;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Default number of entries kept
pub const DEFAULT_CAPACITY: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("history file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("history serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Sink for identification results
#[async_trait]
pub trait HistoryRecorder: Send + Sync {
    async fn append(&self, entry: HistoryEntry) -> Result<(), HistoryError>;
}

/// Newest-first capped history persisted as a JSON array
pub struct JsonHistoryStore {
    path: PathBuf,
    capacity: usize,
    entries: RwLock<Vec<HistoryEntry>>,
}

impl JsonHistoryStore {
    /// Open the store. A missing file is an empty history; an unreadable
    /// one is logged and replaced on the next write.
    pub async fn open<P: AsRef<Path>>(path: P, capacity: usize) -> Result<Self, HistoryError> {
        let path = path.as_ref().to_path_buf();
        let capacity = capacity.max(1);

        let mut entries = if fs::try_exists(&path).await? {
            let content = fs::read_to_string(&path).await?;
            match serde_json::from_str::<Vec<HistoryEntry>>(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Ignoring unreadable history file {:?}: {}", path, e);
                    Vec::new()
                }
            }
        } else {
            debug!("History file does not exist: {:?}", path);
            Vec::new()
        };
        entries.truncate(capacity);

        info!("Loaded {} history entries from {:?}", entries.len(), path);
        Ok(Self {
            path,
            capacity,
            entries: RwLock::new(entries),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// All entries, newest first
    pub async fn list(&self) -> Vec<HistoryEntry> {
        self.entries.read().await.clone()
    }

    /// Delete one entry; `false` when the id is unknown
    pub async fn remove(&self, id: Uuid) -> Result<bool, HistoryError> {
        let mut entries = self.entries.write().await;
        if !entries.iter().any(|entry| entry.id == id) {
            return Ok(false);
        }

        let mut updated = entries.clone();
        updated.retain(|entry| entry.id != id);
        self.persist(&updated).await?;
        *entries = updated;
        Ok(true)
    }

    pub async fn clear(&self) -> Result<(), HistoryError> {
        let mut entries = self.entries.write().await;
        self.persist(&[]).await?;
        entries.clear();
        Ok(())
    }

    /// Write through a temp file so readers never see a partial array.
    /// Callers update the in-memory list only after this succeeds.
    async fn persist(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content).await?;
        fs::rename(&tmp_path, &self.path).await?;

        debug!("Saved {} history entries", entries.len());
        Ok(())
    }
}

#[async_trait]
impl HistoryRecorder for JsonHistoryStore {
    /// Insert at head; entries beyond capacity are dropped silently
    async fn append(&self, entry: HistoryEntry) -> Result<(), HistoryError> {
        let mut entries = self.entries.write().await;
        let mut updated = Vec::with_capacity(self.capacity);
        updated.push(entry);
        updated.extend(entries.iter().take(self.capacity - 1).cloned());

        self.persist(&updated).await?;
        *entries = updated;
        Ok(())
    }
}
