//! Snapshot File - Atomic JSON Stock Persistence
//!
//! Saves the full stock table to `inventory.json` using atomic writes
//! (write to tmp file, then rename). The file is always either the old
//! or the new version, never a partial write.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info, instrument};

use crate::domain::inventory::{InventoryRecord, RecordId};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: &str = "1";

/// Serialized stock table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSnapshot {
    /// Version of the snapshot format.
    pub version: String,
    /// When the snapshot was written.
    pub saved_at: DateTime<Utc>,
    /// Next id the store will assign.
    pub next_id: RecordId,
    /// All records, ordered by id.
    pub records: Vec<InventoryRecord>,
}

/// Atomic JSON snapshot file.
pub struct SnapshotFile {
    /// Path to inventory.json.
    path: PathBuf,
    /// Temporary path for atomic writes.
    tmp_path: PathBuf,
}

impl SnapshotFile {
    /// Create a snapshot file in the given data directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub async fn new(data_dir: &str) -> Result<Self> {
        let dir = Path::new(data_dir);
        fs::create_dir_all(dir)
            .await
            .context("Failed to create data directory")?;

        Ok(Self {
            path: dir.join("inventory.json"),
            tmp_path: dir.join("inventory.json.tmp"),
        })
    }

    /// Location of the snapshot.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a snapshot atomically (tmp → rename).
    #[instrument(skip(self, snapshot), fields(records = snapshot.records.len()))]
    pub async fn save(&self, snapshot: &StockSnapshot) -> Result<()> {
        let json = serde_json::to_string_pretty(snapshot)
            .context("Failed to serialize stock snapshot")?;

        fs::write(&self.tmp_path, &json)
            .await
            .context("Failed to write tmp snapshot file")?;

        fs::rename(&self.tmp_path, &self.path)
            .await
            .context("Failed to rename snapshot file")?;

        debug!(path = %self.path.display(), "Stock snapshot saved");
        Ok(())
    }

    /// Load the snapshot, or `None` on first startup.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<Option<StockSnapshot>> {
        if !fs::try_exists(&self.path).await.unwrap_or(false) {
            info!(path = %self.path.display(), "No stock snapshot found, starting empty");
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path)
            .await
            .context("Failed to read stock snapshot")?;

        let snapshot: StockSnapshot =
            serde_json::from_str(&json).context("Failed to parse stock snapshot")?;

        anyhow::ensure!(
            snapshot.version == SNAPSHOT_VERSION,
            "Unsupported snapshot version {}",
            snapshot.version
        );

        info!(
            records = snapshot.records.len(),
            saved_at = %snapshot.saved_at,
            "Stock snapshot loaded"
        );

        Ok(Some(snapshot))
    }

    /// Check if the data directory is writable.
    pub async fn is_healthy(&self) -> bool {
        let Some(dir) = self.path.parent() else {
            return false;
        };
        let probe = dir.join(".health_check");
        let result = fs::write(&probe, b"ok").await;
        let _ = fs::remove_file(&probe).await;
        result.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(records: Vec<InventoryRecord>) -> StockSnapshot {
        StockSnapshot {
            version: SNAPSHOT_VERSION.to_string(),
            saved_at: Utc::now(),
            next_id: records.len() as RecordId + 1,
            records,
        }
    }

    #[tokio::test]
    async fn test_load_missing_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let file = SnapshotFile::new(dir.path().to_str().unwrap()).await.unwrap();
        assert!(file.load().await.unwrap().is_none());
        assert!(file.is_healthy().await);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let file = SnapshotFile::new(dir.path().to_str().unwrap()).await.unwrap();
        let record = InventoryRecord {
            id: Some(1),
            product_id: 42,
            quantity: 10,
        };
        file.save(&snapshot(vec![record.clone()])).await.unwrap();

        let loaded = file.load().await.unwrap().unwrap();
        assert_eq!(loaded.next_id, 2);
        assert_eq!(loaded.records, vec![record]);
        assert!(!dir.path().join("inventory.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_unknown_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = SnapshotFile::new(dir.path().to_str().unwrap()).await.unwrap();
        let mut snap = snapshot(Vec::new());
        snap.version = "99".to_string();
        file.save(&snap).await.unwrap();
        assert!(file.load().await.is_err());
    }
}
