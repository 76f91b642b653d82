use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use skynet_core::config::BackupConfig;
use skynet_graph::GraphClient;
use skynet_memory::MemoryManager;
use skynet_vector::VectorStore;

use crate::error::{BackupError, Result};
use crate::graph::{export_graph, import_graph};
use crate::types::{Backup, BackupSummary};
use crate::vector::{export_vector, import_vector};

/// Snapshot/restore orchestrator (§4.10, §4.9 "Daily backup"). Each store
/// owns its own export/import logic (`graph.rs`/`vector.rs`,
/// `skynet_memory::MemoryManager::export_all`/`import_all`); this just
/// sequences them and handles the `data/backups/{timestamp}/` layout (§6).
pub struct BackupService {
    graph: Arc<GraphClient>,
    vector: Arc<VectorStore>,
    memory: Arc<MemoryManager>,
    dir: PathBuf,
    retention_days: i64,
}

impl BackupService {
    pub fn new(graph: Arc<GraphClient>, vector: Arc<VectorStore>, memory: Arc<MemoryManager>, config: &BackupConfig) -> Self {
        Self {
            graph,
            vector,
            memory,
            dir: PathBuf::from(&config.dir),
            retention_days: config.retention_days,
        }
    }

    /// Snapshots graph, vector, and memory into a fresh
    /// `{dir}/{timestamp}/{graph,vector,memory}.json`, then applies
    /// retention. The timestamp is the directory name and the caller's
    /// sole handle for `restore`.
    pub async fn create_backup(&self) -> Result<String> {
        let timestamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
        let out_dir = self.dir.join(&timestamp);
        tokio::fs::create_dir_all(&out_dir).await?;

        let graph_dump = export_graph(&self.graph).await?;
        let vector_dump = export_vector(&self.vector).await?;
        let memory_dump = self.memory.export_all()?;

        write_json(&out_dir.join("graph.json"), &graph_dump).await?;
        write_json(&out_dir.join("vector.json"), &vector_dump).await?;
        write_json(&out_dir.join("memory.json"), &memory_dump).await?;

        info!(
            timestamp = %timestamp,
            nodes = graph_dump.nodes.len(),
            edges = graph_dump.edges.len(),
            "backup created"
        );

        self.enforce_retention().await?;
        Ok(timestamp)
    }

    /// Lists backups newest-first, each summarised from its `graph.json` /
    /// `vector.json` without loading the full memory dump.
    pub async fn list_backups(&self) -> Result<Vec<BackupSummary>> {
        let mut out = Vec::new();
        let Ok(mut entries) = tokio::fs::read_dir(&self.dir).await else {
            return Ok(out);
        };
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let timestamp = entry.file_name().to_string_lossy().to_string();
            let dir = entry.path();
            let graph_dump: crate::types::GraphDump = read_json(&dir.join("graph.json")).await.unwrap_or_default();
            let vector_dump: crate::types::VectorDump = read_json(&dir.join("vector.json")).await.unwrap_or_default();
            out.push(BackupSummary {
                timestamp,
                node_count: graph_dump.nodes.len(),
                edge_count: graph_dump.edges.len(),
                vector_point_count: vector_dump.collections.values().map(Vec::len).sum(),
            });
        }
        out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(out)
    }

    /// Re-applies a prior backup. Every store's import is a `MERGE`/upsert,
    /// so this is safe to run against a store that already has data (§4.10).
    pub async fn restore_backup(&self, timestamp: &str) -> Result<()> {
        let dir = self.dir.join(timestamp);
        if !dir.is_dir() {
            return Err(BackupError::NotFound(timestamp.to_string()));
        }

        let graph_dump = read_json(&dir.join("graph.json")).await?;
        let vector_dump = read_json(&dir.join("vector.json")).await?;
        let memory_dump = read_json(&dir.join("memory.json")).await?;

        import_graph(&self.graph, &graph_dump).await?;
        import_vector(&self.vector, &vector_dump).await?;
        self.memory.import_all(&memory_dump)?;

        info!(timestamp = %timestamp, "backup restored");
        Ok(())
    }

    /// Loads a full snapshot for inspection (not part of the HTTP surface,
    /// but useful for tests and for the export endpoint's raw-download path).
    pub async fn load_backup(&self, timestamp: &str) -> Result<Backup> {
        let dir = self.dir.join(timestamp);
        if !dir.is_dir() {
            return Err(BackupError::NotFound(timestamp.to_string()));
        }
        Ok(Backup {
            timestamp: timestamp.to_string(),
            graph: read_json(&dir.join("graph.json")).await?,
            vector: read_json(&dir.join("vector.json")).await?,
            memory: read_json(&dir.join("memory.json")).await?,
        })
    }

    /// Deletes backup directories older than `retention_days` (§4.9).
    async fn enforce_retention(&self) -> Result<()> {
        let cutoff = Utc::now() - chrono::Duration::days(self.retention_days);
        let Ok(mut entries) = tokio::fs::read_dir(&self.dir).await else {
            return Ok(());
        };
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if is_expired(&name, cutoff) {
                if let Err(e) = tokio::fs::remove_dir_all(entry.path()).await {
                    warn!(backup = %name, error = %e, "failed to remove expired backup");
                } else {
                    info!(backup = %name, "expired backup removed by retention");
                }
            }
        }
        Ok(())
    }
}

/// Whether a `{timestamp}` directory name is older than `cutoff`.
/// Non-parseable names (anything not produced by `create_backup`) are never
/// treated as expired.
fn is_expired(name: &str, cutoff: chrono::DateTime<Utc>) -> bool {
    chrono::NaiveDateTime::parse_from_str(name, "%Y%m%dT%H%M%SZ")
        .map(|ts| ts.and_utc() < cutoff)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn old_timestamp_is_expired_against_a_recent_cutoff() {
        let cutoff = Utc::now();
        assert!(is_expired("20200101T000000Z", cutoff));
    }

    #[test]
    fn future_timestamp_is_not_expired() {
        let cutoff = Utc::now() - chrono::Duration::days(30);
        assert!(!is_expired("20991231T000000Z", cutoff));
    }

    #[test]
    fn unparseable_name_is_never_expired() {
        assert!(!is_expired("not-a-timestamp", Utc::now()));
    }
}

async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_vec_pretty(value)?;
    tokio::fs::write(path, body).await?;
    Ok(())
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let body = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&body)?)
}
