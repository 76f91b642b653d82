use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::manager::MemoryManager;

/// One row per memory table, typed rather than a loosely-shaped JSON blob
/// so a restore round-trips exactly (§4.10 Backup Service, "Memory").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreMemoryRow {
    pub id: i64,
    pub session_key: String,
    pub category: String,
    pub key: String,
    pub value: String,
    pub confidence: f64,
    pub source: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationRow {
    pub id: i64,
    pub session_key: String,
    pub role: String,
    pub content: String,
    pub model_used: Option<String>,
    pub tokens_in: i64,
    pub tokens_out: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingMemoryRow {
    pub id: i64,
    pub session_key: String,
    pub role: String,
    pub content: String,
    pub ts: String,
    pub expires_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummaryRow {
    pub session_key: String,
    pub summary: String,
    pub expires_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySummaryRow {
    pub session_key: String,
    pub day: String,
    pub summary: String,
    pub expires_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingActionRow {
    pub session_key: String,
    pub payload: String,
    pub expires_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveProjectRow {
    pub session_key: String,
    pub project: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionCacheRow {
    pub file_hash: String,
    pub payload: String,
    pub expires_at: String,
}

/// Full snapshot of the memory store, as written to
/// `data/backups/{timestamp}/memory.json` (§6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryDump {
    pub core_memory: Vec<CoreMemoryRow>,
    pub conversations: Vec<ConversationRow>,
    pub working_memory: Vec<WorkingMemoryRow>,
    pub conversation_summary: Vec<ConversationSummaryRow>,
    pub daily_summary: Vec<DailySummaryRow>,
    pub pending_action: Vec<PendingActionRow>,
    pub active_project: Vec<ActiveProjectRow>,
    pub ingestion_cache: Vec<IngestionCacheRow>,
}

impl MemoryManager {
    /// Dumps every table. TTL-bearing tables only dump rows that haven't
    /// already expired, mirroring a Redis `SCAN` that would never surface
    /// an evicted key (§4.10).
    pub fn export_all(&self) -> Result<MemoryDump> {
        let db = self.db.lock().unwrap();
        let now = Utc::now().to_rfc3339();

        let core_memory = {
            let mut stmt = db.prepare(
                "SELECT id, session_key, category, key, value, confidence, source, created_at, updated_at
                 FROM core_memory",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(CoreMemoryRow {
                    id: row.get(0)?,
                    session_key: row.get(1)?,
                    category: row.get(2)?,
                    key: row.get(3)?,
                    value: row.get(4)?,
                    confidence: row.get(5)?,
                    source: row.get(6)?,
                    created_at: row.get(7)?,
                    updated_at: row.get(8)?,
                })
            })?;
            rows.filter_map(|r| r.ok()).collect()
        };

        let conversations = {
            let mut stmt = db.prepare(
                "SELECT id, session_key, role, content, model_used, tokens_in, tokens_out, created_at
                 FROM conversations",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(ConversationRow {
                    id: row.get(0)?,
                    session_key: row.get(1)?,
                    role: row.get(2)?,
                    content: row.get(3)?,
                    model_used: row.get(4)?,
                    tokens_in: row.get(5)?,
                    tokens_out: row.get(6)?,
                    created_at: row.get(7)?,
                })
            })?;
            rows.filter_map(|r| r.ok()).collect()
        };

        let working_memory = {
            let mut stmt = db.prepare(
                "SELECT id, session_key, role, content, ts, expires_at
                 FROM working_memory WHERE expires_at > ?1",
            )?;
            let rows = stmt.query_map(rusqlite::params![now], |row| {
                Ok(WorkingMemoryRow {
                    id: row.get(0)?,
                    session_key: row.get(1)?,
                    role: row.get(2)?,
                    content: row.get(3)?,
                    ts: row.get(4)?,
                    expires_at: row.get(5)?,
                })
            })?;
            rows.filter_map(|r| r.ok()).collect()
        };

        let conversation_summary = {
            let mut stmt =
                db.prepare("SELECT session_key, summary, expires_at FROM conversation_summary WHERE expires_at > ?1")?;
            let rows = stmt.query_map(rusqlite::params![now], |row| {
                Ok(ConversationSummaryRow {
                    session_key: row.get(0)?,
                    summary: row.get(1)?,
                    expires_at: row.get(2)?,
                })
            })?;
            rows.filter_map(|r| r.ok()).collect()
        };

        let daily_summary = {
            let mut stmt =
                db.prepare("SELECT session_key, day, summary, expires_at FROM daily_summary WHERE expires_at > ?1")?;
            let rows = stmt.query_map(rusqlite::params![now], |row| {
                Ok(DailySummaryRow {
                    session_key: row.get(0)?,
                    day: row.get(1)?,
                    summary: row.get(2)?,
                    expires_at: row.get(3)?,
                })
            })?;
            rows.filter_map(|r| r.ok()).collect()
        };

        let pending_action = {
            let mut stmt = db.prepare("SELECT session_key, payload, expires_at FROM pending_action WHERE expires_at > ?1")?;
            let rows = stmt.query_map(rusqlite::params![now], |row| {
                Ok(PendingActionRow {
                    session_key: row.get(0)?,
                    payload: row.get(1)?,
                    expires_at: row.get(2)?,
                })
            })?;
            rows.filter_map(|r| r.ok()).collect()
        };

        let active_project = {
            let mut stmt = db.prepare("SELECT session_key, project, updated_at FROM active_project")?;
            let rows = stmt.query_map([], |row| {
                Ok(ActiveProjectRow {
                    session_key: row.get(0)?,
                    project: row.get(1)?,
                    updated_at: row.get(2)?,
                })
            })?;
            rows.filter_map(|r| r.ok()).collect()
        };

        let ingestion_cache = {
            let mut stmt = db.prepare("SELECT file_hash, payload, expires_at FROM ingestion_cache WHERE expires_at > ?1")?;
            let rows = stmt.query_map(rusqlite::params![now], |row| {
                Ok(IngestionCacheRow {
                    file_hash: row.get(0)?,
                    payload: row.get(1)?,
                    expires_at: row.get(2)?,
                })
            })?;
            rows.filter_map(|r| r.ok()).collect()
        };

        Ok(MemoryDump {
            core_memory,
            conversations,
            working_memory,
            conversation_summary,
            daily_summary,
            pending_action,
            active_project,
            ingestion_cache,
        })
    }

    /// Re-applies a dump with `INSERT OR REPLACE`, so restoring twice over
    /// the same store is idempotent (§4.10). `core_memory`'s FTS index is
    /// resynced per row since it isn't trigger-maintained (see `learn`).
    pub fn import_all(&self, dump: &MemoryDump) -> Result<()> {
        let db = self.db.lock().unwrap();

        for row in &dump.core_memory {
            db.execute(
                "INSERT OR REPLACE INTO core_memory
                 (id, session_key, category, key, value, confidence, source, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                rusqlite::params![
                    row.id, row.session_key, row.category, row.key, row.value, row.confidence, row.source,
                    row.created_at, row.updated_at,
                ],
            )?;
            db.execute(
                "INSERT INTO core_memory_fts(core_memory_fts, rowid, key, value) VALUES('delete', ?1, ?2, ?3)",
                rusqlite::params![row.id, row.key, row.value],
            )
            .ok();
            db.execute(
                "INSERT INTO core_memory_fts(rowid, key, value) VALUES(?1, ?2, ?3)",
                rusqlite::params![row.id, row.key, row.value],
            )?;
        }

        for row in &dump.conversations {
            db.execute(
                "INSERT OR REPLACE INTO conversations
                 (id, session_key, role, content, model_used, tokens_in, tokens_out, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    row.id, row.session_key, row.role, row.content, row.model_used, row.tokens_in, row.tokens_out,
                    row.created_at,
                ],
            )?;
        }

        for row in &dump.working_memory {
            db.execute(
                "INSERT OR REPLACE INTO working_memory (id, session_key, role, content, ts, expires_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![row.id, row.session_key, row.role, row.content, row.ts, row.expires_at],
            )?;
        }

        for row in &dump.conversation_summary {
            db.execute(
                "INSERT INTO conversation_summary (session_key, summary, expires_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(session_key) DO UPDATE SET summary = ?2, expires_at = ?3",
                rusqlite::params![row.session_key, row.summary, row.expires_at],
            )?;
        }

        for row in &dump.daily_summary {
            db.execute(
                "INSERT INTO daily_summary (session_key, day, summary, expires_at) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(session_key, day) DO UPDATE SET summary = ?3, expires_at = ?4",
                rusqlite::params![row.session_key, row.day, row.summary, row.expires_at],
            )?;
        }

        for row in &dump.pending_action {
            db.execute(
                "INSERT INTO pending_action (session_key, payload, expires_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(session_key) DO UPDATE SET payload = ?2, expires_at = ?3",
                rusqlite::params![row.session_key, row.payload, row.expires_at],
            )?;
        }

        for row in &dump.active_project {
            db.execute(
                "INSERT INTO active_project (session_key, project, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(session_key) DO UPDATE SET project = ?2, updated_at = ?3",
                rusqlite::params![row.session_key, row.project, row.updated_at],
            )?;
        }

        for row in &dump.ingestion_cache {
            db.execute(
                "INSERT INTO ingestion_cache (file_hash, payload, expires_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(file_hash) DO UPDATE SET payload = ?2, expires_at = ?3",
                rusqlite::params![row.file_hash, row.payload, row.expires_at],
            )?;
        }

        drop(db);
        self.invalidate_all_cache();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use rusqlite::Connection;

    fn setup() -> MemoryManager {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        MemoryManager::new(conn)
    }

    #[test]
    fn export_then_import_round_trips_core_memory() {
        let mgr = setup();
        mgr.learn(
            "s1",
            crate::types::MemoryCategory::Preference,
            "drink",
            "قهوة",
            0.9,
            crate::types::MemorySource::UserSaid,
        )
        .unwrap();

        let dump = mgr.export_all().unwrap();
        assert_eq!(dump.core_memory.len(), 1);

        let mgr2 = setup();
        mgr2.import_all(&dump).unwrap();
        let ctx = mgr2.build_user_context("s1").unwrap();
        assert_eq!(ctx.memory_count, 1);
    }

    #[test]
    fn expired_rows_are_excluded_from_export() {
        let mgr = setup();
        {
            let db = mgr.db.lock().unwrap();
            db.execute(
                "INSERT INTO pending_action (session_key, payload, expires_at) VALUES ('s1', '{}', '2000-01-01T00:00:00Z')",
                [],
            )
            .unwrap();
        }
        let dump = mgr.export_all().unwrap();
        assert!(dump.pending_action.is_empty());
    }
}
