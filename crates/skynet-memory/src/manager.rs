use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{Duration, Utc};
use rusqlite::Connection;
use tracing::debug;

use crate::error::{MemoryError, Result};
use crate::types::*;

/// Maximum rendered context size in characters (~1500 tokens).
const MAX_CONTEXT_CHARS: usize = 6000;
/// Core-context cache entries expire after 5 minutes.
const CACHE_TTL_SECS: i64 = 300;
/// Maximum cache entries before eviction.
const MAX_CACHE_ENTRIES: usize = 256;

/// Working-memory TTL (§4.8): refreshed on every write.
const WORKING_TTL_HOURS: i64 = 24;
/// Conversation-summary TTL after compression (§4.8).
const SUMMARY_TTL_HOURS: i64 = 24;
/// Daily-summary TTL per entry (§4.8).
const DAILY_TTL_DAYS: i64 = 7;
/// Pending-action TTL (§4.8, §5).
const PENDING_TTL_SECS: i64 = 300;

/// Keep the last N turns verbatim when compressing working memory (§4.8).
pub const COMPRESS_KEEP_LAST: usize = 4;

/// Owns the three memory layers (Working/Daily/Core) plus the
/// pending-action, active-project, and ingestion-cache namespaces (§4.8).
///
/// Thread-safe: wraps the SQLite connection in a `Mutex` and keeps an
/// in-memory cache of rendered `UserContext` to avoid rebuilding on every
/// message.
pub struct MemoryManager {
    pub(crate) db: Mutex<Connection>,
    cache: Mutex<HashMap<String, UserContext>>,
}

impl MemoryManager {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
            cache: Mutex::new(HashMap::new()),
        }
    }

    // ---------------------------------------------------------------
    // Core layer — permanent hash of preferences/patterns.
    // ---------------------------------------------------------------

    /// Store or update a core-memory entry. Higher confidence wins on
    /// conflict. Syncs the FTS5 index.
    pub fn learn(
        &self,
        session_key: &str,
        category: MemoryCategory,
        key: &str,
        value: &str,
        confidence: f64,
        source: MemorySource,
    ) -> Result<()> {
        let db = self.db.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        let cat = category.to_string();
        let src = source.to_string();

        let existing: Option<(i64, f64)> = db
            .query_row(
                "SELECT id, confidence FROM core_memory
                 WHERE session_key = ?1 AND category = ?2 AND key = ?3",
                rusqlite::params![session_key, cat, key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .ok();

        match existing {
            Some((_, old_conf)) if confidence < old_conf => {
                debug!(
                    session_key,
                    key,
                    old_conf,
                    new_conf = confidence,
                    "skipping learn: existing confidence is higher"
                );
                return Ok(());
            }
            Some((id, _)) => {
                db.execute(
                    "UPDATE core_memory SET value = ?1, confidence = ?2, source = ?3,
                     updated_at = ?4 WHERE id = ?5",
                    rusqlite::params![value, confidence, src, now, id],
                )?;
                db.execute(
                    "INSERT INTO core_memory_fts(core_memory_fts, rowid, key, value)
                     VALUES('delete', ?1, ?2, ?3)",
                    rusqlite::params![id, key, value],
                )?;
                db.execute(
                    "INSERT INTO core_memory_fts(rowid, key, value) VALUES(?1, ?2, ?3)",
                    rusqlite::params![id, key, value],
                )?;
            }
            None => {
                db.execute(
                    "INSERT INTO core_memory (session_key, category, key, value, confidence,
                     source, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
                    rusqlite::params![session_key, cat, key, value, confidence, src, now],
                )?;
                let id = db.last_insert_rowid();
                db.execute(
                    "INSERT INTO core_memory_fts(rowid, key, value) VALUES(?1, ?2, ?3)",
                    rusqlite::params![id, key, value],
                )?;
            }
        }

        drop(db);
        self.invalidate_cache(session_key);
        Ok(())
    }

    /// Delete a specific core-memory entry ("forget that I'm vegetarian").
    pub fn forget(&self, session_key: &str, category: MemoryCategory, key: &str) -> Result<()> {
        let db = self.db.lock().unwrap();
        let cat = category.to_string();

        let row: Option<(i64, String)> = db
            .query_row(
                "SELECT id, value FROM core_memory
                 WHERE session_key = ?1 AND category = ?2 AND key = ?3",
                rusqlite::params![session_key, cat, key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .ok();

        if let Some((id, value)) = row {
            db.execute(
                "INSERT INTO core_memory_fts(core_memory_fts, rowid, key, value)
                 VALUES('delete', ?1, ?2, ?3)",
                rusqlite::params![id, key, value],
            )?;
            db.execute("DELETE FROM core_memory WHERE id = ?1", rusqlite::params![id])?;
            drop(db);
            self.invalidate_cache(session_key);
            Ok(())
        } else {
            Err(MemoryError::NotFound {
                category: cat,
                key: key.to_string(),
            })
        }
    }

    /// Full-text search across a session's core memory.
    pub fn search(&self, session_key: &str, query: &str, limit: usize) -> Result<Vec<CoreMemory>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(
            "SELECT m.id, m.session_key, m.category, m.key, m.value, m.confidence,
                    m.source, m.created_at, m.updated_at
             FROM core_memory m
             JOIN core_memory_fts f ON m.id = f.rowid
             WHERE m.session_key = ?1 AND core_memory_fts MATCH ?2
             ORDER BY rank
             LIMIT ?3",
        )?;
        let rows = stmt.query_map(rusqlite::params![session_key, query, limit], row_to_core)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Load a session's core memory and render into a prompt section.
    /// Cached for 5 minutes to avoid repeated DB hits.
    pub fn build_user_context(&self, session_key: &str) -> Result<UserContext> {
        if let Some(cached) = self.get_cached(session_key) {
            return Ok(cached);
        }

        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(
            "SELECT id, session_key, category, key, value, confidence,
                    source, created_at, updated_at
             FROM core_memory
             WHERE session_key = ?1
             ORDER BY
                CASE category
                    WHEN 'instruction' THEN 0
                    WHEN 'preference' THEN 1
                    WHEN 'fact' THEN 2
                    WHEN 'context' THEN 3
                END,
                confidence DESC",
        )?;
        let memories: Vec<CoreMemory> = stmt
            .query_map(rusqlite::params![session_key], row_to_core)?
            .filter_map(|r| r.ok())
            .collect();
        drop(stmt);
        drop(db);

        let rendered = render_context(&memories);
        let ctx = UserContext {
            session_key: session_key.to_string(),
            rendered,
            memory_count: memories.len(),
            built_at: Utc::now(),
        };

        let mut cache = self.cache.lock().unwrap();
        if cache.len() >= MAX_CACHE_ENTRIES {
            let oldest_key = cache
                .iter()
                .min_by_key(|(_, v)| v.built_at)
                .map(|(k, _)| k.clone());
            if let Some(k) = oldest_key {
                cache.remove(&k);
            }
        }
        cache.insert(session_key.to_string(), ctx.clone());
        Ok(ctx)
    }

    // ---------------------------------------------------------------
    // Durable conversation log (backs working-memory replay).
    // ---------------------------------------------------------------

    pub fn save_message(&self, msg: &ConversationMessage) -> Result<()> {
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO conversations
             (session_key, role, content, model_used, tokens_in, tokens_out, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                msg.session_key,
                msg.role,
                msg.content,
                msg.model_used,
                msg.tokens_in,
                msg.tokens_out,
                msg.created_at,
            ],
        )?;
        Ok(())
    }

    pub fn get_history(&self, session_key: &str, limit: usize) -> Result<Vec<ConversationMessage>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(
            "SELECT id, session_key, role, content, model_used, tokens_in, tokens_out, created_at
             FROM conversations
             WHERE session_key = ?1
             ORDER BY created_at DESC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(rusqlite::params![session_key, limit], |row| {
            Ok(ConversationMessage {
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
        let mut msgs: Vec<_> = rows.filter_map(|r| r.ok()).collect();
        msgs.reverse();
        Ok(msgs)
    }

    // ---------------------------------------------------------------
    // Working layer — FIFO, 24h TTL, compression at threshold (§4.8).
    // ---------------------------------------------------------------

    /// Append a turn. Returns `true` when the session has crossed
    /// `compress_threshold` and the caller should enqueue a compression job
    /// (the manager itself never calls the LLM).
    pub fn append_working(
        &self,
        session_key: &str,
        role: &str,
        content: &str,
        compress_threshold: usize,
    ) -> Result<bool> {
        let db = self.db.lock().unwrap();
        let now = Utc::now();
        let expires_at = (now + Duration::hours(WORKING_TTL_HOURS)).to_rfc3339();
        db.execute(
            "INSERT INTO working_memory (session_key, role, content, ts, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![session_key, role, content, now.to_rfc3339(), expires_at],
        )?;
        let count: i64 = db.query_row(
            "SELECT COUNT(*) FROM working_memory WHERE session_key = ?1 AND expires_at > ?2",
            rusqlite::params![session_key, now.to_rfc3339()],
            |row| row.get(0),
        )?;
        Ok(count as usize > compress_threshold)
    }

    /// Unexpired working-memory turns, oldest first.
    pub fn get_working(&self, session_key: &str) -> Result<Vec<WorkingTurn>> {
        let db = self.db.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        let mut stmt = db.prepare(
            "SELECT role, content, ts FROM working_memory
             WHERE session_key = ?1 AND expires_at > ?2
             ORDER BY ts ASC",
        )?;
        let rows = stmt.query_map(rusqlite::params![session_key, now], |row| {
            let ts_str: String = row.get(2)?;
            Ok(WorkingTurn {
                role: row.get(0)?,
                content: row.get(1)?,
                ts: chrono::DateTime::parse_from_rfc3339(&ts_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
            })
        })?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Trim working memory to the last `COMPRESS_KEEP_LAST` turns and store
    /// the Arabic summary with a 24h TTL (§4.8). Readers during the window
    /// between the read and this trim may observe either state but never a
    /// torn one, since the delete is a single statement.
    pub fn compress_working(&self, session_key: &str, summary: &str) -> Result<()> {
        let db = self.db.lock().unwrap();
        let keep_ids: Vec<i64> = {
            let mut stmt = db.prepare(
                "SELECT id FROM working_memory WHERE session_key = ?1 ORDER BY ts DESC LIMIT ?2",
            )?;
            let rows = stmt.query_map(
                rusqlite::params![session_key, COMPRESS_KEEP_LAST as i64],
                |row| row.get::<_, i64>(0),
            )?;
            rows.filter_map(|r| r.ok()).collect()
        };

        if keep_ids.is_empty() {
            db.execute(
                "DELETE FROM working_memory WHERE session_key = ?1",
                rusqlite::params![session_key],
            )?;
        } else {
            let placeholders = keep_ids.iter().map(|_| "?").collect::<Vec<_>>().join(",");
            let sql = format!(
                "DELETE FROM working_memory WHERE session_key = ? AND id NOT IN ({placeholders})"
            );
            let mut params: Vec<&dyn rusqlite::ToSql> = vec![&session_key];
            for id in &keep_ids {
                params.push(id);
            }
            db.execute(&sql, params.as_slice())?;
        }

        let expires_at = (Utc::now() + Duration::hours(SUMMARY_TTL_HOURS)).to_rfc3339();
        db.execute(
            "INSERT INTO conversation_summary (session_key, summary, expires_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(session_key) DO UPDATE SET summary = ?2, expires_at = ?3",
            rusqlite::params![session_key, summary, expires_at],
        )?;
        Ok(())
    }

    pub fn get_conversation_summary(&self, session_key: &str) -> Result<Option<String>> {
        let db = self.db.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        let summary: Option<String> = db
            .query_row(
                "SELECT summary FROM conversation_summary
                 WHERE session_key = ?1 AND expires_at > ?2",
                rusqlite::params![session_key, now],
                |row| row.get(0),
            )
            .ok();
        Ok(summary)
    }

    // ---------------------------------------------------------------
    // Daily layer — hash of {YYYY-MM-DD -> summary}, 7d TTL per entry.
    // ---------------------------------------------------------------

    pub fn set_daily_summary(&self, session_key: &str, day: &str, summary: &str) -> Result<()> {
        let db = self.db.lock().unwrap();
        let expires_at = (Utc::now() + Duration::days(DAILY_TTL_DAYS)).to_rfc3339();
        db.execute(
            "INSERT INTO daily_summary (session_key, day, summary, expires_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(session_key, day) DO UPDATE SET summary = ?3, expires_at = ?4",
            rusqlite::params![session_key, day, summary, expires_at],
        )?;
        Ok(())
    }

    pub fn get_daily_summaries(&self, session_key: &str) -> Result<Vec<(String, String)>> {
        let db = self.db.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        let mut stmt = db.prepare(
            "SELECT day, summary FROM daily_summary
             WHERE session_key = ?1 AND expires_at > ?2
             ORDER BY day DESC",
        )?;
        let rows = stmt.query_map(rusqlite::params![session_key, now], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    // ---------------------------------------------------------------
    // Pending actions — delete/cancel confirmation only, 300s TTL.
    // ---------------------------------------------------------------

    pub fn set_pending_action(&self, session_key: &str, payload: &serde_json::Value) -> Result<()> {
        let db = self.db.lock().unwrap();
        let expires_at = (Utc::now() + Duration::seconds(PENDING_TTL_SECS)).to_rfc3339();
        let payload_str = serde_json::to_string(payload).map_err(|e| MemoryError::Serialization(e.to_string()))?;
        db.execute(
            "INSERT INTO pending_action (session_key, payload, expires_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(session_key) DO UPDATE SET payload = ?2, expires_at = ?3",
            rusqlite::params![session_key, payload_str, expires_at],
        )?;
        Ok(())
    }

    /// Lazy TTL: returns `None` (and deletes the row) once expired.
    pub fn get_pending_action(&self, session_key: &str) -> Result<Option<serde_json::Value>> {
        let db = self.db.lock().unwrap();
        let row: Option<(String, String)> = db
            .query_row(
                "SELECT payload, expires_at FROM pending_action WHERE session_key = ?1",
                rusqlite::params![session_key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .ok();

        let Some((payload, expires_at)) = row else {
            return Ok(None);
        };
        let expired = chrono::DateTime::parse_from_rfc3339(&expires_at)
            .map(|dt| dt.with_timezone(&Utc) <= Utc::now())
            .unwrap_or(true);
        if expired {
            db.execute(
                "DELETE FROM pending_action WHERE session_key = ?1",
                rusqlite::params![session_key],
            )?;
            return Ok(None);
        }
        let value = serde_json::from_str(&payload).map_err(|e| MemoryError::Serialization(e.to_string()))?;
        Ok(Some(value))
    }

    pub fn clear_pending_action(&self, session_key: &str) -> Result<()> {
        let db = self.db.lock().unwrap();
        db.execute(
            "DELETE FROM pending_action WHERE session_key = ?1",
            rusqlite::params![session_key],
        )?;
        Ok(())
    }

    // ---------------------------------------------------------------
    // Active project.
    // ---------------------------------------------------------------

    pub fn set_active_project(&self, session_key: &str, project: &str) -> Result<()> {
        let db = self.db.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        db.execute(
            "INSERT INTO active_project (session_key, project, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(session_key) DO UPDATE SET project = ?2, updated_at = ?3",
            rusqlite::params![session_key, project, now],
        )?;
        Ok(())
    }

    pub fn get_active_project(&self, session_key: &str) -> Result<Option<String>> {
        let db = self.db.lock().unwrap();
        let project: Option<String> = db
            .query_row(
                "SELECT project FROM active_project WHERE session_key = ?1",
                rusqlite::params![session_key],
                |row| row.get(0),
            )
            .ok();
        Ok(project)
    }

    // ---------------------------------------------------------------
    // Ingestion cache.
    // ---------------------------------------------------------------

    pub fn cache_ingestion(&self, file_hash: &str, payload: &serde_json::Value, ttl_secs: i64) -> Result<()> {
        let db = self.db.lock().unwrap();
        let expires_at = (Utc::now() + Duration::seconds(ttl_secs)).to_rfc3339();
        let payload_str = serde_json::to_string(payload).map_err(|e| MemoryError::Serialization(e.to_string()))?;
        db.execute(
            "INSERT INTO ingestion_cache (file_hash, payload, expires_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(file_hash) DO UPDATE SET payload = ?2, expires_at = ?3",
            rusqlite::params![file_hash, payload_str, expires_at],
        )?;
        Ok(())
    }

    pub fn get_ingestion_cache(&self, file_hash: &str) -> Result<Option<serde_json::Value>> {
        let db = self.db.lock().unwrap();
        let row: Option<(String, String)> = db
            .query_row(
                "SELECT payload, expires_at FROM ingestion_cache WHERE file_hash = ?1",
                rusqlite::params![file_hash],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .ok();
        let Some((payload, expires_at)) = row else {
            return Ok(None);
        };
        let expired = chrono::DateTime::parse_from_rfc3339(&expires_at)
            .map(|dt| dt.with_timezone(&Utc) <= Utc::now())
            .unwrap_or(true);
        if expired {
            return Ok(None);
        }
        let value = serde_json::from_str(&payload).map_err(|e| MemoryError::Serialization(e.to_string()))?;
        Ok(Some(value))
    }

    fn get_cached(&self, session_key: &str) -> Option<UserContext> {
        let cache = self.cache.lock().unwrap();
        let ctx = cache.get(session_key)?;
        let age = Utc::now().signed_duration_since(ctx.built_at).num_seconds();
        if age < CACHE_TTL_SECS {
            Some(ctx.clone())
        } else {
            None
        }
    }

    fn invalidate_cache(&self, session_key: &str) {
        let mut cache = self.cache.lock().unwrap();
        cache.remove(session_key);
    }

    /// Drops the whole rendered-context cache. Used after a bulk restore
    /// (§4.10), where individual session keys aren't known up front.
    pub(crate) fn invalidate_all_cache(&self) {
        let mut cache = self.cache.lock().unwrap();
        cache.clear();
    }
}

/// Render core memories into a text block for prompt injection.
/// Priority: instruction > preference > fact > context. Truncates to
/// `MAX_CONTEXT_CHARS`.
fn render_context(memories: &[CoreMemory]) -> String {
    let mut out = String::with_capacity(MAX_CONTEXT_CHARS);
    let mut current_cat = String::new();

    for mem in memories {
        let cat = mem.category.to_string();
        if cat != current_cat {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("## {}\n", capitalize(&cat)));
            current_cat = cat;
        }
        let line = format!("- {}: {}\n", mem.key, mem.value);
        if out.len() + line.len() > MAX_CONTEXT_CHARS {
            break;
        }
        out.push_str(&line);
    }
    out
}

fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().to_string() + c.as_str(),
    }
}

fn row_to_core(row: &rusqlite::Row<'_>) -> rusqlite::Result<CoreMemory> {
    let cat_str: String = row.get(2)?;
    let src_str: String = row.get(6)?;
    Ok(CoreMemory {
        id: row.get(0)?,
        session_key: row.get(1)?,
        category: cat_str.parse().unwrap_or(MemoryCategory::Context),
        key: row.get(3)?,
        value: row.get(4)?,
        confidence: row.get(5)?,
        source: src_str.parse().unwrap_or(MemorySource::Inferred),
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> MemoryManager {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_db(&conn).unwrap();
        MemoryManager::new(conn)
    }

    #[test]
    fn learn_then_build_context_renders_by_priority() {
        let mgr = manager();
        mgr.learn("s1", MemoryCategory::Fact, "diet", "vegetarian", 0.9, MemorySource::UserSaid)
            .unwrap();
        mgr.learn("s1", MemoryCategory::Instruction, "tone", "formal", 0.9, MemorySource::UserSaid)
            .unwrap();
        let ctx = mgr.build_user_context("s1").unwrap();
        assert_eq!(ctx.memory_count, 2);
        let instr_pos = ctx.rendered.find("Instruction").unwrap();
        let fact_pos = ctx.rendered.find("Fact").unwrap();
        assert!(instr_pos < fact_pos);
    }

    #[test]
    fn learn_skips_lower_confidence_overwrite() {
        let mgr = manager();
        mgr.learn("s1", MemoryCategory::Fact, "diet", "vegetarian", 0.9, MemorySource::UserSaid)
            .unwrap();
        mgr.learn("s1", MemoryCategory::Fact, "diet", "vegan", 0.3, MemorySource::Inferred)
            .unwrap();
        let results = mgr.search("s1", "diet", 10).unwrap();
        assert_eq!(results[0].value, "vegetarian");
    }

    #[test]
    fn working_memory_reports_compression_needed_past_threshold() {
        let mgr = manager();
        let mut needs_compress = false;
        for i in 0..16 {
            needs_compress = mgr.append_working("s1", "user", &format!("turn {i}"), 15).unwrap();
        }
        assert!(needs_compress);
        let turns = mgr.get_working("s1").unwrap();
        assert_eq!(turns.len(), 16);
    }

    #[test]
    fn compress_working_keeps_last_four_and_stores_summary() {
        let mgr = manager();
        for i in 0..10 {
            mgr.append_working("s1", "user", &format!("turn {i}"), 100).unwrap();
        }
        mgr.compress_working("s1", "ملخص المحادثة").unwrap();
        let turns = mgr.get_working("s1").unwrap();
        assert_eq!(turns.len(), COMPRESS_KEEP_LAST);
        assert_eq!(turns.last().unwrap().content, "turn 9");
        assert_eq!(mgr.get_conversation_summary("s1").unwrap().unwrap(), "ملخص المحادثة");
    }

    #[test]
    fn pending_action_round_trips_and_clears() {
        let mgr = manager();
        let payload = serde_json::json!({"action": "delete_reminder", "id": "r1"});
        mgr.set_pending_action("s1", &payload).unwrap();
        assert_eq!(mgr.get_pending_action("s1").unwrap().unwrap(), payload);
        mgr.clear_pending_action("s1").unwrap();
        assert!(mgr.get_pending_action("s1").unwrap().is_none());
    }

    #[test]
    fn active_project_round_trips() {
        let mgr = manager();
        assert!(mgr.get_active_project("s1").unwrap().is_none());
        mgr.set_active_project("s1", "Farm").unwrap();
        assert_eq!(mgr.get_active_project("s1").unwrap().unwrap(), "Farm");
    }
}
