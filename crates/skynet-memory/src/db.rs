use rusqlite::{Connection, Result};

/// Initialise memory tables. Safe to call on every startup (idempotent).
pub fn init_db(conn: &Connection) -> Result<()> {
    create_core_memory_table(conn)?;
    create_fts_index(conn)?;
    create_conversations_table(conn)?;
    create_working_memory_table(conn)?;
    create_conversation_summary_table(conn)?;
    create_daily_summary_table(conn)?;
    create_pending_action_table(conn)?;
    create_active_project_table(conn)?;
    create_ingestion_cache_table(conn)?;
    Ok(())
}

fn create_core_memory_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS core_memory (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            session_key  TEXT NOT NULL,
            category     TEXT NOT NULL,
            key          TEXT NOT NULL,
            value        TEXT NOT NULL,
            confidence   REAL NOT NULL DEFAULT 0.8,
            source       TEXT NOT NULL DEFAULT 'inferred',
            created_at   TEXT NOT NULL,
            updated_at   TEXT NOT NULL,
            UNIQUE(session_key, category, key)
        );
        CREATE INDEX IF NOT EXISTS idx_core_memory_session
            ON core_memory(session_key);",
    )
}

/// FTS5 virtual table for full-text search across core-memory keys/values.
/// content='' makes it an external-content table — synced manually on write.
fn create_fts_index(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE VIRTUAL TABLE IF NOT EXISTS core_memory_fts
            USING fts5(key, value, content='core_memory', content_rowid='id');",
    )
}

fn create_conversations_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS conversations (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            session_key TEXT NOT NULL,
            role        TEXT NOT NULL,
            content     TEXT NOT NULL,
            model_used  TEXT,
            tokens_in   INTEGER NOT NULL DEFAULT 0,
            tokens_out  INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_conv_session
            ON conversations(session_key, created_at);",
    )
}

/// Working memory — FIFO of recent turns per session, 24h TTL refreshed on
/// write (§4.8).
fn create_working_memory_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS working_memory (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            session_key TEXT NOT NULL,
            role        TEXT NOT NULL,
            content     TEXT NOT NULL,
            ts          TEXT NOT NULL,
            expires_at  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_working_session
            ON working_memory(session_key, ts);",
    )
}

/// `conversation_summary:{session}` — Arabic summary produced when working
/// memory is compressed, 24h TTL.
fn create_conversation_summary_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS conversation_summary (
            session_key TEXT PRIMARY KEY,
            summary     TEXT NOT NULL,
            expires_at  TEXT NOT NULL
        );",
    )
}

/// Daily layer — hash of `{YYYY-MM-DD -> summary}`, 7d TTL per entry.
fn create_daily_summary_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS daily_summary (
            session_key TEXT NOT NULL,
            day         TEXT NOT NULL,
            summary     TEXT NOT NULL,
            expires_at  TEXT NOT NULL,
            PRIMARY KEY (session_key, day)
        );",
    )
}

/// `pending:{session}` — delete/cancel confirmation blob, 300s TTL.
fn create_pending_action_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS pending_action (
            session_key TEXT PRIMARY KEY,
            payload     TEXT NOT NULL,
            expires_at  TEXT NOT NULL
        );",
    )
}

/// `active_project:{session}` — name of the session's active project.
fn create_active_project_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS active_project (
            session_key TEXT PRIMARY KEY,
            project     TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );",
    )
}

/// Short-lived record of a completed ingestion keyed by file hash, so a
/// rapid re-POST of identical bytes can short-circuit before the full
/// re-upload-semantics check in `skynet-ingestion` runs.
fn create_ingestion_cache_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS ingestion_cache (
            file_hash   TEXT PRIMARY KEY,
            payload     TEXT NOT NULL,
            expires_at  TEXT NOT NULL
        );",
    )
}
