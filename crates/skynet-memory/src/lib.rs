//! `skynet-memory` — the three-layer Memory Service (§4.8): a Working FIFO
//! with TTL and compression, a Daily hash, a permanent Core hash, plus
//! short-lived pending-action, active-project, and ingestion-cache
//! namespaces. Backed by SQLite ([`rusqlite`]).

pub mod backup;
pub mod db;
pub mod error;
pub mod manager;
pub mod types;

pub use backup::{
    ActiveProjectRow, ConversationRow, ConversationSummaryRow, CoreMemoryRow, DailySummaryRow, IngestionCacheRow,
    MemoryDump, PendingActionRow, WorkingMemoryRow,
};
pub use error::{MemoryError, Result};
pub use manager::{MemoryManager, COMPRESS_KEEP_LAST};
pub use types::*;
