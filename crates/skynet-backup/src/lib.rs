//! Backup Service (§4.10): snapshot/restore for the graph, vector, and
//! memory stores to `data/backups/{timestamp}/{graph,vector,memory}.json`
//! (§6), plus the daily-backup retention the Scheduler triggers (§4.9).

pub mod error;
pub mod graph;
pub mod service;
pub mod types;
pub mod vector;

pub use error::{BackupError, Result};
pub use service::BackupService;
pub use types::{Backup, BackupSummary, EdgeDump, GraphDump, NodeDump, VectorDump};
