use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use skynet_memory::MemoryDump;
use skynet_vector::ScrollPoint;

/// A node as `MATCH (n) RETURN labels(n), properties(n)` sees it (§4.10).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDump {
    pub labels: Vec<String>,
    pub properties: serde_json::Map<String, Value>,
}

/// An edge, with endpoints identified by their natural key rather than a
/// driver-internal id, so a restore into an empty store still resolves them
/// (§4.10: "Restore — MERGE nodes/edges (idempotent)").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDump {
    pub rel_type: String,
    pub start_label: String,
    pub start_key: String,
    pub end_label: String,
    pub end_key: String,
    pub properties: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDump {
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VectorDump {
    pub collections: HashMap<String, Vec<ScrollPoint>>,
}

/// `data/backups/{timestamp}/{graph,vector,memory}.json` (§6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Backup {
    pub timestamp: String,
    pub graph: GraphDump,
    pub vector: VectorDump,
    pub memory: MemoryDump,
}

/// One entry in `GET /backup/list` — just enough to pick a restore target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupSummary {
    pub timestamp: String,
    pub node_count: usize,
    pub edge_count: usize,
    pub vector_point_count: usize,
}
