use serde::{Deserialize, Serialize};

use skynet_knowledge::types::ExtractedFact;

/// `ingest_text` contract (§4.2).
#[derive(Debug, Clone)]
pub struct IngestRequest {
    pub text: String,
    pub source_type: String,
    pub tags: Vec<String>,
    pub topic: Option<String>,
    pub session_id: Option<String>,
    pub file_hash: Option<String>,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResult {
    pub status: IngestStatus,
    pub chunks_stored: usize,
    pub facts_extracted: usize,
    pub entities: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestStatus {
    Stored,
    Duplicate,
    Superseded,
}

/// `ingest_file` input — the File Processor (§4.3) hands over decoded text
/// plus the raw bytes so this crate can hash for re-upload detection.
#[derive(Debug, Clone)]
pub struct IngestFileRequest {
    pub bytes: Vec<u8>,
    pub text: String,
    pub filename: String,
    pub mime: String,
    pub source_type: String,
    pub tags: Vec<String>,
    pub topic: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawFactResponse {
    #[serde(default)]
    pub facts: Vec<ExtractedFact>,
}
