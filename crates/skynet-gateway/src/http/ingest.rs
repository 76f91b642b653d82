//! Ingestion surface (§4.2/§4.3/§6): `POST /ingest/text`, `POST /ingest/file`
//! (multipart), `POST /ingest/url`, and `GET /ingest/file/{hash}` (metadata
//! lookup — this workspace has no blob store, so the original bytes are not
//! retrievable; the `File` node's stored metadata is).

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use skynet_ingestion::{IngestRequest, IngestResult};

use super::error::{ApiResult, ApiError};
use crate::app::AppState;

fn split_tags(tags: Option<String>) -> Vec<String> {
    tags.map(|t| t.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

#[derive(Deserialize)]
pub struct IngestTextRequest {
    pub text: String,
    #[serde(default = "default_source_type")]
    pub source_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

fn default_source_type() -> String {
    "note".to_string()
}

pub async fn ingest_text_handler(State(state): State<Arc<AppState>>, Json(req): Json<IngestTextRequest>) -> ApiResult<Json<IngestResult>> {
    let result = state
        .ingestion
        .ingest_text(IngestRequest {
            text: req.text,
            source_type: req.source_type,
            tags: req.tags,
            topic: req.topic,
            session_id: req.session_id,
            file_hash: None,
            filename: None,
        })
        .await?;
    Ok(Json(result))
}

pub async fn ingest_file_handler(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> ApiResult<Json<skynet_fileproc::ProcessFileResult>> {
    let mut bytes = None;
    let mut filename = None;
    let mut mime = "application/octet-stream".to_string();
    let mut source_type = default_source_type();
    let mut tags = Vec::new();
    let mut topic = None;
    let mut session_id = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| ApiError::from(skynet_core::error::SkynetError::ValidationError(e.to_string())))? {
        match field.name().unwrap_or_default() {
            "file" => {
                filename = field.file_name().map(str::to_string);
                mime = field.content_type().unwrap_or("application/octet-stream").to_string();
                bytes = Some(field.bytes().await.map_err(|e| ApiError::from(skynet_core::error::SkynetError::ValidationError(e.to_string())))?.to_vec());
            }
            "source_type" => source_type = field.text().await.unwrap_or(source_type),
            "tags" => tags = split_tags(field.text().await.ok()),
            "topic" => topic = field.text().await.ok(),
            "session_id" => session_id = field.text().await.ok(),
            _ => {}
        }
    }

    let bytes = bytes.ok_or_else(|| ApiError::from(skynet_core::error::SkynetError::ValidationError("missing `file` field".to_string())))?;
    let filename = filename.unwrap_or_else(|| "upload".to_string());

    let result = state
        .fileproc
        .process_file(
            skynet_fileproc::ProcessFileRequest { bytes, filename, mime, session_id },
            &source_type,
            tags,
            topic,
        )
        .await?;
    Ok(Json(result))
}

#[derive(Deserialize)]
pub struct IngestUrlRequest {
    pub url: String,
    #[serde(default = "default_source_type")]
    pub source_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub topic: Option<String>,
}

pub async fn ingest_url_handler(State(state): State<Arc<AppState>>, Json(req): Json<IngestUrlRequest>) -> ApiResult<Json<IngestResult>> {
    let result = state.fileproc.ingest_url(&req.url, &req.source_type, req.tags, req.topic).await?;
    Ok(Json(result))
}

#[derive(Serialize)]
pub struct FileMetadata {
    pub file: Option<serde_json::Value>,
}

pub async fn download_file_handler(State(state): State<Arc<AppState>>, Path(hash): Path<String>) -> ApiResult<Json<FileMetadata>> {
    let file = state.knowledge.find_file_by_hash(&hash).await?;
    Ok(Json(FileMetadata { file }))
}
