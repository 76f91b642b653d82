//! Backup surface (§4.9/§4.10, §6): on-demand snapshot, listing, and
//! restore — the same `BackupService` the daily scheduled job drives.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use super::error::ApiResult;
use crate::app::AppState;

pub async fn create_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let timestamp = state.backup.create_backup().await?;
    Ok(Json(json!({"ok": true, "timestamp": timestamp})))
}

pub async fn list_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let backups = state.backup.list_backups().await?;
    Ok(Json(json!({"backups": backups})))
}

pub async fn restore_handler(State(state): State<Arc<AppState>>, Path(timestamp): Path<String>) -> ApiResult<Json<Value>> {
    state.backup.restore_backup(&timestamp).await?;
    Ok(Json(json!({"ok": true, "restored": timestamp})))
}
