//! Project surface (§3 Project, §6): overview list, detail drill-down,
//! upsert, merge (duplicate-entity resolution), and cascading delete.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use skynet_core::error::SkynetError;

use super::error::ApiResult;
use crate::app::AppState;

pub async fn list_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Value>>> {
    Ok(Json(state.knowledge.query_projects_overview().await?))
}

pub async fn get_handler(State(state): State<Arc<AppState>>, Path(name): Path<String>) -> ApiResult<Json<Value>> {
    let details = state.knowledge.query_project_details(&name).await?;
    details.ok_or_else(|| SkynetError::NotFound(format!("project {name} not found")).into()).map(Json)
}

#[derive(Deserialize)]
pub struct UpdateRequest {
    pub name: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_status() -> String {
    "active".to_string()
}

pub async fn update_handler(State(state): State<Arc<AppState>>, Json(req): Json<UpdateRequest>) -> ApiResult<Json<Value>> {
    let name = state
        .knowledge
        .upsert_project(&req.name, &req.status, req.priority, req.description.as_deref())
        .await?;
    Ok(Json(json!({"ok": true, "name": name})))
}

#[derive(Deserialize)]
pub struct MergeRequest {
    pub source: String,
    pub target: String,
}

pub async fn merge_handler(State(state): State<Arc<AppState>>, Json(req): Json<MergeRequest>) -> ApiResult<Json<Value>> {
    state.knowledge.merge_projects(&req.source, &req.target).await?;
    Ok(Json(json!({"ok": true, "source": req.source, "target": req.target})))
}

pub async fn delete_handler(State(state): State<Arc<AppState>>, Path(name): Path<String>) -> ApiResult<Json<Value>> {
    state.knowledge.delete_project(&name).await?;
    Ok(Json(json!({"ok": true, "name": name})))
}
