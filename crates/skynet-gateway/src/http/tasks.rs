//! Task surface (§3 Task, §6). Tasks are keyed by name; `upsert_task`
//! doubles as both create and status update, mirroring `Project`/`Item`.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::error::ApiResult;
use crate::app::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

pub async fn list_handler(State(state): State<Arc<AppState>>, Query(q): Query<ListQuery>) -> ApiResult<Json<Vec<Value>>> {
    Ok(Json(state.knowledge.query_tasks(q.project.as_deref(), q.status.as_deref()).await?))
}

#[derive(Deserialize)]
pub struct UpdateRequest {
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub sprint: Option<String>,
}

pub async fn update_handler(State(state): State<Arc<AppState>>, Json(req): Json<UpdateRequest>) -> ApiResult<Json<Value>> {
    let name = state
        .knowledge
        .upsert_task(&req.name, &req.status, req.project.as_deref(), req.sprint.as_deref())
        .await?;
    Ok(Json(json!({"ok": true, "name": name})))
}
