//! Knowledge-note surface (§3 Knowledge, §6): free-form notes outside the
//! chat/ingestion pipeline, for direct CRUD against the knowledge graph.

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
    pub query: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
}

pub async fn list_handler(State(state): State<Arc<AppState>>, Query(q): Query<ListQuery>) -> ApiResult<Json<Vec<Value>>> {
    Ok(Json(state.knowledge.query_knowledge(q.query.as_deref(), q.topic.as_deref()).await?))
}

#[derive(Deserialize)]
pub struct UpdateRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

pub async fn update_handler(State(state): State<Arc<AppState>>, Json(req): Json<UpdateRequest>) -> ApiResult<Json<Value>> {
    let id = if req.category.is_some() {
        state
            .knowledge
            .upsert_knowledge(&req.title, &req.content, req.topic.as_deref(), req.category.as_deref())
            .await?
    } else {
        state.knowledge.store_note(&req.title, &req.content, req.topic.as_deref()).await?
    };
    Ok(Json(json!({"ok": true, "id": id})))
}
