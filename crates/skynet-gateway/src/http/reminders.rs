//! Reminder surface (§3 Reminder, §4.4, §6). `KnowledgeService` owns CRUD
//! and recurrence-advancing; `action` layers the common status transitions
//! (snooze/done/cancel) on top of `update_reminder` so clients don't have
//! to know the underlying field semantics.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use skynet_core::error::SkynetError;

use super::error::ApiResult;
use crate::app::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
}

pub async fn list_handler(State(state): State<Arc<AppState>>, Query(q): Query<ListQuery>) -> ApiResult<Json<Vec<Value>>> {
    Ok(Json(state.knowledge.query_reminders(q.status.as_deref(), q.query.as_deref()).await?))
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderAction {
    Snooze,
    Done,
    Cancel,
}

#[derive(Deserialize)]
pub struct ActionRequest {
    pub id: String,
    pub action: ReminderAction,
    /// Required for `snooze`: the new due date to push to.
    #[serde(default)]
    pub snooze_until: Option<DateTime<Utc>>,
}

pub async fn action_handler(State(state): State<Arc<AppState>>, Json(req): Json<ActionRequest>) -> ApiResult<Json<Value>> {
    match req.action {
        ReminderAction::Snooze => {
            let until = req
                .snooze_until
                .ok_or_else(|| SkynetError::ValidationError("snooze requires snooze_until".to_string()))?;
            state
                .knowledge
                .update_reminder(&req.id, None, Some(until), Some("snoozed"), None, None)
                .await?;
        }
        ReminderAction::Done => {
            state.knowledge.update_reminder(&req.id, None, None, Some("done"), None, None).await?;
        }
        ReminderAction::Cancel => {
            state.knowledge.update_reminder(&req.id, None, None, Some("cancelled"), None, None).await?;
        }
    }
    Ok(Json(json!({"ok": true, "id": req.id})))
}

#[derive(Deserialize)]
pub struct UpdateRequest {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
}

pub async fn update_handler(State(state): State<Arc<AppState>>, Json(req): Json<UpdateRequest>) -> ApiResult<Json<Value>> {
    state
        .knowledge
        .update_reminder(
            &req.id,
            req.title.as_deref(),
            req.due_date,
            req.status.as_deref(),
            req.priority,
            req.description.as_deref(),
        )
        .await?;
    Ok(Json(json!({"ok": true, "id": req.id})))
}

#[derive(Deserialize)]
pub struct DeleteRequest {
    pub id: String,
}

pub async fn delete_handler(State(state): State<Arc<AppState>>, Json(req): Json<DeleteRequest>) -> ApiResult<Json<Value>> {
    state.knowledge.delete_reminder(&req.id).await?;
    Ok(Json(json!({"ok": true, "id": req.id})))
}

#[derive(Deserialize)]
pub struct DeleteAllRequest {
    #[serde(default)]
    pub status: Option<String>,
}

pub async fn delete_all_handler(State(state): State<Arc<AppState>>, Json(req): Json<DeleteAllRequest>) -> ApiResult<Json<Value>> {
    let reminders = state.knowledge.query_reminders(req.status.as_deref(), None).await?;
    let mut deleted = 0;
    for r in &reminders {
        if let Some(id) = r.get("id").and_then(Value::as_str) {
            state.knowledge.delete_reminder(id).await?;
            deleted += 1;
        }
    }
    Ok(Json(json!({"ok": true, "deleted": deleted})))
}

/// Reminders with identical (case-insensitive) titles are treated as
/// duplicates: the earliest-due one survives, the rest are deleted.
pub async fn merge_duplicates_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let all = state.knowledge.query_reminders(None, None).await?;
    let mut by_title: HashMap<String, Vec<&Value>> = HashMap::new();
    for r in &all {
        if let Some(title) = r.get("title").and_then(Value::as_str) {
            by_title.entry(title.to_lowercase()).or_default().push(r);
        }
    }

    let mut merged = Vec::new();
    for (title, mut group) in by_title {
        if group.len() < 2 {
            continue;
        }
        group.sort_by_key(|r| r.get("due_date").and_then(Value::as_str).unwrap_or_default().to_string());
        let (_, duplicates) = group.split_first().unwrap();
        for dup in duplicates {
            if let Some(id) = dup.get("id").and_then(Value::as_str) {
                state.knowledge.delete_reminder(id).await?;
                merged.push(json!({"title": title, "deleted_id": id}));
            }
        }
    }
    Ok(Json(json!({"ok": true, "merged": merged})))
}
