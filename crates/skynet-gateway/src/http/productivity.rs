//! Productivity surface (§3 Sprint/FocusSession, §6): sprint CRUD plus
//! burndown/velocity snapshots, focus-session tracking, and a lightweight
//! timeblock suggestion built from the day's existing focus sessions.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use super::error::ApiResult;
use crate::app::AppState;

#[derive(Deserialize)]
pub struct ProjectQuery {
    #[serde(default)]
    pub project: Option<String>,
}

pub async fn list_sprints_handler(State(state): State<Arc<AppState>>, Query(q): Query<ProjectQuery>) -> ApiResult<Json<Vec<Value>>> {
    Ok(Json(state.knowledge.query_sprint_active(q.project.as_deref()).await?))
}

#[derive(Deserialize)]
pub struct UpsertSprintRequest {
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub project: Option<String>,
    pub goal: String,
}

pub async fn upsert_sprint_handler(State(state): State<Arc<AppState>>, Json(req): Json<UpsertSprintRequest>) -> ApiResult<Json<Value>> {
    let name = state
        .knowledge
        .upsert_sprint(&req.name, req.start_date, req.end_date, req.project.as_deref(), &req.goal)
        .await?;
    Ok(Json(json!({"ok": true, "name": name})))
}

#[derive(Deserialize)]
pub struct SprintQuery {
    pub sprint: String,
}

/// Snapshot burndown: total vs. remaining tasks assigned to the sprint right
/// now. There is no historical task-count tracker in this workspace, so this
/// reports the current point rather than a day-by-day ideal/actual curve.
pub async fn burndown_handler(State(state): State<Arc<AppState>>, Query(q): Query<SprintQuery>) -> ApiResult<Json<Value>> {
    let mut params = HashMap::new();
    params.insert("sprint".to_string(), json!(q.sprint));
    let rows = state
        .graph
        .query_rows(
            "MATCH (t:Task)-[:BELONGS_TO]->(:Sprint {name: $sprint}) RETURN t.status AS status",
            params,
            &["status"],
        )
        .await?;
    let total = rows.len();
    let done = rows.iter().filter(|r| r.get("status").and_then(Value::as_str) == Some("done")).count();
    Ok(Json(json!({"sprint": q.sprint, "total_tasks": total, "done_tasks": done, "remaining": total - done})))
}

/// Completed tasks per finished sprint, most recently completed sprint first.
pub async fn velocity_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let rows = state
        .graph
        .query_rows(
            "MATCH (s:Sprint {status: 'completed'})<-[:BELONGS_TO]-(t:Task {status: 'done'}) \
             RETURN s.name AS sprint, count(t) AS completed_tasks ORDER BY s.end_date DESC",
            HashMap::new(),
            &["sprint", "completed_tasks"],
        )
        .await?;
    Ok(Json(json!({"velocity": rows})))
}

#[derive(Deserialize)]
pub struct FocusStartRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    pub duration_min: i32,
    #[serde(default)]
    pub task: Option<String>,
}

pub async fn focus_start_handler(State(state): State<Arc<AppState>>, Json(req): Json<FocusStartRequest>) -> ApiResult<Json<Value>> {
    let id = req.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let start_time = req.start_time.unwrap_or_else(Utc::now);
    state.knowledge.upsert_focus_session(&id, start_time, req.duration_min, req.task.as_deref()).await?;
    Ok(Json(json!({"ok": true, "id": id})))
}

#[derive(Deserialize)]
pub struct FocusCompleteRequest {
    pub id: String,
}

pub async fn focus_complete_handler(State(state): State<Arc<AppState>>, Json(req): Json<FocusCompleteRequest>) -> ApiResult<Json<Value>> {
    let mut props = HashMap::new();
    props.insert("completed".to_string(), json!(true));
    state.graph.merge_node("FocusSession", "id", &req.id, &props).await?;
    Ok(Json(json!({"ok": true, "id": req.id})))
}

#[derive(Deserialize)]
pub struct FocusStatsQuery {
    #[serde(default)]
    pub since: Option<DateTime<Utc>>,
}

pub async fn focus_stats_handler(State(state): State<Arc<AppState>>, Query(q): Query<FocusStatsQuery>) -> ApiResult<Json<Value>> {
    let since = q.since.unwrap_or_else(|| Utc::now() - Duration::days(7));
    Ok(Json(state.knowledge.query_focus_stats(since).await?))
}

/// Proposes the next three free one-hour blocks today (09:00-18:00 UTC)
/// that don't overlap an existing `FocusSession`.
pub async fn timeblock_suggest_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let today_start = Utc::now().date_naive().and_hms_opt(0, 0, 0).unwrap().and_utc();
    let today_end = today_start + Duration::days(1);
    let mut params = HashMap::new();
    params.insert("start".to_string(), json!(today_start.to_rfc3339()));
    params.insert("end".to_string(), json!(today_end.to_rfc3339()));
    let busy = state
        .graph
        .query_rows(
            "MATCH (f:FocusSession) WHERE f.start_time >= $start AND f.start_time < $end \
             RETURN f.start_time AS start_time, f.duration_min AS duration_min",
            params,
            &["start_time", "duration_min"],
        )
        .await?;

    let busy_hours: Vec<u32> = busy
        .iter()
        .filter_map(|r| r.get("start_time").and_then(Value::as_str))
        .filter_map(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc).format("%H").to_string().parse().unwrap_or(0))
        .collect();

    let mut suggestions = Vec::new();
    for hour in 9..18 {
        if busy_hours.contains(&hour) {
            continue;
        }
        let slot = today_start + Duration::hours(hour as i64);
        suggestions.push(json!({"start_time": slot.to_rfc3339(), "duration_min": 60}));
        if suggestions.len() == 3 {
            break;
        }
    }
    Ok(Json(json!({"suggestions": suggestions})))
}

#[derive(Deserialize)]
pub struct TimeblockApplyRequest {
    pub start_time: DateTime<Utc>,
    #[serde(default = "default_block_duration")]
    pub duration_min: i32,
    #[serde(default)]
    pub task: Option<String>,
}

fn default_block_duration() -> i32 {
    60
}

pub async fn timeblock_apply_handler(State(state): State<Arc<AppState>>, Json(req): Json<TimeblockApplyRequest>) -> ApiResult<Json<Value>> {
    let id = uuid::Uuid::new_v4().to_string();
    state.knowledge.upsert_focus_session(&id, req.start_time, req.duration_min, req.task.as_deref()).await?;
    Ok(Json(json!({"ok": true, "id": id})))
}
