//! Proactive surface (§4.9, §6): on-demand triggers for the same jobs the
//! scheduler fires automatically, plus read-only views into what those jobs
//! would act on. `crate::jobs::dispatch_job` is the single code path shared
//! by both the scheduler and these handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use super::error::ApiResult;
use crate::app::AppState;
use crate::jobs::dispatch_job;

pub async fn morning_summary_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    Ok(Json(dispatch_job(&state, "morning_summary").await?))
}

pub async fn noon_checkin_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    Ok(Json(dispatch_job(&state, "noon_checkin").await?))
}

pub async fn evening_summary_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    Ok(Json(dispatch_job(&state, "evening_summary").await?))
}

pub async fn due_reminders_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let pending = state.knowledge.query_reminders(Some("pending"), None).await?;
    let now = Utc::now();
    let due: Vec<&Value> = pending
        .iter()
        .filter(|r| {
            r.get("due_date")
                .and_then(Value::as_str)
                .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
                .is_some_and(|d| d.with_timezone(&Utc) <= now)
        })
        .collect();
    Ok(Json(json!({"due": due})))
}

#[derive(serde::Deserialize)]
pub struct AdvanceReminderRequest {
    pub title: String,
    pub recurrence: String,
}

pub async fn advance_reminder_handler(State(state): State<Arc<AppState>>, Json(req): Json<AdvanceReminderRequest>) -> ApiResult<Json<Value>> {
    let recurrence: skynet_core::types::Recurrence = req
        .recurrence
        .parse()
        .map_err(|e: String| skynet_core::error::SkynetError::ValidationError(e))?;
    let new_due = state.knowledge.advance_recurring_reminder(&req.title, recurrence).await?;
    Ok(Json(json!({"ok": true, "title": req.title, "new_due_date": new_due.to_rfc3339()})))
}

pub async fn stalled_projects_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let cutoff = Utc::now() - chrono::Duration::days(state.config.scheduler.stalled_project_days);
    let mut params = HashMap::new();
    params.insert("cutoff".to_string(), json!(cutoff.to_rfc3339()));
    let rows = state
        .graph
        .query_rows(
            "MATCH (p:Project) WHERE p.status = 'active' AND p.updated_at < $cutoff \
             RETURN p.name AS name, p.updated_at AS updated_at",
            params,
            &["name", "updated_at"],
        )
        .await?;
    Ok(Json(json!({"stalled_projects": rows})))
}

pub async fn old_debts_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let cutoff = Utc::now() - chrono::Duration::days(state.config.scheduler.old_debt_days);
    let mut params = HashMap::new();
    params.insert("cutoff".to_string(), json!(cutoff.to_rfc3339()));
    let rows = state
        .graph
        .query_rows(
            "MATCH (d:Debt) WHERE d.status <> 'paid' AND d.created_at < $cutoff \
             RETURN d.id AS id, d.person AS person, d.amount AS amount",
            params,
            &["id", "person", "amount"],
        )
        .await?;
    Ok(Json(json!({"old_debts": rows})))
}

/// Pending reminders flagged `persistent` (§3 Reminder.persistent) whose due
/// date has already passed get pushed forward by one hour so they keep
/// nagging instead of silently going overdue.
pub async fn reschedule_persistent_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let mut params = HashMap::new();
    params.insert("now".to_string(), json!(Utc::now().to_rfc3339()));
    let rows = state
        .graph
        .query_rows(
            "MATCH (r:Reminder {status: 'pending', persistent: true}) WHERE r.due_date < $now \
             RETURN r.id AS id",
            params,
            &["id"],
        )
        .await?;

    let next_due = Utc::now() + chrono::Duration::hours(1);
    let mut rescheduled = Vec::new();
    for row in &rows {
        if let Some(id) = row.get("id").and_then(Value::as_str) {
            state.knowledge.update_reminder(id, None, Some(next_due), None, None, None).await?;
            rescheduled.push(id.to_string());
        }
    }
    Ok(Json(json!({"ok": true, "rescheduled": rescheduled, "next_due": next_due.to_rfc3339()})))
}
