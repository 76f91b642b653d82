//! Business logic behind the 6 scheduled jobs (§4.9). Each job is plain
//! async code reachable two ways: fired by `SchedulerEngine` over its
//! `mpsc::Receiver<Job>` (see `main.rs`), or invoked directly by the
//! `/proactive/*` REST handlers so a manual trigger takes the identical
//! path as the scheduled one.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};
use skynet_scheduler::Job;
use tracing::{error, info, warn};

use crate::app::AppState;

/// Consumes fired jobs from the scheduler engine for the lifetime of the
/// process; one iteration per job, logged and never allowed to kill the
/// consumer task on a single job's failure.
pub async fn run_dispatch_loop(state: Arc<AppState>, mut rx: tokio::sync::mpsc::Receiver<Job>) {
    while let Some(job) = rx.recv().await {
        let state = state.clone();
        tokio::spawn(async move {
            info!(job = %job.action, "dispatching scheduled job");
            if let Err(e) = dispatch_job(&state, &job.action).await {
                error!(job = %job.action, error = %e, "scheduled job failed");
            }
        });
    }
}

pub async fn dispatch_job(state: &AppState, action: &str) -> anyhow::Result<Value> {
    match action {
        "morning_summary" => morning_summary(state).await,
        "noon_checkin" => noon_checkin(state).await,
        "evening_summary" => evening_summary(state).await,
        "reminder_check" => reminder_check(state).await,
        "smart_alerts" => smart_alerts(state).await,
        "daily_backup" => daily_backup(state).await,
        other => {
            warn!(action = other, "unknown scheduled job action");
            Ok(json!({"ok": false, "error": format!("unknown job action: {other}")}))
        }
    }
}

async fn morning_summary(state: &AppState) -> anyhow::Result<Value> {
    let today = Utc::now().date_naive();
    let plan = state.knowledge.query_daily_plan(today).await?;
    let projects = state.knowledge.query_projects_overview().await?;
    Ok(json!({"ok": true, "kind": "morning_summary", "plan": plan, "projects": projects}))
}

async fn noon_checkin(state: &AppState) -> anyhow::Result<Value> {
    let today = Utc::now().date_naive();
    let plan = state.knowledge.query_daily_plan(today).await?;
    let remaining: Vec<&Value> = plan
        .get("reminders")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .collect();
    Ok(json!({"ok": true, "kind": "noon_checkin", "remaining_today": remaining}))
}

async fn evening_summary(state: &AppState) -> anyhow::Result<Value> {
    let since = Utc::now() - chrono::Duration::hours(12);
    let focus = state.knowledge.query_focus_stats(since).await?;
    let tasks_done = state.knowledge.query_tasks(None, Some("done")).await?;
    Ok(json!({"ok": true, "kind": "evening_summary", "focus": focus, "tasks_done": tasks_done.len()}))
}

/// Fires due, non-recurring reminders are left to the client poll of
/// `GET /reminders/?include_overdue=true`; this job's own responsibility
/// is advancing recurring reminders whose `due_date` has already passed
/// (§4.4 `advance_recurring_reminder`).
async fn reminder_check(state: &AppState) -> anyhow::Result<Value> {
    let due = state.knowledge.query_reminders(Some("pending"), None).await?;
    let now = Utc::now();
    let mut advanced = Vec::new();
    for r in &due {
        let Some(title) = r.get("title").and_then(Value::as_str) else { continue };
        let Some(due_date) = r
            .get("due_date")
            .and_then(Value::as_str)
            .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
        else {
            continue;
        };
        if due_date.with_timezone(&Utc) > now {
            continue;
        }
        // only recurring reminders get auto-advanced; one-shot reminders
        // stay "pending" until the user marks them done.
        let Some(recurrence_raw) = r.get("recurrence").and_then(Value::as_str) else { continue };
        let Ok(recurrence) = recurrence_raw.parse::<skynet_core::types::Recurrence>() else { continue };
        match state.knowledge.advance_recurring_reminder(title, recurrence).await {
            Ok(new_due) => advanced.push(json!({"title": title, "new_due_date": new_due.to_rfc3339()})),
            Err(e) => warn!(title, error = %e, "failed to advance recurring reminder"),
        }
    }
    Ok(json!({"ok": true, "kind": "reminder_check", "advanced": advanced}))
}

/// Surfaces projects with no graph activity in `stalled_project_days` and
/// debts open longer than `old_debt_days` (§4.9). `Project`/`Debt` nodes
/// get `updated_at` stamped automatically by `GraphClient::merge_node`, so
/// this reads that property directly rather than needing a dedicated
/// "last activity" tracker.
async fn smart_alerts(state: &AppState) -> anyhow::Result<Value> {
    let stalled_cutoff = Utc::now() - chrono::Duration::days(state.config.scheduler.stalled_project_days as i64);
    let old_debt_cutoff = Utc::now() - chrono::Duration::days(state.config.scheduler.old_debt_days as i64);

    let mut params = std::collections::HashMap::new();
    params.insert("cutoff".to_string(), json!(stalled_cutoff.to_rfc3339()));
    let stalled_rows = state
        .graph
        .query_rows(
            "MATCH (p:Project) WHERE p.status = 'active' AND p.updated_at < $cutoff \
             RETURN p.name AS name, p.updated_at AS updated_at",
            params,
            &["name", "updated_at"],
        )
        .await?;

    let mut params = std::collections::HashMap::new();
    params.insert("cutoff".to_string(), json!(old_debt_cutoff.to_rfc3339()));
    let old_debt_rows = state
        .graph
        .query_rows(
            "MATCH (d:Debt) WHERE d.status <> 'paid' AND d.created_at < $cutoff \
             RETURN d.id AS id, d.person AS person, d.amount AS amount",
            params,
            &["id", "person", "amount"],
        )
        .await?;

    Ok(json!({
        "ok": true,
        "kind": "smart_alerts",
        "stalled_projects": stalled_rows,
        "old_debts": old_debt_rows,
    }))
}

async fn daily_backup(state: &AppState) -> anyhow::Result<Value> {
    let timestamp = state.backup.create_backup().await?;
    Ok(json!({"ok": true, "kind": "daily_backup", "timestamp": timestamp}))
}
