//! Financial surface (§3 Expense/Debt, §4.1, §6): spending report, debt
//! listing/payment, and overdue-debt alerts.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use super::error::ApiResult;
use crate::app::AppState;

#[derive(Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub since: Option<DateTime<Utc>>,
}

pub async fn report_handler(State(state): State<Arc<AppState>>, Query(q): Query<ReportQuery>) -> ApiResult<Json<Value>> {
    let since = q.since.unwrap_or_else(|| Utc::now() - chrono::Duration::days(30));
    Ok(Json(state.knowledge.query_financial_report(since).await?))
}

#[derive(Deserialize)]
pub struct DebtsQuery {
    #[serde(default)]
    pub status: Option<String>,
}

pub async fn debts_handler(State(state): State<Arc<AppState>>, Query(q): Query<DebtsQuery>) -> ApiResult<Json<Vec<Value>>> {
    Ok(Json(state.knowledge.query_debts(q.status.as_deref()).await?))
}

#[derive(Deserialize)]
pub struct DebtPaymentRequest {
    pub debt_id: String,
    pub amount: f64,
    #[serde(default)]
    pub payment_id: Option<String>,
}

pub async fn debt_payment_handler(State(state): State<Arc<AppState>>, Json(req): Json<DebtPaymentRequest>) -> ApiResult<Json<Value>> {
    let payment_id = req.payment_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    state.knowledge.record_debt_payment(&payment_id, &req.debt_id, req.amount).await?;
    Ok(Json(json!({"ok": true, "payment_id": payment_id})))
}

/// Debts open longer than `scheduler.old_debt_days` (§4.9's smart-alerts
/// job, surfaced here for an on-demand check instead of waiting for the
/// scheduled run).
pub async fn alerts_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let cutoff = Utc::now() - chrono::Duration::days(state.config.scheduler.old_debt_days as i64);
    let mut params = HashMap::new();
    params.insert("cutoff".to_string(), json!(cutoff.to_rfc3339()));
    let old_debts = state
        .graph
        .query_rows(
            "MATCH (d:Debt) WHERE d.status <> 'paid' AND d.created_at < $cutoff \
             RETURN d.id AS id, d.person AS person, d.amount AS amount",
            params,
            &["id", "person", "amount"],
        )
        .await?;
    Ok(Json(json!({"old_debts": old_debts})))
}
