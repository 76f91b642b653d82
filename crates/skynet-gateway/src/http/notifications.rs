//! GET /notifications — drain proactive notifications queued for a session
//! while the client was idle (§6 streaming contract). Auth is handled once
//! by `crate::auth::require_auth`, layered over the whole router.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::app::AppState;

#[derive(Deserialize)]
pub struct NotificationQuery {
    #[serde(default = "default_session")]
    pub session_id: String,
}

fn default_session() -> String {
    "default".to_string()
}

#[derive(Serialize)]
pub struct NotificationResponse {
    pub notifications: Vec<String>,
}

pub async fn notifications_handler(State(state): State<Arc<AppState>>, Query(query): Query<NotificationQuery>) -> Json<NotificationResponse> {
    let session_key = format!("http:{}", query.session_id);
    let messages = state.notifications.remove(&session_key).map(|(_, msgs)| msgs).unwrap_or_default();
    Json(NotificationResponse { notifications: messages })
}
