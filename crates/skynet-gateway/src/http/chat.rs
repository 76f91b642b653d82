//! Chat surface (§6): `POST /chat/`, `POST /chat/stream` (NDJSON-over-SSE),
//! and `GET /chat/summary`. All three share the same agentic pipeline —
//! `process_message_non_streaming` (tools, history, memory, tool loop).
//! Authentication is handled once by `crate::auth::require_auth`, layered
//! over this whole router in `app::build_router`.
//!
//! The underlying pipeline (`skynet-agent::pipeline`) exposes only a
//! non-streaming entry point — there is no token-level streaming tool loop
//! in this workspace. `/chat/stream` runs the turn to completion and then
//! re-emits it as the NDJSON frame sequence the §6 contract describes,
//! rather than fabricating a live token stream the tool loop can't produce.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::sse::KeepAlive;
use axum::response::Sse;
use axum::Json;
use futures_util::stream::{self, Stream};
use serde::{Deserialize, Serialize};

use skynet_agent::pipeline::process_message_non_streaming;

use super::error::ApiResult;
use crate::app::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub model: String,
    pub tokens_in: u32,
    pub tokens_out: u32,
}

fn session_key(session_id: Option<&str>) -> String {
    format!("http:{}", session_id.unwrap_or("default"))
}

pub async fn chat_handler(State(state): State<Arc<AppState>>, Json(req): Json<ChatRequest>) -> ApiResult<Json<ChatReply>> {
    if req.message.trim().is_empty() {
        return Err(skynet_core::error::SkynetError::ValidationError("message cannot be empty".to_string()).into());
    }
    let key = session_key(req.session_id.as_deref());
    let result = process_message_non_streaming(&state, &key, &req.message, None, req.model.as_deref(), None).await?;
    Ok(Json(ChatReply {
        reply: result.content,
        model: result.model,
        tokens_in: result.tokens_in,
        tokens_out: result.tokens_out,
    }))
}

/// NDJSON-over-SSE framing of the finished turn: `meta` → `token` chunks →
/// `done`. Consumers are expected to tolerate unknown frame types, so this
/// is a valid (if coarse-grained) subset of a full streaming contract.
pub async fn chat_stream_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Sse<impl Stream<Item = Result<axum::response::sse::Event, std::convert::Infallible>>>> {
    if req.message.trim().is_empty() {
        return Err(skynet_core::error::SkynetError::ValidationError("message cannot be empty".to_string()).into());
    }
    let key = session_key(req.session_id.as_deref());
    let result = process_message_non_streaming(&state, &key, &req.message, None, req.model.as_deref(), None).await?;

    let mut frames = vec![serde_json::json!({"type": "meta", "model": result.model})];
    for word in result.content.split_inclusive(' ') {
        frames.push(serde_json::json!({"type": "token", "text": word}));
    }
    frames.push(serde_json::json!({
        "type": "done",
        "tokens_in": result.tokens_in,
        "tokens_out": result.tokens_out,
        "stop_reason": result.stop_reason,
    }));

    let events = frames.into_iter().map(|f| Ok(axum::response::sse::Event::default().data(f.to_string())));
    Ok(Sse::new(stream::iter(events)).keep_alive(KeepAlive::default()))
}

#[derive(Deserialize)]
pub struct SummaryQuery {
    pub session_id: String,
}

#[derive(Serialize)]
pub struct SummaryTurn {
    pub role: String,
    pub content: String,
    pub created_at: String,
}

/// `GET /chat/summary?session_id=` — last 40 turns, verbatim (`MemoryManager`
/// already performs compaction/summarisation on write, §4.8).
pub async fn chat_summary_handler(State(state): State<Arc<AppState>>, Query(q): Query<SummaryQuery>) -> ApiResult<Json<Vec<SummaryTurn>>> {
    let key = session_key(Some(&q.session_id));
    let history = state
        .memory
        .get_history(&key, 40)
        .map_err(|e| skynet_core::error::SkynetError::Database(e.to_string()))?;
    Ok(Json(
        history
            .into_iter()
            .map(|m| SummaryTurn { role: m.role, content: m.content, created_at: m.created_at })
            .collect(),
    ))
}
