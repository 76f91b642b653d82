//! Non-streaming message pipeline — shared by all channel adapters.
//!
//! `process_message_non_streaming` runs the full agentic turn:
//! load history → build system prompt → build tools → tool loop →
//! save turns to SQLite → spawn compaction → return `ProcessedMessage`.
//!
//! The caller only handles channel-specific formatting (WS frame, Discord
//! chunking, etc.). Everything else is here, once.

use std::sync::Arc;

use tracing::info;

use skynet_memory::types::ConversationMessage;

use crate::provider::{ChatRequest, Message, ProviderError, Role};
use crate::tools::tool_loop;

use super::compact::compact_session_if_needed;
use super::context::MessageContext;

/// Result of a completed non-streaming pipeline turn.
pub struct ProcessedMessage {
    pub content: String,
    pub model: String,
    pub tokens_in: u32,
    pub tokens_out: u32,
    pub stop_reason: String,
}

/// Run the full non-streaming message pipeline for any channel adapter.
///
/// Steps:
/// 1. Load the last 40 turns of conversation history from SQLite.
/// 2. Build the system prompt (optionally injecting user memory context).
/// 3. Build the domain tool catalog.
/// 4. Run `tool_loop::run_tool_loop` (LLM → tool calls → results → LLM → …).
/// 5. Persist the user and assistant turns to SQLite.
/// 6. Spawn `compact_session_if_needed` (fire-and-forget).
/// 7. Return `ProcessedMessage`.
///
/// # Arguments
/// - `ctx` — shared host context (gateway `AppState`, etc.)
/// - `session_key` — unique key for this user/channel conversation
/// - `content` — the user's message text
/// - `user_context` — optional pre-rendered user memory context string
/// - `model_override` — optional per-request model ID (overrides runtime default)
/// - `attachment_blocks` — optional multimodal content blocks (images, files) to append
///   to the user turn. When `Some`, the pipeline uses `raw_messages` to pass structured
///   content blocks to the LLM instead of plain text messages.
pub async fn process_message_non_streaming<C: MessageContext + 'static>(
    ctx: &Arc<C>,
    session_key: &str,
    content: &str,
    user_context: Option<&str>,
    model_override: Option<&str>,
    attachment_blocks: Option<Vec<serde_json::Value>>,
) -> Result<ProcessedMessage, ProviderError> {
    let tools = crate::tools::build::build_tools(Arc::clone(ctx));
    let tool_defs = crate::tools::build::tool_definitions(&tools);

    // Load conversation history first so its length can seed the session's
    // turn counter in the volatile prompt tier.
    let history = ctx.memory().get_history(session_key, 40).unwrap_or_default();

    let now = chrono::Utc::now();
    let session_info = crate::prompt::SessionInfo {
        session_key: session_key.to_string(),
        turn_count: history.len() as u32,
        timestamp: now.format("%Y-%m-%d %H:%M UTC").to_string(),
    };
    let prompt_builder = ctx.agent().prompt().await;
    let system_prompt = prompt_builder.build_prompt(user_context, Some(&session_info));
    let plain = system_prompt.to_plain_text();
    drop(prompt_builder);

    // Resolve the model: per-request override takes priority over runtime default.
    let model = match model_override {
        Some(m) => m.to_string(),
        None => ctx.agent().get_model().await,
    };

    // Each message is wrapped with a timestamp envelope so the LLM sees
    // when each turn occurred (e.g. "[2026-01-18 16:26 UTC] text").
    let mut messages: Vec<Message> = history
        .iter()
        .map(|m| {
            let is_assistant = m.role == "assistant";
            let content = if is_assistant {
                m.content.clone()
            } else {
                format_envelope(&m.created_at, &m.content)
            };
            Message {
                role: if is_assistant { Role::Assistant } else { Role::User },
                content,
            }
        })
        .collect();

    messages.push(Message {
        role: Role::User,
        content: format_envelope(&now.to_rfc3339(), content),
    });

    // When multimodal content blocks are provided (e.g. uploaded images),
    // switch to raw_messages so the LLM receives structured content blocks
    // instead of plain text for the user turn.
    let raw_messages = attachment_blocks.map(|blocks| {
        let mut raw: Vec<serde_json::Value> = history
            .iter()
            .map(|m| serde_json::json!({ "role": m.role, "content": m.content }))
            .collect();
        let mut content_parts: Vec<serde_json::Value> = vec![serde_json::json!({
            "type": "text",
            "text": format_envelope(&now.to_rfc3339(), content)
        })];
        content_parts.extend(blocks);
        raw.push(serde_json::json!({ "role": "user", "content": content_parts }));
        raw
    });

    let request = ChatRequest {
        model,
        system: plain,
        system_prompt: Some(system_prompt),
        messages: if raw_messages.is_some() { Vec::new() } else { messages },
        max_tokens: 4096,
        stream: false,
        thinking: None,
        tools: tool_defs,
        raw_messages,
    };

    let r = tool_loop::run_tool_loop(ctx.agent().provider(), request, &tools).await?;

    info!(
        tokens_in = r.tokens_in,
        tokens_out = r.tokens_out,
        model = %r.model,
        session = %session_key,
        "pipeline: chat complete"
    );

    // Persist both turns to SQLite for future history.
    if !r.content.is_empty() {
        let created_at = chrono::Utc::now().to_rfc3339();
        let _ = ctx.memory().save_message(&ConversationMessage {
            id: 0,
            session_key: session_key.to_string(),
            role: "user".to_string(),
            content: content.to_string(),
            model_used: None,
            tokens_in: 0,
            tokens_out: 0,
            created_at: created_at.clone(),
        });
        let _ = ctx.memory().save_message(&ConversationMessage {
            id: 0,
            session_key: session_key.to_string(),
            role: "assistant".to_string(),
            content: r.content.clone(),
            model_used: Some(r.model.clone()),
            tokens_in: r.tokens_in,
            tokens_out: r.tokens_out,
            created_at,
        });

        // Fire-and-forget: compact working memory if the session has grown too long.
        let ctx_clone = Arc::clone(ctx);
        let sk = session_key.to_string();
        tokio::spawn(async move {
            compact_session_if_needed(ctx_clone, sk).await;
        });
    }

    Ok(ProcessedMessage {
        content: r.content,
        model: r.model,
        tokens_in: r.tokens_in,
        tokens_out: r.tokens_out,
        stop_reason: r.stop_reason,
    })
}

/// Wrap a message with a timestamp envelope.
///
/// Format: `[YYYY-MM-DD HH:MM UTC] content`
///
/// If the timestamp can't be parsed, the raw content is returned unchanged.
fn format_envelope(created_at: &str, content: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(created_at) {
        Ok(dt) => {
            let utc = dt.with_timezone(&chrono::Utc);
            format!("[{}] {}", utc.format("%Y-%m-%d %H:%M UTC"), content)
        }
        Err(_) => content.to_string(),
    }
}
