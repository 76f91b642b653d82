//! Session compaction — LLM-based summarisation of working memory.
//!
//! Working memory (`append_working`/`get_working`) is a 24h-TTL FIFO of raw
//! turns. Once a session crosses `COMPRESS_THRESHOLD` turns, the oldest turns
//! are sent to a cheap model (Haiku) for Arabic summarisation; the summary is
//! stored with its own 24h TTL and the working-memory table is trimmed down
//! to the last few turns, verbatim.
//!
//! This is the single canonical implementation shared by every channel
//! adapter — gateway, discord, whatever comes next.

use std::sync::Arc;

use tracing::{info, warn};

use crate::provider::{ChatRequest, Message, Role};

use super::context::MessageContext;

const COMPRESS_THRESHOLD: usize = 40;

/// Compact a session's working memory when it crosses the turn threshold.
///
/// Triggered as a fire-and-forget `tokio::spawn` after each assistant turn is
/// saved. `append_working` already told the caller whether the threshold was
/// crossed on the last insert; this function re-derives that by reading the
/// working set directly so it stays correct even if called speculatively.
pub async fn compact_session_if_needed<C: MessageContext + 'static>(ctx: Arc<C>, session_key: String) {
    let turns = match ctx.memory().get_working(&session_key) {
        Ok(t) => t,
        Err(e) => {
            warn!(error = %e, session = %session_key, "compact: get_working failed");
            return;
        }
    };

    if turns.len() <= COMPRESS_THRESHOLD {
        return;
    }

    info!(
        session = %session_key,
        turns = turns.len(),
        "compact: threshold reached, summarising working memory"
    );

    let transcript: String = turns
        .iter()
        .map(|t| format!("{}: {}", t.role.to_uppercase(), t.content))
        .collect::<Vec<_>>()
        .join("\n\n");

    // Call Haiku — cheapest Claude model — to produce a concise Arabic summary.
    let req = ChatRequest {
        model: "claude-haiku-4-5-20251001".to_string(),
        system: concat!(
            "You summarise a personal assistant conversation for long-term memory. ",
            "Write a concise summary in Arabic of what was discussed and decided. ",
            "Keep names, amounts, dates, and commitments exact. Omit small talk."
        )
        .to_string(),
        system_prompt: None,
        messages: vec![Message {
            role: Role::User,
            content: format!("لخّص المحادثة التالية:\n\n{}", transcript),
        }],
        max_tokens: 512,
        stream: false,
        thinking: None,
        tools: Vec::new(),
        raw_messages: None,
    };

    let response = match ctx.agent().provider().send(&req).await {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, session = %session_key, "compact: Haiku summary call failed");
            return;
        }
    };

    match ctx.memory().compress_working(&session_key, response.content.trim()) {
        Ok(()) => {
            info!(session = %session_key, "compact: working memory compressed");
        }
        Err(e) => {
            warn!(error = %e, session = %session_key, "compact: compress_working failed");
        }
    }
}
