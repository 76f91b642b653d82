//! Knowledge and person tools (§4.1) — free-form notes and semantic search
//! over `KnowledgeService`'s graph + vector store, plus person lookups.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::pipeline::MessageContext;

use super::{require_str, Tool, ToolResult};

pub struct SearchKnowledgeTool<C> {
    ctx: Arc<C>,
}

impl<C> SearchKnowledgeTool<C> {
    pub fn new(ctx: Arc<C>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl<C: MessageContext + 'static> Tool for SearchKnowledgeTool<C> {
    fn name(&self) -> &str {
        "search_knowledge"
    }

    fn description(&self) -> &str {
        "Semantic and graph search over stored knowledge entries and notes, optionally filtered by topic."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string"},
                "topic": {"type": "string"},
                "limit": {"type": "integer", "description": "max vector hits, defaults to 5"}
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, input: serde_json::Value) -> ToolResult {
        let query = match require_str(&input, "query") {
            Ok(v) => v,
            Err(e) => return e,
        };
        let topic = input.get("topic").and_then(|v| v.as_str());
        let limit = input.get("limit").and_then(|v| v.as_u64()).unwrap_or(5);

        match self.ctx.knowledge().search_knowledge(query, topic, limit).await {
            Ok(result) => ToolResult::json(result),
            Err(e) => ToolResult::error(format!("search_knowledge failed: {e}")),
        }
    }
}

pub struct StoreNoteTool<C> {
    ctx: Arc<C>,
}

impl<C> StoreNoteTool<C> {
    pub fn new(ctx: Arc<C>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl<C: MessageContext + 'static> Tool for StoreNoteTool<C> {
    fn name(&self) -> &str {
        "store_note"
    }

    fn description(&self) -> &str {
        "Store a free-form note as a knowledge entry, indexed for both semantic and graph search."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "title": {"type": "string"},
                "content": {"type": "string"},
                "topic": {"type": "string"}
            },
            "required": ["title", "content"]
        })
    }

    async fn execute(&self, input: serde_json::Value) -> ToolResult {
        let title = match require_str(&input, "title") {
            Ok(v) => v,
            Err(e) => return e,
        };
        let content = match require_str(&input, "content") {
            Ok(v) => v,
            Err(e) => return e,
        };
        let topic = input.get("topic").and_then(|v| v.as_str());

        match self.ctx.knowledge().store_note(title, content, topic).await {
            Ok(entity_id) => ToolResult::json(json!({
                "ok": true,
                "entity_kind": "knowledge",
                "entity_id": entity_id,
                "summary": format!("stored note '{title}'")
            })),
            Err(e) => ToolResult::error(format!("store_note failed: {e}")),
        }
    }
}

pub struct GetPersonInfoTool<C> {
    ctx: Arc<C>,
}

impl<C> GetPersonInfoTool<C> {
    pub fn new(ctx: Arc<C>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl<C: MessageContext + 'static> Tool for GetPersonInfoTool<C> {
    fn name(&self) -> &str {
        "get_person_info"
    }

    fn description(&self) -> &str {
        "Retrieve everything known about a person: facts, relationships, and linked debts/projects/reminders."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"}
            },
            "required": ["name"]
        })
    }

    async fn execute(&self, input: serde_json::Value) -> ToolResult {
        let name = match require_str(&input, "name") {
            Ok(v) => v,
            Err(e) => return e,
        };
        match self.ctx.knowledge().query_person_context(name).await {
            Ok(facts) if facts.is_empty() => {
                ToolResult::error(format!("no information found for person: {name}"))
            }
            Ok(facts) => ToolResult::json(json!({"name": name, "facts": facts})),
            Err(e) => ToolResult::error(format!("get_person_info failed: {e}")),
        }
    }
}
