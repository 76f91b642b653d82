//! Reminder tools (§4.1, §4.4) — thin wrappers over `KnowledgeService`'s
//! `Reminder` node CRUD. Delivery is the Scheduler's job (§4.9's 30-minute
//! reminder-check poll), not these tools'.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::pipeline::MessageContext;

use super::{require_str, Tool, ToolResult};

pub struct SearchRemindersTool<C> {
    ctx: Arc<C>,
}

impl<C> SearchRemindersTool<C> {
    pub fn new(ctx: Arc<C>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl<C: MessageContext + 'static> Tool for SearchRemindersTool<C> {
    fn name(&self) -> &str {
        "search_reminders"
    }

    fn description(&self) -> &str {
        "List reminders, optionally filtered by status (pending, snoozed, done, cancelled) or a text query."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "status": {"type": "string", "description": "Filter by reminder status"},
                "query": {"type": "string", "description": "Free-text filter over reminder titles"}
            }
        })
    }

    async fn execute(&self, input: serde_json::Value) -> ToolResult {
        let status = input.get("status").and_then(|v| v.as_str());
        let query = input.get("query").and_then(|v| v.as_str());
        match self.ctx.knowledge().query_reminders(status, query).await {
            Ok(rows) => ToolResult::json(json!({"reminders": rows})),
            Err(e) => ToolResult::error(format!("search_reminders failed: {e}")),
        }
    }
}

pub struct CreateReminderTool<C> {
    ctx: Arc<C>,
}

impl<C> CreateReminderTool<C> {
    pub fn new(ctx: Arc<C>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl<C: MessageContext + 'static> Tool for CreateReminderTool<C> {
    fn name(&self) -> &str {
        "create_reminder"
    }

    fn description(&self) -> &str {
        "Create a one-time, recurring, persistent, event-based, or financial reminder with a due date."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "title": {"type": "string"},
                "due_date": {"type": "string", "description": "RFC3339 timestamp"},
                "reminder_type": {"type": "string", "enum": ["one_time", "recurring", "persistent", "event_based", "financial"]},
                "recurrence": {"type": "string", "enum": ["daily", "weekly", "monthly", "yearly"]},
                "priority": {"type": "integer"},
                "description": {"type": "string"}
            },
            "required": ["title", "due_date", "reminder_type"]
        })
    }

    async fn execute(&self, input: serde_json::Value) -> ToolResult {
        let title = match require_str(&input, "title") {
            Ok(v) => v,
            Err(e) => return e,
        };
        let due_date_raw = match require_str(&input, "due_date") {
            Ok(v) => v,
            Err(e) => return e,
        };
        let reminder_type = match require_str(&input, "reminder_type") {
            Ok(v) => v,
            Err(e) => return e,
        };
        let due_date = match chrono::DateTime::parse_from_rfc3339(due_date_raw) {
            Ok(d) => d.with_timezone(&chrono::Utc),
            Err(e) => return ToolResult::error(format!("invalid due_date: {e}")),
        };
        let recurrence = input.get("recurrence").and_then(|v| v.as_str());
        let priority = input.get("priority").and_then(|v| v.as_i64()).unwrap_or(0) as i32;
        let description = input.get("description").and_then(|v| v.as_str());

        let id = uuid::Uuid::new_v4().to_string();
        match self
            .ctx
            .knowledge()
            .upsert_reminder(&id, title, due_date, reminder_type, recurrence, priority, description)
            .await
        {
            Ok(entity_id) => ToolResult::json(json!({
                "ok": true,
                "entity_kind": "reminder",
                "entity_id": entity_id,
                "summary": format!("created reminder '{title}' due {due_date_raw}")
            })),
            Err(e) => ToolResult::error(format!("create_reminder failed: {e}")),
        }
    }
}

pub struct UpdateReminderTool<C> {
    ctx: Arc<C>,
}

impl<C> UpdateReminderTool<C> {
    pub fn new(ctx: Arc<C>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl<C: MessageContext + 'static> Tool for UpdateReminderTool<C> {
    fn name(&self) -> &str {
        "update_reminder"
    }

    fn description(&self) -> &str {
        "Update a reminder's title, due date, status, priority, or description. Only supplied fields change."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "id": {"type": "string"},
                "title": {"type": "string"},
                "due_date": {"type": "string", "description": "RFC3339 timestamp"},
                "status": {"type": "string", "enum": ["pending", "snoozed", "done", "cancelled"]},
                "priority": {"type": "integer"},
                "description": {"type": "string"}
            },
            "required": ["id"]
        })
    }

    async fn execute(&self, input: serde_json::Value) -> ToolResult {
        let id = match require_str(&input, "id") {
            Ok(v) => v,
            Err(e) => return e,
        };
        let title = input.get("title").and_then(|v| v.as_str());
        let status = input.get("status").and_then(|v| v.as_str());
        let priority = input.get("priority").and_then(|v| v.as_i64()).map(|v| v as i32);
        let description = input.get("description").and_then(|v| v.as_str());
        let due_date = match input.get("due_date").and_then(|v| v.as_str()) {
            Some(raw) => match chrono::DateTime::parse_from_rfc3339(raw) {
                Ok(d) => Some(d.with_timezone(&chrono::Utc)),
                Err(e) => return ToolResult::error(format!("invalid due_date: {e}")),
            },
            None => None,
        };

        match self
            .ctx
            .knowledge()
            .update_reminder(id, title, due_date, status, priority, description)
            .await
        {
            Ok(()) => ToolResult::json(json!({
                "ok": true,
                "entity_kind": "reminder",
                "entity_id": id,
                "summary": format!("updated reminder {id}")
            })),
            Err(e) => ToolResult::error(format!("update_reminder failed: {e}")),
        }
    }
}

pub struct DeleteReminderTool<C> {
    ctx: Arc<C>,
}

impl<C> DeleteReminderTool<C> {
    pub fn new(ctx: Arc<C>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl<C: MessageContext + 'static> Tool for DeleteReminderTool<C> {
    fn name(&self) -> &str {
        "delete_reminder"
    }

    fn description(&self) -> &str {
        "Delete a reminder by id."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {"id": {"type": "string"}},
            "required": ["id"]
        })
    }

    async fn execute(&self, input: serde_json::Value) -> ToolResult {
        let id = match require_str(&input, "id") {
            Ok(v) => v,
            Err(e) => return e,
        };
        match self.ctx.knowledge().delete_reminder(id).await {
            Ok(()) => ToolResult::json(json!({
                "ok": true,
                "entity_kind": "reminder",
                "entity_id": id,
                "summary": format!("deleted reminder {id}")
            })),
            Err(e) => ToolResult::error(format!("delete_reminder failed: {e}")),
        }
    }
}
