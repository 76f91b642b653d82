//! Planning and productivity tools (§4.1) — daily plan and focus-session /
//! task-completion stats, read from `KnowledgeService`.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::pipeline::MessageContext;

use super::{Tool, ToolResult};

pub struct GetDailyPlanTool<C> {
    ctx: Arc<C>,
}

impl<C> GetDailyPlanTool<C> {
    pub fn new(ctx: Arc<C>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl<C: MessageContext + 'static> Tool for GetDailyPlanTool<C> {
    fn name(&self) -> &str {
        "get_daily_plan"
    }

    fn description(&self) -> &str {
        "List reminders due on a given date (defaults to today)."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "date": {"type": "string", "description": "YYYY-MM-DD; defaults to today"}
            }
        })
    }

    async fn execute(&self, input: serde_json::Value) -> ToolResult {
        let date = match input.get("date").and_then(|v| v.as_str()) {
            Some(raw) => match chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(d) => d,
                Err(e) => return ToolResult::error(format!("invalid date: {e}")),
            },
            None => chrono::Utc::now().date_naive(),
        };
        match self.ctx.knowledge().query_daily_plan(date).await {
            Ok(plan) => ToolResult::json(plan),
            Err(e) => ToolResult::error(format!("get_daily_plan failed: {e}")),
        }
    }
}

pub struct GetProductivityStatsTool<C> {
    ctx: Arc<C>,
}

impl<C> GetProductivityStatsTool<C> {
    pub fn new(ctx: Arc<C>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl<C: MessageContext + 'static> Tool for GetProductivityStatsTool<C> {
    fn name(&self) -> &str {
        "get_productivity_stats"
    }

    fn description(&self) -> &str {
        "Summarise completed focus-session minutes, session count, and active sprints since a given date (defaults to 7 days ago)."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "since": {"type": "string", "description": "RFC3339 timestamp; defaults to 7 days ago"},
                "project": {"type": "string"}
            }
        })
    }

    async fn execute(&self, input: serde_json::Value) -> ToolResult {
        let since = match input.get("since").and_then(|v| v.as_str()) {
            Some(raw) => match chrono::DateTime::parse_from_rfc3339(raw) {
                Ok(d) => d.with_timezone(&chrono::Utc),
                Err(e) => return ToolResult::error(format!("invalid since: {e}")),
            },
            None => chrono::Utc::now() - chrono::Duration::days(7),
        };
        let project = input.get("project").and_then(|v| v.as_str());

        let focus = match self.ctx.knowledge().query_focus_stats(since).await {
            Ok(f) => f,
            Err(e) => return ToolResult::error(format!("get_productivity_stats failed: {e}")),
        };
        let sprints = match self.ctx.knowledge().query_sprint_active(project).await {
            Ok(s) => s,
            Err(e) => return ToolResult::error(format!("get_productivity_stats failed: {e}")),
        };
        let done_tasks = match self.ctx.knowledge().query_tasks(project, Some("done")).await {
            Ok(t) => t,
            Err(e) => return ToolResult::error(format!("get_productivity_stats failed: {e}")),
        };

        ToolResult::json(json!({
            "since": since.to_rfc3339(),
            "focus": focus,
            "active_sprints": sprints,
            "tasks_completed": done_tasks.len(),
        }))
    }
}
