//! Project and task tools (§4.1, §3 Project/Task, §4.4 lifecycle).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::pipeline::MessageContext;

use super::{require_str, Tool, ToolResult};

pub struct ManageTasksTool<C> {
    ctx: Arc<C>,
}

impl<C> ManageTasksTool<C> {
    pub fn new(ctx: Arc<C>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl<C: MessageContext + 'static> Tool for ManageTasksTool<C> {
    fn name(&self) -> &str {
        "manage_tasks"
    }

    fn description(&self) -> &str {
        "Create or update a task (action=upsert) or list tasks filtered by project/status (action=list)."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "action": {"type": "string", "enum": ["upsert", "list"]},
                "name": {"type": "string"},
                "status": {"type": "string", "enum": ["todo", "in_progress", "done", "cancelled"]},
                "project": {"type": "string"},
                "sprint": {"type": "string"}
            },
            "required": ["action"]
        })
    }

    async fn execute(&self, input: serde_json::Value) -> ToolResult {
        let action = match require_str(&input, "action") {
            Ok(v) => v,
            Err(e) => return e,
        };
        match action {
            "upsert" => {
                let name = match require_str(&input, "name") {
                    Ok(v) => v,
                    Err(e) => return e,
                };
                let status = input.get("status").and_then(|v| v.as_str()).unwrap_or("todo");
                let project = input.get("project").and_then(|v| v.as_str());
                let sprint = input.get("sprint").and_then(|v| v.as_str());
                match self.ctx.knowledge().upsert_task(name, status, project, sprint).await {
                    Ok(entity_id) => ToolResult::json(json!({
                        "ok": true, "entity_kind": "task", "entity_id": entity_id,
                        "summary": format!("upserted task '{name}' [{status}]")
                    })),
                    Err(e) => ToolResult::error(format!("manage_tasks failed: {e}")),
                }
            }
            "list" => {
                let project = input.get("project").and_then(|v| v.as_str());
                let status = input.get("status").and_then(|v| v.as_str());
                match self.ctx.knowledge().query_tasks(project, status).await {
                    Ok(tasks) => ToolResult::json(json!({"tasks": tasks})),
                    Err(e) => ToolResult::error(format!("manage_tasks failed: {e}")),
                }
            }
            other => ToolResult::error(format!("unknown action: {other}")),
        }
    }
}

pub struct ManageProjectsTool<C> {
    ctx: Arc<C>,
}

impl<C> ManageProjectsTool<C> {
    pub fn new(ctx: Arc<C>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl<C: MessageContext + 'static> Tool for ManageProjectsTool<C> {
    fn name(&self) -> &str {
        "manage_projects"
    }

    fn description(&self) -> &str {
        "Create or update a project (action=upsert), list all projects (action=list), get one project's \
         details (action=get), or delete a project and everything under it (action=delete)."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "action": {"type": "string", "enum": ["upsert", "list", "get", "delete"]},
                "name": {"type": "string"},
                "status": {"type": "string"},
                "priority": {"type": "integer"},
                "description": {"type": "string"}
            },
            "required": ["action"]
        })
    }

    async fn execute(&self, input: serde_json::Value) -> ToolResult {
        let action = match require_str(&input, "action") {
            Ok(v) => v,
            Err(e) => return e,
        };
        match action {
            "upsert" => {
                let name = match require_str(&input, "name") {
                    Ok(v) => v,
                    Err(e) => return e,
                };
                let status = input.get("status").and_then(|v| v.as_str()).unwrap_or("active");
                let priority = input.get("priority").and_then(|v| v.as_i64()).unwrap_or(0) as i32;
                let description = input.get("description").and_then(|v| v.as_str());
                match self.ctx.knowledge().upsert_project(name, status, priority, description).await {
                    Ok(entity_id) => ToolResult::json(json!({
                        "ok": true, "entity_kind": "project", "entity_id": entity_id,
                        "summary": format!("upserted project '{name}'")
                    })),
                    Err(e) => ToolResult::error(format!("manage_projects failed: {e}")),
                }
            }
            "list" => match self.ctx.knowledge().query_projects_overview().await {
                Ok(projects) => ToolResult::json(json!({"projects": projects})),
                Err(e) => ToolResult::error(format!("manage_projects failed: {e}")),
            },
            "get" => {
                let name = match require_str(&input, "name") {
                    Ok(v) => v,
                    Err(e) => return e,
                };
                match self.ctx.knowledge().query_project_details(name).await {
                    Ok(Some(details)) => ToolResult::json(details),
                    Ok(None) => ToolResult::error(format!("project not found: {name}")),
                    Err(e) => ToolResult::error(format!("manage_projects failed: {e}")),
                }
            }
            "delete" => {
                let name = match require_str(&input, "name") {
                    Ok(v) => v,
                    Err(e) => return e,
                };
                match self.ctx.knowledge().delete_project(name).await {
                    Ok(()) => ToolResult::json(json!({
                        "ok": true, "entity_kind": "project", "entity_id": name,
                        "summary": format!("deleted project '{name}' and everything under it")
                    })),
                    Err(e) => ToolResult::error(format!("manage_projects failed: {e}")),
                }
            }
            other => ToolResult::error(format!("unknown action: {other}")),
        }
    }
}

pub struct MergeProjectsTool<C> {
    ctx: Arc<C>,
}

impl<C> MergeProjectsTool<C> {
    pub fn new(ctx: Arc<C>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl<C: MessageContext + 'static> Tool for MergeProjectsTool<C> {
    fn name(&self) -> &str {
        "merge_projects"
    }

    fn description(&self) -> &str {
        "Merge a duplicate project (source) into its canonical target: re-links sections, tasks, and lists then deletes source."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "source": {"type": "string"},
                "target": {"type": "string"}
            },
            "required": ["source", "target"]
        })
    }

    async fn execute(&self, input: serde_json::Value) -> ToolResult {
        let source = match require_str(&input, "source") {
            Ok(v) => v,
            Err(e) => return e,
        };
        let target = match require_str(&input, "target") {
            Ok(v) => v,
            Err(e) => return e,
        };
        match self.ctx.knowledge().merge_projects(source, target).await {
            Ok(()) => ToolResult::json(json!({
                "ok": true, "entity_kind": "project", "entity_id": target,
                "summary": format!("merged '{source}' into '{target}'")
            })),
            Err(e) => ToolResult::error(format!("merge_projects failed: {e}")),
        }
    }
}
