//! Tool system for AI agent tool calling (§4.1).
//!
//! Defines the `Tool` trait every tool implements, the stable 19-entry
//! catalog the Tool-Calling Orchestrator exposes to the LLM, and the
//! registry that converts tools to LLM-level `ToolDefinition`s.

pub mod build;
pub mod finance;
pub mod knowledge;
pub mod inventory;
pub mod planning;
pub mod projects;
pub mod reminders;
pub mod tool_loop;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::provider::ToolDefinition;

/// Result of executing a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Text content returned to the LLM.
    pub content: String,
    /// Whether the tool execution failed.
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: message.into(),
            is_error: true,
        }
    }

    /// Serialises a JSON value as the tool's success content.
    pub fn json(value: serde_json::Value) -> Self {
        Self::success(value.to_string())
    }
}

/// Trait that all tools must implement.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name for this tool (e.g. "search_knowledge").
    fn name(&self) -> &str;
    /// Human-readable description of what this tool does.
    fn description(&self) -> &str;
    /// JSON Schema for the tool's input parameters.
    fn input_schema(&self) -> serde_json::Value;
    /// Execute the tool with the given input.
    async fn execute(&self, input: serde_json::Value) -> ToolResult;
}

/// Stable catalog of all 19 built-in tools (name, description). Order is
/// the ordering used to make tool-result merge order deterministic (§5).
pub fn tool_catalog() -> Vec<(&'static str, &'static str)> {
    vec![
        ("search_knowledge", "Semantic + graph search over stored knowledge and notes"),
        ("search_reminders", "List reminders, optionally filtered by status or text"),
        ("create_reminder", "Create a new one-time, recurring, or persistent reminder"),
        ("update_reminder", "Update a reminder's title, due date, status, priority, or description"),
        ("delete_reminder", "Delete a reminder"),
        ("add_expense", "Record a new expense"),
        ("get_expense_report", "Summarise expenses by category since a given date"),
        ("get_debt_summary", "Summarise open debts, grouped by direction"),
        ("record_debt", "Record a new debt owed to or by the user"),
        ("pay_debt", "Record a payment against an existing debt"),
        ("get_daily_plan", "List reminders due on a given date"),
        ("store_note", "Store a free-form note in knowledge and vector memory"),
        ("get_person_info", "Retrieve everything known about a person"),
        ("manage_inventory", "Add, update, or list inventory items"),
        ("manage_tasks", "Create, update, or list tasks"),
        ("manage_projects", "Create, update, list, or delete projects"),
        ("merge_projects", "Merge a duplicate project into its canonical target"),
        ("manage_lists", "Create lists and add, check, or remove list entries"),
        ("get_productivity_stats", "Summarise focus-session and task-completion stats"),
    ]
}

/// Convert a slice of tools to API-level tool definitions.
pub fn to_definitions(tools: &[Box<dyn Tool>]) -> Vec<ToolDefinition> {
    tools
        .iter()
        .map(|t| ToolDefinition {
            name: t.name().to_string(),
            description: t.description().to_string(),
            input_schema: t.input_schema(),
        })
        .collect()
}

/// Pulls a required string field out of a tool's JSON input, returning a
/// `ToolResult::error` `Err` when missing — the common failure path every
/// tool's `execute` needs.
pub(crate) fn require_str<'a>(input: &'a serde_json::Value, field: &str) -> Result<&'a str, ToolResult> {
    input
        .get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ToolResult::error(format!("missing required field: {field}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_nineteen_unique_tools() {
        let catalog = tool_catalog();
        assert_eq!(catalog.len(), 19);
        let names: HashSet<&str> = catalog.iter().map(|(name, _)| *name).collect();
        assert_eq!(names.len(), catalog.len(), "tool names must be unique");
    }

    #[test]
    fn require_str_reports_the_missing_field() {
        let input = serde_json::json!({"other": "value"});
        let err = require_str(&input, "title").unwrap_err();
        assert!(err.is_error);
        assert!(err.content.contains("title"));
    }

    #[test]
    fn require_str_extracts_present_field() {
        let input = serde_json::json!({"title": "buy milk"});
        assert_eq!(require_str(&input, "title").unwrap(), "buy milk");
    }

    #[test]
    fn tool_result_json_serializes_value_as_content() {
        let result = ToolResult::json(serde_json::json!({"ok": true, "entity_id": "abc"}));
        assert!(!result.is_error);
        let parsed: serde_json::Value = serde_json::from_str(&result.content).unwrap();
        assert_eq!(parsed["entity_id"], "abc");
    }
}
