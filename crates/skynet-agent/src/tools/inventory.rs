//! Inventory and list tools (§4.1, §3 Item/List/ListEntry).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::pipeline::MessageContext;

use super::{require_str, Tool, ToolResult};

pub struct ManageInventoryTool<C> {
    ctx: Arc<C>,
}

impl<C> ManageInventoryTool<C> {
    pub fn new(ctx: Arc<C>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl<C: MessageContext + 'static> Tool for ManageInventoryTool<C> {
    fn name(&self) -> &str {
        "manage_inventory"
    }

    fn description(&self) -> &str {
        "Add or update an inventory item (action=upsert), list items (action=list), or find unused items (action=unused)."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "action": {"type": "string", "enum": ["upsert", "list", "unused"]},
                "name": {"type": "string"},
                "quantity": {"type": "integer"},
                "location": {"type": "string"},
                "category": {"type": "string"},
                "brand": {"type": "string"},
                "older_than_days": {"type": "integer", "description": "for action=unused, defaults to 90"}
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
                let quantity = input.get("quantity").and_then(|v| v.as_i64()).unwrap_or(1) as i32;
                let category = input.get("category").and_then(|v| v.as_str()).unwrap_or("general");
                let location = input.get("location").and_then(|v| v.as_str());
                let brand = input.get("brand").and_then(|v| v.as_str());
                match self.ctx.knowledge().upsert_item(name, quantity, location, category, brand).await {
                    Ok(entity_id) => ToolResult::json(json!({
                        "ok": true,
                        "entity_kind": "item",
                        "entity_id": entity_id,
                        "summary": format!("upserted item '{name}' (qty {quantity})")
                    })),
                    Err(e) => ToolResult::error(format!("manage_inventory failed: {e}")),
                }
            }
            "list" => {
                let category = input.get("category").and_then(|v| v.as_str());
                match self.ctx.knowledge().query_inventory(category).await {
                    Ok(items) => ToolResult::json(json!({"items": items})),
                    Err(e) => ToolResult::error(format!("manage_inventory failed: {e}")),
                }
            }
            "unused" => {
                let days = input.get("older_than_days").and_then(|v| v.as_i64()).unwrap_or(90);
                match self.ctx.knowledge().query_inventory_unused(days).await {
                    Ok(items) => ToolResult::json(json!({"items": items})),
                    Err(e) => ToolResult::error(format!("manage_inventory failed: {e}")),
                }
            }
            other => ToolResult::error(format!("unknown action: {other}")),
        }
    }
}

pub struct ManageListsTool<C> {
    ctx: Arc<C>,
}

impl<C> ManageListsTool<C> {
    pub fn new(ctx: Arc<C>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl<C: MessageContext + 'static> Tool for ManageListsTool<C> {
    fn name(&self) -> &str {
        "manage_lists"
    }

    fn description(&self) -> &str {
        "Create a list (action=create_list), add an entry (action=add_entry), toggle an entry's checked state \
         (action=check_entry), remove an entry (action=remove_entry), or list a list's entries (action=entries)."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "action": {"type": "string", "enum": ["create_list", "add_entry", "check_entry", "remove_entry", "entries", "list_lists"]},
                "name": {"type": "string", "description": "list name, for create_list/add_entry/entries"},
                "list_type": {"type": "string", "enum": ["shopping", "ideas", "checklist", "reference"]},
                "project": {"type": "string"},
                "text": {"type": "string", "description": "entry text, for add_entry"},
                "entry_id": {"type": "string", "description": "for check_entry/remove_entry"},
                "checked": {"type": "boolean", "description": "for check_entry"},
                "order": {"type": "integer"}
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
            "create_list" => {
                let name = match require_str(&input, "name") {
                    Ok(v) => v,
                    Err(e) => return e,
                };
                let list_type = input.get("list_type").and_then(|v| v.as_str()).unwrap_or("reference");
                let project = input.get("project").and_then(|v| v.as_str());
                match self.ctx.knowledge().upsert_list(name, list_type, project).await {
                    Ok(entity_id) => ToolResult::json(json!({
                        "ok": true, "entity_kind": "list", "entity_id": entity_id,
                        "summary": format!("created list '{name}'")
                    })),
                    Err(e) => ToolResult::error(format!("manage_lists failed: {e}")),
                }
            }
            "add_entry" => {
                let list = match require_str(&input, "name") {
                    Ok(v) => v,
                    Err(e) => return e,
                };
                let text = match require_str(&input, "text") {
                    Ok(v) => v,
                    Err(e) => return e,
                };
                let order = input.get("order").and_then(|v| v.as_i64()).unwrap_or(0) as i32;
                let id = uuid::Uuid::new_v4().to_string();
                match self.ctx.knowledge().upsert_list_entry(&id, list, text, order).await {
                    Ok(entity_id) => ToolResult::json(json!({
                        "ok": true, "entity_kind": "list_entry", "entity_id": entity_id,
                        "summary": format!("added entry to list '{list}'")
                    })),
                    Err(e) => ToolResult::error(format!("manage_lists failed: {e}")),
                }
            }
            "check_entry" => {
                let entry_id = match require_str(&input, "entry_id") {
                    Ok(v) => v,
                    Err(e) => return e,
                };
                let checked = input.get("checked").and_then(|v| v.as_bool()).unwrap_or(true);
                match self.ctx.knowledge().set_list_entry_checked(entry_id, checked).await {
                    Ok(()) => ToolResult::json(json!({
                        "ok": true, "entity_kind": "list_entry", "entity_id": entry_id,
                        "summary": format!("set entry {entry_id} checked={checked}")
                    })),
                    Err(e) => ToolResult::error(format!("manage_lists failed: {e}")),
                }
            }
            "remove_entry" => {
                let entry_id = match require_str(&input, "entry_id") {
                    Ok(v) => v,
                    Err(e) => return e,
                };
                match self.ctx.knowledge().delete_list_entry(entry_id).await {
                    Ok(()) => ToolResult::json(json!({
                        "ok": true, "entity_kind": "list_entry", "entity_id": entry_id,
                        "summary": format!("removed entry {entry_id}")
                    })),
                    Err(e) => ToolResult::error(format!("manage_lists failed: {e}")),
                }
            }
            "entries" => {
                let list = match require_str(&input, "name") {
                    Ok(v) => v,
                    Err(e) => return e,
                };
                match self.ctx.knowledge().query_list_entries(list).await {
                    Ok(entries) => ToolResult::json(json!({"entries": entries})),
                    Err(e) => ToolResult::error(format!("manage_lists failed: {e}")),
                }
            }
            "list_lists" => {
                let list_type = input.get("list_type").and_then(|v| v.as_str());
                match self.ctx.knowledge().query_lists(list_type).await {
                    Ok(lists) => ToolResult::json(json!({"lists": lists})),
                    Err(e) => ToolResult::error(format!("manage_lists failed: {e}")),
                }
            }
            other => ToolResult::error(format!("unknown action: {other}")),
        }
    }
}
