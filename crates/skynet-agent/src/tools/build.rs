//! Tool registry — builds the canonical tool list for any channel adapter.

use std::sync::Arc;

use crate::pipeline::context::MessageContext;
use crate::provider::ToolDefinition;

use super::finance::{AddExpenseTool, GetDebtSummaryTool, GetExpenseReportTool, PayDebtTool, RecordDebtTool};
use super::inventory::{ManageInventoryTool, ManageListsTool};
use super::knowledge::{GetPersonInfoTool, SearchKnowledgeTool, StoreNoteTool};
use super::planning::{GetDailyPlanTool, GetProductivityStatsTool};
use super::projects::{ManageProjectsTool, ManageTasksTool, MergeProjectsTool};
use super::reminders::{CreateReminderTool, DeleteReminderTool, SearchRemindersTool, UpdateReminderTool};
use super::{to_definitions, Tool};

/// Build the full catalog of domain tools available to the AI for a given
/// chat turn. The returned order has no bearing on execution — `tool_loop`
/// re-sorts results into `tool_catalog()`'s order before replying to the
/// model — so tools are listed here simply in that same catalog order.
pub fn build_tools<C: MessageContext + 'static>(ctx: Arc<C>) -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(SearchKnowledgeTool::new(Arc::clone(&ctx))),
        Box::new(SearchRemindersTool::new(Arc::clone(&ctx))),
        Box::new(CreateReminderTool::new(Arc::clone(&ctx))),
        Box::new(UpdateReminderTool::new(Arc::clone(&ctx))),
        Box::new(DeleteReminderTool::new(Arc::clone(&ctx))),
        Box::new(AddExpenseTool::new(Arc::clone(&ctx))),
        Box::new(GetExpenseReportTool::new(Arc::clone(&ctx))),
        Box::new(GetDebtSummaryTool::new(Arc::clone(&ctx))),
        Box::new(RecordDebtTool::new(Arc::clone(&ctx))),
        Box::new(PayDebtTool::new(Arc::clone(&ctx))),
        Box::new(GetDailyPlanTool::new(Arc::clone(&ctx))),
        Box::new(StoreNoteTool::new(Arc::clone(&ctx))),
        Box::new(GetPersonInfoTool::new(Arc::clone(&ctx))),
        Box::new(ManageInventoryTool::new(Arc::clone(&ctx))),
        Box::new(ManageTasksTool::new(Arc::clone(&ctx))),
        Box::new(ManageProjectsTool::new(Arc::clone(&ctx))),
        Box::new(MergeProjectsTool::new(Arc::clone(&ctx))),
        Box::new(ManageListsTool::new(Arc::clone(&ctx))),
        Box::new(GetProductivityStatsTool::new(Arc::clone(&ctx))),
    ]
}

/// Convert a tool list to API-level definitions for the LLM request.
pub fn tool_definitions(tools: &[Box<dyn Tool>]) -> Vec<ToolDefinition> {
    to_definitions(tools)
}
