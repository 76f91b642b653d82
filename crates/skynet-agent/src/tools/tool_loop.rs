//! Tool execution loop — the core agentic behavior (§4.1, §5).
//!
//! Flow: prompt → LLM → if tool_use → execute tools (in parallel) → inject
//! results → LLM → repeat. Stops when: stop_reason is not "tool_use", the
//! iteration cap is hit, or an error surfaces.

use futures_util::future::join_all;
use tracing::{debug, info, warn};

use crate::provider::{ChatRequest, ChatResponse, LlmProvider, ToolCall};

use super::{tool_catalog, Tool, ToolResult};

/// Cap on LLM↔tool round-trips for a single chat turn (§4.1 step 3). The
/// 3rd iteration never tool-calls again — the catalog is withheld so the
/// model is forced into a text reply.
const MAX_ITERATIONS: usize = 3;

/// Run the full tool execution loop (non-streaming).
///
/// Starts from `initial_request`, which must have `messages` or `raw_messages` set.
/// Returns the final `ChatResponse` (the one with `stop_reason != "tool_use"`).
pub async fn run_tool_loop(
    provider: &dyn LlmProvider,
    initial_request: ChatRequest,
    tools: &[Box<dyn Tool>],
) -> Result<ChatResponse, crate::provider::ProviderError> {
    // Build initial raw JSON message list from the structured messages.
    let mut raw_messages: Vec<serde_json::Value> =
        if let Some(ref raw) = initial_request.raw_messages {
            raw.clone()
        } else {
            initial_request
                .messages
                .iter()
                .map(|m| serde_json::json!({ "role": m.role, "content": m.content }))
                .collect()
        };

    let mut last_response: Option<ChatResponse> = None;

    for iteration in 0..MAX_ITERATIONS {
        let final_iteration = iteration + 1 == MAX_ITERATIONS;

        // Build the request for this iteration, injecting the full message history.
        let mut req = initial_request.clone();
        req.raw_messages = Some(raw_messages.clone());
        if final_iteration {
            // Withhold the catalog so the model has nothing left to call and
            // must answer in text (§4.1 step 3: "force a text reply").
            req.tools.clear();
        }

        debug!(iteration, final_iteration, "tool loop iteration");

        let response = provider.send(&req).await?;

        if response.tool_calls.is_empty() || response.stop_reason != "tool_use" {
            info!(iteration, "tool loop complete — no more tool calls");
            return Ok(response);
        }

        if final_iteration {
            // The model tool-called anyway despite an empty catalog (or a
            // provider that ignores `tools: []`). Treat whatever text it
            // produced as the final answer rather than looping again.
            warn!("model attempted a tool call on the forced final iteration");
            return Ok(response);
        }

        // Build the assistant turn content block list.
        // It includes any text content plus the tool_use blocks.
        let mut assistant_content: Vec<serde_json::Value> = Vec::new();

        if !response.content.is_empty() {
            assistant_content.push(serde_json::json!({
                "type": "text",
                "text": response.content,
            }));
        }

        for call in &response.tool_calls {
            assistant_content.push(serde_json::json!({
                "type": "tool_use",
                "id": call.id,
                "name": call.name,
                "input": call.input,
            }));
        }

        // Append the assistant message.
        raw_messages.push(serde_json::json!({
            "role": "assistant",
            "content": assistant_content,
        }));

        // Execute every tool call from this iteration concurrently (§5), then
        // merge the results back in stable catalog order so the follow-up
        // prompt is deterministic regardless of which call finished first.
        let executions = join_all(response.tool_calls.iter().map(|call| execute_tool(tools, call))).await;
        let results: Vec<(&ToolCall, ToolResult)> = response.tool_calls.iter().zip(executions).collect();

        let tool_result_content: Vec<serde_json::Value> = catalog_order(&results)
            .into_iter()
            .map(|(call, result)| {
                serde_json::json!({
                    "type": "tool_result",
                    "tool_use_id": call.id,
                    "content": result.content,
                    "is_error": result.is_error,
                })
            })
            .collect();

        // Append the user message containing all tool results.
        raw_messages.push(serde_json::json!({
            "role": "user",
            "content": tool_result_content,
        }));

        last_response = Some(response);
    }

    warn!(
        max_iterations = MAX_ITERATIONS,
        "tool loop hit maximum iterations"
    );

    // If we have a last response use that, otherwise return an error.
    if let Some(resp) = last_response {
        Ok(resp)
    } else {
        Err(crate::provider::ProviderError::Parse(format!(
            "tool loop exceeded {MAX_ITERATIONS} iterations without a final response"
        )))
    }
}

/// Reorders a batch of (call, result) pairs by the tool's position in the
/// stable catalog (§5). Names absent from the catalog — shouldn't happen,
/// since `execute_tool` already rejected unknown names — sort last.
fn catalog_order<'a>(results: &[(&'a ToolCall, ToolResult)]) -> Vec<(&'a ToolCall, ToolResult)> {
    let catalog = tool_catalog();
    let index_of = |name: &str| catalog.iter().position(|(n, _)| *n == name).unwrap_or(usize::MAX);

    let mut ordered: Vec<(&ToolCall, ToolResult)> = results.iter().map(|(c, r)| (*c, r.clone())).collect();
    ordered.sort_by_key(|(call, _)| index_of(&call.name));
    ordered
}

/// Find and execute the named tool. Returns an error ToolResult if not found.
async fn execute_tool(tools: &[Box<dyn Tool>], call: &ToolCall) -> ToolResult {
    match tools.iter().find(|t| t.name() == call.name) {
        Some(tool) => {
            debug!(tool = %call.name, "executing tool");
            tool.execute(call.input.clone()).await
        }
        None => ToolResult::error(format!("unknown tool: {}", call.name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(id: &str, name: &str) -> ToolCall {
        ToolCall {
            id: id.to_string(),
            name: name.to_string(),
            input: serde_json::json!({}),
        }
    }

    #[test]
    fn results_are_reordered_to_catalog_order_regardless_of_completion_order() {
        let add_expense = call("1", "add_expense");
        let create_reminder = call("2", "create_reminder");
        // add_expense finished after create_reminder, but the catalog lists
        // add_expense first.
        let results = vec![
            (&create_reminder, ToolResult::success("reminder set")),
            (&add_expense, ToolResult::success("expense logged")),
        ];
        let ordered = catalog_order(&results);
        assert_eq!(ordered[0].0.name, "add_expense");
        assert_eq!(ordered[1].0.name, "create_reminder");
    }
}
