//! Finance tools (§4.1, §3 Expense/Debt/DebtPayment) — expenses and debts,
//! backed by `KnowledgeService`'s `Expense`/`Debt`/`DebtPayment` nodes.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::pipeline::MessageContext;

use super::{require_str, Tool, ToolResult};

pub struct AddExpenseTool<C> {
    ctx: Arc<C>,
}

impl<C> AddExpenseTool<C> {
    pub fn new(ctx: Arc<C>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl<C: MessageContext + 'static> Tool for AddExpenseTool<C> {
    fn name(&self) -> &str {
        "add_expense"
    }

    fn description(&self) -> &str {
        "Record a new expense with an amount, currency, and category."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "amount": {"type": "number"},
                "currency": {"type": "string"},
                "category": {"type": "string"},
                "vendor": {"type": "string"}
            },
            "required": ["amount", "currency", "category"]
        })
    }

    async fn execute(&self, input: serde_json::Value) -> ToolResult {
        let Some(amount) = input.get("amount").and_then(|v| v.as_f64()) else {
            return ToolResult::error("missing required field: amount");
        };
        let currency = match require_str(&input, "currency") {
            Ok(v) => v,
            Err(e) => return e,
        };
        let category = match require_str(&input, "category") {
            Ok(v) => v,
            Err(e) => return e,
        };
        let vendor = input.get("vendor").and_then(|v| v.as_str());

        let id = uuid::Uuid::new_v4().to_string();
        match self.ctx.knowledge().upsert_expense(&id, amount, currency, category, vendor).await {
            Ok(entity_id) => ToolResult::json(json!({
                "ok": true,
                "entity_kind": "expense",
                "entity_id": entity_id,
                "summary": format!("recorded expense of {amount} {currency} in {category}")
            })),
            Err(e) => ToolResult::error(format!("add_expense failed: {e}")),
        }
    }
}

pub struct GetExpenseReportTool<C> {
    ctx: Arc<C>,
}

impl<C> GetExpenseReportTool<C> {
    pub fn new(ctx: Arc<C>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl<C: MessageContext + 'static> Tool for GetExpenseReportTool<C> {
    fn name(&self) -> &str {
        "get_expense_report"
    }

    fn description(&self) -> &str {
        "Summarise expenses by category since a given date (defaults to 30 days ago)."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "since": {"type": "string", "description": "RFC3339 timestamp; defaults to 30 days ago"}
            }
        })
    }

    async fn execute(&self, input: serde_json::Value) -> ToolResult {
        let since = match input.get("since").and_then(|v| v.as_str()) {
            Some(raw) => match chrono::DateTime::parse_from_rfc3339(raw) {
                Ok(d) => d.with_timezone(&chrono::Utc),
                Err(e) => return ToolResult::error(format!("invalid since: {e}")),
            },
            None => chrono::Utc::now() - chrono::Duration::days(30),
        };
        match self.ctx.knowledge().query_financial_report(since).await {
            Ok(report) => ToolResult::json(report),
            Err(e) => ToolResult::error(format!("get_expense_report failed: {e}")),
        }
    }
}

pub struct GetDebtSummaryTool<C> {
    ctx: Arc<C>,
}

impl<C> GetDebtSummaryTool<C> {
    pub fn new(ctx: Arc<C>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl<C: MessageContext + 'static> Tool for GetDebtSummaryTool<C> {
    fn name(&self) -> &str {
        "get_debt_summary"
    }

    fn description(&self) -> &str {
        "Summarise open debts, grouped by whether the user owes or is owed."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "status": {"type": "string", "enum": ["open", "partial", "paid"]}
            }
        })
    }

    async fn execute(&self, input: serde_json::Value) -> ToolResult {
        let status = input.get("status").and_then(|v| v.as_str());
        match self.ctx.knowledge().query_debts(status).await {
            Ok(rows) => {
                let (mut i_owe, mut owed_to_me) = (0.0_f64, 0.0_f64);
                for row in &rows {
                    let amount = row.get("amount").and_then(|v| v.as_f64()).unwrap_or(0.0);
                    match row.get("direction").and_then(|v| v.as_str()) {
                        Some("owed_to_me") => owed_to_me += amount,
                        _ => i_owe += amount,
                    }
                }
                ToolResult::json(json!({
                    "debts": rows,
                    "total_i_owe": i_owe,
                    "total_owed_to_me": owed_to_me
                }))
            }
            Err(e) => ToolResult::error(format!("get_debt_summary failed: {e}")),
        }
    }
}

pub struct RecordDebtTool<C> {
    ctx: Arc<C>,
}

impl<C> RecordDebtTool<C> {
    pub fn new(ctx: Arc<C>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl<C: MessageContext + 'static> Tool for RecordDebtTool<C> {
    fn name(&self) -> &str {
        "record_debt"
    }

    fn description(&self) -> &str {
        "Record a new debt, either owed by the user or owed to the user."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "person": {"type": "string"},
                "amount": {"type": "number"},
                "currency": {"type": "string"},
                "direction": {"type": "string", "description": "free-form, e.g. 'i_owe' or 'owed_to_me'"},
                "reason": {"type": "string"}
            },
            "required": ["person", "amount", "currency", "direction"]
        })
    }

    async fn execute(&self, input: serde_json::Value) -> ToolResult {
        let person = match require_str(&input, "person") {
            Ok(v) => v,
            Err(e) => return e,
        };
        let Some(amount) = input.get("amount").and_then(|v| v.as_f64()) else {
            return ToolResult::error("missing required field: amount");
        };
        let currency = match require_str(&input, "currency") {
            Ok(v) => v,
            Err(e) => return e,
        };
        let direction = match require_str(&input, "direction") {
            Ok(v) => v,
            Err(e) => return e,
        };
        let reason = input.get("reason").and_then(|v| v.as_str());

        let id = uuid::Uuid::new_v4().to_string();
        match self.ctx.knowledge().upsert_debt(&id, person, amount, currency, direction, reason).await {
            Ok(entity_id) => ToolResult::json(json!({
                "ok": true,
                "entity_kind": "debt",
                "entity_id": entity_id,
                "summary": format!("recorded debt of {amount} {currency} with {person}")
            })),
            Err(e) => ToolResult::error(format!("record_debt failed: {e}")),
        }
    }
}

pub struct PayDebtTool<C> {
    ctx: Arc<C>,
}

impl<C> PayDebtTool<C> {
    pub fn new(ctx: Arc<C>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl<C: MessageContext + 'static> Tool for PayDebtTool<C> {
    fn name(&self) -> &str {
        "pay_debt"
    }

    fn description(&self) -> &str {
        "Record a payment against an existing debt, reducing its remaining amount."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "debt_id": {"type": "string"},
                "amount": {"type": "number"}
            },
            "required": ["debt_id", "amount"]
        })
    }

    async fn execute(&self, input: serde_json::Value) -> ToolResult {
        let debt_id = match require_str(&input, "debt_id") {
            Ok(v) => v,
            Err(e) => return e,
        };
        let Some(amount) = input.get("amount").and_then(|v| v.as_f64()) else {
            return ToolResult::error("missing required field: amount");
        };
        let payment_id = uuid::Uuid::new_v4().to_string();
        match self.ctx.knowledge().record_debt_payment(&payment_id, debt_id, amount).await {
            Ok(()) => ToolResult::json(json!({
                "ok": true,
                "entity_kind": "debt_payment",
                "entity_id": payment_id,
                "summary": format!("recorded payment of {amount} against debt {debt_id}")
            })),
            Err(e) => ToolResult::error(format!("pay_debt failed: {e}")),
        }
    }
}
