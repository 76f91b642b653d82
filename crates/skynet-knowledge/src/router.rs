use once_cell::sync::Lazy;
use regex::Regex;

/// Route labels the smart router can produce (§4.6). Falls back to an LLM
/// classify call when no pattern matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    DebtPayment,
    DebtSummary,
    FinancialReport,
    Financial,
    InventoryDuplicates,
    InventoryReport,
    InventoryMove,
    InventoryUsage,
    InventoryUnused,
    Inventory,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::DebtPayment => "debt_payment",
            Route::DebtSummary => "debt_summary",
            Route::FinancialReport => "financial_report",
            Route::Financial => "financial",
            Route::InventoryDuplicates => "inventory_duplicates",
            Route::InventoryReport => "inventory_report",
            Route::InventoryMove => "inventory_move",
            Route::InventoryUsage => "inventory_usage",
            Route::InventoryUnused => "inventory_unused",
            Route::Inventory => "inventory",
        }
    }
}

/// Patterns in specificity order — first match wins. Debt-payment before
/// debt-summary before financial-report before financial; inventory
/// duplicates before report before move before usage before unused before
/// generic inventory query (§4.6).
static PATTERNS: Lazy<Vec<(Route, Regex)>> = Lazy::new(|| {
    vec![
        (Route::DebtPayment, Regex::new(r"(?i)دفع(ت)?\s*دين|سدد(ت)?|pay(ed)?\s+(a\s+)?debt|repay").unwrap()),
        (Route::DebtSummary, Regex::new(r"(?i)ملخص\s*الديون|كم\s*علي|كم\s*لي|debt\s+summary|who\s+owes").unwrap()),
        (Route::FinancialReport, Regex::new(r"(?i)تقرير\s*مالي|financial\s+report|spending\s+report").unwrap()),
        (Route::Financial, Regex::new(r"(?i)مصروف|مصاريف|expense|spending|budget").unwrap()),
        (Route::InventoryDuplicates, Regex::new(r"(?i)نسخ\s*مكررة|duplicate\s+item|similar\s+item").unwrap()),
        (Route::InventoryReport, Regex::new(r"(?i)تقرير\s*المخزون|inventory\s+report").unwrap()),
        (Route::InventoryMove, Regex::new(r"(?i)نقل|انقل|move\s+.*\s+to|relocate").unwrap()),
        (Route::InventoryUsage, Regex::new(r"(?i)استخدمت|استعملت|used\s+the|last\s+used").unwrap()),
        (Route::InventoryUnused, Regex::new(r"(?i)لم\s*أستخدم|غير\s*مستخدم|unused\s+item|haven't\s+used").unwrap()),
        (Route::Inventory, Regex::new(r"(?i)مخزون|غرض|عنصر|inventory|item\b").unwrap()),
    ]
});

/// First-match-wins routing over a raw user message. `None` means fall back
/// to an LLM classify call.
pub fn route(message: &str) -> Option<Route> {
    PATTERNS.iter().find(|(_, re)| re.is_match(message)).map(|(route, _)| *route)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debt_payment_wins_over_debt_summary() {
        assert_eq!(route("سددت الدين اليوم"), Some(Route::DebtPayment));
    }

    #[test]
    fn debt_summary_before_financial_report() {
        assert_eq!(route("ملخص الديون من فضلك"), Some(Route::DebtSummary));
    }

    #[test]
    fn financial_report_before_generic_financial() {
        assert_eq!(route("أريد تقرير مالي لهذا الشهر"), Some(Route::FinancialReport));
    }

    #[test]
    fn inventory_duplicates_before_generic_inventory() {
        assert_eq!(route("هل يوجد نسخ مكررة في المخزون"), Some(Route::InventoryDuplicates));
    }

    #[test]
    fn no_match_falls_back_to_none() {
        assert_eq!(route("كيف حالك اليوم"), None);
    }
}
