pub mod expenses;
pub mod stats;
mod registry;

pub use expenses::{ExpenseByIdTool, LatestExpensesTool, LatestSubscriptionExpensesTool};
pub use registry::{
    api_result, json_schema_date, json_schema_integer, json_schema_object, json_schema_string,
    parse_arguments, Tool, ToolError, ToolRegistry,
};
pub use stats::{SummaryKind, SummaryTool};

use expenselm_sdk::ExpenseLmClient;
use std::sync::Arc;

/// Registry holding every ExpenseLM tool, all sharing one client
pub fn expenselm_registry(client: ExpenseLmClient) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(Arc::new(LatestExpensesTool::new(client.clone())));
    registry.register(Arc::new(ExpenseByIdTool::new(client.clone())));
    registry.register(Arc::new(LatestSubscriptionExpensesTool::new(client.clone())));

    for kind in SummaryKind::ALL {
        registry.register(Arc::new(SummaryTool::new(client.clone(), kind)));
    }

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_registry_has_all_tools() {
        let client = ExpenseLmClient::builder().api_key("sk-test").build().unwrap();
        let registry = expenselm_registry(client);

        let names: Vec<String> = registry.list_schemas().into_iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "get_expense_by_id",
                "get_expense_summary_by_category_by_currency",
                "get_expense_summary_by_month_by_currency",
                "get_expense_summary_by_subscription_by_currency",
                "get_latest_expenses",
                "get_latest_subscription_expenses",
            ]
        );
    }
}
