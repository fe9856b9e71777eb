// Tools for spending summaries over a reporting period

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{api_result, json_schema_date, json_schema_object, parse_arguments, Tool, ToolError};
use expenselm_core::{parse_date, DateRange};
use expenselm_sdk::ExpenseLmClient;
use serde::Deserialize;

/// How a summary groups its totals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    Month,
    Category,
    Subscription,
}

impl SummaryKind {
    pub const ALL: [SummaryKind; 3] = [Self::Month, Self::Category, Self::Subscription];

    pub fn tool_name(self) -> &'static str {
        match self {
            Self::Month => "get_expense_summary_by_month_by_currency",
            Self::Category => "get_expense_summary_by_category_by_currency",
            Self::Subscription => "get_expense_summary_by_subscription_by_currency",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::Month => {
                "Get expense summary by month and currency for the provided period. \
                 Months are formatted as YYYY-MM."
            }
            Self::Category => {
                "Get expense summary by category and currency for the provided period."
            }
            Self::Subscription => {
                "Get expense summary by subscription and currency for the provided period."
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct SummaryArgs {
    from_date: String,
    to_date: String,
}

/// Tool returning spending totals for one [`SummaryKind`]
pub struct SummaryTool {
    client: ExpenseLmClient,
    kind: SummaryKind,
}

impl SummaryTool {
    pub fn new(client: ExpenseLmClient, kind: SummaryKind) -> Self {
        Self { client, kind }
    }

    fn date_range(&self, arguments: serde_json::Value) -> Result<DateRange, ToolError> {
        let name = self.kind.tool_name();
        let args: SummaryArgs = parse_arguments(name, arguments)?;

        let from = parse_date("from_date", &args.from_date)
            .map_err(|e| ToolError::invalid_arguments(name, e))?;
        let to = parse_date("to_date", &args.to_date)
            .map_err(|e| ToolError::invalid_arguments(name, e))?;

        DateRange::new(from, to).map_err(|e| ToolError::invalid_arguments(name, e))
    }
}

#[async_trait::async_trait]
impl Tool for SummaryTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.kind.tool_name().to_string(),
            description: self.kind.description().to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "from_date": json_schema_date("The start date of the period. Format is YYYY-MM-DD"),
                    "to_date": json_schema_date("The end date of the period. Format is YYYY-MM-DD")
                }),
                vec!["from_date", "to_date"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let range = self.date_range(arguments)?;
        let name = self.kind.tool_name();
        let stats = self.client.stats();

        match self.kind {
            SummaryKind::Month => api_result(name, stats.summary_by_month(&range).await),
            SummaryKind::Category => api_result(name, stats.summary_by_category(&range).await),
            SummaryKind::Subscription => {
                api_result(name, stats.summary_by_subscription(&range).await)
            }
        }
    }
}
