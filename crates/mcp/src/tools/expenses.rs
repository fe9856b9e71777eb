// Tools for listing and fetching expense records

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    api_result, json_schema_date, json_schema_integer, json_schema_object, json_schema_string,
    parse_arguments, Tool, ToolError,
};
use expenselm_core::{parse_optional_date, ExpenseQuery, QueryError, DEFAULT_LIMIT, MAX_LIMIT};
use expenselm_sdk::ExpenseLmClient;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Debug, Default, Deserialize)]
struct ListArgs {
    #[serde(default, deserialize_with = "lenient_count")]
    skip: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    limit: Option<u32>,
    #[serde(default)]
    from_date: Option<String>,
    #[serde(default)]
    to_date: Option<String>,
    #[serde(default)]
    text_input: Option<String>,
}

/// Model clients often send counts as `"10"` or `10.0`; accept any whole,
/// non-negative number in those forms.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Integer(u32),
        Float(f64),
        Text(String),
    }

    let value = match Option::<Count>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(Count::Integer(n)) => return Ok(Some(n)),
        Some(Count::Float(f)) => f,
        Some(Count::Text(text)) => {
            let text = text.trim();
            if let Ok(n) = text.parse::<u32>() {
                return Ok(Some(n));
            }
            text.parse::<f64>()
                .map_err(|_| D::Error::custom(format!("expected a whole number, got {text:?}")))?
        }
    };

    if value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&value) {
        Ok(Some(value as u32))
    } else {
        Err(D::Error::custom(format!("expected a whole number, got {value}")))
    }
}

impl ListArgs {
    fn into_query(self) -> Result<ExpenseQuery, QueryError> {
        let query = ExpenseQuery {
            skip: self.skip.unwrap_or(0),
            limit: self.limit.unwrap_or(DEFAULT_LIMIT),
            from_date: parse_optional_date("from_date", self.from_date.as_deref())?,
            to_date: parse_optional_date("to_date", self.to_date.as_deref())?,
            text_input: self
                .text_input
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        };
        query.validate()?;
        Ok(query)
    }
}

fn list_input_schema() -> serde_json::Value {
    json_schema_object(
        serde_json::json!({
            "skip": json_schema_integer("The number of records to skip", 0, None, 0),
            "limit": json_schema_integer(
                "The maximum number of records to return",
                1,
                Some(MAX_LIMIT),
                DEFAULT_LIMIT,
            ),
            "from_date": json_schema_date("The start date for filtering. Format is YYYY-MM-DD"),
            "to_date": json_schema_date("The end date for filtering. Format is YYYY-MM-DD"),
            "text_input": json_schema_string("Text for semantic search, at least 2 characters")
        }),
        vec![],
    )
}

fn list_query(tool: &'static str, arguments: serde_json::Value) -> Result<ExpenseQuery, ToolError> {
    parse_arguments::<ListArgs>(tool, arguments)?
        .into_query()
        .map_err(|e| ToolError::invalid_arguments(tool, e))
}

/// Tool to list the latest expense records
pub struct LatestExpensesTool {
    client: ExpenseLmClient,
}

impl LatestExpensesTool {
    pub const NAME: &'static str = "get_latest_expenses";

    pub fn new(client: ExpenseLmClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for LatestExpensesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: Self::NAME.to_string(),
            description: "Get the latest expense records, optionally filtered by date range \
                          and semantic text search."
                .to_string(),
            input_schema: list_input_schema(),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let query = list_query(Self::NAME, arguments)?;
        api_result(Self::NAME, self.client.expenses().latest(&query).await)
    }
}

/// Tool to list the latest subscription expense records
pub struct LatestSubscriptionExpensesTool {
    client: ExpenseLmClient,
}

impl LatestSubscriptionExpensesTool {
    pub const NAME: &'static str = "get_latest_subscription_expenses";

    pub fn new(client: ExpenseLmClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for LatestSubscriptionExpensesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: Self::NAME.to_string(),
            description: "Get the latest expense records related to regular subscriptions."
                .to_string(),
            input_schema: list_input_schema(),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let query = list_query(Self::NAME, arguments)?;
        api_result(Self::NAME, self.client.subscriptions().latest(&query).await)
    }
}

/// Tool to get a single expense record by id
pub struct ExpenseByIdTool {
    client: ExpenseLmClient,
}

impl ExpenseByIdTool {
    pub const NAME: &'static str = "get_expense_by_id";

    pub fn new(client: ExpenseLmClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct ExpenseByIdArgs {
    id: String,
}

#[async_trait::async_trait]
impl Tool for ExpenseByIdTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: Self::NAME.to_string(),
            description: "Get an expense record, with its image and extracted data, by id."
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "id": json_schema_string("The id of the expense")
                }),
                vec!["id"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: ExpenseByIdArgs = parse_arguments(Self::NAME, arguments)?;
        if args.id.trim().is_empty() {
            return Err(ToolError::invalid_arguments(Self::NAME, "id must not be empty"));
        }

        api_result(Self::NAME, self.client.expenses().get(&args.id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ExpenseLmClient {
        ExpenseLmClient::builder()
            .base_url(server.uri())
            .api_key("sk-test")
            .build()
            .unwrap()
    }

    #[test]
    fn test_list_args_defaults() {
        let query = ListArgs::default().into_query().unwrap();
        assert_eq!(query, ExpenseQuery::default());
    }

    #[test]
    fn test_list_args_blank_filters_ignored() {
        let args = ListArgs {
            from_date: Some(String::new()),
            text_input: Some("  ".to_string()),
            ..Default::default()
        };
        let query = args.into_query().unwrap();
        assert!(query.from_date.is_none());
        assert!(query.text_input.is_none());
    }

    #[test]
    fn test_list_args_rejects_bad_values() {
        let args = ListArgs {
            limit: Some(101),
            ..Default::default()
        };
        assert!(matches!(args.into_query(), Err(QueryError::LimitOutOfRange(101))));

        let args = ListArgs {
            to_date: Some("March 3rd".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            args.into_query(),
            Err(QueryError::InvalidDate { field: "to_date", .. })
        ));
    }

    #[test]
    fn test_list_args_accept_numeric_strings_and_whole_floats() {
        let args: ListArgs =
            serde_json::from_value(serde_json::json!({"skip": "5", "limit": 20.0})).unwrap();
        assert_eq!(args.skip, Some(5));
        assert_eq!(args.limit, Some(20));

        let args: ListArgs =
            serde_json::from_value(serde_json::json!({"skip": null, "limit": " 7 "})).unwrap();
        assert_eq!(args.skip, None);
        assert_eq!(args.limit, Some(7));

        for bad in [
            serde_json::json!({"limit": 2.5}),
            serde_json::json!({"limit": "-3"}),
            serde_json::json!({"skip": -1.0}),
            serde_json::json!({"limit": true}),
        ] {
            assert!(serde_json::from_value::<ListArgs>(bad.clone()).is_err(), "accepted {bad}");
        }
    }

    #[test]
    fn test_list_schema_has_no_required_fields() {
        let schema = list_input_schema();
        assert_eq!(schema["required"], serde_json::json!([]));
        assert_eq!(schema["properties"]["limit"]["maximum"], 100);
    }

    #[tokio::test]
    async fn test_latest_expenses_returns_records() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/expenses/"))
            .and(header("expenselm_api_key", "sk-test"))
            .and(query_param("limit", "3"))
            .and(query_param("to_date", "2024-06-30"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "e1", "image": null, "expense": {"shop_name": "Cafe", "total_amount": 4.5}}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let tool = LatestExpensesTool::new(client_for(&server));
        let result = tool
            .execute(serde_json::json!({"limit": "3", "to_date": "2024-06-30"}))
            .await
            .unwrap();

        assert!(!result.is_error());
        let records: serde_json::Value =
            serde_json::from_str(result.content[0].as_text()).unwrap();
        assert_eq!(records[0]["id"], "e1");
        assert_eq!(records[0]["expense"]["shop_name"], "Cafe");
    }

    #[tokio::test]
    async fn test_latest_expenses_invalid_arguments_skip_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let tool = LatestExpensesTool::new(client_for(&server));

        for arguments in [
            serde_json::json!({"limit": 0}),
            serde_json::json!({"skip": -1}),
            serde_json::json!({"text_input": "x"}),
            serde_json::json!({"from_date": "2024-13-01"}),
            serde_json::json!({"limit": "ten"}),
        ] {
            let err = tool.execute(arguments.clone()).await.unwrap_err();
            assert!(
                matches!(err, ToolError::InvalidArguments { tool: "get_latest_expenses", .. }),
                "expected invalid arguments for {arguments}"
            );
        }
    }

    #[tokio::test]
    async fn test_subscription_expenses_use_subscriptions_endpoint() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/subscriptions/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let tool = LatestSubscriptionExpensesTool::new(client_for(&server));
        let result = tool.execute(serde_json::Value::Null).await.unwrap();

        assert_eq!(result.content[0].as_text(), "[]");
    }

    #[tokio::test]
    async fn test_expense_by_id() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/expenses/abc-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "image": {"image_type": "Receipt", "image_file_name": "abc.jpg"},
                "expense": {"shop_name": "Books", "total_amount": 30}
            })))
            .mount(&server)
            .await;

        let tool = ExpenseByIdTool::new(client_for(&server));
        let result = tool
            .execute(serde_json::json!({"id": "abc-123"}))
            .await
            .unwrap();

        let data: serde_json::Value = serde_json::from_str(result.content[0].as_text()).unwrap();
        assert_eq!(data["image"]["image_file_name"], "abc.jpg");
        assert_eq!(data["expense"]["expense_category"], "Misc");
    }

    #[tokio::test]
    async fn test_expense_by_id_requires_id() {
        let client = ExpenseLmClient::builder().api_key("sk-test").build().unwrap();
        let tool = ExpenseByIdTool::new(client);

        assert!(tool.execute(serde_json::json!({})).await.is_err());
        assert!(tool.execute(serde_json::json!({"id": ""})).await.is_err());
    }

    #[tokio::test]
    async fn test_expense_by_id_not_found_is_error_result() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"detail": "Expense not found"})),
            )
            .mount(&server)
            .await;

        let tool = ExpenseByIdTool::new(client_for(&server));
        let result = tool.execute(serde_json::json!({"id": "nope"})).await.unwrap();

        assert!(result.is_error());
        assert!(result.content[0].as_text().starts_with("Error: [not_found]"));
    }
}
