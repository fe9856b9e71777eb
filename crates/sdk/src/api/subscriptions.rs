//! Subscriptions API endpoints.

use crate::client::ExpenseLmClient;
use crate::error::{ExpenseLmError, ExpenseLmResult};
use expenselm_core::{ExpenseQuery, ExpenseRecord};

/// Subscriptions API for expenses that recur on a schedule.
pub struct SubscriptionsApi<'a> {
    client: &'a ExpenseLmClient,
}

impl<'a> SubscriptionsApi<'a> {
    pub(crate) fn new(client: &'a ExpenseLmClient) -> Self {
        Self { client }
    }

    /// List the latest subscription expense records.
    pub async fn latest(&self, query: &ExpenseQuery) -> ExpenseLmResult<Vec<ExpenseRecord>> {
        query
            .validate()
            .map_err(|e| ExpenseLmError::InvalidInput(e.to_string()))?;
        self.client.http.get_with_query("/subscriptions/", query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_latest_subscriptions() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/subscriptions/"))
            .and(query_param("skip", "0"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "id": "sub-1",
                "image": null,
                "expense": {"shop_name": "Streamly", "expense_type": "Subscription"}
            }])))
            .mount(&server)
            .await;

        let client = ExpenseLmClient::builder()
            .base_url(server.uri())
            .api_key("sk-test")
            .build()
            .unwrap();

        let records = client
            .subscriptions()
            .latest(&ExpenseQuery::default())
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "sub-1");
    }
}
