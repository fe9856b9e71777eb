//! Expenses API endpoints.

use crate::client::ExpenseLmClient;
use crate::error::{ExpenseLmError, ExpenseLmResult};
use expenselm_core::{ExpenseImageData, ExpenseQuery, ExpenseRecord};
use serde::de::DeserializeOwned;

/// Expenses API for listing and fetching expense records.
pub struct ExpensesApi<'a> {
    client: &'a ExpenseLmClient,
}

impl<'a> ExpensesApi<'a> {
    pub(crate) fn new(client: &'a ExpenseLmClient) -> Self {
        Self { client }
    }

    /// List the latest expense records, newest first.
    pub async fn latest(&self, query: &ExpenseQuery) -> ExpenseLmResult<Vec<ExpenseRecord>> {
        query
            .validate()
            .map_err(|e| ExpenseLmError::InvalidInput(e.to_string()))?;
        self.client.http.get_with_query("/expenses/", query).await
    }

    /// Get a single expense by id.
    pub async fn get(&self, id: &str) -> ExpenseLmResult<ExpenseImageData> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ExpenseLmError::InvalidInput(
                "expense id must not be empty".to_string(),
            ));
        }

        let body: serde_json::Value = self.client.http.get_segments(&["expenses", id]).await?;
        decode_document(body)
    }
}

/// Decode a body that is either the document itself or a JSON string holding it.
fn decode_document<T: DeserializeOwned>(body: serde_json::Value) -> ExpenseLmResult<T> {
    match body {
        serde_json::Value::String(encoded) => Ok(serde_json::from_str(&encoded)?),
        other => Ok(serde_json::from_value(other)?),
    }
}
