//! Summary statistics endpoints.

use crate::client::ExpenseLmClient;
use crate::error::ExpenseLmResult;
use expenselm_core::{
    CategoryCurrencyTotal, DateRange, MonthCurrencyTotal, SubscriptionCurrencyTotal,
};

/// Statistics API for spending totals over a period.
pub struct StatsApi<'a> {
    client: &'a ExpenseLmClient,
}

impl<'a> StatsApi<'a> {
    pub(crate) fn new(client: &'a ExpenseLmClient) -> Self {
        Self { client }
    }

    /// Totals grouped by month (YYYY-MM) and currency.
    pub async fn summary_by_month(
        &self,
        range: &DateRange,
    ) -> ExpenseLmResult<Vec<MonthCurrencyTotal>> {
        self.client
            .http
            .get_with_query("/stats/summary-by-month-by-currency", range)
            .await
    }

    /// Totals grouped by expense category and currency.
    pub async fn summary_by_category(
        &self,
        range: &DateRange,
    ) -> ExpenseLmResult<Vec<CategoryCurrencyTotal>> {
        self.client
            .http
            .get_with_query("/stats/summary-by-category-by-currency", range)
            .await
    }

    /// Totals grouped by subscription and currency.
    pub async fn summary_by_subscription(
        &self,
        range: &DateRange,
    ) -> ExpenseLmResult<Vec<SubscriptionCurrencyTotal>> {
        self.client
            .http
            .get_with_query("/stats/summary-by-subscription-by-currency", range)
            .await
    }
}
