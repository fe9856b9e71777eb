//! Endpoint groups of the ExpenseLM API.

pub mod expenses;
pub mod stats;
pub mod subscriptions;

pub use expenses::ExpensesApi;
pub use stats::StatsApi;
pub use subscriptions::SubscriptionsApi;
