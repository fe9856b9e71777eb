//! # ExpenseLM SDK
//!
//! Async Rust client for the ExpenseLM API.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use expenselm_sdk::{ExpenseLmClient, ExpenseLmResult, ExpenseQuery};
//!
//! #[tokio::main]
//! async fn main() -> ExpenseLmResult<()> {
//!     let client = ExpenseLmClient::builder()
//!         .api_key("your-api-key")
//!         .build()?;
//!
//!     let expenses = client.expenses().latest(&ExpenseQuery::default()).await?;
//!     println!("Found {} expenses", expenses.len());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

// Re-export main client
pub use client::{ExpenseLmClient, ExpenseLmClientBuilder};
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::{ExpenseLmError, ExpenseLmResult};

// Re-export domain types for convenience
pub use expenselm_core::{
    CategoryCurrencyTotal, DateRange, Expense, ExpenseImage, ExpenseImageData, ExpenseImageType,
    ExpenseItem, ExpenseQuery, ExpenseRecord, ExpenseType, MonthCurrencyTotal, QueryError,
    SubscriptionCurrencyTotal,
};
