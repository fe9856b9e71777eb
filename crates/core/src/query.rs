// Search and reporting parameters accepted by the ExpenseLM API

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;
pub const MIN_TEXT_INPUT_LEN: usize = 2;

/// Wire format of all dates sent to the API
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reasons a query is rejected before it is sent
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("limit must be between 1 and 100, got {0}")]
    LimitOutOfRange(u32),

    #[error("text_input must be at least 2 characters")]
    TextInputTooShort,

    #[error("{field} must be a date in YYYY-MM-DD format, got '{value}'")]
    InvalidDate { field: &'static str, value: String },

    #[error("from_date {from} is after to_date {to}")]
    InvertedRange { from: NaiveDate, to: NaiveDate },
}

/// Parse a `YYYY-MM-DD` date, naming the offending field on failure.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, QueryError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| QueryError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// Like [`parse_date`], but treats a missing or blank value as absent.
pub fn parse_optional_date(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<NaiveDate>, QueryError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_date(field, v).map(Some),
    }
}

/// Pagination and filters for listing expense records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseQuery {
    pub skip: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<NaiveDate>,
    /// Free text for semantic search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_input: Option<String>,
}

impl Default for ExpenseQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
            from_date: None,
            to_date: None,
            text_input: None,
        }
    }
}

impl ExpenseQuery {
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.limit == 0 || self.limit > MAX_LIMIT {
            return Err(QueryError::LimitOutOfRange(self.limit));
        }

        if let Some(text) = &self.text_input {
            if text.chars().count() < MIN_TEXT_INPUT_LEN {
                return Err(QueryError::TextInputTooShort);
            }
        }

        if let (Some(from), Some(to)) = (self.from_date, self.to_date) {
            if from > to {
                return Err(QueryError::InvertedRange { from, to });
            }
        }

        Ok(())
    }
}

/// Inclusive reporting period for summary statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    from_date: NaiveDate,
    to_date: NaiveDate,
}

impl DateRange {
    pub fn new(from_date: NaiveDate, to_date: NaiveDate) -> Result<Self, QueryError> {
        if from_date > to_date {
            return Err(QueryError::InvertedRange {
                from: from_date,
                to: to_date,
            });
        }
        Ok(Self { from_date, to_date })
    }

    pub fn from_date(&self) -> NaiveDate {
        self.from_date
    }

    pub fn to_date(&self) -> NaiveDate {
        self.to_date
    }
}
