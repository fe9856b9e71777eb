use serde::{Deserialize, Serialize};

/// Kind of document an expense image shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpenseImageType {
    Receipt,
    Invoice,
    Others,
}

/// Whether an expense is a one-off purchase or a recurring subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExpenseType {
    #[default]
    Standard,
    Subscription,
}

/// Image attached to an expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseImage {
    pub image_type: ExpenseImageType,
    pub image_file_name: String,
}

/// Line item within an expense
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpenseItem {
    pub name: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub subtotal: f64,
}

/// Data extracted from an expense image.
///
/// Every field has a default so partially extracted expenses still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Expense {
    pub shop_name: String,
    pub shop_address: String,
    /// ISO 8601 date as reported by the extraction
    pub date: String,
    pub expense_category: String,
    pub currency: String,
    pub total_amount: f64,
    pub items: Vec<ExpenseItem>,
    pub expense_type: ExpenseType,
    pub remark: String,
}

impl Default for Expense {
    fn default() -> Self {
        Self {
            shop_name: String::new(),
            shop_address: String::new(),
            date: String::new(),
            expense_category: "Misc".to_string(),
            currency: String::new(),
            total_amount: 0.0,
            items: Vec::new(),
            expense_type: ExpenseType::Standard,
            remark: String::new(),
        }
    }
}

/// An expense image together with its extracted data
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExpenseImageData {
    #[serde(default)]
    pub image: Option<ExpenseImage>,
    #[serde(default)]
    pub expense: Option<Expense>,
}

/// A stored expense record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: String,
    #[serde(flatten)]
    pub data: ExpenseImageData,
}

/// Total spent per month (YYYY-MM) and currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthCurrencyTotal {
    pub month: String,
    pub currency: String,
    pub total_amount: f64,
}

/// Total spent per expense category and currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCurrencyTotal {
    pub category: String,
    pub currency: String,
    pub total_amount: f64,
}

/// Total spent per subscription and currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionCurrencyTotal {
    pub subscription: String,
    pub currency: String,
    pub total_amount: f64,
}
