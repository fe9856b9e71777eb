// Core types shared by the ExpenseLM SDK and MCP server

pub mod query;
pub mod types;

pub use query::*;
pub use types::*;
