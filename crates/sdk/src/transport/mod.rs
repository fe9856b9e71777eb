//! Transport layer for the ExpenseLM SDK.

pub mod http;

pub use http::HttpTransport;
