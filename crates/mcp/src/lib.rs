// MCP (Model Context Protocol) server exposing the ExpenseLM API as tools
// for desktop AI clients.

pub mod config;
pub mod protocol;
pub mod server;
pub mod tools;

pub use config::{ConfigError, ServerConfig};
pub use server::McpServer;
