// Tool trait, registry, and helpers shared by all tools

use crate::protocol::{CallToolResult, ToolSchema};
use expenselm_sdk::{ExpenseLmError, ExpenseLmResult};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Failures that are reported as JSON-RPC errors rather than tool results
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: &'static str, message: String },

    #[error("Failed to encode result of {tool}: {source}")]
    Encode {
        tool: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ToolError {
    pub fn invalid_arguments(tool: &'static str, message: impl ToString) -> Self {
        Self::InvalidArguments {
            tool,
            message: message.to_string(),
        }
    }
}

/// Tool executor trait
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool schema for MCP
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with given arguments
    ///
    /// Upstream failures come back as `Ok` results flagged `isError`.
    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError>;
}

/// Tool registry for managing available tools
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let schema = tool.schema();
        self.tools.insert(schema.name, tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// List all tool schemas, sorted by name
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        self.tools.values().map(|t| t.schema()).collect()
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Deserialize tool arguments; a missing arguments object counts as empty.
pub fn parse_arguments<T: DeserializeOwned>(
    tool: &'static str,
    arguments: serde_json::Value,
) -> Result<T, ToolError> {
    let arguments = match arguments {
        serde_json::Value::Null => serde_json::Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|e| ToolError::invalid_arguments(tool, e))
}

/// Turn an API response into a tool result.
pub fn api_result<T: Serialize>(
    tool: &'static str,
    result: ExpenseLmResult<T>,
) -> Result<CallToolResult, ToolError> {
    match result {
        Ok(value) => {
            let json = serde_json::to_string_pretty(&value)
                .map_err(|source| ToolError::Encode { tool, source })?;
            Ok(CallToolResult::text(json))
        }
        Err(ExpenseLmError::InvalidInput(message)) => {
            Err(ToolError::invalid_arguments(tool, message))
        }
        Err(e) => {
            tracing::warn!(tool, kind = e.kind(), error = %e, "ExpenseLM request failed");
            Ok(CallToolResult::error(format!("[{}] {}", e.kind(), e)))
        }
    }
}

// Helper functions for creating tool schemas

pub fn json_schema_object(properties: serde_json::Value, required: Vec<&str>) -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn json_schema_string(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "description": description
    })
}

pub fn json_schema_date(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "format": "date",
        "description": description
    })
}

pub fn json_schema_integer(
    description: &str,
    minimum: u32,
    maximum: Option<u32>,
    default: u32,
) -> serde_json::Value {
    let mut schema = serde_json::json!({
        "type": "integer",
        "description": description,
        "minimum": minimum,
        "default": default
    });
    if let Some(maximum) = maximum {
        schema["maximum"] = serde_json::json!(maximum);
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    struct EchoTool {
        name: &'static str,
    }

    #[async_trait::async_trait]
    impl Tool for EchoTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: self.name.to_string(),
                description: "Echo arguments".to_string(),
                input_schema: json_schema_object(serde_json::json!({}), vec![]),
            }
        }

        async fn execute(
            &self,
            arguments: serde_json::Value,
        ) -> Result<CallToolResult, ToolError> {
            Ok(CallToolResult::text(arguments.to_string()))
        }
    }

    #[derive(Debug, Deserialize)]
    struct Args {
        id: String,
    }

    #[test]
    fn test_registry_lists_sorted_by_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool { name: "zeta" }));
        registry.register(Arc::new(EchoTool { name: "alpha" }));
        registry.register(Arc::new(EchoTool { name: "alpha" }));

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("zeta"));
        assert!(registry.get("missing").is_none());

        let names: Vec<String> = registry.list_schemas().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_parse_arguments() {
        let args: Args = parse_arguments("t", serde_json::json!({"id": "x"})).unwrap();
        assert_eq!(args.id, "x");

        let err = parse_arguments::<Args>("t", serde_json::Value::Null).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { tool: "t", .. }));
        assert!(err.to_string().contains("missing field `id`"));
    }

    #[test]
    fn test_api_result_success_is_pretty_json() {
        let result = api_result("t", Ok(vec![1, 2])).unwrap();
        assert!(!result.is_error());
        assert_eq!(result.content[0].as_text(), "[\n  1,\n  2\n]");
    }

    #[test]
    fn test_api_result_upstream_error_is_tool_error_result() {
        let result = api_result::<()>(
            "t",
            Err(ExpenseLmError::Authentication("Invalid API key".to_string())),
        )
        .unwrap();
        assert!(result.is_error());
        assert_eq!(
            result.content[0].as_text(),
            "Error: [authentication] Authentication failed: Invalid API key"
        );
    }

    #[test]
    fn test_api_result_invalid_input_is_argument_error() {
        let err = api_result::<()>("t", Err(ExpenseLmError::InvalidInput("bad".to_string())))
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[test]
    fn test_integer_schema() {
        let schema = json_schema_integer("Limit", 1, Some(100), 10);
        assert_eq!(schema["type"], "integer");
        assert_eq!(schema["maximum"], 100);

        let schema = json_schema_integer("Skip", 0, None, 0);
        assert!(schema.get("maximum").is_none());
    }
}
