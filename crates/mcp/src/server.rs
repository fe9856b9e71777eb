// MCP server: newline-delimited JSON-RPC over stdio

use crate::protocol::{
    negotiate_protocol_version, CallToolParams, CallToolResult, InitializeParams,
    InitializeResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse, ListToolsResult,
    ServerCapabilities, ServerInfo, ToolsCapability, JSONRPC_VERSION,
};
use crate::tools::{ToolError, ToolRegistry};
use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{mpsc, oneshot};
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec, LinesCodecError};

pub const SERVER_NAME: &str = "expenselm-mcp-server";

/// Longest accepted request line
const MAX_LINE_LENGTH: usize = 8 * 1024 * 1024;

const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(60);

const INSTRUCTIONS: &str = "Tools for reading the user's ExpenseLM expense records, \
subscriptions and spending summaries. Dates use the YYYY-MM-DD format.";

/// Cancel handles of running `tools/call` requests, keyed by the JSON text of their id
type InFlight = HashMap<String, oneshot::Sender<()>>;

#[derive(Clone)]
pub struct McpServer {
    registry: Arc<ToolRegistry>,
    call_timeout: Duration,
    in_flight: Arc<Mutex<InFlight>>,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            call_timeout: DEFAULT_CALL_TIMEOUT,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Bound each `tools/call`; slower calls are answered with an error result.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Serve on the process's stdin and stdout until stdin closes.
    pub async fn start(self) -> Result<()> {
        tracing::info!(tools = self.registry.len(), "MCP server listening on stdio");
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve requests read from `reader`, writing responses to `writer`.
    ///
    /// Requests run concurrently. Returns once the input ends and every
    /// in-flight response has been written.
    pub async fn serve<R, W>(self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel::<JsonRpcResponse>();
        let writer_task = tokio::spawn(write_responses(rx, writer));

        let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));
        let server = Arc::new(self);

        // FramedRead yields a single `None` right after a decode error; the
        // stream carries on with the next line when polled again.
        let mut after_decode_error = false;

        loop {
            let line = match lines.next().await {
                Some(Ok(line)) => line,
                Some(Err(LinesCodecError::MaxLineLengthExceeded)) => {
                    tracing::warn!("Discarding request line over {} bytes", MAX_LINE_LENGTH);
                    let _ = tx.send(JsonRpcResponse::error(
                        serde_json::Value::Null,
                        JsonRpcError::invalid_request(),
                    ));
                    after_decode_error = true;
                    continue;
                }
                Some(Err(LinesCodecError::Io(e))) => {
                    return Err(e).context("Failed to read from MCP client");
                }
                None if after_decode_error => {
                    after_decode_error = false;
                    continue;
                }
                None => break,
            };
            after_decode_error = false;

            if line.trim().is_empty() {
                continue;
            }

            let server = server.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(response) = server.handle_message(&line).await {
                    // The writer only stops early on an I/O error, which it reports itself
                    let _ = tx.send(response);
                }
            });
        }

        tracing::info!("MCP client closed the input stream");
        drop(tx);

        writer_task
            .await
            .context("Response writer task panicked")?
    }

    /// Handle one raw JSON-RPC message, returning the response if one is due.
    pub async fn handle_message(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: serde_json::Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Received malformed JSON");
                return Some(JsonRpcResponse::error(
                    serde_json::Value::Null,
                    JsonRpcError::parse_error(),
                ));
            }
        };

        if !value.is_object() {
            return Some(JsonRpcResponse::error(
                serde_json::Value::Null,
                JsonRpcError::invalid_request(),
            ));
        }

        let id = value.get("id").cloned().unwrap_or(serde_json::Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Received invalid JSON-RPC request");
                return Some(JsonRpcResponse::error(id, JsonRpcError::invalid_request()));
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return request
                .id
                .map(|id| JsonRpcResponse::error(id, JsonRpcError::invalid_request()));
        }

        self.handle_request(request).await
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id else {
            self.handle_notification(&request.method, request.params.as_ref());
            return None;
        };

        let response = match request.method.as_str() {
            "initialize" => self.initialize(id, request.params),
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            "tools/list" => respond(
                id,
                &ListToolsResult {
                    tools: self.registry.list_schemas(),
                },
            ),
            "tools/call" => return self.call_tool(id, request.params).await,
            method => {
                tracing::debug!(method, "Unsupported method");
                JsonRpcResponse::error(id, JsonRpcError::method_not_found(method))
            }
        };

        Some(response)
    }

    fn handle_notification(&self, method: &str, params: Option<&serde_json::Value>) {
        match method {
            "notifications/initialized" => tracing::info!("MCP client initialized"),
            "notifications/cancelled" => {
                let Some(request_id) = params.and_then(|p| p.get("requestId")) else {
                    tracing::debug!("Cancellation without a requestId");
                    return;
                };
                match self.lock_in_flight().remove(&request_id.to_string()) {
                    Some(cancel) => {
                        tracing::info!(request_id = %request_id, "Cancelling tool call");
                        let _ = cancel.send(());
                    }
                    None => tracing::debug!(request_id = %request_id, "No running call to cancel"),
                }
            }
            other => tracing::debug!(method = other, "Ignoring notification"),
        }
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, InFlight> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn initialize(&self, id: serde_json::Value, params: Option<serde_json::Value>) -> JsonRpcResponse {
        let params: InitializeParams = match params.map(serde_json::from_value).transpose() {
            Ok(Some(params)) => params,
            Ok(None) => {
                return JsonRpcResponse::error(id, JsonRpcError::invalid_params("Missing params"))
            }
            Err(e) => {
                return JsonRpcResponse::error(id, JsonRpcError::invalid_params(e.to_string()))
            }
        };

        if let Some(client) = &params.client_info {
            tracing::info!(
                client = %client.name,
                version = %client.version,
                protocol = %params.protocol_version,
                "Initializing MCP session"
            );
        }

        respond(
            id,
            &InitializeResult {
                protocol_version: negotiate_protocol_version(&params.protocol_version).to_string(),
                capabilities: ServerCapabilities {
                    tools: Some(ToolsCapability {
                        list_changed: false,
                    }),
                },
                server_info: ServerInfo {
                    name: SERVER_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                },
                instructions: Some(INSTRUCTIONS.to_string()),
            },
        )
    }

    /// Run a `tools/call`. Returns `None` when the client cancelled the call.
    async fn call_tool(
        &self,
        id: serde_json::Value,
        params: Option<serde_json::Value>,
    ) -> Option<JsonRpcResponse> {
        let params: CallToolParams = match params.map(serde_json::from_value).transpose() {
            Ok(Some(params)) => params,
            Ok(None) => {
                return Some(JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params("Missing params"),
                ))
            }
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params(e.to_string()),
                ))
            }
        };

        let Some(tool) = self.registry.get(&params.name) else {
            return Some(JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_params(format!("Unknown tool: {}", params.name)),
            ));
        };

        tracing::info!(tool = %params.name, "Calling tool");

        let key = id.to_string();
        let (cancel_tx, cancel_rx) = oneshot::channel();
        self.lock_in_flight().insert(key.clone(), cancel_tx);

        let outcome = tokio::select! {
            outcome = tokio::time::timeout(self.call_timeout, tool.execute(params.arguments)) => Some(outcome),
            Ok(()) = cancel_rx => None,
        };
        self.lock_in_flight().remove(&key);

        let Some(outcome) = outcome else {
            tracing::info!(tool = %params.name, "Tool call cancelled; no response sent");
            return None;
        };

        let response = match outcome {
            Ok(Ok(result)) => respond(id, &result),
            Ok(Err(ToolError::InvalidArguments { tool, message })) => {
                tracing::warn!(tool, %message, "Rejected tool arguments");
                JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params(format!("Invalid arguments for {tool}: {message}")),
                )
            }
            Ok(Err(e)) => JsonRpcResponse::error(id, JsonRpcError::internal_error(e.to_string())),
            Err(_) => {
                tracing::warn!(tool = %params.name, timeout_ms = self.call_timeout.as_millis() as u64, "Tool call timed out");
                respond(
                    id,
                    &CallToolResult::error(format!(
                        "[timeout] {} did not finish within {} ms",
                        params.name,
                        self.call_timeout.as_millis()
                    )),
                )
            }
        };

        Some(response)
    }
}

fn respond<T: Serialize>(id: serde_json::Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, JsonRpcError::internal_error(e.to_string())),
    }
}

async fn write_responses<W>(mut rx: mpsc::UnboundedReceiver<JsonRpcResponse>, writer: W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut sink = FramedWrite::new(writer, LinesCodec::new());

    while let Some(response) = rx.recv().await {
        let line = serde_json::to_string(&response).context("Failed to encode response")?;
        sink.send(line)
            .await
            .context("Failed to write response to MCP client")?;
    }

    Ok(())
}
