//! MCP session server — read loop and per-message handling.

use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};

use crate::mcp::codec::{read_message, write_message, Inbound};
use crate::mcp::router::route_request;
use crate::mcp::types::{JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION};
use crate::tools::Dispatcher;
use crate::types::{codes, Config, Error};

/// One client session over a duplex byte stream.
#[derive(Debug)]
pub struct McpServer {
    dispatcher: Arc<Dispatcher>,
    config: Arc<Config>,
}

impl McpServer {
    pub fn new(dispatcher: Arc<Dispatcher>, config: Arc<Config>) -> Self {
        Self { dispatcher, config }
    }

    /// Serve the process's stdin/stdout until stdin closes.
    pub async fn serve_stdio(&self) -> std::io::Result<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve requests until the reader reaches EOF.
    ///
    /// Requests are handled one at a time, so responses leave in request
    /// order. Only I/O failures on the channel itself end the session.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut reader = BufReader::new(reader);
        let max_bytes = self.config.transport.max_message_bytes;
        let mut handled: u64 = 0;
        tracing::info!(server = %self.config.server.name, "MCP session started");

        while let Some(inbound) = read_message(&mut reader, max_bytes).await? {
            let response = match inbound {
                Inbound::Message(line) => self.handle_message(&line).await,
                Inbound::Oversized(len) => {
                    tracing::warn!(len, max_bytes, "dropping oversized message");
                    Some(JsonRpcResponse::error(
                        Value::Null,
                        codes::INVALID_REQUEST,
                        format!("Message too large: {} bytes (max {})", len, max_bytes),
                    ))
                }
                Inbound::Malformed(reason) => {
                    tracing::warn!(%reason, "message is not valid UTF-8");
                    Some(JsonRpcResponse::error(
                        Value::Null,
                        codes::PARSE_ERROR,
                        format!("Parse error: {}", reason),
                    ))
                }
            };
            if let Some(response) = response {
                write_message(&mut writer, &response).await?;
            }
            handled += 1;
        }

        tracing::info!(messages = handled, "MCP session closed");
        Ok(())
    }

    /// Handle one raw message. Returns `None` for notifications.
    pub async fn handle_message(&self, line: &str) -> Option<JsonRpcResponse> {
        let raw: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable message");
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    codes::PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };

        let id = raw.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(raw) {
            Ok(request) => request,
            Err(e) => {
                let err = Error::invalid_request(e.to_string());
                tracing::warn!(error = %err, "malformed request");
                return Some(JsonRpcResponse::from_error(id, &err));
            }
        };

        if let Some(version) = request.jsonrpc.as_deref() {
            if version != JSONRPC_VERSION {
                let err =
                    Error::invalid_request(format!("unsupported jsonrpc version: {}", version));
                return Some(JsonRpcResponse::from_error(id, &err));
            }
        }

        let outcome = route_request(&self.dispatcher, &self.config.server, &request).await;

        if request.is_notification() {
            if let Err(e) = outcome {
                tracing::debug!(method = %request.method, error = %e, "notification ignored");
            }
            return None;
        }

        Some(match outcome {
            Ok(result) => {
                JsonRpcResponse::success(id, result.unwrap_or_else(|| serde_json::json!({})))
            }
            Err(e) => {
                tracing::warn!(method = %request.method, error = %e, "request failed");
                JsonRpcResponse::from_error(id, &e)
            }
        })
    }
}
