//! Method router — maps JSON-RPC methods onto the dispatcher.

use serde_json::{json, Value};

use crate::mcp::types::{
    InitializeParams, JsonRpcRequest, ToolCallParams, SUPPORTED_PROTOCOL_VERSIONS,
};
use crate::tools::Dispatcher;
use crate::types::{Error, Result, ServerConfig};

/// Route one request. `Ok(None)` means the method produces no result
/// (client notifications).
pub async fn route_request(
    dispatcher: &Dispatcher,
    server: &ServerConfig,
    request: &JsonRpcRequest,
) -> Result<Option<Value>> {
    match request.method.as_str() {
        "initialize" => Ok(Some(initialize(server, &request.params))),
        "ping" => Ok(Some(json!({}))),
        "tools/list" => Ok(Some(list_tools(dispatcher))),
        "tools/call" => call_tool(dispatcher, &request.params).await.map(Some),
        method if method.starts_with("notifications/") => {
            tracing::debug!(method, "client notification");
            Ok(None)
        }
        method => Err(Error::method_not_found(method)),
    }
}

fn initialize(server: &ServerConfig, params: &Value) -> Value {
    let requested = serde_json::from_value::<InitializeParams>(params.clone())
        .unwrap_or_default()
        .protocol_version;
    let protocol_version = match requested {
        Some(version) if SUPPORTED_PROTOCOL_VERSIONS.contains(&version.as_str()) => version,
        _ => server.protocol_version.clone(),
    };
    tracing::info!(%protocol_version, "client initialized session");

    json!({
        "protocolVersion": protocol_version,
        "capabilities": {
            "tools": { "listChanged": false }
        },
        "serverInfo": {
            "name": server.name,
            "version": server.version,
        }
    })
}

fn list_tools(dispatcher: &Dispatcher) -> Value {
    let tools: Vec<Value> = dispatcher
        .list_tools()
        .iter()
        .map(|descriptor| descriptor.to_mcp_value())
        .collect();
    json!({ "tools": tools })
}

async fn call_tool(dispatcher: &Dispatcher, params: &Value) -> Result<Value> {
    let call = ToolCallParams::from_params(params)?;
    let arguments = call.arguments()?;
    let result = dispatcher.dispatch(&call.name, &arguments).await?;
    Ok(result.to_mcp_value())
}
