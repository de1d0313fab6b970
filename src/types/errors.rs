//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation. Protocol
//! errors map onto JSON-RPC error codes; tool-level faults never leave the
//! dispatcher as `Error` (they are folded into a failure result there).

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// JSON-RPC 2.0 error codes used by the transport.
pub mod codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// Main error enum for the web deployer.
#[derive(Error, Debug)]
pub enum Error {
    /// Tool name not present in the catalog (caller contract violation).
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// JSON-RPC method the server does not implement.
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Structurally invalid JSON-RPC message.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Method parameters could not be interpreted.
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// Rejected configuration (startup fault).
    #[error("configuration error: {0}")]
    Config(String),

    /// Container runtime could not be invoked.
    #[error("runtime error: {0}")]
    Runtime(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Convert to a JSON-RPC error code.
    pub fn to_rpc_error_code(&self) -> i32 {
        match self {
            Error::Serialization(_) => codes::PARSE_ERROR,
            Error::InvalidRequest(_) => codes::INVALID_REQUEST,
            Error::MethodNotFound(_) => codes::METHOD_NOT_FOUND,
            Error::UnknownTool(_) | Error::InvalidParams(_) => codes::INVALID_PARAMS,
            Error::Config(_) | Error::Runtime(_) | Error::Io(_) => codes::INTERNAL_ERROR,
        }
    }
}

// Convenience constructors
impl Error {
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::MethodNotFound(method.into())
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::InvalidParams(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_codes() {
        assert_eq!(Error::unknown_tool("x").to_rpc_error_code(), codes::INVALID_PARAMS);
        assert_eq!(
            Error::method_not_found("x").to_rpc_error_code(),
            codes::METHOD_NOT_FOUND
        );
        assert_eq!(
            Error::invalid_request("x").to_rpc_error_code(),
            codes::INVALID_REQUEST
        );
        assert_eq!(Error::runtime("x").to_rpc_error_code(), codes::INTERNAL_ERROR);
    }

    #[test]
    fn test_parse_error_code() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.to_rpc_error_code(), codes::PARSE_ERROR);
    }

    #[test]
    fn test_unknown_tool_message() {
        assert_eq!(Error::unknown_tool("nope").to_string(), "Unknown tool: nope");
    }
}
