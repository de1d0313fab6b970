//! MCP stdio transport layer.
//!
//! Newline-delimited JSON-RPC 2.0 between a single client and the tool
//! dispatcher. Logging goes to stderr; stdout carries protocol messages only.

pub mod codec;
pub mod router;
pub mod server;
pub mod types;

pub use server::McpServer;
