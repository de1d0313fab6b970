//! # Web Deployer - MCP server for static site deployment
//!
//! Exposes a small catalog of tools to an AI assistant over MCP (stdio):
//! - `create_html` / `list_html_files`: manage `.html` files in one content directory
//! - `deploy_server` / `stop_server` / `server_status`: drive a single managed
//!   web server container through the local container runtime CLI
//!
//! ## Architecture
//!
//! ```text
//!   stdin  →  ┌──────────────┐   ┌──────────────┐   ┌───────────┐
//!             │  McpServer   │ → │  Dispatcher  │ → │ FileStore │
//!   stdout ←  │ (JSON-RPC)   │   │ (ToolCatalog)│   └───────────┘
//!             └──────────────┘   └──────┬───────┘   ┌───────────────┐
//!                                       └─────────→ │RuntimeGateway │
//!                                                   └───────────────┘
//! ```
//! The container runtime is the source of truth for deployment state; the
//! process keeps none of its own.

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod mcp;
pub mod runtime;
pub mod store;
pub mod tools;
pub mod types;

// Internal utilities
pub mod observability;

pub use types::{Config, Error, Result};
