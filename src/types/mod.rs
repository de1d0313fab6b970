//! Core types for the web deployer.
//!
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Configuration structures built once at startup

mod config;
mod errors;

pub use config::{
    Config, DeploymentConfig, ObservabilityConfig, PathsConfig, ServerConfig, TransportConfig,
    MAX_PORT, MIN_PORT,
};
pub use errors::{codes, Error, Result};
