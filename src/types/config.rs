//! Configuration structures.
//!
//! Built once at startup (defaults, then CLI/environment overrides in the
//! binary) and shared read-only with every component.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::errors::{Error, Result};

/// Lowest host port a deployment may publish.
pub const MIN_PORT: u16 = 1024;
/// Highest host port a deployment may publish.
pub const MAX_PORT: u16 = 65535;

/// Global web deployer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Host directories.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Managed container settings.
    #[serde(default)]
    pub deployment: DeploymentConfig,

    /// Identity advertised during the MCP handshake.
    #[serde(default)]
    pub server: ServerConfig,

    /// Stdio transport limits.
    #[serde(default)]
    pub transport: TransportConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Reject settings the tools cannot operate with.
    pub fn validate(&self) -> Result<()> {
        let deployment = &self.deployment;
        if deployment.container_name.trim().is_empty() {
            return Err(Error::config("container_name cannot be empty"));
        }
        if deployment.image.trim().is_empty() {
            return Err(Error::config("image cannot be empty"));
        }
        if deployment.runtime_binary.trim().is_empty() {
            return Err(Error::config("runtime_binary cannot be empty"));
        }
        if deployment.default_port < MIN_PORT {
            return Err(Error::config(format!(
                "default_port {} is outside [{}, {}]",
                deployment.default_port, MIN_PORT, MAX_PORT
            )));
        }
        if self.transport.max_message_bytes == 0 {
            return Err(Error::config("max_message_bytes must be positive"));
        }
        Ok(())
    }
}

/// Host directory layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Flat directory holding the served `.html` artifacts.
    pub content_dir: PathBuf,

    /// Directory of sample pages, created alongside the content directory.
    pub examples_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("www"),
            examples_dir: PathBuf::from("examples-html"),
        }
    }
}

/// The single managed container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Name of the one container this server manages.
    pub container_name: String,

    /// Web server image.
    pub image: String,

    /// Host port used when `deploy_server` gets no `port`.
    pub default_port: u16,

    /// Port the web server listens on inside the container.
    pub container_port: u16,

    /// Mount point of the content directory inside the container.
    pub document_root: String,

    /// Container runtime CLI.
    pub runtime_binary: String,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            container_name: "mcp-web-server".to_string(),
            image: "nginx:alpine".to_string(),
            default_port: 8080,
            container_port: 80,
            document_root: "/usr/share/nginx/html".to_string(),
            runtime_binary: "docker".to_string(),
        }
    }
}

/// Server identity reported by `initialize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
    pub protocol_version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "web-deployer".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            protocol_version: "2024-11-05".to_string(),
        }
    }
}

/// Stdio transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Longest accepted message line in bytes.
    pub max_message_bytes: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_message_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
