//! Container runtime gateway.
//!
//! Single imperative lifecycle commands against a local container runtime.
//! The gateway reports exit code and captured output; it never retries and
//! never interprets the output. `Err` means the command could not be run at
//! all (binary missing, spawn failure).

use async_trait::async_trait;
use std::path::PathBuf;

use crate::types::Result;

pub mod docker;

pub use docker::DockerCli;

/// Exit status and captured output of one runtime command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Parameters of a detached `run`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSpec {
    pub container_name: String,
    pub image: String,
    pub host_port: u16,
    pub container_port: u16,
    /// Host directory mounted read-only into the container.
    pub host_dir: PathBuf,
    pub container_dir: String,
}

/// Trait for issuing lifecycle commands to a container runtime.
#[async_trait]
pub trait RuntimeGateway: Send + Sync {
    /// Start a detached container publishing `host_port` and mounting `host_dir`.
    async fn run(&self, spec: &RunSpec) -> Result<CommandOutput>;

    /// Stop, then remove, the named container.
    async fn stop_and_remove(&self, container_name: &str) -> Result<CommandOutput>;

    /// List the named container if running, one line rendered with `format`.
    async fn inspect(&self, container_name: &str, format: &str) -> Result<CommandOutput>;

    /// Runtime client version (startup availability probe).
    async fn version(&self) -> Result<CommandOutput>;
}
