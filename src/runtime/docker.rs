//! CLI-based container runtime (`docker` or a compatible client such as
//! `podman`).

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

use super::{CommandOutput, RunSpec, RuntimeGateway};
use crate::types::{Error, Result};

/// Runtime gateway shelling out to a docker-compatible CLI.
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: String,
}

impl DockerCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub fn run_args(spec: &RunSpec) -> Vec<String> {
        vec![
            "run".to_string(),
            "-d".to_string(),
            "--name".to_string(),
            spec.container_name.clone(),
            "-p".to_string(),
            format!("{}:{}", spec.host_port, spec.container_port),
            "-v".to_string(),
            format!("{}:{}:ro", spec.host_dir.display(), spec.container_dir),
            spec.image.clone(),
        ]
    }

    pub fn inspect_args(container_name: &str, format: &str) -> Vec<String> {
        vec![
            "ps".to_string(),
            "--filter".to_string(),
            format!("name=^{}$", container_name),
            "--format".to_string(),
            format.to_string(),
        ]
    }

    async fn exec(&self, args: &[String]) -> Result<CommandOutput> {
        tracing::debug!(binary = %self.binary, ?args, "running runtime command");

        // stdin stays detached: the process's own stdin carries the protocol
        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::runtime(format!("failed to run {}: {}", self.binary, e)))?;

        let result = CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        tracing::debug!(exit_code = result.exit_code, "runtime command finished");
        Ok(result)
    }
}

#[async_trait]
impl RuntimeGateway for DockerCli {
    async fn run(&self, spec: &RunSpec) -> Result<CommandOutput> {
        self.exec(&Self::run_args(spec)).await
    }

    async fn stop_and_remove(&self, container_name: &str) -> Result<CommandOutput> {
        let stop = self
            .exec(&["stop".to_string(), container_name.to_string()])
            .await?;
        if !stop.success() {
            return Ok(stop);
        }
        let mut remove = self
            .exec(&["rm".to_string(), container_name.to_string()])
            .await?;
        remove.stdout = format!("{}{}", stop.stdout, remove.stdout);
        Ok(remove)
    }

    async fn inspect(&self, container_name: &str, format: &str) -> Result<CommandOutput> {
        self.exec(&Self::inspect_args(container_name, format)).await
    }

    async fn version(&self) -> Result<CommandOutput> {
        self.exec(&["--version".to_string()]).await
    }
}
