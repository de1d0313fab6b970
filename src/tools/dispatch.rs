//! Tool dispatcher — routes a named invocation to its handler.
//!
//! `dispatch` returns `Err` only for protocol faults (unknown tool). Argument
//! violations, collaborator faults and handler panics all come back as
//! `InvocationResult::Failure`, so a single bad call never ends the session.

use chrono::Local;
use futures::FutureExt;
use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use crate::runtime::{RunSpec, RuntimeGateway};
use crate::store::FileStore;
use crate::tools::catalog::{ToolArgs, ToolCatalog, ToolDescriptor};
use crate::tools::result::InvocationResult;
use crate::tools::status::{parse_status, short_id, DeploymentState, STATUS_FORMAT};
use crate::types::{Config, Error, Result};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Binds the tool catalog to handler implementations.
pub struct Dispatcher {
    config: Arc<Config>,
    catalog: ToolCatalog,
    store: FileStore,
    runtime: Arc<dyn RuntimeGateway>,
    /// Serializes deploy/stop so at most one managed container exists.
    deployment_lock: Mutex<()>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("catalog", &self.catalog)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(config: Arc<Config>, store: FileStore, runtime: Arc<dyn RuntimeGateway>) -> Self {
        let catalog = ToolCatalog::new(&config.deployment);
        Self {
            config,
            catalog,
            store,
            runtime,
            deployment_lock: Mutex::new(()),
        }
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    pub fn list_tools(&self) -> &[ToolDescriptor] {
        self.catalog.list_tools()
    }

    /// Validate `arguments`, run the named tool and normalize its outcome.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<InvocationResult> {
        let descriptor = self
            .catalog
            .lookup(name)
            .ok_or_else(|| Error::unknown_tool(name))?;

        let args = match ToolCatalog::prepare(descriptor, arguments) {
            Ok(args) => args,
            Err(message) => {
                tracing::warn!(tool = name, %message, "tool arguments rejected");
                return Ok(InvocationResult::failure(message));
            }
        };

        let started = Instant::now();
        let outcome = AssertUnwindSafe(self.execute(args)).catch_unwind().await;
        let result = match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => InvocationResult::failure(format!("{} failed: {}", name, e)),
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                tracing::error!(tool = name, %reason, "tool handler panicked");
                InvocationResult::failure(format!("{} failed: {}", name, reason))
            }
        };

        tracing::info!(
            tool = name,
            success = result.is_success(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "tool invocation finished"
        );
        Ok(result)
    }

    async fn execute(&self, args: ToolArgs) -> Result<InvocationResult> {
        match args {
            ToolArgs::CreateHtml { filename, content } => {
                self.create_html(&filename, &content).await
            }
            ToolArgs::DeployServer { port } => self.deploy_server(port).await,
            ToolArgs::StopServer => self.stop_server().await,
            ToolArgs::ServerStatus => self.server_status().await,
            ToolArgs::ListHtmlFiles => self.list_html_files().await,
        }
    }

    async fn create_html(&self, filename: &str, content: &str) -> Result<InvocationResult> {
        let path = match self.store.write(filename, content).await {
            Ok(path) => path,
            Err(e) => return Ok(InvocationResult::failure(format!("Error creating file: {}", e))),
        };

        Ok(InvocationResult::text(format!(
            "HTML file created successfully\n\n\
             File: {}\n\
             Path: {}\n\
             Size: {} bytes\n\
             Timestamp: {}\n\n\
             Deploy the server with 'deploy_server' to view it.",
            filename,
            path.display(),
            content.len(),
            Local::now().format(TIMESTAMP_FORMAT),
        )))
    }

    async fn deploy_server(&self, port: u16) -> Result<InvocationResult> {
        let deployment = &self.config.deployment;
        let _guard = self.deployment_lock.lock().await;

        // Best-effort reset of any previous deployment. Failure is the normal
        // case when nothing is deployed, so the outcome is only logged.
        match self.runtime.stop_and_remove(&deployment.container_name).await {
            Ok(output) if output.success() => tracing::info!(
                container = %deployment.container_name,
                "replaced previous deployment"
            ),
            Ok(output) => tracing::debug!(exit_code = output.exit_code, "no previous deployment"),
            Err(e) => tracing::debug!(error = %e, "cleanup before deploy skipped"),
        }

        let spec = RunSpec {
            container_name: deployment.container_name.clone(),
            image: deployment.image.clone(),
            host_port: port,
            container_port: deployment.container_port,
            host_dir: self.store.root().to_path_buf(),
            container_dir: deployment.document_root.clone(),
        };

        let output = match self.runtime.run(&spec).await {
            Ok(output) => output,
            Err(e) => {
                return Ok(InvocationResult::failure(format!(
                    "Error deploying web server: {}",
                    e
                )))
            }
        };

        if !output.success() {
            return Ok(InvocationResult::failure(format!(
                "Failed to deploy web server\n\n\
                 Details: {}\n\n\
                 Check that the container runtime is running.",
                output.stderr.trim()
            )));
        }

        Ok(InvocationResult::text(format!(
            "Web server deployed successfully\n\n\
             Container ID: {}\n\
             Port: {}\n\
             URL: http://localhost:{}\n\
             Directory: {}\n\
             Image: {}\n\n\
             Files in the content directory are served automatically.",
            short_id(&output.stdout),
            port,
            port,
            self.store.root().display(),
            deployment.image,
        )))
    }

    /// A non-zero exit is reported as "no active server" whatever its cause.
    async fn stop_server(&self) -> Result<InvocationResult> {
        let name = &self.config.deployment.container_name;
        let _guard = self.deployment_lock.lock().await;

        let output = match self.runtime.stop_and_remove(name).await {
            Ok(output) => output,
            Err(e) => {
                return Ok(InvocationResult::failure(format!(
                    "Error stopping web server: {}",
                    e
                )))
            }
        };

        if output.success() {
            Ok(InvocationResult::text(format!(
                "Web server stopped and removed\n\n\
                 Container '{}' removed\n\
                 HTML files in {} are kept",
                name,
                self.store.root().display(),
            )))
        } else {
            tracing::debug!(stderr = %output.stderr.trim(), "stop reported failure");
            Ok(InvocationResult::failure("No active web server found"))
        }
    }

    /// Only running containers are listed, so a stopped one reads as INACTIVE.
    async fn server_status(&self) -> Result<InvocationResult> {
        let deployment = &self.config.deployment;
        let output = match self
            .runtime
            .inspect(&deployment.container_name, STATUS_FORMAT)
            .await
        {
            Ok(output) => output,
            Err(e) => return Ok(InvocationResult::failure(format!("Error checking status: {}", e))),
        };

        match parse_status(&output.stdout) {
            DeploymentState::Active(snapshot) => {
                let port = snapshot.host_port().unwrap_or(deployment.default_port);
                Ok(InvocationResult::text(format!(
                    "Web server ACTIVE\n\n\
                     Container: {}\n\
                     Status: {}\n\
                     Ports: {}\n\
                     Access: http://localhost:{}",
                    snapshot.id, snapshot.status, snapshot.ports, port,
                )))
            }
            DeploymentState::Inactive => Ok(InvocationResult::text(
                "Web server INACTIVE\n\nUse 'deploy_server' to start it.",
            )),
        }
    }

    /// Entries keep directory enumeration order.
    async fn list_html_files(&self) -> Result<InvocationResult> {
        let artifacts = match self.store.list().await {
            Ok(artifacts) => artifacts,
            Err(e) => return Ok(InvocationResult::failure(format!("Error listing files: {}", e))),
        };

        let root = self.store.root().display();
        if artifacts.is_empty() {
            return Ok(InvocationResult::text(format!(
                "Content directory {} is empty\n\nUse 'create_html' to create files.",
                root
            )));
        }

        let entries: Vec<String> = artifacts
            .iter()
            .map(|a| {
                format!(
                    "{}\n   Size: {} bytes\n   Modified: {}",
                    a.name,
                    a.size_bytes,
                    a.modified_at.format(TIMESTAMP_FORMAT)
                )
            })
            .collect();

        Ok(InvocationResult::text(format!(
            "HTML files in {} ({} found)\n\n{}\n\nAvailable at: http://localhost:{}/FILENAME",
            root,
            artifacts.len(),
            entries.join("\n\n"),
            self.config.deployment.default_port,
        )))
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}
