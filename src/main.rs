//! Web deployer MCP server - main entry point.
//!
//! Serves the tool catalog over stdin/stdout until the client closes the
//! channel (or Ctrl-C).

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use web_deployer::mcp::McpServer;
use web_deployer::runtime::{DockerCli, RuntimeGateway};
use web_deployer::store::FileStore;
use web_deployer::tools::Dispatcher;
use web_deployer::Config;

/// MCP server that writes static HTML files and runs a web server container for them.
#[derive(Debug, Parser)]
#[command(name = "web-deployer", version, about)]
struct Cli {
    /// Directory holding the served HTML files.
    #[arg(long, env = "WEB_DEPLOYER_CONTENT_DIR")]
    content_dir: Option<PathBuf>,

    /// Directory of sample pages.
    #[arg(long, env = "WEB_DEPLOYER_EXAMPLES_DIR")]
    examples_dir: Option<PathBuf>,

    /// Name of the managed container.
    #[arg(long, env = "WEB_DEPLOYER_CONTAINER_NAME")]
    container_name: Option<String>,

    /// Web server image.
    #[arg(long, env = "WEB_DEPLOYER_IMAGE")]
    image: Option<String>,

    /// Host port used when deploy_server gets none.
    #[arg(long, env = "WEB_DEPLOYER_DEFAULT_PORT")]
    default_port: Option<u16>,

    /// Container runtime CLI (docker, podman, ...).
    #[arg(long, env = "WEB_DEPLOYER_RUNTIME")]
    runtime: Option<String>,

    /// Default log level when RUST_LOG is unset.
    #[arg(long, env = "WEB_DEPLOYER_LOG_LEVEL")]
    log_level: Option<String>,

    /// Emit logs as JSON.
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn into_config(self) -> Config {
        let mut config = Config::default();
        if let Some(dir) = self.content_dir {
            config.paths.content_dir = dir;
        }
        if let Some(dir) = self.examples_dir {
            config.paths.examples_dir = dir;
        }
        if let Some(name) = self.container_name {
            config.deployment.container_name = name;
        }
        if let Some(image) = self.image {
            config.deployment.image = image;
        }
        if let Some(port) = self.default_port {
            config.deployment.default_port = port;
        }
        if let Some(runtime) = self.runtime {
            config.deployment.runtime_binary = runtime;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        config.observability.json_logs |= self.json_logs;
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config();

    web_deployer::observability::init_tracing(&config.observability);
    config.validate()?;
    let config = Arc::new(config);

    let store = FileStore::open(&config.paths).await?;

    let docker = DockerCli::new(config.deployment.runtime_binary.clone());
    match docker.version().await {
        Ok(output) if output.success() => {
            tracing::info!(runtime = %output.stdout.trim(), "container runtime available")
        }
        Ok(output) => tracing::warn!(
            runtime = docker.binary(),
            stderr = %output.stderr.trim(),
            "container runtime reported an error; deployment tools will fail"
        ),
        Err(e) => tracing::warn!(
            error = %e,
            "container runtime unavailable; deployment tools will fail"
        ),
    }

    let dispatcher = Arc::new(Dispatcher::new(config.clone(), store, Arc::new(docker)));

    tracing::info!("🚀 Web deployer MCP server starting on stdio");
    tracing::info!("  ✓ Content directory: {}", config.paths.content_dir.display());
    tracing::info!("  ✓ Managed container: {}", config.deployment.container_name);
    tracing::info!("  ✓ Tools: {}", dispatcher.catalog().len());

    let server = McpServer::new(dispatcher, config);
    tokio::select! {
        result = server.serve_stdio() => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("interrupted, shutting down"),
    }

    Ok(())
}
