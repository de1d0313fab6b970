//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use web_deployer::runtime::{CommandOutput, RunSpec, RuntimeGateway};
use web_deployer::store::FileStore;
use web_deployer::tools::Dispatcher;
use web_deployer::types::PathsConfig;
use web_deployer::{Config, Result};

/// Runtime call as seen by the stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Run(RunSpec),
    StopAndRemove(String),
    Inspect(String, String),
    Version,
}

/// Gateway stub answering every command with canned outputs and recording calls.
#[derive(Debug, Default)]
pub struct StubGateway {
    pub run_output: CommandOutput,
    pub stop_output: CommandOutput,
    pub inspect_output: CommandOutput,
    pub calls: Mutex<Vec<Call>>,
}

impl StubGateway {
    /// Every command exits 0; `run` prints a container id.
    pub fn succeeding() -> Self {
        Self {
            run_output: CommandOutput {
                exit_code: 0,
                stdout: "f00dfacecafe1234567890\n".to_string(),
                stderr: String::new(),
            },
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RuntimeGateway for StubGateway {
    async fn run(&self, spec: &RunSpec) -> Result<CommandOutput> {
        self.record(Call::Run(spec.clone()));
        Ok(self.run_output.clone())
    }

    async fn stop_and_remove(&self, container_name: &str) -> Result<CommandOutput> {
        self.record(Call::StopAndRemove(container_name.to_string()));
        Ok(self.stop_output.clone())
    }

    async fn inspect(&self, container_name: &str, format: &str) -> Result<CommandOutput> {
        self.record(Call::Inspect(container_name.to_string(), format.to_string()));
        Ok(self.inspect_output.clone())
    }

    async fn version(&self) -> Result<CommandOutput> {
        self.record(Call::Version);
        Ok(CommandOutput::default())
    }
}

/// Config rooted in a fresh temporary directory.
pub fn temp_config() -> (TempDir, Config) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.paths = PathsConfig {
        content_dir: dir.path().join("www"),
        examples_dir: dir.path().join("examples-html"),
    };
    (dir, config)
}

pub struct Fixture {
    pub dir: TempDir,
    pub config: Arc<Config>,
    pub gateway: Arc<StubGateway>,
    pub dispatcher: Arc<Dispatcher>,
}

pub async fn fixture(gateway: StubGateway) -> Fixture {
    let (dir, config) = temp_config();
    let config = Arc::new(config);
    let store = FileStore::open(&config.paths).await.unwrap();
    let gateway = Arc::new(gateway);
    let dispatcher = Arc::new(Dispatcher::new(config.clone(), store, gateway.clone()));
    Fixture {
        dir,
        config,
        gateway,
        dispatcher,
    }
}
