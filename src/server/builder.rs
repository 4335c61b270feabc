//! Server builder and run_server function

use crate::config::Config;
use crate::core::Orchestrator;
use crate::server::server::HttpServer;
use crate::utils::error::{BulkError, Result};
use tracing::info;

/// Server builder for easier configuration
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<Config>,
    orchestrator: Option<Orchestrator>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a pre-built orchestrator instead of one backed by the HTTP remote
    pub fn with_orchestrator(mut self, orchestrator: Orchestrator) -> Self {
        self.orchestrator = Some(orchestrator);
        self
    }

    pub fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| BulkError::config("Configuration is required"))?;

        match self.orchestrator {
            Some(orchestrator) => Ok(HttpServer::with_orchestrator(&config, orchestrator)),
            None => HttpServer::new(&config),
        }
    }
}

/// Build and run the server for `config`
pub async fn run_server(config: Config) -> Result<()> {
    info!("Starting bulk job orchestrator");

    let server = ServerBuilder::new().with_config(config).build()?;
    let address = server.config().bind_address();
    info!("Server starting at: http://{}", address);
    info!("   GET  /health - Health check");
    info!("   GET  /jobs   - Active jobs");
    info!("   GET  /ws     - Control channel");

    server.start().await
}
