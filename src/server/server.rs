//! HTTP server core implementation

use crate::config::{Config, ServerConfig};
use crate::core::Orchestrator;
use crate::core::remote::HttpRemote;
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{BulkError, Result};
use actix_web::{App, HttpServer as ActixHttpServer, middleware::DefaultHeaders, web};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

/// How long shutdown waits for running jobs to clean up
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// HTTP server
pub struct HttpServer {
    config: ServerConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a server backed by the configured HTTP remote
    pub fn new(config: &Config) -> Result<Self> {
        info!("Creating HTTP server");
        let remote = HttpRemote::new(&config.remote)?;
        let orchestrator = Orchestrator::new(Arc::new(remote), config.orchestrator.clone());
        Ok(Self::with_orchestrator(config, orchestrator))
    }

    /// Create a server around an existing orchestrator
    pub fn with_orchestrator(config: &Config, orchestrator: Orchestrator) -> Self {
        Self {
            config: config.server.clone(),
            state: AppState::new(config.clone(), orchestrator),
        }
    }

    /// Create the Actix-web application
    pub fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(state)
            .wrap(TracingLogger::default())
            .wrap(DefaultHeaders::new().add(("Server", "bulkops")))
            .configure(routes::configure_routes)
    }

    /// Serve until the process is signalled. Jobs are ended while the
    /// workers that run them are still alive, then the server stops.
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.bind_address();
        info!("Starting HTTP server on {}", bind_addr);

        let orchestrator = self.state.orchestrator.clone();
        let state = web::Data::new(self.state);

        let mut server = ActixHttpServer::new(move || Self::create_app(state.clone()));
        if let Some(workers) = self.config.workers {
            server = server.workers(workers);
        }
        let server = server
            .bind(&bind_addr)
            .map_err(|e| BulkError::config(format!("Failed to bind {}: {}", bind_addr, e)))?
            .disable_signals()
            .run();

        let handle = server.handle();
        tokio::spawn(async move {
            Self::shutdown_signal().await;
            info!("Ending active jobs");
            if !orchestrator.shutdown(SHUTDOWN_GRACE).await {
                warn!("Some jobs did not finish cleanup before shutdown");
            }
            handle.stop(true).await;
        });

        info!("HTTP server listening on {}", bind_addr);
        server.await?;
        info!("HTTP server stopped");
        Ok(())
    }

    /// Resolves on Ctrl+C or SIGTERM
    async fn shutdown_signal() {
        let ctrl_c = async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received Ctrl+C signal, shutting down gracefully"),
                Err(e) => {
                    warn!("Failed to install Ctrl+C handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                    info!("Received terminate signal, shutting down gracefully");
                }
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}
