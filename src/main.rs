//! bulkops - bulk job orchestrator server

use anyhow::Context;
use bulkops::config::Config;
use bulkops::server;
use bulkops::utils::init_logging;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

/// Bulk job orchestrator
#[derive(Debug, Parser)]
#[command(name = "bulkops", version, about)]
struct Args {
    /// YAML configuration file; defaults apply when it does not exist
    #[arg(short, long, env = "BULKOPS_CONFIG", default_value = "config/bulkops.yaml")]
    config: PathBuf,

    /// Override the listen host
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port
    #[arg(long)]
    port: Option<u16>,
}

async fn load_config(args: &Args) -> anyhow::Result<(Config, bool)> {
    let found = tokio::fs::try_exists(&args.config).await.unwrap_or(false);
    let mut config = if found {
        Config::from_file(&args.config)
            .await
            .with_context(|| format!("loading {}", args.config.display()))?
    } else {
        Config::from_env().context("loading configuration from environment")?
    };

    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate().context("validating configuration")?;
    Ok((config, found))
}

async fn run(args: Args) -> anyhow::Result<()> {
    let (config, found) = load_config(&args).await?;
    init_logging(&config.logging).context("initialising logging")?;

    if found {
        info!("Configuration loaded from {}", args.config.display());
    } else {
        warn!(
            "Configuration file {} not found, using defaults and environment",
            args.config.display()
        );
    }

    server::builder::run_server(config).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
