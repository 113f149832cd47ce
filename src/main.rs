use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use cloudlens::config::AppConfig;
use cloudlens::{web, AppContext};

#[derive(Parser)]
#[command(
    name = "cloudlens",
    about = "cloudlens — single-account AWS dashboard behind a hosted login",
    version
)]
struct Args {
    /// HTTP port for the dashboard
    #[arg(long, env = "CLOUDLENS_PORT")]
    port: Option<u16>,

    /// Bind address (default: 127.0.0.1; use 0.0.0.0 for LAN access)
    #[arg(long, env = "CLOUDLENS_BIND")]
    bind_address: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CLOUDLENS_LOG")]
    log: Option<String>,

    /// Path to config.toml (default: ./config.toml)
    #[arg(long, env = "CLOUDLENS_CONFIG")]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = AppConfig::new(args.port, args.bind_address, args.log, args.config)?;

    setup_logging(&config.log);
    info!(version = env!("CARGO_PKG_VERSION"), "starting cloudlens");

    let ctx = Arc::new(AppContext::new(config)?);
    web::start_server(ctx).await
}

fn setup_logging(log_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .compact()
        .init();
}
