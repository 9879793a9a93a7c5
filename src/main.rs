//! Service binary: load config, initialize observability, serve.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use feature_board::config::{load_config, AppConfig};
use feature_board::observability::{logging, metrics};
use feature_board::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "feature-board", version, about = "Feature voting service")]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured bind address.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        rate_limit = config.rate_limit.requests_per_window,
        rate_window_ms = config.rate_limit.window_ms,
        upload_dir = %config.upload.dir.display(),
        "Configuration loaded"
    );

    std::fs::create_dir_all(&config.upload.dir)?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
