//! Concentrator gateway
//!
//! - UDP listeners on the configured port band (default 9217-9224)
//! - Decode `V01` metric datagrams and `INTERLOCK` heartbeats
//! - Prometheus scrape endpoint on /metrics (default 0.0.0.0:8000)

use std::future::IntoFuture;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use concentrator_core::error::{ConcentratorError, Result};
use concentrator_gateway::{app_state::AppState, config, ingest, router};

/// UDP telemetry gateway for data concentrators
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML config file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match args.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };
        EnvFilter::default().add_directive(level.into())
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "concentrator-gateway failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let cfg = match &args.config {
        Some(path) => config::load_from_file(path)?,
        None => {
            info!("no config file given, using defaults");
            config::GatewayConfig::default()
        }
    };
    let listen = cfg.exporter.listen_addr()?;

    info!("concentrator-gateway v{}", env!("CARGO_PKG_VERSION"));
    let state = AppState::new(cfg);

    let mut listeners = ingest::start_listeners(&state).await?;

    let tcp = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| ConcentratorError::Internal(format!("failed to bind {listen}: {e}")))?;
    info!(%listen, "metrics endpoint: http://{}/metrics", listen);

    let app = router::build_router(state);
    let server = axum::serve(tcp, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();

    let result = tokio::select! {
        res = server => {
            res.map_err(|e| ConcentratorError::Internal(format!("server failed: {e}")))
        }
        Some(joined) = listeners.join_next() => match joined {
            Ok(Ok(())) => Err(ConcentratorError::Internal("udp listener exited".into())),
            Ok(Err(e)) => Err(e),
            Err(e) => Err(ConcentratorError::Internal(format!("udp listener task failed: {e}"))),
        },
    };

    // Aborting the tasks drops their sockets.
    listeners.shutdown().await;
    info!("shut down");
    result
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
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
    info!("shutdown signal received");
}
