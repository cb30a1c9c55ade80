//! Simulated data concentrators for exercising a gateway.
//!
//! ```bash
//! device-sim --target 192.168.2.100
//! device-sim --port-offset 1000 --interlock-every 5
//! ```

use std::net::IpAddr;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use concentrator_tools::sim::{default_devices, interlock_period, run_device};

/// Send Gaussian V01 readings from the reference device table
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Gateway address
    #[arg(short, long, default_value = "127.0.0.1")]
    target: IpAddr,

    /// Added to every device port
    #[arg(long, default_value = "0")]
    port_offset: u16,

    /// Also send INTERLOCK on every port every N seconds
    #[arg(long)]
    interlock_every: Option<f64>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let interlock = match args.interlock_every.map(interlock_period).transpose() {
        Ok(period) => period,
        Err(e) => {
            tracing::error!(error = %e, "invalid --interlock-every");
            std::process::exit(2);
        }
    };

    tracing::info!(gateway = %args.target, "initializing transmission");

    let mut tasks = tokio::task::JoinSet::new();
    for device in default_devices() {
        tasks.spawn(run_device(device, args.target, args.port_offset, interlock));
    }

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("simulation stopped by user");
        }
        Some(res) = tasks.join_next() => {
            match res {
                Ok(Err(e)) => tracing::error!(error = %e, "device failed"),
                Ok(Ok(())) => {}
                Err(e) => tracing::error!(error = %e, "device task failed"),
            }
        }
    }
    tasks.shutdown().await;
}
