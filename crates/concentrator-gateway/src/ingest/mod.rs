//! UDP ingestion: one listener task per configured port.
//!
//! Every port is bound before any task is spawned, so a port that is taken
//! or forbidden fails startup instead of leaving the gateway running with a
//! partial band.

pub mod listener;

use tokio::task::JoinSet;

use concentrator_core::error::Result;

use crate::app_state::{AppState, ListenerState};

pub use listener::{handle_datagram, PortListener, RecvErrorBudget, RecvVerdict};

/// Bind every configured port, then spawn one listener task per port.
pub async fn start_listeners(state: &AppState) -> Result<JoinSet<Result<()>>> {
    let ingest = &state.cfg().ingest;
    let ip = ingest.bind_ip()?;

    let mut bound = Vec::new();
    for port in ingest.ports() {
        state.set_listener_state(port, ListenerState::Starting);
        match PortListener::bind(ip, port, ingest).await {
            Ok(l) => bound.push(l),
            Err(e) => {
                tracing::error!(port, error = %e, "udp bind failed");
                state.set_listener_state(port, ListenerState::Stopped);
                return Err(e);
            }
        }
    }

    let ports: Vec<u16> = bound.iter().map(PortListener::port).collect();
    let mut set = JoinSet::new();
    for l in bound {
        set.spawn(l.run(state.clone()));
    }

    tracing::info!(?ports, "all udp listeners started");
    Ok(set)
}
