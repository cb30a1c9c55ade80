//! Port listener (one per UDP port).
//!
//! Responsibilities:
//! - Bind the port, failing loudly with the port number
//! - Receive datagrams forever, decode them, and update the registry
//! - Absorb every per-datagram and transient socket error
//!
//! Lifecycle: `Starting -> Listening -> (receive -> decode -> update)*`.
//! `Stopped` is only reached when the socket itself stops working.

use std::io;
use std::net::{IpAddr, SocketAddr};

use bytes::Bytes;
use tokio::net::UdpSocket;

use concentrator_core::error::{ConcentratorError, Result};
use concentrator_core::protocol::{decode_datagram, Inbound};

use crate::app_state::{AppState, ListenerState};
use crate::config::IngestSection;

pub struct PortListener {
    port: u16,
    socket: UdpSocket,
    recv_buffer_bytes: usize,
    max_consecutive_errors: u32,
}

impl PortListener {
    /// Bind `ip:port`. Port 0 picks an ephemeral port; `port()` reports the
    /// one actually bound.
    pub async fn bind(ip: IpAddr, port: u16, ingest: &IngestSection) -> Result<Self> {
        let socket = UdpSocket::bind(SocketAddr::new(ip, port))
            .await
            .map_err(|source| ConcentratorError::Bind { port, source })?;
        let port = socket
            .local_addr()
            .map_err(|source| ConcentratorError::Bind { port, source })?
            .port();

        Ok(Self {
            port,
            socket,
            recv_buffer_bytes: ingest.recv_buffer_bytes,
            max_consecutive_errors: ingest.max_consecutive_recv_errors,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Receive loop. Returns only when the socket is unusable.
    pub async fn run(self, state: AppState) -> Result<()> {
        let port = self.port;
        let port_label = port.to_string();
        let mut buf = vec![0u8; self.recv_buffer_bytes];
        let mut budget = RecvErrorBudget::new(self.max_consecutive_errors);

        state.set_listener_state(port, ListenerState::Listening);
        tracing::info!(port, "udp listener started");

        loop {
            match self.socket.recv_from(&mut buf).await {
                Ok((len, peer)) => {
                    budget.on_success();
                    let datagram = Bytes::copy_from_slice(&buf[..len]);
                    handle_datagram(&state, port, &port_label, datagram, peer);
                }
                Err(e) => {
                    state.metrics().recv_errors.inc(&[("port", port_label.as_str())]);

                    match budget.on_error(&e) {
                        RecvVerdict::Transient => {
                            tracing::warn!(port, error = %e, "transient udp receive error");
                        }
                        RecvVerdict::Continue { consecutive } => {
                            tracing::warn!(port, error = %e, consecutive, "udp receive error");
                        }
                        RecvVerdict::Fatal { consecutive } => {
                            tracing::error!(
                                port,
                                error = %e,
                                consecutive,
                                "udp socket unusable, listener stopping"
                            );
                            state.set_listener_state(port, ListenerState::Stopped);
                            return Err(ConcentratorError::Transport { port, source: e });
                        }
                    }
                }
            }
        }
    }
}

/// What the receive loop does after a failed `recv_from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecvVerdict {
    /// Not counted against the budget.
    Transient,
    /// Counted; the listener keeps going.
    Continue { consecutive: u32 },
    /// Budget exhausted; the listener stops.
    Fatal { consecutive: u32 },
}

/// Counts consecutive non-transient receive errors. Any successful receive
/// resets the count.
#[derive(Debug, Clone)]
pub struct RecvErrorBudget {
    max_consecutive: u32,
    consecutive: u32,
}

impl RecvErrorBudget {
    pub fn new(max_consecutive: u32) -> Self {
        Self {
            max_consecutive,
            consecutive: 0,
        }
    }

    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }

    pub fn on_success(&mut self) {
        self.consecutive = 0;
    }

    pub fn on_error(&mut self, e: &io::Error) -> RecvVerdict {
        if is_transient(e) {
            return RecvVerdict::Transient;
        }
        self.consecutive = self.consecutive.saturating_add(1);
        if self.consecutive >= self.max_consecutive {
            RecvVerdict::Fatal {
                consecutive: self.consecutive,
            }
        } else {
            RecvVerdict::Continue {
                consecutive: self.consecutive,
            }
        }
    }
}

fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionRefused
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::TimedOut
    )
}

/// Decode one datagram received on `port` and apply it to the registry.
/// `port_label` is `port` rendered once by the caller for counter labels.
/// Never fails: malformed datagrams are counted, logged, and dropped.
pub fn handle_datagram(
    state: &AppState,
    port: u16,
    port_label: &str,
    datagram: Bytes,
    peer: SocketAddr,
) {
    let len = datagram.len();
    state.metrics().datagrams.inc(&[("port", port_label)]);

    match decode_datagram(datagram, port) {
        Ok(Inbound::Metric(m)) => {
            tracing::debug!(
                port,
                %peer,
                identifier = %m.identifier,
                value = m.value,
                "metric received"
            );
            state
                .registry()
                .record_metric(&m.identifier, m.source_port, m.value);
        }
        Ok(Inbound::Heartbeat(hb)) => {
            state.metrics().heartbeats.inc(&[("port", port_label)]);
            tracing::info!(
                port,
                %peer,
                at = hb.unix_seconds(),
                "INTERLOCK assertion received"
            );
            state.registry().record_heartbeat(hb.source_port, hb.observed_at);
        }
        Err(e) => {
            state
                .metrics()
                .decode_errors
                .inc(&[("port", port_label), ("kind", e.kind().as_str())]);
            tracing::warn!(port, %peer, len, error = %e, "dropping malformed datagram");
        }
    }
}
