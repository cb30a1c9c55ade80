//! Shared error type across concentrator crates.

use std::io;

use thiserror::Error;

/// Stable error classification, used as a metric label and in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Datagram is neither the heartbeat sentinel nor exactly 9 bytes.
    BadLength,
    /// 9-byte datagram whose tag is not `V01`.
    BadProtocolVersion,
    /// Receive failed on a bound socket.
    Transport,
    /// Listener could not acquire its UDP port.
    BindFailure,
    /// Invalid configuration or tool input.
    Config,
    /// Internal error.
    Internal,
}

impl ErrorKind {
    /// String representation used in metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::BadLength => "bad_length",
            ErrorKind::BadProtocolVersion => "bad_protocol_version",
            ErrorKind::Transport => "transport",
            ErrorKind::BindFailure => "bind_failure",
            ErrorKind::Config => "config",
            ErrorKind::Internal => "internal",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ConcentratorError>;

/// Unified error type used by core, gateway and tools.
#[derive(Debug, Error)]
pub enum ConcentratorError {
    #[error("bad packet length: {len} bytes (expected 9)")]
    BadLength { len: usize },
    #[error("bad protocol version: {:?} (expected \"V01\")", String::from_utf8_lossy(.tag))]
    BadProtocolVersion { tag: [u8; 3] },
    #[error("receive failed on udp port {port}: {source}")]
    Transport {
        port: u16,
        #[source]
        source: io::Error,
    },
    #[error("failed to bind udp port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: io::Error,
    },
    #[error("config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl ConcentratorError {
    /// Map an error to its stable kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConcentratorError::BadLength { .. } => ErrorKind::BadLength,
            ConcentratorError::BadProtocolVersion { .. } => ErrorKind::BadProtocolVersion,
            ConcentratorError::Transport { .. } => ErrorKind::Transport,
            ConcentratorError::Bind { .. } => ErrorKind::BindFailure,
            ConcentratorError::Config(_) => ErrorKind::Config,
            ConcentratorError::Internal(_) => ErrorKind::Internal,
        }
    }
}
