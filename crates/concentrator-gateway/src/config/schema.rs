use std::net::{IpAddr, SocketAddr};

use serde::Deserialize;
use concentrator_core::error::{ConcentratorError, Result};

/// Largest band of UDP ports one gateway will listen on.
pub const MAX_PORT_COUNT: u16 = 64;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub exporter: ExporterSection,

    #[serde(default)]
    pub ingest: IngestSection,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            version: 1,
            exporter: ExporterSection::default(),
            ingest: IngestSection::default(),
        }
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ConcentratorError::Config(format!(
                "unsupported config version {} (expected 1)",
                self.version
            )));
        }

        self.exporter.validate()?;
        self.ingest.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ExporterSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ExporterSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            ConcentratorError::Config(format!(
                "exporter.listen must be a valid SocketAddr, got {:?}",
                self.listen
            ))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IngestSection {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_base_port")]
    pub base_port: u16,

    #[serde(default = "default_port_count")]
    pub port_count: u16,

    #[serde(default = "default_recv_buffer_bytes")]
    pub recv_buffer_bytes: usize,

    #[serde(default = "default_max_consecutive_recv_errors")]
    pub max_consecutive_recv_errors: u32,
}

impl Default for IngestSection {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            base_port: default_base_port(),
            port_count: default_port_count(),
            recv_buffer_bytes: default_recv_buffer_bytes(),
            max_consecutive_recv_errors: default_max_consecutive_recv_errors(),
        }
    }
}

impl IngestSection {
    pub fn validate(&self) -> Result<()> {
        self.bind_ip()?;
        if self.base_port == 0 {
            return Err(ConcentratorError::Config(
                "ingest.base_port must be greater than 0".into(),
            ));
        }
        if !(1..=MAX_PORT_COUNT).contains(&self.port_count) {
            return Err(ConcentratorError::Config(format!(
                "ingest.port_count must be between 1 and {MAX_PORT_COUNT}"
            )));
        }
        if u32::from(self.base_port) + u32::from(self.port_count) - 1 > u32::from(u16::MAX) {
            return Err(ConcentratorError::Config(
                "ingest.base_port + port_count exceeds the UDP port range".into(),
            ));
        }
        if !(16..=65535).contains(&self.recv_buffer_bytes) {
            return Err(ConcentratorError::Config(
                "ingest.recv_buffer_bytes must be between 16 and 65535".into(),
            ));
        }
        if !(1..=10000).contains(&self.max_consecutive_recv_errors) {
            return Err(ConcentratorError::Config(
                "ingest.max_consecutive_recv_errors must be between 1 and 10000".into(),
            ));
        }
        Ok(())
    }

    pub fn bind_ip(&self) -> Result<IpAddr> {
        self.bind_addr.parse().map_err(|_| {
            ConcentratorError::Config(format!(
                "ingest.bind_addr must be a valid IP address, got {:?}",
                self.bind_addr
            ))
        })
    }

    /// The configured port band, in ascending order.
    pub fn ports(&self) -> impl Iterator<Item = u16> {
        let first = self.base_port;
        (0..self.port_count).filter_map(move |i| first.checked_add(i))
    }
}

fn default_listen() -> String {
    "0.0.0.0:8000".into()
}
fn default_bind_addr() -> String {
    "0.0.0.0".into()
}
fn default_base_port() -> u16 {
    9217
}
fn default_port_count() -> u16 {
    8
}
fn default_recv_buffer_bytes() -> usize {
    1024
}
fn default_max_consecutive_recv_errors() -> u32 {
    16
}
