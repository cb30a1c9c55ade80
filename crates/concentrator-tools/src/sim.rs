//! Simulated data concentrators.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use bytes::Bytes;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use tokio::net::UdpSocket;

use concentrator_core::error::{ConcentratorError, Result};
use concentrator_core::protocol::{encode_packet, HEARTBEAT_SENTINEL};

/// One simulated device: a Gaussian reading sent every `interval`.
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    pub port: u16,
    pub id: u16,
    pub mean: f64,
    pub std_dev: f64,
    pub interval: Duration,
}

impl Device {
    fn new(port: u16, id: u16, mean: f64, std_dev: f64, interval_ms: u64) -> Self {
        Self {
            port,
            id,
            mean,
            std_dev,
            interval: Duration::from_millis(interval_ms),
        }
    }
}

/// Reference deployment: one device per port 9217-9224.
pub fn default_devices() -> Vec<Device> {
    vec![
        Device::new(9217, 101, 24.0, 0.5, 1000),
        Device::new(9218, 102, 400.0, 2.1, 500),
        Device::new(9219, 103, 12.4, 0.1, 2000),
        Device::new(9220, 104, 50.0, 10.0, 200),
        Device::new(9221, 105, -3.0, 1.0, 1000),
        Device::new(9222, 106, 50.0, 5.0, 3000),
        Device::new(9223, 107, 10.2, 0.2, 800),
        Device::new(9224, 108, -270.0, 0.5, 1500),
    ]
}

/// Gaussian reading source for one device.
pub struct ReadingSource {
    dist: Normal<f64>,
    rng: StdRng,
}

impl ReadingSource {
    pub fn new(device: &Device, seed: Option<u64>) -> Result<Self> {
        let dist = Normal::new(device.mean, device.std_dev).map_err(|e| {
            ConcentratorError::Config(format!("device {}: bad distribution: {e}", device.id))
        })?;
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Ok(Self { dist, rng })
    }

    /// Next datagram for `identifier`.
    pub fn next_packet(&mut self, identifier: u16) -> Bytes {
        encode_packet(identifier, self.dist.sample(&mut self.rng))
    }
}

/// Send readings from `device` to `target` forever. Send errors are logged
/// and the loop keeps going.
pub async fn run_device(
    device: Device,
    target: IpAddr,
    port_offset: u16,
    interlock_every: Option<Duration>,
) -> Result<()> {
    let port = device.port.checked_add(port_offset).ok_or_else(|| {
        ConcentratorError::Config(format!("port {} + offset {port_offset} overflows", device.port))
    })?;
    let dest = SocketAddr::new(target, port);
    let mut source = ReadingSource::new(&device, None)?;

    let socket = UdpSocket::bind(SocketAddr::new(unspecified_for(target), 0))
        .await
        .map_err(|e| ConcentratorError::Internal(format!("device {}: bind failed: {e}", device.id)))?;

    tracing::info!(device = device.id, %dest, interval_ms = device.interval.as_millis() as u64, "device started");

    let mut readings = tokio::time::interval(device.interval);
    let mut interlock = interlock_every.map(tokio::time::interval);

    loop {
        let payload = match interlock.as_mut() {
            Some(hb) => tokio::select! {
                _ = readings.tick() => source.next_packet(device.id),
                _ = hb.tick() => Bytes::from_static(HEARTBEAT_SENTINEL),
            },
            None => {
                readings.tick().await;
                source.next_packet(device.id)
            }
        };

        if let Err(e) = socket.send_to(&payload, dest).await {
            tracing::warn!(device = device.id, %dest, error = %e, "send failed");
        }
    }
}

/// Parse an `--interlock-every` value in seconds. Rejects anything that is
/// not a positive, representable period of at least one nanosecond.
pub fn interlock_period(secs: f64) -> Result<Duration> {
    match Duration::try_from_secs_f64(secs) {
        Ok(period) if !period.is_zero() => Ok(period),
        _ => Err(ConcentratorError::Config(format!(
            "interlock period {secs}s must be a positive number of seconds"
        ))),
    }
}

fn unspecified_for(target: IpAddr) -> IpAddr {
    match target {
        IpAddr::V4(_) => IpAddr::from([0, 0, 0, 0]),
        IpAddr::V6(_) => IpAddr::from([0u16; 8]),
    }
}
