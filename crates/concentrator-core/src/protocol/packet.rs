//! Data-concentrator datagram parsing (panic-free).
//!
//! Wire format, big-endian:
//!
//! | offset | size | field |
//! |---|---|---|
//! | 0 | 3 | protocol tag, ASCII `V01` |
//! | 3 | 2 | identifier, surfaced as 4-char lowercase hex |
//! | 5 | 4 | value, signed Q22.10 |
//!
//! A datagram that is exactly `INTERLOCK` is a heartbeat and bypasses the
//! 9-byte format entirely.
//!
//! Fields are read through `Buf` only after the exact length check, so no
//! input can index out of bounds.

use std::time::{SystemTime, UNIX_EPOCH};

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{ConcentratorError, Result};
use crate::protocol::fixed;

/// Heartbeat sentinel, compared against the whole datagram.
pub const HEARTBEAT_SENTINEL: &[u8] = b"INTERLOCK";

/// The only accepted protocol tag.
pub const PROTOCOL_TAG: [u8; 3] = *b"V01";

/// Fixed metric datagram length (3 + 2 + 4).
pub const PACKET_LEN: usize = 9;

/// Decoded metric datagram.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMetric {
    /// Protocol tag (always `V01` once decoded).
    pub protocol: [u8; 3],
    /// Identifier as 4 lowercase hex characters (e.g. `"0065"`).
    pub identifier: String,
    /// Reading after fixed-point conversion.
    pub value: f64,
    /// UDP port the datagram arrived on.
    pub source_port: u16,
}

/// INTERLOCK heartbeat observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeartbeatEvent {
    pub source_port: u16,
    pub observed_at: SystemTime,
}

impl HeartbeatEvent {
    /// Seconds since the Unix epoch, sub-second precision kept.
    pub fn unix_seconds(&self) -> f64 {
        unix_seconds(self.observed_at)
    }
}

/// Convert a wall-clock time into fractional seconds since the epoch.
/// Times before the epoch come out negative.
pub fn unix_seconds(t: SystemTime) -> f64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs_f64(),
        Err(e) => -e.duration().as_secs_f64(),
    }
}

/// A successfully classified datagram.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Metric(DecodedMetric),
    Heartbeat(HeartbeatEvent),
}

/// Decode a datagram received on `source_port`, stamping heartbeats with now.
pub fn decode_datagram(buf: Bytes, source_port: u16) -> Result<Inbound> {
    decode_datagram_at(buf, source_port, SystemTime::now())
}

/// Decode a datagram, stamping heartbeats with `now`.
pub fn decode_datagram_at(mut buf: Bytes, source_port: u16, now: SystemTime) -> Result<Inbound> {
    if buf.as_ref() == HEARTBEAT_SENTINEL {
        return Ok(Inbound::Heartbeat(HeartbeatEvent {
            source_port,
            observed_at: now,
        }));
    }

    if buf.remaining() != PACKET_LEN {
        return Err(ConcentratorError::BadLength {
            len: buf.remaining(),
        });
    }

    let mut protocol = [0u8; 3];
    buf.copy_to_slice(&mut protocol);
    if protocol != PROTOCOL_TAG {
        return Err(ConcentratorError::BadProtocolVersion { tag: protocol });
    }

    let identifier = format!("{:04x}", buf.get_u16());
    let value = fixed::decode(buf.get_u32());

    Ok(Inbound::Metric(DecodedMetric {
        protocol,
        identifier,
        value,
        source_port,
    }))
}

/// Build a `V01` datagram the way a data concentrator would.
pub fn encode_packet(identifier: u16, value: f64) -> Bytes {
    let mut out = BytesMut::with_capacity(PACKET_LEN);
    out.put_slice(&PROTOCOL_TAG);
    out.put_u16(identifier);
    out.put_u32(fixed::encode(value));
    out.freeze()
}
