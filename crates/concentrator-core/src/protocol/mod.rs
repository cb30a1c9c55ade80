//! Protocol modules (fixed-point values + datagram framing).
//!
//! - `fixed`: signed Q22.10 conversion between `u32` wire words and `f64`.
//! - `packet`: the 9-byte `V01` metric datagram and the `INTERLOCK` sentinel.
//!
//! Parsers are panic-free: malformed input is reported as
//! `ConcentratorError` instead of indexing raw buffers.

pub mod fixed;
pub mod packet;

pub use packet::{
    decode_datagram, decode_datagram_at, encode_packet, DecodedMetric, HeartbeatEvent, Inbound,
    HEARTBEAT_SENTINEL, PACKET_LEN, PROTOCOL_TAG,
};
