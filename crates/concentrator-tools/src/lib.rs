//! Peer tooling for the concentrator gateway.
//!
//! The binaries stand in for field devices: `device-sim` emits `V01` readings
//! and `INTERLOCK` heartbeats, `threshold-address` prints alarm-table rows.

pub mod sim;
