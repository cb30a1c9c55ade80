//! Concentrator core: wire contracts for data-concentrator telemetry.
//!
//! This crate defines the packet format, the Q22.10 fixed-point codec, and the
//! error surface shared by the gateway and the peer tooling. It carries no
//! transport or runtime dependencies so decoding stays a pure function of the
//! received bytes.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! A datagram from a hostile sender must surface as `ConcentratorError`, never
//! as a crashed listener.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;
pub mod threshold;

/// Shared result type.
pub use error::{ConcentratorError, ErrorKind, Result};
