//! Concentrator gateway library entry.
//!
//! Wires the UDP port listeners, the metric registry, and the scrape endpoint
//! into one ingestion stack. It is consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod config;
pub mod ingest;
pub mod obs;
pub mod ops;
pub mod registry;
pub mod router;
