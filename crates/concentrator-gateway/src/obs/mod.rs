//! Observability: ingestion counters and the Prometheus text exposition of
//! the metric registry.

pub mod exposition;
pub mod metrics;
