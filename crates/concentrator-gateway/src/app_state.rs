//! Shared application state for the concentrator gateway.
//!
//! One instance is built at startup and cloned into every port listener and
//! HTTP handler; there is no process-wide mutable state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;

use crate::config::GatewayConfig;
use crate::obs::metrics::IngestMetrics;
use crate::registry::MetricRegistry;

/// Lifecycle of one port listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerState {
    Starting,
    Listening,
    Stopped,
}

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    registry: MetricRegistry,
    metrics: IngestMetrics,
    listeners: DashMap<u16, ListenerState>,
    started_at: Instant,
}

impl AppState {
    pub fn new(cfg: GatewayConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                registry: MetricRegistry::new(),
                metrics: IngestMetrics::default(),
                listeners: DashMap::new(),
                started_at: Instant::now(),
            }),
        }
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> &MetricRegistry {
        &self.inner.registry
    }

    pub fn metrics(&self) -> &IngestMetrics {
        &self.inner.metrics
    }

    pub fn set_listener_state(&self, port: u16, state: ListenerState) {
        self.inner.listeners.insert(port, state);
    }

    /// Listener states ordered by port.
    pub fn listener_states(&self) -> Vec<(u16, ListenerState)> {
        let mut v: Vec<(u16, ListenerState)> = self
            .inner
            .listeners
            .iter()
            .map(|r| (*r.key(), *r.value()))
            .collect();
        v.sort_by_key(|(port, _)| *port);
        v
    }

    /// Ready once at least one listener exists and all of them are receiving.
    pub fn is_ready(&self) -> bool {
        !self.inner.listeners.is_empty()
            && self
                .inner
                .listeners
                .iter()
                .all(|r| *r.value() == ListenerState::Listening)
    }

    pub fn uptime(&self) -> Duration {
        self.inner.started_at.elapsed()
    }
}
