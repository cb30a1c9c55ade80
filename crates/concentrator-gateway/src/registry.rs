//! Metric registry shared by every port listener.
//!
//! - `(identifier, port) -> latest reading`
//! - `port -> last INTERLOCK wall-clock time`
//!
//! Series are created on first write and never removed. Each key is written
//! under its shard lock, so a reader always sees a whole value, while
//! listeners on other shards keep writing.

use std::time::SystemTime;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Identifies one exposed series.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub identifier: String,
    pub source_port: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSample {
    pub identifier: String,
    pub source_port: u16,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeartbeatSample {
    pub source_port: u16,
    pub at: SystemTime,
}

/// Point-in-time copy of the registry, ordered by port then identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrySnapshot {
    pub series: Vec<SeriesSample>,
    pub heartbeats: Vec<HeartbeatSample>,
}

#[derive(Default)]
pub struct MetricRegistry {
    series: DashMap<SeriesKey, f64>,
    heartbeats: DashMap<u16, SystemTime>,
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self {
            series: DashMap::new(),
            heartbeats: DashMap::new(),
        }
    }

    /// Get-or-create the series and overwrite its value.
    /// Returns `true` when this call created the series.
    pub fn record_metric(&self, identifier: &str, source_port: u16, value: f64) -> bool {
        let key = SeriesKey {
            identifier: identifier.to_string(),
            source_port,
        };

        let created = match self.series.entry(key) {
            Entry::Occupied(mut e) => {
                e.insert(value);
                false
            }
            Entry::Vacant(e) => {
                e.insert(value);
                true
            }
        };

        if created {
            tracing::info!(identifier, port = source_port, "created new series");
        }
        created
    }

    pub fn record_heartbeat(&self, source_port: u16, at: SystemTime) {
        self.heartbeats.insert(source_port, at);
    }

    pub fn value(&self, identifier: &str, source_port: u16) -> Option<f64> {
        let key = SeriesKey {
            identifier: identifier.to_string(),
            source_port,
        };
        self.series.get(&key).map(|r| *r.value())
    }

    pub fn last_heartbeat(&self, source_port: u16) -> Option<SystemTime> {
        self.heartbeats.get(&source_port).map(|r| *r.value())
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    pub fn heartbeat_port_count(&self) -> usize {
        self.heartbeats.len()
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        let mut series: Vec<SeriesSample> = self
            .series
            .iter()
            .map(|r| SeriesSample {
                identifier: r.key().identifier.clone(),
                source_port: r.key().source_port,
                value: *r.value(),
            })
            .collect();
        series.sort_by(|a, b| {
            (a.source_port, &a.identifier).cmp(&(b.source_port, &b.identifier))
        });

        let mut heartbeats: Vec<HeartbeatSample> = self
            .heartbeats
            .iter()
            .map(|r| HeartbeatSample {
                source_port: *r.key(),
                at: *r.value(),
            })
            .collect();
        heartbeats.sort_by_key(|h| h.source_port);

        RegistrySnapshot { series, heartbeats }
    }
}
