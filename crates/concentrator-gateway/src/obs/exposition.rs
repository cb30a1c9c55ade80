//! Prometheus text exposition of the registry.
//!
//! Every decoded reading lives in the single `data_concentrator_0` family and
//! is told apart only by its `identifier` and `port` labels, so a query can
//! slice by either one.

use std::fmt::Write;

use concentrator_core::protocol::packet::unix_seconds;

use crate::app_state::{AppState, ListenerState};
use crate::obs::metrics::escape_label;
use crate::registry::RegistrySnapshot;

/// Family holding every decoded reading.
pub const SERIES_FAMILY: &str = "data_concentrator_0";

/// Family holding the last INTERLOCK time per port.
pub const HEARTBEAT_FAMILY: &str = "last_interlock_assertion";

/// Prometheus text format content type.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

fn fmt_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".into()
    } else if v.is_infinite() {
        if v > 0.0 { "+Inf".into() } else { "-Inf".into() }
    } else {
        v.to_string()
    }
}

/// Render both registry families.
pub fn render_snapshot(snapshot: &RegistrySnapshot, out: &mut String) {
    let _ = writeln!(
        out,
        "# HELP {SERIES_FAMILY} Latest reading decoded from data concentrator packets"
    );
    let _ = writeln!(out, "# TYPE {SERIES_FAMILY} gauge");
    for s in &snapshot.series {
        let _ = writeln!(
            out,
            "{}{{identifier=\"{}\",port=\"{}\"}} {}",
            SERIES_FAMILY,
            escape_label(&s.identifier),
            s.source_port,
            fmt_value(s.value)
        );
    }

    let _ = writeln!(
        out,
        "# HELP {HEARTBEAT_FAMILY} Unix timestamp (ms precision) of the last INTERLOCK packet"
    );
    let _ = writeln!(out, "# TYPE {HEARTBEAT_FAMILY} gauge");
    for h in &snapshot.heartbeats {
        let _ = writeln!(
            out,
            "{}{{port=\"{}\"}} {}",
            HEARTBEAT_FAMILY,
            h.source_port,
            fmt_value(unix_seconds(h.at))
        );
    }
}

/// Render the full scrape body.
pub fn render(state: &AppState) -> String {
    let mut out = String::new();
    render_snapshot(&state.registry().snapshot(), &mut out);
    state.metrics().render_into(&mut out);

    let active = state
        .listener_states()
        .into_iter()
        .filter(|(_, s)| *s == ListenerState::Listening)
        .count();
    let _ = writeln!(
        out,
        "# HELP concentrator_listeners_active UDP listeners currently receiving"
    );
    let _ = writeln!(
        out,
        "# TYPE concentrator_listeners_active gauge\nconcentrator_listeners_active {}",
        active
    );
    out
}
