//! Datagram vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;
use std::time::{Duration, UNIX_EPOCH};

use bytes::Bytes;

use concentrator_core::protocol::{decode_datagram_at, Inbound, PROTOCOL_TAG};

use vector_loader::TestVector;

fn load(name: &str) -> TestVector {
    let path = format!("{}/tests/vectors/{name}", env!("CARGO_MANIFEST_DIR"));
    let s = fs::read_to_string(path).unwrap();
    serde_json::from_str(&s).unwrap()
}

#[test]
fn datagram_vectors() {
    let files = [
        "metric_positive.json",
        "metric_negative.json",
        "metric_extremes.json",
        "heartbeat.json",
        "bad_version.json",
        "too_short.json",
        "too_long.json",
        "interlock_lowercase.json",
        "interlock_padded.json",
        "empty.json",
    ];
    let now = UNIX_EPOCH + Duration::from_millis(1_700_000_000_123);

    for f in files {
        let v = load(f);
        let raw = v.datagram.decode();
        let res = decode_datagram_at(Bytes::from(raw), 9217, now);

        if let Some(err) = v.expect_error {
            let e = res.expect_err("expected error");
            assert_eq!(e.kind().as_str(), err.kind, "vector={}", v.description);
            continue;
        }

        let inbound = res.expect("expected ok datagram");
        let ex = v.expect.expect("missing expect block");

        if ex["heartbeat"].as_bool().unwrap() {
            let Inbound::Heartbeat(hb) = inbound else {
                panic!("expected heartbeat, vector={}", v.description);
            };
            assert_eq!(hb.source_port, 9217, "vector={}", v.description);
            assert_eq!(hb.observed_at, now, "vector={}", v.description);
            continue;
        }

        let Inbound::Metric(m) = inbound else {
            panic!("expected metric, vector={}", v.description);
        };
        assert_eq!(m.protocol, PROTOCOL_TAG, "vector={}", v.description);
        assert_eq!(m.identifier, ex["identifier"].as_str().unwrap(), "vector={}", v.description);
        assert_eq!(m.value, ex["value"].as_f64().unwrap(), "vector={}", v.description);
        assert_eq!(m.source_port, 9217, "vector={}", v.description);
    }
}
