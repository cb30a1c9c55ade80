#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use concentrator_core::threshold::{parse_identifier, ThresholdPair};
use concentrator_core::ErrorKind;

#[test]
fn identifier_input_forms() {
    assert_eq!(parse_identifier("AB").unwrap(), 0x4142);
    assert_eq!(parse_identifier("4142").unwrap(), 0x4142);
    assert_eq!(parse_identifier("0x4142").unwrap(), 0x4142);
    assert_eq!(parse_identifier("0x41 0x42").unwrap(), 0x4142);
    assert_eq!(parse_identifier("\\x41\\x42").unwrap(), 0x4142);
    // Two characters always mean raw ASCII, even if they look like hex.
    assert_eq!(parse_identifier("41").unwrap(), 0x3431);
}

#[test]
fn identifier_rejects_other_shapes() {
    for bad in ["", "A", "ABC", "zzzz", "414243", "\u{0101}A"] {
        let err = parse_identifier(bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config, "input={bad:?}");
    }
}

#[test]
fn addresses_use_top_ten_bits() {
    let pair = ThresholdPair::new(0x4142, -3.0, 24.0).unwrap();
    // 0x4142 >> 6 = 0x105
    assert_eq!(pair.lower.address, 0x105 << 1);
    assert_eq!(pair.upper.address, (0x105 << 1) | 1);
    assert_eq!(pair.lower.raw, 0xFFFF_F400);
    assert_eq!(pair.upper.raw, 0x0000_6000);

    let pair = ThresholdPair::new(0xFFFF, 0.0, 0.0).unwrap();
    assert_eq!(pair.lower.address, 2046);
    assert_eq!(pair.upper.address, 2047);
}

#[test]
fn thresholds_are_narrowed_to_single_precision() {
    // 0.1 as f32 is 0.100000001490116..., still 102.4 steps -> 102.
    let pair = ThresholdPair::new(0, 0.1, 1e9).unwrap();
    assert_eq!(pair.lower.raw, 102);
    // 1e9 is exact in f32; out of range, so it wraps.
    assert_eq!(pair.upper.raw, ((1e9f64 * 1024.0) as u64 % (1u64 << 32)) as u32);
}

#[test]
fn report_lines() {
    let pair = ThresholdPair::new(0x4142, -3.0, 24.0).unwrap();
    let report = pair.to_string();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(
        lines,
        [
            "lower threshold is: -3.0000",
            "upper threshold is: 24.0000",
            "522 => x\"FFFFF400\",",
            "523 => x\"00006000\",",
        ]
    );
}

#[test]
fn thresholds_outside_single_precision_are_rejected() {
    for (lower, upper) in [
        (-3.0, 1e39),
        (-1e39, 24.0),
        (f64::NAN, 24.0),
        (-3.0, f64::INFINITY),
        (f64::NEG_INFINITY, 24.0),
    ] {
        let err = ThresholdPair::new(0x4142, lower, upper).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config, "lower={lower} upper={upper}");
    }

    let err = ThresholdPair::new(0x4142, -3.0, 1e39).unwrap_err();
    assert!(err.to_string().contains("upper threshold"), "{err}");

    // f32::MAX itself is finite and still accepted
    assert!(ThresholdPair::new(0x4142, -3.0, f64::from(f32::MAX)).is_ok());
}
