//! Q22.10 fixed-point conversion.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use rand::{rngs::StdRng, Rng, SeedableRng};

use concentrator_core::protocol::fixed::{decode, encode, RESOLUTION, SCALE};

#[test]
fn decode_reconstructs_negative_values() {
    assert_eq!(decode(0x0000_0C80), 3.125);
    assert_eq!(decode(0xFFFF_F380), -3.125);
    assert_eq!(decode(0xFFFF_FFFF), -RESOLUTION);
    assert_eq!(decode(0x7FFF_FFFF), f64::from(i32::MAX) / SCALE);
    assert_eq!(decode(0x8000_0000), -2_097_152.0);
}

#[test]
fn round_trip_stays_within_half_a_step() {
    let mut rng = StdRng::seed_from_u64(1024);
    let limit = f64::from(i32::MAX) / SCALE - 1.0;
    for _ in 0..100_000 {
        let v: f64 = rng.gen_range(-limit..limit);
        let back = decode(encode(v));
        assert!(
            (back - v).abs() <= RESOLUTION / 2.0,
            "v={v} back={back}"
        );
    }
}

#[test]
fn exact_steps_round_trip_exactly() {
    for raw in [0u32, 1, 0x0C80, 0xFFFF_F380, 0x7FFF_FFFF, 0x8000_0000] {
        assert_eq!(encode(decode(raw)), raw);
    }
}

#[test]
fn encode_rounds_half_to_even() {
    // 0.5 and 1.5 steps.
    assert_eq!(encode(0.5 / SCALE), 0);
    assert_eq!(encode(1.5 / SCALE), 2);
    assert_eq!(encode(-0.5 / SCALE), 0);
}

#[test]
fn encode_wraps_instead_of_saturating() {
    // 2^21 is one past the largest positive reading and lands on i32::MIN.
    assert_eq!(encode(2_097_152.0), 0x8000_0000);
    assert_eq!(decode(encode(2_097_152.0)), -2_097_152.0);
    // 2^22 wraps all the way to zero.
    assert_eq!(encode(4_194_304.0), 0);
    assert_eq!(encode(-1.0), 0xFFFF_FC00);
}

#[test]
fn non_finite_encodes_to_zero() {
    assert_eq!(encode(f64::NAN), 0);
    assert_eq!(encode(f64::INFINITY), 0);
    assert_eq!(encode(f64::NEG_INFINITY), 0);
}
