//! Signed Q22.10 fixed-point codec.
//!
//! A wire value is a 32-bit two's-complement integer whose low 10 bits are the
//! fraction. Nothing saturates: `encode` wraps modulo 2^32, so out-of-range
//! readings alias onto representable ones exactly as the field devices do.

/// Number of fractional bits.
pub const FRACTION_BITS: u32 = 10;

/// Scale factor (`1 << FRACTION_BITS`).
pub const SCALE: f64 = (1u32 << FRACTION_BITS) as f64;

/// Quantization step of the format.
pub const RESOLUTION: f64 = 1.0 / SCALE;

/// Interpret `raw` as signed 32-bit and scale it down to a reading.
pub fn decode(raw: u32) -> f64 {
    f64::from(raw as i32) / SCALE
}

/// Scale `value` up, round half to even, and wrap to 32 bits.
///
/// NaN and infinities encode to 0.
pub fn encode(value: f64) -> u32 {
    let scaled = (value * SCALE).round_ties_even();
    if !scaled.is_finite() {
        return 0;
    }
    // Exact for every integral f64: the remainder is in [0, 2^32).
    scaled.rem_euclid(4_294_967_296.0) as u32
}
