//! Threshold-address calculator for the concentrator's alarm table.
//!
//! A device keeps one lower and one upper threshold per identifier. The table
//! is addressed by the 10 most significant bits of the 2-byte identifier with
//! one extra low bit selecting lower (0) or upper (1). Thresholds are stored
//! as Q22.10 words, after being narrowed to single precision the way the
//! device firmware receives them.

use std::fmt;

use crate::error::{ConcentratorError, Result};
use crate::protocol::fixed;

/// One row of the threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdEntry {
    pub address: u16,
    pub raw: u32,
}

impl ThresholdEntry {
    /// The threshold as the device will interpret it.
    pub fn value(&self) -> f64 {
        fixed::decode(self.raw)
    }

    /// VHDL-style hex literal, e.g. `x"00006000"`.
    pub fn hex_literal(&self) -> String {
        format!("x\"{:08X}\"", self.raw)
    }
}

/// Lower/upper rows for one identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdPair {
    pub lower: ThresholdEntry,
    pub upper: ThresholdEntry,
}

impl ThresholdPair {
    /// Fails when either threshold is NaN, infinite, or outside the f32 range.
    pub fn new(identifier: u16, lower: f64, upper: f64) -> Result<Self> {
        let msb10 = (identifier >> 6) & 0x3FF;
        Ok(Self {
            lower: ThresholdEntry {
                address: msb10 << 1,
                raw: fixed::encode(narrow("lower", lower)?),
            },
            upper: ThresholdEntry {
                address: (msb10 << 1) | 1,
                raw: fixed::encode(narrow("upper", upper)?),
            },
        })
    }
}

impl fmt::Display for ThresholdPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "lower threshold is: {:.4}", self.lower.value())?;
        writeln!(f, "upper threshold is: {:.4}", self.upper.value())?;
        writeln!(f, "{} => {},", self.lower.address, self.lower.hex_literal())?;
        write!(f, "{} => {},", self.upper.address, self.upper.hex_literal())
    }
}

fn narrow(which: &str, value: f64) -> Result<f64> {
    let single = value as f32;
    if !value.is_finite() || single.is_infinite() {
        return Err(ConcentratorError::Config(format!(
            "{which} threshold {value} is not representable as a 32-bit float"
        )));
    }
    Ok(f64::from(single))
}

/// Parse an identifier given as 2 ASCII characters (`AB`) or 4 hex digits
/// (`4142`, `0x4142`, `0x41 0x42`, `\x41\x42`).
pub fn parse_identifier(input: &str) -> Result<u16> {
    let s: String = input
        .replace("0x", "")
        .replace("\\x", "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let chars: Vec<char> = s.chars().collect();
    if let [a, b] = chars[..] {
        if let (Ok(hi), Ok(lo)) = (u8::try_from(a), u8::try_from(b)) {
            return Ok(u16::from_be_bytes([hi, lo]));
        }
    }

    if s.len() == 4 && s.is_ascii() {
        if let (Ok(hi), Ok(lo)) = (
            u8::from_str_radix(&s[..2], 16),
            u8::from_str_radix(&s[2..], 16),
        ) {
            return Ok(u16::from_be_bytes([hi, lo]));
        }
    }

    Err(ConcentratorError::Config(
        "input must be 2 ASCII chars or 4 hex digits".into(),
    ))
}
