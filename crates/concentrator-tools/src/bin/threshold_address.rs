//! Print the alarm-table rows for one identifier.
//!
//! ```bash
//! threshold-address AB --lower-threshold -3.0 --upper-threshold 24.0
//! threshold-address 0x4142 --lower-threshold 0 --upper-threshold 100
//! ```

use std::process::ExitCode;

use clap::Parser;

use concentrator_core::threshold::{parse_identifier, ThresholdPair};

/// Compute lower/upper threshold addresses from the 10 most significant bits
/// of a 2-byte identifier.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Identifier: 2 ASCII chars (AB) or 4 hex digits (4142, 0x41 0x42)
    input: String,

    /// Lower threshold (narrowed to a 32-bit float)
    #[arg(long, allow_negative_numbers = true)]
    lower_threshold: f64,

    /// Upper threshold (narrowed to a 32-bit float)
    #[arg(long, allow_negative_numbers = true)]
    upper_threshold: f64,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let pair = parse_identifier(&args.input)
        .and_then(|id| ThresholdPair::new(id, args.lower_threshold, args.upper_threshold));

    match pair {
        Ok(pair) => {
            println!("{pair}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}
