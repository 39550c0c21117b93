//! Fibonacci dataset generation.

use crate::errors::{PipelineError, Result};
use crate::model::{FibEntry, Parity};

/// F(92) is the largest Fibonacci value that fits a signed 64-bit SQLite INTEGER,
/// so at most 93 values (indices 0..=92) can be stored.
pub const MAX_SEQUENCE_LEN: i64 = 93;

pub const DEFAULT_SEQUENCE_LEN: i64 = 30;

/// First `n` Fibonacci values starting 0, 1, 1, 2, ... each tagged with its parity.
pub fn generate(n: i64) -> Result<Vec<FibEntry>> {
    if n <= 0 {
        return Err(PipelineError::Validation(format!(
            "sequence length must be positive, got {n}"
        )));
    }
    if n > MAX_SEQUENCE_LEN {
        return Err(PipelineError::Validation(format!(
            "sequence length {n} exceeds maximum of {MAX_SEQUENCE_LEN}"
        )));
    }

    let mut out = Vec::with_capacity(n as usize);
    let (mut a, mut b): (u64, u64) = (0, 1);
    for index in 0..n as u32 {
        out.push(FibEntry {
            index,
            value: a,
            parity: Parity::of(a),
        });
        // The final step may overflow past F(92); it is never emitted.
        let next = a.checked_add(b).unwrap_or(u64::MAX);
        a = b;
        b = next;
    }
    Ok(out)
}
