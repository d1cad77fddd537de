//! Bounded retry with exponential backoff.

use std::{thread, time::Duration};

/// Base backoff unit; attempt `n` sleeps `10ms * 2^n`.
const BACKOFF_UNIT_MS: u64 = 10;

/// Largest shift applied to the backoff unit, keeping the multiply in range.
const MAX_BACKOFF_SHIFT: u32 = 32;

/// Invoke `op` until it succeeds or the attempt budget is spent.
///
/// The operation runs at most `max_attempts + 1` times. After the n-th
/// failure (n starting at 1) the calling thread sleeps `10ms * 2^n` before
/// the next try, so delays run 20ms, 40ms, 80ms, and so on. The final error
/// is returned once the budget is exhausted.
pub fn retry_exp<T, E>(mut op: impl FnMut() -> Result<T, E>, max_attempts: u32) -> Result<T, E> {
    let mut attempt = 0u32;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) => {
                attempt += 1;
                if attempt > max_attempts {
                    return Err(err);
                }
                thread::sleep(backoff(attempt));
            }
        }
    }
}

fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(BACKOFF_UNIT_MS << attempt.min(MAX_BACKOFF_SHIFT))
}
