//! # Bounded waits.
//!
//! Every call that leaves the process (registry queries, messages to a player)
//! goes through one of these helpers, so no caller is ever suspended for longer
//! than its configured deadline.
//!
//! - [`bounded`]: one attempt, cut off at `timeout`.
//! - [`await_ok`]: keep retrying until the operation succeeds or `timeout` runs out.
//!
//! ```text
//! await_ok(timeout, poll, op)
//!   loop {
//!     ├─► op() bounded by the remaining time
//!     │     ├─ Ok(v)   → return Ok(v)
//!     │     ├─ Err(e)  → remember e
//!     │     └─ hung    → return Timeout
//!     ├─► deadline passed → return last error
//!     └─► sleep(poll)
//!   }
//! ```
//!
//! Futures that miss their deadline are dropped; a late result is never observed.

use std::future::Future;
use std::time::Duration;

use tokio::time::{self, Instant};

use crate::error::PlayerError;

/// Lower bound for the retry interval, so a zero `poll` still lets the clock advance.
const MIN_POLL: Duration = Duration::from_millis(1);

/// Runs `fut` to completion or until `timeout` elapses, whichever is first.
///
/// Returns the future's own result, or [`PlayerError::Timeout`] if it did not finish in time.
pub async fn bounded<T, F>(timeout: Duration, fut: F) -> Result<T, PlayerError>
where
    F: Future<Output = Result<T, PlayerError>>,
{
    match time::timeout(timeout, fut).await {
        Ok(res) => res,
        Err(_elapsed) => Err(PlayerError::Timeout { timeout }),
    }
}

/// Retries `op` every `poll` until it succeeds, for at most `timeout` overall.
///
/// ### Outcome
/// - `Ok(v)` from the first successful attempt.
/// - The last attempt's error once the deadline has passed.
/// - [`PlayerError::Timeout`] if an attempt was still pending at the deadline.
pub async fn await_ok<T, F, Fut>(
    timeout: Duration,
    poll: Duration,
    mut op: F,
) -> Result<T, PlayerError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PlayerError>>,
{
    let deadline = Instant::now() + timeout;
    let poll = poll.max(MIN_POLL);

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let last = match time::timeout(remaining, op()).await {
            Ok(Ok(v)) => return Ok(v),
            Ok(Err(e)) => e,
            Err(_elapsed) => return Err(PlayerError::Timeout { timeout }),
        };

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(last);
        }
        time::sleep(poll.min(remaining)).await;
    }
}
