//! Bounded-retry transport acquisition
//!
//! Opening the actuator link is the one place a hard failure is allowed to
//! stop the process. The controller may still be booting when the host
//! starts, so opening is retried a fixed number of times with a fixed
//! backoff before giving up.
//!
//! The sleep is injected so the retry loop stays testable and does not
//! depend on a particular clock.

use core::fmt;
use core::time::Duration;

/// Default number of open attempts
pub const DEFAULT_ATTEMPTS: u8 = 20;

/// Default pause between attempts
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(200);

/// Retry schedule for acquisition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryPolicy {
    /// Total attempts, including the first (values below 1 act as 1)
    pub attempts: u8,
    /// Pause between consecutive attempts
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// Create a retry policy
    pub const fn new(attempts: u8, backoff: Duration) -> Self {
        Self { attempts, backoff }
    }
}

/// Acquisition gave up after exhausting its attempts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquireError<E> {
    /// Attempts made
    pub attempts: u8,
    /// Error from the final attempt
    pub last_error: E,
}

impl<E: fmt::Display> fmt::Display for AcquireError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "transport unavailable after {} attempt(s): {}",
            self.attempts, self.last_error
        )
    }
}

/// Open a transport, retrying per `policy`
///
/// `open` receives the 1-based attempt number. `sleep` is called with the
/// backoff between failed attempts, never after the last one.
pub fn acquire<T, E, O, S>(policy: &RetryPolicy, mut open: O, mut sleep: S) -> Result<T, AcquireError<E>>
where
    O: FnMut(u8) -> Result<T, E>,
    S: FnMut(Duration),
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;

    loop {
        match open(attempt) {
            Ok(transport) => return Ok(transport),
            Err(e) if attempt >= attempts => {
                return Err(AcquireError {
                    attempts: attempt,
                    last_error: e,
                });
            }
            Err(_) => {
                sleep(policy.backoff);
                attempt += 1;
            }
        }
    }
}
