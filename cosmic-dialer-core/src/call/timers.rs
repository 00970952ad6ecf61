//! Call timing constants and cancelable timer handles

use std::time::Duration;
use tokio::task::JoinHandle;

/// How long a call may stay in `Connecting` before it fails
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(60);

/// How long the failure message stays on screen
pub const FAILURE_DISPLAY_DELAY: Duration = Duration::from_secs(3);

/// Delay between hang-up and leaving the call screen with native audio
pub const END_DELAY_NATIVE: Duration = Duration::from_secs(2);

/// Delay between hang-up and leaving the call screen without native audio
pub const END_DELAY_FALLBACK: Duration = Duration::from_secs(5);

/// Call clock resolution
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Timing parameters of a call session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallTimings {
    pub connect_timeout: Duration,
    pub failure_display: Duration,
    pub end_delay_native: Duration,
    pub end_delay_fallback: Duration,
    pub tick_interval: Duration,
}

impl Default for CallTimings {
    fn default() -> Self {
        Self {
            connect_timeout: CONNECT_TIMEOUT,
            failure_display: FAILURE_DISPLAY_DELAY,
            end_delay_native: END_DELAY_NATIVE,
            end_delay_fallback: END_DELAY_FALLBACK,
            tick_interval: TICK_INTERVAL,
        }
    }
}

impl CallTimings {
    /// Hang-up display delay for the given audio capability
    pub fn end_delay(&self, native_audio: bool) -> Duration {
        if native_audio {
            self.end_delay_native
        } else {
            self.end_delay_fallback
        }
    }
}

/// Timers started by a call session, one slot per purpose
///
/// A state that starts a timer stores its handle here; leaving that state
/// cancels exactly that slot. A task that is itself finishing a transition
/// detaches its own handle instead of aborting it.
#[derive(Debug, Default)]
pub(crate) struct CallTimers {
    /// Started on entering `Connecting`
    pub connect_timeout: Option<JoinHandle<()>>,
    /// Ringback and ring simulation, started on entering `Connecting`
    pub establish: Option<JoinHandle<()>>,
    /// Per-second clock, started on entering `Active`
    pub clock: Option<JoinHandle<()>>,
    /// Delayed return to the contact list, started on `Ending` or `Failed`
    pub exit: Option<JoinHandle<()>>,
}

impl CallTimers {
    pub fn cancel_connect_timeout(&mut self) {
        cancel(&mut self.connect_timeout);
    }

    pub fn cancel_establish(&mut self) {
        cancel(&mut self.establish);
    }

    pub fn cancel_clock(&mut self) {
        cancel(&mut self.clock);
    }

    pub fn cancel_all(&mut self) {
        cancel(&mut self.connect_timeout);
        cancel(&mut self.establish);
        cancel(&mut self.clock);
        cancel(&mut self.exit);
    }
}

fn cancel(slot: &mut Option<JoinHandle<()>>) {
    if let Some(handle) = slot.take() {
        handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timings() {
        let timings = CallTimings::default();
        assert_eq!(timings.connect_timeout, Duration::from_secs(60));
        assert_eq!(timings.failure_display, Duration::from_secs(3));
        assert_eq!(timings.end_delay(true), Duration::from_secs(2));
        assert_eq!(timings.end_delay(false), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_cancel_aborts_task() {
        let mut timers = CallTimers::default();
        let handle = tokio::spawn(std::future::pending::<()>());
        timers.clock = Some(handle);

        timers.cancel_all();
        assert!(timers.clock.is_none());
    }
}
