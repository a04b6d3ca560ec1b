//! State shared between the sample clock (interrupt priority) and the
//! acquisition loop (thread mode).
//!
//! The only thing crossing that boundary is one flag. The clock side
//! raises it; the acquisition side clears it with a single atomic swap, so
//! a firing can never be observed twice or lost between test and clear.

use embassy_futures::yield_now;
use portable_atomic::{AtomicBool, AtomicU32, Ordering};

#[cfg(feature = "firmware")]
use {
    crate::acquisition::CycleOutcome,
    crate::config::TELEMETRY_CHANNEL_SIZE,
    embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex as RawMutex, channel::Channel},
    embassy_time::Instant,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "firmware", derive(defmt::Format))]
pub enum ClockState {
    /// Flag clear, timer counting.
    Idle,
    /// Flag set, waiting for the acquisition loop.
    Due,
}

/// One-slot "sample due" signal. Firings that arrive while a previous one is
/// still pending are merged, never queued.
pub struct SampleDue {
    due: AtomicBool,
    coalesced: AtomicU32,
}

impl SampleDue {
    pub const fn new() -> Self {
        Self {
            due: AtomicBool::new(false),
            coalesced: AtomicU32::new(0),
        }
    }

    /// Timer side. Lock-free and returns immediately. Returns `true` if the
    /// previous firing had not been consumed yet.
    pub fn raise(&self) -> bool {
        let was_due = self.due.swap(true, Ordering::Release);
        if was_due {
            self.coalesced.fetch_add(1, Ordering::Relaxed);
        }
        was_due
    }

    /// Acquisition side. Observes and clears the flag in one step.
    pub fn take(&self) -> bool {
        self.due.swap(false, Ordering::Acquire)
    }

    /// Spins, yielding to other tasks, until a firing is taken.
    pub async fn wait(&self) {
        while !self.take() {
            yield_now().await;
        }
    }

    pub fn state(&self) -> ClockState {
        if self.due.load(Ordering::Acquire) {
            ClockState::Due
        } else {
            ClockState::Idle
        }
    }

    /// Firings merged into an already pending one since start-up.
    pub fn coalesced(&self) -> u32 {
        self.coalesced.load(Ordering::Relaxed)
    }
}

impl Default for SampleDue {
    fn default() -> Self {
        Self::new()
    }
}

pub static SAMPLE_DUE: SampleDue = SampleDue::new();

/* telemetry channel: per-cycle outcome plus debug-link write errors so far */
#[cfg(feature = "firmware")]
pub static TELEMETRY_CH: Channel<RawMutex, (Instant, CycleOutcome, u32), TELEMETRY_CHANNEL_SIZE> =
    Channel::new();
