use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of blocks creation time.
pub trait Clock: Debug + Send + Sync {
    /// Current UTC time in milliseconds.
    fn now(&self) -> u64;
}

/// Wall-clock time.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> u64 {
        // Clamp pre-epoch clocks to zero.
        u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
    }
}

/// Manually driven clock.
///
/// Useful to get reproducible blocks hashes.
#[derive(Debug, Default)]
pub struct ManualClock {
    time: AtomicU64
}

impl ManualClock {
    #[inline]
    pub fn new(time: u64) -> Self {
        Self {
            time: AtomicU64::new(time)
        }
    }

    #[inline]
    pub fn set(&self, time: u64) {
        self.time.store(time, Ordering::Release);
    }

    /// Move the clock forward and return the new time.
    #[inline]
    pub fn advance(&self, millis: u64) -> u64 {
        self.time.fetch_add(millis, Ordering::AcqRel) + millis
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> u64 {
        self.time.load(Ordering::Acquire)
    }
}
