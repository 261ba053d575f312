//! Wall-clock access behind a trait so time-dependent logic stays testable.

use chrono::{DateTime, Local, TimeZone};

/// Source of wall-clock time for timers and delayed starts.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;

    /// Current local time; minute-of-hour alignment happens in local time.
    fn now_local(&self) -> DateTime<Local>;
}

/// The real system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }

    fn now_local(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Hand-driven clock for tests. `now_local` is derived from the same
/// millisecond counter, so tick deadlines and minute-of-hour alignment see a
/// single consistent instant.
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: std::sync::atomic::AtomicU64,
}

impl ManualClock {
    pub fn new(start_millis: u64) -> Self {
        Self {
            millis: std::sync::atomic::AtomicU64::new(start_millis),
        }
    }

    pub fn set(&self, millis: u64) {
        self.millis.store(millis, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn advance(&self, millis: u64) {
        self.millis.fetch_add(millis, std::sync::atomic::Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.millis.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn now_local(&self) -> DateTime<Local> {
        Local
            .timestamp_millis_opt(self.now_millis() as i64)
            .single()
            .unwrap_or_else(Local::now)
    }
}
