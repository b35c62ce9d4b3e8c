//! Due-for-reporting gate: opt-out check plus a once-per-day throttle.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

/// Minimum spacing between report attempts, in hours.
const REPORT_INTERVAL_HOURS: i64 = 24;

/// Wall-clock source, injectable so tests control time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Decides whether a usage report should be produced now.
///
/// At most one call per rolling 24-hour window returns true. The throttle
/// timestamp commits on the due path, before the caller actually produces a
/// report; a later pipeline failure does not roll it back, so a failed
/// attempt simply waits for the next window.
pub struct ReportingGate {
    clock: Arc<dyn Clock>,
    /// Time of the last due signal; `None` until the first one.
    last_attempt: Mutex<Option<DateTime<Utc>>>,
}

impl ReportingGate {
    /// Create a gate on the system clock that has never signaled.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a gate on a specific clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last_attempt: Mutex::new(None),
        }
    }

    /// Returns true if it is time to produce a report.
    ///
    /// While collection is disabled this returns false without touching the
    /// throttle, so the interval clock does not advance while opted out.
    /// The check-then-set runs under the lock; concurrent callers observe at
    /// most one true per window.
    pub fn is_due(&self, collection_enabled: bool) -> bool {
        if !collection_enabled {
            return false;
        }

        let now = self.clock.now();
        let mut last = self
            .last_attempt
            .lock()
            .expect("reporting gate lock poisoned");
        let due = match *last {
            None => true,
            Some(at) => now - at > Duration::hours(REPORT_INTERVAL_HOURS),
        };
        if due {
            *last = Some(now);
        }
        due
    }
}

impl Default for ReportingGate {
    fn default() -> Self {
        Self::new()
    }
}
