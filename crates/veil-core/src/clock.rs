use std::cell::Cell;
use std::rc::Rc;

use web_time::{Duration, Instant};

/// Longest delay the runtime schedules. Longer delays are clamped to it, so a
/// timer asked to wait "forever" still gets a real deadline.
pub const MAX_DELAY: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// `t + by`, with `by` clamped to [`MAX_DELAY`]. `None` only if even the
/// clamped instant is not representable.
pub(crate) fn later(t: Instant, by: Duration) -> Option<Instant> {
    t.checked_add(by.min(MAX_DELAY))
}

/// Source of "now" for a timer queue.
pub trait Clock: 'static {
    fn now(&self) -> Instant;
}

pub struct SystemClock;
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock you can drive deterministically.
///
/// Clones share the same time; `Timers::manual` keeps one so that `advance`
/// can step through deadlines.
#[derive(Clone)]
pub struct ManualClock {
    t: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(t: Instant) -> Self {
        Self {
            t: Rc::new(Cell::new(t)),
        }
    }

    /// Moves time forward. Never moves backwards.
    pub fn set(&self, t: Instant) {
        if t > self.t.get() {
            self.t.set(t);
        }
    }

    /// Moves time forward by `by`, capped at [`MAX_DELAY`].
    pub fn advance(&self, by: Duration) {
        if let Some(t) = later(self.t.get(), by) {
            self.t.set(t);
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.t.get()
    }
}
