//! One-shot timer queue for the single-threaded event loop.
//!
//! Timers fire in deadline order; timers sharing a deadline fire in the order
//! they were scheduled. Callbacks run with no borrow held on the queue, so they
//! may schedule or clear other timers, including themselves.

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};
use web_time::{Duration, Instant};

use crate::clock::{Clock, ManualClock, SystemClock, later};
use crate::error::TimerError;

new_key_type! {
    pub struct TimerId;
}

struct Entry {
    deadline: Instant,
    seq: u64,
    task: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct Queue {
    entries: SlotMap<TimerId, Entry>,
    next_seq: u64,
}

impl Queue {
    fn earliest(&self) -> Option<(TimerId, Instant)> {
        self.entries
            .iter()
            .min_by_key(|(_, e)| (e.deadline, e.seq))
            .map(|(id, e)| (id, e.deadline))
    }

    fn pop_due(&mut self, limit: Instant) -> Option<(Instant, Box<dyn FnOnce()>)> {
        let (id, deadline) = self.earliest()?;
        if deadline > limit {
            return None;
        }
        self.entries.remove(id).map(|e| (e.deadline, e.task))
    }
}

/// Cloneable handle to the timer queue.
#[derive(Clone)]
pub struct Timers {
    queue: Rc<RefCell<Queue>>,
    clock: Rc<dyn Clock>,
    manual: Option<ManualClock>,
}

impl Timers {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            queue: Rc::new(RefCell::new(Queue::default())),
            clock,
            manual: None,
        }
    }

    pub fn system() -> Self {
        Self::new(Rc::new(SystemClock))
    }

    /// Timers driven by `clock`; enables `advance`.
    pub fn manual(clock: &ManualClock) -> Self {
        Self {
            queue: Rc::new(RefCell::new(Queue::default())),
            clock: Rc::new(clock.clone()),
            manual: Some(clock.clone()),
        }
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Schedules `f` after `delay`. Delays past [`MAX_DELAY`] are clamped to
    /// it. If no deadline can be represented at all the timer is dropped and
    /// the returned id is never scheduled.
    ///
    /// [`MAX_DELAY`]: crate::clock::MAX_DELAY
    pub fn set_timeout(&self, delay: Duration, f: impl FnOnce() + 'static) -> TimerId {
        let Some(deadline) = later(self.now(), delay) else {
            log::warn!("timer delay {delay:?} is out of range; not scheduled");
            return TimerId::default();
        };
        let mut q = self.queue.borrow_mut();
        let seq = q.next_seq;
        q.next_seq += 1;
        let id = q.entries.insert(Entry {
            deadline,
            seq,
            task: Box::new(f),
        });
        log::trace!("timer {id:?} scheduled in {delay:?}");
        id
    }

    /// Cancels a pending timer. Clearing a fired or unknown id is a no-op.
    pub fn clear(&self, id: TimerId) -> bool {
        self.queue.borrow_mut().entries.remove(id).is_some()
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.queue.borrow().entries.contains_key(id)
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().entries.len()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue.borrow().earliest().map(|(_, d)| d)
    }

    /// Fires every timer that is due now, including ones scheduled by earlier
    /// callbacks in this pass if they are also due. Returns how many fired.
    pub fn run_due(&self) -> usize {
        let now = self.now();
        let mut fired = 0;
        loop {
            let next = self.queue.borrow_mut().pop_due(now);
            let Some((_, task)) = next else { break };
            task();
            fired += 1;
        }
        fired
    }

    /// Steps a manual clock forward by `by`, stopping at each deadline on the
    /// way so callbacks observe the time they were scheduled for.
    pub fn advance(&self, by: Duration) -> Result<usize, TimerError> {
        let clock = self.manual.as_ref().ok_or(TimerError::NotManual)?;
        let Some(target) = later(clock.now(), by) else {
            return Ok(0);
        };
        let mut fired = 0;
        loop {
            let next = self.queue.borrow_mut().pop_due(target);
            let Some((deadline, task)) = next else { break };
            clock.set(deadline);
            task();
            fired += 1;
        }
        clock.set(target);
        Ok(fired)
    }

    /// Runs until the queue is empty. On a manual clock this jumps straight to
    /// each deadline; on the system clock it sleeps the calling thread.
    pub fn run_until_idle(&self) -> usize {
        let mut fired = 0;
        loop {
            fired += self.run_due();
            let Some(deadline) = self.next_deadline() else {
                return fired;
            };
            let wait = deadline.saturating_duration_since(self.now());
            match &self.manual {
                Some(clock) => clock.advance(wait),
                None => std::thread::sleep(wait),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MAX_DELAY;
    use std::cell::RefCell;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn fires_in_deadline_then_schedule_order() {
        let clock = ManualClock::new();
        let timers = Timers::manual(&clock);
        let log = Rc::new(RefCell::new(Vec::new()));

        for (name, delay) in [("b", 20), ("a", 10), ("c", 20)] {
            let log = log.clone();
            timers.set_timeout(ms(delay), move || log.borrow_mut().push(name));
        }

        assert_eq!(timers.advance(ms(50)), Ok(3));
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn callbacks_see_their_own_deadline() {
        let clock = ManualClock::new();
        let start = clock.now();
        let timers = Timers::manual(&clock);
        let seen = Rc::new(RefCell::new(None));

        let s = seen.clone();
        let c = clock.clone();
        timers.set_timeout(ms(30), move || *s.borrow_mut() = Some(c.now()));
        timers.advance(ms(100)).unwrap();

        assert_eq!(*seen.borrow(), Some(start + ms(30)));
        assert_eq!(clock.now(), start + ms(100));
    }

    #[test]
    fn cleared_timer_never_fires() {
        let clock = ManualClock::new();
        let timers = Timers::manual(&clock);
        let fired = Rc::new(RefCell::new(false));

        let f = fired.clone();
        let id = timers.set_timeout(ms(10), move || *f.borrow_mut() = true);
        assert!(timers.is_scheduled(id));
        assert!(timers.clear(id));
        assert!(!timers.clear(id));

        timers.advance(ms(20)).unwrap();
        assert!(!*fired.borrow());
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn callbacks_can_schedule_more_work() {
        let clock = ManualClock::new();
        let timers = Timers::manual(&clock);
        let count = Rc::new(RefCell::new(0));

        let t = timers.clone();
        let c = count.clone();
        timers.set_timeout(ms(10), move || {
            *c.borrow_mut() += 1;
            let c = c.clone();
            t.set_timeout(ms(10), move || *c.borrow_mut() += 1);
        });

        timers.advance(ms(15)).unwrap();
        assert_eq!(*count.borrow(), 1);
        timers.advance(ms(5)).unwrap();
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn run_until_idle_drains_manual_queue() {
        let clock = ManualClock::new();
        let start = clock.now();
        let timers = Timers::manual(&clock);
        timers.set_timeout(ms(500), || {});
        timers.set_timeout(ms(1500), || {});

        assert_eq!(timers.run_until_idle(), 2);
        assert_eq!(clock.now(), start + ms(1500));
    }

    #[test]
    fn huge_delays_are_clamped_instead_of_overflowing() {
        let clock = ManualClock::new();
        let start = clock.now();
        let timers = Timers::manual(&clock);
        let fired = Rc::new(RefCell::new(false));

        let f = fired.clone();
        let id = timers.set_timeout(Duration::MAX, move || *f.borrow_mut() = true);
        assert!(timers.is_scheduled(id));
        assert_eq!(timers.next_deadline(), Some(start + MAX_DELAY));

        timers.advance(Duration::from_secs(24 * 60 * 60)).unwrap();
        assert!(!*fired.borrow());
        assert!(timers.clear(id));
    }

    #[test]
    fn advance_requires_manual_clock() {
        let timers = Timers::system();
        assert_eq!(timers.advance(ms(1)), Err(TimerError::NotManual));
    }
}
