//! Rate-limited callbacks.
//!
//! `throttle` runs at most once per interval and keeps the latest arguments
//! for a trailing run at the window boundary. `debounce` runs once the calls
//! stop for `wait`. Both forward the argument value untouched; bundle several
//! arguments in a tuple. Whatever the callback captured is its receiver.
//!
//! Handles are cheap clones of one shared state. Dropping the last handle
//! cancels a pending run.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use web_time::{Duration, Instant};

use crate::timer::{TimerId, Timers};

struct Trailing<A> {
    timer: TimerId,
    args: A,
}

struct ThrottleState<A> {
    last_ran: Option<Instant>,
    trailing: Option<Trailing<A>>,
}

struct ThrottleInner<A: 'static> {
    timers: Timers,
    interval: Duration,
    callback: Rc<dyn Fn(A)>,
    state: RefCell<ThrottleState<A>>,
}

/// Handle returned by [`throttle`].
pub struct Throttle<A: 'static> {
    inner: Rc<ThrottleInner<A>>,
}

impl<A: 'static> Clone for Throttle<A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Wraps `f` so it runs at most once per `interval`.
///
/// The first call after an idle period runs immediately. Calls inside the
/// window replace one pending trailing run, due `interval` after the last run.
/// A zero interval runs every call.
pub fn throttle<A: 'static>(
    timers: &Timers,
    interval: Duration,
    f: impl Fn(A) + 'static,
) -> Throttle<A> {
    Throttle {
        inner: Rc::new(ThrottleInner {
            timers: timers.clone(),
            interval,
            callback: Rc::new(f),
            state: RefCell::new(ThrottleState {
                last_ran: None,
                trailing: None,
            }),
        }),
    }
}

impl<A: 'static> Throttle<A> {
    pub fn call(&self, args: A) {
        let inner = &self.inner;
        let now = inner.timers.now();
        let mut st = inner.state.borrow_mut();

        let idle = match st.last_ran {
            None => true,
            Some(last) => {
                now.saturating_duration_since(last) >= inner.interval && st.trailing.is_none()
            }
        };
        if inner.interval.is_zero() || idle {
            st.last_ran = Some(now);
            drop(st);
            (inner.callback)(args);
            return;
        }

        if let Some(prev) = st.trailing.take() {
            inner.timers.clear(prev.timer);
        }
        let elapsed = st
            .last_ran
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        let delay = inner.interval.saturating_sub(elapsed);
        log::trace!("throttle: trailing run due in {delay:?}");
        let weak: Weak<ThrottleInner<A>> = Rc::downgrade(inner);
        let timer = inner.timers.set_timeout(delay, move || {
            if let Some(inner) = weak.upgrade() {
                inner.fire_trailing();
            }
        });
        st.trailing = Some(Trailing { timer, args });
    }

    /// Drops the pending trailing run, if any.
    pub fn cancel(&self) {
        let trailing = self.inner.state.borrow_mut().trailing.take();
        if let Some(t) = trailing {
            self.inner.timers.clear(t.timer);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.inner.state.borrow().trailing.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.inner.interval
    }
}

impl<A: 'static> ThrottleInner<A> {
    /// Runs the pending trailing call. Its timer is due exactly at the end of
    /// the window opened by the last run, and only this method or an idle
    /// `call` (which needs no trailing run pending) moves `last_ran`.
    fn fire_trailing(&self) {
        let mut st = self.state.borrow_mut();
        let Some(trailing) = st.trailing.take() else {
            return;
        };
        st.last_ran = Some(self.timers.now());
        drop(st);
        (self.callback)(trailing.args);
    }
}

impl<A: 'static> Drop for ThrottleInner<A> {
    fn drop(&mut self) {
        if let Some(t) = self.state.get_mut().trailing.take() {
            self.timers.clear(t.timer);
        }
    }
}

struct DebounceInner<A: 'static> {
    timers: Timers,
    wait: Duration,
    callback: Rc<dyn Fn(A)>,
    pending: RefCell<Option<Trailing<A>>>,
}

/// Handle returned by [`debounce`].
pub struct Debounce<A: 'static> {
    inner: Rc<DebounceInner<A>>,
}

impl<A: 'static> Clone for Debounce<A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Wraps `f` so it runs once `wait` has passed without another call, with the
/// arguments of the last call.
pub fn debounce<A: 'static>(timers: &Timers, wait: Duration, f: impl Fn(A) + 'static) -> Debounce<A> {
    Debounce {
        inner: Rc::new(DebounceInner {
            timers: timers.clone(),
            wait,
            callback: Rc::new(f),
            pending: RefCell::new(None),
        }),
    }
}

impl<A: 'static> Debounce<A> {
    pub fn call(&self, args: A) {
        let inner = &self.inner;
        let mut pending = inner.pending.borrow_mut();
        if let Some(prev) = pending.take() {
            inner.timers.clear(prev.timer);
        }
        let weak: Weak<DebounceInner<A>> = Rc::downgrade(inner);
        let timer = inner.timers.set_timeout(inner.wait, move || {
            if let Some(inner) = weak.upgrade() {
                inner.fire();
            }
        });
        *pending = Some(Trailing { timer, args });
    }

    /// Drops the pending run, if any.
    pub fn cancel(&self) {
        let pending = self.inner.pending.borrow_mut().take();
        if let Some(p) = pending {
            self.inner.timers.clear(p.timer);
        }
    }

    /// Runs the pending call now instead of waiting. Returns whether one ran.
    pub fn flush(&self) -> bool {
        let pending = self.inner.pending.borrow_mut().take();
        match pending {
            Some(p) => {
                self.inner.timers.clear(p.timer);
                (self.inner.callback)(p.args);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.inner.pending.borrow().is_some()
    }

    pub fn wait(&self) -> Duration {
        self.inner.wait
    }
}

impl<A: 'static> DebounceInner<A> {
    fn fire(&self) {
        let pending = self.pending.borrow_mut().take();
        if let Some(p) = pending {
            (self.callback)(p.args);
        }
    }
}

impl<A: 'static> Drop for DebounceInner<A> {
    fn drop(&mut self) {
        if let Some(p) = self.pending.get_mut().take() {
            self.timers.clear(p.timer);
        }
    }
}
