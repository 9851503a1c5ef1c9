//! # Runtime, Timers, and Rate Limiting
//!
//! Veil runs on a single thread with a cooperative event loop. Everything that
//! happens "later" goes through one timer queue, and everything is `Rc` based.
//! There are four main pieces:
//!
//! - `Timers`: the timer queue, driven by a `Clock`.
//! - `Signal<T>`: observable value used for reactive instance state.
//! - `Dispose` / `Scope`: run-once cleanups grouped per owner.
//! - `throttle` / `debounce`: rate-limited callback wrappers.
//!
//! ## Timers
//!
//! `Timers` is a cloneable handle to a queue of one-shot callbacks. Tests drive
//! it with a `ManualClock`; applications use the system clock and pump it from
//! their event loop.
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use veil_core::*;
//!
//! let clock = ManualClock::new();
//! let timers = Timers::manual(&clock);
//!
//! let fired = Rc::new(Cell::new(false));
//! let f = fired.clone();
//! timers.set_timeout(Duration::from_millis(100), move || f.set(true));
//!
//! timers.advance(Duration::from_millis(99)).unwrap();
//! assert!(!fired.get());
//! timers.advance(Duration::from_millis(1)).unwrap();
//! assert!(fired.get());
//! ```
//!
//! ## Rate limiting
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use veil_core::*;
//!
//! let clock = ManualClock::new();
//! let timers = Timers::manual(&clock);
//!
//! let runs = Rc::new(Cell::new(0));
//! let on_resize = throttle(&timers, Duration::from_millis(100), {
//!     let runs = runs.clone();
//!     move |_size: (u32, u32)| runs.set(runs.get() + 1)
//! });
//!
//! on_resize.call((800, 600)); // runs now
//! on_resize.call((801, 600)); // trailing call at the window boundary
//! assert_eq!(runs.get(), 1);
//!
//! timers.advance(Duration::from_millis(100)).unwrap();
//! assert_eq!(runs.get(), 2);
//! ```
//!
//! ## Scopes and cleanup
//!
//! A `Scope` collects disposers and runs them once, either on `dispose()` or
//! when the last handle is dropped. Overlay instances use one scope each so
//! their timers, hooks and document nodes are released together.

pub mod animation;
pub mod clock;
pub mod effects;
pub mod error;
pub mod prelude;
pub mod ratelimit;
pub mod scope;
pub mod signal;
pub mod timer;

pub use prelude::*;
