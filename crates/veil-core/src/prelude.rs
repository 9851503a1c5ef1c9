pub use crate::animation::{AnimationSpec, Easing, Interpolate, Transition};
pub use crate::clock::{Clock, MAX_DELAY, ManualClock, SystemClock};
pub use crate::effects::{Dispose, on_unmount};
pub use crate::error::*;
pub use crate::ratelimit::{Debounce, Throttle, debounce, throttle};
pub use crate::scope::Scope;
pub use crate::signal::{Signal, SubId, signal};
pub use crate::timer::{TimerId, Timers};
pub use web_time::{Duration, Instant};
