use web_time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    pub fn interpolate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationSpec {
    pub duration: Duration,
    pub easing: Easing,
    pub delay: Duration,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(300),
            easing: Easing::EaseInOut,
            delay: Duration::ZERO,
        }
    }
}

impl AnimationSpec {
    pub fn tween(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            easing,
            delay: Duration::ZERO,
        }
    }

    /// No animation at all; exit transitions complete on the next timer tick.
    pub fn instant() -> Self {
        Self::tween(Duration::ZERO, Easing::Linear)
    }

    /// Delay plus duration: how long after start the transition is done.
    pub fn total(&self) -> Duration {
        self.delay.saturating_add(self.duration)
    }
}

pub trait Interpolate {
    fn interpolate(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

/// A one-way transition between two values, sampled against a timestamp.
///
/// Overlays use it for the exit fade: the owner starts it when the instance
/// closes and samples `value_at` while rendering.
#[derive(Clone, Debug)]
pub struct Transition<T: Interpolate + Clone> {
    from: T,
    to: T,
    spec: AnimationSpec,
    start_time: Option<Instant>,
}

impl<T: Interpolate + Clone> Transition<T> {
    pub fn new(from: T, to: T, spec: AnimationSpec) -> Self {
        Self {
            from,
            to,
            spec,
            start_time: None,
        }
    }

    pub fn start(&mut self, now: Instant) {
        if self.start_time.is_none() {
            self.start_time = Some(now);
        }
    }

    pub fn spec(&self) -> &AnimationSpec {
        &self.spec
    }

    pub fn is_started(&self) -> bool {
        self.start_time.is_some()
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        match self.start_time {
            Some(start) => now.saturating_duration_since(start) >= self.spec.total(),
            None => false,
        }
    }

    pub fn value_at(&self, now: Instant) -> T {
        let Some(start) = self.start_time else {
            return self.from.clone();
        };
        let elapsed = now.saturating_duration_since(start);
        if elapsed < self.spec.delay {
            return self.from.clone();
        }
        let animation_time = elapsed - self.spec.delay;
        if animation_time >= self.spec.duration {
            return self.to.clone();
        }
        let t = animation_time.as_secs_f32() / self.spec.duration.as_secs_f32();
        self.from.interpolate(&self.to, self.spec.easing.interpolate(t))
    }
}
