//! Timed tweens standing in for CSS transitions.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tween {
    from: f64,
    to: f64,
    start: Instant,
    duration: Duration,
}

impl Tween {
    fn progress(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.start).as_secs_f64();
        (elapsed / self.duration.as_secs_f64()).min(1.0)
    }

    fn value(&self, now: Instant) -> f64 {
        let t = self.progress(now);
        // Ease out, like the default CSS timing function's tail.
        let eased = 1.0 - (1.0 - t) * (1.0 - t);
        self.from + (self.to - self.from) * eased
    }
}

/// An animatable property with a transition duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    value: f64,
    transition: Duration,
    tween: Option<Tween>,
}

impl Track {
    pub fn new(value: f64) -> Self {
        Track {
            value,
            transition: Duration::ZERO,
            tween: None,
        }
    }

    pub fn set_transition(&mut self, duration: Duration) {
        self.transition = duration;
    }

    /// Moves towards `target`, instantly when the transition is zero.
    pub fn set(&mut self, target: f64, now: Instant) {
        if self.transition.is_zero() {
            self.value = target;
            self.tween = None;
        } else {
            self.tween = Some(Tween {
                from: self.value,
                to: target,
                start: now,
                duration: self.transition,
            });
        }
    }

    /// Advances the tween; returns true on the tick it completes.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(tween) = self.tween else {
            return false;
        };
        self.value = tween.value(now);
        if tween.progress(now) >= 1.0 {
            self.value = tween.to;
            self.tween = None;
            return true;
        }
        false
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}
