//! Value tween driving the progress animation.
//!
//! An [`Animation`] is either idle or running between two integer progress
//! values. It is advanced by fixed frame intervals; each step yields the
//! eased, integer-truncated value for that point in time. Starting a new
//! animation replaces the previous one outright, so there is never more
//! than one tween per widget.

use std::time::Duration;

/// Frames per second of the animation.
pub const FPS: u32 = 60;

/// Tween duration used when none is configured.
pub const DEFAULT_ANIMATION_DURATION: Duration = Duration::from_millis(100);

/// Time between two animation frames.
pub fn frame_interval() -> Duration {
    Duration::from_nanos(1_000_000_000 / FPS as u64)
}

/// Decelerating easing curve: fast at first, slowing to a stop.
///
/// Maps `[0, 1]` onto `[0, 1]` as `1 - (1 - t)^2`.
pub fn decelerate(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Integer interpolation between `from` and `to`, truncated toward zero.
pub fn interpolate(from: i32, to: i32, fraction: f64) -> i32 {
    (from as f64 + fraction * (to - from) as f64) as i32
}

/// State of the progress tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Animation {
    /// Nothing to animate.
    #[default]
    Idle,
    /// Moving from `from` to `to`; `elapsed` is the time already played.
    Running {
        /// Value at the start of the tween.
        from: i32,
        /// Value the tween ends at.
        to: i32,
        /// Time played so far.
        elapsed: Duration,
    },
}

impl Animation {
    /// A tween from `from` to `to` that has not played yet.
    pub fn start(from: i32, to: i32) -> Self {
        Animation::Running {
            from,
            to,
            elapsed: Duration::ZERO,
        }
    }

    /// True while the tween has frames left.
    pub fn is_running(&self) -> bool {
        matches!(self, Animation::Running { .. })
    }

    /// Plays `dt` more of a tween lasting `duration` and returns the value reached.
    ///
    /// Returns `None` when idle. The step that reaches the end returns `to`
    /// exactly and leaves the animation idle.
    pub fn advance(&mut self, dt: Duration, duration: Duration) -> Option<i32> {
        let Animation::Running { from, to, elapsed } = *self else {
            return None;
        };

        let elapsed = elapsed + dt;
        let fraction = if duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0)
        };

        if fraction >= 1.0 {
            *self = Animation::Idle;
            return Some(to);
        }

        *self = Animation::Running { from, to, elapsed };
        Some(interpolate(from, to, decelerate(fraction)))
    }
}
