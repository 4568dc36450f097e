/// Tick-driven progress for the before/after interpolation
use tracing::{debug, warn};

/// Progress added per tick unless configured otherwise
pub const DEFAULT_SPEED: f64 = 0.015;

/// Smoothstep easing, `t² (3 - 2t)`
pub fn ease(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Linear progress in [0, 1] advanced by a fixed step each tick.
///
/// The raw progress stays linear; only [`AnimationDriver::eased`] is meant to
/// feed the geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationDriver {
    progress: f64,
    speed: f64,
    running: bool,
}

impl AnimationDriver {
    /// A `speed` that is not a positive finite number falls back to
    /// [`DEFAULT_SPEED`], otherwise the animation could never finish.
    pub fn new(speed: f64) -> Self {
        let speed = if speed.is_finite() && speed > 0.0 {
            speed
        } else {
            warn!(speed, "animation speed must be positive, using default");
            DEFAULT_SPEED
        };
        Self {
            progress: 0.0,
            speed,
            running: false,
        }
    }

    /// Start over from zero. Whatever was in flight is dropped.
    pub fn restart(&mut self) {
        self.progress = 0.0;
        self.running = true;
    }

    /// Step once. Returns true on the tick that finishes the animation.
    pub fn advance(&mut self) -> bool {
        if !self.running {
            return false;
        }

        self.progress += self.speed;
        if self.progress >= 1.0 {
            self.progress = 1.0;
            self.running = false;
            debug!("animation settled");
            return true;
        }
        false
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn eased(&self) -> f64 {
        ease(self.progress)
    }
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self::new(DEFAULT_SPEED)
    }
}
