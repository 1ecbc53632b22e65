use std::fmt;

use reel_core::{ReelError, ReelResult};

pub const MIN_SPEED: f64 = 0.5;
pub const MAX_SPEED: f64 = 1.5;

/// Speaking-rate adjustment in whole percent relative to the voice's natural pace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpeechRate(i32);

impl SpeechRate {
    pub fn from_percent(percent: i32) -> Self {
        Self(percent)
    }

    /// Convert a speed multiplier (1.0 = natural) to a percentage adjustment.
    pub fn from_speed(speed: f64) -> ReelResult<Self> {
        if !speed.is_finite() || !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
            return Err(ReelError::InvalidArgument(format!(
                "speed must be between {} and {}, got {}",
                MIN_SPEED, MAX_SPEED, speed
            )));
        }
        Ok(Self(((speed - 1.0) * 100.0).round() as i32))
    }

    pub fn percent(&self) -> i32 {
        self.0
    }
}

/// Signed percentage, e.g. `+10%`, `-20%`, `+0%`.
impl fmt::Display for SpeechRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}%", self.0)
    }
}
