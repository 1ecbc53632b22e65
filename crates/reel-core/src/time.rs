use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};

/// Tolerance used when comparing schedule sums against the audio duration.
pub const TIME_EPSILON: f64 = 1e-9;

/// Time span with sub-millisecond precision (stored as fractional seconds).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Duration {
    /// Duration in seconds.
    seconds: f64,
}

impl Duration {
    /// Create a duration from seconds. Negative and NaN inputs clamp to zero.
    pub fn from_seconds(s: f64) -> Self {
        Self {
            seconds: if s.is_nan() { 0.0 } else { s.max(0.0) },
        }
    }

    pub fn zero() -> Self {
        Self { seconds: 0.0 }
    }

    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    pub fn as_millis(&self) -> f64 {
        self.seconds * 1000.0
    }

    pub fn is_zero(&self) -> bool {
        self.seconds == 0.0
    }

    /// Number of whole frames needed to cover this duration at `fps`.
    pub fn frame_count(&self, fps: f64) -> u64 {
        (self.seconds * fps).ceil() as u64
    }

    /// Compare two durations with an absolute tolerance in seconds.
    pub fn approx_eq(&self, other: Duration, epsilon: f64) -> bool {
        (self.seconds - other.seconds).abs() <= epsilon
    }
}

impl Default for Duration {
    fn default() -> Self {
        Duration::zero()
    }
}

impl Add for Duration {
    type Output = Duration;
    fn add(self, rhs: Duration) -> Duration {
        Duration::from_seconds(self.seconds + rhs.seconds)
    }
}

impl Sub for Duration {
    type Output = Duration;
    fn sub(self, rhs: Duration) -> Duration {
        Duration::from_seconds(self.seconds - rhs.seconds)
    }
}

impl Mul<f64> for Duration {
    type Output = Duration;
    fn mul(self, rhs: f64) -> Duration {
        Duration::from_seconds(self.seconds * rhs)
    }
}

impl Sum for Duration {
    fn sum<I: Iterator<Item = Duration>>(iter: I) -> Duration {
        iter.fold(Duration::zero(), |acc, d| acc + d)
    }
}

impl<'a> Sum<&'a Duration> for Duration {
    fn sum<I: Iterator<Item = &'a Duration>>(iter: I) -> Duration {
        iter.copied().sum()
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.seconds < 1.0 {
            write!(f, "{:.0}ms", self.seconds * 1000.0)
        } else {
            write!(f, "{:.2}s", self.seconds)
        }
    }
}

/// A point on the reel timeline, measured from its start.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Timestamp {
    seconds: f64,
}

impl Timestamp {
    pub fn from_seconds(s: f64) -> Self {
        Self {
            seconds: if s.is_nan() { 0.0 } else { s.max(0.0) },
        }
    }

    pub fn zero() -> Self {
        Self { seconds: 0.0 }
    }

    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    /// Timestamp of the first sample of frame `index` at `fps`.
    pub fn from_frame(index: u64, fps: f64) -> Self {
        Self::from_seconds(index as f64 / fps)
    }

    /// Offset of this timestamp from the timeline start.
    pub fn since_start(&self) -> Duration {
        Duration::from_seconds(self.seconds)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp::zero()
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;
    fn add(self, rhs: Duration) -> Timestamp {
        Timestamp::from_seconds(self.seconds + rhs.as_seconds())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_ms = (self.seconds * 1000.0).round() as u64;
        let hours = total_ms / 3_600_000;
        let minutes = (total_ms % 3_600_000) / 60_000;
        let secs = (total_ms % 60_000) / 1_000;
        let ms = total_ms % 1_000;
        write!(f, "{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, ms)
    }
}
