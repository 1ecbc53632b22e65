//! Per-word timing.
//!
//! A [`Schedule`] assigns every word of a script a start offset and a
//! duration. It is the seam between audio and captions: anything downstream
//! (chunking, rasterizing, assembling) consumes a Schedule and never looks at
//! the audio again, so a timestamp-driven allocator can replace the
//! proportional one without touching the rest of the pipeline.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use reel_core::{Duration, ReelError, ReelResult};

use crate::script::Word;

/// When one word is spoken, relative to the start of the audio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTiming {
    pub word: Word,
    pub start: Duration,
    pub duration: Duration,
}

impl WordTiming {
    pub fn end(&self) -> Duration {
        self.start + self.duration
    }
}

/// Ordered word timings covering `[0, total]` without gaps or overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    timings: Vec<WordTiming>,
    total: Duration,
}

impl Schedule {
    /// Wrap precomputed timings. Use [`crate::validate::validate_schedule`]
    /// to check timings that did not come from a [`TimeAllocator`].
    pub fn new(timings: Vec<WordTiming>, total: Duration) -> Self {
        Self { timings, total }
    }

    pub fn timings(&self) -> &[WordTiming] {
        &self.timings
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WordTiming> {
        self.timings.iter()
    }

    pub fn get(&self, index: usize) -> Option<&WordTiming> {
        self.timings.get(index)
    }

    pub fn len(&self) -> usize {
        self.timings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }

    /// The audio duration this schedule was allocated against.
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Sum of the word durations in `range`.
    pub fn span_duration(&self, range: Range<usize>) -> Duration {
        self.timings[range].iter().map(|t| t.duration).sum()
    }

    /// Index of the word being spoken at `offset`, if any.
    pub fn word_at(&self, offset: Duration) -> Option<usize> {
        let idx = self.timings.partition_point(|t| t.start <= offset);
        let candidate = idx.checked_sub(1)?;
        (offset < self.timings[candidate].end()).then_some(candidate)
    }
}

/// Turns a word sequence and a known audio length into a [`Schedule`].
pub trait TimeAllocator {
    fn allocate(&self, words: &[Word], total: Duration) -> ReelResult<Schedule>;
}

/// Allocates time to each word in proportion to its character count.
///
/// This is an estimate of speech timing, not a measurement: a word with twice
/// the characters is assumed to take twice as long to say.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProportionalAllocator;

impl TimeAllocator for ProportionalAllocator {
    fn allocate(&self, words: &[Word], total: Duration) -> ReelResult<Schedule> {
        if words.is_empty() {
            return Err(ReelError::EmptyScript);
        }
        if !total.as_seconds().is_finite() || total.as_seconds() <= 0.0 {
            return Err(ReelError::InvalidArgument(format!(
                "audio duration must be positive and finite, got {}",
                total.as_seconds()
            )));
        }

        let total_chars: usize = words.iter().map(|w| w.char_len).sum();
        let weight = |w: &Word| -> f64 {
            if total_chars == 0 {
                // Degenerate input: split evenly.
                1.0
            } else {
                w.char_len as f64
            }
        };
        let denominator = if total_chars == 0 {
            words.len()
        } else {
            total_chars
        };
        let unit = total.as_seconds() / denominator as f64;

        let mut cursor = 0.0;
        let timings = words
            .iter()
            .map(|word| {
                let seconds = weight(word) * unit;
                let timing = WordTiming {
                    word: word.clone(),
                    start: Duration::from_seconds(cursor),
                    duration: Duration::from_seconds(seconds),
                };
                cursor += seconds;
                timing
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            words = timings.len(),
            total_chars,
            seconds_per_char = unit,
            "allocated word schedule"
        );

        Ok(Schedule::new(timings, total))
    }
}
