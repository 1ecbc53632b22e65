use serde::{Deserialize, Serialize};
use std::ops::Range;

use reel_core::{Duration, ReelError, ReelResult};

use crate::schedule::{Schedule, WordTiming};
use crate::script::Word;

/// A group of consecutive words shown on screen together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position of this chunk in the reel.
    pub index: usize,
    /// Indices of this chunk's words in the schedule.
    pub word_range: Range<usize>,
    pub words: Vec<Word>,
    /// Start of the chunk's first word.
    pub start: Duration,
    /// Sum of the chunk's word durations.
    pub duration: Duration,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn end(&self) -> Duration {
        self.start + self.duration
    }

    /// The chunk's words joined by single spaces.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// This chunk's slice of `schedule`.
    pub fn timings<'s>(&self, schedule: &'s Schedule) -> &'s [WordTiming] {
        &schedule.timings()[self.word_range.clone()]
    }
}

/// Splits a word sequence into display chunks of at most `max_words` words.
#[derive(Debug, Clone, Copy)]
pub struct ChunkPlanner {
    max_words: usize,
}

impl ChunkPlanner {
    pub fn new(max_words: usize) -> ReelResult<Self> {
        if max_words == 0 {
            return Err(ReelError::InvalidArgument(
                "max words per chunk must be at least 1".into(),
            ));
        }
        Ok(Self { max_words })
    }

    pub fn max_words(&self) -> usize {
        self.max_words
    }

    /// Index ranges of each chunk over a sequence of `word_count` words.
    pub fn partition(&self, word_count: usize) -> Vec<Range<usize>> {
        (0..word_count)
            .step_by(self.max_words)
            .map(|start| start..(start + self.max_words).min(word_count))
            .collect()
    }

    /// Group the schedule's words, attaching each chunk's span.
    pub fn plan(&self, schedule: &Schedule) -> Vec<Chunk> {
        self.partition(schedule.len())
            .into_iter()
            .enumerate()
            .map(|(index, range)| {
                let timings = &schedule.timings()[range.clone()];
                Chunk {
                    index,
                    words: timings.iter().map(|t| t.word.clone()).collect(),
                    start: timings.first().map(|t| t.start).unwrap_or_default(),
                    duration: schedule.span_duration(range.clone()),
                    word_range: range,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{ProportionalAllocator, TimeAllocator};
    use crate::script::Script;

    fn schedule(text: &str, seconds: f64) -> Schedule {
        ProportionalAllocator
            .allocate(Script::new(text).words(), Duration::from_seconds(seconds))
            .unwrap()
    }

    #[test]
    fn test_twelve_words_by_five() {
        let s = schedule("one two three four five six seven eight nine ten eleven twelve", 6.0);
        let chunks = ChunkPlanner::new(5).unwrap().plan(&s);
        let sizes: Vec<usize> = chunks.iter().map(Chunk::len).collect();
        assert_eq!(sizes, [5, 5, 2]);
        assert_eq!(chunks[2].text(), "eleven twelve");
    }

    #[test]
    fn test_chunks_reconstruct_words() {
        let text = "Wake up early. Grind hard. Success is waiting for those who show up.";
        let s = schedule(text, 5.0);
        for max in 1..=10 {
            let chunks = ChunkPlanner::new(max).unwrap().plan(&s);
            let rebuilt: Vec<Word> = chunks.iter().flat_map(|c| c.words.clone()).collect();
            assert_eq!(rebuilt, Script::new(text).words());
            for c in &chunks[..chunks.len() - 1] {
                assert_eq!(c.len(), max);
            }
            assert!((1..=max).contains(&chunks.last().unwrap().len()));
        }
    }

    #[test]
    fn test_max_at_least_word_count_is_single_chunk() {
        let s = schedule("Wake up early", 2.2);
        let chunks = ChunkPlanner::new(10).unwrap().plan(&s);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].word_range, 0..3);
        assert!(chunks[0].duration.approx_eq(Duration::from_seconds(2.2), 1e-9));
    }

    #[test]
    fn test_chunk_spans_are_contiguous() {
        let s = schedule("a bb ccc dddd eeeee ffffff g", 4.0);
        let chunks = ChunkPlanner::new(3).unwrap().plan(&s);
        let mut expected_start = Duration::zero();
        for c in &chunks {
            assert!(c.start.approx_eq(expected_start, 1e-9));
            assert_eq!(c.timings(&s).len(), c.len());
            expected_start = c.end();
        }
        assert!(expected_start.approx_eq(Duration::from_seconds(4.0), 1e-9));
    }

    #[test]
    fn test_zero_max_words_rejected() {
        assert!(ChunkPlanner::new(0).is_err());
    }

    #[test]
    fn test_partition_empty() {
        assert!(ChunkPlanner::new(3).unwrap().partition(0).is_empty());
    }
}
