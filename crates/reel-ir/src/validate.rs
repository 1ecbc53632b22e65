use reel_core::time::TIME_EPSILON;
use reel_core::ReelError;

use crate::chunk::Chunk;
use crate::schedule::Schedule;
use crate::timeline::Timeline;

/// Tolerance for sums of many float durations.
const SUM_TOLERANCE: f64 = TIME_EPSILON * 1e3;

fn collect(errors: Vec<ReelError>) -> Result<(), Vec<ReelError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check that timings are contiguous from zero and add up to the schedule total.
pub fn validate_schedule(schedule: &Schedule) -> Result<(), Vec<ReelError>> {
    let mut errors = Vec::new();

    if schedule.is_empty() {
        errors.push(ReelError::Timeline("schedule has no words".into()));
    }

    let mut cursor = 0.0;
    for (i, timing) in schedule.iter().enumerate() {
        if (timing.start.as_seconds() - cursor).abs() > SUM_TOLERANCE {
            errors.push(ReelError::Timeline(format!(
                "word {} '{}' starts at {} but previous words end at {}",
                i,
                timing.word.text,
                timing.start.as_seconds(),
                cursor
            )));
        }
        cursor = timing.end().as_seconds();
    }

    if !schedule.is_empty() && (cursor - schedule.total().as_seconds()).abs() > SUM_TOLERANCE {
        errors.push(ReelError::Timeline(format!(
            "word durations sum to {} but audio lasts {}",
            cursor,
            schedule.total().as_seconds()
        )));
    }

    collect(errors)
}

/// Check that chunks partition the schedule in order, each within `max_words`.
pub fn validate_chunks(
    chunks: &[Chunk],
    schedule: &Schedule,
    max_words: usize,
) -> Result<(), Vec<ReelError>> {
    let mut errors = Vec::new();
    let mut next_word = 0;

    for (i, chunk) in chunks.iter().enumerate() {
        if chunk.index != i {
            errors.push(ReelError::Timeline(format!(
                "chunk at position {} has index {}",
                i, chunk.index
            )));
        }
        if chunk.is_empty() || chunk.len() > max_words {
            errors.push(ReelError::Timeline(format!(
                "chunk {} has {} words, expected 1..={}",
                i,
                chunk.len(),
                max_words
            )));
        }
        if chunk.word_range.start != next_word || chunk.word_range.len() != chunk.len() {
            errors.push(ReelError::Timeline(format!(
                "chunk {} covers words {:?}, expected to start at {}",
                i, chunk.word_range, next_word
            )));
        }
        next_word = chunk.word_range.end;
    }

    if next_word != schedule.len() {
        errors.push(ReelError::Timeline(format!(
            "chunks cover {} of {} words",
            next_word,
            schedule.len()
        )));
    }

    collect(errors)
}

/// Check the caption frames of an assembled timeline.
///
/// Frames of one chunk must appear in word order and tile the chunk's span
/// exactly, and nothing may run past the audio.
pub fn validate_timeline(timeline: &Timeline) -> Result<(), Vec<ReelError>> {
    let mut errors = Vec::new();
    let total = timeline.total_duration().as_seconds();

    if timeline.background.duration != timeline.audio.duration {
        errors.push(ReelError::Timeline(
            "background must span the full audio duration".into(),
        ));
    }

    let mut i = 0;
    let frames = &timeline.caption_frames;
    while i < frames.len() {
        let chunk = &frames[i].chunk;
        let group_end = i + frames[i..]
            .iter()
            .take_while(|f| f.chunk.index == chunk.index)
            .count();
        let group = &frames[i..group_end];

        if group.len() != chunk.len() {
            errors.push(ReelError::Timeline(format!(
                "chunk {} has {} frames for {} words",
                chunk.index,
                group.len(),
                chunk.len()
            )));
        }

        let mut cursor = chunk.start.as_seconds();
        for (pos, frame) in group.iter().enumerate() {
            if frame.highlight_index != pos {
                errors.push(ReelError::Timeline(format!(
                    "chunk {} frame {} highlights word {}",
                    chunk.index, pos, frame.highlight_index
                )));
            }
            if (frame.start.as_seconds() - cursor).abs() > SUM_TOLERANCE {
                errors.push(ReelError::Timeline(format!(
                    "chunk {} frame {} starts at {}, expected {}",
                    chunk.index,
                    pos,
                    frame.start.as_seconds(),
                    cursor
                )));
            }
            cursor = frame.end().as_seconds();
        }
        if (cursor - chunk.end().as_seconds()).abs() > SUM_TOLERANCE {
            errors.push(ReelError::Timeline(format!(
                "chunk {} frames end at {} but the chunk ends at {}",
                chunk.index,
                cursor,
                chunk.end().as_seconds()
            )));
        }
        if cursor > total + SUM_TOLERANCE {
            errors.push(ReelError::Timeline(format!(
                "chunk {} runs past the audio end ({} > {})",
                chunk.index, cursor, total
            )));
        }

        i = group_end;
    }

    collect(errors)
}
