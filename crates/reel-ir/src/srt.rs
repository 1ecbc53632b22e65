//! SubRip export of a reel's chunks, for players that show captions as a track.

use reel_core::Duration;

use crate::chunk::Chunk;

/// Render chunks as an SRT document, one cue per chunk.
pub fn to_srt(chunks: &[Chunk]) -> String {
    let mut out = String::new();
    for chunk in chunks {
        out.push_str(&format!("{}\n", chunk.index + 1));
        out.push_str(&format!(
            "{} --> {}\n",
            format_srt_time(chunk.start),
            format_srt_time(chunk.end()),
        ));
        out.push_str(&chunk.text());
        out.push_str("\n\n");
    }
    out
}

/// Format an offset as an SRT timestamp: `HH:MM:SS,mmm`.
fn format_srt_time(offset: Duration) -> String {
    let total_ms = offset.as_millis().round() as u64;
    let ms = total_ms % 1000;
    let total_s = total_ms / 1000;
    let s = total_s % 60;
    let total_m = total_s / 60;
    let m = total_m % 60;
    let h = total_m / 60;
    format!("{h:02}:{m:02}:{s:02},{ms:03}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::ChunkPlanner;
    use crate::schedule::{ProportionalAllocator, TimeAllocator};
    use crate::script::Script;

    #[test]
    fn test_format_srt_time() {
        assert_eq!(format_srt_time(Duration::zero()), "00:00:00,000");
        assert_eq!(format_srt_time(Duration::from_seconds(65.5)), "00:01:05,500");
        assert_eq!(format_srt_time(Duration::from_seconds(3661.123)), "01:01:01,123");
    }

    #[test]
    fn test_to_srt() {
        let schedule = ProportionalAllocator
            .allocate(Script::new("Wake up early").words(), Duration::from_seconds(2.2))
            .unwrap();
        let chunks = ChunkPlanner::new(2).unwrap().plan(&schedule);
        let srt = to_srt(&chunks);
        assert_eq!(
            srt,
            "1\n00:00:00,000 --> 00:00:01,200\nWake up\n\n2\n00:00:01,200 --> 00:00:02,200\nearly\n\n"
        );
    }
}
