use rayon::prelude::*;
use std::sync::Arc;

use reel_core::{ReelConfig, ReelError, ReelResult, Style};
use reel_ir::{CaptionFrame, CaptionImage, Chunk, Schedule};

use crate::caption::CaptionRasterizer;
use crate::font::{FontResolver, FontSource};

/// Turns planned chunks into timed caption frames.
///
/// Every (chunk, highlight) raster is independent of the others, so chunks and
/// the highlight states within a chunk are rendered on the rayon pool. Results
/// come back in timeline order regardless of which finished first.
pub struct CaptionPipeline {
    rasterizer: CaptionRasterizer,
    parallel: bool,
}

impl CaptionPipeline {
    pub fn new(rasterizer: CaptionRasterizer) -> Self {
        Self {
            rasterizer,
            parallel: true,
        }
    }

    /// Resolve the style's font and size the canvas from `config`.
    pub fn from_config(style: &Style, config: &ReelConfig) -> (Self, FontSource) {
        let (typeface, source) = FontResolver::from_config(&config.fonts).resolve(style.font_family);
        tracing::debug!(
            face = typeface.name(),
            builtin = typeface.is_builtin(),
            font_size = style.font_size,
            "caption face ready"
        );
        let rasterizer = CaptionRasterizer::new(
            style,
            config.render.width,
            config.render.height,
            Arc::new(typeface),
        );
        (
            Self::new(rasterizer).with_parallel(config.render.parallel),
            source,
        )
    }

    /// Render on the calling thread only.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn rasterizer(&self) -> &CaptionRasterizer {
        &self.rasterizer
    }

    /// One frame per word, ordered by chunk and then by position in the chunk.
    pub fn render(&self, schedule: &Schedule, chunks: Vec<Chunk>) -> ReelResult<Vec<CaptionFrame>> {
        let chunk_count = chunks.len();
        let per_chunk: Vec<Vec<CaptionFrame>> = if self.parallel {
            chunks
                .into_par_iter()
                .map(|chunk| self.render_chunk(schedule, chunk))
                .collect::<ReelResult<_>>()?
        } else {
            chunks
                .into_iter()
                .map(|chunk| self.render_chunk(schedule, chunk))
                .collect::<ReelResult<_>>()?
        };

        let frames: Vec<CaptionFrame> = per_chunk.into_iter().flatten().collect();
        tracing::debug!(
            chunks = chunk_count,
            frames = frames.len(),
            parallel = self.parallel,
            "rendered caption frames"
        );
        Ok(frames)
    }

    fn render_chunk(&self, schedule: &Schedule, chunk: Chunk) -> ReelResult<Vec<CaptionFrame>> {
        if chunk.word_range.end > schedule.len() {
            return Err(ReelError::Render(format!(
                "chunk {} covers words {:?} but the schedule has {}",
                chunk.index,
                chunk.word_range,
                schedule.len()
            )));
        }
        let chunk = Arc::new(chunk);
        let timings = chunk.timings(schedule);
        let prepared = self.rasterizer.prepare(&chunk.words);

        let frame = |highlight: usize| -> ReelResult<CaptionFrame> {
            let canvas = prepared.render(highlight)?;
            let timing = &timings[highlight];
            Ok(CaptionFrame {
                chunk: Arc::clone(&chunk),
                highlight_index: highlight,
                image: CaptionImage::from_canvas(&canvas),
                start: timing.start,
                duration: timing.duration,
            })
        };

        if self.parallel {
            (0..chunk.len()).into_par_iter().map(frame).collect()
        } else {
            (0..chunk.len()).map(frame).collect()
        }
    }
}
