use std::path::PathBuf;
use std::sync::Arc;

use reel_core::{Background, Duration, FrameBuffer, ReelError, ReelResult};

use crate::chunk::Chunk;

/// Slack allowed when a frame's end is compared with the audio end.
const END_TOLERANCE_SECS: f64 = 1e-6;

/// A caption raster, stored trimmed to its visible pixels.
///
/// Caption rasters are canvas-sized but mostly transparent; keeping only the
/// text's bounding box keeps a whole reel's worth of frames in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionImage {
    /// Canvas position of `pixels`' top-left corner.
    pub x: i32,
    pub y: i32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub pixels: FrameBuffer,
}

impl CaptionImage {
    /// Trim a full-canvas raster to its non-transparent bounds.
    pub fn from_canvas(canvas: &FrameBuffer) -> Self {
        match canvas.content_bounds() {
            Some((x, y, w, h)) => Self {
                x: x as i32,
                y: y as i32,
                canvas_width: canvas.width,
                canvas_height: canvas.height,
                pixels: canvas.crop(x, y, w, h),
            },
            None => Self {
                x: 0,
                y: 0,
                canvas_width: canvas.width,
                canvas_height: canvas.height,
                pixels: FrameBuffer::new(0, 0),
            },
        }
    }

    /// Expand back to a full-canvas raster.
    pub fn to_canvas(&self) -> FrameBuffer {
        let mut canvas = FrameBuffer::new(self.canvas_width, self.canvas_height);
        canvas.composite_over(&self.pixels, self.x, self.y);
        canvas
    }
}

/// One highlight state of a chunk, placed on the timeline.
#[derive(Debug, Clone)]
pub struct CaptionFrame {
    pub chunk: Arc<Chunk>,
    /// Position of the highlighted word within the chunk.
    pub highlight_index: usize,
    pub image: CaptionImage,
    pub start: Duration,
    pub duration: Duration,
}

impl CaptionFrame {
    pub fn end(&self) -> Duration {
        self.start + self.duration
    }

    /// Whether the frame is on screen at `offset` (start inclusive, end exclusive).
    pub fn covers(&self, offset: Duration) -> bool {
        self.start <= offset && offset < self.end()
    }
}

/// The full-span layer under the captions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundLayer {
    pub fill: Background,
    pub duration: Duration,
}

impl BackgroundLayer {
    pub fn is_transparent(&self) -> bool {
        self.fill.is_transparent()
    }

    /// Render the layer at canvas size.
    pub fn render(&self, width: u32, height: u32) -> FrameBuffer {
        match self.fill {
            Background::Transparent => FrameBuffer::new(width, height),
            Background::Solid(color) => FrameBuffer::solid(width, height, &color),
        }
    }
}

/// The narration audio; its length defines the timeline's length.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioTrack {
    pub path: PathBuf,
    pub duration: Duration,
}

/// Background, timed caption frames and audio, ready for encoding.
#[derive(Debug, Clone)]
pub struct Timeline {
    pub width: u32,
    pub height: u32,
    pub background: BackgroundLayer,
    pub caption_frames: Vec<CaptionFrame>,
    pub audio: AudioTrack,
}

impl Timeline {
    pub fn total_duration(&self) -> Duration {
        self.audio.duration
    }

    pub fn is_transparent(&self) -> bool {
        self.background.is_transparent()
    }

    /// The caption frame on screen at `offset`, if any.
    pub fn caption_at(&self, offset: Duration) -> Option<&CaptionFrame> {
        let idx = self.caption_frames.partition_point(|f| f.start <= offset);
        let candidate = &self.caption_frames[idx.checked_sub(1)?];
        candidate.covers(offset).then_some(candidate)
    }
}

/// Places already-timed caption frames, a background and the audio onto one timeline.
///
/// The assembler never re-times anything; it only checks that what it was
/// handed fits inside the audio.
#[derive(Debug, Clone, Copy)]
pub struct TimelineAssembler {
    width: u32,
    height: u32,
}

impl TimelineAssembler {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn assemble(
        &self,
        background: Background,
        caption_frames: Vec<CaptionFrame>,
        audio: AudioTrack,
    ) -> ReelResult<Timeline> {
        if self.width == 0 || self.height == 0 {
            return Err(ReelError::Timeline("canvas size must be non-zero".into()));
        }

        let total = audio.duration;
        for frame in &caption_frames {
            if frame.end().as_seconds() > total.as_seconds() + END_TOLERANCE_SECS {
                return Err(ReelError::Timeline(format!(
                    "caption frame for chunk {} word {} ends at {} past audio end {}",
                    frame.chunk.index,
                    frame.highlight_index,
                    frame.end().as_seconds(),
                    total.as_seconds()
                )));
            }
            if frame.image.canvas_width != self.width || frame.image.canvas_height != self.height
            {
                return Err(ReelError::Timeline(format!(
                    "caption frame raster is {}x{}, timeline canvas is {}x{}",
                    frame.image.canvas_width, frame.image.canvas_height, self.width, self.height
                )));
            }
        }
        if caption_frames.windows(2).any(|w| w[1].start < w[0].start) {
            return Err(ReelError::Timeline(
                "caption frames must be ordered by start".into(),
            ));
        }

        tracing::debug!(
            frames = caption_frames.len(),
            duration = total.as_seconds(),
            transparent = background.is_transparent(),
            "assembled timeline"
        );

        Ok(Timeline {
            width: self.width,
            height: self.height,
            background: BackgroundLayer {
                fill: background,
                duration: total,
            },
            caption_frames,
            audio,
        })
    }
}
