//! Flattens a timeline into video frames.
//!
//! Frame `i` samples the timeline at `i / fps`: the background layer with the
//! caption frame on screen at that instant composited on top.

use rayon::prelude::*;

use reel_core::hash::{self, ContentHash};
use reel_core::{FrameBuffer, Timestamp};
use reel_ir::Timeline;

pub struct Compositor<'t> {
    timeline: &'t Timeline,
    fps: f64,
    background: FrameBuffer,
}

impl<'t> Compositor<'t> {
    pub fn new(timeline: &'t Timeline, fps: f64) -> Self {
        let background = timeline.background.render(timeline.width, timeline.height);
        Self {
            timeline,
            fps,
            background,
        }
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn timeline(&self) -> &Timeline {
        self.timeline
    }

    /// Frames needed to cover the audio.
    pub fn frame_count(&self) -> u64 {
        self.timeline.total_duration().frame_count(self.fps)
    }

    pub fn render_frame(&self, index: u64) -> FrameBuffer {
        let mut frame = self.background.clone();
        let at = Timestamp::from_frame(index, self.fps).since_start();
        if let Some(caption) = self.timeline.caption_at(at) {
            frame.composite_over(&caption.image.pixels, caption.image.x, caption.image.y);
        }
        frame
    }

    /// Frames in order, produced lazily.
    pub fn frames(&self) -> impl Iterator<Item = FrameBuffer> + '_ {
        (0..self.frame_count()).map(move |i| self.render_frame(i))
    }

    /// Render every frame up front.
    pub fn render_all(&self) -> RenderResult {
        let frames: Vec<FrameBuffer> = (0..self.frame_count())
            .into_par_iter()
            .map(|i| self.render_frame(i))
            .collect();
        RenderResult {
            frame_count: frames.len() as u64,
            width: self.timeline.width,
            height: self.timeline.height,
            fps: self.fps,
            frames,
        }
    }
}

/// A fully rendered reel.
pub struct RenderResult {
    pub frames: Vec<FrameBuffer>,
    pub frame_count: u64,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

impl RenderResult {
    /// Hash over every frame; identical inputs give identical hashes.
    pub fn content_hash(&self) -> ContentHash {
        hash::hash_frames(&self.frames)
    }
}
