//! # reel-encode
//!
//! Hands an assembled timeline to FFmpeg. The only decision made here is which
//! output profile applies: alpha-capable WebM for transparent reels, MP4
//! otherwise.

pub mod ffmpeg;
pub mod profile;

use std::path::{Path, PathBuf};

use reel_core::ReelResult;
use reel_ir::Timeline;

pub use ffmpeg::FfmpegEncoder;
pub use profile::{Container, EncodeProfile, DEFAULT_FPS};

/// What an encoder produced.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeReport {
    pub path: PathBuf,
    pub frames: u64,
    pub container: Container,
}

/// Serializes a timeline to a video file.
pub trait Encoder: Send + Sync {
    /// Encode `timeline` to `output`. On failure no file is left at `output`.
    fn encode(
        &self,
        timeline: &Timeline,
        profile: &EncodeProfile,
        output: &Path,
    ) -> ReelResult<EncodeReport>;
}
