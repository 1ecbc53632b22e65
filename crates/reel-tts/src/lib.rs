//! # reel-tts
//!
//! Narration for reels. The engine only needs an audio file and its length;
//! [`SpeechSynthesizer`] is the boundary, [`EdgeTtsSynthesizer`] the
//! production implementation.

pub mod edge;
pub mod probe;
pub mod rate;
pub mod voice;

use std::path::{Path, PathBuf};

use reel_core::{Duration, ReelResult};

pub use edge::EdgeTtsSynthesizer;
pub use probe::probe_duration;
pub use rate::SpeechRate;
pub use voice::{Voice, VoiceCatalog, DEFAULT_VOICE_ID, DEFAULT_VOICE_NAME};

/// What to say and how.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    /// Backend voice id, e.g. `en-US-AndrewNeural`.
    pub voice_id: String,
    pub rate: SpeechRate,
}

/// A synthesized narration file.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedAudio {
    pub path: PathBuf,
    pub duration: Duration,
}

/// Turns text into narration audio inside `work_dir`.
///
/// Implementations block until the audio is written and measured.
pub trait SpeechSynthesizer: Send + Sync {
    fn synthesize(&self, request: &SpeechRequest, work_dir: &Path) -> ReelResult<SynthesizedAudio>;
}
