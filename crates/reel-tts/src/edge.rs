use std::path::Path;
use std::process::{Command, Stdio};

use reel_core::{ReelError, ReelResult, TtsConfig};

use crate::probe::probe_duration;
use crate::{SpeechRequest, SpeechSynthesizer, SynthesizedAudio};

/// File the narration is written to inside the request's working directory.
pub const VOICE_FILE_NAME: &str = "voice.mp3";

/// Synthesizes speech with the `edge-tts` command-line client and measures
/// the result with ffprobe.
#[derive(Debug, Clone)]
pub struct EdgeTtsSynthesizer {
    command: String,
    ffprobe: String,
}

impl EdgeTtsSynthesizer {
    pub fn new(command: impl Into<String>, ffprobe: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ffprobe: ffprobe.into(),
        }
    }

    pub fn from_config(config: &TtsConfig) -> Self {
        Self::new(config.command.clone(), config.ffprobe.clone())
    }

    pub fn is_available(&self) -> bool {
        Command::new(&self.command)
            .arg("--help")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Arguments for one synthesis call.
    pub fn args(&self, request: &SpeechRequest, output: &Path) -> Vec<String> {
        vec![
            "--voice".to_string(),
            request.voice_id.clone(),
            // `=` keeps a negative rate from being read as a flag.
            format!("--rate={}", request.rate),
            "--text".to_string(),
            request.text.clone(),
            "--write-media".to_string(),
            output.display().to_string(),
        ]
    }
}

impl Default for EdgeTtsSynthesizer {
    fn default() -> Self {
        Self::from_config(&TtsConfig::default())
    }
}

impl SpeechSynthesizer for EdgeTtsSynthesizer {
    fn synthesize(&self, request: &SpeechRequest, work_dir: &Path) -> ReelResult<SynthesizedAudio> {
        if request.text.trim().is_empty() {
            return Err(ReelError::EmptyScript);
        }
        std::fs::create_dir_all(work_dir)?;
        let output_path = work_dir.join(VOICE_FILE_NAME);

        tracing::debug!(
            voice = %request.voice_id,
            rate = %request.rate,
            chars = request.text.chars().count(),
            "synthesizing narration"
        );

        let output = Command::new(&self.command)
            .args(self.args(request, &output_path))
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| ReelError::synthesis_with(format!("failed to run {}", self.command), e))?;

        if !output.status.success() {
            return Err(ReelError::synthesis(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let duration = probe_duration(&self.ffprobe, &output_path)?;
        Ok(SynthesizedAudio {
            path: output_path,
            duration,
        })
    }
}
