use std::ffi::OsString;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use reel_core::{ReelError, ReelResult};
use reel_ir::Timeline;
use reel_render::Compositor;

use crate::profile::EncodeProfile;
use crate::{EncodeReport, Encoder};

/// Encoder that shells out to FFmpeg, streaming raw RGBA frames over stdin.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    program: String,
}

impl FfmpegEncoder {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Check if FFmpeg can be run.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Full argument list: frames on stdin as input 0, narration as input 1.
    pub fn args(
        &self,
        profile: &EncodeProfile,
        timeline: &Timeline,
        output: &Path,
    ) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        let mut push = |s: &str| args.push(OsString::from(s));

        push("-y");
        push("-loglevel");
        push("error");
        push("-f");
        push("rawvideo");
        push("-pixel_format");
        push("rgba");
        push("-video_size");
        push(&format!("{}x{}", timeline.width, timeline.height));
        push("-framerate");
        push(&profile.fps.to_string());
        push("-i");
        push("-");
        push("-i");
        args.push(timeline.audio.path.clone().into_os_string());

        for arg in ["-map", "0:v", "-map", "1:a"] {
            args.push(OsString::from(arg));
        }
        args.extend(profile.output_args().into_iter().map(OsString::from));
        // The reel lasts exactly as long as the narration.
        args.push(OsString::from("-t"));
        args.push(OsString::from(format!(
            "{:.3}",
            timeline.total_duration().as_seconds()
        )));
        args.push(output.as_os_str().to_owned());
        args
    }

    fn run(&self, timeline: &Timeline, profile: &EncodeProfile, output: &Path) -> ReelResult<u64> {
        let compositor = Compositor::new(timeline, profile.fps);
        if compositor.frame_count() == 0 {
            return Err(ReelError::Encode("no frames to encode".into()));
        }

        let mut child = Command::new(&self.program)
            .args(self.args(profile, timeline, output))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ReelError::Encode(format!("failed to start {}: {}", self.program, e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| ReelError::Encode("failed to open ffmpeg stdin".into()))?;

        let mut written = 0u64;
        for frame in compositor.frames() {
            if let Err(e) = stdin.write_all(&frame.data) {
                drop(stdin);
                // FFmpeg closed its input; its stderr says why.
                let stderr = child
                    .wait_with_output()
                    .map(|o| String::from_utf8_lossy(&o.stderr).into_owned())
                    .unwrap_or_default();
                return Err(ReelError::Encode(format!(
                    "failed to write frame {} to ffmpeg: {}. FFmpeg stderr: {}",
                    written, e, stderr
                )));
            }
            written += 1;
        }
        drop(stdin);

        let output_status = child
            .wait_with_output()
            .map_err(|e| ReelError::Encode(format!("ffmpeg process error: {}", e)))?;
        if !output_status.status.success() {
            let stderr = String::from_utf8_lossy(&output_status.stderr);
            return Err(ReelError::Encode(format!(
                "ffmpeg failed with status {}: {}",
                output_status.status, stderr
            )));
        }
        Ok(written)
    }
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl Encoder for FfmpegEncoder {
    fn encode(
        &self,
        timeline: &Timeline,
        profile: &EncodeProfile,
        output: &Path,
    ) -> ReelResult<EncodeReport> {
        if profile.has_alpha() != timeline.is_transparent() {
            return Err(ReelError::Encode(format!(
                "{} profile does not match a {} background",
                profile.container,
                if timeline.is_transparent() {
                    "transparent"
                } else {
                    "solid"
                }
            )));
        }
        if !self.is_available() {
            return Err(ReelError::Encode(format!(
                "{} not found. Install FFmpeg: https://ffmpeg.org/download.html",
                self.program
            )));
        }
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        match self.run(timeline, profile, output) {
            Ok(frames) => {
                tracing::info!(
                    frames,
                    path = %output.display(),
                    container = %profile.container,
                    width = timeline.width,
                    height = timeline.height,
                    fps = profile.fps,
                    "encoded reel"
                );
                Ok(EncodeReport {
                    path: output.to_path_buf(),
                    frames,
                    container: profile.container,
                })
            }
            Err(e) => {
                discard_partial(output);
                Err(e)
            }
        }
    }
}

/// Remove whatever FFmpeg managed to write before failing.
pub(crate) fn discard_partial(output: &Path) {
    if output.exists() {
        match std::fs::remove_file(output) {
            Ok(()) => tracing::warn!(path = %output.display(), "removed partial output"),
            Err(e) => tracing::warn!(
                path = %output.display(),
                error = %e,
                "could not remove partial output"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_core::{Background, Color, Duration};
    use reel_ir::{AudioTrack, TimelineAssembler};
    use std::path::PathBuf;

    fn timeline(background: Background, seconds: f64) -> Timeline {
        TimelineAssembler::new(8, 4)
            .assemble(
                background,
                Vec::new(),
                AudioTrack {
                    path: PathBuf::from("work/voice.mp3"),
                    duration: Duration::from_seconds(seconds),
                },
            )
            .unwrap()
    }

    fn has_pair(args: &[OsString], a: &str, b: &str) -> bool {
        args.windows(2).any(|w| w[0] == a && w[1] == b)
    }

    #[test]
    fn test_args_for_mp4() {
        let tl = timeline(Background::Solid(Color::BLACK), 2.5);
        let args = FfmpegEncoder::default().args(
            &EncodeProfile::mp4(24.0),
            &tl,
            Path::new("out/output_reel.mp4"),
        );
        assert!(has_pair(&args, "-video_size", "8x4"));
        assert!(has_pair(&args, "-framerate", "24"));
        assert!(has_pair(&args, "-i", "work/voice.mp3"));
        assert!(has_pair(&args, "-c:v", "libx264"));
        assert!(has_pair(&args, "-t", "2.500"));
        assert_eq!(args.last().unwrap(), "out/output_reel.mp4");
    }

    #[test]
    fn test_args_for_webm() {
        let tl = timeline(Background::Transparent, 1.0);
        let args = FfmpegEncoder::default().args(
            &EncodeProfile::webm_alpha(24.0),
            &tl,
            Path::new("output_reel.webm"),
        );
        assert!(has_pair(&args, "-pix_fmt", "yuva420p"));
        assert!(has_pair(&args, "-c:a", "libopus"));
    }

    #[test]
    fn test_missing_ffmpeg_is_encode_error() {
        let tl = timeline(Background::Solid(Color::BLACK), 1.0);
        let encoder = FfmpegEncoder::new("/nonexistent/ffmpeg");
        assert!(!encoder.is_available());
        let err = encoder
            .encode(&tl, &EncodeProfile::mp4(24.0), Path::new("/tmp/never.mp4"))
            .unwrap_err();
        assert!(matches!(err, ReelError::Encode(_)));
    }

    #[test]
    fn test_profile_must_match_background() {
        let tl = timeline(Background::Transparent, 1.0);
        let err = FfmpegEncoder::default()
            .encode(&tl, &EncodeProfile::mp4(24.0), Path::new("/tmp/never.mp4"))
            .unwrap_err();
        assert!(matches!(err, ReelError::Encode(_)));
    }

    #[test]
    fn test_discard_partial_removes_file() {
        let path = std::env::temp_dir().join(format!("reel-partial-{}.mp4", std::process::id()));
        std::fs::write(&path, b"truncated").unwrap();
        discard_partial(&path);
        assert!(!path.exists());
        discard_partial(&path);
    }
}
