use std::fmt;

use reel_core::Background;

/// Frame rate of every reel.
pub const DEFAULT_FPS: f64 = 24.0;

/// Base name of the encoded file; the extension follows the container.
pub const OUTPUT_STEM: &str = "output_reel";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Mp4,
    Webm,
}

impl Container {
    pub fn extension(&self) -> &'static str {
        match self {
            Container::Mp4 => "mp4",
            Container::Webm => "webm",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Container::Mp4 => "video/mp4",
            Container::Webm => "video/webm",
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Codec settings handed to the encoder.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeProfile {
    pub container: Container,
    pub video_codec: &'static str,
    pub pixel_format: &'static str,
    pub audio_codec: &'static str,
    pub preset: Option<&'static str>,
    pub fps: f64,
}

impl EncodeProfile {
    /// H.264 + AAC with the fastest preset.
    pub fn mp4(fps: f64) -> Self {
        Self {
            container: Container::Mp4,
            video_codec: "libx264",
            pixel_format: "yuv420p",
            audio_codec: "aac",
            preset: Some("ultrafast"),
            fps,
        }
    }

    /// VP9 with an alpha plane.
    pub fn webm_alpha(fps: f64) -> Self {
        Self {
            container: Container::Webm,
            video_codec: "libvpx-vp9",
            pixel_format: "yuva420p",
            audio_codec: "libopus",
            preset: None,
            fps,
        }
    }

    /// Transparent reels need a container that keeps alpha.
    pub fn for_background(background: &Background, fps: f64) -> Self {
        if background.is_transparent() {
            Self::webm_alpha(fps)
        } else {
            Self::mp4(fps)
        }
    }

    pub fn has_alpha(&self) -> bool {
        self.pixel_format.starts_with("yuva")
    }

    pub fn extension(&self) -> &'static str {
        self.container.extension()
    }

    /// `output_reel.mp4` or `output_reel.webm`.
    pub fn output_file_name(&self) -> String {
        format!("{}.{}", OUTPUT_STEM, self.extension())
    }

    /// FFmpeg output options for this profile.
    pub fn output_args(&self) -> Vec<String> {
        let mut args = vec![
            "-c:v".to_string(),
            self.video_codec.to_string(),
            "-pix_fmt".to_string(),
            self.pixel_format.to_string(),
        ];
        if let Some(preset) = self.preset {
            args.extend(["-preset".to_string(), preset.to_string()]);
        }
        match self.container {
            Container::Mp4 => args.extend(["-movflags".to_string(), "+faststart".to_string()]),
            // Constant-quality mode; VP9 otherwise caps bitrate low.
            Container::Webm => args.extend([
                "-b:v".to_string(),
                "0".to_string(),
                "-crf".to_string(),
                "31".to_string(),
                "-row-mt".to_string(),
                "1".to_string(),
            ]),
        }
        args.extend(["-c:a".to_string(), self.audio_codec.to_string()]);
        args
    }
}
