use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::style::StyleConfig;
use crate::{ReelError, ReelResult};

/// Reference canvas the layout constants are expressed against.
pub const REFERENCE_WIDTH: u32 = 1080;
pub const REFERENCE_HEIGHT: u32 = 1920;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    /// Rasterize caption frames on the rayon pool.
    pub parallel: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: REFERENCE_WIDTH,
            height: REFERENCE_HEIGHT,
            fps: 24.0,
            parallel: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FontsConfig {
    /// Directories searched, in order, for a family's font file.
    pub search_dirs: Vec<PathBuf>,
    /// Font tried when the requested family cannot be loaded.
    pub fallback: PathBuf,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            search_dirs: vec![
                PathBuf::from("fonts"),
                PathBuf::from("/usr/share/fonts/truetype/msttcorefonts"),
                PathBuf::from("/usr/share/fonts/TTF"),
                PathBuf::from("/Library/Fonts"),
                PathBuf::from("C:\\Windows\\Fonts"),
            ],
            fallback: PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root under which each request gets its own working directory.
    pub scratch_dir: PathBuf,
    /// Keep request working directories after a successful run.
    pub keep_scratch: bool,
    /// Also write an `.srt` caption sidecar next to the video.
    pub write_srt: bool,
    /// Executable used to encode the final video.
    pub ffmpeg: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            scratch_dir: PathBuf::from("temp"),
            keep_scratch: false,
            write_srt: false,
            ffmpeg: "ffmpeg".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TtsConfig {
    /// Executable of the edge-tts command-line client.
    pub command: String,
    /// Executable used to measure the synthesized audio.
    pub ffprobe: String,
    /// Voice display name or backend id.
    pub voice: String,
    /// Speaking speed multiplier (1.0 = natural).
    pub speed: f64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            command: "edge-tts".to_string(),
            ffprobe: "ffprobe".to_string(),
            voice: "Andrew (Neural) - US Male".to_string(),
            speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct ReelConfig {
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub fonts: FontsConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub tts: TtsConfig,
}

impl ReelConfig {
    pub fn load_from_file(path: &Path) -> ReelResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents).map_err(|e| match e {
            ReelError::Config { message, .. } => ReelError::config(message, path),
            other => other,
        })
    }

    pub fn from_toml(contents: &str) -> ReelResult<Self> {
        toml::from_str(contents).map_err(|e| ReelError::config(e.to_string(), "<inline>"))
    }

    pub fn save_to_file(&self, path: &Path) -> ReelResult<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ReelError::config(e.to_string(), path))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> ReelResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}
