//! Caption style: the user-facing options and their validated form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Color, ReelError, ReelResult};

pub const MIN_FONT_SIZE: u32 = 40;
pub const MAX_FONT_SIZE: u32 = 150;
pub const MIN_WORDS_PER_CHUNK: usize = 1;
pub const MAX_WORDS_PER_CHUNK: usize = 10;

/// Font families offered to users, each backed by a TrueType file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFamily {
    Arial,
    ArialBold,
    TimesNewRoman,
    CourierNew,
    Verdana,
    Georgia,
    Impact,
    ComicSans,
}

impl FontFamily {
    pub const ALL: [FontFamily; 8] = [
        FontFamily::Arial,
        FontFamily::ArialBold,
        FontFamily::TimesNewRoman,
        FontFamily::CourierNew,
        FontFamily::Verdana,
        FontFamily::Georgia,
        FontFamily::Impact,
        FontFamily::ComicSans,
    ];

    /// Human-readable family name.
    pub fn display_name(&self) -> &'static str {
        match self {
            FontFamily::Arial => "Arial",
            FontFamily::ArialBold => "Arial Bold",
            FontFamily::TimesNewRoman => "Times New Roman",
            FontFamily::CourierNew => "Courier New",
            FontFamily::Verdana => "Verdana",
            FontFamily::Georgia => "Georgia",
            FontFamily::Impact => "Impact",
            FontFamily::ComicSans => "Comic Sans",
        }
    }

    /// File name of the family's TrueType font.
    pub fn file_name(&self) -> &'static str {
        match self {
            FontFamily::Arial => "arial.ttf",
            FontFamily::ArialBold => "arialbd.ttf",
            FontFamily::TimesNewRoman => "times.ttf",
            FontFamily::CourierNew => "cour.ttf",
            FontFamily::Verdana => "verdana.ttf",
            FontFamily::Georgia => "georgia.ttf",
            FontFamily::Impact => "impact.ttf",
            FontFamily::ComicSans => "comic.ttf",
        }
    }
}

impl Default for FontFamily {
    fn default() -> Self {
        FontFamily::ArialBold
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for FontFamily {
    type Err = ReelError;

    /// Accepts display names ("Arial Bold") and kebab-case ("arial-bold"), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        FontFamily::ALL
            .into_iter()
            .find(|f| normalize(f.display_name()) == wanted)
            .ok_or_else(|| ReelError::InvalidStyle(format!("unknown font family '{}'", s)))
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Where the caption block sits vertically on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAnchor {
    #[default]
    Center,
    /// Block top sits a fixed distance above the canvas bottom.
    Bottom,
}

impl FromStr for VerticalAnchor {
    type Err = ReelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "center" | "centre" => Ok(VerticalAnchor::Center),
            "bottom" => Ok(VerticalAnchor::Bottom),
            other => Err(ReelError::InvalidStyle(format!(
                "unknown vertical anchor '{}' (expected center or bottom)",
                other
            ))),
        }
    }
}

/// Reel background: an opaque fill or full transparency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Solid(Color),
    Transparent,
}

impl Background {
    pub fn is_transparent(&self) -> bool {
        matches!(self, Background::Transparent)
    }

    /// The color the background layer is filled with.
    pub fn fill(&self) -> Color {
        match self {
            Background::Solid(c) => *c,
            Background::Transparent => Color::TRANSPARENT,
        }
    }
}

impl FromStr for Background {
    type Err = ReelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("transparent") {
            return Ok(Background::Transparent);
        }
        let color = Color::from_hex(s)
            .map_err(|e| ReelError::InvalidStyle(format!("background: {}", e)))?;
        Ok(Background::Solid(color.with_alpha(255)))
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Background::Solid(c) => write!(f, "{}", c),
            Background::Transparent => f.write_str("transparent"),
        }
    }
}

/// Raw style options as written in config files and passed on the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Hex color or `"transparent"`.
    pub background: String,
    pub text_color: String,
    pub highlight_color: String,
    pub font_family: FontFamily,
    pub font_size: u32,
    pub max_words: usize,
    pub anchor: VerticalAnchor,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background: "#1E1E1E".to_string(),
            text_color: "#FFFFFF".to_string(),
            highlight_color: "#FF4B4B".to_string(),
            font_family: FontFamily::default(),
            font_size: 80,
            max_words: 5,
            anchor: VerticalAnchor::Center,
        }
    }
}

impl StyleConfig {
    /// Check ranges and parse colors into a [`Style`].
    pub fn validate(&self) -> ReelResult<Style> {
        check_ranges(self.font_size, self.max_words)?;
        let text_color = Color::from_hex(&self.text_color)
            .map_err(|e| ReelError::InvalidStyle(format!("text color: {}", e)))?;
        let highlight_color = Color::from_hex(&self.highlight_color)
            .map_err(|e| ReelError::InvalidStyle(format!("highlight color: {}", e)))?;

        Ok(Style {
            background: self.background.parse()?,
            text_color,
            highlight_color,
            font_family: self.font_family,
            font_size: self.font_size,
            max_words: self.max_words,
            anchor: self.anchor,
        })
    }
}

fn check_ranges(font_size: u32, max_words: usize) -> ReelResult<()> {
    if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&font_size) {
        return Err(ReelError::InvalidStyle(format!(
            "font size {} is outside {}..={}",
            font_size, MIN_FONT_SIZE, MAX_FONT_SIZE
        )));
    }
    if !(MIN_WORDS_PER_CHUNK..=MAX_WORDS_PER_CHUNK).contains(&max_words) {
        return Err(ReelError::InvalidStyle(format!(
            "words per chunk {} is outside {}..={}",
            max_words, MIN_WORDS_PER_CHUNK, MAX_WORDS_PER_CHUNK
        )));
    }
    Ok(())
}

/// Caption style consumed by the engine.
///
/// [`StyleConfig::validate`] produces one within range; a `Style` built by
/// hand should go through [`Style::check`] before use.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub background: Background,
    pub text_color: Color,
    pub highlight_color: Color,
    pub font_family: FontFamily,
    pub font_size: u32,
    pub max_words: usize,
    pub anchor: VerticalAnchor,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            background: Background::Solid(Color::rgb(0x1E, 0x1E, 0x1E)),
            text_color: Color::WHITE,
            highlight_color: Color::rgb(0xFF, 0x4B, 0x4B),
            font_family: FontFamily::default(),
            font_size: 80,
            max_words: 5,
            anchor: VerticalAnchor::Center,
        }
    }
}

impl Style {
    /// Enforce the same ranges as [`StyleConfig::validate`].
    pub fn check(&self) -> ReelResult<()> {
        check_ranges(self.font_size, self.max_words)
    }
}
