//! Text rasterization.
//!
//! Outline fonts go through fontdue; the built-in bitmap face covers the case
//! where no font file can be loaded. Both produce the same [`GlyphBitmap`]
//! shape, so layout and drawing never care which one is in use.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;
use fontdue::{Font, FontSettings};
use reel_core::{Color, FrameBuffer, ReelError, ReelResult};

use crate::bitmap_font;

/// One rasterized glyph, positioned relative to the pen and the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphBitmap {
    pub width: usize,
    pub height: usize,
    /// Offset from the pen position to the bitmap's left edge.
    pub xmin: i32,
    /// Offset from the baseline to the bitmap's bottom edge (positive is up).
    pub ymin: i32,
    pub advance: f32,
    /// Row-major coverage, one byte per pixel.
    pub coverage: Vec<u8>,
}

/// A loaded face.
#[derive(Clone)]
pub enum Typeface {
    Outline { name: String, font: Font },
    Builtin,
}

impl fmt::Debug for Typeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Typeface::Outline { name, .. } => f.debug_tuple("Outline").field(name).finish(),
            Typeface::Builtin => f.write_str("Builtin"),
        }
    }
}

impl Typeface {
    /// Parse a TrueType/OpenType font.
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> ReelResult<Self> {
        let name = name.into();
        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|e| ReelError::Render(format!("failed to parse font {}: {}", name, e)))?;
        Ok(Typeface::Outline { name, font })
    }

    /// Read and parse a font file.
    pub fn load(path: &Path) -> ReelResult<Self> {
        let data = std::fs::read(path).map_err(|e| {
            ReelError::Render(format!("failed to read font file {}: {}", path.display(), e))
        })?;
        Self::from_bytes(path.display().to_string(), data)
    }

    pub fn name(&self) -> &str {
        match self {
            Typeface::Outline { name, .. } => name,
            Typeface::Builtin => "builtin",
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Typeface::Builtin)
    }

    pub fn rasterize(&self, ch: char, px: f32) -> GlyphBitmap {
        match self {
            Typeface::Outline { font, .. } => {
                let (metrics, coverage) = font.rasterize(ch, px);
                GlyphBitmap {
                    width: metrics.width,
                    height: metrics.height,
                    xmin: metrics.xmin,
                    ymin: metrics.ymin,
                    advance: metrics.advance_width,
                    coverage,
                }
            }
            Typeface::Builtin => rasterize_builtin(ch, px),
        }
    }

    /// Distance from the top of a line to its baseline.
    pub fn ascent(&self, px: f32) -> f32 {
        match self {
            Typeface::Outline { font, .. } => font
                .horizontal_line_metrics(px)
                .map(|m| m.ascent)
                .unwrap_or(px * 0.8),
            Typeface::Builtin => (bitmap_font::ASCENT_ROWS * bitmap_font::scale_for(px)) as f32,
        }
    }

    pub fn kern(&self, left: char, right: char, px: f32) -> f32 {
        match self {
            Typeface::Outline { font, .. } => font.horizontal_kern(left, right, px).unwrap_or(0.0),
            Typeface::Builtin => 0.0,
        }
    }
}

fn rasterize_builtin(ch: char, px: f32) -> GlyphBitmap {
    let scale = bitmap_font::scale_for(px);
    let width = (bitmap_font::GLYPH_COLUMNS * scale) as usize;
    let height = (bitmap_font::GLYPH_ROWS * scale) as usize;
    let mut coverage = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            if bitmap_font::is_set(ch, x as u32 / scale, y as u32 / scale) {
                coverage[y * width + x] = 255;
            }
        }
    }
    GlyphBitmap {
        width,
        height,
        xmin: 0,
        ymin: -(((bitmap_font::GLYPH_ROWS - bitmap_font::ASCENT_ROWS) * scale) as i32),
        advance: (bitmap_font::ADVANCE_COLUMNS * scale) as f32,
        coverage,
    }
}

/// Measures and draws text in one face at one size.
///
/// Glyphs are rasterized once and shared across threads.
pub struct TextRenderer {
    typeface: Arc<Typeface>,
    font_size: f32,
    glyphs: DashMap<char, Arc<GlyphBitmap>>,
}

impl TextRenderer {
    pub fn new(typeface: Arc<Typeface>, font_size: f32) -> Self {
        Self {
            typeface,
            font_size,
            glyphs: DashMap::new(),
        }
    }

    pub fn typeface(&self) -> &Typeface {
        &self.typeface
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    fn glyph(&self, ch: char) -> Arc<GlyphBitmap> {
        if let Some(glyph) = self.glyphs.get(&ch) {
            return Arc::clone(&glyph);
        }
        let glyph = Arc::new(self.typeface.rasterize(ch, self.font_size));
        self.glyphs.insert(ch, Arc::clone(&glyph));
        glyph
    }

    /// Advance width of `text` in pixels.
    pub fn measure(&self, text: &str) -> i32 {
        let mut width = 0.0f32;
        let mut previous: Option<char> = None;
        for ch in text.chars() {
            if let Some(prev) = previous {
                width += self.typeface.kern(prev, ch, self.font_size);
            }
            width += self.glyph(ch).advance;
            previous = Some(ch);
        }
        width.round() as i32
    }

    pub fn ascent(&self) -> i32 {
        self.typeface.ascent(self.font_size).round() as i32
    }

    /// Draw `text` with its line top-left at (`x`, `top`).
    pub fn draw(&self, fb: &mut FrameBuffer, text: &str, x: i32, top: i32, color: &Color) {
        self.draw_offset(fb, text, x, top, color, &[(0, 0)]);
    }

    /// Draw `text` once per offset. Used for outlines: stamping the same glyphs
    /// around the pen position thickens them in every direction.
    pub fn draw_offset(
        &self,
        fb: &mut FrameBuffer,
        text: &str,
        x: i32,
        top: i32,
        color: &Color,
        offsets: &[(i32, i32)],
    ) {
        let baseline = top + self.ascent();
        let mut cursor = x as f32;
        let mut previous: Option<char> = None;

        for ch in text.chars() {
            if let Some(prev) = previous {
                cursor += self.typeface.kern(prev, ch, self.font_size);
            }
            let glyph = self.glyph(ch);
            let glyph_x = cursor.round() as i32 + glyph.xmin;
            let glyph_y = baseline - (glyph.height as i32 + glyph.ymin);

            for &(dx, dy) in offsets {
                blit_glyph(fb, &glyph, glyph_x + dx, glyph_y + dy, color);
            }

            cursor += glyph.advance;
            previous = Some(ch);
        }
    }
}

fn blit_glyph(fb: &mut FrameBuffer, glyph: &GlyphBitmap, x: i32, y: i32, color: &Color) {
    for gy in 0..glyph.height {
        for gx in 0..glyph.width {
            let coverage = glyph.coverage[gy * glyph.width + gx];
            if coverage == 0 {
                continue;
            }
            fb.blend_pixel(x + gx as i32, y + gy as i32, color, coverage);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin(size: f32) -> TextRenderer {
        TextRenderer::new(Arc::new(Typeface::Builtin), size)
    }

    #[test]
    fn test_builtin_metrics() {
        let renderer = builtin(80.0);
        assert_eq!(renderer.measure("ab"), 120);
        assert_eq!(renderer.measure(""), 0);
        assert_eq!(renderer.ascent(), 70);
    }

    #[test]
    fn test_draw_single_glyph() {
        let renderer = builtin(8.0);
        let mut fb = FrameBuffer::new(8, 8);
        renderer.draw(&mut fb, "I", 0, 0, &Color::RED);
        // 'I' has a full vertical bar in its middle column, rows 0..=6.
        for y in 0..7 {
            assert_eq!(fb.get_pixel(2, y), Some([255, 0, 0, 255]));
        }
        assert_eq!(fb.get_pixel(2, 7), Some([0, 0, 0, 0]));
        assert_eq!(fb.get_pixel(0, 3), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_draw_clips_at_edges() {
        let renderer = builtin(40.0);
        let mut fb = FrameBuffer::new(10, 10);
        renderer.draw(&mut fb, "Hello", -15, -20, &Color::WHITE);
        assert_eq!(fb.width, 10);
    }

    #[test]
    fn test_offsets_thicken_glyphs() {
        let renderer = builtin(8.0);
        let mut plain = FrameBuffer::new(16, 16);
        renderer.draw(&mut plain, "I", 4, 4, &Color::BLACK);
        let mut thick = FrameBuffer::new(16, 16);
        renderer.draw_offset(&mut thick, "I", 4, 4, &Color::BLACK, &[(-1, 0), (0, 0), (1, 0)]);
        assert!(thick.count_pixels([0, 0, 0, 255]) > plain.count_pixels([0, 0, 0, 255]));
    }

    #[test]
    fn test_glyphs_are_cached() {
        let renderer = builtin(40.0);
        renderer.measure("aaa");
        assert_eq!(renderer.glyphs.len(), 1);
    }

    #[test]
    fn test_invalid_font_bytes() {
        let err = Typeface::from_bytes("junk", vec![0, 1, 2, 3]).unwrap_err();
        assert!(matches!(err, ReelError::Render(_)));
    }

    #[test]
    fn test_outline_face_metrics() {
        let face = Typeface::from_bytes(
            "DejaVuSans-Bold",
            include_bytes!("../assets/DejaVuSans-Bold.ttf").to_vec(),
        )
        .unwrap();
        assert_eq!(face.name(), "DejaVuSans-Bold");
        assert!(!face.is_builtin());

        let renderer = TextRenderer::new(Arc::new(face), 80.0);
        let ascent = renderer.ascent();
        assert!(ascent > 40 && ascent < 80, "ascent {ascent}");
        assert!(renderer.measure("W") > renderer.measure("i"));

        let mut fb = FrameBuffer::new(200, 100);
        renderer.draw(&mut fb, "Hi", 10, 0, &Color::WHITE);
        assert!(!fb.is_fully_transparent());
        assert_eq!(fb.get_pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_missing_font_file() {
        assert!(Typeface::load(Path::new("/nonexistent/font.ttf")).is_err());
    }
}
