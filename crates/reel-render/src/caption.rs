//! Caption rasterization.
//!
//! A chunk is laid out once (greedy word wrap, centred lines, block placed by
//! the vertical anchor) and the same layout is reused for every highlight
//! state, so captions never shift as the highlight moves from word to word.
//!
//! Pixel constants are given for the 1080×1920 reference canvas and scaled to
//! the actual canvas. Font size and stroke width are not scaled.

use std::sync::Arc;

use reel_core::{
    Color, FrameBuffer, ReelError, ReelResult, Style, VerticalAnchor, REFERENCE_HEIGHT,
    REFERENCE_WIDTH,
};
use reel_ir::Word;

use crate::text::{TextRenderer, Typeface};

/// Horizontal inset on each side at the reference width.
pub const REFERENCE_MARGIN: f32 = 50.0;
/// Gap between lines at the reference height.
pub const REFERENCE_LINE_SPACING: f32 = 10.0;
/// Distance of a bottom-anchored block's top from the canvas bottom, at the reference height.
pub const REFERENCE_BOTTOM_OFFSET: f32 = 500.0;

pub const STROKE_WIDTH: i32 = 2;
pub const STROKE_COLOR: Color = Color::BLACK;

/// Layout distances for one canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutMetrics {
    pub margin: i32,
    pub line_spacing: i32,
    pub bottom_offset: i32,
}

impl LayoutMetrics {
    pub fn for_canvas(width: u32, height: u32) -> Self {
        let sx = width as f32 / REFERENCE_WIDTH as f32;
        let sy = height as f32 / REFERENCE_HEIGHT as f32;
        Self {
            margin: (REFERENCE_MARGIN * sx).round() as i32,
            line_spacing: (REFERENCE_LINE_SPACING * sy).round() as i32,
            bottom_offset: (REFERENCE_BOTTOM_OFFSET * sy).round() as i32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedWord {
    /// Position of the word within its chunk.
    pub index: usize,
    pub text: String,
    /// Left edge of the word's pen position.
    pub x: i32,
    pub width: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionLine {
    pub words: Vec<PlacedWord>,
    pub x: i32,
    /// Top of the line.
    pub y: i32,
    pub width: i32,
}

/// Where every word of a chunk goes on the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionLayout {
    pub lines: Vec<CaptionLine>,
    pub top: i32,
    pub block_height: i32,
}

impl CaptionLayout {
    /// Number of words on each line.
    pub fn line_breaks(&self) -> Vec<usize> {
        self.lines.iter().map(|l| l.words.len()).collect()
    }

    pub fn word_count(&self) -> usize {
        self.lines.iter().map(|l| l.words.len()).sum()
    }

    pub fn words(&self) -> impl Iterator<Item = (&CaptionLine, &PlacedWord)> {
        self.lines
            .iter()
            .flat_map(|line| line.words.iter().map(move |w| (line, w)))
    }
}

/// Renders chunks of words into transparent, canvas-sized caption rasters.
pub struct CaptionRasterizer {
    width: u32,
    height: u32,
    text: TextRenderer,
    text_color: Color,
    highlight_color: Color,
    anchor: VerticalAnchor,
    font_size: i32,
    metrics: LayoutMetrics,
}

impl CaptionRasterizer {
    pub fn new(style: &Style, width: u32, height: u32, typeface: Arc<Typeface>) -> Self {
        Self {
            width,
            height,
            text: TextRenderer::new(typeface, style.font_size as f32),
            text_color: style.text_color,
            highlight_color: style.highlight_color,
            anchor: style.anchor,
            font_size: style.font_size as i32,
            metrics: LayoutMetrics::for_canvas(width, height),
        }
    }

    pub fn metrics(&self) -> LayoutMetrics {
        self.metrics
    }

    /// Greedy word wrap. Returns word indices grouped by line.
    ///
    /// A word wider than the line on its own still gets a line to itself.
    pub fn wrap(&self, words: &[&str]) -> Vec<Vec<usize>> {
        let max_width = self.width as i32 - 2 * self.metrics.margin;
        let mut lines: Vec<Vec<usize>> = Vec::new();
        let mut current: Vec<usize> = Vec::new();

        for (i, word) in words.iter().enumerate() {
            if !current.is_empty() {
                let candidate = current
                    .iter()
                    .map(|&j| words[j])
                    .chain(std::iter::once(*word))
                    .collect::<Vec<_>>()
                    .join(" ");
                if self.text.measure(&candidate) > max_width {
                    lines.push(std::mem::take(&mut current));
                }
            }
            current.push(i);
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    pub fn layout(&self, words: &[Word]) -> CaptionLayout {
        let texts: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
        let wrapped = self.wrap(&texts);

        let advance = self.font_size + self.metrics.line_spacing;
        let block_height = wrapped.len() as i32 * advance;
        let top = match self.anchor {
            VerticalAnchor::Center => (self.height as i32 - block_height) / 2,
            VerticalAnchor::Bottom => self.height as i32 - self.metrics.bottom_offset,
        };
        let space = self.text.measure(" ");

        let lines = wrapped
            .iter()
            .enumerate()
            .map(|(line_no, indices)| {
                let line_text = indices
                    .iter()
                    .map(|&i| texts[i])
                    .collect::<Vec<_>>()
                    .join(" ");
                let width = self.text.measure(&line_text);
                let x = (self.width as i32 - width) / 2;

                let mut cursor = x;
                let placed = indices
                    .iter()
                    .map(|&i| {
                        let word_width = self.text.measure(texts[i]);
                        let word = PlacedWord {
                            index: i,
                            text: texts[i].to_string(),
                            x: cursor,
                            width: word_width,
                        };
                        cursor += word_width + space;
                        word
                    })
                    .collect();

                CaptionLine {
                    words: placed,
                    x,
                    y: top + line_no as i32 * advance,
                    width,
                }
            })
            .collect();

        CaptionLayout {
            lines,
            top,
            block_height,
        }
    }

    /// Lay out `words` and draw their outlines, ready for any number of highlight states.
    pub fn prepare(&self, words: &[Word]) -> PreparedCaption<'_> {
        let layout = self.layout(words);
        let offsets = stroke_offsets(STROKE_WIDTH);
        let mut outline = FrameBuffer::new(self.width, self.height);
        for (line, word) in layout.words() {
            self.text
                .draw_offset(&mut outline, &word.text, word.x, line.y, &STROKE_COLOR, &offsets);
        }
        PreparedCaption {
            rasterizer: self,
            layout,
            outline,
        }
    }

    /// Render `words` with the word at `highlight` in the highlight colour.
    pub fn render(&self, words: &[Word], highlight: usize) -> ReelResult<FrameBuffer> {
        self.prepare(words).render(highlight)
    }

    /// Render every highlight state of `words`, in word order.
    pub fn render_all(&self, words: &[Word]) -> Vec<FrameBuffer> {
        let prepared = self.prepare(words);
        (0..prepared.word_count())
            .map(|h| prepared.render_unchecked(h))
            .collect()
    }
}

/// A laid-out chunk with its outline already drawn.
pub struct PreparedCaption<'r> {
    rasterizer: &'r CaptionRasterizer,
    layout: CaptionLayout,
    outline: FrameBuffer,
}

impl PreparedCaption<'_> {
    pub fn layout(&self) -> &CaptionLayout {
        &self.layout
    }

    pub fn word_count(&self) -> usize {
        self.layout.word_count()
    }

    pub fn render(&self, highlight: usize) -> ReelResult<FrameBuffer> {
        if highlight >= self.word_count() {
            return Err(ReelError::InvalidArgument(format!(
                "highlight index {} out of range for a {}-word caption",
                highlight,
                self.word_count()
            )));
        }
        Ok(self.render_unchecked(highlight))
    }

    fn render_unchecked(&self, highlight: usize) -> FrameBuffer {
        let r = self.rasterizer;
        let mut canvas = self.outline.clone();
        for (line, word) in self.layout.words() {
            let color = if word.index == highlight {
                &r.highlight_color
            } else {
                &r.text_color
            };
            r.text.draw(&mut canvas, &word.text, word.x, line.y, color);
        }
        canvas
    }
}

/// Every offset in `[-width, width]²`.
fn stroke_offsets(width: i32) -> Vec<(i32, i32)> {
    (-width..=width)
        .flat_map(|dx| (-width..=width).map(move |dy| (dx, dy)))
        .collect()
}
