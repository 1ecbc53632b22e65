//! Still previews of caption styling, rendered without narration.

use std::path::{Path, PathBuf};

use reel_core::{ReelConfig, ReelError, ReelResult, Style};
use reel_ir::{BackgroundLayer, ChunkPlanner, ProportionalAllocator, Script, TimeAllocator};
use reel_render::image_io::save_image;
use reel_render::{CaptionPipeline, FontSource};

/// Words spoken by a voice preview.
pub const VOICE_SAMPLE_WORDS: usize = 15;

/// Spoken when a voice preview is requested without text.
pub const DEFAULT_VOICE_SAMPLE: &str = "This is a preview of my voice. How do I sound?";

/// Which highlight state of which chunk to draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreviewTarget {
    pub chunk: usize,
    pub highlight: usize,
}

#[derive(Debug, Clone)]
pub struct PreviewOutput {
    pub path: PathBuf,
    pub chunk_count: usize,
    pub caption: String,
    pub font: FontSource,
}

/// Render one caption state over the style's background and save it as an image.
///
/// Timing comes from the reading-speed estimate, since no audio exists yet.
pub fn render_preview(
    config: &ReelConfig,
    style: &Style,
    text: &str,
    target: PreviewTarget,
    output: &Path,
) -> ReelResult<PreviewOutput> {
    let script = Script::new(text);
    if script.is_empty() {
        return Err(ReelError::EmptyScript);
    }
    style.check()?;
    let estimate = script.estimated_duration();
    let schedule = ProportionalAllocator.allocate(script.words(), estimate)?;
    let chunks = ChunkPlanner::new(style.max_words)?.plan(&schedule);
    let chunk = chunks.get(target.chunk).ok_or_else(|| {
        ReelError::InvalidArgument(format!(
            "chunk {} out of range, script has {} chunks",
            target.chunk,
            chunks.len()
        ))
    })?;

    let (pipeline, font) = CaptionPipeline::from_config(style, config);
    let caption = pipeline.rasterizer().render(&chunk.words, target.highlight)?;

    let (width, height) = (config.render.width, config.render.height);
    let mut frame = BackgroundLayer {
        fill: style.background,
        duration: estimate,
    }
    .render(width, height);
    frame.composite_over(&caption, 0, 0);

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    save_image(&frame, output)?;
    tracing::info!(
        path = %output.display(),
        chunk = target.chunk,
        highlight = target.highlight,
        "saved preview"
    );

    Ok(PreviewOutput {
        path: output.to_path_buf(),
        chunk_count: chunks.len(),
        caption: chunk.text(),
        font,
    })
}

/// Text used to audition a voice: the opening of `text`, or a stock sentence.
pub fn voice_sample(text: Option<&str>) -> String {
    let excerpt = text
        .map(|t| Script::new(t).excerpt(VOICE_SAMPLE_WORDS))
        .unwrap_or_default();
    if excerpt.is_empty() {
        DEFAULT_VOICE_SAMPLE.to_string()
    } else {
        excerpt
    }
}
