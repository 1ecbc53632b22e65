use std::path::PathBuf;
use std::sync::Arc;

use reel_core::hash::hash_frame;
use reel_core::{Background, Duration, FrameBuffer, Style, VerticalAnchor};
use reel_ir::validate::{validate_chunks, validate_schedule, validate_timeline};
use reel_ir::{
    AudioTrack, Chunk, ChunkPlanner, ProportionalAllocator, Schedule, Script, TimeAllocator,
    Timeline, TimelineAssembler,
};
use reel_render::{CaptionPipeline, CaptionRasterizer, Compositor, Typeface};

const WIDTH: u32 = 540;
const HEIGHT: u32 = 960;

fn rasterizer(style: &Style) -> CaptionRasterizer {
    CaptionRasterizer::new(style, WIDTH, HEIGHT, Arc::new(Typeface::Builtin))
}

fn plan(text: &str, seconds: f64, max_words: usize) -> (Schedule, Vec<Chunk>) {
    let schedule = ProportionalAllocator
        .allocate(Script::new(text).words(), Duration::from_seconds(seconds))
        .expect("non-empty script");
    let chunks = ChunkPlanner::new(max_words)
        .expect("valid max words")
        .plan(&schedule);
    (schedule, chunks)
}

fn build_timeline(text: &str, seconds: f64, style: &Style) -> Timeline {
    let (schedule, chunks) = plan(text, seconds, style.max_words);
    let frames = CaptionPipeline::new(rasterizer(style))
        .render(&schedule, chunks)
        .expect("caption frames render");
    TimelineAssembler::new(WIDTH, HEIGHT)
        .assemble(
            style.background,
            frames,
            AudioTrack {
                path: PathBuf::from("voice.mp3"),
                duration: Duration::from_seconds(seconds),
            },
        )
        .expect("timeline assembles")
}

/// Pixels that are neither transparent nor in one of the fill colours: the outline.
fn outline_mask(fb: &FrameBuffer, fills: &[[u8; 4]]) -> Vec<bool> {
    fb.data
        .chunks_exact(4)
        .map(|p| p[3] != 0 && !fills.iter().any(|f| f == p))
        .collect()
}

#[test]
fn test_highlight_states_share_layout() {
    let style = Style::default();
    let r = rasterizer(&style);
    let (_, chunks) = plan("Success is waiting for those who show up every day", 5.0, 10);
    let chunk = &chunks[0];

    let layout = r.layout(&chunk.words);
    assert!(layout.lines.len() > 1, "chunk should wrap at this width");

    let fills = [style.text_color.to_rgba8(), style.highlight_color.to_rgba8()];
    let frames = r.render_all(&chunk.words);
    assert_eq!(frames.len(), chunk.len());

    let reference_outline = outline_mask(&frames[0], &fills);
    for (h, frame) in frames.iter().enumerate() {
        assert_eq!((frame.width, frame.height), (WIDTH, HEIGHT));
        assert_eq!(outline_mask(frame, &fills), reference_outline, "highlight {h}");

        // Highlight-coloured pixels all fall inside the highlighted word's box.
        let (line, word) = layout
            .words()
            .find(|(_, w)| w.index == h)
            .expect("every word is placed");
        let x_range = word.x..word.x + word.width;
        let y_range = line.y..line.y + style.font_size as i32;
        let mut highlighted = 0;
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                if frame.get_pixel(x, y) == Some(fills[1]) {
                    highlighted += 1;
                    assert!(x_range.contains(&(x as i32)) && y_range.contains(&(y as i32)));
                }
            }
        }
        assert!(highlighted > 0, "highlight {h} drew no pixels");
    }
}

#[test]
fn test_outline_face_captions_hold_still() {
    let style = Style::default();
    let face = Typeface::from_bytes(
        "DejaVuSans-Bold",
        include_bytes!("../assets/DejaVuSans-Bold.ttf").to_vec(),
    )
    .expect("embedded font parses");
    let r = CaptionRasterizer::new(&style, 1080, 1920, Arc::new(face));
    let (schedule, chunks) = plan(
        "Success is waiting for those who show up and never quit today",
        4.0,
        10,
    );
    assert_eq!(chunks.len(), 2);
    let layouts: Vec<_> = chunks.iter().map(|c| r.layout(&c.words)).collect();
    for layout in &layouts {
        for line in &layout.lines {
            assert!(line.width <= 1080 - 2 * 50, "line width {}", line.width);
        }
    }
    assert!(layouts[0].lines.len() > 1);

    let frames = CaptionPipeline::new(r)
        .sequential()
        .render(&schedule, chunks)
        .expect("caption frames render");
    assert_eq!(frames.len(), 11);

    // Coverage is the same for every highlight state of the first chunk.
    let alpha = |fb: &FrameBuffer| fb.data.iter().skip(3).step_by(4).copied().collect::<Vec<_>>();
    let reference = alpha(&frames[0].image.pixels);
    for frame in &frames[1..10] {
        assert_eq!((frame.image.x, frame.image.y), (frames[0].image.x, frames[0].image.y));
        assert_eq!(alpha(&frame.image.pixels), reference);
    }
    assert_ne!(alpha(&frames[10].image.pixels), reference);
}

#[test]
fn test_rendering_is_deterministic() {
    let style = Style::default();
    let text = "Discipline beats motivation when motivation runs out";
    let a = build_timeline(text, 3.3, &style);
    let b = build_timeline(text, 3.3, &style);

    assert_eq!(a.caption_frames.len(), b.caption_frames.len());
    for (fa, fb) in a.caption_frames.iter().zip(&b.caption_frames) {
        assert_eq!(fa.start, fb.start);
        assert_eq!(fa.duration, fb.duration);
        assert_eq!(hash_frame(&fa.image.pixels), hash_frame(&fb.image.pixels));
    }

    let ra = Compositor::new(&a, 24.0).render_all();
    let rb = Compositor::new(&b, 24.0).render_all();
    assert_eq!(ra.content_hash(), rb.content_hash());
}

#[test]
fn test_single_word_spans_whole_audio() {
    let style = Style::default();
    let timeline = build_timeline("Hello", 1.7, &style);
    assert_eq!(timeline.caption_frames.len(), 1);
    let frame = &timeline.caption_frames[0];
    assert!(frame.start.is_zero());
    assert!(frame.duration.approx_eq(Duration::from_seconds(1.7), 1e-9));
    assert!(validate_timeline(&timeline).is_ok());
}

#[test]
fn test_pipeline_output_validates() {
    let style = Style {
        max_words: 3,
        anchor: VerticalAnchor::Bottom,
        ..Style::default()
    };
    let text = "one two three four five six seven eight nine ten eleven twelve";
    let (schedule, chunks) = plan(text, 6.0, 3);
    assert!(validate_schedule(&schedule).is_ok());
    assert!(validate_chunks(&chunks, &schedule, 3).is_ok());

    let timeline = build_timeline(text, 6.0, &style);
    assert_eq!(timeline.caption_frames.len(), 12);
    assert!(validate_timeline(&timeline).is_ok());
}

#[test]
fn test_transparent_reel_frames_keep_alpha() {
    let style = Style {
        background: Background::Transparent,
        ..Style::default()
    };
    let timeline = build_timeline("Wake up early", 2.2, &style);
    let compositor = Compositor::new(&timeline, 24.0);
    assert_eq!(compositor.frame_count(), 53);
    let frame = compositor.render_frame(0);
    assert_eq!(frame.get_pixel(0, 0), Some([0, 0, 0, 0]));
    assert!(!frame.is_fully_transparent());
}
