use criterion::{criterion_group, criterion_main, Criterion};
use std::path::PathBuf;
use std::sync::Arc;

use reel_core::{Duration, Style};
use reel_ir::{AudioTrack, ChunkPlanner, ProportionalAllocator, Script, TimeAllocator, TimelineAssembler};
use reel_render::{CaptionPipeline, CaptionRasterizer, Compositor, FontResolver};

const SCRIPT: &str = "Wake up early. Grind hard. Success is waiting for those who show up \
                      every single day, even when nobody is watching and the results are slow.";

fn pipeline(style: &Style) -> CaptionPipeline {
    // Uses a real system font when one is installed, like a production run would.
    let (typeface, _) = FontResolver::default().resolve(style.font_family);
    CaptionPipeline::new(CaptionRasterizer::new(style, 1080, 1920, Arc::new(typeface)))
}

fn bench_caption_frames(c: &mut Criterion) {
    let style = Style::default();
    let script = Script::new(SCRIPT);
    let schedule = ProportionalAllocator
        .allocate(script.words(), Duration::from_seconds(9.0))
        .unwrap();
    let chunks = ChunkPlanner::new(style.max_words).unwrap().plan(&schedule);

    let parallel = pipeline(&style);
    let sequential = pipeline(&style).sequential();

    let mut group = c.benchmark_group("Caption Frames");
    group.sample_size(10);
    group.bench_function("parallel", |b| {
        b.iter(|| parallel.render(&schedule, chunks.clone()).unwrap())
    });
    group.bench_function("sequential", |b| {
        b.iter(|| sequential.render(&schedule, chunks.clone()).unwrap())
    });
    group.finish();
}

fn bench_compositing(c: &mut Criterion) {
    let style = Style::default();
    let schedule = ProportionalAllocator
        .allocate(Script::new(SCRIPT).words(), Duration::from_seconds(9.0))
        .unwrap();
    let chunks = ChunkPlanner::new(style.max_words).unwrap().plan(&schedule);
    let frames = pipeline(&style).render(&schedule, chunks).unwrap();
    let timeline = TimelineAssembler::new(1080, 1920)
        .assemble(
            style.background,
            frames,
            AudioTrack {
                path: PathBuf::from("voice.mp3"),
                duration: Duration::from_seconds(9.0),
            },
        )
        .unwrap();
    let compositor = Compositor::new(&timeline, 24.0);

    let mut group = c.benchmark_group("Compositing");
    group.sample_size(10);
    group.bench_function("single frame", |b| b.iter(|| compositor.render_frame(100)));
    group.finish();
}

criterion_group!(benches, bench_caption_frames, bench_compositing);
criterion_main!(benches);
