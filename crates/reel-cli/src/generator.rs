//! One generation request, end to end.
//!
//! Narration is synthesized first because its length drives every timing
//! decision. Captions are then scheduled, chunked, rasterized and assembled
//! onto a timeline, which is encoded inside the request's own working
//! directory and only copied to the destination once encoding succeeded.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use reel_core::{Duration, ReelConfig, ReelError, ReelResult, Style};
use reel_encode::{Container, EncodeProfile, Encoder};
use reel_ir::validate::{validate_chunks, validate_schedule, validate_timeline};
use reel_ir::{AudioTrack, ChunkPlanner, ProportionalAllocator, Script, TimeAllocator, TimelineAssembler};
use reel_render::{CaptionPipeline, FontSource};
use reel_tts::{SpeechRate, SpeechRequest, SpeechSynthesizer, VoiceCatalog};

use crate::progress::{Milestone, ProgressObserver};
use crate::workdir::WorkDir;

/// Everything a user chooses for one reel.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub text: String,
    /// Catalogue voice name or backend id.
    pub voice: String,
    pub speed: f64,
    pub style: Style,
}

/// What a successful request produced.
#[derive(Debug, Clone)]
pub struct GenerateOutput {
    pub video: PathBuf,
    pub subtitles: Option<PathBuf>,
    pub container: Container,
    pub audio_duration: Duration,
    pub words: usize,
    pub chunks: usize,
    pub frames: u64,
    pub font: FontSource,
}

pub struct ReelGenerator {
    config: ReelConfig,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    encoder: Arc<dyn Encoder>,
    observer: Arc<dyn ProgressObserver>,
    voices: VoiceCatalog,
}

impl ReelGenerator {
    pub fn new(
        config: ReelConfig,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        encoder: Arc<dyn Encoder>,
        observer: Arc<dyn ProgressObserver>,
    ) -> Self {
        Self {
            config,
            synthesizer,
            encoder,
            observer,
            voices: VoiceCatalog,
        }
    }

    pub fn config(&self) -> &ReelConfig {
        &self.config
    }

    /// Generate a reel into `output_dir`. Failures are reported to the observer
    /// before being returned; no output file is left behind for them.
    pub fn generate(&self, request: &GenerateRequest, output_dir: &Path) -> ReelResult<GenerateOutput> {
        let result = self.run(request, output_dir);
        if let Err(e) = &result {
            self.observer.failed(e);
        }
        result
    }

    fn run(&self, request: &GenerateRequest, output_dir: &Path) -> ReelResult<GenerateOutput> {
        let script = Script::new(request.text.as_str());
        if script.is_empty() {
            return Err(ReelError::EmptyScript);
        }
        request.style.check()?;
        let rate = SpeechRate::from_speed(request.speed)?;
        let planner = ChunkPlanner::new(request.style.max_words)?;
        let voice_id = self.voices.resolve(&request.voice).to_string();

        let work = WorkDir::create(&self.config.output.scratch_dir, self.config.output.keep_scratch)?;

        let audio = self.synthesizer.synthesize(
            &SpeechRequest {
                text: script.text().to_string(),
                voice_id,
                rate,
            },
            work.path(),
        )?;
        self.observer.milestone(Milestone::VoiceGenerated);

        let schedule = ProportionalAllocator.allocate(script.words(), audio.duration)?;
        validate_schedule(&schedule).map_err(join_errors)?;
        self.observer.milestone(Milestone::AudioAnalyzed);

        let chunks = planner.plan(&schedule);
        validate_chunks(&chunks, &schedule, planner.max_words()).map_err(join_errors)?;
        let chunk_count = chunks.len();
        let (pipeline, font) = CaptionPipeline::from_config(&request.style, &self.config);
        self.observer.milestone(Milestone::Compositing);
        let caption_frames = pipeline.render(&schedule, chunks.clone())?;

        let (width, height) = (self.config.render.width, self.config.render.height);
        let timeline = TimelineAssembler::new(width, height).assemble(
            request.style.background,
            caption_frames,
            AudioTrack {
                path: audio.path.clone(),
                duration: audio.duration,
            },
        )?;
        validate_timeline(&timeline).map_err(join_errors)?;

        self.observer.milestone(Milestone::RenderingFinal);
        let profile = EncodeProfile::for_background(&request.style.background, self.config.render.fps);
        let staged = work.path().join(profile.output_file_name());
        let report = self.encoder.encode(&timeline, &profile, &staged)?;

        std::fs::create_dir_all(output_dir)?;
        let video = output_dir.join(profile.output_file_name());
        publish(&report.path, &video)?;

        let subtitles = if self.config.output.write_srt {
            let path = video.with_extension("srt");
            std::fs::write(&path, reel_ir::srt::to_srt(&chunks))?;
            Some(path)
        } else {
            None
        };

        tracing::info!(
            path = %video.display(),
            words = script.word_count(),
            chunks = chunk_count,
            frames = report.frames,
            seconds = audio.duration.as_seconds(),
            "reel ready"
        );

        Ok(GenerateOutput {
            video,
            subtitles,
            container: profile.container,
            audio_duration: audio.duration,
            words: script.word_count(),
            chunks: chunk_count,
            frames: report.frames,
            font,
        })
    }
}

/// Copy the encoded file to its destination. A failed copy leaves nothing behind.
fn publish(staged: &Path, video: &Path) -> ReelResult<()> {
    if let Err(e) = std::fs::copy(staged, video) {
        if video.exists() {
            if let Err(remove) = std::fs::remove_file(video) {
                tracing::warn!(
                    path = %video.display(),
                    error = %remove,
                    "could not remove partial copy"
                );
            }
        }
        return Err(e.into());
    }
    Ok(())
}

/// Collapse a validation report into one error, keeping every message.
fn join_errors(errors: Vec<ReelError>) -> ReelError {
    let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    ReelError::Timeline(messages.join("; "))
}
