mod generator;
mod preview;
mod progress;
mod workdir;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use reel_core::{ReelConfig, Style};
use reel_encode::FfmpegEncoder;
use reel_ir::Script;
use reel_tts::{EdgeTtsSynthesizer, SpeechRate, SpeechRequest, SpeechSynthesizer, VoiceCatalog};

use generator::{GenerateRequest, ReelGenerator};
use preview::PreviewTarget;
use progress::TracingObserver;
use workdir::WorkDir;

#[derive(Parser)]
#[command(
    name = "reel",
    version,
    about = "Reel: narrated short-form videos with word-by-word captions",
    long_about = "Reel turns a script into a vertical video: synthesized narration,\ncaptions grouped into short chunks, and the spoken word highlighted."
)]
struct Cli {
    /// Configuration file (loaded if it exists)
    #[arg(long, global = true, default_value = "reel.config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Narrate a script and render the captioned reel
    Generate {
        #[command(flatten)]
        script: ScriptArgs,

        /// Output directory for the video (and subtitles)
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Voice display name or backend id
        #[arg(long)]
        voice: Option<String>,

        /// Speech speed, 0.5 to 1.5
        #[arg(long)]
        speed: Option<f64>,

        /// Also write an .srt file next to the video
        #[arg(long)]
        srt: bool,

        /// Keep the request's scratch directory
        #[arg(long)]
        keep_scratch: bool,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// Render a single caption state to an image, without narration
    Preview {
        #[command(flatten)]
        script: ScriptArgs,

        /// Output image path
        #[arg(short, long, default_value = "preview.png")]
        output: PathBuf,

        /// Chunk to draw (0-based)
        #[arg(long, default_value_t = 0)]
        chunk: usize,

        /// Highlighted word within the chunk (0-based)
        #[arg(long, default_value_t = 0)]
        highlight: usize,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// List the available voices, or synthesize a short sample of one
    Voices {
        /// Voice to audition
        #[arg(long)]
        preview: Option<String>,

        /// Text for the sample (first 15 words are spoken)
        #[arg(long)]
        text: Option<String>,

        /// Where to write the sample
        #[arg(short, long, default_value = "voice_preview.mp3")]
        output: PathBuf,
    },

    /// Estimate the spoken length of a script
    Estimate {
        #[command(flatten)]
        script: ScriptArgs,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}

#[derive(Args)]
struct ScriptArgs {
    /// Script text
    #[arg()]
    text: Option<String>,

    /// Read the script from a file instead
    #[arg(short, long, conflicts_with = "text")]
    file: Option<PathBuf>,
}

impl ScriptArgs {
    fn read(&self) -> Result<String> {
        match (&self.text, &self.file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read script: {}", path.display())),
            (None, None) => anyhow::bail!("provide the script as an argument or with --file"),
        }
    }
}

/// Style flags; each overrides the `[style]` section of the config file.
#[derive(Args)]
struct StyleArgs {
    /// "Transparent" or a hex colour
    #[arg(long)]
    background: Option<String>,

    #[arg(long)]
    text_color: Option<String>,

    #[arg(long)]
    highlight_color: Option<String>,

    /// Font family, e.g. "Arial Bold"
    #[arg(long)]
    font: Option<String>,

    /// 40 to 150
    #[arg(long)]
    font_size: Option<u32>,

    /// Words per caption chunk, 1 to 10
    #[arg(long)]
    max_words: Option<usize>,

    /// center or bottom
    #[arg(long)]
    anchor: Option<String>,
}

impl StyleArgs {
    fn resolve(&self, config: &ReelConfig) -> Result<Style> {
        let mut style = config.style.clone();
        if let Some(v) = &self.background {
            style.background = v.clone();
        }
        if let Some(v) = &self.text_color {
            style.text_color = v.clone();
        }
        if let Some(v) = &self.highlight_color {
            style.highlight_color = v.clone();
        }
        if let Some(v) = &self.font {
            style.font_family = v.parse()?;
        }
        if let Some(v) = self.font_size {
            style.font_size = v;
        }
        if let Some(v) = self.max_words {
            style.max_words = v;
        }
        if let Some(v) = &self.anchor {
            style.anchor = v.parse()?;
        }
        Ok(style.validate()?)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Generate {
            script,
            output,
            voice,
            speed,
            srt,
            keep_scratch,
            style,
        } => {
            let mut config = load_config(&cli.config)?;
            config.output.write_srt |= srt;
            config.output.keep_scratch |= keep_scratch;
            let style = style.resolve(&config)?;
            let request = GenerateRequest {
                text: script.read()?,
                voice: voice.unwrap_or_else(|| config.tts.voice.clone()),
                speed: speed.unwrap_or(config.tts.speed),
                style,
            };
            cmd_generate(config, request, &output)
        }
        Commands::Preview {
            script,
            output,
            chunk,
            highlight,
            style,
        } => {
            let config = load_config(&cli.config)?;
            let style = style.resolve(&config)?;
            cmd_preview(
                &config,
                &style,
                &script.read()?,
                PreviewTarget { chunk, highlight },
                &output,
            )
        }
        Commands::Voices {
            preview,
            text,
            output,
        } => match preview {
            Some(name) => {
                let config = load_config(&cli.config)?;
                cmd_voice_preview(&config, &name, text.as_deref(), &output)
            }
            None => cmd_voices(),
        },
        Commands::Estimate { script } => cmd_estimate(&script.read()?),
        Commands::Config { action } => match action {
            ConfigAction::Init { force } => cmd_config_init(&cli.config, force),
            ConfigAction::Show => cmd_config_show(&cli.config),
        },
    }
}

fn load_config(path: &Path) -> Result<ReelConfig> {
    ReelConfig::load_or_default(path)
        .with_context(|| format!("failed to load config: {}", path.display()))
}

fn cmd_generate(config: ReelConfig, request: GenerateRequest, output: &Path) -> Result<()> {
    let start = Instant::now();
    println!("🎬 Reel");
    println!("   Words:     {}", Script::new(request.text.as_str()).word_count());
    println!("   Voice:     {}", request.voice);
    println!("   Speed:     {}", request.speed);
    println!(
        "   Style:     {} {}px, {} words per chunk",
        request.style.font_family, request.style.font_size, request.style.max_words
    );
    println!();

    let synthesizer = Arc::new(EdgeTtsSynthesizer::from_config(&config.tts));
    let encoder = Arc::new(FfmpegEncoder::new(config.output.ffmpeg.clone()));
    let generator = ReelGenerator::new(config, synthesizer, encoder, Arc::new(TracingObserver));

    let result = generator
        .generate(&request, output)
        .context("failed to generate reel")?;

    println!();
    println!("✅ Reel ready");
    println!("   Video:     {}", result.video.display());
    if let Some(srt) = &result.subtitles {
        println!("   Subtitles: {}", srt.display());
    }
    println!("   Format:    {}", result.container.mime_type());
    println!("   Narration: {:.1}s", result.audio_duration.as_seconds());
    println!("   Captions:  {} chunks, {} words", result.chunks, result.words);
    println!("   Frames:    {}", result.frames);
    println!("   Font:      {:?}", result.font);
    if generator.config().output.keep_scratch {
        println!("   Scratch:   {}", generator.config().output.scratch_dir.display());
    }
    println!("   Took:      {:.1}s", start.elapsed().as_secs_f64());
    Ok(())
}

fn cmd_preview(
    config: &ReelConfig,
    style: &Style,
    text: &str,
    target: PreviewTarget,
    output: &Path,
) -> Result<()> {
    let result = preview::render_preview(config, style, text, target, output)
        .context("failed to render preview")?;
    println!("🖼  Preview saved: {}", result.path.display());
    println!(
        "   Chunk {} of {}: \"{}\"",
        target.chunk + 1,
        result.chunk_count,
        result.caption
    );
    println!("   Font:  {:?}", result.font);
    Ok(())
}

fn cmd_voices() -> Result<()> {
    println!("🎙  Voices");
    for voice in VoiceCatalog.all() {
        let marker = if voice.name == reel_tts::DEFAULT_VOICE_NAME {
            " (default)"
        } else {
            ""
        };
        println!("   {:<34} {}{}", voice.name, voice.id, marker);
    }
    Ok(())
}

fn cmd_voice_preview(
    config: &ReelConfig,
    name: &str,
    text: Option<&str>,
    output: &Path,
) -> Result<()> {
    let synthesizer = EdgeTtsSynthesizer::from_config(&config.tts);
    if !synthesizer.is_available() {
        anyhow::bail!(
            "{} not found. Install it with `pip install edge-tts`",
            config.tts.command
        );
    }

    let request = SpeechRequest {
        text: preview::voice_sample(text),
        voice_id: VoiceCatalog.resolve(name).to_string(),
        rate: SpeechRate::from_speed(config.tts.speed)?,
    };
    let work = WorkDir::create(&config.output.scratch_dir, config.output.keep_scratch)
        .context("failed to create scratch directory")?;
    let audio = synthesizer
        .synthesize(&request, work.path())
        .context("failed to synthesize voice sample")?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::copy(&audio.path, output)
        .with_context(|| format!("failed to write sample: {}", output.display()))?;

    println!("🔊 {} ({})", name, request.voice_id);
    println!("   \"{}\"", request.text);
    println!("   Saved {:.1}s to {}", audio.duration.as_seconds(), output.display());
    Ok(())
}

fn cmd_estimate(text: &str) -> Result<()> {
    let script = Script::new(text);
    println!(
        "⏱  ~{:.1}s for {} words",
        script.estimated_duration().as_seconds(),
        script.word_count()
    );
    Ok(())
}

fn cmd_config_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    ReelConfig::default()
        .save_to_file(path)
        .with_context(|| format!("failed to write config: {}", path.display()))?;
    println!("📝 Wrote {}", path.display());
    Ok(())
}

fn cmd_config_show(path: &Path) -> Result<()> {
    let config = load_config(path)?;
    let style = config.style.validate().context("invalid [style] section")?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    println!();
    println!("Resolved background: {:?}", style.background);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from([
            "reel",
            "generate",
            "Wake up early",
            "--voice",
            "Sonia (Neural) - UK Female",
            "--background",
            "Transparent",
            "--max-words",
            "3",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate { script, voice, style, .. } => {
                assert_eq!(script.read().unwrap(), "Wake up early");
                assert_eq!(voice.as_deref(), Some("Sonia (Neural) - UK Female"));
                let style = style.resolve(&ReelConfig::default()).unwrap();
                assert!(style.background.is_transparent());
                assert_eq!(style.max_words, 3);
            }
            _ => panic!("expected generate"),
        }
        assert_eq!(cli.config, PathBuf::from("reel.config.toml"));
    }

    #[test]
    fn test_style_flags_are_validated() {
        let cli = Cli::try_parse_from(["reel", "preview", "hi", "--font-size", "20"]).unwrap();
        let Commands::Preview { style, .. } = cli.command else {
            panic!("expected preview");
        };
        assert!(style.resolve(&ReelConfig::default()).is_err());
    }

    #[test]
    fn test_style_font_and_anchor() {
        let cli = Cli::try_parse_from([
            "reel", "preview", "hi", "--font", "courier new", "--anchor", "bottom",
        ])
        .unwrap();
        let Commands::Preview { style, .. } = cli.command else {
            panic!("expected preview");
        };
        let style = style.resolve(&ReelConfig::default()).unwrap();
        assert_eq!(style.font_family, reel_core::FontFamily::CourierNew);
        assert_eq!(style.anchor, reel_core::VerticalAnchor::Bottom);
    }

    #[test]
    fn test_script_text_and_file_conflict() {
        assert!(Cli::try_parse_from(["reel", "estimate", "hi", "--file", "a.txt"]).is_err());
    }
}
