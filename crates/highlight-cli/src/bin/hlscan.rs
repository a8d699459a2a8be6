//! hlscan - Highlight timeline generator
//!
//! Usage:
//!   hlscan <features.json>                          # JSON report on stdout
//!   hlscan <features.json> --transcript <json>      # with transcript excerpts
//!   hlscan <features.json> --format text            # human-readable timeline
//!   hlscan --mode tech --transcript <json>          # topic sections from speech

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use highlight_cli::output::{
    print_json_events, print_json_report, print_json_topics, render_text, render_topics_text,
    HighlightReport, TopicReport,
};
use highlight_core::{FeatureSeries, HighlightConfig, HighlightEngine, Transcript};
use std::path::{Path, PathBuf};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Acoustic highlights from the feature series
    Entertainment,
    /// Topic sections from transcript cues
    Tech,
}

#[derive(Parser, Debug)]
#[command(name = "hlscan")]
#[command(about = "Detect highlight sections in an audio feature series", long_about = None)]
struct Args {
    /// Feature series file (JSON); required in entertainment mode
    features: Option<PathBuf>,

    /// Transcript file (JSON); required in tech mode
    #[arg(short, long)]
    transcript: Option<PathBuf>,

    /// Sectioning mode
    #[arg(short, long, value_enum, default_value_t = Mode::Entertainment)]
    mode: Mode,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum gap in seconds between events of one group
    #[arg(long)]
    merge_threshold: Option<f64>,

    /// Volume peak threshold as a multiple of the RMS standard deviation
    #[arg(long)]
    volume_threshold: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Print the raw detector events instead of sections
    #[arg(long)]
    raw_events: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    // Default: no logs so stdout stays parseable
    if args.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    // Load configuration
    let mut config = match &args.config {
        Some(path) => HighlightConfig::load(path)?,
        None => HighlightConfig::default(),
    };
    if let Some(threshold) = args.merge_threshold {
        config.merge.threshold_s = threshold;
    }
    if let Some(multiplier) = args.volume_threshold {
        config.volume_peak.threshold_multiplier = multiplier;
    }
    let engine = HighlightEngine::new(config).context("Invalid configuration")?;

    match args.mode {
        Mode::Entertainment => run_entertainment(&args, &engine),
        Mode::Tech => run_tech(&args, &engine),
    }
}

fn run_entertainment(args: &Args, engine: &HighlightEngine) -> Result<()> {
    // Validate input
    let Some(features_path) = args.features.as_deref() else {
        anyhow::bail!("A feature series file is required in entertainment mode");
    };

    // Load inputs
    let features = load_features(features_path)?;
    let transcript = args
        .transcript
        .as_deref()
        .map(load_transcript)
        .transpose()?;
    let source = features_path.display().to_string();

    log::info!("Processing: {}", source);
    let start = std::time::Instant::now();

    // Detect events
    let events = engine.detect_events(&features)?;
    if args.raw_events {
        print_json_events(&source, &events);
        return Ok(());
    }

    // Merge and build sections
    let merged = engine.merge_events(&events);
    let sections = engine.build_sections(&merged, transcript.as_ref());

    log::info!(
        "Built {} sections from {} events in {:.2}s",
        sections.len(),
        events.len(),
        start.elapsed().as_secs_f64()
    );

    // Print report
    let report = HighlightReport::new(source, features.duration, events.len(), &sections);
    match args.format {
        OutputFormat::Json => print_json_report(&report),
        OutputFormat::Text => print!("{}", render_text(&report, &engine.config().kinds)),
    }

    Ok(())
}

fn run_tech(args: &Args, engine: &HighlightEngine) -> Result<()> {
    // Validate input
    let Some(transcript_path) = args.transcript.as_deref() else {
        anyhow::bail!("A transcript file is required in tech mode");
    };
    if args.raw_events {
        anyhow::bail!("--raw-events only applies to entertainment mode");
    }

    let transcript = load_transcript(transcript_path)?;
    let source = transcript_path.display().to_string();
    log::info!("Processing: {}", source);

    // Split into topics
    let sections = engine.detect_topics(&transcript);

    // Print report
    let report = TopicReport::new(source, &sections);
    match args.format {
        OutputFormat::Json => print_json_topics(&report),
        OutputFormat::Text => print!("{}", render_topics_text(&report)),
    }

    Ok(())
}

fn load_features(path: &Path) -> Result<FeatureSeries> {
    if !path.exists() {
        anyhow::bail!("Feature file not found: {}", path.display());
    }
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read feature file: {}", path.display()))?;
    let features: FeatureSeries = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse feature file: {}", path.display()))?;

    log::info!(
        "Loaded features: {:.1}s, {} frames @ {}Hz (hop {})",
        features.duration,
        features.num_frames(),
        features.sample_rate,
        features.hop_length
    );
    Ok(features)
}

fn load_transcript(path: &Path) -> Result<Transcript> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript: {}", path.display()))?;
    let transcript = Transcript::from_json(&json)
        .with_context(|| format!("Failed to parse transcript: {}", path.display()))?;

    log::info!("Loaded transcript: {} segments", transcript.segments.len());
    Ok(transcript)
}
