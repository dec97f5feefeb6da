use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info};

use voice_screen_lib::biomarkers::clinical::FindingStatus;
use voice_screen_lib::wav::{read_wav, sine_tone};
use voice_screen_lib::{
    start_screening_thread, EngineConfig, FrameSplitter, InsufficientSignalPolicy,
    ScreeningOutput, ScreeningReport,
};

/// Maximum wait for the worker between outputs
const OUTPUT_TIMEOUT: Duration = Duration::from_secs(10);

/// Voice biomarker screening from a WAV file or a synthetic tone
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// WAV file to analyze
    input: Option<PathBuf>,

    /// Analyze a generated sine tone at this frequency instead of a file
    #[arg(long)]
    tone_hz: Option<f32>,

    /// Amplitude of the generated tone (0.0 - 1.0)
    #[arg(long, default_value = "0.1")]
    tone_amplitude: f32,

    /// Sample rate of the generated tone
    #[arg(long, default_value = "16000")]
    tone_rate: u32,

    /// Config file (defaults to ~/.voicescreen/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Session length in ms of audio
    #[arg(long)]
    duration_ms: Option<u32>,

    /// Analyze placeholder values when no usable signal is captured
    #[arg(long)]
    placeholder: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Write the default config file and exit
    #[arg(long)]
    init_config: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if args.init_config {
        return init_config_and_exit();
    }

    let config = load_config(&args)?;
    let (samples, sample_rate) = load_audio(&args, &config)?;
    info!(
        "Loaded {} samples at {} Hz ({:.1}s)",
        samples.len(),
        sample_rate,
        samples.len() as f64 / sample_rate as f64
    );

    let report = run_session(config, &samples, sample_rate)?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        print_summary(&report);
    }

    Ok(())
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => EngineConfig::default_config_path()?,
    };
    debug!("Config path: {:?}", path);

    let mut config = EngineConfig::load(&path)?;
    if let Some(duration_ms) = args.duration_ms {
        config.session_duration_ms = duration_ms;
    }
    if args.placeholder {
        config.insufficient_signal = InsufficientSignalPolicy::Placeholder;
    }
    config.validate()?;
    Ok(config)
}

/// Generated tones last exactly one configured session
fn load_audio(args: &Args, config: &EngineConfig) -> Result<(Vec<f32>, u32)> {
    match (&args.input, args.tone_hz) {
        (Some(path), None) => read_wav(path),
        (None, Some(freq)) => {
            info!("Generating {} Hz test tone", freq);
            Ok((
                sine_tone(
                    freq,
                    args.tone_amplitude,
                    args.tone_rate,
                    config.session_duration_ms,
                ),
                args.tone_rate,
            ))
        }
        (Some(_), Some(_)) => bail!("Pass either a WAV file or --tone-hz, not both"),
        (None, None) => bail!("No input: pass a WAV file or --tone-hz"),
    }
}

/// Feed the audio through the screening worker and wait for its report
fn run_session(config: EngineConfig, samples: &[f32], sample_rate: u32) -> Result<ScreeningReport> {
    let frame_size = config.frame_size;
    // Frames needed to reach the session duration; the worker completes on its own after that
    let session_frames = config
        .session_samples(sample_rate)
        .div_ceil(frame_size as u64) as usize;

    let handle = start_screening_thread(config)?;
    handle.start_session()?;

    let splitter = FrameSplitter::new(samples, sample_rate, frame_size);
    let available = splitter.frame_count();
    for frame in splitter.take(session_frames) {
        handle.send_frame(frame?)?;
    }
    if available < session_frames {
        info!(
            "Audio ended after {} of {} frames, stopping session early",
            available, session_frames
        );
        handle.stop_session()?;
    }

    let result = collect_report(&handle);
    handle.stop();
    handle.join();
    result
}

fn collect_report(handle: &voice_screen_lib::ScreeningHandle) -> Result<ScreeningReport> {
    let mut live_frames = 0u32;
    loop {
        let Some(output) = handle.recv_timeout(OUTPUT_TIMEOUT) else {
            bail!("Timed out waiting for the screening worker");
        };
        match output {
            ScreeningOutput::Started { session_id } => info!("Session {} started", session_id),
            ScreeningOutput::Live(metrics) => {
                live_frames += 1;
                debug!(
                    "Frame {}: {:.1} dBFS, pitch {:?}, jitter {:?}",
                    live_frames, metrics.rms_db, metrics.pitch_hz, metrics.jitter
                );
            }
            ScreeningOutput::Completed(report) => return Ok(*report),
            ScreeningOutput::Error(e) => {
                error!("Screening failed: {}", e);
                return Err(e).context("Screening session failed");
            }
        }
    }
}

fn print_summary(report: &ScreeningReport) {
    let result = &report.result;
    let agg = &result.aggregate;

    println!("\n--- Voice Screening Report ---");
    println!("Session: {}", report.session_id);
    println!("Completed: {}", report.completed_at.to_rfc3339());
    if agg.is_placeholder() {
        println!("Source: PLACEHOLDER (no usable signal captured)");
    }
    println!("Duration: {:.1}s", agg.duration_ms as f64 / 1000.0);
    println!("Peak RMS: {:.4}", agg.peak_rms);
    match agg.peak_pitch_hz {
        Some(p) => println!("Peak pitch: {:.1} Hz", p),
        None => println!("Peak pitch: -"),
    }
    match agg.peak_jitter {
        Some(j) => println!("Peak jitter: {:.2}%", j * 100.0),
        None => println!("Peak jitter: -"),
    }
    println!("Quality score: {:.0}/100", result.quality_score);
    println!("Overall risk: {:?}", result.risk_level);

    if !result.findings.is_empty() {
        println!("\n--- Findings ---");
        for finding in &result.findings {
            let marker = match finding.status {
                FindingStatus::Normal => " ",
                FindingStatus::Borderline => "~",
                FindingStatus::Abnormal => "!",
            };
            println!("{} [{}] {}", marker, finding.category, finding.statement);
        }
    }

    if !result.risk_assessments.is_empty() {
        println!("\n--- Risk Assessment ---");
        for risk in &result.risk_assessments {
            println!(
                "{}: {:?} ({:.0}% confidence)",
                risk.condition,
                risk.risk_level,
                risk.confidence * 100.0
            );
            for indicator in &risk.indicators {
                println!("    - {}", indicator);
            }
        }
    }

    let profile = &result.characteristics;
    println!("\n--- Voice Profile ---");
    println!("Quality: {:?}", profile.voice_quality);
    println!("Articulation: {:?}", profile.articulation);
    println!("Prosody: {:?}", profile.prosody);
    println!("Pitch stability: {:.2}", profile.pitch_stability);
    println!("{}", profile.overall_assessment);

    println!("\n--- Recommendations ---");
    for recommendation in &result.recommendations {
        println!("* {}", recommendation);
    }
}

fn init_config_and_exit() -> Result<()> {
    let dir = EngineConfig::default_config_dir()?;
    std::fs::create_dir_all(&dir).context("Failed to create config directory")?;
    let path = EngineConfig::default_config_path()?;
    EngineConfig::default().save(&path)?;
    println!("Wrote default config to {:?}", path);
    Ok(())
}
