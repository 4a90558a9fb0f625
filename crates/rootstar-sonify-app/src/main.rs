//! Rootstar Sonify Application
//!
//! Command-line entry point for the EEG sonification pipeline: generate a
//! synthetic brain-state recording, analyze it, and render it to audio.
//!
//! # Usage
//!
//! ```bash
//! # Sonify 10 s of relaxed wakefulness with the tone mapper
//! rootstar-sonify sonify --state awake
//!
//! # Multiband rendering of a seizure, reproducible
//! rootstar-sonify sonify --state seizure --method multiband --seed 42
//!
//! # Band powers, Hjorth descriptors and statistics as JSON
//! rootstar-sonify analyze --state n3 --json
//!
//! # List the available brain states
//! rootstar-sonify states
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use rootstar_sonify_core::types::{BrainState, EegBand, EegSignal};
use rootstar_sonify_native::sonification::write_wav;
use rootstar_sonify_native::{generate, AnalysisReport, SonificationMethod, Sonifier, SonifyConfig};

/// Advisory EEG sample rate range (Hz)
const ADVISED_RATE_HZ: (f64, f64) = (100.0, 1000.0);
/// Advisory recording length range (s)
const ADVISED_DURATION_S: (f64, f64) = (5.0, 60.0);

/// Rootstar EEG Sonification
#[derive(Parser, Debug)]
#[command(name = "rootstar-sonify")]
#[command(author, version, about = "Synthetic EEG sonification", long_about = None)]
struct Cli {
    /// Logging verbosity level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// Recording parameters shared by every generating subcommand
#[derive(clap::Args, Debug)]
struct RecordingArgs {
    /// Brain state: awake, n1, n3, rem or seizure
    #[arg(short, long, default_value = "awake")]
    state: BrainState,

    /// EEG sample rate (Hz)
    #[arg(short, long, default_value = "256")]
    rate: f64,

    /// Recording length (s)
    #[arg(short, long, default_value = "10")]
    duration: f64,

    /// RNG seed for a reproducible recording
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a recording and render it to a WAV file
    Sonify {
        #[command(flatten)]
        recording: RecordingArgs,

        /// Sonification method: tone or multiband
        #[arg(short, long, default_value = "tone")]
        method: SonificationMethod,

        /// Playback volume in [0, 1] (overrides the config file)
        #[arg(short, long)]
        volume: Option<f64>,

        /// Output WAV path (default: eeg_sonification_<state>.wav)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON sonification config
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Generate a recording and print its analysis
    Analyze {
        #[command(flatten)]
        recording: RecordingArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the simulated brain states
    States,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Rootstar Sonify v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Sonify { recording, method, volume, output, config } => {
            run_sonify(&recording, method, volume, output, config)?;
        }
        Commands::Analyze { recording, json } => {
            run_analyze(&recording, json)?;
        }
        Commands::States => list_states(),
    }

    Ok(())
}

/// Generate the requested recording, warning outside the advised ranges
fn record(args: &RecordingArgs) -> anyhow::Result<EegSignal> {
    if !(ADVISED_RATE_HZ.0..=ADVISED_RATE_HZ.1).contains(&args.rate) {
        warn!(
            "Sample rate {} Hz is outside the advised {}-{} Hz range",
            args.rate, ADVISED_RATE_HZ.0, ADVISED_RATE_HZ.1
        );
    }
    if !(ADVISED_DURATION_S.0..=ADVISED_DURATION_S.1).contains(&args.duration) {
        warn!(
            "Duration {} s is outside the advised {}-{} s range",
            args.duration, ADVISED_DURATION_S.0, ADVISED_DURATION_S.1
        );
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!("Generating {} s of {} EEG at {} Hz", args.duration, args.state.description(), args.rate);
    Ok(generate(args.state, args.rate, args.duration, &mut rng)?)
}

/// Generate, sonify and write a WAV file
fn run_sonify(
    recording: &RecordingArgs,
    method: SonificationMethod,
    volume: Option<f64>,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut config = match config {
        Some(path) => SonifyConfig::from_json_file(&path)?,
        None => SonifyConfig::default(),
    };
    if let Some(volume) = volume {
        config = config.with_volume(volume);
    }
    let sonifier = Sonifier::new(config)?;

    let signal = record(recording)?;

    // Synthesis noise gets its own stream derived from the recording seed
    let mut rng = match recording.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_entropy(),
    };

    info!("Sonifying with the {} method", method);
    let audio = sonifier.render(method, &signal, &mut rng)?;

    let path = output.unwrap_or_else(|| PathBuf::from(format!("eeg_sonification_{}.wav", recording.state.name())));
    write_wav(&path, &audio)?;

    info!("Wrote {:.1} s of audio to {}", audio.duration(), path.display());
    Ok(())
}

/// Generate and print the analysis report
fn run_analyze(recording: &RecordingArgs, json: bool) -> anyhow::Result<()> {
    let signal = record(recording)?;
    let report = AnalysisReport::compute(&signal)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} ({:.1} s at {} Hz)", recording.state.description(), report.duration_s, report.sample_rate);
    println!();
    println!("{:<8} {:>12} {:>10}", "Band", "Power", "Relative");
    for band in EegBand::ALL {
        let (low, high) = band.range_hz();
        println!(
            "{:<8} {:>12.4} {:>9.1}%   ({low}-{high} Hz)",
            band.name(),
            report.band_powers.get(band),
            report.relative_powers.get(band) * 100.0
        );
    }
    println!();
    println!("Dominant band:     {}", report.dominant_band);
    println!("Peak frequency:    {:.1} Hz", report.peak_frequency_hz);
    println!("Alpha/theta ratio: {:.3}", report.alpha_theta_ratio);
    println!("Beta/alpha ratio:  {:.3}", report.beta_alpha_ratio);
    println!();

    match report.hjorth {
        Some(h) => {
            println!("Hjorth activity:   {:.4}", h.activity);
            println!("Hjorth mobility:   {:.4}", h.mobility);
            println!("Hjorth complexity: {:.4}", h.complexity);
        }
        None => println!("Hjorth parameters: undefined for a flat signal"),
    }
    println!();

    let stats = report.statistics;
    println!("Mean:    {:.4}", stats.mean);
    println!("Std dev: {:.4}", stats.std_dev);
    println!("Min/max: {:.4} / {:.4}", stats.min, stats.max);
    println!("Range:   {:.4}", stats.range);

    Ok(())
}

/// List brain states
fn list_states() {
    println!("Simulated brain states:");
    for state in BrainState::ALL {
        println!("  {:<8} {}", state.name(), state.description());
    }
}
