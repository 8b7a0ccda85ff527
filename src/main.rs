use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber;

use video_splicer::{Config, SpliceEngine};

#[derive(Parser)]
#[command(
    name = "video-splicer",
    version,
    about = "Extract frames and stream-copied clips from a video",
    long_about = "Video-Splicer cuts frames and sub-clips out of a video from a compact \
comma-separated instruction list: a plain time captures a frame, 'S-E' extracts a range, \
'-T' runs from the start, and 'T-' runs to the end. Clips are stream copies (no re-encoding)."
)]
struct Cli {
    /// Input video file
    video: PathBuf,

    /// Instruction list (e.g. "00:13:00,-00:05:00,00:20:00-")
    instructions: String,

    /// Output directory for frames and clips
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .init();

    // Load configuration
    let mut config = match cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(&config_path)?
        }
        None => Config::default(),
    };
    if let Some(output_dir) = cli.output_dir {
        config.output.directory = output_dir;
    }
    config.validate()?;
    let output_dir = config.output.directory.clone();

    if !cli.video.exists() {
        println!("❌ File not found: {}", cli.video.display());
        return Ok(());
    }

    let engine = SpliceEngine::new(config)?;
    let report = engine.run(&cli.video, &cli.instructions)?;

    if !report.is_clean() {
        println!(
            "⚠️  {} of {} instructions produced no output",
            report.rejected() + report.failed(),
            report.records.len()
        );
    }
    println!(
        "✅ Done! {} outputs in {}",
        report.produced(),
        output_dir.display()
    );

    Ok(())
}
