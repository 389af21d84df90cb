//! oggopus - inspect the packets of an Ogg Opus file.

use std::fs::File;
use std::io::BufReader;

use anyhow::Context;
use clap::Parser;
use giztoy_oggopus::{Demuxer, DemuxerConfig};
use tracing_subscriber::EnvFilter;

mod output;
mod report;

use output::{Output, OutputFormat};
use report::Report;

/// Lists the Opus packets of an Ogg Opus file with their TOC details and
/// page timing. Audio is not decoded.
#[derive(Parser)]
#[command(name = "oggopus")]
#[command(about = "Ogg Opus packet inspector")]
#[command(version)]
pub struct Cli {
    /// Ogg Opus file to read
    pub file: String,

    /// Demuxer config file (YAML)
    #[arg(long)]
    pub config: Option<String>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    pub output: Option<String>,

    /// Output as JSON (default: YAML)
    #[arg(long)]
    pub json: bool,

    /// Maximum number of packets to list
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Verbose output
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

fn load_config(path: Option<&str>) -> anyhow::Result<DemuxerConfig> {
    let Some(path) = path else {
        return Ok(DemuxerConfig::default());
    };
    let data = std::fs::read_to_string(path).with_context(|| format!("read config {path}"))?;
    serde_yaml::from_str(&data).with_context(|| format!("parse config {path}"))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref())?;
    let file = File::open(&cli.file).with_context(|| format!("open {}", cli.file))?;
    let mut demuxer = Demuxer::open_with(BufReader::new(file), config)
        .with_context(|| format!("open ogg opus stream {}", cli.file))?;

    let report = Report::collect(&mut demuxer, cli.limit)?;
    tracing::debug!(
        packets = report.total_packets,
        duration_ms = report.total_duration_ms,
        "finished"
    );

    Output::new(OutputFormat::from_json_flag(cli.json), cli.output.as_deref()).write(&report)
}
