//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Download files over HTTP, resuming interrupted transfers.
///
/// Each URL is saved to `<output-dir>/<name>`. Bytes are staged in
/// `<name>.temp` until the transfer completes, so rerunning the same command
/// continues where the previous run stopped.
#[derive(Parser, Debug)]
#[command(name = "resume-dl")]
#[command(author, version, about)]
pub struct Args {
    /// URLs to download
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Directory to save files into (default: config file, then current directory)
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// File name to save as (only valid with a single URL)
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Discard any partial download and start from zero
    #[arg(long)]
    pub no_resume: bool,

    /// Maximum simultaneous downloads (1-100)
    #[arg(short = 'c', long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: Option<u8>,

    /// HTTP connect timeout in seconds (1-3600)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub connect_timeout: Option<u64>,

    /// HTTP per-read timeout in seconds (1-3600)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub read_timeout: Option<u64>,

    /// Custom User-Agent header
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Print one JSON object per download event instead of progress bars
    #[arg(long)]
    pub json: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
