//! CLI entry point for the resume-dl tool.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use resume_downloader::download::filename::filename_from_url;
use resume_downloader::{
    CancelFlag, DEFAULT_CONCURRENCY, DownloadDispatcher, DownloadEngine, DownloadListener,
    DownloadRequest, EngineConfig,
};
use tracing::{debug, info, warn};

mod app_config;
mod cli;
mod reporter;

use app_config::{FileConfig, load_default_file_config};
use cli::Args;
use reporter::{JsonReporter, ProgressReporter, Tally};

/// Settings after merging CLI flags over the config file over defaults.
#[derive(Debug)]
struct RunSettings {
    output_dir: PathBuf,
    resume: bool,
    concurrency: usize,
    engine: EngineConfig,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    if args.name.is_some() && args.urls.len() > 1 {
        bail!("--name can only be used with a single URL");
    }

    let loaded = load_default_file_config()?;
    if let Some(path) = &loaded.path {
        debug!(path = %path.display(), loaded = loaded.config.is_some(), "config file");
    }
    let settings = resolve_settings(&args, loaded.config.unwrap_or_default());
    debug!(?settings, "resolved settings");

    let engine = DownloadEngine::new(&settings.engine).context("Failed to build download engine")?;

    let cancel = CancelFlag::new();
    let requests: Vec<(i32, DownloadRequest)> = (1..)
        .zip(&args.urls)
        .map(|(task_id, url)| {
            let name = args
                .name
                .clone()
                .unwrap_or_else(|| filename_from_url(url));
            let request = DownloadRequest::new(url.clone(), settings.output_dir.clone(), name)
                .with_range(settings.resume)
                .with_cancel_flag(cancel.clone());
            (task_id, request)
        })
        .collect();
    ensure_distinct_targets(&requests)?;

    spawn_interrupt_handler(cancel);

    info!(
        urls = requests.len(),
        dir = %settings.output_dir.display(),
        resume = settings.resume,
        "starting downloads"
    );

    let (finished, canceled, failed) = if args.json {
        let reporter = Arc::new(JsonReporter::default());
        run(&engine, Arc::clone(&reporter), settings.concurrency, requests).await?;
        counts(reporter.tally())
    } else {
        let labels = requests
            .iter()
            .map(|(task_id, request)| (*task_id, request.file_name().to_string()))
            .collect::<HashMap<_, _>>();
        let reporter = Arc::new(ProgressReporter::new(labels));
        run(&engine, Arc::clone(&reporter), settings.concurrency, requests).await?;
        counts(reporter.tally())
    };

    info!(finished, canceled, failed, "downloads done");

    Ok(if failed > 0 {
        ExitCode::FAILURE
    } else if canceled > 0 {
        ExitCode::from(130)
    } else {
        ExitCode::SUCCESS
    })
}

fn resolve_settings(args: &Args, file: FileConfig) -> RunSettings {
    let defaults = EngineConfig::default();
    let engine = EngineConfig {
        connect_timeout_secs: args
            .connect_timeout
            .or(file.connect_timeout_secs)
            .unwrap_or(defaults.connect_timeout_secs),
        read_timeout_secs: args
            .read_timeout
            .or(file.read_timeout_secs)
            .unwrap_or(defaults.read_timeout_secs),
        user_agent: args
            .user_agent
            .clone()
            .or(file.user_agent)
            .unwrap_or(defaults.user_agent),
    };
    RunSettings {
        output_dir: args
            .output_dir
            .clone()
            .or(file.output_dir)
            .unwrap_or_else(|| PathBuf::from(".")),
        resume: !args.no_resume && file.resume.unwrap_or(true),
        concurrency: args
            .concurrency
            .or(file.concurrency)
            .map_or(DEFAULT_CONCURRENCY, usize::from),
        engine,
    }
}

/// Concurrent attempts must not share a target file (or its temp file).
fn ensure_distinct_targets(requests: &[(i32, DownloadRequest)]) -> Result<()> {
    let mut seen: HashMap<PathBuf, &str> = HashMap::new();
    for (_, request) in requests {
        let target = request.target_path();
        if let Some(first) = seen.insert(target.clone(), request.url()) {
            bail!(
                "{first} and {} would both be saved as '{}'; download them in separate runs with --name",
                request.url(),
                target.display()
            );
        }
    }
    Ok(())
}

async fn run<L>(
    engine: &DownloadEngine,
    listener: Arc<L>,
    concurrency: usize,
    requests: Vec<(i32, DownloadRequest)>,
) -> Result<()>
where
    L: DownloadListener + 'static,
{
    let dispatcher = DownloadDispatcher::new(engine.clone(), listener, concurrency)?;
    let handles: Vec<_> = requests
        .into_iter()
        .map(|(task_id, request)| dispatcher.submit(request, task_id))
        .collect();
    for handle in handles {
        handle.await.context("download task panicked")?;
    }
    Ok(())
}

fn spawn_interrupt_handler(cancel: CancelFlag) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, canceling downloads (partial files are kept for resume)");
            cancel.cancel();
        }
    });
}

fn counts(tally: &Tally) -> (usize, usize, usize) {
    (tally.finished(), tally.canceled(), tally.failed())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(url: &str, name: &str) -> DownloadRequest {
        DownloadRequest::new(url, "/tmp/out", name)
    }

    #[test]
    fn test_distinct_targets_accepted() {
        let requests = vec![
            (1, request("https://a.example/file.bin", "file.bin")),
            (2, request("https://b.example/other.bin", "other.bin")),
        ];
        assert!(ensure_distinct_targets(&requests).is_ok());
    }

    #[test]
    fn test_duplicate_targets_rejected() {
        let requests = vec![
            (1, request("https://a.example/a/file.bin", "file.bin")),
            (2, request("https://a.example/b/file.bin", "file.bin")),
        ];
        let err = ensure_distinct_targets(&requests).unwrap_err().to_string();
        assert!(err.contains("https://a.example/a/file.bin"), "{err}");
        assert!(err.contains("https://a.example/b/file.bin"), "{err}");
        assert!(err.contains("file.bin"), "{err}");
    }

    #[test]
    fn test_resolve_settings_defaults() {
        let args = Args::try_parse_from(["resume-dl", "https://example.com/a"]).unwrap();
        let settings = resolve_settings(&args, FileConfig::default());
        assert_eq!(settings.output_dir, PathBuf::from("."));
        assert!(settings.resume);
        assert_eq!(settings.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(settings.engine, EngineConfig::default());
    }

    #[test]
    fn test_resolve_settings_file_overrides_defaults() {
        let args = Args::try_parse_from(["resume-dl", "https://example.com/a"]).unwrap();
        let file = FileConfig {
            output_dir: Some(PathBuf::from("/srv/dl")),
            resume: Some(false),
            concurrency: Some(8),
            read_timeout_secs: Some(42),
            ..FileConfig::default()
        };
        let settings = resolve_settings(&args, file);
        assert_eq!(settings.output_dir, PathBuf::from("/srv/dl"));
        assert!(!settings.resume);
        assert_eq!(settings.concurrency, 8);
        assert_eq!(settings.engine.read_timeout_secs, 42);
    }

    #[test]
    fn test_resolve_settings_cli_overrides_file() {
        let args = Args::try_parse_from([
            "resume-dl",
            "-o",
            "/tmp/cli",
            "-c",
            "2",
            "--user-agent",
            "cli-agent",
            "--no-resume",
            "https://example.com/a",
        ])
        .unwrap();
        let file = FileConfig {
            output_dir: Some(PathBuf::from("/srv/dl")),
            resume: Some(true),
            concurrency: Some(8),
            user_agent: Some("file-agent".to_string()),
            ..FileConfig::default()
        };
        let settings = resolve_settings(&args, file);
        assert_eq!(settings.output_dir, PathBuf::from("/tmp/cli"));
        assert!(!settings.resume);
        assert_eq!(settings.concurrency, 2);
        assert_eq!(settings.engine.user_agent, "cli-agent");
    }
}
