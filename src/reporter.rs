//! Listener implementations rendering download events for the terminal.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use resume_downloader::{DownloadListener, StatusCode};
use serde::Serialize;
use tracing::{debug, error};

/// Terminal outcome counts across all tasks of a run.
#[derive(Debug, Default)]
pub(crate) struct Tally {
    finished: AtomicUsize,
    canceled: AtomicUsize,
    failed: AtomicUsize,
}

impl Tally {
    pub(crate) fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }

    pub(crate) fn canceled(&self) -> usize {
        self.canceled.load(Ordering::SeqCst)
    }

    pub(crate) fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }
}

/// One progress bar per task id.
pub(crate) struct ProgressReporter {
    multi: MultiProgress,
    bars: Mutex<HashMap<i32, ProgressBar>>,
    labels: HashMap<i32, String>,
    tally: Tally,
}

impl ProgressReporter {
    pub(crate) fn new(labels: HashMap<i32, String>) -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
            labels,
            tally: Tally::default(),
        }
    }

    pub(crate) fn tally(&self) -> &Tally {
        &self.tally
    }

    fn label(&self, task_id: i32) -> String {
        self.labels
            .get(&task_id)
            .cloned()
            .unwrap_or_else(|| format!("#{task_id}"))
    }

    fn with_bar(&self, task_id: i32, apply: impl FnOnce(&ProgressBar)) {
        let mut bars = self
            .bars
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let bar = bars.entry(task_id).or_insert_with(|| {
            let bar = self.multi.add(ProgressBar::new(100));
            bar.set_style(
                ProgressStyle::with_template("{msg:30!} [{bar:40}] {pos:>3}%")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
            );
            bar.set_message(self.label(task_id));
            bar
        });
        apply(bar);
    }
}

impl DownloadListener for ProgressReporter {
    fn on_download_error(&self, task_id: i32, status: StatusCode, message: &str) {
        self.tally.failed.fetch_add(1, Ordering::SeqCst);
        let label = self.label(task_id);
        self.with_bar(task_id, |bar| {
            bar.abandon_with_message(format!("{label}: {status}"));
        });
        error!(task_id, status = %status, "{label}: {message}");
    }

    fn on_start(&self, task_id: i32) {
        self.with_bar(task_id, |_| {});
    }

    fn on_progress(&self, task_id: i32, progress: u8) {
        self.with_bar(task_id, |bar| bar.set_position(u64::from(progress)));
    }

    fn on_finish(&self, task_id: i32, file_path: &str) {
        self.tally.finished.fetch_add(1, Ordering::SeqCst);
        self.with_bar(task_id, |bar| {
            bar.set_position(100);
            bar.finish_with_message(file_path.to_string());
        });
    }

    fn on_cancel(&self, task_id: i32) {
        self.tally.canceled.fetch_add(1, Ordering::SeqCst);
        let label = self.label(task_id);
        self.with_bar(task_id, |bar| {
            bar.abandon_with_message(format!("{label}: canceled"));
        });
    }
}

/// Machine-readable event written as one JSON line.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum JsonEvent<'a> {
    Start {
        task_id: i32,
    },
    Progress {
        task_id: i32,
        progress: u8,
    },
    Finish {
        task_id: i32,
        path: &'a str,
    },
    Cancel {
        task_id: i32,
    },
    Error {
        task_id: i32,
        status: StatusCode,
        message: &'a str,
    },
}

/// Writes every event as a JSON line on stdout.
#[derive(Debug, Default)]
pub(crate) struct JsonReporter {
    tally: Tally,
}

impl JsonReporter {
    pub(crate) fn tally(&self) -> &Tally {
        &self.tally
    }

    fn emit(&self, event: &JsonEvent<'_>) {
        match serde_json::to_string(event) {
            Ok(line) => {
                let mut out = std::io::stdout().lock();
                if let Err(e) = writeln!(out, "{line}") {
                    debug!(error = %e, "failed to write event to stdout");
                }
            }
            Err(e) => error!(error = %e, "failed to serialize event"),
        }
    }
}

impl DownloadListener for JsonReporter {
    fn on_download_error(&self, task_id: i32, status: StatusCode, message: &str) {
        self.tally.failed.fetch_add(1, Ordering::SeqCst);
        self.emit(&JsonEvent::Error {
            task_id,
            status,
            message,
        });
    }

    fn on_start(&self, task_id: i32) {
        self.emit(&JsonEvent::Start { task_id });
    }

    fn on_progress(&self, task_id: i32, progress: u8) {
        self.emit(&JsonEvent::Progress { task_id, progress });
    }

    fn on_finish(&self, task_id: i32, file_path: &str) {
        self.tally.finished.fetch_add(1, Ordering::SeqCst);
        self.emit(&JsonEvent::Finish {
            task_id,
            path: file_path,
        });
    }

    fn on_cancel(&self, task_id: i32) {
        self.tally.canceled.fetch_add(1, Ordering::SeqCst);
        self.emit(&JsonEvent::Cancel { task_id });
    }
}
