use std::sync::Mutex;

use resume_downloader::{CancelFlag, DownloadListener, StatusCode};

#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start { task_id: i32 },
    Progress { task_id: i32, progress: u8 },
    Finish { task_id: i32, path: String },
    Cancel { task_id: i32 },
    Error { task_id: i32, status: StatusCode, message: String },
}

#[allow(dead_code)]
impl Event {
    pub fn task_id(&self) -> i32 {
        match self {
            Self::Start { task_id }
            | Self::Progress { task_id, .. }
            | Self::Finish { task_id, .. }
            | Self::Cancel { task_id }
            | Self::Error { task_id, .. } => *task_id,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Finish { .. } | Self::Cancel { .. } | Self::Error { .. }
        )
    }
}

/// Records callbacks in order; optionally trips a cancel flag on the first
/// progress report.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Mutex<Vec<Event>>,
    cancel_on_progress: Option<CancelFlag>,
}

#[allow(dead_code)]
impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn canceling(flag: CancelFlag) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            cancel_on_progress: Some(flag),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn progress_values(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Progress { progress, .. } => Some(progress),
                _ => None,
            })
            .collect()
    }

    pub fn terminal(&self) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(Event::is_terminal)
            .collect()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl DownloadListener for RecordingListener {
    fn on_download_error(&self, task_id: i32, status: StatusCode, message: &str) {
        self.push(Event::Error {
            task_id,
            status,
            message: message.to_string(),
        });
    }

    fn on_start(&self, task_id: i32) {
        self.push(Event::Start { task_id });
    }

    fn on_progress(&self, task_id: i32, progress: u8) {
        self.push(Event::Progress { task_id, progress });
        if let Some(flag) = &self.cancel_on_progress {
            flag.cancel();
        }
    }

    fn on_finish(&self, task_id: i32, file_path: &str) {
        self.push(Event::Finish {
            task_id,
            path: file_path.to_string(),
        });
    }

    fn on_cancel(&self, task_id: i32) {
        self.push(Event::Cancel { task_id });
    }
}
