use std::sync::Mutex;

use crate::download::{DownloadListener, StatusCode};

/// One listener callback, as observed by [`RecordingListener`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start { task_id: i32 },
    Progress { task_id: i32, progress: u8 },
    Finish { task_id: i32, path: String },
    Cancel { task_id: i32 },
    Error { task_id: i32, status: StatusCode, message: String },
}

/// Listener that records every callback in arrival order.
#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Mutex<Vec<Event>>,
}

impl RecordingListener {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
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
