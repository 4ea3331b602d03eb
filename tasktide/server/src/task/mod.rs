use chrono::{DateTime, SecondsFormat, Utc};
use tasktide_core::TaskService;

pub mod api;

/// State shared by the task and AI routers.
pub struct TaskState {
    pub service: TaskService,
}

impl TaskState {
    pub fn new(service: TaskService) -> Self {
        Self { service }
    }
}

/// Formats a timestamp the way every API response carries it, e.g. `2025-01-01T09:30:00.000Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
