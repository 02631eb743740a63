use serde::Serialize;

pub mod hub;

/// Wire name of the progress push event.
pub const PROGRESS_EVENT_NAME: &str = "uploadCloudProgress";

/// Upload progress for one job's segment set. Ephemeral, broadcast only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    /// Percent complete, 0..=100, rounded.
    pub progress: u8,
    pub total_completed_files: usize,
    pub total_files: usize,
}
