//! Durable, retrying upload of a job's segment set.

use crate::domain::job::content_type_for;
use crate::events::hub::ProgressHub;
use crate::events::ProgressEvent;
use crate::ports::storage::StoragePort;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info};

/// Bounded retry with a fixed inter-attempt delay. Injected so tests can
/// run with a zero delay.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 100,
            delay: Duration::from_secs(3),
        }
    }
}

/// Outcome of one batch. A failed file is logged, never escalated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadSummary {
    pub total_files: usize,
    pub completed_files: usize,
}

pub struct Uploader<S> {
    storage: S,
    policy: RetryPolicy,
    progress: Arc<ProgressHub>,
}

impl<S> Uploader<S>
where
    S: StoragePort,
{
    pub fn new(storage: S, policy: RetryPolicy, progress: Arc<ProgressHub>) -> Self {
        Self {
            storage,
            policy,
            progress,
        }
    }

    /// Upload one file, retrying up to the policy's attempt budget. Each
    /// attempt re-reads the file from the start (the storage port rebuilds
    /// its body stream per call). Returns whether the object landed.
    pub async fn upload_with_retry(&self, path: &Path, key: &str, content_type: &str) -> bool {
        for attempt in 1..=self.policy.max_attempts {
            match self.storage.put_object(path, key, content_type).await {
                Ok(()) => {
                    info!(%key, attempt, "uploaded");
                    return true;
                }
                Err(err) => {
                    error!(%key, attempt, error = %err, "upload attempt failed");
                    if attempt < self.policy.max_attempts {
                        sleep(self.policy.delay).await;
                    }
                }
            }
        }
        error!(
            %key,
            attempts = self.policy.max_attempts,
            "upload failed after all attempts, giving up"
        );
        false
    }

    /// Upload every file in `dir` under `{subject}/{lesson}/{filename}`,
    /// sequentially, in filesystem listing order. After each successful
    /// file a progress event is broadcast; a permanently failed file does
    /// not stop the batch.
    pub async fn upload_all(
        &self,
        dir: &Path,
        subject: &str,
        lesson: &str,
    ) -> io::Result<UploadSummary> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                files.push(entry.path());
            }
        }

        let total_files = files.len();
        let mut completed_files = 0;

        for path in &files {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let key = format!("{}/{}/{}", subject, lesson, file_name);
            let content_type = content_type_for(file_name);

            if self.upload_with_retry(path, &key, content_type).await {
                completed_files += 1;
                let progress =
                    ((completed_files as f64 / total_files as f64) * 100.0).round() as u8;
                self.progress.publish(ProgressEvent {
                    progress,
                    total_completed_files: completed_files,
                    total_files,
                });
            }
        }

        Ok(UploadSummary {
            total_files,
            completed_files,
        })
    }
}
