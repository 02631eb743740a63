//! The upload-transcode-publish orchestrator.
//!
//! One job runs as a sequence of stage gates: validate, create the working
//! directory, transcode, upload everything, record history, clean up. No
//! stage starts until the previous one fully completed, and only the first
//! and third stages can fail the request. Upload failures are logged and
//! swallowed: the response still carries the expected manifest URL.

use crate::application::uploader::Uploader;
use crate::domain::history::{HistoryEntry, HistoryLedger};
use crate::domain::job::{sanitize_label, Job};
use crate::error::PipelineError;
use crate::ports::storage::StoragePort;
use crate::ports::transcoder::TranscoderPort;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

pub struct PipelineService<S, T> {
    uploader: Uploader<S>,
    transcoder: T,
    history: Arc<HistoryLedger>,
    upload_root: PathBuf,
    public_base_url: String,
}

impl<S, T> PipelineService<S, T>
where
    S: StoragePort,
    T: TranscoderPort,
{
    pub fn new(
        uploader: Uploader<S>,
        transcoder: T,
        history: Arc<HistoryLedger>,
        upload_root: PathBuf,
        public_base_url: String,
    ) -> Self {
        Self {
            uploader,
            transcoder,
            history,
            upload_root,
            public_base_url,
        }
    }

    /// Drive one job to completion and return the public manifest URL.
    pub async fn run(
        &self,
        input: Option<PathBuf>,
        subject: Option<String>,
        lesson: Option<String>,
    ) -> Result<String, PipelineError> {
        // 1. Validate presence of the file and both labels.
        let (input, subject, lesson) = match (input, subject, lesson) {
            (Some(input), Some(subject), Some(lesson))
                if !subject.is_empty() && !lesson.is_empty() =>
            {
                (input, subject, lesson)
            }
            _ => return Err(PipelineError::MissingInput),
        };

        let subject = sanitize_label(&subject);
        let lesson = sanitize_label(&lesson);
        let job = Job::prepare(&self.upload_root, &subject, &lesson, input);

        // 2. Working directory, create-if-absent.
        tokio::fs::create_dir_all(&job.workdir).await?;

        // 3. Transcode. On failure the partial working directory stays in
        // place for inspection.
        let manifest = self
            .transcoder
            .transcode(&job.input_path, &job.workdir)
            .await
            .map_err(|err| PipelineError::Transcode(err.to_string()))?;
        info!(manifest = %manifest.display(), "transcoding complete");

        // 4. Upload every file now present in the working directory.
        let summary = self
            .uploader
            .upload_all(&job.workdir, &subject, &lesson)
            .await?;
        if summary.completed_files < summary.total_files {
            warn!(
                completed = summary.completed_files,
                total = summary.total_files,
                "some uploads failed permanently; publishing anyway"
            );
        }

        // 5. Record optimistically, whatever the individual task outcomes.
        let output_url = job.public_manifest_url(&self.public_base_url);
        self.history
            .append(HistoryEntry {
                subject_name: subject.clone(),
                lesson_name: lesson.clone(),
                output_path: output_url.clone(),
                timestamp: Utc::now(),
            })
            .await;

        // 6. Unconditional best-effort cleanup.
        self.cleanup(&job).await;

        Ok(output_url)
    }

    /// Remove the working directory, the subject directory if now empty,
    /// and the received scratch input. Failures are logged, never escalated
    /// and never retried.
    async fn cleanup(&self, job: &Job) {
        if let Err(err) = tokio::fs::remove_dir_all(&job.workdir).await {
            warn!(dir = %job.workdir.display(), error = %err, "failed to remove working directory");
        }

        if let Some(subject_dir) = job.workdir.parent() {
            if let Ok(mut entries) = tokio::fs::read_dir(subject_dir).await {
                if let Ok(None) = entries.next_entry().await {
                    if let Err(err) = tokio::fs::remove_dir(subject_dir).await {
                        warn!(dir = %subject_dir.display(), error = %err, "failed to remove subject directory");
                    }
                }
            }
        }

        if let Err(err) = tokio::fs::remove_file(&job.input_path).await {
            warn!(file = %job.input_path.display(), error = %err, "failed to remove input file");
        }
    }
}
