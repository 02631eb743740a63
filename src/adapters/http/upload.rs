//! `POST /upload`: multipart ingress for one job.
//!
//! The response is withheld until the whole pipeline (transcode, uploads,
//! cleanup) has completed.

use super::AppState;
use crate::error::PipelineError;
use crate::ports::storage::StoragePort;
use crate::ports::transcoder::TranscoderPort;
use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::{BoxError, Json};
use futures::{Stream, TryStreamExt};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio_util::io::StreamReader;
use tracing::info;
use uuid::Uuid;

/// Maximum accepted size for the uploaded video file.
pub const MAX_UPLOAD_BYTES: u64 = 1024 * 1024 * 1024;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    #[serde(rename = "outputFile")]
    pub output_file: String,
}

pub async fn upload_media<S, T>(
    State(state): State<Arc<AppState<S, T>>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, PipelineError>
where
    S: StoragePort + 'static,
    T: TranscoderPort + 'static,
{
    let fields = collect_job_fields(&state.upload_root, multipart).await?;

    let output_file = state
        .pipeline
        .run(fields.input_path, fields.subject_name, fields.lesson_name)
        .await?;

    Ok(Json(UploadResponse {
        message: "Conversion and upload successful".to_string(),
        output_file,
    }))
}

#[derive(Debug, Default)]
struct JobFields {
    input_path: Option<PathBuf>,
    subject_name: Option<String>,
    lesson_name: Option<String>,
}

/// Drain the multipart body, streaming the file part to a scratch path in
/// the upload root and collecting the two labels. A repeated field keeps
/// the last value; a superseded scratch file is removed.
async fn collect_job_fields(
    upload_root: &Path,
    mut multipart: Multipart,
) -> Result<JobFields, PipelineError> {
    let mut fields = JobFields::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| PipelineError::Upload(err.to_string()))?
    {
        match field.name() {
            Some("file") => {
                let path = upload_root.join(Uuid::new_v4().to_string());
                info!(path = %path.display(), "saving upload");
                stream_to_file(&path, field, MAX_UPLOAD_BYTES).await?;
                if let Some(previous) = fields.input_path.replace(path) {
                    let _ = tokio::fs::remove_file(previous).await;
                }
            }
            Some("subjectName") => {
                fields.subject_name = Some(
                    field
                        .text()
                        .await
                        .map_err(|err| PipelineError::Upload(err.to_string()))?,
                );
            }
            Some("lessonName") => {
                fields.lesson_name = Some(
                    field
                        .text()
                        .await
                        .map_err(|err| PipelineError::Upload(err.to_string()))?,
                );
            }
            _ => continue,
        }
    }

    Ok(fields)
}

/// Save a byte `Stream` to a file, rejecting it once `limit` is exceeded.
/// On rejection the partial file is removed.
async fn stream_to_file<St, E>(path: &Path, stream: St, limit: u64) -> Result<(), PipelineError>
where
    St: Stream<Item = Result<Bytes, E>>,
    E: Into<BoxError>,
{
    let body_with_io_error = stream.map_err(|err| io::Error::new(io::ErrorKind::Other, err));
    let body_reader = StreamReader::new(body_with_io_error);
    futures::pin_mut!(body_reader);
    // One byte of headroom: an exactly-at-limit file passes, anything
    // larger is detectable without draining the rest of the body.
    let mut limited = body_reader.take(limit + 1);

    let mut file = BufWriter::new(File::create(path).await?);
    let written = match tokio::io::copy(&mut limited, &mut file).await {
        Ok(n) => n,
        Err(err) => {
            let _ = tokio::fs::remove_file(path).await;
            return Err(PipelineError::Upload(err.to_string()));
        }
    };

    if written > limit {
        let _ = tokio::fs::remove_file(path).await;
        return Err(PipelineError::Upload(format!(
            "file exceeds the {} byte limit",
            limit
        )));
    }

    file.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::Request;
    use bytes::Bytes;
    use futures::stream;
    use std::fs;
    use tempfile::tempdir;

    type E = std::io::Error;

    const BOUNDARY: &str = "XLECTERNX";

    fn file_part(contents: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"clip.mp4\"\r\n\r\n{contents}\r\n"
        )
    }

    fn text_part(name: &str, value: &str) -> String {
        format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
    }

    async fn multipart_from(parts: &[String]) -> Multipart {
        let body = format!("{}--{BOUNDARY}--\r\n", parts.concat());
        let request = Request::builder()
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        Multipart::from_request(request, &()).await.unwrap()
    }

    #[tokio::test]
    async fn collects_file_and_labels() {
        let dir = tempdir().unwrap();
        let multipart = multipart_from(&[
            file_part("raw video bytes"),
            text_part("subjectName", "maths"),
            text_part("lessonName", "intro"),
        ])
        .await;

        let fields = collect_job_fields(dir.path(), multipart).await.unwrap();

        let input = fields.input_path.unwrap();
        assert_eq!(fs::read_to_string(input).unwrap(), "raw video bytes");
        assert_eq!(fields.subject_name.as_deref(), Some("maths"));
        assert_eq!(fields.lesson_name.as_deref(), Some("intro"));
    }

    #[tokio::test]
    async fn repeated_file_part_removes_superseded_scratch_file() {
        let dir = tempdir().unwrap();
        let multipart = multipart_from(&[file_part("first"), file_part("second")]).await;

        let fields = collect_job_fields(dir.path(), multipart).await.unwrap();

        // The last part wins and the earlier scratch file is gone.
        let input = fields.input_path.unwrap();
        assert_eq!(fs::read_to_string(input).unwrap(), "second");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn stream_is_written_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("upload");

        let data = "Hello, world!";
        let mock_stream = stream::iter(vec![Ok::<Bytes, E>(Bytes::from(data))]);

        stream_to_file(&path, mock_stream, MAX_UPLOAD_BYTES)
            .await
            .unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), data);
    }

    #[tokio::test]
    async fn stream_error_removes_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("upload");

        let mock_stream = stream::iter(vec![
            Ok::<Bytes, &str>(Bytes::from_static(b"partial")),
            Err("connection reset"),
        ]);

        let err = stream_to_file(&path, mock_stream, MAX_UPLOAD_BYTES)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Upload(_)));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn oversized_stream_is_rejected_before_completion() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("upload");

        let chunks: Vec<Result<Bytes, E>> = (0..3)
            .map(|_| Ok(Bytes::from(vec![0u8; 512])))
            .collect();

        // Cap of 1 KiB: the third 512-byte chunk pushes past it.
        let err = stream_to_file(&path, stream::iter(chunks), 1024)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Upload(_)));
        assert!(!path.exists());
    }
}
