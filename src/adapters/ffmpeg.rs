//! Transcoder adapter: shells out to the external ffmpeg binary.

use crate::domain::job::MANIFEST_FILE;
use crate::ports::transcoder::TranscoderPort;
use async_trait::async_trait;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::info;

/// Fixed zero-padded segment filename pattern, relative to the output dir.
const SEGMENT_PATTERN: &str = "video%03d.ts";

/// Invokes `ffmpeg` with a fixed flag set: streams are copied without
/// re-encoding (container repackaging only), 4 second segments, complete
/// VOD playlist written up front.
#[derive(Clone, Copy, Default)]
pub struct FfmpegTranscoder;

impl FfmpegTranscoder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TranscoderPort for FfmpegTranscoder {
    async fn transcode(
        &self,
        input: &Path,
        output_dir: &Path,
    ) -> Result<PathBuf, Box<dyn Error + Send + Sync>> {
        let manifest = output_dir.join(MANIFEST_FILE);
        let segment_pattern = output_dir.join(SEGMENT_PATTERN);

        info!(input = %input.display(), output = %manifest.display(), "starting transcode");

        let output = Command::new("ffmpeg")
            .arg("-y")
            .arg("-i")
            .arg(input)
            .arg("-preset")
            .arg("fast")
            .arg("-threads")
            .arg("4")
            .arg("-c:v")
            .arg("copy")
            .arg("-c:a")
            .arg("copy")
            .arg("-hls_time")
            .arg("4")
            .arg("-hls_playlist_type")
            .arg("vod")
            .arg("-hls_segment_filename")
            .arg(&segment_pattern)
            .arg(&manifest)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // The useful ffmpeg diagnostics are at the end of stderr.
            let tail: String = stderr
                .lines()
                .rev()
                .take(5)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect::<Vec<_>>()
                .join("\n");
            return Err(format!("ffmpeg exited with {}: {}", output.status, tail).into());
        }

        Ok(manifest)
    }
}
