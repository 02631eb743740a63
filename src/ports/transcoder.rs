use async_trait::async_trait;
use std::error::Error;
use std::path::{Path, PathBuf};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscoderPort: Send + Sync {
    /// Produce an HLS segment set (manifest plus transport-stream chunks)
    /// from `input` into `output_dir`, returning the manifest path.
    /// Failure is terminal; whatever partial output exists is left behind.
    async fn transcode(
        &self,
        input: &Path,
        output_dir: &Path,
    ) -> Result<PathBuf, Box<dyn Error + Send + Sync>>;
}
