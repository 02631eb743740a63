use async_trait::async_trait;
use std::error::Error;
use std::path::Path;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoragePort: Send + Sync {
    /// Write one local file to storage under `key`, publicly readable,
    /// with the given content type. A single attempt; retry lives in the
    /// uploader. Implementations must read the file from the beginning on
    /// every call.
    async fn put_object(
        &self,
        local_path: &Path,
        key: &str,
        content_type: &str,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;
}
