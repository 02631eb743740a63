use crate::config::Config;
use crate::ports::storage::StoragePort;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use std::error::Error;
use std::path::Path;

/// S3Adapter implements StoragePort for any S3-compatible object store
/// (AWS S3, DigitalOcean Spaces, MinIO).
#[derive(Clone)]
pub struct S3Adapter {
    client: Client,
    bucket: String,
}

impl S3Adapter {
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    /// Build a client from environment-injected credentials and an optional
    /// custom endpoint.
    pub async fn connect(config: &Config) -> Self {
        let credentials = Credentials::new(
            config.aws_access_key_id.clone(),
            config.aws_secret_access_key.clone(),
            None,
            None,
            "lectern-env",
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.s3_region.clone()))
            .credentials_provider(credentials);

        if let Some(endpoint) = &config.s3_endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        Self::new(Client::new(&sdk_config), config.s3_bucket.clone())
    }
}

#[async_trait]
impl StoragePort for S3Adapter {
    async fn put_object(
        &self,
        local_path: &Path,
        key: &str,
        content_type: &str,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        // Rebuilt from the path on every attempt, so a failed partial read
        // restarts from the beginning of the file.
        let body = ByteStream::from_path(local_path).await?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .acl(ObjectCannedAcl::PublicRead)
            .content_type(content_type)
            .body(body)
            .send()
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_builds_a_client_from_explicit_settings() {
        let config = Config {
            addr: "127.0.0.1".into(),
            port: "9999".into(),
            upload_dir: "./uploads".into(),
            s3_bucket: "lectern".into(),
            s3_region: "blr1".into(),
            s3_endpoint: Some("https://blr1.digitaloceanspaces.com".into()),
            aws_access_key_id: "test-key".into(),
            aws_secret_access_key: "test-secret".into(),
            public_base_url: "https://lectern.blr1.digitaloceanspaces.com".into(),
            upload_max_attempts: 100,
            upload_retry_delay_secs: 3,
        };

        // Explicit region and credentials: the loader must resolve without
        // touching the environment or instance metadata.
        let adapter = S3Adapter::connect(&config).await;
        assert_eq!(adapter.bucket, "lectern");
    }
}
