//! Environment configuration.

use std::env;

/// Runtime configuration, loaded from the environment.
///
/// Credentials are never hard-coded: the S3 access key pair comes from
/// `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`.
#[derive(Clone, Debug)]
pub struct Config {
    /// HTTP server bind address
    pub addr: String,
    /// HTTP server port
    pub port: String,
    /// Root directory for received files and per-job working directories
    pub upload_dir: String,
    /// Target bucket on the S3-compatible store
    pub s3_bucket: String,
    /// Region of the S3-compatible store
    pub s3_region: String,
    /// Custom endpoint for S3-compatible stores (DigitalOcean Spaces, MinIO).
    /// When unset the SDK default endpoint for the region is used.
    pub s3_endpoint: Option<String>,
    /// AWS Access Key ID for the object store
    pub aws_access_key_id: String,
    /// AWS Secret Access Key for the object store
    pub aws_secret_access_key: String,
    /// Base URL under which published objects are publicly reachable
    pub public_base_url: String,
    /// Maximum upload attempts per file before giving up
    pub upload_max_attempts: usize,
    /// Fixed delay between upload attempts, in seconds
    pub upload_retry_delay_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let s3_bucket = env::var("S3_BUCKET").unwrap_or_else(|_| String::from("lectern"));
        let s3_region = env::var("S3_REGION").unwrap_or_else(|_| String::from("us-east-1"));
        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("https://{}.{}.digitaloceanspaces.com", s3_bucket, s3_region));

        Self {
            addr: env::var("ADDR").unwrap_or_else(|_| String::from("127.0.0.1")),
            port: env::var("PORT").unwrap_or_else(|_| String::from("9999")),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| String::from("./uploads")),
            s3_bucket,
            s3_region,
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            aws_access_key_id: env::var("AWS_ACCESS_KEY_ID")
                .unwrap_or_else(|_| String::from("minioadmin")),
            aws_secret_access_key: env::var("AWS_SECRET_ACCESS_KEY")
                .unwrap_or_else(|_| String::from("minioadmin")),
            public_base_url,
            upload_max_attempts: env::var("UPLOAD_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            upload_retry_delay_secs: env::var("UPLOAD_RETRY_DELAY_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
        }
    }
}
