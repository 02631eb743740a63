//! Lectern server binary.
//!
//! Wires the adapters into the pipeline service and serves the ingress
//! endpoints. The upload root is created at startup if absent.

use lectern::adapters::aws::S3Adapter;
use lectern::adapters::ffmpeg::FfmpegTranscoder;
use lectern::adapters::http::{self, AppState};
use lectern::application::pipeline::PipelineService;
use lectern::application::uploader::{RetryPolicy, Uploader};
use lectern::config::Config;
use lectern::domain::history::HistoryLedger;
use lectern::events::hub::ProgressHub;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    tracing_subscriber::fmt::init();

    let upload_root = PathBuf::from(&config.upload_dir);
    if let Err(err) = tokio::fs::create_dir_all(&upload_root).await {
        eprintln!("Failed to create upload dir {:?}: {}", upload_root, err);
        std::process::exit(1);
    }

    // 1. Adapters
    let storage = S3Adapter::connect(&config).await;
    let transcoder = FfmpegTranscoder::new();

    // 2. Shared components, injected rather than global
    let history = Arc::new(HistoryLedger::new());
    let progress = Arc::new(ProgressHub::new());

    // 3. Application services
    let retry = RetryPolicy {
        max_attempts: config.upload_max_attempts,
        delay: Duration::from_secs(config.upload_retry_delay_secs),
    };
    let uploader = Uploader::new(storage, retry, progress.clone());
    let pipeline = PipelineService::new(
        uploader,
        transcoder,
        history.clone(),
        upload_root.clone(),
        config.public_base_url.clone(),
    );

    // 4. HTTP layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = Arc::new(AppState {
        pipeline,
        history,
        progress,
        upload_root,
    });
    let app = http::router(state).layer(cors);

    // 5. Serve
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", config.addr, config.port))
        .await
        .expect("Failed to bind TCP listener");
    println!("Listening at {}:{}", config.addr, config.port);
    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
