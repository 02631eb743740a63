//! Lectern - Video Publishing Pipeline
//!
//! Accepts a video upload, repackages it into an HLS rendition with an
//! external ffmpeg binary, pushes every artifact to S3-compatible object
//! storage with per-file retry, and broadcasts upload progress to connected
//! WebSocket observers.
//!
//! Hexagonal Architecture:
//! - domain/: Pure business logic (jobs, history)
//! - ports/: Trait definitions (storage, transcoder)
//! - adapters/: Concrete implementations (S3, ffmpeg, HTTP)
//! - application/: Services generic over the ports (pipeline, uploader)
//! - events/: Progress broadcast hub
//! - config: Environment configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod ports;

// Re-exports for convenience
pub use config::Config;
pub use error::PipelineError;
