pub mod aws;
pub mod ffmpeg;
pub mod http;
