pub mod pipeline;
pub mod uploader;
