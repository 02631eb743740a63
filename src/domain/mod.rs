pub mod history;
pub mod job;
