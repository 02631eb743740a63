//! Bounded in-memory record of recently completed jobs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use tokio::sync::Mutex;

/// Oldest entries are evicted once the ledger grows past this.
pub const HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    #[serde(rename = "subjectName")]
    pub subject_name: String,
    #[serde(rename = "lessonName")]
    pub lesson_name: String,
    /// Public URL of the published manifest.
    #[serde(rename = "outputPath")]
    pub output_path: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only FIFO of the last [`HISTORY_CAPACITY`] completed jobs.
///
/// Process-wide state: injected behind an `Arc` into the pipeline and the
/// HTTP layer, reset to empty on restart.
#[derive(Debug, Default)]
pub struct HistoryLedger {
    entries: Mutex<VecDeque<HistoryEntry>>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, entry: HistoryEntry) {
        let mut entries = self.entries.lock().await;
        entries.push_back(entry);
        while entries.len() > HISTORY_CAPACITY {
            entries.pop_front();
        }
    }

    /// Snapshot, oldest-remaining first.
    pub async fn list(&self) -> Vec<HistoryEntry> {
        self.entries.lock().await.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: usize) -> HistoryEntry {
        HistoryEntry {
            subject_name: format!("subject-{}", n),
            lesson_name: format!("lesson-{}", n),
            output_path: format!("https://host/subject-{n}/lesson-{n}/playlist.m3u8"),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn keeps_insertion_order() {
        let ledger = HistoryLedger::new();
        for n in 0..3 {
            ledger.append(entry(n)).await;
        }
        let listed = ledger.list().await;
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].subject_name, "subject-0");
        assert_eq!(listed[2].subject_name, "subject-2");
    }

    #[tokio::test]
    async fn evicts_oldest_past_capacity() {
        let ledger = HistoryLedger::new();
        for n in 0..11 {
            ledger.append(entry(n)).await;
        }
        let listed = ledger.list().await;
        assert_eq!(listed.len(), HISTORY_CAPACITY);
        // Entry 0 is gone, 1..=10 keep their relative order.
        assert_eq!(listed[0].subject_name, "subject-1");
        assert_eq!(listed[9].subject_name, "subject-10");
    }

    #[test]
    fn entry_serializes_with_wire_field_names() {
        let entry = HistoryEntry {
            subject_name: "maths".into(),
            lesson_name: "intro".into(),
            output_path: "https://host/maths/intro/playlist.m3u8".into(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("subjectName").is_some());
        assert!(json.get("lessonName").is_some());
        assert!(json.get("outputPath").is_some());
        assert!(json.get("timestamp").is_some());
    }
}
