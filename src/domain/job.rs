//! Job identity: sanitized labels, filesystem layout, public URL.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Name of the HLS index file, both locally and in the bucket.
pub const MANIFEST_FILE: &str = "playlist.m3u8";

pub const MANIFEST_CONTENT_TYPE: &str = "application/x-mpegURL";
pub const SEGMENT_CONTENT_TYPE: &str = "video/MP2T";

fn whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("hardcoded pattern"))
}

/// Collapse every run of whitespace into a single hyphen.
///
/// Labels become both filesystem path components and object-store key
/// segments, so they must not contain spaces or newlines.
pub fn sanitize_label(raw: &str) -> String {
    whitespace().replace_all(raw, "-").into_owned()
}

/// Content type for one member of a segment set, by file extension.
/// Everything that is not the manifest is a transport-stream chunk.
pub fn content_type_for(file_name: &str) -> &'static str {
    if file_name.ends_with(".m3u8") {
        MANIFEST_CONTENT_TYPE
    } else {
        SEGMENT_CONTENT_TYPE
    }
}

/// One upload-transcode-publish request.
///
/// The working directory is `{upload_root}/{subject}/{lesson}`. It is not
/// locked: two concurrent jobs with identical labels race on it.
#[derive(Debug, Clone)]
pub struct Job {
    pub subject: String,
    pub lesson: String,
    pub input_path: PathBuf,
    pub workdir: PathBuf,
    pub manifest_path: PathBuf,
}

impl Job {
    /// Build the job's paths from already-sanitized labels.
    pub fn prepare(upload_root: &Path, subject: &str, lesson: &str, input_path: PathBuf) -> Self {
        let workdir = upload_root.join(subject).join(lesson);
        let manifest_path = workdir.join(MANIFEST_FILE);
        Self {
            subject: subject.to_owned(),
            lesson: lesson.to_owned(),
            input_path,
            workdir,
            manifest_path,
        }
    }

    /// Public URL of the published manifest.
    pub fn public_manifest_url(&self, base_url: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            base_url.trim_end_matches('/'),
            self.subject,
            self.lesson,
            MANIFEST_FILE
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_collapses_whitespace_runs() {
        assert_eq!(sanitize_label("Linear Algebra"), "Linear-Algebra");
        assert_eq!(sanitize_label("a  \t b\nc"), "a-b-c");
        assert_eq!(sanitize_label("nochange"), "nochange");
    }

    #[test]
    fn sanitize_keeps_leading_and_trailing_runs() {
        assert_eq!(sanitize_label(" padded "), "-padded-");
    }

    #[test]
    fn content_type_by_extension() {
        assert_eq!(content_type_for("playlist.m3u8"), "application/x-mpegURL");
        assert_eq!(content_type_for("video000.ts"), "video/MP2T");
        assert_eq!(content_type_for("video042.ts"), "video/MP2T");
    }

    #[test]
    fn job_paths_and_url() {
        let job = Job::prepare(
            Path::new("/tmp/uploads"),
            "maths",
            "lesson-1",
            PathBuf::from("/tmp/uploads/abc"),
        );
        assert_eq!(job.workdir, PathBuf::from("/tmp/uploads/maths/lesson-1"));
        assert_eq!(
            job.manifest_path,
            PathBuf::from("/tmp/uploads/maths/lesson-1/playlist.m3u8")
        );
        assert_eq!(
            job.public_manifest_url("https://bucket.example.com/"),
            "https://bucket.example.com/maths/lesson-1/playlist.m3u8"
        );
    }
}
