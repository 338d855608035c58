use crate::error::FileError;
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::path::PathBuf;

/// What a record's `content` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Text,
    Notebook,
    Binary,
    Skipped,
    Failed,
}

/// The result of reading and classifying one accepted file.
#[derive(Debug, Serialize)]
pub struct FileRecord {
    /// Root-relative path using `/` separators.
    pub relative_path: String,
    /// Resolved at discovery time and used only for I/O.
    #[serde(skip)]
    pub absolute_path: PathBuf,
    /// The text written to the digest: file content, notebook extraction,
    /// or a placeholder such as `[Binary File]`. Text files keep their bytes
    /// unchanged, whatever their encoding. Empty when `error` is set.
    #[serde(serialize_with = "serialize_content")]
    pub content: Vec<u8>,
    pub kind: ContentKind,
    pub is_binary: bool,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_error"
    )]
    pub error: Option<FileError>,
}

impl FileRecord {
    pub fn is_skipped(&self) -> bool {
        self.kind == ContentKind::Skipped
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Content as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}

fn serialize_content<S: Serializer>(content: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(content))
}

fn serialize_error<S: Serializer>(error: &Option<FileError>, serializer: S) -> Result<S::Ok, S::Error> {
    match error {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Aggregate counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub files_processed: usize,
    pub directories_processed: usize,
    pub binary_files: usize,
    pub skipped_files: usize,
    /// Bytes of text and notebook content; placeholders are not counted.
    pub total_content_bytes: u64,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Every accepted path in discovery order.
    pub all_paths: Vec<String>,
}

/// Records and statistics of a completed run.
#[derive(Debug, Serialize)]
pub struct Digest {
    pub stats: RunStats,
    pub files: Vec<FileRecord>,
}

impl Digest {
    /// Paths that failed, with the reason, in discovery order.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &FileError)> {
        self.files
            .iter()
            .filter_map(|r| r.error.as_ref().map(|e| (r.relative_path.as_str(), e)))
    }
}
