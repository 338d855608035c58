//! Turns one file on disk into the text that represents it in the digest.

use crate::error::FileError;
use crate::notebook;
use crate::options::BinaryDetection;
use crate::types::{ContentKind, FileRecord};
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Placeholder content for binary files.
pub const BINARY_PLACEHOLDER: &str = "[Binary File]";

/// Number of leading bytes inspected for binary detection.
pub const SNIFF_LEN: u64 = 1024;

const MIB: f64 = 1024.0 * 1024.0;

/// Outcome of classifying a single file.
#[derive(Debug)]
pub enum ClassifiedContent {
    /// Larger than the size limit; nothing was read.
    Skipped { limit_bytes: u64, actual_bytes: u64 },
    Binary,
    NotebookText(String),
    /// File bytes exactly as read; not required to be UTF-8.
    PlainText(Vec<u8>),
    Failed(FileError),
}

impl ClassifiedContent {
    pub fn kind(&self) -> ContentKind {
        match self {
            ClassifiedContent::Skipped { .. } => ContentKind::Skipped,
            ClassifiedContent::Binary => ContentKind::Binary,
            ClassifiedContent::NotebookText(_) => ContentKind::Notebook,
            ClassifiedContent::PlainText(_) => ContentKind::Text,
            ClassifiedContent::Failed(_) => ContentKind::Failed,
        }
    }

    /// Builds the immutable record for this outcome.
    pub fn into_record(self, relative_path: String, absolute_path: PathBuf) -> FileRecord {
        let kind = self.kind();
        let (content, error) = match self {
            ClassifiedContent::Skipped {
                limit_bytes,
                actual_bytes,
            } => (skip_placeholder(actual_bytes, limit_bytes).into_bytes(), None),
            ClassifiedContent::Binary => (BINARY_PLACEHOLDER.as_bytes().to_vec(), None),
            ClassifiedContent::NotebookText(body) => (body.into_bytes(), None),
            ClassifiedContent::PlainText(bytes) => (bytes, None),
            ClassifiedContent::Failed(e) => (Vec::new(), Some(e)),
        };
        FileRecord {
            relative_path,
            absolute_path,
            content,
            kind,
            is_binary: kind == ContentKind::Binary,
            error,
        }
    }
}

/// The placeholder written in place of an oversized file.
pub fn skip_placeholder(actual_bytes: u64, limit_bytes: u64) -> String {
    format!(
        "[File content skipped: Exceeds max size ({:.1} MB > {:.1} MB)]",
        actual_bytes as f64 / MIB,
        limit_bytes as f64 / MIB
    )
}

#[derive(Debug, Clone, Copy)]
pub struct ContentClassifier {
    size_limit: u64,
    detection: BinaryDetection,
}

impl ContentClassifier {
    /// `size_limit` of `0` disables the limit.
    pub fn new(size_limit: u64, detection: BinaryDetection) -> Self {
        Self {
            size_limit,
            detection,
        }
    }

    pub fn classify(&self, path: &Path) -> ClassifiedContent {
        let metadata = match fs::metadata(path) {
            Ok(m) => m,
            Err(e) => return ClassifiedContent::Failed(FileError::Stat(e)),
        };

        let actual_bytes = metadata.len();
        if self.size_limit > 0 && actual_bytes > self.size_limit {
            tracing::debug!(
                path = %path.display(),
                actual_bytes,
                limit_bytes = self.size_limit,
                "file too large, skipping content"
            );
            return ClassifiedContent::Skipped {
                limit_bytes: self.size_limit,
                actual_bytes,
            };
        }

        if notebook::is_notebook(path) {
            return match notebook::extract(path) {
                Ok(body) => ClassifiedContent::NotebookText(body),
                Err(e) => ClassifiedContent::Failed(e),
            };
        }

        match self.read_text(path) {
            Ok(Some(body)) => ClassifiedContent::PlainText(body),
            Ok(None) => {
                tracing::debug!(path = %path.display(), "binary file detected");
                ClassifiedContent::Binary
            }
            Err(e) => ClassifiedContent::Failed(FileError::Read(e)),
        }
    }

    /// Reads the whole file, or returns `None` if its head looks binary.
    /// A zero-length read is an empty text file.
    fn read_text(&self, path: &Path) -> std::io::Result<Option<Vec<u8>>> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let mut bytes = Vec::with_capacity(SNIFF_LEN as usize);
        reader.by_ref().take(SNIFF_LEN).read_to_end(&mut bytes)?;

        let is_binary = match self.detection {
            BinaryDetection::Simple => bytes.contains(&0),
            BinaryDetection::Accurate => content_inspector::inspect(&bytes).is_binary(),
            BinaryDetection::None => false,
        };
        if is_binary {
            return Ok(None);
        }

        reader.read_to_end(&mut bytes)?;
        Ok(Some(bytes))
    }
}

/// Classifies `path` with NUL-byte binary detection.
pub fn classify(path: &Path, size_limit: u64) -> ClassifiedContent {
    ContentClassifier::new(size_limit, BinaryDetection::Simple).classify(path)
}
