use crate::defaults::default_exclude_patterns;
use serde::{Deserialize, Serialize};

/// Default size limit: files above 2 MiB are replaced by a placeholder.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 2 * 1024 * 1024;

/// How the head of a file is inspected to decide whether it is binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryDetection {
    /// Any NUL byte in the first 1024 bytes.
    Simple,
    /// `content_inspector` heuristics over the first 1024 bytes.
    Accurate,
    /// Every file is text.
    None,
}

/// Everything a run needs, fixed before the run starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestOptions {
    /// Local directory path or Git URL.
    pub source: String,
    /// Branch to clone for Git sources. Reported in the summary.
    pub branch: Option<String>,
    /// Size limit in bytes. `0` disables the limit.
    pub max_file_size: u64,
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub binary_detection: BinaryDetection,
    /// Worker count for concurrent ingestion.
    pub concurrency: usize,
    pub respect_gitignore: bool,
    pub follow_links: bool,
    pub max_depth: Option<usize>,
    /// Reject malformed glob patterns instead of treating them as non-matches.
    pub strict_patterns: bool,
}

impl Default for DigestOptions {
    fn default() -> Self {
        Self {
            source: ".".to_string(),
            branch: None,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            include_patterns: Vec::new(),
            exclude_patterns: default_exclude_patterns(),
            binary_detection: BinaryDetection::Simple,
            concurrency: default_concurrency(),
            respect_gitignore: false,
            follow_links: false,
            max_depth: None,
            strict_patterns: false,
        }
    }
}

/// Twice the I/O parallelism rayon sees on this machine.
#[cfg(feature = "parallel")]
pub(crate) fn default_concurrency() -> usize {
    rayon::current_num_threads().saturating_mul(2).max(1)
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn default_concurrency() -> usize {
    1
}

#[derive(Debug, Default)]
pub struct DigestBuilder {
    options: DigestOptions,
}

impl DigestBuilder {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            options: DigestOptions {
                source: source.into(),
                ..Default::default()
            },
        }
    }
    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.options.branch = Some(branch.into());
        self
    }
    /// `0` means unlimited.
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.options.max_file_size = bytes;
        self
    }
    pub fn include_patterns(mut self, patterns: Vec<String>) -> Self {
        self.options.include_patterns = patterns;
        self
    }
    /// Replaces the exclusion list, defaults included. Pass an empty list to
    /// exclude nothing.
    pub fn exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.options.exclude_patterns = patterns;
        self
    }
    pub fn add_exclude_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.options.exclude_patterns.push(pattern.into());
        self
    }
    pub fn binary_detection(mut self, method: BinaryDetection) -> Self {
        self.options.binary_detection = method;
        self
    }
    pub fn concurrency(mut self, workers: usize) -> Self {
        self.options.concurrency = workers.max(1);
        self
    }
    pub fn respect_gitignore(mut self, yes: bool) -> Self {
        self.options.respect_gitignore = yes;
        self
    }
    pub fn follow_links(mut self, yes: bool) -> Self {
        self.options.follow_links = yes;
        self
    }
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.options.max_depth = Some(depth);
        self
    }
    pub fn strict_patterns(mut self, yes: bool) -> Self {
        self.options.strict_patterns = yes;
        self
    }
    pub fn build(self) -> DigestOptions {
        self.options
    }
}
