//! # Codedigest
//!
//! `codedigest` turns a directory tree, or a Git repository cloned to a
//! temporary location, into one deterministic text artifact for bulk
//! ingestion by a language model: a statistics summary, an ASCII directory
//! tree, and every included file's content under a `FILE:` header.
//!
//! The pipeline is: walk the root while pruning excluded directories,
//! classify and read every accepted file concurrently (text, binary
//! placeholder, size-skip placeholder, or extracted notebook cells), then
//! assemble the digest with README files first.
//!
//! # Features
//!
//! - `parallel` (default): reads files on a bounded Rayon thread pool.
//!
//! # Example
//!
//! ```no_run
//! use codedigest::{DigestBuilder, digest, output};
//!
//! let options = DigestBuilder::new("./my-project")
//!     .max_file_size(1024 * 1024)
//!     .include_patterns(vec!["*.rs".into(), "*.md".into()])
//!     .build();
//!
//! let result = digest(&options).expect("failed to build digest");
//! for (path, error) in result.failures() {
//!     eprintln!("{path}: {error}");
//! }
//! output::write_digest(&result, "digest.md").expect("failed to write digest");
//! ```

mod classify;
pub mod defaults;
mod engine;
mod error;
pub mod notebook;
mod options;
pub mod output;
mod patterns;
pub mod remote;
mod tree;
mod types;
mod walker;

pub use classify::{BINARY_PLACEHOLDER, ClassifiedContent, ContentClassifier, classify, skip_placeholder};
pub use engine::{Ingestor, digest, ingest};
pub use error::{DigestError, FileError};
pub use options::{BinaryDetection, DEFAULT_MAX_FILE_SIZE, DigestBuilder, DigestOptions};
pub use patterns::{PatternMatcher, should_include};
pub use tree::{render_tree, root_label};
pub use types::{ContentKind, Digest, FileRecord, RunStats};
pub use walker::{DirectoryWalker, DiscoveredFile, Discovery, walk};
