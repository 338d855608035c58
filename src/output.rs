//! Serialising a [`Digest`] into its final byte form.
//!
//! The text digest is laid out as: a summary block, the directory tree (when
//! any path was accepted), then one block per readable file. README files
//! come first; each group is sorted by relative path. Failed files are left
//! out of the body but still counted in the summary.

use crate::error::DigestError;
use crate::tree::{render_tree, root_label};
use crate::types::{Digest, FileRecord, RunStats};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Line written above and below every `FILE:` header.
pub const FILE_SEPARATOR: &str = "================================================";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Digest,
    Json,
}

/// Current local time in the summary's timestamp format.
pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// The summary block, ending with a horizontal rule.
pub fn summary(stats: &RunStats, generated: &str) -> String {
    let mut out = String::with_capacity(512);
    out.push_str("# Codebase Digest Summary\n\n");
    out.push_str(&format!("**Source:** {}\n", stats.source));
    if let Some(branch) = stats.branch.as_deref().filter(|b| !b.is_empty()) {
        out.push_str(&format!("**Branch:** {branch}\n"));
    }
    out.push_str(&format!("**Generated:** {generated}\n\n"));

    out.push_str("## Statistics\n\n");
    out.push_str(&format!("- **Total Files:** {}\n", stats.files_processed));
    out.push_str(&format!("- **Directories:** {}\n", stats.directories_processed));
    out.push_str(&format!("- **Binary Files:** {}\n", stats.binary_files));
    out.push_str(&format!("- **Skipped Files:** {}\n", stats.skipped_files));
    out.push_str(&format!(
        "- **Total Content Size:** {:.2} KB\n\n",
        stats.total_content_bytes as f64 / 1024.0
    ));
    out.push_str("---\n\n");
    out
}

/// Whether a file name marks a README, ignoring case.
pub fn is_priority_file(relative_path: &str) -> bool {
    let name = relative_path.rsplit('/').next().unwrap_or(relative_path);
    name.to_lowercase().starts_with("readme")
}

/// Records that belong in the body, README files first, each group sorted
/// by relative path.
pub fn ordered_records(records: &[FileRecord]) -> Vec<&FileRecord> {
    let (mut priority, mut other): (Vec<&FileRecord>, Vec<&FileRecord>) = records
        .iter()
        .filter(|r| !r.is_failed())
        .partition(|r| is_priority_file(&r.relative_path));
    priority.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    other.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    priority.extend(other);
    priority
}

/// Writes the text digest with an explicit generation timestamp.
pub fn write_digest_to<W: Write>(
    out: &mut W,
    digest: &Digest,
    generated: &str,
) -> std::io::Result<()> {
    out.write_all(summary(&digest.stats, generated).as_bytes())?;

    if !digest.stats.all_paths.is_empty() {
        let label = root_label(&digest.stats.source);
        let tree = render_tree(&digest.stats.all_paths, &label, &digest.files);
        out.write_all(b"## Directory Structure\n\n```\n")?;
        out.write_all(tree.as_bytes())?;
        out.write_all(b"```\n\n---\n\n")?;
    }

    for record in ordered_records(&digest.files) {
        write!(
            out,
            "{FILE_SEPARATOR}\nFILE: {}\n{FILE_SEPARATOR}\n",
            record.relative_path
        )?;
        out.write_all(&record.content)?;
        out.write_all(b"\n\n")?;
    }
    Ok(())
}

/// The text digest as bytes, stamped with `generated`.
pub fn render_digest_at(digest: &Digest, generated: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4096);
    // Writing into a Vec cannot fail.
    let _ = write_digest_to(&mut buf, digest, generated);
    buf
}

/// The text digest as bytes, stamped with the current time.
pub fn render_digest(digest: &Digest) -> Vec<u8> {
    render_digest_at(digest, &timestamp_now())
}

/// Formats the digest in the requested format, stamped with the current time.
pub fn format_result(digest: &Digest, format: OutputFormat) -> Result<Vec<u8>, DigestError> {
    format_result_at(digest, format, &timestamp_now())
}

/// Formats the digest with an explicit generation timestamp. JSON output
/// carries no timestamp.
pub fn format_result_at(
    digest: &Digest,
    format: OutputFormat,
    generated: &str,
) -> Result<Vec<u8>, DigestError> {
    match format {
        OutputFormat::Digest => Ok(render_digest_at(digest, generated)),
        OutputFormat::Json => Ok(serde_json::to_vec_pretty(digest)?),
    }
}

/// Writes the formatted digest to a file.
pub fn write_result_to_file(
    digest: &Digest,
    format: OutputFormat,
    path: impl AsRef<Path>,
) -> Result<(), DigestError> {
    let bytes = format_result(digest, format)?;
    fs::write(&path, bytes).map_err(|e| DigestError::io(path.as_ref(), e))?;
    Ok(())
}

/// Writes the text digest to `path`.
pub fn write_digest(digest: &Digest, path: impl AsRef<Path>) -> Result<(), DigestError> {
    write_result_to_file(digest, OutputFormat::Digest, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ClassifiedContent;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn text(path: &str, body: &str) -> FileRecord {
        ClassifiedContent::PlainText(body.into()).into_record(path.into(), PathBuf::new())
    }

    #[test]
    fn readme_detection_ignores_case() {
        assert!(is_priority_file("README.md"));
        assert!(is_priority_file("docs/readme.txt"));
        assert!(is_priority_file("ReadMe"));
        assert!(!is_priority_file("readme/notes.md"));
        assert!(!is_priority_file("zebra.txt"));
    }

    #[test]
    fn summary_layout() {
        let stats = RunStats {
            files_processed: 3,
            directories_processed: 1,
            binary_files: 1,
            skipped_files: 0,
            total_content_bytes: 2048,
            source: "./proj".into(),
            branch: Some("main".into()),
            all_paths: vec![],
        };
        assert_eq!(
            summary(&stats, "2024-01-02 03:04:05"),
            "# Codebase Digest Summary\n\n\
             **Source:** ./proj\n\
             **Branch:** main\n\
             **Generated:** 2024-01-02 03:04:05\n\n\
             ## Statistics\n\n\
             - **Total Files:** 3\n\
             - **Directories:** 1\n\
             - **Binary Files:** 1\n\
             - **Skipped Files:** 0\n\
             - **Total Content Size:** 2.00 KB\n\n\
             ---\n\n"
        );
    }

    #[test]
    fn readme_files_come_first() {
        let records = vec![text("zebra.txt", "z"), text("README.md", "r"), text("a/README", "ar")];
        let order: Vec<_> = ordered_records(&records)
            .iter()
            .map(|r| r.relative_path.as_str())
            .collect();
        assert_eq!(order, ["README.md", "a/README", "zebra.txt"]);
    }

    #[test]
    fn non_utf8_content_is_written_verbatim() {
        let latin1 = b"caf\xE9\n".to_vec();
        let digest = Digest {
            stats: RunStats {
                files_processed: 1,
                total_content_bytes: latin1.len() as u64,
                source: "demo".into(),
                ..Default::default()
            },
            files: vec![ClassifiedContent::PlainText(latin1).into_record("menu.txt".into(), PathBuf::new())],
        };
        let bytes = render_digest_at(&digest, "T");
        assert!(bytes.ends_with(b"FILE: menu.txt\n================================================\ncaf\xE9\n\n\n"));
    }

    #[test]
    fn full_digest_layout() {
        let digest = Digest {
            stats: RunStats {
                files_processed: 1,
                total_content_bytes: 5,
                source: "demo".into(),
                all_paths: vec!["a.txt".into()],
                ..Default::default()
            },
            files: vec![text("a.txt", "hello")],
        };
        let bytes = render_digest_at(&digest, "T");
        let rendered = String::from_utf8(bytes).unwrap();
        let body = rendered.split_once("---\n\n").unwrap().1;
        assert_eq!(
            body,
            "## Directory Structure\n\n```\ndemo/\n└── a.txt\n```\n\n---\n\n\
             ================================================\n\
             FILE: a.txt\n\
             ================================================\n\
             hello\n\n"
        );
    }
}
