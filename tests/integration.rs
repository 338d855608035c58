use codedigest::output::{self, OutputFormat};
use codedigest::{DigestBuilder, DigestError, digest};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(root: &Path, relative: &str, contents: impl AsRef<[u8]>) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn source(root: &Path) -> String {
    root.to_string_lossy().into_owned()
}

#[test]
fn integration_full_flow() {
    let dir = tempdir().unwrap();
    write(dir.path(), "zebra.txt", "stripes");
    write(dir.path(), "README.md", "# Demo\n");
    write(dir.path(), "src/main.rs", "fn main() {}\n");
    write(dir.path(), "src/logo.bin", [0u8, 1, 2, 3]);
    write(dir.path(), "node_modules/pkg/index.js", "module.exports = 1;");
    write(dir.path(), "debug.log", "noise");

    let options = DigestBuilder::new(source(dir.path())).build();
    let result = digest(&options).unwrap();

    assert_eq!(
        result.stats.all_paths,
        ["README.md", "src/logo.bin", "src/main.rs", "zebra.txt"]
    );
    assert_eq!(result.stats.files_processed, 4);
    assert_eq!(result.stats.binary_files, 1);
    assert_eq!(result.stats.skipped_files, 0);
    // src and the pruned node_modules; nothing below node_modules is visited.
    assert_eq!(result.stats.directories_processed, 2);

    let text = String::from_utf8(output::render_digest_at(&result, "2024-01-01 00:00:00")).unwrap();
    let label = codedigest::root_label(&result.stats.source);
    let expected_tree = format!(
        "## Directory Structure\n\n```\n{label}/\n\
         ├── README.md\n\
         ├── src/\n\
         │   ├── logo.bin (Binary)\n\
         │   └── main.rs\n\
         └── zebra.txt\n\
         ```\n\n---\n\n"
    );
    assert!(text.contains(&expected_tree), "tree missing from:\n{text}");
    assert!(text.contains("**Generated:** 2024-01-01 00:00:00\n"));
    assert!(text.contains("- **Total Files:** 4\n"));
    assert!(!text.contains("node_modules"));
    assert!(!text.contains("debug.log"));

    let readme = text.find("FILE: README.md").unwrap();
    let logo = text.find("FILE: src/logo.bin").unwrap();
    let main = text.find("FILE: src/main.rs").unwrap();
    let zebra = text.find("FILE: zebra.txt").unwrap();
    assert!(readme < logo && logo < main && main < zebra);

    let sep = "=".repeat(48);
    assert!(text.ends_with(&format!("{sep}\nFILE: zebra.txt\n{sep}\nstripes\n\n")));
    assert!(text.contains(&format!("{sep}\nFILE: src/logo.bin\n{sep}\n[Binary File]\n\n")));
}

#[test]
fn latin1_file_passes_through_unchanged() {
    let dir = tempdir().unwrap();
    write(dir.path(), "menu.txt", b"caf\xE9\n");

    let result = digest(&DigestBuilder::new(source(dir.path())).build()).unwrap();
    assert_eq!(result.stats.total_content_bytes, 5);

    let bytes = output::render_digest_at(&result, "T");
    let expected: &[u8] = b"FILE: menu.txt\n================================================\ncaf\xE9\n\n";
    assert!(bytes.windows(expected.len()).any(|w| w == expected));
}

#[test]
fn readme_precedes_other_files() {
    let dir = tempdir().unwrap();
    write(dir.path(), "zebra.txt", "z");
    write(dir.path(), "README.md", "r");
    write(dir.path(), "docs/readme.txt", "d");

    let result = digest(&DigestBuilder::new(source(dir.path())).build()).unwrap();
    let text = String::from_utf8(output::render_digest_at(&result, "T")).unwrap();
    let order: Vec<_> = text
        .lines()
        .filter_map(|l| l.strip_prefix("FILE: "))
        .collect();
    assert_eq!(order, ["README.md", "docs/readme.txt", "zebra.txt"]);
}

#[test]
fn output_is_reproducible_apart_from_timestamp() {
    let dir = tempdir().unwrap();
    for i in 0..25 {
        write(dir.path(), &format!("pkg{}/file{i}.txt", i % 4), format!("content {i}\n"));
    }
    write(dir.path(), "README", "top");

    let options = DigestBuilder::new(source(dir.path())).concurrency(6).build();
    let first = output::render_digest_at(&digest(&options).unwrap(), "T");
    let second = output::render_digest_at(&digest(&options).unwrap(), "T");
    assert_eq!(first, second);
}

#[test]
fn oversized_files_are_placeholders() {
    let dir = tempdir().unwrap();
    write(dir.path(), "big.txt", vec![b'A'; 5000]);
    write(dir.path(), "small.txt", "ok");

    let options = DigestBuilder::new(source(dir.path()))
        .max_file_size(100)
        .build();
    let result = digest(&options).unwrap();
    assert_eq!(result.stats.skipped_files, 1);
    assert_eq!(result.stats.total_content_bytes, 2);

    let text = String::from_utf8(output::render_digest_at(&result, "T")).unwrap();
    assert!(text.contains("big.txt (Skipped - Too Large)"));
    assert!(text.contains("[File content skipped: Exceeds max size (0.0 MB > 0.0 MB)]"));
}

#[test]
fn notebooks_are_rendered_as_cells() {
    let dir = tempdir().unwrap();
    write(
        dir.path(),
        "nb.ipynb",
        r##"{"cells": [
            {"cell_type": "markdown", "source": ["# Title"]},
            {"cell_type": "raw", "source": ["raw"]},
            {"cell_type": "code", "source": ["x = 1\n"]}
        ]}"##,
    );
    let result = digest(&DigestBuilder::new(source(dir.path())).build()).unwrap();
    let record = &result.files[0];
    assert_eq!(
        record.text(),
        "# Jupyter Notebook Content\n\n\
         ## Cell 1 (markdown)\n\n# Title\n\n\
         ## Cell 2 (raw)\n\nraw\n\n\
         ## Cell 3 (code)\n\nx = 1\n\n"
    );
    assert_eq!(result.stats.total_content_bytes, record.content.len() as u64);
}

#[cfg(unix)]
#[test]
fn failed_files_are_counted_but_not_written() {
    let dir = tempdir().unwrap();
    write(dir.path(), "good.txt", "fine");
    std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("dangling.txt")).unwrap();

    let result = digest(&DigestBuilder::new(source(dir.path())).build()).unwrap();
    assert_eq!(result.stats.files_processed, 2);

    let failures: Vec<_> = result.failures().map(|(p, _)| p).collect();
    assert_eq!(failures, ["dangling.txt"]);

    let text = String::from_utf8(output::render_digest_at(&result, "T")).unwrap();
    assert!(!text.contains("FILE: dangling.txt"));
    assert!(text.contains("FILE: good.txt"));
}

#[test]
fn empty_tree_has_no_structure_section() {
    let dir = tempdir().unwrap();
    let result = digest(&DigestBuilder::new(source(dir.path())).build()).unwrap();
    let text = String::from_utf8(output::render_digest_at(&result, "T")).unwrap();
    assert!(!text.contains("## Directory Structure"));
    assert!(text.ends_with("---\n\n"));
}

#[test]
fn branch_appears_in_summary() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", "a");
    let options = DigestBuilder::new(source(dir.path())).branch("develop").build();
    let result = digest(&options).unwrap();
    let summary = output::summary(&result.stats, "T");
    assert!(summary.contains("**Branch:** develop\n"));
}

#[test]
fn json_output_lists_files_and_stats() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", "alpha");
    let result = digest(&DigestBuilder::new(source(dir.path())).build()).unwrap();

    let bytes = output::format_result(&result, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["stats"]["files_processed"], 1);
    assert_eq!(value["files"][0]["relative_path"], "a.txt");
    assert_eq!(value["files"][0]["content"], "alpha");
    assert_eq!(value["files"][0]["kind"], "text");
}

#[test]
fn write_digest_creates_file() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/a.txt", "alpha");
    let out_dir = tempdir().unwrap();
    let out = out_dir.path().join("digest.md");

    let result = digest(&DigestBuilder::new(source(dir.path())).build()).unwrap();
    output::write_digest(&result, &out).unwrap();
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("# Codebase Digest Summary\n\n"));
    assert!(text.contains("FILE: src/a.txt"));
}

#[test]
fn invalid_source_is_rejected() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nowhere");
    let err = digest(&DigestBuilder::new(source(&missing)).build()).unwrap_err();
    assert!(matches!(err, DigestError::InvalidSource(_)));
}
