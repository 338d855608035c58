//! ASCII directory tree for the accepted paths of a run.

use crate::types::FileRecord;
use std::collections::{HashMap, HashSet};
use std::path::Path;

const BRANCH: &str = "├── ";
const CORNER: &str = "└── ";
const PIPE: &str = "│   ";

/// Label for the tree's first line: the last segment of `source`, or
/// `project` when there is none.
pub fn root_label(source: &str) -> String {
    Path::new(source.trim_end_matches(['/', '\\']))
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty() && name != ".")
        .unwrap_or_else(|| "project".to_string())
}

/// Renders `paths` as a tree under `root_label/`.
///
/// Paths are sorted bytewise on their full string first, so the output does
/// not depend on discovery order. Directories are printed once, just before
/// their first descendant. File lines get ` (Binary)` or
/// ` (Skipped - Too Large)` from the matching record. Every line, the last
/// included, ends with `\n`; an empty path list renders as an empty string.
pub fn render_tree(paths: &[String], root_label: &str, records: &[FileRecord]) -> String {
    if paths.is_empty() {
        return String::new();
    }

    let mut sorted: Vec<&str> = paths.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.dedup();

    let suffixes: HashMap<&str, &str> = records
        .iter()
        .filter_map(|r| suffix_for(r).map(|s| (r.relative_path.as_str(), s)))
        .collect();

    let mut out = format!("{root_label}/\n");
    let mut emitted: HashSet<&str> = HashSet::new();

    for (i, path) in sorted.iter().copied().enumerate() {
        let later = &sorted[i + 1..];
        let ends = segment_ends(path);
        let depth = ends.len() - 1;

        for level in 0..depth {
            let dir = &path[..ends[level]];
            if !emitted.insert(dir) {
                continue;
            }
            let last = !has_later_sibling(later, parent_prefix(path, &ends, level), dir);
            push_line(&mut out, level, last, &format!("{}/", segment(path, &ends, level)));
        }

        let last = !has_later_sibling(later, parent_prefix(path, &ends, depth), path);
        let name = segment(path, &ends, depth);
        let suffix = suffixes.get(path).copied().unwrap_or("");
        push_line(&mut out, depth, last, &format!("{name}{suffix}"));
    }
    out
}

fn suffix_for(record: &FileRecord) -> Option<&'static str> {
    if record.is_binary {
        Some(" (Binary)")
    } else if record.is_skipped() {
        Some(" (Skipped - Too Large)")
    } else {
        None
    }
}

/// Every ancestor level is drawn with a pipe, including levels whose
/// directory was the last entry.
fn push_line(out: &mut String, depth: usize, last: bool, label: &str) {
    for _ in 0..depth {
        out.push_str(PIPE);
    }
    out.push_str(if last { CORNER } else { BRANCH });
    out.push_str(label);
    out.push('\n');
}

/// Byte offset where each `/`-separated segment of `path` ends.
fn segment_ends(path: &str) -> Vec<usize> {
    let mut ends: Vec<usize> = path.match_indices('/').map(|(i, _)| i).collect();
    ends.push(path.len());
    ends
}

fn segment<'a>(path: &'a str, ends: &[usize], level: usize) -> &'a str {
    let start = if level == 0 { 0 } else { ends[level - 1] + 1 };
    &path[start..ends[level]]
}

/// Everything up to and including the `/` before segment `level`.
fn parent_prefix<'a>(path: &'a str, ends: &[usize], level: usize) -> &'a str {
    if level == 0 { "" } else { &path[..ends[level - 1] + 1] }
}

/// Paths sharing `parent` are contiguous in sorted order, so only the run
/// right after the current path needs checking.
fn has_later_sibling(later: &[&str], parent: &str, own: &str) -> bool {
    later
        .iter()
        .take_while(|p| p.starts_with(parent))
        .any(|p| !is_within(p, own))
}

fn is_within(path: &str, dir: &str) -> bool {
    path.len() > dir.len() && path.starts_with(dir) && path.as_bytes()[dir.len()] == b'/'
}
