//! Sequential, top-down discovery of the files that make it into a digest.

use crate::error::DigestError;
use crate::options::DigestOptions;
use crate::patterns::PatternMatcher;
use ignore::WalkBuilder;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A file accepted during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub relative_path: String,
    pub absolute_path: PathBuf,
}

/// Everything one traversal produced.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Accepted paths in traversal order.
    pub ordered_paths: Vec<String>,
    /// Accepted files in the same order, ready for ingestion.
    pub files: Vec<DiscoveredFile>,
    /// Directories visited below the root, pruned ones included.
    pub dir_count: usize,
}

pub struct DirectoryWalker {
    matcher: Arc<PatternMatcher>,
    respect_gitignore: bool,
    follow_links: bool,
    max_depth: Option<usize>,
}

impl DirectoryWalker {
    pub fn new(matcher: PatternMatcher) -> Self {
        Self {
            matcher: Arc::new(matcher),
            respect_gitignore: false,
            follow_links: false,
            max_depth: None,
        }
    }

    /// Compiles the option's patterns, failing on malformed ones only in
    /// strict mode.
    pub fn from_options(options: &DigestOptions) -> Result<Self, DigestError> {
        let matcher = if options.strict_patterns {
            PatternMatcher::strict(&options.include_patterns, &options.exclude_patterns)?
        } else {
            PatternMatcher::new(&options.include_patterns, &options.exclude_patterns)
        };
        Ok(Self {
            matcher: Arc::new(matcher),
            respect_gitignore: options.respect_gitignore,
            follow_links: options.follow_links,
            max_depth: options.max_depth,
        })
    }

    /// Walks `root` in file-name order. A directory rejected by the matcher is
    /// pruned: nothing beneath it is visited, even paths an include pattern
    /// would accept. Only an unreadable root is fatal; other traversal errors
    /// are logged and skipped.
    pub fn walk(&self, root: &Path) -> Result<Discovery, DigestError> {
        let root = std::path::absolute(root).map_err(|e| DigestError::io(root, e))?;
        fs::read_dir(&root).map_err(|e| DigestError::io(&root, e))?;

        let dir_count = Arc::new(AtomicUsize::new(0));

        let mut builder = WalkBuilder::new(&root);
        builder
            .standard_filters(false)
            .git_ignore(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .require_git(false)
            .follow_links(self.follow_links)
            .max_depth(self.max_depth)
            .sort_by_file_name(|a, b| a.cmp(b));

        let matcher = Arc::clone(&self.matcher);
        let filter_root = root.clone();
        let dirs = Arc::clone(&dir_count);
        builder.filter_entry(move |entry| {
            let Some(relative) = relative_slash_path(&filter_root, entry.path()) else {
                return true;
            };
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            if is_dir {
                dirs.fetch_add(1, Ordering::Relaxed);
            }
            let keep = matcher.is_included(&relative);
            if !keep && is_dir {
                tracing::debug!(path = %relative, "pruning directory");
            }
            keep
        });

        let mut discovery = Discovery::default();
        for result in builder.build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if entry.depth() == 0 || entry.file_type().is_some_and(|t| t.is_dir()) {
                continue;
            }
            let Some(relative) = relative_slash_path(&root, entry.path()) else {
                continue;
            };
            discovery.ordered_paths.push(relative.clone());
            discovery.files.push(DiscoveredFile {
                relative_path: relative,
                absolute_path: entry.path().to_path_buf(),
            });
        }
        discovery.dir_count = dir_count.load(Ordering::Relaxed);

        tracing::debug!(
            root = %root.display(),
            files = discovery.files.len(),
            directories = discovery.dir_count,
            "traversal complete"
        );
        Ok(discovery)
    }
}

/// Lenient walk over `root` with the given pattern sets.
pub fn walk<S: AsRef<str>>(
    root: &Path,
    include: &[S],
    exclude: &[S],
) -> Result<Discovery, DigestError> {
    DirectoryWalker::new(PatternMatcher::new(include, exclude)).walk(root)
}

/// `path` relative to `root`, joined with `/` whatever the host separator.
/// `None` for the root itself or paths outside it.
pub(crate) fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_use_forward_slashes() {
        let root = Path::new("/repo");
        let path = root.join("src").join("nested").join("lib.rs");
        assert_eq!(
            relative_slash_path(root, &path).as_deref(),
            Some("src/nested/lib.rs")
        );
    }

    #[test]
    fn root_has_no_relative_path() {
        assert_eq!(relative_slash_path(Path::new("/repo"), Path::new("/repo")), None);
        assert_eq!(relative_slash_path(Path::new("/repo"), Path::new("/elsewhere")), None);
    }
}
