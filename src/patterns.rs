//! Include/exclude decisions for root-relative paths.
//!
//! Patterns are shell globs (`*`, `?`, `[...]`) where `*` never crosses a
//! `/`. Braces are literal and `**` behaves like `*`. A class negates with
//! either `[^...]` or `[!...]`. Each exclude pattern is tried against the full relative path, its
//! final segment, and the name of every ancestor directory. An exclusion can
//! be overridden by an include pattern matching the full path or the final
//! segment. When include patterns are present, a path that was not excluded
//! must still match one of them.

use crate::error::DigestError;
use globset::{GlobBuilder, GlobMatcher};

#[derive(Debug, Clone)]
struct Pattern {
    source: String,
    // `None` when the pattern failed to compile; it never matches.
    matcher: Option<GlobMatcher>,
}

impl Pattern {
    fn lenient(source: &str) -> Self {
        let matcher = match compile(source) {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::debug!(pattern = source, error = %e, "ignoring malformed glob pattern");
                None
            }
        };
        Self {
            source: source.to_string(),
            matcher,
        }
    }

    fn strict(source: &str) -> Result<Self, DigestError> {
        let matcher = compile(source).map_err(|e| DigestError::Pattern {
            pattern: source.to_string(),
            source: e,
        })?;
        Ok(Self {
            source: source.to_string(),
            matcher: Some(matcher),
        })
    }

    fn matches(&self, candidate: &str) -> bool {
        self.matcher
            .as_ref()
            .is_some_and(|m| m.is_match(candidate))
    }
}

fn compile(pattern: &str) -> Result<GlobMatcher, globset::Error> {
    GlobBuilder::new(&shell_glob(pattern))
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
}

/// Narrows globset syntax to plain shell globs: braces are literal and a run
/// of `*` is a single `*`, so `**` never crosses a `/`.
fn shell_glob(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut in_class = false;
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '[' if !in_class => {
                in_class = true;
                out.push(c);
            }
            ']' if in_class => {
                in_class = false;
                out.push(c);
            }
            '{' | '}' if !in_class => {
                out.push('[');
                out.push(c);
                out.push(']');
            }
            '*' if !in_class => {
                out.push(c);
                while chars.peek() == Some(&'*') {
                    chars.next();
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Compiled include and exclude pattern sets.
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl PatternMatcher {
    /// Compiles both sets. A malformed pattern is kept but never matches.
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S]) -> Self {
        Self {
            include: include.iter().map(|p| Pattern::lenient(p.as_ref())).collect(),
            exclude: exclude.iter().map(|p| Pattern::lenient(p.as_ref())).collect(),
        }
    }

    /// Like [`PatternMatcher::new`], but the first malformed pattern is an error.
    pub fn strict<S: AsRef<str>>(include: &[S], exclude: &[S]) -> Result<Self, DigestError> {
        let include = include
            .iter()
            .map(|p| Pattern::strict(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let exclude = exclude
            .iter()
            .map(|p| Pattern::strict(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { include, exclude })
    }

    /// Decides whether a slash-separated, root-relative path is included.
    pub fn is_included(&self, relative_path: &str) -> bool {
        let name = basename(relative_path);
        if let Some(pattern) = self.find_exclusion(relative_path, name) {
            let overridden = self.matches_include(relative_path, name);
            if !overridden {
                tracing::trace!(path = relative_path, pattern = %pattern.source, "excluded");
            }
            return overridden;
        }
        self.include.is_empty() || self.matches_include(relative_path, name)
    }

    fn find_exclusion(&self, path: &str, name: &str) -> Option<&Pattern> {
        self.exclude.iter().find(|pattern| {
            pattern.matches(path)
                || pattern.matches(name)
                || ancestor_names(path).any(|dir| pattern.matches(dir))
        })
    }

    fn matches_include(&self, path: &str, name: &str) -> bool {
        self.include
            .iter()
            .any(|pattern| pattern.matches(path) || pattern.matches(name))
    }
}

/// One-shot form of [`PatternMatcher::is_included`].
pub fn should_include<S: AsRef<str>>(relative_path: &str, include: &[S], exclude: &[S]) -> bool {
    PatternMatcher::new(include, exclude).is_included(relative_path)
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn ancestor_names(path: &str) -> impl Iterator<Item = &str> {
    path.rsplit('/').skip(1).filter(|segment| !segment.is_empty())
}
