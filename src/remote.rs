//! Resolving a source string to a local directory, cloning Git URLs into a
//! temporary directory when needed.

use crate::error::DigestError;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A directory ready to walk. A cloned repository is deleted when this is
/// dropped.
#[derive(Debug)]
pub enum SourceRoot {
    Local(PathBuf),
    Cloned(TempDir),
}

impl SourceRoot {
    pub fn path(&self) -> &Path {
        match self {
            SourceRoot::Local(path) => path,
            SourceRoot::Cloned(dir) => dir.path(),
        }
    }
}

/// Heuristic check for a Git remote: SSH form, `.git` suffix, or a well-known
/// hosting domain.
pub fn is_git_url(source: &str) -> bool {
    source.starts_with("git@")
        || source.ends_with(".git")
        || ["github.com", "gitlab.com", "bitbucket.org"]
            .iter()
            .any(|host| source.contains(host))
}

pub fn is_git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|out| out.status.success())
}

/// Shallow-clones `url` into a fresh temporary directory.
pub fn clone_repository(url: &str, branch: Option<&str>) -> Result<TempDir, DigestError> {
    let dir = tempfile::Builder::new()
        .prefix("codedigest-clone-")
        .tempdir()
        .map_err(|e| DigestError::io(std::env::temp_dir(), e))?;

    let mut cmd = Command::new("git");
    cmd.args(["clone", "--depth", "1"]);
    if let Some(branch) = branch {
        cmd.args(["-b", branch, "--single-branch"]);
    }
    cmd.arg(url).arg(dir.path());

    tracing::info!(url, branch = branch.unwrap_or("(default)"), "cloning repository");
    let output = cmd.output().map_err(|e| DigestError::Clone {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    if !output.status.success() {
        let mut message = String::from_utf8_lossy(&output.stdout).into_owned();
        message.push_str(&String::from_utf8_lossy(&output.stderr));
        return Err(DigestError::Clone {
            url: url.to_string(),
            message: message.trim().to_string(),
        });
    }
    Ok(dir)
}

/// Existing directories win over the URL heuristic, so a local `repo.git`
/// directory is walked in place.
pub fn resolve_source(source: &str, branch: Option<&str>) -> Result<SourceRoot, DigestError> {
    let path = PathBuf::from(source);
    if path.is_dir() {
        return Ok(SourceRoot::Local(path));
    }
    if is_git_url(source) {
        if !is_git_available() {
            return Err(DigestError::GitUnavailable);
        }
        return clone_repository(source, branch).map(SourceRoot::Cloned);
    }
    Err(DigestError::InvalidSource(source.to_string()))
}
