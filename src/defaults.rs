//! Built-in exclusion patterns.
//!
//! These are plain constant tables. Callers that want a different set build
//! their own list and hand it to [`DigestBuilder::exclude_patterns`](crate::DigestBuilder::exclude_patterns)
//! or extend it with [`DigestBuilder::add_exclude_pattern`](crate::DigestBuilder::add_exclude_pattern).

/// Directory names (and directory-like globs) excluded by default.
pub const DEFAULT_EXCLUDE_DIRECTORIES: &[&str] = &[
    // version control
    ".git",
    ".svn",
    ".hg",
    ".bzr",
    // javascript
    "node_modules",
    ".npm",
    ".yarn",
    "bower_components",
    // python
    ".venv",
    "venv",
    "env",
    ".env",
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    ".tox",
    "site-packages",
    "dist",
    "build",
    "*.egg-info",
    ".coverage",
    // go / php
    "vendor",
    // jvm / rust
    "target",
    ".gradle",
    ".m2",
    "out",
    // .net
    "bin",
    "obj",
    "packages",
    ".nuget",
    // ruby
    ".bundle",
    "vendor/bundle",
    ".gem",
    "composer.phar",
    // c / c++
    "cmake-build-*",
    ".cmake",
    // editors
    ".vscode",
    ".idea",
    ".vs",
    ".atom",
    ".sublime-*",
    // os
    ".DS_Store",
    "Thumbs.db",
    "Desktop.ini",
    // temp and cache
    "tmp",
    "temp",
    ".tmp",
    ".temp",
    "cache",
    ".cache",
    "logs",
    "log",
    // doc build outputs
    "_site",
    "docs/_build",
    ".docusaurus",
    ".next",
    ".nuxt",
    "public",
    // testing
    "coverage",
    ".nyc_output",
    "test-results",
    "test-reports",
    // infra
    ".docker",
    ".terraform",
    "*.tfstate*",
    ".kube",
];

/// File globs excluded by default.
pub const DEFAULT_EXCLUDE_FILE_PATTERNS: &[&str] = &[
    // logs and temp files
    "*.log",
    "*.log.*",
    "*.tmp",
    "*.temp",
    "*~",
    "*.swp",
    "*.swo",
    ".#*",
    "#*#",
    // os
    ".DS_Store",
    "Thumbs.db",
    "Desktop.ini",
    "*.lnk",
    // compiled
    "*.o",
    "*.obj",
    "*.exe",
    "*.dll",
    "*.so",
    "*.dylib",
    "*.class",
    "*.pyc",
    "*.pyo",
    "*.pyd",
    // archives
    "*.zip",
    "*.tar",
    "*.tar.gz",
    "*.tgz",
    "*.rar",
    "*.7z",
    // images
    "*.jpg",
    "*.jpeg",
    "*.png",
    "*.gif",
    "*.bmp",
    "*.ico",
    "*.svg",
    "*.webp",
    // video
    "*.mp4",
    "*.avi",
    "*.mov",
    "*.wmv",
    "*.flv",
    "*.webm",
    // audio
    "*.mp3",
    "*.wav",
    "*.flac",
    "*.aac",
    "*.ogg",
    // documents
    "*.pdf",
    "*.doc",
    "*.docx",
    "*.xls",
    "*.xlsx",
    "*.ppt",
    "*.pptx",
    // lock files
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "bun.lockb",
    "Pipfile.lock",
    "poetry.lock",
    "pdm.lock",
    "Gemfile.lock",
    "composer.lock",
    "go.sum",
    "Cargo.lock",
    "mix.lock",
    "packages.lock.json",
    "project.assets.json",
    "*.lock",
    "flake.lock",
    "deno.lock",
    "shrinkwrap.yaml",
    "npm-shrinkwrap.json",
    "uv.lock",
    // environment files
    ".env",
    ".env.*",
    "*.env",
    // ide project files
    "*.iml",
    "*.ipr",
    "*.iws",
    ".project",
    ".classpath",
    ".settings",
    // coverage reports
    "coverage.xml",
    "coverage.json",
    "lcov.info",
    ".coverage",
    // minified and source maps
    "*.min.js",
    "*.min.css",
    "*.map",
    "*.js.map",
    "*.css.map",
];

/// Directory exclusions as owned strings.
pub fn default_directory_exclusions() -> Vec<String> {
    DEFAULT_EXCLUDE_DIRECTORIES
        .iter()
        .map(|p| p.to_string())
        .collect()
}

/// File-pattern exclusions as owned strings.
pub fn default_file_exclusions() -> Vec<String> {
    DEFAULT_EXCLUDE_FILE_PATTERNS
        .iter()
        .map(|p| p.to_string())
        .collect()
}

/// Every default exclusion: directories first, then file patterns.
pub fn default_exclude_patterns() -> Vec<String> {
    let mut all = Vec::with_capacity(
        DEFAULT_EXCLUDE_DIRECTORIES.len() + DEFAULT_EXCLUDE_FILE_PATTERNS.len(),
    );
    all.extend(default_directory_exclusions());
    all.extend(default_file_exclusions());
    all
}
