//! Command-line interface for codedigest.
//!
//! Walks a local directory or clones a Git repository and writes an
//! LLM-friendly digest of its files.

use clap::{Parser, ValueEnum};
use codedigest::output::{self, OutputFormat};
use codedigest::{BinaryDetection, DEFAULT_MAX_FILE_SIZE, Digest, DigestBuilder, DigestOptions, digest};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::exit;
use tracing_subscriber::EnvFilter;

/// codedigest: convert codebases into LLM-friendly text digests
#[derive(Parser)]
#[command(name = "codedigest", version, about, long_about = None)]
struct Cli {
    /// Source path (local directory or Git URL)
    #[arg(short, long)]
    source: String,

    /// Output file path, or `-` for stdout
    #[arg(short, long, default_value = "digest.md")]
    output: PathBuf,

    /// Target branch for Git repositories
    #[arg(short, long)]
    branch: Option<String>,

    /// Maximum file size in bytes (0 = no limit)
    #[arg(long, alias = "maxsize", default_value_t = DEFAULT_MAX_FILE_SIZE)]
    max_size: u64,

    /// Comma-separated exclude patterns; replaces the defaults (`--exclude=""` disables them)
    #[arg(long)]
    exclude: Option<String>,

    /// Comma-separated include patterns (override excludes)
    #[arg(long, default_value = "")]
    include: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Digest)]
    format: Format,

    /// Binary detection strategy
    #[arg(long, default_value = "simple", value_parser = parse_binary_detection)]
    binary_detection: BinaryDetection,

    /// Number of files read concurrently
    #[arg(long)]
    concurrency: Option<usize>,

    /// Honour .gitignore files
    #[arg(long)]
    gitignore: bool,

    /// Follow symlinks
    #[arg(long)]
    follow_links: bool,

    /// Max depth (unlimited if not set)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Fail on malformed glob patterns instead of ignoring them
    #[arg(long)]
    strict_patterns: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    Digest,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Digest => OutputFormat::Digest,
            Format::Json => OutputFormat::Json,
        }
    }
}

/// Parse string into BinaryDetection enum.
fn parse_binary_detection(s: &str) -> Result<BinaryDetection, String> {
    match s {
        "simple" => Ok(BinaryDetection::Simple),
        "accurate" => Ok(BinaryDetection::Accurate),
        "none" => Ok(BinaryDetection::None),
        _ => Err(format!("invalid binary detection method: {}", s)),
    }
}

/// Splits a comma-separated list, trimming entries and dropping empty ones.
fn parse_patterns(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

impl Cli {
    fn to_options(&self) -> DigestOptions {
        let mut builder = DigestBuilder::new(self.source.clone())
            .max_file_size(self.max_size)
            .include_patterns(parse_patterns(&self.include))
            .binary_detection(self.binary_detection)
            .respect_gitignore(self.gitignore)
            .follow_links(self.follow_links)
            .strict_patterns(self.strict_patterns);

        if let Some(exclude) = &self.exclude {
            builder = builder.exclude_patterns(parse_patterns(exclude));
        }
        if let Some(branch) = &self.branch {
            builder = builder.branch(branch.clone());
        }
        if let Some(workers) = self.concurrency {
            builder = builder.concurrency(workers);
        }
        if let Some(depth) = self.max_depth {
            builder = builder.max_depth(depth);
        }
        builder.build()
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = cli.to_options();
    tracing::info!(
        source = %options.source,
        output = %cli.output.display(),
        max_size = options.max_file_size,
        "configuration"
    );

    let result = match digest(&options) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    };

    report_failures(&result);
    write_output(&result, cli.format.into(), &cli.output);
}

fn report_failures(result: &Digest) {
    for (path, error) in result.failures() {
        eprintln!("  {} (ERROR: {})", path, error);
    }
}

fn write_output(result: &Digest, format: OutputFormat, path: &Path) {
    let generated = output::timestamp_now();
    let bytes = output::format_result_at(result, format, &generated).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        exit(1);
    });

    if path.as_os_str() == "-" {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        if handle.write_all(&bytes).and_then(|_| handle.flush()).is_err() {
            eprintln!("Failed to write to stdout");
            exit(1);
        }
        return;
    }

    if let Err(e) = fs::write(path, &bytes) {
        eprintln!("Error: failed to write {}: {}", path.display(), e);
        exit(1);
    }
    println!("Digest created: {}", path.display());
    println!();
    print!("{}", output::summary(&result.stats, &generated));
}
