use crate::classify::{ClassifiedContent, ContentClassifier};
use crate::error::{DigestError, FileError};
use crate::options::{BinaryDetection, DigestOptions, default_concurrency};
use crate::remote::resolve_source;
use crate::types::{ContentKind, Digest, FileRecord, RunStats};
use crate::walker::{DirectoryWalker, DiscoveredFile};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
#[cfg(feature = "parallel")]
use std::sync::mpsc;

/// Counters shared by every ingestion task.
#[derive(Debug, Default)]
struct StatsCollector {
    files_processed: AtomicUsize,
    binary_files: AtomicUsize,
    skipped_files: AtomicUsize,
    total_content_bytes: AtomicU64,
}

impl StatsCollector {
    fn record(&self, record: &FileRecord) {
        if matches!(record.error, Some(FileError::Cancelled)) {
            return;
        }
        self.files_processed.fetch_add(1, Ordering::Relaxed);
        match record.kind {
            ContentKind::Binary => {
                self.binary_files.fetch_add(1, Ordering::Relaxed);
            }
            ContentKind::Skipped => {
                self.skipped_files.fetch_add(1, Ordering::Relaxed);
            }
            ContentKind::Text | ContentKind::Notebook => {
                self.total_content_bytes
                    .fetch_add(record.content.len() as u64, Ordering::Relaxed);
            }
            ContentKind::Failed => {}
        }
    }

    fn finish(self) -> RunStats {
        RunStats {
            files_processed: self.files_processed.into_inner(),
            binary_files: self.binary_files.into_inner(),
            skipped_files: self.skipped_files.into_inner(),
            total_content_bytes: self.total_content_bytes.into_inner(),
            ..Default::default()
        }
    }
}

/// Reads and classifies discovered files, one independent task per file.
///
/// Results come back in the order the files were given, whatever order the
/// tasks finish in. Per-file failures end up on the records; the only error
/// `ingest` itself returns is a worker pool that cannot be built.
#[derive(Debug, Clone)]
pub struct Ingestor {
    classifier: ContentClassifier,
    concurrency: usize,
    cancel: Option<Arc<AtomicBool>>,
}

impl Ingestor {
    pub fn new(classifier: ContentClassifier) -> Self {
        Self {
            classifier,
            concurrency: 1,
            cancel: None,
        }
    }

    /// Upper bound on files read at once.
    pub fn concurrency(mut self, workers: usize) -> Self {
        self.concurrency = workers.max(1);
        self
    }

    /// Tasks that start after `flag` is set produce a cancelled record
    /// instead of touching the file.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn process(&self, file: &DiscoveredFile, stats: &StatsCollector) -> FileRecord {
        let outcome = if self.is_cancelled() {
            ClassifiedContent::Failed(FileError::Cancelled)
        } else {
            self.classifier.classify(&file.absolute_path)
        };
        let record = outcome.into_record(file.relative_path.clone(), file.absolute_path.clone());
        if let Some(e) = &record.error {
            tracing::warn!(path = %record.relative_path, error = %e, "failed to process file");
        }
        stats.record(&record);
        record
    }

    #[cfg(feature = "parallel")]
    pub fn ingest(
        &self,
        files: &[DiscoveredFile],
    ) -> Result<(Vec<FileRecord>, RunStats), DigestError> {
        let collector = StatsCollector::default();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.concurrency)
            .thread_name(|i| format!("codedigest-io-{i}"))
            .build()
            .map_err(|e| DigestError::Pool(e.to_string()))?;

        let (tx, rx) = mpsc::channel::<(usize, FileRecord)>();
        pool.scope(|scope| {
            for (index, file) in files.iter().enumerate() {
                let tx = tx.clone();
                let collector = &collector;
                scope.spawn(move |_| {
                    let record = self.process(file, collector);
                    // The receiver lives until every task is done.
                    let _ = tx.send((index, record));
                });
            }
        });
        drop(tx);

        let mut slots: Vec<Option<FileRecord>> =
            std::iter::repeat_with(|| None).take(files.len()).collect();
        for (index, record) in rx {
            slots[index] = Some(record);
        }
        let records = slots.into_iter().flatten().collect();
        Ok((records, collector.finish()))
    }

    #[cfg(not(feature = "parallel"))]
    pub fn ingest(
        &self,
        files: &[DiscoveredFile],
    ) -> Result<(Vec<FileRecord>, RunStats), DigestError> {
        let collector = StatsCollector::default();
        let records = files
            .iter()
            .map(|file| self.process(file, &collector))
            .collect();
        Ok((records, collector.finish()))
    }
}

/// Ingests `files` with NUL-byte binary detection and the default worker count.
pub fn ingest(
    files: &[DiscoveredFile],
    size_limit: u64,
) -> Result<(Vec<FileRecord>, RunStats), DigestError> {
    Ingestor::new(ContentClassifier::new(size_limit, BinaryDetection::Simple))
        .concurrency(default_concurrency())
        .ingest(files)
}

/// Runs the whole pipeline: resolve the source, walk it, ingest every
/// accepted file.
pub fn digest(options: &DigestOptions) -> Result<Digest, DigestError> {
    tracing::info!(source = %options.source, "starting digest");

    // Build the walker first so strict pattern errors surface before any clone.
    let walker = DirectoryWalker::from_options(options)?;
    let branch = options.branch.as_deref().filter(|b| !b.is_empty());
    let source = resolve_source(&options.source, branch)?;

    let discovery = walker.walk(source.path())?;
    tracing::info!(
        files = discovery.files.len(),
        directories = discovery.dir_count,
        "discovered files"
    );

    let classifier = ContentClassifier::new(options.max_file_size, options.binary_detection);
    let (files, mut stats) = Ingestor::new(classifier)
        .concurrency(options.concurrency)
        .ingest(&discovery.files)?;

    stats.directories_processed = discovery.dir_count;
    stats.source = options.source.clone();
    stats.branch = branch.map(str::to_string);
    stats.all_paths = discovery.ordered_paths;

    tracing::info!(
        processed = stats.files_processed,
        binary = stats.binary_files,
        skipped = stats.skipped_files,
        bytes = stats.total_content_bytes,
        "ingestion complete"
    );
    Ok(Digest { stats, files })
}
