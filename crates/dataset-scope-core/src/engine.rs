use rayon::prelude::*;
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::Error;
use crate::progress::ProgressReporter;
use crate::scanner;
use crate::summary::{summarize_csv, CsvSummary};

pub struct ScanEngine {
    config: AppConfig,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanTotals {
    pub files: usize,
    pub files_with_function_list: usize,
    pub files_with_errors: usize,
    pub function_call_rows: usize,
    pub normal_qa_rows: usize,
}

#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub dataset_dir: PathBuf,
    pub summaries: Vec<CsvSummary>,
    pub totals: ScanTotals,
    #[serde(rename = "duration_secs", serialize_with = "serialize_secs")]
    pub duration: Duration,
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

impl ScanEngine {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn with_dataset_dir(mut self, dir: &str) -> Self {
        self.config.dataset_dir = dir.to_string();
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Summarize every CSV file in the configured dataset directory.
    ///
    /// Per-file failures are carried in the summaries; only an unreadable
    /// directory is returned as an error.
    pub fn scan(&self, reporter: &dyn ProgressReporter) -> Result<ScanReport, Error> {
        let dir = Path::new(&self.config.dataset_dir);
        let ignore_patterns = scanner::compile_ignore_patterns(&self.config.ignore_patterns);

        let start = Instant::now();
        let files = scanner::list_csv_files(dir, &ignore_patterns)?;
        info!("Summarizing {} CSV files in {}", files.len(), dir.display());
        reporter.on_scan_start(files.len());

        let summaries = if self.config.parallel {
            summarize_parallel(&files, reporter)
        } else {
            summarize_sequential(&files, reporter)
        };

        let duration = start.elapsed();
        let totals = compute_totals(&summaries);
        reporter.on_scan_complete(totals.files, duration.as_secs_f64());
        debug!(
            "Scan completed in {:.2}s: {} files, {} with function lists, {} errors",
            duration.as_secs_f64(),
            totals.files,
            totals.files_with_function_list,
            totals.files_with_errors,
        );

        Ok(ScanReport {
            dataset_dir: dir.to_path_buf(),
            summaries,
            totals,
            duration,
        })
    }
}

fn summarize_sequential(files: &[PathBuf], reporter: &dyn ProgressReporter) -> Vec<CsvSummary> {
    let total = files.len();
    files
        .iter()
        .enumerate()
        .map(|(idx, path)| {
            let summary = summarize_csv(path);
            reporter.on_file_complete(&summary.filename, idx + 1, total);
            summary
        })
        .collect()
}

/// Files are independent, so they can be summarized on the rayon pool.
/// `collect` keeps the input order.
fn summarize_parallel(files: &[PathBuf], reporter: &dyn ProgressReporter) -> Vec<CsvSummary> {
    let total = files.len();
    let done = AtomicUsize::new(0);
    files
        .par_iter()
        .map(|path| {
            let summary = summarize_csv(path);
            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            reporter.on_file_complete(&summary.filename, finished, total);
            summary
        })
        .collect()
}

fn compute_totals(summaries: &[CsvSummary]) -> ScanTotals {
    summaries
        .iter()
        .fold(ScanTotals::default(), |mut totals, summary| {
            totals.files += 1;
            if summary.is_error() {
                totals.files_with_errors += 1;
            }
            if let Some(fl) = &summary.function_list {
                totals.files_with_function_list += 1;
                totals.function_call_rows += fl.function_call_rows;
                totals.normal_qa_rows += fl.normal_qa_count;
            }
            totals
        })
}
