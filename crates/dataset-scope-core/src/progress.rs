/// Trait for reporting scan progress.
///
/// The CLI implements it with indicatif. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_scan_start(&self, _total_files: usize) {}
    fn on_file_complete(&self, _file_name: &str, _files_done: usize, _total_files: usize) {}
    fn on_scan_complete(&self, _total_files: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
