/// Trait for reporting import progress.
///
/// The CLI implements it with indicatif; library callers and tests use
/// `SilentReporter`. All methods have default no-op implementations.
pub trait ProgressReporter {
    fn on_import_start(&self, _file_path: &str) {}
    fn on_rows_progress(&self, _rows_read: usize, _staged: usize) {}
    fn on_row_skipped(&self, _line: u64, _reason: &str) {}
    fn on_insert_start(&self, _staged: usize) {}
    fn on_import_complete(&self, _inserted: usize, _duration_secs: f64) {}
    fn on_import_failed(&self, _error: &str) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
