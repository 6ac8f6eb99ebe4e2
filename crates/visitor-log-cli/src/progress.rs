use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::time::Duration;
use visitor_log_core::ProgressReporter;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// CLI progress reporter using indicatif spinners.
///
/// - Read phase: spinner with running row count (total unknown upfront)
/// - Insert phase: spinner until the batch commits
pub struct CliReporter {
    bar: RefCell<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: RefCell::new(None),
        }
    }

    fn spinner(&self, message: String) {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars(TICK_CHARS));
        }
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(80));
        if let Some(old) = self.bar.replace(Some(pb)) {
            old.finish_and_clear();
        }
    }

    fn finish_bar(&self) {
        if let Some(pb) = self.bar.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_import_start(&self, file_path: &str) {
        self.spinner(format!("Reading {}...", file_path));
    }

    fn on_rows_progress(&self, rows_read: usize, staged: usize) {
        if let Some(pb) = self.bar.borrow().as_ref() {
            pb.set_message(format!("Reading... {} rows, {} new", rows_read, staged));
        }
    }

    fn on_row_skipped(&self, line: u64, reason: &str) {
        if let Some(pb) = self.bar.borrow().as_ref() {
            pb.println(format!("  \x1b[33m!\x1b[0m line {}: {}", line, reason));
        }
    }

    fn on_insert_start(&self, staged: usize) {
        self.spinner(format!("Writing {} visitors to database...", staged));
    }

    fn on_import_complete(&self, inserted: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Import complete: {} new visitors in {:.2}s",
            inserted, duration_secs
        );
    }

    fn on_import_failed(&self, _error: &str) {
        self.finish_bar();
    }
}
