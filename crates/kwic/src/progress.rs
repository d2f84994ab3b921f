//! Terminal progress reporting for analysis runs.

use indicatif::{ProgressBar, ProgressStyle};
use kwic_config::ConfigId;
use kwic_document::DocumentId;
use kwic_engine::AnalysisObserver;

/// A progress bar over (document, keyword) analysis units.
///
/// Draws to stderr and stays out of the way when stderr is not a
/// terminal, so piped output is unaffected.
pub struct ScanProgress {
    /// The underlying bar, sized to the number of units.
    bar: ProgressBar,
}

impl ScanProgress {
    /// Creates a bar expecting `total` units.
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} scanning [{bar:40.cyan/dim}] {pos}/{len}")
                .unwrap()
                .progress_chars("━━╸"),
        );
        Self { bar }
    }

    /// Removes the bar from the terminal.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl AnalysisObserver for ScanProgress {
    fn on_progress(&self, completed: usize, _total: usize) {
        self.bar.set_position(completed as u64);
    }

    fn on_unit_error(&self, _document: &DocumentId, _config: ConfigId, _message: &str) {
        // Unit failures surface as diagnostics in the report, printed
        // after the bar is cleared.
    }
}
