use std::thread;

use tracing::info;

use super::errors::HelperError;
use super::icon::AppLocator;
use super::manager::HelperManager;
use super::types::LifecycleReport;
use crate::dock::DockRegistry;
use crate::windows::WindowRecord;

/// Result of a batch operation.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Window numbers that were processed.
    pub succeeded: Vec<u32>,
    /// Window numbers left alone: already had a helper (create) or had none
    /// (remove).
    pub skipped: Vec<u32>,
    /// Per-window hard failures. The batch continues past them.
    pub failures: Vec<(u32, HelperError)>,
    pub report: LifecycleReport,
}

impl BatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.report.is_clean()
    }
}

impl<R: DockRegistry, L: AppLocator> HelperManager<R, L> {
    /// Create helpers for every window that does not already have one, then
    /// refresh the dock once if anything changed.
    pub fn create_many<'a, I>(&mut self, windows: I) -> BatchOutcome
    where
        I: IntoIterator<Item = &'a WindowRecord>,
    {
        let mut outcome = BatchOutcome::default();

        for window in windows {
            if self.has_helper(window) {
                outcome.skipped.push(window.window_number);
                continue;
            }
            match self.create(window) {
                Ok(report) => {
                    outcome.succeeded.push(window.window_number);
                    outcome.report.absorb(report);
                }
                Err(e) => outcome.failures.push((window.window_number, e)),
            }
        }

        self.finish_batch("create_many", outcome)
    }

    /// Remove the helpers of every window that has one, then refresh the
    /// dock once if anything changed.
    pub fn remove_many<'a, I>(&mut self, windows: I) -> BatchOutcome
    where
        I: IntoIterator<Item = &'a WindowRecord>,
    {
        let mut outcome = BatchOutcome::default();

        for window in windows {
            if !self.has_helper(window) {
                outcome.skipped.push(window.window_number);
                continue;
            }
            outcome.report.absorb(self.remove(window));
            outcome.succeeded.push(window.window_number);
        }

        self.finish_batch("remove_many", outcome)
    }

    /// [`HelperManager::remove_all`] followed by one dock refresh.
    pub fn clear_all(&mut self) -> LifecycleReport {
        let mut report = self.remove_all();
        report.absorb(self.refresh_registry());
        report
    }

    /// Clear every helper before the application exits, then wait for the
    /// dock to settle. Does nothing when there are no helpers.
    pub fn shutdown_cleanup(&mut self) -> Option<LifecycleReport> {
        if !self.has_any_helpers() {
            return None;
        }

        info!(event = "core.helper.shutdown_cleanup_started");
        let report = self.clear_all();
        thread::sleep(self.shutdown_settle);
        info!(
            event = "core.helper.shutdown_cleanup_completed",
            warnings = report.warnings.len()
        );
        Some(report)
    }

    fn finish_batch(&mut self, operation: &'static str, mut outcome: BatchOutcome) -> BatchOutcome {
        if outcome.report.changed {
            let refresh = self.refresh_registry();
            outcome.report.absorb(refresh);
        }

        info!(
            event = "core.helper.batch_completed",
            operation = operation,
            succeeded = outcome.succeeded.len(),
            skipped = outcome.skipped.len(),
            failed = outcome.failures.len()
        );
        outcome
    }
}
