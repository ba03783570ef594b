// src/progress.rs
/// Reporting channel for long-running operations (scrape/build).
/// Passed explicitly by the caller; nothing in the library logs to a
/// process-wide file on its own.
pub trait Progress {
    /// Called at the start with the total number of items (if known).
    fn begin(&mut self, _total: usize) {}

    /// Called when one app id has been handled (stored, filtered, or already known).
    fn item_done(&mut self, _app_id: &str) {}

    /// Called when one app id was skipped because of an error.
    fn item_failed(&mut self, _app_id: &str, _error: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// Collects failures in memory. Handy for callers (and tests) that want
/// the list instead of a log file.
#[derive(Debug, Default)]
pub struct Failures {
    pub items: Vec<(String, String)>,
}

impl Progress for Failures {
    fn item_failed(&mut self, app_id: &str, error: &str) {
        self.items.push((s!(app_id), s!(error)));
    }
}
