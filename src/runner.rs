// src/runner.rs
//! Pipeline steps as the CLI runs them. Each step is usable on its own.

use std::path::Path;
use std::sync::Arc;

use tracing::warn;

use crate::{
    categories,
    config::options::{BuildOptions, ScrapeOptions, SequenceOptions},
    core::net::{Fetcher, WebFetcher},
    dataset::{BuildSummary, DataSetBuilder},
    errors::Result,
    log::FileLog,
    progress::Progress,
    scrape::{read_app_ids, AppPageScraper, ScrapeSummary},
    sequence::{BatchSource, ClassifierSequence},
};

/// Scrape every app id listed in `input` into `opts.storage_dir`.
/// Failures go to `<storage>/logs` (and to `progress`, if given).
pub fn scrape(
    input: &Path,
    opts: &ScrapeOptions,
    progress: Option<&mut dyn Progress>,
) -> Result<ScrapeSummary> {
    let fetcher: Arc<dyn Fetcher> = Arc::new(WebFetcher::new()?);
    scrape_with(input, opts, fetcher, progress)
}

pub fn scrape_with(
    input: &Path,
    opts: &ScrapeOptions,
    fetcher: Arc<dyn Fetcher>,
    progress: Option<&mut dyn Progress>,
) -> Result<ScrapeSummary> {
    warn_unknown("category filter", opts.category_filter.as_deref());

    let app_ids = read_app_ids(input)?;
    let scraper = AppPageScraper::new(opts, fetcher)?;
    let mut log = FileLog::open(scraper.log_path())?;

    let mut tee = Tee { first: &mut log, second: progress };
    scraper.store_apps_info(&app_ids, Some(&mut tee))
}

/// Split the scraper output and lay out the train/validation/test trees.
pub fn build(opts: &BuildOptions) -> Result<BuildSummary> {
    warn_unknown("classes", opts.classes.as_deref());
    DataSetBuilder::new(opts.clone())?.split_and_build()
}

/// Sequencer summary for a quick sanity check of a built partition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InspectReport {
    pub samples: usize,
    pub batches: usize,
    pub categories: Vec<String>,
    /// Shape of the first batch, if there is one.
    pub first_batch_shape: Option<Vec<usize>>,
}

pub fn inspect(data_dir: &Path, opts: &SequenceOptions) -> Result<InspectReport> {
    let seq = ClassifierSequence::new(data_dir, opts.clone())?;
    let first_batch_shape = if seq.is_empty() {
        None
    } else {
        Some(seq.batch(0)?.inputs.shape().to_vec())
    };
    Ok(InspectReport {
        samples: seq.sample_count(),
        batches: seq.len(),
        categories: seq.categories().to_vec(),
        first_batch_shape,
    })
}

fn warn_unknown(what: &str, list: Option<&[String]>) {
    if let Some(list) = list {
        let unknown = categories::unknown(list);
        if !unknown.is_empty() {
            warn!("{what}: not storefront categories: {}", unknown.join(", "));
        }
    }
}

/// Forward every event to the log file and to the caller's sink.
struct Tee<'a, 'b> {
    first: &'a mut dyn Progress,
    second: Option<&'b mut dyn Progress>,
}

impl Progress for Tee<'_, '_> {
    fn begin(&mut self, total: usize) {
        self.first.begin(total);
        if let Some(p) = self.second.as_deref_mut() { p.begin(total); }
    }
    fn item_done(&mut self, app_id: &str) {
        self.first.item_done(app_id);
        if let Some(p) = self.second.as_deref_mut() { p.item_done(app_id); }
    }
    fn item_failed(&mut self, app_id: &str, error: &str) {
        self.first.item_failed(app_id, error);
        if let Some(p) = self.second.as_deref_mut() { p.item_failed(app_id, error); }
    }
    fn finish(&mut self) {
        self.first.finish();
        if let Some(p) = self.second.as_deref_mut() { p.finish(); }
    }
}
