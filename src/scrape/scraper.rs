// src/scrape/scraper.rs
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    thread,
    time::Duration,
    sync::{ mpsc, Arc, atomic::{ AtomicBool, AtomicUsize, Ordering }},
};

use tracing::{info, warn};

use crate::{
    config::consts::{ APP_ID, CATEGORY, JITTER_MS, SCRAPER_INFO_FILE, SCRAPER_LOG_FILE, icon_name },
    config::options::ScrapeOptions,
    core::net::Fetcher,
    errors::{ Error, Result },
    file::ensure_directory,
    progress::Progress,
    specs::app_page,
    store::RecordStore,
};

pub const WORKER_PANICKED: &str = "Scrape worker panicked.";

/// What happened to one app id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Icon downloaded and `{app_id, category}` appended.
    Stored { category: String },
    /// Category not in the filter; nothing written.
    Filtered { category: String },
    /// Already in the store; no request made.
    AlreadyPresent,
    /// Access or scraping error; reported to the progress sink.
    Failed(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub requested: usize,
    pub stored: usize,
    pub filtered: usize,
    pub already_present: usize,
    pub failed: usize,
}

impl ScrapeSummary {
    fn count(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Stored { .. } => self.stored += 1,
            Outcome::Filtered { .. } => self.filtered += 1,
            Outcome::AlreadyPresent => self.already_present += 1,
            Outcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Category decided by a worker, before the writer touches the store.
enum Scraped {
    Kept(String),
    Filtered(String),
}

/// Scrapes icons + categories from app detail pages into a storage dir:
///
/// ```text
/// <storage>/apps            record store {app_id, category}
/// <storage>/icon_<app_id>   icons
/// <storage>/logs            failure log (see `log::FileLog`)
/// ```
#[derive(Clone)]
pub struct AppPageScraper {
    base_url: String,
    storage_dir: PathBuf,
    store: RecordStore,
    category_filter: Option<Vec<String>>,
    workers: usize,
    pause: Duration,
    fetcher: Arc<dyn Fetcher>,
}

impl AppPageScraper {
    /// Creates the storage directory if needed.
    pub fn new(opts: &ScrapeOptions, fetcher: Arc<dyn Fetcher>) -> Result<Self> {
        ensure_directory(&opts.storage_dir)?;
        Ok(Self {
            base_url: opts.base_url.trim_end_matches('/').to_string(),
            store: RecordStore::at(opts.storage_dir.join(SCRAPER_INFO_FILE)),
            storage_dir: opts.storage_dir.clone(),
            category_filter: opts
                .category_filter
                .as_ref()
                .map(|cats| cats.iter().map(|c| c.trim().to_lowercase()).collect()),
            workers: opts.workers.max(1),
            pause: Duration::from_millis(opts.request_pause_ms),
            fetcher,
        })
    }

    pub fn storage_dir(&self) -> &Path { &self.storage_dir }
    pub fn store(&self) -> &RecordStore { &self.store }
    pub fn log_path(&self) -> PathBuf { self.storage_dir.join(SCRAPER_LOG_FILE) }

    pub fn app_page_url(&self, app_id: &str) -> String {
        format!("{}/details?id={}", self.base_url, app_id)
    }

    fn get_app_page(&self, app_id: &str) -> Result<String> {
        self.fetcher.get_text(&self.app_page_url(app_id))
    }

    /// Lowercased category label of the app.
    pub fn get_app_category(&self, app_id: &str) -> Result<String> {
        let page = self.get_app_page(app_id)?;
        app_page::category(&page)
    }

    /// Download the app's icon to `<storage>/<subdir>/icon_<app_id>`.
    pub fn get_app_icon(&self, app_id: &str, subdir: &Path) -> Result<PathBuf> {
        let page = self.get_app_page(app_id)?;
        self.download_icon(app_id, &page, subdir)
    }

    fn download_icon(&self, app_id: &str, page: &str, subdir: &Path) -> Result<PathBuf> {
        let src = app_page::icon_url(page)?;
        let dir = self.storage_dir.join(subdir);
        ensure_directory(&dir)?;
        let dest = dir.join(icon_name(app_id));
        self.fetcher.download(&src, &dest)?;
        Ok(dest)
    }

    fn keeps(&self, category: &str) -> bool {
        match &self.category_filter {
            Some(filter) => filter.iter().any(|c| c == category),
            None => true,
        }
    }

    /// Network half of one app: one page fetch, then the icon if kept.
    fn scrape_app(&self, app_id: &str) -> Result<Scraped> {
        let page = self.get_app_page(app_id)?;
        let category = app_page::category(&page)?;
        if !self.keeps(&category) {
            return Ok(Scraped::Filtered(category));
        }
        self.download_icon(app_id, &page, Path::new(""))?;
        Ok(Scraped::Kept(category))
    }

    fn is_stored(&self, app_id: &str) -> Result<bool> {
        self.store.contains(&record! { APP_ID => app_id })
    }

    /// Writer half: re-check, then append. Only ever called from one thread.
    fn commit(&self, app_id: &str, scraped: Scraped) -> Result<Outcome> {
        match scraped {
            Scraped::Filtered(category) => Ok(Outcome::Filtered { category }),
            Scraped::Kept(category) => {
                if self.is_stored(app_id)? {
                    return Ok(Outcome::AlreadyPresent);
                }
                self.store.append(&record! { APP_ID => app_id, CATEGORY => category.as_str() })?;
                Ok(Outcome::Stored { category })
            }
        }
    }

    /// Add one app to the data set, unless it is already there.
    /// Access/scraping failures are reported and yield `Outcome::Failed`;
    /// store and filesystem errors propagate.
    pub fn store_app_info(
        &self,
        app_id: &str,
        mut progress: Option<&mut dyn Progress>,
    ) -> Result<Outcome> {
        if self.is_stored(app_id)? {
            return Ok(Outcome::AlreadyPresent);
        }
        let outcome = match self.scrape_app(app_id) {
            Ok(scraped) => self.commit(app_id, scraped)?,
            Err(e) if e.is_recoverable() => {
                warn!(app_id, "skipped: {e}");
                Outcome::Failed(e.to_string())
            }
            Err(e) => return Err(e),
        };
        report(&mut progress, app_id, &outcome);
        Ok(outcome)
    }

    /// Add many apps. Ids are deduplicated; known ids are skipped without a
    /// request. Pages are fetched by a worker pool; this thread is the only
    /// writer of the store, so each id is appended at most once.
    pub fn store_apps_info(
        &self,
        app_ids: &[String],
        mut progress: Option<&mut dyn Progress>,
    ) -> Result<ScrapeSummary> {
        let mut summary = ScrapeSummary::default();

        let mut seen = HashSet::new();
        let mut pending = Vec::new();
        for id in app_ids {
            let id = id.trim();
            if id.is_empty() || !seen.insert(id) { continue; }
            summary.requested += 1;
            if self.is_stored(id)? {
                summary.already_present += 1;
                continue;
            }
            pending.push(s!(id));
        }

        if let Some(p) = progress.as_deref_mut() {
            p.begin(pending.len());
        }
        info!(pending = pending.len(), known = summary.already_present, "scraping apps");

        if pending.is_empty() {
            if let Some(p) = progress.as_deref_mut() { p.finish(); }
            return Ok(summary);
        }

        // Concurrency
        type Message = (String, Result<Scraped>);

        let ids_arc = Arc::new(pending);
        let counter = Arc::new(AtomicUsize::new(0));
        let abort = Arc::new(AtomicBool::new(false));
        let (res_tx, res_rx) = mpsc::channel::<Message>();

        let workers = self.workers.min(ids_arc.len()).max(1);

        // Spawn workers

        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            let scraper = self.clone();
            let ids = Arc::clone(&ids_arc);
            let idx = Arc::clone(&counter);
            let stop = Arc::clone(&abort);
            let tx = res_tx.clone();

            handles.push(thread::spawn(
                move || {
                    loop {
                        if stop.load(Ordering::Relaxed) {
                            break;
                        }
                        let i = idx.fetch_add(1, Ordering::Relaxed);
                        if i >= ids.len() {
                            break;
                        }
                        let app_id = ids[i].clone();
                        let result = scraper.scrape_app(&app_id);
                        if tx.send((app_id, result)).is_err() {
                            break;
                        }
                        if !scraper.pause.is_zero() {
                            let jitter = (i as u64) % JITTER_MS;
                            thread::sleep(scraper.pause + Duration::from_millis(jitter)); // be polite
                        }
                    }
                }
            ));
        }
        drop(res_tx); // this thread is sole receiver (and sole writer) now

        // Aggregate results
        let mut fatal: Option<Error> = None;
        let mut handled = HashSet::with_capacity(ids_arc.len());

        for (app_id, result) in res_rx {
            if fatal.is_some() {
                continue; // drain
            }
            handled.insert(app_id.clone());
            let outcome = match result {
                Ok(scraped) => match self.commit(&app_id, scraped) {
                    Ok(o) => o,
                    Err(e) => {
                        abort.store(true, Ordering::Relaxed);
                        fatal = Some(e);
                        continue;
                    }
                },
                Err(e) if e.is_recoverable() => {
                    warn!(app_id, "skipped: {e}");
                    Outcome::Failed(e.to_string())
                }
                Err(e) => {
                    abort.store(true, Ordering::Relaxed);
                    fatal = Some(e);
                    continue;
                }
            };
            summary.count(&outcome);
            report(&mut progress, &app_id, &outcome);
        }

        let mut panicked = 0;
        for h in handles {
            if h.join().is_err() {
                panicked += 1;
            }
        }
        if panicked > 0 && fatal.is_none() {
            // A panicking worker takes its in-flight id with it
            warn!(panicked, "scrape worker(s) panicked");
            for app_id in ids_arc.iter().filter(|id| !handled.contains(id.as_str())) {
                let outcome = Outcome::Failed(s!(WORKER_PANICKED));
                summary.count(&outcome);
                report(&mut progress, app_id, &outcome);
            }
        }
        if let Some(p) = progress.as_deref_mut() {
            p.finish();
        }

        match fatal {
            Some(e) => Err(e),
            None => {
                info!(?summary, "scrape finished");
                Ok(summary)
            }
        }
    }
}

fn report(progress: &mut Option<&mut dyn Progress>, app_id: &str, outcome: &Outcome) {
    if let Some(p) = progress.as_deref_mut() {
        match outcome {
            Outcome::Failed(msg) => p.item_failed(app_id, msg),
            _ => p.item_done(app_id),
        }
    }
}

/// App ids from a CSV input file: every value of every row (header excluded).
pub fn read_app_ids(input: &Path) -> Result<Vec<String>> {
    let rows = RecordStore::at(input).read_all()?;
    Ok(rows
        .iter()
        .flat_map(|r| r.values().map(str::trim).filter(|v| !v.is_empty()).map(String::from))
        .collect())
}
