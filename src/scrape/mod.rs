// src/scrape/mod.rs
mod scraper;

pub use scraper::{read_app_ids, AppPageScraper, Outcome, ScrapeSummary, WORKER_PANICKED};
