// src/specs/mod.rs
//! # Page "specs"
//!
//! Pure HTML readers for storefront pages. A spec knows *where the data lives
//! in the markup* and nothing else.
//!
//! ## What lives here
//! - Selector choice for each page (class lists, `itemprop`s).
//! - Tolerant extraction on top of `core::html` (case-insensitive tags,
//!   entity decoding, whitespace normalization).
//!
//! ## What does **not** live here
//! - Networking, retries, politeness pauses: `scrape`.
//! - Persistence and duplicate checks: `store` / `scrape`.
//!
//! ## Typical call chain
//! ```text
//! runner → scrape::AppPageScraper → Fetcher::get_text(url)
//!                                 ↘ specs::app_page::{icon_url, category}
//!          store::RecordStore::append (scraper's writer thread)
//! ```
//!
//! Specs are testable offline against captured markup.
pub mod app_page;
