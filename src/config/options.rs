// src/config/options.rs
use std::path::PathBuf;

use super::consts::*;
use crate::errors::{Error, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct ScrapeOptions {
    pub base_url: String,
    pub storage_dir: PathBuf,
    /// Only apps in these categories are stored. `None` keeps everything.
    pub category_filter: Option<Vec<String>>,
    pub workers: usize,
    /// Pause between two requests of one worker (plus a small jitter).
    pub request_pause_ms: u64,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            base_url: s!(PLAY_STORE_BASE_URL),
            storage_dir: PathBuf::from(DEFAULT_SCRAPER_DIR),
            category_filter: None,
            workers: WORKERS,
            request_pause_ms: REQUEST_PAUSE_MS,
        }
    }
}

/// Train/validation/test weights. Renormalized by their sum before use.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitRatio {
    pub train: f64,
    pub validation: f64,
    pub test: f64,
}

impl Default for SplitRatio {
    fn default() -> Self {
        let (train, validation, test) = DEFAULT_SPLIT_RATIO;
        Self { train, validation, test }
    }
}

impl SplitRatio {
    pub fn new(train: f64, validation: f64, test: f64) -> Self {
        Self { train, validation, test }
    }

    /// Scale so the three weights sum to 1.
    pub fn normalized(self) -> Result<Self> {
        let parts = [self.train, self.validation, self.test];
        if parts.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(Error::Configuration(format!(
                "split weights must be finite and non-negative, got {parts:?}"
            )));
        }
        let sum: f64 = parts.iter().sum();
        if sum <= 0.0 {
            return Err(Error::Configuration(s!("split weights must not all be zero")));
        }
        if sum == 1.0 {
            return Ok(self);
        }
        Ok(Self {
            train: self.train / sum,
            validation: self.validation / sum,
            test: self.test / sum,
        })
    }

    /// Parse `"0.7,0.15,0.15"`.
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<f64> = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::Configuration(format!("invalid split ratio '{s}': {e}")))?;
        match parts.as_slice() {
            [t, v, x] => Ok(Self::new(*t, *v, *x)),
            _ => Err(Error::Configuration(format!(
                "split ratio needs three weights, got '{s}'"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BuildOptions {
    /// Scraper output: the `apps` store plus the icons.
    pub input_dir: PathBuf,
    pub storage_dir: PathBuf,
    pub split_ratio: SplitRatio,
    /// Allow-list of classes; anything else is filed under `others`.
    pub classes: Option<Vec<String>>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_SCRAPER_DIR),
            storage_dir: PathBuf::from(DEFAULT_BUILDER_DIR),
            split_ratio: SplitRatio::default(),
            classes: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceOptions {
    pub batch_size: usize,
    /// Side of the square the icons are fitted to.
    pub target_dim: u32,
    /// Reorder samples on every epoch end.
    pub shuffle: bool,
    /// Seed for epoch shuffles; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for SequenceOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            target_dim: DEFAULT_IMG_DIM,
            shuffle: true,
            seed: None,
        }
    }
}
