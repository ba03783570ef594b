// src/config/consts.rs

// Net config
pub const PLAY_STORE_BASE_URL: &str = "https://play.google.com/store/apps";
pub const USER_AGENT: &str = concat!("play_icons/", env!("CARGO_PKG_VERSION"));
pub const REQUEST_TIMEOUT_SECS: u64 = 15;

// Page selectors
pub const ICON_CLASS: &str = "T75of sHb2Xb";
pub const CATEGORY_ITEMPROP: &str = "genre";

// Scraper storage
pub const DEFAULT_SCRAPER_DIR: &str = "./app_details";
pub const SCRAPER_INFO_FILE: &str = "apps";
pub const SCRAPER_LOG_FILE: &str = "logs";
pub const ICON_PREFIX: &str = "icon_";

// Record fields
pub const APP_ID: &str = "app_id";
pub const CATEGORY: &str = "category";
pub const DATA_SET: &str = "data_set";

// Data set builder
pub const DEFAULT_BUILDER_DIR: &str = "./data_set";
pub const BUILDER_INFO_DIR: &str = "info";
pub const OTHERS_CATEGORY: &str = "others";
pub const SPLIT_SEED: u64 = 2579;
pub const DEFAULT_SPLIT_RATIO: (f64, f64, f64) = (0.7, 0.15, 0.15);

// Sequencer
pub const DEFAULT_BATCH_SIZE: usize = 32;
pub const DEFAULT_IMG_DIM: u32 = 192;

// Concurrency
pub const WORKERS: usize = 4;
pub const REQUEST_PAUSE_MS: u64 = 75; // be polite
pub const JITTER_MS: u64 = 50; // extra 0..50 ms

/// File name of an app's icon, e.g. `icon_com.example`.
pub fn icon_name(app_id: &str) -> String {
    format!("{ICON_PREFIX}{app_id}")
}
