// src/cli.rs
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    categories,
    config::consts::*,
    config::options::{BuildOptions, ScrapeOptions, SequenceOptions, SplitRatio},
    errors::Result,
    progress::Progress,
    runner,
};

#[derive(Debug, Parser)]
#[command(name = "play_icons", version, about = "Scrape app icons, split them into data sets, check the batches")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scrape icons + categories for the app ids listed in a CSV file
    Scrape(ScrapeArgs),
    /// Split scraped apps into train/validation/test directory trees
    Build(BuildArgs),
    /// Build the batch sequencer over one partition and decode its first batch
    Inspect(InspectArgs),
    /// List the known storefront categories
    Categories,
}

#[derive(Debug, Args)]
pub struct ScrapeArgs {
    /// CSV file with app ids (every value is taken as an id)
    #[arg(long, short, env = "PLAY_ICONS_INPUT")]
    pub input: PathBuf,
    #[arg(long, env = "PLAY_ICONS_SCRAPER_DIR", default_value = DEFAULT_SCRAPER_DIR)]
    pub storage_dir: PathBuf,
    /// Only keep apps in these categories
    #[arg(long, value_delimiter = ',')]
    pub category_filter: Option<Vec<String>>,
    #[arg(long, env = "PLAY_ICONS_BASE_URL", default_value = PLAY_STORE_BASE_URL)]
    pub base_url: String,
    #[arg(long, default_value_t = WORKERS)]
    pub workers: usize,
    /// Pause between requests of one worker, in milliseconds
    #[arg(long, default_value_t = REQUEST_PAUSE_MS)]
    pub pause_ms: u64,
}

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Scraper storage directory
    #[arg(long, env = "PLAY_ICONS_SCRAPER_DIR", default_value = DEFAULT_SCRAPER_DIR)]
    pub input_dir: PathBuf,
    #[arg(long, env = "PLAY_ICONS_BUILDER_DIR", default_value = DEFAULT_BUILDER_DIR)]
    pub storage_dir: PathBuf,
    /// Classifier classes; other categories go to "others"
    #[arg(long, value_delimiter = ',')]
    pub classes: Option<Vec<String>>,
    /// Train,validation,test weights
    #[arg(long, default_value = "0.7,0.15,0.15")]
    pub ratio: String,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// One built partition, e.g. ./data_set/train
    #[arg(long, default_value = "./data_set/train")]
    pub data_dir: PathBuf,
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,
    #[arg(long, default_value_t = DEFAULT_IMG_DIM)]
    pub img_dim: u32,
    #[arg(long)]
    pub no_shuffle: bool,
    #[arg(long)]
    pub seed: Option<u64>,
}

impl ScrapeArgs {
    pub fn options(&self) -> ScrapeOptions {
        ScrapeOptions {
            base_url: self.base_url.clone(),
            storage_dir: self.storage_dir.clone(),
            category_filter: self.category_filter.clone(),
            workers: self.workers,
            request_pause_ms: self.pause_ms,
        }
    }
}

impl BuildArgs {
    pub fn options(&self) -> Result<BuildOptions> {
        Ok(BuildOptions {
            input_dir: self.input_dir.clone(),
            storage_dir: self.storage_dir.clone(),
            split_ratio: SplitRatio::parse(&self.ratio)?,
            classes: self.classes.clone(),
        })
    }
}

impl InspectArgs {
    pub fn options(&self) -> SequenceOptions {
        SequenceOptions {
            batch_size: self.batch_size,
            target_dim: self.img_dim,
            shuffle: !self.no_shuffle,
            seed: self.seed,
        }
    }
}

/// Console progress: failures to stderr, totals at the end.
struct Console {
    total: usize,
    done: usize,
    failed: usize,
}

impl Progress for Console {
    fn begin(&mut self, total: usize) {
        self.total = total;
        eprintln!("Scraping {total} app(s)…");
    }
    fn item_done(&mut self, _app_id: &str) {
        self.done += 1;
    }
    fn item_failed(&mut self, app_id: &str, error: &str) {
        self.failed += 1;
        eprintln!("  {app_id}: {error}");
    }
    fn finish(&mut self) {
        eprintln!("Handled {}/{} ({} failed)", self.done + self.failed, self.total, self.failed);
    }
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Scrape(args) => {
            let opts = args.options();
            let mut console = Console { total: 0, done: 0, failed: 0 };
            let s = runner::scrape(&args.input, &opts, Some(&mut console))?;
            println!(
                "requested {}, stored {}, filtered {}, already present {}, failed {} (log: {})",
                s.requested,
                s.stored,
                s.filtered,
                s.already_present,
                s.failed,
                opts.storage_dir.join(SCRAPER_LOG_FILE).display()
            );
        }
        Command::Build(args) => {
            let s = runner::build(&args.options()?)?;
            println!(
                "train {}, validation {}, test {}, already present {}, missing icon {}",
                s.added[0], s.added[1], s.added[2], s.already_present, s.missing_icon
            );
        }
        Command::Inspect(args) => {
            let r = runner::inspect(&args.data_dir, &args.options())?;
            println!("{} sample(s), {} batch(es)", r.samples, r.batches);
            for (id, name) in r.categories.iter().enumerate() {
                println!("{id},{name}");
            }
            if let Some(shape) = r.first_batch_shape {
                println!("first batch: {shape:?}");
            }
        }
        Command::Categories => {
            for c in categories::all() {
                println!("{c}");
            }
        }
    }
    Ok(())
}
