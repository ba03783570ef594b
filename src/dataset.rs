// src/dataset.rs
//! Classifier data set builder.
//!
//! Reads the scraper's `apps` store, splits it (see `split`) and lays the
//! icons out for training:
//!
//! ```text
//! <storage>/<partition>/<category>/icon_<app_id>
//! <storage>/info/<category>          store {app_id, data_set}
//! ```
//!
//! The per-category info stores make re-runs idempotent: an
//! `{app_id, data_set}` pair already logged is not copied again.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::consts::{
    icon_name, APP_ID, BUILDER_INFO_DIR, CATEGORY, DATA_SET, OTHERS_CATEGORY, SCRAPER_INFO_FILE,
};
use crate::config::options::BuildOptions;
use crate::core::sanitize::path_segment;
use crate::errors::Result;
use crate::file::{copy_into, ensure_directory};
use crate::split::{self, Partition, Split};
use crate::store::{Record, RecordStore};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Icons copied, per partition (train, validation, test).
    pub added: [usize; 3],
    /// Pairs already logged by an earlier run.
    pub already_present: usize,
    /// Records whose icon was not in the input directory.
    pub missing_icon: usize,
}

impl BuildSummary {
    pub fn added_to(&self, partition: Partition) -> usize {
        self.added[partition as usize]
    }

    pub fn total_added(&self) -> usize {
        self.added.iter().sum()
    }
}

pub struct DataSetBuilder {
    input_dir: PathBuf,
    input_store: RecordStore,
    storage_dir: PathBuf,
    info_dir: PathBuf,
    opts: BuildOptions,
}

impl DataSetBuilder {
    /// Creates the storage and info directories. Class names are matched
    /// against the lowercased labels the scraper stores.
    pub fn new(mut opts: BuildOptions) -> Result<Self> {
        if let Some(classes) = opts.classes.as_mut() {
            for c in classes.iter_mut() {
                *c = c.trim().to_lowercase();
            }
        }
        let info_dir = opts.storage_dir.join(BUILDER_INFO_DIR);
        ensure_directory(&opts.storage_dir)?;
        ensure_directory(&info_dir)?;

        Ok(Self {
            input_dir: opts.input_dir.clone(),
            input_store: RecordStore::at(opts.input_dir.join(SCRAPER_INFO_FILE)),
            storage_dir: opts.storage_dir.clone(),
            info_dir,
            opts,
        })
    }

    pub fn info_dir(&self) -> &Path { &self.info_dir }

    /// Info store for one (final) category.
    pub fn category_store(&self, category: &str) -> RecordStore {
        RecordStore::at(self.info_dir.join(path_segment(category)))
    }

    /// Split the given records with the configured ratio.
    pub fn split(&self, apps: &[Record]) -> Result<Split> {
        split::split(apps, APP_ID, self.opts.split_ratio)
    }

    /// Read the scraper store, split it and build all three sets.
    pub fn split_and_build(&self) -> Result<BuildSummary> {
        let apps = self.input_store.read_all()?;
        info!(apps = apps.len(), store = %self.input_store.path().display(), "building data set");
        let split = self.split(&apps)?;
        self.build(&split)
    }

    /// Materialize an already computed split.
    pub fn build(&self, split: &Split) -> Result<BuildSummary> {
        let mut summary = BuildSummary::default();
        for (partition, apps) in split.iter() {
            for app in apps {
                self.add_to_data_set(app, partition, &mut summary)?;
            }
        }
        info!(
            train = summary.added_to(Partition::Train),
            validation = summary.added_to(Partition::Validation),
            test = summary.added_to(Partition::Test),
            already_present = summary.already_present,
            missing_icon = summary.missing_icon,
            "data set built"
        );
        Ok(summary)
    }

    /// Category the app is filed under once the allow-list is applied.
    pub fn final_category<'a>(&self, category: &'a str) -> &'a str {
        match &self.opts.classes {
            Some(classes) if !classes.iter().any(|c| c == category) => OTHERS_CATEGORY,
            _ => category,
        }
    }

    fn add_to_data_set(
        &self,
        app: &Record,
        partition: Partition,
        summary: &mut BuildSummary,
    ) -> Result<()> {
        let store_path = self.input_store.path();
        let app_id = app.require(APP_ID, store_path)?;
        let category = self.final_category(app.require(CATEGORY, store_path)?);

        let icon = icon_name(app_id);
        let src = self.input_dir.join(&icon);
        if !src.is_file() {
            // Scraper may have stored the record but not the icon
            summary.missing_icon += 1;
            debug!(app_id, "no icon, skipped");
            return Ok(());
        }

        let entry = record! { APP_ID => app_id, DATA_SET => partition.as_str() };
        let info = self.category_store(category);
        if info.contains(&entry)? {
            summary.already_present += 1;
            return Ok(());
        }

        info.append(&entry)?;
        let dir = self
            .storage_dir
            .join(partition.as_str())
            .join(path_segment(category));
        copy_into(&src, &dir, &icon)?;
        summary.added[partition as usize] += 1;
        Ok(())
    }
}
