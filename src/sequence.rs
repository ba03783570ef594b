// src/sequence.rs
//! Batch sequencer over a labeled icon tree (`<root>/<category>/<icon>`).
//!
//! Fixed-size batches for an external training loop. Category ids follow the
//! sorted category names, so they are the same on every platform.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ndarray::{Array1, Array4};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::config::options::SequenceOptions;
use crate::core::imaging::{fit_to_square, load_icon};
use crate::errors::{Error, Result};
use crate::file::sorted_entries;

/// One batch: `inputs` is `(batch, dim, dim, 3)` RGB, `labels` the category ids.
#[derive(Clone, Debug, PartialEq)]
pub struct Batch {
    pub inputs: Array4<u8>,
    pub labels: Array1<u32>,
}

/// What a training loop needs from a batch source.
pub trait BatchSource {
    /// Batches per epoch.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool { self.len() == 0 }

    fn batch(&self, index: usize) -> Result<Batch>;

    /// Called by the training loop after every epoch.
    fn on_epoch_end(&mut self) {}
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Sample {
    file_name: String,
    category: u32,
}

pub struct ClassifierSequence {
    input_dir: PathBuf,
    opts: SequenceOptions,
    samples: Vec<Sample>,
    id_to_name: Vec<String>,
    name_to_id: HashMap<String, u32>,
    rng: StdRng,
}

impl ClassifierSequence {
    pub fn new(input_dir: impl Into<PathBuf>, opts: SequenceOptions) -> Result<Self> {
        let input_dir = input_dir.into();
        if !input_dir.is_dir() {
            return Err(Error::Configuration(format!(
                "input directory does not exist: {}",
                input_dir.display()
            )));
        }
        if opts.batch_size == 0 {
            return Err(Error::Configuration(s!("batch size must be at least 1")));
        }
        if opts.target_dim == 0 {
            return Err(Error::Configuration(s!("target image dimension must be at least 1")));
        }

        let id_to_name = sorted_entries(&input_dir, Path::is_dir)?;
        let mut name_to_id = HashMap::with_capacity(id_to_name.len());
        let mut samples = Vec::new();

        for (id, name) in id_to_name.iter().enumerate() {
            let id = id as u32;
            name_to_id.insert(name.clone(), id);
            for file_name in sorted_entries(&input_dir.join(name), Path::is_file)? {
                samples.push(Sample { file_name, category: id });
            }
        }
        debug!(
            dir = %input_dir.display(),
            categories = id_to_name.len(),
            samples = samples.len(),
            "sequence ready"
        );

        let rng = match opts.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self { input_dir, opts, samples, id_to_name, name_to_id, rng })
    }

    pub fn batch_size(&self) -> usize { self.opts.batch_size }
    pub fn sample_count(&self) -> usize { self.samples.len() }

    /// Category names, indexed by id.
    pub fn categories(&self) -> &[String] { &self.id_to_name }

    pub fn category_name(&self, id: u32) -> Option<&str> {
        self.id_to_name.get(id as usize).map(String::as_str)
    }

    pub fn category_id(&self, name: &str) -> Option<u32> {
        self.name_to_id.get(name).copied()
    }

    /// Sample positions making up batch `index`. A short last batch wraps
    /// around to the front of the list until it is full.
    pub fn batch_positions(&self, index: usize) -> Result<Vec<usize>> {
        let n = self.samples.len();
        let bs = self.opts.batch_size;
        if index >= self.len() {
            return Err(Error::BatchIndex { index, len: self.len() });
        }

        let start = index * bs;
        let end = (start + bs).min(n);
        let mut positions: Vec<usize> = (start..end).collect();
        while positions.len() < bs {
            let missing = bs - positions.len();
            positions.extend(0..missing.min(n));
        }
        Ok(positions)
    }

    /// Path of the sample at `position` (current epoch order).
    pub fn sample_path(&self, position: usize) -> Option<PathBuf> {
        self.samples.get(position).map(|s| {
            self.input_dir
                .join(&self.id_to_name[s.category as usize])
                .join(&s.file_name)
        })
    }

    fn load(&self, sample: &Sample) -> Result<Vec<u8>> {
        let path = self
            .input_dir
            .join(&self.id_to_name[sample.category as usize])
            .join(&sample.file_name);
        let img = load_icon(&path)?;
        Ok(fit_to_square(&img, self.opts.target_dim).into_raw())
    }

    /// Iterate one epoch's batches in order.
    pub fn iter(&self) -> impl Iterator<Item = Result<Batch>> + '_ {
        (0..self.len()).map(move |i| self.batch(i))
    }
}

impl BatchSource for ClassifierSequence {
    fn len(&self) -> usize {
        self.samples.len().div_ceil(self.opts.batch_size)
    }

    fn batch(&self, index: usize) -> Result<Batch> {
        let positions = self.batch_positions(index)?;
        let dim = self.opts.target_dim as usize;

        let mut pixels = Vec::with_capacity(positions.len() * dim * dim * 3);
        let mut labels = Vec::with_capacity(positions.len());
        for &pos in &positions {
            let sample = &self.samples[pos];
            pixels.extend(self.load(sample)?);
            labels.push(sample.category);
        }

        let inputs = Array4::from_shape_vec((positions.len(), dim, dim, 3), pixels)
            .map_err(|e| Error::Configuration(format!("batch shape: {e}")))?;
        Ok(Batch { inputs, labels: Array1::from_vec(labels) })
    }

    fn on_epoch_end(&mut self) {
        if self.opts.shuffle {
            self.samples.shuffle(&mut self.rng);
        }
    }
}
