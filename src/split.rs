// src/split.rs
//! Deterministic train/validation/test split.
//!
//! Records are sorted by key first, so arrival order never matters, then
//! shuffled with a fixed seed and sliced at `trunc(cumulative_ratio * n)`.
//! Truncation means small collections can lose a record from train to
//! validation (e.g. n = 3 gives 2/0/1); that is the expected behaviour.

use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::consts::SPLIT_SEED;
use crate::config::options::SplitRatio;
use crate::errors::Result;
use crate::store::Record;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Partition {
    Train,
    Validation,
    Test,
}

impl Partition {
    pub const ALL: [Partition; 3] = [Partition::Train, Partition::Validation, Partition::Test];

    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::Train => "train",
            Partition::Validation => "validation",
            Partition::Test => "test",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three groups, disjoint, in shuffled order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<Record>,
    pub validation: Vec<Record>,
    pub test: Vec<Record>,
}

impl Split {
    pub fn get(&self, partition: Partition) -> &[Record] {
        match partition {
            Partition::Train => &self.train,
            Partition::Validation => &self.validation,
            Partition::Test => &self.test,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Partition, &[Record])> {
        Partition::ALL.into_iter().map(move |p| (p, self.get(p)))
    }

    pub fn len(&self) -> usize {
        self.train.len() + self.validation.len() + self.test.len()
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// Slice ends `(train_end, validation_end)` for `n` records.
pub fn boundaries(n: usize, ratio: SplitRatio) -> Result<(usize, usize)> {
    let r = ratio.normalized()?;
    let total = n as f64;
    let train_end = ((r.train * total) as usize).min(n);
    let validation_end = (((r.train + r.validation) * total) as usize).clamp(train_end, n);
    Ok((train_end, validation_end))
}

/// Split `records` by the fixed seed. `key` is the field used for the
/// pre-shuffle sort (the entity id).
pub fn split(records: &[Record], key: &str, ratio: SplitRatio) -> Result<Split> {
    let (train_end, validation_end) = boundaries(records.len(), ratio)?;

    let mut shuffled = records.to_vec();
    shuffled.sort_by(|a, b| a.get(key).unwrap_or("").cmp(b.get(key).unwrap_or("")));
    let mut rng = StdRng::seed_from_u64(SPLIT_SEED);
    shuffled.shuffle(&mut rng);

    let test = shuffled.split_off(validation_end);
    let validation = shuffled.split_off(train_end);
    Ok(Split { train: shuffled, validation, test })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_truncate() {
        let r = SplitRatio::default();
        assert_eq!(boundaries(0, r).unwrap(), (0, 0));
        assert_eq!(boundaries(3, r).unwrap(), (2, 2));
        assert_eq!(boundaries(20, r).unwrap(), (14, 17));
        assert_eq!(boundaries(100, r).unwrap(), (70, 85));
    }

    #[test]
    fn boundaries_use_renormalized_weights() {
        assert_eq!(boundaries(8, SplitRatio::new(2.0, 1.0, 1.0)).unwrap(), (4, 6));
        assert_eq!(boundaries(5, SplitRatio::new(1.0, 0.0, 0.0)).unwrap(), (5, 5));
    }
}
