// tests/sequence.rs
use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage};

use play_icons::config::options::SequenceOptions;
use play_icons::errors::Error;
use play_icons::sequence::{BatchSource, ClassifierSequence};

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("play_icons_seq_{}", name));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

/// `<root>/<category>/icon_<i>` PNGs (no extension, like the builder writes them).
fn populate(root: &Path, layout: &[(&str, usize)]) {
    for (category, count) in layout {
        let dir = root.join(category);
        fs::create_dir_all(&dir).unwrap();
        for i in 0..*count {
            let img = RgbImage::from_pixel(6, 4, Rgb([10 * i as u8, 100, 200]));
            img.save_with_format(dir.join(format!("icon_{category}{i}")), ImageFormat::Png).unwrap();
        }
    }
}

fn opts(batch_size: usize, target_dim: u32) -> SequenceOptions {
    SequenceOptions { batch_size, target_dim, shuffle: false, seed: Some(7) }
}

#[test]
fn batch_count_rounds_up() {
    for (n, expected) in [(6, 2), (7, 3), (5, 2), (0, 0)] {
        let root = tmp_dir(&format!("len_{n}"));
        populate(&root, &[("tools", n)]);
        let seq = ClassifierSequence::new(&root, opts(3, 8)).unwrap();
        assert_eq!(seq.len(), expected, "n = {n}");
        assert_eq!(seq.is_empty(), expected == 0);
    }
}

#[test]
fn last_batch_wraps_to_the_front() {
    let root = tmp_dir("wrap");
    populate(&root, &[("tools", 7)]);
    let seq = ClassifierSequence::new(&root, opts(3, 8)).unwrap();

    assert_eq!(seq.batch_positions(0).unwrap(), vec![0, 1, 2]);
    assert_eq!(seq.batch_positions(2).unwrap(), vec![6, 0, 1]);
    assert!(matches!(seq.batch_positions(3), Err(Error::BatchIndex { index: 3, len: 3 })));
    assert!(matches!(seq.batch(3), Err(Error::BatchIndex { .. })));

    let last = seq.batch(2).unwrap();
    assert_eq!(last.inputs.shape(), &[3, 8, 8, 3]);
    assert_eq!(last.labels.len(), 3);
}

#[test]
fn small_batch_is_padded_by_repeating_samples() {
    let root = tmp_dir("tiny");
    populate(&root, &[("tools", 2)]);
    let seq = ClassifierSequence::new(&root, opts(5, 8)).unwrap();
    assert_eq!(seq.batch_positions(0).unwrap(), vec![0, 1, 0, 1, 0]);
}

#[test]
fn single_icon_batch_has_model_shape() {
    let root = tmp_dir("shape");
    populate(&root, &[("weather", 1)]);
    let seq = ClassifierSequence::new(&root, opts(1, 192)).unwrap();

    let batch = seq.batch(0).unwrap();
    assert_eq!(batch.inputs.shape(), &[1, 192, 192, 3]);
    // 6x4 icon centered: corner is black padding, center is the icon
    assert_eq!(batch.inputs[[0, 0, 0, 0]], 0);
    assert_eq!(batch.inputs[[0, 96, 96, 1]], 100);
    assert_eq!(batch.inputs[[0, 96, 96, 2]], 200);
}

#[test]
fn category_ids_follow_sorted_names() {
    let root = tmp_dir("labels");
    populate(&root, &[("weather", 2), ("arcade", 3)]);
    let seq = ClassifierSequence::new(&root, opts(5, 4)).unwrap();

    assert_eq!(seq.categories(), &["arcade".to_string(), "weather".to_string()]);
    assert_eq!(seq.category_id("weather"), Some(1));
    assert_eq!(seq.category_name(0), Some("arcade"));
    assert_eq!(seq.category_name(2), None);

    let batch = seq.batch(0).unwrap();
    let labels = batch.labels.to_vec();
    assert_eq!(labels.iter().filter(|&&l| l == 0).count(), 3);
    assert_eq!(labels.iter().filter(|&&l| l == 1).count(), 2);
}

#[test]
fn iter_yields_every_batch() {
    let root = tmp_dir("iter");
    populate(&root, &[("a", 4), ("b", 3)]);
    let seq = ClassifierSequence::new(&root, opts(2, 4)).unwrap();
    let batches: Vec<_> = seq.iter().collect::<Result<_, _>>().unwrap();
    assert_eq!(batches.len(), 4);
}

#[test]
fn seeded_shuffle_is_reproducible() {
    let root = tmp_dir("shuffle");
    populate(&root, &[("a", 10), ("b", 10)]);
    let shuffled = SequenceOptions { shuffle: true, ..opts(4, 4) };

    let order = |seq: &ClassifierSequence| -> Vec<PathBuf> {
        (0..seq.sample_count()).map(|i| seq.sample_path(i).unwrap()).collect()
    };

    let mut x = ClassifierSequence::new(&root, shuffled.clone()).unwrap();
    let mut y = ClassifierSequence::new(&root, shuffled).unwrap();
    let before = order(&x);
    x.on_epoch_end();
    y.on_epoch_end();
    assert_eq!(order(&x), order(&y));
    assert_ne!(order(&x), before);

    let mut after = order(&x);
    after.sort();
    assert_eq!(after, before);
}

#[test]
fn no_shuffle_keeps_order() {
    let root = tmp_dir("no_shuffle");
    populate(&root, &[("a", 5)]);
    let mut seq = ClassifierSequence::new(&root, opts(2, 4)).unwrap();
    let before = seq.sample_path(0);
    seq.on_epoch_end();
    assert_eq!(seq.sample_path(0), before);
}

#[test]
fn bad_setup_is_a_configuration_error() {
    let root = tmp_dir("bad");
    let missing = ClassifierSequence::new(root.join("nope"), opts(2, 4));
    assert!(matches!(missing, Err(Error::Configuration(_))));
    assert!(matches!(ClassifierSequence::new(&root, opts(0, 4)), Err(Error::Configuration(_))));
    assert!(matches!(ClassifierSequence::new(&root, opts(2, 0)), Err(Error::Configuration(_))));
}

#[test]
fn undecodable_icon_fails_its_batch() {
    let root = tmp_dir("garbage");
    fs::create_dir_all(root.join("tools")).unwrap();
    fs::write(root.join("tools").join("icon_x"), b"not an image").unwrap();
    let seq = ClassifierSequence::new(&root, opts(1, 4)).unwrap();
    assert!(matches!(seq.batch(0), Err(Error::Image { .. })));
}
