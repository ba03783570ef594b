// tests/build.rs
use std::fs;
use std::path::{Path, PathBuf};

use play_icons::config::consts::{icon_name, APP_ID, CATEGORY};
use play_icons::config::options::{BuildOptions, SplitRatio};
use play_icons::dataset::DataSetBuilder;
use play_icons::record;
use play_icons::split::{Partition, Split};
use play_icons::store::{Record, RecordStore};

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("play_icons_build_{}", name));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

/// Scraper-shaped input dir: `apps` store + one icon per app (unless skipped).
fn scraper_dir(root: &Path, apps: &[(&str, &str)], without_icon: &[&str]) -> PathBuf {
    let dir = root.join("app_details");
    let store = RecordStore::at(dir.join("apps"));
    for (id, cat) in apps {
        store.append(&record! { APP_ID => *id, CATEGORY => *cat }).unwrap();
        if !without_icon.contains(id) {
            fs::write(dir.join(icon_name(id)), format!("icon of {id}")).unwrap();
        }
    }
    dir
}

fn options(root: &Path, input_dir: PathBuf) -> BuildOptions {
    BuildOptions {
        input_dir,
        storage_dir: root.join("data_set"),
        split_ratio: SplitRatio::default(),
        classes: None,
    }
}

fn app(id: &str, category: &str) -> Record {
    record! { APP_ID => id, CATEGORY => category }
}

#[test]
fn icons_and_info_land_in_expected_places() {
    let root = tmp_dir("layout");
    let input = scraper_dir(&root, &[("com.example", "example"), ("com.other", "tools")], &[]);
    let builder = DataSetBuilder::new(options(&root, input)).unwrap();

    let split = Split {
        train: vec![app("com.example", "example")],
        validation: vec![],
        test: vec![app("com.other", "tools")],
    };
    let summary = builder.build(&split).unwrap();
    assert_eq!(summary.added_to(Partition::Train), 1);
    assert_eq!(summary.added_to(Partition::Test), 1);
    assert_eq!(summary.total_added(), 2);

    let out = root.join("data_set");
    let copied = out.join("train").join("example").join("icon_com.example");
    assert_eq!(fs::read_to_string(copied).unwrap(), "icon of com.example");
    assert!(out.join("test").join("tools").join("icon_com.other").is_file());

    let info = fs::read_to_string(out.join("info").join("example")).unwrap();
    assert_eq!(info, "app_id,data_set\ncom.example,train\n");
}

#[test]
fn categories_outside_classes_go_to_others() {
    let root = tmp_dir("others");
    let input = scraper_dir(&root, &[("com.a", "tools"), ("com.b", "weather")], &[]);
    let mut opts = options(&root, input);
    opts.classes = Some(vec!["tools".into()]);
    let builder = DataSetBuilder::new(opts).unwrap();

    assert_eq!(builder.final_category("tools"), "tools");
    assert_eq!(builder.final_category("weather"), "others");

    let split = Split { train: vec![app("com.a", "tools"), app("com.b", "weather")], ..Default::default() };
    builder.build(&split).unwrap();

    let train = root.join("data_set").join("train");
    assert!(train.join("tools").join("icon_com.a").is_file());
    assert!(train.join("others").join("icon_com.b").is_file());
    assert!(!train.join("weather").exists());
    assert!(root.join("data_set").join("info").join("others").is_file());
}

#[test]
fn class_names_match_regardless_of_case() {
    let root = tmp_dir("class_case");
    let input = scraper_dir(&root, &[("com.a", "tools"), ("com.b", "weather")], &[]);
    let mut opts = options(&root, input);
    opts.classes = Some(vec![" Tools".into(), "WEATHER".into()]);
    let builder = DataSetBuilder::new(opts).unwrap();

    assert_eq!(builder.final_category("tools"), "tools");
    assert_eq!(builder.final_category("weather"), "weather");

    let split = Split { train: vec![app("com.a", "tools"), app("com.b", "weather")], ..Default::default() };
    builder.build(&split).unwrap();

    let train = root.join("data_set").join("train");
    assert!(train.join("tools").join("icon_com.a").is_file());
    assert!(train.join("weather").join("icon_com.b").is_file());
    assert!(!train.join("others").exists());
}

#[test]
fn missing_icon_is_counted_and_skipped() {
    let root = tmp_dir("missing_icon");
    let input = scraper_dir(&root, &[("com.a", "tools"), ("com.gone", "tools")], &["com.gone"]);
    let builder = DataSetBuilder::new(options(&root, input)).unwrap();

    let split = Split { train: vec![app("com.a", "tools"), app("com.gone", "tools")], ..Default::default() };
    let summary = builder.build(&split).unwrap();

    assert_eq!(summary.total_added(), 1);
    assert_eq!(summary.missing_icon, 1);
    assert!(!root.join("data_set").join("train").join("tools").join("icon_com.gone").exists());
    let info = fs::read_to_string(root.join("data_set").join("info").join("tools")).unwrap();
    assert!(!info.contains("com.gone"));
}

#[test]
fn rerun_adds_nothing() {
    let root = tmp_dir("rerun");
    let apps: Vec<(String, String)> = (0..12)
        .map(|i| (format!("com.app{i}"), if i % 2 == 0 { "tools".into() } else { "sports".into() }))
        .collect();
    let pairs: Vec<(&str, &str)> = apps.iter().map(|(a, c)| (a.as_str(), c.as_str())).collect();
    let input = scraper_dir(&root, &pairs, &[]);

    let builder = DataSetBuilder::new(options(&root, input)).unwrap();
    let first = builder.split_and_build().unwrap();
    assert_eq!(first.total_added(), 12);
    assert_eq!(first.already_present, 0);

    let second = builder.split_and_build().unwrap();
    assert_eq!(second.total_added(), 0);
    assert_eq!(second.already_present, 12);

    let info = fs::read_to_string(root.join("data_set").join("info").join("tools")).unwrap();
    assert_eq!(info.lines().count(), 1 + 6);
}

#[test]
fn missing_scraper_store_is_an_error() {
    let root = tmp_dir("no_store");
    let builder = DataSetBuilder::new(options(&root, root.join("empty"))).unwrap();
    assert!(builder.split_and_build().is_err());
}
