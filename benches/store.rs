// benches/store.rs
use criterion::{criterion_group, criterion_main, Criterion, black_box};
use image::{DynamicImage, Rgba, RgbaImage};

use play_icons::{
    core::imaging::fit_to_square,
    record,
    store::RecordStore,
};

fn filled_store(rows: usize) -> RecordStore {
    let mut path = std::env::temp_dir();
    path.push("play_icons_bench_store");
    let _ = std::fs::remove_file(&path);
    let store = RecordStore::at(&path);
    for i in 0..rows {
        store
            .append(&record! { "app_id" => format!("com.app{i}"), "category" => "tools" })
            .expect("append bench row");
    }
    store
}

fn bench_contains(c: &mut Criterion) {
    let store = filled_store(5_000);
    let hit = record! { "app_id" => "com.app4999", "category" => "tools" };
    let miss = record! { "app_id" => "com.absent" };

    c.bench_function("contains_last_row", |b| {
        b.iter(|| black_box(store.contains(black_box(&hit)).unwrap()))
    });

    c.bench_function("contains_miss", |b| {
        b.iter(|| black_box(store.contains(black_box(&miss)).unwrap()))
    });
}

fn bench_fit(c: &mut Criterion) {
    let small = DynamicImage::ImageRgba8(RgbaImage::from_pixel(64, 64, Rgba([1, 2, 3, 255])));
    let large = DynamicImage::ImageRgba8(RgbaImage::from_pixel(512, 512, Rgba([1, 2, 3, 255])));

    c.bench_function("fit_pad_64_to_192", |b| {
        b.iter(|| black_box(fit_to_square(black_box(&small), 192)))
    });

    c.bench_function("fit_crop_512_to_192", |b| {
        b.iter(|| black_box(fit_to_square(black_box(&large), 192)))
    });
}

criterion_group!(benches, bench_contains, bench_fit);
criterion_main!(benches);
