use criterion::{black_box, criterion_group, criterion_main, Criterion};

use globe::{GlobalRaster, GridLayout, Palette, RenderOptions, Sampling, NO_DATA};

/// Build a raster on the GLOBE layout scaled down by 10 with a simple gradient.
fn create_raster() -> GlobalRaster {
    let layout = GridLayout::scaled(10).unwrap();
    let data = (0..layout.cells())
        .map(|i| match i % 97 {
            0 => NO_DATA,
            n => ((i / layout.cols + n) % 6000) as i16 - 400,
        })
        .collect();
    GlobalRaster::from_samples(layout.cols, layout.rows, data).unwrap()
}

fn bench_terrain_crop(c: &mut Criterion) {
    let raster = create_raster();
    let options = RenderOptions::new(800, 800);

    c.bench_function("render_800_terrain_crop", |b| {
        b.iter(|| black_box(globe::render::render(black_box(&raster), &options).unwrap()));
    });
}

fn bench_greyscale_resample(c: &mut Criterion) {
    let raster = create_raster();
    let options = RenderOptions::new(800, 400)
        .palette(Palette::Greyscale)
        .sampling(Sampling::Resample);

    c.bench_function("render_800_greyscale_resample", |b| {
        b.iter(|| black_box(globe::render::render(black_box(&raster), &options).unwrap()));
    });
}

fn bench_table_export(c: &mut Criterion) {
    let raster = create_raster();
    let mut out = Vec::with_capacity(64 * 1024 * 1024);

    c.bench_function("table_export_scaled_globe", |b| {
        b.iter(|| {
            out.clear();
            black_box(globe::table::export_table(black_box(&raster), None, &mut out).unwrap());
        });
    });
}

fn bench_stats(c: &mut Criterion) {
    let raster = create_raster();

    c.bench_function("stats_scaled_globe", |b| {
        b.iter(|| black_box(black_box(&raster).stats()));
    });
}

criterion_group!(
    benches,
    bench_terrain_crop,
    bench_greyscale_resample,
    bench_table_export,
    bench_stats,
);
criterion_main!(benches);
