use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use drape_scan::{
    build_face_mask, decompose_pigments, generate_palette, rank_palette, CancellationToken,
    LandmarkProvider, MetalType, OvalLandmarkProvider,
};
use image::{Rgba, RgbaImage};
use std::hint::black_box;

fn portrait() -> RgbaImage {
    RgbaImage::from_fn(240, 320, |x, y| {
        let shade = ((x + y) % 24) as u8;
        Rgba([210 - shade, 160 - shade, 140 - shade / 2, 255])
    })
}

fn benchmark_ranking(c: &mut Criterion) {
    let image = portrait();
    let landmarks = OvalLandmarkProvider::default().detect(&image).unwrap();
    let mask = build_face_mask(&landmarks, image.width(), image.height()).unwrap();

    let mut group = c.benchmark_group("rank_palette");
    group.sample_size(10);
    for size in [16usize, 64] {
        let palette = generate_palette(size).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &palette, |b, palette| {
            b.iter(|| {
                rank_palette(
                    black_box(&image),
                    &mask,
                    palette,
                    MetalType::Gold,
                    |_, _| {},
                    &CancellationToken::new(),
                )
                .unwrap()
            })
        });
    }
    group.finish();
}

fn benchmark_mask_and_pigments(c: &mut Criterion) {
    let image = portrait();
    let landmarks = OvalLandmarkProvider::default().detect(&image).unwrap();

    c.bench_function("build_face_mask", |b| {
        b.iter(|| build_face_mask(black_box(&landmarks), 240, 320).unwrap())
    });

    let mask = build_face_mask(&landmarks, 240, 320).unwrap();
    c.bench_function("decompose_pigments", |b| {
        b.iter(|| decompose_pigments(black_box(&image), &mask).unwrap())
    });
}

criterion_group!(benches, benchmark_ranking, benchmark_mask_and_pigments);
criterion_main!(benches);
