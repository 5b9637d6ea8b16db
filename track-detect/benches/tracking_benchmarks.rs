use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use track_core::ResponseField;
use track_detect::{deduplicate, DedupConfig, DetectorKind, FeatureDetector, HarrisResponse, ResponseProvider};

/// Create benchmark image with gradients and checkerboard patches
fn create_benchmark_image(width: usize, height: usize) -> Vec<u8> {
    let mut img = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let gradient = ((x as f32 / width as f32) * 50.0) as u8;
            let noise = ((x + y) % 7) as u8;
            img[y * width + x] = 100 + gradient + noise;
        }
    }

    for i in 0..20 {
        let cx = 8 + (i * width / 20) % (width - 16);
        let cy = 8 + (i * 7 * height / 20) % (height - 16);
        for dy in -4i32..=4 {
            for dx in -4i32..=4 {
                let x = (cx as i32 + dx) as usize;
                let y = (cy as i32 + dy) as usize;
                img[y * width + x] = if (dx >= 0) == (dy >= 0) { 30 } else { 220 };
            }
        }
    }
    img
}

/// Sparse synthetic response field with scattered peaks
fn create_benchmark_field(rows: usize, cols: usize) -> ResponseField {
    let mut field = ResponseField::zeros(rows, cols);
    for r in 0..rows {
        for c in 0..cols {
            if (r * 31 + c * 17) % 23 == 0 {
                field.set(r, c, 101.0 + ((r * 13 + c * 7) % 150) as f32);
            }
        }
    }
    field
}

fn bench_dedup(c: &mut Criterion) {
    let mut group = c.benchmark_group("deduplicate");
    let cfg = DedupConfig::default();

    for &(rows, cols) in &[(64, 64), (128, 128), (256, 256)] {
        let field = create_benchmark_field(rows, cols);
        group.bench_with_input(BenchmarkId::from_parameter(format!("{}x{}", cols, rows)), &field, |b, field| {
            b.iter(|| black_box(deduplicate(black_box(field), &cfg).unwrap()))
        });
    }

    group.finish();
}

fn bench_harris_response(c: &mut Criterion) {
    let (width, height) = (256, 256);
    let img = create_benchmark_image(width, height);
    let provider = HarrisResponse::default();

    c.bench_function("harris_response_256", |b| {
        b.iter(|| black_box(provider.compute(black_box(&img), width, height).unwrap()))
    });
}

fn bench_detectors(c: &mut Criterion) {
    let mut group = c.benchmark_group("detectors");
    let (width, height) = (256, 256);
    let img = create_benchmark_image(width, height);

    for name in ["HARRIS", "SHITOMASI", "FAST"] {
        let kind: DetectorKind = name.parse().unwrap();
        let detector = FeatureDetector::new(kind, width, height).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(name), &detector, |b, detector| {
            b.iter(|| black_box(detector.detect_keypoints(black_box(&img)).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_dedup, bench_harris_response, bench_detectors);
criterion_main!(benches);
