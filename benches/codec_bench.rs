#![deny(warnings)]
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use inkpath::{DrawingScene, RGBA, Scalar, svg};
use std::hint::black_box;

/// Scene with `count` spirals, coordinates deliberately have long fractions
fn spirals(count: usize, steps: usize) -> DrawingScene {
    let mut scene = DrawingScene::default();
    for index in 0..count {
        scene.set_color(RGBA::new((index % 256) as u8, 128, 64, 255));
        scene.set_width(1.0 + (index % 7) as Scalar / 3.0);
        let (cx, cy) = ((index % 16) as Scalar * 64.0, (index / 16) as Scalar * 64.0);
        scene.begin(cx, cy);
        for step in 0..steps {
            let angle = step as Scalar * 0.1;
            let radius = step as Scalar * 0.37;
            scene.extend(cx + radius * angle.cos(), cy + radius * angle.sin());
        }
        scene.end();
    }
    scene
}

fn codec_benchmark(c: &mut Criterion) {
    let scene = spirals(256, 128);
    let text = svg::encode(&scene, 1024, 1024);

    let mut group = c.benchmark_group("svg");
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("encode", |b| {
        b.iter_with_large_drop(|| svg::encode(black_box(&scene), 1024, 1024))
    });
    group.bench_function("decode", |b| {
        b.iter_with_large_drop(|| svg::decode(black_box(&text)))
    });
    group.bench_function("path-data", |b| {
        let data = inkpath::PathData(scene.strokes()[0].path().commands()).to_string();
        b.iter_with_large_drop(|| svg::parse_path_data(black_box(&data)))
    });
}

criterion_group!(codec, codec_benchmark);
criterion_main!(codec);
