#![deny(warnings)]
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use inkpath::{DrawingScene, Point, RGBA, Scalar, Size, render};

/// Scene with `count` random scribbles of `steps` pointer moves each
fn scribbles(rnd: &mut Rnd, count: usize, steps: usize, size: Size) -> DrawingScene {
    let fsize = Point::new(size.width as Scalar, size.height as Scalar);
    let mut scene = DrawingScene::default();
    for _ in 0..count {
        scene.set_color(rnd.color());
        scene.set_width(rnd.uniform() * 10.0 + 1.0);
        let Point([mut x, mut y]) = rnd.point() * fsize;
        scene.begin(x, y);
        for _ in 0..steps {
            x += rnd.gauss() * 5.0;
            y += rnd.gauss() * 5.0;
            scene.extend(x, y);
        }
        scene.end();
    }
    scene
}

fn gesture_benchmark(c: &mut Criterion) {
    let mut rnd = Rnd::new();
    let steps = 256;
    let moves: Vec<_> = (0..steps)
        .map(|_| rnd.point() * Point::new(1024.0, 1024.0))
        .collect();

    let mut group = c.benchmark_group("gesture");
    group.throughput(Throughput::Elements(steps as u64));
    group.bench_function("record", |b| {
        b.iter_with_large_drop(|| {
            let mut scene = DrawingScene::default();
            scene.begin(0.0, 0.0);
            for Point([x, y]) in moves.iter().copied() {
                scene.extend(x, y);
            }
            scene.end();
            scene
        })
    });
    group.bench_function("undo-redo", |b| {
        let mut scene = scribbles(&mut rnd, 64, 16, Size::new(1024, 1024));
        b.iter(|| {
            scene.undo();
            scene.redo();
        })
    });
}

fn render_benchmark(c: &mut Criterion) {
    let mut rnd = Rnd::new();
    let size = Size::new(512, 512);
    let count = 128;
    let scene = scribbles(&mut rnd, count, 32, size);

    let mut group = c.benchmark_group("render");
    group.throughput(Throughput::Elements(count as u64));
    group.bench_function("scribbles", |b| {
        b.iter_with_large_drop(|| render(&scene, size))
    });
}

criterion_group!(scene, gesture_benchmark, render_benchmark);
criterion_main!(scene);

/// Very basic random number generator
#[derive(Default)]
pub struct Rnd {
    state: u32,
}

impl Rnd {
    /// Create new random number generator with seed `0`
    pub fn new() -> Self {
        Self::default()
    }

    fn step(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(214_013).wrapping_add(2_531_011) & 0x7fffffff;
        self.state >> 16
    }

    /// Sample `u32` from uniform distributes
    pub fn uniform_u32(&mut self) -> u32 {
        (self.step() & 0xffff) << 16 | (self.step() & 0xffff)
    }

    /// Sample scalar from `Uniform([0, 1])`
    pub fn uniform(&mut self) -> Scalar {
        (self.uniform_u32() >> 8) as Scalar / (1u32 << 24) as Scalar
    }

    /// Sample form normal/gauss distribution with `mu = 0`, `sigma = 1`
    pub fn gauss(&mut self) -> Scalar {
        const PI_2: Scalar = 2.0 * std::f32::consts::PI;
        let x = self.uniform();
        let y = self.uniform();
        (PI_2 * x).cos() * (-2.0 * (1.0 - y).ln()).sqrt()
    }

    /// Generate random opaque color
    pub fn color(&mut self) -> RGBA {
        RGBA::new(
            (self.uniform_u32() % 256) as u8,
            (self.uniform_u32() % 256) as u8,
            (self.uniform_u32() % 256) as u8,
            255,
        )
    }

    /// Generate random `Point(U([0, 1]), U([0, 1]))`
    pub fn point(&mut self) -> Point {
        Point::new(self.uniform(), self.uniform())
    }
}
