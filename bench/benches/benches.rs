use criterion::{Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ridgeline::{
    DitherSpec, Ditherer, Landscape, LandscapeConfig, MidpointDisplacement1D, Palette, Point,
    Rasterizer, Scheme, Sun, sample,
};

const SEED: u64 = 2025;
const WIDTH: u32 = 1000;
const HEIGHT: u32 = 500;

fn nearest_layer(iterations: u32) -> MidpointDisplacement1D {
    MidpointDisplacement1D::new(
        Point::new(250.0, 0.0),
        Point::new(1000.0, 200.0),
        0.9,
        20.0,
        iterations,
    )
    .unwrap()
}

fn stock_curves() -> Vec<ridgeline::Curve> {
    LandscapeConfig::default()
        .layers
        .iter()
        .map(|l| l.generator().unwrap().generate(&mut StdRng::seed_from_u64(SEED)))
        .collect()
}

fn bench_curve(c: &mut Criterion) {
    for n in [8, 12, 16] {
        c.bench_function(&format!("midpoint displacement ({n} iters)"), |b| {
            let generator = nearest_layer(n);
            b.iter(|| generator.generate(&mut StdRng::seed_from_u64(SEED)))
        });
    }
}

fn bench_sample(c: &mut Criterion) {
    let curve = nearest_layer(12).generate(&mut StdRng::seed_from_u64(SEED));
    c.bench_function("sample 4097-point curve", |b| b.iter(|| sample(&curve)));
}

fn bench_rasterize(c: &mut Criterion) {
    let curves = stock_curves();
    let palette: Palette = Scheme::Strahan.palette();
    let rasterizer = Rasterizer::new(WIDTH, HEIGHT, Some(Sun::default())).unwrap();
    c.bench_function("rasterize four layers", |b| {
        b.iter(|| rasterizer.render(&curves, &palette).unwrap())
    });
}

fn bench_dither(c: &mut Criterion) {
    let curves = stock_curves();
    let palette = Scheme::CaitlinSpice.palette();
    let rasterizer = Rasterizer::new(WIDTH, HEIGHT, Some(Sun::default())).unwrap();
    let (raster, ctx) = rasterizer.render(&curves, &palette).unwrap();
    let ditherer = Ditherer::new(&DitherSpec::default()).unwrap();
    c.bench_function("dither 1000x500", |b| {
        b.iter(|| {
            let mut r = raster.clone();
            ditherer.apply(&mut r, &ctx, SEED).unwrap()
        })
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let landscape = Landscape::new(LandscapeConfig::default()).unwrap();
    c.bench_function("full landscape", |b| {
        b.iter(|| landscape.generate(SEED).unwrap())
    });
}

criterion_group!(
    landscape_benchmarks,
    bench_curve,
    bench_sample,
    bench_rasterize,
    bench_dither,
    bench_pipeline
);
criterion_main!(landscape_benchmarks);
