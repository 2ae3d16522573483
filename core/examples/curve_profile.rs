use rand::SeedableRng;
use rand::rngs::StdRng;
use ridgeline::{MidpointDisplacement1D, Point, sample};

fn main() {
    // A short ridge over 64 columns, 4 passes of displacement
    let generator =
        MidpointDisplacement1D::new(Point::new(0.0, 20.0), Point::new(64.0, 10.0), 1.0, 12.0, 4)
            .unwrap();
    let curve = generator.generate(&mut StdRng::seed_from_u64(2025));
    let sampled = sample(&curve);

    println!("{} control points, {} columns", curve.len(), sampled.len());

    // Sideways text plot, one row per column
    for (x, y) in sampled.columns() {
        let bar = "#".repeat(y.max(0.0).round() as usize);
        println!("{x:>3} {y:>7.2} {bar}");
    }
}
