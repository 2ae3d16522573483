use ridgeline::{Landscape, LandscapeConfig, PaletteChoice, Scheme};
use std::path::Path;

fn main() {
    // Optional seed as the first argument
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2025);

    // One image per built-in palette, same mountains in each
    for scheme in Scheme::ALL {
        let config = LandscapeConfig {
            palette: PaletteChoice::Scheme(scheme),
            ..LandscapeConfig::default()
        };
        let rendering = Landscape::new(config).unwrap().generate(seed).unwrap();

        let name = format!("landscape_{}_{}.png", seed, scheme.name());
        let path = Path::new(&name);
        rendering.raster.save(path).unwrap();
        println!(
            "Saved {:?} ({} pixels brightened)",
            path, rendering.brightened
        );
    }
}
