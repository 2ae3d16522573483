// ridgeline holds the landscape pipeline: fractal horizon curves, dense
// sampling, layered rasterization and the brightness dither pass
pub mod curve;
pub mod dither;
pub mod error;
pub mod landscape;
pub mod raster;
pub mod sampler;
pub mod scheme;
pub mod utils;

pub use curve::{Curve, MidpointDisplacement1D, Point};
pub use dither::{DitherSpec, Ditherer, Exemption};
pub use error::{LandscapeError, LandscapeResult};
pub use landscape::{Landscape, LandscapeConfig, LayerSpec, Rendering, generate_landscape};
pub use raster::{Raster, Rasterizer, RenderContext, Sun};
pub use sampler::{SampledCurve, sample, sample_within};
pub use scheme::{Palette, PaletteChoice, Scheme};

use rand::Rng;

// Source of the up/down decisions taken for every displaced midpoint.
// Any `rand` generator works; tests plug in scripted sources to force a
// particular displacement sequence.
pub trait SignSource {
    // +1.0 raises the midpoint, -1.0 lowers it
    fn next_sign(&mut self) -> f64;
}

impl<R: Rng> SignSource for R {
    fn next_sign(&mut self) -> f64 {
        if self.gen_bool(0.5) { 1.0 } else { -1.0 }
    }
}
