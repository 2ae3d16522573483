use image::Rgba;
use palette::{FromColor, Hsv, Srgb};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{LandscapeError, LandscapeResult};
use crate::raster::{Raster, RenderContext};
use crate::utils::{WHITE, opaque, to_channel};

// Which pixels the dither pass leaves alone
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Exemption {
    // Pure white and the exact opaque sky color are skipped. A layer painted
    // in the sky color is skipped too.
    #[default]
    ExactColor,
    // Only pixels the rasterizer covered with terrain are eligible
    TerrainMask,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DitherSpec {
    pub enabled: bool,
    pub probability: f64, // chance that an eligible pixel is brightened
    pub brighten: f32,    // added to HSV value, on a [0,1] scale
    pub exemption: Exemption,
}

impl Default for DitherSpec {
    fn default() -> Self {
        Self {
            enabled: true,
            probability: 0.5,
            brighten: 0.1,
            exemption: Exemption::ExactColor,
        }
    }
}

// Grainy finish: randomly lifts the brightness of individual pixels
pub struct Ditherer {
    probability: f64,
    brighten: f32,
    exemption: Exemption,
}

impl Ditherer {
    pub fn new(spec: &DitherSpec) -> LandscapeResult<Self> {
        if !(0.0..=1.0).contains(&spec.probability) {
            return Err(LandscapeError::configuration(format!(
                "dither probability must lie in [0, 1], got {}",
                spec.probability
            )));
        }
        if !(spec.brighten.is_finite() && spec.brighten >= 0.0) {
            return Err(LandscapeError::configuration(format!(
                "dither brighten must be a finite value >= 0, got {}",
                spec.brighten
            )));
        }
        Ok(Self {
            probability: spec.probability,
            brighten: spec.brighten,
            exemption: spec.exemption,
        })
    }

    // Raise HSV value by the configured step, capped at 1. Hue, saturation and
    // alpha are kept, so the pixel never gets darker.
    pub fn brighten_pixel(&self, pixel: Rgba<u8>) -> Rgba<u8> {
        let [r, g, b, a] = pixel.0;
        let rgb = Srgb::<u8>::new(r, g, b).into_format::<f32>();
        let mut hsv: Hsv = Hsv::from_color(rgb);
        hsv.value = (hsv.value + self.brighten).min(1.0);
        let out: Srgb = Srgb::from_color(hsv);
        Rgba([
            to_channel(out.red),
            to_channel(out.green),
            to_channel(out.blue),
            a,
        ])
    }

    fn is_exempt(&self, pixel: Rgba<u8>, sky: Rgba<u8>, terrain: bool) -> bool {
        match self.exemption {
            Exemption::ExactColor => pixel == WHITE || pixel == sky,
            Exemption::TerrainMask => !terrain,
        }
    }

    // Dither the raster in place and return how many pixels were brightened.
    // Each row draws from its own stream derived from `seed`, so the result
    // does not depend on how rows are spread over threads.
    #[tracing::instrument(skip(self, raster, ctx))]
    pub fn apply(
        &self,
        raster: &mut Raster,
        ctx: &RenderContext,
        seed: u64,
    ) -> LandscapeResult<usize> {
        if ctx.dimensions() != raster.dimensions() {
            return Err(LandscapeError::configuration(format!(
                "render context is {:?} but raster is {:?}",
                ctx.dimensions(),
                raster.dimensions()
            )));
        }

        let sky = opaque(ctx.background());
        let row_len = raster.width() as usize * 4;
        if row_len == 0 || raster.height() == 0 {
            return Ok(0);
        }
        let buf: &mut [u8] = raster;

        let brightened: usize = buf
            .par_chunks_mut(row_len)
            .enumerate()
            .map(|(y, row)| {
                let mut rng = StdRng::seed_from_u64(row_seed(seed, y as u64));
                let mask = ctx.terrain_row(y as u32);
                let mut count = 0usize;
                for (x, px) in row.chunks_exact_mut(4).enumerate() {
                    let pixel = Rgba([px[0], px[1], px[2], px[3]]);
                    if self.is_exempt(pixel, sky, mask[x]) {
                        continue;
                    }
                    if rng.gen_bool(self.probability) {
                        px.copy_from_slice(&self.brighten_pixel(pixel).0);
                        count += 1;
                    }
                }
                count
            })
            .sum();

        tracing::debug!(brightened, "dithered raster");
        Ok(brightened)
    }
}

// Independent per-row stream seed
fn row_seed(seed: u64, row: u64) -> u64 {
    seed ^ row.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
