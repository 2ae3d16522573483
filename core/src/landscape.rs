use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::curve::{Curve, MidpointDisplacement1D, Point};
use crate::dither::{DitherSpec, Ditherer};
use crate::error::{LandscapeError, LandscapeResult};
use crate::raster::{Raster, Rasterizer, Sun};
use crate::scheme::{Palette, PaletteChoice, Scheme};

pub const DEFAULT_WIDTH: u32 = 1000;
pub const DEFAULT_HEIGHT: u32 = 500;

// One mountain range: anchors plus the midpoint displacement parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub start: Point,
    pub end: Point,
    pub roughness: f64,
    // Initial displacement; the mean anchor height when left out.
    #[serde(default)]
    pub displacement: Option<f64>,
    pub iterations: u32,
}

impl LayerSpec {
    pub fn new(
        start: [f64; 2],
        end: [f64; 2],
        roughness: f64,
        displacement: impl Into<Option<f64>>,
        iterations: u32,
    ) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            roughness,
            displacement: displacement.into(),
            iterations,
        }
    }

    pub fn generator(&self) -> LandscapeResult<MidpointDisplacement1D> {
        let displacement = self
            .displacement
            .unwrap_or_else(|| MidpointDisplacement1D::default_displacement(self.start, self.end));
        MidpointDisplacement1D::new(
            self.start,
            self.end,
            self.roughness,
            displacement,
            self.iterations,
        )
    }
}

// Everything that shapes a landscape apart from the seed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandscapeConfig {
    pub width: u32,
    pub height: u32,
    // Ordered farthest to nearest.
    pub layers: Vec<LayerSpec>,
    pub palette: PaletteChoice,
    pub sun: Option<Sun>,
    pub dither: DitherSpec,
}

impl Default for LandscapeConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            layers: vec![
                LayerSpec::new([0.0, 350.0], [1000.0, 320.0], 0.9, 90.0, 8),
                LayerSpec::new([0.0, 270.0], [1000.0, 190.0], 0.9, 80.0, 9),
                LayerSpec::new([0.0, 180.0], [1000.0, 80.0], 0.9, 30.0, 12),
                LayerSpec::new([250.0, 0.0], [1000.0, 200.0], 0.9, 20.0, 12),
            ],
            palette: PaletteChoice::Random,
            sun: Some(Sun::default()),
            dither: DitherSpec::default(),
        }
    }
}

// A finished landscape and the choices that produced it.
#[derive(Clone, Debug)]
pub struct Rendering {
    pub raster: Raster,
    pub palette: Palette,
    pub seed: u64,
    pub brightened: usize,
}

// Validated pipeline: build once, then render any number of seeds.
pub struct Landscape {
    config: LandscapeConfig,
    generators: Vec<MidpointDisplacement1D>,
    rasterizer: Rasterizer,
    ditherer: Option<Ditherer>,
}

impl Landscape {
    pub fn new(config: LandscapeConfig) -> LandscapeResult<Self> {
        let generators = config
            .layers
            .iter()
            .enumerate()
            .map(|(i, layer)| {
                layer.generator().map_err(|e| match e {
                    LandscapeError::Configuration(msg) => {
                        LandscapeError::configuration(format!("layer {i}: {msg}"))
                    }
                })
            })
            .collect::<LandscapeResult<Vec<_>>>()?;

        // Fail on the palette now rather than halfway through a render
        let layer_count = generators.len();
        match &config.palette {
            PaletteChoice::Random => {
                for scheme in Scheme::ALL {
                    scheme.palette().validate(layer_count)?;
                }
            }
            PaletteChoice::Scheme(s) => s.palette().validate(layer_count)?,
            PaletteChoice::Custom(p) => p.validate(layer_count)?,
        }

        let rasterizer = Rasterizer::new(config.width, config.height, config.sun)?;
        let ditherer = if config.dither.enabled {
            Some(Ditherer::new(&config.dither)?)
        } else {
            None
        };

        Ok(Self {
            config,
            generators,
            rasterizer,
            ditherer,
        })
    }

    pub fn config(&self) -> &LandscapeConfig {
        &self.config
    }

    // The seed fans out into one stream per layer and one for the dither pass
    // before the palette is picked, so changing only the palette keeps the
    // same mountains.
    #[tracing::instrument(skip(self))]
    pub fn generate(&self, seed: u64) -> LandscapeResult<Rendering> {
        let mut master = StdRng::seed_from_u64(seed);
        let layer_seeds: Vec<u64> = (0..self.generators.len())
            .map(|_| master.r#gen())
            .collect();
        let dither_seed: u64 = master.r#gen();
        let palette = self
            .config
            .palette
            .resolve(self.generators.len(), &mut master)?;

        let curves: Vec<Curve> = self
            .generators
            .par_iter()
            .zip(layer_seeds.par_iter())
            .map(|(generator, &layer_seed)| {
                generator.generate(&mut StdRng::seed_from_u64(layer_seed))
            })
            .collect();
        for (i, curve) in curves.iter().enumerate() {
            tracing::debug!(layer = i, points = curve.len(), "generated curve");
        }

        let (mut raster, ctx) = self.rasterizer.render(&curves, &palette)?;

        let brightened = match &self.ditherer {
            Some(d) => d.apply(&mut raster, &ctx, dither_seed)?,
            None => 0,
        };

        tracing::debug!(seed, palette = %palette.name, brightened, "generated landscape");
        Ok(Rendering {
            raster,
            palette,
            seed,
            brightened,
        })
    }
}

// Render the stock four-layer landscape for `seed`
pub fn generate_landscape(seed: u64) -> LandscapeResult<Raster> {
    Landscape::new(LandscapeConfig::default())?
        .generate(seed)
        .map(|r| r.raster)
}
