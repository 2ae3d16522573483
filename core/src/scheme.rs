use image::Rgb;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{LandscapeError, LandscapeResult};

// Layer colors indexed nearest-first; the last entry is the sky.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub name: String,
    pub colors: Vec<[u8; 3]>,
}

impl Palette {
    pub fn new(name: impl Into<String>, colors: Vec<[u8; 3]>) -> Self {
        Self {
            name: name.into(),
            colors,
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    // Sky color, always the highest index
    pub fn background(&self) -> Option<Rgb<u8>> {
        self.colors.last().copied().map(Rgb)
    }

    // Color of layer `index` (0 = nearest). The background slot is not a layer.
    pub fn layer_color(&self, index: usize) -> Option<Rgb<u8>> {
        if index + 1 < self.colors.len() {
            Some(Rgb(self.colors[index]))
        } else {
            None
        }
    }

    // A palette must hold one color per layer plus the background
    pub fn validate(&self, layer_count: usize) -> LandscapeResult<()> {
        if self.colors.len() < layer_count + 1 {
            return Err(LandscapeError::configuration(format!(
                "palette '{}' has {} colors but {} layers need at least {}",
                self.name,
                self.colors.len(),
                layer_count,
                layer_count + 1
            )));
        }
        Ok(())
    }

    // Use the caller's palette if there is one, otherwise pick a built-in
    // scheme uniformly at random. Either way the result must fit the layers.
    pub fn choose<R: Rng>(
        explicit: Option<Palette>,
        layer_count: usize,
        rng: &mut R,
    ) -> LandscapeResult<Palette> {
        let palette = match explicit {
            Some(p) => p,
            None => Scheme::ALL[rng.gen_range(0..Scheme::ALL.len())].palette(),
        };
        palette.validate(layer_count)?;
        Ok(palette)
    }
}

// Built-in color schemes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scheme {
    Strahan,
    Amethyst,
    CaitlinSpice,
}

impl Scheme {
    pub const ALL: [Scheme; 3] = [Scheme::Strahan, Scheme::Amethyst, Scheme::CaitlinSpice];

    pub fn name(self) -> &'static str {
        match self {
            Scheme::Strahan => "strahan",
            Scheme::Amethyst => "amethyst",
            Scheme::CaitlinSpice => "caitlin-spice",
        }
    }

    pub fn from_name(name: &str) -> Option<Scheme> {
        Scheme::ALL.into_iter().find(|s| s.name() == name)
    }

    // The first four entries run nearest to farthest for the default
    // four-layer landscape; the two after them are spares for deeper scenes.
    pub fn palette(self) -> Palette {
        let colors = match self {
            Scheme::Strahan => vec![
                [83, 110, 147],
                [108, 136, 172],
                [141, 163, 191],
                [173, 189, 209],
                [64, 85, 114],
                [46, 61, 82],
                [239, 242, 246],
            ],
            Scheme::Amethyst => vec![
                [68, 28, 99],
                [130, 79, 138],
                [158, 98, 204],
                [195, 157, 224],
                [49, 7, 82],
                [23, 3, 38],
                [240, 203, 163],
            ],
            Scheme::CaitlinSpice => vec![
                [146, 37, 4],
                [173, 63, 13],
                [224, 113, 32],
                [246, 162, 25],
                [64, 85, 114],
                [46, 61, 82],
                [252, 248, 1],
            ],
        };
        Palette::new(self.name(), colors)
    }
}

// How a landscape picks its palette
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaletteChoice {
    #[default]
    Random,
    Scheme(Scheme),
    Custom(Palette),
}

impl PaletteChoice {
    pub fn resolve<R: Rng>(&self, layer_count: usize, rng: &mut R) -> LandscapeResult<Palette> {
        let explicit = match self {
            PaletteChoice::Random => None,
            PaletteChoice::Scheme(s) => Some(s.palette()),
            PaletteChoice::Custom(p) => Some(p.clone()),
        };
        Palette::choose(explicit, layer_count, rng)
    }
}
