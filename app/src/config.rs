use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context as _;
use clap::Parser;
use ridgeline::{LandscapeConfig, PaletteChoice, Scheme};

#[derive(Parser, Debug)]
#[command(name = "ridgeline", version, about = "Layered fractal landscape generator")]
pub struct Cli {
    /// Seed for the whole render; a time-based seed is used when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON landscape config (size, layers, palette, sun, dither).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Palette: `random` or a built-in scheme name.
    #[arg(long, value_parser = parse_palette)]
    pub palette: Option<PaletteChoice>,

    /// Skip the dither pass.
    #[arg(long, default_value_t = false)]
    pub no_dither: bool,

    /// Render once to this PNG and exit instead of opening the viewer.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

impl Cli {
    pub fn seed_or_clock(&self) -> u64 {
        self.seed.unwrap_or_else(clock_seed)
    }

    // Config file (or the stock scene) with command-line overrides applied
    pub fn landscape_config(&self) -> anyhow::Result<LandscapeConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => LandscapeConfig::default(),
        };
        if let Some(palette) = &self.palette {
            config.palette = palette.clone();
        }
        if self.no_dither {
            config.dither.enabled = false;
        }
        Ok(config)
    }
}

pub fn parse_palette(name: &str) -> Result<PaletteChoice, String> {
    if name == "random" {
        return Ok(PaletteChoice::Random);
    }
    Scheme::from_name(name).map(PaletteChoice::Scheme).ok_or_else(|| {
        let known: Vec<&str> = Scheme::ALL.iter().map(|s| s.name()).collect();
        format!("unknown palette '{name}', expected random or one of {known:?}")
    })
}

pub fn load_config(path: &Path) -> anyhow::Result<LandscapeConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse config '{}'", path.display()))
}

pub fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(2025)
}
