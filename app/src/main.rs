mod config;

use std::path::Path;
use std::time::Instant;

use anyhow::Context as _;
use clap::Parser;
use eframe::{App, Frame, NativeOptions, egui, run_native};
use egui::{ColorImage, TextureHandle, Vec2};
use ridgeline::{
    Exemption, Landscape, LandscapeConfig, PaletteChoice, Raster, Rendering, Scheme,
};
use tracing_subscriber::EnvFilter;

use crate::config::{Cli, clock_seed};

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
enum PaletteSelect {
    // whatever the loaded config asks for
    Configured,
    Random,
    Scheme(Scheme),
}

impl PaletteSelect {
    fn label(self) -> &'static str {
        match self {
            PaletteSelect::Configured => "from config",
            PaletteSelect::Random => "random",
            PaletteSelect::Scheme(s) => s.name(),
        }
    }
}

struct LandscapeApp {
    // scene loaded at startup; the controls below override parts of it
    base: LandscapeConfig,

    // parameters
    seed: u64,
    palette: PaletteSelect,
    dither: bool,
    dither_probability: f64,
    brighten: f32,
    exemption: Exemption,

    // generated texture
    texture: Option<TextureHandle>,

    // status line
    status_message: String,

    // last finished image, kept for saving
    last: Option<Rendering>,
}

impl LandscapeApp {
    fn new(base: LandscapeConfig, seed: u64) -> Self {
        Self {
            seed,
            palette: PaletteSelect::Configured,
            dither: base.dither.enabled,
            dither_probability: base.dither.probability,
            brighten: base.dither.brighten,
            exemption: base.dither.exemption,
            base,
            texture: None,
            status_message: String::new(),
            last: None,
        }
    }

    fn current_config(&self) -> LandscapeConfig {
        let mut config = self.base.clone();
        match self.palette {
            PaletteSelect::Configured => {}
            PaletteSelect::Random => config.palette = PaletteChoice::Random,
            PaletteSelect::Scheme(s) => config.palette = PaletteChoice::Scheme(s),
        }
        config.dither.enabled = self.dither;
        config.dither.probability = self.dither_probability;
        config.dither.brighten = self.brighten;
        config.dither.exemption = self.exemption;
        config
    }

    fn generate(&mut self, ctx: &egui::Context) {
        let start = Instant::now();
        let result = Landscape::new(self.current_config()).and_then(|l| l.generate(self.seed));
        match result {
            Ok(rendering) => {
                let color_image = to_color_image(&rendering.raster);
                self.texture =
                    Some(ctx.load_texture("landscape", color_image, egui::TextureOptions::NEAREST));
                let ms = start.elapsed().as_secs_f32() * 1000.0;
                self.status_message = format!(
                    "Generated in {:.2} ms (seed {}, palette {})",
                    ms, self.seed, rendering.palette.name
                );
                self.last = Some(rendering);
            }
            Err(e) => {
                tracing::warn!(error = %e, "generation failed");
                self.status_message = e.to_string();
            }
        }
        ctx.request_repaint();
    }

    fn save(&mut self) {
        let Some(rendering) = &self.last else {
            self.status_message = "Nothing to save yet".into();
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(format!("landscape_{}.png", rendering.seed))
            .save_file()
        else {
            return;
        };
        self.status_message = match write_png(&rendering.raster, &path) {
            Ok(()) => format!("Saved {}", path.display()),
            Err(e) => format!("{e:#}"),
        };
    }
}

impl App for LandscapeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        egui::SidePanel::left("controls").show(ctx, |ui| {
            ui.heading("Landscape Generator");
            ui.separator();

            // Seed
            ui.label("Seed");
            ui.horizontal(|ui| {
                ui.add(egui::DragValue::new(&mut self.seed).speed(1.0));
                if ui.button("Next").clicked() {
                    self.seed = self.seed.wrapping_add(1);
                }
                if ui.button("Shuffle").clicked() {
                    self.seed = clock_seed();
                }
            });

            // Palette selector
            ui.label("Palette");
            egui::ComboBox::from_label("Scheme")
                .selected_text(self.palette.label())
                .show_ui(ui, |ui| {
                    for choice in [PaletteSelect::Configured, PaletteSelect::Random] {
                        ui.selectable_value(&mut self.palette, choice, choice.label());
                    }
                    for scheme in Scheme::ALL {
                        let choice = PaletteSelect::Scheme(scheme);
                        ui.selectable_value(&mut self.palette, choice, choice.label());
                    }
                });

            // Dither
            ui.checkbox(&mut self.dither, "Dither");
            if self.dither {
                ui.label("Probability");
                ui.add(egui::Slider::new(&mut self.dither_probability, 0.0..=1.0));
                ui.label("Brighten");
                ui.add(egui::Slider::new(&mut self.brighten, 0.0..=0.5));
                egui::ComboBox::from_label("Exempt")
                    .selected_text(format!("{:?}", self.exemption))
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut self.exemption, Exemption::ExactColor, "ExactColor");
                        ui.selectable_value(&mut self.exemption, Exemption::TerrainMask, "TerrainMask");
                    });
            }

            ui.separator();

            if ui.button("Generate Landscape").clicked() {
                self.generate(ctx);
            }

            if ui.button("Save PNG…").clicked() {
                self.save();
            }

            ui.separator();
            ui.label(&self.status_message);
        });

        // central display
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(tex) = &self.texture {
                let [w, h] = tex.size();
                let available = ui.available_size();
                let scale = (available.x / w as f32).min(available.y / h as f32);
                ui.image((tex.id(), Vec2::new(w as f32 * scale, h as f32 * scale)));
            } else {
                ui.centered_and_justified(|ui| {
                    ui.label("Click “Generate Landscape” to start");
                });
            }
        });
    }
}

fn to_color_image(raster: &Raster) -> ColorImage {
    let (w, h) = raster.dimensions();
    ColorImage::from_rgba_unmultiplied([w as usize, h as usize], raster.as_raw())
}

fn write_png(raster: &Raster, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    raster
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", path.display()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = cli.landscape_config()?;
    let seed = cli.seed_or_clock();

    if let Some(out) = &cli.out {
        let rendering = Landscape::new(config)?.generate(seed)?;
        write_png(&rendering.raster, out)?;
        tracing::info!(
            path = %out.display(),
            seed,
            palette = %rendering.palette.name,
            "wrote landscape"
        );
        return Ok(());
    }

    let opts = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 600.0])
            .with_min_inner_size([640.0, 360.0]),
        ..Default::default()
    };
    run_native(
        "Ridgeline",
        opts,
        Box::new(move |_cc| Ok(Box::new(LandscapeApp::new(config, seed)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}
