use image::{Rgb, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::curve::Curve;
use crate::error::{LandscapeError, LandscapeResult};
use crate::sampler::sample_within;
use crate::scheme::Palette;
use crate::utils::{WHITE, opaque};

// Finished landscape, RGBA8 row-major
pub type Raster = RgbaImage;

// Solid white disc inscribed in an inclusive pixel bounding box
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sun {
    pub min: [u32; 2],
    pub max: [u32; 2],
}

impl Default for Sun {
    fn default() -> Self {
        Self {
            min: [50, 25],
            max: [100, 75],
        }
    }
}

impl Sun {
    // Ellipse test without division so zero-width boxes still paint a line
    fn contains(&self, x: u32, y: u32) -> bool {
        let cx = (self.min[0] + self.max[0]) as f64 / 2.0;
        let cy = (self.min[1] + self.max[1]) as f64 / 2.0;
        let rx = (self.max[0] - self.min[0]) as f64 / 2.0;
        let ry = (self.max[1] - self.min[1]) as f64 / 2.0;
        let dx = x as f64 - cx;
        let dy = y as f64 - cy;
        dx * dx * ry * ry + dy * dy * rx * rx <= rx * rx * ry * ry
    }
}

// What the dither pass needs to know about a render: the sky color in effect
// and which pixels ended up covered by terrain.
#[derive(Clone, Debug)]
pub struct RenderContext {
    background: Rgb<u8>,
    width: u32,
    height: u32,
    terrain: Vec<bool>,
}

impl RenderContext {
    pub fn new(background: Rgb<u8>, width: u32, height: u32) -> Self {
        Self {
            background,
            width,
            height,
            terrain: vec![false; width as usize * height as usize],
        }
    }

    pub fn background(&self) -> Rgb<u8> {
        self.background
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_terrain(&self, x: u32, y: u32) -> bool {
        self.terrain[self.index(x, y)]
    }

    pub fn terrain_row(&self, y: u32) -> &[bool] {
        let start = self.index(0, y);
        &self.terrain[start..start + self.width as usize]
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn cover(&mut self, x: u32, y: u32) {
        let i = self.index(x, y);
        self.terrain[i] = true;
    }
}

// Paints sky, sun and layers into a fresh raster
pub struct Rasterizer {
    width: u32,
    height: u32,
    sun: Option<Sun>,
}

impl Rasterizer {
    pub fn new(width: u32, height: u32, sun: Option<Sun>) -> LandscapeResult<Self> {
        if width == 0 || height == 0 {
            return Err(LandscapeError::configuration(format!(
                "image must be at least 1x1, got {width}x{height}"
            )));
        }
        if let Some(s) = sun
            && (s.min[0] > s.max[0] || s.min[1] > s.max[1])
        {
            return Err(LandscapeError::configuration(format!(
                "sun box min {:?} exceeds max {:?}",
                s.min, s.max
            )));
        }
        Ok(Self { width, height, sun })
    }

    // `layers` run farthest to nearest and are painted in that order, each as
    // full-height columns down to the bottom row, so nearer terrain covers
    // whatever was drawn before it. Only columns inside the raster are sampled.
    // The layer drawn last takes palette index 0.
    #[tracing::instrument(skip_all, fields(layers = layers.len(), palette = %palette.name))]
    pub fn render(
        &self,
        layers: &[Curve],
        palette: &Palette,
    ) -> LandscapeResult<(Raster, RenderContext)> {
        palette.validate(layers.len())?;
        let background = palette
            .background()
            .ok_or_else(|| LandscapeError::configuration("palette has no background color"))?;

        let mut raster = Raster::from_pixel(self.width, self.height, opaque(background));
        let mut ctx = RenderContext::new(background, self.width, self.height);

        if let Some(sun) = &self.sun {
            self.paint_sun(&mut raster, sun);
        }

        let bottom = self.height - 1;
        for (depth, layer) in layers.iter().enumerate() {
            let index = layers.len() - 1 - depth;
            let color = palette.layer_color(index).map(opaque).ok_or_else(|| {
                LandscapeError::configuration(format!("palette has no color for layer {index}"))
            })?;

            let sampled = sample_within(layer, 0, i64::from(self.width) - 1);
            let mut columns = 0usize;
            for (col, y) in sampled.columns() {
                // Terrain below the image leaves the column alone
                if y < 0.0 {
                    continue;
                }
                let col = col as u32;
                // Row of the terrain top; heights in [0, 1) still cover the bottom row
                let top = (self.height as f64 - y).round().clamp(0.0, bottom as f64) as u32;
                for row in top..=bottom {
                    raster.put_pixel(col, row, color);
                    ctx.cover(col, row);
                }
                columns += 1;
            }
            tracing::debug!(layer = index, samples = sampled.len(), columns, "painted layer");
        }

        Ok((raster, ctx))
    }

    fn paint_sun(&self, raster: &mut Raster, sun: &Sun) {
        let x_end = sun.max[0].min(self.width - 1);
        let y_end = sun.max[1].min(self.height - 1);
        for y in sun.min[1]..=y_end {
            for x in sun.min[0]..=x_end {
                if sun.contains(x, y) {
                    raster.put_pixel(x, y, WHITE);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::{Rasterizer, Sun};
    use crate::curve::{Curve, Point};
    use crate::error::LandscapeError;
    use crate::scheme::Palette;

    const A: [u8; 3] = [200, 210, 220];
    const B: [u8; 3] = [20, 30, 40];
    const C: [u8; 3] = [90, 60, 30];

    fn flat(height: f64, width: f64) -> Curve {
        Curve::new(vec![Point::new(0.0, height), Point::new(width, height)])
    }

    fn rgba(c: [u8; 3]) -> Rgba<u8> {
        Rgba([c[0], c[1], c[2], 255])
    }

    #[test]
    fn flat_layer_fills_bottom_row() {
        let r = Rasterizer::new(4, 4, None).unwrap();
        let palette = Palette::new("ab", vec![B, A]);
        let (raster, ctx) = r.render(&[flat(0.0, 3.0)], &palette).unwrap();

        for y in 0..4 {
            for x in 0..4 {
                let expected = if y == 3 { rgba(B) } else { rgba(A) };
                assert_eq!(*raster.get_pixel(x, y), expected, "pixel ({x},{y})");
                assert_eq!(ctx.is_terrain(x, y), y == 3);
            }
        }
        assert_eq!(ctx.background().0, A);
    }

    #[test]
    fn nearer_layer_occludes_farther() {
        let r = Rasterizer::new(3, 4, None).unwrap();
        // nearest first: C is near, B is far, A is sky
        let palette = Palette::new("abc", vec![C, B, A]);
        let far = flat(3.0, 2.0);
        let near = flat(1.0, 2.0);
        let (raster, _) = r.render(&[far, near], &palette).unwrap();

        for x in 0..3 {
            assert_eq!(*raster.get_pixel(x, 0), rgba(A));
            assert_eq!(*raster.get_pixel(x, 1), rgba(B));
            assert_eq!(*raster.get_pixel(x, 2), rgba(B));
            assert_eq!(*raster.get_pixel(x, 3), rgba(C));
        }
    }

    #[test]
    fn layers_only_cover_their_columns() {
        let r = Rasterizer::new(6, 3, None).unwrap();
        let palette = Palette::new("ab", vec![B, A]);
        let partial = Curve::new(vec![Point::new(2.0, 3.0), Point::new(9.0, 3.0)]);
        let (raster, _) = r.render(&[partial], &palette).unwrap();

        for y in 0..3 {
            assert_eq!(*raster.get_pixel(0, y), rgba(A));
            assert_eq!(*raster.get_pixel(1, y), rgba(A));
            for x in 2..6 {
                assert_eq!(*raster.get_pixel(x, y), rgba(B));
            }
        }
    }

    #[test]
    fn sun_is_white_and_sits_under_terrain() {
        let sun = Sun {
            min: [2, 2],
            max: [6, 6],
        };
        let r = Rasterizer::new(10, 10, Some(sun)).unwrap();
        let palette = Palette::new("ab", vec![B, A]);
        let (raster, ctx) = r.render(&[flat(5.0, 9.0)], &palette).unwrap();

        // centre of the disc is above the terrain line, corner of the box is outside the disc
        assert_eq!(*raster.get_pixel(4, 4), Rgba([255, 255, 255, 255]));
        assert!(!ctx.is_terrain(4, 4));
        assert_eq!(*raster.get_pixel(2, 2), rgba(A));
        // rows from 5 down belong to the layer
        assert_eq!(*raster.get_pixel(4, 5), rgba(B));
        assert_eq!(*raster.get_pixel(4, 6), rgba(B));
    }

    #[test]
    fn sun_clipped_to_raster() {
        let r = Rasterizer::new(4, 4, Some(Sun::default())).unwrap();
        let palette = Palette::new("ab", vec![B, A]);
        let (raster, _) = r.render(&[], &palette).unwrap();
        assert!(raster.pixels().all(|p| *p == rgba(A)));
    }

    #[test]
    fn short_palette_fails_before_painting() {
        let r = Rasterizer::new(4, 4, None).unwrap();
        let palette = Palette::new("a", vec![A, B]);
        let err = r
            .render(&[flat(1.0, 3.0), flat(2.0, 3.0)], &palette)
            .unwrap_err();
        assert!(matches!(err, LandscapeError::Configuration(_)));
    }

    #[test]
    fn rejects_empty_image() {
        assert!(Rasterizer::new(0, 10, None).is_err());
        assert!(Rasterizer::new(10, 0, None).is_err());
    }

    #[test]
    fn terrain_below_the_image_paints_nothing() {
        let r = Rasterizer::new(5, 3, None).unwrap();
        let palette = Palette::new("ab", vec![B, A]);
        // heights -2, -1, 0, 1, 2 across the five columns
        let slope = Curve::new(vec![Point::new(0.0, -2.0), Point::new(4.0, 2.0)]);
        let (raster, ctx) = r.render(&[slope], &palette).unwrap();

        for y in 0..3 {
            assert_eq!(*raster.get_pixel(0, y), rgba(A));
            assert_eq!(*raster.get_pixel(1, y), rgba(A));
            assert!(!ctx.is_terrain(1, y));
        }
        // height 0 still takes the bottom row
        assert_eq!(*raster.get_pixel(2, 2), rgba(B));
        assert_eq!(*raster.get_pixel(2, 1), rgba(A));
        assert_eq!(*raster.get_pixel(3, 1), rgba(A));
        assert_eq!(*raster.get_pixel(3, 2), rgba(B));
        assert_eq!(*raster.get_pixel(4, 0), rgba(A));
        assert_eq!(*raster.get_pixel(4, 1), rgba(B));
    }

    #[test]
    fn far_reaching_anchors_clip_to_raster() {
        let r = Rasterizer::new(8, 8, None).unwrap();
        let palette = Palette::new("ab", vec![B, A]);
        let wide = Curve::new(vec![Point::new(-1e300, 2.0), Point::new(1e300, 2.0)]);
        let (raster, ctx) = r.render(&[wide], &palette).unwrap();

        for x in 0..8 {
            assert_eq!(*raster.get_pixel(x, 5), rgba(A));
            assert_eq!(*raster.get_pixel(x, 6), rgba(B));
            assert!(ctx.is_terrain(x, 7));
        }
    }
}
