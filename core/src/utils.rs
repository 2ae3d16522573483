use image::{Rgb, Rgba};

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

// Height on the straight line through a and b at horizontal position x
#[inline]
pub fn lerp_height(a_x: f64, a_y: f64, b_x: f64, b_y: f64, x: f64) -> f64 {
    a_y + (b_y - a_y) / (b_x - a_x) * (x - a_x)
}

// Fully opaque pixel of the given color
#[inline]
pub fn opaque(color: Rgb<u8>) -> Rgba<u8> {
    let [r, g, b] = color.0;
    Rgba([r, g, b, 255])
}

// Map a [0,1] channel back to 8 bits, rounding to the nearest value
#[inline]
pub fn to_channel(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}
