mod helix;
mod laser;
mod noise;
mod radial_lines;
mod testpattern;

pub use helix::Helix;
pub use laser::Laser;
pub use noise::Noise;
pub use radial_lines::RadialLines;
pub use testpattern::TestPattern;

use crate::display::PixelBuffer;

/// Trait for all benchmark demos
///
/// A demo is a function of elapsed time: given the seconds since its screen
/// started, it draws one frame. Demos that do not touch every pixel rely on
/// the caller clearing the buffer first.
pub trait Effect {
    /// Render the frame for `time` seconds into the pixel buffer
    fn render(&mut self, time: f32, buffer: &mut PixelBuffer);

    /// Effect name for UI/logging
    fn name(&self) -> &str;
}

/// Look up a demo by its short command-line name
pub fn by_name(name: &str) -> Option<Box<dyn Effect>> {
    let effect: Box<dyn Effect> = match name.to_ascii_lowercase().as_str() {
        "helix" => Box::new(Helix::new()),
        "laser" => Box::new(Laser::new()),
        "radial" | "radial-lines" | "radial_lines" => Box::new(RadialLines::new()),
        "noise" => Box::new(Noise::new()),
        "test" | "testpattern" | "test-pattern" => Box::new(TestPattern::new()),
        _ => return None,
    };
    Some(effect)
}

/// Every demo, benchmark cycle order first, then the legacy test pattern
pub fn all() -> Vec<Box<dyn Effect>> {
    vec![
        Box::new(Helix::new()),
        Box::new(Laser::new()),
        Box::new(RadialLines::new()),
        Box::new(Noise::new()),
        Box::new(TestPattern::new()),
    ]
}

/// Color utilities for effects
pub mod color {
    use crate::util::hsv_to_rgb;

    /// Packed `0xAARRGGBB` sample
    pub type Color = u32;

    pub const BLACK: Color = 0xFF00_0000;
    pub const WHITE: Color = 0xFFFF_FFFF;

    /// Pack opaque RGB
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32
    }

    /// Unpack (r, g, b), ignoring the top byte
    #[inline]
    pub const fn channels(c: Color) -> (u8, u8, u8) {
        ((c >> 16) as u8, (c >> 8) as u8, c as u8)
    }

    /// HSV (hue in turns) to a packed opaque color
    #[inline]
    pub fn hsv(h: f32, s: f32, v: f32) -> Color {
        let (r, g, b) = hsv_to_rgb(h, s, v);
        rgb(r, g, b)
    }

    /// PICO-8 16-color palette
    pub const PICO8: [Color; 16] = [
        rgb(0x00, 0x00, 0x00), // black
        rgb(0x1D, 0x2B, 0x53), // dark blue
        rgb(0x7E, 0x25, 0x53), // purple
        rgb(0x00, 0x87, 0x51), // green
        rgb(0xAB, 0x52, 0x36), // brown
        rgb(0x5F, 0x57, 0x4F), // dark gray
        rgb(0xC2, 0xC3, 0xC7), // light gray
        rgb(0xFF, 0xF1, 0xE8), // white
        rgb(0xFF, 0x00, 0x4D), // red
        rgb(0xFF, 0xA3, 0x00), // orange
        rgb(0xFF, 0xEC, 0x27), // yellow
        rgb(0x00, 0xE4, 0x36), // lime
        rgb(0x29, 0xAD, 0xFF), // blue
        rgb(0x83, 0x76, 0x9C), // lavender
        rgb(0xFF, 0x77, 0xA8), // pink
        rgb(0xFF, 0xCC, 0xAA), // peach
    ];

    /// Upper half of the PICO-8 palette (red through peach)
    pub fn pico8_bright() -> [Color; 8] {
        let mut out = [0; 8];
        out.copy_from_slice(&PICO8[8..]);
        out
    }
}
