use super::color::PICO8;
use super::Effect;
use crate::display::PixelBuffer;

const TIME_SCALE: f32 = 15.0;
const BEAM_RADIUS: f32 = 180.0;
/// Beam index runs 0.0, 0.25, .. 23.75
const BEAM_COUNT: usize = 96;
const BEAM_SPACING: f32 = 0.25;
const SUBSTEPS: usize = 128;
const THICKNESS: i32 = 4;
const HEAT_LEVELS: u8 = 16;

/// Heat level -> PICO-8 palette index.
/// Levels 0-3 stay black, 4-5 red, 6-7 pink, everything hotter is white.
const HEAT_REMAP: [usize; 16] = [0, 0, 0, 0, 8, 8, 14, 14, 7, 7, 7, 7, 7, 7, 7, 7];

/// Crossing rotating laser beams.
///
/// Beams are stamped into a per-pixel heat buffer first, then the whole
/// buffer is resolved through the palette, so overlaps brighten without any
/// per-pixel blending.
pub struct Laser {
    heat: Vec<u8>,
    width: u32,
    height: u32,
}

impl Laser {
    pub fn new() -> Self {
        Self {
            heat: Vec::new(),
            width: 0,
            height: 0,
        }
    }

    fn reset_heat(&mut self, width: u32, height: u32) {
        let len = (width * height) as usize;
        if self.width != width || self.height != height || self.heat.len() != len {
            self.heat = vec![0; len];
            self.width = width;
            self.height = height;
        } else {
            self.heat.fill(0);
        }
    }

    /// Stamp a square kernel centred on (x, y)
    fn stamp(&mut self, x: i32, y: i32) {
        let w = self.width as i32;
        let h = self.height as i32;
        let half = THICKNESS / 2;
        for ty in -half..=half {
            let ny = y + ty;
            if ny < 0 || ny >= h {
                continue;
            }
            for tx in -half..=half {
                let nx = x + tx;
                if nx < 0 || nx >= w {
                    continue;
                }
                let cell = &mut self.heat[(ny * w + nx) as usize];
                *cell = (*cell + 1) % HEAT_LEVELS;
            }
        }
    }

    /// Walk a beam in fixed sub-steps, stamping each sample
    fn stamp_beam(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        let dx = (x1 - x0) / SUBSTEPS as f32;
        let dy = (y1 - y0) / SUBSTEPS as f32;
        let mut x = x0;
        let mut y = y0;
        for _ in 0..SUBSTEPS {
            self.stamp(x as i32, y as i32);
            x += dx;
            y += dy;
        }
    }

    pub(crate) fn heat(&self) -> &[u8] {
        &self.heat
    }
}

impl Default for Laser {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Laser {
    fn render(&mut self, time: f32, buffer: &mut PixelBuffer) {
        self.reset_heat(buffer.width(), buffer.height());

        let t = time * TIME_SCALE;
        let center_x = (buffer.width() / 2) as f32;
        let center_y = (buffer.height() / 2) as f32;

        for beam in 0..BEAM_COUNT {
            let i = beam as f32 * BEAM_SPACING;
            let angle0 = i * t / 240.0;
            let angle1 = angle0 + i * t / 160.0;

            self.stamp_beam(
                center_x + angle0.cos() * BEAM_RADIUS,
                center_y + angle0.sin() * BEAM_RADIUS,
                center_x + angle1.cos() * BEAM_RADIUS,
                center_y + angle1.sin() * BEAM_RADIUS,
            );
        }

        for (dst, &level) in buffer.as_mut_slice().iter_mut().zip(&self.heat) {
            *dst = PICO8[HEAT_REMAP[level as usize]];
        }
    }

    fn name(&self) -> &str {
        "Laser"
    }
}
