use super::color::{pico8_bright, Color};
use super::Effect;
use crate::display::PixelBuffer;

use std::f32::consts::TAU;

/// Layout is authored on a 128px grid and scaled to the 640px canvas
const SCALE: f32 = 5.0;
const RING_STEP: i32 = 4;
const RING_MAX: i32 = 128;
/// Angular slots 0.0, 0.25, .. 1.5 (in turns)
const SLOTS: usize = 7;
const SLOT_SPACING: f32 = 0.25;

/// Bands of short radial ticks sweeping outward over time
pub struct RadialLines {
    palette: [Color; 8],
}

impl RadialLines {
    pub fn new() -> Self {
        Self {
            palette: pico8_bright(),
        }
    }
}

impl Default for RadialLines {
    fn default() -> Self {
        Self::new()
    }
}

/// Visible part `[v0, v1]` of a tick for ring phase `q` and slot offset `i`,
/// or `None` when the window is empty
pub(crate) fn pulse_window(q: f32, i: f32) -> Option<(f32, f32)> {
    let ramp = (q - i) * 4.0;
    let v0 = ramp.clamp(0.0, 1.0);
    let v1 = (ramp + 2.0).clamp(0.0, 1.0);
    (v1 > v0).then_some((v0, v1))
}

/// Ring phase in [0, 1); outer rings cycle faster
pub(crate) fn ring_phase(time: f32, r: i32) -> f32 {
    (time * (1.0 + r as f32 / 32.0) / 8.0).rem_euclid(1.0)
}

impl Effect for RadialLines {
    fn render(&mut self, time: f32, buffer: &mut PixelBuffer) {
        let center_x = (buffer.width() / 2) as f32;
        let center_y = (buffer.height() / 2) as f32;

        for r in (RING_STEP..=RING_MAX).step_by(RING_STEP as usize) {
            let q = ring_phase(time, r);
            let rf = r as f32;
            let color = self.palette[((r / RING_STEP) % 8) as usize];

            for slot in 0..SLOTS {
                let i = slot as f32 * SLOT_SPACING;
                let Some((v0, v1)) = pulse_window(q, i) else {
                    continue;
                };

                // Anchor on the ring, then run along a direction 3/8 turn further
                let a = i - 0.125;
                let x = center_x + (a * TAU).cos() * rf * 0.71 * SCALE;
                let y = center_y + (a * TAU).sin() * rf * 0.71 * SCALE;

                let a = a + 0.375;
                let u = (a * TAU).cos();
                let v = (a * TAU).sin();

                let len = rf * SCALE;
                buffer.line(
                    (x + u * v0 * len) as i32,
                    (y + v * v0 * len) as i32,
                    (x + u * v1 * len) as i32,
                    (y + v * v1 * len) as i32,
                    color,
                );
            }
        }
    }

    fn name(&self) -> &str {
        "Radial Lines"
    }
}
