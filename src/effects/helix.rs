use super::{color, Effect};
use crate::display::PixelBuffer;

use std::f32::consts::TAU;

// Speed controls
const GLOBAL_SPEED: f32 = 5.0;
const ARM_ROTATION_SPEED: f32 = 1.2;
const COLOR_SPEED: f32 = 1.3;

const DISK_SCALE: f32 = 2.5;
const ARMS: usize = 8;

// Vertical sweep: -4.0..=4.0 in 0.04 steps
const Y_MIN: f32 = -4.0;
const Y_STEP: f32 = 0.04;
const Y_ROWS: usize = 201;

const NEAR_PLANE: f32 = 0.1;
const MIN_DISK: f32 = 0.5;

/// Rotating ribbon of glow disks seen in perspective
pub struct Helix;

impl Helix {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Helix {
    fn default() -> Self {
        Self::new()
    }
}

/// One projected disk: screen position, radius and color
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Disk {
    pub x: i32,
    pub y: i32,
    pub radius: i32,
    pub color: color::Color,
}

/// Project every visible disk for `time`, back rows first
pub(crate) fn disks(time: f32, width: u32, height: u32, mut emit: impl FnMut(Disk)) {
    let t = time * GLOBAL_SPEED;
    let center_x = (width / 2) as f32;
    let center_y = (height / 2) as f32;
    let w = width as f32;
    let h = height as f32;

    for row in 0..Y_ROWS {
        let y = Y_MIN + row as f32 * Y_STEP;

        // Spiral twist and radius modulation for this slice
        let q = (y / (7.0 + (t / 7.0).cos() * 3.0) + t / 18.0 * ARM_ROTATION_SPEED).cos() / 15.0;
        let r = (t / 12.0 + y / 14.0).cos() * 0.7;

        for step in 0..ARMS {
            let a = step as f32 / ARMS as f32 * TAU + t * q;
            let x = a.cos() * r;
            let z = r * a.sin() + 1.0;

            if z <= NEAR_PLANE {
                continue;
            }
            let size = 1.5 / z * DISK_SCALE;
            if size <= MIN_DISK {
                continue;
            }

            let hue = (t * 0.1 * COLOR_SPEED + a / TAU).rem_euclid(1.0);
            emit(Disk {
                // Truncate the absolute position, not the offset from centre
                x: (center_x + x * w / 4.0 / z) as i32,
                y: (center_y + y * h / 4.0 / z) as i32,
                radius: size as i32,
                color: color::hsv(hue, 0.8, 1.0),
            });
        }
    }
}

impl Effect for Helix {
    fn render(&mut self, time: f32, buffer: &mut PixelBuffer) {
        let (width, height) = (buffer.width(), buffer.height());
        disks(time, width, height, |d| buffer.draw_circle(d.x, d.y, d.radius, d.color));
    }

    fn name(&self) -> &str {
        "Helix"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{VIDEO_HEIGHT, VIDEO_WIDTH};

    #[test]
    fn test_disks_are_visible_and_sized() {
        let mut count = 0;
        disks(3.7, VIDEO_WIDTH, VIDEO_HEIGHT, |d| {
            count += 1;
            assert!(d.radius >= 0);
            // z > 0.1 bounds the disk at 1.5 / 0.1 * 2.5
            assert!(d.radius <= 37);
            assert_eq!(d.color >> 24, 0xFF);
        });
        assert!(count > 0);
        assert!(count <= Y_ROWS * ARMS);
    }

    /// Straight per-disk projection, positions only
    fn reference_positions(time: f32) -> Vec<(i32, i32)> {
        let t = time * 5.0;
        let mut out = Vec::new();
        for row in 0..201 {
            let y = -4.0 + row as f32 * 0.04;
            let q = (y / (7.0 + (t / 7.0).cos() * 3.0) + t / 18.0 * 1.2).cos() / 15.0;
            let r = (t / 12.0 + y / 14.0).cos() * 0.7;
            for step in 0..8 {
                let a = step as f32 / 8.0 * TAU + t * q;
                let z = r * a.sin() + 1.0;
                if z <= 0.1 || 1.5 / z * 2.5 <= 0.5 {
                    continue;
                }
                let px = 320.0 + a.cos() * r * 640.0 / 4.0 / z;
                let py = 240.0 + y * 480.0 / 4.0 / z;
                out.push((px as i32, py as i32));
            }
        }
        out
    }

    #[test]
    fn test_positions_truncate_absolute_coordinates() {
        for time in [0.0, 1.1, 3.7] {
            let mut got = Vec::new();
            disks(time, VIDEO_WIDTH, VIDEO_HEIGHT, |d| got.push((d.x, d.y)));
            assert_eq!(got, reference_positions(time), "t={}", time);
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let mut a = PixelBuffer::new();
        let mut b = PixelBuffer::new();
        Helix::new().render(1.25, &mut a);
        Helix::new().render(1.25, &mut b);
        assert_eq!(a.as_slice(), b.as_slice());
        assert!(a.as_slice().iter().any(|&c| c != 0));
    }

    #[test]
    fn test_render_differs_over_time() {
        let mut a = PixelBuffer::new();
        let mut b = PixelBuffer::new();
        let mut helix = Helix::new();
        helix.render(0.5, &mut a);
        helix.render(2.5, &mut b);
        assert_ne!(a.as_slice(), b.as_slice());
    }
}
