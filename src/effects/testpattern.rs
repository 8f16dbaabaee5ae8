use super::color::{rgb, Color};
use super::Effect;
use crate::display::PixelBuffer;

const RED: Color = rgb(255, 0, 0);
const GREEN: Color = rgb(0, 255, 0);
const BLUE: Color = rgb(0, 0, 255);

/// Three orbiting sets of dashed concentric rings (red, green, blue).
///
/// Kept from the first benchmark build; not part of the timed cycle.
pub struct TestPattern;

impl TestPattern {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TestPattern {
    fn default() -> Self {
        Self::new()
    }
}

/// Ring-set centre for phase key `p` (2, 4 or 8) at `time`
pub(crate) fn orbit_center(time: f32, p: i32, width: u32, height: u32) -> (i32, i32) {
    let phase_x = time / 6.0 + p as f32 / 3.0;
    let phase_y = time / 5.0 + p as f32 / 5.0;
    (
        (width / 2) as i32 + (phase_x.cos() * 21.0) as i32,
        (height / 2) as i32 + (phase_y.cos() * 25.0) as i32,
    )
}

impl Effect for TestPattern {
    fn render(&mut self, time: f32, buffer: &mut PixelBuffer) {
        buffer.clear();

        for (p, color) in [(2, RED), (4, GREEN), (8, BLUE)] {
            let (cx, cy) = orbit_center(time, p, buffer.width(), buffer.height());

            // Largest first so smaller discs paint over; every other step is a gap
            for r in (4..=128).rev().step_by(4) {
                if r & 4 == 0 {
                    continue;
                }
                buffer.fill_circle(cx, cy, r, color);
            }
        }
    }

    fn name(&self) -> &str {
        "Test Pattern"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orbit_stays_near_center() {
        for i in 0..100 {
            let (x, y) = orbit_center(i as f32 * 0.37, 4, 640, 480);
            assert!((x - 320).abs() <= 21);
            assert!((y - 240).abs() <= 25);
        }
    }

    #[test]
    fn test_blue_set_is_drawn_last() {
        let mut buffer = PixelBuffer::new();
        TestPattern::new().render(0.0, &mut buffer);
        let (cx, cy) = orbit_center(0.0, 8, 640, 480);
        // Radius 4 disc of the last set covers its own centre
        assert_eq!(buffer.get_pixel(cx, cy), Some(BLUE));
    }

    #[test]
    fn test_only_primary_colors() {
        let mut buffer = PixelBuffer::new();
        TestPattern::new().render(3.0, &mut buffer);
        assert!(buffer
            .as_slice()
            .iter()
            .all(|&c| c == 0 || c == RED || c == GREEN || c == BLUE));
    }
}
