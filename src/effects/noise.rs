use super::color::rgb;
use super::Effect;
use crate::display::PixelBuffer;
use crate::util::Rng;

/// Full-screen random static: every pixel an independent random color
pub struct Noise {
    rng: Rng,
}

impl Noise {
    pub fn new() -> Self {
        Self {
            rng: Rng::from_time(),
        }
    }

    /// Reproducible static for a given seed
    pub fn with_seed(seed: u64) -> Self {
        Self { rng: Rng::new(seed) }
    }
}

impl Default for Noise {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Noise {
    fn render(&mut self, _time: f32, buffer: &mut PixelBuffer) {
        for px in buffer.as_mut_slice() {
            let [_, r, g, b] = self.rng.next_u32().to_be_bytes();
            *px = rgb(r, g, b);
        }
    }

    fn name(&self) -> &str {
        "Noise"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_every_pixel_opaque() {
        let mut buffer = PixelBuffer::with_size(64, 48);
        Noise::with_seed(7).render(0.0, &mut buffer);
        assert!(buffer.as_slice().iter().all(|&c| c >> 24 == 0xFF));
    }

    #[test]
    fn test_frames_are_not_coherent() {
        let mut a = PixelBuffer::with_size(64, 48);
        let mut b = PixelBuffer::with_size(64, 48);
        let mut noise = Noise::with_seed(7);
        noise.render(0.0, &mut a);
        noise.render(0.0, &mut b);
        assert_ne!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = PixelBuffer::with_size(16, 16);
        let mut b = PixelBuffer::with_size(16, 16);
        Noise::with_seed(99).render(0.0, &mut a);
        Noise::with_seed(99).render(5.0, &mut b);
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn test_channels_spread() {
        let mut buffer = PixelBuffer::with_size(64, 64);
        Noise::with_seed(1234).render(0.0, &mut buffer);
        let mean_red = buffer
            .as_slice()
            .iter()
            .map(|&c| ((c >> 16) & 0xFF) as f32)
            .sum::<f32>()
            / buffer.as_slice().len() as f32;
        assert!((mean_red - 127.5).abs() < 20.0, "mean red {}", mean_red);
    }
}
