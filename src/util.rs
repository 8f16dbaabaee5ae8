//! Shared utilities

use std::collections::VecDeque;

/// Simple deterministic RNG using xorshift64
pub struct Rng {
    state: u64,
}

impl Rng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) } // Ensure non-zero
    }

    /// Seed from the system clock
    pub fn from_time() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x9E37_79B9_7F4A_7C15);
        Self::new(nanos)
    }

    /// Get the next random u64
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Get a random u32
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }
}

/// HSV to RGB color conversion
/// h: turns (wraps, 1.0 = 360 degrees), s: 0-1, v: 0-1
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (u8, u8, u8) {
    // rem_euclid rounds tiny negatives up to exactly 1.0
    let h6 = h.rem_euclid(1.0) * 6.0;
    let h6 = if h6 >= 6.0 { 0.0 } else { h6 };
    let i = h6.floor();
    let f = h6 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let (r, g, b) = match i as i32 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    (
        (r.clamp(0.0, 1.0) * 255.0) as u8,
        (g.clamp(0.0, 1.0) * 255.0) as u8,
        (b.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

// ============================================================================
// FPS Counter
// ============================================================================

/// FPS counter with rolling average, driven by caller-supplied timestamps
pub struct FpsCounter {
    frame_times: VecDeque<f32>,
    last_frame: Option<f64>,
    sample_count: usize,
}

impl FpsCounter {
    /// Create a new FPS counter with specified sample window
    pub fn new(sample_count: usize) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(sample_count),
            last_frame: None,
            sample_count: sample_count.max(1),
        }
    }

    /// Record a frame at `now` seconds.
    /// Returns (delta_time, average_fps)
    pub fn tick(&mut self, now: f64) -> (f32, f32) {
        let dt = self.last_frame.map_or(0.0, |last| (now - last).max(0.0) as f32);
        self.last_frame = Some(now);

        if dt > 0.0 {
            self.frame_times.push_back(dt);
            if self.frame_times.len() > self.sample_count {
                self.frame_times.pop_front();
            }
        }

        (dt, self.avg_fps())
    }

    pub fn avg_fps(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        let avg_dt = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        if avg_dt > 0.0 {
            1.0 / avg_dt
        } else {
            0.0
        }
    }

    /// Get the average frame time in milliseconds
    pub fn avg_frame_time_ms(&self) -> f32 {
        let avg_dt: f32 =
            self.frame_times.iter().sum::<f32>() / self.frame_times.len().max(1) as f32;
        avg_dt * 1000.0
    }
}
