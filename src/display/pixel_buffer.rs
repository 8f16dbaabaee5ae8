use crate::effects::color::Color;
use crate::{VIDEO_HEIGHT, VIDEO_WIDTH};

// ============================================================================
// PixelBuffer
// ============================================================================

/// Packed XRGB8888 pixel buffer for software rendering.
///
/// Each sample is a `u32` laid out `0xAARRGGBB`, rows are stored top to
/// bottom with a stride of `width * 4` bytes. Every demo renders into this
/// canvas; the host owns it and lends it out once per tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Vec<Color>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create a new pixel buffer with the benchmark resolution (640x480)
    pub fn new() -> Self {
        Self::with_size(VIDEO_WIDTH, VIDEO_HEIGHT)
    }

    /// Create a new pixel buffer with custom resolution
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; (width * height) as usize],
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes
    #[inline]
    pub fn pitch(&self) -> usize {
        self.width as usize * 4
    }

    /// Check if coordinates are within bounds
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }

    /// Zero every sample
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Fill every sample with one color
    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Set a single pixel (bounds checked, out-of-range writes are dropped)
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            self.pixels[idx] = color;
        }
    }

    /// Read a pixel from the buffer (bounds checked)
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        if self.in_bounds(x, y) {
            Some(self.pixels[self.pixel_index(x as u32, y as u32)])
        } else {
            None
        }
    }

    /// Draw a horizontal span, clipped to the buffer
    pub fn hline(&mut self, x1: i32, x2: i32, y: i32, color: Color) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let start = x1.max(0);
        let end = x2.min(self.width as i32 - 1);
        if start > end {
            return;
        }

        let row = self.pixel_index(0, y as u32);
        self.pixels[row + start as usize..=row + end as usize].fill(color);
    }

    /// Draw a line using Bresenham's algorithm.
    ///
    /// Every integer point from `(x0, y0)` to `(x1, y1)` inclusive is visited;
    /// points outside the buffer are skipped one by one rather than clipped up
    /// front, so the path is identical whatever part of it is visible.
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let dx = (x1 - x0).abs();
        let dy = -((y1 - y0).abs());
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Draw a glow disk with the midpoint circle algorithm.
    ///
    /// For each octant step the full horizontal run between the mirrored
    /// x-extents is filled on the four symmetric rows, so the result is a
    /// solid disk whose edge follows the midpoint outline. Negative radii draw
    /// nothing; radius 0 plots the centre.
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        if radius < 0 {
            return;
        }

        let mut x = radius;
        let mut y = 0;
        let mut err = 0;

        while x >= y {
            self.hline(cx - x, cx + x, cy + y, color);
            self.hline(cx - x, cx + x, cy - y, color);
            self.hline(cx - y, cx + y, cy + x, color);
            self.hline(cx - y, cx + y, cy - x, color);

            y += 1;
            err += 1 + 2 * y;
            if 2 * (err - x) + 1 > 0 {
                x -= 1;
                err += 1 - 2 * x;
            }
        }
    }

    /// Draw a filled circle one scanline at a time.
    ///
    /// Half-width of each row is `sqrt(r² - y²)` truncated toward zero.
    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        if radius < 0 {
            return;
        }

        for y in -radius..=radius {
            let row = cy + y;
            if row < 0 || row >= self.height as i32 {
                continue;
            }
            let half = ((radius * radius - y * y) as f32).sqrt() as i32;
            self.hline(cx - half, cx + half, row, color);
        }
    }

    /// Packed samples in row-major order
    pub fn as_slice(&self) -> &[Color] {
        &self.pixels
    }

    pub fn as_mut_slice(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Raw bytes in native endianness, for texture upload
    pub fn as_bytes(&self) -> &[u8] {
        // Safety: u32 has no padding and stricter alignment than u8, and the
        // byte length is exactly four times the sample count.
        unsafe {
            std::slice::from_raw_parts(self.pixels.as_ptr().cast::<u8>(), self.pixels.len() * 4)
        }
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Color = 0xFFFF_FFFF;

    fn lit(buffer: &PixelBuffer) -> Vec<(i32, i32)> {
        let w = buffer.width() as usize;
        buffer
            .as_slice()
            .iter()
            .enumerate()
            .filter(|(_, &c)| c != 0)
            .map(|(i, _)| ((i % w) as i32, (i / w) as i32))
            .collect()
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut buffer = PixelBuffer::new();
        buffer.fill(0xFF12_3456);
        buffer.clear();
        let once = buffer.as_slice().to_vec();
        buffer.clear();
        assert_eq!(buffer.as_slice(), once.as_slice());
        assert!(once.iter().all(|&c| c == 0));
    }

    #[test]
    fn test_set_pixel_out_of_bounds_is_dropped() {
        let mut buffer = PixelBuffer::with_size(4, 4);
        buffer.set_pixel(-1, 0, WHITE);
        buffer.set_pixel(0, 4, WHITE);
        buffer.set_pixel(4, 2, WHITE);
        assert!(lit(&buffer).is_empty());
        assert_eq!(buffer.get_pixel(4, 0), None);
    }

    #[test]
    fn test_hline_clips_both_ends() {
        let mut buffer = PixelBuffer::with_size(8, 2);
        buffer.hline(10, -5, 1, WHITE);
        assert_eq!(lit(&buffer).len(), 8);
        assert!(lit(&buffer).iter().all(|&(_, y)| y == 1));
    }

    #[test]
    fn test_draw_circle_stays_in_bounding_box() {
        let mut buffer = PixelBuffer::new();
        buffer.draw_circle(320, 240, 10, WHITE);
        let points = lit(&buffer);
        assert!(!points.is_empty());
        for (x, y) in points {
            assert!((310..=330).contains(&x), "x={} outside box", x);
            assert!((230..=250).contains(&y), "y={} outside box", y);
        }
    }

    #[test]
    fn test_draw_circle_row_extents_on_radius() {
        // Helix disks never exceed ~40px; the midpoint edge stays within
        // 1.5px of the true radius over that range.
        let (cx, cy) = (100, 100);
        for r in 0..=40 {
            let mut buffer = PixelBuffer::new();
            buffer.draw_circle(cx, cy, r, WHITE);
            let points = lit(&buffer);

            for y in (cy - r)..=(cy + r) {
                let right = points
                    .iter()
                    .filter(|&&(_, py)| py == y)
                    .map(|&(px, _)| px)
                    .max()
                    .unwrap();
                let d = (((right - cx).pow(2) + (y - cy).pow(2)) as f32).sqrt();
                assert!(
                    (d - r as f32).abs() <= 1.5,
                    "r={} row {} edge at distance {}",
                    r,
                    y,
                    d
                );
            }
        }
    }

    #[test]
    fn test_draw_circle_zero_radius_is_single_point() {
        let mut buffer = PixelBuffer::new();
        buffer.draw_circle(5, 5, 0, WHITE);
        assert_eq!(lit(&buffer), vec![(5, 5)]);
    }

    #[test]
    fn test_draw_circle_partially_offscreen() {
        let mut buffer = PixelBuffer::with_size(16, 16);
        buffer.draw_circle(0, 0, 6, WHITE);
        assert_eq!(buffer.get_pixel(0, 0), Some(WHITE));
        assert_eq!(buffer.get_pixel(6, 0), Some(WHITE));
        assert_eq!(buffer.get_pixel(7, 0), Some(0));
    }

    #[test]
    fn test_fill_circle_clips_rows_and_columns() {
        let mut buffer = PixelBuffer::with_size(32, 32);
        buffer.fill_circle(30, 2, 8, WHITE);
        for (x, y) in lit(&buffer) {
            assert!((x - 30).pow(2) + (y - 2).pow(2) <= 64);
        }
        assert_eq!(buffer.get_pixel(31, 2), Some(WHITE));
        assert_eq!(buffer.get_pixel(31, 10), Some(0));
    }

    #[test]
    fn test_fill_circle_radius_zero() {
        let mut buffer = PixelBuffer::with_size(8, 8);
        buffer.fill_circle(3, 3, 0, WHITE);
        assert_eq!(lit(&buffer), vec![(3, 3)]);
    }

    #[test]
    fn test_line_coincident_endpoints() {
        let mut buffer = PixelBuffer::with_size(8, 8);
        buffer.line(2, 3, 2, 3, WHITE);
        assert_eq!(lit(&buffer), vec![(2, 3)]);
    }

    #[test]
    fn test_line_offscreen_portion_skipped() {
        let mut buffer = PixelBuffer::with_size(10, 10);
        buffer.line(-5, 5, 14, 5, WHITE);
        assert_eq!(lit(&buffer).len(), 10);
    }

    mod property {
        use super::*;
        use proptest::prelude::*;

        /// Replays the line rasterizer into a point list.
        fn line_points(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<(i32, i32)> {
            let mut buffer = PixelBuffer::with_size(64, 64);
            buffer.line(x0, y0, x1, y1, WHITE);
            lit(&buffer)
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(128))]

            #[test]
            fn line_is_connected_and_spans_endpoints(
                x0 in 0i32..64, y0 in 0i32..64, x1 in 0i32..64, y1 in 0i32..64,
            ) {
                let mut points = line_points(x0, y0, x1, y1);
                prop_assert!(points.contains(&(x0, y0)));
                prop_assert!(points.contains(&(x1, y1)));

                // Order along the dominant axis, then every neighbour pair
                // must be 8-connected and the dominant coordinate must advance by one.
                let x_major = (x1 - x0).abs() >= (y1 - y0).abs();
                if x_major {
                    points.sort_by_key(|&(x, _)| x);
                } else {
                    points.sort_by_key(|&(_, y)| y);
                }
                let expected = (x1 - x0).abs().max((y1 - y0).abs()) as usize + 1;
                prop_assert_eq!(points.len(), expected);
                for pair in points.windows(2) {
                    let (a, b) = (pair[0], pair[1]);
                    prop_assert!((a.0 - b.0).abs() <= 1 && (a.1 - b.1).abs() <= 1);
                    if x_major {
                        prop_assert_eq!(b.0 - a.0, 1);
                    } else {
                        prop_assert_eq!(b.1 - a.1, 1);
                    }
                }
            }

            #[test]
            fn circle_stays_within_radius(
                cx in -20i32..84, cy in -20i32..84, r in 0i32..40,
            ) {
                let mut buffer = PixelBuffer::with_size(64, 64);
                buffer.draw_circle(cx, cy, r, WHITE);
                let limit = (r + 1) * (r + 1);
                for (x, y) in lit(&buffer) {
                    prop_assert!((x - cx).pow(2) + (y - cy).pow(2) <= limit);
                }
            }

            #[test]
            fn fill_circle_never_exceeds_radius(
                cx in -20i32..84, cy in -20i32..84, r in 0i32..40,
            ) {
                let mut buffer = PixelBuffer::with_size(64, 64);
                buffer.fill_circle(cx, cy, r, WHITE);
                for (x, y) in lit(&buffer) {
                    prop_assert!((x - cx).pow(2) + (y - cy).pow(2) <= r * r);
                }
            }
        }
    }
}
