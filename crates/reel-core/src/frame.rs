use crate::Color;

/// A straight-alpha RGBA8 raster (4 bytes per pixel, row-major).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    /// Raw pixel data.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

pub const BYTES_PER_PIXEL: usize = 4;

impl FrameBuffer {
    /// Create a new frame buffer filled with zeros (transparent black).
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width as usize) * (height as usize) * BYTES_PER_PIXEL;
        Self {
            data: vec![0u8; size],
            width,
            height,
        }
    }

    /// Create a frame buffer filled with a solid color.
    pub fn solid(width: u32, height: u32, color: &Color) -> Self {
        let pixel = color.to_rgba8();
        let pixel_count = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(pixel_count * BYTES_PER_PIXEL);
        for _ in 0..pixel_count {
            data.extend_from_slice(&pixel);
        }
        Self {
            data,
            width,
            height,
        }
    }

    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    pub fn byte_size(&self) -> usize {
        self.data.len()
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * BYTES_PER_PIXEL
    }

    /// Get the RGBA value at a pixel coordinate. Returns None if out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let o = self.offset(x, y);
        Some([
            self.data[o],
            self.data[o + 1],
            self.data[o + 2],
            self.data[o + 3],
        ])
    }

    /// Set the RGBA value at a pixel coordinate. No-op if out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let o = self.offset(x, y);
        self.data[o..o + BYTES_PER_PIXEL].copy_from_slice(&rgba);
    }

    /// Blend `color` over the pixel at (x, y) with the given glyph coverage.
    /// Coordinates outside the buffer are ignored, so glyphs may hang off the canvas.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: &Color, coverage: u8) {
        if coverage == 0 || x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let alpha = (coverage as u32 * color.a as u32 + 127) / 255;
        let o = self.offset(x as u32, y as u32);
        blend_over(
            &mut self.data[o..o + BYTES_PER_PIXEL],
            [color.r, color.g, color.b, alpha as u8],
        );
    }

    /// Alpha-composite `src` on top of `self` at position (dx, dy).
    pub fn composite_over(&mut self, src: &FrameBuffer, dx: i32, dy: i32) {
        let dst_width = self.width as i32;
        let dst_height = self.height as i32;

        let mut start_y = 0;
        let mut end_y = src.height as i32;
        let mut start_x = 0;
        let mut end_x = src.width as i32;

        if dy < 0 {
            start_y = -dy;
        }
        if dy + end_y > dst_height {
            end_y = dst_height - dy;
        }
        if dx < 0 {
            start_x = -dx;
        }
        if dx + end_x > dst_width {
            end_x = dst_width - dx;
        }

        if start_x >= end_x || start_y >= end_y {
            return;
        }

        let src_stride = src.width as usize * BYTES_PER_PIXEL;
        let dst_stride = self.width as usize * BYTES_PER_PIXEL;

        for sy in start_y..end_y {
            let dst_y = dy + sy;
            let src_row_start = (sy as usize * src_stride) + (start_x as usize * BYTES_PER_PIXEL);
            let dst_row_start =
                (dst_y as usize * dst_stride) + ((dx + start_x) as usize * BYTES_PER_PIXEL);
            let len = (end_x - start_x) as usize * BYTES_PER_PIXEL;

            let src_slice = &src.data[src_row_start..src_row_start + len];
            let dst_slice = &mut self.data[dst_row_start..dst_row_start + len];

            for (s, d) in src_slice
                .chunks_exact(BYTES_PER_PIXEL)
                .zip(dst_slice.chunks_exact_mut(BYTES_PER_PIXEL))
            {
                blend_over(d, [s[0], s[1], s[2], s[3]]);
            }
        }
    }

    /// True when every pixel has zero alpha.
    pub fn is_fully_transparent(&self) -> bool {
        self.data.chunks_exact(BYTES_PER_PIXEL).all(|p| p[3] == 0)
    }

    /// Smallest `(x, y, width, height)` rectangle holding every non-transparent pixel.
    pub fn content_bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let mut min_x = u32::MAX;
        let mut min_y = u32::MAX;
        let mut max_x = 0u32;
        let mut max_y = 0u32;
        let mut found = false;

        for y in 0..self.height {
            let row = self.offset(0, y);
            let row = &self.data[row..row + self.width as usize * BYTES_PER_PIXEL];
            for (x, p) in row.chunks_exact(BYTES_PER_PIXEL).enumerate() {
                if p[3] != 0 {
                    let x = x as u32;
                    min_x = min_x.min(x);
                    max_x = max_x.max(x);
                    min_y = min_y.min(y);
                    max_y = max_y.max(y);
                    found = true;
                }
            }
        }

        found.then(|| (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    }

    /// Copy out a rectangle. The rectangle is clipped to the buffer.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> FrameBuffer {
        let x = x.min(self.width);
        let y = y.min(self.height);
        let width = width.min(self.width - x);
        let height = height.min(self.height - y);

        let mut out = FrameBuffer::new(width, height);
        let len = width as usize * BYTES_PER_PIXEL;
        for row in 0..height {
            let src = self.offset(x, y + row);
            let dst = row as usize * len;
            out.data[dst..dst + len].copy_from_slice(&self.data[src..src + len]);
        }
        out
    }

    /// Number of pixels whose RGBA value equals `rgba` exactly.
    pub fn count_pixels(&self, rgba: [u8; 4]) -> usize {
        self.data
            .chunks_exact(BYTES_PER_PIXEL)
            .filter(|p| *p == rgba)
            .count()
    }
}

/// Porter-Duff "over" of a straight-alpha source pixel onto a destination pixel.
fn blend_over(d: &mut [u8], s: [u8; 4]) {
    let sa = s[3] as u32;
    if sa == 0 {
        return;
    }
    if sa == 255 {
        d.copy_from_slice(&s);
        return;
    }

    let da = d[3] as u32;
    let inv_sa = 255 - sa;
    let out_a = sa + ((da * inv_sa) / 255);

    if out_a == 0 {
        return;
    }

    for c in 0..3 {
        let sc = s[c] as u32;
        let dc = d[c] as u32;
        d[c] = ((sc * sa * 255 + dc * da * inv_sa) / (out_a * 255)) as u8;
    }
    d[3] = out_a as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_buffer_new_is_transparent() {
        let fb = FrameBuffer::new(1080, 1920);
        assert_eq!(fb.byte_size(), 1080 * 1920 * 4);
        assert_eq!(fb.pixel_count(), 1080 * 1920);
        assert!(fb.is_fully_transparent());
    }

    #[test]
    fn test_frame_buffer_solid() {
        let fb = FrameBuffer::solid(2, 2, &Color::RED);
        assert_eq!(fb.get_pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(fb.get_pixel(1, 1), Some([255, 0, 0, 255]));
        assert_eq!(fb.count_pixels([255, 0, 0, 255]), 4);
    }

    #[test]
    fn test_frame_buffer_out_of_bounds() {
        let mut fb = FrameBuffer::new(10, 10);
        assert_eq!(fb.get_pixel(10, 0), None);
        assert_eq!(fb.get_pixel(0, 10), None);
        fb.blend_pixel(-1, 3, &Color::WHITE, 255);
        fb.blend_pixel(3, 10, &Color::WHITE, 255);
        assert!(fb.is_fully_transparent());
    }

    #[test]
    fn test_blend_pixel_full_coverage_replaces() {
        let mut fb = FrameBuffer::new(4, 4);
        fb.blend_pixel(1, 1, &Color::BLACK, 255);
        fb.blend_pixel(1, 1, &Color::WHITE, 255);
        assert_eq!(fb.get_pixel(1, 1), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_blend_pixel_partial_coverage_on_transparent() {
        let mut fb = FrameBuffer::new(1, 1);
        fb.blend_pixel(0, 0, &Color::RED, 128);
        assert_eq!(fb.get_pixel(0, 0), Some([255, 0, 0, 128]));
    }

    #[test]
    fn test_composite_over_opaque() {
        let mut dst = FrameBuffer::solid(4, 4, &Color::BLUE);
        let src = FrameBuffer::solid(2, 2, &Color::RED);
        dst.composite_over(&src, 1, 1);
        assert_eq!(dst.get_pixel(1, 1), Some([255, 0, 0, 255]));
        assert_eq!(dst.get_pixel(2, 2), Some([255, 0, 0, 255]));
        assert_eq!(dst.get_pixel(0, 0), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_composite_over_transparent_source() {
        let mut dst = FrameBuffer::solid(4, 4, &Color::WHITE);
        let src = FrameBuffer::new(2, 2);
        dst.composite_over(&src, 0, 0);
        assert_eq!(dst.get_pixel(0, 0), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_composite_over_semi_transparent() {
        let mut dst = FrameBuffer::solid(2, 2, &Color::WHITE);
        let mut src = FrameBuffer::new(1, 1);
        src.set_pixel(0, 0, [255, 0, 0, 128]);

        dst.composite_over(&src, 0, 0);

        let pixel = dst.get_pixel(0, 0).unwrap();
        assert!(pixel[0] > 200);
        assert!(pixel[1] > 50 && pixel[1] < 200);
        assert!(pixel[2] > 50 && pixel[2] < 200);
        assert_eq!(pixel[3], 255);
    }

    #[test]
    fn test_content_bounds_and_crop() {
        let mut fb = FrameBuffer::new(10, 8);
        assert_eq!(fb.content_bounds(), None);
        fb.set_pixel(2, 3, [1, 2, 3, 255]);
        fb.set_pixel(6, 5, [4, 5, 6, 10]);
        assert_eq!(fb.content_bounds(), Some((2, 3, 5, 3)));

        let cropped = fb.crop(2, 3, 5, 3);
        assert_eq!((cropped.width, cropped.height), (5, 3));
        assert_eq!(cropped.get_pixel(0, 0), Some([1, 2, 3, 255]));
        assert_eq!(cropped.get_pixel(4, 2), Some([4, 5, 6, 10]));
    }

    #[test]
    fn test_crop_clips_to_buffer() {
        let fb = FrameBuffer::solid(4, 4, &Color::RED);
        let cropped = fb.crop(3, 3, 10, 10);
        assert_eq!((cropped.width, cropped.height), (1, 1));
    }

    #[test]
    fn test_composite_over_clips_offscreen() {
        let mut dst = FrameBuffer::new(4, 4);
        let src = FrameBuffer::solid(4, 4, &Color::GREEN);
        dst.composite_over(&src, 3, -3);
        assert_eq!(dst.get_pixel(3, 0), Some([0, 255, 0, 255]));
        assert_eq!(dst.get_pixel(2, 0), Some([0, 0, 0, 0]));
        assert_eq!(dst.get_pixel(3, 1), Some([0, 0, 0, 0]));
    }
}
