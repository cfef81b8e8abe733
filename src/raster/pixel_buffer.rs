use super::{Color, Point, Surface};

/// One RGBA8 pixel, laid out for direct texture upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Row-major software framebuffer with source-over blending.
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::default_opaque(); (width as usize) * (height as usize)],
        }
    }

    /// Reallocate for a new viewport; contents are discarded.
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Raw bytes for GPU upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Blend `color` into pixel (x, y) scaled by `coverage`.
    fn blend(&mut self, x: i64, y: i64, color: Color, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let alpha = (color.a * coverage).clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let dst = &mut self.pixels[(y as usize) * (self.width as usize) + x as usize];
        let mix = |src: u8, dst: u8| -> u8 {
            (src as f32 * alpha + dst as f32 * (1.0 - alpha)).round() as u8
        };
        dst.r = mix(color.r, dst.r);
        dst.g = mix(color.g, dst.g);
        dst.b = mix(color.b, dst.b);
        dst.a = 255;
    }

    /// Pixel bounds of a float rectangle, clipped to the buffer.
    fn clip(&self, x0: f32, y0: f32, x1: f32, y1: f32) -> (i64, i64, i64, i64) {
        let x0 = (x0.floor() as i64).max(0);
        let y0 = (y0.floor() as i64).max(0);
        let x1 = (x1.ceil() as i64).min(self.width as i64);
        let y1 = (y1.ceil() as i64).min(self.height as i64);
        (x0, y0, x1, y1)
    }
}

impl Rgba {
    const fn default_opaque() -> Self {
        Self { r: 0, g: 0, b: 0, a: 255 }
    }
}

impl Surface for PixelBuffer {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let (x0, y0, x1, y1) = self.clip(x, y, x + width, y + height);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, color, 1.0);
            }
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let (x0, y0, x1, y1) = self.clip(
            center.x - radius - 1.0,
            center.y - radius - 1.0,
            center.x + radius + 1.0,
            center.y + radius + 1.0,
        );
        for py in y0..y1 {
            for px in x0..x1 {
                let dx = px as f32 + 0.5 - center.x;
                let dy = py as f32 + 0.5 - center.y;
                let dist = (dx * dx + dy * dy).sqrt();
                // One-pixel coverage ramp at the rim
                let coverage = (radius - dist + 0.5).clamp(0.0, 1.0);
                self.blend(px, py, color, coverage);
            }
        }
    }

    fn stroke_segment(&mut self, from: Point, to: Point, width: f32, color: Color) {
        let half = width * 0.5;
        let (x0, y0, x1, y1) = self.clip(
            from.x.min(to.x) - half - 1.0,
            from.y.min(to.y) - half - 1.0,
            from.x.max(to.x) + half + 1.0,
            from.y.max(to.y) + half + 1.0,
        );
        let (vx, vy) = (to.x - from.x, to.y - from.y);
        let len_sq = vx * vx + vy * vy;
        for py in y0..y1 {
            for px in x0..x1 {
                let cx = px as f32 + 0.5;
                let cy = py as f32 + 0.5;
                let t = if len_sq > 0.0 {
                    (((cx - from.x) * vx + (cy - from.y) * vy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let dx = cx - (from.x + vx * t);
                let dy = cy - (from.y + vy * t);
                let dist = (dx * dx + dy * dy).sqrt();
                let coverage = (half - dist + 0.5).clamp(0.0, 1.0);
                self.blend(px, py, color, coverage);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::BACKGROUND;

    #[test]
    fn test_rgba_size() {
        assert_eq!(std::mem::size_of::<Rgba>(), 4);
    }

    #[test]
    fn test_clear_fills_every_pixel() {
        let mut buf = PixelBuffer::new(4, 3);
        buf.clear(BACKGROUND);
        assert_eq!(buf.as_bytes().len(), 4 * 3 * 4);
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(buf.pixel(x, y), Some(Rgba { r: 0x17, g: 0x17, b: 0x17, a: 255 }));
            }
        }
    }

    #[test]
    fn test_zero_size_buffer_ignores_draws() {
        let mut buf = PixelBuffer::new(0, 0);
        buf.clear(BACKGROUND);
        buf.fill_circle(Point::new(1.0, 1.0), 3.0, Color::rgb(255, 0, 0));
        buf.stroke_segment(Point::new(0.0, 0.0), Point::new(5.0, 5.0), 1.0, BACKGROUND);
        assert!(buf.as_bytes().is_empty());
        assert_eq!(buf.pixel(0, 0), None);
    }

    #[test]
    fn test_circle_covers_center_not_corner() {
        let mut buf = PixelBuffer::new(10, 10);
        buf.clear(Color::rgb(0, 0, 0));
        buf.fill_circle(Point::new(5.0, 5.0), 2.0, Color::rgb(200, 200, 200));
        assert_eq!(buf.pixel(5, 5).unwrap().r, 200);
        assert_eq!(buf.pixel(0, 0).unwrap().r, 0);
    }

    #[test]
    fn test_translucent_blend() {
        let mut buf = PixelBuffer::new(1, 1);
        buf.clear(Color::rgb(0, 0, 0));
        buf.fill_rect(0.0, 0.0, 1.0, 1.0, Color::rgba(100, 100, 100, 0.5));
        assert_eq!(buf.pixel(0, 0).unwrap().g, 50);
    }

    #[test]
    fn test_segment_touches_pixels_along_line() {
        let mut buf = PixelBuffer::new(10, 10);
        buf.clear(Color::rgb(0, 0, 0));
        buf.stroke_segment(Point::new(0.0, 5.5), Point::new(10.0, 5.5), 1.0, Color::rgb(255, 255, 255));
        assert_eq!(buf.pixel(3, 5).unwrap().r, 255);
        assert_eq!(buf.pixel(3, 0).unwrap().r, 0);
    }
}
