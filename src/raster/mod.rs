//! CPU drawing surface shared by both backdrops.
//!
//! Each backdrop paints into its own [`PixelBuffer`] through the [`Surface`]
//! trait; the GPU layer only ever sees the finished bytes.

mod pixel_buffer;

pub use pixel_buffer::{PixelBuffer, Rgba};

/// sRGB color with a separate straight alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Page background behind both layers (`#171717`)
pub const BACKGROUND: Color = Color::rgb(0x17, 0x17, 0x17);

/// A point in pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Drawing primitives a backdrop needs from its render target.
pub trait Surface {
    /// (width, height) in device pixels
    fn size(&self) -> (u32, u32);

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color);

    fn stroke_segment(&mut self, from: Point, to: Point, width: f32, color: Color);

    /// Fill the whole surface with a solid color.
    fn clear(&mut self, color: Color) {
        let (w, h) = self.size();
        self.fill_rect(0.0, 0.0, w as f32, h as f32, color);
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// Surface that only records what was drawn.
    #[derive(Default)]
    pub struct RecordingSurface {
        pub width: u32,
        pub height: u32,
        pub rects: usize,
        pub circles: Vec<(Point, f32)>,
        pub segments: Vec<(Point, Point)>,
    }

    impl RecordingSurface {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                ..Default::default()
            }
        }
    }

    impl Surface for RecordingSurface {
        fn size(&self) -> (u32, u32) {
            (self.width, self.height)
        }

        fn fill_rect(&mut self, _x: f32, _y: f32, _width: f32, _height: f32, _color: Color) {
            self.rects += 1;
        }

        fn fill_circle(&mut self, center: Point, radius: f32, _color: Color) {
            self.circles.push((center, radius));
        }

        fn stroke_segment(&mut self, from: Point, to: Point, _width: f32, _color: Color) {
            self.segments.push((from, to));
        }
    }
}
