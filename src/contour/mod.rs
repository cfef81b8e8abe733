//! Scrolling topographic contours: a z-slice of 3D simplex noise, sampled on
//! a lattice and traced with marching squares at evenly spaced iso-levels.

mod field;
mod marching;
mod noise;

pub use field::ScalarField;
pub use marching::{case_index, crossing, ContourExtractor, Segment};
pub use noise::{GradientNoiseField, PermutationTable};

use std::time::Duration;

use crate::config::ContourConfig;
use crate::raster::{Color, Surface, BACKGROUND};

/// Contour stroke color
pub const LINE_COLOR: Color = Color::rgba(255, 255, 255, 0.03);
pub const LINE_WIDTH: f32 = 1.0;

/// Owns the noise volume, the per-frame sample lattice and the z position.
pub struct ContourField {
    config: ContourConfig,
    noise: GradientNoiseField,
    field: ScalarField,
    extractor: ContourExtractor,
    z_offset: f64,
}

impl ContourField {
    pub fn new(width: u32, height: u32, config: ContourConfig, noise: GradientNoiseField) -> Self {
        let field = ScalarField::for_viewport(width, height, config.cell_size);
        log::debug!("contour lattice {}x{}", field.cols(), field.rows());
        Self {
            extractor: ContourExtractor::new(config.cell_size),
            config,
            noise,
            field,
            z_offset: 0.0,
        }
    }

    /// Reallocate the lattice for a new viewport. The noise volume and the
    /// z position are kept so the animation continues where it was.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.field = ScalarField::for_viewport(width, height, self.config.cell_size);
        log::debug!("contour lattice {}x{}", self.field.cols(), self.field.rows());
    }

    pub fn z_offset(&self) -> f64 {
        self.z_offset
    }

    pub fn field(&self) -> &ScalarField {
        &self.field
    }

    /// Move through the noise volume by `z_speed` per elapsed millisecond.
    pub fn advance(&mut self, elapsed: Duration) {
        self.z_offset += self.config.z_speed * elapsed.as_secs_f64() * 1000.0;
    }

    /// Resample the lattice at the current z.
    pub fn rebuild(&mut self) {
        self.field.fill(
            &self.noise,
            self.config.cell_size,
            self.config.noise_scale,
            self.z_offset,
        );
    }

    /// Clear the surface and stroke every interior iso-level of the current
    /// lattice. Returns the number of segments drawn.
    pub fn render<S: Surface>(&self, surface: &mut S) -> usize {
        surface.clear(BACKGROUND);
        let mut drawn = 0;
        for threshold in ContourExtractor::thresholds(self.config.levels) {
            drawn += self.extractor.level(&self.field, threshold, |segment| {
                surface.stroke_segment(segment.from, segment.to, LINE_WIDTH, LINE_COLOR);
            });
        }
        drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::testing::RecordingSurface;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn contours(width: u32, height: u32, config: ContourConfig) -> ContourField {
        let noise = GradientNoiseField::from_rng(&mut StdRng::seed_from_u64(77));
        ContourField::new(width, height, config, noise)
    }

    #[test]
    fn test_advance_scales_with_elapsed() {
        let mut field = contours(70, 70, ContourConfig::default());
        field.advance(Duration::from_millis(80));
        assert!((field.z_offset() - 0.000_12).abs() < 1e-12);
        field.advance(Duration::from_millis(160));
        assert!((field.z_offset() - 0.000_36).abs() < 1e-12);
    }

    #[test]
    fn test_render_draws_segments() {
        let config = ContourConfig {
            noise_scale: 0.05,
            ..Default::default()
        };
        let mut field = contours(210, 140, config);
        field.rebuild();
        let mut surface = RecordingSurface::new(210, 140);
        let drawn = field.render(&mut surface);
        assert_eq!(surface.rects, 1);
        assert_eq!(drawn, surface.segments.len());
        assert!(drawn > 0);
        for (from, to) in &surface.segments {
            for p in [from, to] {
                assert!(p.x >= 0.0 && p.x <= 217.0 + 1e-3);
                assert!(p.y >= 0.0 && p.y <= 147.0 + 1e-3);
            }
        }
    }

    #[test]
    fn test_zero_viewport() {
        let mut field = contours(0, 0, ContourConfig::default());
        assert_eq!((field.field().cols(), field.field().rows()), (1, 1));
        field.rebuild();
        let mut surface = RecordingSurface::new(0, 0);
        assert_eq!(field.render(&mut surface), 0);
    }

    #[test]
    fn test_resize_keeps_z() {
        let mut field = contours(70, 70, ContourConfig::default());
        field.advance(Duration::from_millis(1000));
        let z = field.z_offset();
        field.resize(140, 35);
        assert_eq!(field.z_offset(), z);
        assert_eq!((field.field().cols(), field.field().rows()), (21, 6));
    }
}
