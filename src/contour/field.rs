use crate::contour::noise::GradientNoiseField;

/// Row-major scalar samples in [0, 1], one per lattice point.
///
/// For a viewport this holds `ceil(w / cell) + 1` by `ceil(h / cell) + 1`
/// samples so the last partial cell is still closed on its far side.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarField {
    cols: usize,
    rows: usize,
    values: Vec<f32>,
}

impl ScalarField {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            values: vec![0.0; cols * rows],
        }
    }

    /// Lattice for a `width` x `height` viewport at `cell_size` spacing.
    pub fn for_viewport(width: u32, height: u32, cell_size: f32) -> Self {
        let cols = (width as f32 / cell_size).ceil() as usize + 1;
        let rows = (height as f32 / cell_size).ceil() as usize + 1;
        Self::new(cols, rows)
    }

    /// Build a field directly from values; `values.len()` must equal `cols * rows`.
    #[cfg(test)]
    pub fn from_values(cols: usize, rows: usize, values: Vec<f32>) -> Self {
        assert_eq!(values.len(), cols * rows, "field size mismatch");
        Self { cols, rows, values }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn get(&self, col: usize, row: usize) -> f32 {
        self.values[row * self.cols + col]
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Resample the whole lattice from a z-slice of the noise volume.
    pub fn fill(&mut self, noise: &GradientNoiseField, cell_size: f32, scale: f64, z: f64) {
        let step = cell_size as f64 * scale;
        for row in 0..self.rows {
            for col in 0..self.cols {
                let v = noise.sample_normalized(col as f64 * step, row as f64 * step, z);
                self.values[row * self.cols + col] = v as f32;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_viewport_dimensions() {
        let field = ScalarField::for_viewport(700, 350, 7.0);
        assert_eq!((field.cols(), field.rows()), (101, 51));
        let field = ScalarField::for_viewport(701, 0, 7.0);
        assert_eq!((field.cols(), field.rows()), (102, 1));
    }

    #[test]
    fn test_fill_normalized_and_smooth() {
        let noise = GradientNoiseField::from_rng(&mut StdRng::seed_from_u64(4));
        let mut field = ScalarField::for_viewport(140, 70, 7.0);
        field.fill(&noise, 7.0, 0.0006, 0.25);
        assert!(field.values().iter().all(|v| (0.0..=1.0).contains(v)));
        // Neighboring samples are only 0.0042 apart in noise space
        for row in 0..field.rows() {
            for col in 1..field.cols() {
                assert!((field.get(col, row) - field.get(col - 1, row)).abs() < 0.1);
            }
        }
    }

    #[test]
    fn test_fill_changes_with_z() {
        let noise = GradientNoiseField::from_rng(&mut StdRng::seed_from_u64(4));
        let mut a = ScalarField::for_viewport(70, 70, 7.0);
        let mut b = a.clone();
        a.fill(&noise, 7.0, 0.05, 0.1);
        b.fill(&noise, 7.0, 0.05, 0.9);
        assert_ne!(a, b);
    }
}
