use rand::Rng;

/// Toroidal grid of binary life values, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct LifeGrid {
    cols: usize,
    rows: usize,
    cells: Vec<u8>,
}

impl LifeGrid {
    /// Create an all-dead grid
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![0; cols * rows],
        }
    }

    /// Create a grid where each cell is alive with probability `density`,
    /// except cells rejected by `keep_dead`.
    pub fn random<R, F>(cols: usize, rows: usize, density: f64, rng: &mut R, mut keep_dead: F) -> Self
    where
        R: Rng,
        F: FnMut(usize, usize, &mut R) -> bool,
    {
        let mut grid = Self::new(cols, rows);
        for row in 0..rows {
            for col in 0..cols {
                if keep_dead(col, row, rng) {
                    continue;
                }
                if rng.gen::<f64>() < density {
                    grid.set(col, row, true);
                }
            }
        }
        grid
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn index(&self, col: usize, row: usize) -> usize {
        row * self.cols + col
    }

    #[inline]
    pub fn is_alive(&self, col: usize, row: usize) -> bool {
        self.cells[self.index(col, row)] != 0
    }

    #[inline]
    pub fn set(&mut self, col: usize, row: usize, alive: bool) {
        let idx = self.index(col, row);
        self.cells[idx] = alive as u8;
    }

    /// Raw 0/1 values in row-major order
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Map a possibly out-of-range coordinate back onto the torus.
    /// Must not be called on an empty grid.
    #[inline]
    pub fn wrap(&self, col: i64, row: i64) -> (usize, usize) {
        (
            col.rem_euclid(self.cols as i64) as usize,
            row.rem_euclid(self.rows as i64) as usize,
        )
    }

    /// Count live cells among the 8 wrapped neighbors.
    pub fn neighbor_count(&self, col: usize, row: usize) -> u8 {
        let mut count = 0;
        for row_offset in -1..=1i64 {
            for col_offset in -1..=1i64 {
                if row_offset == 0 && col_offset == 0 {
                    continue;
                }
                let (nc, nr) = self.wrap(col as i64 + col_offset, row as i64 + row_offset);
                count += self.cells[self.index(nc, nr)];
            }
        }
        count
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().map(|&c| c as usize).sum()
    }

    /// Fraction of live cells in the square of `radius` around (col, row), wrapped.
    pub fn local_density(&self, col: i64, row: i64, radius: i64) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let mut alive = 0usize;
        let mut total = 0usize;
        for row_offset in -radius..=radius {
            for col_offset in -radius..=radius {
                let (nc, nr) = self.wrap(col + col_offset, row + row_offset);
                alive += self.cells[self.index(nc, nr)] as usize;
                total += 1;
            }
        }
        alive as f32 / total as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_grid_creation() {
        let grid = LifeGrid::new(100, 50);
        assert_eq!(grid.len(), 5000);
        assert_eq!(grid.alive_count(), 0);
    }

    #[test]
    fn test_neighbors_all_dead() {
        let grid = LifeGrid::new(6, 4);
        for row in 0..4 {
            for col in 0..6 {
                assert_eq!(grid.neighbor_count(col, row), 0);
            }
        }
    }

    #[test]
    fn test_neighbors_all_alive_wrap() {
        let mut grid = LifeGrid::new(5, 3);
        for row in 0..3 {
            for col in 0..5 {
                grid.set(col, row, true);
            }
        }
        for row in 0..3 {
            for col in 0..5 {
                assert_eq!(grid.neighbor_count(col, row), 8, "cell ({col}, {row})");
            }
        }
    }

    #[test]
    fn test_neighbors_wrap_across_corner() {
        let mut grid = LifeGrid::new(10, 10);
        grid.set(9, 9, true);
        assert_eq!(grid.neighbor_count(0, 0), 1);
        assert_eq!(grid.neighbor_count(5, 5), 0);
    }

    #[test]
    fn test_local_density() {
        let mut grid = LifeGrid::new(20, 20);
        assert_eq!(grid.local_density(3, 3, 1), 0.0);
        grid.set(3, 3, true);
        assert!((grid.local_density(3, 3, 1) - 1.0 / 9.0).abs() < 1e-6);
        assert_eq!(LifeGrid::new(0, 0).local_density(0, 0, 5), 0.0);
    }

    #[test]
    fn test_random_respects_keep_dead() {
        let mut rng = StdRng::seed_from_u64(3);
        let grid = LifeGrid::random(30, 30, 1.0, &mut rng, |col, _, _| col < 10);
        for row in 0..30 {
            for col in 0..30 {
                assert_eq!(grid.is_alive(col, row), col >= 10);
            }
        }
    }
}
