use rand::Rng;

use crate::config::{AutomatonConfig, DENSITY_TOGGLE};
use crate::raster::{Color, Point, Surface, BACKGROUND};
use crate::simulation::exclusion::{FuzzyExclusionZone, Rect};
use crate::simulation::grid::LifeGrid;

/// Dot fill for live cells
pub const CELL_COLOR: Color = Color::rgba(60, 60, 60, 0.2);

/// Cells at or below this opacity are not drawn
pub const VISIBLE_OPACITY: f32 = 0.01;

/// Population-dependent transition odds, computed once per tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionOdds {
    /// Chance a live cell dies before the survival rule is applied
    pub decay: f64,
    /// Chance a dead cell with exactly 3 neighbors is born
    pub birth: f64,
}

impl TransitionOdds {
    pub fn from_ratio(ratio: f64) -> Self {
        let decay = ((ratio - 0.2) * 0.5).max(0.0);
        let birth = if ratio < 0.05 {
            1.0
        } else {
            (1.0 - ratio * 2.0).max(0.3)
        };
        Self { decay, birth }
    }
}

/// What a click stamps into the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Brush {
    Clear,
    Spawn,
}

impl Brush {
    /// Crowded neighborhoods get cleared, everything else gets seeded.
    pub fn for_density(density: f32) -> Self {
        if density > DENSITY_TOGGLE {
            Brush::Clear
        } else {
            Brush::Spawn
        }
    }
}

/// Population snapshot reported by [`ToroidalAutomatonField::step`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepStats {
    pub alive_before: usize,
    pub alive_after: usize,
    pub odds: TransitionOdds,
}

/// Density-adaptive life field on a torus with a fuzzy exclusion zone.
///
/// The live/dead grid is double buffered: `step` reads `grid`, writes
/// `scratch`, then swaps. Opacity is a purely visual overlay eased toward the
/// live value once per rendered frame.
pub struct ToroidalAutomatonField {
    config: AutomatonConfig,
    grid: LifeGrid,
    scratch: LifeGrid,
    opacity: Vec<f32>,
    zone: FuzzyExclusionZone,
}

impl ToroidalAutomatonField {
    /// Build a seeded field covering a `width` x `height` pixel viewport.
    pub fn new<R: Rng>(width: u32, height: u32, config: AutomatonConfig, rng: &mut R) -> Self {
        let cols = grid_extent(width, config.cell_size);
        let rows = grid_extent(height, config.cell_size);
        let rect = Rect::centered(
            width as f32,
            height as f32,
            config.zone_width,
            config.zone_height,
            config.zone_padding,
        );
        let zone = FuzzyExclusionZone::new(rect, cols, rows, &config, rng);
        let grid = LifeGrid::random(cols, rows, config.initial_density, rng, |col, row, rng| {
            zone.contains(col, row, rng)
        });

        log::debug!(
            "automaton grid {}x{} ({} cells), {} alive",
            cols,
            rows,
            grid.len(),
            grid.alive_count()
        );

        Self::from_parts(grid, zone, config)
    }

    /// Assemble a field from an explicit grid and zone. Opacity starts
    /// equal to the live values.
    pub fn from_parts(grid: LifeGrid, zone: FuzzyExclusionZone, config: AutomatonConfig) -> Self {
        let opacity = grid.cells().iter().map(|&c| c as f32).collect();
        let scratch = LifeGrid::new(grid.cols(), grid.rows());
        Self {
            config,
            grid,
            scratch,
            opacity,
            zone,
        }
    }

    /// Rebuild everything for a new viewport; no state is carried over.
    pub fn resize<R: Rng>(&mut self, width: u32, height: u32, rng: &mut R) {
        *self = Self::new(width, height, self.config.clone(), rng);
    }

    pub fn grid(&self) -> &LifeGrid {
        &self.grid
    }

    pub fn opacity(&self) -> &[f32] {
        &self.opacity
    }

    /// Fraction of live cells; 0 for an empty grid.
    pub fn ratio(&self) -> f64 {
        if self.grid.is_empty() {
            0.0
        } else {
            self.grid.alive_count() as f64 / self.grid.len() as f64
        }
    }

    /// Advance the simulation by one tick.
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> StepStats {
        let alive_before = self.grid.alive_count();
        let odds = TransitionOdds::from_ratio(self.ratio());

        for row in 0..self.grid.rows() {
            for col in 0..self.grid.cols() {
                let next = if self.zone.contains(col, row, rng) {
                    false
                } else {
                    let n = self.grid.neighbor_count(col, row);
                    if self.grid.is_alive(col, row) {
                        // Decay is rolled first and can kill regardless of neighbors
                        rng.gen::<f64>() >= odds.decay && n >= 3
                    } else {
                        n == 3 && rng.gen::<f64>() < odds.birth
                    }
                };
                self.scratch.set(col, row, next);
            }
        }

        std::mem::swap(&mut self.grid, &mut self.scratch);

        let stats = StepStats {
            alive_before,
            alive_after: self.grid.alive_count(),
            odds,
        };
        log::trace!(
            "automaton tick: {} -> {} alive (decay {:.3}, birth {:.3})",
            stats.alive_before,
            stats.alive_after,
            odds.decay,
            odds.birth
        );
        stats
    }

    /// Move every opacity one fade step toward its cell's live value.
    pub fn ease_opacity(&mut self) {
        let step = self.config.fade_speed;
        for (opacity, &alive) in self.opacity.iter_mut().zip(self.grid.cells()) {
            *opacity = ease_toward(*opacity, alive as f32, step);
        }
    }

    /// Paint the background and one dot per visible cell.
    pub fn render<S: Surface>(&self, surface: &mut S) {
        surface.clear(BACKGROUND);

        let cell = self.config.cell_size;
        let max_radius = (cell - 1.0) / 2.0;
        let center = cell / 2.0;
        for row in 0..self.grid.rows() {
            for col in 0..self.grid.cols() {
                let scale = self.opacity[self.grid.index(col, row)];
                if scale > VISIBLE_OPACITY {
                    surface.fill_circle(
                        Point::new(col as f32 * cell + center, row as f32 * cell + center),
                        max_radius * scale,
                        CELL_COLOR,
                    );
                }
            }
        }
    }

    /// Toggle-by-majority brush centered on grid cell (col, row).
    ///
    /// Returns the brush applied, or `None` on an empty grid.
    pub fn perturb<R: Rng>(&mut self, col: i64, row: i64, rng: &mut R) -> Option<Brush> {
        if self.grid.is_empty() {
            return None;
        }
        let density = self.grid.local_density(col, row, self.config.sample_radius);
        let brush = Brush::for_density(density);
        self.stamp(col, row, brush, rng);
        log::debug!(
            "click at cell ({}, {}): local density {:.2}, brush {:?}",
            col,
            row,
            density,
            brush
        );
        Some(brush)
    }

    /// Translate a viewport-pixel click into grid coordinates and perturb.
    pub fn click<R: Rng>(&mut self, x: f64, y: f64, rng: &mut R) -> Option<Brush> {
        let cell = self.config.cell_size as f64;
        let col = (x / cell).floor() as i64;
        let row = (y / cell).floor() as i64;
        self.perturb(col, row, rng)
    }

    /// Randomized disk of `brush` values around (col, row), wrapped.
    fn stamp<R: Rng>(&mut self, col: i64, row: i64, brush: Brush, rng: &mut R) {
        let size = self.config.patch_radius;
        let alive = brush == Brush::Spawn;
        for row_offset in -size..=size {
            for col_offset in -size..=size {
                let dist = ((row_offset * row_offset + col_offset * col_offset) as f64).sqrt();
                if dist <= size as f64 && rng.gen::<f64>() < self.config.patch_fill_chance {
                    let (nc, nr) = self.grid.wrap(col + col_offset, row + row_offset);
                    self.grid.set(nc, nr, alive);
                }
            }
        }
    }
}

/// `ceil(extent / cell_size)` for a viewport dimension.
pub fn grid_extent(extent: u32, cell_size: f32) -> usize {
    (extent as f32 / cell_size).ceil() as usize
}

/// Move `current` toward `target` by at most `step`, clamped to [0, 1].
pub fn ease_toward(current: f32, target: f32, step: f32) -> f32 {
    if current < target {
        (current + step).min(target).min(1.0)
    } else if current > target {
        (current - step).max(target).max(0.0)
    } else {
        current
    }
}
