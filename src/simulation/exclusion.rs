use rand::Rng;

use crate::config::AutomatonConfig;

/// Axis-aligned rectangle in pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Rect {
    pub const EMPTY: Rect = Rect {
        x1: 0.0,
        y1: 0.0,
        x2: 0.0,
        y2: 0.0,
    };

    /// Zone of `width` x `height` plus `padding` on every side, centered in the viewport.
    pub fn centered(viewport_w: f32, viewport_h: f32, width: f32, height: f32, padding: f32) -> Self {
        // Padding applies to the top edge too, keeping the zone centered.
        Self {
            x1: (viewport_w - width) / 2.0 - padding,
            y1: (viewport_h - height) / 2.0 - padding,
            x2: (viewport_w + width) / 2.0 + padding,
            y2: (viewport_h + height) / 2.0 + padding,
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }

    /// Grow (positive) or shrink (negative) by `amount` on every side.
    pub fn inflate(&self, amount: f32) -> Self {
        Self {
            x1: self.x1 - amount,
            y1: self.y1 - amount,
            x2: self.x2 + amount,
            y2: self.y2 + amount,
        }
    }

    /// Smallest absolute distance from (x, y) to any of the four edge lines.
    pub fn edge_distance(&self, x: f32, y: f32) -> f32 {
        (x - self.x1)
            .abs()
            .min((self.x2 - x).abs())
            .min((y - self.y1).abs())
            .min((self.y2 - y).abs())
    }
}

/// Rectangle whose boundary band is perturbed per cell.
///
/// Each cell carries a margin drawn from `[min_margin, max_margin]` and a
/// uniform noise value, both sampled once when the zone is built. Inside the
/// band a cell is excluded with probability `edge_distance / margin`, decided
/// against its fixed noise value, so the ragged edge stays put across frames.
#[derive(Clone, Debug)]
pub struct FuzzyExclusionZone {
    rect: Rect,
    cell_size: f32,
    min_margin: f32,
    max_margin: f32,
    cols: usize,
    margins: Vec<f32>,
    noise: Vec<f32>,
}

impl FuzzyExclusionZone {
    /// Build the zone for a `cols` x `rows` grid, sampling per-cell tables.
    pub fn new<R: Rng>(
        rect: Rect,
        cols: usize,
        rows: usize,
        config: &AutomatonConfig,
        rng: &mut R,
    ) -> Self {
        let mut zone = Self::without_tables(rect, config);
        zone.cols = cols;
        let count = cols * rows;
        zone.noise = (0..count).map(|_| rng.gen::<f32>()).collect();
        zone.margins = (0..count).map(|_| zone.draw_margin(rng)).collect();
        zone
    }

    /// A zone whose per-cell tables have not been sampled yet; every lookup
    /// falls back to a fresh random draw.
    pub fn without_tables(rect: Rect, config: &AutomatonConfig) -> Self {
        Self {
            rect,
            cell_size: config.cell_size,
            min_margin: config.min_margin,
            max_margin: config.max_margin,
            cols: 0,
            margins: Vec::new(),
            noise: Vec::new(),
        }
    }

    fn draw_margin<R: Rng>(&self, rng: &mut R) -> f32 {
        self.min_margin + rng.gen::<f32>() * (self.max_margin - self.min_margin)
    }

    fn lookup(&self, table: &[f32], col: usize, row: usize) -> Option<f32> {
        if col >= self.cols {
            return None;
        }
        table.get(row * self.cols + col).copied()
    }

    /// Whether cell (col, row) is excluded from life.
    pub fn contains<R: Rng>(&self, col: usize, row: usize, rng: &mut R) -> bool {
        let half = self.cell_size / 2.0;
        let px = col as f32 * self.cell_size + half;
        let py = row as f32 * self.cell_size + half;

        if self.rect.inflate(-self.max_margin).contains(px, py) {
            return true;
        }
        if !self.rect.inflate(self.max_margin).contains(px, py) {
            return false;
        }

        let margin = match self.lookup(&self.margins, col, row) {
            Some(m) => m,
            None => self.draw_margin(rng),
        };
        let min_dist = self.rect.edge_distance(px, py);
        if min_dist < margin {
            let noise = match self.lookup(&self.noise, col, row) {
                Some(n) => n,
                None => rng.gen::<f32>(),
            };
            return noise < min_dist / margin;
        }

        self.rect.contains(px, py)
    }
}
