//! Marching squares over a [`ScalarField`].
//!
//! Corners are weighted top-left 8, top-right 4, bottom-right 2,
//! bottom-left 1. The saddle cases 5 and 10 always emit the same fixed pair
//! of segments; no center-value disambiguation is attempted.

use crate::contour::field::ScalarField;
use crate::raster::Point;

/// Corner values closer than this are treated as equal when interpolating.
const FLAT_EPSILON: f32 = 1e-9;

/// A contour piece in pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

use self::Edge::{Bottom, Left, Right, Top};

/// Case index -> edge pairs to connect.
const CASES: [&[(Edge, Edge)]; 16] = [
    &[],
    &[(Bottom, Left)],
    &[(Right, Bottom)],
    &[(Right, Left)],
    &[(Top, Right)],
    &[(Top, Left), (Right, Bottom)],
    &[(Top, Bottom)],
    &[(Top, Left)],
    &[(Left, Top)],
    &[(Bottom, Top)],
    &[(Left, Bottom), (Top, Right)],
    &[(Right, Top)],
    &[(Left, Right)],
    &[(Right, Bottom)],
    &[(Bottom, Left)],
    &[],
];

/// 4-bit case index for the cell corners against `threshold`.
pub fn case_index(tl: f32, tr: f32, br: f32, bl: f32, threshold: f32) -> usize {
    ((tl >= threshold) as usize) << 3
        | ((tr >= threshold) as usize) << 2
        | ((br >= threshold) as usize) << 1
        | (bl >= threshold) as usize
}

/// Fraction along v0 -> v1 where `threshold` is crossed, clamped to [0, 1].
/// Flat edges report their midpoint.
pub fn crossing(v0: f32, v1: f32, threshold: f32) -> f32 {
    let span = v1 - v0;
    if span.abs() < FLAT_EPSILON {
        return 0.5;
    }
    ((threshold - v0) / span).clamp(0.0, 1.0)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Extracts iso-lines cell by cell, emitting segments as it goes.
#[derive(Clone, Copy, Debug)]
pub struct ContourExtractor {
    cell_size: f32,
}

impl ContourExtractor {
    pub fn new(cell_size: f32) -> Self {
        Self { cell_size }
    }

    /// Interior thresholds `level / levels` for `level` in `1..levels`.
    pub fn thresholds(levels: u32) -> impl Iterator<Item = f32> {
        (1..levels).map(move |level| level as f32 / levels as f32)
    }

    /// Segments for one cell; returns how many were emitted.
    pub fn cell<F>(&self, corners: [f32; 4], origin: Point, threshold: f32, emit: &mut F) -> usize
    where
        F: FnMut(Segment),
    {
        let [tl, tr, br, bl] = corners;
        let pairs = CASES[case_index(tl, tr, br, bl, threshold)];
        if pairs.is_empty() {
            return 0;
        }

        let (x, y, size) = (origin.x, origin.y, self.cell_size);
        let point = |edge: Edge| match edge {
            Top => Point::new(lerp(x, x + size, crossing(tl, tr, threshold)), y),
            Right => Point::new(x + size, lerp(y, y + size, crossing(tr, br, threshold))),
            Bottom => Point::new(lerp(x, x + size, crossing(bl, br, threshold)), y + size),
            Left => Point::new(x, lerp(y, y + size, crossing(tl, bl, threshold))),
        };

        for &(a, b) in pairs {
            emit(Segment {
                from: point(a),
                to: point(b),
            });
        }
        pairs.len()
    }

    /// Walk every cell of `field` at one threshold.
    pub fn level<F>(&self, field: &ScalarField, threshold: f32, mut emit: F) -> usize
    where
        F: FnMut(Segment),
    {
        let mut emitted = 0;
        for row in 0..field.rows().saturating_sub(1) {
            for col in 0..field.cols().saturating_sub(1) {
                let corners = [
                    field.get(col, row),
                    field.get(col + 1, row),
                    field.get(col + 1, row + 1),
                    field.get(col, row + 1),
                ];
                let origin = Point::new(col as f32 * self.cell_size, row as f32 * self.cell_size);
                emitted += self.cell(corners, origin, threshold, &mut emit);
            }
        }
        emitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corners_for(case: usize) -> [f32; 4] {
        let hi = |bit: usize| if case & bit != 0 { 0.9 } else { 0.1 };
        [hi(8), hi(4), hi(2), hi(1)]
    }

    fn on_boundary(p: Point, origin: Point, size: f32) -> bool {
        let eps = 1e-4;
        let inside = p.x >= origin.x - eps
            && p.x <= origin.x + size + eps
            && p.y >= origin.y - eps
            && p.y <= origin.y + size + eps;
        let on_edge = (p.x - origin.x).abs() < eps
            || (p.x - origin.x - size).abs() < eps
            || (p.y - origin.y).abs() < eps
            || (p.y - origin.y - size).abs() < eps;
        inside && on_edge
    }

    #[test]
    fn test_case_index_bits() {
        assert_eq!(case_index(0.0, 0.0, 0.0, 0.0, 0.5), 0);
        assert_eq!(case_index(1.0, 1.0, 1.0, 1.0, 0.5), 15);
        assert_eq!(case_index(1.0, 0.0, 0.0, 0.0, 0.5), 8);
        assert_eq!(case_index(0.0, 0.0, 0.0, 0.5, 0.5), 1);
    }

    #[test]
    fn test_every_case() {
        let extractor = ContourExtractor::new(7.0);
        let origin = Point::new(14.0, 21.0);
        for case in 0..16 {
            let corners = corners_for(case);
            assert_eq!(case_index(corners[0], corners[1], corners[2], corners[3], 0.5), case);

            let mut segments = Vec::new();
            let emitted = extractor.cell(corners, origin, 0.5, &mut |s: Segment| segments.push(s));
            assert_eq!(emitted, segments.len());
            match case {
                0 | 15 => assert!(segments.is_empty(), "case {case}"),
                5 | 10 => assert_eq!(segments.len(), 2, "case {case}"),
                _ => assert_eq!(segments.len(), 1, "case {case}"),
            }
            for s in &segments {
                assert!(on_boundary(s.from, origin, 7.0), "case {case}: {:?}", s.from);
                assert!(on_boundary(s.to, origin, 7.0), "case {case}: {:?}", s.to);
            }
        }
    }

    #[test]
    fn test_interpolation_position() {
        let extractor = ContourExtractor::new(10.0);
        let mut segments = Vec::new();
        // Only top-left is above: crossings at 25% along top and left edges.
        extractor.cell([1.0, 0.0, 0.0, 0.0], Point::new(0.0, 0.0), 0.75, &mut |s: Segment| {
            segments.push(s)
        });
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].from, Point::new(0.0, 2.5));
        assert_eq!(segments[0].to, Point::new(2.5, 0.0));
    }

    #[test]
    fn test_flat_edge_has_no_nan() {
        assert_eq!(crossing(0.4, 0.4, 0.4), 0.5);
        let extractor = ContourExtractor::new(5.0);
        let mut segments = Vec::new();
        // Top edge flat at the threshold, bottom edge below.
        extractor.cell([0.4, 0.4, 0.1, 0.1], Point::new(0.0, 0.0), 0.4, &mut |s: Segment| {
            segments.push(s)
        });
        for s in &segments {
            assert!(s.from.x.is_finite() && s.from.y.is_finite());
            assert!(s.to.x.is_finite() && s.to.y.is_finite());
        }
    }

    #[test]
    fn test_uniform_field_emits_nothing() {
        let field = ScalarField::from_values(6, 5, vec![0.5; 30]);
        let extractor = ContourExtractor::new(7.0);
        for threshold in ContourExtractor::thresholds(7) {
            assert_eq!(extractor.level(&field, threshold, |_| {}), 0);
        }
        for threshold in [0.1, 0.25, 0.49, 0.51, 0.9] {
            assert_eq!(extractor.level(&field, threshold, |_| {}), 0);
        }
    }

    #[test]
    fn test_thresholds() {
        let levels: Vec<f32> = ContourExtractor::thresholds(4).collect();
        assert_eq!(levels, vec![0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_ramp_produces_one_line() {
        // Values rise left to right: the 0.5 contour is a vertical line.
        let cols = 5;
        let rows = 4;
        let values = (0..rows)
            .flat_map(|_| (0..cols).map(|c| c as f32 / (cols - 1) as f32))
            .collect();
        let field = ScalarField::from_values(cols, rows, values);
        let extractor = ContourExtractor::new(10.0);
        let mut segments = Vec::new();
        let count = extractor.level(&field, 0.4, |s| segments.push(s));
        assert_eq!(count, rows - 1);
        for s in segments {
            assert!((s.from.x - 16.0).abs() < 1e-4);
            assert!((s.to.x - 16.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_degenerate_fields() {
        let extractor = ContourExtractor::new(7.0);
        let single = ScalarField::from_values(1, 1, vec![0.7]);
        assert_eq!(extractor.level(&single, 0.5, |_| {}), 0);
        let empty = ScalarField::new(0, 0);
        assert_eq!(extractor.level(&empty, 0.5, |_| {}), 0);
    }
}
