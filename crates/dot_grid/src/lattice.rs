use bevy::math::Vec2;

use crate::displacement::DotPhase;

/// One dot: where it sits, how far it is currently pushed, and where it is in its push cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticePoint {
    pub rest: Vec2,
    pub offset: Vec2,
    pub phase: DotPhase,
}

impl LatticePoint {
    pub const fn new(rest: Vec2) -> Self {
        Self {
            rest,
            offset: Vec2::ZERO,
            phase: DotPhase::Idle,
        }
    }

    /// Where the dot is drawn this frame.
    pub fn position(&self) -> Vec2 {
        self.rest + self.offset
    }
}

/// Row-major grid of dots centered in a container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lattice {
    points: Vec<LatticePoint>,
    cols: usize,
    rows: usize,
    size: Vec2,
}

/// How many dots of `dot_size` separated by `gap` fit in `extent`.
pub fn fit_count(extent: f32, dot_size: f32, gap: f32) -> usize {
    ((extent + gap) / (dot_size + gap)).floor().max(0.0) as usize
}

impl Lattice {
    /// Lays out a fresh grid for a `size` container.
    ///
    /// Returns `None` while the container has no area yet, callers keep their previous grid.
    pub fn build(size: Vec2, dot_size: f32, gap: f32) -> Option<Self> {
        if !size.is_finite() || size.x <= 0.0 || size.y <= 0.0 {
            return None;
        }

        let cols = fit_count(size.x, dot_size, gap);
        let rows = fit_count(size.y, dot_size, gap);
        let stride = dot_size + gap;

        let grid = Vec2::new(
            stride.mul_add(cols as f32, -gap),
            stride.mul_add(rows as f32, -gap),
        );
        let start = (size - grid) / 2.0 + dot_size / 2.0;

        let points = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| (col, row)))
            .map(|(col, row)| {
                LatticePoint::new(start + Vec2::new(col as f32, row as f32) * stride)
            })
            .collect();

        Some(Self {
            points,
            cols,
            rows,
            size,
        })
    }

    pub fn points(&self) -> &[LatticePoint] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [LatticePoint] {
        &mut self.points
    }

    pub const fn cols(&self) -> usize {
        self.cols
    }

    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Container size the grid was built for.
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(400.0, 8.0, 20.0, 15)]
    #[case(360.0, 5.0, 12.0, 21)]
    #[case(8.0, 8.0, 20.0, 1)]
    #[case(7.0, 8.0, 20.0, 0)]
    fn fit_count_floors(
        #[case] extent: f32,
        #[case] dot: f32,
        #[case] gap: f32,
        #[case] expected: usize,
    ) {
        assert_eq!(fit_count(extent, dot, gap), expected, "{extent} / ({dot} + {gap})");
    }

    #[rstest]
    #[case(Vec2::new(400.0, 400.0), 8.0, 20.0)]
    #[case(Vec2::new(1280.0, 720.0), 8.0, 20.0)]
    #[case(Vec2::new(375.5, 812.25), 5.0, 12.0)]
    #[case(Vec2::new(61.0, 33.0), 3.0, 0.0)]
    fn grid_is_centered(#[case] size: Vec2, #[case] dot: f32, #[case] gap: f32) {
        let lattice = Lattice::build(size, dot, gap).expect("container has an area");
        let first = lattice.points().first().expect("grid has points").rest;
        let last = lattice.points().last().expect("grid has points").rest;

        let leading = first - dot / 2.0;
        let trailing = size - (last + dot / 2.0);
        assert!(leading.x >= 0.0 && leading.y >= 0.0, "inside the top left edge");
        assert!(trailing.x >= -1e-3 && trailing.y >= -1e-3, "inside the bottom right edge");
        assert!(
            (leading - trailing).abs().max_element() <= 1.0,
            "symmetric slack, {leading} vs {trailing}"
        );
    }

    #[test]
    fn point_count_is_cols_times_rows() {
        let lattice = Lattice::build(Vec2::new(400.0, 300.0), 8.0, 20.0).expect("sized");
        assert_eq!(lattice.cols(), 15, "columns");
        assert_eq!(lattice.rows(), 11, "rows");
        assert_eq!(lattice.len(), 15 * 11, "points");
    }

    #[test]
    fn points_are_row_major_with_uniform_stride() {
        let lattice = Lattice::build(Vec2::new(400.0, 400.0), 8.0, 20.0).expect("sized");
        let points = lattice.points();
        let (Some(a), Some(b), Some(below)) = (points.first(), points.get(1), points.get(15))
        else {
            panic!("grid too small");
        };
        assert_eq!(b.rest - a.rest, Vec2::new(28.0, 0.0), "next column");
        assert_eq!(below.rest - a.rest, Vec2::new(0.0, 28.0), "next row");
        assert!(
            points.iter().all(|point| point.offset == Vec2::ZERO && point.phase.is_idle()),
            "fresh points are idle"
        );
    }

    #[rstest]
    #[case(Vec2::ZERO)]
    #[case(Vec2::new(0.0, 300.0))]
    #[case(Vec2::new(400.0, -1.0))]
    #[case(Vec2::new(f32::NAN, 300.0))]
    fn empty_container_builds_nothing(#[case] size: Vec2) {
        assert_eq!(Lattice::build(size, 8.0, 20.0), None, "no grid for {size}");
    }
}
