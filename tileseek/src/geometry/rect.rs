use crate::geometry::PointD;

/// An axis-aligned rectangle represented by minimum and maximum coordinates.
///
/// `RectD` is used for tile bounds, viewports and quadtree cells. All
/// predicates treat the rectangle as a closed region, so rectangles that
/// merely touch still intersect and a degenerate rectangle (a single point)
/// is a valid bound.
#[derive(Clone, Copy, PartialEq, Default, Debug, serde::Deserialize, serde::Serialize)]
pub struct RectD {
    /// Minimum X coordinate
    pub min_x: f64,
    /// Minimum Y coordinate
    pub min_y: f64,
    /// Maximum X coordinate
    pub max_x: f64,
    /// Maximum Y coordinate
    pub max_y: f64,
}

impl std::fmt::Display for RectD {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RectD({}, {}, {}, {})",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

impl RectD {
    /// Creates a new rectangle with the specified corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> RectD {
        RectD {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates a degenerate rectangle containing exactly one point.
    pub fn from_point(point: PointD) -> RectD {
        RectD::new(point.x, point.y, point.x, point.y)
    }

    pub fn center(&self) -> PointD {
        PointD::new(
            (self.min_x + self.max_x) * 0.5,
            (self.min_y + self.max_y) * 0.5,
        )
    }

    pub fn size_x(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn size_y(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Checks whether this rectangle and `other` share at least one point.
    pub fn intersects(&self, other: &RectD) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// Checks whether `point` lies inside this rectangle (borders included).
    pub fn contains_point(&self, point: PointD) -> bool {
        self.min_x <= point.x
            && point.x <= self.max_x
            && self.min_y <= point.y
            && point.y <= self.max_y
    }

    /// Checks whether `other` lies fully inside this rectangle.
    pub fn contains_rect(&self, other: &RectD) -> bool {
        self.min_x <= other.min_x
            && other.max_x <= self.max_x
            && self.min_y <= other.min_y
            && other.max_y <= self.max_y
    }

    /// Grows this rectangle so that it contains `point`.
    pub fn expand_to_point(&mut self, point: PointD) {
        self.min_x = self.min_x.min(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_x = self.max_x.max(point.x);
        self.max_y = self.max_y.max(point.y);
    }

    /// Returns a copy of this rectangle with both side lengths multiplied by
    /// `factor`, scaled uniformly about the centroid.
    ///
    /// The progressive viewport expansion relies on this exact contract: the
    /// center stays fixed while the area grows by `factor²`.
    pub fn scaled(&self, factor: f64) -> RectD {
        let center = self.center();
        let half_x = self.size_x() * factor * 0.5;
        let half_y = self.size_y() * factor * 0.5;
        RectD::new(
            center.x - half_x,
            center.y - half_y,
            center.x + half_x,
            center.y + half_y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersects_overlap_and_touch() {
        let a = RectD::new(0.0, 0.0, 2.0, 2.0);
        let b = RectD::new(1.0, 1.0, 3.0, 3.0);
        let touching = RectD::new(2.0, 0.0, 4.0, 2.0);
        let apart = RectD::new(5.0, 5.0, 6.0, 6.0);
        assert!(a.intersects(&b));
        assert!(a.intersects(&touching));
        assert!(!a.intersects(&apart));
    }

    #[test]
    fn test_contains_point_borders() {
        let r = RectD::new(0.0, 0.0, 1.0, 1.0);
        assert!(r.contains_point(PointD::new(0.0, 0.0)));
        assert!(r.contains_point(PointD::new(1.0, 0.5)));
        assert!(!r.contains_point(PointD::new(1.1, 0.5)));
    }

    #[test]
    fn test_contains_rect() {
        let outer = RectD::new(0.0, 0.0, 10.0, 10.0);
        let inner = RectD::new(2.0, 2.0, 8.0, 8.0);
        assert!(outer.contains_rect(&inner));
        assert!(outer.contains_rect(&outer));
        assert!(!inner.contains_rect(&outer));
    }

    #[test]
    fn test_degenerate_rect() {
        let point_rect = RectD::from_point(PointD::new(3.0, 4.0));
        let viewport = RectD::new(0.0, 0.0, 5.0, 5.0);
        assert!(viewport.intersects(&point_rect));
        assert!(viewport.contains_rect(&point_rect));
        assert_eq!(point_rect.size_x(), 0.0);
    }

    #[test]
    fn test_expand_to_point() {
        let mut r = RectD::from_point(PointD::new(1.0, 1.0));
        r.expand_to_point(PointD::new(-2.0, 3.0));
        assert_eq!(r, RectD::new(-2.0, 1.0, 1.0, 3.0));
    }

    #[test]
    fn test_scaled_about_center() {
        let r = RectD::new(0.0, 0.0, 1.0, 1.0);
        let scaled = r.scaled(5.0);
        assert_eq!(scaled, RectD::new(-2.0, -2.0, 3.0, 3.0));
        assert_eq!(scaled.center(), r.center());
    }

    #[test]
    fn test_scaled_identity() {
        let r = RectD::new(4.9, 4.9, 5.1, 5.1);
        let scaled = r.scaled(1.0);
        assert!((scaled.min_x - 4.9).abs() < 1e-12);
        assert!((scaled.max_x - 5.1).abs() < 1e-12);
    }

    #[test]
    fn test_scaled_shrink() {
        let r = RectD::new(0.0, 0.0, 4.0, 4.0);
        let scaled = r.scaled(0.5);
        assert_eq!(scaled, RectD::new(1.0, 1.0, 3.0, 3.0));
    }
}
