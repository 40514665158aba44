#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Everything is `f64` in content coordinates (origin at the top-left of the
//! scrollable content, y grows downward).

/// A point in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Round both coordinates to the nearest whole unit, halves away from zero.
    ///
    /// Idempotent: `p.rounded().rounded() == p.rounded()`.
    #[inline]
    #[must_use]
    pub fn rounded(self) -> Self {
        Self::new(self.x.round(), self.y.round())
    }

    /// Whether both coordinates are already whole numbers.
    #[inline]
    #[must_use]
    pub fn is_integral(self) -> bool {
        self.x.fract() == 0.0 && self.y.fract() == 0.0
    }

    /// Manhattan distance to `other`.
    #[inline]
    #[must_use]
    pub fn manhattan_distance(self, other: Point) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Euclidean distance to `other`.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Square of side `side`.
    #[inline]
    pub const fn square(side: f64) -> Self {
        Self::new(side, side)
    }
}

/// An axis-aligned rectangle used for viewports, item frames, and queries.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from an origin and a size.
    #[inline]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Create a rectangle of `size` centered on `center`.
    #[inline]
    pub fn from_center(center: Point, size: Size) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if the rectangle has zero (or negative) area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside the rectangle (right/bottom exclusive).
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Whether the two rectangles overlap with positive area.
    ///
    /// Rectangles that only share an edge do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Shrink by `dx` on the left and right and `dy` on the top and bottom.
    ///
    /// Negative values grow the rectangle, so `inset_by(-100.0, -100.0)` adds a
    /// 100-unit margin on every side.
    #[must_use]
    pub fn inset_by(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(
            self.x + dx,
            self.y + dy,
            (self.width - 2.0 * dx).max(0.0),
            (self.height - 2.0 * dy).max(0.0),
        )
    }

    /// Same rectangle with a different origin.
    #[must_use]
    pub fn with_origin(&self, origin: Point) -> Rect {
        Rect::from_origin_size(origin, self.size())
    }
}

#[cfg(test)]
mod tests {
    use super::{Point, Rect, Size};

    #[test]
    fn rect_contains_edges() {
        let rect = Rect::new(2.0, 3.0, 4.0, 5.0);
        assert!(rect.contains(Point::new(2.0, 3.0)));
        assert!(rect.contains(Point::new(5.9, 7.9)));
        assert!(!rect.contains(Point::new(6.0, 3.0)));
        assert!(!rect.contains(Point::new(2.0, 8.0)));
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&Rect::new(9.5, 9.5, 1.0, 1.0)));
    }

    #[test]
    fn empty_rect_never_intersects() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&Rect::new(2.0, 2.0, 0.0, 5.0)));
    }

    #[test]
    fn negative_inset_expands_every_side() {
        let viewport = Rect::new(0.0, 200.0, 390.0, 844.0);
        let buffered = viewport.inset_by(-100.0, -100.0);
        assert_eq!(buffered, Rect::new(-100.0, 100.0, 590.0, 1044.0));
    }

    #[test]
    fn positive_inset_clamps_to_zero_size() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0).inset_by(8.0, 8.0);
        assert!(r.is_empty());
    }

    #[test]
    fn from_center_round_trips_center() {
        let c = Point::new(100.5, 42.25);
        let r = Rect::from_center(c, Size::square(60.0));
        assert_eq!(r.center(), c);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(Point::new(0.5, -0.5).rounded(), Point::new(1.0, -1.0));
        assert_eq!(Point::new(99.4999, 600.2).rounded(), Point::new(99.0, 600.0));
        assert!(Point::new(3.0, -7.0).is_integral());
        assert!(!Point::new(3.0, 7.000_001).is_integral());
    }

    #[test]
    fn manhattan_distance_sums_axes() {
        let a = Point::new(100.0, 500.0);
        let b = Point::new(130.0, 600.0);
        assert!((a.manhattan_distance(b) - 130.0).abs() < f64::EPSILON);
        assert!((a.distance(Point::new(103.0, 504.0)) - 5.0).abs() < 1e-12);
    }
}
