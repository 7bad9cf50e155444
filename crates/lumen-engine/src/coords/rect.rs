use super::Vector2f;

/// Axis-aligned rectangle (top-left origin, +Y down).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rectangle {
    pub top_left: Vector2f,
    pub size: Vector2f,
}

impl Rectangle {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            top_left: Vector2f::new(x, y),
            size: Vector2f::new(w, h),
        }
    }

    #[inline]
    pub const fn from_top_left_size(top_left: Vector2f, size: Vector2f) -> Self {
        Self { top_left, size }
    }

    /// The unit square `[0, 1] x [0, 1]`.
    #[inline]
    pub const fn unit() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    /// Smallest rectangle containing every point; `None` for an empty slice.
    pub fn bounding(points: &[Vector2f]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points.iter().fold((first, first), |(lo, hi), p| {
            (
                Vector2f::new(lo.x.min(p.x), lo.y.min(p.y)),
                Vector2f::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        });
        Some(Rectangle::from_top_left_size(min, max - min))
    }

    #[inline]
    pub fn min(self) -> Vector2f {
        self.top_left
    }

    #[inline]
    pub fn max(self) -> Vector2f {
        self.top_left + self.size
    }

    #[inline]
    pub fn top_right(self) -> Vector2f {
        Vector2f::new(self.top_left.x + self.size.x, self.top_left.y)
    }

    #[inline]
    pub fn bottom_left(self) -> Vector2f {
        Vector2f::new(self.top_left.x, self.top_left.y + self.size.y)
    }

    #[inline]
    pub fn center(self) -> Vector2f {
        self.top_left + self.size * 0.5
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Flips negative extents so width and height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let Rectangle { top_left: Vector2f { mut x, mut y }, size: Vector2f { x: mut w, y: mut h } } =
            self;
        if w < 0.0 {
            x += w;
            w = -w;
        }
        if h < 0.0 {
            y += h;
            h = -h;
        }
        Rectangle::new(x, y, w, h)
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vector2f) -> bool {
        let r = self.normalized();
        let max = r.max();
        p.x >= r.top_left.x && p.y >= r.top_left.y && p.x < max.x && p.y < max.y
    }

    /// Shrinks every side by `dx` horizontally and `dy` vertically.
    #[inline]
    pub fn inset(self, dx: f32, dy: f32) -> Self {
        Rectangle::new(
            self.top_left.x + dx,
            self.top_left.y + dy,
            self.size.x - 2.0 * dx,
            self.size.y - 2.0 * dy,
        )
    }

    /// Maps a point inside this rectangle to `[0, 1]` coordinates relative to it.
    /// A zero extent maps to `0`.
    #[inline]
    pub fn relative(self, p: Vector2f) -> Vector2f {
        let rel = |v: f32, origin: f32, extent: f32| {
            if extent.abs() <= f32::EPSILON { 0.0 } else { (v - origin) / extent }
        };
        Vector2f::new(
            rel(p.x, self.top_left.x, self.size.x),
            rel(p.y, self.top_left.y, self.size.y),
        )
    }

    #[inline]
    pub fn intersect(self, other: Rectangle) -> Option<Rectangle> {
        let a = self.normalized();
        let b = other.normalized();

        let x0 = a.top_left.x.max(b.top_left.x);
        let y0 = a.top_left.y.max(b.top_left.y);
        let x1 = a.max().x.min(b.max().x);
        let y1 = a.max().y.min(b.max().y);

        if x1 - x0 <= 0.0 || y1 - y0 <= 0.0 {
            None
        } else {
            Some(Rectangle::new(x0, y0, x1 - x0, y1 - y0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rectangle { Rectangle::new(x, y, w, h) }
    fn v(x: f32, y: f32) -> Vector2f { Vector2f::new(x, y) }

    // ── normalized ────────────────────────────────────────────────────────

    #[test]
    fn normalized_flips_negative_width() {
        let n = r(10.0, 0.0, -4.0, 5.0).normalized();
        assert_eq!(n, r(6.0, 0.0, 4.0, 5.0));
    }

    #[test]
    fn normalized_flips_negative_height() {
        let n = r(0.0, 10.0, 5.0, -3.0).normalized();
        assert_eq!(n, r(0.0, 7.0, 5.0, 3.0));
    }

    // ── contains ──────────────────────────────────────────────────────────

    #[test]
    fn contains_is_half_open() {
        let rect = r(0.0, 0.0, 1.0, 1.0);
        assert!(rect.contains(v(0.0, 0.0)));
        assert!(rect.contains(v(0.5, 0.99)));
        assert!(!rect.contains(v(1.0, 1.0)));
        assert!(!rect.contains(v(-0.1, 0.5)));
    }

    // ── bounding ──────────────────────────────────────────────────────────

    #[test]
    fn bounding_of_points() {
        let b = Rectangle::bounding(&[v(0.2, 0.5), v(0.8, 0.1), v(0.4, 0.9)]).unwrap();
        assert!((b.top_left.x - 0.2).abs() < 1e-6);
        assert!((b.top_left.y - 0.1).abs() < 1e-6);
        assert!((b.size.x - 0.6).abs() < 1e-6);
        assert!((b.size.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn bounding_of_nothing() {
        assert!(Rectangle::bounding(&[]).is_none());
    }

    // ── relative / inset / intersect ──────────────────────────────────────

    #[test]
    fn relative_maps_corners_to_unit() {
        let rect = r(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.relative(rect.top_left), v(0.0, 0.0));
        assert_eq!(rect.relative(rect.max()), v(1.0, 1.0));
    }

    #[test]
    fn relative_zero_extent_is_zero() {
        assert_eq!(r(1.0, 1.0, 0.0, 0.0).relative(v(5.0, 5.0)), v(0.0, 0.0));
    }

    #[test]
    fn inset_shrinks_both_sides() {
        assert_eq!(r(0.0, 0.0, 10.0, 10.0).inset(1.0, 2.0), r(1.0, 2.0, 8.0, 6.0));
    }

    #[test]
    fn intersect_overlapping_and_touching() {
        let a = r(0.0, 0.0, 10.0, 10.0);
        assert_eq!(a.intersect(r(5.0, 5.0, 10.0, 10.0)), Some(r(5.0, 5.0, 5.0, 5.0)));
        assert!(a.intersect(r(10.0, 0.0, 10.0, 10.0)).is_none());
    }
}
