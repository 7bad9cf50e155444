//! 2D affine transform stored as a 4x4 matrix.
//!
//! Every operation is composed onto the existing matrix from the left
//! (`M' = Op * M`), so a chain reads in application order:
//!
//! ```rust
//! use lumen_engine::coords::Vector2f;
//! use lumen_engine::transform::Transform;
//!
//! // scale around the origin first, then move right
//! let t = Transform::identity()
//!     .scale(2.0, 2.0, Vector2f::zero())
//!     .translate(Vector2f::new(0.5, 0.0));
//! assert_eq!(t.apply_to(Vector2f::new(0.25, 0.25)), Vector2f::new(1.0, 0.5));
//! ```

use crate::coords::{Vector2f, Vector3f};

/// Row-major 4x4 matrix acting on column vectors.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    m: [[f32; 4]; 4],
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    #[inline]
    pub const fn from_rows(m: [[f32; 4]; 4]) -> Self {
        Self { m }
    }

    #[inline]
    pub fn rows(&self) -> [[f32; 4]; 4] {
        self.m
    }

    fn translation(v: Vector2f) -> Self {
        let mut t = Self::IDENTITY;
        t.m[0][3] = v.x;
        t.m[1][3] = v.y;
        t
    }

    /// Moves by `v`.
    #[must_use]
    pub fn translate(self, v: Vector2f) -> Self {
        Self::translation(v).combine_with(&self)
    }

    /// Rotates by `degrees` around `origin`. With +Y down, positive angles
    /// turn clockwise on screen.
    #[must_use]
    pub fn rotate(self, degrees: f32, origin: Vector2f) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let mut r = Self::IDENTITY;
        r.m[0][0] = cos;
        r.m[0][1] = -sin;
        r.m[1][0] = sin;
        r.m[1][1] = cos;
        Self::about(origin, r).combine_with(&self)
    }

    /// Scales by `(x, y)` around `origin`.
    #[must_use]
    pub fn scale(self, x: f32, y: f32, origin: Vector2f) -> Self {
        let mut s = Self::IDENTITY;
        s.m[0][0] = x;
        s.m[1][1] = y;
        Self::about(origin, s).combine_with(&self)
    }

    /// `T(origin) * op * T(-origin)`.
    fn about(origin: Vector2f, op: Transform) -> Self {
        Self::translation(origin)
            .combine_with(&op)
            .combine_with(&Self::translation(-origin))
    }

    /// Matrix product `self * other`: `other` applies first.
    #[must_use]
    pub fn combine_with(&self, other: &Transform) -> Self {
        let mut out = [[0.0f32; 4]; 4];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.m[i][k] * other.m[k][j]).sum();
            }
        }
        Self { m: out }
    }

    pub fn apply_to(&self, p: Vector2f) -> Vector2f {
        self.apply_to_3d(Vector3f::new(p.x, p.y, 0.0)).xy()
    }

    pub fn apply_to_3d(&self, p: Vector3f) -> Vector3f {
        let v = [p.x, p.y, p.z, 1.0];
        let row = |i: usize| (0..4).map(|k| self.m[i][k] * v[k]).sum::<f32>();
        Vector3f::new(row(0), row(1), row(2))
    }

    /// Column-major layout, as WGSL `mat4x4<f32>` expects.
    pub fn to_cols_array(&self) -> [[f32; 4]; 4] {
        let mut cols = [[0.0f32; 4]; 4];
        for (j, col) in cols.iter_mut().enumerate() {
            for (i, cell) in col.iter_mut().enumerate() {
                *cell = self.m[i][j];
            }
        }
        cols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vector2f { Vector2f::new(x, y) }

    fn close(a: Vector2f, b: Vector2f) -> bool {
        (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5
    }

    fn mat_close(a: &Transform, b: &Transform) -> bool {
        a.rows()
            .iter()
            .flatten()
            .zip(b.rows().iter().flatten())
            .all(|(x, y)| (x - y).abs() < 1e-5)
    }

    // ── basic ops ─────────────────────────────────────────────────────────

    #[test]
    fn identity_translate_moves_point() {
        let t = Transform::identity().translate(v(0.25, -0.5));
        assert_eq!(t.apply_to(v(0.5, 0.5)), v(0.75, 0.0));
    }

    #[test]
    fn rotate_quarter_turn_about_origin() {
        let t = Transform::identity().rotate(90.0, Vector2f::zero());
        assert!(close(t.apply_to(v(1.0, 0.0)), v(0.0, 1.0)));
    }

    #[test]
    fn rotate_keeps_its_origin_fixed() {
        let origin = v(0.5, 0.5);
        let t = Transform::identity().rotate(37.0, origin);
        assert!(close(t.apply_to(origin), origin));
        assert!(close(t.apply_to(v(1.0, 0.5)), origin + v(37f32.to_radians().cos(), 37f32.to_radians().sin()) * 0.5));
    }

    #[test]
    fn scale_about_point() {
        let t = Transform::identity().scale(2.0, 3.0, v(1.0, 1.0));
        assert!(close(t.apply_to(v(1.0, 1.0)), v(1.0, 1.0)));
        assert!(close(t.apply_to(v(2.0, 2.0)), v(3.0, 4.0)));
    }

    #[test]
    fn operations_compose_from_the_left() {
        // translate then scale: scale applies to the already-moved point
        let t = Transform::identity()
            .translate(v(1.0, 0.0))
            .scale(2.0, 2.0, Vector2f::zero());
        assert!(close(t.apply_to(v(0.0, 0.0)), v(2.0, 0.0)));
    }

    #[test]
    fn apply_to_3d_keeps_z() {
        let t = Transform::identity().translate(v(1.0, 2.0));
        assert_eq!(t.apply_to_3d(Vector3f::new(0.0, 0.0, 5.0)), Vector3f::new(1.0, 2.0, 5.0));
    }

    // ── composition ───────────────────────────────────────────────────────

    #[test]
    fn combine_is_associative() {
        let a = Transform::identity().rotate(30.0, v(0.2, 0.1));
        let b = Transform::identity().scale(1.5, 0.5, v(0.3, 0.3));
        let c = Transform::identity().translate(v(-0.4, 0.9));
        let left = a.combine_with(&b).combine_with(&c);
        let right = a.combine_with(&b.combine_with(&c));
        assert!(mat_close(&left, &right));
    }

    #[test]
    fn combine_is_not_commutative() {
        let a = Transform::identity().rotate(90.0, Vector2f::zero());
        let b = Transform::identity().translate(v(1.0, 0.0));
        assert!(!mat_close(&a.combine_with(&b), &b.combine_with(&a)));
    }

    #[test]
    fn combine_applies_other_first() {
        let a = Transform::identity().scale(2.0, 2.0, Vector2f::zero());
        let b = Transform::identity().translate(v(1.0, 1.0));
        // a * b: translate, then scale
        assert!(close(a.combine_with(&b).apply_to(Vector2f::zero()), v(2.0, 2.0)));
    }

    #[test]
    fn identity_is_neutral() {
        let t = Transform::identity().rotate(12.0, v(0.3, 0.7)).translate(v(0.1, 0.0));
        assert!(mat_close(&t.combine_with(&Transform::identity()), &t));
        assert!(mat_close(&Transform::identity().combine_with(&t), &t));
    }

    // ── GPU layout ────────────────────────────────────────────────────────

    #[test]
    fn cols_array_puts_translation_in_last_column() {
        let cols = Transform::identity().translate(v(3.0, 4.0)).to_cols_array();
        assert_eq!(cols[3], [3.0, 4.0, 0.0, 1.0]);
        assert_eq!(cols[0], [1.0, 0.0, 0.0, 0.0]);
    }
}
