use super::Vector2f;

/// Circle descriptor.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Circle {
    pub center: Vector2f,
    pub radius: f32,
}

impl Circle {
    #[inline]
    pub const fn new(center: Vector2f, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Point on the circle at `angle` radians, measured clockwise from +X
    /// (the space is +Y down).
    #[inline]
    pub fn point_at(self, angle: f32) -> Vector2f {
        self.center + Vector2f::new(angle.cos(), angle.sin()) * self.radius
    }
}

/// Triangle descriptor.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Triangle {
    pub a: Vector2f,
    pub b: Vector2f,
    pub c: Vector2f,
}

impl Triangle {
    #[inline]
    pub const fn new(a: Vector2f, b: Vector2f, c: Vector2f) -> Self {
        Self { a, b, c }
    }

    #[inline]
    pub fn points(self) -> [Vector2f; 3] {
        [self.a, self.b, self.c]
    }

    #[inline]
    pub fn centroid(self) -> Vector2f {
        (self.a + self.b + self.c) / 3.0
    }
}
