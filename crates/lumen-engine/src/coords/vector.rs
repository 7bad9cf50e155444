use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// 2D float vector.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vector2f {
    pub x: f32,
    pub y: f32,
}

impl Vector2f {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Component-wise multiplication.
    #[inline]
    pub fn scaled(self, other: Vector2f) -> Vector2f {
        Vector2f::new(self.x * other.x, self.y * other.y)
    }
}

impl Add for Vector2f {
    type Output = Vector2f;
    #[inline]
    fn add(self, rhs: Vector2f) -> Vector2f {
        Vector2f::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2f {
    #[inline]
    fn add_assign(&mut self, rhs: Vector2f) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2f {
    type Output = Vector2f;
    #[inline]
    fn sub(self, rhs: Vector2f) -> Vector2f {
        Vector2f::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vector2f {
    #[inline]
    fn sub_assign(&mut self, rhs: Vector2f) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Neg for Vector2f {
    type Output = Vector2f;
    #[inline]
    fn neg(self) -> Vector2f {
        Vector2f::new(-self.x, -self.y)
    }
}

impl Mul<f32> for Vector2f {
    type Output = Vector2f;
    #[inline]
    fn mul(self, rhs: f32) -> Vector2f {
        Vector2f::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Vector2f {
    type Output = Vector2f;
    #[inline]
    fn div(self, rhs: f32) -> Vector2f {
        Vector2f::new(self.x / rhs, self.y / rhs)
    }
}

impl From<(f32, f32)> for Vector2f {
    #[inline]
    fn from((x, y): (f32, f32)) -> Self {
        Vector2f::new(x, y)
    }
}

/// 3D float vector.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vector3f {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3f {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0 }
    }

    #[inline]
    pub fn xy(self) -> Vector2f {
        Vector2f::new(self.x, self.y)
    }
}

impl Add for Vector3f {
    type Output = Vector3f;
    #[inline]
    fn add(self, rhs: Vector3f) -> Vector3f {
        Vector3f::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3f {
    type Output = Vector3f;
    #[inline]
    fn sub(self, rhs: Vector3f) -> Vector3f {
        Vector3f::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vector3f {
    type Output = Vector3f;
    #[inline]
    fn mul(self, rhs: f32) -> Vector3f {
        Vector3f::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}
