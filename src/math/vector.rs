// Copyright 2020 @TwoCookingMice

use super::constants::{ Float, Point2f, Point3f, Vector2f, Vector3f,
                        next_float_down, next_float_up };

use std::ops;

/// Values whose components must never be NaN.
pub trait HasNaNs {
    fn has_nans(&self) -> bool;
}

impl HasNaNs for Float {
    fn has_nans(&self) -> bool {
        self.is_nan()
    }
}

impl HasNaNs for Vector2f {
    fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan()
    }
}

impl HasNaNs for Vector3f {
    fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
}

impl HasNaNs for Point2f {
    fn has_nans(&self) -> bool {
        self.coords.has_nans()
    }
}

impl HasNaNs for Point3f {
    fn has_nans(&self) -> bool {
        self.coords.has_nans()
    }
}

/// Debug-only guard for the no-NaN invariant. Compiled out in release builds.
#[macro_export]
macro_rules! check_nans {
    ($($v:expr),+ $(,)?) => {
        $( debug_assert!(!$crate::math::vector::HasNaNs::has_nans(&$v),
                         "NaN component in {}", stringify!($v)); )+
    };
}

/// Surface normal. Kept apart from `Vector3f` because normals transform with
/// the inverse transpose and must be renormalized after any transform.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Normal3f {
    pub x: Float,
    pub y: Float,
    pub z: Float
}

impl HasNaNs for Normal3f {
    fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
}

impl Normal3f {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        let n = Self { x, y, z };
        check_nans!(n);
        n
    }

    pub fn zeros() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0 }
    }

    pub fn from_vector(v: &Vector3f) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    pub fn to_vector(&self) -> Vector3f {
        Vector3f::new(self.x, self.y, self.z)
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    pub fn length_squared(&self) -> Float {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn length(&self) -> Float {
        self.length_squared().sqrt()
    }

    pub fn normalize(&self) -> Self {
        *self / self.length()
    }

    pub fn dot(&self, v: &Vector3f) -> Float {
        self.x * v.x + self.y * v.y + self.z * v.z
    }

    pub fn dot_normal(&self, n: &Normal3f) -> Float {
        self.x * n.x + self.y * n.y + self.z * n.z
    }

    pub fn abs(&self) -> Self {
        Self { x: self.x.abs(), y: self.y.abs(), z: self.z.abs() }
    }

    /// Flip the normal into the hemisphere that `v` points to.
    pub fn face_forward(&self, v: &Vector3f) -> Self {
        if self.dot(v) < 0.0 { -*self } else { *self }
    }

    pub fn face_forward_normal(&self, n: &Normal3f) -> Self {
        self.face_forward(&n.to_vector())
    }
}

impl From<Vector3f> for Normal3f {
    fn from(v: Vector3f) -> Self {
        Normal3f::from_vector(&v)
    }
}

impl From<Normal3f> for Vector3f {
    fn from(n: Normal3f) -> Self {
        n.to_vector()
    }
}

impl ops::Neg for Normal3f {
    type Output = Normal3f;

    fn neg(self) -> Normal3f {
        Normal3f { x: -self.x, y: -self.y, z: -self.z }
    }
}

impl ops::Add for Normal3f {
    type Output = Normal3f;

    fn add(self, n: Normal3f) -> Normal3f {
        Normal3f::new(self.x + n.x, self.y + n.y, self.z + n.z)
    }
}

impl ops::Sub for Normal3f {
    type Output = Normal3f;

    fn sub(self, n: Normal3f) -> Normal3f {
        Normal3f::new(self.x - n.x, self.y - n.y, self.z - n.z)
    }
}

impl ops::Mul<Float> for Normal3f {
    type Output = Normal3f;

    fn mul(self, s: Float) -> Normal3f {
        check_nans!(s);
        Normal3f::new(self.x * s, self.y * s, self.z * s)
    }
}

impl ops::MulAssign<Float> for Normal3f {
    fn mul_assign(&mut self, s: Float) {
        check_nans!(s);
        self.x *= s;
        self.y *= s;
        self.z *= s;
    }
}

impl ops::Div<Float> for Normal3f {
    type Output = Normal3f;

    fn div(self, f: Float) -> Normal3f {
        check_nans!(f);
        debug_assert!(f != 0.0, "division of a normal by zero");
        let inv = 1.0 / f;
        Normal3f::new(self.x * inv, self.y * inv, self.z * inv)
    }
}

impl ops::Index<usize> for Normal3f {
    type Output = Float;

    fn index(&self, i: usize) -> &Float {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Normal3f index out of range: {}", i)
        }
    }
}

/// Build two unit vectors that complete `v1` (assumed normalized) into an
/// orthonormal basis.
pub fn coordinate_system(v1: &Vector3f) -> (Vector3f, Vector3f) {
    let v2 = if v1.x.abs() > v1.y.abs() {
        Vector3f::new(-v1.z, 0.0, v1.x) / (v1.x * v1.x + v1.z * v1.z).sqrt()
    } else {
        Vector3f::new(0.0, v1.z, -v1.y) / (v1.y * v1.y + v1.z * v1.z).sqrt()
    };
    let v3 = v1.cross(&v2);

    (v2, v3)
}

/// Move `p` off the surface along `n`, far enough that the error box
/// `p_error` around it lies entirely on the side `w` points to.
pub fn offset_ray_origin(p: &Point3f, p_error: &Vector3f,
                         n: &Normal3f, w: &Vector3f) -> Point3f {
    let d = n.abs().dot(p_error);
    let mut offset = n.to_vector() * d;
    if n.dot(w) < 0.0 {
        offset = -offset;
    }

    let mut po = *p + offset;
    for idx in 0..3 {
        if offset[idx] > 0.0 {
            po[idx] = next_float_up(po[idx]);
        } else if offset[idx] < 0.0 {
            po[idx] = next_float_down(po[idx]);
        }
    }

    po
}
