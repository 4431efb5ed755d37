// Copyright 2020 @TwoCookingMice

use super::aabb::Bounds3f;
use super::constants::{ Float, Matrix4f, Point3f, Vector3f, gamma, radians };
use super::ray::Ray3f;
use super::vector::Normal3f;
use crate::check_nans;

use std::fmt;
use std::ops;

#[derive(Debug, Clone, PartialEq)]
pub enum TransformError {
    /// The matrix has no inverse.
    Singular,
    /// The supplied inverse does not undo the matrix. `max_deviation` is the
    /// largest entry of `|m * m_inv - I|`.
    Inconsistent { max_deviation: Float },
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::Singular => write!(f, "matrix is not invertible"),
            TransformError::Inconsistent { max_deviation } =>
                write!(f, "inverse matrix is inconsistent, max deviation from identity: {}", max_deviation),
        }
    }
}

impl std::error::Error for TransformError {}

/// Affine transform stored as a matrix together with its inverse.
///
/// The pair is taken as given and never recomputed; `new` trusts the caller.
/// Use `from_matrix` or `validated` when the inverse is not known to be right.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    matrix: Matrix4f,
    inv_matrix: Matrix4f
}

impl Default for Transform {
    fn default() -> Self {
        Self { matrix: Matrix4f::identity(),
               inv_matrix: Matrix4f::identity() }
    }
}

impl ops::Mul for Transform {
    type Output = Transform;

    /// `(a * b)` applies `b` first, then `a`.
    fn mul(self, rhs: Transform) -> Transform {
        Transform { matrix: self.matrix * rhs.matrix,
                    inv_matrix: rhs.inv_matrix * self.inv_matrix }
    }
}

impl Transform {
    pub fn new(matrix: Matrix4f, inv_matrix: Matrix4f) -> Self {
        Self { matrix, inv_matrix }
    }

    pub fn from_matrix(matrix: Matrix4f) -> Result<Self, TransformError> {
        match matrix.try_inverse() {
            Some(inv_matrix) => Ok(Self { matrix, inv_matrix }),
            None => {
                log::warn!("Refusing to build a transform from a singular matrix: {}", matrix);
                Err(TransformError::Singular)
            }
        }
    }

    /// Build from a caller supplied pair, checking `matrix * inv_matrix ≈ I`
    /// entry by entry within `tolerance`.
    pub fn validated(matrix: Matrix4f, inv_matrix: Matrix4f,
                     tolerance: Float) -> Result<Self, TransformError> {
        let t = Self { matrix, inv_matrix };
        let max_deviation = t.inverse_deviation();
        if max_deviation > tolerance || max_deviation.is_nan() {
            log::warn!("Inconsistent transform pair, deviation {} exceeds tolerance {}.",
                       max_deviation, tolerance);
            return Err(TransformError::Inconsistent { max_deviation });
        }
        log::trace!("Transform pair validated, deviation {}.", max_deviation);
        Ok(t)
    }

    /// Largest absolute entry of `matrix * inv_matrix - I`.
    pub fn inverse_deviation(&self) -> Float {
        let product = self.matrix * self.inv_matrix - Matrix4f::identity();
        // Float::max drops NaN, so it has to stay sticky by hand.
        product.iter().fold(0.0, |acc: Float, v| {
            if acc.is_nan() || v.is_nan() { Float::NAN } else { acc.max(v.abs()) }
        })
    }

    pub fn translate(delta: &Vector3f) -> Self {
        let m = Matrix4f::new(1.0, 0.0, 0.0, delta.x,
                              0.0, 1.0, 0.0, delta.y,
                              0.0, 0.0, 1.0, delta.z,
                              0.0, 0.0, 0.0, 1.0);
        let m_inv = Matrix4f::new(1.0, 0.0, 0.0, -delta.x,
                                  0.0, 1.0, 0.0, -delta.y,
                                  0.0, 0.0, 1.0, -delta.z,
                                  0.0, 0.0, 0.0, 1.0);
        Self::new(m, m_inv)
    }

    pub fn scale(x: Float, y: Float, z: Float) -> Self {
        let m = Matrix4f::new(x, 0.0, 0.0, 0.0,
                              0.0, y, 0.0, 0.0,
                              0.0, 0.0, z, 0.0,
                              0.0, 0.0, 0.0, 1.0);
        let m_inv = Matrix4f::new(1.0 / x, 0.0, 0.0, 0.0,
                                  0.0, 1.0 / y, 0.0, 0.0,
                                  0.0, 0.0, 1.0 / z, 0.0,
                                  0.0, 0.0, 0.0, 1.0);
        Self::new(m, m_inv)
    }

    // Rotations are orthogonal, so the inverse is the transpose.
    pub fn rotate_x(theta: Float) -> Self {
        let (sin_theta, cos_theta) = radians(theta).sin_cos();
        let m = Matrix4f::new(1.0, 0.0, 0.0, 0.0,
                              0.0, cos_theta, -sin_theta, 0.0,
                              0.0, sin_theta, cos_theta, 0.0,
                              0.0, 0.0, 0.0, 1.0);
        Self::new(m, m.transpose())
    }

    pub fn rotate_y(theta: Float) -> Self {
        let (sin_theta, cos_theta) = radians(theta).sin_cos();
        let m = Matrix4f::new(cos_theta, 0.0, sin_theta, 0.0,
                              0.0, 1.0, 0.0, 0.0,
                              -sin_theta, 0.0, cos_theta, 0.0,
                              0.0, 0.0, 0.0, 1.0);
        Self::new(m, m.transpose())
    }

    pub fn rotate_z(theta: Float) -> Self {
        let (sin_theta, cos_theta) = radians(theta).sin_cos();
        let m = Matrix4f::new(cos_theta, -sin_theta, 0.0, 0.0,
                              sin_theta, cos_theta, 0.0, 0.0,
                              0.0, 0.0, 1.0, 0.0,
                              0.0, 0.0, 0.0, 1.0);
        Self::new(m, m.transpose())
    }

    pub fn inverse(&self) -> Self {
        Self { matrix: self.inv_matrix, inv_matrix: self.matrix }
    }

    pub fn matrix(&self) -> &Matrix4f {
        &self.matrix
    }

    pub fn inverse_matrix(&self) -> &Matrix4f {
        &self.inv_matrix
    }

    pub fn is_identity(&self) -> bool {
        self.matrix == Matrix4f::identity()
    }

    /// True when the upper-left 3x3 block has a negative determinant, i.e.
    /// the transform turns a right-handed frame into a left-handed one.
    pub fn swaps_handedness(&self) -> bool {
        let m = &self.matrix;
        let det = m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)]) -
                  m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)]) +
                  m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)]);
        det < 0.0
    }

    /// Affine point transform with implicit `w = 1`. No perspective divide.
    pub fn apply_point(&self, p: &Point3f) -> Point3f {
        let m = &self.matrix;
        let x = m[(0, 0)] * p.x + m[(0, 1)] * p.y + m[(0, 2)] * p.z + m[(0, 3)];
        let y = m[(1, 0)] * p.x + m[(1, 1)] * p.y + m[(1, 2)] * p.z + m[(1, 3)];
        let z = m[(2, 0)] * p.x + m[(2, 1)] * p.y + m[(2, 2)] * p.z + m[(2, 3)];

        let ret = Point3f::new(x, y, z);
        check_nans!(ret);
        ret
    }

    /// Transform `p`, carrying its existing absolute error `p_error` along and
    /// adding the rounding error of the transform itself.
    pub fn apply_point_with_error(&self, p: &Point3f,
                                  p_error: &Vector3f) -> (Point3f, Vector3f) {
        let m = &self.matrix;
        let mut abs_error = Vector3f::zeros();
        for row in 0..3 {
            abs_error[row] =
                (gamma(3) + 1.0) * (m[(row, 0)].abs() * p_error.x +
                                    m[(row, 1)].abs() * p_error.y +
                                    m[(row, 2)].abs() * p_error.z) +
                gamma(3) * ((m[(row, 0)] * p.x).abs() + (m[(row, 1)] * p.y).abs() +
                            (m[(row, 2)] * p.z).abs() + m[(row, 3)].abs());
        }

        (self.apply_point(p), abs_error)
    }

    pub fn apply_vector(&self, v: &Vector3f) -> Vector3f {
        let m = &self.matrix;
        let x = m[(0, 0)] * v.x + m[(0, 1)] * v.y + m[(0, 2)] * v.z;
        let y = m[(1, 0)] * v.x + m[(1, 1)] * v.y + m[(1, 2)] * v.z;
        let z = m[(2, 0)] * v.x + m[(2, 1)] * v.y + m[(2, 2)] * v.z;

        Vector3f::new(x, y, z)
    }

    // Normal transformation is different from point transformation.
    // Before transformation, we have n^Tx = 0
    // After transformation, we have (Sn)^T(Mx) = 0
    // Then, we will get: S = (M^{-1})^T
    // The result is not renormalized.
    pub fn apply_normal(&self, n: &Normal3f) -> Normal3f {
        let inv = &self.inv_matrix;
        let x = inv[(0, 0)] * n.x + inv[(1, 0)] * n.y + inv[(2, 0)] * n.z;
        let y = inv[(0, 1)] * n.x + inv[(1, 1)] * n.y + inv[(2, 1)] * n.z;
        let z = inv[(0, 2)] * n.x + inv[(1, 2)] * n.y + inv[(2, 2)] * n.z;

        Normal3f::new(x, y, z)
    }

    /// Moves origin and direction; `t_max` and `time` carry over unchanged
    /// since the direction is not renormalized.
    pub fn apply_ray(&self, ray: &Ray3f) -> Ray3f {
        let o = self.apply_point(&ray.o);
        let d = self.apply_vector(&ray.d);

        Ray3f::new(o, d, ray.t_max, ray.time)
    }

    /// Bounds of the eight transformed corners. Conservative, not tight.
    pub fn apply_bounds(&self, b: &Bounds3f) -> Bounds3f {
        let mut ret = Bounds3f::from_point(self.apply_point(&b.corner(0)));
        for i in 1..8 {
            ret = ret.union_point(&self.apply_point(&b.corner(i)));
        }
        ret
    }
}

/* Tests for Transform */
