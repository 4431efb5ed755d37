/* Copyright 2020 @Yuchen Wong */

#[cfg(not(feature = "double"))]
pub type Float = f32;
#[cfg(feature = "double")]
pub type Float = f64;

pub type Int = i32;

pub type Vector2f = nalgebra::Vector2<Float>;
pub type Vector3f = nalgebra::Vector3<Float>;
pub type Point2f = nalgebra::Point2<Float>;
pub type Point3f = nalgebra::Point3<Float>;
pub type Matrix4f = nalgebra::Matrix4<Float>;

pub const FLOAT_MAX: Float = Float::MAX;
pub const FLOAT_MIN: Float = Float::MIN;
pub const INFINITY: Float = Float::INFINITY;

// Rounding unit: half of the machine epsilon.
pub const MACHINE_EPSILON: Float = Float::EPSILON * 0.5;

pub const PI: Float = 3.14159265358979323846;
pub const INV_PI: Float = 0.31830988618379067154;

/// Conservative relative error bound after `n` floating point operations.
#[inline]
pub fn gamma(n: Int) -> Float {
    let n = n as Float;
    (n * MACHINE_EPSILON) / (1.0 - n * MACHINE_EPSILON)
}

#[inline]
pub fn lerp(t: Float, v1: Float, v2: Float) -> Float {
    (1.0 - t) * v1 + t * v2
}

#[inline]
pub fn clamp(val: Float, low: Float, high: Float) -> Float {
    if val < low {
        low
    } else if val > high {
        high
    } else {
        val
    }
}

#[inline]
pub fn radians(deg: Float) -> Float {
    (PI / 180.0) * deg
}

#[inline]
pub fn degrees(rad: Float) -> Float {
    (180.0 / PI) * rad
}

/// Real roots of `a t^2 + b t + c`, smaller one first. The discriminant is
/// evaluated in double precision.
pub fn quadratic(a: Float, b: Float, c: Float) -> Option<(Float, Float)> {
    let discrim = (b as f64) * (b as f64) - 4.0 * (a as f64) * (c as f64);
    if discrim < 0.0 {
        return None;
    }
    let root_discrim = discrim.sqrt();

    let q = if b < 0.0 {
        -0.5 * (b as f64 - root_discrim)
    } else {
        -0.5 * (b as f64 + root_discrim)
    };
    let mut t0 = (q / a as f64) as Float;
    let mut t1 = (c as f64 / q) as Float;
    if t0 > t1 {
        std::mem::swap(&mut t0, &mut t1);
    }

    Some((t0, t1))
}

/// Smallest representable value strictly greater than `v`.
pub fn next_float_up(v: Float) -> Float {
    if v.is_infinite() && v > 0.0 {
        return v;
    }
    let v = if v == -0.0 { 0.0 } else { v };
    let bits = v.to_bits();
    let bits = if v >= 0.0 { bits + 1 } else { bits - 1 };
    Float::from_bits(bits)
}

/// Largest representable value strictly less than `v`.
pub fn next_float_down(v: Float) -> Float {
    if v.is_infinite() && v < 0.0 {
        return v;
    }
    let v = if v == 0.0 { -0.0 } else { v };
    let bits = v.to_bits();
    let bits = if v > 0.0 { bits - 1 } else { bits + 1 };
    Float::from_bits(bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gamma_grows_with_op_count() {
        assert!(gamma(1) > 0.0);
        assert!(gamma(3) > gamma(1));
        assert!(gamma(5) > gamma(3));
        // For small n, gamma(n) is close to n * eps / 2.
        assert!((gamma(3) - 3.0 * MACHINE_EPSILON).abs() < 1e-12);
    }

    #[test]
    fn test_clamp_and_lerp() {
        assert_eq!(clamp(2.0, -1.0, 1.0), 1.0);
        assert_eq!(clamp(-2.0, -1.0, 1.0), -1.0);
        assert_eq!(clamp(0.25, -1.0, 1.0), 0.25);
        assert_eq!(lerp(0.0, 3.0, 5.0), 3.0);
        assert_eq!(lerp(1.0, 3.0, 5.0), 5.0);
        assert_eq!(lerp(0.5, 3.0, 5.0), 4.0);
    }

    #[test]
    fn test_next_float_neighbours() {
        assert!(next_float_up(1.0) > 1.0);
        assert!(next_float_down(1.0) < 1.0);
        assert!(next_float_up(0.0) > 0.0);
        assert!(next_float_down(0.0) < 0.0);
        assert!(next_float_up(-1.0) > -1.0);
        assert_eq!(next_float_up(INFINITY), INFINITY);
        assert_eq!(next_float_down(1.0).to_bits() + 1, (1.0 as Float).to_bits());
    }

    #[test]
    fn test_quadratic_roots() {
        let (t0, t1) = quadratic(1.0, -3.0, 2.0).expect("two real roots");
        assert_eq!((t0, t1), (1.0, 2.0));
        let (t0, t1) = quadratic(1.0, 0.0, -25.0).expect("two real roots");
        assert_eq!((t0, t1), (-5.0, 5.0));
        assert_eq!(quadratic(1.0, 0.0, 1.0), None);
    }

    #[test]
    fn test_angle_conversion() {
        assert!((radians(180.0) - PI).abs() < 1e-6);
        assert!((degrees(PI) - 180.0).abs() < 1e-4);
    }
}
