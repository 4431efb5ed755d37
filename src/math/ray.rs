// Copyright 2020 @TwoCookingMice

use super::constants::{ Float, Point3f, Vector3f, INFINITY };
use crate::check_nans;

/// A semi-infinite line `o + t * d`, valid for `t` in `[0, t_max]`.
///
/// The direction is kept as given, so parametric distances stay comparable
/// after the ray is moved between coordinate spaces. `t_max` is the one piece
/// of mutable state: traversal code shrinks it as closer hits are accepted,
/// so a ray value must not be shared between concurrent traversals.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray3f {
    pub o: Point3f,
    pub d: Vector3f,
    pub t_max: Float,
    pub time: Float
}

impl Default for Ray3f {
    fn default() -> Self {
        Self { o: Point3f::origin(), d: Vector3f::zeros(),
               t_max: INFINITY, time: 0.0 }
    }
}

impl Ray3f {
    pub fn new(o: Point3f, d: Vector3f, t_max: Float, time: Float) -> Self {
        check_nans!(o, d, t_max);
        Self { o, d, t_max, time }
    }

    pub fn from_od(o: Point3f, d: Vector3f) -> Self {
        Self::new(o, d, INFINITY, 0.0)
    }

    pub fn origin(&self) -> Point3f {
        self.o
    }

    pub fn dir(&self) -> Vector3f {
        self.d
    }

    pub fn at(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }

    /// Accept `t` as the new closest hit if it lies in `[0, t_max)`.
    pub fn update(&mut self, t: Float) -> bool {
        if t < 0.0 || t >= self.t_max {
            false
        } else {
            self.t_max = t;
            true
        }
    }

    pub fn test_segment(&self, t: Float) -> bool {
        t >= 0.0 && t <= self.t_max
    }
}

/* Tests for Ray */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray3f() {
        let o = Point3f::new(0.0, 0.0, 0.0);
        let d = Vector3f::new(1.0, 0.0, 1.0);
        let mut ray = Ray3f::from_od(o, d);
        assert_eq!(o, ray.origin());
        assert_eq!(ray.t_max, INFINITY);

        // Direction is not normalized.
        let p = ray.at(2.0);
        assert_eq!(p, Point3f::new(2.0, 0.0, 2.0));

        let status1 = ray.update(100.0);
        let status2 = ray.update(105.0);
        let status3 = ray.update(-1.0);
        assert_eq!(status1, true);
        assert_eq!(status2, false);
        assert_eq!(status3, false);
        assert_eq!(ray.t_max, 100.0);
        assert!(ray.test_segment(50.0));
        assert!(!ray.test_segment(101.0));
    }
}
