// Copyright 2020 @TwoCookingMice

use super::constants::{ Float, Point2f, Point3f, Vector2f, Vector3f,
                        FLOAT_MAX, FLOAT_MIN, gamma, lerp };
use super::ray::Ray3f;
use crate::check_nans;

use std::ops;

/// Axis-aligned box given by its two extreme corners.
///
/// The default box is empty: `p_min` sits at the largest representable value
/// and `p_max` at the lowest, so the first union with anything real yields
/// exactly that thing.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds3f {
    pub p_min: Point3f,
    pub p_max: Point3f
}

impl Default for Bounds3f {
    fn default() -> Self {
        Self { p_min: Point3f::new(FLOAT_MAX, FLOAT_MAX, FLOAT_MAX),
               p_max: Point3f::new(FLOAT_MIN, FLOAT_MIN, FLOAT_MIN) }
    }
}

impl ops::Index<usize> for Bounds3f {
    type Output = Point3f;

    fn index(&self, i: usize) -> &Point3f {
        debug_assert!(i == 0 || i == 1);
        if i == 0 { &self.p_min } else { &self.p_max }
    }
}

impl Bounds3f {
    pub fn new(p1: Point3f, p2: Point3f) -> Self {
        check_nans!(p1, p2);
        let mut min = Point3f::origin();
        let mut max = Point3f::origin();
        for idx in 0..3 {
            min[idx] = p1[idx].min(p2[idx]);
            max[idx] = p1[idx].max(p2[idx]);
        }
        Self { p_min: min, p_max: max }
    }

    pub fn from_point(p: Point3f) -> Self {
        check_nans!(p);
        Self { p_min: p, p_max: p }
    }

    pub fn is_empty(&self) -> bool {
        (0..3).any(|idx| self.p_min[idx] > self.p_max[idx])
    }

    /// Corner `i` in `0..8`; bit 0 picks x, bit 1 picks y, bit 2 picks z.
    pub fn corner(&self, i: usize) -> Point3f {
        debug_assert!(i < 8);
        Point3f::new(self[i & 1].x,
                     self[if i & 2 != 0 { 1 } else { 0 }].y,
                     self[if i & 4 != 0 { 1 } else { 0 }].z)
    }

    pub fn union_point(&self, p: &Point3f) -> Bounds3f {
        let mut ret = *self;
        for idx in 0..3 {
            ret.p_min[idx] = self.p_min[idx].min(p[idx]);
            ret.p_max[idx] = self.p_max[idx].max(p[idx]);
        }
        ret
    }

    pub fn union(&self, other: &Bounds3f) -> Bounds3f {
        let mut ret = *self;
        for idx in 0..3 {
            ret.p_min[idx] = self.p_min[idx].min(other.p_min[idx]);
            ret.p_max[idx] = self.p_max[idx].max(other.p_max[idx]);
        }
        ret
    }

    /// Region covered by both boxes; empty when they do not overlap.
    pub fn intersection(&self, other: &Bounds3f) -> Bounds3f {
        let mut ret = *self;
        for idx in 0..3 {
            ret.p_min[idx] = self.p_min[idx].max(other.p_min[idx]);
            ret.p_max[idx] = self.p_max[idx].min(other.p_max[idx]);
        }
        ret
    }

    pub fn overlaps(&self, other: &Bounds3f) -> bool {
        (0..3).all(|idx| self.p_max[idx] >= other.p_min[idx] &&
                         self.p_min[idx] <= other.p_max[idx])
    }

    pub fn inside(&self, p: &Point3f) -> bool {
        (0..3).all(|idx| p[idx] >= self.p_min[idx] && p[idx] <= self.p_max[idx])
    }

    /// Like `inside`, but the upper faces do not belong to the box.
    pub fn inside_exclusive(&self, p: &Point3f) -> bool {
        (0..3).all(|idx| p[idx] >= self.p_min[idx] && p[idx] < self.p_max[idx])
    }

    pub fn expand(&self, delta: Float) -> Bounds3f {
        let d = Vector3f::new(delta, delta, delta);
        Bounds3f { p_min: self.p_min - d, p_max: self.p_max + d }
    }

    pub fn diagonal(&self) -> Vector3f {
        self.p_max - self.p_min
    }

    pub fn center(&self) -> Point3f {
        nalgebra::center(&self.p_min, &self.p_max)
    }

    pub fn surface_area(&self) -> Float {
        let d = self.diagonal();
        2.0 * (d.x * d.y + d.x * d.z + d.y * d.z)
    }

    pub fn volume(&self) -> Float {
        let d = self.diagonal();
        d.x * d.y * d.z
    }

    /// Index of the longest axis. x must be strictly longest; a y/z tie
    /// goes to y.
    pub fn maximum_extent(&self) -> usize {
        let d = self.diagonal();
        if d.x > d.y && d.x > d.z {
            0
        } else if d.y >= d.z {
            1
        } else {
            2
        }
    }

    /// Map a point of the unit cube onto the box.
    pub fn lerp(&self, t: &Point3f) -> Point3f {
        Point3f::new(lerp(t.x, self.p_min.x, self.p_max.x),
                     lerp(t.y, self.p_min.y, self.p_max.y),
                     lerp(t.z, self.p_min.z, self.p_max.z))
    }

    /// Position of `p` relative to the box, `(0,0,0)` at `p_min` and
    /// `(1,1,1)` at `p_max`. Flat axes report 0.
    pub fn offset(&self, p: &Point3f) -> Vector3f {
        let mut o = *p - self.p_min;
        for idx in 0..3 {
            if self.p_max[idx] > self.p_min[idx] {
                o[idx] /= self.p_max[idx] - self.p_min[idx];
            } else {
                o[idx] = 0.0;
            }
        }
        o
    }

    pub fn bounding_sphere(&self) -> (Point3f, Float) {
        let center = self.center();
        let radius = if self.inside(&center) {
            nalgebra::distance(&center, &self.p_max)
        } else {
            0.0
        };
        (center, radius)
    }

    /// Slab test against `[0, ray.t_max]`; returns the parametric overlap.
    ///
    /// Axis-parallel rays divide by zero on purpose. If the origin then lies
    /// on a slab plane the product is NaN, every comparison with it is false,
    /// and that axis leaves the interval alone. The far distance is widened
    /// by `1 + 2 * gamma(3)` so rounding can not turn a grazing hit into a
    /// miss.
    pub fn intersect_p(&self, ray: &Ray3f) -> Option<(Float, Float)> {
        let mut t0: Float = 0.0;
        let mut t1: Float = ray.t_max;
        for idx in 0..3 {
            let inv_ray_dir = 1.0 / ray.d[idx];
            let mut t_near = (self.p_min[idx] - ray.o[idx]) * inv_ray_dir;
            let mut t_far = (self.p_max[idx] - ray.o[idx]) * inv_ray_dir;
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }

            t_far *= 1.0 + 2.0 * gamma(3);

            t0 = if t_near > t0 { t_near } else { t0 };
            t1 = if t_far < t1 { t_far } else { t1 };
            if t0 > t1 {
                return None;
            }
        }

        Some((t0, t1))
    }

    /// Slab test with the reciprocal direction and its sign precomputed, for
    /// traversal loops that test one ray against many boxes.
    pub fn intersect_p_inv(&self, ray: &Ray3f, inv_dir: &Vector3f,
                           dir_is_neg: [usize; 3]) -> bool {
        let mut t_min = (self[dir_is_neg[0]].x - ray.o.x) * inv_dir.x;
        let mut t_max = (self[1 - dir_is_neg[0]].x - ray.o.x) * inv_dir.x;
        let ty_min = (self[dir_is_neg[1]].y - ray.o.y) * inv_dir.y;
        let mut ty_max = (self[1 - dir_is_neg[1]].y - ray.o.y) * inv_dir.y;

        t_max *= 1.0 + 2.0 * gamma(3);
        ty_max *= 1.0 + 2.0 * gamma(3);
        if t_min > ty_max || ty_min > t_max {
            return false;
        }
        if ty_min > t_min {
            t_min = ty_min;
        }
        if ty_max < t_max {
            t_max = ty_max;
        }

        let tz_min = (self[dir_is_neg[2]].z - ray.o.z) * inv_dir.z;
        let mut tz_max = (self[1 - dir_is_neg[2]].z - ray.o.z) * inv_dir.z;
        tz_max *= 1.0 + 2.0 * gamma(3);
        if t_min > tz_max || tz_min > t_max {
            return false;
        }
        if tz_min > t_min {
            t_min = tz_min;
        }
        if tz_max < t_max {
            t_max = tz_max;
        }

        (t_min < ray.t_max) && (t_max > 0.0)
    }
}

/// Two-dimensional counterpart of `Bounds3f`, used for parametric and
/// image-plane extents.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds2f {
    pub p_min: Point2f,
    pub p_max: Point2f
}

impl Default for Bounds2f {
    fn default() -> Self {
        Self { p_min: Point2f::new(FLOAT_MAX, FLOAT_MAX),
               p_max: Point2f::new(FLOAT_MIN, FLOAT_MIN) }
    }
}

impl Bounds2f {
    pub fn new(p1: Point2f, p2: Point2f) -> Self {
        check_nans!(p1, p2);
        Self { p_min: Point2f::new(p1.x.min(p2.x), p1.y.min(p2.y)),
               p_max: Point2f::new(p1.x.max(p2.x), p1.y.max(p2.y)) }
    }

    pub fn union_point(&self, p: &Point2f) -> Bounds2f {
        Bounds2f { p_min: Point2f::new(self.p_min.x.min(p.x), self.p_min.y.min(p.y)),
                   p_max: Point2f::new(self.p_max.x.max(p.x), self.p_max.y.max(p.y)) }
    }

    pub fn union(&self, other: &Bounds2f) -> Bounds2f {
        self.union_point(&other.p_min).union_point(&other.p_max)
    }

    pub fn diagonal(&self) -> Vector2f {
        self.p_max - self.p_min
    }

    pub fn area(&self) -> Float {
        let d = self.diagonal();
        d.x * d.y
    }

    pub fn maximum_extent(&self) -> usize {
        let d = self.diagonal();
        if d.x > d.y { 0 } else { 1 }
    }

    pub fn inside(&self, p: &Point2f) -> bool {
        p.x >= self.p_min.x && p.x <= self.p_max.x &&
            p.y >= self.p_min.y && p.y <= self.p_max.y
    }

    pub fn lerp(&self, t: &Point2f) -> Point2f {
        Point2f::new(lerp(t.x, self.p_min.x, self.p_max.x),
                     lerp(t.y, self.p_min.y, self.p_max.y))
    }

    pub fn offset(&self, p: &Point2f) -> Vector2f {
        let mut o = *p - self.p_min;
        o.x = if self.p_max.x > self.p_min.x { o.x / (self.p_max.x - self.p_min.x) } else { 0.0 };
        o.y = if self.p_max.y > self.p_min.y { o.y / (self.p_max.y - self.p_min.y) } else { 0.0 };
        o
    }
}

/* Test for Bounds */
