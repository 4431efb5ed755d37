// Copyright @yucwang 2023

use crate::core::interaction::SurfaceInteraction;
use crate::core::shape::{ Shape, ShapeData };
use crate::math::aabb::Bounds3f;
use crate::math::constants::{ Float, Point2f, Point3f, Vector3f, PI,
                              clamp, gamma, quadratic, radians };
use crate::math::ray::Ray3f;
use crate::math::vector::Normal3f;

/// Sphere centred at the object-space origin, optionally clipped in z and
/// swept only through `[0, phi_max]` around the z axis.
pub struct Sphere {
    data: ShapeData,
    radius: Float,
    z_min: Float,
    z_max: Float,
    theta_min: Float,
    theta_max: Float,
    phi_max: Float
}

impl Sphere {
    /// `phi_max` is in degrees and clamped to `[0, 360]`; the z range is
    /// ordered and clamped to `[-radius, radius]`.
    pub fn new(data: ShapeData, radius: Float, z_min: Float, z_max: Float,
               phi_max: Float) -> Self {
        let lo = z_min.min(z_max);
        let hi = z_min.max(z_max);
        let sphere = Self {
            data,
            radius,
            z_min: clamp(lo, -radius, radius),
            z_max: clamp(hi, -radius, radius),
            theta_min: clamp(lo / radius, -1.0, 1.0).acos(),
            theta_max: clamp(hi / radius, -1.0, 1.0).acos(),
            phi_max: radians(clamp(phi_max, 0.0, 360.0)),
        };
        log::debug!("Created {}.", sphere.describe());
        sphere
    }

    /// Complete sphere of the given radius.
    pub fn full(data: ShapeData, radius: Float) -> Self {
        Self::new(data, radius, -radius, radius, 360.0)
    }

    pub fn radius(&self) -> Float {
        self.radius
    }

    // Object-space hit point for `t`, pushed back onto the surface, and its
    // azimuth in [0, 2pi).
    fn hit_point(&self, ray: &Ray3f, t: Float) -> (Point3f, Float) {
        let p = ray.at(t);
        let mut p_hit = Point3f::from(p.coords * (self.radius / p.coords.norm()));
        if p_hit.x == 0.0 && p_hit.y == 0.0 {
            p_hit.x = 1e-5 * self.radius;
        }
        let mut phi = p_hit.y.atan2(p_hit.x);
        if phi < 0.0 {
            phi += 2.0 * PI;
        }
        (p_hit, phi)
    }

    fn is_clipped(&self, p_hit: &Point3f, phi: Float) -> bool {
        (self.z_min > -self.radius && p_hit.z < self.z_min) ||
            (self.z_max < self.radius && p_hit.z > self.z_max) ||
            phi > self.phi_max
    }

    // Nearest unclipped root in (0, t_max] of the object-space ray.
    fn nearest_hit(&self, ray: &Ray3f) -> Option<(Float, Point3f, Float)> {
        let o = ray.o.coords;
        let d = ray.d;
        let a = d.norm_squared();
        let b = 2.0 * d.dot(&o);
        let c = o.norm_squared() - self.radius * self.radius;

        let (t0, t1) = quadratic(a, b, c)?;
        if t0 > ray.t_max || t1 <= 0.0 {
            return None;
        }

        let mut t_shape_hit = t0;
        if t_shape_hit <= 0.0 {
            t_shape_hit = t1;
            if t_shape_hit > ray.t_max {
                return None;
            }
        }

        let (mut p_hit, mut phi) = self.hit_point(ray, t_shape_hit);
        if self.is_clipped(&p_hit, phi) {
            if t_shape_hit == t1 || t1 > ray.t_max {
                return None;
            }
            t_shape_hit = t1;
            let (p, ph) = self.hit_point(ray, t_shape_hit);
            p_hit = p;
            phi = ph;
            if self.is_clipped(&p_hit, phi) {
                return None;
            }
        }

        Some((t_shape_hit, p_hit, phi))
    }
}

impl Shape for Sphere {
    fn data(&self) -> &ShapeData {
        &self.data
    }

    fn describe(&self) -> String {
        format!("Sphere {}: radius = {}, z = [{}, {}], phi_max = {}",
                self.data.id, self.radius, self.z_min, self.z_max, self.phi_max)
    }

    fn object_bound(&self) -> Bounds3f {
        Bounds3f::new(Point3f::new(-self.radius, -self.radius, self.z_min),
                      Point3f::new(self.radius, self.radius, self.z_max))
    }

    fn intersect(&self, r: &Ray3f, _test_alpha_texture: bool) -> Option<(Float, SurfaceInteraction)> {
        let ray = self.data.world_to_object.apply_ray(r);
        let (t_shape_hit, p_hit, phi) = self.nearest_hit(&ray)?;

        // Parametric representation of the hit.
        let u = phi / self.phi_max;
        let cos_theta = clamp(p_hit.z / self.radius, -1.0, 1.0);
        let theta = cos_theta.acos();
        let theta_range = self.theta_max - self.theta_min;
        let v = (theta - self.theta_min) / theta_range;

        let z_radius = (p_hit.x * p_hit.x + p_hit.y * p_hit.y).sqrt();
        let cos_phi = p_hit.x / z_radius;
        let sin_phi = p_hit.y / z_radius;
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let dpdu = Vector3f::new(-self.phi_max * p_hit.y, self.phi_max * p_hit.x, 0.0);
        let dpdv = theta_range *
            Vector3f::new(p_hit.z * cos_phi, p_hit.z * sin_phi, -self.radius * sin_theta);

        // Weingarten equations for the normal derivatives.
        let d2pduu = -self.phi_max * self.phi_max * Vector3f::new(p_hit.x, p_hit.y, 0.0);
        let d2pduv = theta_range * p_hit.z * self.phi_max * Vector3f::new(-sin_phi, cos_phi, 0.0);
        let d2pdvv = -theta_range * theta_range * p_hit.coords;

        let e1 = dpdu.dot(&dpdu);
        let f1 = dpdu.dot(&dpdv);
        let g1 = dpdv.dot(&dpdv);
        let n = dpdu.cross(&dpdv).normalize();
        let e = n.dot(&d2pduu);
        let f = n.dot(&d2pduv);
        let g = n.dot(&d2pdvv);

        let inv_egf2 = 1.0 / (e1 * g1 - f1 * f1);
        let dndu = Normal3f::from_vector(&((f * f1 - e * g1) * inv_egf2 * dpdu +
                                           (e * f1 - f * e1) * inv_egf2 * dpdv));
        let dndv = Normal3f::from_vector(&((g * f1 - f * g1) * inv_egf2 * dpdu +
                                           (f * f1 - g * e1) * inv_egf2 * dpdv));

        let p_error = gamma(5) * p_hit.coords.abs();

        let isect = SurfaceInteraction::new(p_hit, p_error, Point2f::new(u, v), -ray.d,
                                            dpdu, dpdv, dndu, dndv, ray.time,
                                            self.data.flips_normals(), 0);

        Some((t_shape_hit, isect.transformed(&self.data.object_to_world)))
    }

    fn intersect_p(&self, r: &Ray3f, _test_alpha_texture: bool) -> bool {
        let ray = self.data.world_to_object.apply_ray(r);
        self.nearest_hit(&ray).is_some()
    }

    fn area(&self) -> Float {
        self.phi_max * self.radius * (self.z_max - self.z_min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::transform::Transform;
    use approx::assert_relative_eq;

    fn unit_sphere() -> Sphere {
        Sphere::full(ShapeData::from_transform(Transform::default(), false), 1.0)
    }

    #[test]
    fn test_object_bound_of_full_sphere() {
        let sphere = Sphere::full(ShapeData::from_transform(Transform::default(), false), 2.5);
        let b = sphere.object_bound();
        assert_eq!(b.p_min, Point3f::new(-2.5, -2.5, -2.5));
        assert_eq!(b.p_max, Point3f::new(2.5, 2.5, 2.5));
    }

    #[test]
    fn test_parameters_are_clamped() {
        let data = ShapeData::from_transform(Transform::default(), false);
        let sphere = Sphere::new(data.with_id("clamped"), 1.0, 3.0, -0.5, 720.0);
        let b = sphere.object_bound();
        assert_eq!(b.p_min.z, -0.5);
        assert_eq!(b.p_max.z, 1.0);
        assert_relative_eq!(sphere.phi_max, 2.0 * PI, epsilon = 1e-6);
        assert_eq!(sphere.id(), "clamped");
    }

    #[test]
    fn test_area() {
        let sphere = unit_sphere();
        assert_relative_eq!(sphere.area(), 4.0 * PI, epsilon = 1e-5);
    }

    #[test]
    fn test_hit_from_outside() {
        let sphere = unit_sphere();
        let ray = Ray3f::from_od(Point3f::new(0.0, 0.0, -5.0), Vector3f::new(0.0, 0.0, 1.0));
        let (t, si) = sphere.intersect(&ray, true).expect("ray aims at the sphere");
        assert_relative_eq!(t, 4.0, epsilon = 1e-5);
        assert_relative_eq!(si.p.z, -1.0, epsilon = 1e-5);
        assert!(si.n.z < -0.99);
        assert_eq!(si.wo, Vector3f::new(0.0, 0.0, -1.0));
        assert!(si.p_error.z > 0.0);
        assert!(sphere.intersect_p(&ray, true));
    }

    #[test]
    fn test_hit_from_inside_uses_far_root() {
        let sphere = unit_sphere();
        let ray = Ray3f::from_od(Point3f::origin(), Vector3f::new(1.0, 0.0, 0.0));
        let (t, si) = sphere.intersect(&ray, true).expect("origin is inside");
        assert_relative_eq!(t, 1.0, epsilon = 1e-5);
        assert!(si.n.x > 0.99);
    }

    #[test]
    fn test_miss_and_t_max() {
        let sphere = unit_sphere();
        let miss = Ray3f::from_od(Point3f::new(0.0, 2.0, -5.0), Vector3f::new(0.0, 0.0, 1.0));
        assert!(sphere.intersect(&miss, true).is_none());
        assert!(!sphere.intersect_p(&miss, true));

        let short = Ray3f::new(Point3f::new(0.0, 0.0, -5.0), Vector3f::new(0.0, 0.0, 1.0), 3.0, 0.0);
        assert!(sphere.intersect(&short, true).is_none());

        let behind = Ray3f::from_od(Point3f::new(0.0, 0.0, 5.0), Vector3f::new(0.0, 0.0, 1.0));
        assert!(sphere.intersect(&behind, true).is_none());
    }

    #[test]
    fn test_clipped_sphere_falls_back_to_far_root() {
        // Upper cap removed: a ray from above passes through the hole and
        // hits the inside of the lower half.
        let data = ShapeData::from_transform(Transform::default(), false);
        let sphere = Sphere::new(data, 1.0, -1.0, 0.5, 360.0);
        let ray = Ray3f::from_od(Point3f::new(0.0, 0.0, 5.0), Vector3f::new(0.0, 0.0, -1.0));
        let (t, si) = sphere.intersect(&ray, true).expect("hits the lower half");
        assert_relative_eq!(t, 6.0, epsilon = 1e-4);
        assert_relative_eq!(si.p.z, -1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_partial_sweep_misses_outside_phi_max() {
        let data = ShapeData::from_transform(Transform::default(), false);
        let sphere = Sphere::new(data, 1.0, -1.0, 1.0, 90.0);
        // Hits near phi = 180 degrees on both roots.
        let ray = Ray3f::from_od(Point3f::new(-5.0, 0.1, 0.0), Vector3f::new(1.0, 0.0, 0.0));
        let hit_far_side = sphere.intersect(&ray, true);
        // Far root is near phi = 0, which is inside the sweep.
        let (_, si) = hit_far_side.expect("far root lies inside the sweep");
        assert!(si.p.x > 0.0);

        let ray = Ray3f::from_od(Point3f::new(-5.0, -0.1, 0.0), Vector3f::new(1.0, 0.0, 0.0));
        assert!(sphere.intersect(&ray, true).is_none());
    }

    #[test]
    fn test_parametric_derivatives_are_consistent() {
        let sphere = unit_sphere();
        let ray = Ray3f::from_od(Point3f::new(5.0, 0.3, 0.2), Vector3f::new(-1.0, 0.0, 0.0));
        let (_, si) = sphere.intersect(&ray, true).expect("hit");
        // Unit sphere: the normal equals the position and dn/du = dp/du.
        assert_relative_eq!(si.n.to_vector(), si.p.coords, epsilon = 1e-4);
        assert_relative_eq!(si.dndu.to_vector(), si.dpdu, epsilon = 1e-3);
        assert_relative_eq!(si.dndv.to_vector(), si.dpdv, epsilon = 1e-3);
        assert!(si.uv.x >= 0.0 && si.uv.x <= 1.0);
        assert!(si.uv.y >= 0.0 && si.uv.y <= 1.0);
    }
}
