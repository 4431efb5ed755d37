// Copyright @yucwang 2023

use crate::core::interaction::SurfaceInteraction;
use crate::core::shape::{ Shape, ShapeData };
use crate::math::aabb::Bounds3f;
use crate::math::constants::{ Float, Point2f, Point3f, Vector3f, gamma };
use crate::math::ray::Ray3f;
use crate::math::vector::Normal3f;

/// The box `[-1, 1]^3` in object space. Faces are indexed
/// `+z, -z, +y, -y, +x, -x`.
pub struct Cube {
    data: ShapeData,
    area: Float
}

impl Cube {
    pub fn new(data: ShapeData) -> Self {
        let to_world = &data.object_to_world;
        let dx = to_world.apply_vector(&Vector3f::new(2.0, 0.0, 0.0));
        let dy = to_world.apply_vector(&Vector3f::new(0.0, 2.0, 0.0));
        let dz = to_world.apply_vector(&Vector3f::new(0.0, 0.0, 2.0));
        let area_xy = dx.cross(&dy).norm();
        let area_xz = dx.cross(&dz).norm();
        let area_yz = dy.cross(&dz).norm();
        let area = 2.0 * (area_xy + area_xz + area_yz);

        let cube = Self { data, area };
        log::debug!("Created {}.", cube.describe());
        cube
    }

    fn object_box() -> Bounds3f {
        Bounds3f::new(Point3f::new(-1.0, -1.0, -1.0), Point3f::new(1.0, 1.0, 1.0))
    }

    // Entry point if the origin is outside, exit point otherwise.
    fn hit_t(ray: &Ray3f) -> Option<Float> {
        let (t0, t1) = Self::object_box().intersect_p(ray)?;
        let t_hit = if t0 > 0.0 { t0 } else { t1 };
        if t_hit <= 0.0 || t_hit > ray.t_max {
            return None;
        }
        Some(t_hit)
    }

    // Face index of the face closest to `p`, with `p` snapped onto it.
    fn snap_to_face(p: Point3f) -> (usize, Point3f) {
        let ax = p.x.abs();
        let ay = p.y.abs();
        let az = p.z.abs();
        let mut snapped = p;
        let face = if az >= ax && az >= ay {
            snapped.z = p.z.signum();
            if p.z > 0.0 { 0 } else { 1 }
        } else if ay >= ax {
            snapped.y = p.y.signum();
            if p.y > 0.0 { 2 } else { 3 }
        } else {
            snapped.x = p.x.signum();
            if p.x > 0.0 { 4 } else { 5 }
        };
        (face, snapped)
    }

    /// Per-face `(uv, dpdu, dpdv)`, ordered so that `dpdu x dpdv` points out
    /// of the cube.
    fn face_frame(face: usize, p: &Point3f) -> (Point2f, Vector3f, Vector3f) {
        let s = |c: Float| 0.5 * (c + 1.0);
        let ex = Vector3f::new(2.0, 0.0, 0.0);
        let ey = Vector3f::new(0.0, 2.0, 0.0);
        let ez = Vector3f::new(0.0, 0.0, 2.0);
        match face {
            0 => (Point2f::new(s(p.x), s(p.y)), ex, ey),
            1 => (Point2f::new(s(p.y), s(p.x)), ey, ex),
            2 => (Point2f::new(s(p.z), s(p.x)), ez, ex),
            3 => (Point2f::new(s(p.x), s(p.z)), ex, ez),
            4 => (Point2f::new(s(p.y), s(p.z)), ey, ez),
            _ => (Point2f::new(s(p.z), s(p.y)), ez, ey),
        }
    }
}

impl Shape for Cube {
    fn data(&self) -> &ShapeData {
        &self.data
    }

    fn describe(&self) -> String {
        format!("Cube {}: area = {}", self.data.id, self.area)
    }

    fn object_bound(&self) -> Bounds3f {
        Self::object_box()
    }

    fn intersect(&self, r: &Ray3f, _test_alpha_texture: bool) -> Option<(Float, SurfaceInteraction)> {
        let ray = self.data.world_to_object.apply_ray(r);
        let t_hit = Self::hit_t(&ray)?;

        let (face, p_hit) = Self::snap_to_face(ray.at(t_hit));
        let (uv, dpdu, dpdv) = Self::face_frame(face, &p_hit);
        let mut p_error = gamma(5) * p_hit.coords.abs();
        // The coordinate across the face is exact after snapping.
        let axis = [2, 2, 1, 1, 0, 0][face];
        p_error[axis] = 0.0;

        let isect = SurfaceInteraction::new(p_hit, p_error, uv, -ray.d, dpdu, dpdv,
                                            Normal3f::zeros(), Normal3f::zeros(), ray.time,
                                            self.data.flips_normals(), face);

        Some((t_hit, isect.transformed(&self.data.object_to_world)))
    }

    fn intersect_p(&self, r: &Ray3f, _test_alpha_texture: bool) -> bool {
        let ray = self.data.world_to_object.apply_ray(r);
        Self::hit_t(&ray).is_some()
    }

    fn area(&self) -> Float {
        self.area
    }
}
