// Copyright @yucwang 2023

use crate::check_nans;
use crate::math::constants::{ Float, Point2f, Point3f, Vector3f, INFINITY };
use crate::math::ray::Ray3f;
use crate::math::transform::Transform;
use crate::math::vector::{ Normal3f, offset_ray_origin };

const SHADOW_EPSILON: Float = 0.0001;

fn normalize_or_zero(v: &Vector3f) -> Vector3f {
    if v.norm_squared() > 0.0 { v.normalize() } else { *v }
}

/// A point where light scatters, with the bookkeeping needed to leave it
/// again without hitting the same surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Interaction {
    pub p: Point3f,
    pub time: Float,
    /// Conservative absolute error of `p` per axis.
    pub p_error: Vector3f,
    pub wo: Vector3f,
    pub n: Normal3f
}

impl Default for Interaction {
    fn default() -> Self {
        Self { p: Point3f::origin(), time: 0.0, p_error: Vector3f::zeros(),
               wo: Vector3f::zeros(), n: Normal3f::zeros() }
    }
}

impl Interaction {
    pub fn new(p: Point3f, n: Normal3f, p_error: Vector3f,
               wo: Vector3f, time: Float) -> Self {
        check_nans!(p, n, p_error, wo);
        Self { p, time, p_error, wo: normalize_or_zero(&wo), n }
    }

    pub fn is_surface_interaction(&self) -> bool {
        !self.n.is_zero()
    }

    pub fn spawn_ray(&self, d: &Vector3f) -> Ray3f {
        let o = offset_ray_origin(&self.p, &self.p_error, &self.n, d);
        Ray3f::new(o, *d, INFINITY, self.time)
    }

    /// Ray towards `p2` that stops just short of it.
    pub fn spawn_ray_to(&self, p2: &Point3f) -> Ray3f {
        let o = offset_ray_origin(&self.p, &self.p_error, &self.n, &(*p2 - self.p));
        let d = *p2 - o;
        Ray3f::new(o, d, 1.0 - SHADOW_EPSILON, self.time)
    }
}

/// Shading frame. Starts as a copy of the geometric one and may later be
/// perturbed, e.g. by interpolated vertex normals.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Shading {
    pub n: Normal3f,
    pub dpdu: Vector3f,
    pub dpdv: Vector3f,
    pub dndu: Normal3f,
    pub dndv: Normal3f
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfaceInteraction {
    pub p: Point3f,
    pub time: Float,
    pub p_error: Vector3f,
    pub wo: Vector3f,
    pub n: Normal3f,
    pub uv: Point2f,
    pub dpdu: Vector3f,
    pub dpdv: Vector3f,
    pub dndu: Normal3f,
    pub dndv: Normal3f,
    pub shading: Shading,
    pub face_index: usize,
    // reverse_orientation ^ transform_swaps_handedness of the owning shape.
    flip_normals: bool
}

impl SurfaceInteraction {
    /// The geometric normal is `normalize(dpdu x dpdv)`, so its side follows
    /// the parameterization. It and the shading normal are negated when
    /// `flip_normals` is set, which shapes pass as
    /// `reverse_orientation ^ transform_swaps_handedness`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(p: Point3f, p_error: Vector3f, uv: Point2f, wo: Vector3f,
               dpdu: Vector3f, dpdv: Vector3f, dndu: Normal3f, dndv: Normal3f,
               time: Float, flip_normals: bool, face_index: usize) -> Self {
        check_nans!(p, p_error, uv, dpdu, dpdv, dndu, dndv);
        let mut n = Normal3f::from_vector(&dpdu.cross(&dpdv).normalize());
        let mut shading = Shading { n, dpdu, dpdv, dndu, dndv };

        if flip_normals {
            n = -n;
            shading.n = -shading.n;
        }

        Self { p, time, p_error, wo: normalize_or_zero(&wo), n, uv,
               dpdu, dpdv, dndu, dndv, shading, face_index, flip_normals }
    }

    pub fn flips_normals(&self) -> bool {
        self.flip_normals
    }

    /// The geometric part of the record.
    pub fn interaction(&self) -> Interaction {
        Interaction { p: self.p, time: self.time, p_error: self.p_error,
                      wo: self.wo, n: self.n }
    }

    /// Replace the shading frame. Whichever normal is not authoritative is
    /// flipped into the hemisphere of the other.
    pub fn set_shading_geometry(&mut self, dpdus: Vector3f, dpdvs: Vector3f,
                                dndus: Normal3f, dndvs: Normal3f,
                                orientation_is_authoritative: bool) {
        let mut sn = Normal3f::from_vector(&dpdus.cross(&dpdvs).normalize());
        if self.flip_normals {
            sn = -sn;
        }
        if orientation_is_authoritative {
            self.n = self.n.face_forward_normal(&sn);
        } else {
            sn = sn.face_forward_normal(&self.n);
        }

        self.shading = Shading { n: sn, dpdu: dpdus, dpdv: dpdvs,
                                 dndu: dndus, dndv: dndvs };
    }

    /// Map the record through `t`: points with error propagation, vectors
    /// through the linear part, normals through the inverse transpose and
    /// renormalized. The shading normal ends up on the geometric normal's side.
    pub fn transformed(&self, t: &Transform) -> SurfaceInteraction {
        let (p, p_error) = t.apply_point_with_error(&self.p, &self.p_error);
        let n = t.apply_normal(&self.n).normalize();
        let shading_n = t.apply_normal(&self.shading.n).normalize().face_forward_normal(&n);

        SurfaceInteraction {
            p,
            time: self.time,
            p_error,
            wo: normalize_or_zero(&t.apply_vector(&self.wo)),
            n,
            uv: self.uv,
            dpdu: t.apply_vector(&self.dpdu),
            dpdv: t.apply_vector(&self.dpdv),
            dndu: t.apply_normal(&self.dndu),
            dndv: t.apply_normal(&self.dndv),
            shading: Shading {
                n: shading_n,
                dpdu: t.apply_vector(&self.shading.dpdu),
                dpdv: t.apply_vector(&self.shading.dpdv),
                dndu: t.apply_normal(&self.shading.dndu),
                dndv: t.apply_normal(&self.shading.dndv),
            },
            face_index: self.face_index,
            flip_normals: self.flip_normals,
        }
    }

    pub fn spawn_ray(&self, d: &Vector3f) -> Ray3f {
        self.interaction().spawn_ray(d)
    }
}
