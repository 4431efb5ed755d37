// Copyright @yucwang 2023

use crate::core::interaction::SurfaceInteraction;
use crate::math::aabb::Bounds3f;
use crate::math::constants::Float;
use crate::math::ray::Ray3f;
use crate::math::transform::Transform;

use std::sync::Arc;
use std::sync::atomic::{ AtomicU64, Ordering };

static NEXT_SHAPE_ID: AtomicU64 = AtomicU64::new(1);

fn generate_shape_id() -> String {
    format!("Shape_{}", NEXT_SHAPE_ID.fetch_add(1, Ordering::Relaxed))
}

/// State shared by every shape: a name for log output, the object/world
/// transform pair and the two orientation flags. Fixed at construction.
#[derive(Debug, Clone)]
pub struct ShapeData {
    pub id: String,
    pub object_to_world: Arc<Transform>,
    pub world_to_object: Arc<Transform>,
    pub reverse_orientation: bool,
    pub transform_swaps_handedness: bool
}

impl ShapeData {
    /// `world_to_object` must be the inverse of `object_to_world`; the pair is
    /// not checked here.
    pub fn new(object_to_world: Arc<Transform>, world_to_object: Arc<Transform>,
               reverse_orientation: bool) -> Self {
        let transform_swaps_handedness = object_to_world.swaps_handedness();
        log::debug!("Shape data: reverse_orientation = {}, transform_swaps_handedness = {}.",
                    reverse_orientation, transform_swaps_handedness);
        Self { id: generate_shape_id(), object_to_world, world_to_object,
               reverse_orientation, transform_swaps_handedness }
    }

    /// Replace the generated `Shape_<n>` name.
    pub fn with_id<S: Into<String>>(mut self, id: S) -> Self {
        self.id = id.into();
        self
    }

    /// Convenience for shapes placed by a single transform.
    pub fn from_transform(object_to_world: Transform, reverse_orientation: bool) -> Self {
        let world_to_object = Arc::new(object_to_world.inverse());
        Self::new(Arc::new(object_to_world), world_to_object, reverse_orientation)
    }

    /// Whether normals derived from the parameterization must be negated.
    pub fn flips_normals(&self) -> bool {
        self.reverse_orientation ^ self.transform_swaps_handedness
    }
}

pub trait Shape: Send + Sync {
    fn data(&self) -> &ShapeData;

    fn id(&self) -> &str {
        &self.data().id
    }

    // One line summary used in log output.
    fn describe(&self) -> String;

    /// Bounds in the shape's own coordinate frame.
    fn object_bound(&self) -> Bounds3f;

    /// Bounds in world space. The default transforms the object bounds,
    /// which is conservative; override when a tighter box is cheap.
    fn world_bound(&self) -> Bounds3f {
        self.data().object_to_world.apply_bounds(&self.object_bound())
    }

    /// Closest hit along the world-space `ray` within `(0, ray.t_max]`,
    /// as the ray parameter and the world-space interaction.
    fn intersect(&self, ray: &Ray3f, test_alpha_texture: bool) -> Option<(Float, SurfaceInteraction)>;

    fn intersect_p(&self, ray: &Ray3f, test_alpha_texture: bool) -> bool {
        self.intersect(ray, test_alpha_texture).is_some()
    }

    fn area(&self) -> Float;

    fn reverse_orientation(&self) -> bool {
        self.data().reverse_orientation
    }

    fn transform_swaps_handedness(&self) -> bool {
        self.data().transform_swaps_handedness
    }

    fn flips_normals(&self) -> bool {
        self.data().flips_normals()
    }
}

pub type ArcShape = Arc<dyn Shape>;

/// Nearest hit among `shapes`. `ray.t_max` is shrunk after every accepted
/// hit so later candidates can only report something closer.
pub fn closest_intersection(shapes: &[ArcShape], ray: &mut Ray3f)
        -> Option<(usize, SurfaceInteraction)> {
    let mut closest: Option<(usize, SurfaceInteraction)> = None;
    for (idx, shape) in shapes.iter().enumerate() {
        if let Some((t_hit, isect)) = shape.intersect(ray, true) {
            if ray.update(t_hit) {
                log::trace!("{} hit at t = {}.", shape.id(), t_hit);
                closest = Some((idx, isect));
            }
        }
    }

    closest
}

pub fn any_intersection(shapes: &[ArcShape], ray: &Ray3f) -> bool {
    shapes.iter().any(|shape| shape.intersect_p(ray, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = ShapeData::from_transform(Transform::default(), false);
        let b = ShapeData::from_transform(Transform::default(), false);
        assert!(a.id.starts_with("Shape_"));
        assert_ne!(a.id, b.id);
        assert_eq!(b.with_id("floor").id, "floor");
    }

    #[test]
    fn test_flip_is_exclusive_or() {
        let mirror = Transform::scale(1.0, -1.0, 1.0);
        assert!(!ShapeData::from_transform(Transform::default(), false).flips_normals());
        assert!(ShapeData::from_transform(Transform::default(), true).flips_normals());
        assert!(ShapeData::from_transform(mirror, false).flips_normals());
        assert!(!ShapeData::from_transform(mirror, true).flips_normals());
    }
}
