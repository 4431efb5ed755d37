// Copyright @yucwang 2021

//! Geometric kernel of an offline ray tracer: bounds, rays, affine
//! transforms, and shapes that answer world-space intersection queries.

pub mod math;
pub mod core;
pub mod shapes;

pub use crate::core::interaction::{ Interaction, Shading, SurfaceInteraction };
pub use crate::core::shape::{ ArcShape, Shape, ShapeData };
pub use crate::math::aabb::{ Bounds2f, Bounds3f };
pub use crate::math::constants::{ Float, Matrix4f, Point2f, Point3f, Vector2f, Vector3f };
pub use crate::math::ray::Ray3f;
pub use crate::math::transform::{ Transform, TransformError };
pub use crate::math::vector::{ HasNaNs, Normal3f };
