// Copyright @yucwang 2023

use proptest::prelude::*;
use tangent::{ Bounds3f, Float, Point3f, Ray3f, Transform, Vector3f };

fn coord() -> impl Strategy<Value = Float> {
    -100.0 as Float..100.0 as Float
}

fn point() -> impl Strategy<Value = Point3f> {
    (coord(), coord(), coord()).prop_map(|(x, y, z)| Point3f::new(x, y, z))
}

fn bounds() -> impl Strategy<Value = Bounds3f> {
    (point(), point()).prop_map(|(a, b)| Bounds3f::new(a, b))
}

fn unit() -> impl Strategy<Value = Point3f> {
    (0.0 as Float..=1.0, 0.0 as Float..=1.0, 0.0 as Float..=1.0)
        .prop_map(|(x, y, z)| Point3f::new(x, y, z))
}

fn rigid_transform() -> impl Strategy<Value = Transform> {
    (coord(), coord(), coord(), -180.0 as Float..180.0, -180.0 as Float..180.0,
     0.25 as Float..4.0)
        .prop_map(|(x, y, z, ax, az, s)| {
            Transform::translate(&Vector3f::new(x, y, z)) *
                Transform::rotate_z(az) * Transform::rotate_x(ax) *
                Transform::scale(s, s, s)
        })
}

proptest! {
    #[test]
    fn offset_inverts_lerp(b in bounds(), t in unit()) {
        let d = b.diagonal();
        let o = b.offset(&b.lerp(&t));
        for idx in 0..3 {
            if d[idx] > 1e-3 {
                // Absolute error of lerp scales with the box coordinates.
                let tol = 1e-4 * (1.0 + b.p_min[idx].abs().max(b.p_max[idx].abs()) / d[idx]);
                prop_assert!((o[idx] - t[idx]).abs() <= tol,
                             "axis {}: {} vs {}", idx, o[idx], t[idx]);
            }
        }
    }

    #[test]
    fn union_contains_operands_and_is_idempotent(b in bounds(), p in point()) {
        let u = b.union_point(&p);
        prop_assert!(u.inside(&p));
        prop_assert!(u.inside(&b.p_min) && u.inside(&b.p_max));
        prop_assert_eq!(u.union_point(&p), u);
        prop_assert_eq!(u.union(&b), u);
    }

    #[test]
    fn transform_round_trip(t in rigid_transform(), p in point()) {
        let back = t.inverse().apply_point(&t.apply_point(&p));
        for idx in 0..3 {
            prop_assert!((back[idx] - p[idx]).abs() <= 1e-2,
                         "axis {}: {} vs {}", idx, back[idx], p[idx]);
        }
    }

    #[test]
    fn transformed_bounds_contain_transformed_points(t in rigid_transform(), b in bounds(), s in unit()) {
        let p = b.lerp(&s);
        let q = t.apply_point(&p);
        let wb = t.apply_bounds(&b).expand(1e-2);
        prop_assert!(wb.inside(&q));
    }

    #[test]
    fn ray_through_box_center_hits(b in bounds(), o in point()) {
        let center = b.center();
        prop_assume!((center - o).norm() > 1e-2);
        let ray = Ray3f::from_od(o, center - o);
        let hit = b.intersect_p(&ray);
        prop_assert!(hit.is_some());
        let (t0, t1) = hit.unwrap_or((0.0, 0.0));
        prop_assert!(t0 <= 1.0 + 1e-4 && t1 >= 1.0 - 1e-4);
    }
}
