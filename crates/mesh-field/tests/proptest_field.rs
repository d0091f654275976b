//! Property-based tests for the lattice and compatibility primitives.
//!
//! Run with: cargo test -p mesh-field -- proptest

use mesh_field::{
    LatticeFrame, Point3, SnapPolicy, Vector3, compat_orientation, compat_position,
    intermediate_position, lattice_snap, rotate90,
};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_point() -> impl Strategy<Value = Point3<f64>> {
    prop::array::uniform3(-10.0..10.0f64).prop_map(|[x, y, z]| Point3::new(x, y, z))
}

/// Unit vector, rejecting near-zero draws.
fn arb_unit() -> impl Strategy<Value = Vector3<f64>> {
    prop::array::uniform3(-1.0..1.0f64)
        .prop_filter("non-degenerate direction", |[x, y, z]| {
            x * x + y * y + z * z > 1e-2
        })
        .prop_map(|[x, y, z]| Vector3::new(x, y, z).normalize())
}

/// Unit normal and a unit tangent orthogonal to it.
fn arb_frame() -> impl Strategy<Value = (Vector3<f64>, Vector3<f64>)> {
    (arb_unit(), arb_unit())
        .prop_filter("tangent not parallel to normal", |(n, d)| {
            (d - n * d.dot(n)).norm() > 1e-2
        })
        .prop_map(|(n, d)| {
            let o = (d - n * d.dot(&n)).normalize();
            (n, o)
        })
}

fn arb_scale() -> impl Strategy<Value = f64> {
    0.1..5.0f64
}

/// Coefficients of `d` in the orthonormal tangent basis `(o, n x o)`.
fn lattice_coords(d: &Vector3<f64>, o: &Vector3<f64>, n: &Vector3<f64>, scale: f64) -> [f64; 2] {
    let t = rotate90(o, n);
    [o.dot(d) / scale, t.dot(d) / scale]
}

fn is_whole(x: f64) -> bool {
    (x - x.round()).abs() < 1e-6
}

// =============================================================================
// Property Tests: Orientation Compatibility
// =============================================================================

proptest! {
    /// Returned representatives are unit vectors from the candidate sets.
    #[test]
    fn proptest_orientation_picks_candidates(
        (n0, o0) in arb_frame(),
        (n1, o1) in arb_frame(),
    ) {
        let (a, b) = compat_orientation(&o0, &n0, &o1, &n1);
        let t0 = rotate90(&o0, &n0);
        let t1 = rotate90(&o1, &n1);
        prop_assert!([o0, t0, -o0, -t0].contains(&a));
        prop_assert!([o1, t1].contains(&b));
    }

    /// The chosen pair maximizes the dot product over all candidate pairs.
    #[test]
    fn proptest_orientation_maximizes_dot(
        (n0, o0) in arb_frame(),
        (n1, o1) in arb_frame(),
    ) {
        let (a, b) = compat_orientation(&o0, &n0, &o1, &n1);
        let best = a.dot(&b);
        let t0 = rotate90(&o0, &n0);
        let t1 = rotate90(&o1, &n1);
        for own in [o0, t0, -o0, -t0] {
            for other in [o1, t1, -o1, -t1] {
                prop_assert!(own.dot(&other) <= best + 1e-12);
            }
        }
    }

    /// Within a shared tangent plane crosses are never more than 45° apart.
    #[test]
    fn proptest_orientation_same_plane_bound((n, o0) in arb_frame(), d in arb_unit()) {
        let o1 = d - n * d.dot(&n);
        prop_assume!(o1.norm() > 1e-2);
        let o1 = o1.normalize();
        let (a, b) = compat_orientation(&o0, &n, &o1, &n);
        prop_assert!(a.dot(&b) >= std::f64::consts::FRAC_1_SQRT_2 - 1e-9);
    }
}

// =============================================================================
// Property Tests: Lattice Snap
// =============================================================================

proptest! {
    /// Snapping only moves along whole lattice steps.
    #[test]
    fn proptest_snap_stays_on_lattice(
        (n, o) in arb_frame(),
        p in arb_point(),
        target in arb_point(),
        scale in arb_scale(),
        floor in any::<bool>(),
    ) {
        let policy = if floor { SnapPolicy::Floor } else { SnapPolicy::Round };
        let snapped = lattice_snap(&p, &o, &n, &target, scale, policy);
        let [a, b] = lattice_coords(&(snapped - p), &o, &n, scale);
        prop_assert!(is_whole(a) && is_whole(b), "steps ({}, {})", a, b);
        prop_assert!((snapped - p).dot(&n).abs() < 1e-9);
    }

    /// Rounding lands within half a step of the target in each tangent axis.
    #[test]
    fn proptest_round_snap_is_nearest(
        (n, o) in arb_frame(),
        p in arb_point(),
        target in arb_point(),
        scale in arb_scale(),
    ) {
        let snapped = lattice_snap(&p, &o, &n, &target, scale, SnapPolicy::Round);
        let [a, b] = lattice_coords(&(target - snapped), &o, &n, scale);
        prop_assert!(a.abs() <= 0.5 + 1e-9 && b.abs() <= 0.5 + 1e-9);
    }

    /// Flooring leaves the target in the cell spanned from the snapped point.
    #[test]
    fn proptest_floor_snap_contains_target(
        (n, o) in arb_frame(),
        p in arb_point(),
        target in arb_point(),
        scale in arb_scale(),
    ) {
        let snapped = lattice_snap(&p, &o, &n, &target, scale, SnapPolicy::Floor);
        let [a, b] = lattice_coords(&(target - snapped), &o, &n, scale);
        prop_assert!((-1e-9..1.0 + 1e-9).contains(&a));
        prop_assert!((-1e-9..1.0 + 1e-9).contains(&b));
    }
}

// =============================================================================
// Property Tests: Intermediate Position and Position Compatibility
// =============================================================================

proptest! {
    /// The consensus point does not depend on argument order.
    #[test]
    fn proptest_intermediate_is_symmetric(
        p0 in arb_point(),
        n0 in arb_unit(),
        p1 in arb_point(),
        n1 in arb_unit(),
    ) {
        let a = intermediate_position(&p0, &n0, &p1, &n1);
        let b = intermediate_position(&p1, &n1, &p0, &n0);
        prop_assert!((a - b).norm() <= 1e-5 * (1.0 + a.coords.norm()));
    }

    /// Each resolved position is a lattice translate of its input.
    #[test]
    fn proptest_position_results_are_translates(
        (n0, o0) in arb_frame(),
        (n1, o1) in arb_frame(),
        p0 in arb_point(),
        p1 in arb_point(),
        v0 in arb_point(),
        v1 in arb_point(),
        scale in arb_scale(),
    ) {
        let f0 = LatticeFrame { orientation: o0, position: p0, normal: n0, vertex: v0 };
        let f1 = LatticeFrame { orientation: o1, position: p1, normal: n1, vertex: v1 };
        let (a, b) = compat_position(&f0, &f1, scale);

        for (result, frame) in [(a, f0), (b, f1)] {
            let d = result - frame.position;
            let [x, y] = lattice_coords(&d, &frame.orientation, &frame.normal, scale);
            prop_assert!(is_whole(x) && is_whole(y), "steps ({}, {})", x, y);
        }
    }

    /// The chosen pair is never farther apart than the floored pair.
    #[test]
    fn proptest_position_not_worse_than_floor(
        (n0, o0) in arb_frame(),
        (n1, o1) in arb_frame(),
        p0 in arb_point(),
        p1 in arb_point(),
        v0 in arb_point(),
        v1 in arb_point(),
        scale in arb_scale(),
    ) {
        let f0 = LatticeFrame { orientation: o0, position: p0, normal: n0, vertex: v0 };
        let f1 = LatticeFrame { orientation: o1, position: p1, normal: n1, vertex: v1 };
        let (a, b) = compat_position(&f0, &f1, scale);

        let middle = intermediate_position(&v0, &n0, &v1, &n1);
        let z0 = lattice_snap(&p0, &o0, &n0, &middle, scale, SnapPolicy::Floor);
        let z1 = lattice_snap(&p1, &o1, &n1, &middle, scale, SnapPolicy::Floor);
        prop_assert!((a - b).norm() <= (z0 - z1).norm() + 1e-9);
    }
}
