//! Lattice geometry primitives for 4-fold position symmetry.
//!
//! A position field sample lives on an implicit square lattice of spacing
//! `scale` in the tangent plane of its vertex. The lattice axes are the
//! vertex orientation `o` and its 90° rotation `t = n × o`. Any point shifted
//! by whole multiples of `scale` along `o` or `t` encodes the same field
//! value.
//!
//! # Example
//!
//! ```
//! use mesh_field::lattice::{SnapPolicy, lattice_snap};
//! use nalgebra::{Point3, Vector3};
//!
//! let p = Point3::origin();
//! let target = Point3::new(0.26, 0.74, 0.0);
//! let snapped = lattice_snap(&p, &Vector3::x(), &Vector3::z(), &target, 0.5, SnapPolicy::Round);
//! assert_eq!(snapped, Point3::new(0.5, 0.5, 0.0));
//! ```

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Regularization added to `1 - (n0·n1)²` so parallel normals stay finite.
pub const PLANE_REGULARIZATION: f64 = 1e-4;

/// How fractional lattice coordinates become whole lattice steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapPolicy {
    /// Round toward negative infinity (the lattice cell containing the target).
    Floor,
    /// Round to the nearest lattice point, ties to even.
    Round,
}

impl SnapPolicy {
    /// Apply the policy to a fractional lattice coordinate.
    #[inline]
    pub fn apply(self, value: f64) -> f64 {
        match self {
            SnapPolicy::Floor => value.floor(),
            SnapPolicy::Round => value.round_ties_even(),
        }
    }
}

/// The orientation rotated by 90° about the normal, `n × o`.
#[inline]
pub fn rotate90(o: &Vector3<f64>, n: &Vector3<f64>) -> Vector3<f64> {
    n.cross(o)
}

/// Shift `p` by whole lattice steps toward `target`.
///
/// The displacement `target - p` is expressed in the frame `(o, n × o)`,
/// divided by `scale`, snapped with `policy` and applied back to `p`. The
/// result therefore stays on the lattice through `p`.
pub fn lattice_snap(
    p: &Point3<f64>,
    o: &Vector3<f64>,
    n: &Vector3<f64>,
    target: &Point3<f64>,
    scale: f64,
    policy: SnapPolicy,
) -> Point3<f64> {
    let t = rotate90(o, n);
    let d = target - p;
    let steps_o = policy.apply(o.dot(&d) / scale);
    let steps_t = policy.apply(t.dot(&d) / scale);
    p + (o * steps_o + t * steps_t) * scale
}

/// Consensus point between the tangent planes through `(p0, n0)` and
/// `(p1, n1)`.
///
/// Solves for `λ0`, `λ1` that bring `p0 + λ0·n0` and `p1 + λ1·n1` into
/// agreement with respect to both planes and returns the midpoint of the
/// displaced points. When the normals are (nearly) parallel the
/// regularized denominator keeps the offsets bounded and the result tends to
/// the plain midpoint corrected along the shared normal.
pub fn intermediate_position(
    p0: &Point3<f64>,
    n0: &Vector3<f64>,
    p1: &Point3<f64>,
    n1: &Vector3<f64>,
) -> Point3<f64> {
    let n0p0 = n0.dot(&p0.coords);
    let n0p1 = n0.dot(&p1.coords);
    let n1p0 = n1.dot(&p0.coords);
    let n1p1 = n1.dot(&p1.coords);
    let n0n1 = n0.dot(n1);

    let denom = 1.0 / (1.0 - n0n1 * n0n1 + PLANE_REGULARIZATION);
    let lambda0 = 2.0 * (n0p1 - n0p0 - n0n1 * (n1p0 - n1p1)) * denom;
    let lambda1 = 2.0 * (n1p0 - n1p1 - n0n1 * (n0p1 - n0p0)) * denom;

    Point3::from((p0.coords + p1.coords) * 0.5 - (n0 * lambda0 + n1 * lambda1) * 0.25)
}
