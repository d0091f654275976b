//! Compatibility resolution between neighboring field samples.
//!
//! Two neighboring samples can only be averaged once their symmetry
//! ambiguity is resolved: an orientation is one of four 90°-rotated
//! representatives, and a position is one of infinitely many lattice
//! translates. The resolvers here pick the pair of representatives that are
//! mutually closest.

use nalgebra::{Point3, Vector3};

use crate::lattice::{SnapPolicy, intermediate_position, lattice_snap, rotate90};

/// Pick the closest pair of cross-field representatives.
///
/// Candidates are `{o0, n0×o0, −o0, −(n0×o0)}` on the own side and
/// `{o1, n1×o1}` on the neighbor side. The pair with the largest dot product
/// wins; ties go to the first candidate in that order.
pub fn compat_orientation(
    o0: &Vector3<f64>,
    n0: &Vector3<f64>,
    o1: &Vector3<f64>,
    n1: &Vector3<f64>,
) -> (Vector3<f64>, Vector3<f64>) {
    let t0 = rotate90(o0, n0);
    let t1 = rotate90(o1, n1);
    let own = [*o0, t0, -o0, -t0];
    let other = [*o1, t1];

    let mut best = (own[0], other[0]);
    let mut best_dot = f64::NEG_INFINITY;
    for a in &own {
        for b in &other {
            let dot = a.dot(b);
            if dot > best_dot {
                best_dot = dot;
                best = (*a, *b);
            }
        }
    }
    best
}

/// A vertex frame as seen by the position resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeFrame {
    /// Orientation field value (lattice axis `o`).
    pub orientation: Vector3<f64>,
    /// Current position field value.
    pub position: Point3<f64>,
    /// Unit vertex normal.
    pub normal: Vector3<f64>,
    /// Original vertex position (tangent plane anchor).
    pub vertex: Point3<f64>,
}

impl LatticeFrame {
    /// Lattice point shifted by `a` steps along `o` and `b` steps along `n × o`.
    #[inline]
    fn offset(&self, base: &Point3<f64>, a: f64, b: f64, scale: f64) -> Point3<f64> {
        let t = rotate90(&self.orientation, &self.normal);
        base + (self.orientation * a + t * b) * scale
    }
}

/// Pick the closest pair of lattice representatives for two positions.
///
/// Both positions are first floored toward the consensus point of the two
/// tangent planes. Then every combination of zero or one extra step along
/// each point's own two axes is tried, and the pair with the smallest
/// Euclidean distance is returned. Ties go to the first combination in
/// binary counting order with the own `o` step most significant.
pub fn compat_position(
    frame0: &LatticeFrame,
    frame1: &LatticeFrame,
    scale: f64,
) -> (Point3<f64>, Point3<f64>) {
    let middle = intermediate_position(
        &frame0.vertex,
        &frame0.normal,
        &frame1.vertex,
        &frame1.normal,
    );
    let base0 = lattice_snap(
        &frame0.position,
        &frame0.orientation,
        &frame0.normal,
        &middle,
        scale,
        SnapPolicy::Floor,
    );
    let base1 = lattice_snap(
        &frame1.position,
        &frame1.orientation,
        &frame1.normal,
        &middle,
        scale,
        SnapPolicy::Floor,
    );

    let mut best = (base0, base1);
    let mut best_dist = f64::INFINITY;
    for combo in 0u8..16 {
        let step = |bit: u8| f64::from((combo >> bit) & 1);
        let c0 = frame0.offset(&base0, step(3), step(2), scale);
        let c1 = frame1.offset(&base1, step(1), step(0), scale);
        let dist = (c0 - c1).norm();
        if dist < best_dist {
            best_dist = dist;
            best = (c0, c1);
        }
    }
    best
}
