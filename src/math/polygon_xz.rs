use std::f64::consts::PI;

use super::{Point3, Vector3};

/// Signed angle from `from` to `to` in the horizontal plane, in radians.
///
/// Positive when rotating counter-clockwise in the `(x, z)` plane, range
/// `(-PI, PI]`. Vertical components are ignored.
#[must_use]
pub fn signed_angle_xz(from: &Vector3, to: &Vector3) -> f64 {
    let cross = from.x * to.z - from.z * to.x;
    let dot = from.x * to.x + from.z * to.z;
    cross.atan2(dot)
}

/// Signed turning angle at `b` when walking `a -> b -> c`.
///
/// Zero for collinear points, positive for a counter-clockwise (left) turn
/// in the `(x, z)` plane.
#[must_use]
pub fn turn_angle_xz(a: &Point3, b: &Point3, c: &Point3) -> f64 {
    signed_angle_xz(&(a - b), &(b - c))
}

/// Sum of the signed exterior angles of a closed polygon.
///
/// Roughly `+2π` for a counter-clockwise loop and `-2π` for a clockwise one
/// in the `(x, z)` plane. A full reversal counts as `-π`.
#[must_use]
pub fn exterior_angle_sum(points: &[Point3]) -> f64 {
    let n = points.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = &points[(i + n - 1) % n];
        let b = &points[i];
        let c = &points[(i + 1) % n];
        let ab = a - b;
        let bc = b - c;
        let cross = ab.x * bc.z - ab.z * bc.x;
        let dot = ab.x * bc.x + ab.z * bc.z;
        sum += if cross == 0.0 && dot < 0.0 {
            -PI
        } else {
            signed_angle_xz(&ab, &bc)
        };
    }
    sum
}

/// Perimeter length of a closed polygon.
#[must_use]
pub fn circumference(points: &[Point3]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| (points[(i + 1) % n] - points[i]).norm())
        .sum()
}
